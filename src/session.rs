// Copyright (c) 2025 Jan Holthuis <jan.holthuis@rub.de>
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! An editing session for a single file or a whole folder.

use crate::lookup::{CoverArtLookup, MetadataLookup, RecordingLookup};
use crate::tag::{TagSet, WriteOptions};
use crate::util::{list_mp3_files, parse_filename};
use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// What the session currently edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A single MP3 file.
    File(PathBuf),
    /// All MP3 files directly inside a folder.
    Folder(PathBuf),
}

impl Target {
    /// Path of the file or folder.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Target::File(path) | Target::Folder(path) => path,
        }
    }
}

/// Result of [`Session::auto_fetch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Artist, title and possibly album and year were replaced.
    Updated,
    /// The lookup found nothing, tags are unchanged.
    NoMatch,
    /// Lookups are not available for folders.
    NotApplicable,
}

/// Result of [`Session::fetch_cover_art`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverArtOutcome {
    /// A cover image was stored in the tags.
    Fetched,
    /// No cover art was found, tags are unchanged.
    NotFound,
    /// Lookups are not available for folders.
    NotApplicable,
}

/// Files written by [`Session::save`].
#[derive(Debug, Default)]
pub struct SaveSummary {
    /// Files that were saved.
    pub succeeded: Vec<PathBuf>,
    /// One error per file that could not be saved.
    pub failed: Vec<Error>,
}

impl SaveSummary {
    /// Returns `true` if all files were saved.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Holds the target, the tags being edited and the write options.
#[derive(Debug)]
pub struct Session<L> {
    /// Metadata and cover art source.
    lookup: L,
    /// How tags are written.
    write_options: WriteOptions,
    /// The loaded file or folder.
    target: Option<Target>,
    /// Tags being edited.
    tags: TagSet,
}

impl<L: MetadataLookup> Session<L> {
    /// Create a session without target.
    pub fn new(lookup: L, write_options: WriteOptions) -> Self {
        Self {
            lookup,
            write_options,
            target: None,
            tags: TagSet::default(),
        }
    }

    /// The loaded file or folder.
    pub fn target(&self) -> Option<&Target> {
        self.target.as_ref()
    }

    /// The tags being edited.
    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    /// Mutable access to the tags being edited.
    pub fn tags_mut(&mut self) -> &mut TagSet {
        &mut self.tags
    }

    /// How tags are written on [`Session::save`].
    pub fn write_options(&self) -> WriteOptions {
        self.write_options
    }

    /// Change how tags are written.
    pub fn set_write_options(&mut self, write_options: WriteOptions) {
        self.write_options = write_options;
    }

    /// Select a single file and load its tags.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Read`] if the tags cannot be read. The file stays selected with empty
    /// tags in that case.
    pub fn load_file(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        self.target = Some(Target::File(path.clone()));
        self.tags = TagSet::default();
        self.tags = TagSet::read_from_path(&path)?;
        log::info!("Loaded tags from {}", path.display());
        Ok(())
    }

    /// Select a folder. The tags start out empty and are written to every MP3 file on save.
    pub fn load_folder(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        log::info!("Selected folder {}", path.display());
        self.target = Some(Target::Folder(path));
        self.tags = TagSet::default();
    }

    /// Look up artist, title, album and year for the loaded file.
    ///
    /// Empty or blank artist and title are guessed from the file name (`Artist - Title.mp3`).
    ///
    /// # Errors
    ///
    /// Fails if there is no target, if artist or title cannot be determined or if the lookup
    /// itself fails.
    pub async fn auto_fetch(&mut self) -> Result<FetchOutcome> {
        let path = match self.target.as_ref().ok_or(Error::NoTarget)? {
            Target::File(path) => path,
            Target::Folder(_) => return Ok(FetchOutcome::NotApplicable),
        };

        let mut artist = self.tags.artist.trim().to_string();
        let mut title = self.tags.title.trim().to_string();
        if artist.is_empty() || title.is_empty() {
            let (guessed_artist, guessed_title) = parse_filename(path);
            log::debug!("Guessed {guessed_artist:?} - {guessed_title:?} from file name");
            if artist.is_empty() {
                artist = guessed_artist;
            }
            if title.is_empty() {
                title = guessed_title;
            }
        }
        if artist.is_empty() || title.is_empty() {
            return Err(Error::MissingInput(
                "Artist and title are required to fetch track info",
            ));
        }

        match self.lookup.find_recording(&artist, &title).await? {
            RecordingLookup::Found(found) => {
                found.apply_to(&mut self.tags);
                Ok(FetchOutcome::Updated)
            }
            RecordingLookup::NoMatch => Ok(FetchOutcome::NoMatch),
        }
    }

    /// Look up the front cover for the artist and album of the tags.
    ///
    /// # Errors
    ///
    /// Fails if there is no target, if artist or album are blank or if the lookup itself fails.
    pub async fn fetch_cover_art(&mut self) -> Result<CoverArtOutcome> {
        if let Target::Folder(_) = self.target.as_ref().ok_or(Error::NoTarget)? {
            return Ok(CoverArtOutcome::NotApplicable);
        }

        let artist = self.tags.artist.trim();
        let album = self.tags.album.trim();
        if artist.is_empty() || album.is_empty() {
            return Err(Error::MissingInput(
                "Artist and album are required to fetch cover art",
            ));
        }

        match self.lookup.find_cover_art(artist, album).await? {
            CoverArtLookup::Found(cover) => {
                log::info!("Fetched {} cover art ({} bytes)", cover.mime_type(), cover.data().len());
                self.tags.cover_image = Some(cover);
                Ok(CoverArtOutcome::Fetched)
            }
            CoverArtLookup::NotFound => Ok(CoverArtOutcome::NotFound),
        }
    }

    /// Write the tags to the loaded file or to every MP3 file in the loaded folder.
    ///
    /// A single file is reloaded afterwards, so the tags reflect what is stored on disk. In a
    /// folder, every file is written independently and failures do not stop the batch.
    ///
    /// # Errors
    ///
    /// Fails if there is no target, if the folder cannot be listed or contains no MP3 files, or
    /// if a single file cannot be written or reloaded.
    pub fn save(&mut self) -> Result<SaveSummary> {
        match self.target.as_ref().ok_or(Error::NoTarget)? {
            Target::File(path) => {
                let path = path.clone();
                self.tags.write_to_path(&path, self.write_options)?;
                log::info!("Saved tags to {}", path.display());
                self.tags = TagSet::read_from_path(&path)?;
                Ok(SaveSummary {
                    succeeded: vec![path],
                    failed: vec![],
                })
            }
            Target::Folder(dir) => {
                let files = list_mp3_files(dir)?;
                if files.is_empty() {
                    return Err(Error::NoMp3Files(dir.clone()));
                }

                let mut summary = SaveSummary::default();
                for path in files {
                    match self.tags.write_to_path(&path, self.write_options) {
                        Ok(()) => {
                            log::info!("Saved tags to {}", path.display());
                            summary.succeeded.push(path);
                        }
                        Err(err) => {
                            log::warn!("{err}");
                            summary.failed.push(err);
                        }
                    }
                }
                Ok(summary)
            }
        }
    }
}
