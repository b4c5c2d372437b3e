// Copyright (c) 2025 Jan Holthuis <jan.holthuis@rub.de>
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Module for the `tag` CLI subcommand.

use super::ui;
use crate::lookup::MetadataLookup;
use crate::musicbrainz::MusicBrainzClient;
use crate::session::{Session, Target};
use crate::tag::{CoverImage, TagField, TagSet, TagVersion};
use crate::Config;
use clap::Parser;
use std::fs;
use std::path::PathBuf;

/// Command line arguments for the `tag` CLI command.
#[derive(Parser, Debug)]
pub struct Args {
    /// MP3 file, or folder whose MP3 files all get the same tags.
    path: PathBuf,
    /// Track artist (empty to clear).
    #[arg(long)]
    artist: Option<String>,
    /// Album title (empty to clear).
    #[arg(long)]
    album: Option<String>,
    /// Track title (empty to clear).
    #[arg(long)]
    title: Option<String>,
    /// Release year (empty to clear).
    #[arg(long)]
    year: Option<String>,
    /// Track number, e.g. `3` or `3/12` (empty to clear).
    #[arg(long)]
    track: Option<String>,
    /// Genre (empty to clear).
    #[arg(long)]
    genre: Option<String>,
    /// Image file to embed as front cover.
    #[arg(long, conflicts_with = "remove_cover")]
    cover: Option<PathBuf>,
    /// Remove the embedded cover.
    #[arg(long)]
    remove_cover: bool,
    /// Look up artist, title, album and year on MusicBrainz.
    #[arg(long)]
    fetch_info: bool,
    /// Download the front cover from the Cover Art Archive.
    #[arg(long)]
    fetch_cover: bool,
    /// Tag version to write (overrides the configuration).
    #[arg(long, value_enum)]
    id3_version: Option<TagVersion>,
    /// Print the resulting tags without saving.
    #[arg(long)]
    dry_run: bool,
    /// Do not ask for confirmation before tagging a folder.
    #[arg(short, long)]
    yes: bool,
}

impl Args {
    /// Field values given on the command line.
    fn field_overrides(&self) -> impl Iterator<Item = (TagField, &str)> {
        [
            (TagField::Artist, &self.artist),
            (TagField::Album, &self.album),
            (TagField::Title, &self.title),
            (TagField::Year, &self.year),
            (TagField::TrackNumber, &self.track),
            (TagField::Genre, &self.genre),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_deref().map(|value| (field, value)))
    }

    /// Apply the values given on the command line to the tags.
    ///
    /// # Errors
    ///
    /// Fails if the cover image cannot be read.
    fn apply_overrides(&self, tags: &mut TagSet) -> crate::Result<()> {
        for (field, value) in self.field_overrides() {
            log::debug!("Setting {} to {value:?}", field.label());
            tags.set(field, value.trim());
        }

        if let Some(path) = &self.cover {
            let data = fs::read(path)?;
            log::debug!("Read cover image from {}", path.display());
            tags.cover_image = Some(CoverImage::new(data));
        } else if self.remove_cover {
            tags.cover_image = None;
        }

        Ok(())
    }
}

/// Run the lookups that were requested on the command line, reporting their outcome.
///
/// Lookup failures are printed, the remaining steps still run.
async fn fetch<L: MetadataLookup>(session: &mut Session<L>, args: &Args) {
    if args.fetch_info {
        match session.auto_fetch().await {
            Ok(outcome) => ui::print_fetch_outcome(outcome),
            Err(err) => ui::print_lookup_error(&err),
        }
    }

    if args.fetch_cover {
        match session.fetch_cover_art().await {
            Ok(outcome) => ui::print_cover_art_outcome(outcome),
            Err(err) => ui::print_lookup_error(&err),
        }
    }
}

/// Run the `tag` command.
pub async fn run(config: &Config, args: Args) -> crate::Result<()> {
    let version = args
        .id3_version
        .unwrap_or_else(|| config.tagging.id3_version());
    let client = MusicBrainzClient::new(config)?;
    let mut session = Session::new(client, version.into());

    if args.path.is_dir() {
        session.load_folder(&args.path);
    } else {
        session.load_file(&args.path)?;
    }
    args.apply_overrides(session.tags_mut())?;
    fetch(&mut session, &args).await;

    if args.dry_run {
        ui::print_tag_set(&args.path, session.tags());
        println!("Dry run, nothing was saved.");
        return Ok(());
    }

    let is_folder = matches!(session.target(), Some(Target::Folder(_)));
    if is_folder && !args.yes {
        ui::print_tag_set(&args.path, session.tags());
        if !ui::confirm_batch(&args.path)? {
            println!("Nothing was saved.");
            return Ok(());
        }
    }

    let summary = session.save()?;
    ui::print_save_summary(&summary);
    if !is_folder {
        ui::print_tag_set(&args.path, session.tags());
    }

    if summary.is_success() {
        Ok(())
    } else {
        Err(crate::Error::PartialSave {
            failed: summary.failed.len(),
            total: summary.failed.len() + summary.succeeded.len(),
        })
    }
}
