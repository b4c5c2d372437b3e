// Copyright (c) 2025 Jan Holthuis <jan.holthuis@rub.de>
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Tags and tag-related functions.
//!
//! A [`TagSet`] holds the six managed text fields and the cover image of a single track. Reading
//! prefers the ID3v2 tag at the start of the file and falls back to an ID3v1 block at its end.
//! Writing is a full replace of the managed fields: everything that is empty in the [`TagSet`]
//! is removed from the file.

mod id3v1;
mod id3v2;

pub use id3v1::GENRES as ID3V1_GENRES;

use self::id3v2::ID3v2Tag;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;
use thiserror::Error;

/// The first bytes of every PNG file.
const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

/// Genre names offered as suggestions when editing.
pub const GENRE_SUGGESTIONS: [&str; 27] = [
    "Acoustic",
    "Alternative",
    "Anime",
    "Blues",
    "Classical",
    "Country",
    "Dance",
    "Disco",
    "Electronic",
    "Folk",
    "Funk",
    "Hip-Hop",
    "Indie",
    "Jazz",
    "Latin",
    "Lo-Fi",
    "Metal",
    "Pop",
    "Punk",
    "R&B",
    "Rap",
    "Reggae",
    "Rock",
    "Soul",
    "Soundtrack",
    "Techno",
    "Vocal",
];

/// Errors raised while accessing the tags of a file.
#[derive(Error, Debug)]
pub enum TagError {
    /// Errors raised by the [`id3`] crate.
    #[error("ID3 error: {0}")]
    Id3(#[from] ::id3::Error),
    /// Errors raised by the [`lofty`] crate.
    #[error("Lofty error: {0}")]
    Lofty(#[from] lofty::error::LoftyError),
    /// I/O Error.
    #[error("Input/Output error: {0}")]
    Io(#[from] io::Error),
}

/// A tag field describes one of the managed text fields in a format-independent way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagField {
    /// Track Artist Name.
    Artist,
    /// Title of the release.
    Album,
    /// Track Title.
    Title,
    /// Release Year (YYYY).
    Year,
    /// Track number on the disc.
    TrackNumber,
    /// Genre Name.
    Genre,
}

impl TagField {
    /// All managed fields, in display order.
    pub const ALL: [TagField; 6] = [
        TagField::Artist,
        TagField::Album,
        TagField::Title,
        TagField::Year,
        TagField::TrackNumber,
        TagField::Genre,
    ];

    /// Human-readable name of the field.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            TagField::Artist => "Artist",
            TagField::Album => "Album",
            TagField::Title => "Title",
            TagField::Year => "Year",
            TagField::TrackNumber => "Track Number",
            TagField::Genre => "Genre",
        }
    }
}

/// An embedded cover image.
#[derive(Clone, PartialEq, Eq)]
pub struct CoverImage {
    /// Raw image data.
    data: Vec<u8>,
}

impl std::fmt::Debug for CoverImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoverImage")
            .field("mime_type", &self.mime_type())
            .field("len", &self.data.len())
            .finish()
    }
}

impl CoverImage {
    /// Wrap raw image data.
    #[must_use]
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// The raw image data.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// MIME type inferred from the image data.
    ///
    /// Data that starts with the PNG signature is `image/png`, everything else is assumed to be
    /// `image/jpeg`.
    #[must_use]
    pub fn mime_type(&self) -> &'static str {
        if self.data.starts_with(&PNG_SIGNATURE) {
            "image/png"
        } else {
            "image/jpeg"
        }
    }
}

/// All tag values of a single track.
///
/// Empty text means "absent": such a field is never written to a file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    /// Track artist.
    pub artist: String,
    /// Album title.
    pub album: String,
    /// Track title.
    pub title: String,
    /// Release year.
    pub year: String,
    /// Track number (may contain the total, e.g. `3/12`).
    pub track_number: String,
    /// Genre.
    pub genre: String,
    /// Embedded front cover.
    pub cover_image: Option<CoverImage>,
}

impl TagSet {
    /// Returns the value of the field, or `None` if it is empty.
    #[must_use]
    pub fn get(&self, field: TagField) -> Option<&str> {
        let value = self.field(field);
        (!value.is_empty()).then_some(value.as_str())
    }

    /// Set the value of a field. An empty value clears it.
    pub fn set(&mut self, field: TagField, value: impl Into<String>) {
        *self.field_mut(field) = value.into();
    }

    /// Returns `true` if neither a text field nor the cover image is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        TagField::ALL
            .into_iter()
            .all(|field| self.get(field).is_none())
            && self.cover_image.is_none()
    }

    /// Reference to the underlying text of a field.
    fn field(&self, field: TagField) -> &String {
        match field {
            TagField::Artist => &self.artist,
            TagField::Album => &self.album,
            TagField::Title => &self.title,
            TagField::Year => &self.year,
            TagField::TrackNumber => &self.track_number,
            TagField::Genre => &self.genre,
        }
    }

    /// Mutable reference to the underlying text of a field.
    fn field_mut(&mut self, field: TagField) -> &mut String {
        match field {
            TagField::Artist => &mut self.artist,
            TagField::Album => &mut self.album,
            TagField::Title => &mut self.title,
            TagField::Year => &mut self.year,
            TagField::TrackNumber => &mut self.track_number,
            TagField::Genre => &mut self.genre,
        }
    }

    /// Read the tags of the file at `path`.
    ///
    /// A file without any tag yields an empty [`TagSet`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Read`] if the file cannot be opened or its tag is corrupt.
    pub fn read_from_path(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        read_tag_set(path).map_err(|source| crate::Error::Read {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Replace the managed tags of the file at `path` with the values in this [`TagSet`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Write`] if the existing tag cannot be read or the file cannot be
    /// written.
    pub fn write_to_path(&self, path: impl AsRef<Path>, options: WriteOptions) -> crate::Result<()> {
        let path = path.as_ref();
        write_tag_set(path, self, options).map_err(|source| crate::Error::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Read the ID3v2 tag, or the ID3v1 tag if there is none.
fn read_tag_set(path: &Path) -> Result<TagSet, TagError> {
    if let Some(tag) = ID3v2Tag::read_from_path(path)? {
        log::debug!("Read {:?} tag from {}", tag.version(), path.display());
        return Ok(tag.to_tag_set());
    }

    if let Some(tags) = id3v1::read_from_path(path)? {
        log::debug!("Read ID3v1 tag from {}", path.display());
        return Ok(tags);
    }

    log::debug!("{} has no tags", path.display());
    Ok(TagSet::default())
}

/// Write the ID3v2 tag and add or remove the ID3v1 block.
fn write_tag_set(path: &Path, tags: &TagSet, options: WriteOptions) -> Result<(), TagError> {
    let mut tag = ID3v2Tag::read_from_path(path)?.unwrap_or_default();
    tag.assign_tag_set(tags, options.version);
    tag.write_to_path(path, options.version)?;

    if options.legacy {
        id3v1::write_to_path(path, tags)?;
    } else if id3v1::remove_from_path(path)? {
        log::debug!("Removed ID3v1 tag from {}", path.display());
    }

    log::debug!("Wrote {options:?} to {}", path.display());
    Ok(())
}

/// Version of the ID3v2 tag written to a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Id3v2Version {
    /// ID3v2.3
    Id3v23,
    /// ID3v2.4
    Id3v24,
}

impl From<Id3v2Version> for ::id3::Version {
    fn from(version: Id3v2Version) -> Self {
        match version {
            Id3v2Version::Id3v23 => ::id3::Version::Id3v23,
            Id3v2Version::Id3v24 => ::id3::Version::Id3v24,
        }
    }
}

/// How tags are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// Write an ID3v1 block at the end of the file. If unset, an existing block is removed.
    pub legacy: bool,
    /// Version of the ID3v2 tag.
    pub version: Id3v2Version,
}

/// The tag version as chosen by the user.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum,
)]
pub enum TagVersion {
    /// ID3v1 (written alongside an ID3v2.3 tag).
    #[serde(rename = "v1")]
    #[value(name = "v1")]
    Id3v1,
    /// ID3v2.3
    #[default]
    #[serde(rename = "v2.3")]
    #[value(name = "v2.3")]
    Id3v23,
    /// ID3v2.4
    #[serde(rename = "v2.4")]
    #[value(name = "v2.4")]
    Id3v24,
}

impl From<TagVersion> for WriteOptions {
    fn from(version: TagVersion) -> Self {
        match version {
            TagVersion::Id3v1 => WriteOptions {
                legacy: true,
                version: Id3v2Version::Id3v23,
            },
            TagVersion::Id3v23 => WriteOptions {
                legacy: false,
                version: Id3v2Version::Id3v23,
            },
            TagVersion::Id3v24 => WriteOptions {
                legacy: false,
                version: Id3v2Version::Id3v24,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::id3::TagLike;
    use paste::paste;
    use std::fs;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Some bytes that stand in for MPEG audio frames.
    const FAKE_AUDIO: [u8; 16] = [
        0xff, 0xfb, 0x90, 0x64, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00,
    ];

    fn untagged_file() -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".mp3").tempfile().unwrap();
        for _ in 0..64 {
            file.write_all(&FAKE_AUDIO).unwrap();
        }
        file.flush().unwrap();
        file
    }

    /// An MP3 file whose ID3v2 header announces a frame that is larger than the tag.
    fn corrupt_file() -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".mp3").tempfile().unwrap();
        // ID3v2.3 header, tag size 2048 (syncsafe).
        file.write_all(b"ID3\x03\x00\x00\x00\x00\x10\x00").unwrap();
        // TIT2 frame claiming 4096 bytes of content.
        file.write_all(b"TIT2\x00\x00\x10\x00\x00\x00\x00garbage").unwrap();
        for _ in 0..64 {
            file.write_all(&FAKE_AUDIO).unwrap();
        }
        file.flush().unwrap();
        file
    }

    fn png_bytes() -> Vec<u8> {
        let mut data = PNG_SIGNATURE.to_vec();
        data.extend_from_slice(b"\x00\x00\x00\x0dIHDR fake image");
        data
    }

    fn full_tag_set() -> TagSet {
        TagSet {
            artist: "The Ahmad Jamal Trio".to_string(),
            album: "Ahmad Jamal at the Pershing: But Not for Me".to_string(),
            title: "Poinciana".to_string(),
            year: "1958".to_string(),
            track_number: "6".to_string(),
            genre: "Jazz".to_string(),
            cover_image: Some(CoverImage::new(png_bytes())),
        }
    }

    fn options(version: TagVersion) -> WriteOptions {
        WriteOptions::from(version)
    }

    fn has_id3v1_block(path: &Path) -> bool {
        let data = fs::read(path).unwrap();
        data.len() >= 128 && &data[data.len() - 128..data.len() - 125] == b"TAG"
    }

    macro_rules! add_test_write_and_read_field {
        ($field:expr, $value:expr, $version:expr, $fnsuffix:ident) => {
            paste! {
                #[test]
                fn [<test_write_and_read_ $fnsuffix>]() {
                    let file = untagged_file();
                    let mut tags = TagSet::default();
                    tags.set($field, $value);
                    tags.write_to_path(file.path(), options($version)).unwrap();

                    let read = TagSet::read_from_path(file.path()).unwrap();
                    assert_eq!(read.get($field), Some($value));
                    for other in TagField::ALL.into_iter().filter(|f| *f != $field) {
                        assert!(read.get(other).is_none());
                    }
                }
            }
        };
    }
    macro_rules! add_test_write_and_read_field_all_versions {
        ($field:expr, $value:expr, $fnsuffix:ident) => {
            paste! {
            add_test_write_and_read_field!($field, $value, TagVersion::Id3v1, [< $fnsuffix _id3v1>]);
            add_test_write_and_read_field!($field, $value, TagVersion::Id3v23, [< $fnsuffix _id3v23>]);
            add_test_write_and_read_field!($field, $value, TagVersion::Id3v24, [< $fnsuffix _id3v24>]);
            }
        };
    }

    add_test_write_and_read_field_all_versions!(TagField::Artist, "Miles Davis", artist);
    add_test_write_and_read_field_all_versions!(TagField::Album, "Kind of Blue", album);
    add_test_write_and_read_field_all_versions!(TagField::Title, "So What", title);
    add_test_write_and_read_field_all_versions!(TagField::Year, "1959", year);
    add_test_write_and_read_field_all_versions!(TagField::TrackNumber, "1/5", tracknumber);
    add_test_write_and_read_field_all_versions!(TagField::Genre, "Jazz", genre);

    #[test]
    fn test_round_trip_id3v24() {
        let file = untagged_file();
        let tags = full_tag_set();
        tags.write_to_path(file.path(), options(TagVersion::Id3v24))
            .unwrap();
        assert_eq!(TagSet::read_from_path(file.path()).unwrap(), tags);
    }

    #[test]
    fn test_round_trip_id3v23() {
        let file = untagged_file();
        let tags = full_tag_set();
        tags.write_to_path(file.path(), options(TagVersion::Id3v23))
            .unwrap();
        assert_eq!(TagSet::read_from_path(file.path()).unwrap(), tags);
    }

    #[test]
    fn test_round_trip_normalizes_year() {
        let file = untagged_file();
        let mut tags = full_tag_set();
        tags.year = "2003-05-12".to_string();
        tags.write_to_path(file.path(), options(TagVersion::Id3v24))
            .unwrap();

        let read = TagSet::read_from_path(file.path()).unwrap();
        assert_eq!(read.year, "2003");
        assert_eq!(read.artist, tags.artist);
    }

    #[test]
    fn test_write_is_full_replace() {
        let file = untagged_file();
        full_tag_set()
            .write_to_path(file.path(), options(TagVersion::Id3v23))
            .unwrap();

        let partial = TagSet {
            title: "Surrey with the Fringe on Top".to_string(),
            ..TagSet::default()
        };
        partial
            .write_to_path(file.path(), options(TagVersion::Id3v23))
            .unwrap();

        let read = TagSet::read_from_path(file.path()).unwrap();
        assert_eq!(read, partial);
        assert!(read.cover_image.is_none());
        assert!(read.get(TagField::Artist).is_none());
        assert!(read.get(TagField::Year).is_none());
    }

    #[test]
    fn test_switching_version_clears_old_year_frame() {
        let file = untagged_file();
        full_tag_set()
            .write_to_path(file.path(), options(TagVersion::Id3v24))
            .unwrap();
        let mut tags = full_tag_set();
        tags.year = "1961".to_string();
        tags.write_to_path(file.path(), options(TagVersion::Id3v23))
            .unwrap();

        assert_eq!(TagSet::read_from_path(file.path()).unwrap().year, "1961");
    }

    #[test]
    fn test_unmanaged_frames_survive() {
        let file = untagged_file();
        let mut tag = ::id3::Tag::new();
        tag.set_text("TCOM", "Nat Simon");
        tag.set_text("TIT2", "Old Title");
        tag.write_to_path(file.path(), ::id3::Version::Id3v24)
            .unwrap();

        full_tag_set()
            .write_to_path(file.path(), options(TagVersion::Id3v24))
            .unwrap();

        let tag = ::id3::Tag::read_from_path(file.path()).unwrap();
        assert_eq!(
            tag.get("TCOM")
                .and_then(|frame| frame.content().text()),
            Some("Nat Simon")
        );
        assert_eq!(
            tag.get("TIT2")
                .and_then(|frame| frame.content().text()),
            Some("Poinciana")
        );
    }

    #[test]
    fn test_cover_frame() {
        let file = untagged_file();
        full_tag_set()
            .write_to_path(file.path(), options(TagVersion::Id3v24))
            .unwrap();

        let tag = ::id3::Tag::read_from_path(file.path()).unwrap();
        let pictures: Vec<_> = tag.pictures().collect();
        assert_eq!(pictures.len(), 1);
        assert_eq!(pictures[0].mime_type, "image/png");
        assert_eq!(pictures[0].description, "Cover");
        assert_eq!(
            pictures[0].picture_type,
            ::id3::frame::PictureType::CoverFront
        );
    }

    #[test]
    fn test_read_untagged_file() {
        let file = untagged_file();
        let tags = TagSet::read_from_path(file.path()).unwrap();
        assert!(tags.is_empty());
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = TagSet::read_from_path(dir.path().join("missing.mp3"));
        assert!(matches!(result, Err(crate::Error::Read { .. })));
    }

    #[test]
    fn test_write_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = full_tag_set().write_to_path(
            dir.path().join("missing.mp3"),
            options(TagVersion::Id3v23),
        );
        assert!(matches!(result, Err(crate::Error::Write { .. })));
    }

    #[test]
    fn test_read_corrupt_tag() {
        let file = corrupt_file();
        let result = TagSet::read_from_path(file.path());
        assert!(matches!(result, Err(crate::Error::Read { .. })));
    }

    #[test]
    fn test_write_corrupt_tag() {
        let file = corrupt_file();
        let before = fs::read(file.path()).unwrap();
        let result = full_tag_set().write_to_path(file.path(), options(TagVersion::Id3v23));
        assert!(matches!(result, Err(crate::Error::Write { .. })));
        assert_eq!(fs::read(file.path()).unwrap(), before);
    }

    #[test]
    fn test_legacy_toggle() {
        let file = untagged_file();
        full_tag_set()
            .write_to_path(file.path(), options(TagVersion::Id3v1))
            .unwrap();
        assert!(has_id3v1_block(file.path()));
        let size_with_block = fs::metadata(file.path()).unwrap().len();

        // Writing again must replace the block instead of appending a second one.
        full_tag_set()
            .write_to_path(file.path(), options(TagVersion::Id3v1))
            .unwrap();
        assert_eq!(fs::metadata(file.path()).unwrap().len(), size_with_block);

        full_tag_set()
            .write_to_path(file.path(), options(TagVersion::Id3v23))
            .unwrap();
        assert!(!has_id3v1_block(file.path()));
    }

    #[test]
    fn test_read_falls_back_to_id3v1() {
        let file = untagged_file();
        let tags = TagSet {
            artist: "Bill Evans".to_string(),
            title: "Peace Piece".to_string(),
            year: "1959".to_string(),
            track_number: "7".to_string(),
            genre: "Jazz".to_string(),
            ..TagSet::default()
        };
        id3v1::write_to_path(file.path(), &tags).unwrap();

        assert_eq!(TagSet::read_from_path(file.path()).unwrap(), tags);
    }

    #[test]
    fn test_mime_type() {
        assert_eq!(CoverImage::new(png_bytes()).mime_type(), "image/png");
        assert_eq!(
            CoverImage::new(vec![0xff, 0xd8, 0xff, 0xe0]).mime_type(),
            "image/jpeg"
        );
        assert_eq!(CoverImage::new(b"\x89PNG".to_vec()).mime_type(), "image/jpeg");
        assert_eq!(CoverImage::new(vec![]).mime_type(), "image/jpeg");
    }

    #[test]
    fn test_tag_version_write_options() {
        assert_eq!(
            WriteOptions::from(TagVersion::Id3v1),
            WriteOptions {
                legacy: true,
                version: Id3v2Version::Id3v23
            }
        );
        assert_eq!(
            WriteOptions::from(TagVersion::Id3v24),
            WriteOptions {
                legacy: false,
                version: Id3v2Version::Id3v24
            }
        );
    }
}
