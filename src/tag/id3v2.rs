// Copyright (c) 2025 Jan Holthuis <jan.holthuis@rub.de>
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Support for ID3v2 tags.

use super::{CoverImage, Id3v2Version, TagError, TagField, TagSet};
use crate::util::parse_year;
use id3::{
    frame::{Picture, PictureType},
    TagLike,
};
use std::path::Path;

/// Description of the picture frame that holds the cover.
const COVER_DESCRIPTION: &str = "Cover";

/// ID3 tag (version 2).
#[derive(Debug)]
pub struct ID3v2Tag {
    /// The underlying tag data.
    data: id3::Tag,
}

impl Default for ID3v2Tag {
    fn default() -> Self {
        ID3v2Tag {
            data: id3::Tag::new(),
        }
    }
}

impl ID3v2Tag {
    #[cfg(test)]
    pub fn with_version(version: id3::Version) -> Self {
        ID3v2Tag {
            data: id3::Tag::with_version(version),
        }
    }

    /// Read the ID3 tag from the path.
    ///
    /// Returns `None` if the file has no ID3v2 header.
    pub fn read_from_path(path: impl AsRef<Path>) -> Result<Option<Self>, TagError> {
        match id3::Tag::read_from_path(path) {
            Ok(data) => Ok(Some(ID3v2Tag { data })),
            Err(err) if matches!(err.kind, id3::ErrorKind::NoTag) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Write the tag to the file at `path`, keeping the audio data and trailing blocks intact.
    pub fn write_to_path(
        &self,
        path: impl AsRef<Path>,
        version: Id3v2Version,
    ) -> Result<(), TagError> {
        self.data.write_to_path(path, version.into())?;
        Ok(())
    }

    /// The version of the tag as it was read.
    pub fn version(&self) -> id3::Version {
        self.data.version()
    }

    /// Frame IDs that may hold the value of a field, in the order they are looked up.
    fn frame_ids(field: TagField) -> &'static [&'static str] {
        match field {
            TagField::Artist => &["TPE1"],
            TagField::Album => &["TALB"],
            TagField::Title => &["TIT2"],
            TagField::Year => &["TDRC", "TYER"],
            TagField::TrackNumber => &["TRCK"],
            TagField::Genre => &["TCON"],
        }
    }

    /// Frame ID a field is written to.
    fn frame_id(field: TagField, version: Id3v2Version) -> &'static str {
        match (field, version) {
            (TagField::Year, Id3v2Version::Id3v23) => "TYER",
            (TagField::Year, Id3v2Version::Id3v24) => "TDRC",
            (field, _) => Self::frame_ids(field)[0],
        }
    }

    /// Get the content of a text frame as string.
    fn get_frames<'a>(&'a self, frame_id: &'a str) -> impl Iterator<Item = &'a str> {
        self.data
            .get(frame_id)
            .and_then(|frame| frame.content().text_values())
            .into_iter()
            .flatten()
    }

    /// Get the first value of a field.
    pub fn get(&self, field: TagField) -> Option<&str> {
        Self::frame_ids(field)
            .iter()
            .find_map(|id| self.get_frames(id).next())
    }

    /// Remove all frames of a field.
    pub fn clear(&mut self, field: TagField) {
        for id in Self::frame_ids(field) {
            let removed = self.data.remove(id);
            if !removed.is_empty() {
                log::trace!("Removed {} {id} frame(s)", removed.len());
            }
        }
    }

    /// Set the value of a field.
    pub fn set(&mut self, field: TagField, value: &str, version: Id3v2Version) {
        self.data.set_text(Self::frame_id(field, version), value);
    }

    /// The front cover, or the first picture if there is no front cover.
    pub fn cover(&self) -> Option<&Picture> {
        self.data
            .pictures()
            .find(|picture| picture.picture_type == PictureType::CoverFront)
            .or_else(|| self.data.pictures().next())
    }

    /// Replace all pictures with the given cover (or none).
    pub fn set_cover(&mut self, cover: Option<&CoverImage>) {
        self.data.remove_all_pictures();
        if let Some(cover) = cover {
            let _replaced = self.data.add_frame(Picture {
                mime_type: cover.mime_type().to_string(),
                picture_type: PictureType::CoverFront,
                description: COVER_DESCRIPTION.to_string(),
                data: cover.data().to_vec(),
            });
        }
    }

    /// Convert the managed fields into a [`TagSet`].
    pub fn to_tag_set(&self) -> TagSet {
        let mut tags = TagSet::default();
        for field in TagField::ALL {
            if let Some(value) = self.get(field) {
                let value = match field {
                    TagField::Year => parse_year(value),
                    _ => value,
                };
                tags.set(field, value);
            }
        }
        tags.cover_image = self
            .cover()
            .map(|picture| CoverImage::new(picture.data.clone()));
        tags
    }

    /// Clear all managed fields and assign the non-empty values from the [`TagSet`].
    pub fn assign_tag_set(&mut self, tags: &TagSet, version: Id3v2Version) {
        for field in TagField::ALL {
            self.clear(field);
            if let Some(value) = tags.get(field) {
                self.set(field, value, version);
            }
        }
        self.set_cover(tags.cover_image.as_ref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use id3::Version;
    use paste::paste;

    macro_rules! add_test_get_and_set_with_id3_version {
        ($field:expr, $version:expr, $fnsuffix:ident) => {
            paste! {
                #[test]
                fn [<test_get_and_set_ $fnsuffix>]() {
                    let mut tag = ID3v2Tag::with_version($version.into());
                    assert!(tag.get($field).is_none());

                    tag.set($field, "Example Value", $version);
                    assert_eq!(tag.get($field), Some("Example Value"));

                    tag.clear($field);
                    assert!(tag.get($field).is_none());
                }
            }
        };
    }
    macro_rules! add_test_get_and_set_all_id3_versions {
        ($field:expr, $fnsuffix:ident) => {
            paste! {
            add_test_get_and_set_with_id3_version!($field, Id3v2Version::Id3v23, [< $fnsuffix _id3v23>]);
            add_test_get_and_set_with_id3_version!($field, Id3v2Version::Id3v24, [< $fnsuffix _id3v24>]);
            }
        };
    }

    add_test_get_and_set_all_id3_versions!(TagField::Artist, artist);
    add_test_get_and_set_all_id3_versions!(TagField::Album, album);
    add_test_get_and_set_all_id3_versions!(TagField::Title, title);
    add_test_get_and_set_all_id3_versions!(TagField::Year, year);
    add_test_get_and_set_all_id3_versions!(TagField::TrackNumber, tracknumber);
    add_test_get_and_set_all_id3_versions!(TagField::Genre, genre);

    #[test]
    fn test_year_frame_depends_on_version() {
        let mut tag = ID3v2Tag::with_version(Version::Id3v23);
        tag.set(TagField::Year, "1958", Id3v2Version::Id3v23);
        assert!(tag.data.get("TYER").is_some());
        assert!(tag.data.get("TDRC").is_none());

        let mut tag = ID3v2Tag::with_version(Version::Id3v24);
        tag.set(TagField::Year, "1958", Id3v2Version::Id3v24);
        assert!(tag.data.get("TDRC").is_some());
        assert!(tag.data.get("TYER").is_none());
    }

    #[test]
    fn test_to_tag_set_keeps_leading_year() {
        let mut tag = ID3v2Tag::default();
        tag.set(TagField::Year, "2003-05-12", Id3v2Version::Id3v24);
        assert_eq!(tag.to_tag_set().year, "2003");

        tag.set(TagField::Year, "circa 2003", Id3v2Version::Id3v24);
        assert_eq!(tag.to_tag_set().year, "circa 2003");
    }

    #[test]
    fn test_assign_skips_empty_fields() {
        let mut tag = ID3v2Tag::default();
        tag.set(TagField::Genre, "Hard Bop", Id3v2Version::Id3v24);
        tag.set(TagField::Artist, "Art Blakey", Id3v2Version::Id3v24);

        let tags = TagSet {
            artist: "Lee Morgan".to_string(),
            ..TagSet::default()
        };
        tag.assign_tag_set(&tags, Id3v2Version::Id3v24);

        assert_eq!(tag.get(TagField::Artist), Some("Lee Morgan"));
        assert!(tag.get(TagField::Genre).is_none());
        assert!(tag.data.get("TCON").is_none());
    }

    #[test]
    fn test_cover_prefers_front_cover() {
        let mut tag = ID3v2Tag::default();
        let _ = tag.data.add_frame(Picture {
            mime_type: "image/jpeg".to_string(),
            picture_type: PictureType::CoverBack,
            description: "Back".to_string(),
            data: vec![1, 2, 3],
        });
        let _ = tag.data.add_frame(Picture {
            mime_type: "image/jpeg".to_string(),
            picture_type: PictureType::CoverFront,
            description: "Front".to_string(),
            data: vec![4, 5, 6],
        });
        assert_eq!(tag.cover().map(|p| p.data.as_slice()), Some(&[4, 5, 6][..]));

        tag.set_cover(None);
        assert!(tag.cover().is_none());
    }
}
