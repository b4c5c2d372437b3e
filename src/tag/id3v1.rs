// Copyright (c) 2025 Jan Holthuis <jan.holthuis@rub.de>
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Support for ID3v1.1 tags.
//!
//! The block is read and stripped through [`id3::v1`] and written through [`lofty`]'s
//! [`Id3v1Tag`], which also owns the genre table.

use super::{TagError, TagSet};
use lofty::id3::v1::Id3v1Tag;
use lofty::tag::TagExt;
use std::fs;
use std::path::Path;

pub use lofty::id3::v1::GENRES;

/// Size of the tag block in bytes.
const TAG_SIZE: u64 = 128;

/// Length of the title, artist and album fields.
const TEXT_LEN: usize = 30;

/// Length of the year field.
const YEAR_LEN: usize = 4;

/// Read the ID3v1 tag of the file at `path`, if there is one.
pub fn read_from_path(path: impl AsRef<Path>) -> Result<Option<TagSet>, TagError> {
    let path = path.as_ref();
    if fs::metadata(path)?.len() < TAG_SIZE {
        return Ok(None);
    }

    let tag = match ::id3::v1::Tag::read_from_path(path) {
        Ok(tag) => tag,
        Err(err) if matches!(err.kind, ::id3::ErrorKind::NoTag) => return Ok(None),
        Err(err) => return Err(err.into()),
    };

    Ok(Some(TagSet {
        artist: tag.artist.trim().to_string(),
        album: tag.album.trim().to_string(),
        title: tag.title.trim().to_string(),
        year: tag.year.trim().to_string(),
        track_number: tag.track.map(|n| n.to_string()).unwrap_or_default(),
        genre: tag.genre().map(ToString::to_string).unwrap_or_default(),
        cover_image: None,
    }))
}

/// Write the managed fields of `tags` as an ID3v1 block, replacing an existing one.
///
/// Values that do not fit are truncated. A [`TagSet`] without any ID3v1 field strips the block.
pub fn write_to_path(path: impl AsRef<Path>, tags: &TagSet) -> Result<(), TagError> {
    let mut tag = Id3v1Tag::new();
    tag.title = fit(&tags.title, TEXT_LEN);
    tag.artist = fit(&tags.artist, TEXT_LEN);
    tag.album = fit(&tags.album, TEXT_LEN);
    tag.year = fit(&tags.year, YEAR_LEN);
    tag.track_number = parse_track_number(&tags.track_number);
    tag.genre = genre_index(&tags.genre);

    tag.save_to_path(path, lofty::config::WriteOptions::default())?;
    Ok(())
}

/// Strip the ID3v1 tag from the end of the file. Returns `true` if a tag was removed.
pub fn remove_from_path(path: impl AsRef<Path>) -> Result<bool, TagError> {
    Ok(::id3::v1::Tag::remove_from_path(path)?)
}

/// Prepare a text value for a fixed-size field.
///
/// Characters outside of ISO-8859-1 become `?`, and the value is cut to `len` bytes.
fn fit(value: &str, len: usize) -> Option<String> {
    let mut text = String::new();
    for c in value
        .trim()
        .chars()
        .map(|c| if u32::from(c) <= 0xff { c } else { '?' })
    {
        if text.len() + c.len_utf8() > len {
            break;
        }
        text.push(c);
    }
    (!text.is_empty()).then_some(text)
}

/// The leading number of a track number like `3/12`.
fn parse_track_number(value: &str) -> Option<u8> {
    value
        .split('/')
        .next()
        .and_then(|number| number.trim().parse::<u8>().ok())
        .filter(|number| *number != 0)
}

/// Case-insensitive lookup of the genre index.
fn genre_index(genre: &str) -> Option<u8> {
    let genre = genre.trim();
    GENRES
        .iter()
        .position(|name| name.eq_ignore_ascii_case(genre))
        .and_then(|index| u8::try_from(index).ok())
}
