// Copyright (c) 2024 Jan Holthuis <jan.holthuis@rub.de>
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Looking up track metadata and cover art.

use crate::tag::{CoverImage, TagSet};
use thiserror::Error;

/// Encountered when a lookup request could not be completed.
#[derive(Error, Debug)]
pub enum LookupError {
    /// The service did not answer in time.
    #[error("Request timed out")]
    Timeout,
    /// Connection or protocol failure.
    #[error("Request failed: {0}")]
    Transport(#[source] reqwest::Error),
    /// The search endpoint answered with a non-success status.
    #[error("Unexpected HTTP status {0}")]
    UnexpectedStatus(u16),
    /// The response body could not be decoded.
    #[error("Malformed response: {0}")]
    MalformedResponse(#[from] serde_json::Error),
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LookupError::Timeout
        } else {
            LookupError::Transport(err)
        }
    }
}

/// The best recording found for an artist and title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingMatch {
    /// Credited artist name.
    pub artist: String,
    /// Recording title.
    pub title: String,
    /// Title of the first release the recording appears on.
    pub album: Option<String>,
    /// Year of that release.
    pub year: Option<String>,
}

impl RecordingMatch {
    /// Copy the matched values into the [`TagSet`].
    ///
    /// Artist and title are always replaced, album and year only if the match has them. All
    /// other fields stay untouched.
    pub fn apply_to(&self, tags: &mut TagSet) {
        tags.artist.clone_from(&self.artist);
        tags.title.clone_from(&self.title);
        if let Some(album) = &self.album {
            tags.album.clone_from(album);
        }
        if let Some(year) = &self.year {
            tags.year.clone_from(year);
        }
    }
}

/// Result of a recording search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordingLookup {
    /// A recording was found.
    Found(RecordingMatch),
    /// The search returned no recordings.
    NoMatch,
}

/// Result of a cover art search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverArtLookup {
    /// The front cover of the best matching release.
    Found(CoverImage),
    /// No release was found, or the release has no front cover.
    NotFound,
}

/// A source of track metadata and cover art.
#[allow(async_fn_in_trait)]
pub trait MetadataLookup {
    /// Find the best recording for `artist` and `title`.
    async fn find_recording(
        &self,
        artist: &str,
        title: &str,
    ) -> Result<RecordingLookup, LookupError>;

    /// Find the front cover of the best release for `artist` and `album`.
    async fn find_cover_art(&self, artist: &str, album: &str)
        -> Result<CoverArtLookup, LookupError>;
}
