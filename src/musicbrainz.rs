// Copyright (c) 2024 Jan Holthuis <jan.holthuis@rub.de>
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! MusicBrainz and Cover Art Archive client.

use crate::lookup::{
    CoverArtLookup, LookupError, MetadataLookup, RecordingLookup, RecordingMatch,
};
use crate::tag::CoverImage;
use crate::util::leading_year;
use crate::Config;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Response of the recording search endpoint.
#[derive(Debug, Deserialize)]
struct RecordingSearchResponse {
    /// Matching recordings, best match first.
    #[serde(default)]
    recordings: Vec<Recording>,
}

/// A recording as returned by the search endpoint.
#[derive(Debug, Deserialize)]
struct Recording {
    /// Recording title.
    title: String,
    /// Credited artists.
    #[serde(default, rename = "artist-credit")]
    artist_credit: Vec<ArtistCredit>,
    /// Releases this recording appears on.
    #[serde(default)]
    releases: Vec<Release>,
}

/// A single artist credit.
#[derive(Debug, Deserialize)]
struct ArtistCredit {
    /// Credited name.
    name: String,
}

/// Response of the release search endpoint.
#[derive(Debug, Deserialize)]
struct ReleaseSearchResponse {
    /// Matching releases, best match first.
    #[serde(default)]
    releases: Vec<Release>,
}

/// A release as returned by the search endpoints.
#[derive(Debug, Deserialize)]
struct Release {
    /// MusicBrainz release ID.
    #[serde(default)]
    id: String,
    /// Release title.
    #[serde(default)]
    title: Option<String>,
    /// Release date (`YYYY`, `YYYY-MM` or `YYYY-MM-DD`).
    #[serde(default)]
    date: Option<String>,
}

impl RecordingSearchResponse {
    /// Take the best recording, using `artist` if the recording has no artist credit.
    fn into_lookup(self, artist: &str) -> RecordingLookup {
        let Some(recording) = self.recordings.into_iter().next() else {
            return RecordingLookup::NoMatch;
        };

        let artist = recording
            .artist_credit
            .into_iter()
            .next()
            .map_or_else(|| artist.to_string(), |credit| credit.name);
        let release = recording.releases.into_iter().next();
        let year = release
            .as_ref()
            .and_then(|release| release.date.as_deref())
            .and_then(leading_year)
            .map(ToString::to_string);

        RecordingLookup::Found(RecordingMatch {
            artist,
            title: recording.title,
            album: release.and_then(|release| release.title),
            year,
        })
    }
}

/// Quote a value as Lucene phrase.
fn phrase(value: &str) -> String {
    let escaped = value.replace('\\', r"\\").replace('"', r#"\""#);
    format!("\"{escaped}\"")
}

/// Configurable MusicBrainz API client.
#[derive(Debug)]
pub struct MusicBrainzClient {
    /// HTTP client with timeout and user agent preconfigured.
    client: reqwest::Client,
    /// MusicBrainz web service URL, without trailing slash.
    musicbrainz_url: String,
    /// Cover Art Archive URL, without trailing slash.
    cover_art_url: String,
}

impl MusicBrainzClient {
    /// Create a new MusicBrainz client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &Config) -> Result<Self, LookupError> {
        let client = reqwest::Client::builder()
            .user_agent(config.lookup.user_agent())
            .timeout(config.lookup.timeout())
            .build()?;
        Ok(Self {
            client,
            musicbrainz_url: config
                .lookup
                .musicbrainz_url()
                .trim_end_matches('/')
                .to_string(),
            cover_art_url: config
                .lookup
                .cover_art_url()
                .trim_end_matches('/')
                .to_string(),
        })
    }

    /// Run a search query against the given entity endpoint and decode the best result.
    async fn search<T: DeserializeOwned>(
        &self,
        entity: &str,
        query: &str,
    ) -> Result<T, LookupError> {
        let url = format!("{}/{entity}/", self.musicbrainz_url);
        log::debug!("Searching {entity} using query: {query}");
        let response = self
            .client
            .get(&url)
            .query(&[("query", query), ("fmt", "json"), ("limit", "1")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("Search for {entity} failed with status {status}");
            return Err(LookupError::UnexpectedStatus(status.as_u16()));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Download the front cover of a release.
    async fn fetch_front_cover(&self, release_id: &str) -> Result<CoverArtLookup, LookupError> {
        let url = format!("{}/release/{release_id}/front", self.cover_art_url);
        log::debug!("Fetching cover art from {url}");
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            log::info!("No cover art for release {release_id} (status {status})");
            return Ok(CoverArtLookup::NotFound);
        }

        let data = response.bytes().await?;
        log::debug!("Downloaded {} bytes of cover art", data.len());
        Ok(CoverArtLookup::Found(CoverImage::new(data.to_vec())))
    }
}

impl MetadataLookup for MusicBrainzClient {
    async fn find_recording(
        &self,
        artist: &str,
        title: &str,
    ) -> Result<RecordingLookup, LookupError> {
        let query = format!("artist:{} recording:{}", phrase(artist), phrase(title));
        let response: RecordingSearchResponse = self.search("recording", &query).await?;
        let lookup = response.into_lookup(artist);
        log::debug!("Recording search for {artist:?} - {title:?}: {lookup:?}");
        Ok(lookup)
    }

    async fn find_cover_art(
        &self,
        artist: &str,
        album: &str,
    ) -> Result<CoverArtLookup, LookupError> {
        let query = format!("release:{} artist:{}", phrase(album), phrase(artist));
        let response: ReleaseSearchResponse = self.search("release", &query).await?;
        let Some(release) = response.releases.into_iter().next() else {
            log::info!("No release found for {artist:?} - {album:?}");
            return Ok(CoverArtLookup::NotFound);
        };

        log::debug!("Best release match: {:?} ({})", release.title, release.id);
        self.fetch_front_cover(&release.id).await
    }
}
