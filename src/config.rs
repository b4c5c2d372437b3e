// Copyright (c) 2025 Jan Holthuis <jan.holthuis@rub.de>
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Configuration utils.

use crate::tag::TagVersion;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Encountered when the configuration cannot be loaded or printed.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration markup is malformed.
    #[error("Configuration Error: {0}")]
    Parse(#[from] toml::de::Error),
    /// The configuration could not be serialized.
    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Default configuration TOML string.
const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

/// Fallback MusicBrainz web service URL.
const DEFAULT_MUSICBRAINZ_URL: &str = "https://musicbrainz.org/ws/2";

/// Fallback Cover Art Archive URL.
const DEFAULT_COVER_ART_URL: &str = "https://coverartarchive.org";

/// Fallback request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Fallback user agent.
const DEFAULT_USER_AGENT: &str = concat!("autotagger/", env!("CARGO_PKG_VERSION"));

/// Represents a piece of configuration that can be merged with another one.
trait MergeableConfig {
    /// Merge this configuration object with another one, taking values not set in this object from
    /// the other one (if present).
    fn merge(&self, other: &Self) -> Self;
}

/// Configuration for MusicBrainz and Cover Art Archive lookups.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct LookupConfig {
    /// Base URL of the MusicBrainz web service (without trailing slash).
    pub musicbrainz_url: Option<String>,
    /// Base URL of the Cover Art Archive.
    pub cover_art_url: Option<String>,
    /// Timeout for a single HTTP request, in seconds.
    pub timeout_secs: Option<u64>,
    /// User agent sent with every request.
    pub user_agent: Option<String>,
}

impl MergeableConfig for LookupConfig {
    fn merge(&self, other: &Self) -> Self {
        LookupConfig {
            musicbrainz_url: self
                .musicbrainz_url
                .clone()
                .or_else(|| other.musicbrainz_url.clone()),
            cover_art_url: self
                .cover_art_url
                .clone()
                .or_else(|| other.cover_art_url.clone()),
            timeout_secs: self.timeout_secs.or(other.timeout_secs),
            user_agent: self.user_agent.clone().or_else(|| other.user_agent.clone()),
        }
    }
}

impl LookupConfig {
    /// MusicBrainz web service URL.
    #[must_use]
    pub fn musicbrainz_url(&self) -> &str {
        self.musicbrainz_url
            .as_deref()
            .unwrap_or(DEFAULT_MUSICBRAINZ_URL)
    }

    /// Cover Art Archive URL.
    #[must_use]
    pub fn cover_art_url(&self) -> &str {
        self.cover_art_url.as_deref().unwrap_or(DEFAULT_COVER_ART_URL)
    }

    /// Timeout for a single request.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// User agent header value.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }
}

/// Configuration for writing tags.
#[derive(Debug, Default, Clone, Copy, Deserialize, Serialize)]
pub struct TaggingConfig {
    /// Tag version used when saving.
    pub id3_version: Option<TagVersion>,
}

impl MergeableConfig for TaggingConfig {
    fn merge(&self, other: &Self) -> Self {
        TaggingConfig {
            id3_version: self.id3_version.or(other.id3_version),
        }
    }
}

impl TaggingConfig {
    /// Tag version used when saving.
    #[must_use]
    pub fn id3_version(&self) -> TagVersion {
        self.id3_version.unwrap_or_default()
    }
}

/// The main configuration struct.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Configuration for lookups.
    #[serde(default)]
    pub lookup: LookupConfig,
    /// Configuration for writing tags.
    #[serde(default)]
    pub tagging: TaggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self::load_default().expect("Failed to load default config")
    }
}

impl MergeableConfig for Config {
    fn merge(&self, other: &Self) -> Self {
        Config {
            lookup: self.lookup.merge(&other.lookup),
            tagging: self.tagging.merge(&other.tagging),
        }
    }
}

impl Config {
    /// Load the configuration from a string slice.
    fn load_from_str(text: &str) -> Result<Self, ConfigError> {
        let config = toml::from_str(text)?;
        Ok(config)
    }

    /// Load the default configuration.
    fn load_default() -> Result<Self, ConfigError> {
        Self::load_from_str(DEFAULT_CONFIG)
    }

    /// Load the configuration from a file located at the given path.
    ///
    /// # Errors
    ///
    /// This method can fail if the file cannot be accessed or if it contains malformed
    /// configuration markup.
    pub fn load_from_path<T: AsRef<Path>>(path: T) -> crate::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::load_from_str(&text)?;
        Ok(config)
    }

    /// Merge this configuration struct with the default values.
    #[must_use]
    pub fn with_defaults(&self) -> Self {
        let default = Self::default();
        self.merge(&default)
    }

    /// Serialize the configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_complete() {
        let config = Config::load_default().unwrap();
        assert_eq!(
            config.lookup.musicbrainz_url.as_deref(),
            Some("https://musicbrainz.org/ws/2")
        );
        assert_eq!(
            config.lookup.cover_art_url.as_deref(),
            Some("https://coverartarchive.org")
        );
        assert_eq!(config.lookup.timeout(), Duration::from_secs(10));
        assert!(config.lookup.user_agent.is_some());
        assert_eq!(config.tagging.id3_version, Some(TagVersion::Id3v23));
    }

    #[test]
    fn test_merge_with_defaults() {
        let config = Config::load_from_str(
            r#"
            [lookup]
            timeout_secs = 3

            [tagging]
            id3_version = "v2.4"
            "#,
        )
        .unwrap()
        .with_defaults();
        assert_eq!(config.lookup.timeout(), Duration::from_secs(3));
        assert_eq!(config.lookup.musicbrainz_url(), "https://musicbrainz.org/ws/2");
        assert_eq!(config.tagging.id3_version(), TagVersion::Id3v24);
    }

    #[test]
    fn test_partial_config_without_sections() {
        let config = Config::load_from_str("").unwrap().with_defaults();
        assert_eq!(config.tagging.id3_version(), TagVersion::Id3v23);
        assert_eq!(config.lookup.cover_art_url(), "https://coverartarchive.org");
    }

    #[test]
    fn test_malformed_config() {
        assert!(matches!(
            Config::load_from_str("[tagging]\nid3_version = \"v9\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_roundtrip_through_toml() {
        let config = Config::default();
        let text = config.to_toml_string().unwrap();
        let reparsed = Config::load_from_str(&text).unwrap();
        assert_eq!(reparsed.lookup.user_agent(), config.lookup.user_agent());
        assert_eq!(reparsed.tagging.id3_version(), config.tagging.id3_version());
    }
}
