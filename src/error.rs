// Copyright (c) 2025 Jan Holthuis <jan.holthuis@rub.de>
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Error and result types.

use crate::lookup::LookupError;
use crate::tag::TagError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error.
    #[error("Configuration Error ({0})")]
    Config(#[from] crate::config::ConfigError),
    /// I/O Error.
    #[error("Input/Output error ({:?})", .0)]
    Io(#[from] io::Error),
    /// The tags of a file could not be read.
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        /// Path of the affected file.
        path: PathBuf,
        /// Underlying cause.
        source: TagError,
    },
    /// The tags of a file could not be written.
    #[error("Failed to save {}: {source}", .path.display())]
    Write {
        /// Path of the affected file.
        path: PathBuf,
        /// Underlying cause.
        source: TagError,
    },
    /// A MusicBrainz or Cover Art Archive request failed.
    #[error("Lookup failed: {0}")]
    Lookup(#[from] LookupError),
    /// The action needs a loaded file or folder.
    #[error("Load a file or folder first")]
    NoTarget,
    /// The action needs fields that are empty.
    #[error("{0}")]
    MissingInput(&'static str),
    /// The selected folder does not contain any MP3 files.
    #[error("No MP3 files found in {}", .0.display())]
    NoMp3Files(PathBuf),
    /// Some files of a folder could not be saved.
    #[error("{failed} of {total} files could not be saved")]
    PartialSave {
        /// Number of files that failed.
        failed: usize,
        /// Number of files in the folder.
        total: usize,
    },
    /// An error from the user interface.
    #[error("Error encountered while showing UI: {0}")]
    InquireError(#[from] inquire::InquireError),
}

/// Convenience type.
pub type Result<T> = std::result::Result<T, Error>;
