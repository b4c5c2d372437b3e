// Copyright (c) 2024 Jan Holthuis <jan.holthuis@rub.de>
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Filesystem-related utility functions.

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Lists the MP3 files directly inside `path`, sorted by name.
///
/// Subdirectories are not visited. Every other entry with an `.mp3` extension (in any case) is
/// returned, even if it cannot be opened.
pub fn list_mp3_files(path: &Path) -> io::Result<Vec<PathBuf>> {
    log::debug!("Listing MP3 files in {}", path.display());
    let mut files = vec![];
    for entry in fs::read_dir(path)? {
        let entry_path = entry?.path();
        if entry_path.is_dir() {
            continue;
        }

        let is_mp3 = entry_path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("mp3"));
        if is_mp3 {
            files.push(entry_path);
        }
    }

    files.sort_unstable();
    Ok(files)
}

/// Guess `(artist, title)` from a file name like `Artist - Title.mp3`.
///
/// If the stem has no `" - "` separator, the artist is empty and the whole stem is the title.
pub fn parse_filename(path: &Path) -> (String, String) {
    let stem = path
        .file_stem()
        .and_then(OsStr::to_str)
        .unwrap_or_default();
    match stem.split_once(" - ") {
        Some((artist, title)) => (artist.trim().to_string(), title.trim().to_string()),
        None => (String::new(), stem.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filename() {
        assert_eq!(
            parse_filename(Path::new("/music/Nina Simone - Feeling Good.mp3")),
            ("Nina Simone".to_string(), "Feeling Good".to_string())
        );
        assert_eq!(
            parse_filename(Path::new("Daft Punk - Get Lucky - Radio Edit.mp3")),
            ("Daft Punk".to_string(), "Get Lucky - Radio Edit".to_string())
        );
        assert_eq!(
            parse_filename(Path::new("Intro.mp3")),
            (String::new(), "Intro".to_string())
        );
        assert_eq!(
            parse_filename(Path::new("Artist-Title.mp3")),
            (String::new(), "Artist-Title".to_string())
        );
    }

    #[test]
    fn test_list_mp3_files() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.mp3", "a.MP3", "cover.jpg", "notes.txt", "c.mp3"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        fs::create_dir(dir.path().join("sub.mp3")).unwrap();
        fs::write(dir.path().join("sub.mp3").join("d.mp3"), b"").unwrap();

        let files = list_mp3_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|path| path.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, ["a.MP3", "b.mp3", "c.mp3"]);
    }

    #[test]
    fn test_list_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list_mp3_files(&dir.path().join("missing")).is_err());
    }
}
