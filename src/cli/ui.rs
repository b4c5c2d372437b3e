// Copyright (c) 2024 Jan Holthuis <jan.holthuis@rub.de>
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! User Interface (UI) utilities.

use crate::session::{CoverArtOutcome, FetchOutcome, SaveSummary};
use crate::tag::{TagField, TagSet};
use crossterm::style::Stylize;
use inquire::{Confirm, InquireError};
use std::path::Path;

/// Width of the field label column.
const LABEL_WIDTH: usize = 12;

/// Format the size of the cover image in a human-readable way.
fn format_size(len: usize) -> String {
    if len >= 1024 {
        format!("{} KiB", len / 1024)
    } else {
        format!("{len} bytes")
    }
}

/// Print all fields of a [`TagSet`], headed by the file or folder it belongs to.
pub fn print_tag_set(path: &Path, tags: &TagSet) {
    println!("{}", path.display().to_string().bold());
    for field in TagField::ALL {
        let label = format!("{:>LABEL_WIDTH$}", field.label());
        match tags.get(field) {
            Some(value) => println!("{}  {value}", label.grey()),
            None => println!("{}  {}", label.grey(), "[empty]".dark_grey()),
        }
    }

    let label = format!("{:>LABEL_WIDTH$}", "Cover");
    match &tags.cover_image {
        Some(cover) => println!(
            "{}  {} ({})",
            label.grey(),
            cover.mime_type(),
            format_size(cover.data().len())
        ),
        None => println!("{}  {}", label.grey(), "[none]".dark_grey()),
    }
}

/// Report the result of a track info lookup.
pub fn print_fetch_outcome(outcome: FetchOutcome) {
    match outcome {
        FetchOutcome::Updated => println!("{} Track info updated from MusicBrainz", "✓".green()),
        FetchOutcome::NoMatch => println!("{} No matching recording found", "i".blue()),
        FetchOutcome::NotApplicable => {
            println!("{} Track info lookup only works for single files", "i".blue());
        }
    }
}

/// Report the result of a cover art lookup.
pub fn print_cover_art_outcome(outcome: CoverArtOutcome) {
    match outcome {
        CoverArtOutcome::Fetched => println!("{} Cover art downloaded", "✓".green()),
        CoverArtOutcome::NotFound => println!("{} No cover art found", "i".blue()),
        CoverArtOutcome::NotApplicable => {
            println!("{} Cover art lookup only works for single files", "i".blue());
        }
    }
}

/// Report a lookup error without aborting.
pub fn print_lookup_error(err: &crate::Error) {
    println!("{} {err}", "✗".red());
}

/// Print how many files were saved and which ones failed.
pub fn print_save_summary(summary: &SaveSummary) {
    let saved = summary.succeeded.len();
    let failed = summary.failed.len();
    if failed == 0 {
        println!("{} Saved {saved} file(s)", "✓".green());
        return;
    }

    println!(
        "{} Saved {saved} file(s), {} failed:",
        "!".yellow(),
        failed.to_string().red().bold()
    );
    for err in &summary.failed {
        println!("  {} {err}", "✗".red());
    }
}

/// Ask before overwriting the tags of every MP3 file in a folder.
pub fn confirm_batch(dir: &Path) -> Result<bool, InquireError> {
    Confirm::new(&format!(
        "Overwrite the tags of all MP3 files in {}?",
        dir.display()
    ))
    .with_default(false)
    .with_help_message("Fields left empty are removed from every file.")
    .prompt()
}
