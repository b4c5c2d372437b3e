// Copyright (c) 2025 Jan Holthuis <jan.holthuis@rub.de>
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Module for the `genres` CLI subcommand.

use crate::tag::{GENRE_SUGGESTIONS, ID3V1_GENRES};
use clap::Parser;
use crossterm::style::Stylize;

/// Command line arguments for the `genres` CLI command.
#[derive(Parser, Debug)]
pub struct Args {
    /// List the full ID3v1 genre table with its indices instead of the suggestions.
    #[arg(short, long)]
    all: bool,
}

/// Run the `genres` command.
pub fn run(args: Args) {
    if args.all {
        for (index, genre) in ID3V1_GENRES.iter().enumerate() {
            println!("{} {genre}", format!("{index:>3}").grey());
        }
    } else {
        for genre in GENRE_SUGGESTIONS {
            println!("{genre}");
        }
    }
}
