// Copyright (c) 2025 Jan Holthuis <jan.holthuis@rub.de>
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Module for the `show` CLI subcommand.

use super::ui;
use crate::TagSet;
use clap::Parser;
use std::path::PathBuf;

/// Command line arguments for the `show` CLI command.
#[derive(Parser, Debug)]
pub struct Args {
    /// MP3 file to show.
    path: PathBuf,
}

/// Run the `show` command.
pub fn run(args: Args) -> crate::Result<()> {
    let tags = TagSet::read_from_path(&args.path)?;
    ui::print_tag_set(&args.path, &tags);

    Ok(())
}
