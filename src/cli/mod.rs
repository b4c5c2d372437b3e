// Copyright (c) 2024 Jan Holthuis <jan.holthuis@rub.de>
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Command line interface.

mod config;
mod genres;
mod show;
mod tag;
mod ui;

use crate::Config;
use clap::{Parser, Subcommand};
use log::LevelFilter;
use simplelog::{ColorChoice, TermLogger, TerminalMode};
use std::path::PathBuf;

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the tags of an MP3 file.
    Show(show::Args),
    /// Edit the tags of an MP3 file, or of all MP3 files in a folder.
    Tag(tag::Args),
    /// Print the effective configuration.
    Config(config::Args),
    /// List genre names.
    Genres(genres::Args),
}

/// Command line Arguments.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
    /// Show debug information.
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Path to configuration file.
    #[arg(short, long, global = true, required = false)]
    config_path: Option<PathBuf>,
}

impl Args {
    /// Get the desired log level, depending on the verbose flag passed on the command line.
    fn log_level_filter(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }

    /// Get the current configuration.
    fn config(&self) -> crate::Result<Config> {
        match &self.config_path {
            Some(path) => Config::load_from_path(path).map(|config| config.with_defaults()),
            None => Ok(Config::default()),
        }
    }
}

/// Main entry point.
///
/// # Errors
///
/// Can returns errors if the command line arguments are incorrect or the executed programs lead to
/// an error.
pub async fn main() -> crate::Result<()> {
    let args = Args::parse();

    if let Err(err) = TermLogger::init(
        args.log_level_filter(),
        simplelog::Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ) {
        eprintln!("Failed to initialize logging: {err}");
    }

    let config = args.config()?;
    match args.command {
        Commands::Show(cmd_args) => show::run(cmd_args),
        Commands::Tag(cmd_args) => tag::run(&config, cmd_args).await,
        Commands::Config(cmd_args) => config::run(&config, cmd_args),
        Commands::Genres(cmd_args) => {
            genres::run(cmd_args);
            Ok(())
        }
    }
}
