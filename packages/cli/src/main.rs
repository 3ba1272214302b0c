#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line receiving tool for transfer manifests.
//!
//! Extracts the package list from a manifest PDF (or a text dump of one),
//! exports it as CSV or a printable worksheet, and records received
//! quantities into a variance report. Run without a subcommand for an
//! interactive menu.
//!
//! Uses `indicatif-log-bridge` (via [`dc_receiving_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and spinners never fight for the terminal.

mod commands;
mod interactive;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::ProfileArgs;

#[derive(Parser)]
#[command(name = "dc_receiving", about = "Transfer manifest receiving tool")]
struct Cli {
    /// Built-in extraction profile (see `profiles`)
    #[arg(long, global = true, default_value = "metrc_marker_scan")]
    profile: String,
    /// Extraction config TOML file (overrides --profile)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the header, package table, and extraction statistics
    Extract {
        /// Manifest PDF or text file
        file: PathBuf,
        /// Print a JSON dump instead of tables
        #[arg(long)]
        json: bool,
    },
    /// Write the package list CSV
    Csv {
        /// Manifest PDF or text file
        file: PathBuf,
        /// Output path (default: `manifest_<number>_packages.csv`)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Write the printable verification worksheet
    Worksheet {
        /// Manifest PDF or text file
        file: PathBuf,
        /// Output path (default: `manifest_<number>_worksheet.txt`)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Record received quantities and write the receiving report CSV
    Receive {
        /// Manifest PDF or text file
        file: PathBuf,
        /// CSV of `sequence,received` pairs. Prompts per package if omitted.
        #[arg(long)]
        received: Option<PathBuf>,
        /// Output path (default: `manifest_<number>_receiving_report.csv`)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// List built-in extraction profiles
    Profiles,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = dc_receiving_cli_utils::init_logger();
    let cli = Cli::parse();

    let profile = ProfileArgs {
        id: cli.profile,
        config: cli.config,
    };

    let Some(command) = cli.command else {
        return interactive::run(&multi, &profile);
    };

    match command {
        Commands::Extract { file, json } => commands::extract(&multi, &profile, &file, json)?,
        Commands::Csv { file, output } => {
            commands::csv(&multi, &profile, &file, output.as_deref())?;
        }
        Commands::Worksheet { file, output } => {
            commands::worksheet(&multi, &profile, &file, output.as_deref())?;
        }
        Commands::Receive {
            file,
            received,
            output,
        } => commands::receive(
            &multi,
            &profile,
            &file,
            received.as_deref(),
            output.as_deref(),
        )?,
        Commands::Profiles => commands::profiles(),
    }

    Ok(())
}
