use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{ArgAction, Parser};

use crate::formatting::UnitSystem;
use crate::time_utils;

const AFTER_HELP: &str = "\
Examples:
  mesh-report -mdec --since=2025-08-01 meshcentral-events.db
      report activity on and after the 1st of August 2025
  mesh-report -mdec --since=12h meshcentral-events.db
      report activity since the previous midday

Use --help-plus to list the known asset/user aliases and the accepted
date/time formats.";

// ── Settings (CLI) ────────────────────────────────────────────────────────────

/// Per-user and per-asset data-volume reporting from a MeshCentral events.db
#[derive(Parser, Debug, Clone)]
#[command(
    name = "mesh-report",
    about = "Per-user and per-asset data-volume reporting from a MeshCentral events.db",
    version,
    after_help = AFTER_HELP
)]
pub struct Settings {
    /// Only count records strictly after this UTC date/time
    #[arg(short, long, value_name = "WHEN", value_parser = time_utils::parse_since)]
    pub since: Option<DateTime<Utc>>,

    /// Only count records up to and including this UTC date/time
    #[arg(short, long, value_name = "WHEN", value_parser = time_utils::parse_before)]
    pub before: Option<DateTime<Utc>>,

    /// Aggregation period in minutes (1, 2, 3, 4, 5, 6, 10, 15, 20, 30, 60,
    /// 120, 180, 240, 360, 720 or 1440)
    #[arg(
        short,
        long,
        value_name = "MINUTES",
        default_value_t = time_utils::DAY_MINUTES,
        value_parser = time_utils::parse_granularity
    )]
    pub granularity: u32,

    /// Only report this user (alias-resolved display name)
    #[arg(short, long)]
    pub user: Option<String>,

    /// Only report this asset (alias-resolved display name)
    #[arg(short, long)]
    pub asset: Option<String>,

    /// Measurement units
    #[arg(short, long, default_value = "none", value_parser = ["none", "dec", "IEC"])]
    pub measurement: String,

    /// Write the report to a file instead of the terminal
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Input file (hidden legacy spelling; positional FILES do the same)
    #[arg(short = 'f', long = "filename", value_name = "FILE", hide = true)]
    pub filename: Vec<PathBuf>,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'd', long, action = ArgAction::Count)]
    pub debug: u8,

    /// Alias file with nodeids/userids tables
    #[arg(long, value_name = "FILE")]
    pub aliases: Option<PathBuf>,

    /// Print the help plus the known aliases and time formats, then exit
    #[arg(long = "help-plus")]
    pub help_plus: bool,

    /// events.db files to analyse
    #[arg(value_name = "FILES")]
    pub files: Vec<PathBuf>,
}

impl Settings {
    /// The validated `--measurement` flag as a [`UnitSystem`].
    pub fn unit_system(&self) -> UnitSystem {
        UnitSystem::from_flag(&self.measurement).unwrap_or(UnitSystem::None)
    }

    /// Effective lower window bound (2000-01-01 when `--since` is absent).
    pub fn since_bound(&self) -> DateTime<Utc> {
        self.since.unwrap_or_else(time_utils::default_since)
    }

    /// Effective upper window bound (now when `--before` is absent).
    pub fn before_bound(&self) -> DateTime<Utc> {
        self.before.unwrap_or_else(Utc::now)
    }

    /// All requested input files: `-f` occurrences first, then positionals.
    ///
    /// Empty when neither was given; the caller substitutes the default
    /// events.db location in that case.
    pub fn input_files(&self) -> Vec<PathBuf> {
        self.filename
            .iter()
            .chain(self.files.iter())
            .cloned()
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
