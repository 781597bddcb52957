//! Command-line configuration for the dashboard binary.

use crate::table::RowsPerPage;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

pub const DEFAULT_CSV: &str = "Electric_Vehicle_Population_Data.csv";

/// Terminal dashboard for the Electric Vehicle Population dataset
#[derive(Debug, Clone, Parser)]
#[command(name = "ev-dashboard", version)]
pub struct Args {
    /// CSV export to load
    #[arg(long = "csv", value_name = "PATH", default_value = DEFAULT_CSV)]
    pub csv_path: PathBuf,

    /// Rows shown per table page (10, 25 or 50)
    #[arg(long, value_name = "N", default_value_t = 10, value_parser = parse_rows_per_page)]
    pub rows_per_page: usize,

    /// Directory for exported summary files
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Load the dataset immediately instead of waiting for menu option 1
    #[arg(long)]
    pub load: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

fn parse_rows_per_page(s: &str) -> Result<usize, String> {
    let n: usize = s.parse().map_err(|_| format!("'{}' is not a number", s))?;
    RowsPerPage::try_from(n)
        .map(RowsPerPage::get)
        .map_err(|e| e.to_string())
}

impl Args {
    pub fn rows_per_page(&self) -> RowsPerPage {
        RowsPerPage::try_from(self.rows_per_page).unwrap_or_default()
    }

    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
