//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::render::OutputFormat;
use crate::service::FetchParams;

/// seismic - Recent earthquakes from public catalogs
#[derive(Debug, Parser)]
#[command(name = "seismic")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "SEISMIC_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v', global = true)]
    pub debug: bool,

    // --- Query flags ---
    /// Catalog provider identifier
    #[arg(long)]
    pub provider: Option<String>,

    /// Start date, YYYY-MM-DD (default: 30 days ago)
    #[arg(long)]
    pub starttime: Option<String>,

    /// End date, YYYY-MM-DD (default: today)
    #[arg(long)]
    pub endtime: Option<String>,

    /// Minimum magnitude
    #[arg(long, allow_hyphen_values = true)]
    pub minmagnitude: Option<String>,

    /// Maximum number of events (clamped to 1..=500)
    #[arg(long, allow_hyphen_values = true)]
    pub limit: Option<String>,

    /// Sort order: time, time-asc, magnitude, magnitude-asc
    #[arg(long)]
    pub orderby: Option<String>,

    // --- Output format flags ---
    /// Output the full result as JSON
    #[arg(long, group = "output_format")]
    pub json: bool,

    /// Output the events table only
    #[arg(long, group = "output_format")]
    pub table: bool,

    /// Output the summary only
    #[arg(long, group = "output_format")]
    pub summary: bool,

    /// Output magnitude mix, top locations, daily trend and tsunami flags
    #[arg(long, group = "output_format")]
    pub insights: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Returns the output format based on CLI flags.
    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else if self.table {
            OutputFormat::Table
        } else if self.summary {
            OutputFormat::Summary
        } else if self.insights {
            OutputFormat::Insights
        } else {
            OutputFormat::Report
        }
    }

    /// Returns the query flags as raw fetch parameters.
    pub fn fetch_params(&self) -> FetchParams {
        FetchParams {
            provider: self.provider.clone(),
            starttime: self.starttime.clone(),
            endtime: self.endtime.clone(),
            minmagnitude: self.minmagnitude.clone(),
            limit: self.limit.clone(),
            orderby: self.orderby.clone(),
        }
    }
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List supported providers
    Providers,

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Dump,

    /// Check the configuration for invalid values
    Validate,

    /// Show the configuration file path
    Path,
}
