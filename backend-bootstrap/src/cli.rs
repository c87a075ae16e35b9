use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "leakwatch")]
#[command(about = "Water leak risk scoring and dashboard", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Serve the dashboard and JSON API
    Serve,
    /// Score the reading table once and print it
    Score {
        /// Reading table to score instead of the configured one
        #[arg(short, long)]
        input: Option<PathBuf>,
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Csv)]
        format: OutputFormat,
        /// Skip the simulated live reading
        #[arg(long)]
        no_live: bool,
        /// Seed for the simulated live reading
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Write dashboard.html and scored.csv
    Report {
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
        /// Zone shown in the per-zone panels
        #[arg(short, long)]
        zone: Option<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_flags() {
        let cli = Cli::try_parse_from([
            "leakwatch", "--config", "conf.toml", "score", "--format", "json", "--no-live", "--seed", "4",
        ])
        .expect("parse");
        assert_eq!(cli.config.as_deref(), Some("conf.toml"));
        assert_eq!(
            cli.command,
            Command::Score {
                input: None,
                format: OutputFormat::Json,
                no_live: true,
                seed: Some(4),
            }
        );
    }

    #[test]
    fn report_defaults() {
        let cli = Cli::try_parse_from(["leakwatch", "report", "--zone", "Z2"]).expect("parse");
        assert_eq!(
            cli.command,
            Command::Report {
                out_dir: None,
                zone: Some("Z2".to_string()),
            }
        );
        assert!(Cli::try_parse_from(["leakwatch"]).is_err());
    }
}
