//! Command-line interface for the well-depth log converter.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::ConverterConfig;
use crate::processors::converter::{self, ConversionSummary};

#[derive(Parser)]
#[command(name = "well-depth-log")]
#[command(about = "Decimate a well-depth sonar log into a date/epoch/meters CSV", version)]
#[command(after_help = "Example:\n  well-depth-log /mnt/logger/rp51_log5.csv ~/sonar/rp51_out.csv")]
pub struct Cli {
    /// Sonar log to read (space-separated: epoch, reading, depth, ...)
    input: PathBuf,

    /// CSV file to write (created or overwritten)
    output: PathBuf,

    /// Keep every Nth line (overrides the config file)
    #[arg(short, long)]
    rate: Option<usize>,

    /// Path to YAML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Create a spinner for indeterminate operations
fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Print a summary box
fn print_summary(title: &str, items: &[(&str, String)]) {
    let key_width = items.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    let value_width = items.iter().map(|(_, v)| v.chars().count()).max().unwrap_or(0);
    let inner = (key_width + value_width + 2).max(title.len());
    let rule = "═".repeat(inner + 2);

    println!();
    println!("╔{}╗", rule);
    println!("║ {:<inner$} ║", title);
    println!("╠{}╣", rule);
    for (key, value) in items {
        let line = format!("{:<key_width$}: {}", key, value);
        println!("║ {:<inner$} ║", line);
    }
    println!("╚{}╝", rule);
    println!();
}

fn load_config(path: Option<&Path>) -> ConverterConfig {
    match path {
        Some(path) => match ConverterConfig::from_yaml(path) {
            Ok(cfg) => {
                info!("Loaded config from: {}", path.display());
                cfg
            }
            Err(e) => {
                warn!("Failed to load config from {}: {}, using defaults", path.display(), e);
                ConverterConfig::default()
            }
        },
        None => ConverterConfig::default(),
    }
}

pub fn run() {
    // Wrong argument count prints usage and exits with status 2
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .format_timestamp_secs()
        .init();

    let mut config = load_config(cli.config.as_deref());
    if let Some(rate) = cli.rate {
        config.decimation_rate = rate;
    }

    if let Err(e) = cmd_convert(&cli.input, &cli.output, &config) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn cmd_convert(input: &Path, output: &Path, config: &ConverterConfig) -> Result<ConversionSummary> {
    let start = Instant::now();

    println!("Now reading {}", input.display());
    println!("Output to {}", output.display());
    println!("Decimation rate: {}", config.decimation_rate);

    let spinner = create_spinner("Converting sonar log...");
    let result = converter::convert_file(input, output, config)
        .with_context(|| format!("Conversion of {} failed", input.display()));
    spinner.finish_and_clear();
    let summary = result?;

    for failure in &summary.parse_failures {
        println!(
            "Error at {}: {} ({})",
            failure.line_number, failure.content, failure.reason
        );
    }

    print_summary(
        "Conversion Complete",
        &[
            ("Start", summary.first.clone().unwrap_or_default()),
            ("End", summary.last.clone().unwrap_or_default()),
            ("Total line count", summary.lines_read.to_string()),
            ("Rows written", summary.rows_written.to_string()),
            ("Parse errors", summary.parse_failures.len().to_string()),
            ("Duration", format!("{:.2?}", start.elapsed())),
        ],
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_two_positionals_required() {
        assert!(Cli::try_parse_from(["well-depth-log", "in.log"]).is_err());
        assert!(Cli::try_parse_from(["well-depth-log", "a", "b", "c"]).is_err());

        let cli = Cli::try_parse_from(["well-depth-log", "in.log", "out.csv"]).unwrap();
        assert_eq!(cli.input, PathBuf::from("in.log"));
        assert_eq!(cli.output, PathBuf::from("out.csv"));
        assert_eq!(cli.rate, None);
    }

    #[test]
    fn test_rate_flag() {
        let cli =
            Cli::try_parse_from(["well-depth-log", "-r", "5", "-vv", "in.log", "out.csv"]).unwrap();
        assert_eq!(cli.rate, Some(5));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_missing_config_falls_back_to_defaults() {
        let config = load_config(Some(Path::new("/nonexistent/converter.yaml")));
        assert_eq!(config, ConverterConfig::default());
    }
}
