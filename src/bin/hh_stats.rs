//! hh-stats - VPIP/PFR and opening ranges from Ignition hand histories
//!
//! Reads a single exported hand-history file or a directory of them and
//! reports hero's pre-flop statistics, range CSVs and a range chart.

use anyhow::Result;
use clap::{Parser, Subcommand};
use dialoguer::{Confirm, Input};
use ignition_range_toolkit::config::ParserConfig;
use ignition_range_toolkit::history::HandHistory;
use ignition_range_toolkit::pipeline::{
    self, format_summary, parse_input, write_chart_csv, write_chart_png, write_range_csvs,
    write_summary_log, AnalysisConfig,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "hh-stats")]
#[command(about = "Hero pre-flop statistics from Ignition hand histories")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print VPIP and PFR
    Summary {
        /// Hand-history file or directory of .txt exports (prompted if omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Also write the detailed summary log here
        #[arg(long)]
        log: Option<PathBuf>,

        /// TOML file overriding the format tokens
        #[arg(long, env = "HH_STATS_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Write raise.csv, call.csv and fold.csv with hero's hole cards
    ExportRanges {
        /// Hand-history file or directory of .txt exports (prompted if omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output directory
        #[arg(short, long)]
        output: PathBuf,

        /// TOML file overriding the format tokens
        #[arg(long, env = "HH_STATS_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Render the 13x13 opening chart as a PNG
    Chart {
        /// Hand-history file or directory of .txt exports (prompted if omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output PNG file
        #[arg(short, long)]
        output: PathBuf,

        /// Also write the tabulated chart as CSV
        #[arg(long)]
        csv: Option<PathBuf>,

        /// TOML file overriding the format tokens
        #[arg(long, env = "HH_STATS_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Run everything: summary, range CSVs, chart and log
    Analyze {
        /// Hand-history file or directory of .txt exports (prompted if omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output directory
        #[arg(short, long)]
        output: PathBuf,

        /// Detailed summary log
        #[arg(long)]
        log: Option<PathBuf>,

        /// Number of parsing threads (default: number of CPU cores)
        #[arg(short, long)]
        threads: Option<usize>,

        /// TOML file overriding the format tokens
        #[arg(long, env = "HH_STATS_CONFIG")]
        config: Option<PathBuf>,
    },
}

fn load_parser_config(path: Option<&Path>) -> Result<ParserConfig> {
    match path {
        Some(path) => ParserConfig::load_from(path),
        None => Ok(ParserConfig::default()),
    }
}

/// Use the given input path, or ask for one on the terminal
fn resolve_input(input: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = input {
        return Ok(path);
    }
    let path = Input::<String>::new()
        .with_prompt("Hand history file or directory")
        .interact_text()?;
    Ok(PathBuf::from(path.trim()))
}

/// In an interactive run, offer to write the detailed summary log
fn resolve_log(log: Option<PathBuf>, interactive: bool) -> Result<Option<PathBuf>> {
    if log.is_some() || !interactive {
        return Ok(log);
    }
    let wanted = Confirm::new()
        .with_prompt("Write the detailed summary log?")
        .default(false)
        .interact()?;
    if !wanted {
        return Ok(None);
    }
    let path = Input::<String>::new()
        .with_prompt("Summary log path")
        .default("hh_summary.txt".to_string())
        .interact_text()?;
    Ok(Some(PathBuf::from(path.trim())))
}

fn report_diagnostics(history: &HandHistory) {
    let diagnostics = history.diagnostics();
    if diagnostics.is_empty() {
        return;
    }
    eprintln!("{} unhandled lines:", diagnostics.len());
    for diagnostic in diagnostics {
        eprintln!("  {}", diagnostic);
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Summary { input, log, config } => {
            let interactive = input.is_none();
            let input = resolve_input(input)?;
            let log = resolve_log(log, interactive)?;
            let parser = load_parser_config(config.as_deref())?;
            let (history, stats) = parse_input(&input, &parser)?;
            report_diagnostics(&history);
            print!("{}", format_summary(&history, &stats)?);
            if let Some(log) = log {
                write_summary_log(&log, &history, &stats, &parser)?;
                println!("Summary log written to {}", log.display());
            }
        }
        Commands::ExportRanges {
            input,
            output,
            config,
        } => {
            let input = resolve_input(input)?;
            let parser = load_parser_config(config.as_deref())?;
            let (history, stats) = parse_input(&input, &parser)?;
            report_diagnostics(&history);
            for path in write_range_csvs(&stats, &output)? {
                println!("Wrote {}", path.display());
            }
        }
        Commands::Chart {
            input,
            output,
            csv,
            config,
        } => {
            let input = resolve_input(input)?;
            let parser = load_parser_config(config.as_deref())?;
            let (history, stats) = parse_input(&input, &parser)?;
            report_diagnostics(&history);
            let chart = stats.range_chart();
            write_chart_png(&chart, &output)?;
            println!("Chart written to {} ({} hands)", output.display(), chart.dealt());
            if let Some(csv) = csv {
                write_chart_csv(&chart, &csv)?;
                println!("Chart table written to {}", csv.display());
            }
        }
        Commands::Analyze {
            input,
            output,
            log,
            threads,
            config,
        } => {
            let interactive = input.is_none();
            let input = resolve_input(input)?;
            let log_file = resolve_log(log, interactive)?;
            let report = pipeline::run_analysis(&AnalysisConfig {
                input,
                output_dir: Some(output),
                log_file,
                parser_config: config,
                threads,
            })?;
            report_diagnostics(&report.history);
            print!("{}", report.summary);
            for path in &report.outputs {
                println!("Wrote {}", path.display());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_is_optional() {
        let cli = Cli::try_parse_from(["hh-stats", "summary"]).unwrap();
        assert!(matches!(cli.command, Commands::Summary { input: None, .. }));

        let args = ["hh-stats", "chart", "-i", "hands", "-o", "open.png"];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::Chart { input, output, .. } => {
                assert_eq!(input, Some(PathBuf::from("hands")));
                assert_eq!(output, PathBuf::from("open.png"));
            }
            _ => panic!("expected chart command"),
        }
    }

    #[test]
    fn test_given_paths_skip_prompts() {
        let input = resolve_input(Some(PathBuf::from("hands"))).unwrap();
        assert_eq!(input, PathBuf::from("hands"));

        let log = Some(PathBuf::from("summary.txt"));
        assert_eq!(resolve_log(log.clone(), true).unwrap(), log);
        assert_eq!(resolve_log(None, false).unwrap(), None);
    }
}
