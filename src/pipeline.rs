//! Pipeline functions for programmatic use by the CLI.
//!
//! These wrap the parser with the file handling around it: gathering the
//! client's export files, writing range CSVs and the chart image, and
//! producing the human-readable summary.

use crate::chart::RangeChart;
use crate::config::ParserConfig;
use crate::history::HandHistory;
use crate::round::FirstAction;
use crate::stats::PreflopStats;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt::Write;
use std::path::{Path, PathBuf};

// ============================================================================
// Input
// ============================================================================

/// Concatenate every `*.txt` file in a directory, in file-name order.
pub fn consolidate_directory(dir: &Path) -> Result<String> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read input directory: {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "txt"))
        .collect();
    files.sort();

    let mut combined = String::new();
    for path in &files {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read hand history: {}", path.display()))?;
        combined.push_str(&content);
    }

    log::info!("Read {} hand history files from {}", files.len(), dir.display());
    Ok(combined)
}

/// Read a single export file, or consolidate a directory of them.
pub fn load_input(path: &Path) -> Result<String> {
    if path.is_dir() {
        consolidate_directory(path)
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read hand history: {}", path.display()))
    }
}

/// Load, parse and aggregate in one step.
pub fn parse_input(path: &Path, parser: &ParserConfig) -> Result<(HandHistory, PreflopStats)> {
    let input = load_input(path)?;
    let history = HandHistory::parse_with(&input, parser)
        .with_context(|| format!("Failed to parse hand history: {}", path.display()))?;
    let stats = PreflopStats::from_history(&history).context("Failed to aggregate statistics")?;
    Ok((history, stats))
}

// ============================================================================
// Range Export
// ============================================================================

#[derive(Serialize)]
struct RangeRow {
    card1: String,
    card2: String,
}

#[derive(Serialize)]
struct ChartRow {
    cards: String,
    raise: u32,
    call: u32,
    fold: u32,
    raise_wgt: f64,
    n: u32,
}

/// Write one CSV per first-action bucket (`raise.csv`, `call.csv`,
/// `fold.csv`) with hero's two cards per row. Returns the paths written.
pub fn write_range_csvs(stats: &PreflopStats, dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

    let mut written = Vec::new();
    for action in [FirstAction::Raise, FirstAction::Call, FirstAction::Fold] {
        let path = dir.join(format!("{}.csv", action.name().to_lowercase()));
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        // Header is emitted even for an empty bucket
        writer.write_record(["card1", "card2"])?;
        for pair in stats.bucket(action) {
            writer.serialize(RangeRow {
                card1: pair.high().to_string(),
                card2: pair.low().to_string(),
            })?;
        }
        writer.flush()?;
        written.push(path);
    }
    Ok(written)
}

/// Write the tabulated chart: one row per starting hand seen.
pub fn write_chart_csv(chart: &RangeChart, path: &Path) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    writer.write_record(["cards", "raise", "call", "fold", "raise_wgt", "n"])?;
    for (hand, cell) in chart.entries() {
        let raise_wgt = cell.raise_frequency().unwrap_or(0.0);
        writer.serialize(ChartRow {
            cards: hand.to_string(),
            raise: cell.raise,
            call: cell.call,
            fold: cell.fold,
            raise_wgt: (raise_wgt * 10_000.0).round() / 10_000.0,
            n: cell.total(),
        })?;
    }
    writer.flush()?;
    Ok(())
}

/// Render the chart heat map to a PNG file.
pub fn write_chart_png(chart: &RangeChart, path: &Path) -> Result<()> {
    let png = chart.render_png(CHART_CELL_PX).context("Failed to encode chart")?;
    std::fs::write(path, png).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

const CHART_CELL_PX: u32 = 48;

// ============================================================================
// Summary
// ============================================================================

/// VPIP/PFR lines, e.g. `VPIP = 0.2941  (5/17 over 12 hands)`.
pub fn format_summary(history: &HandHistory, stats: &PreflopStats) -> Result<String> {
    let mut out = String::new();
    out.push_str("SUMMARY\n========\n");
    writeln!(
        out,
        "VPIP = {}  ({}/{} over {} hands)",
        format_rate(stats.vpip()),
        stats.calls_raises,
        stats.actions,
        stats.hands
    )?;
    writeln!(
        out,
        "PFR  = {}  ({}/{} over {} hands)",
        format_rate(stats.pfr()),
        stats.raises,
        stats.actions,
        stats.hands
    )?;

    let times = history.hands().iter().filter_map(|h| h.played_at);
    if let (Some(first), Some(last)) = (times.clone().min(), times.max()) {
        writeln!(
            out,
            "Hands played {} to {}",
            first.format("%Y-%m-%d %H:%M"),
            last.format("%Y-%m-%d %H:%M")
        )?;
    }
    if history.duplicates() > 0 {
        writeln!(out, "Duplicate hands ignored: {}", history.duplicates())?;
    }
    if !history.diagnostics().is_empty() {
        writeln!(out, "Unhandled lines: {}", history.diagnostics().len())?;
    }
    Ok(out)
}

fn format_rate(rate: Option<f64>) -> String {
    match rate {
        Some(r) => format!("{:.4}", r),
        None => "n/a".to_string(),
    }
}

/// Hero's cards and pre-flop action lines for every hand.
pub fn hero_report(history: &HandHistory, parser: &ParserConfig) -> Result<String> {
    let mut out = String::new();
    for hand in history.hands() {
        let Some(preflop) = hand.preflop.as_ref() else {
            continue;
        };
        let cards = match preflop.hole_cards.hero() {
            Some(cards) => cards.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(" "),
            None => "--".to_string(),
        };
        writeln!(out, "[{}] (#{})", cards, hand.id)?;
        for action in preflop.hero_actions() {
            writeln!(out, "{}", action.line(&parser.action_separator))?;
        }
        out.push('\n');
    }
    Ok(out)
}

/// Write the detailed summary log: hero report, buckets, chart and rates.
pub fn write_summary_log(
    path: &Path,
    history: &HandHistory,
    stats: &PreflopStats,
    parser: &ParserConfig,
) -> Result<()> {
    let mut out = String::new();
    let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    writeln!(out, "Generated {}\n", now)?;

    out.push_str(&hero_report(history, parser)?);

    for (action, hands) in stats.buckets() {
        writeln!(out, "{}: {} hands", action, hands.len())?;
        let labels: Vec<String> = hands.iter().map(|p| p.to_string()).collect();
        writeln!(out, "  {}", labels.join(", "))?;
    }
    out.push('\n');

    writeln!(out, "{}", stats.range_chart())?;
    out.push_str(&format_summary(history, stats)?);

    if !history.diagnostics().is_empty() {
        out.push_str("\nUnhandled lines\n===============\n");
        for diagnostic in history.diagnostics() {
            writeln!(out, "{}", diagnostic)?;
        }
    }

    std::fs::write(path, out)
        .with_context(|| format!("Failed to write summary log: {}", path.display()))?;
    Ok(())
}

// ============================================================================
// Full Analysis
// ============================================================================

/// Configuration for a full analysis run.
#[derive(Debug, Clone, Default)]
pub struct AnalysisConfig {
    /// Export file or directory of export files
    pub input: PathBuf,
    /// Directory for range CSVs and the chart; nothing written if `None`
    pub output_dir: Option<PathBuf>,
    /// Detailed summary log path
    pub log_file: Option<PathBuf>,
    /// TOML file overriding the format tokens
    pub parser_config: Option<PathBuf>,
    /// Number of parsing threads (default: number of CPU cores)
    pub threads: Option<usize>,
}

/// Outcome of a full analysis run.
pub struct AnalysisReport {
    pub history: HandHistory,
    pub stats: PreflopStats,
    /// Formatted VPIP/PFR summary
    pub summary: String,
    /// Files written
    pub outputs: Vec<PathBuf>,
}

/// Consolidate, parse, aggregate and write every requested output.
pub fn run_analysis(config: &AnalysisConfig) -> Result<AnalysisReport> {
    if let Some(n) = config.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let parser = match &config.parser_config {
        Some(path) => ParserConfig::load_from(path)?,
        None => ParserConfig::default(),
    };

    let (history, stats) = parse_input(&config.input, &parser)?;
    let summary = format_summary(&history, &stats)?;
    log::info!("Parsed {} hands ({} duplicates dropped)", history.len(), history.duplicates());
    log::debug!("Hero report:\n{}", hero_report(&history, &parser)?);
    for (action, hands) in stats.buckets() {
        log::debug!("{}: {} hands", action, hands.len());
    }
    for line in summary.lines().filter(|l| l.starts_with("VPIP") || l.starts_with("PFR")) {
        log::info!("{}", line);
    }

    let mut outputs = Vec::new();
    if let Some(dir) = &config.output_dir {
        outputs.extend(write_range_csvs(&stats, dir)?);

        let chart = stats.range_chart();
        let chart_csv = dir.join("open_pre.csv");
        write_chart_csv(&chart, &chart_csv)?;
        outputs.push(chart_csv);

        let chart_png = dir.join("open_pre.png");
        write_chart_png(&chart, &chart_png)?;
        outputs.push(chart_png);
    }

    if let Some(log_file) = &config.log_file {
        write_summary_log(log_file, &history, &stats, &parser)?;
        outputs.push(log_file.clone());
    }

    Ok(AnalysisReport {
        history,
        stats,
        summary,
        outputs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HAND: &str = "Ignition Hand #100 TBL#7 HOLDEM No Limit - 2020-02-03 04:05:06
Seat 1: UTG [ME] ($10 in chips)
*** HOLE CARDS ***
UTG [ME] : Card dealt to a spot [Ts 9s]
UTG [ME] : Raises $0.15 to $0.15
*** SUMMARY ***
Total Pot($0.22)

";

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(Some(0.5)), "0.5000");
        assert_eq!(format_rate(None), "n/a");
    }

    #[test]
    fn test_consolidate_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.txt"), "second").unwrap();
        std::fs::write(dir.path().join("a.txt"), "first ").unwrap();
        std::fs::write(dir.path().join("notes.md"), "skipped").unwrap();

        let combined = consolidate_directory(dir.path()).unwrap();
        assert_eq!(combined, "first second");
    }

    #[test]
    fn test_summary_text() {
        let history = HandHistory::parse(HAND).unwrap();
        let stats = PreflopStats::from_history(&history).unwrap();
        let summary = format_summary(&history, &stats).unwrap();
        assert!(summary.contains("VPIP = 1.0000  (1/1 over 1 hands)"));
        assert!(summary.contains("PFR  = 1.0000  (1/1 over 1 hands)"));
        assert!(summary.contains("Hands played 2020-02-03 04:05 to 2020-02-03 04:05"));

        let report = hero_report(&history, &ParserConfig::default()).unwrap();
        assert!(report.starts_with("[Ts 9s] (#100)\nUTG [ME] : Raises $0.15 to $0.15\n"));
    }

    #[test]
    fn test_run_analysis_writes_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input");
        std::fs::create_dir(&input).unwrap();
        std::fs::write(input.join("session.txt"), HAND).unwrap();
        let out = dir.path().join("out");

        let report = run_analysis(&AnalysisConfig {
            input: input.clone(),
            output_dir: Some(out.clone()),
            log_file: Some(dir.path().join("summary.txt")),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(report.history.len(), 1);
        assert_eq!(report.outputs.len(), 6);
        let raise_csv = std::fs::read_to_string(out.join("raise.csv")).unwrap();
        assert_eq!(raise_csv, "card1,card2\nTs,9s\n");
        let fold_csv = std::fs::read_to_string(out.join("fold.csv")).unwrap();
        assert_eq!(fold_csv, "card1,card2\n");
        let chart_csv = std::fs::read_to_string(out.join("open_pre.csv")).unwrap();
        assert_eq!(chart_csv, "cards,raise,call,fold,raise_wgt,n\nT9s,1,0,0,1.0,1\n");
        assert!(out.join("open_pre.png").exists());

        let log = std::fs::read_to_string(dir.path().join("summary.txt")).unwrap();
        assert!(log.contains("Raise: 1 hands"));
        assert!(log.contains("VPIP = 1.0000"));
    }
}
