//! Pre-flop opening range chart
//!
//! A 13x13 table of starting hands (Ace first): suited hands above the
//! diagonal, offsuit below, pairs on it. Each cell counts how often hero
//! raised, called or folded first with that hand.

use crate::canvas::{load_system_font, text_width, Canvas};
use crate::cards::StartingHand;
use crate::round::FirstAction;
use ab_glyph::FontVec;
use anyhow::Result;
use std::fmt;

/// First-action counts for one starting hand
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChartCell {
    pub raise: u32,
    pub call: u32,
    pub fold: u32,
}

impl ChartCell {
    pub fn total(&self) -> u32 {
        self.raise + self.call + self.fold
    }

    /// Share of first actions that were raises; `None` if never dealt
    pub fn raise_frequency(&self) -> Option<f64> {
        match self.total() {
            0 => None,
            n => Some(self.raise as f64 / n as f64),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeChart {
    cells: [[ChartCell; 13]; 13],
}

impl RangeChart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one hand; unclassified first actions are ignored
    pub fn record(&mut self, hand: StartingHand, action: FirstAction) {
        let (row, col) = hand.chart_cell();
        let cell = &mut self.cells[row][col];
        match action {
            FirstAction::Raise => cell.raise += 1,
            FirstAction::Call => cell.call += 1,
            FirstAction::Fold => cell.fold += 1,
            FirstAction::Unclassified => {}
        }
    }

    pub fn cell(&self, hand: StartingHand) -> &ChartCell {
        let (row, col) = hand.chart_cell();
        &self.cells[row][col]
    }

    /// Total hands tabulated
    pub fn dealt(&self) -> u32 {
        self.cells.iter().flatten().map(ChartCell::total).sum()
    }

    /// Every starting hand seen at least once, in chart order
    pub fn entries(&self) -> Vec<(StartingHand, ChartCell)> {
        let mut entries = Vec::new();
        for row in 0..13 {
            for col in 0..13 {
                let cell = self.cells[row][col];
                if cell.total() > 0 {
                    entries.push((StartingHand::from_chart_cell(row, col), cell));
                }
            }
        }
        entries
    }

    /// Render the chart as a PNG heat map, labelled when a system font can
    /// be loaded. Cells shade from white to red with raise frequency; hands
    /// never dealt are grey.
    pub fn render_png(&self, cell_px: u32) -> Result<Vec<u8>> {
        let font = match load_system_font() {
            Ok(font) => Some(font),
            Err(e) => {
                log::warn!("Chart rendered without labels: {}", e);
                None
            }
        };
        self.render_png_with(cell_px, font.as_ref())
    }

    /// Render with an explicit font; `None` draws the unlabelled grid.
    pub fn render_png_with(&self, cell_px: u32, font: Option<&FontVec>) -> Result<Vec<u8>> {
        self.draw(cell_px, font).encode_png()
    }

    fn draw(&self, cell_px: u32, font: Option<&FontVec>) -> Canvas {
        let layout = Layout::new(cell_px);
        let mut canvas = Canvas::new(layout.width(), layout.height(), BACKGROUND);
        let cell = layout.cell;

        // Grid lines show through a one-pixel inset around every cell
        canvas.fill_rect(0, layout.grid_top(), layout.grid(), layout.grid(), GRID);
        for row in 0..13 {
            for col in 0..13 {
                let (x, y) = (col * cell, layout.grid_top() + row * cell);
                let rgb = cell_color(&self.cells[row][col]);
                canvas.fill_rect(x + 1, y + 1, cell - 1, cell - 1, rgb);
            }
        }

        // Colour scale from never raised to always raised
        let bar_top = layout.scale_top() + layout.scale / 4;
        let bar_height = (layout.scale / 2).max(1);
        let span = layout.grid().saturating_sub(1).max(1);
        for x in 0..layout.grid() {
            let rgb = shade(x as f64 / span as f64);
            canvas.fill_rect(x, bar_top, 1, bar_height, rgb);
        }

        if let Some(font) = font {
            self.draw_labels(&mut canvas, &layout, font);
        }
        canvas
    }

    fn draw_labels(&self, canvas: &mut Canvas, layout: &Layout, font: &FontVec) {
        let cell = layout.cell as f32;
        let title = format!("Open or 3B frequency ({} hands)", self.dealt());
        let title_height = layout.title as f32 * 0.5;
        canvas.draw_text_centered(
            font,
            &title,
            layout.grid() as f32 / 2.0,
            layout.title as f32 * 0.25,
            title_height,
            TEXT,
        );

        let label_height = cell * 0.26;
        for row in 0..13 {
            for col in 0..13 {
                let data = self.cells[row][col];
                let center_x = col as f32 * cell + cell / 2.0;
                let top = (layout.grid_top() + row * layout.cell) as f32 + cell * 0.06;

                let mut lines = vec![StartingHand::from_chart_cell(row, col).to_string()];
                if let Some(freq) = data.raise_frequency() {
                    lines.push(format!("{:.0}%", freq * 100.0));
                    lines.push(data.total().to_string());
                }
                for (i, line) in lines.iter().enumerate() {
                    let y = top + i as f32 * cell * 0.3;
                    canvas.draw_text_centered(font, line, center_x, y, label_height, TEXT);
                }
            }
        }

        let scale_height = (layout.scale as f32 * 0.4).max(1.0);
        let scale_y = layout.scale_top() as f32 + layout.scale as f32 * 0.3;
        canvas.draw_text(font, "0%", 2.0, scale_y, scale_height, TEXT);
        let right = layout.grid() as f32 - text_width(font, "100%", scale_height) - 2.0;
        canvas.draw_text(font, "100%", right, scale_y, scale_height, TEXT);
    }
}

impl fmt::Display for RangeChart {
    /// Plain-text grid of raise frequencies, one chart row per line
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..13 {
            let cells: Vec<String> = (0..13)
                .map(|col| {
                    let hand = StartingHand::from_chart_cell(row, col);
                    let freq = match self.cells[row][col].raise_frequency() {
                        Some(freq) => format!("{:.0}%", freq * 100.0),
                        None => "-".to_string(),
                    };
                    format!("{:<4}{:>5}", hand.to_string(), freq)
                })
                .collect();
            writeln!(f, "{}", cells.join(" ").trim_end())?;
        }
        Ok(())
    }
}

/// Pixel layout: title band, 13x13 grid, colour scale band
struct Layout {
    cell: usize,
    title: usize,
    scale: usize,
}

impl Layout {
    fn new(cell_px: u32) -> Self {
        let cell = cell_px.max(MIN_CELL_PX) as usize;
        Self {
            cell,
            title: cell,
            scale: cell / 2,
        }
    }

    fn grid(&self) -> usize {
        self.cell * 13
    }

    fn grid_top(&self) -> usize {
        self.title
    }

    fn scale_top(&self) -> usize {
        self.title + self.grid()
    }

    fn width(&self) -> usize {
        self.grid()
    }

    fn height(&self) -> usize {
        self.title + self.grid() + self.scale
    }
}

const MIN_CELL_PX: u32 = 4;
const BACKGROUND: [u8; 3] = [255, 255, 255];
const GRID: [u8; 3] = [64, 64, 64];
const UNDEALT: [u8; 3] = [220, 220, 220];
const TEXT: [u8; 3] = [0, 0, 0];

fn cell_color(cell: &ChartCell) -> [u8; 3] {
    match cell.raise_frequency() {
        Some(f) => shade(f),
        None => UNDEALT,
    }
}

/// White at 0, red at 1
fn shade(frequency: f64) -> [u8; 3] {
    let fade = (255.0 * (1.0 - frequency.clamp(0.0, 1.0))).round() as u8;
    [255, fade, fade]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Rank;

    fn hand(high: Rank, low: Rank, suited: bool) -> StartingHand {
        StartingHand { high, low, suited }
    }

    #[test]
    fn test_record_and_frequency() {
        let mut chart = RangeChart::new();
        let aks = hand(Rank::Ace, Rank::King, true);
        chart.record(aks, FirstAction::Raise);
        chart.record(aks, FirstAction::Raise);
        chart.record(aks, FirstAction::Call);
        chart.record(aks, FirstAction::Fold);
        chart.record(aks, FirstAction::Unclassified);

        let cell = chart.cell(aks);
        assert_eq!(cell.total(), 4);
        assert_eq!(cell.raise_frequency(), Some(0.5));
        assert_eq!(chart.cell(hand(Rank::Ace, Rank::King, false)).total(), 0);
        assert_eq!(chart.dealt(), 4);
    }

    #[test]
    fn test_entries_in_chart_order() {
        let mut chart = RangeChart::new();
        chart.record(hand(Rank::Two, Rank::Two, false), FirstAction::Fold);
        chart.record(hand(Rank::Ace, Rank::Ace, false), FirstAction::Raise);
        let labels: Vec<String> = chart.entries().iter().map(|(h, _)| h.to_string()).collect();
        assert_eq!(labels, vec!["AA", "22"]);
    }

    #[test]
    fn test_text_grid() {
        let mut chart = RangeChart::new();
        chart.record(hand(Rank::Ace, Rank::Ace, false), FirstAction::Raise);
        let text = chart.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 13);
        assert!(lines[0].starts_with("AA   100%"));
        assert!(lines[0].contains("AKs"));
        assert!(lines[1].starts_with("AKo"));
    }

    fn png_size(png: &[u8]) -> (u32, u32) {
        let width = u32::from_be_bytes([png[16], png[17], png[18], png[19]]);
        let height = u32::from_be_bytes([png[20], png[21], png[22], png[23]]);
        (width, height)
    }

    #[test]
    fn test_render_png_header() {
        let chart = RangeChart::new();
        let png = chart.render_png(10).unwrap();
        assert_eq!(&png[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn test_render_png_has_title_and_scale_bands() {
        let chart = RangeChart::new();
        let png = chart.render_png_with(10, None).unwrap();
        // 13 cells wide; title band of one cell and a half-cell scale below
        assert_eq!(png_size(&png), (130, 10 + 130 + 5));

        let canvas = chart.draw(10, None);
        assert_eq!(canvas.pixel(5, 5), Some(BACKGROUND));
        assert_eq!(canvas.pixel(0, 10), Some(GRID));
        assert_eq!(canvas.pixel(5, 15), Some(UNDEALT));
        assert_eq!(canvas.pixel(0, 142), Some([255, 255, 255]));
        assert_eq!(canvas.pixel(129, 142), Some([255, 0, 0]));
    }

    #[test]
    fn test_labels_drawn_when_font_available() {
        let Ok(font) = load_system_font() else {
            return;
        };
        let mut chart = RangeChart::new();
        chart.record(hand(Rank::Ace, Rank::King, true), FirstAction::Raise);
        chart.record(hand(Rank::Seven, Rank::Two, false), FirstAction::Fold);

        let plain = chart.render_png_with(48, None).unwrap();
        let labelled = chart.render_png_with(48, Some(&font)).unwrap();
        assert_eq!(png_size(&plain), png_size(&labelled));
        assert_ne!(plain, labelled);

        // Title band carries text only when labelled
        let title_band = |canvas: &Canvas| {
            (0..canvas.width()).any(|x| canvas.pixel(x, 24) != Some(BACKGROUND))
        };
        assert!(!title_band(&chart.draw(48, None)));
        assert!(title_band(&chart.draw(48, Some(&font))));
    }

    #[test]
    fn test_cell_color() {
        let always = ChartCell {
            raise: 2,
            call: 0,
            fold: 0,
        };
        let never = ChartCell {
            raise: 0,
            call: 1,
            fold: 1,
        };
        assert_eq!(cell_color(&always), [255, 0, 0]);
        assert_eq!(cell_color(&never), [255, 255, 255]);
        assert_eq!(cell_color(&ChartCell::default()), UNDEALT);
    }
}
