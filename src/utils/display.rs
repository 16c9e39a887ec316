//! Display and output formatting utilities

use crate::config::OutputFormat;
use crate::wireworld::{CellState, Grid, GridStatistics};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

/// One recorded generation of a run
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub generation: u64,
    pub statistics: GridStatistics,
    pub grid: Grid,
}

impl Snapshot {
    pub fn capture(generation: u64, grid: &Grid) -> Self {
        Self {
            generation,
            statistics: grid.statistics(),
            grid: grid.clone(),
        }
    }
}

/// Format grids for display
pub struct GridFormatter;

impl GridFormatter {
    /// Format a grid in compact form, one glyph per cell
    pub fn format_grid_compact(grid: &Grid) -> String {
        let mut output = String::with_capacity((grid.width() + 1) * grid.height());
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                output.push(grid.get(x, y).glyph());
            }
            output.push('\n');
        }
        output
    }

    /// Format a grid with coordinates
    pub fn format_grid_with_coords(grid: &Grid) -> String {
        let mut output = String::new();

        // Header with column numbers
        output.push_str("   ");
        for x in 0..grid.width() {
            output.push_str(&format!("{:2}", x % 10));
        }
        output.push('\n');

        // Rows with row numbers
        for y in 0..grid.height() {
            output.push_str(&format!("{:2} ", y));
            for x in 0..grid.width() {
                let glyph = grid.get(x, y).glyph();
                output.push(glyph);
                output.push(glyph);
            }
            output.push('\n');
        }

        output
    }

    /// Format a grid as coloured blocks when the terminal allows it,
    /// falling back to glyphs otherwise
    pub fn format_grid_colored(grid: &Grid) -> String {
        if !ColorOutput::supports_color() {
            return Self::format_grid_compact(grid);
        }

        let mut output = String::new();
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                let state = grid.get(x, y);
                output.push_str(&format!("\x1b[{}m  \x1b[0m", StatePalette::background(state)));
            }
            output.push('\n');
        }
        output
    }

    pub fn format_statistics(stats: &GridStatistics) -> String {
        format!(
            "Grid {}x{}: {} wire, {} head, {} tail, {} dead",
            stats.width, stats.height, stats.wire, stats.head, stats.tail, stats.dead
        )
    }

    /// Save recorded generations to files based on output format
    pub fn save_snapshots<P: AsRef<Path>>(
        snapshots: &[Snapshot],
        output_dir: P,
        format: OutputFormat,
    ) -> Result<()> {
        let output_dir = output_dir.as_ref();
        std::fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create directory: {}", output_dir.display()))?;

        match format {
            OutputFormat::Text => {
                for snapshot in snapshots {
                    let filename = format!("generation_{:04}.txt", snapshot.generation);
                    let content = Self::format_grid_compact(&snapshot.grid);
                    std::fs::write(output_dir.join(filename), content)?;
                }
            }
            OutputFormat::Json => {
                for snapshot in snapshots {
                    let filename = format!("generation_{:04}.json", snapshot.generation);
                    let json = serde_json::to_string_pretty(snapshot)?;
                    std::fs::write(output_dir.join(filename), json)?;
                }

                // Also save a summary file
                let summaries: Vec<_> = snapshots
                    .iter()
                    .map(|s| {
                        serde_json::json!({
                            "generation": s.generation,
                            "statistics": s.statistics,
                        })
                    })
                    .collect();
                let summary_json = serde_json::to_string_pretty(&summaries)?;
                std::fs::write(output_dir.join("run_summary.json"), summary_json)?;
            }
            OutputFormat::Visual => {
                let content = Self::create_visual_evolution(snapshots);
                std::fs::write(output_dir.join("evolution_visual.txt"), content)?;
            }
        }

        Ok(())
    }

    /// Create a visual representation of a run
    fn create_visual_evolution(snapshots: &[Snapshot]) -> String {
        let mut output = String::new();

        output.push_str("Visual Evolution\n");
        output.push_str(&"=".repeat(50));
        output.push('\n');

        for snapshot in snapshots {
            output.push_str(&format!(
                "\nGeneration {} (Heads: {}):\n",
                snapshot.generation, snapshot.statistics.head
            ));
            output.push_str(&Self::format_grid_with_coords(&snapshot.grid));
        }

        output
    }
}

/// Terminal colours for each cell state, matching the classic WireWorld
/// palette: blue heads, red tails, yellow wire on black
pub struct StatePalette;

impl StatePalette {
    pub fn foreground(state: CellState) -> Color {
        match state {
            CellState::Dead => Color::Black,
            CellState::Wire => Color::Yellow,
            CellState::Head => Color::Blue,
            CellState::Tail => Color::Red,
        }
    }

    fn background(state: CellState) -> u8 {
        Self::foreground(state).code() + 10
    }
}

/// Colors for terminal output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Cyan,
}

impl Color {
    fn code(&self) -> u8 {
        match self {
            Color::Black => 30,
            Color::Red => 31,
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Blue => 34,
            Color::Cyan => 36,
        }
    }
}

/// Colored output utilities
pub struct ColorOutput;

impl ColorOutput {
    /// Format text with color (if terminal supports it)
    pub fn colored(text: &str, color: Color) -> String {
        if Self::supports_color() {
            format!("\x1b[{}m{}\x1b[0m", color.code(), text)
        } else {
            text.to_string()
        }
    }

    /// Check if terminal supports color
    pub fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err() && (std::env::var("TERM").unwrap_or_default() != "dumb")
    }

    /// Format success message
    pub fn success(text: &str) -> String {
        Self::colored(text, Color::Green)
    }

    /// Format error message
    pub fn error(text: &str) -> String {
        Self::colored(text, Color::Red)
    }

    /// Format warning message
    pub fn warning(text: &str) -> String {
        Self::colored(text, Color::Yellow)
    }

    /// Format info message
    pub fn info(text: &str) -> String {
        Self::colored(text, Color::Cyan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample() -> Grid {
        Grid::from_rows(&["tH#", "..#"]).unwrap()
    }

    #[test]
    fn test_compact_format() {
        assert_eq!(GridFormatter::format_grid_compact(&sample()), "tH#\n..#\n");
    }

    #[test]
    fn test_coords_format() {
        let formatted = GridFormatter::format_grid_with_coords(&sample());
        let lines: Vec<_> = formatted.lines().collect();
        assert_eq!(lines[0], "    0 1 2");
        assert_eq!(lines[1], " 0 ttHH##");
        assert_eq!(lines[2], " 1 ....##");
    }

    #[test]
    fn test_statistics_format() {
        let text = GridFormatter::format_statistics(&sample().statistics());
        assert_eq!(text, "Grid 3x2: 2 wire, 1 head, 1 tail, 2 dead");
    }

    #[test]
    fn test_palette() {
        assert_eq!(StatePalette::foreground(CellState::Head), Color::Blue);
        assert_eq!(StatePalette::foreground(CellState::Tail), Color::Red);
        assert_eq!(StatePalette::foreground(CellState::Wire), Color::Yellow);
        assert_eq!(StatePalette::background(CellState::Dead), 40);
    }

    #[test]
    fn test_color_output() {
        let colored = ColorOutput::colored("test", Color::Red);
        // Should either be colored or plain text
        assert!(colored.contains("test"));

        let success = ColorOutput::success("OK");
        assert!(success.contains("OK"));
    }

    #[test]
    fn test_save_snapshots() {
        let temp_dir = tempdir().unwrap();
        let grid = sample();
        let snapshots = vec![Snapshot::capture(0, &grid), Snapshot::capture(1, &grid)];

        GridFormatter::save_snapshots(&snapshots, temp_dir.path(), OutputFormat::Text).unwrap();
        assert!(temp_dir.path().join("generation_0001.txt").exists());

        GridFormatter::save_snapshots(&snapshots, temp_dir.path(), OutputFormat::Json).unwrap();
        let summary = std::fs::read_to_string(temp_dir.path().join("run_summary.json")).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&summary).unwrap();
        assert_eq!(parsed[1]["generation"], 1);
        assert_eq!(parsed[0]["statistics"]["head"], 1);

        GridFormatter::save_snapshots(&snapshots, temp_dir.path(), OutputFormat::Visual).unwrap();
        let visual = std::fs::read_to_string(temp_dir.path().join("evolution_visual.txt")).unwrap();
        assert!(visual.contains("Generation 1 (Heads: 1)"));
    }
}
