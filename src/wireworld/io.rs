//! File I/O operations for WireWorld maps
//!
//! Maps are stored as `.wiremap` text files. The first line holds
//! `<width>|<height>`; every following line holds `<x>|<y>|<code>` for one
//! cell, written column by column (x outer, y inner). See
//! [`CellState::code`] for the state codes.

use super::{CellState, Grid};
use crate::error::{ParseError, ParseErrorKind, WireWorldError};
use std::path::Path;

pub const MAP_EXTENSION: &str = "wiremap";

/// Largest width or height a map header may declare
pub const MAX_DIMENSION: usize = i16::MAX as usize;

/// Largest cell count a map header may declare
pub const MAX_CELLS: usize = 1 << 24;

const FIELD_SEPARATOR: char = '|';

/// Load a grid from a `.wiremap` file
pub fn load_grid_from_file<P: AsRef<Path>>(path: P) -> Result<Grid, WireWorldError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| WireWorldError::io(path, e))?;

    Ok(parse_grid_from_string(&content)?)
}

/// Parse a grid from its `.wiremap` representation.
///
/// Cell lines are applied in order, so a coordinate listed twice keeps the
/// last value. Blank lines and cells outside the declared dimensions are
/// skipped.
pub fn parse_grid_from_string(content: &str) -> Result<Grid, ParseError> {
    let mut lines = content
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    let (header_line, header) = lines
        .next()
        .ok_or_else(|| ParseError::new(1, ParseErrorKind::MissingHeader))?;
    let (width, height) = parse_header(header_line, header)?;

    let mut grid = Grid::new(width, height, CellState::Dead);

    for (line_no, line) in lines {
        let [x, y, code] = parse_fields::<3>(line_no, line)?;

        let state = CellState::from_code(code)
            .ok_or_else(|| ParseError::new(line_no, ParseErrorKind::UnknownStateCode(code)))?;

        if let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) {
            grid.set(x, y, state);
        }
    }

    Ok(grid)
}

fn parse_header(line_no: usize, line: &str) -> Result<(usize, usize), ParseError> {
    let [width, height] = parse_fields::<2>(line_no, line)?;

    let to_dimension = |value: i64| {
        usize::try_from(value)
            .map_err(|_| ParseError::new(line_no, ParseErrorKind::NotAnInteger(value.to_string())))
    };
    let (width, height) = (to_dimension(width)?, to_dimension(height)?);

    if !dimensions_fit(width, height) {
        return Err(ParseError::new(
            line_no,
            ParseErrorKind::DimensionsTooLarge { width, height },
        ));
    }

    Ok((width, height))
}

/// Whether a `width` x `height` grid stays within [`MAX_DIMENSION`] and
/// [`MAX_CELLS`]
pub fn dimensions_fit(width: usize, height: usize) -> bool {
    width <= MAX_DIMENSION
        && height <= MAX_DIMENSION
        && width.checked_mul(height).is_some_and(|cells| cells <= MAX_CELLS)
}

/// Split a line on `|` into exactly `N` integers
fn parse_fields<const N: usize>(line_no: usize, line: &str) -> Result<[i64; N], ParseError> {
    let parts: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    if parts.len() != N {
        return Err(ParseError::new(
            line_no,
            ParseErrorKind::FieldCount {
                expected: N,
                found: parts.len(),
            },
        ));
    }

    let mut values = [0i64; N];
    for (value, part) in values.iter_mut().zip(parts) {
        let part = part.trim();
        *value = part
            .parse()
            .map_err(|_| ParseError::new(line_no, ParseErrorKind::NotAnInteger(part.to_string())))?;
    }
    Ok(values)
}

/// Save a grid to a `.wiremap` file
pub fn save_grid_to_file<P: AsRef<Path>>(grid: &Grid, path: P) -> Result<(), WireWorldError> {
    let path = path.as_ref();
    let content = grid_to_string(grid);

    // Create parent directories if they don't exist
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| WireWorldError::io(parent, e))?;
    }

    std::fs::write(path, content).map_err(|e| WireWorldError::io(path, e))
}

/// Convert a grid to its `.wiremap` representation
pub fn grid_to_string(grid: &Grid) -> String {
    let (width, height) = grid.dimensions();
    // Rough guess: short coordinates plus separators and a code
    let mut result = String::with_capacity(16 + width * height * 10);

    result.push_str(&format!("{width}{FIELD_SEPARATOR}{height}\n"));
    for (x, y, state) in grid.cells() {
        result.push_str(&format!(
            "{x}{FIELD_SEPARATOR}{y}{FIELD_SEPARATOR}{}\n",
            state.code()
        ));
    }

    result
}

/// Load every `.wiremap` file in a directory, sorted by file name
pub fn load_grids_from_directory<P: AsRef<Path>>(
    dir_path: P,
) -> Result<Vec<(String, Grid)>, WireWorldError> {
    let dir_path = dir_path.as_ref();
    let dir = std::fs::read_dir(dir_path).map_err(|e| WireWorldError::io(dir_path, e))?;

    let mut grids = Vec::new();

    for entry in dir {
        let entry = entry.map_err(|e| WireWorldError::io(dir_path, e))?;
        let path = entry.path();

        if path.is_file() && path.extension().is_some_and(|ext| ext == MAP_EXTENSION) {
            let name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("unknown")
                .to_string();

            match load_grid_from_file(&path) {
                Ok(grid) => grids.push((name, grid)),
                Err(e) => eprintln!("Warning: Failed to load {}: {}", path.display(), e),
            }
        }
    }

    grids.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(grids)
}

/// Example circuits written by `create_example_maps`
pub fn example_patterns() -> Vec<(&'static str, Vec<&'static str>)> {
    vec![
        (
            "wire",
            vec![
                "..........",
                ".tH######.",
                "..........",
            ],
        ),
        (
            "clock",
            vec![
                "......",
                "..tH..",
                ".#..#.",
                "..##..",
                "......",
            ],
        ),
        (
            "diode",
            vec![
                "...........",
                "......##...",
                ".tH####.##.",
                "......##...",
                "...........",
            ],
        ),
        (
            "or_gate",
            vec![
                "...........",
                ".tH###.....",
                "......#....",
                ".....###...",
                "......#####",
                ".....###...",
                "......#....",
                ".tH###.....",
                "...........",
            ],
        ),
    ]
}

/// Create example map files
pub fn create_example_maps<P: AsRef<Path>>(output_dir: P) -> Result<Vec<String>, WireWorldError> {
    let dir = output_dir.as_ref();
    std::fs::create_dir_all(dir).map_err(|e| WireWorldError::io(dir, e))?;

    let mut written = Vec::new();
    for (name, rows) in example_patterns() {
        let grid = Grid::from_rows(rows.as_slice())?;
        let file_name = format!("{name}.{MAP_EXTENSION}");
        save_grid_to_file(&grid, dir.join(&file_name))?;
        written.push(file_name);
    }

    Ok(written)
}
