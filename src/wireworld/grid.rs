//! Grid representation and utilities for WireWorld

use super::CellState;
use crate::error::{ParseError, ParseErrorKind, WireWorldError};
use itertools::iproduct;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The eight Moore-neighbourhood offsets, in scan order
pub const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

/// Represents a WireWorld grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<CellState>,
}

impl Grid {
    /// Create a grid with every cell set to `fill`
    pub fn new(width: usize, height: usize, fill: CellState) -> Self {
        Self {
            width,
            height,
            cells: vec![fill; width * height],
        }
    }

    /// Create a grid from rows of glyphs (see [`CellState::glyph`])
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, ParseError> {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.as_ref().chars().count());

        let mut grid = Self::new(width, height, CellState::Dead);
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let found = row.chars().count();
            if found != width {
                return Err(ParseError::new(
                    y + 1,
                    ParseErrorKind::RaggedRow {
                        expected: width,
                        found,
                    },
                ));
            }
            for (x, glyph) in row.chars().enumerate() {
                let state = CellState::from_glyph(glyph)
                    .ok_or_else(|| ParseError::new(y + 1, ParseErrorKind::UnknownGlyph(glyph)))?;
                let idx = grid.index(x, y);
                grid.cells[idx] = state;
            }
        }

        Ok(grid)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Convert 2D coordinates to 1D index
    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Whether `(x, y)` lies inside `[0, width) x [0, height)`
    #[inline]
    pub fn contains(&self, x: isize, y: isize) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Get cell state at coordinates.
    ///
    /// Callers must stay inside the grid; use [`Grid::try_get`] for
    /// coordinates that come from outside the engine.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> CellState {
        assert!(x < self.width && y < self.height, "({x}, {y}) outside grid");
        self.cells[self.index(x, y)]
    }

    pub fn try_get(&self, x: usize, y: usize) -> Option<CellState> {
        (x < self.width && y < self.height).then(|| self.cells[self.index(x, y)])
    }

    /// Set cell state, reporting coordinates outside the grid
    pub fn try_set(&mut self, x: usize, y: usize, state: CellState) -> Result<(), WireWorldError> {
        if x >= self.width || y >= self.height {
            return Err(WireWorldError::OutOfRange {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        let idx = self.index(x, y);
        self.cells[idx] = state;
        Ok(())
    }

    /// Set cell state, ignoring coordinates outside the grid.
    ///
    /// Returns whether the write landed.
    pub fn set(&mut self, x: usize, y: usize, state: CellState) -> bool {
        self.try_set(x, y, state).is_ok()
    }

    /// Count neighbours of `(x, y)` that are in `state`.
    ///
    /// Edges are hard: off-grid offsets are skipped, never wrapped and never
    /// treated as any state.
    pub fn count_neighbors(&self, x: usize, y: usize, state: CellState) -> u8 {
        let mut count = 0;

        for (dx, dy) in NEIGHBOR_OFFSETS {
            let nx = x as isize + dx;
            let ny = y as isize + dy;

            if self.contains(nx, ny) && self.cells[self.index(nx as usize, ny as usize)] == state {
                count += 1;
            }
        }

        count
    }

    /// Iterate `(x, y, state)` in column-major order (x outer, y inner)
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, CellState)> + '_ {
        iproduct!(0..self.width, 0..self.height).map(move |(x, y)| (x, y, self.get(x, y)))
    }

    /// Count cells in a given state
    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|&&cell| cell == state).count()
    }

    /// Check if the grid holds nothing but dead cells
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|&cell| cell == CellState::Dead)
    }

    pub fn statistics(&self) -> GridStatistics {
        let mut stats = GridStatistics {
            width: self.width,
            height: self.height,
            ..GridStatistics::default()
        };
        for &cell in &self.cells {
            match cell {
                CellState::Dead => stats.dead += 1,
                CellState::Wire => stats.wire += 1,
                CellState::Head => stats.head += 1,
                CellState::Tail => stats.tail += 1,
            }
        }
        stats
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                write!(f, "{}", self.get(x, y).glyph())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Per-state cell counts for a grid
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridStatistics {
    pub width: usize,
    pub height: usize,
    pub dead: usize,
    pub wire: usize,
    pub head: usize,
    pub tail: usize,
}

impl GridStatistics {
    /// Cells that take part in the simulation (everything but dead)
    pub fn conductive(&self) -> usize {
        self.wire + self.head + self.tail
    }
}
