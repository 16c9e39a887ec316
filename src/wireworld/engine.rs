//! Double-buffered simulation engine

use super::{io, AutoCycler, CellState, Grid, WireWorldRules};
use crate::error::WireWorldError;
use std::path::Path;
use std::time::Duration;

/// Owns the live grid, its scratch buffer and the auto-cycle timer.
///
/// `scratch` always has the same dimensions as `grid`. Its contents are
/// meaningless between cycles and never handed out.
#[derive(Debug, Clone)]
pub struct Engine {
    grid: Grid,
    scratch: Grid,
    generation: u64,
    auto_cycle: AutoCycler,
}

impl Engine {
    pub fn new(width: usize, height: usize, initial_state: CellState) -> Self {
        Self::from_grid(Grid::new(width, height, initial_state))
    }

    /// Start a simulation from an existing grid
    pub fn from_grid(grid: Grid) -> Self {
        let scratch = Grid::new(grid.width(), grid.height(), CellState::Dead);
        Self {
            grid,
            scratch,
            generation: 0,
            auto_cycle: AutoCycler::default(),
        }
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    /// The current generation, for rendering or inspection
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Cycles run since construction, the last reset or the last load
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// `None` when `(x, y)` lies outside the grid
    pub fn get_state(&self, x: usize, y: usize) -> Option<CellState> {
        self.grid.try_get(x, y)
    }

    /// Edit a cell. Coordinates outside the grid are ignored.
    pub fn set_state(&mut self, x: usize, y: usize, state: CellState) {
        self.grid.set(x, y, state);
    }

    /// Advance the simulation by one generation
    pub fn cycle(&mut self) {
        WireWorldRules::evolve_into(&self.grid, &mut self.scratch);
        std::mem::swap(&mut self.grid, &mut self.scratch);
        self.generation += 1;
    }

    pub fn cycle_n(&mut self, generations: usize) {
        for _ in 0..generations {
            self.cycle();
        }
    }

    /// Replace the grid with a fresh one of the same size filled with `fill`
    pub fn reset(&mut self, fill: CellState) {
        let (width, height) = self.grid.dimensions();
        self.install(Grid::new(width, height, fill));
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), WireWorldError> {
        io::save_grid_to_file(&self.grid, path)
    }

    /// Replace the simulation with the map stored at `path`.
    ///
    /// The file is parsed completely before anything is swapped in; on error
    /// the current grid is left untouched.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<(), WireWorldError> {
        let grid = io::load_grid_from_file(path)?;
        self.install(grid);
        Ok(())
    }

    fn install(&mut self, grid: Grid) {
        self.scratch = Grid::new(grid.width(), grid.height(), CellState::Dead);
        self.grid = grid;
        self.generation = 0;
    }

    pub fn auto_cycle(&self) -> &AutoCycler {
        &self.auto_cycle
    }

    pub fn auto_cycle_mut(&mut self) -> &mut AutoCycler {
        &mut self.auto_cycle
    }

    /// Feed elapsed frame time to the auto-cycler and run whatever cycles
    /// are due. Returns the number of cycles run.
    pub fn advance(&mut self, delta: Duration) -> u32 {
        let due = self.auto_cycle.tick(delta);
        for _ in 0..due {
            self.cycle();
        }
        due
    }
}
