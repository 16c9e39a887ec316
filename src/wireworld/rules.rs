//! WireWorld rules implementation

use super::{CellState, Grid};

/// WireWorld rules engine
pub struct WireWorldRules;

impl WireWorldRules {
    /// Head counts that turn a wire cell into a head
    pub const EXCITATION_COUNTS: [u8; 2] = [1, 2];

    /// Next state of a cell given its current state and the number of
    /// electron heads among its eight neighbours
    pub fn next_state(current: CellState, head_neighbors: u8) -> CellState {
        match (current, head_neighbors) {
            (CellState::Dead, _) => CellState::Dead,
            (CellState::Head, _) => CellState::Tail,
            (CellState::Tail, _) => CellState::Wire,
            (CellState::Wire, n) if Self::EXCITATION_COUNTS.contains(&n) => CellState::Head,
            (CellState::Wire, _) => CellState::Wire,
        }
    }

    /// Write the generation after `current` into `next`.
    ///
    /// Reads only from `current`, so no cell sees a neighbour that was already
    /// advanced this generation. Every cell of `next` is overwritten.
    pub fn evolve_into(current: &Grid, next: &mut Grid) {
        debug_assert_eq!(current.dimensions(), next.dimensions());

        for y in 0..current.height() {
            for x in 0..current.width() {
                let state = current.get(x, y);
                // Only wire cells depend on their neighbourhood
                let heads = if state == CellState::Wire {
                    current.count_neighbors(x, y, CellState::Head)
                } else {
                    0
                };
                next.set(x, y, Self::next_state(state, heads));
            }
        }
    }

    /// Apply the rules to evolve the grid one generation forward
    pub fn evolve(current: &Grid) -> Grid {
        let mut next = Grid::new(current.width(), current.height(), CellState::Dead);
        Self::evolve_into(current, &mut next);
        next
    }

    /// Evolve the grid for multiple generations
    pub fn evolve_generations(grid: Grid, generations: usize) -> Grid {
        let mut current = grid;
        let mut scratch = Grid::new(current.width(), current.height(), CellState::Dead);
        for _ in 0..generations {
            Self::evolve_into(&current, &mut scratch);
            std::mem::swap(&mut current, &mut scratch);
        }
        current
    }

    /// Check that `start` reaches `target` after exactly `generations` steps
    pub fn validate_evolution(start: &Grid, target: &Grid, generations: usize) -> bool {
        if start.dimensions() != target.dimensions() {
            return false;
        }

        let evolved = Self::evolve_generations(start.clone(), generations);
        evolved == *target
    }
}
