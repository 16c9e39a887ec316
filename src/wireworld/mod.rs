//! WireWorld core functionality

pub mod auto_cycle;
pub mod cell;
pub mod engine;
pub mod grid;
pub mod io;
pub mod rules;

pub use auto_cycle::AutoCycler;
pub use cell::CellState;
pub use engine::Engine;
pub use grid::{Grid, GridStatistics};
pub use io::{create_example_maps, load_grid_from_file, save_grid_to_file};
pub use rules::WireWorldRules;
