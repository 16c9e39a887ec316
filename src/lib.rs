//! WireWorld cellular automaton simulator
//!
//! This library provides a double-buffered WireWorld engine, the `.wiremap`
//! persistence format and the configuration and display helpers used by the
//! `wireworld` command line front end.

pub mod config;
pub mod error;
pub mod utils;
pub mod wireworld;

pub use config::Settings;
pub use error::{ParseError, WireWorldError};
pub use wireworld::{CellState, Engine, Grid};

use anyhow::Result;

/// Build an engine from settings: the configured map file when one is set,
/// otherwise a fresh grid of the configured size
pub fn engine_from_settings(settings: &Settings) -> Result<Engine> {
    let mut engine = match &settings.input.map_file {
        Some(path) => Engine::from_grid(wireworld::load_grid_from_file(path)?),
        None => Engine::new(
            settings.simulation.width,
            settings.simulation.height,
            settings.simulation.initial_state,
        ),
    };

    *engine.auto_cycle_mut() = settings.auto_cycle.build()?;
    Ok(engine)
}
