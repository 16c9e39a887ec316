//! Configuration management for the WireWorld simulator

pub mod settings;

pub use settings::{
    AutoCycleConfig, CliOverrides, InputConfig, OutputConfig, OutputFormat, Settings,
    SimulationConfig,
};
