//! Configuration settings for the WireWorld simulator

use crate::error::WireWorldError;
use crate::wireworld::auto_cycle::{
    DEFAULT_CYCLES_PER_SECOND, DEFAULT_SPEED_STEP, MAX_CYCLES_PER_SECOND, MIN_CYCLES_PER_SECOND,
};
use crate::wireworld::io::dimensions_fit;
use crate::wireworld::{AutoCycler, CellState};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub simulation: SimulationConfig,
    pub auto_cycle: AutoCycleConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub width: usize,
    pub height: usize,
    pub initial_state: CellState,
    pub generations: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoCycleConfig {
    pub enabled: bool,
    pub cycles_per_second: f64,
    /// Fraction the rate grows or shrinks by per speed adjustment
    pub speed_step: f64,
}

impl AutoCycleConfig {
    /// Build the timer described by this section
    pub fn build(&self) -> Result<AutoCycler, WireWorldError> {
        let mut cycler = AutoCycler::new(self.cycles_per_second, self.speed_step)?;
        cycler.set_enabled(self.enabled);
        Ok(cycler)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Map to start from instead of a blank grid
    #[serde(default)]
    pub map_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub output_directory: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Text,
    Json,
    Visual,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig {
                width: 40,
                height: 20,
                initial_state: CellState::Dead,
                generations: 12,
            },
            auto_cycle: AutoCycleConfig {
                enabled: true,
                cycles_per_second: DEFAULT_CYCLES_PER_SECOND,
                speed_step: DEFAULT_SPEED_STEP,
            },
            input: InputConfig { map_file: None },
            output: OutputConfig {
                format: OutputFormat::Text,
                output_directory: PathBuf::from("output/maps"),
            },
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn to_file(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self).context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<(), WireWorldError> {
        if self.simulation.generations == 0 {
            return Err(WireWorldError::InvalidConfig(
                "number of generations must be positive".to_string(),
            ));
        }

        let (width, height) = (self.simulation.width, self.simulation.height);
        if !dimensions_fit(width, height) {
            return Err(WireWorldError::InvalidConfig(format!(
                "a {width}x{height} grid is too large"
            )));
        }

        let rate = self.auto_cycle.cycles_per_second;
        if !(MIN_CYCLES_PER_SECOND..=MAX_CYCLES_PER_SECOND).contains(&rate) {
            return Err(WireWorldError::InvalidRate(rate));
        }

        let step = self.auto_cycle.speed_step;
        if !(step > 0.0 && step < 1.0) {
            return Err(WireWorldError::InvalidConfig(format!(
                "speed step must lie strictly between 0 and 1, got {step}"
            )));
        }

        if let Some(ref map_file) = self.input.map_file {
            if !map_file.exists() {
                return Err(WireWorldError::InvalidConfig(format!(
                    "map file does not exist: {}",
                    map_file.display()
                )));
            }
        }

        Ok(())
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(width) = cli_overrides.width {
            self.simulation.width = width;
        }
        if let Some(height) = cli_overrides.height {
            self.simulation.height = height;
        }
        if let Some(generations) = cli_overrides.generations {
            self.simulation.generations = generations;
        }
        if let Some(rate) = cli_overrides.cycles_per_second {
            self.auto_cycle.cycles_per_second = rate;
        }
        if let Some(ref map_file) = cli_overrides.map_file {
            self.input.map_file = Some(map_file.clone());
        }
        if let Some(ref output_dir) = cli_overrides.output_dir {
            self.output.output_directory = output_dir.clone();
        }
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub width: Option<usize>,
    pub height: Option<usize>,
    pub generations: Option<usize>,
    pub cycles_per_second: Option<f64>,
    pub map_file: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.auto_cycle.cycles_per_second, 3.0);
        assert_eq!(settings.auto_cycle.speed_step, 0.2);
    }

    #[test]
    fn test_yaml_round_trip() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("config/default.yaml");

        let mut settings = Settings::default();
        settings.simulation.initial_state = CellState::Wire;
        settings.output.format = OutputFormat::Json;
        settings.to_file(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("initial_state: wire"));
        assert!(content.contains("format: json"));

        let loaded = Settings::from_file(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_map_file_is_optional_in_yaml() {
        let yaml = r#"
simulation:
  width: 8
  height: 4
  initial_state: dead
  generations: 3
auto_cycle:
  enabled: false
  cycles_per_second: 5.0
  speed_step: 0.1
input: {}
output:
  format: visual
  output_directory: out
"#;
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.input.map_file, None);
        assert_eq!(settings.output.format, OutputFormat::Visual);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validation_failures() {
        let mut settings = Settings::default();
        settings.simulation.generations = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.auto_cycle.cycles_per_second = 0.0;
        assert!(matches!(settings.validate(), Err(WireWorldError::InvalidRate(_))));

        let mut settings = Settings::default();
        settings.auto_cycle.speed_step = 1.5;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.simulation.width = 100_000;
        assert!(matches!(settings.validate(), Err(WireWorldError::InvalidConfig(_))));

        let mut settings = Settings::default();
        settings.input.map_file = Some(PathBuf::from("definitely/not/here.wiremap"));
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_cli_overrides() {
        let mut settings = Settings::default();
        settings.merge_with_cli(&CliOverrides {
            width: Some(10),
            generations: Some(99),
            cycles_per_second: Some(7.5),
            output_dir: Some(PathBuf::from("elsewhere")),
            ..CliOverrides::default()
        });

        assert_eq!(settings.simulation.width, 10);
        assert_eq!(settings.simulation.height, 20);
        assert_eq!(settings.simulation.generations, 99);
        assert_eq!(settings.auto_cycle.cycles_per_second, 7.5);
        assert_eq!(settings.output.output_directory, PathBuf::from("elsewhere"));
        assert_eq!(settings.input.map_file, None);
    }

    #[test]
    fn test_build_auto_cycler() {
        let mut config = Settings::default().auto_cycle;
        config.enabled = false;
        let cycler = config.build().unwrap();
        assert!(!cycler.is_enabled());
        assert_eq!(cycler.rate(), DEFAULT_CYCLES_PER_SECOND);
    }
}
