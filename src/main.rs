//! Main CLI application for the WireWorld simulator

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use wireworld::{
    config::{CliOverrides, Settings},
    engine_from_settings,
    utils::{ColorOutput, GridFormatter, Snapshot},
    wireworld::{
        create_example_maps,
        io::{dimensions_fit, load_grids_from_directory},
        load_grid_from_file, save_grid_to_file, AutoCycler, WireWorldRules,
    },
    CellState, Engine, Grid,
};

const FRAME_TIME: Duration = Duration::from_millis(16);

#[derive(Parser)]
#[command(name = "wireworld")]
#[command(about = "WireWorld cellular automaton simulator")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a fixed number of generations and print the result
    Run {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Map to start from (overrides config)
        #[arg(short, long)]
        map: Option<PathBuf>,

        /// Number of generations (overrides config)
        #[arg(short, long)]
        generations: Option<usize>,

        /// Save the final generation as a map
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Export every generation to the output directory
        #[arg(short, long)]
        export: bool,

        /// Output directory (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print every generation, not just the last
        #[arg(long)]
        show_evolution: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Animate a map in the terminal at the auto-cycle rate
    Play {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Map to start from (overrides config)
        #[arg(short, long)]
        map: Option<PathBuf>,

        /// Stop after this many generations (overrides config)
        #[arg(short, long)]
        generations: Option<usize>,

        /// Cycles per second (overrides config)
        #[arg(short, long)]
        rate: Option<f64>,

        /// Raise the rate by one speed step this many times
        #[arg(long, default_value_t = 0)]
        faster: u32,

        /// Lower the rate by one speed step this many times
        #[arg(long, default_value_t = 0)]
        slower: u32,
    },

    /// Write a blank map
    New {
        /// Grid width in cells
        #[arg(long)]
        width: usize,

        /// Grid height in cells
        #[arg(long)]
        height: usize,

        /// State every cell starts in
        #[arg(short, long, default_value = "dead")]
        fill: CellState,

        /// Map file to create
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Edit cells of a map
    Paint {
        /// Map to edit
        #[arg(short, long)]
        map: PathBuf,

        /// Cell edit as `x,y,state`, may be repeated
        #[arg(short, long = "cell", value_parser = parse_cell_edit)]
        cells: Vec<CellEdit>,

        /// Reset every cell to this state before applying edits
        #[arg(long)]
        clear: Option<CellState>,

        /// Write the result here instead of back to the map
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Check that one map evolves into another
    Validate {
        /// Map to start from
        #[arg(short, long)]
        start: PathBuf,

        /// Map expected after the given number of generations
        #[arg(short, long)]
        target: PathBuf,

        /// Number of generations between the two maps
        #[arg(short, long, default_value_t = 1)]
        generations: usize,
    },

    /// Show statistics for a map, or every map in a directory
    Info {
        /// Map or directory of maps to inspect
        #[arg(short, long)]
        map: PathBuf,
    },

    /// Create example configuration and map files
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CellEdit {
    x: usize,
    y: usize,
    state: CellState,
}

fn parse_cell_edit(value: &str) -> Result<CellEdit, String> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    let [x, y, state] = parts.as_slice() else {
        return Err(format!("expected `x,y,state`, got `{value}`"));
    };

    Ok(CellEdit {
        x: x.parse::<usize>().map_err(|_| format!("invalid x coordinate `{x}`"))?,
        y: y.parse::<usize>().map_err(|_| format!("invalid y coordinate `{y}`"))?,
        state: state.parse::<CellState>().map_err(|e| format!("{e}"))?,
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            map,
            generations,
            save,
            export,
            output,
            show_evolution,
            verbose,
        } => run_command(
            config,
            CliOverrides {
                generations,
                map_file: map,
                output_dir: output,
                ..CliOverrides::default()
            },
            save,
            export,
            show_evolution,
            verbose,
        ),
        Commands::Play {
            config,
            map,
            generations,
            rate,
            faster,
            slower,
        } => play_command(
            config,
            CliOverrides {
                generations,
                cycles_per_second: rate,
                map_file: map,
                ..CliOverrides::default()
            },
            faster,
            slower,
        ),
        Commands::New {
            width,
            height,
            fill,
            output,
        } => new_command(width, height, fill, output),
        Commands::Paint {
            map,
            cells,
            clear,
            output,
            verbose,
        } => paint_command(map, cells, clear, output, verbose),
        Commands::Validate {
            start,
            target,
            generations,
        } => validate_command(start, target, generations).map(|_| ()),
        Commands::Info { map } => info_command(map),
        Commands::Setup { directory, force } => setup_command(directory, force),
    }
}

/// Load configuration, falling back to defaults, then apply overrides
fn load_settings(config_path: &Path, overrides: &CliOverrides) -> Result<Settings> {
    let mut settings = if config_path.exists() {
        Settings::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        println!(
            "{}",
            ColorOutput::warning(&format!(
                "Config file {} not found, using defaults",
                config_path.display()
            ))
        );
        Settings::default()
    };

    settings.merge_with_cli(overrides);
    settings.validate().context("Configuration validation failed")?;
    Ok(settings)
}

fn run_command(
    config_path: PathBuf,
    overrides: CliOverrides,
    save_path: Option<PathBuf>,
    export: bool,
    show_evolution: bool,
    verbose: bool,
) -> Result<()> {
    let settings = load_settings(&config_path, &overrides)?;
    let mut engine = engine_from_settings(&settings).context("Failed to create engine")?;
    let generations = settings.simulation.generations;

    if verbose {
        println!("Configuration:");
        match &settings.input.map_file {
            Some(path) => println!("  Map: {}", path.display()),
            None => println!(
                "  Blank grid: {}x{} {}",
                settings.simulation.width,
                settings.simulation.height,
                settings.simulation.initial_state
            ),
        }
        println!("  Generations: {}", generations);
        println!("  Output dir: {}", settings.output.output_directory.display());
        println!();
    }

    let record = export || show_evolution;
    let mut snapshots = Vec::new();
    if record {
        snapshots.push(Snapshot::capture(engine.generation(), engine.grid()));
    }

    let start_time = Instant::now();
    if record {
        for _ in 0..generations {
            engine.cycle();
            snapshots.push(Snapshot::capture(engine.generation(), engine.grid()));
        }
    } else {
        engine.cycle_n(generations);
    }
    let elapsed = start_time.elapsed();

    if show_evolution {
        for snapshot in &snapshots {
            println!("{}", ColorOutput::info(&format!("Generation {}:", snapshot.generation)));
            println!("{}", GridFormatter::format_grid_compact(&snapshot.grid));
        }
    } else {
        println!("{}", ColorOutput::info(&format!("Generation {}:", engine.generation())));
        println!("{}", GridFormatter::format_grid_colored(engine.grid()));
    }

    println!("{}", GridFormatter::format_statistics(&engine.grid().statistics()));
    println!(
        "{}",
        ColorOutput::success(&format!(
            "Ran {} generation(s) in {:.3}ms",
            generations,
            elapsed.as_secs_f64() * 1000.0
        ))
    );

    if let Some(path) = save_path {
        engine
            .save(&path)
            .with_context(|| format!("Failed to save map to {}", path.display()))?;
        println!("Saved: {}", path.display());
    }

    if export {
        GridFormatter::save_snapshots(
            &snapshots,
            &settings.output.output_directory,
            settings.output.format,
        )
        .context("Failed to export generations")?;
        println!(
            "{}",
            ColorOutput::success(&format!(
                "Generations exported to {}",
                settings.output.output_directory.display()
            ))
        );
    }

    Ok(())
}

fn play_command(
    config_path: PathBuf,
    overrides: CliOverrides,
    faster: u32,
    slower: u32,
) -> Result<()> {
    let settings = load_settings(&config_path, &overrides)?;
    let mut engine = engine_from_settings(&settings).context("Failed to create engine")?;

    let cycler = engine.auto_cycle_mut();
    if !cycler.is_enabled() {
        cycler.toggle();
    }
    apply_speed_steps(cycler, faster, slower);

    let target = settings.simulation.generations as u64;
    draw_frame(&engine);

    let mut last_frame = Instant::now();
    while engine.generation() < target {
        std::thread::sleep(FRAME_TIME);
        let now = Instant::now();
        let fired = engine.advance(now - last_frame);
        last_frame = now;

        if fired > 0 {
            draw_frame(&engine);
        }
    }

    Ok(())
}

/// Step the rate up `faster` times, then down `slower` times
fn apply_speed_steps(cycler: &mut AutoCycler, faster: u32, slower: u32) {
    for _ in 0..faster {
        cycler.speed_up();
    }
    for _ in 0..slower {
        cycler.slow_down();
    }
}

fn draw_frame(engine: &Engine) {
    // Clear screen and home the cursor
    print!("\x1b[2J\x1b[H");
    println!(
        "{}",
        ColorOutput::info(&format!(
            "Generation {} at {:.2} cycles/s",
            engine.generation(),
            engine.auto_cycle().rate()
        ))
    );
    println!("{}", GridFormatter::format_grid_colored(engine.grid()));
}

fn new_command(width: usize, height: usize, fill: CellState, output: PathBuf) -> Result<()> {
    if !dimensions_fit(width, height) {
        anyhow::bail!("A {}x{} map is too large", width, height);
    }

    let grid = Grid::new(width, height, fill);
    save_grid_to_file(&grid, &output)
        .with_context(|| format!("Failed to write map to {}", output.display()))?;
    println!(
        "{}",
        ColorOutput::success(&format!("Created {}x{} map: {}", width, height, output.display()))
    );
    Ok(())
}

fn paint_command(
    map_path: PathBuf,
    cells: Vec<CellEdit>,
    clear: Option<CellState>,
    output: Option<PathBuf>,
    verbose: bool,
) -> Result<()> {
    let mut engine = Engine::from_grid(
        load_grid_from_file(&map_path)
            .with_context(|| format!("Failed to load map from {}", map_path.display()))?,
    );

    if let Some(fill) = clear {
        engine.reset(fill);
        if verbose {
            println!("Cleared {} to {}", map_path.display(), fill);
        }
    }

    let mut applied = 0;
    for edit in &cells {
        if engine.get_state(edit.x, edit.y).is_some() {
            applied += 1;
        } else if verbose {
            println!(
                "{}",
                ColorOutput::warning(&format!("Skipped ({}, {}): outside the grid", edit.x, edit.y))
            );
        }
        engine.set_state(edit.x, edit.y, edit.state);
    }

    let target = output.unwrap_or(map_path);
    engine
        .save(&target)
        .with_context(|| format!("Failed to save map to {}", target.display()))?;

    println!(
        "{}",
        ColorOutput::success(&format!("Painted {} cell(s) into {}", applied, target.display()))
    );
    Ok(())
}

/// Report whether `start` reaches `target`; the result is also returned
fn validate_command(start_path: PathBuf, target_path: PathBuf, generations: usize) -> Result<bool> {
    println!("{}", ColorOutput::info("Validating evolution..."));

    let start = load_grid_from_file(&start_path)
        .with_context(|| format!("Failed to load start map from {}", start_path.display()))?;
    let target = load_grid_from_file(&target_path)
        .with_context(|| format!("Failed to load target map from {}", target_path.display()))?;

    let is_valid = WireWorldRules::validate_evolution(&start, &target, generations);
    if is_valid {
        println!(
            "{}",
            ColorOutput::success(&format!(
                "{} reaches {} after {} generation(s)",
                start_path.display(),
                target_path.display(),
                generations
            ))
        );
    } else {
        println!(
            "{}",
            ColorOutput::error(&format!(
                "{} does not reach {} after {} generation(s)",
                start_path.display(),
                target_path.display(),
                generations
            ))
        );
        if start.dimensions() != target.dimensions() {
            println!(
                "Dimensions differ: {}x{} vs {}x{}",
                start.width(),
                start.height(),
                target.width(),
                target.height()
            );
        }
    }

    Ok(is_valid)
}

fn info_command(map_path: PathBuf) -> Result<()> {
    if map_path.is_dir() {
        let grids = load_grids_from_directory(&map_path)
            .with_context(|| format!("Failed to read maps from {}", map_path.display()))?;
        println!("{} map(s) in {}:", grids.len(), map_path.display());
        for (name, grid) in &grids {
            let stats = grid.statistics();
            println!(
                "  {}: {}x{}, {} conductive, {} head(s)",
                name,
                grid.width(),
                grid.height(),
                stats.conductive(),
                stats.head
            );
        }
        return Ok(());
    }

    let grid = load_grid_from_file(&map_path)
        .with_context(|| format!("Failed to load map from {}", map_path.display()))?;

    let stats = grid.statistics();
    println!("Map {} ({}x{}):", map_path.display(), grid.width(), grid.height());
    println!("{}", GridFormatter::format_grid_with_coords(&grid));
    println!("Grid Statistics:");
    println!("  Wire cells: {}", stats.wire);
    println!("  Electron heads: {}", stats.head);
    println!("  Electron tails: {}", stats.tail);
    println!("  Dead cells: {}", stats.dead);

    let total = grid.width() * grid.height();
    if total > 0 {
        println!("  Density: {:.1}%", (stats.conductive() as f64 / total as f64) * 100.0);
    }

    Ok(())
}

fn setup_command(directory: PathBuf, force: bool) -> Result<()> {
    println!("{}", ColorOutput::info("Setting up project structure..."));

    let config_dir = directory.join("config");
    let maps_dir = directory.join("maps");

    for dir in [&config_dir, &maps_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    // Create default configuration
    let config_path = config_dir.join("default.yaml");
    if !config_path.exists() || force {
        Settings::default()
            .to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("Skipped: {} (already exists)", config_path.display());
    }

    let written = create_example_maps(&maps_dir).context("Failed to create example maps")?;
    println!("Created {} example map(s) in: {}", written.len(), maps_dir.display());

    // A configuration that starts from the clock example
    let mut clock_config = Settings::default();
    clock_config.simulation.generations = 6;
    clock_config.input.map_file = Some(PathBuf::from("maps/clock.wiremap"));
    clock_config.to_file(&config_dir.join("clock.yaml"))?;

    println!("\n{}", ColorOutput::success("Setup complete!"));
    println!("\nNext steps:");
    println!("1. Edit maps in {} with `wireworld paint`", maps_dir.display());
    println!("2. Run: cargo run -- play --config config/clock.yaml");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from([
            "wireworld",
            "run",
            "--config",
            "test.yaml",
            "--generations",
            "5",
        ]);
        assert!(cli.is_ok());

        let new_map = |fill: &str| {
            Cli::try_parse_from([
                "wireworld",
                "new",
                "--width",
                "4",
                "--height",
                "3",
                "--fill",
                fill,
                "-o",
                "a.wiremap",
            ])
        };
        assert!(new_map("wire").is_ok());
        assert!(new_map("plasma").is_err());

        let cli = Cli::try_parse_from([
            "wireworld",
            "paint",
            "-m",
            "a.wiremap",
            "-c",
            "1,2,head",
            "-c",
            "0,0,tail",
        ]);
        match cli.map(|cli| cli.command) {
            Ok(Commands::Paint { cells, clear, .. }) => {
                assert_eq!(cells.len(), 2);
                assert_eq!(clear, None);
            }
            _ => panic!("expected paint command"),
        }

        let cli = Cli::try_parse_from(["wireworld", "play", "--faster", "2", "--slower", "1"]);
        match cli.map(|cli| cli.command) {
            Ok(Commands::Play { faster, slower, .. }) => assert_eq!((faster, slower), (2, 1)),
            _ => panic!("expected play command"),
        }
    }

    #[test]
    fn test_parse_cell_edit() {
        assert_eq!(
            parse_cell_edit("3, 4, head").unwrap(),
            CellEdit {
                x: 3,
                y: 4,
                state: CellState::Head
            }
        );
        assert!(parse_cell_edit("3,4").is_err());
        assert!(parse_cell_edit("-1,4,wire").is_err());
        assert!(parse_cell_edit("1,4,spark").is_err());
    }

    #[test]
    fn test_setup_command() {
        let temp_dir = tempdir().unwrap();
        let result = setup_command(temp_dir.path().to_path_buf(), false);

        assert!(result.is_ok());
        assert!(temp_dir.path().join("config/default.yaml").exists());
        assert!(temp_dir.path().join("maps/clock.wiremap").exists());
    }

    #[test]
    fn test_info_command() {
        let temp_dir = tempdir().unwrap();
        create_example_maps(temp_dir.path()).unwrap();

        assert!(info_command(temp_dir.path().to_path_buf()).is_ok());
        assert!(info_command(temp_dir.path().join("clock.wiremap")).is_ok());
        assert!(info_command(temp_dir.path().join("absent.wiremap")).is_err());
    }

    #[test]
    fn test_new_and_paint_commands() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("blank.wiremap");

        new_command(4, 2, CellState::Wire, path.clone()).unwrap();
        paint_command(
            path.clone(),
            vec![
                CellEdit {
                    x: 1,
                    y: 0,
                    state: CellState::Head,
                },
                CellEdit {
                    x: 9,
                    y: 9,
                    state: CellState::Tail,
                },
            ],
            None,
            None,
            false,
        )
        .unwrap();

        let grid = load_grid_from_file(&path).unwrap();
        assert_eq!(grid.dimensions(), (4, 2));
        assert!(new_command(100_000, 100_000, CellState::Dead, path.clone()).is_err());
        assert_eq!(grid.get(1, 0), CellState::Head);
        assert_eq!(grid.count(CellState::Tail), 0);
        assert_eq!(grid.count(CellState::Wire), 7);
    }

    #[test]
    fn test_run_command_saves_final_generation() {
        let temp_dir = tempdir().unwrap();
        let map = temp_dir.path().join("wire.wiremap");
        let saved = temp_dir.path().join("after.wiremap");
        save_grid_to_file(&Grid::from_rows(&["tH###"]).unwrap(), &map).unwrap();

        run_command(
            temp_dir.path().join("missing.yaml"),
            CliOverrides {
                generations: Some(2),
                map_file: Some(map),
                output_dir: Some(temp_dir.path().join("out")),
                ..CliOverrides::default()
            },
            Some(saved.clone()),
            true,
            false,
            false,
        )
        .unwrap();

        let grid = load_grid_from_file(&saved).unwrap();
        assert_eq!(grid, Grid::from_rows(&["##tH#"]).unwrap());
        assert!(temp_dir.path().join("out/generation_0002.txt").exists());
    }

    #[test]
    fn test_paint_clear_resets_before_edits() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("busy.wiremap");
        let output = temp_dir.path().join("cleared.wiremap");
        save_grid_to_file(&Grid::from_rows(&["tH#", "#.#"]).unwrap(), &path).unwrap();

        paint_command(
            path.clone(),
            vec![CellEdit {
                x: 2,
                y: 1,
                state: CellState::Head,
            }],
            Some(CellState::Wire),
            Some(output.clone()),
            false,
        )
        .unwrap();

        let grid = load_grid_from_file(&output).unwrap();
        assert_eq!(grid, Grid::from_rows(&["###", "##H"]).unwrap());
        // The source map is left alone when writing elsewhere
        assert_eq!(load_grid_from_file(&path).unwrap().count(CellState::Head), 1);
    }

    #[test]
    fn test_apply_speed_steps() {
        let mut cycler = AutoCycler::new(10.0, 0.5).unwrap();
        apply_speed_steps(&mut cycler, 2, 0);
        assert!((cycler.rate() - 22.5).abs() < 1e-9);

        apply_speed_steps(&mut cycler, 0, 1);
        assert!((cycler.rate() - 11.25).abs() < 1e-9);

        apply_speed_steps(&mut cycler, 0, 0);
        assert!((cycler.rate() - 11.25).abs() < 1e-9);
    }

    #[test]
    fn test_validate_command() {
        let temp_dir = tempdir().unwrap();
        let start = temp_dir.path().join("start.wiremap");
        let target = temp_dir.path().join("target.wiremap");
        let other = temp_dir.path().join("other.wiremap");
        save_grid_to_file(&Grid::from_rows(&["tH###"]).unwrap(), &start).unwrap();
        save_grid_to_file(&Grid::from_rows(&["##tH#"]).unwrap(), &target).unwrap();
        save_grid_to_file(&Grid::from_rows(&["##", "##"]).unwrap(), &other).unwrap();

        assert!(validate_command(start.clone(), target.clone(), 2).unwrap());
        assert!(!validate_command(start.clone(), target.clone(), 1).unwrap());
        assert!(!validate_command(start.clone(), other, 2).unwrap());
        assert!(validate_command(start, temp_dir.path().join("absent.wiremap"), 1).is_err());
    }
}
