#![deny(unsafe_code)]
//! CLI binary for the sand garden.
//!
//! Subcommands:
//! - `render <engine>`: run an engine for N frames, write a PNG
//! - `replay <seed.json>`: re-run a saved seed bit for bit, write a PNG
//! - `probe <engine>`: run N frames and print the height and slope at a point
//! - `list`: print available engines
//!
//! Set `RUST_LOG=debug` to see transition diagnostics.

mod error;

use clap::{Args, Parser, Subcommand};
use error::CliError;
use glam::DVec2;
use sand_garden_core::{Engine, Seed};
use sand_garden_engines::pixel::SandRamp;
use sand_garden_engines::EngineKind;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "sand-garden", about = "Raked sand garden height-field simulation")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

/// Options shared by every subcommand that builds a run from flags.
#[derive(Args)]
struct RunArgs {
    /// Engine name (e.g. "sand-garden").
    engine: String,

    /// Field side length in cells.
    #[arg(short = 'n', long, default_value_t = 256)]
    size: usize,

    /// Number of frames to advance.
    #[arg(short, long, default_value_t = 120)]
    frames: usize,

    /// Frame length in milliseconds.
    #[arg(long, default_value_t = sand_garden_core::seed::DEFAULT_FRAME_MS)]
    frame_ms: f64,

    /// Seed for the noise generator and layout draws.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Request a layout change before these frames (repeatable).
    #[arg(long = "change-at")]
    change_at: Vec<usize>,

    /// Engine parameters as a JSON string.
    #[arg(long, default_value = "{}")]
    params: String,
}

impl RunArgs {
    fn to_seed(&self) -> Result<Seed, CliError> {
        let params: serde_json::Value =
            serde_json::from_str(&self.params).map_err(CliError::Params)?;
        let mut seed = Seed::new(&self.engine, self.size, self.seed);
        seed.params = params;
        seed.frames = self.frames;
        seed.frame_ms = self.frame_ms;
        seed.layout_changes = self.change_at.clone();
        Ok(seed)
    }
}

#[derive(Subcommand)]
enum Command {
    /// Run an engine for N frames and write a PNG snapshot.
    Render {
        #[command(flatten)]
        run: RunArgs,

        /// Output file path.
        #[arg(short, long, default_value = "sand.png")]
        output: PathBuf,

        /// Also save the run as a replayable seed file.
        #[arg(long)]
        save_seed: Option<PathBuf>,
    },
    /// Replay a saved seed file and write a PNG snapshot.
    Replay {
        /// Seed file written by `render --save-seed`.
        seed_file: PathBuf,

        /// Output file path.
        #[arg(short, long, default_value = "sand.png")]
        output: PathBuf,
    },
    /// Run an engine for N frames and probe the field at (u, v).
    Probe {
        #[command(flatten)]
        run: RunArgs,

        #[arg(short, long, default_value_t = 0.5)]
        u: f64,

        #[arg(short, long, default_value_t = 0.5)]
        v: f64,
    },
    /// List available engines.
    List,
}

/// Builds the engine a seed names and advances it through every frame,
/// requesting layout changes where the seed schedules them.
fn run_seed(seed: &Seed) -> Result<EngineKind, CliError> {
    seed.validate()?;
    let mut engine = EngineKind::from_name(&seed.engine, seed.size, seed.seed, &seed.params)?;
    for frame in 0..seed.frames {
        if seed.changes_layout_at(frame) && !engine.request_layout_change() {
            log::info!("frame {frame}: layout change skipped, one is already running");
        }
        engine.advance(seed.frame_ms)?;
    }
    Ok(engine)
}

fn read_seed(path: &Path) -> Result<Seed, CliError> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::SeedFile {
        action: "read",
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::MalformedSeed {
        path: path.to_path_buf(),
        source,
    })
}

fn write_seed(seed: &Seed, path: &Path) -> Result<(), CliError> {
    let text = serde_json::to_string_pretty(seed)?;
    std::fs::write(path, text).map_err(|source| CliError::SeedFile {
        action: "write",
        path: path.to_path_buf(),
        source,
    })
}

fn report_render(json: bool, seed: &Seed, output: &Path) -> Result<(), CliError> {
    if json {
        let info = serde_json::json!({
            "engine": seed.engine,
            "size": seed.size,
            "frames": seed.frames,
            "seed": seed.seed,
            "output": output.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        eprintln!(
            "rendered {engine} ({size}x{size}, {frames} frames, seed {seed}) -> {output}",
            engine = seed.engine,
            size = seed.size,
            frames = seed.frames,
            seed = seed.seed,
            output = output.display()
        );
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let engines = EngineKind::list_engines();
            if cli.json {
                let info = serde_json::json!({ "engines": engines });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Engines:");
                for name in engines {
                    println!("  {name}");
                }
            }
        }
        Command::Render {
            run,
            output,
            save_seed,
        } => {
            let seed = run.to_seed()?;
            let engine = run_seed(&seed)?;
            sand_garden_engines::snapshot::write_png(engine.field(), &SandRamp::default(), &output)?;
            if let Some(path) = save_seed {
                write_seed(&seed, &path)?;
            }
            report_render(cli.json, &seed, &output)?;
        }
        Command::Replay { seed_file, output } => {
            let seed = read_seed(&seed_file)?;
            let engine = run_seed(&seed)?;
            sand_garden_engines::snapshot::write_png(engine.field(), &SandRamp::default(), &output)?;
            report_render(cli.json, &seed, &output)?;
        }
        Command::Probe { run, u, v } => {
            let seed = run.to_seed()?;
            let mut engine = run_seed(&seed)?;
            let probe = engine.sand_mut().sample_height(DVec2::new(u, v));
            if cli.json {
                let info = serde_json::json!({
                    "uv": [u, v],
                    "height": probe.height,
                    "gradient": [probe.gradient.x, probe.gradient.y],
                    "state": engine.params()["state"],
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!(
                    "height {:.4} at ({u}, {v}), downhill ({:.5}, {:.5})",
                    probe.height, probe.gradient.x, probe.gradient.y
                );
            }
        }
    }

    Ok(())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
