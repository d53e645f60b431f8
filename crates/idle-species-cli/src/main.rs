use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use idle_species_core::cell::Cell;
use idle_species_core::config::SimConfig;
use idle_species_core::grid::{GridKey, GridTopology};
use idle_species_core::sensors::SensorInputs;
use idle_species_core::world::World;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use tracing::info;

const WARMUP_STEPS: usize = 10;
const BENCHMARK_STEPS: usize = 200;
const BENCHMARK_DENSITY: f64 = 0.2;
/// One step per frame at 60 fps leaves this much headroom.
const TARGET_SPS: f64 = 600.0;

#[derive(Parser)]
#[command(name = "idle-species")]
#[command(about = "Idle Species simulation CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a headless simulation from a config file
    Run {
        /// Path to config file (JSON)
        #[arg(long)]
        config: PathBuf,

        /// Output directory for results (optional)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Number of frames of `frame_dt` to simulate (default: one minute at 60 fps)
        #[arg(long, default_value_t = 3600)]
        frames: usize,

        /// Record metrics every N completed steps
        #[arg(long, default_value_t = 50)]
        sample_every: usize,

        /// Constant ambient noise level in [0,1]
        #[arg(long, default_value_t = 0.0)]
        noise: f64,

        /// Constant ambient light level in [0,1]
        #[arg(long, default_value_t = 0.0)]
        light: f64,

        /// Constant host CPU load in [0,100], enables adaptive population input
        #[arg(long)]
        cpu_load: Option<f64>,

        /// Trigger a meteor every N frames
        #[arg(long)]
        meteor_every: Option<usize>,
    },
    /// Run the step-rate benchmark suite
    Benchmark,
    /// Dump the default configuration to stdout
    DumpDefaultConfig,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Random settled soup covering `density` of the grid.
fn create_cells(topology: &GridTopology, density: f64, seed: u64) -> Vec<Cell> {
    let mut rng = ChaCha12Rng::seed_from_u64(seed);
    let mut cells = Vec::new();
    for gy in 0..topology.rows() {
        for gx in 0..topology.cols() {
            if rng.random::<f64>() < density {
                cells.push(Cell::settled(GridKey::new(gx, gy), topology));
            }
        }
    }
    cells
}

fn run_benchmark(width: f64, height: f64, seed: u64) -> Result<()> {
    // Instant fade-in so newborns count as neighbors on the next step.
    let config = SimConfig {
        viewport_width: width,
        viewport_height: height,
        initial_maturity: 0.5,
        auto_maturity: false,
        fade_speed: 1.0,
        seed,
        ..SimConfig::default()
    };

    config
        .validate()
        .context("Benchmark config validation error")?;

    let topology = GridTopology::from_viewport(width, height, config.grid_step);
    let cells = create_cells(&topology, BENCHMARK_DENSITY, seed);
    let initial = cells.len();
    let mut world = World::with_cells(config, cells).context("failed to initialize world")?;
    let inputs = SensorInputs::default();

    for _ in 0..WARMUP_STEPS {
        world.step(&inputs);
        world.advance(0.0, &inputs);
    }

    let mut total_lookup = 0u64;
    let mut total_evaluate = 0u64;
    let mut total_time = 0u64;

    for _ in 0..BENCHMARK_STEPS {
        let report = world.step(&inputs);
        total_lookup += report.lookup_us;
        total_evaluate += report.evaluate_us;
        total_time += report.total_us;
        world.advance(0.0, &inputs);
    }

    let avg_step_us = (total_time as f64 / BENCHMARK_STEPS as f64).max(1.0);
    let steps_per_sec = 1_000_000.0 / avg_step_us;

    println!(
        "--- {width}x{height} viewport ({} x {} grid, {initial} initial cells) ---",
        topology.cols(),
        topology.rows()
    );
    println!("  Avg step:      {avg_step_us:.0} us ({steps_per_sec:.1} steps/sec)");
    println!(
        "  Breakdown:     lookup={:.0} us, evaluate={:.0} us",
        total_lookup as f64 / BENCHMARK_STEPS as f64,
        total_evaluate as f64 / BENCHMARK_STEPS as f64,
    );

    let verdict = if steps_per_sec >= TARGET_SPS {
        "GO"
    } else {
        "NO-GO"
    };
    println!("  Verdict:       {verdict} (target: >={TARGET_SPS} steps/sec)");
    println!("  Population:    {}", world.population());
    println!();
    Ok(())
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::DumpDefaultConfig => {
            let config = SimConfig::default();
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Commands::Benchmark => {
            if cfg!(debug_assertions) {
                eprintln!("WARNING: running in debug mode. Results are not representative.");
                eprintln!("         Use: cargo run -p idle-species-cli --release -- benchmark");
                eprintln!();
            }
            println!("=== Idle Species Step Benchmark ===");
            println!("Warmup: {WARMUP_STEPS} steps, Benchmark: {BENCHMARK_STEPS} steps");
            println!("Target: >={TARGET_SPS} steps/sec");
            println!();

            let viewports = [
                (640.0, 360.0),
                (1280.0, 720.0),
                (1920.0, 1080.0),
                (3840.0, 2160.0),
            ];
            for (width, height) in viewports {
                run_benchmark(width, height, 42)?;
            }
        }
        Commands::Run {
            config,
            out,
            frames,
            sample_every,
            noise,
            light,
            cpu_load,
            meteor_every,
        } => {
            let file = File::open(&config).context("failed to open config file")?;
            let reader = BufReader::new(file);
            let sim_config: SimConfig =
                serde_json::from_reader(reader).context("failed to parse config")?;

            sim_config.validate().context("Config validation error")?;

            info!(path = ?config, frames, "loaded config");
            println!("Loaded config from {:?}", config);
            println!("Simulating for {} frames...", frames);

            let inputs = SensorInputs {
                noise_level: noise.clamp(0.0, 1.0),
                light_level: light.clamp(0.0, 1.0),
                cpu_load_percent: cpu_load.map(|load| load.clamp(0.0, 100.0)),
            };
            let mut world = World::new(sim_config).context("failed to initialize world")?;
            let summary = world
                .try_run_experiment(frames, sample_every, &inputs, meteor_every)
                .context("invalid run parameters")?;

            if let Some(out_dir) = out {
                std::fs::create_dir_all(&out_dir).context("failed to create output directory")?;
                let summary_path = out_dir.join("summary.json");
                let file = File::create(summary_path).context("failed to create summary file")?;
                serde_json::to_writer_pretty(file, &summary).context("failed to write summary")?;
                println!("Run complete. Results saved to {:?}", out_dir);
            } else {
                println!(
                    "Run complete. {} steps, final population: {}, meteor impacts: {}",
                    summary.steps, summary.final_population, summary.meteor_impacts
                );
            }
        }
    }
    Ok(())
}
