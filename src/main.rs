use anyhow::Result;
use clap::Parser;
use log::{debug, error, info, trace};
use std::path::PathBuf;
use std::time::Instant;

use awareness_common::{LogFormat, SimulationConfig};
use awareness_engine::Simulation;

/// Runs one awareness diffusion simulation and saves its trail.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the TOML run configuration
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Seed override for the random stream
    #[arg(long)]
    seed: Option<u64>,

    /// Log format override: json, bincode or messagepack
    #[arg(long)]
    format: Option<String>,

    /// Directory receiving the log and statistics files
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,
}

fn main() -> Result<()> {
    // Initialize the logger
    env_logger::init();

    let args = Args::parse();
    info!("Starting Awareness Simulation Engine...");

    // --- Load Configuration ---
    let mut config = SimulationConfig::load(&args.config)?;
    if let Some(seed) = args.seed {
        config.run.seed = Some(seed);
    }
    if config.run.seed.is_none() {
        info!("No seed configured; drawing one from the OS.");
    }
    let run_config = config.run_config(rand::random::<u64>())?;
    info!(
        "Using seed {} (pass --seed {} to reproduce this run).",
        run_config.seed, run_config.seed
    );
    debug!("Run configuration: {:#?}", run_config);

    // --- Initialize Simulation ---
    let mut sim = Simulation::new(run_config)?;
    info!(
        "Network ready: {} cells, {} edges, {} initially aware.",
        sim.graph().num_cells(),
        sim.graph().num_edges(),
        sim.states().count_aware()
    );

    // --- Simulation Loop ---
    let total_steps = sim.config().num_iterations;
    info!("Starting simulation loop for {} iterations...", total_steps);
    let start_time = Instant::now();

    for step in 0..total_steps {
        let step_start_time = Instant::now();
        let record = sim.step();
        let step_duration = step_start_time.elapsed();

        info!(
            "Iteration [{}/{}] | Aware: {} | Aware (not spread): {} | Unaware: {} | Sent: {}",
            step + 1,
            total_steps,
            record.counts.num_aware,
            record.counts.num_unaware_aware,
            record.counts.num_unaware,
            record.transmissions.len()
        );
        debug!("Newly aware cells: {:?}", record.newly_aware());
        trace!(
            "Iteration [{}/{}] completed in {:.3} ms",
            step + 1,
            total_steps,
            step_duration.as_secs_f64() * 1000.0
        );
    }

    let total_duration = start_time.elapsed();
    info!("Simulation finished in {:.3} seconds.", total_duration.as_secs_f64());

    // --- Save Recorded Data ---
    std::fs::create_dir_all(&args.output_dir)?;
    let base_filename = &config.output.base_filename;

    if config.output.save_log {
        let format_name = args
            .format
            .as_deref()
            .or(config.output.format.as_deref())
            .unwrap_or("json");
        let format = match LogFormat::from_name(format_name) {
            Some(format) => format,
            None => {
                error!("Unknown output format: {}. Using JSON instead.", format_name);
                LogFormat::Json
            }
        };
        let filename = args
            .output_dir
            .join(format!("{}_log.{}", base_filename, format.extension()));
        sim.export().write_to(&filename, format)?;
        info!("Simulation log saved to {} ({:?} format)", filename.display(), format);
    } else {
        info!("Skipping saving the simulation log as per config (save_log is false).");
    }

    if config.output.save_stats {
        let filename = args.output_dir.join(format!("{}_stats.csv", base_filename));
        sim.recorder().write_stats_csv(&filename)?;
    } else {
        info!("Skipping saving iteration statistics as per config.");
    }

    info!("Simulation Complete.");
    Ok(())
}
