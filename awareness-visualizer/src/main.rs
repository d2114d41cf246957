mod layout;
mod render;
mod report;

use anyhow::{Context, Result};
use awareness_common::{CellSnapshot, SimulationLog};
use clap::Parser;
use env_logger::Builder;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn, LevelFilter};
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::layout::spring_layout;
use crate::render::{draw_counts_chart, draw_network_frame, transmission_edges, FrameGeometry};
use crate::report::{build_html_report, frame_file_name, CHART_FILE_NAME, REPORT_FILE_NAME};

/// Command-line arguments for the visualizer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Simulation log to render (.json, .bin or .msgpack)
    #[arg(short, long)]
    input: PathBuf,

    /// Directory receiving the frames and the HTML report
    #[arg(short, long, default_value = "report")]
    output_dir: PathBuf,

    /// Width of each frame in pixels
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Height of each frame in pixels (same as width if not provided)
    #[arg(long)]
    height: Option<u32>,

    /// Rounds of force-directed layout
    #[arg(long, default_value_t = 50)]
    layout_iterations: u32,

    /// Seed for the initial layout positions
    #[arg(long, default_value_t = 0)]
    layout_seed: u64,
}

/// One frame to draw: the state after `iteration` plus the edges used so far.
struct FrameJob<'a> {
    iteration: u32,
    states: &'a [CellSnapshot],
    highlighted: HashSet<(u32, u32)>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    run_with_args(args)
}

fn run_with_args(args: Args) -> Result<()> {
    // A second init (tests) keeps the first logger.
    let _ = Builder::from_default_env().filter(None, LevelFilter::Info).try_init();

    info!("Starting Awareness Visualizer...");
    info!("Input log: {}", args.input.display());
    info!("Output directory: {}", args.output_dir.display());

    let log = SimulationLog::read_from(&args.input)?;
    info!(
        "Loaded log: {} cells, {} edges, {} iterations.",
        log.num_cells(),
        log.edges.len(),
        log.iterations.len()
    );
    if log.num_cells() == 0 {
        warn!("Log contains no cells; frames will be blank.");
    }

    fs::create_dir_all(&args.output_dir)
        .with_context(|| {
            format!("Failed to create output directory '{}'", args.output_dir.display())
        })?;

    // --- Layout ---
    let layout_start = Instant::now();
    let positions = spring_layout(
        log.num_cells(),
        &log.edges,
        args.layout_iterations,
        args.layout_seed,
    );
    debug!(
        "Layout of {} cells computed in {:.2?} ({} rounds, seed {})",
        positions.len(),
        layout_start.elapsed(),
        args.layout_iterations,
        args.layout_seed
    );

    let width = args.width.max(1);
    let height = args.height.unwrap_or(width).max(1);
    let geometry = FrameGeometry {
        width,
        height,
        margin: (width.min(height) / 20).max(2),
        node_radius: ((width.min(height) as f32 / 100.0).round() as i32).max(2),
    };

    // --- Frames ---
    let mut jobs = Vec::with_capacity(log.iterations.len() + 1);
    jobs.push(FrameJob {
        iteration: 0,
        states: &log.initial_states,
        highlighted: HashSet::new(),
    });
    for record in &log.iterations {
        jobs.push(FrameJob {
            iteration: record.iteration_number,
            states: &record.after_states,
            highlighted: transmission_edges(log.transmissions_through(record.iteration_number)),
        });
    }

    let progress_bar = ProgressBar::new(jobs.len() as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template(
                "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} frames ({percent}%) [{eta}]",
            )?
            .progress_chars("#>-"),
    );
    progress_bar.set_message("Rendering frames");

    let render_start = Instant::now();
    jobs.par_iter().try_for_each(|job| -> Result<()> {
        let image =
            draw_network_frame(job.states, &log.edges, &job.highlighted, &positions, geometry);
        let path = args.output_dir.join(frame_file_name(job.iteration));
        image
            .save(&path)
            .with_context(|| format!("Failed to write frame {}", path.display()))?;
        progress_bar.inc(1);
        Ok(())
    })?;
    progress_bar.finish_with_message(format!("Rendered {} frames", jobs.len()));
    info!("Rendered {} frames in {:.2?}", jobs.len(), render_start.elapsed());

    if log.iterations.len() >= 2 {
        let chart = draw_counts_chart(&log.iterations, log.num_cells(), width, height / 2);
        let path = args.output_dir.join(CHART_FILE_NAME);
        chart
            .save(&path)
            .with_context(|| format!("Failed to write chart {}", path.display()))?;
    }

    // --- Report ---
    let log_link = place_log_beside_report(&args.input, &args.output_dir)?;
    let report_path = args.output_dir.join(REPORT_FILE_NAME);
    fs::write(&report_path, build_html_report(&log, &log_link))
        .with_context(|| format!("Failed to write report {}", report_path.display()))?;
    info!("Report saved to: {}", report_path.display());

    Ok(())
}

/// Copies the input log next to the report so the page links it by file name.
fn place_log_beside_report(input: &Path, output_dir: &Path) -> Result<String> {
    let file_name = input
        .file_name()
        .with_context(|| format!("Input path '{}' has no file name", input.display()))?;
    let target = output_dir.join(file_name);

    let same_file = match (fs::canonicalize(input), fs::canonicalize(&target)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    };
    if !same_file {
        fs::copy(input, &target)
            .with_context(|| format!("Failed to copy log to {}", target.display()))?;
    }
    Ok(file_name.to_string_lossy().into_owned())
}
