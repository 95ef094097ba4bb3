use bevy::math::Vec2;
use clap::Parser;
use std::path::PathBuf;
use std::sync::mpsc::channel;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use wavegrowth::config::{load_config, load_from_path, save_config};
use wavegrowth::game_logic::errors::GrowthResult;
use wavegrowth::map::NoiseTerrain;
use wavegrowth::spatial::SpatialHash;
use wavegrowth::terrain::geometry::Polygon;
use wavegrowth::waves::{WaveEvent, WaveOrchestrator, WaveOutcome, WaveScheduler};

mod wavegen {
    pub mod cli_utils;
}

use wavegen::cli_utils::*;

#[derive(Parser, Clone)]
#[command(name = "wavegen")]
#[command(about = "Grow a playable area wave by wave and report what each wave placed")]
struct Args {
    /// Config file to load instead of the one in the platform config directory
    #[arg(long)]
    config: Option<PathBuf>,

    /// Growth strategy (grid, polygon)
    #[arg(long)]
    strategy: Option<String>,

    /// Initial plateau size in cells, centered on the origin (format: WIDTHxHEIGHT)
    #[arg(long, default_value = "8x8")]
    size: String,

    /// Grid layers painted per wave
    #[arg(long)]
    band_width: Option<u32>,

    /// Grid neighborhood (4 or 8)
    #[arg(long)]
    connectivity: Option<String>,

    /// Polygon offset per wave in world units
    #[arg(long)]
    ring_thickness: Option<f32>,

    /// What each wave populates (population, combat, both)
    #[arg(long)]
    mode: Option<String>,

    /// Random seed for reproducible placement
    #[arg(long)]
    seed: Option<u64>,

    /// Seed for the terrain noise
    #[arg(long, default_value = "7")]
    terrain_seed: u32,

    /// Number of waves to run
    #[arg(long, default_value = "5")]
    waves: u32,

    /// Player position used to keep enemies at a distance (format: X,Y)
    #[arg(long, default_value = "0,0")]
    player: String,

    /// Write the effective settings to the platform config file
    #[arg(long)]
    save_config: bool,

    /// Print every placement, not just per-wave totals
    #[arg(long)]
    verbose: bool,
}

fn main() -> GrowthResult<()> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_from_path(path)?,
        None => load_config(),
    };
    if let Some(strategy) = &args.strategy {
        config.growth.strategy = parse_strategy(strategy)?;
    }
    if let Some(band_width) = args.band_width {
        config.growth.band_width = band_width.into();
    }
    if let Some(connectivity) = &args.connectivity {
        config.growth.connectivity = parse_connectivity(connectivity)?;
    }
    if let Some(thickness) = args.ring_thickness {
        config.growth.ring_thickness = thickness.into();
    }
    if let Some(mode) = &args.mode {
        config.schedule.mode = parse_mode(mode)?;
    }
    if let Some(seed) = args.seed {
        config.schedule.seed = seed;
    }
    config.check()?;

    if args.save_config {
        save_config(&config)?;
        println!("Saved settings to the platform config directory");
    }

    let (width, height) = parse_size(&args.size)?;
    let player = parse_position(&args.player)?;
    let cell_size = config.growth.cell_size.get();
    let half = Vec2::new(width as f32, height as f32) * cell_size / 2.0;
    let boundary = Polygon::rectangle(-half, half);

    let spatial = SpatialHash::new(cell_size);
    let terrain = NoiseTerrain::meadow_forest_rock(args.terrain_seed);
    let interval = config.schedule.interval.get();
    let mut scheduler = WaveScheduler::from_settings(&config.schedule);
    let mut orchestrator =
        WaveOrchestrator::from_config(boundary, Box::new(terrain), config, &spatial);
    let (events, received) = channel::<WaveEvent>();
    orchestrator.register_listener(Box::new(events));

    println!(
        "Growing {}x{} plateau with {} strategy, {} waves",
        width,
        height,
        orchestrator.strategy().name(),
        args.waves
    );

    let mut completed = 0;
    while completed < args.waves {
        let outcomes = scheduler.drive(
            Duration::from_secs_f32(interval),
            &mut orchestrator,
            &spatial,
            player,
        )?;
        for outcome in outcomes {
            match outcome {
                WaveOutcome::Completed(report) => {
                    completed += 1;
                    println!(
                        "Wave {:>3}: {:>5} new cells, {:>2} surfaces, {:>3} props, {:>3} enemies, {:>2} shortfalls",
                        report.wave_index,
                        report.band.len(),
                        report.surfaces.len(),
                        report.props.len(),
                        report.enemies.len(),
                        report.shortfalls.len()
                    );
                    if args.verbose {
                        for placement in report.props.iter().chain(&report.enemies) {
                            println!(
                                "    {:?} {} on {} at ({:.2}, {:.2}) scale {:.2}{}",
                                placement.kind,
                                placement.variant,
                                placement.terrain,
                                placement.position.x,
                                placement.position.y,
                                placement.scale,
                                if placement.flipped { " flipped" } else { "" }
                            );
                        }
                    }
                }
                WaveOutcome::Exhausted { wave_index } => {
                    println!("Wave {wave_index}: growth exhausted, stopping");
                    return Ok(());
                }
            }
        }
    }

    let missing: usize = received
        .try_iter()
        .filter_map(|event| match event {
            WaveEvent::Shortfall { missing, .. } => Some(missing),
            _ => None,
        })
        .sum();
    println!(
        "Done: {} cells filled, {} props standing, {} placements lost to crowding",
        orchestrator.strategy().filled().len(),
        orchestrator.placed_props().len(),
        missing
    );
    Ok(())
}
