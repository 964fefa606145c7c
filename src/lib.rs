#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Tile Streamer
//!
//! A 2D chunk streaming engine: a fixed grid of chunks around a panning camera, where chunks
//! that enter the view have their geometry materialized a few sub-regions per tick and chunks
//! that leave it have their geometry released.
//!
//! ## Key Modules
//!
//! * `config` - The JSON world configuration
//! * `core` - Shared single-threaded resources
//! * `engine_state` - The engine: camera, chunk grid, miners, rendering backend and timing
//!
//! ## Architecture
//!
//! The engine is generic over a rendering [`Batch`](engine_state::rendering::Batch). The crate
//! ships an in-memory backend, [`MeshBatch`](engine_state::rendering::MeshBatch), that the
//! headless driver and the tests use. Everything runs on the caller's thread.
//!
//! ## Usage
//!
//! ```no_run
//! fn main() -> std::process::ExitCode {
//!     tile_streamer::run()
//! }
//! ```

use std::f32::consts::TAU;
use std::process::ExitCode;

use log::{error, info};

pub mod config;
pub mod core;
pub mod engine_state;

use config::WorldConfig;
use engine_state::rendering::MeshBatch;
use engine_state::EngineState;

/// What a headless simulation left behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationSummary {
    /// Ticks that were run
    pub ticks: u64,
    /// Chunks whose load finished during the run
    pub loads_completed: u64,
    /// Chunks whose geometry was released during the run
    pub hides: u64,
    /// Live geometry handles left in the batch after shutdown
    pub leftover_handles: usize,
}

/// Runs the headless driver: logging, configuration, simulation and shutdown.
///
/// The configuration path is taken from the first command-line argument; without one the
/// defaults are used.
pub fn run() -> ExitCode {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let config = match std::env::args().nth(1) {
        Some(path) => match WorldConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                error!("{e}");
                return ExitCode::FAILURE;
            }
        },
        None => WorldConfig::default(),
    };

    let summary = simulate(&config);
    if summary.leftover_handles != 0 {
        error!("{} geometry handles leaked", summary.leftover_handles);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Runs `config.simulation_ticks` fixed-timestep ticks while the camera circles the grid.
///
/// Grid status is logged once per simulated second and the timing summary at the end.
pub fn simulate(config: &WorldConfig) -> SimulationSummary {
    let dt = 1.0 / config.tick_rate;
    let ticks_per_second = (config.tick_rate.round() as u64).max(1);
    let mut engine = EngineState::new(MeshBatch::new(), config);

    let mut summary = SimulationSummary {
        ticks: config.simulation_ticks,
        loads_completed: 0,
        hides: 0,
        leftover_handles: 0,
    };

    for tick in 0..config.simulation_ticks {
        let phase = TAU * (tick % config.pan_period_ticks) as f32 / config.pan_period_ticks as f32;
        engine.pan(-phase.sin(), phase.cos());

        let report = engine.update(dt);
        summary.loads_completed += report.completed.is_some() as u64;
        summary.hides += report.hidden.is_some() as u64;

        if (tick + 1) % ticks_per_second == 0 {
            let grid = engine.grid();
            info!(
                "t={}s camera={:?} visible={} pending show={} pending hide={} loading={:?} live={}",
                (tick + 1) / ticks_per_second,
                engine.camera().position,
                grid.chunks().iter().filter(|chunk| chunk.is_visible()).count(),
                grid.visible_pending().len(),
                grid.hidden_pending().len(),
                grid.active_loader(),
                engine.batch().live_count()
            );
        }
    }

    info!("Timings:");
    engine.timer().get().log_summary();

    let batch = engine.shutdown();
    let analytics = batch.analytics();
    info!(
        "shut down: {} handles created, {} deleted, {} vertices written",
        analytics.handles_created, analytics.handles_deleted, analytics.vertices_written
    );

    summary.leftover_handles = batch.live_count();
    summary
}
