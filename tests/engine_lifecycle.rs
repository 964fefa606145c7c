//! # Engine Lifecycle Integration Test
//!
//! Builds engines from configuration, runs them through camera pans and shuts them down.

use std::io::Write;

use tempfile::NamedTempFile;
use tile_streamer::config::{ConfigError, WorldConfig};
use tile_streamer::engine_state::rendering::{DrawGroup, MeshBatch};
use tile_streamer::engine_state::tiles::ChunkState;
use tile_streamer::engine_state::{EngineState, ENGINE_UPDATE_OPERATION};
use tile_streamer::simulate;

fn seeded(seed: u64) -> WorldConfig {
    WorldConfig {
        seed: Some(seed),
        ..WorldConfig::default()
    }
}

/// Test: The default circular pan loads, unloads and shuts down without leaking.
#[test]
fn test_default_simulation_leaves_no_handles() {
    let summary = simulate(&seeded(42));

    assert_eq!(summary.ticks, 600);
    assert!(summary.loads_completed > 0);
    assert!(summary.hides > 0);
    assert_eq!(summary.leftover_handles, 0);
}

/// Test: Panning the camera away releases every chunk; miners stay drawn until shutdown.
#[test]
fn test_panning_away_releases_chunks() {
    let mut engine = EngineState::new(MeshBatch::new(), &seeded(3));

    for _ in 0..100 {
        engine.update(1.0 / 60.0);
    }
    assert_eq!(engine.batch().group_count(DrawGroup::Border), 25);

    // 200 units of input at speed 10 moves the view 2000 units east.
    engine.pan(200.0, 0.0);
    for _ in 0..60 {
        engine.update(1.0 / 60.0);
    }

    assert!(engine.grid().chunks().iter().all(|c| c.state() == ChunkState::Hidden));
    assert_eq!(engine.batch().group_count(DrawGroup::Blocks), 0);
    assert_eq!(engine.batch().live_count(), 10);

    let batch = engine.shutdown();
    assert_eq!(batch.live_count(), 0);
}

/// Test: The timer handle shared with the engine sees every tick.
#[test]
fn test_timer_handle_outlives_the_engine() {
    let mut engine = EngineState::new(MeshBatch::new(), &seeded(9));
    let timer = engine.timer();

    for _ in 0..12 {
        engine.update(0.25);
    }
    drop(engine.shutdown());

    let timer = timer.get();
    let update = timer.operation(ENGINE_UPDATE_OPERATION).unwrap();
    assert_eq!(update.iterations, 12);
    assert!(update.min <= update.max);
    assert_eq!(timer.summary().len(), 2);
}

/// Test: A configuration file drives a short simulation.
#[test]
fn test_config_file_drives_simulation() {
    let mut file = NamedTempFile::new().expect("temp file");
    write!(
        file,
        r#"{{
            "grid_dimension": 3,
            "ordering": "shuffled",
            "seed": 17,
            "miner_count": 2,
            "simulation_ticks": 120,
            "pan_period_ticks": 60
        }}"#
    )
    .expect("write config");

    let config = WorldConfig::load(file.path()).unwrap();
    assert_eq!(config.grid_dimension, 3);

    let summary = simulate(&config);
    assert_eq!(summary.ticks, 120);
    assert!(summary.loads_completed > 0);
    assert_eq!(summary.leftover_handles, 0);
}

/// Test: Broken configuration files are reported, not defaulted.
#[test]
fn test_broken_config_is_rejected() {
    let mut file = NamedTempFile::new().expect("temp file");
    write!(file, r#"{{ "viewport": [0.0, 640.0] }}"#).expect("write config");
    assert!(matches!(WorldConfig::load(file.path()), Err(ConfigError::Invalid(_))));

    let mut file = NamedTempFile::new().expect("temp file");
    write!(file, "not json").expect("write config");
    assert!(matches!(WorldConfig::load(file.path()), Err(ConfigError::Parse(_))));
}
