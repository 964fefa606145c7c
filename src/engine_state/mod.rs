//! # Engine State Module
//!
//! The coordinator that ties the streaming world together.
//!
//! ## Key Components
//!
//! * `EngineState` - Owns the batch, the camera, the chunk grid and the miners
//! * `camera_state` - The panning 2D camera
//! * `miner` - Wandering block markers
//! * `profiling` - Timing hooks for the per-tick update path
//! * `rendering` - The batch contract and the in-memory backend
//! * `tiles` - Chunks, their load scheduling and the grid that owns them
//!
//! ## Architecture
//!
//! `EngineState` is generic over the [`Batch`] it draws into. Every subsystem borrows that batch
//! only for the duration of a call, so the engine can hand it back untouched by any live
//! borrows when it shuts down.
//!
//! ## Tick
//!
//! 1. The camera rectangle is widened by the load margin to form the view
//! 2. Miners advance their step clocks and move
//! 3. The chunk grid runs one scheduling tick against the view

use cgmath::{Point2, Vector2};
use log::{debug, info};
use web_time::Instant;

use camera_state::Camera;
use miner::Miner;
use profiling::{Timer, UpdateObserver};
use rendering::Batch;
use tiles::chunk::CHUNK_DIMENSION;
use tiles::{ChunkGrid, Rectangle, UpdateReport};

use crate::config::WorldConfig;
use crate::core::StResource;

pub mod camera_state;
pub mod miner;
pub mod profiling;
pub mod rendering;
pub mod tiles;

/// Name under which `EngineState::update` is timed.
pub const ENGINE_UPDATE_OPERATION: &str = "EngineState::update";

/// The streaming world and everything that draws into its batch.
///
/// # Examples
///
/// ```
/// use tile_streamer::config::WorldConfig;
/// use tile_streamer::engine_state::EngineState;
/// use tile_streamer::engine_state::rendering::MeshBatch;
///
/// let config = WorldConfig { seed: Some(7), ..WorldConfig::default() };
/// let mut engine = EngineState::new(MeshBatch::new(), &config);
///
/// for _ in 0..8 {
///     engine.update(1.0 / 60.0);
/// }
/// engine.pan(1.0, 0.0);
///
/// let batch = engine.shutdown();
/// assert_eq!(batch.live_count(), 0);
/// ```
pub struct EngineState<B: Batch> {
    batch: B,
    camera: Camera,
    grid: ChunkGrid<B::Handle>,
    miners: Vec<Miner<B::Handle>>,
    timer: StResource<Timer>,
    load_margin: f32,
    rng: fastrand::Rng,
}

impl<B: Batch> EngineState<B> {
    /// Builds the world described by `config` on top of `batch`.
    ///
    /// The camera starts at the origin and the grid is centred on the camera's view. Miners
    /// all spawn on one random block of the centre chunk.
    pub fn new(mut batch: B, config: &WorldConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };

        let camera = Camera::new(
            Point2::new(0.0, 0.0),
            Vector2::new(config.viewport[0], config.viewport[1]),
            config.camera_speed,
        );

        let timer: StResource<Timer> = StResource::default();
        let grid: ChunkGrid<B::Handle> =
            ChunkGrid::new(camera.center(), config).with_observer(Box::new(timer.clone()));

        let center = grid.chunk(grid.len() / 2).offset();
        let (i, j) = (
            rng.usize(..CHUNK_DIMENSION) as f32,
            rng.usize(..CHUNK_DIMENSION) as f32,
        );
        let spawn = Point2::new(
            center.x + i * config.block_size,
            center.y + j * config.block_size,
        );

        let miners = (0..config.miner_count)
            .map(|_| Miner::spawn(&mut batch, spawn, config.block_size, config.miner_step_seconds))
            .collect();

        info!(
            "built {0}x{0} grid around {1:?} with {2} miners at {spawn:?}",
            grid.dimension(),
            camera.center(),
            config.miner_count
        );

        Self {
            batch,
            camera,
            grid,
            miners,
            timer,
            load_margin: config.load_margin,
            rng,
        }
    }

    /// Runs one tick of `dt` seconds.
    pub fn update(&mut self, dt: f32) -> UpdateReport {
        let started = Instant::now();

        let view = self.view();
        for miner in self.miners.iter_mut() {
            miner.update(&mut self.batch, dt, &mut self.rng);
        }
        let report = self.grid.update(&mut self.batch, &view);

        self.timer
            .get_mut()
            .observe(ENGINE_UPDATE_OPERATION, started.elapsed());

        report
    }

    /// Pans the camera by `(dx, dy)` units of input.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.camera.move_by(dx, dy);
    }

    /// The camera rectangle widened by the load margin.
    pub fn view(&self) -> Rectangle {
        self.camera
            .rectangle()
            .scale(self.load_margin, self.load_margin)
    }

    /// The batch all geometry is drawn into.
    pub fn batch(&self) -> &B {
        &self.batch
    }

    /// The camera.
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// The chunk grid.
    pub fn grid(&self) -> &ChunkGrid<B::Handle> {
        &self.grid
    }

    /// The miners.
    pub fn miners(&self) -> &[Miner<B::Handle>] {
        &self.miners
    }

    /// Shared handle to the timer collecting update timings.
    pub fn timer(&self) -> StResource<Timer> {
        self.timer.clone()
    }

    /// Releases every piece of geometry and hands the batch back.
    pub fn shutdown(mut self) -> B {
        self.grid.release_all(&mut self.batch);
        for miner in self.miners.iter_mut() {
            miner.release(&mut self.batch);
        }
        debug!("engine shut down");

        self.batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::rendering::{DrawGroup, MeshBatch};
    use crate::engine_state::tiles::chunk::BLOCKS_PER_CHUNK;

    fn engine() -> EngineState<MeshBatch> {
        let config = WorldConfig {
            seed: Some(21),
            ..WorldConfig::default()
        };
        EngineState::new(MeshBatch::new(), &config)
    }

    #[test]
    fn grid_is_centred_on_the_initial_view() {
        let engine = engine();

        assert_eq!(engine.camera().center(), Point2::new(400.0, 320.0));
        assert_eq!(
            engine.grid().chunk(12).rectangle(),
            Rectangle::new(336.0, 256.0, 128.0, 128.0)
        );
        assert_eq!(engine.view(), Rectangle::new(-32.0, -32.0, 864.0, 704.0));
    }

    #[test]
    fn miners_spawn_together_inside_the_centre_chunk() {
        let engine = engine();
        let centre = engine.grid().chunk(12).rectangle();

        assert_eq!(engine.miners().len(), 10);
        let spawn = engine.miners()[0].position();
        assert!(engine.miners().iter().all(|miner| miner.position() == spawn));
        assert!(centre.contains_point(spawn));
        assert_eq!(engine.batch().group_count(DrawGroup::Miners), 10);
    }

    #[test]
    fn every_chunk_in_view_loads_four_ticks_apiece() {
        let mut engine = engine();

        for _ in 0..100 {
            engine.update(1.0 / 60.0);
        }

        assert!(engine.grid().chunks().iter().all(|chunk| chunk.loaded_slots() == BLOCKS_PER_CHUNK));
        assert_eq!(engine.grid().active_loader(), None);
        assert_eq!(engine.batch().live_count(), 25 * (BLOCKS_PER_CHUNK + 1) + 10);
    }

    #[test]
    fn updates_are_timed_at_both_levels() {
        let mut engine = engine();
        engine.update(0.1);
        engine.update(0.1);

        let timer = engine.timer();
        let timer = timer.get();
        assert_eq!(timer.operation(ENGINE_UPDATE_OPERATION).unwrap().iterations, 2);
        assert_eq!(timer.operation(tiles::grid::GRID_UPDATE_OPERATION).unwrap().iterations, 2);
    }

    #[test]
    fn shutdown_mid_load_releases_everything() {
        let mut engine = engine();
        for _ in 0..6 {
            engine.update(0.5);
        }
        assert!(engine.grid().active_loader().is_some());

        let batch = engine.shutdown();
        assert_eq!(batch.live_count(), 0);
        assert_eq!(batch.analytics().handles_created, batch.analytics().handles_deleted);
    }
}
