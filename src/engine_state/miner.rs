//! Miners: block-sized markers that wander the world one block at a time.

use cgmath::{Point2, Vector2};
use log::trace;

use super::rendering::{Batch, DrawGroup, GeometrySlot, Shape};

/// Fill color of miner markers.
pub const MINER_COLOR: [u8; 3] = [0xe8, 0xa3, 0x3d];

/// A filled quad that teleports to a neighbouring block at a fixed interval.
pub struct Miner<H> {
    position: Point2<f32>,
    index: Vector2<i32>,
    size: f32,
    step_seconds: f32,
    move_time: f32,
    marker: GeometrySlot<H>,
}

impl<H> Miner<H> {
    /// Spawns a miner whose marker covers the block at `position`.
    ///
    /// # Arguments
    /// * `batch` - Batch the marker is drawn into
    /// * `position` - World-space lower-left corner of the starting block
    /// * `size` - Edge length of one block
    /// * `step_seconds` - Accumulated time between two steps
    pub fn spawn<B: Batch<Handle = H>>(
        batch: &mut B,
        position: Point2<f32>,
        size: f32,
        step_seconds: f32,
    ) -> Self {
        let handle = Shape::QUAD.add_to_batch(
            batch,
            DrawGroup::Miners,
            position.x,
            position.y,
            size,
            size,
            MINER_COLOR,
        );

        let mut marker = GeometrySlot::empty();
        marker.fill(batch, handle);

        Self {
            position,
            index: Vector2::new(0, 0),
            size,
            step_seconds,
            move_time: 0.0,
            marker,
        }
    }

    /// World-space lower-left corner of the block the miner is on.
    pub fn position(&self) -> Point2<f32> {
        self.position
    }

    /// Net displacement from the spawn block, in blocks.
    pub fn index(&self) -> Vector2<i32> {
        self.index
    }

    /// Whether the marker geometry is still held.
    pub fn has_marker(&self) -> bool {
        self.marker.is_occupied()
    }

    /// Advances the step clock by `dt` seconds and teleports once it runs out.
    ///
    /// Returns `true` if the miner moved.
    pub fn update<B: Batch<Handle = H>>(
        &mut self,
        batch: &mut B,
        dt: f32,
        rng: &mut fastrand::Rng,
    ) -> bool {
        self.move_time += dt;
        if self.move_time < self.step_seconds {
            return false;
        }

        self.move_time = 0.0;
        self.teleport(batch, rng);
        true
    }

    /// Moves by a random step in `{-1, 0, 1}` blocks on each axis.
    pub fn teleport<B: Batch<Handle = H>>(&mut self, batch: &mut B, rng: &mut fastrand::Rng) {
        let step = Vector2::new(rng.i32(-1..=1), rng.i32(-1..=1));
        self.index += step;
        self.position += Vector2::new(step.x as f32, step.y as f32) * self.size;

        if let Some(handle) = self.marker.handle() {
            let vertices = Shape::QUAD.vertices(
                self.position.x,
                self.position.y,
                self.size,
                self.size,
                MINER_COLOR,
            );
            batch.set_vertices(handle, &vertices);
        }

        trace!("miner stepped by {step:?} to {:?}", self.position);
    }

    /// Frees the marker geometry. Safe to call repeatedly.
    pub fn release<B: Batch<Handle = H>>(&mut self, batch: &mut B) {
        self.marker.release(batch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::rendering::{MeshBatch, MeshHandle};

    fn spawned(batch: &mut MeshBatch) -> Miner<MeshHandle> {
        Miner::spawn(batch, Point2::new(16.0, 24.0), 8.0, 1.0)
    }

    #[test]
    fn spawn_draws_a_marker_on_the_block() {
        let mut batch = MeshBatch::new();
        let miner = spawned(&mut batch);

        assert!(miner.has_marker());
        assert_eq!(batch.group_count(DrawGroup::Miners), 1);

        let handle = miner.marker.handle().unwrap();
        let vertices = batch.vertices(handle).unwrap();
        assert_eq!(vertices[0].position, [16.0, 24.0, 0.0, 1.0]);
        assert_eq!(vertices[2].position, [24.0, 32.0, 0.0, 1.0]);
    }

    #[test]
    fn miner_waits_for_its_step_interval() {
        let mut batch = MeshBatch::new();
        let mut rng = fastrand::Rng::with_seed(5);
        let mut miner = spawned(&mut batch);

        assert!(!miner.update(&mut batch, 0.4, &mut rng));
        assert!(!miner.update(&mut batch, 0.4, &mut rng));
        assert!(miner.update(&mut batch, 0.4, &mut rng));
        assert!(!miner.update(&mut batch, 0.4, &mut rng));
    }

    #[test]
    fn teleport_moves_at_most_one_block_and_updates_in_place() {
        let mut batch = MeshBatch::new();
        let mut rng = fastrand::Rng::with_seed(5);
        let mut miner = spawned(&mut batch);

        for _ in 0..20 {
            let before = miner.position();
            miner.teleport(&mut batch, &mut rng);
            let moved = miner.position() - before;
            assert!(moved.x.abs() <= 8.0 && moved.y.abs() <= 8.0);
        }

        let expected = Point2::new(16.0, 24.0) + miner.index().cast::<f32>().unwrap() * 8.0;
        assert_eq!(miner.position(), expected);

        let handle = miner.marker.handle().unwrap();
        assert_eq!(batch.vertices(handle).unwrap()[0].position, [expected.x, expected.y, 0.0, 1.0]);
        assert_eq!(batch.live_count(), 1);
        assert_eq!(batch.analytics().handles_created, 1);
    }

    #[test]
    fn release_is_idempotent() {
        let mut batch = MeshBatch::new();
        let mut miner = spawned(&mut batch);

        miner.release(&mut batch);
        miner.release(&mut batch);

        assert!(!miner.has_marker());
        assert_eq!(batch.live_count(), 0);
    }
}
