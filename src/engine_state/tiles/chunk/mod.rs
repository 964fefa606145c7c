//! # Chunk Module
//!
//! A chunk is one 16x16-block cell of the world grid. It owns the block data for its cell and
//! every piece of geometry drawn for it: one outline per block plus the chunk boundary.
//!
//! ## Life Cycle
//!
//! ```text
//! Hidden -> VisiblePending -> Loading -> VisibleLoaded -> Hiding -> Hidden
//! ```
//!
//! The owning grid flips the `visible` flag; the chunk reacts:
//! - `show` queues all 16 sub-regions in load order and creates the boundary outline
//! - `process` materializes at most [`SUBREGIONS_PER_STEP`] queued sub-regions per call
//! - `hide` releases every geometry handle and drops the queue, whatever the load progress
//!
//! ## Slot Layout
//!
//! Geometry slots are grouped by sub-region: the block at column `m`, row `n` of sub-region
//! `(i, j)` lives in slot `j*64 + i*16 + n*4 + m`, so loading one sub-region touches 16
//! consecutive slots.

use std::fmt;

use cgmath::Point2;
use log::{debug, trace, warn};

use super::block::Block;
use super::rectangle::Rectangle;
use crate::engine_state::rendering::{Batch, DrawGroup, GeometrySlot, Shape};

pub mod traversal;

use traversal::{OrderingPolicy, SubregionIndex, SubregionQueue};
pub use traversal::{SUBREGIONS_PER_SIDE, SUBREGION_COUNT};

/// Blocks along one side of a chunk.
pub const CHUNK_DIMENSION: usize = 16;
/// Blocks in a chunk.
pub const BLOCKS_PER_CHUNK: usize = CHUNK_DIMENSION * CHUNK_DIMENSION;
/// Blocks along one side of a sub-region.
pub const SUBREGION_DIMENSION: usize = 4;
/// Blocks in a sub-region.
pub const BLOCKS_PER_SUBREGION: usize = SUBREGION_DIMENSION * SUBREGION_DIMENSION;
/// Upper bound on sub-regions materialized by one `process` call.
pub const SUBREGIONS_PER_STEP: usize = 4;

/// Outline color of block geometry.
pub const BLOCK_COLOR: [u8; 3] = [0x3e, 0x41, 0x4e];
/// Outline color of the chunk boundary.
pub const BOUNDARY_COLOR: [u8; 3] = [0xff, 0xff, 0xff];

/// Observable stage of a chunk's life cycle, derived from its flags and resources.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChunkState {
    /// Invisible and holding no geometry
    Hidden,
    /// Visible, waiting for the grid to start its load
    VisiblePending,
    /// Visible with sub-regions still queued
    Loading,
    /// Visible and fully materialized
    VisibleLoaded,
    /// Invisible but still holding geometry awaiting release
    Hiding,
}

/// Slot index of the block at `(m, n)` inside sub-region `subregion`.
pub fn block_index(subregion: SubregionIndex, m: usize, n: usize) -> usize {
    let (i, j) = (subregion.i as usize, subregion.j as usize);
    j * SUBREGION_DIMENSION * CHUNK_DIMENSION
        + i * BLOCKS_PER_SUBREGION
        + n * SUBREGION_DIMENSION
        + m
}

/// Slot index of the block at chunk-local column `x`, row `y`.
pub fn block_index_at(x: usize, y: usize) -> usize {
    let subregion = SubregionIndex::new(
        (x / SUBREGION_DIMENSION) as u8,
        (y / SUBREGION_DIMENSION) as u8,
    );
    block_index(subregion, x % SUBREGION_DIMENSION, y % SUBREGION_DIMENSION)
}

/// One cell of the chunk grid together with the geometry drawn for it.
///
/// `H` is the geometry handle type of the batch the chunk draws into.
pub struct Chunk<H> {
    id: usize,
    offset: Point2<f32>,
    block_size: f32,
    visible: bool,
    blocks: [Block; BLOCKS_PER_CHUNK],
    slots: Box<[GeometrySlot<H>]>,
    boundary: GeometrySlot<H>,
    pending: SubregionQueue,
}

impl<H> Chunk<H> {
    /// Creates a hidden chunk with random block values.
    ///
    /// # Arguments
    /// * `id` - Index of the chunk in its grid
    /// * `offset` - World-space position of the chunk's lower-left corner
    /// * `block_size` - World-space edge length of one block
    /// * `rng` - Source of the block values
    pub fn new(id: usize, offset: Point2<f32>, block_size: f32, rng: &mut fastrand::Rng) -> Self {
        Self {
            id,
            offset,
            block_size,
            visible: false,
            blocks: std::array::from_fn(|_| Block::random(rng)),
            slots: (0..BLOCKS_PER_CHUNK).map(|_| GeometrySlot::empty()).collect(),
            boundary: GeometrySlot::empty(),
            pending: SubregionQueue::new(),
        }
    }

    /// Index of the chunk in its grid.
    pub fn id(&self) -> usize {
        self.id
    }

    /// World-space lower-left corner.
    pub fn offset(&self) -> Point2<f32> {
        self.offset
    }

    /// Whether the grid currently considers the chunk visible.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Sets the visibility flag. Resources are untouched until `show` or `hide` runs.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// World-space extent of the chunk.
    pub fn rectangle(&self) -> Rectangle {
        let size = CHUNK_DIMENSION as f32 * self.block_size;
        Rectangle::new(self.offset.x, self.offset.y, size, size)
    }

    /// Block at chunk-local column `x`, row `y`.
    ///
    /// # Panics
    /// Panics if either coordinate is not below [`CHUNK_DIMENSION`].
    pub fn block(&self, x: usize, y: usize) -> &Block {
        assert!(x < CHUNK_DIMENSION && y < CHUNK_DIMENSION);
        &self.blocks[block_index_at(x, y)]
    }

    /// Mutable block at chunk-local column `x`, row `y`.
    ///
    /// # Panics
    /// Panics if either coordinate is not below [`CHUNK_DIMENSION`].
    pub fn block_mut(&mut self, x: usize, y: usize) -> &mut Block {
        assert!(x < CHUNK_DIMENSION && y < CHUNK_DIMENSION);
        &mut self.blocks[block_index_at(x, y)]
    }

    /// Whether the slot at `index` holds geometry.
    pub fn is_slot_loaded(&self, index: usize) -> bool {
        self.slots[index].is_occupied()
    }

    /// Number of slots holding geometry.
    pub fn loaded_slots(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_occupied()).count()
    }

    /// Whether the boundary outline exists.
    pub fn has_boundary(&self) -> bool {
        self.boundary.is_occupied()
    }

    /// Number of sub-regions still queued for loading.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// The sub-region the next `process` call starts with.
    pub fn next_subregion(&self) -> Option<SubregionIndex> {
        self.pending.iter().next().copied()
    }

    /// Whether the chunk holds no geometry and has nothing queued.
    pub fn is_fully_released(&self) -> bool {
        self.pending.is_empty() && !self.has_boundary() && self.loaded_slots() == 0
    }

    /// Current life-cycle stage.
    pub fn state(&self) -> ChunkState {
        match (self.visible, self.is_fully_released()) {
            (false, true) => ChunkState::Hidden,
            (false, false) => ChunkState::Hiding,
            (true, _) if !self.pending.is_empty() => ChunkState::Loading,
            (true, _) if self.has_boundary() => ChunkState::VisibleLoaded,
            (true, _) => ChunkState::VisiblePending,
        }
    }

    /// Starts loading: queues every sub-region in `ordering`'s order and draws the boundary.
    ///
    /// Does nothing unless the chunk is flagged visible.
    pub fn show<B: Batch<Handle = H>>(
        &mut self,
        batch: &mut B,
        view: &Rectangle,
        ordering: OrderingPolicy,
        rng: &mut fastrand::Rng,
    ) {
        if !self.visible {
            warn!("show called on hidden {self}");
            return;
        }

        let rectangle = self.rectangle();
        ordering.fill(&mut self.pending, rectangle.center(), view.center(), rng);

        let boundary = Shape::LINE_QUAD.add_to_batch(
            batch,
            DrawGroup::Border,
            rectangle.x,
            rectangle.y,
            rectangle.w,
            rectangle.h,
            BOUNDARY_COLOR,
        );
        self.boundary.fill(batch, boundary);

        debug!("showing {self}, starting at {:?}", self.next_subregion());
    }

    /// Materializes up to [`SUBREGIONS_PER_STEP`] queued sub-regions.
    ///
    /// Returns `true` once nothing is left queued.
    pub fn process<B: Batch<Handle = H>>(&mut self, batch: &mut B) -> bool {
        for _ in 0..SUBREGIONS_PER_STEP {
            let Some(subregion) = self.pending.pop() else {
                break;
            };
            self.load_subregion(batch, subregion);
        }

        self.pending.is_empty()
    }

    /// Drops queued sub-regions without touching geometry that is already materialized.
    pub fn cancel_load(&mut self) {
        self.pending.clear();
    }

    /// Releases every geometry handle and drops queued work.
    ///
    /// Does nothing while the chunk is flagged visible. Safe to call repeatedly.
    pub fn hide<B: Batch<Handle = H>>(&mut self, batch: &mut B) {
        if self.visible {
            warn!("hide called on visible {self}");
            return;
        }

        let mut released = 0;
        for slot in self.slots.iter_mut() {
            if slot.release(batch) {
                released += 1;
            }
        }
        self.pending.clear();
        self.boundary.release(batch);

        debug!("hid {self}, released {released} block outlines");
    }

    fn load_subregion<B: Batch<Handle = H>>(&mut self, batch: &mut B, subregion: SubregionIndex) {
        trace!("{self}: loading sub-region {subregion:?}");

        let size = self.block_size;
        let base_x = subregion.i as usize * SUBREGION_DIMENSION;
        let base_y = subregion.j as usize * SUBREGION_DIMENSION;

        for n in 0..SUBREGION_DIMENSION {
            for m in 0..SUBREGION_DIMENSION {
                let x = (base_x + m) as f32 * size + self.offset.x;
                let y = (base_y + n) as f32 * size + self.offset.y;
                let handle = Shape::LINE_QUAD.add_to_batch(
                    batch,
                    DrawGroup::Blocks,
                    x,
                    y,
                    size,
                    size,
                    BLOCK_COLOR,
                );
                self.slots[block_index(subregion, m, n)].fill(batch, handle);
            }
        }
    }
}

impl<H> fmt::Display for Chunk<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Chunk({}, ({:.6}, {:.6}))",
            self.id, self.offset.x, self.offset.y
        )
    }
}
