//! # Chunk Grid
//!
//! The grid owns a fixed square of chunks and decides, once per tick, which of them gain or
//! lose geometry.
//!
//! ## Scheduling
//!
//! Each `update` call:
//! 1. Flags chunks that started or stopped intersecting the view and records them as pending
//!    shows or pending hides. A chunk index is never pending in both sets.
//! 2. Admits at most one pending show (only when no load is in flight) or one pending hide.
//!    When both kinds are waiting, a coin flip picks which side gets the turn.
//! 3. Advances the in-flight load by one bounded `process` step.
//!
//! Loads are therefore spread over several ticks and only one chunk is ever mid-load, while a
//! hide releases all of a chunk's geometry in the call that admits it. A chunk that leaves the
//! view while it is loading is preempted: its load is abandoned and it queues for a hide like
//! any other chunk.

use std::collections::BTreeSet;

use cgmath::Point2;
use log::debug;
use web_time::Instant;

use super::chunk::{Chunk, CHUNK_DIMENSION};
use super::chunk::traversal::OrderingPolicy;
use super::rectangle::Rectangle;
use crate::config::WorldConfig;
use crate::engine_state::profiling::UpdateObserver;
use crate::engine_state::rendering::Batch;

/// Name under which `ChunkGrid::update` reports to its observer.
pub const GRID_UPDATE_OPERATION: &str = "ChunkGrid::update";

/// What one `update` call changed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UpdateReport {
    /// Chunks that started intersecting the view this tick
    pub became_visible: Vec<usize>,
    /// Chunks that stopped intersecting the view this tick
    pub became_hidden: Vec<usize>,
    /// Chunk whose load was started this tick
    pub shown: Option<usize>,
    /// Chunk whose geometry was released this tick
    pub hidden: Option<usize>,
    /// Chunk whose load finished this tick
    pub completed: Option<usize>,
}

/// Fixed square of chunks with load and unload scheduling.
///
/// # Examples
///
/// ```
/// use cgmath::Point2;
/// use tile_streamer::config::WorldConfig;
/// use tile_streamer::engine_state::rendering::MeshBatch;
/// use tile_streamer::engine_state::tiles::{ChunkGrid, Rectangle};
///
/// let mut batch = MeshBatch::new();
/// let mut grid = ChunkGrid::new(Point2::new(0.0, 0.0), &WorldConfig::default());
///
/// let report = grid.update(&mut batch, &Rectangle::new(-10.0, -10.0, 20.0, 20.0));
/// assert_eq!(report.became_visible, vec![12]);
/// assert_eq!(grid.active_loader(), Some(12));
/// ```
pub struct ChunkGrid<H> {
    chunks: Vec<Chunk<H>>,
    dimension: usize,
    chunk_size: f32,
    visible_pending: BTreeSet<usize>,
    hidden_pending: BTreeSet<usize>,
    active_loader: Option<usize>,
    ordering: OrderingPolicy,
    rng: fastrand::Rng,
    observer: Option<Box<dyn UpdateObserver>>,
}

impl<H> ChunkGrid<H> {
    /// Builds a `grid_dimension` x `grid_dimension` grid centred on `center`.
    ///
    /// Chunk `(i, j)` gets index `j * dimension + i`, so indices run row by row from the
    /// lower-left chunk.
    pub fn new(center: Point2<f32>, config: &WorldConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };

        let dimension = config.grid_dimension;
        let chunk_size = CHUNK_DIMENSION as f32 * config.block_size;
        let half = dimension as f32 / 2.0;

        let mut chunks = Vec::with_capacity(dimension * dimension);
        for j in 0..dimension {
            for i in 0..dimension {
                let offset = Point2::new(
                    center.x + chunk_size * (i as f32 - half),
                    center.y + chunk_size * (j as f32 - half),
                );
                chunks.push(Chunk::new(j * dimension + i, offset, config.block_size, &mut rng));
            }
        }

        Self {
            chunks,
            dimension,
            chunk_size,
            visible_pending: BTreeSet::new(),
            hidden_pending: BTreeSet::new(),
            active_loader: None,
            ordering: config.ordering,
            rng,
            observer: None,
        }
    }

    /// Attaches an observer that is told how long each `update` took.
    pub fn with_observer(mut self, observer: Box<dyn UpdateObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// All chunks, in index order.
    pub fn chunks(&self) -> &[Chunk<H>] {
        &self.chunks
    }

    /// The chunk at `index`.
    pub fn chunk(&self, index: usize) -> &Chunk<H> {
        &self.chunks[index]
    }

    /// Mutable access to the chunk at `index`, for block edits.
    pub fn chunk_mut(&mut self, index: usize) -> &mut Chunk<H> {
        &mut self.chunks[index]
    }

    /// Number of chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether the grid has no chunks.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Chunks per side.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// World-space edge length of one chunk.
    pub fn chunk_size(&self) -> f32 {
        self.chunk_size
    }

    /// Chunks waiting for their load to start.
    pub fn visible_pending(&self) -> &BTreeSet<usize> {
        &self.visible_pending
    }

    /// Chunks waiting for their geometry to be released.
    pub fn hidden_pending(&self) -> &BTreeSet<usize> {
        &self.hidden_pending
    }

    /// The chunk currently mid-load.
    pub fn active_loader(&self) -> Option<usize> {
        self.active_loader
    }

    /// Sub-region ordering used when a chunk starts loading.
    pub fn ordering(&self) -> OrderingPolicy {
        self.ordering
    }

    /// Runs one scheduling tick against `view`.
    pub fn update<B: Batch<Handle = H>>(&mut self, batch: &mut B, view: &Rectangle) -> UpdateReport {
        let started = self.observer.as_ref().map(|_| Instant::now());

        let mut report = UpdateReport::default();
        self.recompute_transitions(view, &mut report);
        self.admit(batch, view, &mut report);

        if let Some(index) = self.active_loader {
            if self.chunks[index].process(batch) {
                debug!("finished loading {}", self.chunks[index]);
                self.active_loader = None;
                report.completed = Some(index);
            }
        }

        if let (Some(observer), Some(started)) = (self.observer.as_mut(), started) {
            observer.observe(GRID_UPDATE_OPERATION, started.elapsed());
        }

        report
    }

    /// Hides every chunk and releases all of their geometry at once.
    pub fn release_all<B: Batch<Handle = H>>(&mut self, batch: &mut B) {
        for chunk in self.chunks.iter_mut() {
            chunk.set_visible(false);
            chunk.hide(batch);
        }
        self.visible_pending.clear();
        self.hidden_pending.clear();
        self.active_loader = None;
    }

    fn recompute_transitions(&mut self, view: &Rectangle, report: &mut UpdateReport) {
        for (index, chunk) in self.chunks.iter_mut().enumerate() {
            let intersects = view.intersects(&chunk.rectangle());

            if !chunk.is_visible() && intersects {
                chunk.set_visible(true);
                self.hidden_pending.remove(&index);
                self.visible_pending.insert(index);
                report.became_visible.push(index);
            } else if chunk.is_visible() && !intersects {
                chunk.set_visible(false);
                self.visible_pending.remove(&index);
                self.hidden_pending.insert(index);
                report.became_hidden.push(index);

                if self.active_loader == Some(index) {
                    debug!("preempting load of {chunk}");
                    chunk.cancel_load();
                    self.active_loader = None;
                }
            }
        }
    }

    fn admit<B: Batch<Handle = H>>(
        &mut self,
        batch: &mut B,
        view: &Rectangle,
        report: &mut UpdateReport,
    ) {
        let showing = !self.visible_pending.is_empty();
        let hiding = !self.hidden_pending.is_empty();

        if showing && self.active_loader.is_none() && (!hiding || self.rng.bool()) {
            if let Some(index) = self.visible_pending.pop_first() {
                self.chunks[index].show(batch, view, self.ordering, &mut self.rng);
                self.active_loader = Some(index);
                report.shown = Some(index);
            }
        } else if hiding && (!showing || self.rng.bool()) {
            if let Some(index) = self.hidden_pending.pop_first() {
                self.chunks[index].hide(batch);
                report.hidden = Some(index);
            }
        }
    }
}
