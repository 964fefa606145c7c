//! In-memory batch backend.
//!
//! `MeshBatch` keeps every piece of geometry in CPU-side storage, grouped by draw group. It is
//! the backend the headless driver and the tests run against, and the staging area a GPU
//! backend uploads from.
//!
//! # Storage
//! - Geometry lives in a slab of entries addressed by handle id
//! - Freed ids are recycled through an available-id queue, oldest first
//! - A bit vector records which ids are live, one bit per slab entry
//! - Every batch gets a process-unique id that its handles carry, so a handle issued by one
//!   batch is never mistaken for a slab entry of another

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use bitvec::prelude::BitVec;
use log::warn;

use super::{Batch, DrawGroup, PrimitiveMode, Vertex};

static NEXT_BATCH_ID: AtomicU64 = AtomicU64::new(0);

/// Owned reference to geometry stored in a [`MeshBatch`].
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct MeshHandle {
    batch: u64,
    id: usize,
}

impl MeshHandle {
    /// Slab id of the geometry.
    pub fn id(&self) -> usize {
        self.id
    }
}

/// Counters describing how a batch has been used.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchAnalytics {
    /// Number of successful `add_indexed` calls
    pub handles_created: u64,
    /// Number of successful `delete` calls
    pub handles_deleted: u64,
    /// Total vertices written by `add_indexed` and `set_vertices`
    pub vertices_written: u64,
}

#[derive(Debug)]
struct MeshEntry {
    mode: PrimitiveMode,
    group: DrawGroup,
    indices: Vec<u32>,
    vertices: Vec<Vertex>,
}

/// One piece of live geometry as seen by a renderer.
#[derive(Debug, Clone, Copy)]
pub struct DrawItem<'a> {
    /// Draw-order group
    pub group: DrawGroup,
    /// Primitive assembly mode
    pub mode: PrimitiveMode,
    /// Index list into `vertices`
    pub indices: &'a [u32],
    /// Vertex data
    pub vertices: &'a [Vertex],
}

/// CPU-side [`Batch`] implementation.
///
/// # Examples
///
/// ```
/// use tile_streamer::engine_state::rendering::{Batch, DrawGroup, MeshBatch, Shape};
///
/// let mut batch = MeshBatch::new();
/// let handle = Shape::QUAD.add_to_batch(&mut batch, DrawGroup::Miners, 0.0, 0.0, 8.0, 8.0, [255, 0, 0]);
/// assert_eq!(batch.live_count(), 1);
///
/// batch.delete(handle);
/// assert_eq!(batch.live_count(), 0);
/// ```
#[derive(Debug)]
pub struct MeshBatch {
    batch_id: u64,
    entries: Vec<Option<MeshEntry>>,
    available_ids: VecDeque<usize>,
    live: BitVec,
    analytics: BatchAnalytics,
}

impl MeshBatch {
    /// Creates an empty batch.
    pub fn new() -> Self {
        Self {
            batch_id: NEXT_BATCH_ID.fetch_add(1, Ordering::Relaxed),
            entries: Vec::new(),
            available_ids: VecDeque::new(),
            live: BitVec::new(),
            analytics: BatchAnalytics::default(),
        }
    }

    /// Number of live handles.
    pub fn live_count(&self) -> usize {
        self.live.count_ones()
    }

    /// Whether `handle` refers to live geometry in this batch.
    pub fn is_live(&self, handle: &MeshHandle) -> bool {
        handle.batch == self.batch_id && self.live.get(handle.id).map(|bit| *bit).unwrap_or(false)
    }

    /// Number of live handles in `group`.
    pub fn group_count(&self, group: DrawGroup) -> usize {
        self.entries
            .iter()
            .flatten()
            .filter(|entry| entry.group == group)
            .count()
    }

    /// Usage counters.
    pub fn analytics(&self) -> BatchAnalytics {
        self.analytics
    }

    /// Vertex data of the geometry owned by `handle`.
    pub fn vertices(&self, handle: &MeshHandle) -> Option<&[Vertex]> {
        if handle.batch != self.batch_id {
            return None;
        }
        self.entries
            .get(handle.id)
            .and_then(Option::as_ref)
            .map(|entry| entry.vertices.as_slice())
    }

    /// Live geometry in draw order: by group, then by slab id.
    pub fn draw_list(&self) -> Vec<DrawItem<'_>> {
        let mut items: Vec<DrawItem<'_>> = self
            .entries
            .iter()
            .flatten()
            .map(|entry| DrawItem {
                group: entry.group,
                mode: entry.mode,
                indices: &entry.indices,
                vertices: &entry.vertices,
            })
            .collect();
        // Stable sort keeps slab order within a group.
        items.sort_by_key(|item| item.group);
        items
    }

    /// Concatenated vertex bytes of every live entry in `group`, ready for a buffer upload.
    pub fn group_vertex_bytes(&self, group: DrawGroup) -> Vec<u8> {
        self.entries
            .iter()
            .flatten()
            .filter(|entry| entry.group == group)
            .flat_map(|entry| bytemuck::cast_slice::<Vertex, u8>(&entry.vertices).iter().copied())
            .collect()
    }

    fn allocate_id(&mut self) -> usize {
        match self.available_ids.pop_front() {
            Some(id) => {
                self.live.set(id, true);
                id
            }
            None => {
                self.entries.push(None);
                self.live.push(true);
                self.entries.len() - 1
            }
        }
    }
}

impl Default for MeshBatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Batch for MeshBatch {
    type Handle = MeshHandle;

    fn add_indexed(
        &mut self,
        mode: PrimitiveMode,
        group: DrawGroup,
        indices: &[u32],
        vertices: &[Vertex],
    ) -> MeshHandle {
        debug_assert!(
            indices.iter().all(|&index| (index as usize) < vertices.len()),
            "index out of range for {} vertices",
            vertices.len()
        );

        let id = self.allocate_id();
        self.entries[id] = Some(MeshEntry {
            mode,
            group,
            indices: indices.to_vec(),
            vertices: vertices.to_vec(),
        });
        self.analytics.handles_created += 1;
        self.analytics.vertices_written += vertices.len() as u64;

        MeshHandle {
            batch: self.batch_id,
            id,
        }
    }

    fn set_vertices(&mut self, handle: &MeshHandle, vertices: &[Vertex]) {
        let entry = if handle.batch == self.batch_id {
            self.entries.get_mut(handle.id).and_then(Option::as_mut)
        } else {
            None
        };
        match entry {
            Some(entry) => {
                entry.vertices.clear();
                entry.vertices.extend_from_slice(vertices);
                self.analytics.vertices_written += vertices.len() as u64;
            }
            None => warn!("set_vertices on unknown mesh handle {}", handle.id),
        }
    }

    fn delete(&mut self, handle: MeshHandle) {
        if !self.is_live(&handle) {
            warn!("delete on unknown mesh handle {}", handle.id);
            return;
        }

        self.entries[handle.id] = None;
        self.live.set(handle.id, false);
        self.available_ids.push_back(handle.id);
        self.analytics.handles_deleted += 1;
    }
}
