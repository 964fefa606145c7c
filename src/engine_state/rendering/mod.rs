//! # Rendering Module
//!
//! The boundary between the streaming engine and whatever draws its geometry.
//!
//! ## Key Components
//!
//! * `Batch` - The backend contract: add indexed geometry to a draw group, update it, delete it
//! * `GeometrySlot` - An owned-or-empty geometry handle with idempotent release
//! * `MeshBatch` - In-memory backend that keeps geometry in CPU-side storage
//! * `Shape` - Unit meshes (filled quad, outlined quad) and their transforms
//! * `Vertex` - The vertex format written into a batch
//!
//! ## Ownership
//!
//! A batch is only ever borrowed by its clients. Each handle it returns is owned by exactly one
//! client and is not `Clone`; giving it back through [`Batch::delete`] consumes it, so a handle
//! cannot be released twice.

pub mod mesh_batch;
pub mod shape;
pub mod vertex;

pub use mesh_batch::{MeshBatch, MeshHandle};
pub use shape::Shape;
pub use vertex::Vertex;

/// Draw-order groups. Lower groups are drawn first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DrawGroup {
    /// Per-block geometry of loaded chunks
    Blocks = 0,
    /// Miner markers
    Miners = 1,
    /// Chunk boundary outlines
    Border = 2,
}

impl DrawGroup {
    /// Every group in draw order.
    pub const ALL: [DrawGroup; 3] = [DrawGroup::Blocks, DrawGroup::Miners, DrawGroup::Border];
}

/// How the index list of a piece of geometry is assembled into primitives.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PrimitiveMode {
    /// Every three indices form a triangle
    Triangles,
    /// Every two indices form a line segment
    Lines,
}

/// A rendering backend that aggregates geometry for drawing.
///
/// Implementors hand out one `Handle` per call to [`Batch::add_indexed`]. The handle is the only
/// way to update or free that geometry.
pub trait Batch {
    /// Owned reference to one piece of geometry inside the batch.
    type Handle;

    /// Adds indexed geometry to `group` and returns the handle that owns it.
    fn add_indexed(
        &mut self,
        mode: PrimitiveMode,
        group: DrawGroup,
        indices: &[u32],
        vertices: &[Vertex],
    ) -> Self::Handle;

    /// Replaces the vertex data of existing geometry in place.
    fn set_vertices(&mut self, handle: &Self::Handle, vertices: &[Vertex]);

    /// Frees the geometry owned by `handle`.
    fn delete(&mut self, handle: Self::Handle);
}

/// An explicit owned-or-empty geometry handle.
///
/// Slots are filled when geometry is created and drained when it is released. Releasing an
/// empty slot does nothing.
#[derive(Debug)]
pub struct GeometrySlot<H> {
    handle: Option<H>,
}

impl<H> GeometrySlot<H> {
    /// An empty slot.
    pub const fn empty() -> Self {
        Self { handle: None }
    }

    /// Whether the slot currently owns geometry.
    pub fn is_occupied(&self) -> bool {
        self.handle.is_some()
    }

    /// The owned handle, if any.
    pub fn handle(&self) -> Option<&H> {
        self.handle.as_ref()
    }

    /// Stores `handle`, releasing whatever the slot held before.
    pub fn fill<B: Batch<Handle = H>>(&mut self, batch: &mut B, handle: H) {
        if let Some(previous) = self.handle.replace(handle) {
            batch.delete(previous);
        }
    }

    /// Releases the owned geometry and leaves the slot empty.
    ///
    /// Returns `true` if something was released.
    pub fn release<B: Batch<Handle = H>>(&mut self, batch: &mut B) -> bool {
        match self.handle.take() {
            Some(handle) => {
                batch.delete(handle);
                true
            }
            None => false,
        }
    }
}

impl<H> Default for GeometrySlot<H> {
    fn default() -> Self {
        Self::empty()
    }
}
