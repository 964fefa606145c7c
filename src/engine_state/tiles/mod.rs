//! # Tile World
//!
//! The chunk visibility and loading engine.
//!
//! ## Architecture
//!
//! * **Rectangle**: World-space boxes, used for chunk extents and the view
//! * **Block**: Per-cell data, 256 per chunk
//! * **Chunk**: One grid cell and the geometry drawn for it, loaded sub-region by sub-region
//! * **ChunkGrid**: The fixed square of chunks and the per-tick load/unload scheduler
//!
//! ## Data Flow
//!
//! 1. The driver hands the grid the current view rectangle once per tick
//! 2. The grid flags chunks whose visibility changed
//! 3. At most one chunk starts loading, or one pending chunk is released
//! 4. The loading chunk materializes a bounded slice of its geometry
//!
//! Everything runs on the thread that calls `ChunkGrid::update`; the batch is borrowed for the
//! duration of each call and never stored.

pub mod block;
pub mod chunk;
pub mod grid;
pub mod rectangle;

pub use block::Block;
pub use chunk::traversal::{OrderingPolicy, SubregionIndex};
pub use chunk::{Chunk, ChunkState};
pub use grid::{ChunkGrid, UpdateReport};
pub use rectangle::Rectangle;
