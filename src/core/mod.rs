//! # Core Module
//!
//! Small ownership primitives shared by the engine subsystems.
//!
//! ## Key Components
//! - `StResource`: Single-threaded reference-counted resource with interior mutability
//!
//! The streaming engine is driven from a single update call per tick, so nothing in this
//! module pays for atomic reference counts or locks.
//!
//! ## Usage
//! ```rust
//! use tile_streamer::core::StResource;
//!
//! let counter = StResource::new(0);
//! *counter.get_mut() += 1;
//! assert_eq!(*counter.get(), 1);
//! ```

pub mod st_resource;

pub use st_resource::StResource;
