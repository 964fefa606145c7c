//! Sub-region traversal orders.
//!
//! A chunk is loaded as a 4x4 grid of 4x4-block sub-regions. The order in which the
//! sub-regions are materialized decides what the viewer sees first while a chunk streams in.
//!
//! ## Approach ordering
//!
//! The circle is split into 8 sectors of width π/4, each centred on a cardinal or diagonal
//! direction, so sector `k` covers `((k - 1/2)·π/4, (k + 1/2)·π/4]`. The angle from the chunk's
//! centre to the view centre picks a sector, and the sector's direction ranks the sub-regions:
//! the ones furthest along that direction (closest to the viewer) come first.

use std::cmp::Reverse;
use std::collections::VecDeque;
use std::f32::consts::{FRAC_PI_4, FRAC_PI_8, TAU};

use cgmath::Point2;
use serde::{Deserialize, Serialize};

/// Sub-regions along one side of a chunk.
pub const SUBREGIONS_PER_SIDE: u8 = 4;
/// Sub-regions in a chunk.
pub const SUBREGION_COUNT: usize = (SUBREGIONS_PER_SIDE * SUBREGIONS_PER_SIDE) as usize;
/// Number of approach sectors.
pub const SECTOR_COUNT: usize = 8;

/// Integer direction of each sector, counter-clockwise from east.
const SECTOR_DIRECTIONS: [(i32, i32); SECTOR_COUNT] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// Coordinates of a sub-region: `i` along x, `j` along y, both in `0..4`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubregionIndex {
    /// Column
    pub i: u8,
    /// Row
    pub j: u8,
}

impl SubregionIndex {
    /// Creates a sub-region index.
    pub const fn new(i: u8, j: u8) -> Self {
        Self { i, j }
    }

    /// Every sub-region, row by row.
    pub fn row_major() -> [SubregionIndex; SUBREGION_COUNT] {
        std::array::from_fn(|k| {
            let k = k as u8;
            SubregionIndex::new(k % SUBREGIONS_PER_SIDE, k / SUBREGIONS_PER_SIDE)
        })
    }
}

/// How a chunk orders its sub-regions when it starts loading.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderingPolicy {
    /// Sub-regions facing the viewer first
    #[default]
    Approach,
    /// Uniformly shuffled
    Shuffled,
}

impl OrderingPolicy {
    /// Clears `queue` and refills it with all sub-regions in this policy's order.
    pub fn fill(
        self,
        queue: &mut SubregionQueue,
        chunk_center: Point2<f32>,
        view_center: Point2<f32>,
        rng: &mut fastrand::Rng,
    ) {
        let order = match self {
            OrderingPolicy::Approach => {
                traversal_order(sector_for_angle(approach_angle(chunk_center, view_center)))
            }
            OrderingPolicy::Shuffled => {
                let mut order = SubregionIndex::row_major();
                rng.shuffle(&mut order);
                order
            }
        };

        queue.clear();
        for subregion in order {
            queue.push(subregion);
        }
    }
}

/// Angle from `chunk_center` towards `view_center`, in `[0, 2π)`.
pub fn approach_angle(chunk_center: Point2<f32>, view_center: Point2<f32>) -> f32 {
    (view_center.y - chunk_center.y)
        .atan2(view_center.x - chunk_center.x)
        .rem_euclid(TAU)
}

/// Sector containing `angle`. Sector 0 is `(-π/8, π/8]`.
pub fn sector_for_angle(angle: f32) -> usize {
    let sector = ((angle - FRAC_PI_8) / FRAC_PI_4).ceil() as i32;
    sector.rem_euclid(SECTOR_COUNT as i32) as usize
}

/// Sub-regions ranked by how far they lie along the direction of `sector`.
/// Equal ranks keep row-major order.
///
/// # Panics
/// Panics if `sector` is not below [`SECTOR_COUNT`].
pub fn traversal_order(sector: usize) -> [SubregionIndex; SUBREGION_COUNT] {
    let (dx, dy) = SECTOR_DIRECTIONS[sector];
    let last = SUBREGIONS_PER_SIDE as i32 - 1;

    let mut order = SubregionIndex::row_major();
    // Projection of the sub-region centre, doubled so it stays integral.
    order.sort_by_key(|s| Reverse(dx * (2 * s.i as i32 - last) + dy * (2 * s.j as i32 - last)));
    order
}

/// Bounded FIFO of sub-regions waiting to be loaded.
#[derive(Debug, Default)]
pub struct SubregionQueue {
    queue: VecDeque<SubregionIndex>,
}

impl SubregionQueue {
    /// Maximum number of queued sub-regions.
    pub const CAPACITY: usize = SUBREGION_COUNT;

    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            queue: VecDeque::with_capacity(Self::CAPACITY),
        }
    }

    /// Appends a sub-region.
    ///
    /// # Panics
    /// Panics if the queue is already full. Only `show` fills the queue and it always clears it
    /// first, so overflow means the chunk state machine is broken.
    pub fn push(&mut self, subregion: SubregionIndex) {
        assert!(
            self.queue.len() < Self::CAPACITY,
            "sub-region queue overflow pushing {subregion:?}"
        );
        self.queue.push_back(subregion);
    }

    /// Removes the next sub-region to load.
    pub fn pop(&mut self) -> Option<SubregionIndex> {
        self.queue.pop_front()
    }

    /// Drops every queued sub-region.
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    /// Number of queued sub-regions.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Queued sub-regions in load order.
    pub fn iter(&self) -> impl Iterator<Item = &SubregionIndex> {
        self.queue.iter()
    }
}
