//! Per-cell block data.

/// Number of distinct block values.
pub const BLOCK_VARIANTS: u8 = 3;

/// One cell of a chunk's 16x16 grid.
///
/// Blocks are plain data: they own no geometry and are mutated in place by gameplay code.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Block {
    /// Whether the block has been mined out
    pub broken: bool,
    /// Block variant in `0..BLOCK_VARIANTS`
    pub value: u8,
}

impl Block {
    /// An intact block of the given variant.
    ///
    /// # Panics
    /// Panics if `value` is not below [`BLOCK_VARIANTS`].
    pub fn new(value: u8) -> Self {
        assert!(value < BLOCK_VARIANTS, "block value {value} out of range");
        Self {
            broken: false,
            value,
        }
    }

    /// An intact block with a random variant.
    pub fn random(rng: &mut fastrand::Rng) -> Self {
        Self::new(rng.u8(..BLOCK_VARIANTS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_blocks_stay_in_range() {
        let mut rng = fastrand::Rng::with_seed(7);
        for _ in 0..1000 {
            let block = Block::random(&mut rng);
            assert!(block.value < BLOCK_VARIANTS);
            assert!(!block.broken);
        }
    }

    #[test]
    #[should_panic]
    fn out_of_range_values_are_rejected() {
        Block::new(BLOCK_VARIANTS);
    }
}
