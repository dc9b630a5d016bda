use crate::error::{ExistsError, ReferenceError, Result};
use std::collections::HashMap;
use tracing::debug;

/// Default number of ids reserved for a block on first registration.
const DEFAULT_CAPACITY: u64 = 1024;

#[derive(Debug)]
struct Block {
    base: u64,
    used: u64,
    reserved: u64,
    requested: u64,
}

/// Partitions one global id space into private, contiguous blocks per named
/// component instance.
///
/// Registration is idempotent per key, so a later component can look up the
/// range owned by an earlier one by name. Blocks never overlap: each new
/// block is reserved above every existing one, the topmost block extends in
/// place when it fills up, and an interior block that exhausts its
/// reservation fails rather than spill into a neighbor.
#[derive(Debug)]
pub struct IdAllocator {
    blocks: HashMap<String, Block>,
    high_water: u64,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdAllocator {
    /// Creates a new allocator. Ids start at 1; 0 is never issued.
    #[must_use]
    pub fn new() -> Self {
        Self {
            blocks: HashMap::new(),
            high_water: 1,
        }
    }

    /// Reserves a fresh contiguous block for `key` and returns its base id.
    ///
    /// Calling again with a key registered in the current session returns
    /// the same base.
    pub fn allocate_block(&mut self, key: &str) -> u64 {
        if let Some(block) = self.blocks.get(key) {
            return block.base;
        }
        self.insert_block(key, DEFAULT_CAPACITY)
    }

    /// Reserves a block with an explicit capacity request.
    ///
    /// # Errors
    ///
    /// Returns an error if `key` is already registered with a different
    /// requested capacity.
    pub fn allocate_block_sized(&mut self, key: &str, capacity: u64) -> Result<u64> {
        let capacity = capacity.max(1);
        if let Some(block) = self.blocks.get(key) {
            if block.requested != capacity {
                return Err(ExistsError::BlockConflict {
                    key: key.to_owned(),
                    registered: block.requested,
                    requested: capacity,
                }
                .into());
            }
            return Ok(block.base);
        }
        Ok(self.insert_block(key, capacity))
    }

    fn insert_block(&mut self, key: &str, capacity: u64) -> u64 {
        let base = self.high_water;
        self.high_water += capacity;
        debug!(key, base, capacity, "allocating id block");
        self.blocks.insert(
            key.to_owned(),
            Block {
                base,
                used: 0,
                reserved: capacity,
                requested: capacity,
            },
        );
        base
    }

    /// Returns the next unused id in `key`'s block.
    ///
    /// # Errors
    ///
    /// Returns an error if `key` has no block, or the block has exhausted an
    /// interior reservation (only the topmost block can grow).
    pub fn next(&mut self, key: &str) -> Result<u64> {
        let block = self
            .blocks
            .get_mut(key)
            .ok_or_else(|| ReferenceError::UnknownBlock(key.to_owned()))?;
        if block.used == block.reserved {
            if block.base + block.reserved == self.high_water {
                block.reserved += block.requested;
                self.high_water = block.base + block.reserved;
            } else {
                return Err(ExistsError::BlockExhausted {
                    key: key.to_owned(),
                    capacity: block.reserved,
                }
                .into());
            }
        }
        let id = block.base + block.used;
        block.used += 1;
        Ok(id)
    }

    /// Returns the base id of `key`'s block, if registered.
    #[must_use]
    pub fn base(&self, key: &str) -> Option<u64> {
        self.blocks.get(key).map(|b| b.base)
    }

    /// Returns the half-open range of ids issued so far for `key`.
    #[must_use]
    pub fn range(&self, key: &str) -> Option<(u64, u64)> {
        self.blocks.get(key).map(|b| (b.base, b.base + b.used))
    }

    /// Number of registered blocks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether no blocks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Clears all blocks and restarts the id space.
    pub fn reset(&mut self) {
        self.blocks.clear();
        self.high_water = 1;
    }
}
