//! # World Module
//!
//! This module provides the `World` struct, the block registry of the game.
//! It is the sole owner of every placed `BlockRecord` and keeps the dense
//! `OccupancyIndex` in lockstep with the record collection.
//!
//! ## Storage
//!
//! Records live in an append-only slot vector so iteration always follows
//! insertion order. Removal leaves a tombstone; once tombstones outnumber live
//! records the vector is compacted in place, preserving relative order.
//!
//! ## Invariant
//!
//! `occupancy.exists(c)` is true exactly when a live record has coordinate
//! `c`. Every mutation updates both sides inside the same method.

use std::collections::HashMap;

use log::debug;
use thiserror::Error;

use super::block::{block_type::BlockType, BlockRecord, LatticeCoord};
use super::occupancy::{OccupancyIndex, WorldExtents};

/// Tombstone count below which the slot vector is never compacted.
const MIN_TOMBSTONES_BEFORE_COMPACTION: usize = 1024;

/// Handle to a record in the registry.
///
/// Handles order by insertion sequence. They stay valid until the next
/// removal, which may compact storage; re-resolve them after any edit.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockHandle(u32);

/// Why a checked world edit was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WorldEditError {
    /// The target coordinate lies outside the world lattice.
    #[error("lattice coordinate ({x}, {y}, {z}) is outside the world")]
    OutOfBounds {
        /// Requested x.
        x: i32,
        /// Requested y.
        y: i32,
        /// Requested z.
        z: i32,
    },
    /// Another block already occupies the target coordinate.
    #[error("lattice coordinate ({x}, {y}, {z}) is already occupied")]
    Occupied {
        /// Requested x.
        x: i32,
        /// Requested y.
        y: i32,
        /// Requested z.
        z: i32,
    },
}

/// The block registry plus its occupancy index.
#[derive(Debug)]
pub struct World {
    block_size: f32,
    occupancy: OccupancyIndex,
    slots: Vec<Option<BlockRecord>>,
    slot_of: HashMap<LatticeCoord, u32>,
    live: usize,
}

impl World {
    /// Creates a new, empty world with the given lattice extents.
    pub fn new(extents: WorldExtents, block_size: f32) -> Self {
        assert!(block_size > 0.0, "block size must be positive");
        World {
            block_size,
            occupancy: OccupancyIndex::new(extents),
            slots: Vec::new(),
            slot_of: HashMap::new(),
            live: 0,
        }
    }

    /// Lattice extents, fixed at construction.
    pub fn extents(&self) -> WorldExtents {
        self.occupancy.extents()
    }

    /// Edge length of one block in world units.
    pub fn block_size(&self) -> f32 {
        self.block_size
    }

    /// Read access to the occupancy index.
    pub fn occupancy(&self) -> &OccupancyIndex {
        &self.occupancy
    }

    /// Number of live blocks.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Whether the world holds no blocks.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Whether a block occupies `coord`. `coord` must be in bounds.
    #[inline]
    pub fn exists(&self, coord: LatticeCoord) -> bool {
        self.occupancy.exists(coord)
    }

    /// Whether a block occupies `coord`; out-of-bounds reads as empty.
    #[inline]
    pub fn is_occupied(&self, coord: LatticeCoord) -> bool {
        self.occupancy.exists_checked(coord)
    }

    /// Inserts a block, panicking if `coord` is out of bounds or occupied.
    ///
    /// Use `try_insert` where the coordinate comes from player input.
    pub fn insert(&mut self, block_type: BlockType, coord: LatticeCoord) -> BlockHandle {
        match self.try_insert(block_type, coord) {
            Ok(handle) => handle,
            Err(err) => panic!("invalid block insertion: {}", err),
        }
    }

    /// Inserts a block if `coord` is inside the world and free.
    pub fn try_insert(
        &mut self,
        block_type: BlockType,
        coord: LatticeCoord,
    ) -> Result<BlockHandle, WorldEditError> {
        if !self.extents().contains(coord) {
            return Err(WorldEditError::OutOfBounds {
                x: coord.x,
                y: coord.y,
                z: coord.z,
            });
        }
        if self.occupancy.exists(coord) {
            return Err(WorldEditError::Occupied {
                x: coord.x,
                y: coord.y,
                z: coord.z,
            });
        }

        let slot = u32::try_from(self.slots.len()).expect("block registry exceeded u32 slots");
        self.slots
            .push(Some(BlockRecord::new(block_type, coord, self.block_size)));
        self.slot_of.insert(coord, slot);
        self.occupancy.set(coord, true);
        self.live += 1;

        Ok(BlockHandle(slot))
    }

    /// Removes the block behind `handle`, returning its record.
    ///
    /// Returns `None` for a handle whose block is already gone.
    pub fn remove(&mut self, handle: BlockHandle) -> Option<BlockRecord> {
        let record = self.slots.get_mut(handle.0 as usize)?.take()?;
        self.slot_of.remove(&record.coord);
        self.occupancy.set(record.coord, false);
        self.live -= 1;

        self.maybe_compact();
        Some(record)
    }

    /// Removes the block at `coord`, if any.
    pub fn remove_at(&mut self, coord: LatticeCoord) -> Option<BlockRecord> {
        let handle = self.handle_at(coord)?;
        self.remove(handle)
    }

    /// Handle of the block at `coord`, if any.
    pub fn handle_at(&self, coord: LatticeCoord) -> Option<BlockHandle> {
        self.slot_of.get(&coord).map(|&slot| BlockHandle(slot))
    }

    /// Record behind `handle`, if still live.
    pub fn get(&self, handle: BlockHandle) -> Option<&BlockRecord> {
        self.slots.get(handle.0 as usize)?.as_ref()
    }

    /// Record at `coord`, if any.
    pub fn block_at(&self, coord: LatticeCoord) -> Option<&BlockRecord> {
        self.handle_at(coord).and_then(|handle| self.get(handle))
    }

    /// Iterates all live blocks in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &BlockRecord> + '_ {
        self.slots.iter().filter_map(Option::as_ref)
    }

    /// Iterates all live blocks with their handles, in insertion order.
    pub fn iter_with_handles(&self) -> impl Iterator<Item = (BlockHandle, &BlockRecord)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(slot, record)| record.as_ref().map(|r| (BlockHandle(slot as u32), r)))
    }

    /// Checks that the registry and the occupancy index agree.
    pub fn is_consistent(&self) -> bool {
        let mut seen = 0;
        for (handle, record) in self.iter_with_handles() {
            if !self.occupancy.exists(record.coord) || self.handle_at(record.coord) != Some(handle) {
                return false;
            }
            seen += 1;
        }
        seen == self.live && self.occupancy.count() == self.live && self.slot_of.len() == self.live
    }

    fn maybe_compact(&mut self) {
        let tombstones = self.slots.len() - self.live;
        if tombstones < MIN_TOMBSTONES_BEFORE_COMPACTION || tombstones <= self.live {
            return;
        }

        self.slots.retain(Option::is_some);
        for (slot, record) in self.slots.iter().enumerate() {
            if let Some(record) = record {
                self.slot_of.insert(record.coord, slot as u32);
            }
        }
        debug!("Compacted block registry, dropped {} tombstones", tombstones);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Point3;

    fn small_world() -> World {
        World::new(WorldExtents::new(8, 8, 8), 0.5)
    }

    #[test]
    fn insert_updates_registry_and_occupancy() {
        let mut world = small_world();
        let coord = Point3::new(1, 2, 3);
        let handle = world.insert(BlockType::DIRT, coord);

        assert!(world.exists(coord));
        assert_eq!(world.len(), 1);
        let record = world.get(handle).unwrap();
        assert_eq!(record.coord, coord);
        assert_eq!(record.position, Point3::new(0.5, 1.0, 1.5));
        assert!(world.is_consistent());
    }

    #[test]
    fn remove_clears_both_sides() {
        let mut world = small_world();
        let coord = Point3::new(4, 4, 4);
        let handle = world.insert(BlockType::SAND, coord);

        let removed = world.remove(handle).unwrap();
        assert_eq!(removed.block_type, BlockType::SAND);
        assert!(!world.exists(coord));
        assert!(world.is_empty());
        assert!(world.remove(handle).is_none());
        assert!(world.is_consistent());
    }

    #[test]
    fn try_insert_rejects_duplicates_and_out_of_bounds() {
        let mut world = small_world();
        world.insert(BlockType::DIRT, Point3::new(0, 0, 0));

        assert_eq!(
            world.try_insert(BlockType::SNOW, Point3::new(0, 0, 0)),
            Err(WorldEditError::Occupied { x: 0, y: 0, z: 0 })
        );
        assert_eq!(
            world.try_insert(BlockType::SNOW, Point3::new(8, 0, 0)),
            Err(WorldEditError::OutOfBounds { x: 8, y: 0, z: 0 })
        );
        assert_eq!(
            world.try_insert(BlockType::SNOW, Point3::new(0, -1, 0)),
            Err(WorldEditError::OutOfBounds { x: 0, y: -1, z: 0 })
        );
        assert_eq!(world.len(), 1);
        assert!(world.is_consistent());
    }

    #[test]
    #[should_panic(expected = "already occupied")]
    fn duplicate_insert_panics() {
        let mut world = small_world();
        world.insert(BlockType::DIRT, Point3::new(1, 1, 1));
        world.insert(BlockType::DIRT, Point3::new(1, 1, 1));
    }

    #[test]
    fn iteration_follows_insertion_order_across_removals() {
        let mut world = small_world();
        let coords = [
            Point3::new(3, 0, 0),
            Point3::new(1, 0, 0),
            Point3::new(2, 0, 0),
            Point3::new(0, 0, 0),
        ];
        for coord in coords {
            world.insert(BlockType::DIRT, coord);
        }
        world.remove_at(Point3::new(1, 0, 0));

        let order: Vec<_> = world.iter().map(|b| b.coord).collect();
        assert_eq!(order, vec![coords[0], coords[2], coords[3]]);

        // restartable: a second pass yields the same sequence
        let again: Vec<_> = world.iter().map(|b| b.coord).collect();
        assert_eq!(order, again);
    }

    #[test]
    fn compaction_preserves_order_and_consistency() {
        let mut world = World::new(WorldExtents::new(64, 2, 64), 1.0);
        for x in 0..64 {
            for z in 0..64 {
                world.insert(BlockType::DIRT, Point3::new(x, 0, z));
            }
        }
        // remove three quarters to force compaction
        for x in 0..64 {
            for z in 0..64 {
                if (x + z) % 4 != 0 {
                    world.remove_at(Point3::new(x, 0, z));
                }
            }
        }
        assert!(world.is_consistent());
        assert_eq!(world.len(), 64 * 64 / 4);

        let order: Vec<_> = world.iter().map(|b| (b.coord.x, b.coord.z)).collect();
        let mut sorted = order.clone();
        sorted.sort();
        assert_eq!(order, sorted);

        for (handle, record) in world.iter_with_handles() {
            assert_eq!(world.handle_at(record.coord), Some(handle));
        }
    }
}
