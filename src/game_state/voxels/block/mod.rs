//! # Block Module
//!
//! This module provides the block record stored by the world registry,
//! together with block type definitions and block face handling.

use block_type::BlockType;
use cgmath::{Point3, Vector3};

pub mod block_side;
pub mod block_type;

/// The underlying integer type used to represent block types in memory.
pub type BlockTypeSize = u8;

/// Integer lattice coordinate of a block.
pub type LatticeCoord = Point3<i32>;

/// A placed block.
///
/// Records are owned exclusively by the world registry and are immutable once
/// created; edits happen by removing and inserting whole records.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BlockRecord {
    /// What the block is made of.
    pub block_type: BlockType,
    /// Lattice cell occupied by the block.
    pub coord: LatticeCoord,
    /// Centre of the block in world space, `coord * block_size`.
    pub position: Point3<f32>,
}

impl BlockRecord {
    /// Builds a record for `coord`, caching its world-space centre.
    pub fn new(block_type: BlockType, coord: LatticeCoord, block_size: f32) -> Self {
        BlockRecord {
            block_type,
            coord,
            position: lattice_to_world(coord, block_size),
        }
    }

    /// Row of this block's geometry in the renderer tables.
    #[inline]
    pub fn geometry_index(&self) -> u32 {
        self.block_type.geometry_index()
    }
}

/// Maps a lattice coordinate to the world-space centre of its cell.
#[inline]
pub fn lattice_to_world(coord: LatticeCoord, block_size: f32) -> Point3<f32> {
    Point3::new(
        coord.x as f32 * block_size,
        coord.y as f32 * block_size,
        coord.z as f32 * block_size,
    )
}

/// Returns the lattice cell whose block would contain `position`.
#[inline]
pub fn world_to_lattice(position: Point3<f32>, block_size: f32) -> LatticeCoord {
    Point3::new(
        (position.x / block_size).round() as i32,
        (position.y / block_size).round() as i32,
        (position.z / block_size).round() as i32,
    )
}

/// Offsets a lattice coordinate by a unit face normal.
#[inline]
pub fn neighbour(coord: LatticeCoord, normal: Vector3<i32>) -> LatticeCoord {
    coord + normal
}
