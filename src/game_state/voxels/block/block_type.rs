//! # Block Type Module
//!
//! This module defines the different types of blocks in the voxel world.
//! It provides functionality for block type identification, conversion from
//! integers and names, and the fixed geometry lookup used by the renderer.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use super::BlockTypeSize;

/// Enumerates all possible block types in the voxel world.
///
/// The discriminants are fixed; hotbar keys 1-7 map directly onto
/// `SAND..=OAK_LOG` through `FromPrimitive`.
#[allow(clippy::upper_case_acronyms)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockType {
    /// Placeholder type, never generated by the terrain.
    NONE = 0,
    /// Sand.
    SAND = 1,
    /// Grass-topped dirt, the survival terrain cap.
    GRASS = 2,
    /// Plain dirt, the terrain filler.
    DIRT = 3,
    /// Gravel.
    GRAVEL = 4,
    /// Snow.
    SNOW = 5,
    /// Cherry leaves.
    CHERRY_LEAVES = 6,
    /// Oak log, the creative terrain cap.
    OAK_LOG = 7,
}

/// Number of block types, including `NONE`.
pub const NUM_BLOCK_TYPES: usize = 8;

/// Maps each block type (indexed by discriminant) to its row in the
/// texture atlas / per-type geometry table.
static BLOCK_TYPE_TO_GEOMETRY_INDEX: [u32; NUM_BLOCK_TYPES] = [
    7, // NONE
    6, // SAND
    5, // GRASS
    4, // DIRT
    3, // GRAVEL
    2, // SNOW
    1, // CHERRY_LEAVES
    0, // OAK_LOG
];

/// Lowercase names accepted in configuration files.
static BLOCK_TYPE_NAMES: phf::Map<&'static str, BlockType> = phf::phf_map! {
    "none" => BlockType::NONE,
    "sand" => BlockType::SAND,
    "grass" => BlockType::GRASS,
    "dirt" => BlockType::DIRT,
    "gravel" => BlockType::GRAVEL,
    "snow" => BlockType::SNOW,
    "cherry_leaves" => BlockType::CHERRY_LEAVES,
    "oak_log" => BlockType::OAK_LOG,
};

impl BlockType {
    /// Converts a `BlockTypeSize` to a `BlockType`, returning `None` for
    /// values outside the enum.
    pub fn from_int(btype: BlockTypeSize) -> Option<Self> {
        FromPrimitive::from_u8(btype)
    }

    /// Block type selected by hotbar slot `slot` (1-based, 1..=7).
    pub fn from_hotbar_slot(slot: u8) -> Option<Self> {
        match slot {
            1..=7 => Self::from_int(slot),
            _ => None,
        }
    }

    /// Looks up a block type by its lowercase configuration name.
    pub fn from_name(name: &str) -> Option<Self> {
        BLOCK_TYPE_NAMES.get(name).copied()
    }

    /// Index of this type's geometry in the renderer's per-type tables.
    #[inline]
    pub fn geometry_index(self) -> u32 {
        BLOCK_TYPE_TO_GEOMETRY_INDEX[self as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hotbar_slots_follow_discriminant_order() {
        assert_eq!(BlockType::from_hotbar_slot(1), Some(BlockType::SAND));
        assert_eq!(BlockType::from_hotbar_slot(3), Some(BlockType::DIRT));
        assert_eq!(BlockType::from_hotbar_slot(7), Some(BlockType::OAK_LOG));
        assert_eq!(BlockType::from_hotbar_slot(0), None);
        assert_eq!(BlockType::from_hotbar_slot(8), None);
    }

    #[test]
    fn geometry_indices_are_a_permutation() {
        let mut seen = [false; NUM_BLOCK_TYPES];
        for i in 0..NUM_BLOCK_TYPES as u8 {
            let index = BlockType::from_int(i).unwrap().geometry_index() as usize;
            assert!(!seen[index]);
            seen[index] = true;
        }
        assert_eq!(BlockType::OAK_LOG.geometry_index(), 0);
        assert_eq!(BlockType::NONE.geometry_index(), 7);
    }

    #[test]
    fn names_resolve() {
        assert_eq!(BlockType::from_name("cherry_leaves"), Some(BlockType::CHERRY_LEAVES));
        assert_eq!(BlockType::from_name("bedrock"), None);
    }
}
