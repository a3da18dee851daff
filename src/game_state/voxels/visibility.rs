//! # Visibility Filter
//!
//! Culls blocks that are completely buried. A block can only be seen if at
//! least one of its faces touches air or the edge of the world.

use super::block::{block_side::BlockSide, neighbour, BlockRecord, LatticeCoord};
use super::world::World;

/// Whether the block at `coord` has at least one exposed face.
///
/// Blocks on the outer shell of the lattice always count as exposed.
pub fn is_coord_exposed(world: &World, coord: LatticeCoord) -> bool {
    let extents = world.extents();
    if extents.is_on_boundary(coord) {
        return true;
    }

    // Interior cells have all six neighbours in bounds.
    BlockSide::all()
        .into_iter()
        .any(|side| !world.exists(neighbour(coord, side.normal())))
}

/// Whether any face of `block` could be visible.
#[inline]
pub fn is_visible(world: &World, block: &BlockRecord) -> bool {
    is_coord_exposed(world, block.coord)
}

/// Iterates the blocks of `world` that pass the visibility filter.
pub fn visible_blocks(world: &World) -> impl Iterator<Item = &BlockRecord> + '_ {
    world.iter().filter(move |block| is_visible(world, block))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::voxels::{block::block_type::BlockType, occupancy::WorldExtents};
    use cgmath::Point3;

    fn solid_cube(n: i32) -> World {
        let mut world = World::new(WorldExtents::new(n, n, n), 1.0);
        for x in 0..n {
            for y in 0..n {
                for z in 0..n {
                    world.insert(BlockType::DIRT, Point3::new(x, y, z));
                }
            }
        }
        world
    }

    #[test]
    fn buried_block_is_hidden() {
        let world = solid_cube(3);
        assert!(!is_coord_exposed(&world, Point3::new(1, 1, 1)));
    }

    #[test]
    fn boundary_blocks_are_always_visible() {
        let world = solid_cube(3);
        for block in world.iter() {
            let interior = block.coord == Point3::new(1, 1, 1);
            assert_eq!(is_visible(&world, block), !interior);
        }
        assert_eq!(visible_blocks(&world).count(), 26);
    }

    #[test]
    fn removing_a_neighbour_exposes_block() {
        let mut world = solid_cube(5);
        let centre = Point3::new(2, 2, 2);
        assert!(!is_coord_exposed(&world, centre));
        world.remove_at(Point3::new(2, 3, 2));
        assert!(is_coord_exposed(&world, centre));
    }
}
