//! # Occupancy Index
//!
//! Dense 3D bit grid recording which lattice cells currently hold a block.
//! It is sized once from the world extents and never resized.
//!
//! ### Performance Characteristics
//! - **Existence check**: O(1), a single bit read
//! - **Update**: O(1), a single bit write
//! - **Memory**: 1 bit per lattice cell

use bitvec::prelude::BitVec;
use cgmath::Point3;

use super::block::LatticeCoord;

/// Fixed dimensions of the world lattice, `[0, x_max) x [0, y_max) x [0, z_max)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WorldExtents {
    /// Number of cells along x.
    pub x_max: i32,
    /// Number of cells along y.
    pub y_max: i32,
    /// Number of cells along z.
    pub z_max: i32,
}

impl WorldExtents {
    /// Creates extents; every axis must hold at least one cell.
    pub fn new(x_max: i32, y_max: i32, z_max: i32) -> Self {
        assert!(
            x_max > 0 && y_max > 0 && z_max > 0,
            "world extents must be positive, got {}x{}x{}",
            x_max,
            y_max,
            z_max
        );
        WorldExtents { x_max, y_max, z_max }
    }

    /// Whether `coord` lies inside the lattice.
    #[inline]
    pub fn contains(&self, coord: LatticeCoord) -> bool {
        (0..self.x_max).contains(&coord.x)
            && (0..self.y_max).contains(&coord.y)
            && (0..self.z_max).contains(&coord.z)
    }

    /// Whether `coord` touches the outer shell of the lattice on any axis.
    #[inline]
    pub fn is_on_boundary(&self, coord: LatticeCoord) -> bool {
        coord.x == 0
            || coord.y == 0
            || coord.z == 0
            || coord.x == self.x_max - 1
            || coord.y == self.y_max - 1
            || coord.z == self.z_max - 1
    }

    /// Total number of lattice cells.
    pub fn volume(&self) -> usize {
        self.x_max as usize * self.y_max as usize * self.z_max as usize
    }

    /// Clamps an inclusive per-axis range to the lattice, returning `None`
    /// when the range misses the lattice entirely.
    pub fn clamp_range(
        &self,
        min: LatticeCoord,
        max: LatticeCoord,
    ) -> Option<(LatticeCoord, LatticeCoord)> {
        let lo = Point3::new(min.x.max(0), min.y.max(0), min.z.max(0));
        let hi = Point3::new(
            max.x.min(self.x_max - 1),
            max.y.min(self.y_max - 1),
            max.z.min(self.z_max - 1),
        );
        if lo.x > hi.x || lo.y > hi.y || lo.z > hi.z {
            None
        } else {
            Some((lo, hi))
        }
    }
}

/// Dense boolean grid over the world lattice.
///
/// Bits are stored x-fastest, then z, then y. Callers must bounds-check
/// before calling `exists`/`set`; an out-of-range coordinate is a programming
/// error and panics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OccupancyIndex {
    extents: WorldExtents,
    solid_array: BitVec,
}

impl OccupancyIndex {
    /// Creates an all-empty index covering `extents`.
    pub fn new(extents: WorldExtents) -> Self {
        OccupancyIndex {
            extents,
            solid_array: BitVec::repeat(false, extents.volume()),
        }
    }

    /// Extents this index was built for.
    pub fn extents(&self) -> WorldExtents {
        self.extents
    }

    #[inline]
    fn offset(&self, coord: LatticeCoord) -> usize {
        assert!(
            self.extents.contains(coord),
            "lattice coordinate {:?} outside world extents {:?}",
            coord,
            self.extents
        );
        let x = coord.x as usize;
        let y = coord.y as usize;
        let z = coord.z as usize;
        let x_max = self.extents.x_max as usize;
        let z_max = self.extents.z_max as usize;
        x + x_max * (z + z_max * y)
    }

    /// Whether a block occupies `coord`.
    #[inline]
    pub fn exists(&self, coord: LatticeCoord) -> bool {
        self.solid_array[self.offset(coord)]
    }

    /// Marks `coord` as occupied or free.
    #[inline]
    pub fn set(&mut self, coord: LatticeCoord, occupied: bool) {
        let offset = self.offset(coord);
        self.solid_array.set(offset, occupied);
    }

    /// Like `exists`, but treats coordinates outside the lattice as empty.
    #[inline]
    pub fn exists_checked(&self, coord: LatticeCoord) -> bool {
        self.extents.contains(coord) && self.exists(coord)
    }

    /// Number of occupied cells.
    pub fn count(&self) -> usize {
        self.solid_array.count_ones()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_clear() {
        let mut index = OccupancyIndex::new(WorldExtents::new(4, 3, 5));
        let c = Point3::new(3, 2, 4);
        assert!(!index.exists(c));
        index.set(c, true);
        assert!(index.exists(c));
        assert_eq!(index.count(), 1);
        index.set(c, false);
        assert!(!index.exists(c));
        assert_eq!(index.count(), 0);
    }

    #[test]
    fn distinct_cells_do_not_alias() {
        let extents = WorldExtents::new(3, 4, 5);
        let mut index = OccupancyIndex::new(extents);
        index.set(Point3::new(1, 2, 3), true);
        for x in 0..3 {
            for y in 0..4 {
                for z in 0..5 {
                    let expected = (x, y, z) == (1, 2, 3);
                    assert_eq!(index.exists(Point3::new(x, y, z)), expected);
                }
            }
        }
    }

    #[test]
    #[should_panic(expected = "outside world extents")]
    fn out_of_bounds_lookup_panics() {
        let index = OccupancyIndex::new(WorldExtents::new(2, 2, 2));
        index.exists(Point3::new(2, 0, 0));
    }

    #[test]
    fn checked_lookup_treats_outside_as_empty() {
        let index = OccupancyIndex::new(WorldExtents::new(2, 2, 2));
        assert!(!index.exists_checked(Point3::new(-1, 0, 0)));
    }

    #[test]
    fn boundary_detection() {
        let extents = WorldExtents::new(4, 4, 4);
        assert!(extents.is_on_boundary(Point3::new(0, 2, 2)));
        assert!(extents.is_on_boundary(Point3::new(2, 3, 2)));
        assert!(!extents.is_on_boundary(Point3::new(1, 2, 2)));
    }

    #[test]
    fn clamp_range_rejects_disjoint_ranges() {
        let extents = WorldExtents::new(4, 4, 4);
        assert_eq!(
            extents.clamp_range(Point3::new(-3, 1, 2), Point3::new(1, 9, 2)),
            Some((Point3::new(0, 1, 2), Point3::new(1, 3, 2)))
        );
        assert_eq!(
            extents.clamp_range(Point3::new(5, 0, 0), Point3::new(7, 1, 1)),
            None
        );
    }
}
