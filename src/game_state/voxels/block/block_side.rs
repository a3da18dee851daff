//! # Block Side Module
//!
//! This module defines the six faces of a voxel block and their outward
//! lattice normals. Faces drive both neighbour lookups for visibility and the
//! choice of placement cell when building against an existing block.

use cgmath::Vector3;

/// Represents the six possible faces of a voxel block.
///
/// The order is: [FRONT, BACK, BOTTOM, TOP, LEFT, RIGHT]
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The front face (facing positive Z)
    FRONT = 0,

    /// The back face (facing negative Z)
    BACK = 1,

    /// The bottom face (facing negative Y)
    BOTTOM = 2,

    /// The top face (facing positive Y)
    TOP = 3,

    /// The left face (facing negative X)
    LEFT = 4,

    /// The right face (facing positive X)
    RIGHT = 5,
}

impl BlockSide {
    /// Returns an array containing all six block faces in a consistent order.
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::FRONT,
            BlockSide::BACK,
            BlockSide::BOTTOM,
            BlockSide::TOP,
            BlockSide::LEFT,
            BlockSide::RIGHT,
        ]
    }

    /// Unit lattice offset pointing out of this face.
    pub fn normal(self) -> Vector3<i32> {
        match self {
            BlockSide::FRONT => Vector3::new(0, 0, 1),
            BlockSide::BACK => Vector3::new(0, 0, -1),
            BlockSide::BOTTOM => Vector3::new(0, -1, 0),
            BlockSide::TOP => Vector3::new(0, 1, 0),
            BlockSide::LEFT => Vector3::new(-1, 0, 0),
            BlockSide::RIGHT => Vector3::new(1, 0, 0),
        }
    }

    /// Picks the face hit by a point given in the block's local frame
    /// (block centre at the origin).
    ///
    /// The axis with the strictly largest absolute component wins; x and y
    /// must beat both other axes outright, every remaining case (including
    /// ties) resolves to the z axis. The sign of the winning component picks
    /// between the two opposite faces, with zero counting as negative.
    pub fn from_local_point(local: Vector3<f32>) -> BlockSide {
        let (ax, ay, az) = (local.x.abs(), local.y.abs(), local.z.abs());

        if ax > ay && ax > az {
            if local.x > 0.0 {
                BlockSide::RIGHT
            } else {
                BlockSide::LEFT
            }
        } else if ay > ax && ay > az {
            if local.y > 0.0 {
                BlockSide::TOP
            } else {
                BlockSide::BOTTOM
            }
        } else if local.z > 0.0 {
            BlockSide::FRONT
        } else {
            BlockSide::BACK
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normals_are_unit_and_opposed_in_pairs() {
        for side in BlockSide::all() {
            let n = side.normal();
            assert_eq!(n.x.abs() + n.y.abs() + n.z.abs(), 1);
        }
        assert_eq!(BlockSide::FRONT.normal(), -BlockSide::BACK.normal());
        assert_eq!(BlockSide::TOP.normal(), -BlockSide::BOTTOM.normal());
        assert_eq!(BlockSide::RIGHT.normal(), -BlockSide::LEFT.normal());
    }

    #[test]
    fn local_point_picks_dominant_axis() {
        assert_eq!(BlockSide::from_local_point(Vector3::new(0.4, 0.1, -0.2)), BlockSide::RIGHT);
        assert_eq!(BlockSide::from_local_point(Vector3::new(-0.4, 0.1, -0.2)), BlockSide::LEFT);
        assert_eq!(BlockSide::from_local_point(Vector3::new(0.1, 0.3, 0.0)), BlockSide::TOP);
        assert_eq!(BlockSide::from_local_point(Vector3::new(0.1, -0.3, 0.0)), BlockSide::BOTTOM);
        assert_eq!(BlockSide::from_local_point(Vector3::new(0.1, 0.1, -0.3)), BlockSide::BACK);
    }

    #[test]
    fn ties_fall_through_to_z() {
        assert_eq!(BlockSide::from_local_point(Vector3::new(0.3, 0.3, 0.1)), BlockSide::FRONT);
    }
}
