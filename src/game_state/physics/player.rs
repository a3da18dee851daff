//! # Player Body
//!
//! Axis-aligned player hitbox, collision queries against the world and the
//! axis-separated movement resolution that produces sliding contact.
//!
//! The camera sits at the player's eyes; the hitbox centre hangs a fixed
//! distance below it.

use cgmath::{Point3, Vector3};

use crate::game_state::voxels::block::lattice_to_world;
use crate::game_state::voxels::world::World;

use super::kinematics::Kinematics;

/// Outcome of a collision query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionReport {
    /// The hitbox overlaps at least one block on all three axes.
    pub collided: bool,
    /// One of the overlapping blocks is directly under the player's feet.
    pub grounded: bool,
}

/// Shape of the player hitbox relative to the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerBody {
    /// Full hitbox size per axis.
    pub size: Vector3<f32>,
    /// Distance from the eyes down to the hitbox centre.
    pub eye_to_centre: f32,
    /// How far the feet may sink below a block top and still count as standing on it.
    pub ground_epsilon: f32,
}

impl PlayerBody {
    /// Hitbox centre for a camera at `eye`.
    #[inline]
    pub fn centre(&self, eye: Point3<f32>) -> Point3<f32> {
        Point3::new(eye.x, eye.y - self.eye_to_centre, eye.z)
    }

    /// Tests the hitbox at `eye` against a single block centred at `block_centre`.
    fn test_block(
        &self,
        centre: Point3<f32>,
        block_centre: Point3<f32>,
        block_size: f32,
        report: &mut CollisionReport,
    ) {
        let reach = self.size / 2.0 + Vector3::new(block_size, block_size, block_size) / 2.0;
        let overlaps = (centre.x - block_centre.x).abs() < reach.x
            && (centre.y - block_centre.y).abs() < reach.y
            && (centre.z - block_centre.z).abs() < reach.z;
        if !overlaps {
            return;
        }

        report.collided = true;
        let player_bottom = centre.y - self.size.y / 2.0;
        let block_top = block_centre.y + block_size / 2.0;
        if player_bottom - block_top > -self.ground_epsilon {
            report.grounded = true;
        }
    }

    /// Collision query restricted to the lattice cells under the hitbox.
    ///
    /// Every overlapping block is examined so the report never depends on
    /// enumeration order.
    pub fn collides(&self, world: &World, eye: Point3<f32>) -> CollisionReport {
        let block_size = world.block_size();
        let centre = self.centre(eye);
        let reach = self.size / 2.0 + Vector3::new(block_size, block_size, block_size) / 2.0;

        let min = Point3::new(
            ((centre.x - reach.x) / block_size).floor() as i32,
            ((centre.y - reach.y) / block_size).floor() as i32,
            ((centre.z - reach.z) / block_size).floor() as i32,
        );
        let max = Point3::new(
            ((centre.x + reach.x) / block_size).ceil() as i32,
            ((centre.y + reach.y) / block_size).ceil() as i32,
            ((centre.z + reach.z) / block_size).ceil() as i32,
        );

        let mut report = CollisionReport::default();
        let Some((lo, hi)) = world.extents().clamp_range(min, max) else {
            return report;
        };

        for y in lo.y..=hi.y {
            for z in lo.z..=hi.z {
                for x in lo.x..=hi.x {
                    let coord = Point3::new(x, y, z);
                    if world.exists(coord) {
                        self.test_block(centre, lattice_to_world(coord, block_size), block_size, &mut report);
                    }
                }
            }
        }
        report
    }

    /// Collision query scanning every block in the world.
    ///
    /// Always agrees with `collides`; kept for verification.
    pub fn collides_exhaustive(&self, world: &World, eye: Point3<f32>) -> CollisionReport {
        let centre = self.centre(eye);
        let mut report = CollisionReport::default();
        for block in world.iter() {
            self.test_block(centre, block.position, world.block_size(), &mut report);
        }
        report
    }
}

/// Mutable physical state of the player.
#[derive(Debug, Clone)]
pub struct PlayerState {
    /// Hitbox definition.
    pub body: PlayerBody,
    /// Velocity and acceleration.
    pub kinematics: Kinematics,
    /// Set by the last vertical move that was stopped by a block underfoot.
    pub on_ground: bool,
}

impl PlayerState {
    /// Creates a resting player under `gravity` (pointing down, units/s²).
    pub fn new(body: PlayerBody, gravity: f32) -> Self {
        PlayerState {
            body,
            kinematics: Kinematics::at_rest(Vector3::new(0.0, -gravity, 0.0)),
            on_ground: false,
        }
    }

    /// Applies a jump impulse reaching `height` under the current gravity.
    ///
    /// Only allowed while standing still vertically on the ground.
    pub fn try_jump(&mut self, height: f32) -> bool {
        #[allow(clippy::float_cmp)]
        let resting = self.kinematics.velocity.y == 0.0;
        if !self.on_ground || !resting {
            return false;
        }
        let gravity = -self.kinematics.acceleration.y;
        if gravity <= 0.0 {
            return false;
        }
        self.kinematics.velocity.y = (2.0 * gravity * height).sqrt();
        self.on_ground = false;
        true
    }

    /// Advances one tick and returns the new eye position.
    ///
    /// The integrated displacement plus `input_velocity * dt` is applied one
    /// axis at a time (x, y, z). An axis whose move would collide keeps its
    /// old coordinate and has its velocity zeroed.
    pub fn step(
        &mut self,
        world: &World,
        eye: Point3<f32>,
        input_velocity: Vector3<f32>,
        dt: f32,
    ) -> Point3<f32> {
        let displacement = self.kinematics.integrate(dt) + input_velocity * dt;
        let mut position = eye;

        for axis in 0..3 {
            if displacement[axis] == 0.0 {
                continue;
            }
            let mut candidate = position;
            candidate[axis] += displacement[axis];

            let report = self.body.collides(world, candidate);
            if axis == 1 {
                self.on_ground = report.collided && report.grounded;
            }
            if report.collided {
                self.kinematics.velocity[axis] = 0.0;
            } else {
                position = candidate;
            }
        }
        position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::voxels::{block::block_type::BlockType, occupancy::WorldExtents};

    const BS: f32 = 0.5;

    fn body() -> PlayerBody {
        PlayerBody {
            size: Vector3::new(0.3, 0.9, 0.3),
            eye_to_centre: 0.35,
            ground_epsilon: 0.1,
        }
    }

    fn floor_world() -> World {
        let mut world = World::new(WorldExtents::new(10, 10, 10), BS);
        for x in 0..10 {
            for z in 0..10 {
                world.insert(BlockType::DIRT, Point3::new(x, 0, z));
            }
        }
        world
    }

    /// Eye height at which the feet rest exactly on the y = 0 floor.
    fn standing_eye_y(body: &PlayerBody) -> f32 {
        BS / 2.0 + body.size.y / 2.0 + body.eye_to_centre
    }

    #[test]
    fn single_axis_offset_alone_does_not_collide() {
        let mut world = World::new(WorldExtents::new(10, 10, 10), BS);
        world.insert(BlockType::DIRT, Point3::new(5, 5, 5));
        let body = body();
        let block = lattice_to_world(Point3::new(5, 5, 5), BS);
        // eye placed so the hitbox centre lines up with the block, then shifted
        let aligned = Point3::new(block.x, block.y + body.eye_to_centre, block.z);

        assert!(body.collides(&world, aligned).collided);
        let shifted = Point3::new(aligned.x + BS * 0.6, aligned.y + 10.0 * BS, aligned.z);
        assert!(!body.collides(&world, shifted).collided);
        let x_only = Point3::new(aligned.x + BS * 0.6, aligned.y, aligned.z);
        assert!(body.collides(&world, x_only).collided);
    }

    #[test]
    fn lattice_query_matches_exhaustive_scan() {
        let mut world = floor_world();
        world.insert(BlockType::SAND, Point3::new(4, 1, 4));
        world.insert(BlockType::SAND, Point3::new(4, 2, 4));
        let body = body();
        let base_y = standing_eye_y(&body);

        for i in 0..40 {
            for j in 0..40 {
                for k in 0..6 {
                    let eye = Point3::new(
                        1.0 + i as f32 * 0.07,
                        base_y - 0.2 + k as f32 * 0.09,
                        1.0 + j as f32 * 0.07,
                    );
                    assert_eq!(body.collides(&world, eye), body.collides_exhaustive(&world, eye));
                }
            }
        }
    }

    #[test]
    fn grounded_only_when_feet_near_block_top() {
        let world = floor_world();
        let body = body();
        let eye_y = standing_eye_y(&body);

        let sunk = body.collides(&world, Point3::new(2.0, eye_y - 0.05, 2.0));
        assert_eq!(sunk, CollisionReport { collided: true, grounded: true });

        let deep = body.collides(&world, Point3::new(2.0, eye_y - 0.3, 2.0));
        assert_eq!(deep, CollisionReport { collided: true, grounded: false });

        let above = body.collides(&world, Point3::new(2.0, eye_y + 0.01, 2.0));
        assert_eq!(above, CollisionReport::default());
    }

    #[test]
    fn falling_player_lands_and_can_jump() {
        let world = floor_world();
        let mut player = PlayerState::new(body(), 9.8);
        let mut eye = Point3::new(2.0, standing_eye_y(&player.body) + 1.0, 2.0);

        for _ in 0..240 {
            eye = player.step(&world, eye, Vector3::new(0.0, 0.0, 0.0), 1.0 / 60.0);
        }
        assert!(player.on_ground);
        assert_eq!(player.kinematics.velocity.y, 0.0);
        let resting = standing_eye_y(&player.body);
        assert!(eye.y > resting - 1e-4 && eye.y < resting + 0.01, "eye at {}", eye.y);

        assert!(player.try_jump(BS));
        assert!(player.kinematics.velocity.y > 0.0);
        assert!(!player.try_jump(BS));
    }

    #[test]
    fn jump_refused_in_mid_air() {
        let mut player = PlayerState::new(body(), 9.8);
        assert!(!player.try_jump(BS));
        player.on_ground = true;
        player.kinematics.velocity.y = -1.0;
        assert!(!player.try_jump(BS));
    }

    #[test]
    fn blocked_axis_slides_along_wall() {
        let mut world = floor_world();
        for z in 0..10 {
            world.insert(BlockType::SAND, Point3::new(6, 1, z));
            world.insert(BlockType::SAND, Point3::new(6, 2, z));
        }
        let mut player = PlayerState::new(body(), 0.0);
        let start = Point3::new(2.5, standing_eye_y(&player.body) + 0.001, 2.0);
        // push diagonally into the wall centred at x = 3.0
        let eye = player.step(&world, start, Vector3::new(4.0, 0.0, 1.0), 0.1);

        assert_eq!(eye.x, start.x);
        assert!((eye.z - (start.z + 0.1)).abs() < 1e-6);
        assert_eq!(player.kinematics.velocity.x, 0.0);
    }
}
