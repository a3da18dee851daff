//! # Block Interaction
//!
//! Finds the block under the crosshair and applies destroy/create edits.
//!
//! A block is a candidate when the view ray crosses its bounding sphere in
//! front of the camera and its centre lies within the reach distance. The
//! nearest candidate wins; exact distance ties go to the block inserted first.
//!
//! Every edit that is not possible (nothing targeted, placement outside the
//! world, placement into the player) leaves the world untouched.

use cgmath::{MetricSpace, Point3};
use log::debug;

use super::camera_state::camera::{block_radius, Camera, SphereHit};
use super::physics::player::PlayerBody;
use super::voxels::block::{
    block_side::BlockSide, block_type::BlockType, lattice_to_world, neighbour, BlockRecord,
    LatticeCoord,
};
use super::voxels::world::{BlockHandle, World, WorldEditError};

/// The block selected by the view ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayTarget {
    /// Registry handle of the block.
    pub handle: BlockHandle,
    /// Lattice coordinate of the block.
    pub coord: LatticeCoord,
    /// Distance from the camera to the block centre.
    pub distance: f32,
    /// Where the ray enters and leaves the bounding sphere.
    pub hit: SphereHit,
}

/// Result of a place request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceOutcome {
    /// A block now occupies this coordinate.
    Placed(LatticeCoord),
    /// No block is targeted.
    NoTarget,
    /// The adjacent cell is outside the world or already filled.
    Rejected(WorldEditError),
    /// The new block would overlap the player and was rolled back.
    BlockedByPlayer(LatticeCoord),
}

/// Tests one block against the view ray.
fn ray_candidate(camera: &Camera, centre: Point3<f32>, radius: f32, max_distance: f32) -> Option<(f32, SphereHit)> {
    let distance = camera.position.distance(centre);
    if distance > max_distance {
        return None;
    }
    let hit = camera.ray_sphere_hit(centre, radius)?;
    // sphere entirely behind the camera
    if hit.far < 0.0 {
        return None;
    }
    Some((distance, hit))
}

fn is_better(candidate: &RayTarget, best: &Option<RayTarget>) -> bool {
    match best {
        None => true,
        Some(best) => {
            candidate.distance < best.distance
                || (candidate.distance == best.distance && candidate.handle < best.handle)
        }
    }
}

/// Finds the targeted block, looking only at lattice cells within reach.
pub fn find_target(world: &World, camera: &Camera, max_distance: f32) -> Option<RayTarget> {
    let block_size = world.block_size();
    let radius = block_radius(block_size);
    let eye = camera.position;

    let min = Point3::new(
        ((eye.x - max_distance) / block_size).floor() as i32,
        ((eye.y - max_distance) / block_size).floor() as i32,
        ((eye.z - max_distance) / block_size).floor() as i32,
    );
    let max = Point3::new(
        ((eye.x + max_distance) / block_size).ceil() as i32,
        ((eye.y + max_distance) / block_size).ceil() as i32,
        ((eye.z + max_distance) / block_size).ceil() as i32,
    );
    let (lo, hi) = world.extents().clamp_range(min, max)?;

    let mut best = None;
    for y in lo.y..=hi.y {
        for z in lo.z..=hi.z {
            for x in lo.x..=hi.x {
                let coord = Point3::new(x, y, z);
                if !world.exists(coord) {
                    continue;
                }
                let centre = lattice_to_world(coord, block_size);
                let Some((distance, hit)) = ray_candidate(camera, centre, radius, max_distance) else {
                    continue;
                };
                let Some(handle) = world.handle_at(coord) else {
                    continue;
                };
                let candidate = RayTarget {
                    handle,
                    coord,
                    distance,
                    hit,
                };
                if is_better(&candidate, &best) {
                    best = Some(candidate);
                }
            }
        }
    }
    best
}

/// Finds the targeted block by scanning the whole registry in insertion order.
///
/// Always agrees with `find_target`.
pub fn find_target_exhaustive(world: &World, camera: &Camera, max_distance: f32) -> Option<RayTarget> {
    let radius = block_radius(world.block_size());
    let mut best: Option<RayTarget> = None;
    for (handle, block) in world.iter_with_handles() {
        let Some((distance, hit)) = ray_candidate(camera, block.position, radius, max_distance) else {
            continue;
        };
        if best.map_or(true, |b| distance < b.distance) {
            best = Some(RayTarget {
                handle,
                coord: block.coord,
                distance,
                hit,
            });
        }
    }
    best
}

/// Removes the targeted block, returning it.
pub fn destroy_block(world: &mut World, camera: &Camera, max_distance: f32) -> Option<BlockRecord> {
    let target = find_target(world, camera, max_distance)?;
    let removed = world.remove(target.handle);
    if let Some(block) = &removed {
        debug!("Destroyed {:?} at {:?}", block.block_type, block.coord);
    }
    removed
}

/// Face of `target` the view ray enters through.
pub fn entry_face(world: &World, camera: &Camera, target: &RayTarget) -> BlockSide {
    let entry = camera.point_along_ray(target.hit.near);
    let centre = lattice_to_world(target.coord, world.block_size());
    BlockSide::from_local_point(entry - centre)
}

/// Places `block_type` against the face of the targeted block facing the camera.
///
/// The placement is rolled back if the player standing at the camera would
/// then collide with the world.
pub fn create_block(
    world: &mut World,
    camera: &Camera,
    player: &PlayerBody,
    block_type: BlockType,
    max_distance: f32,
) -> PlaceOutcome {
    let Some(target) = find_target(world, camera, max_distance) else {
        return PlaceOutcome::NoTarget;
    };

    let face = entry_face(world, camera, &target);
    let coord = neighbour(target.coord, face.normal());

    let handle = match world.try_insert(block_type, coord) {
        Ok(handle) => handle,
        Err(err) => {
            debug!("Placement rejected: {}", err);
            return PlaceOutcome::Rejected(err);
        }
    };

    if player.collides(world, camera.position).collided {
        world.remove(handle);
        debug!("Placement at {:?} rolled back, it would trap the player", coord);
        return PlaceOutcome::BlockedByPlayer(coord);
    }

    debug!("Placed {:?} at {:?} on {:?} face", block_type, coord, face);
    PlaceOutcome::Placed(coord)
}
