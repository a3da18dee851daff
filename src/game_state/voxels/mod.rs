//! # Voxel World Core
//!
//! This module contains the block-grid world: its records, the occupancy
//! index backing every existence query, terrain generation and the
//! visibility filter used before handing blocks to the renderer.
//!
//! ## Architecture
//!
//! * **Block**: block types, faces and the immutable `BlockRecord`
//! * **Occupancy**: dense bit grid, one bit per lattice cell
//! * **World**: the registry owning every record, kept in lockstep with the occupancy grid
//! * **Terrain**: deterministic height-field generator run once at startup
//! * **Visibility**: culls fully buried blocks
//!
//! ## Data Flow
//!
//! 1. The terrain generator populates the world once
//! 2. Interaction inserts and removes records through the world only
//! 3. Physics and targeting query occupancy through the world
//! 4. Each frame the visibility filter and the camera frustum pick the render set

pub mod block;
pub mod occupancy;
pub mod terrain;
pub mod visibility;
pub mod world;
