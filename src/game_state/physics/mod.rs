//! # Physics
//!
//! Player kinematics and collision against the block world.
//!
//! - `kinematics`: the physics clock and semi-implicit Euler integration
//! - `player`: the player hitbox, collision queries and axis-separated movement

pub mod kinematics;
pub mod player;
