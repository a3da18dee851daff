//! # Kinematics
//!
//! Wall-clock driven semi-implicit Euler integration:
//! `v += a * dt; dr = v * dt`.

use cgmath::{Vector3, Zero};
use web_time::Instant;

/// Measures the time between consecutive physics steps.
#[derive(Debug, Clone)]
pub struct PhysicsClock {
    last_time: Instant,
}

impl PhysicsClock {
    /// Creates a clock whose first `delta_time` is measured from now.
    pub fn new() -> Self {
        PhysicsClock {
            last_time: Instant::now(),
        }
    }

    /// Seconds elapsed since the previous call (or since the clock was armed).
    pub fn delta_time(&mut self) -> f32 {
        let now = Instant::now();
        let dt = now.duration_since(self.last_time).as_secs_f32();
        self.last_time = now;
        dt
    }

    /// Restarts the measurement so paused wall time is never integrated.
    pub fn rearm(&mut self) {
        self.last_time = Instant::now();
    }
}

impl Default for PhysicsClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Velocity and constant acceleration of a body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kinematics {
    /// Current velocity, world units per second.
    pub velocity: Vector3<f32>,
    /// Acceleration from external forces (gravity).
    pub acceleration: Vector3<f32>,
}

impl Kinematics {
    /// A body at rest under `acceleration`.
    pub fn at_rest(acceleration: Vector3<f32>) -> Self {
        Kinematics {
            velocity: Vector3::zero(),
            acceleration,
        }
    }

    /// Advances the velocity by `dt` and returns the resulting displacement.
    pub fn integrate(&mut self, dt: f32) -> Vector3<f32> {
        self.velocity += self.acceleration * dt;
        self.velocity * dt
    }
}
