//! # Camera State Management
//!
//! This module handles all camera-related functionality including:
//! - Camera position and orientation tracking
//! - Mouse look and scroll zoom
//! - View and projection matrix calculations
//! - Frustum and view-ray queries against blocks
//!
//! ## Core Components
//! - `Camera`: position, orientation and lens of the first-person view
//! - `CameraUniform`: GPU representation of camera data for shaders
//! - `CameraState`: the camera together with its control settings

use cgmath::Point3;
use log::debug;

use crate::config::CameraConfig;
use crate::game_state::voxels::block::BlockRecord;

pub mod camera;

/// The player's camera plus the settings its controls use.
///
/// # Fields
/// - `camera`: The current camera state (position, orientation, lens)
/// - `camera_uniform`: GPU-optimized camera data for shaders
/// - `settings`: Sensitivity, zoom speed and FOV limits
#[derive(Debug, Clone)]
pub struct CameraState {
    /// The current camera position and orientation
    pub camera: camera::Camera,
    /// GPU-optimized camera data for shaders
    pub camera_uniform: camera::CameraUniform,
    /// Control settings
    pub settings: CameraConfig,
}

impl CameraState {
    /// Creates a camera at `position` looking along +x.
    pub fn new(position: Point3<f32>, aspect: f32, settings: CameraConfig) -> Self {
        let camera = camera::Camera::new(
            position,
            0.0,
            0.0,
            settings.fov_y,
            aspect,
            settings.near,
            settings.far,
        );
        let mut camera_uniform = camera::CameraUniform::new();
        camera_uniform.update_view_proj_and_pos(&camera);

        Self {
            camera,
            camera_uniform,
            settings,
        }
    }

    /// Applies a raw mouse delta in pixels. Screen y grows downwards.
    pub fn process_mouse(&mut self, dx: f64, dy: f64) {
        let sensitivity = self.settings.mouse_sensitivity;
        self.camera
            .rotate(dx as f32 * sensitivity, -(dy as f32) * sensitivity);
    }

    /// Applies a scroll delta (in lines) as a field of view change.
    pub fn process_scroll(&mut self, lines: f32) {
        let fov_y = self.camera.fov_y - self.settings.scroll_speed * lines;
        self.camera
            .set_fov_y(fov_y, self.settings.min_fov_y, self.settings.max_fov_y);
        debug!(
            "FOV set to {:.1} (horizontal {:.1})",
            self.camera.fov_y, self.camera.fov_x
        );
    }

    /// Updates the aspect ratio after a window resize.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.resize(width, height);
    }

    /// Whether `block`'s bounding sphere intersects the view frustum.
    pub fn in_frustum(&self, block: &BlockRecord, block_size: f32) -> bool {
        self.camera
            .sphere_in_frustum(block.position, camera::block_radius(block_size))
    }

    /// Refreshes the GPU uniform from the camera.
    pub fn update_uniform(&mut self) {
        self.camera_uniform.update_view_proj_and_pos(&self.camera);
    }
}
