//! # Camera Implementation
//!
//! This module contains the core camera implementation including:
//! - Camera position, orientation and derived basis vectors
//! - Field of view handling (vertical FOV plus the aspect-derived horizontal FOV)
//! - The bounding-sphere frustum test used to cull blocks
//! - The ray/bounding-sphere intersection used to target blocks
//! - Projection matrices and the GPU uniform handed to the renderer
//!
//! Angles are stored in degrees, the way the controls adjust them.

use cgmath::*;

/// Transformation matrix to convert from OpenGL's coordinate system to WGPU's.
///
/// Scales the Z coordinate from [-1, 1] to [-0.5, 0.5], then translates it to [0, 1].
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Pitch limit in degrees, keeps `front` away from the world up axis.
pub const MAX_PITCH_DEG: f32 = 89.0;

/// Radius of the sphere circumscribing a cube of edge `block_size`.
#[inline]
pub fn block_radius(block_size: f32) -> f32 {
    block_size * 3.0_f32.sqrt() / 2.0
}

/// Horizontal field of view (degrees) matching `fov_y_deg` at `aspect`.
pub fn fov_x_deg(fov_y_deg: f32, aspect: f32) -> f32 {
    let half_y = Deg(fov_y_deg / 2.0);
    Deg::from(Rad(2.0 * (aspect * Rad::from(half_y).0.tan()).atan())).0
}

/// Result of intersecting the view ray with a bounding sphere.
///
/// The ray is `position + lambda * front`; `near`/`far` are the two roots.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SphereHit {
    /// Smaller root, the entry point.
    pub near: f32,
    /// Larger root, the exit point.
    pub far: f32,
}

/// Represents a first-person camera in 3D space.
///
/// # Fields
/// - `position`: The camera's position in world space
/// - `yaw`/`pitch`: Orientation in degrees
/// - `front`/`right`/`up`: Orthonormal basis derived from yaw and pitch
/// - `fov_y`/`fov_x`: Vertical and derived horizontal field of view in degrees
#[derive(Debug, Clone)]
pub struct Camera {
    /// The camera's position in world space
    pub position: Point3<f32>,
    /// Horizontal rotation around the world up axis, in `[0, 360)` degrees
    pub yaw: f32,
    /// Vertical rotation, in `[-89, 89]` degrees
    pub pitch: f32,
    /// Normalized view direction
    pub front: Vector3<f32>,
    /// Normalized vector pointing to the camera's right
    pub right: Vector3<f32>,
    /// Normalized vector pointing to the camera's up
    pub up: Vector3<f32>,
    /// Vertical field of view in degrees
    pub fov_y: f32,
    /// Horizontal field of view in degrees, derived from `fov_y` and `aspect`
    pub fov_x: f32,
    /// Viewport width / height
    pub aspect: f32,
    /// Near plane distance
    pub znear: f32,
    /// Far plane distance
    pub zfar: f32,
}

impl Camera {
    /// Creates a new camera with the specified position, orientation and lens.
    ///
    /// # Example
    /// ```rust
    /// use cgmath::Point3;
    /// use voxel_sandbox::game_state::camera_state::camera::Camera;
    ///
    /// // Looking down -z, 60 degree vertical FOV, 16:9 viewport
    /// let camera = Camera::new(Point3::new(0.0, 0.0, 0.0), -90.0, 0.0, 60.0, 16.0 / 9.0, 0.1, 100.0);
    /// assert!(camera.fov_x > camera.fov_y);
    /// ```
    pub fn new(
        position: Point3<f32>,
        yaw: f32,
        pitch: f32,
        fov_y: f32,
        aspect: f32,
        znear: f32,
        zfar: f32,
    ) -> Self {
        let mut camera = Self {
            position,
            yaw,
            pitch,
            front: Vector3::unit_z(),
            right: Vector3::unit_x(),
            up: Vector3::unit_y(),
            fov_y,
            fov_x: fov_x_deg(fov_y, aspect),
            aspect,
            znear,
            zfar,
        };
        camera.update_vectors();
        camera
    }

    /// Recomputes `front`, `right` and `up` from yaw and pitch.
    pub fn update_vectors(&mut self) {
        let (yaw_sin, yaw_cos) = Rad::from(Deg(self.yaw)).0.sin_cos();
        let (pitch_sin, pitch_cos) = Rad::from(Deg(self.pitch)).0.sin_cos();

        self.front = Vector3::new(yaw_cos * pitch_cos, pitch_sin, yaw_sin * pitch_cos).normalize();
        self.right = self.front.cross(Vector3::unit_y()).normalize();
        self.up = self.right.cross(self.front).normalize();
    }

    /// Applies a mouse-look delta (already scaled to degrees).
    ///
    /// Yaw wraps into `[0, 360)`, pitch is clamped to `±MAX_PITCH_DEG`.
    pub fn rotate(&mut self, yaw_delta: f32, pitch_delta: f32) {
        self.yaw = (self.yaw + yaw_delta).rem_euclid(360.0);
        self.pitch = (self.pitch + pitch_delta).clamp(-MAX_PITCH_DEG, MAX_PITCH_DEG);
        self.update_vectors();
    }

    /// Sets the vertical FOV (clamped) and re-derives the horizontal FOV.
    pub fn set_fov_y(&mut self, fov_y: f32, min_fov_y: f32, max_fov_y: f32) {
        self.fov_y = fov_y.clamp(min_fov_y, max_fov_y);
        self.fov_x = fov_x_deg(self.fov_y, self.aspect);
    }

    /// Updates the aspect ratio for viewport resizing.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
        self.fov_x = fov_x_deg(self.fov_y, self.aspect);
    }

    /// `front` projected onto the horizontal plane, for walking.
    pub fn planar_front(&self) -> Vector3<f32> {
        let planar = Vector3::new(self.front.x, 0.0, self.front.z);
        if planar.magnitude2() > f32::EPSILON {
            planar.normalize()
        } else {
            let yaw = Rad::from(Deg(self.yaw)).0;
            Vector3::new(yaw.cos(), 0.0, yaw.sin())
        }
    }

    /// Conservative test of a bounding sphere against the view frustum.
    ///
    /// The centre is projected onto the camera basis; depth must lie within
    /// the near/far planes widened by `radius`, and the up/right components
    /// within the half-angles widened by the sphere. Never rejects a sphere
    /// that intersects the frustum.
    pub fn sphere_in_frustum(&self, centre: Point3<f32>, radius: f32) -> bool {
        let to_centre = centre - self.position;

        let depth = to_centre.dot(self.front);
        if depth < self.znear - radius || depth > self.zfar + radius {
            return false;
        }

        let half_y = Rad::from(Deg(self.fov_y / 2.0)).0;
        let vertical_limit = radius / half_y.cos() + depth * half_y.tan();
        if to_centre.dot(self.up).abs() > vertical_limit {
            return false;
        }

        let half_x = Rad::from(Deg(self.fov_x / 2.0)).0;
        let horizontal_limit = radius / half_x.cos() + depth * half_x.tan();
        to_centre.dot(self.right).abs() <= horizontal_limit
    }

    /// Intersects the view ray with a sphere, returning both roots.
    ///
    /// Solves `|position + lambda * front - centre|^2 = radius^2`; `front` is
    /// unit length so the quadratic's leading coefficient is 1.
    pub fn ray_sphere_hit(&self, centre: Point3<f32>, radius: f32) -> Option<SphereHit> {
        let offset = self.position - centre;
        let b = 2.0 * offset.dot(self.front);
        let c = offset.magnitude2() - radius * radius;
        let discriminant = b * b - 4.0 * c;
        if discriminant < 0.0 {
            return None;
        }
        let root = discriminant.sqrt();
        Some(SphereHit {
            near: 0.5 * (-b - root),
            far: 0.5 * (-b + root),
        })
    }

    /// Point on the view ray at parameter `lambda`.
    pub fn point_along_ray(&self, lambda: f32) -> Point3<f32> {
        self.position + self.front * lambda
    }

    /// Calculates the view matrix for this camera.
    pub fn calc_view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_to_rh(self.position, self.front, Vector3::unit_y())
    }

    /// Calculates the projection matrix, in WGPU clip-space conventions.
    pub fn calc_projection_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(Deg(self.fov_y), self.aspect, self.znear, self.zfar)
    }
}

/// GPU-friendly representation of camera data for shaders.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    // cgmath types are not Pod, so matrices travel as plain arrays
    view_proj: [[f32; 4]; 4],
    position: [f32; 4],
}

impl CameraUniform {
    /// Creates a new camera uniform with an identity matrix and zero position.
    pub fn new() -> Self {
        Self {
            view_proj: cgmath::Matrix4::identity().into(),
            position: [0.0, 0.0, 0.0, 0.0],
        }
    }

    /// Updates the view-projection matrix and position from `camera`.
    pub fn update_view_proj_and_pos(&mut self, camera: &Camera) {
        let viewproj = camera.calc_projection_matrix() * camera.calc_view_matrix();
        self.view_proj = viewproj.into();
        let pos3: [f32; 3] = camera.position.into();
        self.position = [pos3[0], pos3[1], pos3[2], 1.0];
    }

    /// Combined view-projection matrix.
    pub fn view_proj(&self) -> [[f32; 4]; 4] {
        self.view_proj
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}
