//! # Renderer Hand-off
//!
//! Selects the blocks worth drawing this frame and passes them to a
//! `BlockRenderer`. A block is drawn when it has an exposed face and its
//! bounding sphere intersects the view frustum.
//!
//! GPU resource management belongs to the renderer implementation; the
//! instances built here are plain `bytemuck` data ready for upload.

use log::trace;

use super::camera_state::{camera::CameraUniform, CameraState};
use super::voxels::{visibility, world::World};

/// Per-block instance data for the renderer.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct RenderInstance {
    /// Block centre in world space.
    pub position: [f32; 3],
    /// Row of the block's geometry and texture tables.
    pub geometry_index: u32,
}

/// Something that can draw a frame of block instances.
pub trait BlockRenderer {
    /// Draws `instances` as seen through `camera`.
    fn render(&mut self, camera: &CameraUniform, instances: &[RenderInstance]);
}

/// Renderer that only records how much it was asked to draw.
#[derive(Debug, Default)]
pub struct LoggingRenderer {
    /// Frames submitted so far.
    pub frames: u64,
    /// Instance count of the last frame.
    pub last_instance_count: usize,
}

impl BlockRenderer for LoggingRenderer {
    fn render(&mut self, _camera: &CameraUniform, instances: &[RenderInstance]) {
        self.frames += 1;
        self.last_instance_count = instances.len();
        trace!("Frame {}: {} block instances", self.frames, instances.len());
    }
}

/// Builds the render set into `instances`, reusing its allocation.
///
/// Blocks keep registry order.
pub fn collect_render_set(world: &World, camera: &CameraState, instances: &mut Vec<RenderInstance>) {
    instances.clear();
    let block_size = world.block_size();
    instances.extend(
        visibility::visible_blocks(world)
            .filter(|block| camera.in_frustum(block, block_size))
            .map(|block| RenderInstance {
                position: block.position.into(),
                geometry_index: block.geometry_index(),
            }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraConfig;
    use crate::game_state::voxels::{block::block_type::BlockType, occupancy::WorldExtents};
    use cgmath::Point3;

    #[test]
    fn render_set_skips_hidden_and_off_screen_blocks() {
        let mut world = World::new(WorldExtents::new(12, 12, 12), 1.0);
        // 3x3x3 cube around (5, 5, 5), its centre is buried
        for x in 4..=6 {
            for y in 4..=6 {
                for z in 4..=6 {
                    world.insert(BlockType::DIRT, Point3::new(x, y, z));
                }
            }
        }
        // behind the camera
        world.insert(BlockType::SAND, Point3::new(0, 5, 5));

        let camera = CameraState::new(Point3::new(1.5, 5.0, 5.0), 1.0, CameraConfig::default());
        let mut instances = Vec::new();
        collect_render_set(&world, &camera, &mut instances);

        assert_eq!(instances.len(), 26);
        assert!(instances.iter().all(|i| i.position != [5.0, 5.0, 5.0]));
        assert!(instances.iter().all(|i| i.geometry_index == BlockType::DIRT.geometry_index()));

        let mut renderer = LoggingRenderer::default();
        renderer.render(&camera.camera_uniform, &instances);
        assert_eq!(renderer.last_instance_count, 26);
    }
}
