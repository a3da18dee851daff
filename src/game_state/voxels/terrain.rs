//! # Terrain Generation
//!
//! Deterministic height-field terrain. Every `(x, z)` column gets a height in
//! `[0, y_max)`; the column is filled with dirt below that height and capped
//! with a single surface block at the height itself.
//!
//! Multiple height policies are supported:
//! - Cosine product of x and z (the default, smooth rolling hills)
//! - Perlin noise for less regular terrain
//! - Flat terrain for testing
//!
//! Column heights are computed on scoped worker threads (columns never share
//! a lattice cell); insertion into the world stays sequential in `(x, z)`
//! order so the registry's iteration order is reproducible.

use std::thread;

use cgmath::Point3;
use log::info;
use noise::{NoiseFn, Perlin};
use serde::Deserialize;

use super::block::block_type::BlockType;
use super::occupancy::WorldExtents;
use super::world::World;

/// Offset keeping cosine terrain above the floor even in the deepest troughs.
const HEIGHT_BIAS: f64 = 1.1;

/// The method used to compute column heights.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerrainShape {
    /// `max_height * (1.1 + cos(x / w) * cos(z / w))`
    #[default]
    Cosine,
    /// Same envelope as `Cosine`, driven by 2D Perlin noise.
    Perlin,
    /// Every column is exactly `max_height` tall.
    Flat,
}

/// Computes the raw (not yet wrapped into the world) cosine height of a column.
///
/// This is a pure function of its arguments.
pub fn cosine_height(x: i32, z: i32, max_height: i32, wavelength: f64) -> i32 {
    let xf = x as f64 / wavelength;
    let zf = z as f64 / wavelength;
    (max_height as f64 * (HEIGHT_BIAS + xf.cos() * zf.cos())) as i32
}

/// Produces column heights and fills a `World` with terrain.
#[derive(Clone, Debug)]
pub struct TerrainGenerator {
    extents: WorldExtents,
    shape: TerrainShape,
    max_height: i32,
    wavelength: f64,
    perlin: Perlin,
}

impl TerrainGenerator {
    /// Creates a generator for a world of the given extents.
    ///
    /// `seed` only affects `TerrainShape::Perlin`.
    pub fn new(
        extents: WorldExtents,
        shape: TerrainShape,
        max_height: i32,
        wavelength: f64,
        seed: u32,
    ) -> Self {
        assert!(wavelength > 0.0, "terrain wavelength must be positive");
        TerrainGenerator {
            extents,
            shape,
            max_height,
            wavelength,
            perlin: Perlin::new(seed),
        }
    }

    /// Height of column `(x, z)`, always in `[0, y_max)`.
    ///
    /// Raw heights above the world ceiling wrap around modulo `y_max`.
    pub fn height_at(&self, x: i32, z: i32) -> i32 {
        let raw = match self.shape {
            TerrainShape::Cosine => cosine_height(x, z, self.max_height, self.wavelength),
            TerrainShape::Perlin => {
                let sample = self
                    .perlin
                    .get([x as f64 / self.wavelength, z as f64 / self.wavelength]);
                (self.max_height as f64 * (HEIGHT_BIAS + sample)) as i32
            }
            TerrainShape::Flat => self.max_height,
        };
        raw.rem_euclid(self.extents.y_max)
    }

    /// Heights of every column, indexed `x * z_max + z`.
    pub fn column_heights(&self) -> Vec<i32> {
        let x_max = self.extents.x_max as usize;
        let z_max = self.extents.z_max as usize;
        let mut heights = vec![0; x_max * z_max];

        let workers = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
            .min(x_max);
        let rows_per_worker = x_max.div_ceil(workers);

        thread::scope(|scope| {
            for (band, rows) in heights.chunks_mut(rows_per_worker * z_max).enumerate() {
                let first_x = band * rows_per_worker;
                scope.spawn(move || {
                    for (i, height) in rows.iter_mut().enumerate() {
                        let x = (first_x + i / z_max) as i32;
                        let z = (i % z_max) as i32;
                        *height = self.height_at(x, z);
                    }
                });
            }
        });

        heights
    }

    /// Fills `world` with terrain: dirt in `[0, height)` and one `cap` block
    /// at `height` for every column.
    ///
    /// `world` must be empty and share this generator's extents.
    pub fn build_world(&self, world: &mut World, cap: BlockType) {
        assert_eq!(
            world.extents(),
            self.extents,
            "terrain generator and world disagree on extents"
        );

        let heights = self.column_heights();
        let z_max = self.extents.z_max;

        for x in 0..self.extents.x_max {
            for z in 0..z_max {
                let height = heights[(x * z_max + z) as usize];
                for y in 0..height {
                    world.insert(BlockType::DIRT, Point3::new(x, y, z));
                }
                world.insert(cap, Point3::new(x, height, z));
            }
        }

        info!(
            "Generated {:?} terrain: {} blocks over {}x{} columns",
            self.shape,
            world.len(),
            self.extents.x_max,
            self.extents.z_max
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cosine_height_is_deterministic() {
        let first = cosine_height(10, 10, 20, 15.0);
        for _ in 0..10 {
            assert_eq!(cosine_height(10, 10, 20, 15.0), first);
        }
        // cos(2/3)^2 = 0.6172..., 20 * 1.7172 = 34.34
        assert_eq!(first, 34);
    }

    #[test]
    fn heights_stay_inside_world() {
        let extents = WorldExtents::new(40, 16, 40);
        for shape in [TerrainShape::Cosine, TerrainShape::Perlin, TerrainShape::Flat] {
            let generator = TerrainGenerator::new(extents, shape, 20, 15.0, 7);
            for x in 0..40 {
                for z in 0..40 {
                    let h = generator.height_at(x, z);
                    assert!((0..16).contains(&h), "{:?} produced {}", shape, h);
                }
            }
        }
    }

    #[test]
    fn parallel_heights_match_direct_evaluation() {
        let extents = WorldExtents::new(37, 48, 23);
        let generator = TerrainGenerator::new(extents, TerrainShape::Cosine, 20, 15.0, 0);
        let heights = generator.column_heights();
        for x in 0..37 {
            for z in 0..23 {
                assert_eq!(heights[(x * 23 + z) as usize], generator.height_at(x, z));
            }
        }
    }

    #[test]
    fn build_world_fills_columns_and_stays_consistent() {
        let extents = WorldExtents::new(12, 48, 9);
        let generator = TerrainGenerator::new(extents, TerrainShape::Cosine, 20, 15.0, 0);
        let mut world = World::new(extents, 0.5);
        generator.build_world(&mut world, BlockType::GRASS);

        assert!(world.is_consistent());
        let mut expected = 0;
        for x in 0..12 {
            for z in 0..9 {
                let h = generator.height_at(x, z);
                expected += h as usize + 1;
                let cap = world.block_at(Point3::new(x, h, z)).unwrap();
                assert_eq!(cap.block_type, BlockType::GRASS);
                if h > 0 {
                    let below = world.block_at(Point3::new(x, h - 1, z)).unwrap();
                    assert_eq!(below.block_type, BlockType::DIRT);
                }
                if h + 1 < 48 {
                    assert!(!world.exists(Point3::new(x, h + 1, z)));
                }
            }
        }
        assert_eq!(world.len(), expected);
    }

    #[test]
    fn flat_terrain_wraps_modulo_height() {
        let extents = WorldExtents::new(2, 8, 2);
        let generator = TerrainGenerator::new(extents, TerrainShape::Flat, 10, 15.0, 0);
        assert_eq!(generator.height_at(0, 0), 2);
    }
}
