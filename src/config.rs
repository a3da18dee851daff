//! # Configuration
//!
//! Game settings loaded from a JSON file. Every field has a default, so a
//! partial file (or no file at all) is valid.
//!
//! The file is looked up at the path in `VOXEL_SANDBOX_CONFIG`, falling back to
//! `voxel_sandbox.json` in the working directory.

use std::{fs, io, path::Path};

use log::info;
use serde::Deserialize;
use thiserror::Error;

use crate::game_state::voxels::{block::block_type::BlockType, terrain::TerrainShape};

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "VOXEL_SANDBOX_CONFIG";

/// Config file used when the environment variable is unset.
pub const DEFAULT_CONFIG_PATH: &str = "voxel_sandbox.json";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] io::Error),
    /// The file is not valid JSON for `GameConfig`.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
    /// The file parsed but holds unusable values.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// How the player moves.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// Gravity, jumping and walking.
    #[default]
    Survival,
    /// No gravity; Space and Shift fly up and down.
    Creative,
}

impl GameMode {
    /// Surface block used to cap terrain columns.
    pub fn terrain_cap(self) -> BlockType {
        match self {
            GameMode::Survival => BlockType::GRASS,
            GameMode::Creative => BlockType::OAK_LOG,
        }
    }
}

/// World lattice dimensions.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Cells along x.
    pub x_max: i32,
    /// Cells along y.
    pub y_max: i32,
    /// Cells along z.
    pub z_max: i32,
    /// Edge length of one block in world units.
    pub block_size: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            x_max: 128,
            y_max: 48,
            z_max: 128,
            block_size: 0.5,
        }
    }
}

/// Terrain generation settings.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Height policy.
    pub shape: TerrainShape,
    /// Amplitude of the height field, in blocks.
    pub max_height: i32,
    /// Horizontal scale of the height field, in blocks.
    pub wavelength: f64,
    /// Perlin seed; a random seed is drawn when unset.
    pub seed: Option<u32>,
    /// Name of the surface block, overriding the game mode's choice.
    pub cap_block: Option<String>,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            shape: TerrainShape::Cosine,
            max_height: 20,
            wavelength: 15.0,
            seed: None,
            cap_block: None,
        }
    }
}

/// Player movement and hitbox.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Walking speed in world units per second.
    pub speed: f32,
    /// Speed factor while sprinting.
    pub sprint_multiplier: f32,
    /// Full hitbox size `[x, y, z]`.
    pub size: [f32; 3],
    /// Distance from the eyes down to the hitbox centre.
    pub eye_to_centre: f32,
    /// Downward acceleration in survival mode.
    pub gravity: f32,
    /// How far the feet may sink into a block top and still count as grounded.
    pub ground_epsilon: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            speed: 2.5,
            sprint_multiplier: 2.0,
            size: [0.3, 0.9, 0.3],
            eye_to_centre: 0.35,
            gravity: 9.8,
            ground_epsilon: 0.1,
        }
    }
}

/// Camera lens and controls. Angles in degrees.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Initial vertical field of view.
    pub fov_y: f32,
    /// Narrowest zoom.
    pub min_fov_y: f32,
    /// Widest zoom.
    pub max_fov_y: f32,
    /// Near plane distance.
    pub near: f32,
    /// Far plane distance.
    pub far: f32,
    /// Degrees of rotation per pixel of mouse movement.
    pub mouse_sensitivity: f32,
    /// Degrees of FOV change per scroll line.
    pub scroll_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y: 60.0,
            min_fov_y: 20.0,
            max_fov_y: 110.0,
            near: 0.1,
            far: 100.0,
            mouse_sensitivity: 0.1,
            scroll_speed: 2.0,
        }
    }
}

/// Block editing settings.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Reach of the view ray in world units.
    pub max_ray_distance: f32,
    /// Seconds between two consecutive edits.
    pub click_cooldown: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            max_ray_distance: 4.0,
            click_cooldown: 0.25,
        }
    }
}

/// Complete game configuration.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// World lattice.
    pub world: WorldConfig,
    /// Terrain generation.
    pub terrain: TerrainConfig,
    /// Player movement.
    pub player: PlayerConfig,
    /// Camera lens and controls.
    pub camera: CameraConfig,
    /// Block editing.
    pub interaction: InteractionConfig,
    /// Starting game mode.
    pub mode: GameMode,
}

impl GameConfig {
    /// Parses and validates a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates the file at `path`.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Loads the configured file, or defaults when it does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        match Self::load_from(&path) {
            Err(ConfigError::Io(err)) if err.kind() == io::ErrorKind::NotFound => {
                info!("No config file at {}, using defaults", path);
                Ok(Self::default())
            }
            Ok(config) => {
                info!("Loaded config from {}", path);
                Ok(config)
            }
            result => result,
        }
    }

    /// Surface block for terrain columns.
    pub fn terrain_cap(&self) -> Result<BlockType, ConfigError> {
        match &self.terrain.cap_block {
            None => Ok(self.mode.terrain_cap()),
            Some(name) => BlockType::from_name(name)
                .filter(|block| *block != BlockType::NONE)
                .ok_or_else(|| ConfigError::Invalid(format!("unknown block type '{}'", name))),
        }
    }

    /// Checks value ranges that deserialization cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        let world = &self.world;
        if world.x_max <= 0 || world.y_max <= 0 || world.z_max <= 0 {
            return invalid("world extents must be positive");
        }
        if world.block_size <= 0.0 {
            return invalid("block size must be positive");
        }
        if self.terrain.wavelength <= 0.0 {
            return invalid("terrain wavelength must be positive");
        }
        if self.player.size.iter().any(|s| *s <= 0.0) {
            return invalid("player size must be positive");
        }

        let camera = &self.camera;
        let fov_range = 0.0..180.0;
        if !(fov_range.contains(&camera.min_fov_y) && camera.min_fov_y > 0.0)
            || !(fov_range.contains(&camera.max_fov_y) && camera.max_fov_y > 0.0)
        {
            return invalid("field of view limits must lie in (0, 180)");
        }
        if camera.min_fov_y > camera.max_fov_y {
            return invalid("min_fov_y is larger than max_fov_y");
        }
        if !(camera.min_fov_y..=camera.max_fov_y).contains(&camera.fov_y) {
            return invalid("fov_y lies outside [min_fov_y, max_fov_y]");
        }
        if camera.near <= 0.0 || camera.near >= camera.far {
            return invalid("near plane must be positive and closer than the far plane");
        }
        if self.interaction.max_ray_distance <= 0.0 || self.interaction.click_cooldown < 0.0 {
            return invalid("interaction distances and cooldowns must not be negative");
        }

        self.terrain_cap()?;
        Ok(())
    }
}
