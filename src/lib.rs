#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Sandbox
//!
//! A first-person block-building sandbox: a bounded voxel world generated
//! from a height field, a walking (or flying) player with axis-separated
//! collision, and block destroy/place through the crosshair.
//!
//! ## Key Modules
//!
//! * `config` - JSON configuration with defaults and validation
//! * `game_state` - The world core: registry, occupancy, terrain, visibility,
//!   frustum and ray targeting, player physics, and the per-tick coordinator
//! * `application_state` - Window, input and the event loop driving the game
//!
//! ## Usage
//!
//! ```no_run
//! fn main() -> Result<(), voxel_sandbox::RunError> {
//!     voxel_sandbox::run()
//! }
//! ```
//!
//! The world core can also be driven headless:
//!
//! ```rust
//! use voxel_sandbox::config::GameConfig;
//! use voxel_sandbox::game_state::{rendering::LoggingRenderer, GameState};
//!
//! let mut config = GameConfig::default();
//! config.world.x_max = 16;
//! config.world.z_max = 16;
//! let mut game = GameState::new(config, 16.0 / 9.0, Box::new(LoggingRenderer::default())).unwrap();
//! game.tick(1.0 / 60.0);
//! assert!(!game.render_set().is_empty());
//! ```

use application_state::ApplicationState;
use log::info;
use thiserror::Error;
use winit::event_loop::EventLoop;

use config::{ConfigError, GameConfig};

mod application_state;
pub mod config;
pub mod game_state;

/// Errors that stop the application before or while running.
#[derive(Debug, Error)]
pub enum RunError {
    /// The configuration file could not be used.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The windowing event loop failed.
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

/// Initializes logging, loads the configuration and runs the game until the window closes.
pub fn run() -> Result<(), RunError> {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");
    let config = GameConfig::load()?;

    let event_loop = EventLoop::new()?;
    let mut state = ApplicationState::new(config);
    event_loop.run_app(&mut state)?;

    info!("Event loop finished");
    Ok(())
}
