//! # Game State Module
//!
//! The core module that owns the block world and drives it one tick at a time.
//!
//! ## Key Components
//!
//! * `GameState` - The central coordinator owning every subsystem
//! * `camera_state` - Camera orientation, lens, frustum and view ray queries
//! * `voxels` - Block records, the occupancy index, terrain and visibility
//! * `physics` - Player kinematics and collision
//! * `interaction` - Block targeting, destroy and create
//! * `rendering` - Render set selection and the renderer interface
//! * `frame_stats` - Frame rate tracking
//!
//! ## Architecture
//!
//! `GameState` is the single owner of the world and is passed explicitly to
//! whoever drives it. Each tick runs to completion on the calling thread:
//! input translation, player physics, world edits, then render set selection.

use cgmath::{Point3, Vector3, Zero};
use log::{debug, info};
use winit::{event::MouseButton, keyboard::KeyCode};

use camera_state::CameraState;
use frame_stats::FrameStats;
use physics::{
    kinematics::PhysicsClock,
    player::{PlayerBody, PlayerState},
};
use rendering::{BlockRenderer, RenderInstance};
use voxels::{
    block::block_type::BlockType,
    occupancy::WorldExtents,
    terrain::TerrainGenerator,
    world::World,
};

use crate::{
    application_state::input_state::ProcessedInputState,
    config::{ConfigError, GameConfig, GameMode},
};

pub mod camera_state;
pub mod frame_stats;
pub mod interaction;
pub mod physics;
pub mod rendering;
pub mod voxels;

/// Frames between two frame rate log lines.
const FPS_REPORT_INTERVAL: u64 = 600;

/// Hotbar keys, in slot order.
const HOTBAR_KEYS: [KeyCode; 7] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
    KeyCode::Digit7,
];

/// Whether the game is running or paused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameFlow {
    /// Input drives the player and the world.
    InGame,
    /// Only rendering continues; the cursor is released.
    Paused,
}

/// The main state container for the game.
///
/// Owns the world, the camera and the player, and advances them together.
pub struct GameState {
    /// The block world
    pub world: World,
    /// Camera state managing position, orientation and lens
    pub camera_state: CameraState,
    /// Player physics
    pub player: PlayerState,
    /// Current player actions derived from input
    pub player_actions: PlayerAction,
    config: GameConfig,
    mode: GameMode,
    flow: GameFlow,
    block_to_place: BlockType,
    since_last_edit: f32,
    discard_next_mouse_delta: bool,
    clock: PhysicsClock,
    frame_stats: FrameStats,
    renderer: Box<dyn BlockRenderer>,
    instances: Vec<RenderInstance>,
}

impl GameState {
    /// Builds the world from `config` and spawns the player above the centre column.
    ///
    /// # Arguments
    ///
    /// * `config` - Validated game configuration
    /// * `aspect` - Initial viewport width / height
    /// * `renderer` - Receives the render set every tick
    ///
    /// # Returns
    ///
    /// A ready to run `GameState`, or the configuration problem that prevented it
    pub fn new(
        config: GameConfig,
        aspect: f32,
        renderer: Box<dyn BlockRenderer>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let cap = config.terrain_cap()?;

        let extents = WorldExtents::new(config.world.x_max, config.world.y_max, config.world.z_max);
        let seed = config.terrain.seed.unwrap_or_else(|| fastrand::u32(..));
        let generator = TerrainGenerator::new(
            extents,
            config.terrain.shape,
            config.terrain.max_height,
            config.terrain.wavelength,
            seed,
        );
        let mut world = World::new(extents, config.world.block_size);
        generator.build_world(&mut world, cap);

        let body = PlayerBody {
            size: Vector3::from(config.player.size),
            eye_to_centre: config.player.eye_to_centre,
            ground_epsilon: config.player.ground_epsilon,
        };
        let player = PlayerState::new(body, mode_gravity(config.mode, config.player.gravity));

        let spawn = spawn_point(&world, &body);
        info!("Spawning player at ({:.2}, {:.2}, {:.2})", spawn.x, spawn.y, spawn.z);
        let camera_state = CameraState::new(spawn, aspect, config.camera.clone());

        Ok(Self {
            world,
            camera_state,
            player,
            player_actions: PlayerAction::default(),
            mode: config.mode,
            flow: GameFlow::InGame,
            block_to_place: BlockType::DIRT,
            since_last_edit: config.interaction.click_cooldown,
            discard_next_mouse_delta: false,
            clock: PhysicsClock::new(),
            frame_stats: FrameStats::new(FPS_REPORT_INTERVAL),
            renderer,
            instances: Vec::new(),
            config,
        })
    }

    /// Current game mode.
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// Whether the game is running or paused.
    pub fn flow(&self) -> GameFlow {
        self.flow
    }

    /// Block type placed by the next create action.
    pub fn block_to_place(&self) -> BlockType {
        self.block_to_place
    }

    /// Blocks handed to the renderer on the last tick.
    pub fn render_set(&self) -> &[RenderInstance] {
        &self.instances
    }

    /// Frame rate statistics.
    pub fn frame_stats(&self) -> &FrameStats {
        &self.frame_stats
    }

    /// The configuration the game was built from.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Updates the camera after the window size changes.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera_state.resize(width, height);
    }

    /// Sets the input commands for the next tick.
    ///
    /// # Arguments
    /// * `input` - The processed input state to use for setting commands
    pub(crate) fn set_input_commands(&mut self, input: ProcessedInputState) {
        self.player_actions = translate_processed_input(&input);
    }

    /// Advances one tick using the wall time elapsed since the previous one.
    pub fn update(&mut self) {
        let dt = self.clock.delta_time();
        self.tick(dt);
    }

    /// Advances one tick of `dt` seconds using the pending player actions.
    pub fn tick(&mut self, dt: f32) {
        self.frame_stats.record(dt);
        let actions = std::mem::take(&mut self.player_actions);

        if actions.toggle_pause {
            self.toggle_pause();
        }

        if self.flow == GameFlow::InGame {
            self.apply_view_actions(&actions);
            self.move_player(&actions, dt);
            self.apply_edit_actions(&actions, dt);
        }

        self.render();
    }

    fn toggle_pause(&mut self) {
        self.flow = match self.flow {
            GameFlow::InGame => {
                info!("Game paused");
                GameFlow::Paused
            }
            GameFlow::Paused => {
                info!("Game resumed");
                self.clock.rearm();
                self.discard_next_mouse_delta = true;
                GameFlow::InGame
            }
        };
    }

    fn apply_view_actions(&mut self, actions: &PlayerAction) {
        if let Some((dx, dy)) = actions.rotate_view {
            if self.discard_next_mouse_delta {
                self.discard_next_mouse_delta = false;
            } else {
                self.camera_state.process_mouse(dx, dy);
            }
        }
        if actions.zoom != 0.0 {
            self.camera_state.process_scroll(actions.zoom);
        }
        if let Some(block) = actions.select_block {
            if block != self.block_to_place {
                debug!("Selected {:?}", block);
            }
            self.block_to_place = block;
        }
    }

    /// Velocity the player asks for this tick, excluding gravity.
    fn input_velocity(&self, actions: &PlayerAction) -> Vector3<f32> {
        let camera = &self.camera_state.camera;
        let forward = camera.planar_front();
        let right = camera.right;

        let mut velocity = Vector3::zero();
        if actions.move_forward {
            velocity += forward;
        }
        if actions.move_backward {
            velocity -= forward;
        }
        if actions.move_right {
            velocity += right;
        }
        if actions.move_left {
            velocity -= right;
        }
        if self.mode == GameMode::Creative {
            if actions.move_up {
                velocity += Vector3::unit_y();
            }
            if actions.move_down {
                velocity -= Vector3::unit_y();
            }
        }

        let mut speed = self.config.player.speed;
        if actions.sprint {
            speed *= self.config.player.sprint_multiplier;
        }
        velocity * speed
    }

    fn move_player(&mut self, actions: &PlayerAction, dt: f32) {
        if self.mode == GameMode::Survival && actions.move_up {
            let jump_height = self.world.block_size();
            if self.player.try_jump(jump_height) {
                debug!("Jump");
            }
        }

        let input_velocity = self.input_velocity(actions);
        let eye = self.camera_state.camera.position;
        let new_eye = self.player.step(&self.world, eye, input_velocity, dt);
        self.camera_state.camera.position = new_eye;
    }

    fn apply_edit_actions(&mut self, actions: &PlayerAction, dt: f32) {
        self.since_last_edit += dt;
        if self.since_last_edit < self.config.interaction.click_cooldown {
            return;
        }

        let reach = self.config.interaction.max_ray_distance;
        let camera = &self.camera_state.camera;
        if actions.destroy {
            self.since_last_edit = 0.0;
            interaction::destroy_block(&mut self.world, camera, reach);
        } else if actions.create {
            self.since_last_edit = 0.0;
            interaction::create_block(
                &mut self.world,
                camera,
                &self.player.body,
                self.block_to_place,
                reach,
            );
        }
    }

    fn render(&mut self) {
        self.camera_state.update_uniform();
        rendering::collect_render_set(&self.world, &self.camera_state, &mut self.instances);
        self.renderer
            .render(&self.camera_state.camera_uniform, &self.instances);
    }
}

fn mode_gravity(mode: GameMode, gravity: f32) -> f32 {
    match mode {
        GameMode::Survival => gravity,
        GameMode::Creative => 0.0,
    }
}

/// Eye position standing on the highest block of the centre column.
fn spawn_point(world: &World, body: &PlayerBody) -> Point3<f32> {
    let extents = world.extents();
    let block_size = world.block_size();
    let x = extents.x_max / 2;
    let z = extents.z_max / 2;
    let top = (0..extents.y_max)
        .rev()
        .find(|&y| world.exists(Point3::new(x, y, z)))
        .unwrap_or(-1);

    // a small gap keeps the first collision test from touching the surface
    let feet = (top as f32 + 0.5) * block_size + 0.01;
    Point3::new(
        x as f32 * block_size,
        feet + body.size.y / 2.0 + body.eye_to_centre,
        z as f32 * block_size,
    )
}

/// Translates the processed input state into player actions.
///
/// # Arguments
/// * `input` - The processed input state to translate
///
/// # Returns
/// A PlayerAction struct with the appropriate actions set
pub(crate) fn translate_processed_input(input: &ProcessedInputState) -> PlayerAction {
    let mut player_action = PlayerAction {
        // Movement actions - active if key is pressed or held
        move_forward: input.get_key_state(KeyCode::KeyW).is_active(),
        move_backward: input.get_key_state(KeyCode::KeyS).is_active(),
        move_left: input.get_key_state(KeyCode::KeyA).is_active(),
        move_right: input.get_key_state(KeyCode::KeyD).is_active(),
        move_up: input.get_key_state(KeyCode::Space).is_active(),
        move_down: input.get_key_state(KeyCode::ShiftLeft).is_active(),
        sprint: input.get_key_state(KeyCode::ControlLeft).is_active(),

        // Edits repeat while held, limited by the edit cooldown
        destroy: input.get_mouse_button_state(MouseButton::Left).is_active(),
        create: input.get_mouse_button_state(MouseButton::Right).is_active(),

        rotate_view: input.get_mouse_delta(),
        zoom: input.get_scroll_lines(),

        // Escape only on press, not hold
        toggle_pause: input.get_key_state(KeyCode::Escape).is_just_pressed(),
        select_block: None,
    };

    for (slot, key) in HOTBAR_KEYS.into_iter().enumerate() {
        if input.get_key_state(key).is_active() {
            player_action.select_block = BlockType::from_hotbar_slot(slot as u8 + 1);
        }
    }

    player_action
}

/// Represents player actions derived from input
///
/// This struct contains flags for the actions one tick can perform:
/// movement, camera control, block selection and world edits.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerAction {
    /// Walk along the horizontal view direction
    pub move_forward: bool,
    /// Walk against the horizontal view direction
    pub move_backward: bool,
    /// Strafe left
    pub move_left: bool,
    /// Strafe right
    pub move_right: bool,
    /// Jump in survival, fly up in creative
    pub move_up: bool,
    /// Fly down in creative
    pub move_down: bool,
    /// Multiply walking speed
    pub sprint: bool,
    /// Remove the targeted block
    pub destroy: bool,
    /// Place a block against the targeted block
    pub create: bool,
    /// Raw mouse delta in pixels
    pub rotate_view: Option<(f64, f64)>,
    /// Scroll lines, positive away from the user
    pub zoom: f32,
    /// Block chosen from the hotbar
    pub select_block: Option<BlockType>,
    /// Switch between playing and paused
    pub toggle_pause: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application_state::input_state::RawInputState;
    use voxels::terrain::TerrainShape;

    fn small_config(mode: GameMode) -> GameConfig {
        let mut config = GameConfig::default();
        config.world.x_max = 16;
        config.world.y_max = 16;
        config.world.z_max = 16;
        config.terrain.shape = TerrainShape::Flat;
        config.terrain.max_height = 4;
        config.mode = mode;
        config
    }

    fn small_game(mode: GameMode) -> GameState {
        GameState::new(small_config(mode), 1.0, Box::new(rendering::LoggingRenderer::default())).unwrap()
    }

    #[test]
    fn input_translates_into_actions() {
        let mut input = ProcessedInputState::default();
        input.keyboard_states.insert(KeyCode::KeyW, RawInputState::Held);
        input.keyboard_states.insert(KeyCode::Digit3, RawInputState::Pressed);
        input.keyboard_states.insert(KeyCode::Escape, RawInputState::Held);
        input.mouse_button_states.insert(MouseButton::Right, RawInputState::Pressed);
        input.mouse_delta = Some((4.0, -2.0));
        input.scroll_lines = 1.5;

        let actions = translate_processed_input(&input);
        assert!(actions.move_forward);
        assert!(!actions.move_backward);
        assert!(actions.create);
        assert!(!actions.destroy);
        assert_eq!(actions.select_block, Some(BlockType::DIRT));
        // held, not just pressed
        assert!(!actions.toggle_pause);
        assert_eq!(actions.rotate_view, Some((4.0, -2.0)));
        assert_eq!(actions.zoom, 1.5);
    }

    #[test]
    fn terrain_cap_follows_mode() {
        let survival = small_game(GameMode::Survival);
        assert_eq!(survival.world.block_at(Point3::new(3, 4, 3)).unwrap().block_type, BlockType::GRASS);
        let creative = small_game(GameMode::Creative);
        assert_eq!(creative.world.block_at(Point3::new(3, 4, 3)).unwrap().block_type, BlockType::OAK_LOG);
    }

    #[test]
    fn paused_game_ignores_movement_and_resumes() {
        let mut game = small_game(GameMode::Creative);
        let start = game.camera_state.camera.position;

        game.player_actions.toggle_pause = true;
        game.tick(0.1);
        assert_eq!(game.flow(), GameFlow::Paused);

        game.player_actions.move_forward = true;
        game.player_actions.rotate_view = Some((100.0, 0.0));
        game.tick(0.1);
        assert_eq!(game.camera_state.camera.position, start);
        assert_eq!(game.camera_state.camera.yaw, 0.0);

        game.player_actions.toggle_pause = true;
        game.player_actions.rotate_view = Some((100.0, 0.0));
        game.tick(0.1);
        assert_eq!(game.flow(), GameFlow::InGame);
        // first mouse delta after resuming is dropped
        assert_eq!(game.camera_state.camera.yaw, 0.0);
    }

    #[test]
    fn edits_respect_cooldown() {
        let mut game = small_game(GameMode::Creative);
        game.camera_state.camera.rotate(0.0, -89.0);
        let blocks = game.world.len();

        for _ in 0..4 {
            game.player_actions.destroy = true;
            game.tick(0.1);
        }
        assert_eq!(game.world.len(), blocks - 2);
        assert!(game.world.is_consistent());
    }

    #[test]
    fn hotbar_selects_block_to_place() {
        let mut game = small_game(GameMode::Survival);
        assert_eq!(game.block_to_place(), BlockType::DIRT);
        game.player_actions.select_block = Some(BlockType::SNOW);
        game.tick(0.01);
        assert_eq!(game.block_to_place(), BlockType::SNOW);
    }

    #[test]
    fn survival_player_settles_on_terrain() {
        let mut game = small_game(GameMode::Survival);
        for _ in 0..120 {
            game.tick(1.0 / 60.0);
        }
        assert!(game.player.on_ground);
        let report = game.player.body.collides(&game.world, game.camera_state.camera.position);
        assert!(!report.collided);
    }

    #[test]
    fn scroll_zooms_within_limits() {
        let mut game = small_game(GameMode::Survival);
        game.player_actions.zoom = 100.0;
        game.tick(0.01);
        assert_eq!(game.camera_state.camera.fov_y, game.config().camera.min_fov_y);
    }
}
