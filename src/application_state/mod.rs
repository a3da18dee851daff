//! # Application State Management
//!
//! This module handles the application's state management, including:
//! - Window creation
//! - Input handling and cursor capture
//! - Application lifecycle events
//! - Driving one game tick per frame

pub mod input_manager;
pub mod input_state;

use std::sync::Arc;

use input_manager::InputManager;
use log::{error, info, warn};
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::ActiveEventLoop,
    window::{CursorGrabMode, Window, WindowId},
};

use crate::{
    config::GameConfig,
    game_state::{rendering::LoggingRenderer, GameFlow, GameState},
};

const WINDOW_TITLE: &str = "Voxel Sandbox";

/// The main application state container that manages the application's lifecycle.
///
/// This struct holds the configuration until the window exists, then the
/// running game. It implements `ApplicationHandler` to handle window and
/// device events.
pub struct ApplicationState {
    /// Configuration used to build the game once the window exists
    pub config: GameConfig,

    /// The initialized application state, if the application has started
    pub state: Option<InitializedApplicationState>,
}

/// Represents the fully initialized and running state of the application.
pub struct InitializedApplicationState {
    /// The game world and everything acting on it
    pub game_state: GameState,

    /// Handle to the application window
    pub window: Arc<Window>,

    /// Manages input state and event processing
    pub input_manager: InputManager,

    /// Game flow the cursor was last configured for
    pub cursor_flow: Option<GameFlow>,
}

impl ApplicationState {
    /// Creates the application around an already loaded configuration.
    pub fn new(config: GameConfig) -> Self {
        Self { config, state: None }
    }

    /// Creates the window and builds the game.
    fn initialize_application_state(&mut self, event_loop: &ActiveEventLoop) {
        let attributes = Window::default_attributes().with_title(WINDOW_TITLE);
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                error!("Failed to create window: {}", err);
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        let aspect = size.width.max(1) as f32 / size.height.max(1) as f32;
        let game_state = match GameState::new(
            self.config.clone(),
            aspect,
            Box::new(LoggingRenderer::default()),
        ) {
            Ok(game_state) => game_state,
            Err(err) => {
                error!("Failed to start game: {}", err);
                event_loop.exit();
                return;
            }
        };
        info!("World ready with {} blocks", game_state.world.len());

        self.state = Some(InitializedApplicationState {
            game_state,
            window,
            input_manager: InputManager::new(),
            cursor_flow: None,
        });
    }
}

impl InitializedApplicationState {
    /// Captures the cursor while playing and releases it while paused.
    fn sync_cursor(&mut self) {
        let flow = self.game_state.flow();
        if self.cursor_flow == Some(flow) {
            return;
        }
        self.cursor_flow = Some(flow);

        let window = &self.window;
        match flow {
            GameFlow::InGame => {
                let grabbed = window
                    .set_cursor_grab(CursorGrabMode::Locked)
                    .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
                if let Err(err) = grabbed {
                    warn!("Could not capture the cursor: {}", err);
                }
                window.set_cursor_visible(false);
            }
            GameFlow::Paused => {
                if let Err(err) = window.set_cursor_grab(CursorGrabMode::None) {
                    warn!("Could not release the cursor: {}", err);
                }
                window.set_cursor_visible(true);
            }
        }
    }
}

impl ApplicationHandler for ApplicationState {
    /// Handles window-related events such as resize, focus changes, and input events.
    ///
    /// # Arguments
    /// * `event_loop` - Reference to the active event loop
    /// * `_window_id` - ID of the window that generated the event
    /// * `event` - The window event to process
    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = &mut self.state else {
            if let WindowEvent::CloseRequested = event {
                event_loop.exit();
            }
            return;
        };

        state.input_manager.intake_input(&event);

        match event {
            WindowEvent::Resized(size) => {
                state.game_state.resize(size.width, size.height);
            }
            WindowEvent::Focused(is_focused) => {
                if !is_focused {
                    state.input_manager.release_all();
                }
            }
            WindowEvent::RedrawRequested => {
                let input = state.input_manager.get_and_reset_processed_input();
                state.game_state.set_input_commands(input);
                state.game_state.update();
                state.sync_cursor();
            }
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                event_loop.exit();
            }
            _ => (),
        }
    }

    /// Handles device-level input events such as mouse motion.
    ///
    /// # Arguments
    /// * `_event_loop` - Reference to the active event loop
    /// * `_device_id` - ID of the device that generated the event
    /// * `event` - The device event to process
    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let Some(state) = &mut self.state {
            if let DeviceEvent::MouseMotion { delta } = event {
                state.input_manager.intake_mouse_motion(delta);
            }
        }
    }

    /// Called when the application is resumed; builds the window and world on first resume.
    ///
    /// # Arguments
    /// * `event_loop` - Reference to the active event loop
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_none() {
            self.initialize_application_state(event_loop);
        }
    }

    /// Called before the event loop goes to sleep; requests the next frame.
    ///
    /// # Arguments
    /// * `_event_loop` - Reference to the active event loop
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }
}
