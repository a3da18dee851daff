//! # Input Manager
//!
//! This module handles input processing for the application, including:
//! - Keyboard and mouse button state tracking
//! - Accumulating mouse motion and scrolling between frames
//! - Producing a per-frame `ProcessedInputState`

use std::collections::HashMap;

use winit::{
    event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use super::input_state::{MouseInput, ProcessedInputState, RawInputState};

/// Pixels of touchpad scrolling counted as one wheel line.
const PIXELS_PER_SCROLL_LINE: f64 = 20.0;

const KEY_CODES: [KeyCode; 15] = [
    KeyCode::KeyW,
    KeyCode::KeyS,
    KeyCode::KeyA,
    KeyCode::KeyD,
    KeyCode::Space,
    KeyCode::ShiftLeft,
    KeyCode::ControlLeft,
    KeyCode::Escape,
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
    KeyCode::Digit7,
];

const MOUSE_BUTTONS: [MouseButton; 3] = [MouseButton::Left, MouseButton::Right, MouseButton::Middle];

/// Manages the state of all input devices and processes input events.
///
/// This struct maintains the current state of keyboard and mouse inputs
/// and provides methods to process input events from the windowing system.
pub struct InputManager {
    /// Previous state of all tracked keyboard keys
    pub keyboard_inputs_old: HashMap<KeyCode, bool>,
    /// Current state of all tracked keyboard keys
    pub keyboard_inputs_new: HashMap<KeyCode, bool>,

    /// Current state of mouse inputs
    pub mouse_inputs: MouseInput,
}

impl InputManager {
    /// Creates a new InputManager with every tracked input released.
    pub fn new() -> Self {
        let keyboard_inputs_old: HashMap<_, _> = KEY_CODES.iter().map(|key| (*key, false)).collect();
        let keyboard_inputs_new = keyboard_inputs_old.clone();

        let mouse_button_inputs_old: HashMap<_, _> =
            MOUSE_BUTTONS.iter().map(|button| (*button, false)).collect();
        let mouse_button_inputs_new = mouse_button_inputs_old.clone();

        Self {
            keyboard_inputs_old,
            keyboard_inputs_new,
            mouse_inputs: MouseInput {
                mouse_button_inputs_old,
                mouse_button_inputs_new,
                mouse_scroll_lines: 0.0,
                mouse_delta: None,
            },
        }
    }

    /// Copies the current key and button states into the "old" states.
    ///
    /// Called at the end of each frame so the next frame can detect transitions.
    pub fn move_old_states(&mut self) {
        for (key, new_state) in self.keyboard_inputs_new.iter() {
            if let Some(old_state) = self.keyboard_inputs_old.get_mut(key) {
                *old_state = *new_state;
            }
        }

        for (button, new_state) in self.mouse_inputs.mouse_button_inputs_new.iter() {
            if let Some(old_state) = self.mouse_inputs.mouse_button_inputs_old.get_mut(button) {
                *old_state = *new_state;
            }
        }
    }

    /// Processes a window event and updates internal input state.
    ///
    /// # Arguments
    /// * `event` - The window event to process
    pub fn intake_input(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state,
                        physical_key: PhysicalKey::Code(key),
                        ..
                    },
                ..
            } => self.intake_key(*key, *state == ElementState::Pressed),
            WindowEvent::MouseWheel { delta, .. } => self.intake_scroll(*delta),
            WindowEvent::MouseInput { button, state, .. } => {
                self.intake_mouse_button(*button, *state == ElementState::Pressed)
            }
            _ => {}
        }
    }

    /// Records a key going down or up. Untracked keys are ignored.
    pub fn intake_key(&mut self, key: KeyCode, pressed: bool) {
        if let Some(key_state) = self.keyboard_inputs_new.get_mut(&key) {
            *key_state = pressed;
        }
    }

    /// Records a mouse button going down or up. Untracked buttons are ignored.
    pub fn intake_mouse_button(&mut self, button: MouseButton, pressed: bool) {
        if let Some(button_state) = self.mouse_inputs.mouse_button_inputs_new.get_mut(&button) {
            *button_state = pressed;
        }
    }

    /// Adds a scroll event to this frame's total.
    pub fn intake_scroll(&mut self, delta: MouseScrollDelta) {
        let lines = match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(position) => (position.y / PIXELS_PER_SCROLL_LINE) as f32,
        };
        self.mouse_inputs.mouse_scroll_lines += lines;
    }

    /// Adds raw mouse motion to this frame's total.
    ///
    /// # Arguments
    /// * `delta` - The (x, y) delta of mouse movement since the last event
    pub fn intake_mouse_motion(&mut self, delta: (f64, f64)) {
        let (x, y) = self.mouse_inputs.mouse_delta.unwrap_or((0.0, 0.0));
        self.mouse_inputs.mouse_delta = Some((x + delta.0, y + delta.1));
    }

    /// Creates a processed input state from the current raw boolean states.
    ///
    /// # Returns
    /// A new `ProcessedInputState` with processed input states.
    pub fn create_processed_input_state(&self) -> ProcessedInputState {
        let keyboard_states = self
            .keyboard_inputs_new
            .iter()
            .map(|(key, &new_state)| {
                let old_state = self.keyboard_inputs_old.get(key).copied().unwrap_or(false);
                (*key, RawInputState::from_raw_states(old_state, new_state))
            })
            .collect();

        let mouse_button_states = self
            .mouse_inputs
            .mouse_button_inputs_new
            .iter()
            .map(|(button, &new_state)| {
                let old_state = self
                    .mouse_inputs
                    .mouse_button_inputs_old
                    .get(button)
                    .copied()
                    .unwrap_or(false);
                (*button, RawInputState::from_raw_states(old_state, new_state))
            })
            .collect();

        ProcessedInputState {
            keyboard_states,
            mouse_button_states,
            mouse_delta: self.mouse_inputs.mouse_delta,
            scroll_lines: self.mouse_inputs.mouse_scroll_lines,
        }
    }

    /// Returns this frame's processed input state and prepares for the next frame.
    pub fn get_and_reset_processed_input(&mut self) -> ProcessedInputState {
        let processed_input = self.create_processed_input_state();
        self.reset_inputs();
        processed_input
    }

    /// Ends the frame: rolls key states forward and clears accumulated motion.
    pub fn reset_inputs(&mut self) {
        self.move_old_states();

        self.mouse_inputs.mouse_scroll_lines = 0.0;
        self.mouse_inputs.mouse_delta = None;
    }

    /// Releases every key and button, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        for state in self.keyboard_inputs_new.values_mut() {
            *state = false;
        }
        for state in self.mouse_inputs.mouse_button_inputs_new.values_mut() {
            *state = false;
        }
        self.reset_inputs();
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    #[test]
    fn key_press_then_hold_then_release() {
        let mut manager = InputManager::new();
        manager.intake_key(KeyCode::KeyW, true);
        assert_eq!(
            manager.get_and_reset_processed_input().get_key_state(KeyCode::KeyW),
            RawInputState::Pressed
        );
        assert_eq!(
            manager.get_and_reset_processed_input().get_key_state(KeyCode::KeyW),
            RawInputState::Held
        );
        manager.intake_key(KeyCode::KeyW, false);
        assert_eq!(
            manager.get_and_reset_processed_input().get_key_state(KeyCode::KeyW),
            RawInputState::Released
        );
    }

    #[test]
    fn motion_and_scroll_accumulate_within_a_frame() {
        let mut manager = InputManager::new();
        manager.intake_mouse_motion((3.0, -1.0));
        manager.intake_mouse_motion((2.0, 4.0));
        manager.intake_scroll(MouseScrollDelta::LineDelta(0.0, 1.0));
        manager.intake_scroll(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 40.0)));

        let input = manager.get_and_reset_processed_input();
        assert_eq!(input.get_mouse_delta(), Some((5.0, 3.0)));
        assert_eq!(input.get_scroll_lines(), 3.0);

        let next = manager.get_and_reset_processed_input();
        assert_eq!(next.get_mouse_delta(), None);
        assert_eq!(next.get_scroll_lines(), 0.0);
    }

    #[test]
    fn release_all_clears_held_buttons() {
        let mut manager = InputManager::new();
        manager.intake_mouse_button(MouseButton::Left, true);
        manager.get_and_reset_processed_input();
        manager.release_all();
        let input = manager.get_and_reset_processed_input();
        assert!(!input.get_mouse_button_state(MouseButton::Left).is_active());
    }
}
