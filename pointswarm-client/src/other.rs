use std::collections::HashSet;

use glam::Vec2;
use sdl2::{event::Event, keyboard::Keycode, mouse::MouseButton};

/// The current state of the keyboard.
#[derive(Default)]
pub struct KeyboardState {
    /// Keys that went down this frame.
    pub pressed: HashSet<Keycode>,
}

/// The current state of the mouse.
#[derive(Default)]
pub struct MouseState {
    pub delta: Vec2,
    pub down: HashSet<MouseButton>,
}

/// Clears the per-frame parts of the input state.
pub fn begin_frame(keyboard: &mut KeyboardState, mouse: &mut MouseState) {
    mouse.delta = Vec2::ZERO;
    keyboard.pressed.clear();
}

/// Folds one SDL event into the input state.
pub fn track_event(keyboard: &mut KeyboardState, mouse: &mut MouseState, event: &Event) {
    match *event {
        Event::MouseMotion { xrel, yrel, .. } => {
            mouse.delta += Vec2::new(xrel as f32, yrel as f32);
        }
        Event::MouseButtonDown { mouse_btn, .. } => {
            mouse.down.insert(mouse_btn);
        }
        Event::MouseButtonUp { mouse_btn, .. } => {
            mouse.down.remove(&mouse_btn);
        }
        Event::KeyDown {
            keycode: Some(keycode),
            repeat: false,
            ..
        } => {
            keyboard.pressed.insert(keycode);
        }
        _ => {}
    }
}

/// Context handed to per-frame updates.
pub struct UpdateContext<'a> {
    pub keyboard: &'a KeyboardState,
    pub mouse: &'a MouseState,
    pub delta_time: f32,
}

impl<'a> UpdateContext<'a> {
    /// Creates a new `UpdateContext` from the given keyboard and mouse states and delta time.
    pub fn new(keyboard: &'a KeyboardState, mouse: &'a MouseState, delta_time: f32) -> Self {
        Self {
            keyboard,
            mouse,
            delta_time,
        }
    }
}
