/*
 * Input Module
 *
 * This module turns window events into a per-frame input snapshot.
 * Event handlers only record what happened in InputState; once per frame
 * the app takes an InputSnapshot (plain booleans and a look delta) and hands
 * it to the camera. Nothing downstream sees individual events.
 *
 * Controls:
 * - W/A/S/D move the camera
 * - Dragging with the left mouse button looks around
 */

use nannou::prelude::*;

// Movement and look input for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSnapshot {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    // Cursor movement in pixels since the previous snapshot
    pub look_delta: Vec2,
}

#[derive(Debug, Default)]
pub struct InputState {
    forward: bool,
    backward: bool,
    left: bool,
    right: bool,
    looking: bool,
    last_cursor: Option<Vec2>,
    look_delta: Vec2,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    // Record a key press or release; unbound keys are ignored
    pub fn key_changed(&mut self, key: Key, pressed: bool) {
        match key {
            Key::W => self.forward = pressed,
            Key::S => self.backward = pressed,
            Key::A => self.left = pressed,
            Key::D => self.right = pressed,
            _ => {}
        }
    }

    pub fn begin_look(&mut self, cursor: Vec2) {
        self.looking = true;
        self.last_cursor = Some(cursor);
    }

    pub fn end_look(&mut self) {
        self.looking = false;
        self.last_cursor = None;
    }

    pub fn cursor_moved(&mut self, cursor: Vec2) {
        if !self.looking {
            return;
        }
        if let Some(last) = self.last_cursor {
            self.look_delta += cursor - last;
        }
        self.last_cursor = Some(cursor);
    }

    // Release everything, e.g. when the window loses focus
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    // Take this frame's input and reset the accumulated look delta
    pub fn snapshot(&mut self) -> InputSnapshot {
        let snapshot = InputSnapshot {
            forward: self.forward,
            backward: self.backward,
            left: self.left,
            right: self.right,
            look_delta: self.look_delta,
        };
        self.look_delta = Vec2::ZERO;
        snapshot
    }
}
