// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Keyboard state and smoothed input axes
//!
//! [`InputSystem`] stands in for the window: the driver feeds it raw key
//! events and size changes between frames, and the system folds them into
//! per-frame key state during its update. Register it before any system that
//! reads input.
//!
//! Only tracked keys have state. Events for other keys are recorded but never
//! surface.

use crate::config::{CameraConfig, WindowConfig};
use crate::ecs::{FrameDelta, System, Systems};
use log::debug;
use std::fmt;

/// Keys the runtime understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Key {
    A,
    D,
    S,
    W,
    C,
    V,
    Q,
    E,
    Z,
    X,
    Escape,
}

impl Key {
    /// Every key, in declaration order
    pub const ALL: [Key; 11] = [
        Key::A,
        Key::D,
        Key::S,
        Key::W,
        Key::C,
        Key::V,
        Key::Q,
        Key::E,
        Key::Z,
        Key::X,
        Key::Escape,
    ];

    fn slot(self) -> usize {
        self as usize
    }
}

/// Raw events received for one key since the last update
#[derive(Debug, Clone, Copy, Default)]
struct KeyEvents {
    went_down: bool,
    went_up: bool,
    is_down: bool,
}

/// Per-frame state of a tracked key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    /// Key is physically down after this frame's events
    pub is_down: bool,
    /// Key went down this frame
    pub pressed: bool,
    /// Key was down at some point during this frame
    pub held: bool,
    /// Key went up this frame
    pub released: bool,
}

impl KeyState {
    fn advance(&mut self, events: KeyEvents) {
        self.held = events.is_down || events.went_down;
        self.pressed = events.went_down && (events.went_up || !self.is_down);
        self.released = events.went_up;
        self.is_down = events.is_down;
    }
}

/// Identifier of an axis created with [`InputSystem::create_axis`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AxisId(usize);

impl fmt::Display for AxisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "axis #{}", self.0)
    }
}

/// A value in `[-1, 1]` driven by a pair of keys
///
/// Holding a key ramps the value toward its end at `force` per second,
/// snapping to zero first when it was on the other side. With neither key
/// held it returns to zero at `friction` per second and stops exactly there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Axis {
    positive: Key,
    negative: Key,
    force: f32,
    friction: f32,
    value: f32,
}

impl Axis {
    /// Create an axis at rest
    pub fn new(positive: Key, negative: Key, force: f32, friction: f32) -> Self {
        Axis {
            positive,
            negative,
            force,
            friction,
            value: 0.0,
        }
    }

    /// Current value
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Advance by `dt` seconds given which controls are held
    pub fn advance(&mut self, positive_held: bool, negative_held: bool, dt: f32) {
        if positive_held || negative_held {
            if positive_held {
                self.value = (self.value.max(0.0) + self.force * dt).min(1.0);
            }
            if negative_held {
                self.value = (self.value.min(0.0) - self.force * dt).max(-1.0);
            }
        } else if self.value > 0.0 {
            self.value = (self.value - self.friction * dt).max(0.0);
        } else if self.value < 0.0 {
            self.value = (self.value + self.friction * dt).min(0.0);
        }
    }
}

/// Keyboard and window-size state
#[derive(Debug)]
pub struct InputSystem {
    events: [KeyEvents; Key::ALL.len()],
    tracked: [Option<KeyState>; Key::ALL.len()],
    axes: Vec<Axis>,
    width: u32,
    height: u32,
    resized: bool,
    size_changed: bool,
    open: bool,
}

impl InputSystem {
    /// Create input state for a window of the given size
    pub fn new(width: u32, height: u32) -> Self {
        InputSystem {
            events: [KeyEvents::default(); Key::ALL.len()],
            tracked: [None; Key::ALL.len()],
            axes: Vec::new(),
            width,
            height,
            resized: false,
            size_changed: false,
            open: true,
        }
    }

    /// Create input state sized from settings
    pub fn from_config(window: &WindowConfig) -> Self {
        let (width, height) = window.size();
        Self::new(width, height)
    }

    /// Start producing state for `key`; tracking twice is a no-op
    pub fn track_key(&mut self, key: Key) {
        let slot = &mut self.tracked[key.slot()];
        if slot.is_none() {
            debug!("Tracking key {:?}", key);
            *slot = Some(KeyState::default());
        }
    }

    /// Whether `key` is tracked
    pub fn is_tracked(&self, key: Key) -> bool {
        self.tracked[key.slot()].is_some()
    }

    /// Record a key-down event
    pub fn press(&mut self, key: Key) {
        let events = &mut self.events[key.slot()];
        events.went_down = true;
        events.is_down = true;
    }

    /// Record a key-up event
    pub fn release(&mut self, key: Key) {
        let events = &mut self.events[key.slot()];
        events.went_up = true;
        events.is_down = false;
    }

    /// Record a new client size
    pub fn resize(&mut self, width: u32, height: u32) {
        if width != self.width || height != self.height {
            self.resized = true;
        }
        self.width = width;
        self.height = height;
    }

    /// Ask the driver loop to stop
    pub fn close(&mut self) {
        self.open = false;
    }

    /// Whether the window is still open
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Full state of a tracked key
    ///
    /// # Panics
    ///
    /// Panics if `key` is not tracked.
    pub fn key(&self, key: Key) -> KeyState {
        match self.tracked[key.slot()] {
            Some(state) => state,
            None => panic!("key {:?} is not tracked", key),
        }
    }

    /// Key was down at some point this frame
    pub fn key_held(&self, key: Key) -> bool {
        self.key(key).held
    }

    /// Key went down this frame
    pub fn key_down(&self, key: Key) -> bool {
        self.key(key).pressed
    }

    /// Key went up this frame
    pub fn key_up(&self, key: Key) -> bool {
        self.key(key).released
    }

    /// Create a smoothed axis; both keys become tracked
    pub fn create_axis(&mut self, positive: Key, negative: Key, force: f32, friction: f32) -> AxisId {
        self.track_key(positive);
        self.track_key(negative);
        self.axes.push(Axis::new(positive, negative, force, friction));
        AxisId(self.axes.len() - 1)
    }

    /// Create an axis using the camera's force and friction settings
    pub fn create_camera_axis(&mut self, positive: Key, negative: Key, config: &CameraConfig) -> AxisId {
        self.create_axis(positive, negative, config.axis_force, config.axis_friction)
    }

    /// Current value of an axis
    ///
    /// # Panics
    ///
    /// Panics if `axis` came from another input system.
    pub fn axis(&self, axis: AxisId) -> f32 {
        match self.axes.get(axis.0) {
            Some(axis) => axis.value(),
            None => panic!("{} does not exist", axis),
        }
    }

    /// Client width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Client height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Width over height; a zero height counts as one pixel
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    /// The size changed in the events folded by the last update
    pub fn is_size_changed(&self) -> bool {
        self.size_changed
    }

    fn update_keys(&mut self) {
        for (state, events) in self.tracked.iter_mut().zip(self.events.iter_mut()) {
            if let Some(state) = state {
                state.advance(*events);
            }
            events.went_down = false;
            events.went_up = false;
        }
    }

    fn update_axes(&mut self, dt: f32) {
        let tracked = &self.tracked;
        let held = |key: Key| tracked[key.slot()].map_or(false, |state| state.held);
        for axis in &mut self.axes {
            let (positive, negative) = (held(axis.positive), held(axis.negative));
            axis.advance(positive, negative, dt);
        }
    }
}

impl Default for InputSystem {
    fn default() -> Self {
        let (width, height) = crate::config::FALLBACK_WINDOW_SIZE;
        Self::new(width, height)
    }
}

impl System for InputSystem {
    fn update(&mut self, _systems: &mut Systems, delta: FrameDelta) {
        self.size_changed = std::mem::take(&mut self.resized);
        self.update_keys();
        self.update_axes(delta.wall);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(input: &mut InputSystem, dt: f32) {
        let mut systems = Systems::new();
        input.update(&mut systems, FrameDelta::new(dt, 0.0));
    }

    #[test]
    fn test_press_release_cycle() {
        let mut input = InputSystem::new(800, 600);
        input.track_key(Key::E);

        input.press(Key::E);
        frame(&mut input, 0.1);
        assert!(input.key_down(Key::E));
        assert!(input.key_held(Key::E));
        assert!(!input.key_up(Key::E));

        // Still held, no new press
        frame(&mut input, 0.1);
        assert!(!input.key_down(Key::E));
        assert!(input.key_held(Key::E));

        input.release(Key::E);
        frame(&mut input, 0.1);
        assert!(input.key_up(Key::E));
        assert!(!input.key_held(Key::E));
    }

    #[test]
    fn test_tap_within_one_frame() {
        let mut input = InputSystem::new(800, 600);
        input.track_key(Key::Q);

        input.press(Key::Q);
        input.release(Key::Q);
        frame(&mut input, 0.1);

        let state = input.key(Key::Q);
        assert!(state.pressed);
        assert!(state.held);
        assert!(state.released);
        assert!(!state.is_down);
    }

    #[test]
    fn test_events_before_tracking_are_not_lost() {
        let mut input = InputSystem::new(800, 600);
        input.press(Key::Z);
        input.track_key(Key::Z);
        frame(&mut input, 0.1);
        assert!(input.key_down(Key::Z));
    }

    #[test]
    #[should_panic(expected = "is not tracked")]
    fn test_untracked_key_panics() {
        let input = InputSystem::new(800, 600);
        input.key_down(Key::Escape);
    }

    #[test]
    fn test_escape_closes_window() {
        let mut input = InputSystem::new(800, 600);
        input.track_key(Key::Escape);
        assert!(input.is_open());

        input.press(Key::Escape);
        frame(&mut input, 0.1);
        if input.key_down(Key::Escape) {
            input.close();
        }
        assert!(!input.is_open());
    }

    #[test]
    fn test_axis_saturates_and_decays() {
        let mut input = InputSystem::new(800, 600);
        let axis = input.create_axis(Key::D, Key::A, 0.5, 3.0);
        assert!(input.is_tracked(Key::D) && input.is_tracked(Key::A));

        input.press(Key::D);
        for _ in 0..30 {
            frame(&mut input, 0.1);
        }
        assert_eq!(input.axis(axis), 1.0);

        input.release(Key::D);
        for _ in 0..10 {
            frame(&mut input, 0.1);
        }
        assert_eq!(input.axis(axis), 0.0);
    }

    #[test]
    fn test_axis_snaps_through_zero() {
        let mut axis = Axis::new(Key::W, Key::S, 0.5, 3.0);
        axis.advance(false, true, 1.0);
        assert_eq!(axis.value(), -0.5);

        axis.advance(true, false, 0.5);
        assert_eq!(axis.value(), 0.25);
    }

    #[test]
    fn test_axis_negative_end() {
        let mut axis = Axis::new(Key::W, Key::S, 0.5, 3.0);
        for _ in 0..5 {
            axis.advance(false, true, 1.0);
        }
        assert_eq!(axis.value(), -1.0);

        axis.advance(false, false, 0.1);
        assert!(axis.value() > -1.0 && axis.value() < 0.0);
        axis.advance(false, false, 1.0);
        assert_eq!(axis.value(), 0.0);
    }

    #[test]
    fn test_resize_visible_for_one_frame() {
        let mut input = InputSystem::new(800, 600);
        input.resize(800, 600);
        frame(&mut input, 0.1);
        assert!(!input.is_size_changed());

        input.resize(1200, 600);
        frame(&mut input, 0.1);
        assert!(input.is_size_changed());
        assert_eq!(input.aspect_ratio(), 2.0);

        frame(&mut input, 0.1);
        assert!(!input.is_size_changed());
    }

    #[test]
    fn test_zero_height_aspect() {
        let input = InputSystem::new(640, 0);
        assert_eq!(input.aspect_ratio(), 640.0);
    }
}
