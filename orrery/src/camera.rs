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
//! Focus/orbit camera
//!
//! The camera circles one focus entity at a time. Q and E cycle the focus
//! through every entity with a [`CameraTarget`], in insertion order. After a
//! focus change the camera jumps out to the target's `max_distance` and then
//! eases in toward `min_distance` until the user zooms manually.

use crate::config::CameraConfig;
use crate::ecs::{
    Component, ComponentOwner, ComponentStore, Entity, FrameDelta, Link, System, Systems,
};
use crate::input::{AxisId, InputSystem, Key};
use crate::transform::WorldSystem;
use glam::{Mat4, Vec3};
use log::debug;
use std::f32::consts::FRAC_PI_2;

/// Largest elevation either side of the horizon
const MAX_VERTICAL_ANGLE: f32 = FRAC_PI_2 * 0.9;

/// Rate of the ease toward `min_distance`, per second
const LERP_RATE: f32 = 2.0;

/// Marks an entity as a camera focus
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTarget {
    /// Resting distance once the ease-in completes
    pub min_distance: f32,
    /// Distance the camera jumps to when this target gains focus
    pub max_distance: f32,
}

impl CameraTarget {
    /// Create a target
    pub fn new(min_distance: f32, max_distance: f32) -> Self {
        CameraTarget {
            min_distance,
            max_distance,
        }
    }
}

impl Default for CameraTarget {
    fn default() -> Self {
        CameraTarget::new(1.0, 10.0)
    }
}

impl Component for CameraTarget {}

#[derive(Debug, Clone, Copy)]
struct CameraAxes {
    zoom: AxisId,
    horizontal: AxisId,
    vertical: AxisId,
}

/// Camera controller
///
/// Reads input and world matrices, and runs on wall time. Register it after
/// the transform pipeline so it sees this frame's positions.
#[derive(Debug)]
pub struct CameraSystem {
    components: ComponentStore<CameraTarget>,
    input: Link<InputSystem>,
    world: Link<WorldSystem>,
    axes: Option<CameraAxes>,
    settings: CameraConfig,

    distance: f32,
    horizontal_angle: f32,
    vertical_angle: f32,
    focus: usize,
    lerping: bool,

    position: Vec3,
    view: Mat4,
    projection: Mat4,
}

impl CameraSystem {
    /// Create a camera with the given settings
    pub fn new(settings: CameraConfig) -> Self {
        CameraSystem {
            components: ComponentStore::new(),
            input: Link::new(),
            world: Link::new(),
            axes: None,
            distance: settings.initial_distance,
            horizontal_angle: 0.0,
            vertical_angle: settings.focus_vertical_angle,
            focus: 0,
            lerping: true,
            position: Vec3::ZERO,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            settings,
        }
    }

    /// Camera position in world space
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// World to view transform
    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    /// View to clip transform
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    /// Combined world to clip transform
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }

    /// Current focus entity, if any target exists
    pub fn focus(&self) -> Option<Entity> {
        (self.focus < self.components.len()).then(|| self.components.entity_at(self.focus))
    }

    /// Distance from the focus point
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Azimuth in radians
    pub fn horizontal_angle(&self) -> f32 {
        self.horizontal_angle
    }

    /// Elevation in radians
    pub fn vertical_angle(&self) -> f32 {
        self.vertical_angle
    }

    /// Whether the camera is still easing toward the focus
    pub fn is_lerping(&self) -> bool {
        self.lerping
    }

    /// Camera settings
    pub fn settings(&self) -> &CameraConfig {
        &self.settings
    }

    fn set_perspective(&mut self, aspect_ratio: f32) {
        self.projection = Mat4::perspective_lh(
            self.settings.fov,
            aspect_ratio,
            self.settings.near,
            self.settings.far,
        );
    }

    fn cycle_focus(&mut self, previous: bool, next: bool) -> bool {
        let count = self.components.len();
        if count == 0 || !(previous || next) {
            return false;
        }
        if previous {
            self.focus = if self.focus == 0 { count - 1 } else { self.focus - 1 };
        }
        if next {
            self.focus = (self.focus + 1) % count;
        }
        self.lerping = true;
        debug!("Camera focus {}", self.components.entity_at(self.focus));
        true
    }
}

impl Default for CameraSystem {
    fn default() -> Self {
        Self::new(CameraConfig::default())
    }
}

impl System for CameraSystem {
    fn initialize(&mut self, systems: &mut Systems) {
        self.input.resolve(systems);
        self.world.resolve(systems);

        let input = systems.get_mut(self.input.handle());
        self.axes = Some(CameraAxes {
            zoom: input.create_camera_axis(Key::V, Key::C, &self.settings),
            horizontal: input.create_camera_axis(Key::A, Key::D, &self.settings),
            vertical: input.create_camera_axis(Key::W, Key::S, &self.settings),
        });
        input.track_key(Key::Q);
        input.track_key(Key::E);

        let aspect_ratio = input.aspect_ratio();
        self.set_perspective(aspect_ratio);
    }

    fn update(&mut self, systems: &mut Systems, delta: FrameDelta) {
        let axes = match self.axes {
            Some(axes) => axes,
            None => panic!("camera updated before initialize"),
        };
        let dt = delta.wall;

        let input = systems.get(self.input.handle());
        if input.is_size_changed() {
            let aspect_ratio = input.aspect_ratio();
            self.set_perspective(aspect_ratio);
        }
        let zoom = input.axis(axes.zoom);
        let horizontal = input.axis(axes.horizontal);
        let vertical = input.axis(axes.vertical);
        let previous = input.key_down(Key::Q);
        let next = input.key_down(Key::E);

        self.distance += zoom * self.settings.zoom_speed * dt;
        self.horizontal_angle += horizontal * self.settings.horizontal_speed * dt;
        self.vertical_angle = (self.vertical_angle + vertical * self.settings.vertical_speed * dt)
            .clamp(-MAX_VERTICAL_ANGLE, MAX_VERTICAL_ANGLE);

        let focus_changed = self.cycle_focus(previous, next);
        if zoom != 0.0 {
            self.lerping = false;
        }

        let world = systems.get(self.world.handle());
        let (focus_position, target) = match self.focus() {
            Some(entity) => (
                world.translation(entity),
                Some(*self.components.component(entity)),
            ),
            None => (Vec3::ZERO, None),
        };

        if let Some(target) = target {
            if focus_changed {
                self.distance = target.max_distance;
                self.vertical_angle = self.settings.focus_vertical_angle;
            }
            if self.lerping {
                let t = (LERP_RATE * dt).clamp(0.0, 1.0);
                self.distance += t * (target.min_distance - self.distance);
            }
        }

        let (sin_h, cos_h) = self.horizontal_angle.sin_cos();
        let (sin_v, cos_v) = self.vertical_angle.sin_cos();
        self.position =
            Vec3::new(sin_h * cos_v, sin_v, cos_h * cos_v) * self.distance + focus_position;
        self.view = Mat4::look_at_lh(self.position, focus_position, Vec3::Y);
    }
}

impl ComponentOwner for CameraSystem {
    type Component = CameraTarget;

    fn store(&self) -> &ComponentStore<CameraTarget> {
        &self.components
    }

    fn store_mut(&mut self) -> &mut ComponentStore<CameraTarget> {
        &mut self.components
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::World;

    fn world_with_camera() -> World {
        let mut world = World::new();
        world.add_system(InputSystem::new(1600, 900)).unwrap();
        world.add_system(WorldSystem::new()).unwrap();
        world.add_system(CameraSystem::default()).unwrap();
        world
    }

    #[test]
    fn test_no_targets_looks_at_origin() {
        let mut world = world_with_camera();
        world.initialize().unwrap();

        world.system_mut::<InputSystem>().press(Key::E);
        world.update(0.1, 0.0).unwrap();

        let camera = world.system::<CameraSystem>();
        assert_eq!(camera.focus(), None);
        assert_eq!(camera.distance(), 100.0);
        assert!((camera.position().length() - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_initialize_creates_axes_and_projection() {
        let mut world = world_with_camera();
        world.initialize().unwrap();

        let input = world.system::<InputSystem>();
        for key in [Key::V, Key::C, Key::A, Key::D, Key::W, Key::S, Key::Q, Key::E] {
            assert!(input.is_tracked(key), "{:?} should be tracked", key);
        }

        let expected = Mat4::perspective_lh(CameraConfig::default().fov, 1600.0 / 900.0, 0.1, 1000.0);
        assert!(world
            .system::<CameraSystem>()
            .projection_matrix()
            .abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn test_vertical_angle_clamped() {
        let mut world = world_with_camera();
        world.initialize().unwrap();

        world.system_mut::<InputSystem>().press(Key::W);
        for _ in 0..200 {
            world.update(0.1, 0.0).unwrap();
        }
        let angle = world.system::<CameraSystem>().vertical_angle();
        assert!((angle - MAX_VERTICAL_ANGLE).abs() < 1e-6);
    }

    #[test]
    fn test_resize_updates_projection() {
        let mut world = world_with_camera();
        world.initialize().unwrap();

        world.system_mut::<InputSystem>().resize(1000, 1000);
        world.update(0.0, 0.0).unwrap();

        let expected = Mat4::perspective_lh(CameraConfig::default().fov, 1.0, 0.1, 1000.0);
        assert!(world
            .system::<CameraSystem>()
            .projection_matrix()
            .abs_diff_eq(expected, 1e-6));
    }
}
