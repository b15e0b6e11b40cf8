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
//! Spin about the world up axis

use crate::ecs::{Component, ComponentOwner, ComponentStore, FrameDelta, Link, System, Systems};
use crate::kinematics::{assert_period, phase_angle};
use crate::transform::RotationSystem;
use glam::{Quat, Vec3};

/// Constant-rate spin around +Y
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationalAxis {
    /// Time units per turn; negative spins the other way
    pub period: f32,
    /// Phase accumulator
    pub t: f32,
}

impl RotationalAxis {
    /// Create a spin starting at phase zero
    ///
    /// # Panics
    ///
    /// Panics if `period` is zero or not finite.
    pub fn new(period: f32) -> Self {
        assert_period(period);
        RotationalAxis { period, t: 0.0 }
    }

    /// Start the accumulator at `t`
    pub fn with_time(mut self, t: f32) -> Self {
        self.t = t;
        self
    }

    /// Current orientation
    pub fn orientation(&self) -> Quat {
        Quat::from_axis_angle(Vec3::Y, phase_angle(self.t, self.period))
    }
}

impl Default for RotationalAxis {
    fn default() -> Self {
        RotationalAxis::new(1.0)
    }
}

impl Component for RotationalAxis {}

/// Overwrites each spinning entity's rotation, then advances `t`
#[derive(Debug, Default)]
pub struct RotationalAxisSystem {
    components: ComponentStore<RotationalAxis>,
    rotation: Link<RotationSystem>,
}

impl RotationalAxisSystem {
    /// Create an empty spin system
    pub fn new() -> Self {
        RotationalAxisSystem {
            components: ComponentStore::new(),
            rotation: Link::new(),
        }
    }
}

impl System for RotationalAxisSystem {
    fn initialize(&mut self, systems: &mut Systems) {
        self.rotation.resolve(systems);
    }

    fn update(&mut self, systems: &mut Systems, delta: FrameDelta) {
        let rotations = systems.get_mut(self.rotation.handle());
        self.components.each(|entity, axis| {
            rotations.component_mut(entity).rotation = axis.orientation();
            axis.t += delta.simulated;
        });
    }
}

impl ComponentOwner for RotationalAxisSystem {
    type Component = RotationalAxis;

    fn store(&self) -> &ComponentStore<RotationalAxis> {
        &self.components
    }

    fn store_mut(&mut self) -> &mut ComponentStore<RotationalAxis> {
        &mut self.components
    }
}
