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
//! Circular orbits in the local XZ plane

use crate::ecs::{Component, ComponentOwner, ComponentStore, FrameDelta, Link, System, Systems};
use crate::kinematics::{assert_period, phase_angle};
use crate::transform::TranslationSystem;

/// Circular orbit around the parent's origin
///
/// A negative period runs the orbit clockwise when seen from above.
///
/// # Examples
///
/// ```
/// use orrery::kinematics::Orbit;
///
/// // A quarter of the way around
/// let orbit = Orbit::new(10.0, 100.0).with_time(25.0);
/// let (x, z) = orbit.offset();
/// assert!((x - 10.0).abs() < 1e-4);
/// assert!(z.abs() < 1e-4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orbit {
    /// Distance from the parent origin
    pub radius: f32,
    /// Time units per revolution
    pub period: f32,
    /// Phase accumulator
    pub t: f32,
}

impl Orbit {
    /// Create an orbit starting at phase zero
    ///
    /// # Panics
    ///
    /// Panics if `period` is zero or not finite.
    pub fn new(radius: f32, period: f32) -> Self {
        assert_period(period);
        Orbit {
            radius,
            period,
            t: 0.0,
        }
    }

    /// Start the accumulator at `t`
    pub fn with_time(mut self, t: f32) -> Self {
        self.t = t;
        self
    }

    /// Current angle in radians
    pub fn angle(&self) -> f32 {
        phase_angle(self.t, self.period)
    }

    /// Current (x, z) offset
    pub fn offset(&self) -> (f32, f32) {
        let (sin, cos) = self.angle().sin_cos();
        (sin * self.radius, cos * self.radius)
    }
}

impl Default for Orbit {
    fn default() -> Self {
        Orbit::new(1.0, 1.0)
    }
}

impl Component for Orbit {}

/// Moves each orbiting entity's translation along its circle
///
/// Writes x and z of the entity's [`Translation`](crate::transform::Translation)
/// and leaves y alone, then advances `t` by the simulated delta.
#[derive(Debug, Default)]
pub struct OrbitSystem {
    components: ComponentStore<Orbit>,
    translation: Link<TranslationSystem>,
}

impl OrbitSystem {
    /// Create an empty orbit system
    pub fn new() -> Self {
        OrbitSystem {
            components: ComponentStore::new(),
            translation: Link::new(),
        }
    }
}

impl System for OrbitSystem {
    fn initialize(&mut self, systems: &mut Systems) {
        self.translation.resolve(systems);
    }

    fn update(&mut self, systems: &mut Systems, delta: FrameDelta) {
        let translations = systems.get_mut(self.translation.handle());
        self.components.each(|entity, orbit| {
            let (x, z) = orbit.offset();
            let translation = &mut translations.component_mut(entity).translation;
            translation.x = x;
            translation.z = z;
            orbit.t += delta.simulated;
        });
    }
}

impl ComponentOwner for OrbitSystem {
    type Component = Orbit;

    fn store(&self) -> &ComponentStore<Orbit> {
        &self.components
    }

    fn store_mut(&mut self) -> &mut ComponentStore<Orbit> {
        &mut self.components
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_at_start() {
        let (x, z) = Orbit::new(3.0, 27.0).offset();
        assert_eq!(x, 0.0);
        assert_eq!(z, 3.0);
    }

    #[test]
    fn test_negative_period_reverses() {
        let forward = Orbit::new(1.0, 8.0).with_time(2.0).offset();
        let backward = Orbit::new(1.0, -8.0).with_time(2.0).offset();
        assert!((forward.0 + backward.0).abs() < 1e-6);
        assert!((forward.1 - backward.1).abs() < 1e-6);
    }

    #[test]
    #[should_panic(expected = "Period must be finite and non-zero")]
    fn test_zero_period_panics() {
        Orbit::new(1.0, 0.0);
    }
}
