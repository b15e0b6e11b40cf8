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
//! Transform components
//!
//! Local components (scaling, rotation, translation) describe an entity
//! relative to its parent. [`WorldMatrix`] is the composed result and is
//! rebuilt from scratch every frame.

use crate::ecs::{Component, Entity};
use glam::{Mat4, Quat, Vec3};

/// Fully composed transform in the global frame
///
/// # Examples
///
/// ```
/// use orrery::transform::WorldMatrix;
/// use glam::{Mat4, Vec3};
///
/// let world = WorldMatrix::new(Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0)));
/// assert_eq!(world.translation(), Vec3::new(1.0, 2.0, 3.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldMatrix {
    /// Column-major 4x4 transform
    pub matrix: Mat4,
}

impl WorldMatrix {
    /// Wrap a matrix
    pub fn new(matrix: Mat4) -> Self {
        WorldMatrix { matrix }
    }

    /// Position of the local origin in world space
    pub fn translation(&self) -> Vec3 {
        self.matrix.w_axis.truncate()
    }
}

impl Default for WorldMatrix {
    fn default() -> Self {
        WorldMatrix::new(Mat4::IDENTITY)
    }
}

impl Component for WorldMatrix {}

/// A local transform step that composes into the world matrix
pub trait LocalTransform: Component + Copy {
    /// The step as a matrix
    fn to_matrix(&self) -> Mat4;
}

/// Local non-uniform scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scaling {
    /// Per-axis scale factors
    pub scale: Vec3,
}

impl Scaling {
    /// Create a scaling step
    pub fn new(scale: Vec3) -> Self {
        Scaling { scale }
    }

    /// Same factor on every axis
    pub fn uniform(factor: f32) -> Self {
        Scaling::new(Vec3::splat(factor))
    }
}

impl Default for Scaling {
    fn default() -> Self {
        Scaling::new(Vec3::ONE)
    }
}

impl Component for Scaling {}

impl LocalTransform for Scaling {
    fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale(self.scale)
    }
}

/// Local orientation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    /// Unit quaternion
    pub rotation: Quat,
}

impl Rotation {
    /// Create a rotation step
    pub fn new(rotation: Quat) -> Self {
        Rotation { rotation }
    }

    /// Rotation of `angle` radians around `axis`
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        Rotation::new(Quat::from_axis_angle(axis, angle))
    }

    /// Tilt of `degrees` around the right (+X) axis
    pub fn tilt_degrees(degrees: f32) -> Self {
        Rotation::from_axis_angle(Vec3::X, degrees.to_radians())
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Rotation::new(Quat::IDENTITY)
    }
}

impl Component for Rotation {}

impl LocalTransform for Rotation {
    fn to_matrix(&self) -> Mat4 {
        Mat4::from_quat(self.rotation)
    }
}

/// Local offset
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Translation {
    /// Offset from the parent origin
    pub translation: Vec3,
}

impl Translation {
    /// Create a translation step
    pub fn new(translation: Vec3) -> Self {
        Translation { translation }
    }
}

impl Component for Translation {}

impl LocalTransform for Translation {
    fn to_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.translation)
    }
}

/// Link from a child entity to its parent
///
/// Only [`ParentSystem::attach`](crate::transform::ParentSystem::attach)
/// creates these, so the hierarchy stays acyclic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parent {
    parent: Entity,
}

impl Parent {
    pub(crate) fn new(parent: Entity) -> Self {
        Parent { parent }
    }

    /// The parent entity
    pub fn entity(&self) -> Entity {
        self.parent
    }
}

impl Component for Parent {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_identity_steps() {
        assert_eq!(WorldMatrix::default().matrix, Mat4::IDENTITY);
        assert_eq!(Scaling::default().to_matrix(), Mat4::IDENTITY);
        assert_eq!(Rotation::default().to_matrix(), Mat4::IDENTITY);
        assert_eq!(Translation::default().to_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn test_translation_matrix() {
        let step = Translation::new(Vec3::new(5.0, 0.0, -2.0));
        let world = WorldMatrix::new(step.to_matrix());
        assert_eq!(world.translation(), Vec3::new(5.0, 0.0, -2.0));
    }

    #[test]
    fn test_tilt_rotates_up_toward_z() {
        let tilt = Rotation::tilt_degrees(90.0);
        let up = tilt.rotation * Vec3::Y;
        assert!(up.abs_diff_eq(Vec3::Z, 1e-6));
    }
}
