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
//! World-matrix composition systems
//!
//! [`WorldSystem`] resets every world matrix to identity; each
//! [`LocalSystem`] then applies its step on top. With column vectors a step
//! `S` turns `world` into `S * world`, so after scaling, rotation and
//! translation run (in that registration order) the matrix is `T * R * S`.

use crate::ecs::{
    ComponentOwner, ComponentStore, Entity, FrameDelta, Link, System, Systems,
};
use crate::transform::{LocalTransform, Rotation, Scaling, Translation, WorldMatrix};
use glam::{Mat4, Vec3};
use std::fmt;

/// Owner of every [`WorldMatrix`]; resets them at the start of composition
#[derive(Debug, Default)]
pub struct WorldSystem {
    components: ComponentStore<WorldMatrix>,
}

impl WorldSystem {
    /// Create an empty world-matrix system
    pub fn new() -> Self {
        WorldSystem {
            components: ComponentStore::new(),
        }
    }

    /// Composed matrix of `entity`
    ///
    /// # Panics
    ///
    /// Panics if the entity has no world matrix.
    pub fn world_matrix(&self, entity: Entity) -> Mat4 {
        self.components.component(entity).matrix
    }

    /// Composed matrix of `entity`, if it has one
    pub fn try_world_matrix(&self, entity: Entity) -> Option<Mat4> {
        self.components.get(entity).map(|world| world.matrix)
    }

    /// World-space position of `entity`
    ///
    /// # Panics
    ///
    /// Panics if the entity has no world matrix.
    pub fn translation(&self, entity: Entity) -> Vec3 {
        self.components.component(entity).translation()
    }

    /// Apply `step` on top of the current matrix of `entity`
    ///
    /// # Panics
    ///
    /// Panics if the entity has no world matrix.
    pub fn compose(&mut self, entity: Entity, step: Mat4) {
        let world = self.components.component_mut(entity);
        world.matrix = step * world.matrix;
    }
}

impl System for WorldSystem {
    fn update(&mut self, _systems: &mut Systems, _delta: FrameDelta) {
        self.components.each(|_, world| world.matrix = Mat4::IDENTITY);
    }
}

impl ComponentOwner for WorldSystem {
    type Component = WorldMatrix;

    fn store(&self) -> &ComponentStore<WorldMatrix> {
        &self.components
    }

    fn store_mut(&mut self) -> &mut ComponentStore<WorldMatrix> {
        &mut self.components
    }
}

/// Composition step for one kind of local transform
///
/// Every entity holding a `C` must also hold a [`WorldMatrix`].
pub struct LocalSystem<C: LocalTransform> {
    components: ComponentStore<C>,
    world: Link<WorldSystem>,
}

/// Applies [`Scaling`]
pub type ScalingSystem = LocalSystem<Scaling>;
/// Applies [`Rotation`]
pub type RotationSystem = LocalSystem<Rotation>;
/// Applies [`Translation`]
pub type TranslationSystem = LocalSystem<Translation>;

impl<C: LocalTransform> LocalSystem<C> {
    /// Create an empty step system
    pub fn new() -> Self {
        LocalSystem {
            components: ComponentStore::new(),
            world: Link::new(),
        }
    }
}

impl<C: LocalTransform> Default for LocalSystem<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: LocalTransform> fmt::Debug for LocalSystem<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalSystem")
            .field("components", &self.components.len())
            .field("world", &self.world)
            .finish()
    }
}

impl<C: LocalTransform> System for LocalSystem<C> {
    fn initialize(&mut self, systems: &mut Systems) {
        self.world.resolve(systems);
    }

    fn update(&mut self, systems: &mut Systems, _delta: FrameDelta) {
        let world = systems.get_mut(self.world.handle());
        for (entity, step) in self.components.iter() {
            world.compose(entity, step.to_matrix());
        }
    }
}

impl<C: LocalTransform> ComponentOwner for LocalSystem<C> {
    type Component = C;

    fn store(&self) -> &ComponentStore<C> {
        &self.components
    }

    fn store_mut(&mut self) -> &mut ComponentStore<C> {
        &mut self.components
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::World;
    use glam::Quat;
    use std::f32::consts::FRAC_PI_2;

    fn pipeline() -> World {
        let mut world = World::new();
        world.add_system(WorldSystem::new()).unwrap();
        world.add_system(ScalingSystem::new()).unwrap();
        world.add_system(RotationSystem::new()).unwrap();
        world.add_system(TranslationSystem::new()).unwrap();
        world
    }

    #[test]
    fn test_scale_rotate_translate_order() {
        let mut world = pipeline();
        let entity = world.create_entity();
        world.add_component::<WorldSystem>(entity, WorldMatrix::default());
        world.add_component::<ScalingSystem>(entity, Scaling::uniform(2.0));
        world.add_component::<RotationSystem>(entity, Rotation::from_axis_angle(Vec3::Y, FRAC_PI_2));
        world.add_component::<TranslationSystem>(entity, Translation::new(Vec3::new(0.0, 0.0, 10.0)));
        world.initialize().unwrap();
        world.update(0.016, 0.0).unwrap();

        let matrix = world.system::<WorldSystem>().world_matrix(entity);
        // Local +X: scaled to 2, turned onto -Z, then offset by +10 Z
        let point = matrix.transform_point3(Vec3::X);
        assert!(point.abs_diff_eq(Vec3::new(0.0, 0.0, 8.0), 1e-5), "got {point}");
    }

    #[test]
    fn test_world_resets_every_frame() {
        let mut world = pipeline();
        let entity = world.create_entity();
        world.add_component::<WorldSystem>(entity, WorldMatrix::default());
        world.add_component::<TranslationSystem>(entity, Translation::new(Vec3::X));
        world.initialize().unwrap();

        for _ in 0..5 {
            world.update(0.016, 0.0).unwrap();
        }
        assert_eq!(world.system::<WorldSystem>().translation(entity), Vec3::X);
    }

    #[test]
    fn test_missing_steps_are_skipped() {
        let mut world = pipeline();
        let entity = world.create_entity();
        world.add_component::<WorldSystem>(entity, WorldMatrix::new(Mat4::from_scale(Vec3::splat(9.0))));
        world.initialize().unwrap();
        world.update(0.016, 0.0).unwrap();

        assert_eq!(world.system::<WorldSystem>().world_matrix(entity), Mat4::IDENTITY);
    }

    #[test]
    #[should_panic(expected = "has no")]
    fn test_local_step_without_world_matrix_panics() {
        let mut world = pipeline();
        let entity = world.create_entity();
        world.add_component::<RotationSystem>(entity, Rotation::new(Quat::IDENTITY));
        world.initialize().unwrap();
        world.update(0.016, 0.0).unwrap();
    }

    #[test]
    #[should_panic(expected = "already has a")]
    fn test_duplicate_step_rejected() {
        let mut world = pipeline();
        let entity = world.create_entity();
        world.add_component::<ScalingSystem>(entity, Scaling::uniform(1.0));
        world.add_component::<ScalingSystem>(entity, Scaling::uniform(3.0));
    }
}
