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
//! Blend-partitioned render queue

use crate::ecs::{
    Component, ComponentStore, EcsError, Entity, FrameDelta, Link, System, Systems,
};
use crate::render::{Material, Mesh, ResourceHandle};
use crate::transform::WorldSystem;
use glam::Mat4;
use log::trace;
use std::ops::Range;

/// How a draw combines with what is already in the target
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BlendMode {
    /// Opaque, overwrites the target
    #[default]
    Replace,
    /// Additive
    Add,
    /// Alpha-blended, drawn last
    Alpha,
}

/// What to draw for an entity
///
/// The blend mode is fixed at construction so the queue's partition stays
/// valid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Renderable {
    /// Geometry
    pub mesh: ResourceHandle<Mesh>,
    /// Shading
    pub material: ResourceHandle<Material>,
    blend: BlendMode,
}

impl Renderable {
    /// Opaque renderable
    pub fn new(mesh: ResourceHandle<Mesh>, material: ResourceHandle<Material>) -> Self {
        Renderable {
            mesh,
            material,
            blend: BlendMode::Replace,
        }
    }

    /// Renderable with an explicit blend mode
    pub fn with_blend(
        mesh: ResourceHandle<Mesh>,
        material: ResourceHandle<Material>,
        blend: BlendMode,
    ) -> Self {
        Renderable {
            mesh,
            material,
            blend,
        }
    }

    /// Blend mode
    pub fn blend(&self) -> BlendMode {
        self.blend
    }
}

impl Component for Renderable {}

/// One entry of the frame's draw list
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    /// Entity being drawn
    pub entity: Entity,
    /// Geometry
    pub mesh: ResourceHandle<Mesh>,
    /// Shading
    pub material: ResourceHandle<Material>,
    /// Blend state to bind
    pub blend: BlendMode,
    /// Object to world transform
    pub world: Mat4,
}

/// Collects renderables into a draw list ordered Replace, Add, Alpha
///
/// The component store itself is kept partitioned by blend mode: every
/// insertion swaps the new entry into its group. Order within a group is not
/// preserved. The store is only handed out read-only, so insertion through
/// [`RenderQueueSystem::add_component`] is the one way in.
#[derive(Debug, Default)]
pub struct RenderQueueSystem {
    components: ComponentStore<Renderable>,
    world: Link<WorldSystem>,
    /// Start of the Add group
    first_add: usize,
    /// Start of the Alpha group
    first_alpha: usize,
    draw_list: Vec<DrawCommand>,
    /// Group starts captured when `draw_list` was built
    drawn_first_add: usize,
    drawn_first_alpha: usize,
}

impl RenderQueueSystem {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a renderable and move it into its blend group
    ///
    /// # Panics
    ///
    /// Panics if the entity already has a renderable.
    pub fn add_component(&mut self, entity: Entity, component: Renderable) -> &Renderable {
        match self.try_add_component(entity, component) {
            Ok(component) => component,
            Err(err) => panic!("{}", err),
        }
    }

    /// Attach a renderable, rejecting a second one for the same entity
    pub fn try_add_component(
        &mut self,
        entity: Entity,
        component: Renderable,
    ) -> Result<&Renderable, EcsError> {
        self.components.try_insert(entity, component)?;
        self.place_last();
        Ok(self.components.component(entity))
    }

    /// Renderable of `entity`
    ///
    /// # Panics
    ///
    /// Panics if absent.
    pub fn component(&self, entity: Entity) -> &Renderable {
        self.components.component(entity)
    }

    /// The partitioned store
    pub fn store(&self) -> &ComponentStore<Renderable> {
        &self.components
    }

    /// Draw list built by the last update
    pub fn draw_list(&self) -> &[DrawCommand] {
        &self.draw_list
    }

    /// Draws of one blend mode from the last update
    ///
    /// Renderables added since that update show up only after the next one.
    pub fn draws(&self, blend: BlendMode) -> &[DrawCommand] {
        let range = match blend {
            BlendMode::Replace => 0..self.drawn_first_add,
            BlendMode::Add => self.drawn_first_add..self.drawn_first_alpha,
            BlendMode::Alpha => self.drawn_first_alpha..self.draw_list.len(),
        };
        &self.draw_list[range]
    }

    /// Index range of the renderables with `blend` in the store
    pub fn range(&self, blend: BlendMode) -> Range<usize> {
        match blend {
            BlendMode::Replace => 0..self.first_add,
            BlendMode::Add => self.first_add..self.first_alpha,
            BlendMode::Alpha => self.first_alpha..self.components.len(),
        }
    }

    fn place_last(&mut self) {
        let last = self.components.len() - 1;
        match self.components.as_slice()[last].blend {
            BlendMode::Replace => {
                self.components.swap(last, self.first_alpha);
                self.components.swap(self.first_alpha, self.first_add);
                self.first_add += 1;
                self.first_alpha += 1;
            }
            BlendMode::Add => {
                self.components.swap(last, self.first_alpha);
                self.first_alpha += 1;
            }
            BlendMode::Alpha => {}
        }
    }
}

impl System for RenderQueueSystem {
    fn initialize(&mut self, systems: &mut Systems) {
        self.world.resolve(systems);
    }

    fn update(&mut self, systems: &mut Systems, _delta: FrameDelta) {
        let world = systems.get(self.world.handle());
        self.draw_list.clear();
        self.draw_list
            .extend(self.components.iter().map(|(entity, renderable)| DrawCommand {
                entity,
                mesh: renderable.mesh,
                material: renderable.material,
                blend: renderable.blend,
                world: world.world_matrix(entity),
            }));
        self.drawn_first_add = self.first_add;
        self.drawn_first_alpha = self.first_alpha;
        trace!("Render queue holds {} draws", self.draw_list.len());
    }
}
