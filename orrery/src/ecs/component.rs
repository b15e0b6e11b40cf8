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
//! Component storage
//!
//! Components are plain data attached to entities. Each component type lives
//! in exactly one [`ComponentStore`], normally owned by the system that
//! processes it.
//!
//! # Memory Layout
//!
//! The store keeps components densely packed in insertion order, with a sparse
//! entity→index map on the side:
//!
//! ```text
//! index_to_entity: [e3, e0, e7, ...]
//! components:      [c3, c0, c7, ...]   // iteration order == insertion order
//! entity_to_index: {e0: 1, e3: 0, e7: 2, ...}
//! ```
//!
//! Insertion order is meaningful. The transform hierarchy and the render
//! queue regroup the dense array after the fact through [`ComponentStore::swap`],
//! which keeps the sparse map consistent.

use crate::ecs::{EcsError, Entity};
use std::any::type_name;
use std::collections::HashMap;

/// Marker trait for component types
///
/// Components should be plain data structures without behavior.
pub trait Component: 'static + Send + Sync {}

/// Dense, insertion-ordered component storage with a sparse entity index
///
/// An entity may hold at most one component per store. The store is
/// append-only: there is no removal path.
///
/// # Example
///
/// ```
/// use orrery::ecs::{Component, ComponentStore, Entity};
///
/// #[derive(Debug, PartialEq)]
/// struct Mass(f32);
/// impl Component for Mass {}
///
/// let mut store = ComponentStore::new();
/// let entity = Entity::from_raw(1);
/// store.insert(entity, Mass(3.0));
///
/// assert_eq!(store.component(entity), &Mass(3.0));
/// assert_eq!(store.index_of(entity), Some(0));
/// ```
#[derive(Debug)]
pub struct ComponentStore<T: Component> {
    /// Mapping from Entity to dense array index
    entity_to_index: HashMap<Entity, usize>,
    /// Mapping from dense array index back to Entity
    index_to_entity: Vec<Entity>,
    components: Vec<T>,
}

impl<T: Component> ComponentStore<T> {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a new store with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        ComponentStore {
            entity_to_index: HashMap::with_capacity(capacity),
            index_to_entity: Vec::with_capacity(capacity),
            components: Vec::with_capacity(capacity),
        }
    }

    /// Get the number of components stored
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Check if an entity has a component in this store
    pub fn contains(&self, entity: Entity) -> bool {
        self.entity_to_index.contains_key(&entity)
    }

    /// Append a component for `entity`
    ///
    /// Returns [`EcsError::DuplicateComponent`] if the entity already has one.
    pub fn try_insert(&mut self, entity: Entity, component: T) -> Result<&mut T, EcsError> {
        if self.contains(entity) {
            return Err(EcsError::DuplicateComponent {
                entity,
                component: type_name::<T>(),
            });
        }

        let index = self.components.len();
        self.components.push(component);
        self.index_to_entity.push(entity);
        self.entity_to_index.insert(entity, index);

        debug_assert_eq!(self.entity_to_index.len(), self.index_to_entity.len());
        debug_assert_eq!(self.entity_to_index.len(), self.components.len());

        Ok(&mut self.components[index])
    }

    /// Append a component for `entity`
    ///
    /// # Panics
    ///
    /// Panics if the entity already has a component in this store.
    pub fn insert(&mut self, entity: Entity, component: T) -> &mut T {
        match self.try_insert(entity, component) {
            Ok(component) => component,
            Err(err) => panic!("{}", err),
        }
    }

    /// Get a reference to the component of `entity`, if any
    pub fn get(&self, entity: Entity) -> Option<&T> {
        let index = self.entity_to_index.get(&entity)?;
        Some(&self.components[*index])
    }

    /// Get a mutable reference to the component of `entity`, if any
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        let index = self.entity_to_index.get(&entity)?;
        Some(&mut self.components[*index])
    }

    /// Get the component of `entity`
    ///
    /// # Panics
    ///
    /// Panics if the entity has no component in this store.
    pub fn component(&self, entity: Entity) -> &T {
        match self.get(entity) {
            Some(component) => component,
            None => missing::<T>(entity),
        }
    }

    /// Get the component of `entity` mutably
    ///
    /// # Panics
    ///
    /// Panics if the entity has no component in this store.
    pub fn component_mut(&mut self, entity: Entity) -> &mut T {
        match self.entity_to_index.get(&entity) {
            Some(&index) => &mut self.components[index],
            None => missing::<T>(entity),
        }
    }

    /// Get the dense index for an entity, if it exists
    pub fn index_of(&self, entity: Entity) -> Option<usize> {
        self.entity_to_index.get(&entity).copied()
    }

    /// Get the entity stored at a dense index
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn entity_at(&self, index: usize) -> Entity {
        self.index_to_entity[index]
    }

    /// Exchange two slots of the dense array
    ///
    /// The sparse map is updated so lookups by entity stay valid.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.components.swap(a, b);
        self.index_to_entity.swap(a, b);
        self.entity_to_index.insert(self.index_to_entity[a], a);
        self.entity_to_index.insert(self.index_to_entity[b], b);
    }

    /// Visit every (entity, component) pair in dense order
    pub fn each<F>(&mut self, mut visitor: F)
    where
        F: FnMut(Entity, &mut T),
    {
        for (entity, component) in self.iter_mut() {
            visitor(entity, component);
        }
    }

    /// Iterate over (entity, component) pairs in dense order
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> + '_ {
        self.index_to_entity.iter().copied().zip(self.components.iter())
    }

    /// Iterate mutably over (entity, component) pairs in dense order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> + '_ {
        self.index_to_entity
            .iter()
            .copied()
            .zip(self.components.iter_mut())
    }

    /// Entities in dense order
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.index_to_entity.iter().copied()
    }

    /// The dense component array
    pub fn as_slice(&self) -> &[T] {
        &self.components
    }
}

impl<T: Component> Default for ComponentStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn missing<T>(entity: Entity) -> ! {
    panic!("{} has no `{}` component", entity, type_name::<T>())
}
