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
//! Parent/child composition
//!
//! [`ParentSystem`] runs last in the transform pipeline. For each child it
//! premultiplies the child's local world matrix by the parent's composed one.
//! A child must be processed after its parent, so the system keeps its dense
//! array in topological order (parents first), rebuilt whenever a link is
//! attached. Scene construction order therefore does not matter, and cycles
//! are rejected when the offending link is attached.

use crate::ecs::{ComponentStore, EcsError, Entity, FrameDelta, Link, System, Systems};
use crate::transform::{Parent, WorldSystem};
use log::debug;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Composes children onto their parents' world matrices
#[derive(Debug)]
pub struct ParentSystem {
    components: ComponentStore<Parent>,
    world: Link<WorldSystem>,
    /// Whether `components` is currently in parents-first order
    ordered: bool,
}

impl ParentSystem {
    /// Create an empty hierarchy
    pub fn new() -> Self {
        ParentSystem {
            components: ComponentStore::new(),
            world: Link::new(),
            ordered: true,
        }
    }

    /// Make `parent` the parent of `child`
    ///
    /// Both entities need a [`WorldMatrix`](crate::transform::WorldMatrix) by
    /// the time the system updates.
    ///
    /// # Errors
    ///
    /// - [`EcsError::SelfParent`] if `child == parent`
    /// - [`EcsError::ParentCycle`] if `parent` already descends from `child`
    /// - [`EcsError::DuplicateComponent`] if `child` already has a parent
    pub fn attach(&mut self, child: Entity, parent: Entity) -> Result<&Parent, EcsError> {
        if child == parent {
            return Err(EcsError::SelfParent(child));
        }
        if self.ancestors(parent).any(|ancestor| ancestor == child) {
            return Err(EcsError::ParentCycle { child, parent });
        }

        let link = self.components.try_insert(child, Parent::new(parent))?;
        self.ordered = false;
        Ok(link)
    }

    /// Parent of `entity`, if attached
    pub fn parent_of(&self, entity: Entity) -> Option<Entity> {
        self.components.get(entity).map(Parent::entity)
    }

    /// Direct children of `entity`, in dense order
    pub fn children_of(&self, entity: Entity) -> impl Iterator<Item = Entity> + '_ {
        self.components
            .iter()
            .filter(move |(_, link)| link.entity() == entity)
            .map(|(child, _)| child)
    }

    /// Walk up the hierarchy from `entity` (exclusive) to its root
    pub fn ancestors(&self, entity: Entity) -> impl Iterator<Item = Entity> + '_ {
        let mut current = self.parent_of(entity);
        std::iter::from_fn(move || {
            let ancestor = current?;
            current = self.parent_of(ancestor);
            Some(ancestor)
        })
    }

    /// Number of parent links
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Check if no entity has a parent
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Read-only view of the links, in composition order once updated
    pub fn store(&self) -> &ComponentStore<Parent> {
        &self.components
    }

    /// Reorder the dense array so every parent precedes its children
    ///
    /// Kahn's algorithm over the links, always taking the lowest dense index
    /// that is ready, so an array that is already valid keeps its order.
    fn order_parents_first(&mut self) {
        let count = self.components.len();
        let mut in_degree = vec![0usize; count];
        let mut children: Vec<Vec<usize>> = vec![Vec::new(); count];

        for (index, (_, link)) in self.components.iter().enumerate() {
            if let Some(parent_index) = self.components.index_of(link.entity()) {
                children[parent_index].push(index);
                in_degree[index] += 1;
            }
        }

        let mut ready: BinaryHeap<Reverse<usize>> = (0..count)
            .filter(|&index| in_degree[index] == 0)
            .map(Reverse)
            .collect();

        let mut sorted = Vec::with_capacity(count);
        while let Some(Reverse(index)) = ready.pop() {
            sorted.push(self.components.entity_at(index));
            for &child in &children[index] {
                in_degree[child] -= 1;
                if in_degree[child] == 0 {
                    ready.push(Reverse(child));
                }
            }
        }
        debug_assert_eq!(sorted.len(), count, "cycle in parent links");

        let mut moved = 0;
        for (target, entity) in sorted.into_iter().enumerate() {
            if let Some(current) = self.components.index_of(entity) {
                if current != target {
                    self.components.swap(target, current);
                    moved += 1;
                }
            }
        }
        if moved > 0 {
            debug!("Reordered {} parent links so parents compose first", moved);
        }
        self.ordered = true;
    }
}

impl Default for ParentSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for ParentSystem {
    fn initialize(&mut self, systems: &mut Systems) {
        self.world.resolve(systems);
    }

    fn update(&mut self, systems: &mut Systems, _delta: FrameDelta) {
        if !self.ordered {
            self.order_parents_first();
        }

        let world = systems.get_mut(self.world.handle());
        for (child, link) in self.components.iter() {
            let parent = world.world_matrix(link.entity());
            world.compose(child, parent);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entities(count: u64) -> Vec<Entity> {
        (0..count).map(Entity::from_raw).collect()
    }

    #[test]
    fn test_attach_and_query() {
        let e = entities(3);
        let mut hierarchy = ParentSystem::new();
        hierarchy.attach(e[1], e[0]).unwrap();
        hierarchy.attach(e[2], e[1]).unwrap();

        assert_eq!(hierarchy.parent_of(e[2]), Some(e[1]));
        assert_eq!(hierarchy.parent_of(e[0]), None);
        assert_eq!(hierarchy.ancestors(e[2]).collect::<Vec<_>>(), vec![e[1], e[0]]);
        assert_eq!(hierarchy.children_of(e[0]).collect::<Vec<_>>(), vec![e[1]]);
    }

    #[test]
    fn test_self_parent_rejected() {
        let e = entities(1);
        let mut hierarchy = ParentSystem::new();
        assert_eq!(hierarchy.attach(e[0], e[0]).err(), Some(EcsError::SelfParent(e[0])));
        assert!(hierarchy.is_empty());
    }

    #[test]
    fn test_cycle_rejected() {
        let e = entities(3);
        let mut hierarchy = ParentSystem::new();
        hierarchy.attach(e[1], e[0]).unwrap();
        hierarchy.attach(e[2], e[1]).unwrap();

        let err = hierarchy.attach(e[0], e[2]).err();
        assert_eq!(err, Some(EcsError::ParentCycle { child: e[0], parent: e[2] }));
        assert_eq!(hierarchy.len(), 2);
    }

    #[test]
    fn test_second_parent_rejected() {
        let e = entities(3);
        let mut hierarchy = ParentSystem::new();
        hierarchy.attach(e[2], e[0]).unwrap();

        let err = hierarchy.attach(e[2], e[1]).err();
        assert!(matches!(err, Some(EcsError::DuplicateComponent { .. })));
        assert_eq!(hierarchy.parent_of(e[2]), Some(e[0]));
    }

    #[test]
    fn test_ordering_moves_parents_first() {
        let e = entities(4);
        let mut hierarchy = ParentSystem::new();
        // Leaf attached first, root-most link last
        hierarchy.attach(e[3], e[2]).unwrap();
        hierarchy.attach(e[2], e[1]).unwrap();
        hierarchy.attach(e[1], e[0]).unwrap();

        hierarchy.order_parents_first();

        let order: Vec<Entity> = hierarchy.store().entities().collect();
        assert_eq!(order, vec![e[1], e[2], e[3]]);
    }

    #[test]
    fn test_ordering_keeps_valid_order() {
        let e = entities(5);
        let mut hierarchy = ParentSystem::new();
        hierarchy.attach(e[1], e[0]).unwrap();
        hierarchy.attach(e[4], e[0]).unwrap();
        hierarchy.attach(e[2], e[1]).unwrap();
        hierarchy.attach(e[3], e[4]).unwrap();

        hierarchy.order_parents_first();

        let order: Vec<Entity> = hierarchy.store().entities().collect();
        assert_eq!(order, vec![e[1], e[4], e[2], e[3]]);
    }
}
