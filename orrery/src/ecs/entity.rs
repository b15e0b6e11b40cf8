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
//! Entity management
//!
//! Entities are opaque identifiers that correlate components across stores.
//! They carry no data of their own and are never recycled: the registry hands
//! out strictly increasing ids for the lifetime of a [`World`](crate::ecs::World).

use std::fmt;

/// Opaque entity handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Entity(u64);

impl Entity {
    /// Create an entity handle from a raw id
    ///
    /// Normally entities come from [`EntityRegistry::create_entity`]; building
    /// one by hand is mostly useful in tests.
    pub fn from_raw(id: u64) -> Self {
        Entity(id)
    }

    /// Get the raw id
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Allocator for entity ids
///
/// Ids start at zero and grow by one per call. There is no destroy operation.
#[derive(Debug, Default)]
pub struct EntityRegistry {
    next_entity_id: u64,
}

impl EntityRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        EntityRegistry { next_entity_id: 0 }
    }

    /// Allocate a fresh entity
    pub fn create_entity(&mut self) -> Entity {
        let entity = Entity(self.next_entity_id);
        self.next_entity_id += 1;
        entity
    }

    /// Number of entities created so far
    pub fn entity_count(&self) -> usize {
        self.next_entity_id as usize
    }

    /// Check whether `entity` was allocated by this registry
    pub fn contains(&self, entity: Entity) -> bool {
        entity.0 < self.next_entity_id
    }
}
