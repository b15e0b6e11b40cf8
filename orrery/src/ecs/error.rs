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
//! Error types for the ECS runtime

use crate::ecs::Entity;
use thiserror::Error;

/// Errors reported by registration, lifecycle and hierarchy operations
///
/// Invariant violations that can only come from a programming mistake, such
/// as looking up a component that was never added, panic instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EcsError {
    /// The entity already holds a component in this store
    #[error("{entity} already has a `{component}` component")]
    DuplicateComponent {
        /// Offending entity
        entity: Entity,
        /// Component type name
        component: &'static str,
    },

    /// A system of this type is already registered
    #[error("system `{0}` is already registered")]
    DuplicateSystem(&'static str),

    /// Systems cannot be added once the registry is initialized
    #[error("cannot register system `{0}` after initialization")]
    RegistrationClosed(&'static str),

    /// `initialize` was called twice
    #[error("systems are already initialized")]
    AlreadyInitialized,

    /// `update` was called before `initialize` or after `terminate`
    #[error("systems are not initialized")]
    NotInitialized,

    /// An entity was attached to itself
    #[error("{0} cannot be its own parent")]
    SelfParent(Entity),

    /// Attaching `child` to `parent` would close a loop in the hierarchy
    #[error("attaching {child} to {parent} would create a cycle")]
    ParentCycle {
        /// Entity being attached
        child: Entity,
        /// Requested parent
        parent: Entity,
    },
}
