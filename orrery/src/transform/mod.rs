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
//! Hierarchical transform pipeline
//!
//! Five systems cooperate on a shared per-entity [`WorldMatrix`]. Registered
//! in this order they compose, every frame:
//!
//! ```text
//! WorldSystem       world = I
//! ScalingSystem     world = S * world
//! RotationSystem    world = R * world
//! TranslationSystem world = T * world
//! ParentSystem      world = parent.world * world
//! ```
//!
//! Each step applies only when the entity holds the matching component.

mod components;
mod hierarchy;
mod systems;

pub use components::{LocalTransform, Parent, Rotation, Scaling, Translation, WorldMatrix};
pub use hierarchy::ParentSystem;
pub use systems::{LocalSystem, RotationSystem, ScalingSystem, TranslationSystem, WorldSystem};
