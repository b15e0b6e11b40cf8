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
//! # Orrery
//!
//! An entity-component runtime that drives a hierarchical, animated solar
//! system.
//!
//! ## Features
//!
//! - **ECS core**: monotonically allocated entities, dense per-type component
//!   stores, and a registry of singleton systems run in registration order
//! - **Transform pipeline**: world matrices composed every frame from scale,
//!   rotation, translation and the parent's world matrix
//! - **Kinematics**: circular orbits and constant spins on a simulated clock
//! - **Camera**: focus cycling and smoothed orbit controls driven by input axes
//! - **Render queue**: a blend-partitioned draw list over opaque resource handles
//!
//! ## Example
//!
//! ```rust
//! use orrery::ecs::World;
//! use orrery::transform::{Translation, TranslationSystem, WorldMatrix, WorldSystem};
//! use glam::Vec3;
//!
//! let mut world = World::new();
//! world.add_system(WorldSystem::new()).unwrap();
//! world.add_system(TranslationSystem::new()).unwrap();
//!
//! let entity = world.create_entity();
//! world.add_component::<WorldSystem>(entity, WorldMatrix::default());
//! world.add_component::<TranslationSystem>(entity, Translation::new(Vec3::X));
//!
//! world.initialize().unwrap();
//! world.update(0.016, 0.0).unwrap();
//!
//! assert_eq!(world.system::<WorldSystem>().translation(entity), Vec3::X);
//! ```

#![warn(missing_docs)]

/// Entity Component System implementation
pub mod ecs;

/// World-matrix composition
pub mod transform;

/// Orbit and spin systems
pub mod kinematics;

/// Wall and simulated time
pub mod clock;

/// Keyboard and window state
pub mod input;

/// Focus/orbit camera controller
pub mod camera;

/// Resource handles and draw list
pub mod render;

/// Scene construction
pub mod scene;

/// Runtime settings
pub mod config;

pub use config::{ConfigError, OrreryConfig};
pub use ecs::{EcsError, Entity, World};
