//! Entity Component System (ECS) core implementation
//!
//! This module provides the foundational ECS architecture including:
//! - Entity allocation
//! - Dense, insertion-ordered component storage
//! - A system registry driving initialize/update/terminate in order

mod component;
mod entity;
mod error;
mod system;
mod world;

pub use component::{Component, ComponentStore};
pub use entity::{Entity, EntityRegistry};
pub use error::EcsError;
pub use system::{
    AsAny, ComponentOwner, FrameDelta, Link, System, SystemHandle, SystemIndex, Systems,
};
pub use world::World;
