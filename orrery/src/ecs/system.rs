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
//! System execution framework
//!
//! Systems are stateful singletons, one per type, that run once per frame in
//! registration order. A system usually owns the [`ComponentStore`] of the
//! component it processes and reaches other systems through typed
//! [`SystemHandle`]s resolved once in [`System::initialize`].
//!
//! # Lifecycle
//!
//! ```text
//! add_system* -> initialize -> update* -> terminate
//!                (in order)    (in order)  (reverse order)
//! ```
//!
//! While a system runs it is moved out of its slot, so it can borrow any
//! other system mutably through the [`Systems`] argument. Looking up the
//! running system from inside its own callback is a fatal error.

use crate::ecs::{Component, ComponentStore, EcsError, Entity};
use log::{debug, info, trace};
use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

/// Time elapsed since the previous frame, on both clocks
///
/// `wall` is real time in seconds and drives input smoothing and the camera.
/// `simulated` is wall time scaled by the user-selected speed and drives
/// kinematics.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameDelta {
    /// Wall-clock seconds
    pub wall: f32,
    /// Simulated time units
    pub simulated: f32,
}

impl FrameDelta {
    /// A zero-length frame
    pub const ZERO: FrameDelta = FrameDelta {
        wall: 0.0,
        simulated: 0.0,
    };

    /// Create a frame delta
    pub fn new(wall: f32, simulated: f32) -> Self {
        FrameDelta { wall, simulated }
    }
}

/// Upcast helper so boxed systems can be downcast to their concrete type
pub trait AsAny: Any {
    /// View as `&dyn Any`
    fn as_any(&self) -> &dyn Any;
    /// View as `&mut dyn Any`
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A per-frame behavior unit
///
/// All hooks have empty defaults.
pub trait System: AsAny {
    /// Resolve handles to other systems; runs once, in registration order
    fn initialize(&mut self, _systems: &mut Systems) {}

    /// Advance one frame; runs in registration order
    fn update(&mut self, _systems: &mut Systems, _delta: FrameDelta) {}

    /// Release resources; runs once, in reverse registration order
    fn terminate(&mut self, _systems: &mut Systems) {}

    /// Get the name of this system for debugging
    fn name(&self) -> &str {
        type_name::<Self>()
    }
}

/// Systems that own the component store of their component type
///
/// Gives scene construction a uniform way to attach components.
pub trait ComponentOwner {
    /// The component type stored by this system
    type Component: Component;

    /// The owned store
    fn store(&self) -> &ComponentStore<Self::Component>;

    /// The owned store, mutably
    fn store_mut(&mut self) -> &mut ComponentStore<Self::Component>;

    /// Attach a component to `entity`
    ///
    /// # Panics
    ///
    /// Panics if the entity already has one.
    fn add_component(&mut self, entity: Entity, component: Self::Component) -> &mut Self::Component {
        self.store_mut().insert(entity, component)
    }

    /// Get the component of `entity`
    ///
    /// # Panics
    ///
    /// Panics if absent.
    fn component(&self, entity: Entity) -> &Self::Component {
        self.store().component(entity)
    }

    /// Get the component of `entity` mutably
    ///
    /// # Panics
    ///
    /// Panics if absent.
    fn component_mut(&mut self, entity: Entity) -> &mut Self::Component {
        self.store_mut().component_mut(entity)
    }
}

/// Stable slot index of a system type within one registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SystemIndex(usize);

impl SystemIndex {
    /// Get the raw slot number
    pub fn value(&self) -> usize {
        self.0
    }
}

impl fmt::Display for SystemIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Typed, non-owning reference to a registered system
pub struct SystemHandle<T> {
    index: SystemIndex,
    _marker: PhantomData<fn() -> T>,
}

impl<T> SystemHandle<T> {
    /// Slot index the handle points at
    pub fn index(&self) -> SystemIndex {
        self.index
    }
}

impl<T> Clone for SystemHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SystemHandle<T> {}

impl<T> fmt::Debug for SystemHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SystemHandle<{}>({})", type_name::<T>(), self.index)
    }
}

/// A dependency on another system, resolved once in [`System::initialize`]
pub struct Link<T> {
    handle: Option<SystemHandle<T>>,
}

impl<T: System> Link<T> {
    /// An unresolved link
    pub fn new() -> Self {
        Link { handle: None }
    }

    /// Look the target up in the registry
    ///
    /// # Panics
    ///
    /// Panics if `T` was never registered.
    pub fn resolve(&mut self, systems: &Systems) {
        self.handle = Some(systems.handle::<T>());
    }

    /// Whether [`Link::resolve`] has run
    pub fn is_resolved(&self) -> bool {
        self.handle.is_some()
    }

    /// The resolved handle
    ///
    /// # Panics
    ///
    /// Panics if the link was never resolved.
    pub fn handle(&self) -> SystemHandle<T> {
        match self.handle {
            Some(handle) => handle,
            None => panic!("link to `{}` used before initialize", type_name::<T>()),
        }
    }
}

impl<T: System> Default for Link<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Link<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.handle {
            Some(handle) => write!(f, "Link({:?})", handle),
            None => write!(f, "Link<{}>(unresolved)", type_name::<T>()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Registering,
    Running,
    Terminated,
}

struct Slot {
    name: &'static str,
    /// `None` while the system is executing one of its hooks
    system: Option<Box<dyn System>>,
}

/// Registry owning every system in registration order
///
/// Each system type is bound to the next free slot the first time it is
/// registered. Update order is slot order.
pub struct Systems {
    slots: Vec<Slot>,
    by_type: HashMap<TypeId, SystemIndex>,
    state: Lifecycle,
}

impl Systems {
    /// Create an empty registry
    pub fn new() -> Self {
        Systems {
            slots: Vec::new(),
            by_type: HashMap::new(),
            state: Lifecycle::Registering,
        }
    }

    /// Register a system
    ///
    /// # Errors
    ///
    /// - [`EcsError::DuplicateSystem`] if a system of this type is registered
    /// - [`EcsError::RegistrationClosed`] once [`Systems::initialize`] has run
    pub fn add_system<T: System>(&mut self, system: T) -> Result<&mut T, EcsError> {
        let name = type_name::<T>();
        if self.state != Lifecycle::Registering {
            return Err(EcsError::RegistrationClosed(name));
        }
        if self.by_type.contains_key(&TypeId::of::<T>()) {
            return Err(EcsError::DuplicateSystem(name));
        }

        let index = SystemIndex(self.slots.len());
        self.slots.push(Slot {
            name,
            system: Some(Box::new(system)),
        });
        self.by_type.insert(TypeId::of::<T>(), index);
        debug!("Registered system {} at slot {}", name, index);

        Ok(self.get_mut(SystemHandle {
            index,
            _marker: PhantomData,
        }))
    }

    /// Slot index of `T`, if registered
    pub fn index_of<T: System>(&self) -> Option<SystemIndex> {
        self.by_type.get(&TypeId::of::<T>()).copied()
    }

    /// Resolve a handle to `T`, if registered
    pub fn try_handle<T: System>(&self) -> Option<SystemHandle<T>> {
        self.index_of::<T>().map(|index| SystemHandle {
            index,
            _marker: PhantomData,
        })
    }

    /// Resolve a handle to `T`
    ///
    /// # Panics
    ///
    /// Panics if `T` was never registered.
    pub fn handle<T: System>(&self) -> SystemHandle<T> {
        match self.try_handle::<T>() {
            Some(handle) => handle,
            None => panic!("system `{}` is not registered", type_name::<T>()),
        }
    }

    /// Borrow the system behind a handle
    ///
    /// # Panics
    ///
    /// Panics if the system is currently running.
    pub fn get<T: System>(&self, handle: SystemHandle<T>) -> &T {
        let slot = &self.slots[handle.index.0];
        match slot.system.as_deref() {
            Some(system) => downcast_ref(system.as_any(), slot.name),
            None => running(slot.name),
        }
    }

    /// Borrow the system behind a handle mutably
    ///
    /// # Panics
    ///
    /// Panics if the system is currently running.
    pub fn get_mut<T: System>(&mut self, handle: SystemHandle<T>) -> &mut T {
        let slot = &mut self.slots[handle.index.0];
        let name = slot.name;
        match slot.system.as_deref_mut() {
            Some(system) => downcast_mut(system.as_any_mut(), name),
            None => running(name),
        }
    }

    /// Borrow a registered system
    ///
    /// # Panics
    ///
    /// Panics if `T` was never registered or is currently running.
    pub fn system<T: System>(&self) -> &T {
        self.get(self.handle::<T>())
    }

    /// Borrow a registered system mutably
    ///
    /// # Panics
    ///
    /// Panics if `T` was never registered or is currently running.
    pub fn system_mut<T: System>(&mut self) -> &mut T {
        let handle = self.handle::<T>();
        self.get_mut(handle)
    }

    /// Borrow `T` if it is registered and not running
    pub fn try_system<T: System>(&self) -> Option<&T> {
        let handle = self.try_handle::<T>()?;
        self.slots[handle.index.0]
            .system
            .as_deref()
            .and_then(|system| system.as_any().downcast_ref::<T>())
    }

    /// Number of registered systems
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if no system is registered
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// System type names in registration order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.slots.iter().map(|slot| slot.name)
    }

    /// Whether `initialize` has run and `terminate` has not
    pub fn is_initialized(&self) -> bool {
        self.state == Lifecycle::Running
    }

    /// Run every system's `initialize` in registration order
    ///
    /// Registration is closed from this point on.
    ///
    /// # Errors
    ///
    /// [`EcsError::AlreadyInitialized`] on a second call.
    pub fn initialize(&mut self) -> Result<(), EcsError> {
        if self.state != Lifecycle::Registering {
            return Err(EcsError::AlreadyInitialized);
        }
        self.state = Lifecycle::Running;

        info!("Initializing {} systems", self.slots.len());
        for index in 0..self.slots.len() {
            self.run_slot(index, |system, systems| system.initialize(systems));
        }
        Ok(())
    }

    /// Run every system's `update` in registration order
    ///
    /// # Errors
    ///
    /// [`EcsError::NotInitialized`] before `initialize` or after `terminate`.
    pub fn update(&mut self, delta: FrameDelta) -> Result<(), EcsError> {
        if self.state != Lifecycle::Running {
            return Err(EcsError::NotInitialized);
        }

        trace!("Frame: wall {:.6}s, simulated {:.6}", delta.wall, delta.simulated);
        for index in 0..self.slots.len() {
            self.run_slot(index, |system, systems| system.update(systems, delta));
        }
        Ok(())
    }

    /// Run every system's `terminate` in reverse registration order
    ///
    /// Hooks run exactly once, whether or not `initialize` ever ran. Later
    /// calls are no-ops.
    pub fn terminate(&mut self) -> Result<(), EcsError> {
        if self.state == Lifecycle::Terminated {
            return Ok(());
        }

        info!("Terminating {} systems", self.slots.len());
        for index in (0..self.slots.len()).rev() {
            self.run_slot(index, |system, systems| system.terminate(systems));
        }
        self.state = Lifecycle::Terminated;
        Ok(())
    }

    fn run_slot<F>(&mut self, index: usize, hook: F)
    where
        F: FnOnce(&mut dyn System, &mut Systems),
    {
        let mut system = match self.slots[index].system.take() {
            Some(system) => system,
            None => running(self.slots[index].name),
        };
        hook(&mut *system, self);
        self.slots[index].system = Some(system);
    }
}

impl Default for Systems {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Systems {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Systems")
            .field("systems", &self.slots.iter().map(|s| s.name).collect::<Vec<_>>())
            .field("state", &self.state)
            .finish()
    }
}

fn downcast_ref<'a, T: 'static>(system: &'a dyn Any, name: &str) -> &'a T {
    match system.downcast_ref::<T>() {
        Some(system) => system,
        None => unreachable!("slot of `{}` holds a different type", name),
    }
}

fn downcast_mut<'a, T: 'static>(system: &'a mut dyn Any, name: &str) -> &'a mut T {
    match system.downcast_mut::<T>() {
        Some(system) => system,
        None => unreachable!("slot of `{}` holds a different type", name),
    }
}

fn running(name: &str) -> ! {
    panic!("system `{}` is running and cannot be borrowed", name)
}
