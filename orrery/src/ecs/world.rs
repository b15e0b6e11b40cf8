//! World management
//!
//! The World is the explicitly owned aggregate of the entity registry and the
//! system registry. Nothing in the runtime is global, so independent worlds
//! can coexist (tests build many).

use crate::ecs::{ComponentOwner, EcsError, Entity, EntityRegistry, FrameDelta, System, Systems};

/// The main ECS world container
///
/// # Example
///
/// ```
/// use orrery::ecs::World;
/// use orrery::transform::{Translation, TranslationSystem, WorldSystem};
/// use glam::Vec3;
///
/// let mut world = World::new();
/// world.add_system(WorldSystem::new()).unwrap();
/// world.add_system(TranslationSystem::new()).unwrap();
///
/// let entity = world.create_entity();
/// world.add_component::<WorldSystem>(entity, Default::default());
/// world.add_component::<TranslationSystem>(entity, Translation::new(Vec3::X));
///
/// world.initialize().unwrap();
/// world.update(0.016, 0.0).unwrap();
///
/// let position = world.system::<WorldSystem>().translation(entity);
/// assert_eq!(position, Vec3::X);
/// ```
#[derive(Debug, Default)]
pub struct World {
    entities: EntityRegistry,
    systems: Systems,
}

impl World {
    /// Create a new empty world
    pub fn new() -> Self {
        World {
            entities: EntityRegistry::new(),
            systems: Systems::new(),
        }
    }

    /// Create a new entity
    pub fn create_entity(&mut self) -> Entity {
        self.entities.create_entity()
    }

    /// Get the number of entities created so far
    pub fn entity_count(&self) -> usize {
        self.entities.entity_count()
    }

    /// Check if an entity was created by this world
    pub fn contains_entity(&self, entity: Entity) -> bool {
        self.entities.contains(entity)
    }

    /// Register a system; see [`Systems::add_system`]
    pub fn add_system<T: System>(&mut self, system: T) -> Result<&mut T, EcsError> {
        self.systems.add_system(system)
    }

    /// Borrow a registered system
    ///
    /// # Panics
    ///
    /// Panics if `T` was never registered.
    pub fn system<T: System>(&self) -> &T {
        self.systems.system::<T>()
    }

    /// Borrow a registered system mutably
    ///
    /// # Panics
    ///
    /// Panics if `T` was never registered.
    pub fn system_mut<T: System>(&mut self) -> &mut T {
        self.systems.system_mut::<T>()
    }

    /// Attach a component through the system that owns its store
    ///
    /// # Panics
    ///
    /// Panics if `S` is not registered or the entity already has the component.
    pub fn add_component<S>(&mut self, entity: Entity, component: S::Component) -> &mut S::Component
    where
        S: System + ComponentOwner,
    {
        self.system_mut::<S>().add_component(entity, component)
    }

    /// The system registry
    pub fn systems(&self) -> &Systems {
        &self.systems
    }

    /// The system registry, mutably
    pub fn systems_mut(&mut self) -> &mut Systems {
        &mut self.systems
    }

    /// Run every system's `initialize` in registration order
    pub fn initialize(&mut self) -> Result<(), EcsError> {
        self.systems.initialize()
    }

    /// Advance one frame
    ///
    /// `wall_dt` is the measured frame time in seconds; `sim_dt` the
    /// simulated time that kinematics should advance by.
    pub fn update(&mut self, wall_dt: f32, sim_dt: f32) -> Result<(), EcsError> {
        self.systems.update(FrameDelta::new(wall_dt, sim_dt))
    }

    /// Advance one frame with a prepared [`FrameDelta`]
    pub fn update_with(&mut self, delta: FrameDelta) -> Result<(), EcsError> {
        self.systems.update(delta)
    }

    /// Run every system's `terminate` in reverse registration order
    pub fn terminate(&mut self) -> Result<(), EcsError> {
        self.systems.terminate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{Component, ComponentStore};

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Health(u32);

    impl Component for Health {}

    #[derive(Default)]
    struct HealthSystem {
        components: ComponentStore<Health>,
    }

    impl System for HealthSystem {
        fn update(&mut self, _systems: &mut Systems, _delta: FrameDelta) {
            self.components.each(|_, health| health.0 += 1);
        }
    }

    impl ComponentOwner for HealthSystem {
        type Component = Health;

        fn store(&self) -> &ComponentStore<Health> {
            &self.components
        }

        fn store_mut(&mut self) -> &mut ComponentStore<Health> {
            &mut self.components
        }
    }

    #[test]
    fn test_world_creation() {
        let world = World::new();
        assert_eq!(world.entity_count(), 0);
        assert!(world.systems().is_empty());
    }

    #[test]
    fn test_entity_creation() {
        let mut world = World::new();
        let entity = world.create_entity();
        assert_eq!(world.entity_count(), 1);
        assert!(world.contains_entity(entity));
    }

    #[test]
    fn test_component_round_trip_through_world() {
        let mut world = World::new();
        world.add_system(HealthSystem::default()).unwrap();

        let entity = world.create_entity();
        world.add_component::<HealthSystem>(entity, Health(10));
        assert_eq!(world.system::<HealthSystem>().component(entity), &Health(10));

        world.initialize().unwrap();
        world.update(0.1, 0.0).unwrap();
        assert_eq!(world.system::<HealthSystem>().component(entity), &Health(11));
    }

    #[test]
    fn test_independent_worlds() {
        let mut a = World::new();
        let mut b = World::new();
        a.create_entity();
        a.create_entity();

        assert_eq!(b.create_entity().raw(), 0);
        assert_eq!(a.entity_count(), 2);
    }
}
