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
//! System registry lifecycle through the public API

use orrery::ecs::{
    ComponentOwner, EcsError, Entity, FrameDelta, System, Systems, World,
};
use orrery::kinematics::{Orbit, OrbitSystem, RotationalAxis, RotationalAxisSystem};
use orrery::transform::{
    Rotation, RotationSystem, Scaling, ScalingSystem, Translation, TranslationSystem,
    WorldMatrix, WorldSystem,
};
use std::cell::RefCell;
use std::rc::Rc;

type Journal = Rc<RefCell<Vec<String>>>;

struct Recorder<const ID: usize> {
    journal: Journal,
}

impl<const ID: usize> System for Recorder<ID> {
    fn initialize(&mut self, _systems: &mut Systems) {
        self.journal.borrow_mut().push(format!("init {}", ID));
    }

    fn update(&mut self, _systems: &mut Systems, _delta: FrameDelta) {
        self.journal.borrow_mut().push(format!("update {}", ID));
    }

    fn terminate(&mut self, _systems: &mut Systems) {
        self.journal.borrow_mut().push(format!("terminate {}", ID));
    }
}

fn recorded_world(journal: &Journal) -> World {
    let mut world = World::new();
    world.add_system(Recorder::<0> { journal: journal.clone() }).unwrap();
    world.add_system(Recorder::<1> { journal: journal.clone() }).unwrap();
    world.add_system(Recorder::<2> { journal: journal.clone() }).unwrap();
    world
}

#[test]
fn test_full_lifecycle_order() {
    let journal = Journal::default();
    let mut world = recorded_world(&journal);

    world.initialize().unwrap();
    world.update(0.1, 0.1).unwrap();
    world.terminate().unwrap();
    world.terminate().unwrap();

    assert_eq!(
        *journal.borrow(),
        vec![
            "init 0",
            "init 1",
            "init 2",
            "update 0",
            "update 1",
            "update 2",
            "terminate 2",
            "terminate 1",
            "terminate 0",
        ]
    );
}

#[test]
fn test_indices_follow_registration() {
    let journal = Journal::default();
    let world = recorded_world(&journal);
    let systems = world.systems();

    assert_eq!(systems.index_of::<Recorder<0>>().map(|i| i.value()), Some(0));
    assert_eq!(systems.index_of::<Recorder<2>>().map(|i| i.value()), Some(2));
    assert_eq!(systems.index_of::<WorldSystem>(), None);

    // Lookups never move a system
    assert_eq!(systems.index_of::<Recorder<2>>().map(|i| i.value()), Some(2));
}

#[test]
fn test_registration_errors() {
    let journal = Journal::default();
    let mut world = recorded_world(&journal);

    let duplicate = world.add_system(Recorder::<1> { journal: journal.clone() });
    assert!(matches!(duplicate, Err(EcsError::DuplicateSystem(_))));

    world.initialize().unwrap();
    assert_eq!(world.initialize(), Err(EcsError::AlreadyInitialized));

    let late = world.add_system(WorldSystem::new());
    assert!(matches!(late, Err(EcsError::RegistrationClosed(_))));
}

#[test]
fn test_update_outside_running_state() {
    let journal = Journal::default();
    let mut world = recorded_world(&journal);

    assert_eq!(world.update(0.1, 0.1), Err(EcsError::NotInitialized));

    world.initialize().unwrap();
    world.terminate().unwrap();
    assert_eq!(world.update(0.1, 0.1), Err(EcsError::NotInitialized));
    assert!(!world.systems().is_initialized());
}

#[test]
fn test_every_store_rejects_duplicates() {
    let mut world = World::new();
    world.add_system(WorldSystem::new()).unwrap();
    world.add_system(ScalingSystem::new()).unwrap();
    world.add_system(RotationSystem::new()).unwrap();
    world.add_system(TranslationSystem::new()).unwrap();
    world.add_system(OrbitSystem::new()).unwrap();
    world.add_system(RotationalAxisSystem::new()).unwrap();

    let entity: Entity = world.create_entity();
    world.add_component::<WorldSystem>(entity, WorldMatrix::default());
    world.add_component::<ScalingSystem>(entity, Scaling::default());
    world.add_component::<RotationSystem>(entity, Rotation::default());
    world.add_component::<TranslationSystem>(entity, Translation::default());
    world.add_component::<OrbitSystem>(entity, Orbit::new(1.0, 1.0));
    world.add_component::<RotationalAxisSystem>(entity, RotationalAxis::new(1.0));

    let duplicate = |result: Result<_, EcsError>| {
        matches!(result, Err(EcsError::DuplicateComponent { entity: e, .. }) if e == entity)
    };

    assert!(duplicate(
        world.system_mut::<WorldSystem>().store_mut().try_insert(entity, WorldMatrix::default()).map(|_| ())
    ));
    assert!(duplicate(
        world.system_mut::<ScalingSystem>().store_mut().try_insert(entity, Scaling::default()).map(|_| ())
    ));
    assert!(duplicate(
        world.system_mut::<RotationSystem>().store_mut().try_insert(entity, Rotation::default()).map(|_| ())
    ));
    assert!(duplicate(
        world.system_mut::<TranslationSystem>().store_mut().try_insert(entity, Translation::default()).map(|_| ())
    ));
    assert!(duplicate(
        world.system_mut::<OrbitSystem>().store_mut().try_insert(entity, Orbit::new(2.0, 2.0)).map(|_| ())
    ));
    assert!(duplicate(
        world.system_mut::<RotationalAxisSystem>().store_mut().try_insert(entity, RotationalAxis::new(2.0)).map(|_| ())
    ));
}

#[test]
#[should_panic(expected = "is not registered")]
fn test_lookup_unregistered_system() {
    let world = World::new();
    world.system::<WorldSystem>();
}
