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
//! The full solar-system scene

use orrery::camera::CameraSystem;
use orrery::clock::SimulationClock;
use orrery::ecs::{ComponentOwner, World};
use orrery::render::{BlendMode, NamedAssets, RenderQueueSystem};
use orrery::scene::{build_solar_system, register_systems, SolarSystemScene, PLANETS};
use orrery::transform::{ParentSystem, WorldSystem};
use orrery::OrreryConfig;

fn solar_system() -> (World, SolarSystemScene, NamedAssets) {
    let mut world = World::new();
    let mut assets = NamedAssets::new();
    register_systems(&mut world, &OrreryConfig::default()).unwrap();
    let scene = build_solar_system(&mut world, &mut assets).unwrap();
    world.initialize().unwrap();
    (world, scene, assets)
}

#[test]
fn test_scene_shape() {
    let (world, scene, assets) = solar_system();

    assert_eq!(world.entity_count(), 40);
    assert_eq!(scene.planets.len(), PLANETS.len());
    assert_eq!(world.system::<CameraSystem>().store().len(), 9);
    assert_eq!(world.system::<ParentSystem>().len(), 39);
    assert_eq!(world.system::<ParentSystem>().parent_of(scene.sun), Some(scene.sun_point));
    assert_eq!(world.system::<ParentSystem>().parent_of(scene.sun_point), None);
    assert_eq!(assets.mesh_count(), 2 + PLANETS.len());
}

#[test]
fn test_draw_list_partitioned() {
    let (mut world, _scene, _assets) = solar_system();
    world.update(0.016, 0.0).unwrap();

    let queue = world.system::<RenderQueueSystem>();
    assert_eq!(queue.draw_list().len(), 21);
    assert_eq!(queue.draws(BlendMode::Replace).len(), 10);
    assert_eq!(queue.draws(BlendMode::Add).len(), 2);
    assert_eq!(queue.draws(BlendMode::Alpha).len(), 9);

    let blends: Vec<BlendMode> = queue.draw_list().iter().map(|draw| draw.blend).collect();
    let mut sorted = blends.clone();
    sorted.sort();
    assert_eq!(blends, sorted);
}

#[test]
fn test_bodies_stay_on_their_orbits() {
    let (mut world, scene, _assets) = solar_system();
    let mut clock = SimulationClock::default();
    clock.faster();
    clock.faster();
    clock.faster();

    for _ in 0..100 {
        world.update_with(clock.step(0.016)).unwrap();
    }

    let worlds = world.system::<WorldSystem>();
    assert!(worlds.translation(scene.sun).length() < 1e-4);

    for desc in &PLANETS {
        let body = scene.planet(desc.name).unwrap();
        let distance = worlds.translation(body).length();
        assert!(
            (distance - desc.orbit_radius).abs() < 1e-2,
            "{} at {} instead of {}",
            desc.name,
            distance,
            desc.orbit_radius
        );
    }

    let earth = scene.planet("earth").unwrap();
    let moon_offset = worlds.translation(scene.moon) - worlds.translation(earth);
    assert!((moon_offset.length() - 3.0).abs() < 1e-3);
}

#[test]
fn test_camera_starts_on_sun() {
    let (mut world, scene, _assets) = solar_system();
    world.update(0.016, 0.0).unwrap();

    let camera = world.system::<CameraSystem>();
    assert_eq!(camera.focus(), Some(scene.sun));
    assert!(camera.distance() > 100.0);
}

#[test]
fn test_terminate_after_frames() {
    let (mut world, _scene, _assets) = solar_system();
    for _ in 0..3 {
        world.update(0.016, 0.1).unwrap();
    }
    world.terminate().unwrap();
    assert!(world.update(0.016, 0.1).is_err());
}
