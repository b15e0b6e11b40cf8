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
//! Benchmarks for whole-frame updates
//!
//! Measures the cost of one `World::update` for the solar-system scene and
//! for deep parent chains, where the hierarchy pass dominates.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use glam::Vec3;
use orrery::clock::SimulationClock;
use orrery::ecs::World;
use orrery::render::NamedAssets;
use orrery::scene::{build_solar_system, register_systems};
use orrery::transform::{
    ParentSystem, RotationSystem, Rotation, ScalingSystem, Translation, TranslationSystem,
    WorldMatrix, WorldSystem,
};
use orrery::OrreryConfig;

fn bench_solar_system_frame(c: &mut Criterion) {
    let mut world = World::new();
    let mut assets = NamedAssets::new();
    register_systems(&mut world, &OrreryConfig::default()).unwrap();
    build_solar_system(&mut world, &mut assets).unwrap();
    world.initialize().unwrap();

    let mut clock = SimulationClock::default();
    clock.faster();
    clock.faster();
    let delta = clock.step(1.0 / 60.0);

    c.bench_function("solar_system_frame", |b| {
        b.iter(|| world.update_with(black_box(delta)).unwrap());
    });
}

/// Chains built leaf-first, so the first frame also pays for reordering
fn bench_parent_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("parent_chain");

    for depth in [10, 100, 1000].iter() {
        let mut world = World::new();
        world.add_system(WorldSystem::new()).unwrap();
        world.add_system(ScalingSystem::new()).unwrap();
        world.add_system(RotationSystem::new()).unwrap();
        world.add_system(TranslationSystem::new()).unwrap();
        world.add_system(ParentSystem::new()).unwrap();

        let entities: Vec<_> = (0..*depth).map(|_| world.create_entity()).collect();
        for &entity in &entities {
            world.add_component::<WorldSystem>(entity, WorldMatrix::default());
            world.add_component::<TranslationSystem>(entity, Translation::new(Vec3::X));
            world.add_component::<RotationSystem>(entity, Rotation::from_axis_angle(Vec3::Y, 0.01));
        }
        for pair in entities.windows(2).rev() {
            world.system_mut::<ParentSystem>().attach(pair[1], pair[0]).unwrap();
        }
        world.initialize().unwrap();

        group.throughput(Throughput::Elements(*depth as u64));
        group.bench_function(BenchmarkId::from_parameter(depth), |b| {
            b.iter(|| world.update(black_box(1.0 / 60.0), 0.0).unwrap());
        });
    }

    group.finish();
}

criterion_group!(frame_benches, bench_solar_system_frame, bench_parent_chain);
criterion_main!(frame_benches);
