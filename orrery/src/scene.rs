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
//! The solar-system scene
//!
//! [`register_systems`] installs every system in frame order:
//!
//! ```text
//! Input -> Orbit -> RotationalAxis -> World -> Scaling -> Rotation
//!       -> Translation -> Parent -> Camera -> RenderQueue
//! ```
//!
//! [`build_solar_system`] then populates the world. Each planet is a small
//! hierarchy:
//!
//! ```text
//! sun point
//! └── orbit           rotation
//!     ├── orbit point translation (Orbit), axial tilt
//!     │   ├── planet  scale, spin (RotationalAxis), camera target
//!     │   │   └── atmosphere (optional)
//!     │   └── moon / rings (optional)
//!     └── orbit line  spins with the orbit so its phase matches
//! ```

use crate::camera::{CameraSystem, CameraTarget};
use crate::config::OrreryConfig;
use crate::ecs::{EcsError, Entity, World};
use crate::input::InputSystem;
use crate::kinematics::{Orbit, OrbitSystem, RotationalAxis, RotationalAxisSystem};
use crate::render::{AssetSource, BlendMode, Material, Mesh, RenderQueueSystem, Renderable, ResourceHandle};
use crate::transform::{
    ParentSystem, Rotation, RotationSystem, Scaling, ScalingSystem, Translation,
    TranslationSystem, WorldMatrix, WorldSystem,
};
use log::info;

/// Optional atmosphere shell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Atmosphere {
    /// Surface radius in kilometres
    pub planet_radius: f32,
    /// Shell height in kilometres
    pub height: f32,
}

impl Atmosphere {
    /// Scale of the shell relative to the planet
    pub fn scale(&self) -> f32 {
        (self.planet_radius + self.height) / self.planet_radius
    }
}

/// One row of the planet table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanetDesc {
    /// Display name, also used for asset names
    pub name: &'static str,
    /// Distance from the sun
    pub orbit_radius: f32,
    /// Days per orbit
    pub orbit_period: f32,
    /// Body radius
    pub radius: f32,
    /// Days per spin
    pub day_period: f32,
    /// Axial tilt in degrees
    pub axial_tilt: f32,
    /// Starting orbit phase as a fraction of a revolution
    pub phase: f32,
    /// Atmosphere shell, if any
    pub atmosphere: Option<Atmosphere>,
}

const fn planet(
    name: &'static str,
    orbit_radius: f32,
    orbit_period: f32,
    radius: f32,
    day_period: f32,
    axial_tilt: f32,
    phase: f32,
) -> PlanetDesc {
    PlanetDesc {
        name,
        orbit_radius,
        orbit_period,
        radius,
        day_period,
        axial_tilt,
        phase,
        atmosphere: None,
    }
}

const fn with_atmosphere(desc: PlanetDesc, planet_radius: f32, height: f32) -> PlanetDesc {
    PlanetDesc {
        atmosphere: Some(Atmosphere {
            planet_radius,
            height,
        }),
        ..desc
    }
}

/// The planets, innermost first
pub const PLANETS: [PlanetDesc; 8] = [
    planet("mercury", 60.0, 88.0, 0.7, 58.0, 2.0, 0.56),
    planet("venus", 75.0, 225.0, 1.0, 116.0, 177.0, 0.87),
    with_atmosphere(planet("earth", 100.0, 365.0, 1.0, 1.0, 23.5, 0.23), 6360.0, 100.0),
    with_atmosphere(planet("mars", 115.0, 687.0, 0.75, 1.1, 25.0, 0.76), 6360.0, 50.0),
    planet("jupiter", 200.0, 4330.0, 6.0, 0.4, 3.0, 0.2),
    planet("saturn", 300.0, 10800.0, 5.0, 0.41, 26.0, 0.8),
    planet("uranus", 340.0, 30600.0, 2.0, 0.8, 97.0, 0.3),
    planet("neptune", 375.0, 65000.0, 2.0, 0.75, 29.0, 0.5),
];

/// Sun radius
pub const SUN_RADIUS: f32 = 10.0;

/// Sun spin period in days; negative spins like the planets
pub const SUN_DAY_PERIOD: f32 = -25.0;

/// Handles to the notable entities of a built scene
#[derive(Debug, Clone, PartialEq)]
pub struct SolarSystemScene {
    /// The sun body
    pub sun: Entity,
    /// Root of the hierarchy, at the origin
    pub sun_point: Entity,
    /// Planet bodies, in [`PLANETS`] order
    pub planets: Vec<(&'static str, Entity)>,
    /// The moon body
    pub moon: Entity,
    /// Saturn's rings
    pub rings: Entity,
}

impl SolarSystemScene {
    /// Body entity of the planet called `name`
    pub fn planet(&self, name: &str) -> Option<Entity> {
        self.planets
            .iter()
            .find(|(planet, _)| *planet == name)
            .map(|&(_, entity)| entity)
    }
}

/// Register every system of the runtime in frame order
pub fn register_systems(world: &mut World, config: &OrreryConfig) -> Result<(), EcsError> {
    world.add_system(InputSystem::from_config(&config.window))?;
    world.add_system(OrbitSystem::new())?;
    world.add_system(RotationalAxisSystem::new())?;
    world.add_system(WorldSystem::new())?;
    world.add_system(ScalingSystem::new())?;
    world.add_system(RotationSystem::new())?;
    world.add_system(TranslationSystem::new())?;
    world.add_system(ParentSystem::new())?;
    world.add_system(CameraSystem::new(config.camera.clone()))?;
    world.add_system(RenderQueueSystem::new())?;
    Ok(())
}

/// Populate a world prepared by [`register_systems`]
///
/// # Errors
///
/// Fails only if the hierarchy could not be attached, which would mean the
/// world already held conflicting parent links.
pub fn build_solar_system<A>(world: &mut World, assets: &mut A) -> Result<SolarSystemScene, EcsError>
where
    A: AssetSource + ?Sized,
{
    let sphere = assets.mesh("sphere");
    let unlit = assets.material("unlit");
    let mut builder = SceneBuilder {
        world,
        assets,
        sphere,
        unlit,
    };

    let (sun_point, sun) = builder.sun()?;

    // Satellites are spawned right after their planet
    let mut planets = Vec::with_capacity(PLANETS.len());
    let mut moon = None;
    let mut rings = None;
    for desc in &PLANETS {
        let (orbit_point, body) = builder.planet(sun_point, desc)?;
        planets.push((desc.name, body));
        match desc.name {
            "earth" => moon = Some(builder.moon(orbit_point)?),
            "saturn" => rings = Some(builder.rings(orbit_point)?),
            _ => {}
        }
    }

    let moon = match moon {
        Some(moon) => moon,
        None => builder.moon(sun_point)?,
    };
    let rings = match rings {
        Some(rings) => rings,
        None => builder.rings(sun_point)?,
    };

    info!(
        "Built solar system: {} entities, {} planets",
        builder.world.entity_count(),
        planets.len()
    );

    Ok(SolarSystemScene {
        sun,
        sun_point,
        planets,
        moon,
        rings,
    })
}

struct SceneBuilder<'a, A: AssetSource + ?Sized> {
    world: &'a mut World,
    assets: &'a mut A,
    sphere: ResourceHandle<Mesh>,
    unlit: ResourceHandle<Material>,
}

impl<A: AssetSource + ?Sized> SceneBuilder<'_, A> {
    /// New entity with a world matrix
    fn spawn(&mut self) -> Entity {
        let entity = self.world.create_entity();
        self.world
            .add_component::<WorldSystem>(entity, WorldMatrix::default());
        entity
    }

    fn attach(&mut self, child: Entity, parent: Entity) -> Result<(), EcsError> {
        self.world
            .system_mut::<ParentSystem>()
            .attach(child, parent)
            .map(|_| ())
    }

    fn render(&mut self, entity: Entity, renderable: Renderable) {
        self.world
            .system_mut::<RenderQueueSystem>()
            .add_component(entity, renderable);
    }

    fn sun(&mut self) -> Result<(Entity, Entity), EcsError> {
        let material = self.assets.material("sun");

        let sun_point = self.spawn();

        let sun = self.spawn();
        self.world
            .add_component::<ScalingSystem>(sun, Scaling::uniform(SUN_RADIUS));
        self.world
            .add_component::<RotationSystem>(sun, Rotation::default());
        self.world
            .add_component::<RotationalAxisSystem>(sun, RotationalAxis::new(SUN_DAY_PERIOD));
        self.world
            .add_component::<CameraSystem>(sun, CameraTarget::new(300.0, 500.0));
        self.attach(sun, sun_point)?;
        self.render(sun, Renderable::new(self.sphere, material));

        Ok((sun_point, sun))
    }

    fn planet(&mut self, parent: Entity, desc: &PlanetDesc) -> Result<(Entity, Entity), EcsError> {
        let material = self.assets.material(desc.name);
        let circle = self.assets.mesh(&format!("{}_orbit", desc.name));
        let start = desc.phase * desc.orbit_period;

        let orbit = self.spawn();
        self.world
            .add_component::<RotationSystem>(orbit, Rotation::default());
        self.attach(orbit, parent)?;

        let orbit_point = self.spawn();
        self.world
            .add_component::<TranslationSystem>(orbit_point, Translation::default());
        self.world
            .add_component::<RotationSystem>(orbit_point, Rotation::tilt_degrees(desc.axial_tilt));
        self.world.add_component::<OrbitSystem>(
            orbit_point,
            Orbit::new(desc.orbit_radius, -desc.orbit_period).with_time(start),
        );
        self.attach(orbit_point, orbit)?;

        let body = self.spawn();
        self.world
            .add_component::<TranslationSystem>(body, Translation::default());
        self.world
            .add_component::<ScalingSystem>(body, Scaling::uniform(desc.radius));
        self.world
            .add_component::<RotationSystem>(body, Rotation::default());
        self.world
            .add_component::<RotationalAxisSystem>(body, RotationalAxis::new(-desc.day_period));
        self.world.add_component::<CameraSystem>(
            body,
            CameraTarget::new(desc.radius * 3.0, desc.radius * 5.0),
        );
        self.attach(body, orbit_point)?;
        self.render(body, Renderable::new(self.sphere, material));

        let line = self.spawn();
        self.world
            .add_component::<RotationSystem>(line, Rotation::default());
        self.world.add_component::<RotationalAxisSystem>(
            line,
            RotationalAxis::new(-desc.orbit_period).with_time(start),
        );
        self.attach(line, orbit)?;
        self.render(
            line,
            Renderable::with_blend(circle, self.unlit, BlendMode::Alpha),
        );

        if let Some(atmosphere) = desc.atmosphere {
            let shell_material = self.assets.material(&format!("{}_atmosphere", desc.name));
            let shell = self.spawn();
            self.world
                .add_component::<ScalingSystem>(shell, Scaling::uniform(atmosphere.scale()));
            self.attach(shell, body)?;
            self.render(
                shell,
                Renderable::with_blend(self.sphere, shell_material, BlendMode::Add),
            );
        }

        Ok((orbit_point, body))
    }

    fn moon(&mut self, parent: Entity) -> Result<Entity, EcsError> {
        let material = self.assets.material("moon");

        let orbit = self.spawn();
        self.world
            .add_component::<RotationSystem>(orbit, Rotation::tilt_degrees(-30.0));
        self.attach(orbit, parent)?;

        let orbit_point = self.spawn();
        self.world
            .add_component::<TranslationSystem>(orbit_point, Translation::default());
        self.world
            .add_component::<RotationSystem>(orbit_point, Rotation::tilt_degrees(6.0));
        self.world
            .add_component::<OrbitSystem>(orbit_point, Orbit::new(3.0, -27.0));
        self.attach(orbit_point, orbit)?;

        let moon = self.spawn();
        self.world
            .add_component::<TranslationSystem>(moon, Translation::default());
        self.world
            .add_component::<ScalingSystem>(moon, Scaling::uniform(0.1));
        self.world
            .add_component::<RotationSystem>(moon, Rotation::default());
        self.world
            .add_component::<RotationalAxisSystem>(moon, RotationalAxis::new(-27.0));
        self.attach(moon, orbit_point)?;
        self.render(moon, Renderable::new(self.sphere, material));

        Ok(moon)
    }

    fn rings(&mut self, parent: Entity) -> Result<Entity, EcsError> {
        let mesh = self.assets.mesh("ring");
        let material = self.assets.material("saturn_rings");

        let rings = self.spawn();
        self.world
            .add_component::<ScalingSystem>(rings, Scaling::uniform(5.0));
        self.world
            .add_component::<RotationSystem>(rings, Rotation::default());
        self.world
            .add_component::<RotationalAxisSystem>(rings, RotationalAxis::new(-0.35));
        self.attach(rings, parent)?;
        self.render(rings, Renderable::with_blend(mesh, material, BlendMode::Alpha));

        Ok(rings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_order() {
        let mut world = World::new();
        register_systems(&mut world, &OrreryConfig::default()).unwrap();

        let names: Vec<&str> = world
            .systems()
            .names()
            .map(|name| name.rsplit("::").next().unwrap_or(name))
            .collect();
        assert_eq!(names[0], "InputSystem");
        assert_eq!(names[1], "OrbitSystem");
        assert_eq!(names[3], "WorldSystem");
        assert_eq!(names[7], "ParentSystem");
        assert_eq!(names[9], "RenderQueueSystem");
        assert_eq!(world.systems().len(), 10);
    }

    #[test]
    fn test_atmosphere_scale() {
        let earth = PLANETS[2];
        assert_eq!(earth.name, "earth");
        let scale = earth.atmosphere.map(|a| a.scale()).unwrap();
        assert!((scale - 6460.0 / 6360.0).abs() < 1e-6);
    }

    #[test]
    fn test_satellites_follow_their_planet() {
        let mut world = World::new();
        register_systems(&mut world, &OrreryConfig::default()).unwrap();
        let mut assets = crate::render::NamedAssets::default();
        let scene = build_solar_system(&mut world, &mut assets).unwrap();

        let body = |name: &str| scene.planet(name).unwrap();
        assert!(body("earth") < scene.moon && scene.moon < body("mars"));
        assert!(body("saturn") < scene.rings && scene.rings < body("uranus"));
        assert_eq!(world.entity_count(), 40);
    }

    #[test]
    fn test_planet_table_sorted_by_distance() {
        assert!(PLANETS
            .windows(2)
            .all(|pair| pair[0].orbit_radius < pair[1].orbit_radius));
    }
}
