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
//! Headless solar-system run
//!
//! Builds the full scene, then drives the frame loop with a scripted key
//! sequence in place of a window: it speeds the clock up, cycles the camera
//! focus through every body, and prints where each planet ends up.
//!
//! # Running
//!
//! ```bash
//! # Default settings, 600 frames at 60 Hz
//! cargo run --example solar_system --release
//!
//! # Start four speed steps faster, with logging
//! RUST_LOG=debug cargo run --example solar_system -- --speed-steps 4
//!
//! # Load settings from a file and measure real frame times
//! ORRERY_CONFIG=orrery.toml cargo run --example solar_system -- --realtime
//!
//! # Quit early through the Escape key
//! cargo run --example solar_system -- --quit-at 120
//! ```

use clap::Parser;
use orrery::camera::CameraSystem;
use orrery::clock::{FrameTimer, SimulationClock};
use orrery::ecs::World;
use orrery::input::{InputSystem, Key};
use orrery::render::{BlendMode, NamedAssets, RenderQueueSystem};
use orrery::scene::{build_solar_system, register_systems};
use orrery::transform::WorldSystem;
use orrery::OrreryConfig;
use std::error::Error;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(author, version, about = "Headless solar-system runner")]
struct Cli {
    /// Window width; non-positive selects the default size
    width: Option<i64>,

    /// Window height; non-positive selects the default size
    height: Option<i64>,

    /// Number of frames to run
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// Speed steps to apply before the first frame
    #[arg(long, default_value_t = 0)]
    speed_steps: usize,

    /// Settings file; overrides ORRERY_CONFIG
    #[arg(long)]
    config: Option<PathBuf>,

    /// Measure wall time instead of using a fixed 60 Hz step
    #[arg(long)]
    realtime: bool,

    /// Frame at which the script presses Escape to quit
    #[arg(long)]
    quit_at: Option<u64>,
}

/// Frames between scripted focus changes
const FOCUS_INTERVAL: u64 = 60;

/// Frame at which the script taps the speed-up key once
const SPEED_UP_FRAME: u64 = 30;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => OrreryConfig::load(path)?,
        None => OrreryConfig::from_env()?,
    };
    if let (Some(width), Some(height)) = (cli.width, cli.height) {
        config.window.width = width;
        config.window.height = height;
    }

    let mut world = World::new();
    let mut assets = NamedAssets::new();
    register_systems(&mut world, &config)?;
    let scene = build_solar_system(&mut world, &mut assets)?;

    // Speed controls belong to the driver, not to any system
    {
        let input = world.system_mut::<InputSystem>();
        input.track_key(Key::Z);
        input.track_key(Key::X);
        input.track_key(Key::Escape);
    }
    world.initialize()?;

    let mut clock = SimulationClock::from_config(&config.clock)?;
    for _ in 0..cli.speed_steps {
        clock.faster();
    }

    let mut timer = FrameTimer::new();
    let mut wall_dt = 0.0;
    let mut frames_run = 0;

    for frame in 0..cli.frames {
        {
            let input = world.system_mut::<InputSystem>();
            if frame % FOCUS_INTERVAL == 0 && frame > 0 {
                input.press(Key::E);
            } else if frame % FOCUS_INTERVAL == 1 {
                input.release(Key::E);
            }
            match frame {
                SPEED_UP_FRAME => input.press(Key::X),
                f if f == SPEED_UP_FRAME + 1 => input.release(Key::X),
                _ => {}
            }
            if cli.quit_at == Some(frame) {
                input.press(Key::Escape);
            }
            if !input.is_open() {
                break;
            }
        }

        let delta = clock.step(wall_dt);
        world.update_with(delta)?;
        frames_run += 1;

        {
            let input = world.system_mut::<InputSystem>();
            if input.key_down(Key::X) {
                clock.faster();
            }
            if input.key_down(Key::Z) {
                clock.slower();
            }
            if input.key_down(Key::Escape) {
                log::info!("Escape pressed, closing after frame {}", frame);
                input.close();
            }
        }

        wall_dt = if cli.realtime { timer.tick() } else { 1.0 / 60.0 };

        if frame % FOCUS_INTERVAL == 0 {
            let camera = world.system::<CameraSystem>();
            if let Some(focus) = camera.focus() {
                println!(
                    "frame {:>5}: focus {} at distance {:.2}",
                    frame,
                    focus,
                    camera.distance()
                );
            }
        }
    }

    let worlds = world.system::<WorldSystem>();
    println!();
    println!("{:<10} {:>10} {:>10} {:>10}", "body", "x", "y", "z");
    for (name, body) in &scene.planets {
        let position = worlds.translation(*body);
        println!(
            "{:<10} {:>10.3} {:>10.3} {:>10.3}",
            name, position.x, position.y, position.z
        );
    }

    let queue = world.system::<RenderQueueSystem>();
    println!();
    println!(
        "draw list: {} opaque, {} additive, {} alpha",
        queue.draws(BlendMode::Replace).len(),
        queue.draws(BlendMode::Add).len(),
        queue.draws(BlendMode::Alpha).len()
    );
    println!(
        "speed x{} after {} frames",
        clock.multiplier(),
        frames_run
    );

    world.terminate()?;
    Ok(())
}
