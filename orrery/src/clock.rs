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
//! Frame timing and the simulated clock
//!
//! Every frame carries two deltas. The wall delta is real elapsed seconds,
//! measured by [`FrameTimer`]. The simulated delta is the wall delta scaled by
//! the multiplier currently selected on the [`SimulationClock`] and divided by
//! the length of a day, so at multiplier 1 one simulated unit passes per
//! real-time day.

use crate::config::{ClockConfig, ConfigError};
use crate::ecs::FrameDelta;
use log::{info, warn};
use std::time::{Duration, Instant};

/// Discrete, user-selectable time scale
///
/// # Example
///
/// ```
/// use orrery::clock::SimulationClock;
///
/// let mut clock = SimulationClock::default();
/// assert_eq!(clock.multiplier(), 1);
///
/// clock.faster();
/// clock.faster();
/// assert_eq!(clock.multiplier(), 1_000);
///
/// let delta = clock.step(86.4);
/// assert!((delta.simulated - 1.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationClock {
    multipliers: Vec<u64>,
    index: usize,
    seconds_per_day: f32,
}

impl SimulationClock {
    /// Build a clock from validated settings
    pub fn from_config(config: &ClockConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(SimulationClock {
            multipliers: config.multipliers.clone(),
            index: config.initial_index,
            seconds_per_day: config.seconds_per_day,
        })
    }

    /// Currently selected multiplier
    pub fn multiplier(&self) -> u64 {
        self.multipliers[self.index]
    }

    /// Position in the multiplier table
    pub fn index(&self) -> usize {
        self.index
    }

    /// Wall seconds per simulated unit at multiplier 1
    pub fn seconds_per_day(&self) -> f32 {
        self.seconds_per_day
    }

    /// Select the next larger multiplier
    ///
    /// Returns `false` if already at the fastest setting.
    pub fn faster(&mut self) -> bool {
        if self.index + 1 >= self.multipliers.len() {
            warn!("Simulation speed already at maximum (x{})", self.multiplier());
            return false;
        }
        self.index += 1;
        info!("Simulation speed x{}", self.multiplier());
        true
    }

    /// Select the next smaller multiplier
    ///
    /// Returns `false` if already at the slowest setting.
    pub fn slower(&mut self) -> bool {
        if self.index == 0 {
            warn!("Simulation speed already at minimum (x{})", self.multiplier());
            return false;
        }
        self.index -= 1;
        info!("Simulation speed x{}", self.multiplier());
        true
    }

    /// Pair a wall delta with its simulated delta
    pub fn step(&self, wall_dt: f32) -> FrameDelta {
        let simulated =
            (wall_dt as f64 * self.multiplier() as f64 / self.seconds_per_day as f64) as f32;
        FrameDelta::new(wall_dt, simulated)
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        let config = ClockConfig::default();
        SimulationClock {
            multipliers: config.multipliers,
            index: config.initial_index,
            seconds_per_day: config.seconds_per_day,
        }
    }
}

/// Measures real time between frames
#[derive(Debug, Clone, Copy)]
pub struct FrameTimer {
    startup: Instant,
    frame_start: Instant,
    delta: Duration,
    frame_count: u64,
}

impl FrameTimer {
    /// Start timing now
    pub fn new() -> Self {
        let now = Instant::now();
        FrameTimer {
            startup: now,
            frame_start: now,
            delta: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Close the current frame and return its length in seconds
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        self.delta = now - self.frame_start;
        self.frame_start = now;
        self.frame_count += 1;
        self.delta.as_secs_f32()
    }

    /// Length of the last completed frame
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Time since the timer was created
    pub fn elapsed(&self) -> Duration {
        self.startup.elapsed()
    }

    /// Number of completed frames
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Frames per second based on the last delta
    pub fn fps(&self) -> f32 {
        let secs = self.delta.as_secs_f32();
        if secs > 0.0 {
            1.0 / secs
        } else {
            0.0
        }
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}
