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
//! Orbital and rotational kinematics
//!
//! Both systems keep a phase accumulator `t` in simulated time units and map
//! it to an angle `2π·t/period`. The accumulator grows without bound; there is
//! no wraparound, so precision slowly degrades over very long runs.
//!
//! The systems write local [`Translation`](crate::transform::Translation) and
//! [`Rotation`](crate::transform::Rotation) components, so they must be
//! registered before the transform pipeline to take effect the same frame.

mod axis;
mod orbit;

pub use axis::{RotationalAxis, RotationalAxisSystem};
pub use orbit::{Orbit, OrbitSystem};

use std::f32::consts::TAU;

/// Angle reached after `t` time units on a cycle of length `period`
pub fn phase_angle(t: f32, period: f32) -> f32 {
    t * TAU / period
}

fn assert_period(period: f32) {
    assert!(
        period.is_finite() && period != 0.0,
        "Period must be finite and non-zero"
    );
}
