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
//! Runtime settings
//!
//! Settings are read from TOML. Every field has a default, so a file only
//! needs the values it overrides:
//!
//! ```toml
//! [clock]
//! initial_index = 3
//!
//! [camera]
//! fov = 0.9
//! zoom_speed = 20.0
//!
//! [window]
//! width = 1280
//! height = 720
//! ```
//!
//! [`OrreryConfig::from_env`] loads the file named by the `ORRERY_CONFIG`
//! environment variable and falls back to the defaults when it is unset.

use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_3, PI};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming an optional config file
pub const CONFIG_ENV: &str = "ORRERY_CONFIG";

/// Window size used when the configured one is not positive
pub const FALLBACK_WINDOW_SIZE: (u32, u32) = (1600, 900);

/// Errors raised while loading or validating settings
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for [`OrreryConfig`]
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Simulation clock settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Selectable simulated-time multipliers, slowest first
    pub multipliers: Vec<u64>,
    /// Index into `multipliers` at startup
    pub initial_index: usize,
    /// Wall seconds per simulated time unit at multiplier 1
    pub seconds_per_day: f32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        ClockConfig {
            multipliers: vec![0, 1, 10, 1_000, 10_000, 100_000, 1_000_000, 10_000_000],
            initial_index: 1,
            seconds_per_day: 86_400.0,
        }
    }
}

impl ClockConfig {
    /// Check the table and index
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.multipliers.is_empty() {
            return Err(ConfigError::Invalid(
                "clock.multipliers must not be empty".to_string(),
            ));
        }
        if self.initial_index >= self.multipliers.len() {
            return Err(ConfigError::Invalid(format!(
                "clock.initial_index {} is out of range for {} multipliers",
                self.initial_index,
                self.multipliers.len()
            )));
        }
        if !(self.seconds_per_day.is_finite() && self.seconds_per_day > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "clock.seconds_per_day must be positive, got {}",
                self.seconds_per_day
            )));
        }
        Ok(())
    }
}

/// Camera settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in radians
    pub fov: f32,
    /// Near clip distance
    pub near: f32,
    /// Far clip distance
    pub far: f32,
    /// Distance change per second at full zoom input
    pub zoom_speed: f32,
    /// Radians per second at full horizontal input
    pub horizontal_speed: f32,
    /// Radians per second at full vertical input
    pub vertical_speed: f32,
    /// Distance from the focus at startup
    pub initial_distance: f32,
    /// Elevation applied when the focus changes
    pub focus_vertical_angle: f32,
    /// Axis ramp-up rate per second
    pub axis_force: f32,
    /// Axis decay rate per second
    pub axis_friction: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        CameraConfig {
            fov: FRAC_PI_3,
            near: 0.1,
            far: 1000.0,
            zoom_speed: 10.0,
            horizontal_speed: 2.0,
            vertical_speed: 1.0,
            initial_distance: 100.0,
            focus_vertical_angle: 0.3,
            axis_force: 0.5,
            axis_friction: 3.0,
        }
    }
}

impl CameraConfig {
    /// Check the projection and axis parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fov > 0.0 && self.fov < PI) {
            return Err(ConfigError::Invalid(format!(
                "camera.fov must be in (0, π), got {}",
                self.fov
            )));
        }
        if !(self.near > 0.0 && self.far > self.near) {
            return Err(ConfigError::Invalid(format!(
                "camera clip range must satisfy 0 < near < far, got {}..{}",
                self.near, self.far
            )));
        }
        if self.axis_force < 0.0 || self.axis_friction < 0.0 {
            return Err(ConfigError::Invalid(
                "camera axis force and friction must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Window settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Client width in pixels
    pub width: i64,
    /// Client height in pixels
    pub height: i64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            width: FALLBACK_WINDOW_SIZE.0 as i64,
            height: FALLBACK_WINDOW_SIZE.1 as i64,
        }
    }
}

impl WindowConfig {
    /// Effective size; a non-positive dimension selects the fallback size
    pub fn size(&self) -> (u32, u32) {
        match (u32::try_from(self.width), u32::try_from(self.height)) {
            (Ok(width), Ok(height)) if width > 0 && height > 0 => (width, height),
            _ => FALLBACK_WINDOW_SIZE,
        }
    }
}

/// Top-level settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrreryConfig {
    /// Simulation clock
    pub clock: ClockConfig,
    /// Camera controller
    pub camera: CameraConfig,
    /// Window
    pub window: WindowConfig,
}

impl OrreryConfig {
    /// Parse and validate settings from a TOML string
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: OrreryConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load the file named by `ORRERY_CONFIG`, or the defaults if it is unset
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_value(std::env::var_os(CONFIG_ENV))
    }

    fn from_env_value(value: Option<OsString>) -> Result<Self, ConfigError> {
        match value {
            Some(path) => Self::load(PathBuf::from(path)),
            None => {
                log::debug!("{} not set, using default configuration", CONFIG_ENV);
                Ok(Self::default())
            }
        }
    }

    /// Check every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.clock.validate()?;
        self.camera.validate()
    }
}
