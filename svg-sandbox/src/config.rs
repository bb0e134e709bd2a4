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
//! Sandbox configuration
//!
//! Units are pixels and milliseconds, with y growing downwards.

use crate::error::{Result, SandboxError};
use crate::input::ElementOffset;
use crate::math::Vector2;

/// Default container width, px
pub const DEFAULT_WIDTH: f64 = 800.0;

/// Default container height, px
pub const DEFAULT_HEIGHT: f64 = 400.0;

/// Default gravity, px/ms²
pub const DEFAULT_GRAVITY: Vector2 = Vector2::new(0.0, 0.0004);

/// Restitution of the container walls in the sandbox scene
pub const DEFAULT_EDGE_RESTITUTION: f64 = 0.0;

/// Side length of spawned bodies, px
pub const DEFAULT_BODY_SIZE: f64 = 40.0;

/// Style color of spawned bodies
pub const DEFAULT_SPAWN_COLOR: &str = "#FF0000";

/// Fill color of body views
pub const DEFAULT_VIEW_FILL: &str = "#87ceeb";

/// Pointer delta divisor for drag velocity
pub const DEFAULT_DRAG_VELOCITY_DIVISOR: f64 = 30.0;

/// Per-axis drag speed limit, px/ms
pub const DEFAULT_DRAG_MAX_SPEED: f64 = 1.0;

/// Iteration timestep, ms
pub const DEFAULT_TIMESTEP: f64 = 6.0;

/// Iteration limit per frame
pub const DEFAULT_MAX_IPF: u32 = 4;

/// Environment variable overriding the container width
pub const ENV_WIDTH: &str = "SVG_SANDBOX_WIDTH";

/// Environment variable overriding the container height
pub const ENV_HEIGHT: &str = "SVG_SANDBOX_HEIGHT";

/// Environment variable overriding the timestep
pub const ENV_TIMESTEP: &str = "SVG_SANDBOX_TIMESTEP_MS";

/// Settings for a [`crate::Scene`]
///
/// # Example
///
/// ```
/// use svg_sandbox::SandboxConfig;
///
/// let config = SandboxConfig::default().with_size(640.0, 480.0);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.timestep, 6.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SandboxConfig {
    /// Container width, px
    pub width: f64,
    /// Container height, px
    pub height: f64,
    /// Acceleration applied to free bodies, px/ms²
    pub gravity: Vector2,
    /// Restitution of the container walls
    pub edge_restitution: f64,
    /// Side length of spawned bodies, px
    pub body_size: f64,
    /// Style color of spawned bodies
    pub spawn_color: String,
    /// Fill color of body views
    pub view_fill: String,
    /// Pointer delta divisor for drag velocity
    pub drag_velocity_divisor: f64,
    /// Per-axis drag speed limit, px/ms
    pub drag_max_speed: f64,
    /// Iteration timestep, ms
    pub timestep: f64,
    /// Iteration limit per frame
    pub max_ipf: u32,
    /// Page position of the container
    pub element_offset: ElementOffset,
    /// Draw frame statistics onto the SVG root
    pub show_meta: bool,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        SandboxConfig {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            gravity: DEFAULT_GRAVITY,
            edge_restitution: DEFAULT_EDGE_RESTITUTION,
            body_size: DEFAULT_BODY_SIZE,
            spawn_color: DEFAULT_SPAWN_COLOR.to_string(),
            view_fill: DEFAULT_VIEW_FILL.to_string(),
            drag_velocity_divisor: DEFAULT_DRAG_VELOCITY_DIVISOR,
            drag_max_speed: DEFAULT_DRAG_MAX_SPEED,
            timestep: DEFAULT_TIMESTEP,
            max_ipf: DEFAULT_MAX_IPF,
            element_offset: ElementOffset::default(),
            show_meta: false,
        }
    }
}

impl SandboxConfig {
    /// Set the container size
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the gravity
    pub fn with_gravity(mut self, gravity: Vector2) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set the container page position
    pub fn with_element_offset(mut self, offset: ElementOffset) -> Self {
        self.element_offset = offset;
        self
    }

    /// Set the timestep and iteration limit
    pub fn with_timestep(mut self, timestep: f64, max_ipf: u32) -> Self {
        self.timestep = timestep;
        self.max_ipf = max_ipf;
        self
    }

    /// Set the drag velocity divisor and speed limit
    pub fn with_drag(mut self, velocity_divisor: f64, max_speed: f64) -> Self {
        self.drag_velocity_divisor = velocity_divisor;
        self.drag_max_speed = max_speed;
        self
    }

    /// Toggle frame statistics
    pub fn with_meta(mut self, show_meta: bool) -> Self {
        self.show_meta = show_meta;
        self
    }

    /// Set the wall restitution
    pub fn with_edge_restitution(mut self, restitution: f64) -> Self {
        self.edge_restitution = restitution;
        self
    }

    /// Check that every value is usable
    ///
    /// # Errors
    ///
    /// [`SandboxError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("width", self.width),
            ("height", self.height),
            ("body_size", self.body_size),
            ("drag_velocity_divisor", self.drag_velocity_divisor),
            ("timestep", self.timestep),
        ];
        for (field, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(invalid(format!("{} must be positive, got {}", field, value)));
            }
        }
        if !(self.drag_max_speed >= 0.0 && self.drag_max_speed.is_finite()) {
            return Err(invalid(format!(
                "drag_max_speed must be non-negative, got {}",
                self.drag_max_speed
            )));
        }
        if !(0.0..=1.0).contains(&self.edge_restitution) {
            return Err(invalid(format!(
                "edge_restitution must lie in [0, 1], got {}",
                self.edge_restitution
            )));
        }
        if !self.gravity.is_finite() {
            return Err(invalid("gravity must be finite".to_string()));
        }
        if self.max_ipf == 0 {
            return Err(invalid("max_ipf must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Defaults overlaid with the process environment
    ///
    /// Reads [`ENV_WIDTH`], [`ENV_HEIGHT`] and [`ENV_TIMESTEP`]; unset
    /// variables keep the default.
    ///
    /// # Errors
    ///
    /// [`SandboxError::InvalidConfig`] if a variable does not parse as a number.
    pub fn from_env() -> Result<Self> {
        Self::default().overlay(|key| std::env::var(key).ok())
    }

    /// Overlay values from an arbitrary key lookup, using the same keys as
    /// [`SandboxConfig::from_env`]
    pub fn overlay<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| -> Result<Option<f64>> {
            match lookup(key) {
                None => Ok(None),
                Some(raw) => raw
                    .trim()
                    .parse::<f64>()
                    .map(Some)
                    .map_err(|e| invalid(format!("{}={:?}: {}", key, raw, e))),
            }
        };

        if let Some(width) = read(ENV_WIDTH)? {
            self.width = width;
        }
        if let Some(height) = read(ENV_HEIGHT)? {
            self.height = height;
        }
        if let Some(timestep) = read(ENV_TIMESTEP)? {
            self.timestep = timestep;
        }
        Ok(self)
    }
}

fn invalid(message: String) -> SandboxError {
    SandboxError::InvalidConfig(message)
}
