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
//! # SVG Sandbox
//!
//! A mouse-interactive 2D box sandbox: rectangles fall under gravity, collide
//! with each other and with the container edges, can be grabbed and thrown
//! with the pointer, and are drawn as an SVG document.
//!
//! ## Features
//!
//! - **Event-driven world**: bodies live in a [`World`] that publishes
//!   `add:body`, `remove:body` and integration topics to connected plugins
//! - **Named plugins**: behaviors and renderers are created by name through a
//!   [`plugins::PluginRegistry`] with semver API compatibility checks
//! - **Pointer dragging**: the `demo-mouse-events` behavior pins a grabbed
//!   body to the pointer and gives it a clamped throw velocity
//! - **SVG output**: the `svg` renderer keeps one `<rect>` per body and
//!   serializes the surface to markup
//! - **Parallelization**: optional Rayon integration for per-body passes
//!
//! ## Example
//!
//! ```rust
//! use svg_sandbox::{PointerEvent, SandboxConfig, Scene};
//!
//! let mut scene = Scene::new(SandboxConfig::default()).unwrap();
//! scene.click(100.0, 100.0);
//! scene.pointer(&PointerEvent::down(100.0, 100.0));
//! scene.pointer(&PointerEvent::moved(110.0, 100.0));
//! scene.tick(0.0);
//! scene.tick(16.0);
//! assert!(scene.svg_markup().unwrap().contains("<rect"));
//! ```

#![warn(missing_docs)]

/// Vector and bounding box primitives
pub mod math;

/// Bodies and body storage
pub mod body;

/// World topics, events and collision records
pub mod events;

/// Hosting-environment pointer input
pub mod input;

/// Plugin API and registry
pub mod plugins;

/// Built-in behaviors
pub mod behaviors;

/// Renderers and the SVG document model
pub mod render;

/// Velocity and position integration
pub mod integrator;

/// The simulation world
pub mod world;

/// Scene assembly and ticking
pub mod scene;

/// Sandbox configuration
pub mod config;

/// Error types
pub mod error;

pub use body::{Body, BodyHandle, BodySet};
pub use config::SandboxConfig;
pub use error::SandboxError;
pub use input::{ElementOffset, PointerEvent, PointerKind};
pub use math::{Aabb, Vector2};
pub use scene::{ClickOutcome, Scene, Ticker};
pub use world::{StepReport, World};
