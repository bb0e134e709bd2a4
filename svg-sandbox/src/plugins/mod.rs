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
//! Plugin system
//!
//! Everything that reacts to the world is a named plugin: behaviors modify
//! bodies on world topics, renderers keep drawable views in sync with
//! bodies. Plugins are created by name through a [`PluginRegistry`] and then
//! handed to a [`crate::World`], which initializes and connects them.
//!
//! # Plugin Types
//!
//! ## Behaviors
//!
//! ```rust,ignore
//! use svg_sandbox::events::{Subscriptions, Topic, WorldEvent};
//! use svg_sandbox::plugins::{Behavior, BehaviorContext, Plugin};
//!
//! struct Drag(f64);
//!
//! impl Plugin for Drag {
//!     fn name(&self) -> &str { "drag" }
//!     fn version(&self) -> &str { "1.0.0" }
//!     fn connect(&mut self, subs: &mut Subscriptions) { subs.on(Topic::IntegrateVelocities) }
//!     fn as_any(&self) -> &dyn std::any::Any { self }
//!     fn as_any_mut(&mut self) -> &mut dyn std::any::Any { self }
//! }
//!
//! impl Behavior for Drag {
//!     fn behave(&mut self, _event: &WorldEvent, ctx: &mut BehaviorContext<'_>) {
//!         for body in ctx.bodies_mut().iter_mut() {
//!             body.state.vel *= 1.0 - self.0;
//!         }
//!     }
//! }
//! ```
//!
//! ## Renderers
//!
//! Renderers implement the element primitives (`create_view`, `attach`,
//! `detach`, `draw_body`) and inherit the add/remove/render bookkeeping from
//! [`Renderer`]'s provided methods.
//!
//! # Registration
//!
//! ```rust,ignore
//! let mut registry = PluginRegistry::with_builtins()?;
//! registry.register_behavior("drag", PLUGIN_API_VERSION, |options| {
//!     let k = options.number("k")?.unwrap_or(0.01);
//!     Ok(Box::new(Drag(k)) as Box<dyn Behavior>)
//! })?;
//! ```
//!
//! # Version Compatibility
//!
//! Plugins declare the API version they were built against. Registration
//! and connection reject incompatible versions:
//!
//! - **Major version**: must match
//! - **Minor version**: must match while the major version is 0
//! - **Patch version**: ignored

pub mod api;
pub mod options;
pub mod registry;

pub use api::{Behavior, BehaviorContext, Plugin, Renderer, PLUGIN_API_VERSION};
pub use options::{OptionValue, PluginOptions};
pub use registry::{BehaviorFactory, PluginRegistry, RendererFactory};
