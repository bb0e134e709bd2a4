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
//! Plugin API traits and dispatch context
//!
//! This module defines the lifecycle every plugin follows:
//!
//! 1. `initialize` once, before the plugin joins a world
//! 2. `connect` to subscribe to world topics
//! 3. handle events (`Behavior::behave`, `Renderer::handle`)
//! 4. `disconnect` when the plugin leaves the world
//!
//! # Contracts
//!
//! Plugins must:
//! - Treat missing bodies (stale handles) as a normal outcome, never panic
//! - Not hold handles across a `remove:body` event for that body
//! - Report bad options from `initialize` instead of failing later

use crate::body::{Body, BodySet, BodyStyle, Rectangle};
use crate::events::{Subscriptions, WorldEvent};
use crate::input::PointerEvent;
use crate::render::{AttachTarget, RenderMeta, ViewId};
use std::any::Any;
use std::collections::VecDeque;

/// Version of the plugin API
///
/// This version must be compatible between the engine and plugins.
/// Format: MAJOR.MINOR.PATCH following semantic versioning.
pub const PLUGIN_API_VERSION: &str = "0.1.0";

/// Scoped access handed to a behavior while it handles one event
///
/// Gives mutable access to the bodies and lets the behavior publish
/// follow-up events, which the world delivers after the current event.
pub struct BehaviorContext<'a> {
    bodies: &'a mut BodySet,
    outbox: &'a mut VecDeque<WorldEvent>,
    timestep: f64,
}

impl<'a> BehaviorContext<'a> {
    /// Create a new context
    ///
    /// This is only callable by the engine, not by plugins.
    pub(crate) fn new(
        bodies: &'a mut BodySet,
        outbox: &'a mut VecDeque<WorldEvent>,
        timestep: f64,
    ) -> Self {
        BehaviorContext {
            bodies,
            outbox,
            timestep,
        }
    }

    /// Immutable access to the bodies
    pub fn bodies(&self) -> &BodySet {
        self.bodies
    }

    /// Mutable access to the bodies
    pub fn bodies_mut(&mut self) -> &mut BodySet {
        self.bodies
    }

    /// Publish a follow-up event
    pub fn emit(&mut self, event: WorldEvent) {
        self.outbox.push_back(event);
    }

    /// World iteration timestep in ms
    pub fn timestep(&self) -> f64 {
        self.timestep
    }
}

/// Lifecycle hooks shared by behaviors and renderers
pub trait Plugin: Send + Sync {
    /// Get the name of this plugin
    ///
    /// Must be unique among the plugins connected to one world.
    fn name(&self) -> &str;

    /// Get the version of this plugin
    fn version(&self) -> &str;

    /// Get the plugin API version this plugin was built against
    fn api_version(&self) -> &str {
        PLUGIN_API_VERSION
    }

    /// Validate options and prepare internal state
    ///
    /// Called once before the plugin is connected to a world.
    ///
    /// # Errors
    ///
    /// Returns an error message if the configuration is unusable.
    fn initialize(&mut self) -> Result<(), String> {
        Ok(())
    }

    /// Subscribe to the world topics this plugin handles
    fn connect(&mut self, subscriptions: &mut Subscriptions);

    /// Unsubscribe from world topics
    fn disconnect(&mut self, subscriptions: &mut Subscriptions) {
        subscriptions.clear();
    }

    /// Allow downcasting to concrete plugin types
    fn as_any(&self) -> &dyn Any;

    /// Allow mutable downcasting to concrete plugin types
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// A plugin that modifies bodies in response to world events
pub trait Behavior: Plugin {
    /// Handle an event on one of the subscribed topics
    fn behave(&mut self, event: &WorldEvent, ctx: &mut BehaviorContext<'_>);

    /// Handle a pointer event from the hosting environment
    ///
    /// Most behaviors ignore pointer input.
    fn pointer(&mut self, _event: &PointerEvent, _bodies: &mut BodySet) {}
}

/// A plugin that keeps visual elements in sync with bodies
///
/// Implementors provide the element primitives; the provided methods follow
/// the base renderer contract: a body gets a view when it is added (or at
/// the latest when it is first rendered), loses it when it is removed, and
/// is redrawn on every render call.
pub trait Renderer: Plugin {
    /// Create a drawable element for a body's geometry and add it to the
    /// drawing surface
    fn create_view(&mut self, geometry: &Rectangle, style: &BodyStyle) -> ViewId;

    /// Check if the renderer still owns this view
    fn has_view(&self, view: ViewId) -> bool;

    /// Add the target's element to the drawing surface if it is not there
    fn attach(&mut self, target: AttachTarget);

    /// Remove the target's element from the drawing surface if it is there
    fn detach(&mut self, target: AttachTarget);

    /// Copy body state onto its view
    fn draw_body(&mut self, body: &Body, view: ViewId);

    /// Whether frame statistics should be drawn
    fn meta_enabled(&self) -> bool {
        false
    }

    /// Draw frame statistics
    fn draw_meta(&mut self, _meta: &RenderMeta) {}

    /// Free a view whose body left the world
    ///
    /// Called after the view was detached. Renderers that can reuse views
    /// keep the default, which holds on to the element.
    fn release_view(&mut self, _view: ViewId) {}

    /// Handle a body add/remove event
    fn handle(&mut self, event: &WorldEvent, bodies: &mut BodySet) {
        match event {
            WorldEvent::AddBody { body } => {
                if let Some(body) = bodies.get_mut(*body) {
                    match body.view {
                        Some(view) if self.has_view(view) => {
                            self.attach(AttachTarget::Element(view));
                        }
                        _ => {
                            let view = self.create_view(body.geometry(), body.style());
                            body.view = Some(view);
                        }
                    }
                }
            }
            WorldEvent::RemoveBody { body, view } => {
                self.detach(AttachTarget::Event {
                    body: *body,
                    view: *view,
                });
                if let Some(view) = view {
                    self.release_view(*view);
                }
            }
            _ => {}
        }
    }

    /// Draw every visible body, creating missing views first
    fn render(&mut self, bodies: &mut BodySet, meta: &RenderMeta) {
        for body in bodies.iter_mut() {
            let view = match body.view {
                Some(view) if self.has_view(view) => view,
                _ => {
                    let view = self.create_view(body.geometry(), body.style());
                    body.view = Some(view);
                    view
                }
            };
            if !body.hidden {
                self.draw_body(body, view);
            }
        }

        if meta.enabled {
            self.draw_meta(meta);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Topic;

    struct TestPlugin {
        name: String,
        initialized: bool,
    }

    impl TestPlugin {
        fn new(name: &str) -> Self {
            TestPlugin {
                name: name.to_string(),
                initialized: false,
            }
        }
    }

    impl Plugin for TestPlugin {
        fn name(&self) -> &str {
            &self.name
        }

        fn version(&self) -> &str {
            "1.0.0"
        }

        fn initialize(&mut self) -> Result<(), String> {
            self.initialized = true;
            Ok(())
        }

        fn connect(&mut self, subscriptions: &mut Subscriptions) {
            subscriptions.on(Topic::IntegratePositions);
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[test]
    fn test_plugin_api_version() {
        assert_eq!(PLUGIN_API_VERSION, "0.1.0");
        let plugin = TestPlugin::new("test");
        assert_eq!(plugin.api_version(), PLUGIN_API_VERSION);
    }

    #[test]
    fn test_plugin_lifecycle() {
        let mut plugin = TestPlugin::new("test");
        plugin.initialize().unwrap();
        assert!(plugin.initialized);

        let mut subs = Subscriptions::new();
        plugin.connect(&mut subs);
        assert!(subs.contains(Topic::IntegratePositions));

        plugin.disconnect(&mut subs);
        assert!(subs.is_empty());
    }

    #[test]
    fn test_plugin_downcasting() {
        let mut plugin = TestPlugin::new("test");
        assert!(plugin.as_any().downcast_ref::<TestPlugin>().is_some());
        assert!(plugin.as_any_mut().downcast_mut::<TestPlugin>().is_some());
    }

    #[test]
    fn test_context_emit_queues_events() {
        let mut bodies = BodySet::new();
        let mut outbox = VecDeque::new();
        let mut ctx = BehaviorContext::new(&mut bodies, &mut outbox, 6.0);

        ctx.bodies_mut().insert(Body::rectangle(0.0, 0.0, 1.0, 1.0));
        ctx.emit(WorldEvent::Step { time: 1.0 });
        assert_eq!(ctx.timestep(), 6.0);
        assert_eq!(ctx.bodies().len(), 1);
        assert_eq!(outbox.len(), 1);
    }
}
