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
//! World management
//!
//! The [`World`] owns the bodies, the connected behaviors and at most one
//! renderer. It publishes topics to plugins in connect order (the renderer
//! first), and runs a fixed-timestep loop driven by host time.
//!
//! # Event delivery
//!
//! Events emitted by a behavior while it handles an event are queued and
//! delivered after every subscriber has seen the current one, in the order
//! they were emitted. A position pass therefore unfolds as:
//!
//! ```text
//! integrate:positions ─► sweep-prune ─► collisions:candidates
//!                                        └► body-collision-detection ─► collisions:detected
//!                                                                        └► body-impulse-response
//! ```

use crate::body::{Body, BodyHandle, BodySet};
use crate::error::{Result, SandboxError};
use crate::events::{Subscriptions, WorldEvent};
use crate::input::PointerEvent;
use crate::integrator::{EulerIntegrator, Integrator};
use crate::math::Vector2;
use crate::plugins::registry::check_api_version;
use crate::plugins::{Behavior, BehaviorContext, Plugin, Renderer};
use crate::render::RenderMeta;
use log::{debug, trace, warn};
use std::collections::VecDeque;

/// Default iteration timestep, ms
pub const DEFAULT_TIMESTEP: f64 = 6.0;

/// Default iteration limit per `step` call
pub const DEFAULT_MAX_IPF: u32 = 4;

/// Outcome of one [`World::step`] call
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StepReport {
    /// Iterations run by this call
    pub iterations: u32,
    /// Whether the iteration limit was hit and simulated time resynchronized
    pub clamped: bool,
    /// Simulated time after the call, ms
    pub time: f64,
}

struct Connected<P: ?Sized> {
    plugin: Box<P>,
    subscriptions: Subscriptions,
}

impl<P: Plugin + ?Sized> Connected<P> {
    fn connect(mut plugin: Box<P>) -> Result<Self> {
        check_api_version(plugin.name(), plugin.api_version())?;
        plugin.initialize().map_err(|reason| SandboxError::PluginInit {
            name: plugin.name().to_string(),
            reason,
        })?;

        let mut subscriptions = Subscriptions::new();
        plugin.connect(&mut subscriptions);
        debug!(
            "connected '{}' to {:?}",
            plugin.name(),
            subscriptions.topics().map(|t| t.as_str()).collect::<Vec<_>>()
        );
        Ok(Connected {
            plugin,
            subscriptions,
        })
    }

    fn disconnect(mut self) -> Box<P> {
        self.plugin.disconnect(&mut self.subscriptions);
        debug!("disconnected '{}'", self.plugin.name());
        self.plugin
    }
}

/// The simulation world
///
/// # Example
///
/// ```rust
/// use svg_sandbox::behaviors::ConstantAcceleration;
/// use svg_sandbox::{Body, World};
///
/// let mut world = World::new();
/// world.add_behavior(Box::new(ConstantAcceleration::default())).unwrap();
/// let handle = world.add_body(Body::rectangle(100.0, 100.0, 40.0, 40.0));
///
/// world.step(0.0);
/// let report = world.step(12.0);
/// assert_eq!(report.iterations, 2);
/// assert!(world.body(handle).unwrap().state.pos.y > 100.0);
/// ```
pub struct World {
    bodies: BodySet,
    behaviors: Vec<Connected<dyn Behavior>>,
    renderer: Option<Connected<dyn Renderer>>,
    integrator: Box<dyn Integrator>,
    timestep: f64,
    max_ipf: u32,
    time: Option<f64>,
    last_step: StepReport,
    last_now: Option<f64>,
    frame_interval: f64,
}

impl World {
    /// Create an empty world with the default timestep
    pub fn new() -> Self {
        World {
            bodies: BodySet::new(),
            behaviors: Vec::new(),
            renderer: None,
            integrator: Box::new(EulerIntegrator),
            timestep: DEFAULT_TIMESTEP,
            max_ipf: DEFAULT_MAX_IPF,
            time: None,
            last_step: StepReport::default(),
            last_now: None,
            frame_interval: 0.0,
        }
    }

    /// Create an empty world with a custom timestep and iteration limit
    ///
    /// # Errors
    ///
    /// [`SandboxError::InvalidConfig`] if the timestep is not positive and
    /// finite, or `max_ipf` is zero.
    pub fn with_timestep(timestep: f64, max_ipf: u32) -> Result<Self> {
        if !(timestep > 0.0 && timestep.is_finite()) {
            return Err(SandboxError::InvalidConfig(format!(
                "timestep {} must be positive and finite",
                timestep
            )));
        }
        if max_ipf == 0 {
            return Err(SandboxError::InvalidConfig(
                "max iterations per frame must be at least 1".to_string(),
            ));
        }
        Ok(World {
            timestep,
            max_ipf,
            ..Self::new()
        })
    }

    /// Replace the integrator
    pub fn set_integrator(&mut self, integrator: Box<dyn Integrator>) {
        self.integrator = integrator;
    }

    /// Iteration timestep, ms
    pub fn timestep(&self) -> f64 {
        self.timestep
    }

    /// Iteration limit per `step` call
    pub fn max_ipf(&self) -> u32 {
        self.max_ipf
    }

    /// Simulated time, `None` before the first `step`
    pub fn time(&self) -> Option<f64> {
        self.time
    }

    /// The bodies
    pub fn bodies(&self) -> &BodySet {
        &self.bodies
    }

    /// The bodies, mutably
    ///
    /// Inserting or removing through this bypasses `add:body` and
    /// `remove:body`; use [`World::add_body`] and [`World::remove_body`] to
    /// keep plugins in sync.
    pub fn bodies_mut(&mut self) -> &mut BodySet {
        &mut self.bodies
    }

    /// Look up a body
    pub fn body(&self, handle: BodyHandle) -> Option<&Body> {
        self.bodies.get(handle)
    }

    /// Look up a body mutably
    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.bodies.get_mut(handle)
    }

    /// Number of bodies
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Add a body and publish `add:body`
    pub fn add_body(&mut self, body: Body) -> BodyHandle {
        let handle = self.bodies.insert(body);
        debug!("added {}", handle);
        self.dispatch(WorldEvent::AddBody { body: handle });
        handle
    }

    /// Remove a body and publish `remove:body`
    ///
    /// Returns `None` without publishing anything if the handle is stale.
    pub fn remove_body(&mut self, handle: BodyHandle) -> Option<Body> {
        let body = self.bodies.remove(handle)?;
        debug!("removed {}", handle);
        self.dispatch(WorldEvent::RemoveBody {
            body: handle,
            view: body.view,
        });
        Some(body)
    }

    /// First body (in insertion order) containing the point
    pub fn find_one_at(&self, point: Vector2) -> Option<BodyHandle> {
        self.bodies.find_one_at(point)
    }

    /// Initialize and connect a behavior
    ///
    /// # Errors
    ///
    /// - [`SandboxError::DuplicatePlugin`] if a behavior with the same name is connected
    /// - [`SandboxError::IncompatibleApi`] if its API version is incompatible
    /// - [`SandboxError::PluginInit`] if `initialize` fails
    pub fn add_behavior(&mut self, behavior: Box<dyn Behavior>) -> Result<()> {
        if self.has_behavior(behavior.name()) {
            return Err(SandboxError::DuplicatePlugin(behavior.name().to_string()));
        }
        self.behaviors.push(Connected::connect(behavior)?);
        Ok(())
    }

    /// Disconnect and return a behavior
    pub fn remove_behavior(&mut self, name: &str) -> Option<Box<dyn Behavior>> {
        let index = self
            .behaviors
            .iter()
            .position(|c| c.plugin.name() == name)?;
        Some(self.behaviors.remove(index).disconnect())
    }

    /// Check if a behavior is connected
    pub fn has_behavior(&self, name: &str) -> bool {
        self.behaviors.iter().any(|c| c.plugin.name() == name)
    }

    /// Names of the connected behaviors in connect order
    pub fn behavior_names(&self) -> Vec<&str> {
        self.behaviors.iter().map(|c| c.plugin.name()).collect()
    }

    /// Downcast a connected behavior
    pub fn behavior<T: 'static>(&self, name: &str) -> Option<&T> {
        self.behaviors
            .iter()
            .find(|c| c.plugin.name() == name)
            .and_then(|c| c.plugin.as_any().downcast_ref::<T>())
    }

    /// Downcast a connected behavior mutably
    pub fn behavior_mut<T: 'static>(&mut self, name: &str) -> Option<&mut T> {
        self.behaviors
            .iter_mut()
            .find(|c| c.plugin.name() == name)
            .and_then(|c| c.plugin.as_any_mut().downcast_mut::<T>())
    }

    /// Initialize and connect a renderer, returning the previous one
    ///
    /// Views issued by the previous renderer are forgotten; bodies already
    /// in the world receive new views on the next render.
    ///
    /// # Errors
    ///
    /// Same as [`World::add_behavior`], except for duplicates.
    pub fn set_renderer(&mut self, renderer: Box<dyn Renderer>) -> Result<Option<Box<dyn Renderer>>> {
        let connected = Connected::connect(renderer)?;
        for body in self.bodies.iter_mut() {
            body.view = None;
        }
        Ok(self
            .renderer
            .replace(connected)
            .map(Connected::disconnect))
    }

    /// The connected renderer
    pub fn renderer(&self) -> Option<&dyn Renderer> {
        self.renderer.as_ref().map(|c| c.plugin.as_ref())
    }

    /// Downcast the connected renderer
    pub fn renderer_as<T: 'static>(&self) -> Option<&T> {
        self.renderer
            .as_ref()
            .and_then(|c| c.plugin.as_any().downcast_ref::<T>())
    }

    /// Forward a pointer event to every behavior in connect order
    pub fn pointer(&mut self, event: &PointerEvent) {
        trace!("pointer {:?} at ({}, {})", event.kind, event.page_x, event.page_y);
        for connected in &mut self.behaviors {
            connected.plugin.pointer(event, &mut self.bodies);
        }
    }

    /// Advance the simulation to host time `now` (ms)
    ///
    /// The first call only records the time. Later calls run as many whole
    /// timesteps as fit, up to the iteration limit; when the limit is hit
    /// the remaining backlog is dropped. Publishes `step` at the end.
    /// Non-finite host times are ignored.
    pub fn step(&mut self, now: f64) -> StepReport {
        if !now.is_finite() {
            warn!("ignoring non-finite host time {}", now);
            return StepReport {
                time: self.time.unwrap_or_default(),
                ..StepReport::default()
            };
        }

        let mut iterations = 0;
        let mut clamped = false;
        if let Some(last) = self.last_now.replace(now) {
            self.frame_interval = now - last;
        }

        match self.time {
            None => self.time = Some(now),
            Some(mut time) => {
                while time + self.timestep <= now {
                    if iterations == self.max_ipf {
                        warn!(
                            "{} ms behind after {} iterations, resynchronizing",
                            now - time,
                            iterations
                        );
                        time = now;
                        clamped = true;
                        break;
                    }
                    time += self.timestep;
                    self.iterate();
                    iterations += 1;
                }
                self.time = Some(time);
            }
        }

        let time = self.time.unwrap_or(now);
        self.dispatch(WorldEvent::Step { time });
        self.last_step = StepReport {
            iterations,
            clamped,
            time,
        };
        self.last_step
    }

    /// Draw every body through the renderer, if one is connected
    pub fn render(&mut self) {
        let Some(connected) = &mut self.renderer else {
            return;
        };
        let meta = RenderMeta {
            enabled: connected.plugin.meta_enabled(),
            fps: if self.frame_interval > 0.0 {
                1000.0 / self.frame_interval
            } else {
                0.0
            },
            ipf: self.last_step.iterations,
            body_count: self.bodies.len(),
        };
        connected.plugin.render(&mut self.bodies, &meta);
    }

    fn iterate(&mut self) {
        let dt = self.timestep;
        self.integrator.integrate_velocities(&mut self.bodies, dt);
        self.dispatch(WorldEvent::IntegrateVelocities { dt });
        self.integrator.integrate_positions(&mut self.bodies, dt);
        self.dispatch(WorldEvent::IntegratePositions { dt });
    }

    fn dispatch(&mut self, event: WorldEvent) {
        let World {
            bodies,
            behaviors,
            renderer,
            timestep,
            ..
        } = self;

        let mut queue = VecDeque::from([event]);
        while let Some(event) = queue.pop_front() {
            let topic = event.topic();
            trace!("publishing {}", topic);

            if let Some(connected) = renderer.as_mut() {
                if connected.subscriptions.contains(topic) {
                    connected.plugin.handle(&event, bodies);
                }
            }
            for connected in behaviors.iter_mut() {
                if connected.subscriptions.contains(topic) {
                    let mut ctx = BehaviorContext::new(bodies, &mut queue, *timestep);
                    connected.plugin.behave(&event, &mut ctx);
                }
            }
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
