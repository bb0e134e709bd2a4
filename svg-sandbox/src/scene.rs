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
//! The click-and-drag sandbox scene
//!
//! A [`Scene`] assembles a world with the `svg` renderer and the built-in
//! behaviors, then translates host input into world operations: a click on
//! empty space spawns a box, a click on a box removes it, and pointer
//! down/move/up drags boxes around. Hosts call [`Scene::tick`] once per
//! animation frame.

use crate::behaviors::{
    BodyCollisionDetection, BodyImpulseResponse, ConstantAcceleration, EdgeCollisionDetection,
    PointerDrag, PointerState, SweepPrune, VerletConstraints,
};
use crate::body::{Body, BodyHandle};
use crate::config::SandboxConfig;
use crate::error::Result;
use crate::input::{ElementOffset, PointerEvent};
use crate::math::{Aabb, Vector2};
use crate::plugins::{PluginOptions, PluginRegistry};
use crate::render::SvgRenderer;
use crate::world::{StepReport, World};
use log::debug;

/// Default interval between frames produced by a [`Ticker`], ms
pub const DEFAULT_FRAME_INTERVAL: f64 = 1000.0 / 60.0;

/// What a click did
#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    /// A new box was spawned under the pointer
    Spawned(BodyHandle),
    /// The box under the pointer was removed
    Removed {
        /// Handle the body had
        handle: BodyHandle,
        /// The removed body
        body: Body,
    },
}

/// The assembled sandbox
pub struct Scene {
    config: SandboxConfig,
    registry: PluginRegistry,
    world: World,
}

impl Scene {
    /// Build the sandbox
    ///
    /// The renderer is connected first, then `constant-acceleration`,
    /// `demo-mouse-events`, `edge-collision-detection`,
    /// `body-impulse-response`, `body-collision-detection`,
    /// `verlet-constraints` and `sweep-prune`, in that order.
    ///
    /// # Errors
    ///
    /// Fails if the configuration is invalid or a plugin rejects its options.
    pub fn new(config: SandboxConfig) -> Result<Self> {
        config.validate()?;
        let registry = PluginRegistry::with_builtins()?;
        let mut world = World::with_timestep(config.timestep, config.max_ipf)?;

        let svg_options = PluginOptions::new()
            .with_number("width", config.width)
            .with_number("height", config.height)
            .with_number("view_size", config.body_size)
            .with_text("fill", config.view_fill.clone())
            .with_flag("meta", config.show_meta);
        world.set_renderer(registry.create_renderer(SvgRenderer::NAME, &svg_options)?)?;

        let speed = config.drag_max_speed;
        let behaviors = [
            (
                ConstantAcceleration::NAME,
                PluginOptions::new().with_vector("acc", config.gravity),
            ),
            (
                PointerDrag::NAME,
                PluginOptions::new()
                    .with_offset("el", config.element_offset)
                    .with_number("velocity_divisor", config.drag_velocity_divisor)
                    .with_vector("velocity_min", Vector2::new(-speed, -speed))
                    .with_vector("velocity_max", Vector2::new(speed, speed)),
            ),
            (
                EdgeCollisionDetection::NAME,
                PluginOptions::new()
                    .with_bounds("aabb", Aabb::from_bounds(0.0, 0.0, config.width, config.height))
                    .with_number("restitution", config.edge_restitution),
            ),
            (BodyImpulseResponse::NAME, PluginOptions::new()),
            (BodyCollisionDetection::NAME, PluginOptions::new()),
            (VerletConstraints::NAME, PluginOptions::new()),
            (SweepPrune::NAME, PluginOptions::new()),
        ];
        for (name, options) in &behaviors {
            world.add_behavior(registry.create_behavior(name, options)?)?;
        }

        debug!(
            "scene ready: {}x{}, behaviors {:?}",
            config.width,
            config.height,
            world.behavior_names()
        );
        Ok(Scene {
            config,
            registry,
            world,
        })
    }

    /// Scene configuration
    pub fn config(&self) -> &SandboxConfig {
        &self.config
    }

    /// The world
    pub fn world(&self) -> &World {
        &self.world
    }

    /// The world, mutably
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Create a registered behavior and connect it after the built-in ones
    pub fn add_behavior(&mut self, name: &str, options: &PluginOptions) -> Result<()> {
        let behavior = self.registry.create_behavior(name, options)?;
        self.world.add_behavior(behavior)
    }

    /// Spawn a box on empty space, or remove the box under the pointer
    pub fn click(&mut self, page_x: f64, page_y: f64) -> ClickOutcome {
        let point = self.config.element_offset.to_local(page_x, page_y);

        let hit = self.world.find_one_at(point);
        if let Some((handle, body)) = hit.and_then(|h| self.world.remove_body(h).map(|b| (h, b)))
        {
            return ClickOutcome::Removed { handle, body };
        }

        let size = self.config.body_size;
        let body = Body::rectangle(point.x, point.y, size, size)
            .with_color(self.config.spawn_color.clone());
        ClickOutcome::Spawned(self.world.add_body(body))
    }

    /// Move the container on the page
    ///
    /// Clicks and drags both map page coordinates through the new offset.
    pub fn set_element_offset(&mut self, offset: ElementOffset) {
        self.config.element_offset = offset;
        if let Some(drag) = self.world.behavior_mut::<PointerDrag>(PointerDrag::NAME) {
            drag.set_element_offset(offset);
        }
    }

    /// Forward pointer input
    pub fn pointer(&mut self, event: &PointerEvent) {
        self.world.pointer(event);
    }

    /// Pointer tracking state of the drag behavior
    pub fn pointer_state(&self) -> Option<&PointerState> {
        self.world
            .behavior::<PointerDrag>(PointerDrag::NAME)
            .map(PointerDrag::state)
    }

    /// Step the world to host time `now` (ms) and render
    pub fn tick(&mut self, now: f64) -> StepReport {
        let report = self.world.step(now);
        self.world.render();
        report
    }

    /// The rendered SVG document
    pub fn svg_markup(&self) -> Option<String> {
        self.world.renderer_as::<SvgRenderer>().map(SvgRenderer::markup)
    }
}

/// Frame clock for hosts without an animation loop
///
/// Yields evenly spaced, strictly increasing timestamps starting at zero.
///
/// ```
/// use svg_sandbox::Ticker;
///
/// let times: Vec<f64> = Ticker::new(10.0).take(3).collect();
/// assert_eq!(times, vec![0.0, 10.0, 20.0]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ticker {
    frame_interval: f64,
    frame: u64,
}

impl Ticker {
    /// Create a ticker; non-positive intervals fall back to 60 frames per second
    pub fn new(frame_interval: f64) -> Self {
        let frame_interval = if frame_interval > 0.0 && frame_interval.is_finite() {
            frame_interval
        } else {
            DEFAULT_FRAME_INTERVAL
        };
        Ticker {
            frame_interval,
            frame: 0,
        }
    }

    /// Interval between frames, ms
    pub fn frame_interval(&self) -> f64 {
        self.frame_interval
    }
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_INTERVAL)
    }
}

impl Iterator for Ticker {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        let now = self.frame as f64 * self.frame_interval;
        self.frame += 1;
        Some(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plugins_connected_in_order() {
        let scene = Scene::new(SandboxConfig::default()).unwrap();
        assert_eq!(
            scene.world().behavior_names(),
            vec![
                "constant-acceleration",
                "demo-mouse-events",
                "edge-collision-detection",
                "body-impulse-response",
                "body-collision-detection",
                "verlet-constraints",
                "sweep-prune",
            ]
        );
        assert!(scene.world().renderer_as::<SvgRenderer>().is_some());
    }

    #[test]
    fn test_click_spawns_then_removes() {
        let mut scene = Scene::new(SandboxConfig::default()).unwrap();

        let handle = match scene.click(100.0, 100.0) {
            ClickOutcome::Spawned(handle) => handle,
            other => panic!("expected a spawn, got {:?}", other),
        };
        let body = scene.world().body(handle).unwrap();
        assert_eq!(body.state.pos, Vector2::new(100.0, 100.0));
        assert_eq!(body.style().color.as_deref(), Some("#FF0000"));

        match scene.click(110.0, 90.0) {
            ClickOutcome::Removed { handle: removed, .. } => assert_eq!(removed, handle),
            other => panic!("expected a removal, got {:?}", other),
        }
        assert_eq!(scene.world().body_count(), 0);
    }

    #[test]
    fn test_click_uses_element_offset() {
        let config = SandboxConfig::default().with_element_offset(ElementOffset::new(20.0, 10.0));
        let mut scene = Scene::new(config).unwrap();
        let ClickOutcome::Spawned(handle) = scene.click(120.0, 110.0) else {
            panic!("expected a spawn");
        };
        assert_eq!(
            scene.world().body(handle).unwrap().state.pos,
            Vector2::new(100.0, 100.0)
        );
    }

    #[test]
    fn test_moved_element_maps_clicks_and_drags_alike() {
        let mut scene = Scene::new(SandboxConfig::default()).unwrap();
        scene.set_element_offset(ElementOffset::new(50.0, 20.0));
        assert_eq!(scene.config().element_offset, ElementOffset::new(50.0, 20.0));

        let ClickOutcome::Spawned(handle) = scene.click(150.0, 120.0) else {
            panic!("expected a spawn");
        };
        assert_eq!(
            scene.world().body(handle).unwrap().state.pos,
            Vector2::new(100.0, 100.0)
        );

        scene.pointer(&PointerEvent::down(150.0, 120.0));
        let state = scene.pointer_state().unwrap();
        assert_eq!(state.grabbed(), Some(handle));
        assert_eq!(state.offset(), Vector2::zero());
    }

    #[test]
    fn test_meta_statistics_on_markup() {
        let mut scene = Scene::new(SandboxConfig::default().with_meta(true)).unwrap();
        scene.click(100.0, 100.0);
        scene.tick(0.0);
        scene.tick(12.0);

        let markup = scene.svg_markup().unwrap();
        assert!(markup.contains("data-ipf=\"2\""));
        assert!(markup.contains("data-bodies=\"1\""));

        let mut plain = Scene::new(SandboxConfig::default()).unwrap();
        plain.tick(0.0);
        assert!(!plain.svg_markup().unwrap().contains("data-"));
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(Scene::new(SandboxConfig::default().with_size(-1.0, 400.0)).is_err());
    }

    #[test]
    fn test_ticker_intervals() {
        let mut ticker = Ticker::new(-5.0);
        assert_eq!(ticker.frame_interval(), DEFAULT_FRAME_INTERVAL);
        assert_eq!(ticker.next(), Some(0.0));
        assert_eq!(ticker.next(), Some(DEFAULT_FRAME_INTERVAL));
    }
}
