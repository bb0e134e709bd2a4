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
//! Grab-and-throw pointer interaction
//!
//! Pressing the pointer on a body grabs it: the body is fixed so gravity and
//! collisions leave it alone, and the point where it was grabbed is kept
//! under the pointer. Every position pass moves the grabbed body with the
//! pointer and gives it a velocity proportional to the last pointer delta,
//! so on release it flies off in the direction it was thrown.
//!
//! Pointer input and ticks arrive interleaved on one thread:
//!
//! ```text
//! down ──► grab (fixed = true)
//! move ──► previous = position, position = pointer
//! tick ──► body.pos = position - offset
//!          body.vel = clamp((position - previous) / divisor)
//! up   ──► release (fixed = false)
//! ```

use crate::body::{BodyHandle, BodySet};
use crate::events::{Subscriptions, Topic, WorldEvent};
use crate::input::{ElementOffset, PointerEvent, PointerKind};
use crate::math::Vector2;
use crate::plugins::{Behavior, BehaviorContext, Plugin, PluginOptions};
use log::trace;
use std::any::Any;

/// Default divisor turning a pointer delta (px) into a velocity (px/ms)
pub const DEFAULT_VELOCITY_DIVISOR: f64 = 30.0;

/// Default per-axis drag speed limit, px/ms
pub const DEFAULT_MAX_SPEED: f64 = 1.0;

/// Options for [`PointerDrag`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerDragOptions {
    /// Page position of the drawing element
    pub element_offset: ElementOffset,
    /// Pointer delta is divided by this to get the drag velocity
    pub velocity_divisor: f64,
    /// Lower clamp of the drag velocity, per axis
    pub velocity_min: Vector2,
    /// Upper clamp of the drag velocity, per axis
    pub velocity_max: Vector2,
}

impl Default for PointerDragOptions {
    fn default() -> Self {
        PointerDragOptions {
            element_offset: ElementOffset::default(),
            velocity_divisor: DEFAULT_VELOCITY_DIVISOR,
            velocity_min: Vector2::new(-DEFAULT_MAX_SPEED, -DEFAULT_MAX_SPEED),
            velocity_max: Vector2::new(DEFAULT_MAX_SPEED, DEFAULT_MAX_SPEED),
        }
    }
}

/// Pointer tracking state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointerState {
    position: Vector2,
    previous: Vector2,
    grabbed: Option<BodyHandle>,
    offset: Vector2,
    dragging_empty: bool,
}

impl PointerState {
    /// Current element-relative pointer position
    pub fn position(&self) -> Vector2 {
        self.position
    }

    /// Pointer position before the last move
    pub fn previous(&self) -> Vector2 {
        self.previous
    }

    /// Body currently held by the pointer
    pub fn grabbed(&self) -> Option<BodyHandle> {
        self.grabbed
    }

    /// Grab point relative to the grabbed body's position
    pub fn offset(&self) -> Vector2 {
        self.offset
    }

    /// Whether the pointer was pressed on empty space
    pub fn is_dragging_empty(&self) -> bool {
        self.dragging_empty
    }
}

/// Pointer drag behavior, registered as `demo-mouse-events`
///
/// # Example
///
/// ```rust
/// use svg_sandbox::behaviors::PointerDrag;
/// use svg_sandbox::plugins::Behavior;
/// use svg_sandbox::{Body, BodySet, PointerEvent};
///
/// let mut bodies = BodySet::new();
/// let handle = bodies.insert(Body::rectangle(100.0, 100.0, 40.0, 40.0));
///
/// let mut drag = PointerDrag::default();
/// drag.pointer(&PointerEvent::down(105.0, 95.0), &mut bodies);
/// assert_eq!(drag.state().grabbed(), Some(handle));
/// assert!(bodies.get(handle).unwrap().fixed);
///
/// drag.pointer(&PointerEvent::up(105.0, 95.0), &mut bodies);
/// assert!(!bodies.get(handle).unwrap().fixed);
/// ```
#[derive(Debug, Default)]
pub struct PointerDrag {
    options: PointerDragOptions,
    state: PointerState,
}

impl PointerDrag {
    /// Registered plugin name
    pub const NAME: &'static str = "demo-mouse-events";

    /// Create the behavior
    pub fn new(options: PointerDragOptions) -> Self {
        PointerDrag {
            options,
            state: PointerState::default(),
        }
    }

    /// Build from options
    ///
    /// Recognized keys: `el` (offset), `velocity_divisor` (number),
    /// `max_speed` (number, symmetric clamp), `velocity_min` and
    /// `velocity_max` (vectors, override `max_speed` per bound).
    pub fn from_options(options: &PluginOptions) -> Result<Self, String> {
        let mut drag = PointerDragOptions::default();
        if let Some(offset) = options.offset("el")? {
            drag.element_offset = offset;
        }
        if let Some(divisor) = options.number("velocity_divisor")? {
            drag.velocity_divisor = divisor;
        }
        if let Some(speed) = options.number("max_speed")? {
            drag.velocity_min = Vector2::new(-speed, -speed);
            drag.velocity_max = Vector2::new(speed, speed);
        }
        if let Some(min) = options.vector("velocity_min")? {
            drag.velocity_min = min;
        }
        if let Some(max) = options.vector("velocity_max")? {
            drag.velocity_max = max;
        }
        Ok(Self::new(drag))
    }

    /// Behavior options
    pub fn options(&self) -> &PointerDragOptions {
        &self.options
    }

    /// Pointer tracking state
    pub fn state(&self) -> &PointerState {
        &self.state
    }

    /// Update the element position, e.g. after the host layout changed
    pub fn set_element_offset(&mut self, offset: ElementOffset) {
        self.options.element_offset = offset;
    }

    fn grab(&mut self, bodies: &mut BodySet) {
        self.release(bodies);

        let Some(handle) = bodies.find_one_at(self.state.position) else {
            self.state.dragging_empty = true;
            return;
        };
        if let Some(body) = bodies.get_mut(handle) {
            body.fixed = true;
            self.state.offset = self.state.position - body.state.pos;
            self.state.grabbed = Some(handle);
            trace!("grabbed {} at offset {:?}", handle, self.state.offset);
        }
    }

    fn release(&mut self, bodies: &mut BodySet) {
        if let Some(handle) = self.state.grabbed.take() {
            if let Some(body) = bodies.get_mut(handle) {
                body.fixed = false;
                trace!("released {}", handle);
            }
        }
        self.state.dragging_empty = false;
    }

    /// Move the grabbed body with the pointer
    fn drag(&mut self, bodies: &mut BodySet) {
        let Some(handle) = self.state.grabbed else {
            return;
        };
        let Some(body) = bodies.get_mut(handle) else {
            self.state.grabbed = None;
            return;
        };

        let state = &self.state;
        body.state.pos = state.position - state.offset;
        let delta = body.state.pos - state.previous + state.offset;
        body.state.vel = (delta * (1.0 / self.options.velocity_divisor))
            .clamp(self.options.velocity_min, self.options.velocity_max);
    }
}

impl Plugin for PointerDrag {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn version(&self) -> &str {
        "1.0.0"
    }

    fn initialize(&mut self) -> Result<(), String> {
        let divisor = self.options.velocity_divisor;
        if !(divisor > 0.0 && divisor.is_finite()) {
            return Err(format!("velocity divisor {} must be positive", divisor));
        }
        let (min, max) = (self.options.velocity_min, self.options.velocity_max);
        if !(min.x <= max.x && min.y <= max.y) {
            return Err(format!("velocity bounds {:?}..{:?} are inverted", min, max));
        }
        Ok(())
    }

    fn connect(&mut self, subscriptions: &mut Subscriptions) {
        subscriptions.on(Topic::IntegratePositions);
        subscriptions.on(Topic::RemoveBody);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Behavior for PointerDrag {
    fn behave(&mut self, event: &WorldEvent, ctx: &mut BehaviorContext<'_>) {
        match event {
            WorldEvent::IntegratePositions { .. } => self.drag(ctx.bodies_mut()),
            WorldEvent::RemoveBody { body, .. } if self.state.grabbed == Some(*body) => {
                self.state.grabbed = None;
            }
            _ => {}
        }
    }

    fn pointer(&mut self, event: &PointerEvent, bodies: &mut BodySet) {
        let local = event.local_position(&self.options.element_offset);
        match event.kind {
            PointerKind::Down => {
                self.state.position = local;
                self.grab(bodies);
            }
            PointerKind::Move => {
                self.state.previous = self.state.position;
                self.state.position = local;
            }
            PointerKind::Up => {
                self.state.previous = self.state.position;
                self.state.position = local;
                self.release(bodies);
            }
        }
    }
}
