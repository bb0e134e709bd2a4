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
//! Uniform acceleration (screen-space gravity)
//!
//! Every free body receives the same acceleration regardless of its mass,
//! which is what a gravity field near a planet surface looks like at sandbox
//! scale. The acceleration is added on `integrate:positions` and consumed by
//! the velocity pass of the following iteration.
//!
//! ## Parallel Computation
//!
//! With the `parallel` feature the per-body update runs on the Rayon pool.
//! Each body is touched independently, so the result is identical to the
//! sequential path.

use crate::body::BodySet;
use crate::events::{Subscriptions, Topic, WorldEvent};
use crate::math::Vector2;
use crate::plugins::{Behavior, BehaviorContext, Plugin, PluginOptions};
use std::any::Any;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Default acceleration in px/ms² (y grows downwards)
pub const DEFAULT_ACCELERATION: Vector2 = Vector2::new(0.0, 0.0004);

/// Constant acceleration behavior
///
/// # Example
///
/// ```rust
/// use svg_sandbox::behaviors::ConstantAcceleration;
/// use svg_sandbox::Vector2;
///
/// let gravity = ConstantAcceleration::new(Vector2::new(0.0, 0.0004));
/// assert_eq!(gravity.acceleration().y, 0.0004);
/// ```
pub struct ConstantAcceleration {
    acc: Vector2,
}

impl ConstantAcceleration {
    /// Registered plugin name
    pub const NAME: &'static str = "constant-acceleration";

    /// Create the behavior with the given acceleration
    pub fn new(acc: Vector2) -> Self {
        ConstantAcceleration { acc }
    }

    /// Build from options (`acc`: vector)
    pub fn from_options(options: &PluginOptions) -> Result<Self, String> {
        let acc = options.vector("acc")?.unwrap_or(DEFAULT_ACCELERATION);
        Ok(Self::new(acc))
    }

    /// Current acceleration
    pub fn acceleration(&self) -> Vector2 {
        self.acc
    }

    /// Change the acceleration
    pub fn set_acceleration(&mut self, acc: Vector2) {
        self.acc = acc;
    }

    fn apply(&self, bodies: &mut BodySet) {
        let acc = self.acc;

        #[cfg(feature = "parallel")]
        bodies
            .par_iter_mut()
            .filter(|body| !body.fixed)
            .for_each(|body| body.state.acc += acc);

        #[cfg(not(feature = "parallel"))]
        for body in bodies.iter_mut().filter(|body| !body.fixed) {
            body.state.acc += acc;
        }
    }
}

impl Default for ConstantAcceleration {
    fn default() -> Self {
        Self::new(DEFAULT_ACCELERATION)
    }
}

impl Plugin for ConstantAcceleration {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn version(&self) -> &str {
        "1.0.0"
    }

    fn initialize(&mut self) -> Result<(), String> {
        if !self.acc.is_finite() {
            return Err(format!("acceleration {:?} must be finite", self.acc));
        }
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

impl Behavior for ConstantAcceleration {
    fn behave(&mut self, event: &WorldEvent, ctx: &mut BehaviorContext<'_>) {
        if let WorldEvent::IntegratePositions { .. } = event {
            self.apply(ctx.bodies_mut());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::Body;
    use std::collections::VecDeque;

    #[test]
    fn test_free_bodies_accelerate() {
        let mut bodies = BodySet::new();
        let free = bodies.insert(Body::rectangle(0.0, 0.0, 10.0, 10.0));
        let pinned = bodies.insert(Body::rectangle(50.0, 0.0, 10.0, 10.0).fixed(true));

        let mut outbox = VecDeque::new();
        let mut gravity = ConstantAcceleration::default();
        {
            let mut ctx = BehaviorContext::new(&mut bodies, &mut outbox, 6.0);
            gravity.behave(&WorldEvent::IntegratePositions { dt: 6.0 }, &mut ctx);
        }

        assert_eq!(bodies.get(free).unwrap().state.acc, DEFAULT_ACCELERATION);
        assert_eq!(bodies.get(pinned).unwrap().state.acc, Vector2::zero());
        assert!(outbox.is_empty());
    }

    #[test]
    fn test_from_options() {
        let options = PluginOptions::new().with_vector("acc", Vector2::new(0.1, 0.0));
        let gravity = ConstantAcceleration::from_options(&options).unwrap();
        assert_eq!(gravity.acceleration(), Vector2::new(0.1, 0.0));

        let default = ConstantAcceleration::from_options(&PluginOptions::new()).unwrap();
        assert_eq!(default.acceleration(), DEFAULT_ACCELERATION);
    }

    #[test]
    fn test_non_finite_acceleration_rejected() {
        let mut gravity = ConstantAcceleration::new(Vector2::new(f64::NAN, 0.0));
        assert!(gravity.initialize().is_err());
    }
}
