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
//! Distance constraints relaxed by position projection
//!
//! After every position pass each constraint moves its two bodies towards
//! the target separation. The correction is split by inverse mass, so a
//! fixed body acts as an anchor. Several relaxation iterations are run per
//! pass; more iterations make chains of constraints stiffer.
//!
//! The scene starts with no constraints. They are added at runtime through
//! [`VerletConstraints::distance_constraint`], typically after looking the
//! behavior up on the world by name.

use crate::body::{BodyHandle, BodySet};
use crate::events::{Subscriptions, Topic, WorldEvent};
use crate::plugins::{Behavior, BehaviorContext, Plugin, PluginOptions};
use std::any::Any;

/// Default relaxation iterations per position pass
pub const DEFAULT_ITERATIONS: usize = 2;

/// Keeps two bodies at a fixed separation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceConstraint {
    /// First body
    pub a: BodyHandle,
    /// Second body
    pub b: BodyHandle,
    /// Separation between centers to maintain, px
    pub target_length: f64,
    /// Fraction of the error corrected per relaxation, in `(0, 1]`
    pub stiffness: f64,
}

impl DistanceConstraint {
    /// Constraint holding the bodies at their current separation
    ///
    /// Returns `None` if either body is missing.
    pub fn between(bodies: &BodySet, a: BodyHandle, b: BodyHandle, stiffness: f64) -> Option<Self> {
        let pos_a = bodies.get(a)?.state.pos;
        let pos_b = bodies.get(b)?.state.pos;
        Some(DistanceConstraint {
            a,
            b,
            target_length: (pos_b - pos_a).length(),
            stiffness: clamp_stiffness(stiffness),
        })
    }

    fn involves(&self, handle: BodyHandle) -> bool {
        self.a == handle || self.b == handle
    }

    /// Apply one relaxation; returns `false` if a body is gone
    fn relax(&self, bodies: &mut BodySet) -> bool {
        let (pos_a, inv_a) = match bodies.get(self.a) {
            Some(body) => (body.state.pos, body.inverse_mass()),
            None => return false,
        };
        let (pos_b, inv_b) = match bodies.get(self.b) {
            Some(body) => (body.state.pos, body.inverse_mass()),
            None => return false,
        };

        let inv_sum = inv_a + inv_b;
        let delta = pos_b - pos_a;
        let len = delta.length();
        if inv_sum <= 0.0 || len <= f64::EPSILON {
            return true;
        }

        let correction = delta * (self.stiffness * (len - self.target_length) / (len * inv_sum));
        if let Some(body) = bodies.get_mut(self.a) {
            body.state.pos += correction * inv_a;
        }
        if let Some(body) = bodies.get_mut(self.b) {
            body.state.pos -= correction * inv_b;
        }
        true
    }
}

fn clamp_stiffness(stiffness: f64) -> f64 {
    if stiffness.is_finite() && stiffness > 0.0 {
        stiffness.min(1.0)
    } else {
        1.0
    }
}

/// Verlet constraint behavior
pub struct VerletConstraints {
    constraints: Vec<DistanceConstraint>,
    iterations: usize,
}

impl VerletConstraints {
    /// Registered plugin name
    pub const NAME: &'static str = "verlet-constraints";

    /// Create the behavior with no constraints
    pub fn new() -> Self {
        VerletConstraints {
            constraints: Vec::new(),
            iterations: DEFAULT_ITERATIONS,
        }
    }

    /// Build from options (`iterations`: number)
    pub fn from_options(options: &PluginOptions) -> Result<Self, String> {
        let mut verlet = Self::new();
        if let Some(iterations) = options.number("iterations")? {
            if !(iterations >= 1.0 && iterations.fract() == 0.0) {
                return Err(format!("iterations must be a positive integer, got {}", iterations));
            }
            verlet.iterations = iterations as usize;
        }
        Ok(verlet)
    }

    /// Relaxation iterations per position pass
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Add a distance constraint between two bodies
    ///
    /// Stiffness outside `(0, 1]` falls back to a rigid constraint.
    pub fn distance_constraint(
        &mut self,
        a: BodyHandle,
        b: BodyHandle,
        stiffness: f64,
        target_length: f64,
    ) -> &DistanceConstraint {
        self.add(DistanceConstraint {
            a,
            b,
            target_length: target_length.max(0.0),
            stiffness: clamp_stiffness(stiffness),
        })
    }

    /// Add a prepared constraint
    pub fn add(&mut self, constraint: DistanceConstraint) -> &DistanceConstraint {
        self.constraints.push(constraint);
        &self.constraints[self.constraints.len() - 1]
    }

    /// Drop every constraint involving the body, returning how many went
    pub fn remove_constraints_for(&mut self, body: BodyHandle) -> usize {
        let before = self.constraints.len();
        self.constraints.retain(|c| !c.involves(body));
        before - self.constraints.len()
    }

    /// Current constraints
    pub fn constraints(&self) -> &[DistanceConstraint] {
        &self.constraints
    }

    /// Number of constraints
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Run all relaxation iterations
    pub fn relax(&mut self, bodies: &mut BodySet) {
        for _ in 0..self.iterations {
            self.constraints.retain(|c| c.relax(bodies));
        }
    }
}

impl Default for VerletConstraints {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for VerletConstraints {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn version(&self) -> &str {
        "1.0.0"
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

impl Behavior for VerletConstraints {
    fn behave(&mut self, event: &WorldEvent, ctx: &mut BehaviorContext<'_>) {
        match event {
            WorldEvent::IntegratePositions { .. } => self.relax(ctx.bodies_mut()),
            WorldEvent::RemoveBody { body, .. } => {
                self.remove_constraints_for(*body);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::Body;
    use approx::assert_relative_eq;
    use std::collections::VecDeque;

    #[test]
    fn test_rigid_constraint_restores_length() {
        let mut bodies = BodySet::new();
        let a = bodies.insert(Body::rectangle(0.0, 0.0, 10.0, 10.0));
        let b = bodies.insert(Body::rectangle(120.0, 0.0, 10.0, 10.0));

        let mut verlet = VerletConstraints::new();
        verlet.distance_constraint(a, b, 1.0, 100.0);
        verlet.relax(&mut bodies);

        assert_relative_eq!(bodies.get(a).unwrap().state.pos.x, 10.0);
        assert_relative_eq!(bodies.get(b).unwrap().state.pos.x, 110.0);
    }

    #[test]
    fn test_fixed_body_anchors() {
        let mut bodies = BodySet::new();
        let anchor = bodies.insert(Body::rectangle(0.0, 0.0, 10.0, 10.0).fixed(true));
        let bob = bodies.insert(Body::rectangle(0.0, 80.0, 10.0, 10.0));

        let mut verlet = VerletConstraints::new();
        verlet.distance_constraint(anchor, bob, 1.0, 50.0);
        verlet.relax(&mut bodies);

        assert_relative_eq!(bodies.get(anchor).unwrap().state.pos.y, 0.0);
        assert_relative_eq!(bodies.get(bob).unwrap().state.pos.y, 50.0);
    }

    #[test]
    fn test_between_uses_current_distance() {
        let mut bodies = BodySet::new();
        let a = bodies.insert(Body::rectangle(0.0, 0.0, 10.0, 10.0));
        let b = bodies.insert(Body::rectangle(30.0, 40.0, 10.0, 10.0));

        let c = DistanceConstraint::between(&bodies, a, b, 3.0).unwrap();
        assert_relative_eq!(c.target_length, 50.0);
        assert_eq!(c.stiffness, 1.0);
    }

    #[test]
    fn test_removed_body_drops_constraints() {
        let mut bodies = BodySet::new();
        let a = bodies.insert(Body::rectangle(0.0, 0.0, 10.0, 10.0));
        let b = bodies.insert(Body::rectangle(20.0, 0.0, 10.0, 10.0));
        let c = bodies.insert(Body::rectangle(40.0, 0.0, 10.0, 10.0));

        let mut verlet = VerletConstraints::new();
        verlet.distance_constraint(a, b, 0.5, 20.0);
        verlet.distance_constraint(b, c, 0.5, 20.0);

        let mut outbox = VecDeque::new();
        {
            let mut ctx = BehaviorContext::new(&mut bodies, &mut outbox, 6.0);
            verlet.behave(&WorldEvent::RemoveBody { body: a, view: None }, &mut ctx);
        }
        assert_eq!(verlet.constraint_count(), 1);

        // A body removed without an event is pruned on the next pass
        bodies.remove(c);
        verlet.relax(&mut bodies);
        assert_eq!(verlet.constraint_count(), 0);
    }

    #[test]
    fn test_iterations_option() {
        let options = PluginOptions::new().with_number("iterations", 5.0);
        assert_eq!(VerletConstraints::from_options(&options).unwrap().iterations(), 5);

        let bad = PluginOptions::new().with_number("iterations", 0.5);
        assert!(VerletConstraints::from_options(&bad).is_err());
    }
}
