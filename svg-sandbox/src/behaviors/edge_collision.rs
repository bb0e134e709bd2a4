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
//! Collisions against the world bounds
//!
//! Each iteration, every free body whose box sticks out of the bounds
//! produces one contact per violated side. The contact normal points from
//! the body towards the wall it crossed, so resolving it pushes the body
//! back inside.

use crate::events::{Collision, CollisionTarget, Subscriptions, Topic, WorldEvent};
use crate::math::{Aabb, Vector2};
use crate::plugins::{Behavior, BehaviorContext, Plugin, PluginOptions};
use std::any::Any;

/// Default restitution of the walls
pub const DEFAULT_EDGE_RESTITUTION: f64 = 0.99;

/// Default friction of the walls
pub const DEFAULT_EDGE_COF: f64 = 1.0;

/// Edge collision detection behavior
pub struct EdgeCollisionDetection {
    bounds: Aabb,
    restitution: f64,
    cof: f64,
}

impl EdgeCollisionDetection {
    /// Registered plugin name
    pub const NAME: &'static str = "edge-collision-detection";

    /// Create the behavior for the given bounds
    pub fn new(bounds: Aabb) -> Self {
        EdgeCollisionDetection {
            bounds,
            restitution: DEFAULT_EDGE_RESTITUTION,
            cof: DEFAULT_EDGE_COF,
        }
    }

    /// Build from options (`aabb`: bounds, required; `restitution`, `cof`: numbers)
    pub fn from_options(options: &PluginOptions) -> Result<Self, String> {
        let bounds = options
            .bounds("aabb")?
            .ok_or_else(|| "option 'aabb' is required".to_string())?;
        let mut edge = Self::new(bounds);
        if let Some(restitution) = options.number("restitution")? {
            edge.restitution = restitution;
        }
        if let Some(cof) = options.number("cof")? {
            edge.cof = cof;
        }
        Ok(edge)
    }

    /// Set the wall restitution
    pub fn with_restitution(mut self, restitution: f64) -> Self {
        self.restitution = restitution;
        self
    }

    /// Set the wall friction
    pub fn with_cof(mut self, cof: f64) -> Self {
        self.cof = cof;
        self
    }

    /// World bounds
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Contacts for one body box against the bounds
    fn contacts(&self, body_box: &Aabb) -> impl Iterator<Item = (Vector2, f64)> {
        let b = &self.bounds;
        [
            (Vector2::new(-1.0, 0.0), b.min_x() - body_box.min_x()),
            (Vector2::new(1.0, 0.0), body_box.max_x() - b.max_x()),
            (Vector2::new(0.0, -1.0), b.min_y() - body_box.min_y()),
            (Vector2::new(0.0, 1.0), body_box.max_y() - b.max_y()),
        ]
        .into_iter()
        .filter(|(_, overlap)| *overlap > 0.0)
    }
}

impl Plugin for EdgeCollisionDetection {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn version(&self) -> &str {
        "1.0.0"
    }

    fn initialize(&mut self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.restitution) {
            return Err(format!("restitution {} must lie in [0, 1]", self.restitution));
        }
        if self.cof < 0.0 || !self.cof.is_finite() {
            return Err(format!("cof {} must be non-negative", self.cof));
        }
        if self.bounds.half_width() <= 0.0 || self.bounds.half_height() <= 0.0 {
            return Err("bounds must have a positive area".to_string());
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

impl Behavior for EdgeCollisionDetection {
    fn behave(&mut self, event: &WorldEvent, ctx: &mut BehaviorContext<'_>) {
        if !matches!(event, WorldEvent::IntegratePositions { .. }) {
            return;
        }

        let mut collisions = Vec::new();
        for (handle, body) in ctx.bodies().iter() {
            if body.fixed {
                continue;
            }
            let body_box = body.aabb();
            for (normal, overlap) in self.contacts(&body_box) {
                collisions.push(Collision {
                    body: handle,
                    other: CollisionTarget::Edge,
                    normal,
                    overlap,
                    restitution: self.restitution * body.restitution(),
                    cof: self.cof * body.cof(),
                });
            }
        }

        if !collisions.is_empty() {
            ctx.emit(WorldEvent::CollisionsDetected(collisions));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{Body, BodySet};
    use std::collections::VecDeque;

    fn detect(edge: &mut EdgeCollisionDetection, bodies: &mut BodySet) -> Vec<Collision> {
        let mut outbox = VecDeque::new();
        let mut ctx = BehaviorContext::new(bodies, &mut outbox, 6.0);
        edge.behave(&WorldEvent::IntegratePositions { dt: 6.0 }, &mut ctx);
        match outbox.pop_front() {
            Some(WorldEvent::CollisionsDetected(collisions)) => collisions,
            None => Vec::new(),
            Some(other) => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_body_below_floor() {
        let mut edge = EdgeCollisionDetection::new(Aabb::from_bounds(0.0, 0.0, 800.0, 400.0))
            .with_restitution(0.0);
        let mut bodies = BodySet::new();
        let handle = bodies.insert(Body::rectangle(100.0, 390.0, 40.0, 40.0));

        let collisions = detect(&mut edge, &mut bodies);
        assert_eq!(collisions.len(), 1);
        let c = collisions[0];
        assert_eq!(c.body, handle);
        assert_eq!(c.other, CollisionTarget::Edge);
        assert_eq!(c.normal, Vector2::new(0.0, 1.0));
        assert_eq!(c.overlap, 10.0);
        assert_eq!(c.restitution, 0.0);
    }

    #[test]
    fn test_corner_produces_two_contacts() {
        let mut edge = EdgeCollisionDetection::new(Aabb::from_bounds(0.0, 0.0, 800.0, 400.0));
        let mut bodies = BodySet::new();
        bodies.insert(Body::rectangle(5.0, 5.0, 40.0, 40.0));
        assert_eq!(detect(&mut edge, &mut bodies).len(), 2);
    }

    #[test]
    fn test_inside_and_fixed_bodies_ignored() {
        let mut edge = EdgeCollisionDetection::new(Aabb::from_bounds(0.0, 0.0, 800.0, 400.0));
        let mut bodies = BodySet::new();
        bodies.insert(Body::rectangle(400.0, 200.0, 40.0, 40.0));
        bodies.insert(Body::rectangle(0.0, 0.0, 40.0, 40.0).fixed(true));
        assert!(detect(&mut edge, &mut bodies).is_empty());
    }

    #[test]
    fn test_options_validation() {
        assert!(EdgeCollisionDetection::from_options(&PluginOptions::new()).is_err());

        let options = PluginOptions::new()
            .with_bounds("aabb", Aabb::from_bounds(0.0, 0.0, 10.0, 10.0))
            .with_number("restitution", 2.0);
        let mut edge = EdgeCollisionDetection::from_options(&options).unwrap();
        assert!(edge.initialize().is_err());
    }
}
