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
//! Collision response
//!
//! For every detected contact the bodies are first pushed apart along the
//! contact normal, in proportion to their inverse masses, then a normal
//! impulse cancels the approaching velocity (scaled by restitution) and a
//! friction impulse, capped by the Coulomb limit, damps the sliding
//! velocity. Walls and fixed bodies have zero inverse mass.

use crate::body::BodySet;
use crate::events::{Collision, CollisionTarget, Subscriptions, Topic, WorldEvent};
use crate::math::Vector2;
use crate::plugins::{Behavior, BehaviorContext, Plugin, PluginOptions};
use std::any::Any;

/// Impulse response behavior
#[derive(Default)]
pub struct BodyImpulseResponse;

/// Velocity changes for the two sides of a contact
#[derive(Debug, Clone, Copy, PartialEq)]
struct Impulse {
    delta_a: Vector2,
    delta_b: Vector2,
}

impl BodyImpulseResponse {
    /// Registered plugin name
    pub const NAME: &'static str = "body-impulse-response";

    /// Create the behavior
    pub fn new() -> Self {
        BodyImpulseResponse
    }

    /// Build from options (no options are read)
    pub fn from_options(_options: &PluginOptions) -> Result<Self, String> {
        Ok(Self::new())
    }

    /// Resolve a batch of contacts in order
    pub fn resolve(&self, bodies: &mut BodySet, collisions: &[Collision]) {
        for collision in collisions {
            self.resolve_one(bodies, collision);
        }
    }

    fn resolve_one(&self, bodies: &mut BodySet, c: &Collision) {
        let (inv_a, vel_a) = match bodies.get(c.body) {
            Some(body) => (body.inverse_mass(), body.state.vel),
            None => return,
        };
        let (inv_b, vel_b) = match c.other {
            CollisionTarget::Body(other) => match bodies.get(other) {
                Some(body) => (body.inverse_mass(), body.state.vel),
                None => return,
            },
            CollisionTarget::Edge => (0.0, Vector2::zero()),
        };

        let inv_sum = inv_a + inv_b;
        if inv_sum <= 0.0 {
            return;
        }

        let correction = c.normal * (c.overlap / inv_sum);
        let impulse = Self::impulse(c, inv_a, inv_b, vel_b - vel_a);

        if let Some(body) = bodies.get_mut(c.body) {
            body.state.pos -= correction * inv_a;
            body.state.vel += impulse.delta_a;
        }
        if let CollisionTarget::Body(other) = c.other {
            if let Some(body) = bodies.get_mut(other) {
                body.state.pos += correction * inv_b;
                body.state.vel += impulse.delta_b;
            }
        }
    }

    fn impulse(c: &Collision, inv_a: f64, inv_b: f64, vrel: Vector2) -> Impulse {
        let inv_sum = inv_a + inv_b;
        let vn = vrel.dot(c.normal);

        // Separating already
        if vn >= 0.0 {
            return Impulse {
                delta_a: Vector2::zero(),
                delta_b: Vector2::zero(),
            };
        }

        let j = -(1.0 + c.restitution) * vn / inv_sum;
        let mut delta_a = c.normal * (-j * inv_a);
        let mut delta_b = c.normal * (j * inv_b);

        let tangent = (vrel - c.normal * vn).normalize();
        let max_friction = c.cof * j;
        let jt = (-vrel.dot(tangent) / inv_sum).clamp(-max_friction, max_friction);
        delta_a -= tangent * (jt * inv_a);
        delta_b += tangent * (jt * inv_b);

        Impulse { delta_a, delta_b }
    }
}

impl Plugin for BodyImpulseResponse {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn version(&self) -> &str {
        "1.0.0"
    }

    fn connect(&mut self, subscriptions: &mut Subscriptions) {
        subscriptions.on(Topic::CollisionsDetected);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Behavior for BodyImpulseResponse {
    fn behave(&mut self, event: &WorldEvent, ctx: &mut BehaviorContext<'_>) {
        if let WorldEvent::CollisionsDetected(collisions) = event {
            self.resolve(ctx.bodies_mut(), collisions);
        }
    }
}
