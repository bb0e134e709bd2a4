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
//! Box-box narrow phase
//!
//! By default candidate pairs come from a broad phase on
//! `collisions:candidates`. With `check_all` the behavior tests every pair
//! itself on `integrate:positions`, which is only sensible for a handful of
//! bodies.

use crate::body::{BodyHandle, BodySet};
use crate::events::{Collision, CollisionTarget, Subscriptions, Topic, WorldEvent};
use crate::plugins::{Behavior, BehaviorContext, Plugin, PluginOptions};
use std::any::Any;

use super::box_contact;

/// Body collision detection behavior
#[derive(Default)]
pub struct BodyCollisionDetection {
    check_all: bool,
}

impl BodyCollisionDetection {
    /// Registered plugin name
    pub const NAME: &'static str = "body-collision-detection";

    /// Create the behavior consuming broad-phase candidates
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the behavior testing all pairs itself
    pub fn check_all() -> Self {
        BodyCollisionDetection { check_all: true }
    }

    /// Build from options (`check_all`: flag)
    pub fn from_options(options: &PluginOptions) -> Result<Self, String> {
        Ok(BodyCollisionDetection {
            check_all: options.flag("check_all")?.unwrap_or(false),
        })
    }

    /// Whether every pair is tested
    pub fn is_check_all(&self) -> bool {
        self.check_all
    }

    fn detect(
        bodies: &BodySet,
        pairs: impl Iterator<Item = (BodyHandle, BodyHandle)>,
    ) -> Vec<Collision> {
        pairs
            .filter_map(|(a, b)| {
                let (body_a, body_b) = (bodies.get(a)?, bodies.get(b)?);
                if body_a.fixed && body_b.fixed {
                    return None;
                }
                let (normal, overlap) = box_contact(body_a, body_b)?;
                Some(Collision {
                    body: a,
                    other: CollisionTarget::Body(b),
                    normal,
                    overlap,
                    restitution: body_a.restitution() * body_b.restitution(),
                    cof: body_a.cof() * body_b.cof(),
                })
            })
            .collect()
    }
}

impl Plugin for BodyCollisionDetection {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn version(&self) -> &str {
        "1.0.0"
    }

    fn connect(&mut self, subscriptions: &mut Subscriptions) {
        if self.check_all {
            subscriptions.on(Topic::IntegratePositions);
        } else {
            subscriptions.on(Topic::CollisionCandidates);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Behavior for BodyCollisionDetection {
    fn behave(&mut self, event: &WorldEvent, ctx: &mut BehaviorContext<'_>) {
        let collisions = match event {
            WorldEvent::CollisionCandidates(pairs) => {
                Self::detect(ctx.bodies(), pairs.iter().copied())
            }
            WorldEvent::IntegratePositions { .. } if self.check_all => {
                let handles = ctx.bodies().handles();
                let all_pairs = handles.iter().enumerate().flat_map(|(i, a)| {
                    handles[i + 1..].iter().map(move |b| (*a, *b))
                });
                Self::detect(ctx.bodies(), all_pairs)
            }
            _ => return,
        };

        if !collisions.is_empty() {
            ctx.emit(WorldEvent::CollisionsDetected(collisions));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::Body;
    use crate::math::Vector2;
    use std::collections::VecDeque;

    #[test]
    fn test_candidates_confirmed() {
        let mut bodies = BodySet::new();
        let a = bodies.insert(Body::rectangle(0.0, 0.0, 40.0, 40.0).with_restitution(0.5));
        let b = bodies.insert(Body::rectangle(0.0, 30.0, 40.0, 40.0));

        let mut outbox = VecDeque::new();
        let mut detection = BodyCollisionDetection::new();
        {
            let mut ctx = BehaviorContext::new(&mut bodies, &mut outbox, 6.0);
            detection.behave(&WorldEvent::CollisionCandidates(vec![(a, b)]), &mut ctx);
        }

        match outbox.pop_front() {
            Some(WorldEvent::CollisionsDetected(collisions)) => {
                assert_eq!(collisions.len(), 1);
                assert_eq!(collisions[0].other, CollisionTarget::Body(b));
                assert_eq!(collisions[0].normal, Vector2::new(0.0, 1.0));
                assert_eq!(collisions[0].overlap, 10.0);
                assert_eq!(collisions[0].restitution, 0.5);
            }
            other => panic!("expected contacts, got {:?}", other),
        }
    }

    #[test]
    fn test_stale_candidate_ignored() {
        let mut bodies = BodySet::new();
        let a = bodies.insert(Body::rectangle(0.0, 0.0, 40.0, 40.0));
        let b = bodies.insert(Body::rectangle(0.0, 30.0, 40.0, 40.0));
        bodies.remove(b);

        let mut outbox = VecDeque::new();
        let mut detection = BodyCollisionDetection::new();
        {
            let mut ctx = BehaviorContext::new(&mut bodies, &mut outbox, 6.0);
            detection.behave(&WorldEvent::CollisionCandidates(vec![(a, b)]), &mut ctx);
        }
        assert!(outbox.is_empty());
    }

    #[test]
    fn test_check_all_subscribes_to_positions() {
        let mut detection = BodyCollisionDetection::from_options(
            &PluginOptions::new().with_flag("check_all", true),
        )
        .unwrap();
        assert!(detection.is_check_all());

        let mut subs = Subscriptions::new();
        detection.connect(&mut subs);
        assert!(subs.contains(Topic::IntegratePositions));
        assert!(!subs.contains(Topic::CollisionCandidates));

        let mut bodies = BodySet::new();
        bodies.insert(Body::rectangle(0.0, 0.0, 40.0, 40.0));
        bodies.insert(Body::rectangle(20.0, 0.0, 40.0, 40.0));
        bodies.insert(Body::rectangle(300.0, 0.0, 40.0, 40.0));

        let mut outbox = VecDeque::new();
        {
            let mut ctx = BehaviorContext::new(&mut bodies, &mut outbox, 6.0);
            detection.behave(&WorldEvent::IntegratePositions { dt: 6.0 }, &mut ctx);
        }
        assert!(matches!(
            outbox.pop_front(),
            Some(WorldEvent::CollisionsDetected(c)) if c.len() == 1
        ));
    }
}
