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
//! World topics and event payloads
//!
//! Plugins subscribe to [`Topic`]s when they connect to a world. The world
//! delivers a [`WorldEvent`] to every subscriber of its topic, in connection
//! order. Events a plugin emits while handling another event are queued and
//! delivered once the current event has reached all of its subscribers.

use crate::body::BodyHandle;
use crate::math::Vector2;
use crate::render::ViewId;
use std::collections::BTreeSet;
use std::fmt;

/// Named world topics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Topic {
    /// A body was added
    AddBody,
    /// A body was removed
    RemoveBody,
    /// Velocities were integrated for one iteration
    IntegrateVelocities,
    /// Positions were integrated for one iteration
    IntegratePositions,
    /// Broad phase produced candidate pairs
    CollisionCandidates,
    /// Narrow phase produced contacts
    CollisionsDetected,
    /// A call to `World::step` finished
    Step,
}

impl Topic {
    /// Wire name of the topic
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::AddBody => "add:body",
            Topic::RemoveBody => "remove:body",
            Topic::IntegrateVelocities => "integrate:velocities",
            Topic::IntegratePositions => "integrate:positions",
            Topic::CollisionCandidates => "collisions:candidates",
            Topic::CollisionsDetected => "collisions:detected",
            Topic::Step => "step",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the first body of a [`Collision`] touched
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollisionTarget {
    /// Another body
    Body(BodyHandle),
    /// The world boundary, which never moves
    Edge,
}

/// A contact between a body and another body or the world edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision {
    /// First body
    pub body: BodyHandle,
    /// What the first body touched
    pub other: CollisionTarget,
    /// Unit contact normal pointing from `body` towards `other`
    pub normal: Vector2,
    /// Penetration depth along the normal
    pub overlap: f64,
    /// Combined coefficient of restitution
    pub restitution: f64,
    /// Combined coefficient of friction
    pub cof: f64,
}

/// Event payloads delivered to subscribers
#[derive(Debug, Clone, PartialEq)]
pub enum WorldEvent {
    /// A body was inserted; it is present in the body set
    AddBody {
        /// The new body
        body: BodyHandle,
    },
    /// A body was taken out of the body set
    RemoveBody {
        /// The removed (now stale) handle
        body: BodyHandle,
        /// The view the body carried when it was removed
        view: Option<ViewId>,
    },
    /// Velocity pass finished
    IntegrateVelocities {
        /// Iteration timestep in ms
        dt: f64,
    },
    /// Position pass finished
    IntegratePositions {
        /// Iteration timestep in ms
        dt: f64,
    },
    /// Broad-phase candidate pairs
    CollisionCandidates(Vec<(BodyHandle, BodyHandle)>),
    /// Narrow-phase contacts
    CollisionsDetected(Vec<Collision>),
    /// End of a `World::step` call
    Step {
        /// Host time passed to `step`, in ms
        time: f64,
    },
}

impl WorldEvent {
    /// Topic this event is published on
    pub fn topic(&self) -> Topic {
        match self {
            WorldEvent::AddBody { .. } => Topic::AddBody,
            WorldEvent::RemoveBody { .. } => Topic::RemoveBody,
            WorldEvent::IntegrateVelocities { .. } => Topic::IntegrateVelocities,
            WorldEvent::IntegratePositions { .. } => Topic::IntegratePositions,
            WorldEvent::CollisionCandidates(_) => Topic::CollisionCandidates,
            WorldEvent::CollisionsDetected(_) => Topic::CollisionsDetected,
            WorldEvent::Step { .. } => Topic::Step,
        }
    }
}

/// Topics a single plugin listens to
///
/// Filled in by `Plugin::connect` and emptied by `Plugin::disconnect`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subscriptions {
    topics: BTreeSet<Topic>,
}

impl Subscriptions {
    /// Create an empty subscription set
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to a topic
    pub fn on(&mut self, topic: Topic) {
        self.topics.insert(topic);
    }

    /// Unsubscribe from a topic
    pub fn off(&mut self, topic: Topic) {
        self.topics.remove(&topic);
    }

    /// Unsubscribe from everything
    pub fn clear(&mut self) {
        self.topics.clear();
    }

    /// Check if the topic is subscribed
    pub fn contains(&self, topic: Topic) -> bool {
        self.topics.contains(&topic)
    }

    /// Check if nothing is subscribed
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Subscribed topics in a stable order
    pub fn topics(&self) -> impl Iterator<Item = Topic> + '_ {
        self.topics.iter().copied()
    }
}
