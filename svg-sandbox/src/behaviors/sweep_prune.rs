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
//! Sweep-and-prune broad phase
//!
//! Box intervals are sorted on the x axis and swept once; pairs whose x
//! intervals overlap are then checked on y. Surviving pairs are published as
//! `collisions:candidates` for a narrow phase to confirm.

use crate::body::BodyHandle;
use crate::events::{Subscriptions, Topic, WorldEvent};
use crate::math::Aabb;
use crate::plugins::{Behavior, BehaviorContext, Plugin, PluginOptions};
use std::any::Any;

/// Sweep-and-prune behavior
#[derive(Default)]
pub struct SweepPrune {
    // Scratch buffer, kept across iterations.
    intervals: Vec<(BodyHandle, Aabb, bool)>,
}

impl SweepPrune {
    /// Registered plugin name
    pub const NAME: &'static str = "sweep-prune";

    /// Create the behavior
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from options (no options are read)
    pub fn from_options(_options: &PluginOptions) -> Result<Self, String> {
        Ok(Self::new())
    }

    /// Candidate pairs for the given boxes
    ///
    /// Pairs where both bodies are fixed are skipped; nothing could move
    /// either of them.
    pub fn candidates(
        &mut self,
        boxes: impl Iterator<Item = (BodyHandle, Aabb, bool)>,
    ) -> Vec<(BodyHandle, BodyHandle)> {
        self.intervals.clear();
        self.intervals.extend(boxes);
        self.intervals
            .sort_by(|a, b| a.1.min_x().total_cmp(&b.1.min_x()));

        let mut pairs = Vec::new();
        for (i, (handle_a, box_a, fixed_a)) in self.intervals.iter().enumerate() {
            for (handle_b, box_b, fixed_b) in &self.intervals[i + 1..] {
                if box_b.min_x() > box_a.max_x() {
                    break;
                }
                if *fixed_a && *fixed_b {
                    continue;
                }
                if box_a.overlap_x(box_b) > 0.0 && box_a.overlap_y(box_b) > 0.0 {
                    pairs.push((*handle_a, *handle_b));
                }
            }
        }
        pairs
    }
}

impl Plugin for SweepPrune {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn version(&self) -> &str {
        "1.0.0"
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

impl Behavior for SweepPrune {
    fn behave(&mut self, event: &WorldEvent, ctx: &mut BehaviorContext<'_>) {
        if !matches!(event, WorldEvent::IntegratePositions { .. }) {
            return;
        }

        let pairs = self.candidates(
            ctx.bodies()
                .iter()
                .map(|(handle, body)| (handle, body.aabb(), body.fixed)),
        );
        if !pairs.is_empty() {
            ctx.emit(WorldEvent::CollisionCandidates(pairs));
        }
    }
}
