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
//! Built-in behaviors
//!
//! | Name                       | Topic                     | Effect                              |
//! |----------------------------|---------------------------|-------------------------------------|
//! | `constant-acceleration`    | `integrate:positions`     | adds a uniform acceleration         |
//! | `demo-mouse-events`        | `integrate:positions`     | drags the grabbed body              |
//! | `edge-collision-detection` | `integrate:positions`     | contacts with the world bounds      |
//! | `sweep-prune`              | `integrate:positions`     | broad-phase candidate pairs         |
//! | `body-collision-detection` | `collisions:candidates`   | box-box contacts                    |
//! | `body-impulse-response`    | `collisions:detected`     | separation and impulses             |
//! | `verlet-constraints`       | `integrate:positions`     | distance constraints                |
//!
//! Bodies are axis-aligned boxes without rotation, so the collision
//! behaviors work on bounding boxes directly.

pub mod body_collision;
pub mod constant_acceleration;
pub mod edge_collision;
pub mod impulse_response;
pub mod pointer_drag;
pub mod sweep_prune;
pub mod verlet_constraints;

pub use body_collision::BodyCollisionDetection;
pub use constant_acceleration::ConstantAcceleration;
pub use edge_collision::EdgeCollisionDetection;
pub use impulse_response::BodyImpulseResponse;
pub use pointer_drag::{PointerDrag, PointerDragOptions, PointerState};
pub use sweep_prune::SweepPrune;
pub use verlet_constraints::{DistanceConstraint, VerletConstraints};

use crate::body::Body;
use crate::math::Vector2;

/// Contact between two boxes as (normal from `a` to `b`, penetration depth)
///
/// Resolves along the axis of least penetration. Returns `None` when the
/// boxes do not overlap.
pub(crate) fn box_contact(a: &Body, b: &Body) -> Option<(Vector2, f64)> {
    let box_a = a.aabb();
    let box_b = b.aabb();
    let overlap_x = box_a.overlap_x(&box_b);
    let overlap_y = box_a.overlap_y(&box_b);
    if overlap_x <= 0.0 || overlap_y <= 0.0 {
        return None;
    }

    let delta = box_b.center() - box_a.center();
    if overlap_x < overlap_y {
        let sign = if delta.x < 0.0 { -1.0 } else { 1.0 };
        Some((Vector2::new(sign, 0.0), overlap_x))
    } else {
        let sign = if delta.y < 0.0 { -1.0 } else { 1.0 };
        Some((Vector2::new(0.0, sign), overlap_y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_contact_least_axis() {
        let a = Body::rectangle(0.0, 0.0, 40.0, 40.0);
        let b = Body::rectangle(30.0, 5.0, 40.0, 40.0);
        let (normal, depth) = box_contact(&a, &b).unwrap();
        assert_eq!(normal, Vector2::new(1.0, 0.0));
        assert_eq!(depth, 10.0);

        let below = Body::rectangle(2.0, 35.0, 40.0, 40.0);
        let (normal, depth) = box_contact(&a, &below).unwrap();
        assert_eq!(normal, Vector2::new(0.0, 1.0));
        assert_eq!(depth, 5.0);
    }

    #[test]
    fn test_box_contact_apart() {
        let a = Body::rectangle(0.0, 0.0, 40.0, 40.0);
        let b = Body::rectangle(40.0, 0.0, 40.0, 40.0);
        assert!(box_contact(&a, &b).is_none());
    }
}
