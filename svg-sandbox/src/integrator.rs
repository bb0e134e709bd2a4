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
//! Time integration
//!
//! The world splits every iteration into a velocity pass and a position
//! pass so behaviors can react in between (`integrate:velocities`) and after
//! (`integrate:positions`). Fixed bodies are skipped by both passes.
//!
//! # Algorithm
//!
//! [`EulerIntegrator`] is semi-implicit Euler:
//!
//! ```text
//! v(t + dt) = v(t) + a(t)*dt
//! x(t + dt) = x(t) + v(t + dt)*dt
//! ```
//!
//! Accelerations are consumed by the velocity pass and reset to zero, so
//! behaviors adding accelerations on `integrate:positions` affect the next
//! iteration.

use crate::body::BodySet;
use crate::math::Vector2;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Two-pass integrator driven by the world
pub trait Integrator: Send + Sync {
    /// Get the name of this integrator
    fn name(&self) -> &str;

    /// Advance velocities by `dt` and consume accumulated accelerations
    fn integrate_velocities(&self, bodies: &mut BodySet, dt: f64);

    /// Advance positions by `dt`, recording the previous position
    fn integrate_positions(&self, bodies: &mut BodySet, dt: f64);
}

/// Semi-implicit Euler integrator
///
/// # Example
///
/// ```
/// use svg_sandbox::integrator::{EulerIntegrator, Integrator};
/// use svg_sandbox::{Body, BodySet, Vector2};
///
/// let mut bodies = BodySet::new();
/// let h = bodies.insert(Body::rectangle(0.0, 0.0, 10.0, 10.0).with_velocity(Vector2::new(0.5, 0.0)));
///
/// let euler = EulerIntegrator;
/// euler.integrate_velocities(&mut bodies, 6.0);
/// euler.integrate_positions(&mut bodies, 6.0);
/// assert_eq!(bodies.get(h).unwrap().state.pos.x, 3.0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct EulerIntegrator;

impl Integrator for EulerIntegrator {
    fn name(&self) -> &str {
        "Semi-implicit Euler"
    }

    fn integrate_velocities(&self, bodies: &mut BodySet, dt: f64) {
        #[cfg(feature = "parallel")]
        bodies.par_iter_mut().for_each(|body| {
            if !body.fixed {
                body.state.vel += body.state.acc * dt;
            }
            body.state.acc = Vector2::zero();
        });

        #[cfg(not(feature = "parallel"))]
        for body in bodies.iter_mut() {
            if !body.fixed {
                body.state.vel += body.state.acc * dt;
            }
            body.state.acc = Vector2::zero();
        }
    }

    fn integrate_positions(&self, bodies: &mut BodySet, dt: f64) {
        #[cfg(feature = "parallel")]
        bodies
            .par_iter_mut()
            .filter(|body| !body.fixed)
            .for_each(|body| body.state.pos += body.state.vel * dt);

        #[cfg(not(feature = "parallel"))]
        for body in bodies.iter_mut().filter(|body| !body.fixed) {
            body.state.pos += body.state.vel * dt;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::Body;
    use approx::assert_relative_eq;

    #[test]
    fn test_acceleration_consumed() {
        let mut bodies = BodySet::new();
        let h = bodies.insert(Body::rectangle(0.0, 0.0, 10.0, 10.0));
        bodies.get_mut(h).unwrap().state.acc = Vector2::new(0.0, 0.0004);

        EulerIntegrator.integrate_velocities(&mut bodies, 6.0);
        let body = bodies.get(h).unwrap();
        assert_relative_eq!(body.state.vel.y, 0.0024);
        assert_eq!(body.state.acc, Vector2::zero());
    }

    #[test]
    fn test_positions_use_new_velocity() {
        let mut bodies = BodySet::new();
        let h = bodies.insert(Body::rectangle(10.0, 0.0, 10.0, 10.0));
        bodies.get_mut(h).unwrap().state.acc = Vector2::new(0.1, 0.0);

        EulerIntegrator.integrate_velocities(&mut bodies, 2.0);
        EulerIntegrator.integrate_positions(&mut bodies, 2.0);

        let body = bodies.get(h).unwrap();
        assert_relative_eq!(body.state.pos.x, 10.4);
        assert_relative_eq!(body.state.vel.x, 0.2);
    }

    #[test]
    fn test_fixed_bodies_skipped() {
        let mut bodies = BodySet::new();
        let h = bodies.insert(
            Body::rectangle(10.0, 10.0, 10.0, 10.0)
                .with_velocity(Vector2::new(1.0, 1.0))
                .fixed(true),
        );
        bodies.get_mut(h).unwrap().state.acc = Vector2::new(1.0, 1.0);

        EulerIntegrator.integrate_velocities(&mut bodies, 6.0);
        EulerIntegrator.integrate_positions(&mut bodies, 6.0);

        let body = bodies.get(h).unwrap();
        assert_eq!(body.state.pos, Vector2::new(10.0, 10.0));
        assert_eq!(body.state.vel, Vector2::new(1.0, 1.0));
        assert_eq!(body.state.acc, Vector2::zero());
    }
}
