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
//! Rigid boxes and their storage
//!
//! A [`Body`] is an axis-aligned rectangle centered on its position. Bodies
//! are owned by a [`BodySet`] and referenced through generational
//! [`BodyHandle`]s so that a handle to a removed body can never alias a body
//! inserted later into the same slot.

use crate::math::{Aabb, Vector2};
use crate::render::ViewId;
use std::fmt;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Default body mass
pub const DEFAULT_MASS: f64 = 1.0;

/// Default coefficient of restitution
pub const DEFAULT_RESTITUTION: f64 = 1.0;

/// Default coefficient of friction
pub const DEFAULT_COF: f64 = 0.8;

/// Generational reference to a body in a [`BodySet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle {
    index: u32,
    generation: u32,
}

impl BodyHandle {
    /// Slot index
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Generation of the slot when the handle was issued
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for BodyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Body({}, gen: {})", self.index, self.generation)
    }
}

/// Rectangle geometry, centered on the body position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    /// Full width
    pub width: f64,
    /// Full height
    pub height: f64,
}

/// Kinematic state of a body
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BodyState {
    /// Center position
    pub pos: Vector2,
    /// Velocity in px/ms
    pub vel: Vector2,
    /// Acceleration accumulated for the next velocity pass, px/ms²
    pub acc: Vector2,
}

/// Presentation hints attached to a body
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BodyStyle {
    /// Preferred fill color, if any
    pub color: Option<String>,
}

/// A simulated axis-aligned rigid box
///
/// # Examples
///
/// ```
/// use svg_sandbox::{Body, Vector2};
///
/// let body = Body::rectangle(100.0, 100.0, 40.0, 40.0).with_color("#FF0000");
/// assert!(body.contains_point(Vector2::new(110.0, 90.0)));
/// assert!(!body.fixed);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    /// Position, velocity and acceleration
    pub state: BodyState,
    /// Fixed bodies are skipped by integration and never pushed by collisions
    pub fixed: bool,
    /// Hidden bodies keep their view but are not drawn
    pub hidden: bool,
    /// Renderer view attached to this body
    pub view: Option<ViewId>,
    geometry: Rectangle,
    mass: f64,
    restitution: f64,
    cof: f64,
    style: BodyStyle,
}

impl Body {
    /// Create a free rectangle centered at `(x, y)`
    pub fn rectangle(x: f64, y: f64, width: f64, height: f64) -> Self {
        Body {
            state: BodyState {
                pos: Vector2::new(x, y),
                ..BodyState::default()
            },
            fixed: false,
            hidden: false,
            view: None,
            geometry: Rectangle {
                width: width.abs(),
                height: height.abs(),
            },
            mass: DEFAULT_MASS,
            restitution: DEFAULT_RESTITUTION,
            cof: DEFAULT_COF,
            style: BodyStyle::default(),
        }
    }

    /// Set the mass (non-positive or non-finite values are ignored)
    pub fn with_mass(mut self, mass: f64) -> Self {
        if mass > 0.0 && mass.is_finite() {
            self.mass = mass;
        }
        self
    }

    /// Set the coefficient of restitution, clamped to `[0, 1]`
    pub fn with_restitution(mut self, restitution: f64) -> Self {
        self.restitution = restitution.clamp(0.0, 1.0);
        self
    }

    /// Set the coefficient of friction (negative values clamp to zero)
    pub fn with_cof(mut self, cof: f64) -> Self {
        self.cof = cof.max(0.0);
        self
    }

    /// Set the preferred fill color
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.style.color = Some(color.into());
        self
    }

    /// Set the initial velocity
    pub fn with_velocity(mut self, vel: Vector2) -> Self {
        self.state.vel = vel;
        self
    }

    /// Create the body already fixed in place
    pub fn fixed(mut self, fixed: bool) -> Self {
        self.fixed = fixed;
        self
    }

    /// Rectangle geometry
    pub fn geometry(&self) -> &Rectangle {
        &self.geometry
    }

    /// Presentation hints
    pub fn style(&self) -> &BodyStyle {
        &self.style
    }

    /// Mass
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Inverse mass, zero while the body is fixed
    pub fn inverse_mass(&self) -> f64 {
        if self.fixed {
            0.0
        } else {
            1.0 / self.mass
        }
    }

    /// Coefficient of restitution
    pub fn restitution(&self) -> f64 {
        self.restitution
    }

    /// Coefficient of friction
    pub fn cof(&self) -> f64 {
        self.cof
    }

    /// World-space bounding box
    pub fn aabb(&self) -> Aabb {
        Aabb::new(
            self.state.pos,
            self.geometry.width * 0.5,
            self.geometry.height * 0.5,
        )
    }

    /// Check if a world-space point lies on the body
    pub fn contains_point(&self, point: Vector2) -> bool {
        self.aabb().contains(point)
    }
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    body: Option<Body>,
}

/// Generational storage for bodies
///
/// Iteration through [`BodySet::iter`] follows insertion order, which is
/// also the order in which point queries resolve overlapping bodies.
#[derive(Debug, Default)]
pub struct BodySet {
    slots: Vec<Slot>,
    free: Vec<u32>,
    order: Vec<BodyHandle>,
}

impl BodySet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a body and return its handle
    pub fn insert(&mut self, body: Body) -> BodyHandle {
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                self.slots.push(Slot::default());
                (self.slots.len() - 1) as u32
            }
        };

        let slot = &mut self.slots[index as usize];
        slot.body = Some(body);
        let handle = BodyHandle {
            index,
            generation: slot.generation,
        };
        self.order.push(handle);
        handle
    }

    /// Remove a body, invalidating its handle
    ///
    /// Returns `None` if the handle is stale or unknown.
    pub fn remove(&mut self, handle: BodyHandle) -> Option<Body> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        let body = slot.body.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.order.retain(|h| *h != handle);
        Some(body)
    }

    /// Look up a body
    pub fn get(&self, handle: BodyHandle) -> Option<&Body> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.body.as_ref())
    }

    /// Look up a body mutably
    pub fn get_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.body.as_mut())
    }

    /// Check if the handle refers to a live body
    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.get(handle).is_some()
    }

    /// Number of live bodies
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if the set is empty
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Handles of all live bodies in insertion order
    pub fn handles(&self) -> &[BodyHandle] {
        &self.order
    }

    /// Iterate over live bodies in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (BodyHandle, &Body)> + '_ {
        self.order
            .iter()
            .filter_map(move |handle| self.get(*handle).map(|body| (*handle, body)))
    }

    /// Iterate mutably over live bodies in storage order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Body> + '_ {
        self.slots.iter_mut().filter_map(|slot| slot.body.as_mut())
    }

    /// Parallel mutable iteration over live bodies
    #[cfg(feature = "parallel")]
    pub fn par_iter_mut(&mut self) -> impl ParallelIterator<Item = &mut Body> + '_ {
        self.slots.par_iter_mut().filter_map(|slot| slot.body.as_mut())
    }

    /// Find the first body (in insertion order) containing the point
    pub fn find_one_at(&self, point: Vector2) -> Option<BodyHandle> {
        self.iter()
            .find(|(_, body)| body.contains_point(point))
            .map(|(handle, _)| handle)
    }
}
