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
//! 2D vector and axis-aligned bounding box primitives
//!
//! All quantities use screen conventions: x grows to the right, y grows
//! downwards, lengths are in pixels and times in milliseconds.

use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// 2D vector with double-precision components
///
/// # Examples
///
/// ```
/// use svg_sandbox::Vector2;
///
/// let v = Vector2::new(3.0, 4.0);
/// assert_eq!(v.length(), 5.0);
/// assert_eq!(v - Vector2::new(1.0, 1.0), Vector2::new(2.0, 3.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2 {
    /// Horizontal component
    pub x: f64,
    /// Vertical component (positive is down)
    pub y: f64,
}

impl Vector2 {
    /// Create a new vector
    pub const fn new(x: f64, y: f64) -> Self {
        Vector2 { x, y }
    }

    /// The zero vector
    pub const fn zero() -> Self {
        Vector2::new(0.0, 0.0)
    }

    /// Dot product
    pub fn dot(&self, other: Vector2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Squared length
    pub fn length_squared(&self) -> f64 {
        self.dot(*self)
    }

    /// Euclidean length
    pub fn length(&self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Unit vector in the same direction, or zero for a (near) zero vector
    pub fn normalize(&self) -> Vector2 {
        let len = self.length();
        if len > 1e-12 {
            Vector2::new(self.x / len, self.y / len)
        } else {
            Vector2::zero()
        }
    }

    /// Clamp each component independently into `[min, max]`
    pub fn clamp(&self, min: Vector2, max: Vector2) -> Vector2 {
        Vector2::new(self.x.max(min.x).min(max.x), self.y.max(min.y).min(max.y))
    }

    /// Check if both components are finite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vector2 {
    type Output = Vector2;
    fn add(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector2 {
    type Output = Vector2;
    fn sub(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vector2 {
    type Output = Vector2;
    fn mul(self, rhs: f64) -> Vector2 {
        Vector2::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vector2 {
    type Output = Vector2;
    fn neg(self) -> Vector2 {
        Vector2::new(-self.x, -self.y)
    }
}

impl AddAssign for Vector2 {
    fn add_assign(&mut self, rhs: Vector2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl SubAssign for Vector2 {
    fn sub_assign(&mut self, rhs: Vector2) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl MulAssign<f64> for Vector2 {
    fn mul_assign(&mut self, rhs: f64) {
        self.x *= rhs;
        self.y *= rhs;
    }
}

/// Axis-aligned bounding box stored as a center and half extents
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    center: Vector2,
    half_width: f64,
    half_height: f64,
}

impl Aabb {
    /// Create a box from its center and half extents
    pub fn new(center: Vector2, half_width: f64, half_height: f64) -> Self {
        Aabb {
            center,
            half_width: half_width.abs(),
            half_height: half_height.abs(),
        }
    }

    /// Create a box from two corner coordinates
    ///
    /// # Examples
    ///
    /// ```
    /// use svg_sandbox::Aabb;
    ///
    /// let bounds = Aabb::from_bounds(0.0, 0.0, 800.0, 400.0);
    /// assert_eq!(bounds.max_x(), 800.0);
    /// assert_eq!(bounds.center().y, 200.0);
    /// ```
    pub fn from_bounds(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Aabb::new(
            Vector2::new((min_x + max_x) * 0.5, (min_y + max_y) * 0.5),
            (max_x - min_x) * 0.5,
            (max_y - min_y) * 0.5,
        )
    }

    /// Center point
    pub fn center(&self) -> Vector2 {
        self.center
    }

    /// Half of the width
    pub fn half_width(&self) -> f64 {
        self.half_width
    }

    /// Half of the height
    pub fn half_height(&self) -> f64 {
        self.half_height
    }

    /// Left edge
    pub fn min_x(&self) -> f64 {
        self.center.x - self.half_width
    }

    /// Right edge
    pub fn max_x(&self) -> f64 {
        self.center.x + self.half_width
    }

    /// Top edge
    pub fn min_y(&self) -> f64 {
        self.center.y - self.half_height
    }

    /// Bottom edge
    pub fn max_y(&self) -> f64 {
        self.center.y + self.half_height
    }

    /// Check if a point lies inside the box (edges included)
    pub fn contains(&self, point: Vector2) -> bool {
        (point.x - self.center.x).abs() <= self.half_width
            && (point.y - self.center.y).abs() <= self.half_height
    }

    /// Check if two boxes overlap with a non-zero area
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.overlap_x(other) > 0.0 && self.overlap_y(other) > 0.0
    }

    /// Length of the shared interval on the x axis (negative when apart)
    pub fn overlap_x(&self, other: &Aabb) -> f64 {
        self.max_x().min(other.max_x()) - self.min_x().max(other.min_x())
    }

    /// Length of the shared interval on the y axis (negative when apart)
    pub fn overlap_y(&self, other: &Aabb) -> f64 {
        self.max_y().min(other.max_y()) - self.min_y().max(other.min_y())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_arithmetic() {
        let a = Vector2::new(1.0, 2.0);
        let b = Vector2::new(3.0, -1.0);
        assert_eq!(a + b, Vector2::new(4.0, 1.0));
        assert_eq!(a - b, Vector2::new(-2.0, 3.0));
        assert_eq!(a * 2.0, Vector2::new(2.0, 4.0));
        assert_eq!(-a, Vector2::new(-1.0, -2.0));
        assert_eq!(a.dot(b), 1.0);

        let mut c = a;
        c += b;
        c -= Vector2::new(1.0, 1.0);
        c *= 0.5;
        assert_eq!(c, Vector2::new(1.5, 0.0));
    }

    #[test]
    fn test_normalize_zero_vector() {
        assert_eq!(Vector2::zero().normalize(), Vector2::zero());
        let n = Vector2::new(0.0, -5.0).normalize();
        assert_eq!(n, Vector2::new(0.0, -1.0));
    }

    #[test]
    fn test_clamp_each_axis() {
        let min = Vector2::new(-1.0, -1.0);
        let max = Vector2::new(1.0, 1.0);
        assert_eq!(Vector2::new(5.0, -3.0).clamp(min, max), Vector2::new(1.0, -1.0));
        assert_eq!(Vector2::new(0.25, -0.5).clamp(min, max), Vector2::new(0.25, -0.5));
    }

    #[test]
    fn test_aabb_contains_edges() {
        let b = Aabb::new(Vector2::new(100.0, 100.0), 20.0, 20.0);
        assert!(b.contains(Vector2::new(100.0, 100.0)));
        assert!(b.contains(Vector2::new(120.0, 80.0)));
        assert!(!b.contains(Vector2::new(120.1, 100.0)));
    }

    #[test]
    fn test_aabb_overlap() {
        let a = Aabb::new(Vector2::new(0.0, 0.0), 10.0, 10.0);
        let b = Aabb::new(Vector2::new(15.0, 5.0), 10.0, 10.0);
        let touching = Aabb::new(Vector2::new(20.0, 0.0), 10.0, 10.0);
        assert!(a.overlaps(&b));
        assert_eq!(a.overlap_x(&b), 5.0);
        assert_eq!(a.overlap_y(&b), 15.0);
        assert!(!a.overlaps(&touching));
    }
}
