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
//! Pointer events delivered by the hosting environment
//!
//! Hosts report page-relative coordinates. Consumers convert them to
//! element-relative coordinates with the element's [`ElementOffset`].

use crate::math::Vector2;

/// Phase of a pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    /// Button pressed
    Down,
    /// Pointer moved
    Move,
    /// Button released
    Up,
}

/// Pointer event with page-relative coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Event phase
    pub kind: PointerKind,
    /// Page x coordinate
    pub page_x: f64,
    /// Page y coordinate
    pub page_y: f64,
}

impl PointerEvent {
    /// Create an event
    pub fn new(kind: PointerKind, page_x: f64, page_y: f64) -> Self {
        PointerEvent {
            kind,
            page_x,
            page_y,
        }
    }

    /// Button-press event
    pub fn down(page_x: f64, page_y: f64) -> Self {
        Self::new(PointerKind::Down, page_x, page_y)
    }

    /// Move event
    pub fn moved(page_x: f64, page_y: f64) -> Self {
        Self::new(PointerKind::Move, page_x, page_y)
    }

    /// Button-release event
    pub fn up(page_x: f64, page_y: f64) -> Self {
        Self::new(PointerKind::Up, page_x, page_y)
    }

    /// Position relative to an element's top-left corner
    pub fn local_position(&self, offset: &ElementOffset) -> Vector2 {
        offset.to_local(self.page_x, self.page_y)
    }
}

/// Top-left corner of the drawing element in page coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ElementOffset {
    /// Page x of the element's left edge
    pub left: f64,
    /// Page y of the element's top edge
    pub top: f64,
}

impl ElementOffset {
    /// Create an offset
    pub fn new(left: f64, top: f64) -> Self {
        ElementOffset { left, top }
    }

    /// Convert page coordinates to element coordinates
    pub fn to_local(&self, page_x: f64, page_y: f64) -> Vector2 {
        Vector2::new(page_x - self.left, page_y - self.top)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_position() {
        let offset = ElementOffset::new(8.0, 16.0);
        let event = PointerEvent::down(108.0, 116.0);
        assert_eq!(event.kind, PointerKind::Down);
        assert_eq!(event.local_position(&offset), Vector2::new(100.0, 100.0));
        assert_eq!(
            PointerEvent::moved(1.0, 2.0).local_position(&ElementOffset::default()),
            Vector2::new(1.0, 2.0)
        );
    }
}
