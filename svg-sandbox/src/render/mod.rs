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
//! Rendering support
//!
//! Renderers implement [`crate::plugins::Renderer`]. This module holds the
//! types shared between the world and renderers plus the SVG backend:
//!
//! - [`surface`]: a minimal SVG document (root element with `<rect>` children)
//! - [`svg`]: the `svg` renderer plugin drawing bodies onto a surface

pub mod surface;
pub mod svg;

pub use surface::{RectElement, SvgSurface};
pub use svg::{SvgRenderer, SvgRendererOptions};

use crate::body::BodyHandle;
use std::fmt;

/// Identifier of a drawable element owned by a renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(u64);

impl ViewId {
    /// Create a view id from a raw value
    pub fn new(raw: u64) -> Self {
        ViewId(raw)
    }

    /// Raw value
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "View({})", self.0)
    }
}

/// Argument of `attach`/`detach`: either an element directly, or a body
/// event carrying the body's view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachTarget {
    /// A view element
    Element(ViewId),
    /// A body add/remove event
    Event {
        /// Body the event refers to
        body: BodyHandle,
        /// View carried by the body, if it has one
        view: Option<ViewId>,
    },
}

impl AttachTarget {
    /// Resolve the target to a view, if any
    pub fn view(&self) -> Option<ViewId> {
        match self {
            AttachTarget::Element(view) => Some(*view),
            AttachTarget::Event { view, .. } => *view,
        }
    }
}

/// Frame statistics handed to `draw_meta`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RenderMeta {
    /// Whether meta drawing is requested at all
    pub enabled: bool,
    /// Frames per second derived from the last step interval
    pub fps: f64,
    /// Iterations run by the last step
    pub ipf: u32,
    /// Number of bodies in the world
    pub body_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attach_target_view() {
        let view = ViewId::new(3);
        assert_eq!(AttachTarget::Element(view).view(), Some(view));

        let mut bodies = crate::body::BodySet::new();
        let body = bodies.insert(crate::body::Body::rectangle(0.0, 0.0, 1.0, 1.0));
        assert_eq!(AttachTarget::Event { body, view: None }.view(), None);
        assert_eq!(view.to_string(), "View(3)");
    }
}
