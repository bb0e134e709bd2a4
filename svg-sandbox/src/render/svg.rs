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
//! SVG renderer, registered as `svg`
//!
//! Each body is drawn as one fixed-size `<rect>` on an [`SvgSurface`].
//! Views are appended when created, re-appended on `add:body` and removed on
//! `remove:body`. Drawing copies the body position into the `x`/`y`
//! attributes unchanged.

use super::surface::SvgSurface;
use super::{AttachTarget, RenderMeta, ViewId};
use crate::body::{Body, BodyStyle, Rectangle};
use crate::events::{Subscriptions, Topic};
use crate::plugins::{Plugin, PluginOptions, Renderer};
use log::debug;
use std::any::Any;

/// Default surface width, px
pub const DEFAULT_WIDTH: f64 = 800.0;

/// Default surface height, px
pub const DEFAULT_HEIGHT: f64 = 400.0;

/// Side length of every view, px
pub const DEFAULT_VIEW_SIZE: f64 = 40.0;

/// Fill color of every view
pub const DEFAULT_FILL: &str = "#87ceeb";

/// Options for [`SvgRenderer`]
#[derive(Debug, Clone, PartialEq)]
pub struct SvgRendererOptions {
    /// Container width, px
    pub width: f64,
    /// Container height, px
    pub height: f64,
    /// Side length of the `<rect>` views, px
    pub view_size: f64,
    /// Fill color of the views
    pub fill: String,
    /// Whether frame statistics are requested
    pub meta: bool,
}

impl Default for SvgRendererOptions {
    fn default() -> Self {
        SvgRendererOptions {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            view_size: DEFAULT_VIEW_SIZE,
            fill: DEFAULT_FILL.to_string(),
            meta: false,
        }
    }
}

/// SVG renderer
///
/// # Example
///
/// ```rust
/// use svg_sandbox::render::{AttachTarget, SvgRenderer, SvgRendererOptions};
/// use svg_sandbox::plugins::Renderer;
/// use svg_sandbox::Body;
///
/// let mut svg = SvgRenderer::new(SvgRendererOptions::default());
/// let body = Body::rectangle(100.0, 100.0, 40.0, 40.0);
/// let view = svg.create_view(body.geometry(), body.style());
/// svg.draw_body(&body, view);
///
/// assert!(svg.markup().contains("x=\"100\" y=\"100\""));
/// svg.detach(AttachTarget::Element(view));
/// assert_eq!(svg.surface().child_count(), 0);
/// ```
#[derive(Debug)]
pub struct SvgRenderer {
    options: SvgRendererOptions,
    surface: SvgSurface,
}

impl SvgRenderer {
    /// Registered plugin name
    pub const NAME: &'static str = "svg";

    /// Create the renderer and its surface
    pub fn new(options: SvgRendererOptions) -> Self {
        let surface = SvgSurface::new(options.width, options.height);
        SvgRenderer { options, surface }
    }

    /// Build from options
    ///
    /// Recognized keys: `width`, `height`, `view_size` (numbers), `fill`
    /// (text), `meta` (flag).
    pub fn from_options(options: &PluginOptions) -> Result<Self, String> {
        let mut svg = SvgRendererOptions::default();
        if let Some(width) = options.number("width")? {
            svg.width = width;
        }
        if let Some(height) = options.number("height")? {
            svg.height = height;
        }
        if let Some(size) = options.number("view_size")? {
            svg.view_size = size;
        }
        if let Some(fill) = options.text("fill")? {
            svg.fill = fill;
        }
        if let Some(meta) = options.flag("meta")? {
            svg.meta = meta;
        }
        Ok(Self::new(svg))
    }

    /// Renderer options
    pub fn options(&self) -> &SvgRendererOptions {
        &self.options
    }

    /// Drawing surface
    pub fn surface(&self) -> &SvgSurface {
        &self.surface
    }

    /// Serialized SVG document
    pub fn markup(&self) -> String {
        self.surface.to_markup()
    }
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self::new(SvgRendererOptions::default())
    }
}

impl Plugin for SvgRenderer {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn version(&self) -> &str {
        "1.0.0"
    }

    fn initialize(&mut self) -> Result<(), String> {
        let SvgRendererOptions {
            width,
            height,
            view_size,
            ..
        } = self.options;
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            return Err(format!("surface size {}x{} must be positive", width, height));
        }
        if !(view_size > 0.0 && view_size.is_finite()) {
            return Err(format!("view size {} must be positive", view_size));
        }
        Ok(())
    }

    fn connect(&mut self, subscriptions: &mut Subscriptions) {
        subscriptions.on(Topic::AddBody);
        subscriptions.on(Topic::RemoveBody);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Renderer for SvgRenderer {
    fn create_view(&mut self, _geometry: &Rectangle, _style: &BodyStyle) -> ViewId {
        let size = format!("{}px", self.options.view_size);
        let view = self.surface.create_rect(&size, &size, &self.options.fill);
        self.surface.append_child(view);
        debug!("created {}", view);
        view
    }

    fn has_view(&self, view: ViewId) -> bool {
        self.surface.owns(view)
    }

    fn attach(&mut self, target: AttachTarget) {
        if let Some(view) = target.view() {
            self.surface.append_child(view);
        }
    }

    fn detach(&mut self, target: AttachTarget) {
        if let Some(view) = target.view() {
            self.surface.remove_child(view);
        }
    }

    fn draw_body(&mut self, body: &Body, view: ViewId) {
        if let Some(rect) = self.surface.element_mut(view) {
            let pos = body.state.pos;
            rect.set_attribute("x", pos.x.to_string());
            rect.set_attribute("y", pos.y.to_string());
        }
    }

    fn meta_enabled(&self) -> bool {
        self.options.meta
    }

    fn draw_meta(&mut self, meta: &RenderMeta) {
        self.surface
            .set_root_attribute("data-fps", format!("{}", meta.fps.round()));
        self.surface.set_root_attribute("data-ipf", meta.ipf.to_string());
        self.surface
            .set_root_attribute("data-bodies", meta.body_count.to_string());
    }

    fn release_view(&mut self, view: ViewId) {
        if self.surface.discard(view).is_some() {
            debug!("discarded {}", view);
        }
    }
}
