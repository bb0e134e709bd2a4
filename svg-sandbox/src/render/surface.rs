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
//! Minimal SVG document
//!
//! An [`SvgSurface`] is the root `<svg>` element. It owns every `<rect>`
//! created through it, but only the attached ones (its children) are part
//! of the document. Detached elements keep their attributes and can be
//! attached again.

use super::ViewId;
use std::collections::HashMap;
use std::fmt::Write;

/// SVG namespace of the root element
pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// A `<rect>` element with ordered attributes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RectElement {
    attributes: Vec<(String, String)>,
}

impl RectElement {
    /// Create an element without attributes
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute, keeping its original position if it already exists
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }

    /// Read an attribute
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Attributes in the order they were first set
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.attributes
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    fn write_markup(&self, out: &mut String) {
        out.push_str("<rect");
        for (key, value) in &self.attributes {
            let _ = write!(out, " {}=\"{}\"", key, escape_attribute(value));
        }
        out.push_str("/>");
    }
}

/// Root `<svg>` element and the elements it owns
#[derive(Debug, Clone)]
pub struct SvgSurface {
    style: String,
    root_attributes: Vec<(String, String)>,
    elements: HashMap<ViewId, RectElement>,
    children: Vec<ViewId>,
    next_id: u64,
}

impl SvgSurface {
    /// Create a surface sized to its container
    pub fn new(width: f64, height: f64) -> Self {
        SvgSurface {
            style: format!("width:{};height:{};", width, height),
            root_attributes: Vec::new(),
            elements: HashMap::new(),
            children: Vec::new(),
            next_id: 0,
        }
    }

    /// Inline style of the root element
    pub fn style(&self) -> &str {
        &self.style
    }

    /// Set an extra attribute on the root element, after `style`
    pub fn set_root_attribute(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.root_attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value,
            None => self.root_attributes.push((name.to_string(), value)),
        }
    }

    /// Read an extra root attribute
    pub fn root_attribute(&self, name: &str) -> Option<&str> {
        self.root_attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Create a detached `<rect>` element
    pub fn create_rect(&mut self, width: &str, height: &str, fill: &str) -> ViewId {
        let id = ViewId::new(self.next_id);
        self.next_id += 1;

        let mut rect = RectElement::new();
        rect.set_attribute("width", width);
        rect.set_attribute("height", height);
        rect.set_attribute("fill", fill);
        self.elements.insert(id, rect);
        id
    }

    /// Append an owned element as the last child
    ///
    /// Returns `false` if the element is unknown or already a child.
    pub fn append_child(&mut self, id: ViewId) -> bool {
        if !self.elements.contains_key(&id) || self.contains_child(id) {
            return false;
        }
        self.children.push(id);
        true
    }

    /// Remove an element from the children, keeping it owned
    ///
    /// Returns `false` if the element was not a child.
    pub fn remove_child(&mut self, id: ViewId) -> bool {
        match self.children.iter().position(|child| *child == id) {
            Some(index) => {
                self.children.remove(index);
                true
            }
            None => false,
        }
    }

    /// Check if the element is currently a child
    pub fn contains_child(&self, id: ViewId) -> bool {
        self.children.contains(&id)
    }

    /// Attached elements in document order
    pub fn children(&self) -> &[ViewId] {
        &self.children
    }

    /// Number of attached elements
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Check if the surface owns the element
    pub fn owns(&self, id: ViewId) -> bool {
        self.elements.contains_key(&id)
    }

    /// Look up an owned element
    pub fn element(&self, id: ViewId) -> Option<&RectElement> {
        self.elements.get(&id)
    }

    /// Look up an owned element mutably
    pub fn element_mut(&mut self, id: ViewId) -> Option<&mut RectElement> {
        self.elements.get_mut(&id)
    }

    /// Drop an element entirely, detaching it first
    pub fn discard(&mut self, id: ViewId) -> Option<RectElement> {
        self.remove_child(id);
        self.elements.remove(&id)
    }

    /// Serialize the attached elements as an SVG document
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        let _ = write!(
            out,
            "<svg xmlns=\"{}\" style=\"{}\"",
            SVG_NAMESPACE,
            escape_attribute(&self.style)
        );
        for (key, value) in &self.root_attributes {
            let _ = write!(out, " {}=\"{}\"", key, escape_attribute(value));
        }
        out.push('>');
        for rect in self.children.iter().filter_map(|id| self.elements.get(id)) {
            rect.write_markup(&mut out);
        }
        out.push_str("</svg>");
        out
    }
}

fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_surface_markup() {
        let surface = SvgSurface::new(800.0, 400.0);
        assert_eq!(
            surface.to_markup(),
            "<svg xmlns=\"http://www.w3.org/2000/svg\" style=\"width:800;height:400;\"></svg>"
        );
    }

    #[test]
    fn test_root_attributes_follow_style() {
        let mut surface = SvgSurface::new(800.0, 400.0);
        surface.set_root_attribute("data-ipf", "4");
        surface.set_root_attribute("data-note", "a<b");
        surface.set_root_attribute("data-ipf", "2");
        assert_eq!(surface.root_attribute("data-ipf"), Some("2"));
        assert_eq!(
            surface.to_markup(),
            "<svg xmlns=\"http://www.w3.org/2000/svg\" style=\"width:800;height:400;\" \
             data-ipf=\"2\" data-note=\"a&lt;b\"></svg>"
        );
    }

    #[test]
    fn test_created_rect_is_detached() {
        let mut surface = SvgSurface::new(10.0, 10.0);
        let id = surface.create_rect("40px", "40px", "#87ceeb");
        assert!(surface.owns(id));
        assert!(!surface.contains_child(id));
        assert_eq!(surface.element(id).unwrap().attribute("fill"), Some("#87ceeb"));
    }

    #[test]
    fn test_append_and_remove_idempotent() {
        let mut surface = SvgSurface::new(10.0, 10.0);
        let id = surface.create_rect("40px", "40px", "#87ceeb");

        assert!(surface.append_child(id));
        assert!(!surface.append_child(id));
        assert_eq!(surface.child_count(), 1);

        assert!(surface.remove_child(id));
        assert!(!surface.remove_child(id));
        assert_eq!(surface.child_count(), 0);

        assert!(!surface.append_child(ViewId::new(99)));
    }

    #[test]
    fn test_rect_markup() {
        let mut surface = SvgSurface::new(800.0, 400.0);
        let id = surface.create_rect("40px", "40px", "#87ceeb");
        surface.append_child(id);
        let rect = surface.element_mut(id).unwrap();
        rect.set_attribute("x", "100");
        rect.set_attribute("y", "52.5");
        rect.set_attribute("x", "101");

        let markup = surface.to_markup();
        assert!(markup.contains(
            "<rect width=\"40px\" height=\"40px\" fill=\"#87ceeb\" x=\"101\" y=\"52.5\"/>"
        ));
    }

    #[test]
    fn test_attribute_escaping() {
        let mut surface = SvgSurface::new(10.0, 10.0);
        let id = surface.create_rect("1", "1", "a\"<b>&");
        surface.append_child(id);
        assert!(surface.to_markup().contains("fill=\"a&quot;&lt;b&gt;&amp;\""));
    }

    #[test]
    fn test_discard() {
        let mut surface = SvgSurface::new(10.0, 10.0);
        let id = surface.create_rect("1", "1", "red");
        surface.append_child(id);
        assert!(surface.discard(id).is_some());
        assert!(!surface.owns(id));
        assert_eq!(surface.child_count(), 0);
        assert!(surface.discard(id).is_none());
    }
}
