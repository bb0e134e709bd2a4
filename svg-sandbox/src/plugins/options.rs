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
//! Option bags passed to plugin factories
//!
//! Factories registered by name receive a [`PluginOptions`] and read the
//! keys they understand, falling back to their own defaults for missing
//! keys. A key holding a value of the wrong kind is reported as an error
//! rather than silently defaulted.

use crate::input::ElementOffset;
use crate::math::{Aabb, Vector2};
use std::collections::HashMap;

/// A single option value
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    /// Scalar
    Number(f64),
    /// 2D vector
    Vector(Vector2),
    /// Bounding box
    Bounds(Aabb),
    /// Element offset
    Offset(ElementOffset),
    /// String
    Text(String),
    /// Boolean flag
    Flag(bool),
}

impl OptionValue {
    fn kind(&self) -> &'static str {
        match self {
            OptionValue::Number(_) => "number",
            OptionValue::Vector(_) => "vector",
            OptionValue::Bounds(_) => "bounds",
            OptionValue::Offset(_) => "offset",
            OptionValue::Text(_) => "text",
            OptionValue::Flag(_) => "flag",
        }
    }
}

/// Named option values for a plugin factory
///
/// # Examples
///
/// ```
/// use svg_sandbox::plugins::PluginOptions;
/// use svg_sandbox::Vector2;
///
/// let options = PluginOptions::new()
///     .with_vector("acc", Vector2::new(0.0, 0.0004))
///     .with_number("restitution", 0.0);
/// assert_eq!(options.number("restitution"), Ok(Some(0.0)));
/// assert_eq!(options.number("missing"), Ok(None));
/// assert!(options.number("acc").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PluginOptions {
    values: HashMap<String, OptionValue>,
}

macro_rules! typed_getter {
    ($(#[$doc:meta])* $name:ident, $variant:ident, $ty:ty) => {
        $(#[$doc])*
        pub fn $name(&self, key: &str) -> Result<Option<$ty>, String> {
            match self.values.get(key) {
                None => Ok(None),
                Some(OptionValue::$variant(value)) => Ok(Some(value.clone())),
                Some(other) => Err(format!(
                    "option '{}' should be a {}, found a {}",
                    key,
                    stringify!($name),
                    other.kind()
                )),
            }
        }
    };
}

impl PluginOptions {
    /// Create an empty option bag
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value
    pub fn set(&mut self, key: impl Into<String>, value: OptionValue) {
        self.values.insert(key.into(), value);
    }

    /// Builder form of [`PluginOptions::set`]
    pub fn with(mut self, key: impl Into<String>, value: OptionValue) -> Self {
        self.set(key, value);
        self
    }

    /// Set a number
    pub fn with_number(self, key: impl Into<String>, value: f64) -> Self {
        self.with(key, OptionValue::Number(value))
    }

    /// Set a vector
    pub fn with_vector(self, key: impl Into<String>, value: Vector2) -> Self {
        self.with(key, OptionValue::Vector(value))
    }

    /// Set a bounding box
    pub fn with_bounds(self, key: impl Into<String>, value: Aabb) -> Self {
        self.with(key, OptionValue::Bounds(value))
    }

    /// Set an element offset
    pub fn with_offset(self, key: impl Into<String>, value: ElementOffset) -> Self {
        self.with(key, OptionValue::Offset(value))
    }

    /// Set a string
    pub fn with_text(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.with(key, OptionValue::Text(value.into()))
    }

    /// Set a flag
    pub fn with_flag(self, key: impl Into<String>, value: bool) -> Self {
        self.with(key, OptionValue::Flag(value))
    }

    /// Raw lookup
    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.values.get(key)
    }

    typed_getter!(
        /// Read a number
        number, Number, f64
    );
    typed_getter!(
        /// Read a vector
        vector, Vector, Vector2
    );
    typed_getter!(
        /// Read a bounding box
        bounds, Bounds, Aabb
    );
    typed_getter!(
        /// Read an element offset
        offset, Offset, ElementOffset
    );
    typed_getter!(
        /// Read a string
        text, Text, String
    );
    typed_getter!(
        /// Read a flag
        flag, Flag, bool
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_lookup() {
        let options = PluginOptions::new()
            .with_flag("check_all", true)
            .with_text("fill", "#87ceeb")
            .with_bounds("aabb", Aabb::from_bounds(0.0, 0.0, 10.0, 10.0));

        assert_eq!(options.flag("check_all"), Ok(Some(true)));
        assert_eq!(options.text("fill"), Ok(Some("#87ceeb".to_string())));
        assert!(options.bounds("aabb").unwrap().is_some());
        assert_eq!(options.offset("el"), Ok(None));
    }

    #[test]
    fn test_wrong_kind_is_an_error() {
        let options = PluginOptions::new().with_text("restitution", "high");
        let err = options.number("restitution").unwrap_err();
        assert!(err.contains("restitution"));
        assert!(err.contains("text"));
    }
}
