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
//! Plugin registry
//!
//! Maps plugin names to factories, the way scenes ask for
//! `"constant-acceleration"` or `"svg"` and get a configured instance back.
//! The registry provides:
//! - Named registration of behavior and renderer factories
//! - Duplicate name detection per plugin kind
//! - Version compatibility checking against [`PLUGIN_API_VERSION`]

use crate::behaviors::{
    BodyCollisionDetection, BodyImpulseResponse, ConstantAcceleration, EdgeCollisionDetection,
    PointerDrag, SweepPrune, VerletConstraints,
};
use crate::error::{Result, SandboxError};
use crate::plugins::api::{Behavior, Renderer, PLUGIN_API_VERSION};
use crate::plugins::options::PluginOptions;
use crate::render::SvgRenderer;
use log::debug;
use semver::Version;
use std::collections::HashMap;

/// Factory producing a configured behavior
pub type BehaviorFactory =
    Box<dyn Fn(&PluginOptions) -> std::result::Result<Box<dyn Behavior>, String> + Send + Sync>;

/// Factory producing a configured renderer
pub type RendererFactory =
    Box<dyn Fn(&PluginOptions) -> std::result::Result<Box<dyn Renderer>, String> + Send + Sync>;

struct Registration<F> {
    version: String,
    factory: F,
}

/// Registry of named plugin factories
///
/// Behaviors and renderers live in separate namespaces, so a behavior and a
/// renderer may share a name.
///
/// # Example
///
/// ```rust
/// use svg_sandbox::plugins::{PluginOptions, PluginRegistry};
///
/// let registry = PluginRegistry::with_builtins().unwrap();
/// let gravity = registry
///     .create_behavior("constant-acceleration", &PluginOptions::new())
///     .unwrap();
/// assert_eq!(gravity.name(), "constant-acceleration");
/// ```
pub struct PluginRegistry {
    behaviors: HashMap<String, Registration<BehaviorFactory>>,
    renderers: HashMap<String, Registration<RendererFactory>>,
}

impl PluginRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        PluginRegistry {
            behaviors: HashMap::new(),
            renderers: HashMap::new(),
        }
    }

    /// Create a registry holding every built-in plugin
    pub fn with_builtins() -> Result<Self> {
        let mut registry = Self::new();
        registry.register_builtins()?;
        Ok(registry)
    }

    /// Register the built-in behaviors and the `svg` renderer
    pub fn register_builtins(&mut self) -> Result<()> {
        self.register_behavior(ConstantAcceleration::NAME, PLUGIN_API_VERSION, |options| {
            ConstantAcceleration::from_options(options).map(boxed_behavior)
        })?;
        self.register_behavior(EdgeCollisionDetection::NAME, PLUGIN_API_VERSION, |options| {
            EdgeCollisionDetection::from_options(options).map(boxed_behavior)
        })?;
        self.register_behavior(SweepPrune::NAME, PLUGIN_API_VERSION, |options| {
            SweepPrune::from_options(options).map(boxed_behavior)
        })?;
        self.register_behavior(BodyCollisionDetection::NAME, PLUGIN_API_VERSION, |options| {
            BodyCollisionDetection::from_options(options).map(boxed_behavior)
        })?;
        self.register_behavior(BodyImpulseResponse::NAME, PLUGIN_API_VERSION, |options| {
            BodyImpulseResponse::from_options(options).map(boxed_behavior)
        })?;
        self.register_behavior(VerletConstraints::NAME, PLUGIN_API_VERSION, |options| {
            VerletConstraints::from_options(options).map(boxed_behavior)
        })?;
        self.register_behavior(PointerDrag::NAME, PLUGIN_API_VERSION, |options| {
            PointerDrag::from_options(options).map(boxed_behavior)
        })?;
        self.register_renderer(SvgRenderer::NAME, PLUGIN_API_VERSION, |options| {
            SvgRenderer::from_options(options).map(boxed_renderer)
        })?;
        Ok(())
    }

    /// Register a behavior factory under a name
    ///
    /// # Errors
    ///
    /// - [`SandboxError::DuplicatePlugin`] if a behavior with the same name exists
    /// - [`SandboxError::IncompatibleApi`] if `api_version` is incompatible
    pub fn register_behavior<F>(&mut self, name: &str, api_version: &str, factory: F) -> Result<()>
    where
        F: Fn(&PluginOptions) -> std::result::Result<Box<dyn Behavior>, String>
            + Send
            + Sync
            + 'static,
    {
        if self.behaviors.contains_key(name) {
            return Err(SandboxError::DuplicatePlugin(name.to_string()));
        }
        check_api_version(name, api_version)?;

        debug!("registered behavior '{}'", name);
        self.behaviors.insert(
            name.to_string(),
            Registration {
                version: api_version.to_string(),
                factory: Box::new(factory),
            },
        );
        Ok(())
    }

    /// Register a renderer factory under a name
    ///
    /// # Errors
    ///
    /// Same as [`PluginRegistry::register_behavior`].
    pub fn register_renderer<F>(&mut self, name: &str, api_version: &str, factory: F) -> Result<()>
    where
        F: Fn(&PluginOptions) -> std::result::Result<Box<dyn Renderer>, String>
            + Send
            + Sync
            + 'static,
    {
        if self.renderers.contains_key(name) {
            return Err(SandboxError::DuplicatePlugin(name.to_string()));
        }
        check_api_version(name, api_version)?;

        debug!("registered renderer '{}'", name);
        self.renderers.insert(
            name.to_string(),
            Registration {
                version: api_version.to_string(),
                factory: Box::new(factory),
            },
        );
        Ok(())
    }

    /// Create a behavior by name
    pub fn create_behavior(&self, name: &str, options: &PluginOptions) -> Result<Box<dyn Behavior>> {
        let registration = self
            .behaviors
            .get(name)
            .ok_or_else(|| SandboxError::UnknownPlugin(name.to_string()))?;
        (registration.factory)(options).map_err(|reason| SandboxError::PluginInit {
            name: name.to_string(),
            reason,
        })
    }

    /// Create a renderer by name
    pub fn create_renderer(&self, name: &str, options: &PluginOptions) -> Result<Box<dyn Renderer>> {
        let registration = self
            .renderers
            .get(name)
            .ok_or_else(|| SandboxError::UnknownPlugin(name.to_string()))?;
        (registration.factory)(options).map_err(|reason| SandboxError::PluginInit {
            name: name.to_string(),
            reason,
        })
    }

    /// API version a behavior was registered with
    pub fn behavior_api_version(&self, name: &str) -> Option<&str> {
        self.behaviors.get(name).map(|r| r.version.as_str())
    }

    /// Check if a behavior name is registered
    pub fn has_behavior(&self, name: &str) -> bool {
        self.behaviors.contains_key(name)
    }

    /// Check if a renderer name is registered
    pub fn has_renderer(&self, name: &str) -> bool {
        self.renderers.contains_key(name)
    }

    /// Registered behavior names, sorted
    pub fn behavior_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.behaviors.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Registered renderer names, sorted
    pub fn renderer_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.renderers.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Total number of registered factories
    pub fn plugin_count(&self) -> usize {
        self.behaviors.len() + self.renderers.len()
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn boxed_behavior<B: Behavior + 'static>(behavior: B) -> Box<dyn Behavior> {
    Box::new(behavior)
}

fn boxed_renderer<R: Renderer + 'static>(renderer: R) -> Box<dyn Renderer> {
    Box::new(renderer)
}

/// Reject plugins built against an incompatible API
pub(crate) fn check_api_version(name: &str, api_version: &str) -> Result<()> {
    if is_version_compatible(api_version, PLUGIN_API_VERSION) {
        Ok(())
    } else {
        Err(SandboxError::IncompatibleApi {
            name: name.to_string(),
            found: api_version.to_string(),
            expected: PLUGIN_API_VERSION.to_string(),
        })
    }
}

/// Check if a plugin API version is compatible with the engine
///
/// Uses semantic versioning rules:
/// - Major version must match
/// - For major version 0.x.y, minor versions must match (breaking changes)
/// - For major version >= 1, minor version can be less than or equal
/// - Patch version is ignored
fn is_version_compatible(plugin_version: &str, engine_version: &str) -> bool {
    let (plugin_ver, engine_ver) =
        match (Version::parse(plugin_version), Version::parse(engine_version)) {
            (Ok(p), Ok(e)) => (p, e),
            _ => return false,
        };

    if plugin_ver.major != engine_ver.major {
        return false;
    }

    if plugin_ver.major != 0 {
        plugin_ver.minor <= engine_ver.minor
    } else {
        plugin_ver.minor == engine_ver.minor
    }
}
