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
//! Error types for sandbox setup.
//!
//! Runtime operations (pointer handling, rendering, stepping) never fail:
//! "nothing found" is a normal outcome there. Errors only arise while
//! registering plugins, connecting them to a world, or validating
//! configuration.

/// Errors raised while assembling a sandbox.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum SandboxError {
    /// A plugin with this name is already registered or connected.
    #[error("plugin '{0}' is already registered")]
    DuplicatePlugin(String),

    /// No factory is registered under this name.
    #[error("no plugin named '{0}' is registered")]
    UnknownPlugin(String),

    /// The plugin was built against an incompatible plugin API.
    #[error("plugin '{name}' API version {found} is incompatible with engine API version {expected}")]
    IncompatibleApi {
        /// Plugin name
        name: String,
        /// API version the plugin declares
        found: String,
        /// API version of this engine
        expected: String,
    },

    /// A plugin factory or `initialize` hook rejected its options.
    #[error("failed to initialize plugin '{name}': {reason}")]
    PluginInit {
        /// Plugin name
        name: String,
        /// Message returned by the plugin
        reason: String,
    },

    /// Configuration values are out of range or unparsable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result alias for sandbox setup operations.
pub type Result<T> = std::result::Result<T, SandboxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SandboxError::DuplicatePlugin("svg".to_string());
        assert_eq!(err.to_string(), "plugin 'svg' is already registered");

        let err = SandboxError::IncompatibleApi {
            name: "old".to_string(),
            found: "0.0.1".to_string(),
            expected: "0.1.0".to_string(),
        };
        assert!(err.to_string().contains("0.0.1"));
        assert!(err.to_string().contains("0.1.0"));
    }
}
