// SPDX-FileCopyrightText: 2026 Wrangle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Wrangle plugin registry.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

/// The primary error type used across the registry, its sources, and plugin
/// constructors.
#[derive(Debug, Error)]
pub enum WrangleError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// No descriptor with this name exists in the current descriptor set.
    #[error("unknown plugin `{name}`")]
    UnknownPlugin { name: String },

    /// The plugin's constructor failed. The cause is shared so a cached
    /// failure can be surfaced on every later lookup.
    #[error("failed to construct plugin `{name}`: {source}")]
    Construction {
        name: String,
        source: Arc<WrangleError>,
    },

    /// A manifest file or entry could not be read. Only returned in strict
    /// mode; otherwise recorded as a [`ManifestDiagnostic`].
    #[error("invalid plugin manifest {location}: {reason}")]
    ManifestRead { location: String, reason: String },

    /// Gave up waiting for another caller's in-flight construction.
    #[error("timed out after {waited:?} waiting for plugin `{name}` to be constructed")]
    ResolveTimeout { name: String, waited: Duration },

    /// Failure raised by plugin code (constructors, capability calls).
    #[error("plugin error: {message}")]
    Plugin {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl WrangleError {
    /// Shorthand for a [`WrangleError::Plugin`] without an underlying source.
    pub fn plugin(message: impl Into<String>) -> Self {
        WrangleError::Plugin {
            message: message.into(),
            source: None,
        }
    }
}

/// A malformed manifest file or entry that was skipped during enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestDiagnostic {
    /// Where the problem was found, e.g. `/opt/plugins/gpu/plugin.toml#gpu`.
    pub location: String,
    /// Human-readable description of the problem.
    pub reason: String,
}

impl ManifestDiagnostic {
    pub fn new(location: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            reason: reason.into(),
        }
    }

    /// Promote the diagnostic to a hard error (strict mode).
    pub fn into_error(self) -> WrangleError {
        WrangleError::ManifestRead {
            location: self.location,
            reason: self.reason,
        }
    }
}

impl std::fmt::Display for ManifestDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.location, self.reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_error_names_plugin_and_cause() {
        let err = WrangleError::Construction {
            name: "gpu".into(),
            source: Arc::new(WrangleError::plugin("no CUDA driver found")),
        };
        let msg = err.to_string();
        assert!(msg.contains("`gpu`"));
        assert!(msg.contains("no CUDA driver found"));
    }

    #[test]
    fn construction_error_exposes_source() {
        use std::error::Error;

        let err = WrangleError::Construction {
            name: "gpu".into(),
            source: Arc::new(WrangleError::plugin("boom")),
        };
        let source = err.source().expect("construction error has a source");
        assert_eq!(source.to_string(), "plugin error: boom");
    }

    #[test]
    fn diagnostic_promotes_to_manifest_read_error() {
        let diag = ManifestDiagnostic::new("pkg/plugin.toml#gpu", "empty constructor");
        assert_eq!(diag.to_string(), "pkg/plugin.toml#gpu: empty constructor");

        match diag.into_error() {
            WrangleError::ManifestRead { location, reason } => {
                assert_eq!(location, "pkg/plugin.toml#gpu");
                assert_eq!(reason, "empty constructor");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
