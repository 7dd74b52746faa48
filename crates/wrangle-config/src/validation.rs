// SPDX-FileCopyrightText: 2026 Wrangle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::WrangleConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first.
pub fn validate_config(config: &WrangleConfig) -> Result<(), Vec<ConfigError>> {
    let registry = &config.registry;
    let mut errors = Vec::new();

    if registry.group.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "registry.group must not be empty".to_string(),
        });
    }

    for (i, path) in registry.search_paths.iter().enumerate() {
        if path.as_os_str().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("registry.search_paths[{i}] must not be empty"),
            });
        }
    }

    if registry.resolve_timeout_secs == Some(0) {
        errors.push(ConfigError::Validation {
            message: "registry.resolve_timeout_secs must be at least 1; omit it to wait indefinitely"
                .to_string(),
        });
    }

    let mut seen = HashSet::new();
    for name in &registry.disabled {
        if name.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: "registry.disabled must not contain empty names".to_string(),
            });
        } else if !seen.insert(name) {
            errors.push(ConfigError::Validation {
                message: format!("duplicate plugin name `{name}` in registry.disabled"),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
