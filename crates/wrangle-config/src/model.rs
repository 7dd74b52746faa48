// SPDX-FileCopyrightText: 2026 Wrangle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Registration group plugins advertise themselves under by default.
pub const DEFAULT_GROUP: &str = "wrangle.plugins";

/// Top-level Wrangle configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WrangleConfig {
    /// Plugin discovery and resolution settings.
    #[serde(default)]
    pub registry: RegistryConfig,
}

/// Plugin discovery and resolution settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    /// Group identifier manifest entries must be registered under.
    #[serde(default = "default_group")]
    pub group: String,

    /// Directories scanned for package manifests (`<dir>/<package>/plugin.toml`).
    #[serde(default = "default_search_paths")]
    pub search_paths: Vec<PathBuf>,

    /// Fail enumeration on the first malformed manifest entry instead of
    /// skipping it with a diagnostic.
    #[serde(default)]
    pub strict: bool,

    /// Upper bound on how long a caller waits for another caller's in-flight
    /// construction of the same plugin. `None` waits indefinitely.
    #[serde(default)]
    pub resolve_timeout_secs: Option<u64>,

    /// Plugin names hidden from enumeration even when installed.
    #[serde(default)]
    pub disabled: Vec<String>,
}

impl RegistryConfig {
    pub fn resolve_timeout(&self) -> Option<Duration> {
        self.resolve_timeout_secs.map(Duration::from_secs)
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            group: default_group(),
            search_paths: default_search_paths(),
            strict: false,
            resolve_timeout_secs: None,
            disabled: Vec::new(),
        }
    }
}

fn default_group() -> String {
    DEFAULT_GROUP.to_string()
}

fn default_search_paths() -> Vec<PathBuf> {
    dirs::data_dir()
        .map(|d| vec![d.join("wrangle/plugins")])
        .unwrap_or_default()
}
