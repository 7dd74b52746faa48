// SPDX-FileCopyrightText: 2026 Wrangle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the registry and plugin implementations.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A behavioral contract a plugin may implement.
///
/// Manifests declare capabilities in kebab-case (`"flag-resolution"`), which
/// lets the registry answer capability queries without constructing plugins.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    /// Resolves operation flags for a given resource type.
    FlagResolution,
    /// Recognizes runnable scripts.
    ScriptDetection,
    /// Reports on a host resource (cpu, memory, gpu, disk).
    ResourceMonitoring,
    /// Surfaces name/version information to check reports.
    MetadataReporting,
}

/// Health status reported by plugin health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Plugin is fully operational.
    Healthy,
    /// Plugin is operational but experiencing issues.
    Degraded(String),
    /// Plugin is not operational.
    Unhealthy(String),
}

/// The execution context a plugin is asked to participate in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecContext {
    /// Operation name, used only for reporting.
    pub operation: String,
    /// Script or module the operation runs, if any.
    pub main: Option<PathBuf>,
    /// Where flags are written, e.g. `args`, `globals`, or `config:train.yml`.
    pub flags_dest: Option<String>,
}

impl ExecContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            ..Self::default()
        }
    }

    pub fn with_main(mut self, main: impl Into<PathBuf>) -> Self {
        self.main = Some(main.into());
        self
    }

    pub fn with_flags_dest(mut self, dest: impl Into<String>) -> Self {
        self.flags_dest = Some(dest.into());
        self
    }
}

/// Whether a plugin takes part in an execution context, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enablement {
    pub enabled: bool,
    pub reason: String,
}

impl Enablement {
    pub fn enabled(reason: impl Into<String>) -> Self {
        Self {
            enabled: true,
            reason: reason.into(),
        }
    }

    pub fn disabled(reason: impl Into<String>) -> Self {
        Self {
            enabled: false,
            reason: reason.into(),
        }
    }
}

/// Name and version information a plugin contributes to a check report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginReport {
    pub name: String,
    pub version: String,
    pub capabilities: Vec<Capability>,
    /// Extra key/value details, e.g. a detected driver version.
    pub details: Vec<(String, String)>,
}
