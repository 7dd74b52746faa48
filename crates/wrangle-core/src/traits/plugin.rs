// SPDX-FileCopyrightText: 2026 Wrangle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base trait that every plugin instance implements.

use async_trait::async_trait;

use crate::error::WrangleError;
use crate::traits::flag::FlagResolver;
use crate::traits::monitor::ResourceMonitor;
use crate::traits::script::ScriptDetector;
use crate::types::{Capability, Enablement, ExecContext, HealthStatus, PluginReport};

/// Priority assigned to plugins that do not override [`Plugin::priority`].
pub const DEFAULT_PRIORITY: i32 = 100;

/// The base trait for all Wrangle plugins.
///
/// Plugins expose identity and metadata here and opt into capability
/// interfaces through the `as_*` accessors, which return `None` unless the
/// plugin implements that capability.
#[async_trait]
pub trait Plugin: std::fmt::Debug + Send + Sync + 'static {
    /// Returns the registry name of this plugin.
    fn name(&self) -> &str;

    /// Returns the semantic version of this plugin.
    fn version(&self) -> semver::Version;

    /// Returns the capabilities this instance implements.
    fn capabilities(&self) -> Vec<Capability>;

    /// Reports whether the plugin participates in `ctx`.
    fn enabled_for(&self, _ctx: &ExecContext) -> Enablement {
        Enablement::disabled("not supported by plugin")
    }

    /// Ordering hint for callers that rank enabled plugins. Lower runs first.
    fn priority(&self) -> i32 {
        DEFAULT_PRIORITY
    }

    fn as_flag_resolver(&self) -> Option<&dyn FlagResolver> {
        None
    }

    fn as_script_detector(&self) -> Option<&dyn ScriptDetector> {
        None
    }

    fn as_resource_monitor(&self) -> Option<&dyn ResourceMonitor> {
        None
    }

    /// Name/version summary surfaced to check reports.
    fn report(&self) -> PluginReport {
        PluginReport {
            name: self.name().to_string(),
            version: self.version().to_string(),
            capabilities: self.capabilities(),
            details: Vec::new(),
        }
    }

    /// Performs a health check and returns the plugin's current status.
    async fn health_check(&self) -> Result<HealthStatus, WrangleError> {
        Ok(HealthStatus::Healthy)
    }
}
