// SPDX-FileCopyrightText: 2026 Wrangle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock plugin for deterministic testing.
//!
//! `MockPlugin` implements every capability trait and exposes the ones named
//! by its configured capabilities, so one type can stand in for a flag
//! resolver, a script detector, or a resource monitor.

use std::path::Path;

use async_trait::async_trait;

use wrangle_core::{
    Capability, DEFAULT_PRIORITY, Enablement, ExecContext, FlagResolver, HealthStatus, Plugin,
    ResourceMonitor, ScriptDetector, WrangleError,
};

/// A configurable plugin with fixed answers.
#[derive(Debug, Clone)]
pub struct MockPlugin {
    name: String,
    version: semver::Version,
    capabilities: Vec<Capability>,
    enablement: Enablement,
    priority: i32,
    resource_types: Vec<String>,
    health: HealthStatus,
}

impl MockPlugin {
    /// A plugin with no capabilities, disabled everywhere.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: semver::Version::new(0, 1, 0),
            capabilities: Vec::new(),
            enablement: Enablement::disabled("mock plugin disabled"),
            priority: DEFAULT_PRIORITY,
            resource_types: Vec::new(),
            health: HealthStatus::Healthy,
        }
    }

    /// A resource monitor watching `name`.
    pub fn monitor(name: impl Into<String>) -> Self {
        Self::new(name).with_capabilities([Capability::ResourceMonitoring])
    }

    /// A flag resolver for the given resource types.
    pub fn flag_resolver<I, S>(name: impl Into<String>, resource_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(name)
            .with_capabilities([Capability::FlagResolution])
            .supporting(resource_types)
    }

    pub fn with_version(mut self, version: semver::Version) -> Self {
        self.version = version;
        self
    }

    pub fn with_capabilities(mut self, capabilities: impl IntoIterator<Item = Capability>) -> Self {
        self.capabilities = capabilities.into_iter().collect();
        self
    }

    pub fn enabled(mut self, reason: impl Into<String>) -> Self {
        self.enablement = Enablement::enabled(reason);
        self
    }

    pub fn disabled(mut self, reason: impl Into<String>) -> Self {
        self.enablement = Enablement::disabled(reason);
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Resource types for flag resolution, also used as script extensions.
    pub fn supporting<I, S>(mut self, resource_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.resource_types = resource_types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_health(mut self, health: HealthStatus) -> Self {
        self.health = health;
        self
    }

    fn has(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }
}

#[async_trait]
impl Plugin for MockPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> semver::Version {
        self.version.clone()
    }

    fn capabilities(&self) -> Vec<Capability> {
        self.capabilities.clone()
    }

    fn enabled_for(&self, _ctx: &ExecContext) -> Enablement {
        self.enablement.clone()
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn as_flag_resolver(&self) -> Option<&dyn FlagResolver> {
        self.has(Capability::FlagResolution).then_some(self as &dyn FlagResolver)
    }

    fn as_script_detector(&self) -> Option<&dyn ScriptDetector> {
        self.has(Capability::ScriptDetection).then_some(self as &dyn ScriptDetector)
    }

    fn as_resource_monitor(&self) -> Option<&dyn ResourceMonitor> {
        self.has(Capability::ResourceMonitoring).then_some(self as &dyn ResourceMonitor)
    }

    async fn health_check(&self) -> Result<HealthStatus, WrangleError> {
        Ok(self.health.clone())
    }
}

impl FlagResolver for MockPlugin {
    fn supports(&self, resource_type: &str) -> bool {
        self.resource_types.iter().any(|t| t == resource_type)
    }
}

impl ScriptDetector for MockPlugin {
    fn detects(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.supports(ext))
    }
}

impl ResourceMonitor for MockPlugin {
    fn resource(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capabilities_gate_accessors() {
        let gpu = MockPlugin::monitor("gpu");
        assert_eq!(gpu.as_resource_monitor().unwrap().resource(), "gpu");
        assert!(gpu.as_flag_resolver().is_none());
        assert!(gpu.as_script_detector().is_none());
    }

    #[test]
    fn flag_resolver_supports_configured_types() {
        let yaml = MockPlugin::flag_resolver("yaml", ["yaml", "yml"]);
        let resolver = yaml.as_flag_resolver().unwrap();
        assert!(resolver.supports("yml"));
        assert!(!resolver.supports("json"));
    }

    #[test]
    fn enablement_and_priority() {
        let plugin = MockPlugin::new("p").enabled("always").with_priority(5);
        let enablement = plugin.enabled_for(&ExecContext::new("train"));
        assert!(enablement.enabled);
        assert_eq!(enablement.reason, "always");
        assert_eq!(plugin.priority(), 5);
    }

    #[tokio::test]
    async fn health_is_configurable() {
        let plugin = MockPlugin::new("p").with_health(HealthStatus::Degraded("slow".into()));
        assert_eq!(
            plugin.health_check().await.unwrap(),
            HealthStatus::Degraded("slow".into())
        );
    }
}
