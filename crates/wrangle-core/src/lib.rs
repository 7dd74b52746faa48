// SPDX-FileCopyrightText: 2026 Wrangle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Wrangle plugin registry.
//!
//! This crate provides the plugin and capability traits, the zero-argument
//! factory contract, error types, and the common types shared by the
//! registry and the plugins it serves.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{ManifestDiagnostic, WrangleError};
pub use types::{Capability, Enablement, ExecContext, HealthStatus, PluginReport};

pub use traits::{
    DEFAULT_PRIORITY, FlagResolver, Plugin, PluginFactory, ResourceMonitor, ScriptDetector,
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::Arc;

    #[derive(Debug)]
    struct YamlFlags;

    impl Plugin for YamlFlags {
        fn name(&self) -> &str {
            "yaml-flags"
        }

        fn version(&self) -> semver::Version {
            semver::Version::new(1, 0, 0)
        }

        fn capabilities(&self) -> Vec<Capability> {
            vec![Capability::FlagResolution]
        }

        fn enabled_for(&self, ctx: &ExecContext) -> Enablement {
            match ctx.flags_dest.as_deref() {
                Some(dest) if dest.ends_with(".yml") => Enablement::enabled("yaml config"),
                _ => Enablement::disabled("no yaml config"),
            }
        }

        fn as_flag_resolver(&self) -> Option<&dyn FlagResolver> {
            Some(self)
        }
    }

    impl FlagResolver for YamlFlags {
        fn supports(&self, resource_type: &str) -> bool {
            resource_type == "yaml"
        }
    }

    #[test]
    fn capability_round_trips_kebab_case() {
        use std::str::FromStr;

        let variants = [
            Capability::FlagResolution,
            Capability::ScriptDetection,
            Capability::ResourceMonitoring,
            Capability::MetadataReporting,
        ];
        for variant in variants {
            let s = variant.to_string();
            assert!(!s.contains('_') && s.chars().all(|c| c.is_ascii_lowercase() || c == '-'));
            assert_eq!(Capability::from_str(&s).expect("should parse back"), variant);
        }
        assert_eq!(Capability::FlagResolution.to_string(), "flag-resolution");
    }

    #[test]
    fn capability_serde_matches_display() {
        let json = serde_json::to_string(&Capability::ResourceMonitoring).unwrap();
        assert_eq!(json, "\"resource-monitoring\"");
        let parsed: Capability = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Capability::ResourceMonitoring);
    }

    #[test]
    fn default_plugin_methods() {
        let plugin = YamlFlags;
        assert_eq!(plugin.priority(), DEFAULT_PRIORITY);
        assert!(plugin.as_script_detector().is_none());
        assert!(plugin.as_resource_monitor().is_none());

        let report = plugin.report();
        assert_eq!(report.name, "yaml-flags");
        assert_eq!(report.version, "1.0.0");
        assert_eq!(report.capabilities, vec![Capability::FlagResolution]);
    }

    #[test]
    fn flag_resolver_defaults_to_enablement() {
        let plugin = YamlFlags;
        let resolver = plugin.as_flag_resolver().expect("implements flag resolution");
        assert!(resolver.supports("yaml"));
        assert!(!resolver.supports("json"));

        let ctx = ExecContext::new("train").with_flags_dest("config:train.yml");
        assert!(resolver.resolves_for(&ctx));
        assert!(!resolver.resolves_for(&ExecContext::new("train")));
    }

    #[test]
    fn closures_are_factories() {
        let factory = || -> Result<Arc<dyn Plugin>, WrangleError> { Ok(Arc::new(YamlFlags)) };
        let plugin = PluginFactory::create(&factory).unwrap();
        assert_eq!(plugin.name(), "yaml-flags");
    }

    #[test]
    fn exec_context_builder() {
        let ctx = ExecContext::new("train")
            .with_main("train.py")
            .with_flags_dest("globals");
        assert_eq!(ctx.operation, "train");
        assert_eq!(ctx.main.as_deref(), Some(Path::new("train.py")));
        assert_eq!(ctx.flags_dest.as_deref(), Some("globals"));
    }

    #[tokio::test]
    async fn default_health_check_is_healthy() {
        let plugin = YamlFlags;
        assert_eq!(plugin.health_check().await.unwrap(), HealthStatus::Healthy);
    }
}
