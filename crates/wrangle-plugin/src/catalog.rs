// SPDX-FileCopyrightText: 2026 Wrangle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in plugin table.
//!
//! Returns descriptors for the plugins compiled into the host. These are the
//! only descriptors a scope-limited source serves.

use std::sync::Arc;

use wrangle_core::{Capability, Plugin, PluginFactory, WrangleError};

use crate::builtin::{ConfigFlagsPlugin, ResourceMonitorPlugin, ScriptPlugin, builtin_version};
use crate::descriptor::PluginDescriptor;

/// Prefix of constructor references that name built-in factories.
pub const BUILTIN_CONSTRUCTOR_PREFIX: &str = "wrangle::builtin::";

fn factory<P, F>(build: F) -> Arc<dyn PluginFactory>
where
    P: Plugin,
    F: Fn() -> P + Send + Sync + 'static,
{
    Arc::new(move || -> Result<Arc<dyn Plugin>, WrangleError> { Ok(Arc::new(build())) })
}

fn builtin(
    name: &'static str,
    description: &str,
    capabilities: &[Capability],
    factory: Arc<dyn PluginFactory>,
) -> PluginDescriptor {
    PluginDescriptor::new(name, factory)
        .with_version(builtin_version())
        .with_description(description)
        .with_capabilities(capabilities.iter().copied())
        .with_constructor(format!("{BUILTIN_CONSTRUCTOR_PREFIX}{name}"))
}

fn monitor(name: &'static str, description: &str) -> PluginDescriptor {
    builtin(
        name,
        description,
        &[Capability::ResourceMonitoring, Capability::MetadataReporting],
        factory(move || ResourceMonitorPlugin::new(name)),
    )
}

/// Returns descriptors for all built-in plugins, in registration order:
/// - cpu, memory, gpu, disk (resource monitors)
/// - config-flags (flag resolution from config files)
/// - python-script, shell-script (script detection)
pub fn builtin_catalog() -> Vec<PluginDescriptor> {
    vec![
        monitor("cpu", "CPU utilisation monitor"),
        monitor("memory", "Memory usage monitor"),
        monitor("gpu", "GPU utilisation monitor"),
        monitor("disk", "Disk usage monitor"),
        builtin(
            ConfigFlagsPlugin::NAME,
            "Flags resolved from JSON, YAML and INI config files",
            &[Capability::FlagResolution],
            factory(|| ConfigFlagsPlugin),
        ),
        builtin(
            "python-script",
            "Python script runner support",
            &[Capability::ScriptDetection, Capability::FlagResolution],
            factory(ScriptPlugin::python),
        ),
        builtin(
            "shell-script",
            "Shell script runner support",
            &[Capability::ScriptDetection, Capability::FlagResolution],
            factory(ScriptPlugin::shell),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn builtin_catalog_names_are_unique() {
        let catalog = builtin_catalog();
        let names: HashSet<&str> = catalog.iter().map(PluginDescriptor::name).collect();
        assert_eq!(names.len(), catalog.len());
        for expected in ["cpu", "memory", "gpu", "disk", "config-flags", "python-script"] {
            assert!(names.contains(expected), "missing built-in {expected}");
        }
    }

    #[test]
    fn declared_capabilities_match_instances() {
        for descriptor in builtin_catalog() {
            let plugin = descriptor.factory().create().unwrap();
            assert_eq!(plugin.name(), descriptor.name());
            let mut declared = descriptor.capabilities().to_vec();
            let mut actual = plugin.capabilities();
            declared.sort();
            actual.sort();
            assert_eq!(declared, actual, "capability mismatch for {}", descriptor.name());
        }
    }

    #[test]
    fn constructor_references_use_builtin_prefix() {
        for descriptor in builtin_catalog() {
            assert_eq!(
                descriptor.constructor(),
                format!("{BUILTIN_CONSTRUCTOR_PREFIX}{}", descriptor.name())
            );
        }
    }
}
