// SPDX-FileCopyrightText: 2026 Wrangle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugins compiled into the host.
//!
//! These only answer capability queries; the work behind each capability
//! belongs to the host components that consume them.

use std::path::Path;

use wrangle_core::{
    Capability, Enablement, ExecContext, FlagResolver, Plugin, ResourceMonitor, ScriptDetector,
};

use crate::discovery::host_version;

/// Built-ins share the host's version.
pub(crate) fn builtin_version() -> semver::Version {
    host_version()
}

/// Lowercased extension of `path`, looking through a trailing `.in`
/// template suffix (`config.yml.in` is a `yml` source).
fn source_extension(path: &str) -> Option<String> {
    let path = path.strip_suffix(".in").unwrap_or(path);
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

/// Watches one host resource during runs.
#[derive(Debug)]
pub struct ResourceMonitorPlugin {
    name: &'static str,
}

impl ResourceMonitorPlugin {
    pub fn new(name: &'static str) -> Self {
        Self { name }
    }
}

impl Plugin for ResourceMonitorPlugin {
    fn name(&self) -> &str {
        self.name
    }

    fn version(&self) -> semver::Version {
        builtin_version()
    }

    fn capabilities(&self) -> Vec<Capability> {
        vec![Capability::ResourceMonitoring, Capability::MetadataReporting]
    }

    fn enabled_for(&self, _ctx: &ExecContext) -> Enablement {
        Enablement::enabled(format!("{} monitoring applies to every operation", self.name))
    }

    fn as_resource_monitor(&self) -> Option<&dyn ResourceMonitor> {
        Some(self)
    }
}

impl ResourceMonitor for ResourceMonitorPlugin {
    fn resource(&self) -> &str {
        self.name
    }
}

/// Resolves flags from configuration files named by a `config:<path>`
/// flags destination.
#[derive(Debug, Default)]
pub struct ConfigFlagsPlugin;

impl ConfigFlagsPlugin {
    pub const NAME: &'static str = "config-flags";
    const SUPPORTED: &'static [&'static str] = &["json", "yaml", "yml", "ini", "cfg"];
}

impl Plugin for ConfigFlagsPlugin {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn version(&self) -> semver::Version {
        builtin_version()
    }

    fn capabilities(&self) -> Vec<Capability> {
        vec![Capability::FlagResolution]
    }

    fn enabled_for(&self, ctx: &ExecContext) -> Enablement {
        let Some(src) = ctx.flags_dest.as_deref().and_then(|d| d.strip_prefix("config:")) else {
            return Enablement::disabled("flags destination is not a config file");
        };
        match source_extension(src) {
            Some(ext) if self.supports(&ext) => {
                Enablement::enabled(format!("flags are written to {src}"))
            }
            _ => Enablement::disabled(format!("config type for {src} not supported")),
        }
    }

    fn as_flag_resolver(&self) -> Option<&dyn FlagResolver> {
        Some(self)
    }
}

impl FlagResolver for ConfigFlagsPlugin {
    fn supports(&self, resource_type: &str) -> bool {
        let resource_type = resource_type.strip_suffix(".in").unwrap_or(resource_type);
        Self::SUPPORTED
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(resource_type))
    }
}

/// Recognizes scripts by file extension.
#[derive(Debug)]
pub struct ScriptPlugin {
    name: &'static str,
    extensions: &'static [&'static str],
}

impl ScriptPlugin {
    pub fn python() -> Self {
        Self {
            name: "python-script",
            extensions: &["py"],
        }
    }

    pub fn shell() -> Self {
        Self {
            name: "shell-script",
            extensions: &["sh", "bash"],
        }
    }

    fn handles(&self, extension: &str) -> bool {
        self.extensions
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(extension))
    }
}

impl Plugin for ScriptPlugin {
    fn name(&self) -> &str {
        self.name
    }

    fn version(&self) -> semver::Version {
        builtin_version()
    }

    fn capabilities(&self) -> Vec<Capability> {
        vec![Capability::ScriptDetection, Capability::FlagResolution]
    }

    fn enabled_for(&self, ctx: &ExecContext) -> Enablement {
        match ctx.main.as_deref() {
            Some(main) if self.detects(main) => {
                Enablement::enabled(format!("{} is a runnable script", main.display()))
            }
            Some(main) => Enablement::disabled(format!("{} is not handled", main.display())),
            None => Enablement::disabled("operation has no main script"),
        }
    }

    fn as_script_detector(&self) -> Option<&dyn ScriptDetector> {
        Some(self)
    }

    fn as_flag_resolver(&self) -> Option<&dyn FlagResolver> {
        Some(self)
    }
}

impl ScriptDetector for ScriptPlugin {
    fn detects(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.handles(ext))
    }
}

/// Scripts declare their own flags, so a script plugin resolves flags for
/// its own script types.
impl FlagResolver for ScriptPlugin {
    fn supports(&self, resource_type: &str) -> bool {
        self.handles(resource_type)
    }
}
