// SPDX-FileCopyrightText: 2026 Wrangle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Live discovery: built-ins plus installed package manifests.
//!
//! Packages are directories under a search path holding a `plugin.toml`.
//! Each manifest entry names a constructor reference which is resolved
//! against the [`FactoryTable`] of constructors linked into the host.
//! Search paths are scanned in order and package directories in sorted
//! order, so enumeration is stable for a given filesystem state.

use std::collections::{BTreeSet, HashMap};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, trace, warn};
use wrangle_config::{DEFAULT_GROUP, RegistryConfig};
use wrangle_core::{ManifestDiagnostic, PluginFactory, WrangleError};

use crate::catalog::builtin_catalog;
use crate::descriptor::{PluginDescriptor, PluginOrigin};
use crate::manifest::parse_package_manifest;
use crate::scope::{ScopeLimiter, global_scope};
use crate::source::{Discovery, ManifestSource};

/// File name of a package manifest inside a package directory.
pub const MANIFEST_FILE: &str = "plugin.toml";

/// Version of the running host, compared against `min_host_version`.
pub fn host_version() -> semver::Version {
    semver::Version::parse(env!("CARGO_PKG_VERSION"))
        .unwrap_or_else(|_| semver::Version::new(0, 0, 0))
}

/// Constructors linked into the host, keyed by constructor reference.
#[derive(Clone, Default)]
pub struct FactoryTable {
    factories: HashMap<String, Arc<dyn PluginFactory>>,
}

impl FactoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `factory` under `reference`, replacing any previous one.
    pub fn register(&mut self, reference: impl Into<String>, factory: Arc<dyn PluginFactory>) {
        self.factories.insert(reference.into(), factory);
    }

    pub fn get(&self, reference: &str) -> Option<Arc<dyn PluginFactory>> {
        self.factories.get(reference).cloned()
    }

    pub fn contains(&self, reference: &str) -> bool {
        self.factories.contains_key(reference)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl std::fmt::Debug for FactoryTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut references: Vec<&String> = self.factories.keys().collect();
        references.sort();
        f.debug_struct("FactoryTable")
            .field("references", &references)
            .finish()
    }
}

/// The production [`ManifestSource`].
///
/// Unless the scope limiter is active, every enumeration yields the built-in
/// table first and then the entries of every installed package registered
/// under the configured group. Built-ins win name collisions.
pub struct LiveSource {
    group: String,
    search_paths: Vec<PathBuf>,
    strict: bool,
    disabled: BTreeSet<String>,
    factories: FactoryTable,
    builtins: Vec<PluginDescriptor>,
    scope: Arc<ScopeLimiter>,
    host_version: semver::Version,
}

impl LiveSource {
    /// A source over the built-in table with no search paths, consulting the
    /// process-wide scope limiter.
    pub fn new(factories: FactoryTable) -> Self {
        Self {
            group: DEFAULT_GROUP.to_string(),
            search_paths: Vec::new(),
            strict: false,
            disabled: BTreeSet::new(),
            factories,
            builtins: builtin_catalog(),
            scope: global_scope(),
            host_version: host_version(),
        }
    }

    pub fn from_config(config: &RegistryConfig, factories: FactoryTable) -> Self {
        Self::new(factories)
            .with_group(config.group.clone())
            .with_search_paths(config.search_paths.iter().cloned())
            .strict(config.strict)
            .with_disabled(config.disabled.iter().cloned())
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    pub fn with_search_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.search_paths.push(path.into());
        self
    }

    pub fn with_search_paths(mut self, paths: impl IntoIterator<Item = PathBuf>) -> Self {
        self.search_paths.extend(paths);
        self
    }

    /// Fail enumeration on the first malformed entry instead of skipping it.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_disabled(mut self, names: impl IntoIterator<Item = String>) -> Self {
        self.disabled.extend(names);
        self
    }

    /// Replace the built-in table.
    pub fn with_builtins(mut self, builtins: impl IntoIterator<Item = PluginDescriptor>) -> Self {
        self.builtins = builtins.into_iter().collect();
        self
    }

    /// Consult `scope` instead of the process-wide limiter.
    pub fn with_scope(mut self, scope: Arc<ScopeLimiter>) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_host_version(mut self, version: semver::Version) -> Self {
        self.host_version = version;
        self
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    /// Record a skipped entry, or fail outright in strict mode.
    fn reject(
        &self,
        discovery: &mut Discovery,
        diagnostic: ManifestDiagnostic,
    ) -> Result<(), WrangleError> {
        if self.strict {
            return Err(diagnostic.into_error());
        }
        warn!(
            location = %diagnostic.location,
            reason = %diagnostic.reason,
            "skipping plugin manifest entry"
        );
        discovery.diagnostics.push(diagnostic);
        Ok(())
    }

    /// Built-ins named by the allowlist, ignoring installed packages and the
    /// disabled list.
    fn builtin_only(&self, allowlist: &BTreeSet<String>) -> Result<Discovery, WrangleError> {
        let mut discovery = Discovery::default();
        for descriptor in self.builtins.iter().filter(|d| allowlist.contains(d.name())) {
            // The built-in table has unique names.
            let _ = discovery.insert(descriptor.clone());
        }
        for name in allowlist {
            if !discovery.names().any(|n| n == name.as_str()) {
                self.reject(
                    &mut discovery,
                    ManifestDiagnostic::new(name.as_str(), "not a built-in plugin"),
                )?;
            }
        }
        Ok(discovery)
    }

    /// `plugin.toml` paths under every search path, in scan order.
    fn manifest_paths(&self, discovery: &mut Discovery) -> Result<Vec<PathBuf>, WrangleError> {
        let mut paths = Vec::new();
        for root in &self.search_paths {
            if !root.is_dir() {
                trace!(path = %root.display(), "plugin search path does not exist");
                continue;
            }
            let entries = match std::fs::read_dir(root) {
                Ok(entries) => entries,
                Err(e) => {
                    self.reject(
                        discovery,
                        ManifestDiagnostic::new(
                            root.display().to_string(),
                            format!("unreadable search path: {e}"),
                        ),
                    )?;
                    continue;
                }
            };
            let mut packages = Vec::new();
            for entry in entries {
                match entry {
                    Ok(entry) => packages.push(entry.path()),
                    Err(e) => self.reject(
                        discovery,
                        ManifestDiagnostic::new(
                            root.display().to_string(),
                            format!("unreadable directory entry: {e}"),
                        ),
                    )?,
                }
            }
            packages.sort();
            for package in packages {
                if let Some(manifest) = self.package_manifest(&package, discovery)? {
                    paths.push(manifest);
                }
            }
        }
        Ok(paths)
    }

    /// The manifest path of one search-path entry. Entries that are not
    /// directories, and directories without a manifest, are not packages.
    fn package_manifest(
        &self,
        package: &Path,
        discovery: &mut Discovery,
    ) -> Result<Option<PathBuf>, WrangleError> {
        match std::fs::metadata(package) {
            Ok(meta) if !meta.is_dir() => return Ok(None),
            Ok(_) => {}
            Err(e) => {
                self.reject(
                    discovery,
                    ManifestDiagnostic::new(
                        package.display().to_string(),
                        format!("unreadable package directory: {e}"),
                    ),
                )?;
                return Ok(None);
            }
        }

        let manifest = package.join(MANIFEST_FILE);
        let reason = match manifest.symlink_metadata() {
            Ok(meta) if meta.is_dir() => format!("{MANIFEST_FILE} is a directory"),
            // Symlinks are followed when the manifest is read.
            Ok(_) => return Ok(Some(manifest)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                trace!(path = %package.display(), "directory has no plugin manifest");
                return Ok(None);
            }
            Err(e) => format!("unreadable manifest: {e}"),
        };
        self.reject(
            discovery,
            ManifestDiagnostic::new(manifest.display().to_string(), reason),
        )?;
        Ok(None)
    }

    fn load_package(&self, path: &Path, discovery: &mut Discovery) -> Result<(), WrangleError> {
        let location = path.display().to_string();

        let manifest = match std::fs::read_to_string(path)
            .map_err(|e| format!("unreadable manifest: {e}"))
            .and_then(|content| parse_package_manifest(&content).map_err(|e| e.to_string()))
        {
            Ok(manifest) => manifest,
            Err(reason) => return self.reject(discovery, ManifestDiagnostic::new(location, reason)),
        };

        if let Some(required) = &manifest.min_host_version {
            if *required > self.host_version {
                return self.reject(
                    discovery,
                    ManifestDiagnostic::new(
                        location,
                        format!(
                            "package {} requires host {required} or newer (running {})",
                            manifest.name, self.host_version
                        ),
                    ),
                );
            }
        }

        for (label, reason) in &manifest.rejected {
            self.reject(
                discovery,
                ManifestDiagnostic::new(format!("{location}#{label}"), reason.as_str()),
            )?;
        }

        for entry in &manifest.entries {
            if entry.group != self.group {
                trace!(plugin = %entry.name, group = %entry.group, "ignoring entry from other group");
                continue;
            }
            if self.disabled.contains(&entry.name) {
                debug!(plugin = %entry.name, "plugin disabled by configuration");
                continue;
            }
            let entry_location = format!("{location}#{}", entry.name);
            let Some(factory) = self.factories.get(&entry.constructor) else {
                self.reject(
                    discovery,
                    ManifestDiagnostic::new(
                        entry_location,
                        format!("constructor `{}` is not available", entry.constructor),
                    ),
                )?;
                continue;
            };
            let descriptor = PluginDescriptor::new(entry.name.clone(), factory)
                .with_version(entry.version.clone().unwrap_or_else(|| manifest.version.clone()))
                .with_description(entry.description.clone())
                .with_capabilities(entry.capabilities.iter().copied())
                .with_constructor(entry.constructor.clone())
                .with_origin(PluginOrigin::Package {
                    name: manifest.name.clone(),
                    version: manifest.version.clone(),
                    manifest: path.to_path_buf(),
                });
            if let Err(existing) = discovery.insert(descriptor) {
                self.reject(
                    discovery,
                    ManifestDiagnostic::new(
                        entry_location,
                        format!("duplicate plugin name, already provided by {existing}"),
                    ),
                )?;
            }
        }
        Ok(())
    }
}

impl ManifestSource for LiveSource {
    fn list_descriptors(&self) -> Result<Discovery, WrangleError> {
        if let Some(allowlist) = self.scope.allowlist() {
            return self.builtin_only(&allowlist);
        }

        let mut discovery = Discovery::default();
        for descriptor in &self.builtins {
            if !self.disabled.contains(descriptor.name()) {
                let _ = discovery.insert(descriptor.clone());
            }
        }
        for path in self.manifest_paths(&mut discovery)? {
            self.load_package(&path, &mut discovery)?;
        }
        Ok(discovery)
    }
}

impl std::fmt::Debug for LiveSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveSource")
            .field("group", &self.group)
            .field("search_paths", &self.search_paths)
            .field("strict", &self.strict)
            .field("disabled", &self.disabled)
            .field("builtins", &self.builtins.len())
            .field("limited", &self.scope.is_limited())
            .finish()
    }
}
