// SPDX-FileCopyrightText: 2026 Wrangle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin descriptors: discovered metadata plus a constructor, prior to
//! instantiation.

use std::path::PathBuf;
use std::sync::Arc;

use wrangle_core::{Capability, PluginFactory};

/// Where a descriptor came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluginOrigin {
    /// Compiled into the host.
    Builtin,
    /// Advertised by an installed package manifest.
    Package {
        name: String,
        version: semver::Version,
        manifest: PathBuf,
    },
}

impl std::fmt::Display for PluginOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PluginOrigin::Builtin => write!(f, "builtin"),
            PluginOrigin::Package { name, version, .. } => write!(f, "{name} {version}"),
        }
    }
}

/// An installable plugin: identity, metadata, origin, and the factory that
/// builds it.
///
/// Descriptors are immutable once built and cheap to clone; the factory is
/// shared.
#[derive(Clone)]
pub struct PluginDescriptor {
    name: String,
    version: semver::Version,
    description: String,
    capabilities: Vec<Capability>,
    constructor: String,
    origin: PluginOrigin,
    factory: Arc<dyn PluginFactory>,
}

impl PluginDescriptor {
    /// A built-in descriptor whose constructor reference is its name.
    pub fn new(name: impl Into<String>, factory: Arc<dyn PluginFactory>) -> Self {
        let name = name.into();
        Self {
            constructor: name.clone(),
            name,
            version: semver::Version::new(0, 0, 0),
            description: String::new(),
            capabilities: Vec::new(),
            origin: PluginOrigin::Builtin,
            factory,
        }
    }

    pub fn with_version(mut self, version: semver::Version) -> Self {
        self.version = version;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_capabilities(mut self, capabilities: impl IntoIterator<Item = Capability>) -> Self {
        self.capabilities = capabilities.into_iter().collect();
        self
    }

    pub fn with_constructor(mut self, constructor: impl Into<String>) -> Self {
        self.constructor = constructor.into();
        self
    }

    pub fn with_origin(mut self, origin: PluginOrigin) -> Self {
        self.origin = origin;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &semver::Version {
        &self.version
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Capabilities declared by the manifest.
    pub fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }

    /// The constructor reference the descriptor was resolved from.
    pub fn constructor(&self) -> &str {
        &self.constructor
    }

    pub fn origin(&self) -> &PluginOrigin {
        &self.origin
    }

    pub fn factory(&self) -> &Arc<dyn PluginFactory> {
        &self.factory
    }

    /// Whether the manifest declares `capability`. Never constructs the plugin.
    pub fn declares(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }
}

impl std::fmt::Debug for PluginDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginDescriptor")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("capabilities", &self.capabilities)
            .field("constructor", &self.constructor)
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}
