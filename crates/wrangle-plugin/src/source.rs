// SPDX-FileCopyrightText: 2026 Wrangle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Manifest sources: where the registry learns which plugins exist.

use wrangle_core::{ManifestDiagnostic, WrangleError};

use crate::descriptor::PluginDescriptor;

/// The outcome of one enumeration: usable descriptors in stable order, plus
/// every entry that was skipped.
#[derive(Debug, Default, Clone)]
pub struct Discovery {
    pub descriptors: Vec<PluginDescriptor>,
    pub diagnostics: Vec<ManifestDiagnostic>,
}

impl Discovery {
    /// Add a descriptor unless its name is already taken. On collision the
    /// first descriptor wins and the origin of the existing one is returned.
    pub fn insert(&mut self, descriptor: PluginDescriptor) -> Result<(), String> {
        match self
            .descriptors
            .iter()
            .find(|existing| existing.name() == descriptor.name())
        {
            Some(existing) => Err(existing.origin().to_string()),
            None => {
                self.descriptors.push(descriptor);
                Ok(())
            }
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.descriptors.iter().map(PluginDescriptor::name)
    }
}

/// Enumerates the plugins registered under one group.
///
/// Implementations re-enumerate on every call; caching is the registry's job.
/// Ordering must be stable within a process run.
pub trait ManifestSource: Send + Sync {
    fn list_descriptors(&self) -> Result<Discovery, WrangleError>;
}

/// An in-memory source over a fixed descriptor list.
#[derive(Debug, Default, Clone)]
pub struct StaticSource {
    descriptors: Vec<PluginDescriptor>,
}

impl StaticSource {
    pub fn new(descriptors: impl IntoIterator<Item = PluginDescriptor>) -> Self {
        Self {
            descriptors: descriptors.into_iter().collect(),
        }
    }
}

impl ManifestSource for StaticSource {
    fn list_descriptors(&self) -> Result<Discovery, WrangleError> {
        let mut discovery = Discovery::default();
        for descriptor in &self.descriptors {
            let name = descriptor.name().to_string();
            if let Err(existing) = discovery.insert(descriptor.clone()) {
                discovery.diagnostics.push(ManifestDiagnostic::new(
                    name,
                    format!("duplicate plugin name, already provided by {existing}"),
                ));
            }
        }
        Ok(discovery)
    }
}
