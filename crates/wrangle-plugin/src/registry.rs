// SPDX-FileCopyrightText: 2026 Wrangle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin registry: lazy singleton construction keyed by plugin name.
//!
//! The `PluginRegistry` keeps an index of the descriptors its
//! [`ManifestSource`] last reported and one [`PluginSlot`] per name that has
//! been requested. The index lock is only held to look up or insert slots,
//! never while a constructor runs.
//!
//! Slots are never removed. Once a name has been requested its slot (and the
//! instance in it) lives as long as the registry, even if a later refresh no
//! longer reports the descriptor.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use tracing::info;
use wrangle_config::RegistryConfig;
use wrangle_core::{ManifestDiagnostic, Plugin, WrangleError};

use crate::descriptor::PluginDescriptor;
use crate::discovery::{FactoryTable, LiveSource};
use crate::slot::{PluginSlot, PluginState};
use crate::source::{Discovery, ManifestSource};

#[derive(Default)]
struct RegistryState {
    loaded: bool,
    descriptors: BTreeMap<String, PluginDescriptor>,
    slots: HashMap<String, Arc<PluginSlot>>,
    diagnostics: Vec<ManifestDiagnostic>,
}

impl RegistryState {
    fn install(&mut self, discovery: Discovery) {
        self.descriptors = discovery
            .descriptors
            .into_iter()
            .map(|d| (d.name().to_string(), d))
            .collect();
        self.diagnostics = discovery.diagnostics;
        self.loaded = true;
    }
}

/// Owns the singleton plugin instances of one manifest source.
///
/// Registries are explicit objects: pass one by reference (or `Arc`) to the
/// components that need plugins. Tests build isolated registries over a
/// [`StaticSource`](crate::source::StaticSource).
pub struct PluginRegistry {
    source: Arc<dyn ManifestSource>,
    state: RwLock<RegistryState>,
    resolve_timeout: Option<Duration>,
}

impl PluginRegistry {
    /// Create a registry over `source`. Nothing is read until first use.
    pub fn new(source: impl ManifestSource + 'static) -> Self {
        Self::with_source(Arc::new(source))
    }

    pub fn with_source(source: Arc<dyn ManifestSource>) -> Self {
        Self {
            source,
            state: RwLock::new(RegistryState::default()),
            resolve_timeout: None,
        }
    }

    /// A live registry configured from the `[registry]` section.
    pub fn from_config(config: &RegistryConfig, factories: FactoryTable) -> Self {
        Self::new(LiveSource::from_config(config, factories))
            .with_resolve_timeout(config.resolve_timeout())
    }

    /// Bound how long [`for_name`](Self::for_name) waits on another caller's
    /// in-flight construction of the same plugin.
    pub fn with_resolve_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.resolve_timeout = timeout;
        self
    }

    pub fn resolve_timeout(&self) -> Option<Duration> {
        self.resolve_timeout
    }

    /// Re-read the manifest source and replace the descriptor index.
    ///
    /// Instances already constructed are kept.
    pub fn refresh(&self) -> Result<(), WrangleError> {
        let discovery = self.source.list_descriptors()?;
        let mut state = self.write();
        state.install(discovery);
        info!(
            plugins = state.descriptors.len(),
            diagnostics = state.diagnostics.len(),
            "plugin index loaded"
        );
        Ok(())
    }

    fn ensure_loaded(&self) -> Result<(), WrangleError> {
        if self.read().loaded {
            return Ok(());
        }
        self.refresh()
    }

    /// Every currently available plugin with its descriptor, sorted by name.
    ///
    /// Re-reads the manifest source on each call and never constructs
    /// instances.
    pub fn iter_plugins(
        &self,
    ) -> Result<impl Iterator<Item = (String, PluginDescriptor)>, WrangleError> {
        self.refresh()?;
        let snapshot: Vec<(String, PluginDescriptor)> = self
            .read()
            .descriptors
            .iter()
            .map(|(name, descriptor)| (name.clone(), descriptor.clone()))
            .collect();
        Ok(snapshot.into_iter())
    }

    /// The instance registered under `name`, constructing it on first use.
    ///
    /// Every call with the same name returns the same instance. Concurrent
    /// first calls construct once; the others wait for that construction.
    pub fn for_name(&self, name: &str) -> Result<Arc<dyn Plugin>, WrangleError> {
        self.slot(name)?.resolve(self.resolve_timeout)
    }

    fn slot(&self, name: &str) -> Result<Arc<PluginSlot>, WrangleError> {
        self.ensure_loaded()?;
        if let Some(slot) = self.read().slots.get(name) {
            return Ok(Arc::clone(slot));
        }

        let mut state = self.write();
        if let Some(slot) = state.slots.get(name) {
            return Ok(Arc::clone(slot));
        }
        let descriptor = state
            .descriptors
            .get(name)
            .cloned()
            .ok_or_else(|| WrangleError::UnknownPlugin {
                name: name.to_string(),
            })?;
        let slot = Arc::new(PluginSlot::new(descriptor));
        state.slots.insert(name.to_string(), Arc::clone(&slot));
        Ok(slot)
    }

    /// Resolution state of `name`, or `None` if the name is not known.
    /// Does not read the manifest source.
    pub fn state(&self, name: &str) -> Option<PluginState> {
        let state = self.read();
        match state.slots.get(name) {
            Some(slot) => Some(slot.state()),
            None => state
                .descriptors
                .contains_key(name)
                .then_some(PluginState::Unresolved),
        }
    }

    /// The descriptor of a requested plugin, or of a known one.
    pub fn descriptor(&self, name: &str) -> Option<PluginDescriptor> {
        let state = self.read();
        state
            .slots
            .get(name)
            .map(|slot| slot.descriptor().clone())
            .or_else(|| state.descriptors.get(name).cloned())
    }

    /// Entries skipped by the last enumeration.
    pub fn diagnostics(&self) -> Vec<ManifestDiagnostic> {
        self.read().diagnostics.clone()
    }

    /// Allow a failed plugin to be constructed again on its next lookup.
    /// Returns `false` if the name is not in the `Failed` state.
    pub fn reset_failed(&self, name: &str) -> bool {
        let slot = self.read().slots.get(name).cloned();
        slot.is_some_and(|slot| slot.reset_failed())
    }

    /// Known descriptors in name order, loading the index on first use.
    pub(crate) fn known_descriptors(&self) -> Result<Vec<PluginDescriptor>, WrangleError> {
        self.ensure_loaded()?;
        Ok(self.read().descriptors.values().cloned().collect())
    }

    fn read(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A live registry over the built-in table and the process-wide scope.
impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new(LiveSource::new(FactoryTable::new()))
    }
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.read();
        f.debug_struct("PluginRegistry")
            .field("loaded", &state.loaded)
            .field("plugins", &state.descriptors.keys().collect::<Vec<_>>())
            .field("constructed", &state.slots.len())
            .field("resolve_timeout", &self.resolve_timeout)
            .finish()
    }
}
