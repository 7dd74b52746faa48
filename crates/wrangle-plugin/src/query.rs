// SPDX-FileCopyrightText: 2026 Wrangle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability queries over the registry.
//!
//! Queries never own instances: every plugin they return comes from
//! [`PluginRegistry::for_name`], so the singleton guarantee holds. Results
//! follow the registry's name order and no match is ever dropped. The first
//! construction failure aborts the query.

use std::sync::Arc;

use wrangle_core::{Capability, ExecContext, Plugin, WrangleError};

use crate::descriptor::PluginDescriptor;
use crate::registry::PluginRegistry;

/// A plugin that reported itself enabled for an operation.
#[derive(Clone)]
pub struct EnabledPlugin {
    pub plugin: Arc<dyn Plugin>,
    /// The plugin's own explanation, surfaced in check reports.
    pub reason: String,
}

impl std::fmt::Debug for EnabledPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnabledPlugin")
            .field("plugin", &self.plugin.name())
            .field("reason", &self.reason)
            .finish()
    }
}

impl PluginRegistry {
    /// Instances whose descriptor matches `predicate`.
    ///
    /// The predicate sees manifest metadata only, so unmatched plugins are
    /// never constructed. Operates on the already-known descriptor set.
    pub fn find_matching<F>(&self, predicate: F) -> Result<Vec<Arc<dyn Plugin>>, WrangleError>
    where
        F: Fn(&PluginDescriptor) -> bool,
    {
        self.known_descriptors()?
            .iter()
            .filter(|descriptor| predicate(descriptor))
            .map(|descriptor| self.for_name(descriptor.name()))
            .collect()
    }

    /// Instances whose manifest declares `capability`.
    pub fn with_capability(
        &self,
        capability: Capability,
    ) -> Result<Vec<Arc<dyn Plugin>>, WrangleError> {
        self.find_matching(|descriptor| descriptor.declares(capability))
    }

    /// Instances matching a predicate over the constructed plugin. Every
    /// known plugin is constructed to evaluate it.
    pub fn find_matching_instances<F>(
        &self,
        predicate: F,
    ) -> Result<Vec<Arc<dyn Plugin>>, WrangleError>
    where
        F: Fn(&dyn Plugin) -> bool,
    {
        let mut matches = Vec::new();
        for descriptor in self.known_descriptors()? {
            let plugin = self.for_name(descriptor.name())?;
            if predicate(plugin.as_ref()) {
                matches.push(plugin);
            }
        }
        Ok(matches)
    }

    /// Plugins that report themselves enabled for `ctx`, with their reasons.
    pub fn enabled_for(&self, ctx: &ExecContext) -> Result<Vec<EnabledPlugin>, WrangleError> {
        let mut enabled = Vec::new();
        for descriptor in self.known_descriptors()? {
            let plugin = self.for_name(descriptor.name())?;
            let enablement = plugin.enabled_for(ctx);
            if enablement.enabled {
                enabled.push(EnabledPlugin {
                    plugin,
                    reason: enablement.reason,
                });
            }
        }
        Ok(enabled)
    }

    /// Flag resolvers able to handle `resource_type`. Only plugins that
    /// declare flag resolution are constructed.
    pub fn flag_resolvers_for(
        &self,
        resource_type: &str,
    ) -> Result<Vec<Arc<dyn Plugin>>, WrangleError> {
        Ok(self
            .with_capability(Capability::FlagResolution)?
            .into_iter()
            .filter(|plugin| {
                plugin
                    .as_flag_resolver()
                    .is_some_and(|resolver| resolver.supports(resource_type))
            })
            .collect())
    }
}

/// Stable sort by plugin priority, lower first. Ties keep registry order.
pub fn by_priority(mut plugins: Vec<EnabledPlugin>) -> Vec<EnabledPlugin> {
    plugins.sort_by_key(|enabled| enabled.plugin.priority());
    plugins
}
