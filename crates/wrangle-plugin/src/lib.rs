// SPDX-FileCopyrightText: 2026 Wrangle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin discovery, the singleton registry, and capability queries.
//!
//! A [`ManifestSource`] enumerates the plugins registered under one group,
//! either from installed package manifests ([`LiveSource`]) or from a fixed
//! list ([`StaticSource`]). The [`PluginRegistry`] constructs each plugin at
//! most once, on first request, and the query methods filter its plugins by
//! declared capability or instance behavior.
//!
//! # Usage
//!
//! ```no_run
//! use wrangle_core::Capability;
//! use wrangle_plugin::{FactoryTable, PluginRegistry};
//!
//! let config = wrangle_config::load_and_validate().expect("config errors");
//! let registry = PluginRegistry::from_config(&config.registry, FactoryTable::new());
//! for (name, descriptor) in registry.iter_plugins().expect("plugin index") {
//!     println!("{name} {}", descriptor.version());
//! }
//! let monitors = registry.with_capability(Capability::ResourceMonitoring);
//! ```

pub mod builtin;
pub mod catalog;
pub mod descriptor;
pub mod discovery;
pub mod manifest;
pub mod query;
pub mod registry;
pub mod scope;
pub mod slot;
pub mod source;

pub use catalog::builtin_catalog;
pub use descriptor::{PluginDescriptor, PluginOrigin};
pub use discovery::{FactoryTable, LiveSource, host_version};
pub use manifest::{ManifestEntry, PackageManifest, parse_package_manifest};
pub use query::{EnabledPlugin, by_priority};
pub use registry::PluginRegistry;
pub use scope::{ScopeLimiter, global_scope, limit_to_builtin, reset_scope};
pub use slot::PluginState;
pub use source::{Discovery, ManifestSource, StaticSource};
