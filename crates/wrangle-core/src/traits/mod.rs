// SPDX-FileCopyrightText: 2026 Wrangle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin and capability trait definitions.
//!
//! Every plugin implements [`Plugin`]; capability traits extend it and are
//! reached through the `as_*` accessors on the base trait.

pub mod factory;
pub mod flag;
pub mod monitor;
pub mod plugin;
pub mod script;

pub use factory::PluginFactory;
pub use flag::FlagResolver;
pub use monitor::ResourceMonitor;
pub use plugin::{DEFAULT_PRIORITY, Plugin};
pub use script::ScriptDetector;
