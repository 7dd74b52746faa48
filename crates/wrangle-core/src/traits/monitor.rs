// SPDX-FileCopyrightText: 2026 Wrangle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resource monitoring capability.

use crate::traits::plugin::Plugin;

/// Plugins that watch a host resource during runs.
pub trait ResourceMonitor: Plugin {
    /// The resource watched, e.g. `"gpu"`.
    fn resource(&self) -> &str;
}
