// SPDX-FileCopyrightText: 2026 Wrangle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Runnable-script detection capability.

use std::path::Path;

use crate::traits::plugin::Plugin;

/// Plugins that recognize scripts they know how to run.
pub trait ScriptDetector: Plugin {
    fn detects(&self, path: &Path) -> bool;
}
