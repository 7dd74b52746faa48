// SPDX-FileCopyrightText: 2026 Wrangle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Flag resolution capability.

use crate::traits::plugin::Plugin;
use crate::types::ExecContext;

/// Plugins that can derive operation flags from a resource.
pub trait FlagResolver: Plugin {
    /// Whether flags can be resolved from resources of this type
    /// (e.g. `"yaml"`, `"json"`, `"py"`).
    fn supports(&self, resource_type: &str) -> bool;

    /// Whether this resolver applies to the given execution context.
    fn resolves_for(&self, ctx: &ExecContext) -> bool {
        self.enabled_for(ctx).enabled
    }
}
