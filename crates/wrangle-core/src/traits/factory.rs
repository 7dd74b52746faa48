// SPDX-FileCopyrightText: 2026 Wrangle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Zero-argument plugin constructors.

use std::sync::Arc;

use crate::error::WrangleError;
use crate::traits::plugin::Plugin;

/// Builds a plugin instance.
///
/// The registry calls `create` at most once per plugin name. Construction may
/// block (reading configuration, probing hardware); it runs without any
/// registry-wide lock held.
pub trait PluginFactory: Send + Sync {
    fn create(&self) -> Result<Arc<dyn Plugin>, WrangleError>;
}

impl<F> PluginFactory for F
where
    F: Fn() -> Result<Arc<dyn Plugin>, WrangleError> + Send + Sync,
{
    fn create(&self) -> Result<Arc<dyn Plugin>, WrangleError> {
        self()
    }
}
