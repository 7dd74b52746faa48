// SPDX-FileCopyrightText: 2026 Wrangle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scope limiting: restrict discovery to an allowlist of built-in plugins.
//!
//! A limited [`LiveSource`](crate::discovery::LiveSource) ignores installed
//! packages entirely and serves only allowlisted built-ins, which makes
//! plugin-dependent behavior reproducible in tests regardless of what is
//! installed. Production code never limits scope.
//!
//! Configure the limiter before any concurrent resolution begins; its effect
//! on enumerations already in flight is unspecified.

use std::collections::BTreeSet;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use tracing::info;

static GLOBAL_SCOPE: LazyLock<Arc<ScopeLimiter>> =
    LazyLock::new(|| Arc::new(ScopeLimiter::new()));

/// Allowlist state shared by the sources that consult it.
#[derive(Debug, Default)]
pub struct ScopeLimiter {
    allowlist: RwLock<Option<BTreeSet<String>>>,
}

impl ScopeLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict discovery to these built-in names, replacing any previous
    /// allowlist.
    pub fn limit_to<I, S>(&self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: BTreeSet<String> = names.into_iter().map(Into::into).collect();
        info!(plugins = ?names, "plugin discovery limited to built-ins");
        *self.allowlist.write().unwrap_or_else(PoisonError::into_inner) = Some(names);
    }

    /// The current allowlist, or `None` when discovery is unrestricted.
    pub fn allowlist(&self) -> Option<BTreeSet<String>> {
        self.allowlist
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_limited(&self) -> bool {
        self.allowlist
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Lift the restriction. Intended for test isolation.
    pub fn reset(&self) {
        *self.allowlist.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

/// The process-wide limiter consulted by default-constructed live sources.
pub fn global_scope() -> Arc<ScopeLimiter> {
    Arc::clone(&GLOBAL_SCOPE)
}

/// Limit process-wide discovery to the given built-in plugins.
pub fn limit_to_builtin<I, S>(names: I)
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    GLOBAL_SCOPE.limit_to(names);
}

/// Lift the process-wide limit.
pub fn reset_scope() {
    GLOBAL_SCOPE.reset();
}
