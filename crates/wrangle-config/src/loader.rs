// SPDX-FileCopyrightText: 2026 Wrangle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./wrangle.toml` > `~/.config/wrangle/wrangle.toml` > `/etc/wrangle/wrangle.toml`
//! with environment variable overrides via `WRANGLE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::WrangleConfig;

pub(crate) const SYSTEM_CONFIG: &str = "/etc/wrangle/wrangle.toml";
pub(crate) const LOCAL_CONFIG: &str = "wrangle.toml";

pub(crate) fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("wrangle/wrangle.toml"))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/wrangle/wrangle.toml` (system-wide)
/// 3. `~/.config/wrangle/wrangle.toml` (user XDG config)
/// 4. `./wrangle.toml` (local directory)
/// 5. `WRANGLE_*` environment variables
pub fn load_config() -> Result<WrangleConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string over compiled defaults (no XDG lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<WrangleConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(WrangleConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<WrangleConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(WrangleConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(WrangleConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG))
        .merge(env_provider())
}

/// Maps `WRANGLE_REGISTRY_RESOLVE_TIMEOUT_SECS` to `registry.resolve_timeout_secs`.
///
/// Only the section prefix is split; `Env::split("_")` would break
/// underscore-containing keys.
fn env_provider() -> Env {
    Env::prefixed("WRANGLE_").map(|key| key.as_str().replacen("registry_", "registry.", 1).into())
}
