// SPDX-FileCopyrightText: 2026 Wrangle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Package manifest parsing from `plugin.toml` files.
//!
//! A package advertises any number of entries, each registered under a
//! group. Problems with one entry reject only that entry; problems with the
//! `[package]` table or the TOML itself reject the whole file.

use std::str::FromStr;

use serde::Deserialize;
use wrangle_core::{Capability, WrangleError};

/// A parsed `plugin.toml`.
#[derive(Debug, Clone)]
pub struct PackageManifest {
    /// Package name, used as the origin tag of its descriptors.
    pub name: String,
    pub version: semver::Version,
    /// Oldest host version the package supports.
    pub min_host_version: Option<semver::Version>,
    /// Entries that passed validation, in file order.
    pub entries: Vec<ManifestEntry>,
    /// Entries that failed validation: (label, reason).
    pub rejected: Vec<(String, String)>,
}

/// One validated `[[entry]]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub name: String,
    pub group: String,
    /// Reference resolved against the host's factory table.
    pub constructor: String,
    pub description: String,
    /// Entry-specific version; falls back to the package version.
    pub version: Option<semver::Version>,
    pub capabilities: Vec<Capability>,
}

#[derive(Debug, Deserialize)]
struct PackageManifestFile {
    package: PackageSection,
    #[serde(default)]
    entry: Vec<toml::Value>,
}

#[derive(Debug, Deserialize)]
struct PackageSection {
    name: String,
    version: String,
    min_host_version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EntrySection {
    name: String,
    group: String,
    constructor: String,
    #[serde(default)]
    description: String,
    version: Option<String>,
    #[serde(default)]
    capabilities: Vec<String>,
}

/// Parse a package manifest from TOML content.
pub fn parse_package_manifest(toml_content: &str) -> Result<PackageManifest, WrangleError> {
    let file: PackageManifestFile = toml::from_str(toml_content)
        .map_err(|e| WrangleError::Config(format!("invalid package manifest: {e}")))?;

    let package = file.package;
    if package.name.trim().is_empty() {
        return Err(WrangleError::Config(
            "package manifest: name must not be empty".to_string(),
        ));
    }

    let version = semver::Version::parse(&package.version).map_err(|e| {
        WrangleError::Config(format!(
            "package manifest: invalid version '{}': {e}",
            package.version
        ))
    })?;

    let min_host_version = package
        .min_host_version
        .as_deref()
        .map(semver::Version::parse)
        .transpose()
        .map_err(|e| WrangleError::Config(format!("package manifest: invalid min_host_version: {e}")))?;

    let mut entries = Vec::new();
    let mut rejected = Vec::new();
    for (index, raw) in file.entry.into_iter().enumerate() {
        let label = raw
            .get("name")
            .and_then(toml::Value::as_str)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("entry[{index}]"));
        match parse_entry(raw) {
            Ok(entry) => entries.push(entry),
            Err(reason) => rejected.push((label, reason)),
        }
    }

    Ok(PackageManifest {
        name: package.name,
        version,
        min_host_version,
        entries,
        rejected,
    })
}

fn parse_entry(raw: toml::Value) -> Result<ManifestEntry, String> {
    let section: EntrySection = raw.try_into().map_err(|e| format!("malformed entry: {e}"))?;

    for (field, value) in [
        ("name", &section.name),
        ("group", &section.group),
        ("constructor", &section.constructor),
    ] {
        if value.trim().is_empty() {
            return Err(format!("{field} must not be empty"));
        }
    }

    let version = section
        .version
        .as_deref()
        .map(semver::Version::parse)
        .transpose()
        .map_err(|e| format!("invalid version: {e}"))?;

    let capabilities = section
        .capabilities
        .iter()
        .map(|c| {
            Capability::from_str(c).map_err(|_| {
                format!(
                    "unknown capability '{c}'. Expected one of: flag-resolution, script-detection, resource-monitoring, metadata-reporting"
                )
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ManifestEntry {
        name: section.name,
        group: section.group,
        constructor: section.constructor,
        description: section.description,
        version,
        capabilities,
    })
}
