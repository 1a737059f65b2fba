use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};

use crate::{ArchiveType, Build, Version};

/// The set of versions this machine knows how to install, loaded from a TOML
/// file:
///
/// ```toml
/// [[versions]]
/// name = "3.11"
///
/// [[versions.builds]]
/// name = "3.11.9"
/// source = "dist/python-3.11.9.tar.gz"
/// sha256 = "..."
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Catalog {
    #[serde(default, rename = "versions")]
    pub entries: Vec<CatalogEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogEntry {
    #[serde(rename = "name")]
    pub version: Version,
    #[serde(default)]
    pub builds: Vec<CatalogBuild>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogBuild {
    pub name: Build,
    pub source: PathBuf,
    pub archive: Option<ArchiveType>,
    pub sha256: Option<String>,
    #[serde(default)]
    pub strip_components: u32,
}

impl Catalog {
    pub fn from_toml_str(input: &str) -> anyhow::Result<Self> {
        let catalog: Self = toml::from_str(input).context("failed to parse version catalog")?;

        let mut seen_versions = HashSet::new();
        for entry in &catalog.entries {
            if !seen_versions.insert(entry.version.clone()) {
                return Err(anyhow!("duplicate catalog entry for {}", entry.version));
            }

            let mut seen_builds: Vec<&Build> = Vec::new();
            for build in &entry.builds {
                if seen_builds.iter().any(|seen| **seen == build.name) {
                    return Err(anyhow!(
                        "duplicate build '{}' for {}",
                        build.name,
                        entry.version
                    ));
                }
                if build.name.semver().major != entry.version.major()
                    || build.name.semver().minor != entry.version.minor()
                {
                    return Err(anyhow!(
                        "build '{}' does not belong to release line {}",
                        build.name,
                        entry.version
                    ));
                }
                if let Some(sha256) = &build.sha256 {
                    validate_sha256(sha256).with_context(|| {
                        format!("invalid sha256 for build '{}'", build.name)
                    })?;
                }
                seen_builds.push(&build.name);
            }
        }

        Ok(catalog)
    }

    /// Loads a catalog file, resolving relative build sources against the
    /// directory that holds it.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read version catalog: {}", path.display()))?;
        let mut catalog = Self::from_toml_str(&raw)
            .with_context(|| format!("invalid version catalog: {}", path.display()))?;

        if let Some(base) = path.parent() {
            for build in catalog
                .entries
                .iter_mut()
                .flat_map(|entry| entry.builds.iter_mut())
            {
                if build.source.is_relative() {
                    build.source = base.join(&build.source);
                }
            }
        }
        Ok(catalog)
    }

    pub fn versions(&self) -> Vec<Version> {
        self.entries
            .iter()
            .map(|entry| entry.version.clone())
            .collect()
    }

    pub fn entry(&self, version: &Version) -> Option<&CatalogEntry> {
        self.entries.iter().find(|entry| &entry.version == version)
    }

    pub fn find_build(&self, version: &Version, build: &Build) -> Option<&CatalogBuild> {
        self.entry(version)?
            .builds
            .iter()
            .find(|candidate| &candidate.name == build)
    }
}

impl CatalogBuild {
    pub fn archive_type(&self) -> ArchiveType {
        self.archive
            .or_else(|| ArchiveType::infer_from_path(&self.source.to_string_lossy()))
            .unwrap_or(ArchiveType::Directory)
    }
}

fn validate_sha256(value: &str) -> anyhow::Result<()> {
    if value.len() != 64 || !value.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(anyhow!("expected 64 hexadecimal characters"));
    }
    Ok(())
}
