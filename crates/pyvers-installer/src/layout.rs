use anyhow::{Context, Result};
use pyvers_core::Version;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixLayout {
    prefix: PathBuf,
}

impl PrefixLayout {
    pub fn new(prefix: impl Into<PathBuf>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &Path {
        &self.prefix
    }

    pub fn versions_dir(&self) -> PathBuf {
        self.prefix.join("versions")
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.prefix.join("bin")
    }

    pub fn state_dir(&self) -> PathBuf {
        self.prefix.join("state")
    }

    pub fn tmp_state_dir(&self) -> PathBuf {
        self.state_dir().join("tmp")
    }

    pub fn active_path(&self) -> PathBuf {
        self.state_dir().join("active")
    }

    pub fn config_path(&self) -> PathBuf {
        self.prefix.join("config.toml")
    }

    pub fn default_catalog_path(&self) -> PathBuf {
        self.prefix.join("catalog.toml")
    }

    pub fn version_root(&self, version: &Version) -> PathBuf {
        self.versions_dir().join(version.name())
    }

    pub fn ensure_base_dirs(&self) -> Result<()> {
        for dir in [
            self.versions_dir(),
            self.bin_dir(),
            self.state_dir(),
            self.tmp_state_dir(),
        ] {
            fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }
        Ok(())
    }
}

pub fn default_user_prefix() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os("PYVERS_HOME").filter(|value| !value.is_empty()) {
        return Ok(PathBuf::from(home));
    }

    if cfg!(windows) {
        let app_data = std::env::var("LOCALAPPDATA")
            .context("LOCALAPPDATA is not set; cannot resolve Windows user prefix")?;
        return Ok(PathBuf::from(app_data).join("Pyvers"));
    }

    let home = std::env::var("HOME").context("HOME is not set; cannot resolve user prefix")?;
    Ok(PathBuf::from(home).join(".pyvers"))
}
