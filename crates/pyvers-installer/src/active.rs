use anyhow::{Context, Result};
use pyvers_core::Version;
use std::fs;
use std::io;
use std::path::PathBuf;

use crate::fs_utils::{remove_file_if_exists, write_atomic};

/// Ordered set of versions whose shared commands are exposed, persisted one
/// version per line. Every mutation is flushed before it returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveStore {
    path: PathBuf,
    versions: Vec<Version>,
}

impl ActiveStore {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => String::new(),
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("failed to read active version state: {}", path.display())
                });
            }
        };

        let mut versions: Vec<Version> = Vec::new();
        for line in raw.lines().map(str::trim).filter(|line| !line.is_empty()) {
            match Version::parse(line) {
                Ok(version) if !versions.contains(&version) => versions.push(version),
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(path = %path.display(), "ignoring active entry '{line}': {err}");
                }
            }
        }

        Ok(Self { path, versions })
    }

    pub fn versions(&self) -> &[Version] {
        &self.versions
    }

    pub fn replace(&mut self, versions: Vec<Version>) -> io::Result<()> {
        let mut deduped: Vec<Version> = Vec::with_capacity(versions.len());
        for version in versions {
            if !deduped.contains(&version) {
                deduped.push(version);
            }
        }
        self.versions = deduped;
        self.flush()
    }

    /// Returns whether the version was active.
    pub fn remove(&mut self, version: &Version) -> io::Result<bool> {
        let before = self.versions.len();
        self.versions.retain(|active| active != version);
        if self.versions.len() == before {
            return Ok(false);
        }
        self.flush()?;
        Ok(true)
    }

    fn flush(&self) -> io::Result<()> {
        if self.versions.is_empty() {
            return remove_file_if_exists(&self.path);
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut payload = String::new();
        for version in &self.versions {
            payload.push_str(&format!("{version}\n"));
        }
        write_atomic(&self.path, payload.as_bytes())
    }
}
