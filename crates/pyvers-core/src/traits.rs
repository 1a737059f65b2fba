use std::path::PathBuf;

use crate::{Build, Installation, LinkError, Version};

/// Knows which versions exist and where they are installed.
pub trait VersionCatalog {
    fn versions(&self) -> anyhow::Result<Vec<Version>>;

    /// `Ok(None)` when the version has no valid installation.
    fn find_installation(&self, version: &Version) -> anyhow::Result<Option<Installation>>;

    fn find_best_build_name(&self, version: &Version) -> anyhow::Result<String>;
}

/// Puts bytes on disk and takes them away again.
pub trait Installer {
    /// Installs `build`, or the best build when `None`, replacing any existing
    /// installation of `version` in place. Returns the installation root.
    fn install(&mut self, version: &Version, build: Option<&Build>) -> anyhow::Result<PathBuf>;

    /// Returns the path that was removed.
    fn uninstall(&mut self, version: &Version) -> anyhow::Result<PathBuf>;
}

/// Keeps command shims consistent with installation state.
pub trait Linker {
    fn link(&mut self, version: &Version) -> Result<(), LinkError>;

    fn unlink(&mut self, version: &Version) -> Result<(), LinkError>;

    fn use_versions(&mut self, versions: &[Version]) -> Result<(), LinkError>;
}
