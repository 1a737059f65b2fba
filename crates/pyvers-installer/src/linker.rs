use anyhow::Result;
use pyvers_core::{CommandScope, CommandSpec, LinkError, Linker, Version};
use std::collections::BTreeSet;
use std::io;
use std::path::PathBuf;

use crate::exposure::{exposed_commands, remove_shim, write_shim};
use crate::installations::has_valid_installation;
use crate::{ActiveStore, PrefixLayout};

/// Label used in [`LinkError`]s that concern the active-version file rather
/// than a single command.
const ACTIVE_SET_LABEL: &str = "<active set>";

/// Link Manager backed by shims in the prefix bin directory and the persisted
/// active-version set.
///
/// Versioned commands always follow their own installation. A shared command
/// belongs to the first active version that is installed and ships it; with no
/// such version the shim is removed. No shim is ever left pointing into a
/// version root that lacks a valid installation.
#[derive(Debug)]
pub struct ShimLinker {
    layout: PrefixLayout,
    store: ActiveStore,
}

impl ShimLinker {
    pub fn open(layout: PrefixLayout) -> Result<Self> {
        let store = ActiveStore::load(layout.active_path())?;
        Ok(Self { layout, store })
    }

    pub fn active(&self) -> &[Version] {
        self.store.versions()
    }

    fn is_installed(&self, version: &Version) -> Result<bool, LinkError> {
        has_valid_installation(&self.layout, version).map_err(|err| {
            LinkError::new(self.layout.version_root(version).display().to_string(), err)
        })
    }

    /// Where `spec` resolves inside the installation of `version`, when that
    /// file exists.
    fn command_source(
        &self,
        version: &Version,
        spec: &CommandSpec,
    ) -> Result<Option<PathBuf>, LinkError> {
        if !self.is_installed(version)? {
            return Ok(None);
        }
        let source = self
            .layout
            .version_root(version)
            .join(&spec.target_rel_path);
        match source.try_exists() {
            Ok(true) => Ok(Some(source)),
            Ok(false) => Ok(None),
            Err(err) => Err(LinkError::new(&spec.name, err)),
        }
    }

    fn shared_owner(&self, command: &str) -> Result<Option<PathBuf>, LinkError> {
        for version in self.store.versions() {
            let Some(spec) = version.provides_command(command) else {
                continue;
            };
            if spec.scope != CommandScope::Shared {
                continue;
            }
            if let Some(source) = self.command_source(version, &spec)? {
                return Ok(Some(source));
            }
        }
        Ok(None)
    }

    fn point(&self, command: &str, source: Option<PathBuf>) -> Result<(), LinkError> {
        match source {
            Some(source) => {
                let changed = write_shim(&self.layout, command, &source)
                    .map_err(|err| LinkError::new(command, err))?;
                if changed {
                    tracing::debug!(command, target = %source.display(), "linked command");
                }
            }
            None => {
                let removed =
                    remove_shim(&self.layout, command).map_err(|err| LinkError::new(command, err))?;
                if removed {
                    tracing::debug!(command, "removed command");
                }
            }
        }
        Ok(())
    }

    fn reconcile_shared(&self, command: &str) -> Result<(), LinkError> {
        let owner = self.shared_owner(command)?;
        self.point(command, owner)
    }

    /// Removes every shim that resolves into the root of `version`, including
    /// ones left behind under names this version no longer declares.
    fn remove_shims_into(&self, version: &Version) -> Result<(), LinkError> {
        let root = self.layout.version_root(version);
        let exposed = exposed_commands(&self.layout).map_err(|err| {
            LinkError::new(self.layout.bin_dir().display().to_string(), err)
        })?;
        for (command, target) in exposed {
            if target.starts_with(&root) {
                self.point(&command, None)?;
            }
        }
        Ok(())
    }
}

impl Linker for ShimLinker {
    fn link(&mut self, version: &Version) -> Result<(), LinkError> {
        if !self.is_installed(version)? {
            tracing::warn!(%version, "no valid installation; removing its command shims");
            return self.unlink(version);
        }

        for spec in version.commands() {
            match spec.scope {
                CommandScope::Versioned => {
                    let source = self.command_source(version, &spec)?;
                    self.point(&spec.name, source)?;
                }
                CommandScope::Shared => self.reconcile_shared(&spec.name)?,
            }
        }
        Ok(())
    }

    fn unlink(&mut self, version: &Version) -> Result<(), LinkError> {
        let was_active = self
            .store
            .remove(version)
            .map_err(|err| LinkError::new(ACTIVE_SET_LABEL, err))?;
        if was_active {
            tracing::debug!(%version, "removed from active set");
        }

        self.remove_shims_into(version)?;
        for spec in version.commands() {
            match spec.scope {
                CommandScope::Versioned => self.point(&spec.name, None)?,
                CommandScope::Shared => self.reconcile_shared(&spec.name)?,
            }
        }
        Ok(())
    }

    fn use_versions(&mut self, versions: &[Version]) -> Result<(), LinkError> {
        let mut accepted: Vec<Version> = Vec::new();
        for version in versions {
            if accepted.contains(version) {
                continue;
            }
            if self.is_installed(version)? {
                accepted.push(version.clone());
            } else {
                tracing::warn!(%version, "not installed; leaving it out of the active set");
            }
        }

        let mut affected = BTreeSet::new();
        for version in self.store.versions().iter().chain(accepted.iter()) {
            for spec in version.shared_commands() {
                affected.insert(spec.name);
            }
        }

        self.store
            .replace(accepted)
            .map_err(|err: io::Error| LinkError::new(ACTIVE_SET_LABEL, err))?;
        for command in affected {
            self.reconcile_shared(&command)?;
        }
        Ok(())
    }
}
