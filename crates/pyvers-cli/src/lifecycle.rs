use std::fmt;
use std::path::PathBuf;

use pyvers_core::{
    Build, InstallationState, Installer, LifecycleError, Linker, PreconditionError, Version,
    VersionCatalog,
};
use pyvers_resolver::{best_build, compare_builds, current_build, BuildComparison};

use crate::guard::check_installation;

/// User-facing progress reported while a lifecycle command runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    ForcedUse { version: Version },
    UpToDate { version: Version, current: Build },
    Ahead { version: Version, current: Build, best: Build },
    Upgrading { version: Version, current: Build, best: Build },
    Uninstalling { version: Version },
    Removed { version: Version, path: PathBuf },
}

impl Notice {
    pub fn status(&self) -> &'static str {
        match self {
            Self::ForcedUse { .. } | Self::Upgrading { .. } | Self::Uninstalling { .. } => "step",
            Self::UpToDate { .. } | Self::Ahead { .. } | Self::Removed { .. } => "ok",
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ForcedUse { version } => write!(f, "Will use {version} after installation"),
            Self::UpToDate { version, current } => {
                write!(f, "{version} is up to date ({current})")
            }
            Self::Ahead {
                version,
                current,
                best,
            } => write!(f, "{version} is up to date ({current} > {best})"),
            Self::Upgrading {
                version,
                current,
                best,
            } => write!(f, "Upgrading {version} from {current} to {best}..."),
            Self::Uninstalling { version } => write!(f, "Uninstalling {version}..."),
            Self::Removed { version, path } => {
                write!(f, "Removed {version} from {}", path.display())
            }
        }
    }
}

/// One row of `pyvers list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionListing {
    pub version: Version,
    pub installed: bool,
    pub build: Option<String>,
    pub active: bool,
}

/// Drives install, uninstall and upgrade across the three collaborators.
///
/// Every command first checks the installation precondition; a violation runs
/// the recovery link action and fails before anything is mutated. Links are
/// reconciled after the installer has finished, and uninstall removes links
/// before it removes bytes.
pub struct Orchestrator<C, I, L> {
    catalog: C,
    installer: I,
    linker: L,
}

impl<C, I, L> Orchestrator<C, I, L>
where
    C: VersionCatalog,
    I: Installer,
    L: Linker,
{
    pub fn new(catalog: C, installer: I, linker: L) -> Self {
        Self {
            catalog,
            installer,
            linker,
        }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn linker(&self) -> &L {
        &self.linker
    }

    /// Returns the installation root.
    pub fn install(
        &mut self,
        version: &Version,
        use_version: bool,
        notify: &mut dyn FnMut(Notice),
    ) -> Result<PathBuf, LifecycleError> {
        check_installation(
            &self.catalog,
            &mut self.linker,
            version,
            InstallationState::Absent,
            L::link,
        )?;

        let mut use_version = use_version;
        // only announced when it overrides the caller
        if !use_version && !self.has_any_installation()? {
            use_version = true;
            notify(Notice::ForcedUse {
                version: version.clone(),
            });
        }

        tracing::debug!(%version, use_version, "installing");
        let root = self.installer.install(version, None)?;
        self.linker.link(version)?;
        if use_version {
            self.linker.use_versions(std::slice::from_ref(version))?;
        }
        Ok(root)
    }

    /// Returns the path that was removed.
    pub fn uninstall(
        &mut self,
        version: &Version,
        notify: &mut dyn FnMut(Notice),
    ) -> Result<PathBuf, LifecycleError> {
        check_installation(
            &self.catalog,
            &mut self.linker,
            version,
            InstallationState::Present,
            L::unlink,
        )?;

        notify(Notice::Uninstalling {
            version: version.clone(),
        });
        self.linker.unlink(version)?;
        let removed = self.installer.uninstall(version)?;
        notify(Notice::Removed {
            version: version.clone(),
            path: removed.clone(),
        });
        Ok(removed)
    }

    pub fn upgrade(
        &mut self,
        version: &Version,
        notify: &mut dyn FnMut(Notice),
    ) -> Result<BuildComparison, LifecycleError> {
        let installation = check_installation(
            &self.catalog,
            &mut self.linker,
            version,
            InstallationState::Present,
            L::link,
        )?;
        let Some(installation) = installation else {
            return Err(PreconditionError {
                version: version.clone(),
                expected: InstallationState::Present,
                actual: InstallationState::Absent,
            }
            .into());
        };

        let current = current_build(&installation)?;
        let best = best_build(&self.catalog, version)?;
        let comparison = compare_builds(current, best);
        match &comparison {
            BuildComparison::UpToDate { current } => notify(Notice::UpToDate {
                version: version.clone(),
                current: current.clone(),
            }),
            BuildComparison::Ahead { current, best } => notify(Notice::Ahead {
                version: version.clone(),
                current: current.clone(),
                best: best.clone(),
            }),
            BuildComparison::Behind { current, best } => {
                notify(Notice::Upgrading {
                    version: version.clone(),
                    current: current.clone(),
                    best: best.clone(),
                });
                self.installer.install(version, Some(best))?;
            }
        }

        self.linker.link(version)?;
        Ok(comparison)
    }

    /// Every version must be installed; a missing one has its stale links
    /// removed and fails the whole command before the active set changes.
    pub fn use_versions(&mut self, versions: &[Version]) -> Result<(), LifecycleError> {
        for version in versions {
            check_installation(
                &self.catalog,
                &mut self.linker,
                version,
                InstallationState::Present,
                L::unlink,
            )?;
        }
        self.linker.use_versions(versions)?;
        Ok(())
    }

    fn has_any_installation(&self) -> Result<bool, LifecycleError> {
        for candidate in self.catalog.versions()? {
            if self.catalog.find_installation(&candidate)?.is_some() {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

pub fn collect_listing<C: VersionCatalog + ?Sized>(
    catalog: &C,
    active: &[Version],
) -> anyhow::Result<Vec<VersionListing>> {
    let mut listing = Vec::new();
    for version in catalog.versions()? {
        let installation = catalog.find_installation(&version)?;
        listing.push(VersionListing {
            active: active.contains(&version),
            installed: installation.is_some(),
            build: installation.and_then(|installation| installation.build_name),
            version,
        });
    }
    Ok(listing)
}
