use std::cmp::Ordering;

use anyhow::Context;
use pyvers_core::{Build, Installation, InvalidBuildError, Version, VersionCatalog};

/// Outcome of comparing an installed build against the catalog's best build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildComparison {
    UpToDate { current: Build },
    /// Installed build is newer than anything the catalog offers.
    Ahead { current: Build, best: Build },
    Behind { current: Build, best: Build },
}

pub fn current_build(installation: &Installation) -> Result<Build, InvalidBuildError> {
    installation
        .build_name()
        .and_then(|raw| Build::parse(raw).ok())
        .ok_or_else(|| InvalidBuildError {
            root: installation.root.clone(),
        })
}

pub fn best_build<C: VersionCatalog + ?Sized>(
    catalog: &C,
    version: &Version,
) -> anyhow::Result<Build> {
    let name = catalog.find_best_build_name(version)?;
    Build::parse(&name)
        .with_context(|| format!("catalog reported an invalid best build for {version}"))
}

pub fn compare_builds(current: Build, best: Build) -> BuildComparison {
    match current.cmp(&best) {
        Ordering::Equal => BuildComparison::UpToDate { current },
        Ordering::Greater => BuildComparison::Ahead { current, best },
        Ordering::Less => BuildComparison::Behind { current, best },
    }
}
