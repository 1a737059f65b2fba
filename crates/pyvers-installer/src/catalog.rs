use anyhow::{anyhow, Result};
use pyvers_core::{Catalog, Installation, Version, VersionCatalog};
use pyvers_resolver::select_best_build;

use crate::installations::locate;
use crate::PrefixLayout;

/// [`VersionCatalog`] answering from a loaded catalog file and the
/// installations under a prefix.
#[derive(Debug, Clone)]
pub struct PrefixCatalog {
    layout: PrefixLayout,
    catalog: Catalog,
}

impl PrefixCatalog {
    pub fn new(layout: PrefixLayout, catalog: Catalog) -> Self {
        Self { layout, catalog }
    }

    /// Looks `version` up in the catalog, failing for unknown versions.
    pub fn require(&self, version: &Version) -> Result<()> {
        if self.catalog.entry(version).is_none() {
            return Err(anyhow!("{version} is not in the version catalog"));
        }
        Ok(())
    }
}

impl VersionCatalog for PrefixCatalog {
    fn versions(&self) -> Result<Vec<Version>> {
        Ok(self.catalog.versions())
    }

    fn find_installation(&self, version: &Version) -> Result<Option<Installation>> {
        locate(&self.layout, version)
    }

    fn find_best_build_name(&self, version: &Version) -> Result<String> {
        let entry = self
            .catalog
            .entry(version)
            .ok_or_else(|| anyhow!("{version} is not in the version catalog"))?;
        select_best_build(&entry.builds)
            .map(|build| build.name.to_string())
            .ok_or_else(|| anyhow!("no builds available for {version}"))
    }
}
