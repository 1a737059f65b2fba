use anyhow::{anyhow, Context, Result};
use pyvers_core::Version;
use std::fs;
use std::path::PathBuf;

use crate::fs_utils::make_tmp_dir;
use crate::PrefixLayout;

/// Removes the installation root of `version` and returns its path.
///
/// The root is first renamed into the tmp area so it disappears from the
/// versions directory in one step, then deleted.
pub fn remove_installation(layout: &PrefixLayout, version: &Version) -> Result<PathBuf> {
    let root = layout.version_root(version);
    if !root.exists() {
        return Err(anyhow!(
            "installation root for {version} does not exist: {}",
            root.display()
        ));
    }

    let graveyard = make_tmp_dir(layout, "uninstall")?;
    let doomed = graveyard.join(version.name());
    fs::rename(&root, &doomed).with_context(|| {
        format!(
            "failed to move installation out of place: {}",
            root.display()
        )
    })?;

    fs::remove_dir_all(&graveyard)
        .with_context(|| format!("failed to remove {}", graveyard.display()))?;
    tracing::debug!(%version, root = %root.display(), "removed installation");
    Ok(root)
}
