use anyhow::{Context, Result};
use pyvers_core::{interpreter_rel_path, Build, Installation, Version, BUILD_RECEIPT_FILE};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::PrefixLayout;

/// Finds the installation of `version`, if any. Absence is `Ok(None)`.
pub fn locate(layout: &PrefixLayout, version: &Version) -> Result<Option<Installation>> {
    let root = layout.version_root(version);
    let valid = has_valid_installation(layout, version).with_context(|| {
        format!(
            "failed to inspect installation of {version} at {}",
            root.display()
        )
    })?;
    if !valid {
        return Ok(None);
    }

    let build_name = read_build_receipt(&root)?;
    Ok(Some(Installation {
        version: version.clone(),
        root,
        build_name,
    }))
}

/// A root counts as installed once its interpreter executable is in place.
pub(crate) fn has_valid_installation(layout: &PrefixLayout, version: &Version) -> io::Result<bool> {
    let interpreter = layout.version_root(version).join(interpreter_rel_path());
    match fs::metadata(&interpreter) {
        Ok(metadata) => Ok(metadata.is_file()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}

pub fn read_build_receipt(root: &Path) -> Result<Option<String>> {
    let path = root.join(BUILD_RECEIPT_FILE);
    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read build receipt: {}", path.display()));
        }
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    Ok(Some(trimmed.to_string()))
}

pub fn write_build_receipt(root: &Path, build: &Build) -> Result<PathBuf> {
    let path = root.join(BUILD_RECEIPT_FILE);
    fs::write(&path, format!("{build}\n").as_bytes())
        .with_context(|| format!("failed to write build receipt: {}", path.display()))?;
    Ok(path)
}
