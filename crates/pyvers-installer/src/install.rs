use anyhow::{anyhow, Context, Result};
use pyvers_core::{
    interpreter_rel_path, ArchiveType, Build, Catalog, CatalogBuild, Installer, Version,
};
use pyvers_resolver::select_best_build;
use std::ffi::OsString;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::process::Command;

use crate::checksum::verify_sha256_file;
use crate::fs_utils::make_tmp_dir;
use crate::installations::write_build_receipt;
use crate::uninstall::remove_installation;
use crate::PrefixLayout;

/// [`Installer`] that installs builds whose bytes already sit on local disk,
/// either as a directory tree or as an archive.
///
/// A build is staged under `state/tmp` and renamed into its version root, so a
/// failed install never leaves a half-copied root behind. When a root already
/// exists it is moved aside first and put back if the final rename fails.
#[derive(Debug, Clone)]
pub struct LocalInstaller {
    layout: PrefixLayout,
    catalog: Catalog,
}

impl LocalInstaller {
    pub fn new(layout: PrefixLayout, catalog: Catalog) -> Self {
        Self { layout, catalog }
    }

    fn select_build(&self, version: &Version, build: Option<&Build>) -> Result<&CatalogBuild> {
        let entry = self
            .catalog
            .entry(version)
            .ok_or_else(|| anyhow!("{version} is not in the version catalog"))?;
        match build {
            Some(build) => self
                .catalog
                .find_build(version, build)
                .ok_or_else(|| anyhow!("build {build} of {version} is not in the version catalog")),
            None => select_best_build(&entry.builds)
                .ok_or_else(|| anyhow!("no builds available for {version}")),
        }
    }
}

impl Installer for LocalInstaller {
    fn install(&mut self, version: &Version, build: Option<&Build>) -> Result<PathBuf> {
        let selected = self.select_build(version, build)?;
        tracing::debug!(
            %version,
            build = %selected.name,
            source = %selected.source.display(),
            "installing build"
        );
        install_build(&self.layout, version, selected)
    }

    fn uninstall(&mut self, version: &Version) -> Result<PathBuf> {
        remove_installation(&self.layout, version)
    }
}

pub(crate) fn install_build(
    layout: &PrefixLayout,
    version: &Version,
    build: &CatalogBuild,
) -> Result<PathBuf> {
    layout.ensure_base_dirs()?;
    let install_tmp = make_tmp_dir(layout, "install")?;
    let result = stage_and_commit(layout, version, build, &install_tmp);
    cleanup_install_tmp(&install_tmp, result.is_err());
    result
}

/// A failed install whose previous root could not be put back keeps its tmp
/// dir, since the backup is the only copy left.
pub(crate) fn cleanup_install_tmp(install_tmp: &Path, failed: bool) {
    let backup = install_tmp.join("previous");
    if failed && backup.exists() {
        tracing::warn!(
            backup = %backup.display(),
            "keeping previous installation after failed restore"
        );
        return;
    }
    let _ = fs::remove_dir_all(install_tmp);
}

fn stage_and_commit(
    layout: &PrefixLayout,
    version: &Version,
    build: &CatalogBuild,
    install_tmp: &Path,
) -> Result<PathBuf> {
    let staged_dir = install_tmp.join("staged");
    fs::create_dir_all(&staged_dir)
        .with_context(|| format!("failed to create {}", staged_dir.display()))?;

    let archive_type = build.archive_type();
    if archive_type.is_archive() {
        if let Some(expected) = &build.sha256 {
            verify_sha256_file(&build.source, expected)?;
        }
        let raw_dir = install_tmp.join("raw");
        fs::create_dir_all(&raw_dir)
            .with_context(|| format!("failed to create {}", raw_dir.display()))?;
        extract_archive(&build.source, archive_type, &raw_dir)?;
        copy_with_strip(&raw_dir, &staged_dir, build.strip_components as usize)?;
    } else {
        if !build.source.is_dir() {
            return Err(anyhow!(
                "build source for {} is not a directory: {}",
                build.name,
                build.source.display()
            ));
        }
        copy_with_strip(&build.source, &staged_dir, build.strip_components as usize)?;
    }

    let interpreter = staged_dir.join(interpreter_rel_path());
    if !interpreter.is_file() {
        return Err(anyhow!(
            "build {} does not contain an interpreter at '{}'",
            build.name,
            interpreter_rel_path()
        ));
    }
    write_build_receipt(&staged_dir, &build.name)?;

    let destination = layout.version_root(version);
    commit_staged(&staged_dir, &destination, &install_tmp.join("previous"))?;
    Ok(destination)
}

fn commit_staged(staged_dir: &Path, destination: &Path, backup: &Path) -> Result<()> {
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create install parent: {}", parent.display()))?;
    }

    let had_previous = destination.exists();
    if had_previous {
        fs::rename(destination, backup).with_context(|| {
            format!(
                "failed to move previous installation aside: {}",
                destination.display()
            )
        })?;
    }

    if let Err(err) = fs::rename(staged_dir, destination) {
        let err = anyhow::Error::new(err).context(format!(
            "failed to move staged build into place: {}",
            destination.display()
        ));
        if had_previous {
            if let Err(restore_err) = fs::rename(backup, destination) {
                return Err(err.context(format!(
                    "previous installation could not be restored from {}: {restore_err}",
                    backup.display()
                )));
            }
        }
        return Err(err);
    }
    Ok(())
}

fn extract_archive(archive_path: &Path, archive_type: ArchiveType, dst: &Path) -> Result<()> {
    match archive_type {
        ArchiveType::TarGz | ArchiveType::TarZst => run_tool("tar", &tar_args(archive_path, dst)),
        // unzip is not everywhere; bsdtar reads zip too
        ArchiveType::Zip => {
            let unzip_args = [
                OsString::from("-q"),
                archive_path.as_os_str().to_owned(),
                OsString::from("-d"),
                dst.as_os_str().to_owned(),
            ];
            run_tool("unzip", &unzip_args).or_else(|unzip_err| {
                run_tool("tar", &tar_args(archive_path, dst))
                    .with_context(|| format!("unzip could not extract either: {unzip_err:#}"))
            })
        }
        ArchiveType::Directory => Err(anyhow!(
            "directory sources are copied, not extracted: {}",
            archive_path.display()
        )),
    }
}

fn tar_args(archive_path: &Path, dst: &Path) -> [OsString; 4] {
    [
        OsString::from("-xf"),
        archive_path.as_os_str().to_owned(),
        OsString::from("-C"),
        dst.as_os_str().to_owned(),
    ]
}

fn run_tool(program: &str, args: &[OsString]) -> Result<()> {
    let output = Command::new(program)
        .args(args)
        .output()
        .with_context(|| format!("could not run {program}"))?;
    if output.status.success() {
        return Ok(());
    }

    Err(anyhow!(
        "{program} exited with {}: {}",
        output.status,
        String::from_utf8_lossy(&output.stderr).trim()
    ))
}

/// Copies the tree under `src_root` into `dst_root`, dropping the first
/// `strip_components` directories of every path. Symlinks are recreated, not
/// followed.
fn copy_with_strip(src_root: &Path, dst_root: &Path, strip_components: usize) -> Result<()> {
    let mut pending = vec![src_root.to_path_buf()];
    let mut copied = 0_usize;

    while let Some(dir) = pending.pop() {
        let entries =
            fs::read_dir(&dir).with_context(|| format!("failed to read {}", dir.display()))?;
        for entry in entries {
            let path = entry
                .with_context(|| format!("failed to read {}", dir.display()))?
                .path();
            let file_type = fs::symlink_metadata(&path)
                .with_context(|| format!("failed to stat {}", path.display()))?
                .file_type();
            if file_type.is_dir() {
                pending.push(path);
                continue;
            }

            let rel = path.strip_prefix(src_root).with_context(|| {
                format!("{} is outside {}", path.display(), src_root.display())
            })?;
            let Some(kept) = strip_rel_components(rel, strip_components) else {
                continue;
            };
            let target = dst_root.join(kept);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            copy_entry(&path, &target, file_type.is_symlink())?;
            copied += 1;
        }
    }

    if copied == 0 {
        return Err(anyhow!(
            "nothing left to install from {} after stripping {strip_components} leading components",
            src_root.display()
        ));
    }
    Ok(())
}

fn copy_entry(path: &Path, target: &Path, is_symlink: bool) -> Result<()> {
    #[cfg(unix)]
    if is_symlink {
        let link = fs::read_link(path)
            .with_context(|| format!("failed to read symlink {}", path.display()))?;
        return std::os::unix::fs::symlink(&link, target)
            .with_context(|| format!("failed to recreate symlink {}", target.display()));
    }
    #[cfg(not(unix))]
    let _ = is_symlink;

    fs::copy(path, target)
        .map(|_| ())
        .with_context(|| format!("failed to copy {} to {}", path.display(), target.display()))
}

/// `None` when nothing remains after stripping.
pub(crate) fn strip_rel_components(path: &Path, strip_components: usize) -> Option<PathBuf> {
    let kept: PathBuf = path
        .components()
        .filter(|component| matches!(component, Component::Normal(_)))
        .skip(strip_components)
        .collect();
    kept.components().next().is_some().then_some(kept)
}
