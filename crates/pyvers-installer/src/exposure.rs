use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::fs_utils::{remove_file_if_exists, sibling_tmp_path};
use crate::PrefixLayout;

pub fn shim_path(layout: &PrefixLayout, command: &str) -> PathBuf {
    let mut file_name = command.to_string();
    if cfg!(windows) {
        file_name.push_str(".cmd");
    }
    layout.bin_dir().join(file_name)
}

// false when the shim already pointed at `source`
pub fn write_shim(layout: &PrefixLayout, command: &str, source: &Path) -> io::Result<bool> {
    if shim_target(layout, command)?.as_deref() == Some(source) {
        return Ok(false);
    }

    let destination = shim_path(layout, command);
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)?;
    }

    let staged = sibling_tmp_path(&destination);
    remove_file_if_exists(&staged)?;
    create_shim_entry(source, &staged)?;
    if let Err(err) = fs::rename(&staged, &destination) {
        let _ = fs::remove_file(&staged);
        return Err(err);
    }
    Ok(true)
}

pub fn remove_shim(layout: &PrefixLayout, command: &str) -> io::Result<bool> {
    let destination = shim_path(layout, command);
    match fs::remove_file(&destination) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}

pub fn shim_target(layout: &PrefixLayout, command: &str) -> io::Result<Option<PathBuf>> {
    read_shim_entry(&shim_path(layout, command))
}

pub fn exposed_commands(layout: &PrefixLayout) -> io::Result<Vec<(String, PathBuf)>> {
    let dir = layout.bin_dir();
    let entries = match fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(err),
    };

    let mut exposed = Vec::new();
    for entry in entries {
        let entry = entry?;
        let Some(file_name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        if file_name.starts_with('.') {
            continue;
        }
        let Some(command) = command_name_from_file(&file_name) else {
            continue;
        };
        if let Some(target) = read_shim_entry(&entry.path())? {
            exposed.push((command, target));
        }
    }

    exposed.sort();
    Ok(exposed)
}

fn command_name_from_file(file_name: &str) -> Option<String> {
    if cfg!(windows) {
        file_name.strip_suffix(".cmd").map(str::to_string)
    } else {
        Some(file_name.to_string())
    }
}

#[cfg(unix)]
fn create_shim_entry(source: &Path, destination: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(source, destination)
}

#[cfg(windows)]
fn create_shim_entry(source: &Path, destination: &Path) -> io::Result<()> {
    fs::write(destination, render_cmd_shim(source).as_bytes())
}

#[cfg(unix)]
fn read_shim_entry(path: &Path) -> io::Result<Option<PathBuf>> {
    match fs::read_link(path) {
        Ok(target) => Ok(Some(target)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        // not a symlink
        Err(err) if err.kind() == io::ErrorKind::InvalidInput => Ok(None),
        Err(err) => Err(err),
    }
}

#[cfg(windows)]
fn read_shim_entry(path: &Path) -> io::Result<Option<PathBuf>> {
    match fs::read_to_string(path) {
        Ok(raw) => Ok(parse_cmd_shim(&raw)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

#[cfg_attr(not(windows), allow(dead_code))]
pub(crate) fn render_cmd_shim(source: &Path) -> String {
    format!("@echo off\r\n\"{}\" %*\r\n", source.display())
}

#[cfg_attr(not(windows), allow(dead_code))]
pub(crate) fn parse_cmd_shim(raw: &str) -> Option<PathBuf> {
    raw.lines().map(str::trim).find_map(|line| {
        let (target, _) = line.strip_prefix('"')?.split_once("\" %*")?;
        Some(PathBuf::from(target))
    })
}
