use super::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use pyvers_core::{interpreter_rel_path, Build, Catalog, Installer, Linker, Version, VersionCatalog};

use crate::exposure::{parse_cmd_shim, render_cmd_shim};
use crate::install::{cleanup_install_tmp, strip_rel_components};

static TEST_LAYOUT_COUNTER: AtomicU64 = AtomicU64::new(0);

const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

fn build_test_layout_path(nanos: u128) -> PathBuf {
    let mut path = std::env::temp_dir();
    let sequence = TEST_LAYOUT_COUNTER.fetch_add(1, Ordering::Relaxed);
    path.push(format!(
        "pyvers-installer-tests-{}-{}-{}",
        std::process::id(),
        nanos,
        sequence
    ));
    path
}

fn test_layout() -> PrefixLayout {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("system time")
        .as_nanos();
    PrefixLayout::new(build_test_layout_path(nanos))
}

fn v(name: &str) -> Version {
    Version::parse(name).expect("version must parse")
}

fn pip_rel_path() -> &'static str {
    if cfg!(windows) {
        "Scripts/pip.exe"
    } else {
        "bin/pip"
    }
}

/// Writes a fake interpreter tree into `root`.
fn write_interpreter_tree(root: &Path, with_pip: bool) {
    let python = root.join(interpreter_rel_path());
    fs::create_dir_all(python.parent().expect("python parent")).expect("must create bin dir");
    fs::write(&python, b"#!/bin/sh\n").expect("must write python");
    if with_pip {
        let pip = root.join(pip_rel_path());
        fs::create_dir_all(pip.parent().expect("pip parent")).expect("must create pip dir");
        fs::write(&pip, b"#!/bin/sh\n").expect("must write pip");
    }
}

/// Fakes an installed version directly under the prefix.
fn seed_installation(layout: &PrefixLayout, version: &Version, build: &str) -> PathBuf {
    let root = layout.version_root(version);
    write_interpreter_tree(&root, true);
    fs::write(root.join(pyvers_core::BUILD_RECEIPT_FILE), format!("{build}\n"))
        .expect("must write receipt");
    root
}

fn target_of(layout: &PrefixLayout, command: &str) -> Option<PathBuf> {
    shim_target(layout, command).expect("must read shim")
}

fn catalog_with_sources(layout: &PrefixLayout, builds: &[(&str, &str)]) -> Catalog {
    let sources = layout.prefix().join("sources");
    let mut raw = String::new();
    let mut seen_lines = Vec::new();
    for (version, build) in builds {
        if !seen_lines.contains(version) {
            raw.push_str(&format!("[[versions]]\nname = \"{version}\"\n"));
            seen_lines.push(*version);
        }
        let source = sources.join(build);
        write_interpreter_tree(&source, true);
        raw.push_str(&format!(
            "[[versions.builds]]\nname = \"{build}\"\nsource = '{}'\n",
            source.display()
        ));
    }
    Catalog::from_toml_str(&raw).expect("catalog must parse")
}

#[test]
fn build_test_layout_path_disambiguates_same_timestamp_calls() {
    assert_ne!(build_test_layout_path(42), build_test_layout_path(42));
}

#[test]
fn layout_paths_hang_off_prefix() {
    let layout = PrefixLayout::new("/opt/pyvers");
    assert_eq!(layout.version_root(&v("3.11")), PathBuf::from("/opt/pyvers/versions/3.11"));
    assert_eq!(layout.bin_dir(), PathBuf::from("/opt/pyvers/bin"));
    assert_eq!(layout.active_path(), PathBuf::from("/opt/pyvers/state/active"));
    assert_eq!(layout.config_path(), PathBuf::from("/opt/pyvers/config.toml"));
    assert_eq!(
        layout.default_catalog_path(),
        PathBuf::from("/opt/pyvers/catalog.toml")
    );
}

#[test]
fn locate_returns_none_for_missing_or_incomplete_root() {
    let layout = test_layout();
    layout.ensure_base_dirs().expect("must create dirs");

    assert!(locate(&layout, &v("3.11")).expect("must locate").is_none());

    fs::create_dir_all(layout.version_root(&v("3.11"))).expect("must create empty root");
    assert!(
        locate(&layout, &v("3.11")).expect("must locate").is_none(),
        "a root without an interpreter is not an installation"
    );

    let _ = fs::remove_dir_all(layout.prefix());
}

#[test]
fn locate_reads_build_receipt() {
    let layout = test_layout();
    let root = seed_installation(&layout, &v("3.11"), "3.11.2");

    let installation = locate(&layout, &v("3.11"))
        .expect("must locate")
        .expect("must be installed");
    assert_eq!(installation.root, root);
    assert_eq!(installation.build_name(), Some("3.11.2"));
    assert!(installation.root.join(interpreter_rel_path()).is_file());

    let _ = fs::remove_dir_all(layout.prefix());
}

#[test]
fn empty_build_receipt_reads_as_missing() {
    let layout = test_layout();
    let root = seed_installation(&layout, &v("3.11"), "");

    assert_eq!(read_build_receipt(&root).expect("must read"), None);
    fs::remove_file(root.join(pyvers_core::BUILD_RECEIPT_FILE)).expect("must remove receipt");
    assert_eq!(read_build_receipt(&root).expect("must read"), None);

    let written = write_build_receipt(&root, &Build::parse("3.11.9").expect("build"))
        .expect("must write receipt");
    assert_eq!(
        fs::read_to_string(written).expect("must read back"),
        "3.11.9\n"
    );

    let _ = fs::remove_dir_all(layout.prefix());
}

#[test]
fn active_store_round_trip() {
    let layout = test_layout();
    let mut store = ActiveStore::load(layout.active_path()).expect("must load empty");
    assert!(store.versions().is_empty());

    store
        .replace(vec![v("3.12"), v("3.11"), v("3.12")])
        .expect("must replace");
    assert_eq!(store.versions(), &[v("3.12"), v("3.11")]);
    assert_eq!(
        fs::read_to_string(layout.active_path()).expect("must read file"),
        "3.12\n3.11\n"
    );

    let reloaded = ActiveStore::load(layout.active_path()).expect("must reload");
    assert_eq!(reloaded, store);

    let _ = fs::remove_dir_all(layout.prefix());
}

#[test]
fn active_store_skips_garbage_lines() {
    let layout = test_layout();
    layout.ensure_base_dirs().expect("must create dirs");
    fs::write(layout.active_path(), "3.11\nnonsense\n\n3.11\n3.12\n").expect("must seed");

    let store = ActiveStore::load(layout.active_path()).expect("must load");
    assert_eq!(store.versions(), &[v("3.11"), v("3.12")]);

    let _ = fs::remove_dir_all(layout.prefix());
}

#[test]
fn active_store_remove_deletes_file_when_empty() {
    let layout = test_layout();
    let mut store = ActiveStore::load(layout.active_path()).expect("must load");
    store.replace(vec![v("3.11")]).expect("must replace");
    assert!(layout.active_path().exists());

    assert!(!store.remove(&v("3.12")).expect("must remove"));
    assert!(store.remove(&v("3.11")).expect("must remove"));
    assert!(!layout.active_path().exists());
    assert!(store.versions().is_empty());

    let _ = fs::remove_dir_all(layout.prefix());
}

#[test]
fn write_shim_is_idempotent_and_replaces_targets() {
    let layout = test_layout();
    layout.ensure_base_dirs().expect("must create dirs");
    let first = layout.prefix().join("a/python");
    let second = layout.prefix().join("b/python");

    assert!(write_shim(&layout, "python3", &first).expect("must write"));
    assert!(!write_shim(&layout, "python3", &first).expect("must skip"));
    assert_eq!(target_of(&layout, "python3"), Some(first));

    assert!(write_shim(&layout, "python3", &second).expect("must replace"));
    assert_eq!(target_of(&layout, "python3"), Some(second.clone()));

    let exposed = exposed_commands(&layout).expect("must list");
    assert_eq!(exposed, vec![("python3".to_string(), second)]);

    assert!(remove_shim(&layout, "python3").expect("must remove"));
    assert!(!remove_shim(&layout, "python3").expect("second remove is a no-op"));
    assert!(exposed_commands(&layout).expect("must list").is_empty());

    let _ = fs::remove_dir_all(layout.prefix());
}

#[test]
fn shim_path_uses_cmd_suffix_only_on_windows() {
    let layout = PrefixLayout::new("/opt/pyvers");
    let expected = if cfg!(windows) { "python3.cmd" } else { "python3" };
    assert_eq!(
        shim_path(&layout, "python3"),
        PathBuf::from("/opt/pyvers/bin").join(expected)
    );
}

#[test]
fn cmd_shim_round_trips_target() {
    let source = PathBuf::from(r"C:\Users\me\AppData\Local\Pyvers\versions\3.11\python.exe");
    let rendered = render_cmd_shim(&source);
    assert!(rendered.starts_with("@echo off\r\n"));
    assert_eq!(parse_cmd_shim(&rendered), Some(source));
    assert_eq!(parse_cmd_shim("@echo off\r\n"), None);
}

#[test]
fn link_exposes_versioned_commands_but_shared_only_when_active() {
    let layout = test_layout();
    let root = seed_installation(&layout, &v("3.11"), "3.11.2");
    let mut linker = ShimLinker::open(layout.clone()).expect("must open linker");

    linker.link(&v("3.11")).expect("must link");
    assert_eq!(
        target_of(&layout, "python3.11"),
        Some(root.join(interpreter_rel_path()))
    );
    assert_eq!(target_of(&layout, "pip3.11"), Some(root.join(pip_rel_path())));
    assert_eq!(target_of(&layout, "python3"), None);
    assert_eq!(target_of(&layout, "python"), None);

    linker.use_versions(&[v("3.11")]).expect("must use");
    assert_eq!(linker.active(), &[v("3.11")]);
    assert_eq!(
        target_of(&layout, "python3"),
        Some(root.join(interpreter_rel_path()))
    );
    assert_eq!(target_of(&layout, "pip"), Some(root.join(pip_rel_path())));

    let before = exposed_commands(&layout).expect("must list");
    linker.link(&v("3.11")).expect("relink must succeed");
    assert_eq!(exposed_commands(&layout).expect("must list"), before);

    let _ = fs::remove_dir_all(layout.prefix());
}

#[test]
fn use_versions_orders_shared_command_ownership() {
    let layout = test_layout();
    let root_311 = seed_installation(&layout, &v("3.11"), "3.11.2");
    let root_312 = seed_installation(&layout, &v("3.12"), "3.12.1");
    let mut linker = ShimLinker::open(layout.clone()).expect("must open linker");

    linker
        .use_versions(&[v("3.12"), v("3.11")])
        .expect("must use both");
    assert_eq!(
        target_of(&layout, "python3"),
        Some(root_312.join(interpreter_rel_path()))
    );

    linker
        .use_versions(&[v("3.11"), v("3.12")])
        .expect("must reorder");
    assert_eq!(
        target_of(&layout, "python3"),
        Some(root_311.join(interpreter_rel_path()))
    );
    assert_eq!(
        fs::read_to_string(layout.active_path()).expect("must read active"),
        "3.11\n3.12\n"
    );

    linker.use_versions(&[]).expect("must clear");
    assert_eq!(target_of(&layout, "python3"), None);
    assert!(!layout.active_path().exists());

    let _ = fs::remove_dir_all(layout.prefix());
}

#[test]
fn use_versions_skips_versions_without_installation() {
    let layout = test_layout();
    seed_installation(&layout, &v("3.11"), "3.11.2");
    let mut linker = ShimLinker::open(layout.clone()).expect("must open linker");

    linker
        .use_versions(&[v("3.12"), v("3.11")])
        .expect("must use");
    assert_eq!(linker.active(), &[v("3.11")]);

    let _ = fs::remove_dir_all(layout.prefix());
}

#[test]
fn unlink_hands_shared_commands_to_next_active_version() {
    let layout = test_layout();
    seed_installation(&layout, &v("3.11"), "3.11.2");
    let root_312 = seed_installation(&layout, &v("3.12"), "3.12.1");
    let mut linker = ShimLinker::open(layout.clone()).expect("must open linker");
    linker.link(&v("3.11")).expect("must link 3.11");
    linker.link(&v("3.12")).expect("must link 3.12");
    linker
        .use_versions(&[v("3.11"), v("3.12")])
        .expect("must use both");

    linker.unlink(&v("3.11")).expect("must unlink");

    assert_eq!(linker.active(), &[v("3.12")]);
    assert_eq!(target_of(&layout, "python3.11"), None);
    assert_eq!(target_of(&layout, "pip3.11"), None);
    assert_eq!(
        target_of(&layout, "python3"),
        Some(root_312.join(interpreter_rel_path()))
    );
    let root_311 = layout.version_root(&v("3.11"));
    assert!(exposed_commands(&layout)
        .expect("must list")
        .iter()
        .all(|(_, target)| !target.starts_with(&root_311)));

    linker.unlink(&v("3.11")).expect("second unlink is a no-op");

    let _ = fs::remove_dir_all(layout.prefix());
}

#[test]
fn link_of_missing_installation_removes_stale_shims() {
    let layout = test_layout();
    let root = seed_installation(&layout, &v("3.11"), "3.11.2");
    let mut linker = ShimLinker::open(layout.clone()).expect("must open linker");
    linker.link(&v("3.11")).expect("must link");
    linker.use_versions(&[v("3.11")]).expect("must use");
    write_shim(&layout, "idle3.11", &root.join("bin/idle")).expect("must seed extra shim");

    fs::remove_dir_all(&root).expect("simulate bytes vanishing");
    linker.link(&v("3.11")).expect("link must reconcile");

    assert!(exposed_commands(&layout).expect("must list").is_empty());
    assert!(linker.active().is_empty());

    let _ = fs::remove_dir_all(layout.prefix());
}

#[test]
fn link_skips_commands_missing_from_build() {
    let layout = test_layout();
    let root = layout.version_root(&v("3.13"));
    write_interpreter_tree(&root, false);
    let mut linker = ShimLinker::open(layout.clone()).expect("must open linker");

    linker.link(&v("3.13")).expect("must link");
    linker.use_versions(&[v("3.13")]).expect("must use");

    assert!(target_of(&layout, "python3.13").is_some());
    assert!(target_of(&layout, "python").is_some());
    assert_eq!(target_of(&layout, "pip3.13"), None);
    assert_eq!(target_of(&layout, "pip"), None);

    let _ = fs::remove_dir_all(layout.prefix());
}

#[cfg(unix)]
#[test]
fn unreadable_version_root_is_reported_by_path() {
    let layout = test_layout();
    let root = layout.version_root(&v("3.11"));
    fs::create_dir_all(root.parent().expect("versions dir")).expect("must create versions dir");
    fs::write(&root, b"not a directory").expect("must write file over root");
    let mut linker = ShimLinker::open(layout.clone()).expect("must open linker");

    let err = linker
        .link(&v("3.11"))
        .expect_err("file in place of a root must fail");
    assert_eq!(err.command, root.display().to_string());

    let _ = fs::remove_dir_all(layout.prefix());
}

#[test]
fn linker_reloads_active_set_from_disk() {
    let layout = test_layout();
    seed_installation(&layout, &v("3.11"), "3.11.2");
    {
        let mut linker = ShimLinker::open(layout.clone()).expect("must open linker");
        linker.use_versions(&[v("3.11")]).expect("must use");
    }

    let linker = ShimLinker::open(layout.clone()).expect("must reopen linker");
    assert_eq!(linker.active(), &[v("3.11")]);

    let _ = fs::remove_dir_all(layout.prefix());
}

#[test]
fn local_installer_installs_best_build_from_directory() {
    let layout = test_layout();
    let catalog = catalog_with_sources(&layout, &[("3.11", "3.11.2"), ("3.11", "3.11.9")]);
    let mut installer = LocalInstaller::new(layout.clone(), catalog);

    let root = installer.install(&v("3.11"), None).expect("must install");
    assert_eq!(root, layout.version_root(&v("3.11")));
    let installation = locate(&layout, &v("3.11"))
        .expect("must locate")
        .expect("must be installed");
    assert_eq!(installation.build_name(), Some("3.11.9"));
    assert!(fs::read_dir(layout.tmp_state_dir())
        .expect("must read tmp")
        .next()
        .is_none());

    let _ = fs::remove_dir_all(layout.prefix());
}

#[test]
fn local_installer_replaces_existing_root_in_place() {
    let layout = test_layout();
    let catalog = catalog_with_sources(&layout, &[("3.11", "3.11.2"), ("3.11", "3.11.9")]);
    let mut installer = LocalInstaller::new(layout.clone(), catalog);
    let older = Build::parse("3.11.2").expect("build");

    installer
        .install(&v("3.11"), Some(&older))
        .expect("must install older build");
    fs::write(layout.version_root(&v("3.11")).join("leftover"), b"x").expect("must write");

    installer.install(&v("3.11"), None).expect("must upgrade");
    let root = layout.version_root(&v("3.11"));
    assert_eq!(
        read_build_receipt(&root).expect("must read receipt").as_deref(),
        Some("3.11.9")
    );
    assert!(!root.join("leftover").exists());

    let _ = fs::remove_dir_all(layout.prefix());
}

#[test]
fn failed_install_keeps_previous_installation() {
    let layout = test_layout();
    let root = seed_installation(&layout, &v("3.11"), "3.11.2");
    let broken_source = layout.prefix().join("sources/broken");
    fs::create_dir_all(&broken_source).expect("must create source");
    fs::write(broken_source.join("README"), b"no interpreter here").expect("must write");
    let catalog = Catalog::from_toml_str(&format!(
        "[[versions]]\nname = \"3.11\"\n[[versions.builds]]\nname = \"3.11.9\"\nsource = '{}'\n",
        broken_source.display()
    ))
    .expect("catalog must parse");
    let mut installer = LocalInstaller::new(layout.clone(), catalog);

    let err = installer
        .install(&v("3.11"), None)
        .expect_err("build without interpreter must fail");
    assert!(err.to_string().contains("does not contain an interpreter"));
    assert_eq!(
        read_build_receipt(&root).expect("must read receipt").as_deref(),
        Some("3.11.2")
    );

    let _ = fs::remove_dir_all(layout.prefix());
}

#[test]
fn archive_checksum_mismatch_fails_before_extraction() {
    let layout = test_layout();
    let archive = layout.prefix().join("sources/python-3.11.9.tar.gz");
    fs::create_dir_all(archive.parent().expect("parent")).expect("must create dir");
    fs::write(&archive, b"not really gzip").expect("must write archive");
    let catalog = Catalog::from_toml_str(&format!(
        "[[versions]]\nname = \"3.11\"\n[[versions.builds]]\nname = \"3.11.9\"\nsource = '{}'\nsha256 = \"{EMPTY_SHA256}\"\n",
        archive.display()
    ))
    .expect("catalog must parse");
    let mut installer = LocalInstaller::new(layout.clone(), catalog);

    let err = installer
        .install(&v("3.11"), None)
        .expect_err("checksum must mismatch");
    assert!(err.to_string().contains("sha256 mismatch"));
    assert!(locate(&layout, &v("3.11")).expect("must locate").is_none());

    let _ = fs::remove_dir_all(layout.prefix());
}

#[test]
fn local_installer_rejects_unknown_versions_and_builds() {
    let layout = test_layout();
    let catalog = catalog_with_sources(&layout, &[("3.11", "3.11.2")]);
    let mut installer = LocalInstaller::new(layout.clone(), catalog);

    let err = installer
        .install(&v("3.9"), None)
        .expect_err("unknown version must fail");
    assert!(err.to_string().contains("3.9 is not in the version catalog"));

    let missing = Build::parse("3.11.7").expect("build");
    let err = installer
        .install(&v("3.11"), Some(&missing))
        .expect_err("unknown build must fail");
    assert!(err.to_string().contains("build 3.11.7 of 3.11"));

    let _ = fs::remove_dir_all(layout.prefix());
}

#[test]
fn local_installer_uninstall_returns_removed_root() {
    let layout = test_layout();
    let root = seed_installation(&layout, &v("3.11"), "3.11.2");
    let mut installer = LocalInstaller::new(layout.clone(), Catalog::default());

    let removed = installer.uninstall(&v("3.11")).expect("must uninstall");
    assert_eq!(removed, root);
    assert!(!root.exists());

    let err = installer
        .uninstall(&v("3.11"))
        .expect_err("second uninstall must fail");
    assert!(err.to_string().contains("does not exist"));

    let _ = fs::remove_dir_all(layout.prefix());
}

#[test]
fn directory_source_honours_strip_components() {
    let layout = test_layout();
    let source = layout.prefix().join("sources/wrapped");
    write_interpreter_tree(&source.join("python-3.12.1"), true);
    let catalog = Catalog::from_toml_str(&format!(
        "[[versions]]\nname = \"3.12\"\n[[versions.builds]]\nname = \"3.12.1\"\nsource = '{}'\nstrip_components = 1\n",
        source.display()
    ))
    .expect("catalog must parse");
    let mut installer = LocalInstaller::new(layout.clone(), catalog);

    installer.install(&v("3.12"), None).expect("must install");
    assert!(locate(&layout, &v("3.12")).expect("must locate").is_some());

    let _ = fs::remove_dir_all(layout.prefix());
}

#[test]
fn tar_gz_source_honours_strip_components() {
    let layout = test_layout();
    let packaging = layout.prefix().join("packaging");
    write_interpreter_tree(&packaging.join("python-3.12.1"), true);
    let archive = layout.prefix().join("sources/python-3.12.1.tar.gz");
    fs::create_dir_all(archive.parent().expect("parent")).expect("must create dir");
    let status = std::process::Command::new("tar")
        .arg("-czf")
        .arg(&archive)
        .arg("-C")
        .arg(&packaging)
        .arg("python-3.12.1")
        .status()
        .expect("tar must run");
    assert!(status.success());
    let catalog = Catalog::from_toml_str(&format!(
        "[[versions]]\nname = \"3.12\"\n[[versions.builds]]\nname = \"3.12.1\"\nsource = '{}'\nstrip_components = 1\n",
        archive.display()
    ))
    .expect("catalog must parse");
    let mut installer = LocalInstaller::new(layout.clone(), catalog);

    let root = installer.install(&v("3.12"), None).expect("must install");
    let installation = locate(&layout, &v("3.12"))
        .expect("must locate")
        .expect("must be installed");
    assert_eq!(installation.root, root);
    assert_eq!(installation.build_name(), Some("3.12.1"));
    assert!(root.join(pip_rel_path()).is_file());
    assert!(!root.join("python-3.12.1").exists());

    let _ = fs::remove_dir_all(layout.prefix());
}

#[test]
fn install_tmp_with_unrestored_backup_survives_failure() {
    let layout = test_layout();
    let install_tmp = layout.tmp_state_dir().join("install-restore-failed");
    let backup = install_tmp.join("previous");
    seed_installation(&layout, &v("3.11"), "3.11.2");
    fs::create_dir_all(&install_tmp).expect("must create tmp");
    fs::rename(layout.version_root(&v("3.11")), &backup).expect("must move root aside");

    cleanup_install_tmp(&install_tmp, true);
    assert_eq!(
        read_build_receipt(&backup).expect("must read receipt").as_deref(),
        Some("3.11.2")
    );

    cleanup_install_tmp(&install_tmp, false);
    assert!(!install_tmp.exists());

    let _ = fs::remove_dir_all(layout.prefix());
}

#[test]
fn failed_install_tmp_without_backup_is_removed() {
    let layout = test_layout();
    let install_tmp = layout.tmp_state_dir().join("install-no-backup");
    fs::create_dir_all(install_tmp.join("staged")).expect("must create tmp");

    cleanup_install_tmp(&install_tmp, true);
    assert!(!install_tmp.exists());

    let _ = fs::remove_dir_all(layout.prefix());
}

#[test]
fn strip_rel_components_drops_leading_directories() {
    assert_eq!(
        strip_rel_components(Path::new("python-3.12.1/bin/python"), 1),
        Some(PathBuf::from("bin/python"))
    );
    assert_eq!(strip_rel_components(Path::new("python"), 1), None);
}

#[test]
fn prefix_catalog_answers_from_catalog_and_disk() {
    let layout = test_layout();
    let catalog = catalog_with_sources(
        &layout,
        &[("3.11", "3.11.2"), ("3.11", "3.11.9"), ("3.12", "3.12.0rc1")],
    );
    let prefix_catalog = PrefixCatalog::new(layout.clone(), catalog);

    assert_eq!(
        prefix_catalog.versions().expect("must list"),
        vec![v("3.11"), v("3.12")]
    );
    assert_eq!(
        prefix_catalog
            .find_best_build_name(&v("3.11"))
            .expect("must resolve"),
        "3.11.9"
    );
    assert_eq!(
        prefix_catalog
            .find_best_build_name(&v("3.12"))
            .expect("must resolve"),
        "3.12.0rc1"
    );
    assert!(prefix_catalog.find_best_build_name(&v("3.9")).is_err());
    assert!(prefix_catalog.require(&v("3.9")).is_err());

    assert!(prefix_catalog
        .find_installation(&v("3.11"))
        .expect("must look")
        .is_none());
    seed_installation(&layout, &v("3.11"), "3.11.2");
    assert!(prefix_catalog
        .find_installation(&v("3.11"))
        .expect("must look")
        .is_some());

    let _ = fs::remove_dir_all(layout.prefix());
}

#[test]
fn sha256_of_empty_file() {
    let layout = test_layout();
    layout.ensure_base_dirs().expect("must create dirs");
    let path = layout.prefix().join("empty");
    fs::write(&path, b"").expect("must write");

    assert_eq!(sha256_hex_file(&path).expect("must hash"), EMPTY_SHA256);
    verify_sha256_file(&path, &EMPTY_SHA256.to_ascii_uppercase()).expect("case-insensitive match");

    let _ = fs::remove_dir_all(layout.prefix());
}

#[test]
fn remove_installation_leaves_no_tmp_residue() {
    let layout = test_layout();
    seed_installation(&layout, &v("3.10"), "3.10.4");

    remove_installation(&layout, &v("3.10")).expect("must remove");
    assert!(fs::read_dir(layout.tmp_state_dir())
        .expect("must read tmp")
        .next()
        .is_none());

    let _ = fs::remove_dir_all(layout.prefix());
}
