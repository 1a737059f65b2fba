use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use pyvers_core::{Catalog, Version};
use pyvers_installer::{LocalInstaller, PrefixCatalog, PrefixLayout, ShimLinker};
use pyvers_resolver::BuildComparison;

use crate::completion::{init_shell_snippet, resolve_init_shell, write_completions_script};
use crate::config::{load_settings, Settings, SettingsOverrides};
use crate::lifecycle::{collect_listing, Notice, Orchestrator};
use crate::render::{
    format_list_lines, output_style_for, print_notice, print_status, OutputStyle,
    ProgressInstaller,
};
use crate::{Cli, Commands};

type PrefixOrchestrator =
    Orchestrator<PrefixCatalog, ProgressInstaller<LocalInstaller>, ShimLinker>;

pub fn run_cli(cli: Cli) -> Result<()> {
    let Cli {
        prefix,
        catalog,
        output,
        verbose: _,
        command,
    } = cli;

    if let Commands::Completions { shell } = command {
        let mut stdout = io::stdout().lock();
        return write_completions_script(shell, &mut stdout);
    }

    let settings = load_settings(SettingsOverrides {
        prefix,
        catalog,
        output,
    })?;
    let style = output_style_for(settings.output);
    tracing::debug!(
        prefix = %settings.layout.prefix().display(),
        catalog = %settings.catalog_path.display(),
        "resolved settings"
    );

    match command {
        Commands::Install { version, activate } => {
            let version = Version::parse(&version)?;
            let mut orchestrator = open_orchestrator(&settings, style)?;
            orchestrator.catalog().require(&version)?;
            let root = orchestrator.install(&version, activate, &mut |notice: Notice| {
                print_notice(style, &notice)
            })?;
            print_status(
                style,
                "ok",
                &format!("Installed {version} at {}", root.display()),
            );
        }
        Commands::Uninstall { version } => {
            let version = Version::parse(&version)?;
            let mut orchestrator = open_orchestrator(&settings, style)?;
            orchestrator.uninstall(&version, &mut |notice: Notice| print_notice(style, &notice))?;
        }
        Commands::Upgrade { version } => {
            let version = Version::parse(&version)?;
            let mut orchestrator = open_orchestrator(&settings, style)?;
            let comparison =
                orchestrator.upgrade(&version, &mut |notice: Notice| print_notice(style, &notice))?;
            if let BuildComparison::Behind { best, .. } = comparison {
                print_status(style, "ok", &format!("Upgraded {version} to {best}"));
            }
        }
        Commands::Use { versions } => {
            let versions = versions
                .iter()
                .map(|raw| Version::parse(raw))
                .collect::<Result<Vec<_>>>()?;
            let mut orchestrator = open_orchestrator(&settings, style)?;
            orchestrator.use_versions(&versions)?;
            let names = orchestrator
                .linker()
                .active()
                .iter()
                .map(Version::name)
                .collect::<Vec<_>>();
            print_status(style, "ok", &format!("Using {}", names.join(", ")));
        }
        Commands::List => {
            let catalog = PrefixCatalog::new(
                settings.layout.clone(),
                load_catalog(&settings.catalog_path)?,
            );
            let linker = ShimLinker::open(settings.layout.clone())?;
            let listing = collect_listing(&catalog, linker.active())?;
            if listing.is_empty() {
                println!("No versions in catalog {}", settings.catalog_path.display());
            }
            for line in format_list_lines(&listing) {
                println!("{line}");
            }
        }
        Commands::InitShell { shell } => {
            let shell_env = std::env::var("SHELL").ok();
            let shell = resolve_init_shell(shell, shell_env.as_deref(), cfg!(windows));
            for line in init_shell_snippet(&settings.layout, shell) {
                println!("{line}");
            }
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}

fn open_orchestrator(settings: &Settings, style: OutputStyle) -> Result<PrefixOrchestrator> {
    let layout: &PrefixLayout = &settings.layout;
    layout.ensure_base_dirs()?;
    let catalog = load_catalog(&settings.catalog_path)?;
    let linker = ShimLinker::open(layout.clone())?;
    Ok(Orchestrator::new(
        PrefixCatalog::new(layout.clone(), catalog.clone()),
        ProgressInstaller::new(LocalInstaller::new(layout.clone(), catalog), style),
        linker,
    ))
}

/// A missing catalog file reads as an empty catalog so that commands which
/// only touch existing installations keep working.
fn load_catalog(path: &Path) -> Result<Catalog> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no version catalog; using an empty one");
        return Ok(Catalog::default());
    }
    Catalog::load(path).with_context(|| format!("failed to load catalog {}", path.display()))
}
