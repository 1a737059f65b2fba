use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::ValueEnum;
use pyvers_installer::{default_user_prefix, PrefixLayout};
use serde::{Deserialize, Serialize};

pub const CATALOG_ENV: &str = "PYVERS_CATALOG";
pub const OUTPUT_ENV: &str = "PYVERS_OUTPUT";

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputChoice {
    /// Rich when stdout is a terminal, plain otherwise.
    #[default]
    Auto,
    Plain,
    Rich,
}

impl OutputChoice {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "plain" => Ok(Self::Plain),
            "rich" => Ok(Self::Rich),
            other => Err(anyhow!(
                "unknown output mode '{other}': expected auto, plain or rich"
            )),
        }
    }
}

/// Contents of `<prefix>/config.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PyversConfig {
    pub catalog: Option<PathBuf>,
    pub output: Option<OutputChoice>,
}

impl PyversConfig {
    pub fn from_toml_str(input: &str) -> Result<Self> {
        toml::from_str(input).context("failed to parse pyvers config")
    }

    /// A missing file is an empty config.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("failed to read config: {}", path.display()));
            }
        };
        Self::from_toml_str(&raw).with_context(|| format!("invalid config: {}", path.display()))
    }
}

/// Values given on the command line; `None` falls through to the
/// environment, then the config file, then the default.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub prefix: Option<PathBuf>,
    pub catalog: Option<PathBuf>,
    pub output: Option<OutputChoice>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub layout: PrefixLayout,
    pub catalog_path: PathBuf,
    pub output: OutputChoice,
}

pub fn load_settings(overrides: SettingsOverrides) -> Result<Settings> {
    let prefix = match overrides.prefix.clone() {
        Some(prefix) => prefix,
        None => default_user_prefix()?,
    };
    let layout = PrefixLayout::new(prefix);
    let config = PyversConfig::load(&layout.config_path())?;
    resolve_settings(layout, overrides, config, |key| std::env::var(key).ok())
}

pub(crate) fn resolve_settings(
    layout: PrefixLayout,
    overrides: SettingsOverrides,
    config: PyversConfig,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Settings> {
    let env_value = |key: &str| env(key).filter(|value| !value.trim().is_empty());

    let catalog_path = match overrides.catalog {
        Some(path) => path,
        None => match env_value(CATALOG_ENV) {
            Some(path) => PathBuf::from(path),
            // config paths are relative to the prefix
            None => match config.catalog {
                Some(path) if path.is_relative() => layout.prefix().join(path),
                Some(path) => path,
                None => layout.default_catalog_path(),
            },
        },
    };

    let output = match overrides.output {
        Some(output) => output,
        None => match env_value(OUTPUT_ENV) {
            Some(raw) => {
                OutputChoice::parse(&raw).with_context(|| format!("invalid {OUTPUT_ENV}"))?
            }
            None => config.output.unwrap_or_default(),
        },
    };

    Ok(Settings {
        layout,
        catalog_path,
        output,
    })
}
