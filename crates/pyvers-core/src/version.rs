use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};

/// An interpreter release line such as `3.11`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
    major: u64,
    minor: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandScope {
    /// Owned by exactly one version (`python3.11`).
    Versioned,
    /// Competed for by every version in the active set (`python3`, `python`).
    Shared,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub name: String,
    pub target_rel_path: String,
    pub scope: CommandScope,
}

impl Version {
    pub fn new(major: u64, minor: u64) -> Self {
        Self { major, minor }
    }

    pub fn parse(input: &str) -> anyhow::Result<Self> {
        let trimmed = input.trim();
        let Some((major, minor)) = trimmed.split_once('.') else {
            return Err(anyhow!(
                "invalid version '{input}': expected '<major>.<minor>'"
            ));
        };
        if minor.contains('.') {
            return Err(anyhow!(
                "invalid version '{input}': expected '<major>.<minor>', not a build number"
            ));
        }
        let major = parse_component(major).with_context(|| format!("invalid version '{input}'"))?;
        let minor = parse_component(minor).with_context(|| format!("invalid version '{input}'"))?;
        Ok(Self { major, minor })
    }

    pub fn major(&self) -> u64 {
        self.major
    }

    pub fn minor(&self) -> u64 {
        self.minor
    }

    pub fn name(&self) -> String {
        format!("{}.{}", self.major, self.minor)
    }

    /// Commands a valid installation of this version can expose, versioned
    /// commands first.
    pub fn commands(&self) -> Vec<CommandSpec> {
        let python = interpreter_rel_path();
        let pip = pip_rel_path();
        let versioned_suffix = self.name();
        let shared_suffix = self.major.to_string();

        vec![
            command(
                format!("python{versioned_suffix}"),
                python,
                CommandScope::Versioned,
            ),
            command(format!("pip{versioned_suffix}"), pip, CommandScope::Versioned),
            command(format!("python{shared_suffix}"), python, CommandScope::Shared),
            command(format!("pip{shared_suffix}"), pip, CommandScope::Shared),
            command("python".to_string(), python, CommandScope::Shared),
            command("pip".to_string(), pip, CommandScope::Shared),
        ]
    }

    pub fn shared_commands(&self) -> Vec<CommandSpec> {
        self.commands()
            .into_iter()
            .filter(|spec| spec.scope == CommandScope::Shared)
            .collect()
    }

    pub fn provides_command(&self, name: &str) -> Option<CommandSpec> {
        self.commands().into_iter().find(|spec| spec.name == name)
    }
}

/// Path of the interpreter executable relative to an installation root.
pub fn interpreter_rel_path() -> &'static str {
    if cfg!(windows) {
        "python.exe"
    } else {
        "bin/python"
    }
}

fn pip_rel_path() -> &'static str {
    if cfg!(windows) {
        "Scripts/pip.exe"
    } else {
        "bin/pip"
    }
}

fn command(name: String, target_rel_path: &str, scope: CommandScope) -> CommandSpec {
    CommandSpec {
        name,
        target_rel_path: target_rel_path.to_string(),
        scope,
    }
}

fn parse_component(value: &str) -> anyhow::Result<u64> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(anyhow!("'{value}' is not a non-negative integer"));
    }
    value
        .parse()
        .with_context(|| format!("'{value}' is out of range"))
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for Version {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Version {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Version> for String {
    fn from(value: Version) -> Self {
        value.name()
    }
}
