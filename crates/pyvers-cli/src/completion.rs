use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use clap::{CommandFactory, ValueEnum};
use clap_complete::Shell;
use pyvers_installer::PrefixLayout;

use crate::Cli;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliCompletionShell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

impl CliCompletionShell {
    /// Recognises a shell from a `$SHELL`-style value such as `/usr/bin/zsh`.
    fn from_shell_path(value: &str) -> Option<Self> {
        let name = Path::new(value)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or(value);
        match name.to_ascii_lowercase().as_str() {
            "bash" => Some(Self::Bash),
            "zsh" => Some(Self::Zsh),
            "fish" => Some(Self::Fish),
            "pwsh" | "powershell" => Some(Self::Powershell),
            _ => None,
        }
    }

    fn generator(self) -> Shell {
        match self {
            Self::Bash => Shell::Bash,
            Self::Zsh => Shell::Zsh,
            Self::Fish => Shell::Fish,
            Self::Powershell => Shell::PowerShell,
        }
    }
}

pub fn write_completions_script<W: Write>(shell: CliCompletionShell, writer: &mut W) -> Result<()> {
    let mut script = Vec::new();
    clap_complete::generate(shell.generator(), &mut Cli::command(), "pyvers", &mut script);
    writer
        .write_all(&script)
        .context("failed to write completion script")
}

/// An explicit `--shell` wins, then `$SHELL`, then the platform default.
pub fn resolve_init_shell(
    requested_shell: Option<CliCompletionShell>,
    shell_env: Option<&str>,
    is_windows: bool,
) -> CliCompletionShell {
    requested_shell
        .or_else(|| shell_env.and_then(CliCompletionShell::from_shell_path))
        .unwrap_or(if is_windows {
            CliCompletionShell::Powershell
        } else {
            CliCompletionShell::Bash
        })
}

/// Lines that prepend the shim directory to PATH for `shell`.
pub fn init_shell_snippet(layout: &PrefixLayout, shell: CliCompletionShell) -> Vec<String> {
    let bin = layout.bin_dir().display().to_string();
    match shell {
        CliCompletionShell::Bash | CliCompletionShell::Zsh => {
            vec![format!("export PATH='{}':\"$PATH\"", escape_single_quote_shell(&bin))]
        }
        CliCompletionShell::Fish => {
            let escaped_bin = escape_single_quote_shell(&bin);
            vec![
                format!("if not contains -- '{escaped_bin}' $PATH"),
                format!("    set -gx PATH '{escaped_bin}' $PATH"),
                "end".to_string(),
            ]
        }
        CliCompletionShell::Powershell => {
            let escaped_bin = escape_ps_single_quote(&bin);
            vec![
                format!(
                    "if (-not ($env:PATH -split ';' | Where-Object {{ $_ -eq '{escaped_bin}' }})) {{"
                ),
                format!("  $env:PATH = '{escaped_bin};' + $env:PATH"),
                "}".to_string(),
            ]
        }
    }
}

/// Quotes for POSIX shells by closing, escaping and reopening.
fn escape_single_quote_shell(value: &str) -> String {
    value.replace('\'', r#"'\''"#)
}

fn escape_ps_single_quote(value: &str) -> String {
    value.replace('\'', "''")
}
