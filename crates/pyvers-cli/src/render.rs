use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;

use anstyle::{AnsiColor, Effects, Style};
use indicatif::{ProgressBar, ProgressStyle};
use pyvers_core::{Build, Installer, Version};

use crate::config::OutputChoice;
use crate::lifecycle::{Notice, VersionListing};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum OutputStyle {
    Plain,
    Rich,
}

pub fn resolve_output_style(stdout_is_tty: bool, no_color: bool) -> OutputStyle {
    if stdout_is_tty && !no_color {
        OutputStyle::Rich
    } else {
        OutputStyle::Plain
    }
}

pub fn current_output_style() -> OutputStyle {
    resolve_output_style(std::io::stdout().is_terminal(), no_color_requested())
}

pub fn output_style_for(choice: OutputChoice) -> OutputStyle {
    match choice {
        OutputChoice::Auto => current_output_style(),
        OutputChoice::Plain => OutputStyle::Plain,
        OutputChoice::Rich => OutputStyle::Rich,
    }
}

/// Style for the final error line, decided before any config is read.
pub fn current_error_style() -> OutputStyle {
    resolve_output_style(std::io::stderr().is_terminal(), no_color_requested())
}

fn no_color_requested() -> bool {
    std::env::var_os("NO_COLOR").is_some_and(|value| !value.is_empty())
}

pub fn render_status_line(style: OutputStyle, status: &str, message: &str) -> String {
    match style {
        OutputStyle::Plain => message.to_string(),
        OutputStyle::Rich => format!("{} {message}", status_badge(status)),
    }
}

fn status_badge(status: &str) -> &'static str {
    match status {
        "ok" => "[OK]",
        "warn" => "[WARN]",
        "error" => "[ERR]",
        _ => "[..]",
    }
}

pub fn print_status(style: OutputStyle, status: &str, message: &str) {
    println!("{}", render_status_line(style, status, message));
}

pub fn print_notice(style: OutputStyle, notice: &Notice) {
    print_status(style, notice.status(), &notice.to_string());
}

pub fn render_error_line(style: OutputStyle, err: &anyhow::Error) -> String {
    match style {
        OutputStyle::Plain => format!("error: {err:#}"),
        OutputStyle::Rich => format!("{} {err:#}", colorize(error_style(), "error:")),
    }
}

/// `*` marks active versions.
pub fn format_list_lines(listing: &[VersionListing]) -> Vec<String> {
    let width = listing
        .iter()
        .map(|entry| entry.version.name().len())
        .max()
        .unwrap_or(0);

    listing
        .iter()
        .map(|entry| {
            let marker = if entry.active { '*' } else { ' ' };
            let state = match (entry.installed, entry.build.as_deref()) {
                (true, Some(build)) => build.to_string(),
                (true, None) => "unknown build".to_string(),
                (false, _) => "not installed".to_string(),
            };
            format!(
                "{marker} {:<width$}  {state}",
                entry.version.name(),
                width = width
            )
        })
        .collect()
}

/// Wraps an [`Installer`] with a spinner on stderr while it works. Plain
/// output shows nothing extra.
pub struct ProgressInstaller<I> {
    inner: I,
    style: OutputStyle,
}

impl<I> ProgressInstaller<I> {
    pub fn new(inner: I, style: OutputStyle) -> Self {
        Self { inner, style }
    }
}

impl<I: Installer> Installer for ProgressInstaller<I> {
    fn install(&mut self, version: &Version, build: Option<&Build>) -> anyhow::Result<PathBuf> {
        let message = match build {
            Some(build) => format!("installing {version} ({build})"),
            None => format!("installing {version}"),
        };
        let spinner = start_spinner(self.style, "install", &message);
        let result = self.inner.install(version, build);
        finish_spinner(spinner);
        result
    }

    fn uninstall(&mut self, version: &Version) -> anyhow::Result<PathBuf> {
        let spinner = start_spinner(self.style, "uninstall", &format!("removing {version}"));
        let result = self.inner.uninstall(version);
        finish_spinner(spinner);
        result
    }
}

fn start_spinner(style: OutputStyle, label: &str, message: &str) -> Option<ProgressBar> {
    if style != OutputStyle::Rich {
        return None;
    }

    let spinner = ProgressBar::new_spinner();
    if let Ok(template) = ProgressStyle::with_template("{spinner:.cyan.bold} {msg} {elapsed}") {
        spinner.set_style(template.tick_chars(progress_tick_chars(label)));
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));
    Some(spinner)
}

fn finish_spinner(spinner: Option<ProgressBar>) {
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
}

fn progress_tick_chars(label: &str) -> &'static str {
    match label {
        "install" => ".oO@* ",
        "uninstall" => "\\|/- ",
        _ => "|/-\\ ",
    }
}

fn error_style() -> Style {
    Style::new()
        .fg_color(Some(AnsiColor::BrightRed.into()))
        .effects(Effects::BOLD)
}

fn colorize(style: Style, text: &str) -> String {
    format!("{}{}{}", style.render(), text, style.render_reset())
}
