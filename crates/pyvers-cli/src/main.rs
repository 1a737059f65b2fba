mod completion;
mod config;
mod dispatch;
mod guard;
mod lifecycle;
mod logging;
mod render;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use crate::completion::CliCompletionShell;
use crate::config::OutputChoice;

#[derive(Parser, Debug)]
#[command(name = "pyvers")]
#[command(about = "Install, upgrade and switch between Python interpreter versions", long_about = None)]
struct Cli {
    /// Root directory for installations, shims and state.
    #[arg(long, global = true)]
    prefix: Option<PathBuf>,
    /// Version catalog file listing installable builds.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
    #[arg(long, global = true, value_enum)]
    output: Option<OutputChoice>,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Install the best build of a version.
    Install {
        version: String,
        /// Expose the version's shared commands after installing.
        #[arg(long = "use")]
        activate: bool,
    },
    Uninstall {
        version: String,
    },
    /// Replace an installation with the catalog's best build when it is newer.
    Upgrade {
        version: String,
    },
    /// Set the ordered list of versions that own the shared commands.
    Use {
        #[arg(required = true)]
        versions: Vec<String>,
    },
    List,
    /// Print the shell snippet that puts the shim directory on PATH.
    InitShell {
        #[arg(long, value_enum)]
        shell: Option<CliCompletionShell>,
    },
    Completions {
        #[arg(value_enum)]
        shell: CliCompletionShell,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    match dispatch::run_cli(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!(
                "{}",
                render::render_error_line(render::current_error_style(), &err)
            );
            ExitCode::from(1)
        }
    }
}
