/*!

This is the command line interface for standing up a local Actions Runner Controller lab on
minikube and tearing it down again.

!*/

mod check;
mod cleanup;
mod render;
mod setup;

use anyhow::{Context, Result};
use arc_lab_model::constants::DEFAULT_ENV_FILE;
use arc_lab_model::{Credentials, Environment};
use clap::{CommandFactory, ErrorKind, Parser};
use env_logger::Builder;
use log::LevelFilter;
use std::path::{Path, PathBuf};
use termion::color;

/// Provision a minikube cluster running GitHub Actions Runner Controller with a GitHub App.
#[derive(Debug, Parser)]
#[clap(author, version, about)]
struct Args {
    /// Set logging verbosity [trace|debug|info|warn|error]. If the environment variable `RUST_LOG`
    /// is present, it overrides the default logging behavior. See https://docs.rs/env_logger/latest
    #[clap(long = "log-level", default_value = "info")]
    log_level: LevelFilter,
    /// Path to the kubeconfig file. Also can be passed with the KUBECONFIG environment variable.
    #[clap(long = "kubeconfig")]
    kubeconfig: Option<PathBuf>,
    /// File of KEY=VALUE lines layered over the process environment. Values in the file win.
    #[clap(long = "env-file", default_value = DEFAULT_ENV_FILE)]
    env_file: PathBuf,
    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Parser)]
enum Command {
    /// Create or reuse the cluster and install the controller, secret and runner scale set.
    Setup(setup::Setup),
    /// Delete the minikube profile.
    Cleanup(cleanup::Cleanup),
    /// Validate the credentials and look for the required tools without changing anything.
    Check(check::Check),
    /// Print the runner scale set values `setup` would install.
    Render(render::Render),
}

#[tokio::main]
async fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::UnrecognizedSubcommand
            | ErrorKind::InvalidSubcommand
            | ErrorKind::UnknownArgument => {
                print_help();
                return;
            }
            _ => e.exit(),
        },
    };
    init_logger(args.log_level);
    if let Err(e) = run(args).await {
        eprintln!(
            "{}Error: {:#}{}",
            color::Fg(color::Red),
            e,
            color::Fg(color::Reset)
        );
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let command = match args.command {
        Some(command) => command,
        None => {
            print_help();
            return Ok(());
        }
    };
    match command {
        Command::Setup(setup) => {
            let credentials = load_credentials(&args.env_file)?;
            setup.run(credentials, args.kubeconfig).await
        }
        Command::Cleanup(cleanup) => cleanup.run(args.kubeconfig).await,
        Command::Check(check) => check.run(&args.env_file),
        Command::Render(render) => {
            let credentials = load_credentials(&args.env_file)?;
            render.run(credentials)
        }
    }
}

/// Read the environment (process variables overlaid with `env_file`) and validate the GitHub App
/// credentials in it.
pub(crate) fn load_credentials(env_file: &Path) -> Result<Credentials> {
    let environment = Environment::load(env_file)
        .context(format!("Unable to load environment from '{}'", env_file.display()))?;
    Credentials::from_environment(&environment).context("Invalid GitHub App configuration")
}

fn print_help() {
    if let Err(e) = Args::command().print_help() {
        eprintln!("Unable to print help: {}", e);
    }
    println!();
}

/// Initialize the logger with the value passed by `--log-level` (or its default) when the
/// `RUST_LOG` environment variable is not present. If present, the `RUST_LOG` environment variable
/// overrides `--log-level`/`level`.
fn init_logger(level: LevelFilter) {
    match std::env::var(env_logger::DEFAULT_FILTER_ENV).ok() {
        Some(_) => {
            // RUST_LOG exists; env_logger will use it.
            Builder::from_default_env().init();
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate and its library.
            Builder::new()
                .filter(Some(env!("CARGO_CRATE_NAME")), level)
                .filter(Some("arc_lab_model"), level)
                .init();
        }
    }
}
