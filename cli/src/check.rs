use crate::load_credentials;
use anyhow::{anyhow, Result};
use arc_lab_model::constants::REQUIRED_TOOLS;
use arc_lab_model::tools::{CommandRunner, ProcessRunner};
use clap::Parser;
use std::path::Path;

/// The check subcommand reports whether `setup` has what it needs. Nothing is changed.
#[derive(Debug, Parser)]
pub(crate) struct Check {}

impl Check {
    pub(crate) fn run(self, env_file: &Path) -> Result<()> {
        let mut failures = 0;

        match load_credentials(env_file) {
            Ok(credentials) => {
                println!("✔ GitHub App credentials ({})", credentials.config_url());
                match credentials.variant().sidecar_image() {
                    Some(image) => println!("✔ sidecar image '{}'", image),
                    None => println!("✔ no sidecar image, runners get a single container"),
                }
            }
            Err(e) => {
                failures += 1;
                println!("✘ GitHub App credentials: {:#}", e);
            }
        }

        let runner = ProcessRunner::default();
        for tool in REQUIRED_TOOLS {
            match runner.locate(tool) {
                Some(path) => println!("✔ {} ({})", tool, path.display()),
                None => {
                    failures += 1;
                    println!("✘ {} was not found on PATH", tool);
                }
            }
        }

        if failures > 0 {
            return Err(anyhow!("{} check(s) failed", failures));
        }
        Ok(())
    }
}
