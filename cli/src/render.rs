use anyhow::{Context, Result};
use arc_lab_model::constants::DEFAULT_RUNNER_IMAGE;
use arc_lab_model::tools::ProcessRunner;
use arc_lab_model::{Credentials, Lab, LabSettings};
use clap::Parser;

/// The render subcommand prints the runner scale set values that `setup` would install.
#[derive(Debug, Parser)]
pub(crate) struct Render {
    /// Image for the runner container.
    #[clap(long = "runner-image", default_value = DEFAULT_RUNNER_IMAGE)]
    runner_image: String,
}

impl Render {
    pub(crate) fn run(self, credentials: Credentials) -> Result<()> {
        let runner = ProcessRunner::default();
        let settings = LabSettings {
            runner_image: self.runner_image,
            ..Default::default()
        };
        let lab = Lab::new(&runner, settings, credentials);
        let yaml = lab
            .runner_set_values()
            .to_yaml()
            .context("Unable to render runner scale set values")?;
        print!("{}", yaml);
        Ok(())
    }
}
