//! `dmdoc check` command implementation.

use std::path::PathBuf;

use clap::Args;
use dmdoc_config::{CliSettings, Config};

use super::load_model;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    /// Path to configuration file (default: auto-discover dmdoc.toml).
    #[arg(short, long)]
    pub(crate) config: Option<PathBuf>,

    /// Model export JSON (overrides config).
    #[arg(short, long, env = "DMDOC_MODEL")]
    pub(crate) model: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl CheckArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            model: self.model,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let model_path = &config.input_resolved.model;

        let model = load_model(model_path)?;
        let project = model.project();

        if !project.name.is_empty() {
            output.highlight(&format!("{} {}", project.name, project.version));
        }
        output.info(&format!("Elements:   {}", model.elements().len()));
        output.info(&format!("Namespaces: {}", model.namespaces().len()));
        output.info(&format!(
            "Derived:    {}",
            model.elements().with_hierarchy().count()
        ));
        output.success(&format!("{} is valid", model_path.display()));
        Ok(())
    }
}
