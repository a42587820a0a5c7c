//! `dmdoc build` command implementation.

use std::path::PathBuf;

use clap::Args;
use dmdoc_config::{CliSettings, Config};
use dmdoc_site::{BuildConfig, SiteBuilder};

use super::load_model;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Path to configuration file (default: auto-discover dmdoc.toml).
    #[arg(short, long)]
    pub(crate) config: Option<PathBuf>,

    /// Model export JSON (overrides config).
    #[arg(short, long, env = "DMDOC_MODEL")]
    pub(crate) model: Option<PathBuf>,

    /// Output directory for the generated site (overrides config).
    #[arg(short, long)]
    pub(crate) output_dir: Option<PathBuf>,

    /// Site title (overrides config, default: project name).
    #[arg(long)]
    pub(crate) title: Option<String>,

    /// Remove the output directory before building.
    #[arg(long)]
    pub(crate) clean: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl BuildArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            model: self.model,
            output_dir: self.output_dir,
            title: self.title,
            clean: self.clean.then_some(true),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let model_path = &config.input_resolved.model;
        let output_dir = &config.output_resolved.dir;
        output.info(&format!("Model: {}", model_path.display()));
        output.info(&format!("Output: {}", output_dir.display()));

        // Resolution errors abort before anything is written.
        let model = load_model(model_path)?;

        let build_config = BuildConfig {
            title: config.site.title.clone(),
            markdown: config.site.markdown,
            parallel: config.site.parallel,
            clean: config.output_resolved.clean,
        };
        let report = SiteBuilder::new(&model, build_config)?.build(output_dir)?;

        output.success(&format!(
            "Built {} pages ({} elements, {} namespaces) to {}",
            report.pages,
            report.elements,
            report.namespaces,
            report.output_dir.display()
        ));
        Ok(())
    }
}
