//! dmdoc CLI - Data-model documentation generator.
//!
//! Provides commands for:
//! - `build`: Generate a static HTML site from a model export
//! - `check`: Load and resolve a model export without writing anything

mod commands;
mod error;
mod output;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, CheckArgs};
use output::Output;

/// dmdoc - Data-model documentation generator.
#[derive(Parser)]
#[command(name = "dmdoc", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the documentation site.
    Build(BuildArgs),
    /// Validate a model export.
    Check(CheckArgs),
}

impl Commands {
    fn verbose(&self) -> bool {
        match self {
            Self::Build(args) => args.verbose,
            Self::Check(args) => args.verbose,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.command.verbose() {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Build(args) => args.execute(),
        Commands::Check(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::path::PathBuf;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_build_args() {
        let cli = Cli::try_parse_from([
            "dmdoc", "build", "--model", "shr.json", "-o", "out", "--title", "SHR", "--clean",
            "--verbose",
        ])
        .unwrap();
        let Commands::Build(args) = cli.command else {
            panic!("expected build");
        };
        assert_eq!(args.model, Some(PathBuf::from("shr.json")));
        assert_eq!(args.output_dir, Some(PathBuf::from("out")));
        assert_eq!(args.title.as_deref(), Some("SHR"));
        assert!(args.clean);
        assert!(args.verbose);
    }

    #[test]
    fn test_parse_check_args() {
        let cli = Cli::try_parse_from(["dmdoc", "check", "-c", "dmdoc.toml"]).unwrap();
        assert!(!cli.command.verbose());
        let Commands::Check(args) = cli.command else {
            panic!("expected check");
        };
        assert_eq!(args.config, Some(PathBuf::from("dmdoc.toml")));
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["dmdoc"]).is_err());
    }
}
