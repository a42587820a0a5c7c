//! CLI command implementations.

mod build;
mod check;

use std::path::Path;

use dmdoc_model::{Model, TracingReporter};

use crate::error::CliError;

pub(crate) use build::BuildArgs;
pub(crate) use check::CheckArgs;

/// Read and resolve the model export at `path`.
fn load_model(path: &Path) -> Result<Model, CliError> {
    let json = std::fs::read_to_string(path).map_err(|source| CliError::ReadModel {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Model::from_json_str(&json, &TracingReporter)?)
}
