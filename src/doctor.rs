//! Environment diagnostics for Jiradash.

use std::path::Path;

use crate::config::ExtractConfiguration;
use crate::config_loader::load_configuration;
use crate::error::ExtractError;

/// Result of running doctor checks.
#[derive(Debug, Clone)]
pub struct DoctorResult {
    pub configuration: ExtractConfiguration,
}

/// Validate the extraction configuration without contacting JIRA.
///
/// # Arguments
/// * `root` - Directory searched for the settings file.
///
/// # Errors
/// Returns `ExtractError` if required connection parameters are missing or
/// the settings file is invalid.
pub fn run_doctor(root: &Path) -> Result<DoctorResult, ExtractError> {
    let configuration = load_configuration(root)?;
    Ok(DoctorResult { configuration })
}
