//! Configuration loading and validation.

use std::fs;
use std::path::Path;

use crate::config::{
    normalize_base_url, ExtractConfiguration, DEFAULT_API_VERSION, DEFAULT_DATA_DIR, DEFAULT_JQL,
};
use crate::error::ExtractError;
use crate::models::FileConfiguration;

/// Name of the optional settings file searched in the working directory.
pub const CONFIGURATION_FILENAME: &str = ".jiradash.yml";

/// Load the extractor configuration.
///
/// Non-secret settings come from `.jiradash.yml` when present; environment
/// variables override them. Credentials (`JIRA_EMAIL`, `JIRA_API_TOKEN`) are
/// environment-only.
///
/// # Arguments
///
/// * `root` - Directory searched for the settings file.
///
/// # Errors
///
/// Returns `ExtractError::Configuration` if the settings file is invalid or
/// a required connection parameter is missing.
pub fn load_configuration(root: &Path) -> Result<ExtractConfiguration, ExtractError> {
    let file = load_file_configuration(&root.join(CONFIGURATION_FILENAME))?;
    let configuration = resolve_configuration(root, file);

    let errors = configuration.validate();
    if !errors.is_empty() {
        return Err(ExtractError::Configuration(errors.join("; ")));
    }

    Ok(configuration)
}

/// Parse the settings file, tolerating a missing or empty file.
///
/// # Errors
///
/// Returns `ExtractError::Configuration` if the file is present but invalid.
pub fn load_file_configuration(path: &Path) -> Result<FileConfiguration, ExtractError> {
    if !path.is_file() {
        return Ok(FileConfiguration::default());
    }
    let contents =
        fs::read_to_string(path).map_err(|error| ExtractError::Io(error.to_string()))?;
    if contents.trim().is_empty() {
        return Ok(FileConfiguration::default());
    }
    serde_yaml::from_str(&contents)
        .map_err(|error| ExtractError::Configuration(map_configuration_error(&error)))
}

/// Combine file settings with environment overrides into the runtime struct.
pub fn resolve_configuration(root: &Path, file: FileConfiguration) -> ExtractConfiguration {
    let url = environment_override("JIRA_URL", file.url);
    let filter_ids = match environment_override("JIRA_FILTER_IDS", None) {
        Some(raw) => split_filter_ids(&raw),
        None => file.filter_ids,
    };
    let default_jql = environment_override("JIRA_JQL_DEFAULT", file.default_jql)
        .unwrap_or_else(|| DEFAULT_JQL.to_string());
    let api_version = environment_override("JIRA_API_VERSION", file.api_version)
        .unwrap_or_else(|| DEFAULT_API_VERSION.to_string());
    let data_dir = file.data_dir.unwrap_or_else(|| DEFAULT_DATA_DIR.to_string());

    ExtractConfiguration {
        url: normalize_base_url(&url.unwrap_or_default()),
        email: std::env::var("JIRA_EMAIL").unwrap_or_default(),
        api_token: std::env::var("JIRA_API_TOKEN").unwrap_or_default(),
        filter_ids,
        default_jql,
        api_version,
        data_dir: root.join(data_dir),
    }
}

/// Split a comma-separated filter identifier list, dropping blanks.
pub fn split_filter_ids(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

fn environment_override(name: &str, fallback: Option<String>) -> Option<String> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .or(fallback)
}

fn map_configuration_error(error: &serde_yaml::Error) -> String {
    let message = error.to_string();
    if message.contains("unknown field") {
        return "unknown configuration fields".to_string();
    }
    message
}
