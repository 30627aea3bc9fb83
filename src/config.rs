//! Runtime configuration for the extractor.

use std::path::PathBuf;

/// Default JQL for the unfiltered extraction. Jira Cloud rejects unbounded
/// queries, so the default carries a recency clause.
pub const DEFAULT_JQL: &str = "updated >= -90d ORDER BY updated DESC";

/// Default REST API version. "3" is Jira Cloud; Jira Server/Data Center
/// deployments use "2".
pub const DEFAULT_API_VERSION: &str = "3";

/// Default output directory for the dashboard documents.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Pagination strategy, selected once from the configured API version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationMode {
    /// Jira Cloud /search/jql endpoint with an opaque continuation token.
    Cursor,
    /// Legacy /search endpoint with a numeric offset and reported total.
    Offset,
}

/// Configuration assembled once at startup and passed into each component.
#[derive(Debug, Clone)]
pub struct ExtractConfiguration {
    /// Normalized JIRA base URL (scheme and host only).
    pub url: String,
    /// Account email for basic auth.
    pub email: String,
    /// API token for basic auth.
    pub api_token: String,
    /// Saved filter identifiers to extract individually.
    pub filter_ids: Vec<String>,
    /// JQL used when no query override is given.
    pub default_jql: String,
    /// REST API version segment used in request paths.
    pub api_version: String,
    /// Directory the dashboard documents are written to.
    pub data_dir: PathBuf,
}

impl ExtractConfiguration {
    /// Return the pagination mode implied by the API version.
    pub fn pagination_mode(&self) -> PaginationMode {
        if self.api_version == "3" {
            PaginationMode::Cursor
        } else {
            PaginationMode::Offset
        }
    }

    /// Validate required connection parameters.
    ///
    /// # Returns
    ///
    /// A list of validation errors.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.url.is_empty() {
            errors.push("JIRA_URL is not set".to_string());
        }
        if self.email.is_empty() {
            errors.push("JIRA_EMAIL is not set".to_string());
        }
        if self.api_token.is_empty() {
            errors.push("JIRA_API_TOKEN is not set".to_string());
        }

        errors
    }
}

/// Reduce a user-provided JIRA URL to scheme and host.
///
/// Tolerates trailing slashes, extra path segments, and a missing scheme;
/// a bare host string is assumed to be https. Blank input yields an empty
/// string. Never fails.
pub fn normalize_base_url(input: &str) -> String {
    let trimmed = input.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return String::new();
    }
    let (scheme, rest) = match trimmed.split_once("://") {
        Some((scheme, rest)) => (scheme, rest),
        None => ("", trimmed),
    };
    let scheme = if scheme.is_empty() { "https" } else { scheme };
    let host = rest.split('/').next().unwrap_or("");
    format!("{scheme}://{host}")
}
