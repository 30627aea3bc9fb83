//! End-to-end extraction pipeline.
//!
//! Drives fetch-all, fetch-per-filter, normalization, aggregation, and the
//! two dashboard document writes. Documents are only written after every
//! fetch has completed, so a failed run never leaves partial output.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::config::ExtractConfiguration;
use crate::error::ExtractError;
use crate::jira_client::{JiraClient, DEFAULT_MAX_RESULTS};
use crate::models::{FilterResult, FiltersDocument, IssuesDocument, NormalizedIssue};
use crate::normalize::{aggregate_issues, normalize_issue};

/// Filename of the main issues document.
pub const ISSUES_FILENAME: &str = "issues.json";

/// Filename of the per-filter document.
pub const FILTERS_FILENAME: &str = "filters.json";

/// Summary of a completed extraction run.
#[derive(Debug)]
pub struct ExtractResult {
    pub issue_count: usize,
    pub filter_count: usize,
}

/// Run the full extraction pipeline and write the dashboard documents.
///
/// # Arguments
/// * `configuration` - Runtime configuration.
/// * `jql` - Optional override for the default query.
/// * `max_results` - Optional override for the unfiltered result cap.
///
/// # Errors
/// Returns `ExtractError` if the main fetch or any filter search fails, or
/// if a document cannot be written.
pub fn run_extract(
    configuration: &ExtractConfiguration,
    jql: Option<&str>,
    max_results: Option<usize>,
) -> Result<ExtractResult, ExtractError> {
    let client = JiraClient::new(configuration.clone())?;

    println!("Extracting issues from {}...", configuration.url);
    let raw_issues =
        client.fetch_all_issues(jql, max_results.unwrap_or(DEFAULT_MAX_RESULTS))?;

    let mut filters: BTreeMap<String, FilterResult> = BTreeMap::new();
    for filter_id in &configuration.filter_ids {
        println!("Extracting filter {filter_id}...");
        let raw = client.fetch_filter_issues(filter_id)?;
        let issues: Vec<NormalizedIssue> = raw
            .iter()
            .map(|issue| normalize_issue(issue, &configuration.url))
            .collect();
        filters.insert(
            filter_id.clone(),
            FilterResult {
                count: issues.len(),
                issues,
            },
        );
    }

    let issues: Vec<NormalizedIssue> = raw_issues
        .iter()
        .map(|issue| normalize_issue(issue, &configuration.url))
        .collect();
    let issues_document = IssuesDocument {
        aggregates: aggregate_issues(&issues),
        last_updated: last_updated_timestamp(&raw_issues),
        issues,
    };
    let filters_document = FiltersDocument { filters };

    fs::create_dir_all(&configuration.data_dir)
        .map_err(|error| ExtractError::Io(error.to_string()))?;

    let issues_path = configuration.data_dir.join(ISSUES_FILENAME);
    write_document(&issues_path, &issues_document)?;
    println!(
        "Saved: {} ({} issues)",
        issues_path.display(),
        issues_document.issues.len()
    );

    let filters_path = configuration.data_dir.join(FILTERS_FILENAME);
    write_document(&filters_path, &filters_document)?;
    println!("Saved: {}", filters_path.display());

    Ok(ExtractResult {
        issue_count: issues_document.issues.len(),
        filter_count: filters_document.filters.len(),
    })
}

/// Timestamp recorded in the issues document.
///
/// The most recently updated issue leads the default extraction, so its
/// `updated` field is used when present; an empty result set falls back to
/// the current UTC time.
fn last_updated_timestamp(raw_issues: &[Value]) -> String {
    raw_issues
        .first()
        .and_then(|issue| issue["fields"]["updated"].as_str())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true))
}

fn write_document<T: Serialize>(path: &Path, document: &T) -> Result<(), ExtractError> {
    let contents = serde_json::to_string_pretty(document)
        .map_err(|error| ExtractError::Io(error.to_string()))?;
    fs::write(path, contents).map_err(|error| ExtractError::Io(error.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn last_updated_prefers_first_issue() {
        let raw = vec![
            json!({"key": "A-2", "fields": {"updated": "2026-08-01T12:00:00.000+0000"}}),
            json!({"key": "A-1", "fields": {"updated": "2026-07-01T12:00:00.000+0000"}}),
        ];
        assert_eq!(
            last_updated_timestamp(&raw),
            "2026-08-01T12:00:00.000+0000"
        );
    }

    #[test]
    fn last_updated_falls_back_to_now_when_empty() {
        let stamp = last_updated_timestamp(&[]);
        assert!(stamp.ends_with('Z'));
        assert!(stamp.starts_with("20"));
    }

    #[test]
    fn last_updated_skips_blank_field() {
        let raw = vec![json!({"key": "A-1", "fields": {"updated": ""}})];
        assert!(last_updated_timestamp(&raw).ends_with('Z'));
    }
}
