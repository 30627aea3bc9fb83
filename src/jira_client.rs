//! Blocking JIRA REST client for issue extraction.
//!
//! Supports the Jira Cloud cursor-paginated /search/jql endpoint and the
//! legacy offset-paginated /search endpoint; the mode is fixed by the
//! configured API version. Requests are issued strictly one after another.

use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;

use crate::config::{ExtractConfiguration, PaginationMode};
use crate::error::ExtractError;

/// Fields requested from the legacy search endpoint.
const SEARCH_FIELDS: &str = "summary,status,issuetype,priority,assignee,project,created,updated";

/// Upper bound on issues per request page.
const MAX_PER_PAGE: usize = 100;

/// Result cap for the unfiltered extraction.
pub const DEFAULT_MAX_RESULTS: usize = 1000;

/// Result cap for per-filter extraction.
pub const FILTER_MAX_RESULTS: usize = 500;

/// Per-request timeout in seconds. There is no retry.
const REQUEST_TIMEOUT_SECONDS: u64 = 30;

/// Recency keywords that mark a JQL query as already bounded.
const RECENCY_KEYWORDS: [&str; 3] = ["updated", "created", "resolved"];

/// Blocking client for the JIRA search and filter endpoints.
#[derive(Debug)]
pub struct JiraClient {
    http: Client,
    configuration: ExtractConfiguration,
}

impl JiraClient {
    /// Build a client from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `ExtractError::Configuration` if required connection
    /// parameters are missing, so no request is ever attempted without them.
    pub fn new(configuration: ExtractConfiguration) -> Result<Self, ExtractError> {
        let errors = configuration.validate();
        if !errors.is_empty() {
            return Err(ExtractError::Configuration(errors.join("; ")));
        }
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECONDS))
            .build()
            .map_err(|error| ExtractError::Configuration(error.to_string()))?;
        Ok(Self {
            http,
            configuration,
        })
    }

    /// Fetch issues matching a JQL query, following pagination.
    ///
    /// Upstream order is preserved and at most `max_results` issues are
    /// returned.
    ///
    /// # Arguments
    /// * `jql` - Query to run; `None` uses the configured default.
    /// * `max_results` - Upper bound on returned issues.
    ///
    /// # Errors
    /// Returns `ExtractError::Http` on a non-success status and
    /// `ExtractError::MalformedResponse` if a body cannot be parsed.
    pub fn fetch_all_issues(
        &self,
        jql: Option<&str>,
        max_results: usize,
    ) -> Result<Vec<Value>, ExtractError> {
        let jql = jql.unwrap_or(&self.configuration.default_jql);
        match self.configuration.pagination_mode() {
            PaginationMode::Cursor => self.fetch_with_cursor(jql, max_results),
            PaginationMode::Offset => self.fetch_with_offset(jql, max_results),
        }
    }

    fn fetch_with_cursor(&self, jql: &str, max_results: usize) -> Result<Vec<Value>, ExtractError> {
        let url = format!("{}/rest/api/3/search/jql", self.configuration.url);
        let mut all_issues: Vec<Value> = Vec::new();
        let mut next_page_token: Option<String> = None;

        while all_issues.len() < max_results {
            let page_size = MAX_PER_PAGE.min(max_results - all_issues.len());
            let mut params = vec![
                ("jql", jql.to_string()),
                ("maxResults", page_size.to_string()),
            ];
            if let Some(token) = &next_page_token {
                params.push(("nextPageToken", token.clone()));
            }

            let body = self.get_json(&url, &params)?;
            let issues = issues_array(&body);
            all_issues.extend(issues.iter().cloned());
            next_page_token = body["nextPageToken"].as_str().map(str::to_string);
            if next_page_token.is_none() || issues.is_empty() {
                break;
            }
        }

        all_issues.truncate(max_results);
        Ok(all_issues)
    }

    fn fetch_with_offset(&self, jql: &str, max_results: usize) -> Result<Vec<Value>, ExtractError> {
        let url = format!(
            "{}/rest/api/{}/search",
            self.configuration.url, self.configuration.api_version
        );
        let mut all_issues: Vec<Value> = Vec::new();
        let mut start_at = 0usize;

        loop {
            let params = vec![
                ("jql", jql.to_string()),
                ("startAt", start_at.to_string()),
                ("maxResults", MAX_PER_PAGE.to_string()),
                ("fields", SEARCH_FIELDS.to_string()),
            ];

            let body = self.get_json(&url, &params)?;
            let issues = issues_array(&body);
            all_issues.extend(issues.iter().cloned());
            let total = body["total"].as_u64().unwrap_or(0) as usize;
            start_at += issues.len();
            if start_at >= total || issues.is_empty() || all_issues.len() >= max_results {
                break;
            }
        }

        all_issues.truncate(max_results);
        Ok(all_issues)
    }

    /// Resolve a saved filter to its JQL.
    ///
    /// A filter that cannot be resolved yields `Ok(None)` instead of an
    /// error, so one bad identifier does not abort the whole extraction.
    ///
    /// # Errors
    /// Returns `ExtractError::Http` only if the request itself fails.
    pub fn resolve_filter_jql(&self, filter_id: &str) -> Result<Option<String>, ExtractError> {
        let url = format!(
            "{}/rest/api/{}/filter/{filter_id}",
            self.configuration.url, self.configuration.api_version
        );
        let response = self
            .http
            .get(&url)
            .basic_auth(
                &self.configuration.email,
                Some(&self.configuration.api_token),
            )
            .header("Accept", "application/json")
            .send()
            .map_err(|error| ExtractError::Http(format!("JIRA request failed: {error}")))?;

        if !response.status().is_success() {
            return Ok(None);
        }

        let body: Value = response.json().map_err(|error| {
            ExtractError::MalformedResponse(format!("Failed to parse JIRA response: {error}"))
        })?;
        Ok(body["jql"].as_str().map(str::to_string))
    }

    /// Fetch the issues selected by a saved filter.
    ///
    /// An unresolvable filter yields an empty list. In cursor mode an
    /// unbounded filter query is conjoined with a recency clause before the
    /// search, since Jira Cloud rejects unbounded JQL.
    ///
    /// # Errors
    /// Returns `ExtractError::Http` or `ExtractError::MalformedResponse`
    /// from the underlying search.
    pub fn fetch_filter_issues(&self, filter_id: &str) -> Result<Vec<Value>, ExtractError> {
        let Some(jql) = self.resolve_filter_jql(filter_id)? else {
            return Ok(Vec::new());
        };
        let jql = match self.configuration.pagination_mode() {
            PaginationMode::Cursor => ensure_bounded_jql(&jql),
            PaginationMode::Offset => jql,
        };
        self.fetch_all_issues(Some(&jql), FILTER_MAX_RESULTS)
    }

    fn get_json(&self, url: &str, params: &[(&str, String)]) -> Result<Value, ExtractError> {
        let response = self
            .http
            .get(url)
            .query(params)
            .basic_auth(
                &self.configuration.email,
                Some(&self.configuration.api_token),
            )
            .header("Accept", "application/json")
            .send()
            .map_err(|error| ExtractError::Http(format!("JIRA request failed: {error}")))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|error| ExtractError::Http(format!("JIRA response unreadable: {error}")))?;

        if !status.is_success() {
            eprintln!("JIRA API error: status {status}");
            eprintln!("Response: {}", truncate(&body, 500));
            return Err(ExtractError::Http(format!("JIRA API returned {status}")));
        }

        serde_json::from_str(&body).map_err(|error| {
            eprintln!("Response is not JSON: {:?}", truncate(&body, 200));
            ExtractError::MalformedResponse(format!("Failed to parse JIRA response: {error}"))
        })
    }
}

/// Conjoin an unbounded JQL query with a 90-day recency constraint.
///
/// Queries already mentioning an update, creation, or resolution timestamp
/// are returned unchanged.
pub fn ensure_bounded_jql(jql: &str) -> String {
    let lowered = jql.to_lowercase();
    if RECENCY_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword))
    {
        return jql.to_string();
    }
    format!("({jql}) AND updated >= -90d")
}

fn issues_array(body: &Value) -> Vec<Value> {
    body["issues"].as_array().cloned().unwrap_or_default()
}

fn truncate(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_jql_wraps_unbounded_query() {
        assert_eq!(
            ensure_bounded_jql("project = ABC"),
            "(project = ABC) AND updated >= -90d"
        );
    }

    #[test]
    fn bounded_jql_keeps_already_bounded_query() {
        assert_eq!(ensure_bounded_jql("updated >= -7d"), "updated >= -7d");
        assert_eq!(
            ensure_bounded_jql("project = ABC AND Created >= -30d"),
            "project = ABC AND Created >= -30d"
        );
        assert_eq!(
            ensure_bounded_jql("RESOLVED >= -14d ORDER BY key"),
            "RESOLVED >= -14d ORDER BY key"
        );
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("abcdef", 4), "abcd");
        assert_eq!(truncate("ab", 4), "ab");
        assert_eq!(truncate("héllo wörld", 3), "hél");
    }

    #[test]
    fn issues_array_defaults_to_empty() {
        assert!(issues_array(&serde_json::json!({})).is_empty());
        assert!(issues_array(&serde_json::json!({"issues": null})).is_empty());
        assert_eq!(
            issues_array(&serde_json::json!({"issues": [{"key": "A-1"}]})).len(),
            1
        );
    }
}
