//! Jiradash data models.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Flat issue record consumed by the dashboard.
///
/// Derived purely from a raw JIRA issue; every optional upstream field is
/// replaced by a documented default during normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedIssue {
    pub key: String,
    pub summary: String,
    pub status: String,
    pub issuetype: String,
    pub priority: String,
    pub assignee: String,
    pub project: String,
    pub created: String,
    pub updated: String,
    pub url: String,
}

/// Frequency tables backing the dashboard charts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardAggregates {
    pub by_status: BTreeMap<String, u64>,
    pub by_type: BTreeMap<String, u64>,
    pub by_assignee: BTreeMap<String, u64>,
    pub by_priority: BTreeMap<String, u64>,
    pub total: u64,
}

/// Issues extracted from one saved filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterResult {
    pub issues: Vec<NormalizedIssue>,
    pub count: usize,
}

/// Document written to issues.json.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuesDocument {
    pub issues: Vec<NormalizedIssue>,
    pub aggregates: DashboardAggregates,
    pub last_updated: String,
}

/// Document written to filters.json.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiltersDocument {
    pub filters: BTreeMap<String, FilterResult>,
}

/// Settings file schema (.jiradash.yml).
///
/// Credentials are never read from this file; they come from the
/// environment only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfiguration {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub filter_ids: Vec<String>,
    #[serde(default)]
    pub default_jql: Option<String>,
    #[serde(default)]
    pub api_version: Option<String>,
    #[serde(default)]
    pub data_dir: Option<String>,
}
