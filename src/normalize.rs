//! Issue normalization and dashboard aggregation.

use serde_json::Value;

use crate::models::{DashboardAggregates, NormalizedIssue};

/// Map a raw JIRA issue to the flat dashboard schema.
///
/// Every optional field falls back to a documented default, so a sparse or
/// partially populated issue never fails to normalize.
///
/// # Arguments
/// * `raw` - Raw issue record from the search endpoint.
/// * `base_url` - Normalized JIRA base URL used to derive the browse link.
pub fn normalize_issue(raw: &Value, base_url: &str) -> NormalizedIssue {
    let key = raw["key"].as_str().unwrap_or("").to_string();
    let fields = &raw["fields"];

    NormalizedIssue {
        summary: fields["summary"].as_str().unwrap_or("").to_string(),
        status: fields["status"]["name"]
            .as_str()
            .unwrap_or("Unknown")
            .to_string(),
        issuetype: fields["issuetype"]["name"]
            .as_str()
            .unwrap_or("Unknown")
            .to_string(),
        priority: fields["priority"]["name"]
            .as_str()
            .unwrap_or("None")
            .to_string(),
        assignee: fields["assignee"]["displayName"]
            .as_str()
            .unwrap_or("Unassigned")
            .to_string(),
        project: fields["project"]["key"].as_str().unwrap_or("").to_string(),
        created: fields["created"].as_str().unwrap_or("").to_string(),
        updated: fields["updated"].as_str().unwrap_or("").to_string(),
        url: format!("{base_url}/browse/{key}"),
        key,
    }
}

/// Fold normalized issues into the dashboard frequency tables.
///
/// Each issue contributes exactly one increment to each of the four maps,
/// keyed by its already-defaulted field value, so every per-dimension count
/// sums to `total`.
pub fn aggregate_issues(issues: &[NormalizedIssue]) -> DashboardAggregates {
    let mut aggregates = DashboardAggregates::default();

    for issue in issues {
        *aggregates
            .by_status
            .entry(issue.status.clone())
            .or_default() += 1;
        *aggregates
            .by_type
            .entry(issue.issuetype.clone())
            .or_default() += 1;
        *aggregates
            .by_assignee
            .entry(issue.assignee.clone())
            .or_default() += 1;
        *aggregates
            .by_priority
            .entry(issue.priority.clone())
            .or_default() += 1;
    }

    aggregates.total = issues.len() as u64;
    aggregates
}
