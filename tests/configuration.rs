use std::path::PathBuf;

use tempfile::tempdir;

use jiradash::config::{DEFAULT_API_VERSION, DEFAULT_JQL};
use jiradash::config_loader::{load_configuration, CONFIGURATION_FILENAME};

const JIRA_VARIABLES: [&str; 6] = [
    "JIRA_URL",
    "JIRA_EMAIL",
    "JIRA_API_TOKEN",
    "JIRA_FILTER_IDS",
    "JIRA_JQL_DEFAULT",
    "JIRA_API_VERSION",
];

fn clear_jira_environment() {
    for name in JIRA_VARIABLES {
        std::env::remove_var(name);
    }
}

/// Environment-variable handling lives in a single test because the process
/// environment is shared across test threads.
#[test]
fn configuration_sources_compose() {
    clear_jira_environment();
    let root = tempdir().expect("temp dir");

    // Missing everything: validation names every absent parameter.
    let error = load_configuration(root.path()).expect_err("empty configuration");
    assert!(error.to_string().contains("JIRA_URL is not set"));
    assert!(error.to_string().contains("JIRA_EMAIL is not set"));
    assert!(error.to_string().contains("JIRA_API_TOKEN is not set"));

    // Defaults apply when neither file nor environment provides a value.
    let defaults = jiradash::config_loader::resolve_configuration(
        root.path(),
        jiradash::config_loader::load_file_configuration(
            &root.path().join(CONFIGURATION_FILENAME),
        )
        .expect("missing file is fine"),
    );
    assert_eq!(defaults.api_version, DEFAULT_API_VERSION);
    assert_eq!(defaults.default_jql, DEFAULT_JQL);
    assert_eq!(defaults.data_dir, root.path().join("data"));
    assert!(defaults.filter_ids.is_empty());

    // Settings file provides non-secret values; credentials come from env.
    std::fs::write(
        root.path().join(CONFIGURATION_FILENAME),
        concat!(
            "url: https://acme.atlassian.net/jira/software\n",
            "filter_ids:\n",
            "  - \"10001\"\n",
            "  - \"10002\"\n",
            "api_version: \"2\"\n",
            "data_dir: out\n",
        ),
    )
    .expect("write settings file");
    std::env::set_var("JIRA_EMAIL", "bot@acme.test");
    std::env::set_var("JIRA_API_TOKEN", "file-test-token");

    let configuration = load_configuration(root.path()).expect("file-backed configuration");
    assert_eq!(configuration.url, "https://acme.atlassian.net");
    assert_eq!(configuration.email, "bot@acme.test");
    assert_eq!(configuration.api_token, "file-test-token");
    assert_eq!(
        configuration.filter_ids,
        vec!["10001".to_string(), "10002".to_string()]
    );
    assert_eq!(configuration.default_jql, DEFAULT_JQL);
    assert_eq!(configuration.api_version, "2");
    assert_eq!(configuration.data_dir, root.path().join("out"));

    // Environment overrides win over the settings file.
    std::env::set_var("JIRA_URL", "other.atlassian.net/");
    std::env::set_var("JIRA_FILTER_IDS", "20001, 20002 ,");
    std::env::set_var("JIRA_JQL_DEFAULT", "updated >= -7d");
    std::env::set_var("JIRA_API_VERSION", "3");

    let configuration = load_configuration(root.path()).expect("env-backed configuration");
    assert_eq!(configuration.url, "https://other.atlassian.net");
    assert_eq!(
        configuration.filter_ids,
        vec!["20001".to_string(), "20002".to_string()]
    );
    assert_eq!(configuration.default_jql, "updated >= -7d");
    assert_eq!(configuration.api_version, "3");

    // Removing a credential fails validation again.
    std::env::remove_var("JIRA_EMAIL");
    let error = load_configuration(root.path()).expect_err("missing email");
    assert!(error.to_string().contains("JIRA_EMAIL is not set"));

    clear_jira_environment();
}

#[test]
fn invalid_settings_file_is_a_configuration_error() {
    let root = tempdir().expect("temp dir");
    std::fs::write(
        root.path().join(CONFIGURATION_FILENAME),
        "url: https://acme.atlassian.net\nfilters: [1]\n",
    )
    .expect("write settings file");

    let error = load_configuration(root.path()).expect_err("unknown field");
    assert_eq!(error.to_string(), "unknown configuration fields");
}

#[test]
fn data_dir_resolves_relative_to_root() {
    let root = tempdir().expect("temp dir");
    std::fs::write(
        root.path().join(CONFIGURATION_FILENAME),
        "data_dir: exports/jira\n",
    )
    .expect("write settings file");

    let file = jiradash::config_loader::load_file_configuration(
        &root.path().join(CONFIGURATION_FILENAME),
    )
    .expect("settings file");
    let configuration = jiradash::config_loader::resolve_configuration(root.path(), file);
    assert_eq!(
        configuration.data_dir,
        root.path().join(PathBuf::from("exports/jira"))
    );
}
