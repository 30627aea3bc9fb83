//! Error types for Jiradash.

use std::fmt::{self, Display, Formatter};

/// Errors returned by Jiradash operations.
#[derive(Debug)]
pub enum ExtractError {
    /// Configuration loading or validation failed.
    Configuration(String),
    /// The JIRA API returned a non-success status or was unreachable.
    Http(String),
    /// The JIRA API returned a body that could not be parsed.
    MalformedResponse(String),
    /// An unexpected IO error occurred.
    Io(String),
}

impl Display for ExtractError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ExtractError::Configuration(message) => write!(formatter, "{message}"),
            ExtractError::Http(message) => write!(formatter, "{message}"),
            ExtractError::MalformedResponse(message) => write!(formatter, "{message}"),
            ExtractError::Io(message) => write!(formatter, "{message}"),
        }
    }
}

impl std::error::Error for ExtractError {}
