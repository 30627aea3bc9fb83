//! Jiradash Rust library.

pub mod cli;
pub mod config;
pub mod config_loader;
pub mod doctor;
pub mod error;
pub mod extract;
pub mod jira_client;
pub mod models;
pub mod normalize;
