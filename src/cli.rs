//! CLI command definitions.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;

use crate::config_loader::load_configuration;
use crate::doctor::run_doctor;
use crate::error::ExtractError;
use crate::extract::run_extract;

/// Jiradash CLI arguments.
#[derive(Debug, Parser)]
#[command(name = "jdx", version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract issues and saved filters into the dashboard JSON documents.
    Extract {
        /// Output directory override.
        #[arg(long = "data-dir")]
        data_dir: Option<PathBuf>,
        /// JQL override for the main extraction.
        #[arg(long)]
        jql: Option<String>,
        /// Result cap override for the main extraction.
        #[arg(long = "max-results")]
        max_results: Option<usize>,
    },
    /// Validate configuration without contacting JIRA.
    Doctor,
}

fn is_help_request(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::DisplayHelp
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            | ErrorKind::DisplayVersion
    )
}

/// Output produced by a CLI command.
#[derive(Debug, Default)]
pub struct CommandOutput {
    pub stdout: String,
}

/// Run the CLI with explicit arguments.
///
/// # Arguments
///
/// * `args` - Command line arguments.
/// * `cwd` - Working directory for the command.
///
/// # Errors
///
/// Returns `ExtractError` if execution fails.
pub fn run_from_args<I, T>(args: I, cwd: &Path) -> Result<(), ExtractError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let output = run_from_args_with_output(args, cwd)?;
    if !output.stdout.is_empty() {
        println!("{}", output.stdout);
    }
    Ok(())
}

/// Run the CLI with explicit arguments and capture stdout output.
///
/// # Arguments
///
/// * `args` - Command line arguments.
/// * `cwd` - Working directory for the command.
///
/// # Errors
///
/// Returns `ExtractError` if execution fails.
pub fn run_from_args_with_output<I, T>(args: I, cwd: &Path) -> Result<CommandOutput, ExtractError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(parsed) => parsed,
        Err(error) => {
            let rendered = error.render().to_string();
            if is_help_request(error.kind()) {
                return Ok(CommandOutput { stdout: rendered });
            }
            return Err(ExtractError::Configuration(rendered));
        }
    };
    let stdout = execute_command(cli.command, cwd)?;

    Ok(CommandOutput {
        stdout: stdout.unwrap_or_default(),
    })
}

fn execute_command(command: Commands, root: &Path) -> Result<Option<String>, ExtractError> {
    match command {
        Commands::Extract {
            data_dir,
            jql,
            max_results,
        } => {
            let mut configuration = load_configuration(root)?;
            if let Some(dir) = data_dir {
                configuration.data_dir = root.join(dir);
            }
            let result = run_extract(&configuration, jql.as_deref(), max_results)?;
            let summary = format!(
                "extracted {} issues and {} filters",
                result.issue_count, result.filter_count
            );
            Ok(Some(colorize_summary(summary)))
        }
        Commands::Doctor => {
            let result = run_doctor(root)?;
            Ok(Some(format!("ok {}", result.configuration.url)))
        }
    }
}

/// Run the CLI using process arguments and current directory.
///
/// # Errors
///
/// Returns `ExtractError` if execution fails.
pub fn run_from_env() -> Result<(), ExtractError> {
    run_from_args(std::env::args_os(), Path::new("."))
}

fn colorize_summary(summary: String) -> String {
    if should_use_color() {
        summary.green().to_string()
    } else {
        summary
    }
}

fn should_use_color() -> bool {
    use std::io::IsTerminal;
    std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
}
