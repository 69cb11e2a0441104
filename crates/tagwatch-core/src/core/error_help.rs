//! User-facing error messages with a hint on what to try next

use crate::core::error::TagwatchError;

/// Render an error for the terminal, appending a suggestion when one applies
pub fn format_error_with_help(error: &TagwatchError) -> String {
    match suggestion(error) {
        Some(help) => format!("Error: {}\n\n  help: {}", error, help),
        None => format!("Error: {}", error),
    }
}

fn suggestion(error: &TagwatchError) -> Option<&'static str> {
    match error {
        TagwatchError::InvalidRepo(_) => {
            Some("pass the repository as owner/name, e.g. rust-lang/cargo")
        }
        TagwatchError::GitHub(msg) if msg.contains("rate limit") => {
            Some("set GITHUB_TOKEN or github.token in the config file to raise the limit")
        }
        TagwatchError::GitHub(msg) if msg.contains("401") || msg.contains("Bad credentials") => {
            Some("check the token in GITHUB_TOKEN or github.token")
        }
        TagwatchError::Http(_) => Some("check your network connection and github.api_url"),
        TagwatchError::Config(_) | TagwatchError::Yaml(_) => {
            Some("fix or delete the config file; defaults are written on the next run")
        }
        TagwatchError::Cache(_) => Some("run `tagwatch cache clear` to reset the cache"),
        _ => None,
    }
}
