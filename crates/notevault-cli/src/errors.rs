//! CLI error types for structured error handling.
//!
//! This module provides typed errors that map to specific exit codes,
//! enabling consistent error handling across the CLI.

use std::fmt;

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// Missing or invalid configuration
    Config {
        message: String,
        hint: Option<String>,
    },

    /// Invalid user input
    InvalidInput {
        message: String,
        hint: Option<String>,
    },
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config { message, .. } | CliError::InvalidInput { message, .. } => {
                write!(f, "{}", message)
            }
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    pub fn config(message: impl Into<String>) -> Self {
        CliError::Config {
            message: message.into(),
            hint: None,
        }
    }

    pub fn config_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::Config {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::InvalidInput {
            message: message.into(),
            hint: None,
        }
    }

    pub fn invalid_input_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::InvalidInput {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    pub fn hint(&self) -> Option<&str> {
        match self {
            CliError::Config { hint, .. } | CliError::InvalidInput { hint, .. } => hint.as_deref(),
        }
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        use super::constants::exit_codes;
        match self {
            CliError::Config { .. } => exit_codes::CONFIG,
            CliError::InvalidInput { .. } => exit_codes::INVALID_INPUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::exit_codes;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::config("x").exit_code(), exit_codes::CONFIG);
        assert_eq!(
            CliError::invalid_input("x").exit_code(),
            exit_codes::INVALID_INPUT
        );
    }

    #[test]
    fn test_display_omits_hint() {
        let err = CliError::config_with_hint("No master password", "Set it");
        assert_eq!(err.to_string(), "No master password");
        assert_eq!(err.hint(), Some("Set it"));
    }

    #[test]
    fn test_downcast_through_anyhow() {
        let err: anyhow::Error = CliError::invalid_input("bad").into();
        let cli_err = err.downcast_ref::<CliError>().unwrap();
        assert_eq!(cli_err.exit_code(), exit_codes::INVALID_INPUT);
    }
}
