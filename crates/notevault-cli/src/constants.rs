//! Constants used throughout the CLI.

/// Environment variable holding the config file path.
pub const CONFIG_ENV: &str = "NOTEVAULT_CONFIG";

/// Environment variable holding the plaintext master password.
pub const MASTER_PASSWORD_ENV: &str = "NOTEVAULT_MASTER_PASSWORD";

/// Environment variable holding the log filter (EnvFilter syntax).
pub const LOG_ENV: &str = "NOTEVAULT_LOG";

/// Log filter used when `NOTEVAULT_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// Missing or invalid configuration (master credential, policy, KDF cost).
    pub const CONFIG: i32 = 3;

    /// Invalid user input or arguments.
    pub const INVALID_INPUT: i32 = 4;
}
