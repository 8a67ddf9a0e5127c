//! Master credential resolution.

use secrecy::SecretString;

use notevault_core::MasterSecret;

use crate::config::NoteVaultConfig;
use crate::constants::MASTER_PASSWORD_ENV;
use crate::errors::CliError;

/// Resolve the master credential.
///
/// Order: `NOTEVAULT_MASTER_PASSWORD` (hashed now), then
/// `security.master_password_hash` from the config file.
pub fn resolve_master(config: &NoteVaultConfig) -> anyhow::Result<MasterSecret> {
    resolve_master_from(std::env::var(MASTER_PASSWORD_ENV).ok(), config)
}

fn resolve_master_from(
    env_value: Option<String>,
    config: &NoteVaultConfig,
) -> anyhow::Result<MasterSecret> {
    if let Some(value) = env_value.filter(|v| !v.is_empty()) {
        tracing::debug!("master credential taken from environment");
        return MasterSecret::from_password(&SecretString::from(value))
            .map_err(|e| CliError::config(e.to_string()).into());
    }

    if let Some(phc) = config.security.master_password_hash.as_deref() {
        tracing::debug!("master credential taken from config file");
        return MasterSecret::from_phc(phc).map_err(|e| {
            CliError::config_with_hint(
                e.to_string(),
                "Regenerate it with `notevault hash-master --write`.",
            )
            .into()
        });
    }

    Err(CliError::config_with_hint(
        "No master password configured",
        format!(
            "Set {} or run `notevault hash-master --write`.",
            MASTER_PASSWORD_ENV
        ),
    )
    .into())
}
