//! Application context for the NoteVault CLI.
//!
//! Provides a unified context that combines CLI arguments with
//! lazily-loaded configuration.

use std::path::PathBuf;

use once_cell::unsync::OnceCell;

use notevault_core::VaultService;

use crate::cli::Cli;
use crate::config::{default_config_path, read_config_or_default, NoteVaultConfig};
use crate::ui::UiContext;

use super::master::resolve_master;

/// Application context that bundles CLI args with configuration.
pub struct AppContext<'a> {
    cli: &'a Cli,
    config_path: OnceCell<PathBuf>,
    config: OnceCell<NoteVaultConfig>,
}

impl<'a> AppContext<'a> {
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            config_path: OnceCell::new(),
            config: OnceCell::new(),
        }
    }

    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    /// Config path from `--config` / `NOTEVAULT_CONFIG`, else the XDG default.
    pub fn config_path(&self) -> anyhow::Result<&PathBuf> {
        self.config_path.get_or_try_init(|| match &self.cli.config {
            Some(path) if !path.trim().is_empty() => Ok(PathBuf::from(path)),
            _ => default_config_path(),
        })
    }

    /// Get the configuration, loading it lazily if needed.
    pub fn config(&self) -> anyhow::Result<&NoteVaultConfig> {
        self.config
            .get_or_try_init(|| read_config_or_default(self.config_path()?))
    }

    pub fn ui_context(&self) -> UiContext {
        UiContext::from_env(self.cli.format.as_deref(), self.cli.no_color, self.cli.ascii)
    }

    /// Build a fresh vault from the resolved configuration.
    pub fn build_vault(&self) -> anyhow::Result<VaultService> {
        let config = self.config()?;
        let master = resolve_master(config)?;
        let policy = config.policy()?;
        let kdf_params = config.kdf_params()?;

        tracing::debug!(
            max_attempts = policy.max_attempts(),
            cooldown_secs = policy.cooldown().as_secs(),
            memory_kib = kdf_params.memory_kib,
            "vault configured"
        );

        Ok(VaultService::builder(master)
            .policy(policy)
            .kdf_params(kdf_params)
            .build())
    }
}
