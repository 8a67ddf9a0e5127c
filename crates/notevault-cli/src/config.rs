use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use notevault_core::guard::{DEFAULT_COOLDOWN, DEFAULT_MAX_ATTEMPTS};
use notevault_core::{KdfParams, LockoutPolicy};

use crate::errors::CliError;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct NoteVaultConfig {
    #[serde(default)]
    pub security: SecuritySection,
    #[serde(default)]
    pub kdf: KdfParams,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SecuritySection {
    pub max_attempts: u32,
    pub cooldown_seconds: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub master_password_hash: Option<String>,
}

impl Default for SecuritySection {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            cooldown_seconds: DEFAULT_COOLDOWN.as_secs(),
            master_password_hash: None,
        }
    }
}

impl NoteVaultConfig {
    pub fn policy(&self) -> anyhow::Result<LockoutPolicy> {
        LockoutPolicy::new(
            self.security.max_attempts,
            Duration::from_secs(self.security.cooldown_seconds),
        )
        .map_err(|e| CliError::config(e.to_string()).into())
    }

    pub fn kdf_params(&self) -> anyhow::Result<KdfParams> {
        KdfParams::new(self.kdf.memory_kib, self.kdf.iterations, self.kdf.parallelism)
            .map_err(|e| CliError::config(e.to_string()).into())
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn read_config(path: &Path) -> anyhow::Result<NoteVaultConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents).map_err(|e| {
        CliError::config(format!("Failed to parse config {}: {}", path.display(), e)).into()
    })
}

/// Read the config at `path`, or defaults if the file does not exist.
pub fn read_config_or_default(path: &Path) -> anyhow::Result<NoteVaultConfig> {
    if path.exists() {
        read_config(path)
    } else {
        Ok(NoteVaultConfig::default())
    }
}

pub fn write_config(path: &Path, config: &NoteVaultConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    std::fs::write(path, contents)
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    set_file_permissions(path)?;
    Ok(())
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("notevault"));
        }
    }
    Ok(home_dir()?.join(".config").join("notevault"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}

fn set_file_permissions(path: &Path) -> anyhow::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = std::fs::metadata(path)?.permissions();
        perms.set_mode(0o600);
        std::fs::set_permissions(path, perms)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time")
            .as_nanos();
        std::env::temp_dir()
            .join(format!("nv_cfg_{}_{}_{}", name, std::process::id(), nanos))
            .join("config.toml")
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: NoteVaultConfig = toml::from_str("").unwrap();
        assert_eq!(config.security.max_attempts, 3);
        assert_eq!(config.security.cooldown_seconds, 10);
        assert!(config.security.master_password_hash.is_none());
        assert_eq!(config.kdf, KdfParams::default());
    }

    #[test]
    fn test_partial_sections() {
        let config: NoteVaultConfig =
            toml::from_str("[security]\ncooldown_seconds = 30\n\n[kdf]\nmemory_kib = 2048\n")
                .unwrap();
        assert_eq!(config.security.max_attempts, 3);
        assert_eq!(config.security.cooldown_seconds, 30);
        assert_eq!(config.kdf.memory_kib, 2048);
        assert_eq!(config.kdf.iterations, 3);

        let policy = config.policy().unwrap();
        assert_eq!(policy.cooldown(), Duration::from_secs(30));
    }

    #[test]
    fn test_invalid_policy_is_config_error() {
        let config: NoteVaultConfig = toml::from_str("[security]\nmax_attempts = 0\n").unwrap();
        let err = config.policy().unwrap_err();
        assert!(err.downcast_ref::<CliError>().is_some());
    }

    #[test]
    fn test_invalid_kdf_is_config_error() {
        let config: NoteVaultConfig =
            toml::from_str("[kdf]\nmemory_kib = 1\nparallelism = 4\n").unwrap();
        assert!(config.kdf_params().is_err());
    }

    #[test]
    fn test_write_then_read() {
        let path = temp_path("round_trip");
        let mut config = NoteVaultConfig::default();
        config.security.master_password_hash = Some("$argon2id$v=19$stub".to_string());
        write_config(&path, &config).unwrap();

        let loaded = read_config(&path).unwrap();
        assert_eq!(
            loaded.security.master_password_hash.as_deref(),
            Some("$argon2id$v=19$stub")
        );
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = temp_path("missing");
        let config = read_config_or_default(&path).unwrap();
        assert_eq!(config.security.max_attempts, 3);
    }
}
