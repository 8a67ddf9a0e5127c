//! `notevault hash-master`: produce a master password hash for the config file.

use std::io::{self, BufRead, IsTerminal};

use dialoguer::Password;
use secrecy::SecretString;
use zeroize::Zeroizing;

use notevault_core::hash_master_password;

use crate::app::AppContext;
use crate::cli::HashMasterArgs;
use crate::config::{read_config_or_default, write_config};
use crate::errors::CliError;
use crate::ui::{receipt, with_spinner};

pub fn handle_hash_master(ctx: &AppContext, args: &HashMasterArgs) -> anyhow::Result<()> {
    let password = if args.stdin {
        read_password_line(io::stdin().lock())?
    } else {
        prompt_master_password()?
    };

    let ui = ctx.ui_context();
    let phc = with_spinner(&ui, "Hashing master password", || {
        hash_master_password(&SecretString::from(password.to_string()))
    })
    .map_err(|e| CliError::invalid_input(e.to_string()))?;

    if !args.write {
        println!("{}", phc);
        return Ok(());
    }

    let path = ctx.config_path()?;
    let mut config = read_config_or_default(path)?;
    config.security.master_password_hash = Some(phc);
    write_config(path, &config)?;
    tracing::info!(path = %path.display(), "master password hash written");

    if !ctx.quiet() {
        let path_display = path.display().to_string();
        println!(
            "{}",
            receipt(&ui, "Master password hash saved", &[("Config", path_display.as_str())])
        );
    }
    Ok(())
}

fn prompt_master_password() -> anyhow::Result<Zeroizing<String>> {
    if !io::stdin().is_terminal() {
        return Err(CliError::invalid_input_with_hint(
            "No TTY available to prompt for the master password",
            "Pipe it in with `notevault hash-master --stdin`.",
        )
        .into());
    }
    Password::new()
        .with_prompt("Master password")
        .with_confirmation("Confirm master password", "Passwords do not match")
        .interact()
        .map(Zeroizing::new)
        .map_err(|e| anyhow::anyhow!("Failed to read master password: {}", e))
}

/// Read the first line of `reader`, without its line ending.
fn read_password_line(mut reader: impl BufRead) -> anyhow::Result<Zeroizing<String>> {
    let mut line = Zeroizing::new(String::new());
    reader
        .read_line(&mut line)
        .map_err(|e| anyhow::anyhow!("Failed to read master password from stdin: {}", e))?;
    let trimmed = line.trim_end_matches(['\r', '\n']);
    if trimmed.is_empty() {
        return Err(CliError::invalid_input("Master password cannot be empty").into());
    }
    Ok(Zeroizing::new(trimmed.to_string()))
}
