//! Interactive vault session.
//!
//! The vault lives only as long as the session. When the vault locks the
//! session routes straight to reauthorization and keeps the menu limited
//! to pages that do not read records until it is unlocked.

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Password, Select};
use zeroize::Zeroizing;

use notevault_core::{VaultError, VaultService};

use crate::app::AppContext;
use crate::errors::CliError;
use crate::ui::{
    badge, divider, format_attempts, format_datetime, format_seconds, header, hint, kv,
    property_table, truncate, with_spinner, Badge, UiContext,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Page {
    Home,
    Store,
    Retrieve,
    Reauthorize,
    Status,
    Quit,
}

impl Page {
    fn label(&self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Store => "Store a note",
            Page::Retrieve => "Retrieve a note",
            Page::Reauthorize => "Reauthorize",
            Page::Status => "Status",
            Page::Quit => "Quit",
        }
    }
}

const OPEN_MENU: &[Page] = &[
    Page::Home,
    Page::Store,
    Page::Retrieve,
    Page::Status,
    Page::Reauthorize,
    Page::Quit,
];

const LOCKED_MENU: &[Page] = &[Page::Reauthorize, Page::Store, Page::Status, Page::Quit];

fn menu_for(locked: bool) -> &'static [Page] {
    if locked {
        LOCKED_MENU
    } else {
        OPEN_MENU
    }
}

struct Session<'a> {
    vault: VaultService,
    ui: UiContext,
    theme: ColorfulTheme,
    ctx: &'a AppContext<'a>,
}

pub fn handle_session(ctx: &AppContext) -> anyhow::Result<()> {
    let ui = ctx.ui_context();
    if !ui.is_interactive() {
        return Err(CliError::invalid_input_with_hint(
            "An interactive session needs a terminal",
            "Use `notevault batch` to drive the vault from a script.",
        )
        .into());
    }

    let session = Session {
        vault: ctx.build_vault()?,
        ui,
        theme: ColorfulTheme::default(),
        ctx,
    };
    session.run()
}

impl Session<'_> {
    fn run(&self) -> anyhow::Result<()> {
        if !self.ctx.quiet() {
            println!("{}", header(&self.ui, "session", Some("in-memory")));
            println!(
                "{}",
                hint(
                    &self.ui,
                    "Notes are kept in memory only and are gone when the session ends."
                )
            );
        }
        self.show_home()?;

        let mut next: Option<Page> = None;
        loop {
            let page = match next.take() {
                Some(page) => page,
                None => self.choose_page()?,
            };
            println!("{}", divider(&self.ui));

            match page {
                Page::Home => self.show_home()?,
                Page::Store => self.store_page()?,
                Page::Retrieve => {
                    if self.retrieve_page()? {
                        println!(
                            "{}",
                            badge(
                                &self.ui,
                                Badge::Warn,
                                "Redirecting to reauthorization..."
                            )
                        );
                        next = Some(Page::Reauthorize);
                    }
                }
                Page::Reauthorize => self.reauthorize_page()?,
                Page::Status => self.status_page()?,
                Page::Quit => break,
            }
        }

        tracing::debug!("session ended");
        Ok(())
    }

    fn choose_page(&self) -> anyhow::Result<Page> {
        let locked = self.vault.status()?.is_locked;
        if locked {
            println!(
                "{}",
                badge(
                    &self.ui,
                    Badge::Warn,
                    "Too many failed attempts! Please reauthorize."
                )
            );
        }

        let pages = menu_for(locked);
        let labels: Vec<&str> = pages.iter().map(Page::label).collect();
        let choice = Select::with_theme(&self.theme)
            .with_prompt("Navigate")
            .default(0)
            .items(&labels)
            .interact()?;
        Ok(pages.get(choice).copied().unwrap_or(Page::Quit))
    }

    fn show_home(&self) -> anyhow::Result<()> {
        let status = self.vault.status()?;
        println!(
            "{}",
            badge(
                &self.ui,
                Badge::Info,
                &format!(
                    "Currently storing {} secure note{}.",
                    status.record_count,
                    if status.record_count == 1 { "" } else { "s" }
                )
            )
        );
        Ok(())
    }

    fn store_page(&self) -> anyhow::Result<()> {
        let text: Zeroizing<String> = Zeroizing::new(
            Input::<String>::with_theme(&self.theme)
                .with_prompt("Secret note")
                .allow_empty(true)
                .interact_text()?,
        );
        let passkey = self.secret("Choose a passkey")?;
        let confirm = self.secret("Confirm passkey")?;

        let result = with_spinner(&self.ui, "Encrypting", || {
            self.vault.store(&text, &passkey, &confirm)
        });
        match result {
            Ok(id) => {
                println!(
                    "{}",
                    badge(&self.ui, Badge::Ok, "Your note has been safely stored.")
                );
                println!("{}", kv(&self.ui, "Id", &id.to_string()));
                println!(
                    "{}",
                    hint(
                        &self.ui,
                        "Keep this id safe; it is the only way to retrieve your note."
                    )
                );
                Ok(())
            }
            Err(VaultError::Validation(message)) => {
                println!("{}", badge(&self.ui, Badge::Err, &message));
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Returns `true` when this attempt locked the vault.
    fn retrieve_page(&self) -> anyhow::Result<bool> {
        let status = self.vault.status()?;
        if status.is_locked {
            println!(
                "{}",
                badge(&self.ui, Badge::Warn, "The vault is locked. Reauthorize first.")
            );
            return Ok(false);
        }
        println!(
            "{}",
            badge(
                &self.ui,
                Badge::Info,
                &format!(
                    "{} remaining",
                    format_attempts(status.attempts_remaining)
                )
            )
        );

        let id: String = Input::<String>::with_theme(&self.theme)
            .with_prompt("Note id")
            .allow_empty(true)
            .interact_text()?;
        let passkey = self.secret("Passkey")?;

        let result = with_spinner(&self.ui, "Decrypting", || {
            self.vault.retrieve(&id, &passkey)
        });
        match result {
            Ok(text) => {
                let text = Zeroizing::new(text);
                println!("{}", badge(&self.ui, Badge::Ok, "Decryption successful!"));
                println!("{}", text.as_str());
                Ok(false)
            }
            Err(err) if err.is_failed_attempt() => {
                println!(
                    "{}",
                    badge(
                        &self.ui,
                        Badge::Err,
                        &format!(
                            "Incorrect id or passkey. {} remaining.",
                            format_attempts(err.attempts_remaining().unwrap_or(0))
                        )
                    )
                );
                Ok(err.attempts_remaining() == Some(0))
            }
            Err(VaultError::Validation(message)) => {
                println!("{}", badge(&self.ui, Badge::Err, &message));
                Ok(false)
            }
            Err(VaultError::Locked { .. }) => Ok(true),
            Err(err) => Err(err.into()),
        }
    }

    fn reauthorize_page(&self) -> anyhow::Result<()> {
        let status = self.vault.status()?;
        let wait = status.cooldown_remaining_secs();
        if wait > 0 {
            println!("{}", wait_message(&self.ui, wait));
            return Ok(());
        }

        let password = self.secret("Master password")?;
        match self.vault.reauthorize(&password) {
            Ok(()) => {
                println!("{}", badge(&self.ui, Badge::Ok, "Reauthorized successfully."));
                self.show_home()
            }
            Err(VaultError::Auth) => {
                println!("{}", badge(&self.ui, Badge::Err, "Incorrect password."));
                Ok(())
            }
            Err(VaultError::TooSoon { .. }) => {
                let wait = self.vault.status()?.cooldown_remaining_secs();
                println!("{}", wait_message(&self.ui, wait));
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    fn status_page(&self) -> anyhow::Result<()> {
        let status = self.vault.status()?;
        let pretty = self.ui.mode.is_pretty();
        let rows = vec![
            ("Records", status.record_count.to_string()),
            ("Locked", if status.is_locked { "yes" } else { "no" }.to_string()),
            (
                "Attempts remaining",
                format!("{} of {}", status.attempts_remaining, status.max_attempts),
            ),
            ("Failed attempts", status.failed_attempts.to_string()),
            (
                "Cooldown",
                format_seconds(status.cooldown_remaining_secs()),
            ),
            (
                "Last failure",
                status
                    .last_failure_at
                    .map(|at| format_datetime(&at, pretty))
                    .unwrap_or_else(|| "-".to_string()),
            ),
            (
                "KDF",
                truncate(
                    &format!(
                        "argon2id m={}KiB t={} p={}",
                        self.vault.kdf_params().memory_kib,
                        self.vault.kdf_params().iterations,
                        self.vault.kdf_params().parallelism
                    ),
                    40,
                ),
            ),
        ];
        println!("{}", property_table(&self.ui, &rows));
        Ok(())
    }

    fn secret(&self, prompt: &str) -> anyhow::Result<Zeroizing<String>> {
        Password::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()
            .map(Zeroizing::new)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", prompt.to_lowercase(), e))
    }
}

fn wait_message(ui: &UiContext, secs: u64) -> String {
    badge(
        ui,
        Badge::Warn,
        &format!("Please wait {} before trying again.", format_seconds(secs)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::mode::OutputMode;

    #[test]
    fn test_locked_menu_hides_retrieve() {
        assert!(!menu_for(true).contains(&Page::Retrieve));
        assert_eq!(menu_for(true)[0], Page::Reauthorize);
    }

    #[test]
    fn test_open_menu_starts_at_home() {
        assert_eq!(menu_for(false)[0], Page::Home);
        assert!(menu_for(false).contains(&Page::Retrieve));
        assert_eq!(menu_for(false).last(), Some(&Page::Quit));
    }

    #[test]
    fn test_wait_message() {
        let ui = UiContext {
            is_tty: false,
            color: false,
            unicode: false,
            width: 80,
            mode: OutputMode::Plain,
        };
        assert_eq!(
            wait_message(&ui, 7),
            "[WARN] Please wait 7 seconds before trying again."
        );
    }
}
