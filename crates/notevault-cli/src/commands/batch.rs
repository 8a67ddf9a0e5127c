//! JSON-lines batch mode.
//!
//! Each stdin line is one request; each produces exactly one response line
//! on stdout. All requests in a run share one vault, so a batch behaves
//! like a single session.
//!
//! ```text
//! {"op":"store","text":"hello","passkey":"pw1","confirm_passkey":"pw1"}
//! {"op":"retrieve","id":"<uuid>","passkey":"pw1"}
//! {"op":"reauthorize","master_password":"..."}
//! {"op":"status"}
//! ```

use std::io::{self, BufRead, Write};

use serde::Deserialize;
use serde_json::{json, Value};
use zeroize::Zeroizing;

use notevault_core::error::ceil_secs;
use notevault_core::{RecordStore, VaultError, VaultService};

use crate::app::AppContext;
use crate::ui::format_datetime;

#[derive(Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum Request {
    Store {
        text: Zeroizing<String>,
        passkey: Zeroizing<String>,
        confirm_passkey: Zeroizing<String>,
    },
    Retrieve {
        id: String,
        passkey: Zeroizing<String>,
    },
    Reauthorize {
        master_password: Zeroizing<String>,
    },
    Status,
}

pub fn handle_batch(ctx: &AppContext) -> anyhow::Result<()> {
    let vault = ctx.build_vault()?;
    let mut stdin = io::stdin().lock();
    let mut stdout = io::stdout().lock();

    loop {
        let mut line = Zeroizing::new(Vec::new());
        if stdin.read_until(b'\n', &mut line)? == 0 {
            break;
        }
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        let response = handle_line(&vault, &line);
        writeln!(stdout, "{}", response)?;
        stdout.flush()?;
    }

    Ok(())
}

/// Handle one raw request line and build its response.
///
/// Lines that are not valid UTF-8 or not a known request get a
/// `bad_request` response. The message never quotes the input.
pub fn handle_line<S: RecordStore>(vault: &VaultService<S>, line: &[u8]) -> Value {
    let request: Request = match serde_json::from_slice(line) {
        Ok(request) => request,
        Err(e) => {
            tracing::debug!(
                category = ?e.classify(),
                column = e.column(),
                "malformed batch request"
            );
            return json!({
                "ok": false,
                "error": "bad_request",
                "message": "Malformed request",
                "column": e.column(),
            });
        }
    };

    let result = match request {
        Request::Store {
            text,
            passkey,
            confirm_passkey,
        } => vault
            .store(&text, &passkey, &confirm_passkey)
            .map(|id| json!({ "ok": true, "id": id })),
        Request::Retrieve { id, passkey } => vault
            .retrieve(&id, &passkey)
            .map(|text| json!({ "ok": true, "text": text })),
        Request::Reauthorize { master_password } => vault
            .reauthorize(&master_password)
            .map(|()| json!({ "ok": true })),
        Request::Status => vault.status().map(|status| {
            json!({
                "ok": true,
                "record_count": status.record_count,
                "attempts_remaining": status.attempts_remaining,
                "is_locked": status.is_locked,
                "cooldown_remaining_secs": status.cooldown_remaining_secs(),
                "failed_attempts": status.failed_attempts,
                "last_failure_at": status
                    .last_failure_at
                    .map(|at| format_datetime(&at, false)),
            })
        }),
    };

    result.unwrap_or_else(|err| error_response(&err))
}

/// Machine-readable code for a vault error.
///
/// Unknown ids and wrong passkeys share a code so responses do not reveal
/// which ids exist.
pub fn error_code(err: &VaultError) -> &'static str {
    match err {
        VaultError::Validation(_) => "validation",
        VaultError::NotFound { .. } | VaultError::PasskeyMismatch { .. } => "invalid_credentials",
        VaultError::Locked { .. } => "locked",
        VaultError::TooSoon { .. } => "too_soon",
        VaultError::Auth => "auth_failed",
        VaultError::DuplicateId(_)
        | VaultError::Decryption
        | VaultError::Crypto(_)
        | VaultError::Storage(_)
        | VaultError::Config(_) => "internal",
    }
}

fn error_response(err: &VaultError) -> Value {
    let mut body = json!({
        "ok": false,
        "error": error_code(err),
        "message": err.to_string(),
    });
    if let Some(remaining) = err.attempts_remaining() {
        body["attempts_remaining"] = json!(remaining);
    }
    if let Some(cooldown) = err.cooldown_remaining() {
        body["cooldown_remaining_secs"] = json!(ceil_secs(cooldown));
    }
    body
}
