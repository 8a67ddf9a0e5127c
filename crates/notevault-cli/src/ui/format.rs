//! String formatting utilities for UI rendering.

use chrono::{DateTime, Utc};

/// Truncate a string to max length, adding ellipsis if needed.
pub fn truncate(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        return s.to_string();
    }
    if max_len <= 3 {
        return s.chars().take(max_len).collect();
    }
    let truncated: String = s.chars().take(max_len - 3).collect();
    format!("{}...", truncated)
}

/// Format a datetime for display.
pub fn format_datetime(dt: &DateTime<Utc>, pretty: bool) -> String {
    if pretty {
        dt.format("%Y-%m-%d %H:%M:%S UTC").to_string()
    } else {
        dt.to_rfc3339()
    }
}

/// Format a count of seconds as a wait message fragment ("1 second", "5 seconds").
pub fn format_seconds(secs: u64) -> String {
    if secs == 1 {
        "1 second".to_string()
    } else {
        format!("{} seconds", secs)
    }
}

/// "1 attempt" / "2 attempts".
pub fn format_attempts(count: u32) -> String {
    if count == 1 {
        "1 attempt".to_string()
    } else {
        format!("{} attempts", count)
    }
}
