//! UI primitives for the NoteVault CLI.
//!
//! This module provides:
//! - **Context**: Environment detection (TTY, width, color, unicode)
//! - **Mode**: Output mode resolution (plain, pretty)
//! - **Theme**: Badge tokens, color styles, spinner frames
//! - **Render**: Headers, badges, receipts, hints, tables
//! - **Progress**: Spinner around key derivation
//! - **Format**: String utilities (truncate, dates, plurals)

mod context;
pub mod format;
pub mod mode;
pub mod progress;
pub mod render;
pub mod theme;

pub use context::UiContext;
pub use theme::Badge;

pub use render::{
    badge, divider, header, hint, kv, print_error, property_table, receipt,
};

pub use progress::with_spinner;

pub use format::{format_attempts, format_datetime, format_seconds, truncate};
