//! Application-level utilities for the NoteVault CLI.
//!
//! This module provides:
//! - Config path resolution and lazy loading
//! - Master credential resolution
//! - Vault construction from configuration

mod context;
mod master;

pub use context::AppContext;
