//! Application-level utilities for the Inkwell CLI.
//!
//! This module provides:
//! - Path and settings resolution
//! - Passphrase acquisition
//! - The per-invocation application context

mod context;
mod passphrase;
mod resolver;

// Re-export public API
pub use context::AppContext;
pub use passphrase::{read_new_passphrase, read_passphrase};
pub use resolver::resolve_config_path;
