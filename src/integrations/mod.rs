//! Integrations module
//!
//! Provides shell completion scripts.

pub mod shell;
