//! Configuration module
//!
//! Handles loading and saving the sshcfg settings file.

pub mod settings;

pub use settings::{Settings, SshSettings};
