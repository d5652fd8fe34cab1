//! sshcfg - edit your OpenSSH client config from the command line
//!
//! This library provides the SSH config engine behind the `sshcfg` binary:
//! parsing, editing, rendering, and backup-before-save persistence.

pub mod config;
pub mod integrations;
pub mod ssh_config;

// Re-export commonly used types
pub use config::Settings;
pub use ssh_config::{ConfigStore, Section, SectionUpdate, Selection, SshConfig, SshConfigError};
