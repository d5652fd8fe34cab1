//! SSH client config engine
//!
//! Reads an OpenSSH `config` file into sections, edits them, and writes the
//! file back with a backup of the previous contents.

pub mod error;
pub mod mutate;
pub mod parser;
pub mod render;
pub mod section;
pub mod store;

pub use error::SshConfigError;
pub use mutate::{Selection, SshConfig};
pub use parser::{parse, parse_with_warnings, ParseWarning};
pub use render::render;
pub use section::{sections_to_yaml, Field, Section, SectionUpdate};
pub use store::{Confirm, ConfigStore, StdinConfirm};
