//! SSH host sections
//!
//! Defines the record for one `Host` block and the closed set of field
//! updates that can be applied to it.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::error::{Result, SshConfigError};

/// One SSH destination alias
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    /// Alias used on the `Host` line
    #[serde(skip)]
    pub host: String,

    /// Network address or hostname
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_name: Option<String>,

    /// SSH username
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Path to the private key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity_file: Option<String>,

    /// SSH port, `None` means the client default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

impl Section {
    /// Create an empty section for an alias
    pub fn new(host: &str) -> Self {
        Self {
            host: host.to_string(),
            ..Self::default()
        }
    }

    /// Set the network address
    pub fn with_host_name(mut self, host_name: &str) -> Self {
        self.host_name = non_empty(host_name);
        self
    }

    /// Set the username
    pub fn with_user(mut self, user: &str) -> Self {
        self.user = non_empty(user);
        self
    }

    /// Set the identity file
    pub fn with_identity_file(mut self, path: &str) -> Self {
        self.identity_file = non_empty(path);
        self
    }

    /// Set the port, 0 unsets it
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = (port != 0).then_some(port);
        self
    }

    /// Apply every slot of `update` to this section.
    ///
    /// On error the section may be partially updated; callers that need
    /// all-or-nothing semantics apply the update to a clone.
    pub fn apply(&mut self, update: &SectionUpdate) -> Result<()> {
        if let Some(ref host) = update.host {
            check_text(Field::Host, host)?;
            let host = host.trim();
            if host.is_empty() {
                return Err(SshConfigError::Validation(
                    "host alias must not be empty".to_string(),
                ));
            }
            self.host = host.to_string();
        }
        if let Some(ref value) = update.host_name {
            check_text(Field::HostName, value)?;
            self.host_name = non_empty(value);
        }
        if let Some(ref value) = update.user {
            check_text(Field::User, value)?;
            self.user = non_empty(value);
        }
        if let Some(ref value) = update.identity_file {
            check_text(Field::IdentityFile, value)?;
            self.identity_file = non_empty(value);
        }
        if let Some(ref value) = update.port {
            self.port = parse_port(value)?;
        }
        Ok(())
    }

    /// Render this section as a YAML mapping keyed by its alias
    pub fn to_yaml(&self) -> Result<String> {
        sections_to_yaml(std::slice::from_ref(self))
    }
}

/// Render sections as one YAML mapping of alias to fields.
///
/// Returns an empty string when there is nothing to show.
pub fn sections_to_yaml(sections: &[Section]) -> Result<String> {
    if sections.is_empty() {
        return Ok(String::new());
    }
    Ok(serde_yaml::to_string(&YamlView(sections))?)
}

/// Serializes as a map so duplicate aliases in a hand-edited file still show up
struct YamlView<'a>(&'a [Section]);

impl Serialize for YamlView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for section in self.0 {
            map.serialize_entry(&section.host, section)?;
        }
        map.end()
    }
}

/// Fields a caller may set on a section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Host,
    HostName,
    User,
    IdentityFile,
    Port,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Host,
        Field::HostName,
        Field::User,
        Field::IdentityFile,
        Field::Port,
    ];

    /// Name used on the command line and in YAML output
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Host => "host",
            Field::HostName => "hostName",
            Field::User => "user",
            Field::IdentityFile => "identityFile",
            Field::Port => "port",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = SshConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Field::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| SshConfigError::UnsupportedField(s.to_string()))
    }
}

/// A set of field updates, one optional slot per field.
///
/// `port` stays raw text until it is applied so that a bad value is reported
/// by the operation that uses it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionUpdate {
    pub host: Option<String>,
    pub host_name: Option<String>,
    pub user: Option<String>,
    pub identity_file: Option<String>,
    pub port: Option<String>,
}

impl SectionUpdate {
    /// Parse `field value [field value ...]` tokens
    pub fn from_pairs<S: AsRef<str>>(args: &[S]) -> Result<Self> {
        if args.is_empty() {
            return Err(SshConfigError::Validation(
                "expected at least one field and value".to_string(),
            ));
        }
        if args.len() % 2 != 0 {
            return Err(SshConfigError::Validation(format!(
                "missing value for field {}",
                args[args.len() - 1].as_ref()
            )));
        }

        let mut update = Self::default();
        for pair in args.chunks(2) {
            let field: Field = pair[0].as_ref().parse()?;
            update.set(field, pair[1].as_ref());
        }
        Ok(update)
    }

    /// Fill one slot, replacing any earlier value
    pub fn set(&mut self, field: Field, value: &str) {
        let value = Some(value.to_string());
        match field {
            Field::Host => self.host = value,
            Field::HostName => self.host_name = value,
            Field::User => self.user = value,
            Field::IdentityFile => self.identity_file = value,
            Field::Port => self.port = value,
        }
    }
}

/// Parse a caller-supplied port. Empty text and 0 both mean "unset".
pub fn parse_port(value: &str) -> Result<Option<u16>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    let port: u16 = value.parse().map_err(|_| SshConfigError::InvalidValue {
        field: Field::Port.to_string(),
        value: value.to_string(),
    })?;
    Ok((port != 0).then_some(port))
}

/// Reject values that would break out of their config line
pub fn check_text(field: Field, value: &str) -> Result<()> {
    if value.chars().any(char::is_control) {
        return Err(SshConfigError::Validation(format!(
            "{} must not contain control characters",
            field
        )));
    }
    Ok(())
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
