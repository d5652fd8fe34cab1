//! Parser for OpenSSH client config text
//!
//! Handles the `Host`, `HostName`, `User`, `IdentityFile` and `Port`
//! keywords. Everything else is skipped.

use tracing::warn;

use super::section::Section;

/// Port used when a `Port` line cannot be parsed
pub const DEFAULT_PORT: u16 = 22;

/// Recoverable problems found while parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseWarning {
    /// `Port` value was not a valid port number and was reset to the default
    InvalidPort { host: String, value: String },
}

/// Sections plus any recoverable anomalies met on the way
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parsed {
    pub sections: Vec<Section>,
    pub warnings: Vec<ParseWarning>,
}

/// Parse config text into sections, logging any warnings
pub fn parse(text: &str) -> Vec<Section> {
    parse_with_warnings(text).sections
}

/// Parse config text into sections and collect warnings
pub fn parse_with_warnings(text: &str) -> Parsed {
    let mut parsed = Parsed::default();
    let mut current: Option<Section> = None;

    for line in text.lines() {
        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(alias) = line.strip_prefix("Host ") {
            if let Some(section) = current.take().filter(|s| !s.host.is_empty()) {
                parsed.sections.push(section);
            }
            current = Some(Section::new(alias.trim()));
            continue;
        }

        let mut tokens = line.split_whitespace();
        let (Some(key), Some(first)) = (tokens.next(), tokens.next()) else {
            continue;
        };
        let value = std::iter::once(first).chain(tokens).collect::<Vec<_>>().join(" ");

        // Keys before the first Host line belong to no section
        let Some(section) = current.as_mut() else {
            continue;
        };

        match key {
            "HostName" => section.host_name = Some(value),
            "User" => section.user = Some(value),
            "IdentityFile" => section.identity_file = Some(value),
            "Port" => section.port = parse_port_line(section, value, &mut parsed.warnings),
            _ => {}
        }
    }

    if let Some(section) = current.filter(|s| !s.host.is_empty()) {
        parsed.sections.push(section);
    }

    parsed
}

fn parse_port_line(
    section: &Section,
    value: String,
    warnings: &mut Vec<ParseWarning>,
) -> Option<u16> {
    match value.parse::<u16>() {
        Ok(0) => None,
        Ok(port) => Some(port),
        Err(_) => {
            warn!(
                "Error with port {} for host {}. Reverting to default",
                value, section.host
            );
            warnings.push(ParseWarning::InvalidPort {
                host: section.host.clone(),
                value,
            });
            Some(DEFAULT_PORT)
        }
    }
}
