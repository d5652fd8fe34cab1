//! In-memory SSH configuration and its operations
//!
//! Every operation validates before it touches the section list, so a
//! failed call leaves the configuration as it was.

use tracing::debug;

use super::error::{Result, SshConfigError};
use super::parser::{parse_with_warnings, ParseWarning};
use super::render::render;
use super::section::{check_text, Field, Section, SectionUpdate};

/// Which sections a query should return
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    All,
    Hosts(Vec<String>),
}

impl Selection {
    /// Build a selection from command-line names, where `all` selects everything
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Self {
        if args.first().map(|a| a.as_ref()) == Some("all") {
            Selection::All
        } else {
            Selection::Hosts(args.iter().map(|a| a.as_ref().to_string()).collect())
        }
    }

    fn matches(&self, host: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Hosts(hosts) => hosts.iter().any(|h| h == host),
        }
    }
}

/// Parsed SSH configuration for one command invocation
#[derive(Debug, Clone, Default)]
pub struct SshConfig {
    sections: Vec<Section>,
    raw_text: String,
    warnings: Vec<ParseWarning>,
}

impl SshConfig {
    /// Parse loaded config text
    pub fn parse(text: &str) -> Self {
        let parsed = parse_with_warnings(text);
        debug!("Parsed {} sections", parsed.sections.len());
        Self {
            sections: parsed.sections,
            raw_text: text.to_string(),
            warnings: parsed.warnings,
        }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Text as loaded, or as rendered after the last mutation
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// Problems found while parsing the loaded text
    pub fn warnings(&self) -> &[ParseWarning] {
        &self.warnings
    }

    pub fn get_section(&self, host: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.host == host)
    }

    /// Append a new section built from `update`.
    ///
    /// `update.host` overrides `alias` when both are given.
    pub fn add(&mut self, alias: &str, update: &SectionUpdate) -> Result<&Section> {
        check_text(Field::Host, alias)?;
        let mut section = Section::new(alias.trim());
        section.apply(update)?;

        if section.host.is_empty() {
            return Err(SshConfigError::Validation(
                "host alias must not be empty".to_string(),
            ));
        }
        if section.host_name.is_none() {
            return Err(SshConfigError::Validation(
                "Please provide the required field: hostName".to_string(),
            ));
        }
        if self.get_section(&section.host).is_some() {
            return Err(SshConfigError::Validation(format!(
                "section {} already exists",
                section.host
            )));
        }

        debug!("Adding section {}", section.host);
        self.sections.push(section);
        self.refresh();
        Ok(&self.sections[self.sections.len() - 1])
    }

    /// Remove every named section, keeping the others in order.
    ///
    /// Fails without removing anything if a name is not present.
    pub fn delete<S: AsRef<str>>(&mut self, hosts: &[S]) -> Result<usize> {
        if let Some(missing) = hosts
            .iter()
            .map(|h| h.as_ref())
            .find(|h| self.get_section(h).is_none())
        {
            return Err(SshConfigError::NotFound(missing.to_string()));
        }

        let before = self.sections.len();
        self.sections
            .retain(|s| !hosts.iter().any(|h| h.as_ref() == s.host));
        let removed = before - self.sections.len();

        debug!("Deleted {} sections", removed);
        self.refresh();
        Ok(removed)
    }

    /// Apply `update` to the named section, all or nothing
    pub fn patch(&mut self, host: &str, update: &SectionUpdate) -> Result<&Section> {
        let index = self
            .sections
            .iter()
            .position(|s| s.host == host)
            .ok_or_else(|| SshConfigError::NotFound(host.to_string()))?;

        let mut patched = self.sections[index].clone();
        patched.apply(update)?;

        if patched.host != host && self.get_section(&patched.host).is_some() {
            return Err(SshConfigError::Validation(format!(
                "section {} already exists",
                patched.host
            )));
        }

        debug!("Patching section {}", host);
        self.sections[index] = patched;
        self.refresh();
        Ok(&self.sections[index])
    }

    /// Sections matching `selection`, in file order
    pub fn get(&self, selection: &Selection) -> Vec<&Section> {
        if let Selection::Hosts(hosts) = selection {
            for host in hosts {
                if self.get_section(host).is_none() {
                    debug!("No section named {}", host);
                }
            }
        }

        self.sections
            .iter()
            .filter(|s| selection.matches(&s.host))
            .collect()
    }

    /// Aliases in file order
    pub fn hosts(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.host.as_str())
    }

    /// Render the current sections
    pub fn render(&self) -> String {
        render(&self.sections)
    }

    fn refresh(&mut self) {
        self.raw_text = render(&self.sections);
    }
}
