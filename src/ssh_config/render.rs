//! Renders sections back into config text

use std::fmt::Write;

use super::section::Section;

/// First line of every rendered file
pub const HEADER: &str =
    "# Read more about SSH config files: https://linux.die.net/man/5/ssh_config";

/// Render sections into config text.
///
/// Field order and spacing are fixed so that parsing the output and
/// rendering it again yields the same text.
pub fn render(sections: &[Section]) -> String {
    let mut out = String::new();
    out.push_str(HEADER);
    out.push('\n');

    for section in sections {
        // Writing to a String cannot fail
        let _ = writeln!(out, "Host {}", section.host);
        if let Some(ref host_name) = section.host_name {
            let _ = writeln!(out, "\tHostName {}", host_name);
        }
        if let Some(ref user) = section.user {
            let _ = writeln!(out, "\tUser {}", user);
        }
        if let Some(ref identity_file) = section.identity_file {
            let _ = writeln!(out, "\tIdentityFile {}", identity_file);
        }
        if let Some(port) = section.port.filter(|p| *p != 0) {
            let _ = writeln!(out, "\tPort  {}", port);
        }
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ssh_config::parser::parse;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_render_empty() {
        assert_eq!(render(&[]), format!("{}\n", HEADER));
    }

    #[test]
    fn test_render_full_section() {
        let sections = vec![Section::new("example")
            .with_host_name("example.com")
            .with_user("root")
            .with_identity_file("file.pem")
            .with_port(22)];

        assert_eq!(
            render(&sections),
            format!(
                "{}\nHost example\n\tHostName example.com\n\tUser root\n\tIdentityFile file.pem\n\tPort  22\n\n",
                HEADER
            )
        );
    }

    #[test]
    fn test_render_skips_absent_fields() {
        let sections = vec![
            Section::new("a").with_user("alice"),
            Section::new("b"),
        ];

        assert_eq!(
            render(&sections),
            format!("{}\nHost a\n\tUser alice\n\nHost b\n\n", HEADER)
        );
    }

    #[test]
    fn test_render_never_writes_port_zero() {
        let mut section = Section::new("zero").with_host_name("zero.local");
        section.port = Some(0);
        assert!(!render(&[section]).contains("Port"));
    }

    fn value_strategy() -> impl Strategy<Value = Option<String>> {
        proptest::option::of("[A-Za-z0-9~/._-]{1,12}( [A-Za-z0-9._-]{1,6})?")
    }

    fn section_strategy() -> impl Strategy<Value = Section> {
        (
            "[a-z][a-z0-9._-]{0,10}",
            value_strategy(),
            value_strategy(),
            value_strategy(),
            proptest::option::of(1u16..),
        )
            .prop_map(|(host, host_name, user, identity_file, port)| Section {
                host,
                host_name,
                user,
                identity_file,
                port,
            })
    }

    proptest! {
        #[test]
        fn prop_render_parse_roundtrip(sections in proptest::collection::vec(section_strategy(), 0..6)) {
            let text = render(&sections);
            let reparsed = parse(&text);
            prop_assert_eq!(&reparsed, &sections);
            prop_assert_eq!(render(&reparsed), text);
        }
    }
}
