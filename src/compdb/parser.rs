//! Kbuild `.o.cmd` metadata parsing.
//!
//! Kbuild leaves a `.<object>.cmd` file next to every object it builds. Two
//! of its assignments matter here:
//!
//! ```text
//! cmd_drivers/net/foo.o := gcc -Wp,-MMD,... -c -o drivers/net/foo.o drivers/net/foo.c
//! source_drivers/net/foo.o := drivers/net/foo.c
//! ```
//!
//! Everything else (`deps_*`, dependency lists, `$(wildcard ...)` lines) is
//! ignored.

use super::entry::CompileEntry;
use crate::error::CompdbError;
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::LazyLock;

static CMD_VAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*cmd_(\S+)[ \t]*:=[ \t]*(.+?)[ \t\r]*$").expect("cmd_ pattern is valid")
});

static SOURCE_VAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*source_(\S+)[ \t]*:=[ \t]*(.+?)[ \t\r]*$")
        .expect("source_ pattern is valid")
});

/// Entries recovered from one metadata file plus the keys that had to be
/// dropped.
#[derive(Debug, Default)]
pub struct ParsedMetadata {
    pub entries: Vec<CompileEntry>,
    pub diagnostics: Vec<CompdbError>,
}

fn collect_vars<'t>(re: &Regex, text: &'t str) -> impl Iterator<Item = (&'t str, &'t str)> {
    re.captures_iter(text).filter_map(|caps| {
        let key = caps.get(1)?.as_str();
        let value = caps.get(2)?.as_str();
        Some((key, value))
    })
}

/// Parse the text of one metadata file.
///
/// `directory` is the scan root the file was found under and becomes the
/// `directory` of every entry. `origin` only labels diagnostics.
///
/// One entry is produced per key present in both the `cmd_` and `source_`
/// families. A repeated key keeps its last value. A source key without a
/// command yields a [`CompdbError::MissingCommandForSource`] diagnostic; a
/// command key without a source is ignored.
pub fn parse_metadata(text: &str, directory: &str, origin: &Path) -> ParsedMetadata {
    let commands: HashMap<&str, &str> = collect_vars(&CMD_VAR_RE, text).collect();
    let sources: BTreeMap<&str, &str> = collect_vars(&SOURCE_VAR_RE, text).collect();

    let mut parsed = ParsedMetadata::default();
    for (key, source) in sources {
        match commands.get(key) {
            Some(command) => parsed.entries.push(CompileEntry {
                directory: directory.to_string(),
                command: (*command).to_string(),
                file: source.to_string(),
                output: key.to_string(),
            }),
            None => parsed
                .diagnostics
                .push(CompdbError::MissingCommandForSource {
                    file: origin.to_path_buf(),
                    key: key.to_string(),
                }),
        }
    }
    parsed
}
