//! Parser for static link definition files.
//!
//! # Format
//!
//! ```text
//! ; comments start with a semicolon
//! /docs
//! 	:= https://docs.example.com
//!
//! /team/mail
//! 	:= mailto:team@example.com
//! ```
//!
//! - Lines starting with `;` and blank lines are ignored.
//! - A line starting with `/` declares a short path, taken as written.
//! - The next content line must start with a tab followed by `:=`; the
//!   trimmed remainder is the target.
//! - Later declarations of the same path override earlier ones.
//!
//! Malformed entries never abort parsing: they are skipped and reported as
//! [`ParseWarning`]s.

use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Prefix of a target line.
pub const TARGET_MARKER: &str = "\t:=";

/// A skipped entry. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseWarning {
    #[error("ignoring root path '/' entry at line {line}; root path redirects are not allowed")]
    RootPath { line: usize },

    #[error("ignoring short path '{path}' at line {line} without valid target line")]
    MissingTarget { line: usize, path: String },

    #[error("ignoring line {line} without preceding path")]
    OrphanedLine { line: usize },
}

/// Result of parsing a definition file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDefinitions {
    /// Short path (leading `/` included) to target.
    pub mappings: BTreeMap<String, String>,
    pub warnings: Vec<ParseWarning>,
}

impl ParsedDefinitions {
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    fn warn(&mut self, warning: ParseWarning) {
        warn!("{warning}");
        self.warnings.push(warning);
    }
}

/// Parses definition text into a short path to target mapping.
///
/// # Examples
///
/// ```
/// use golinks::domain::definitions::parse_definitions;
///
/// let parsed = parse_definitions("/foo\n\t:= https://a.example\n/foo\n\t:= https://b.example\n");
/// assert_eq!(parsed.mappings["/foo"], "https://b.example");
/// assert!(parsed.warnings.is_empty());
/// ```
pub fn parse_definitions(text: &str) -> ParsedDefinitions {
    let lines: Vec<&str> = text.lines().collect();
    let mut parsed = ParsedDefinitions::default();

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];

        if line.starts_with(';') || line.trim().is_empty() {
            i += 1;
            continue;
        }

        if !line.starts_with('/') {
            parsed.warn(ParseWarning::OrphanedLine { line: i + 1 });
            i += 1;
            continue;
        }

        if line == "/" {
            parsed.warn(ParseWarning::RootPath { line: i + 1 });
            i += 1;
            continue;
        }

        let target = (i + 1..lines.len())
            .find(|&j| !is_blank_or_comment(lines[j]))
            .and_then(|j| {
                lines[j]
                    .strip_prefix(TARGET_MARKER)
                    .map(|rest| (j, rest.trim()))
            });

        match target {
            Some((j, target)) => {
                if target.is_empty() {
                    debug!("Empty target for '{}' at line {}", line, j + 1);
                } else {
                    debug!("Mapping: {} -> {}", line, target);
                    parsed.mappings.insert(line.to_string(), target.to_string());
                }
                i = j + 1;
            }
            None => {
                parsed.warn(ParseWarning::MissingTarget {
                    line: i + 1,
                    path: line.to_string(),
                });
                i += 1;
            }
        }
    }

    parsed
}

/// Lines skipped while looking for a target. Comments may be indented here.
fn is_blank_or_comment(line: &str) -> bool {
    line.trim().is_empty() || line.trim_start().starts_with(';')
}
