use regex::{NoExpand, Regex};
use serde::Serialize;
use std::fmt;
use tracing::debug;

use crate::error::{MigrateError, MigrateResult};

/// The transformation a rule performs
#[derive(Debug, Clone)]
pub enum RuleKind {
    /// Insert `line` after every `anchor`, unless `unless_present` already occurs
    InsertAfter {
        anchor: String,
        line: String,
        unless_present: String,
    },
    /// Delete every match of `pattern`
    RegexDelete { pattern: Regex },
    /// Replace the first literal occurrence of `needle`
    ReplaceFirst { needle: String, replacement: String },
    /// Delete from `start` through the next `end_marker`
    Excise { start: String, end_marker: String },
}

/// A named, ordered transformation step over the source text
#[derive(Debug, Clone)]
pub struct Rule {
    pub name: String,
    pub kind: RuleKind,
    /// Reported as a failure in strict mode when it does not apply
    pub required: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleStatus {
    /// The rule changed the text
    Applied,
    /// Nothing to do, the text is already in the target shape
    Satisfied,
    /// The expected pattern was not found
    Skipped,
}

impl fmt::Display for RuleStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            RuleStatus::Applied => "applied",
            RuleStatus::Satisfied => "satisfied",
            RuleStatus::Skipped => "skipped",
        };
        f.pad(label)
    }
}

/// Why an excision left the text alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExciseMiss {
    /// The start marker does not occur
    StartMissing,
    /// The start marker occurs but no end marker follows it
    EndMissing,
}

/// What happened when a rule ran
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleOutcome {
    pub name: String,
    pub status: RuleStatus,
    pub edits: usize,
    pub required: bool,
}

impl RuleOutcome {
    pub fn missed(&self) -> bool {
        self.required && self.status == RuleStatus::Skipped
    }
}

impl Rule {
    pub fn insert_after(
        name: impl Into<String>,
        anchor: impl Into<String>,
        line: impl Into<String>,
        unless_present: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: RuleKind::InsertAfter {
                anchor: anchor.into(),
                line: line.into(),
                unless_present: unless_present.into(),
            },
            required: false,
        }
    }

    /// Fails if `pattern` is not a valid regular expression
    pub fn regex_delete(name: impl Into<String>, pattern: &str) -> MigrateResult<Self> {
        let name = name.into();
        let pattern =
            Regex::new(pattern).map_err(|e| MigrateError::invalid_pattern(name.clone(), e))?;
        Ok(Self {
            name,
            kind: RuleKind::RegexDelete { pattern },
            required: false,
        })
    }

    pub fn replace_first(
        name: impl Into<String>,
        needle: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: RuleKind::ReplaceFirst {
                needle: needle.into(),
                replacement: replacement.into(),
            },
            required: false,
        }
    }

    pub fn excise(
        name: impl Into<String>,
        start: impl Into<String>,
        end_marker: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: RuleKind::Excise {
                start: start.into(),
                end_marker: end_marker.into(),
            },
            required: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Apply the rule to `text`, returning the new text and the outcome
    pub fn apply(&self, text: &str) -> (String, RuleOutcome) {
        let (output, status, edits) = match &self.kind {
            RuleKind::InsertAfter {
                anchor,
                line,
                unless_present,
            } => {
                if text.contains(unless_present.as_str()) {
                    (text.to_string(), RuleStatus::Satisfied, 0)
                } else {
                    let (output, edits) = insert_after(text, anchor, line);
                    (output, status_for(edits), edits)
                }
            }
            RuleKind::RegexDelete { pattern } => {
                let (output, edits) = delete_matches(text, pattern);
                (output, status_for(edits), edits)
            }
            RuleKind::ReplaceFirst {
                needle,
                replacement,
            } => {
                let (output, edits) = replace_first(text, needle, replacement);
                (output, status_for(edits), edits)
            }
            RuleKind::Excise { start, end_marker } => match excise(text, start, end_marker) {
                Ok(output) => (output, RuleStatus::Applied, 1),
                Err(ExciseMiss::EndMissing) => {
                    debug!(
                        "Rule {}: found {:?} but no closing {:?} after it",
                        self.name, start, end_marker
                    );
                    (text.to_string(), RuleStatus::Skipped, 0)
                }
                Err(ExciseMiss::StartMissing) => (text.to_string(), RuleStatus::Skipped, 0),
            },
        };

        debug!("Rule {} {} ({} edits)", self.name, status, edits);

        (
            output,
            RuleOutcome {
                name: self.name.clone(),
                status,
                edits,
                required: self.required,
            },
        )
    }
}

fn status_for(edits: usize) -> RuleStatus {
    if edits > 0 {
        RuleStatus::Applied
    } else {
        RuleStatus::Skipped
    }
}

/// Insert `line` on its own line after every occurrence of `anchor`
pub fn insert_after(text: &str, anchor: &str, line: &str) -> (String, usize) {
    if anchor.is_empty() {
        return (text.to_string(), 0);
    }
    let edits = text.matches(anchor).count();
    if edits == 0 {
        return (text.to_string(), 0);
    }
    let replacement = format!("{}\n{}", anchor, line);
    (text.replace(anchor, &replacement), edits)
}

/// Remove every match of `pattern`
pub fn delete_matches(text: &str, pattern: &Regex) -> (String, usize) {
    let edits = pattern.find_iter(text).count();
    if edits == 0 {
        return (text.to_string(), 0);
    }
    (pattern.replace_all(text, NoExpand("")).into_owned(), edits)
}

/// Replace only the first literal occurrence of `needle`
pub fn replace_first(text: &str, needle: &str, replacement: &str) -> (String, usize) {
    if needle.is_empty() || !text.contains(needle) {
        return (text.to_string(), 0);
    }
    (text.replacen(needle, replacement, 1), 1)
}

/// Cut the span that opens at the first `start` and closes at the next
/// `end_marker`, together with a trailing `;` and line break after it.
///
/// Fails with the bound that could not be found.
pub fn excise(text: &str, start: &str, end_marker: &str) -> Result<String, ExciseMiss> {
    let begin = match text.find(start) {
        Some(begin) if !start.is_empty() => begin,
        _ => return Err(ExciseMiss::StartMissing),
    };
    let close = match text[begin..].find(end_marker) {
        Some(offset) if !end_marker.is_empty() => begin + offset + end_marker.len(),
        _ => return Err(ExciseMiss::EndMissing),
    };

    let rest = &text[close..];
    let rest = rest.strip_prefix(';').unwrap_or(rest);
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))
        .unwrap_or(rest);

    let mut output = String::with_capacity(begin + rest.len());
    output.push_str(&text[..begin]);
    output.push_str(rest);
    Ok(output)
}
