//! Domain model types shared by the parser, selection engine and dispatch
//! builder.

use std::fmt;

/// One distinct contributor as reported by the repository's history summary.
///
/// Selection treats two records as the same identity when their `name`s are
/// equal; `email` plays no part in matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorRecord {
    /// Number of commits attributed to this author.
    pub commits: u64,
    /// Display name, exactly as recorded in history.
    pub name: String,
    /// Contact address, without the surrounding angle brackets.
    pub email: String,
}

impl AuthorRecord {
    pub fn new(commits: u64, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            commits,
            name: name.into(),
            email: email.into(),
        }
    }
}

impl fmt::Display for AuthorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

/// Outcome of one pipeline run.
#[derive(Debug, Clone, Default)]
pub struct SnapReport {
    /// Number of author records parsed from the summary.
    pub authors_seen: usize,
    /// The authors chosen for redaction, in selection order.
    pub selected: Vec<AuthorRecord>,
    /// Whether the history rewrite actually ran.
    pub rewritten: bool,
}
