//! Lookup tables from an author's original name to its redacted name and
//! address, and their rendering as `/bin/sh` dispatch scripts.
//!
//! `git filter-branch` runs its env-filter in a separate shell per commit, so
//! the tables are handed over as two small executables:
//!
//! ```sh
//! #!/bin/sh
//! case "$1" in
//!   'Alice') echo '░▒░▓░' ;;
//! esac
//! ```
//!
//! Unknown names fall through and print nothing.

use rand::Rng;
use tracing::debug;

use crate::cipher::redact;
use crate::models::AuthorRecord;

/// Ordered `name -> replacement` pairs for one field.
///
/// Entries keep selection order. Duplicate names are kept as-is; lookups and
/// the rendered `case` both resolve to the first entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedactionMap {
    entries: Vec<(String, String)>,
}

impl RedactionMap {
    /// Build a map keyed by each author's name, redacting the field chosen by
    /// `field`. Every replacement is drawn once, here.
    pub fn build<R, F>(selection: &[AuthorRecord], field: F, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
        F: Fn(&AuthorRecord) -> &str,
    {
        let entries = selection
            .iter()
            .map(|author| (author.name.clone(), redact(field(author), rng)))
            .collect();
        Self { entries }
    }

    /// Replacement for `name`, if it was selected.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the map as a `/bin/sh` script that echoes the replacement for
    /// its first argument.
    pub fn render(&self) -> String {
        let mut script = String::from("#!/bin/sh\ncase \"$1\" in\n");
        for (key, value) in &self.entries {
            script.push_str(&format!(
                "  {}) echo {} ;;\n",
                shell_quote(key),
                shell_quote(value)
            ));
        }
        script.push_str("esac\n");
        script
    }
}

/// The name and address tables for one run.
#[derive(Debug, Clone, Default)]
pub struct LookupScripts {
    pub names: RedactionMap,
    pub emails: RedactionMap,
}

impl LookupScripts {
    /// Draw replacement names and addresses for every selected author.
    pub fn build<R: Rng + ?Sized>(selection: &[AuthorRecord], rng: &mut R) -> Self {
        let names = RedactionMap::build(selection, |a| a.name.as_str(), rng);
        let emails = RedactionMap::build(selection, |a| a.email.as_str(), rng);
        debug!(entries = names.len(), "built lookup tables");
        Self { names, emails }
    }
}

/// Quote `s` for literal use in a POSIX shell word.
///
/// Single quotes suppress every expansion and glob, so the only character that
/// needs care is the single quote itself.
pub fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}
