//! Randomized fair selection of the authors to redact.
//!
//! # Algorithm
//!
//! The steps run in a fixed order; reordering them changes which identities
//! can ever be selected.
//!
//! 1. Drop authors whose name is already made of shade glyphs.
//! 2. Pull out the *tyrant* and *rival* identities (two reserved,
//!    case-insensitive name patterns). Every match leaves the working set; the
//!    last match of each pattern is remembered.
//! 3. Shuffle the working set (Fisher–Yates).
//! 4. Keep the first half. For odd sizes a fair coin decides whether the
//!    middle author is kept.
//! 5. If both a tyrant and a rival were found, the rival joins the selection.
//!    The tyrant never does.

use rand::seq::SliceRandom;
use rand::Rng;
use regex_lite::{Regex, RegexBuilder};
use tracing::{debug, info};

use crate::cipher::is_redacted;
use crate::config::SelectionConfig;
use crate::errors::ConfigError;
use crate::models::AuthorRecord;

/// Compiled selection rules.
#[derive(Debug, Clone)]
pub struct SelectionPolicy {
    tyrant: Regex,
    rival: Regex,
}

impl SelectionPolicy {
    /// Compile the reserved name patterns from config.
    pub fn from_config(config: &SelectionConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            tyrant: compile_pattern(&config.tyrant_pattern, "selection.tyrant_pattern")?,
            rival: compile_pattern(&config.rival_pattern, "selection.rival_pattern")?,
        })
    }

    /// Choose the authors to redact from `records`.
    pub fn select<R: Rng + ?Sized>(
        &self,
        records: Vec<AuthorRecord>,
        rng: &mut R,
    ) -> Vec<AuthorRecord> {
        let total = records.len();
        let mut working: Vec<AuthorRecord> = records
            .into_iter()
            .filter(|author| !is_redacted(&author.name))
            .collect();
        debug!(
            skipped = total - working.len(),
            "excluded already-redacted authors"
        );

        let tyrant = extract_last_match(&mut working, &self.tyrant);
        let rival = extract_last_match(&mut working, &self.rival);

        working.shuffle(rng);

        let half = fair_half(working.len(), rng);
        working.truncate(half);

        match (tyrant, rival) {
            (Some(tyrant), Some(rival)) => {
                info!(tyrant = %tyrant.name, rival = %rival.name, "both reserved identities present");
                working.push(rival);
            }
            (tyrant, rival) => {
                debug!(
                    tyrant = tyrant.is_some(),
                    rival = rival.is_some(),
                    "reserved identities left out"
                );
            }
        }

        info!(candidates = total, selected = working.len(), "selection complete");
        working
    }
}

fn compile_pattern(pattern: &str, field: &str) -> Result<Regex, ConfigError> {
    if pattern.is_empty() {
        return Err(ConfigError::InvalidValue {
            field: field.into(),
            detail: "pattern must not be empty".into(),
        });
    }
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| ConfigError::InvalidValue {
            field: field.into(),
            detail: e.to_string(),
        })
}

/// Remove every author whose name matches `pattern`; return the last one.
fn extract_last_match(working: &mut Vec<AuthorRecord>, pattern: &Regex) -> Option<AuthorRecord> {
    let mut last = None;
    working.retain(|author| {
        if pattern.is_match(&author.name) {
            last = Some(author.clone());
            false
        } else {
            true
        }
    });
    last
}

/// `len / 2`, with odd lengths rounded up or down on a fair coin flip.
fn fair_half<R: Rng + ?Sized>(len: usize, rng: &mut R) -> usize {
    let half = len / 2;
    if len % 2 == 1 && rng.gen_bool(0.5) {
        half + 1
    } else {
        half
    }
}
