//! Parser for `git shortlog -sne` output.
//!
//! Each author line looks like `␠␠␠␠12\tJane Doe <jane@example.com>`. Lines
//! that don't have that shape are skipped rather than reported.

use std::sync::OnceLock;

use regex_lite::Regex;
use tracing::{debug, trace};

use crate::models::AuthorRecord;

fn shortlog_line() -> &'static Regex {
    static LINE: OnceLock<Regex> = OnceLock::new();
    LINE.get_or_init(|| Regex::new(r"(\d+)\s+(.*?)\s+<(.*?)>").expect("shortlog pattern is valid"))
}

/// Parse a per-author commit summary into author records, in input order.
pub fn parse_shortlog(output: &str) -> Vec<AuthorRecord> {
    debug!("parsing shortlog output ({} bytes)", output.len());
    let authors: Vec<AuthorRecord> = output
        .split(['\r', '\n'])
        .filter(|line| !line.is_empty())
        .filter_map(parse_line)
        .collect();
    debug!(count = authors.len(), "parsed shortlog authors");
    authors
}

fn parse_line(line: &str) -> Option<AuthorRecord> {
    let Some(caps) = shortlog_line().captures(line) else {
        trace!(line, "skipping unrecognised shortlog line");
        return None;
    };
    let commits = caps[1].parse::<u64>().ok()?;
    Some(AuthorRecord::new(commits, &caps[2], &caps[3]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_git_output() {
        let output = "    12\tJane Doe <jane@example.com>\n     3\tBob <bob@example.org>\n";
        let authors = parse_shortlog(output);
        assert_eq!(
            authors,
            vec![
                AuthorRecord::new(12, "Jane Doe", "jane@example.com"),
                AuthorRecord::new(3, "Bob", "bob@example.org"),
            ]
        );
    }

    #[test]
    fn test_parse_tab_separated_address() {
        let output = "5\tAlice\t<a@x.com>\n3\tBob\t<b@x.com>\n2\tCarol\t<c@x.com>\n1\tDave\t<d@x.com>";
        let authors = parse_shortlog(output);
        assert_eq!(authors.len(), 4);
        assert_eq!(authors[0], AuthorRecord::new(5, "Alice", "a@x.com"));
        assert_eq!(authors[3], AuthorRecord::new(1, "Dave", "d@x.com"));
    }

    #[test]
    fn test_skips_malformed_lines() {
        let output = "garbage\n\n  7\tNo Address\n  2\tEve <eve@x.com>\r\n<orphan@x.com>\n";
        let authors = parse_shortlog(output);
        assert_eq!(authors, vec![AuthorRecord::new(2, "Eve", "eve@x.com")]);
    }

    #[test]
    fn test_crlf_and_empty_address() {
        let authors = parse_shortlog("1\tGhost <>\r\n4\tMallory <m@x.com>\r\n");
        assert_eq!(authors.len(), 2);
        assert_eq!(authors[0].email, "");
        assert_eq!(authors[1].commits, 4);
    }

    #[test]
    fn test_count_overflow_is_skipped() {
        let authors = parse_shortlog("99999999999999999999999\tBig <big@x.com>\n");
        assert!(authors.is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_shortlog("").is_empty());
    }

    #[test]
    fn test_no_dedup() {
        let authors = parse_shortlog("2\tSam <sam@a.com>\n1\tSam <sam@b.com>\n");
        assert_eq!(authors.len(), 2);
        assert_eq!(authors[0].name, authors[1].name);
    }
}
