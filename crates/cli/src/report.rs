//! Summary printed after a snap.

use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Table};
use console::Style;

use git_thanos_core::cipher::{DARK_SHADE, LIGHT_SHADE, MEDIUM_SHADE};
use git_thanos_core::SnapReport;

/// How a run ended, as far as the reader is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// History was rewritten.
    Snapped,
    /// Authors were chosen but `--dry-run` kept history as is.
    DryRun,
    /// Nothing to do: no eligible authors.
    Untouched,
}

impl Outcome {
    pub fn of(report: &SnapReport, dry_run: bool) -> Self {
        if report.rewritten {
            Outcome::Snapped
        } else if dry_run && !report.selected.is_empty() {
            Outcome::DryRun
        } else {
            Outcome::Untouched
        }
    }

    /// Coloured shade glyph leading the headline.
    fn marker(self) -> String {
        let (glyph, style) = match self {
            Outcome::Snapped => (DARK_SHADE, Style::new().magenta().bold()),
            Outcome::DryRun => (MEDIUM_SHADE, Style::new().yellow()),
            Outcome::Untouched => (LIGHT_SHADE, Style::new().dim()),
        };
        style.apply_to(glyph).to_string()
    }
}

/// One-line outcome of the run, prefixed with its marker.
pub fn headline(report: &SnapReport, dry_run: bool) -> String {
    let outcome = Outcome::of(report, dry_run);
    let chosen = report.selected.len();
    let seen = report.authors_seen;
    let text = match outcome {
        Outcome::Snapped => format!("Snapped {chosen} of {seen} authors"),
        Outcome::DryRun => {
            format!("Dry run: {chosen} of {seen} authors would be snapped, nothing was rewritten")
        }
        Outcome::Untouched => format!("No authors to snap ({seen} found), history unchanged"),
    };
    format!("{} {}", outcome.marker(), text)
}

/// Render the selected authors as a table, or `None` when nobody was chosen.
pub fn selection_table(report: &SnapReport) -> Option<Table> {
    if report.selected.is_empty() {
        return None;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Commits", "Name", "Email"]);

    for author in &report.selected {
        table.add_row(vec![
            Cell::new(author.commits).set_alignment(CellAlignment::Right),
            Cell::new(&author.name),
            Cell::new(&author.email),
        ]);
    }
    Some(table)
}

/// Print the outcome and the table of selected authors to stdout.
pub fn print_report(report: &SnapReport, dry_run: bool) {
    println!();
    println!(
        "{}",
        Style::new()
            .bold()
            .apply_to("Perfectly balanced, as all things should be")
    );
    println!();
    println!("{}", headline(report, dry_run));

    if let Some(table) = selection_table(report) {
        println!();
        println!("{}", table);
        if report.rewritten {
            println!(
                "{}",
                Style::new()
                    .dim()
                    .apply_to("Backups of the old refs are kept under refs/original/")
            );
        }
    }
    println!();
}
