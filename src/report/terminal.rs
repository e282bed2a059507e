use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Cell, CellAlignment, Color, Table};
use owo_colors::OwoColorize;

use crate::report::diagnostic::{Diagnostic, DisplayGroup, MessageTypes};
use crate::report::summary::BuildDirReport;
use crate::report::view::ViewReport;

/// One diagnostic as a list entry: `line N: message  (log#nLOGLINE)`
pub fn diagnostic_line(d: &Diagnostic) -> String {
    let mut out = String::new();
    if d.line != 0 {
        out.push_str(&format!("line {}: ", d.line));
    }
    out.push_str(&d.message);
    out.push_str(&format!("  ({}#n{})", d.log, d.log_line));
    out
}

/// `+` marks new diagnostics
fn marked_line(d: &Diagnostic) -> String {
    let marker = if d.is_new { "+" } else { " " };
    format!("{} {}", marker, diagnostic_line(d))
}

/// Table of display groups: path, count and, for files, their diagnostics
pub fn groups_table(groups: &[DisplayGroup<'_>]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_header(vec!["Path", "Count", "Diagnostics"]);
    for group in groups {
        let path = group.display_path();
        let (path, details) = if group.is_dir() {
            (Cell::new(path).fg(Color::Cyan), Cell::new(""))
        } else {
            let lines: Vec<String> = group.diagnostics.iter().map(|d| marked_line(d)).collect();
            let color = if group.diagnostics.iter().any(|d| d.is_error()) {
                Color::Red
            } else {
                Color::Yellow
            };
            (Cell::new(path), Cell::new(lines.join("\n")).fg(color))
        };
        table.add_row(vec![
            path,
            Cell::new(group.diagnostics.len()).set_alignment(CellAlignment::Right),
            details,
        ]);
    }
    table
}

/// Render a grouped view to the terminal with colors
pub fn render(report: &ViewReport<'_>) {
    println!();
    let root = if report.root.is_empty() {
        "(top)"
    } else {
        report.root
    };
    println!(
        "{}  buildmsg v{} — {} {}{}",
        "📂".bold(),
        report.version,
        root.cyan(),
        (if report.filter.only_error { "[errors] " } else { "" }).dimmed(),
        (if report.filter.only_new { "[new]" } else { "[all]" }).dimmed(),
    );
    println!();

    if report.groups.is_empty() {
        println!("  {}  Nothing to show here!", "✅".bold());
        println!();
    } else {
        println!("{}", groups_table(&report.groups));
        println!();
    }

    println!("{}", "━".repeat(60));
    let s = &report.summary;
    println!(
        " {} warnings ({} new), {} errors ({} new)",
        s.warnings.to_string().bold(),
        s.new_warnings.to_string().yellow().bold(),
        s.errors.to_string().bold(),
        s.new_errors.to_string().red().bold(),
    );
    println!("{}", "━".repeat(60));
    println!();
}

/// Table of message types with their counts in the current view
pub fn types_table(types: &MessageTypes) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_header(vec!["Message", "Count", "Shown"]);
    for (message, filter) in types {
        table.add_row(vec![
            Cell::new(message),
            Cell::new(filter.count).set_alignment(CellAlignment::Right),
            Cell::new(if filter.active { "yes" } else { "no" }),
        ]);
    }
    table
}

/// Render the message type list
pub fn render_types(report: &ViewReport<'_>) {
    println!();
    println!("{}", types_table(report.message_types));
    let shown = report.message_types.values().filter(|t| t.active).count();
    println!(
        "  {} message types, {} shown",
        report.message_types.len(),
        shown
    );
    println!();
}

/// Per-architecture totals of a build directory
pub fn render_summary(report: &BuildDirReport) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED).set_header(vec![
        "Arch",
        "Warnings",
        "New",
        "Errors",
        "New",
    ]);
    for a in &report.arches {
        let arch = if a.has_parent {
            a.arch.display().to_string()
        } else {
            format!("{} (no parent)", a.arch.display())
        };
        table.add_row(vec![
            Cell::new(arch),
            Cell::new(a.counts.warnings).set_alignment(CellAlignment::Right),
            Cell::new(a.counts.new_warnings).set_alignment(CellAlignment::Right),
            Cell::new(a.counts.errors).set_alignment(CellAlignment::Right),
            Cell::new(a.counts.new_errors).set_alignment(CellAlignment::Right),
        ]);
    }

    println!();
    println!(
        "{}  buildmsg v{} — {} architectures in {:.2}s",
        "🔍".bold(),
        report.version,
        report.arches.len(),
        report.duration_ms as f64 / 1000.0
    );
    println!("{}", table);

    let total = report.total();
    println!(
        " {} new warnings, {} new errors",
        total.new_warnings.to_string().yellow().bold(),
        total.new_errors.to_string().red().bold(),
    );
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::diagnostic::Severity;

    fn diag(line: u32) -> Diagnostic {
        Diagnostic {
            file: "src/a.cpp".into(),
            line,
            message: "unused-variable".into(),
            severity: Severity::Warning,
            log: "x86_64/jam.log".into(),
            log_line: 812,
            is_new: true,
        }
    }

    #[test]
    fn test_diagnostic_line() {
        assert_eq!(
            diagnostic_line(&diag(42)),
            "line 42: unused-variable  (x86_64/jam.log#n812)"
        );
        assert_eq!(diagnostic_line(&diag(0)), "unused-variable  (x86_64/jam.log#n812)");
    }

    #[test]
    fn test_groups_table_rows() {
        let a = diag(42);
        let mut b = diag(7);
        b.file = "src/b.cpp".into();
        let dir = DisplayGroup {
            path: vec!["src", ""],
            diagnostics: vec![&a, &b],
        };
        let leaf = DisplayGroup {
            path: vec!["main.cpp"],
            diagnostics: vec![&a],
        };
        let rendered = groups_table(&[dir, leaf]).to_string();
        assert!(rendered.contains("Path"));
        assert!(rendered.contains("src/"));
        assert!(rendered.contains("main.cpp"));
        assert!(rendered.contains("line 42: unused-variable"));
        assert!(!rendered.contains("line 7:"));
    }

    #[test]
    fn test_types_table_lists_every_type() {
        let mut types = MessageTypes::new();
        types.insert("shadow".into(), Default::default());
        types.insert("unused".into(), Default::default());
        let rendered = types_table(&types).to_string();
        assert!(rendered.contains("shadow"));
        assert!(rendered.contains("unused"));
    }
}
