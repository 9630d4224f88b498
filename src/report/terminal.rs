use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Table as ComfyTable};

use crate::report::model::{DependencyBlock, Report, SectionBody, Table, TableKind};

/// Print every section of the report to stdout.
pub fn render(report: &Report) {
    println!("{}", to_string(report));
}

/// The terminal rendering as a string; headings carry ANSI colors when enabled.
pub fn to_string(report: &Report) -> String {
    let mut out = String::new();
    out.push_str(&format!("\n {}\n", report.title.bold()));
    out.push_str(&format!(" Source: {}\n", report.source));

    for section in &report.sections {
        out.push_str(&format!("\n {}\n\n", section.heading().cyan().bold()));
        match &section.body {
            SectionBody::Table(table) => {
                out.push_str(&build_table(table).to_string());
                out.push('\n');
            }
            SectionBody::Dependencies(blocks) => {
                for block in blocks {
                    out.push_str(&format_block(block));
                }
            }
        }
    }
    out
}

fn build_table(table: &Table) -> ComfyTable {
    let align = match table.kind {
        TableKind::KeyValue => CellAlignment::Left,
        TableKind::Components | TableKind::Counts => CellAlignment::Center,
    };

    let mut out = ComfyTable::new();
    out.load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            table
                .headers
                .iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
        );

    for row in &table.rows {
        out.add_row(row.iter().map(|cell| Cell::new(cell).set_alignment(align)));
    }
    out
}

fn format_block(block: &DependencyBlock) -> String {
    let mut out = format!(" {} {}\n {}\n", "Dependency:".bold(), block.reference, "Depends On:".bold());
    for item in &block.depends_on {
        out.push_str(&format!("     {}\n", item));
    }
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projector::project;
    use crate::report::model::build;
    use serde_json::json;
    use std::path::Path;

    #[test]
    fn test_terminal_output_lists_every_section() {
        colored::control::set_override(false);
        let doc = json!({
            "bomFormat": "CycloneDX",
            "components": [{ "name": "libfoo", "version": "1.0", "type": "library" }],
            "dependencies": [{ "ref": "libfoo" }]
        });
        let report = build(&doc, &project(&doc), Path::new("app.json"));
        let text = to_string(&report);

        for section in &report.sections {
            assert!(text.contains(&section.heading()), "missing {}", section.heading());
        }
        assert!(text.contains("libfoo"));
        assert!(text.contains("Depends On:"));
        assert!(text.contains("None"));
    }
}
