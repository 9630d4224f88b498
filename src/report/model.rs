use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use crate::lookup::{Lookup, NOT_AVAILABLE, NO_DEPENDENCIES};
use crate::models::{Column, ComponentTable};

/// A rendered-format-independent report: six numbered sections in fixed order.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub title: String,
    pub source: String,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Section {
    pub number: usize,
    pub title: &'static str,
    pub body: SectionBody,
}

impl Section {
    pub fn heading(&self) -> String {
        format!("{}. {}", self.number, self.title)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionBody {
    Table(Table),
    Dependencies(Vec<DependencyBlock>),
}

/// Selects the visual treatment of a table; the content shape is the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    /// Two-column `Item` / `Details` summary, left aligned.
    KeyValue,
    /// The full component listing, wrapped cells on a shaded body.
    Components,
    /// Grouped value / count pairs, centered.
    Counts,
}

#[derive(Debug, Clone, Serialize)]
pub struct Table {
    pub kind: TableKind,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyBlock {
    pub reference: String,
    /// Never empty: a dependency without edges lists the `"None"` placeholder.
    pub depends_on: Vec<String>,
}

pub const SBOM_SUMMARY: &str = "SBOM Summary";
pub const SUPPLIER_INFORMATION: &str = "Supplier Information";
pub const COMPONENTS_SUMMARY: &str = "Components Summary";
pub const DEPENDENCY_SUMMARY: &str = "Dependency Summary";
pub const COMPONENTS_TYPE_SUMMARY: &str = "Components Type Summary";
pub const LICENSE_SUMMARY: &str = "License Summary";

/// Assemble the report for one SBOM from the parsed document and its
/// projected component table.
pub fn build(doc: &Value, table: &ComponentTable, source: &Path) -> Report {
    let source = source.display().to_string();
    let bodies = [
        (SBOM_SUMMARY, SectionBody::Table(sbom_summary(doc, &source))),
        (SUPPLIER_INFORMATION, SectionBody::Table(supplier_information(doc))),
        (COMPONENTS_SUMMARY, SectionBody::Table(components_summary(table))),
        (DEPENDENCY_SUMMARY, SectionBody::Dependencies(dependency_blocks(doc))),
        (COMPONENTS_TYPE_SUMMARY, SectionBody::Table(counts(table, Column::Type))),
        (LICENSE_SUMMARY, SectionBody::Table(counts(table, Column::License))),
    ];

    let sections = bodies
        .into_iter()
        .enumerate()
        .map(|(i, (title, body))| Section {
            number: i + 1,
            title,
            body,
        })
        .collect();

    let name = doc.text_or(&["metadata", "component", "name"], "");
    let title = if name.is_empty() {
        "SBOM Report".to_string()
    } else {
        format!("SBOM Report: {}", name)
    };

    Report {
        title,
        source,
        sections,
    }
}

fn key_value(rows: Vec<(&str, String)>) -> Table {
    Table {
        kind: TableKind::KeyValue,
        headers: vec!["Item".to_string(), "Details".to_string()],
        rows: rows
            .into_iter()
            .map(|(k, v)| vec![k.to_string(), v])
            .collect(),
    }
}

fn sbom_summary(doc: &Value, source: &str) -> Table {
    key_value(vec![
        ("SBOM File", source.to_string()),
        ("SBOM Type", doc.text_or(&["bomFormat"], "")),
        ("Version", doc.text_or(&["specVersion"], "")),
        ("Name", doc.text_or(&["metadata", "component", "name"], "")),
        ("Created", doc.text_or(&["metadata", "timestamp"], "")),
        ("Packages", doc.list(&["components"]).len().to_string()),
        ("Relationships", doc.list(&["dependencies"]).len().to_string()),
    ])
}

fn supplier_information(doc: &Value) -> Table {
    let contacts = doc.list(&["metadata", "supplier", "contact"]);
    let contact_field = |field: &str| {
        contacts
            .iter()
            .map(|c| c.text_or(&[field], NOT_AVAILABLE))
            .collect::<Vec<_>>()
            .join(", ")
    };

    key_value(vec![
        ("Name", doc.text_or(&["metadata", "supplier", "name"], NOT_AVAILABLE)),
        ("Contact", contact_field("name")),
        ("Email", contact_field("email")),
        (
            "URL",
            doc.texts_or(&["metadata", "supplier", "url"], &[NOT_AVAILABLE])
                .join(", "),
        ),
    ])
}

fn components_summary(table: &ComponentTable) -> Table {
    Table {
        kind: TableKind::Components,
        headers: Column::ALL.iter().map(|c| c.to_string()).collect(),
        rows: table.rows.iter().map(|r| r.cells()).collect(),
    }
}

fn dependency_blocks(doc: &Value) -> Vec<DependencyBlock> {
    doc.list(&["dependencies"])
        .iter()
        .map(|dep| {
            let mut depends_on = dep.texts_or(&["dependsOn"], &[]);
            if depends_on.is_empty() {
                depends_on.push(NO_DEPENDENCIES.to_string());
            }
            DependencyBlock {
                reference: dep.text_or(&["ref"], ""),
                depends_on,
            }
        })
        .collect()
}

fn counts(table: &ComponentTable, column: Column) -> Table {
    Table {
        kind: TableKind::Counts,
        headers: vec![column.to_string(), "Count".to_string()],
        rows: table
            .value_counts(column)
            .into_iter()
            .map(|(value, n)| vec![value, n.to_string()])
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projector::project;
    use serde_json::json;

    fn report_for(doc: &Value) -> Report {
        build(doc, &project(doc), Path::new("sboms/app.json"))
    }

    fn table<'a>(report: &'a Report, title: &str) -> &'a Table {
        let section = report
            .sections
            .iter()
            .find(|s| s.title == title)
            .expect("section present");
        match &section.body {
            SectionBody::Table(t) => t,
            SectionBody::Dependencies(_) => panic!("{} is not a table", title),
        }
    }

    fn blocks(report: &Report) -> &[DependencyBlock] {
        match &report.sections[3].body {
            SectionBody::Dependencies(b) => b,
            SectionBody::Table(_) => panic!("section 4 is not the dependency list"),
        }
    }

    fn detail<'a>(table: &'a Table, item: &str) -> &'a str {
        table
            .rows
            .iter()
            .find(|r| r[0] == item)
            .map(|r| r[1].as_str())
            .expect("row present")
    }

    #[test]
    fn test_six_sections_in_fixed_order() {
        let report = report_for(&json!({}));
        let headings: Vec<String> = report.sections.iter().map(Section::heading).collect();
        assert_eq!(
            headings,
            vec![
                "1. SBOM Summary",
                "2. Supplier Information",
                "3. Components Summary",
                "4. Dependency Summary",
                "5. Components Type Summary",
                "6. License Summary",
            ]
        );
    }

    #[test]
    fn test_summary_fields_and_counts() {
        let doc = json!({
            "bomFormat": "CycloneDX",
            "specVersion": "1.5",
            "metadata": {
                "timestamp": "2024-03-01T10:00:00Z",
                "component": { "name": "shop-backend" }
            },
            "components": [ {"name": "a"}, {"name": "b"}, {"name": "c"} ],
            "dependencies": [ {"ref": "a"}, {"ref": "b"} ]
        });
        let report = report_for(&doc);
        let summary = table(&report, SBOM_SUMMARY);
        assert_eq!(summary.headers, vec!["Item", "Details"]);
        assert_eq!(detail(summary, "SBOM File"), "sboms/app.json");
        assert_eq!(detail(summary, "SBOM Type"), "CycloneDX");
        assert_eq!(detail(summary, "Version"), "1.5");
        assert_eq!(detail(summary, "Name"), "shop-backend");
        assert_eq!(detail(summary, "Created"), "2024-03-01T10:00:00Z");
        assert_eq!(detail(summary, "Packages"), "3");
        assert_eq!(detail(summary, "Relationships"), "2");
        assert_eq!(report.title, "SBOM Report: shop-backend");
    }

    #[test]
    fn test_summary_defaults_when_absent() {
        let report = report_for(&json!({}));
        let summary = table(&report, SBOM_SUMMARY);
        assert_eq!(detail(summary, "SBOM Type"), "");
        assert_eq!(detail(summary, "Packages"), "0");
        assert_eq!(detail(summary, "Relationships"), "0");
    }

    #[test]
    fn test_supplier_information() {
        let doc = json!({
            "metadata": {
                "supplier": {
                    "name": "Acme Corp",
                    "contact": [
                        { "name": "Jane", "email": "jane@acme.example" },
                        { "email": "ops@acme.example" }
                    ],
                    "url": [ "https://acme.example", "https://acme.example/security" ]
                }
            }
        });
        let report = report_for(&doc);
        let supplier = table(&report, SUPPLIER_INFORMATION);
        assert_eq!(detail(supplier, "Name"), "Acme Corp");
        assert_eq!(detail(supplier, "Contact"), "Jane, N/A");
        assert_eq!(detail(supplier, "Email"), "jane@acme.example, ops@acme.example");
        assert_eq!(
            detail(supplier, "URL"),
            "https://acme.example, https://acme.example/security"
        );
    }

    #[test]
    fn test_supplier_defaults() {
        let report = report_for(&json!({ "metadata": {} }));
        let supplier = table(&report, SUPPLIER_INFORMATION);
        assert_eq!(detail(supplier, "Name"), "N/A");
        assert_eq!(detail(supplier, "Contact"), "");
        assert_eq!(detail(supplier, "Email"), "");
        assert_eq!(detail(supplier, "URL"), "N/A");
    }

    #[test]
    fn test_round_trip_scenario() {
        let doc = json!({
            "bomFormat": "CycloneDX",
            "specVersion": "1.4",
            "components": [{
                "name": "libfoo",
                "version": "1.0",
                "type": "library",
                "licenses": [{ "license": { "name": "MIT" } }]
            }],
            "dependencies": []
        });
        let report = report_for(&doc);
        let components = table(&report, COMPONENTS_SUMMARY);
        assert_eq!(components.headers, vec!["Name", "Version", "Type", "License"]);
        assert_eq!(components.rows, vec![vec!["libfoo", "1.0", "library", "MIT"]]);
        assert!(blocks(&report).is_empty());
    }

    #[test]
    fn test_no_components_gives_empty_count_tables() {
        let report = report_for(&json!({ "bomFormat": "CycloneDX" }));
        assert!(table(&report, COMPONENTS_SUMMARY).rows.is_empty());

        let types = table(&report, COMPONENTS_TYPE_SUMMARY);
        assert_eq!(types.headers, vec!["Type", "Count"]);
        assert!(types.rows.is_empty());

        let licenses = table(&report, LICENSE_SUMMARY);
        assert_eq!(licenses.headers, vec!["License", "Count"]);
        assert!(licenses.rows.is_empty());
    }

    #[test]
    fn test_count_tables() {
        let doc = json!({
            "components": [
                { "type": "library", "licenses": [{ "license": { "name": "MIT" } }] },
                { "type": "framework", "licenses": [{ "license": { "name": "MIT" } }] },
                { "type": "library" }
            ]
        });
        let report = report_for(&doc);
        assert_eq!(
            table(&report, COMPONENTS_TYPE_SUMMARY).rows,
            vec![vec!["library", "2"], vec!["framework", "1"]]
        );
        assert_eq!(
            table(&report, LICENSE_SUMMARY).rows,
            vec![vec!["MIT", "2"], vec!["", "1"]]
        );
    }

    #[test]
    fn test_dependency_blocks() {
        let doc = json!({
            "dependencies": [
                { "ref": "pkg:npm/app@1.0.0", "dependsOn": [ "pkg:npm/lodash@4.17.21", "pkg:npm/express@4.18.2" ] },
                { "ref": "pkg:npm/lodash@4.17.21" },
                { "ref": "pkg:npm/express@4.18.2", "dependsOn": [] }
            ]
        });
        let report = report_for(&doc);
        let blocks = blocks(&report);
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].reference, "pkg:npm/app@1.0.0");
        assert_eq!(
            blocks[0].depends_on,
            vec!["pkg:npm/lodash@4.17.21", "pkg:npm/express@4.18.2"]
        );
        assert_eq!(blocks[1].depends_on, vec!["None"]);
        assert_eq!(blocks[2].depends_on, vec!["None"]);
    }

    #[test]
    fn test_serializes_to_json() {
        let report = report_for(&json!({ "components": [ { "name": "libfoo" } ] }));
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["sections"][2]["body"]["table"]["kind"], "components");
        assert_eq!(value["sections"][2]["body"]["table"]["rows"][0][0], "libfoo");
    }
}
