use indexmap::IndexMap;
use serde::Serialize;

/// One flattened `components[]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentRow {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Version")]
    pub version: String,
    #[serde(rename = "Type")]
    pub kind: String,
    /// Every license name of the component, joined with `", "`.
    #[serde(rename = "License")]
    pub license: String,
}

impl ComponentRow {
    pub fn get(&self, column: Column) -> &str {
        match column {
            Column::Name => &self.name,
            Column::Version => &self.version,
            Column::Type => &self.kind,
            Column::License => &self.license,
        }
    }

    /// Cells in [`Column::ALL`] order.
    pub fn cells(&self) -> Vec<String> {
        Column::ALL.iter().map(|c| self.get(*c).to_string()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Name,
    Version,
    Type,
    License,
}

impl Column {
    pub const ALL: [Column; 4] = [Column::Name, Column::Version, Column::Type, Column::License];
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Column::Name => write!(f, "Name"),
            Column::Version => write!(f, "Version"),
            Column::Type => write!(f, "Type"),
            Column::License => write!(f, "License"),
        }
    }
}

/// The component table, in source order. Rows are never filtered,
/// deduplicated or sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ComponentTable {
    pub rows: Vec<ComponentRow>,
}

impl ComponentTable {
    /// Occurrences of each distinct value in `column`, most frequent first.
    /// Equal counts keep the order in which the values first appear.
    pub fn value_counts(&self, column: Column) -> Vec<(String, usize)> {
        let mut counts: IndexMap<&str, usize> = IndexMap::new();
        for row in &self.rows {
            *counts.entry(row.get(column)).or_insert(0) += 1;
        }

        let mut pairs: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(value, n)| (value.to_string(), n))
            .collect();
        // sort_by is stable: ties stay in first-appearance order
        pairs.sort_by(|a, b| b.1.cmp(&a.1));
        pairs
    }
}
