//! Path lookups over the untyped SBOM tree, with the fallback values used
//! throughout the report.
//!
//! Absent data is never an error here: every accessor either returns the
//! caller's default or an empty list.

use serde_json::Value;

/// Placeholder for supplier fields and contacts with no value.
pub const NOT_AVAILABLE: &str = "N/A";

/// Placeholder for a dependency that declares no `dependsOn` entries.
pub const NO_DEPENDENCIES: &str = "None";

pub trait Lookup {
    /// Walk an object path such as `["metadata", "component", "name"]`.
    fn lookup(&self, path: &[&str]) -> Option<&Value>;

    /// Text at `path`, or `default` when the path is absent or `null`.
    fn text_or(&self, path: &[&str], default: &str) -> String {
        self.lookup(path)
            .and_then(scalar_text)
            .unwrap_or_else(|| default.to_string())
    }

    /// Array at `path`; anything that is not an array reads as empty.
    fn list(&self, path: &[&str]) -> &[Value] {
        self.lookup(path)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Text of every element of the array at `path`, or `default` when the
    /// array itself is absent. A present but empty array stays empty.
    fn texts_or(&self, path: &[&str], default: &[&str]) -> Vec<String> {
        match self.lookup(path).and_then(Value::as_array) {
            Some(items) => items.iter().filter_map(scalar_text).collect(),
            None => default.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Lookup for Value {
    fn lookup(&self, path: &[&str]) -> Option<&Value> {
        path.iter().try_fold(self, |node, key| node.get(*key))
    }
}

/// Render a scalar the way the report shows it: strings verbatim, numbers and
/// booleans as their JSON text. `null` counts as missing.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_text() {
        let doc = json!({ "metadata": { "component": { "name": "acme" } } });
        assert_eq!(doc.text_or(&["metadata", "component", "name"], ""), "acme");
    }

    #[test]
    fn test_missing_path_uses_default() {
        let doc = json!({ "metadata": {} });
        assert_eq!(doc.text_or(&["metadata", "supplier", "name"], NOT_AVAILABLE), "N/A");
        assert_eq!(doc.text_or(&["bomFormat"], ""), "");
    }

    #[test]
    fn test_null_counts_as_missing() {
        let doc = json!({ "name": null });
        assert_eq!(doc.text_or(&["name"], "fallback"), "fallback");
    }

    #[test]
    fn test_non_string_scalars() {
        let doc = json!({ "version": 3, "flag": true });
        assert_eq!(doc.text_or(&["version"], ""), "3");
        assert_eq!(doc.text_or(&["flag"], ""), "true");
    }

    #[test]
    fn test_list_absent_or_wrong_type_is_empty() {
        let doc = json!({ "components": "oops" });
        assert!(doc.list(&["components"]).is_empty());
        assert!(doc.list(&["dependencies"]).is_empty());
    }

    #[test]
    fn test_texts_or_distinguishes_absent_from_empty() {
        let absent = json!({});
        let empty = json!({ "url": [] });
        assert_eq!(absent.texts_or(&["url"], &[NOT_AVAILABLE]), vec!["N/A"]);
        assert!(empty.texts_or(&["url"], &[NOT_AVAILABLE]).is_empty());
    }
}
