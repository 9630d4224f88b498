use std::io::ErrorKind;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::error::ConvertError;

/// Read and parse an SBOM file. No schema checks are made beyond "is JSON".
pub fn load(path: &Path) -> Result<Value, ConvertError> {
    debug!(path = %path.display(), "reading SBOM");

    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ConvertError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => ConvertError::io(path, e),
    })?;

    serde_json::from_str(&content).map_err(|source| ConvertError::MalformedJson {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_valid_json() {
        let mut f = NamedTempFile::new().unwrap();
        write!(f, r#"{{"bomFormat": "CycloneDX", "components": []}}"#).unwrap();
        let doc = load(f.path()).unwrap();
        assert_eq!(doc["bomFormat"], "CycloneDX");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConvertError::FileNotFound { .. }));
    }

    #[test]
    fn test_malformed_json() {
        let mut f = NamedTempFile::new().unwrap();
        write!(f, "{{ \"components\": [ ").unwrap();
        let err = load(f.path()).unwrap_err();
        assert!(matches!(err, ConvertError::MalformedJson { .. }));
    }
}
