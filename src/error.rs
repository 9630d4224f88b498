use std::path::PathBuf;

use thiserror::Error;

/// Everything that can stop an SBOM from becoming a report.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The positional path is neither a `.json` file nor a directory.
    #[error("invalid input {}: {reason}", path.display())]
    InvalidArgument { path: PathBuf, reason: String },

    #[error("SBOM file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("I/O error at {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in {}", path.display())]
    MalformedJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The document could not be laid out or serialized.
    #[error("failed to render report: {0}")]
    Render(String),
}

impl ConvertError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConvertError::Io {
            path: path.into(),
            source,
        }
    }
}
