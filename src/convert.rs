//! Input handling and the per-file conversion loop.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::{LayoutConfig, OnError};
use crate::error::ConvertError;
use crate::loader;
use crate::projector;
use crate::report::{self, Report};

const SBOM_EXTENSION: &str = "json";
const PDF_EXTENSION: &str = "pdf";

/// The positional CLI argument, resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    File(PathBuf),
    Directory(PathBuf),
}

impl Input {
    pub fn from_path(path: &Path) -> Result<Self, ConvertError> {
        if path.is_dir() {
            return Ok(Input::Directory(path.to_path_buf()));
        }
        if path.is_file() && has_sbom_extension(path) {
            return Ok(Input::File(path.to_path_buf()));
        }

        let reason = if path.exists() {
            "not a .json file"
        } else {
            "no such file or directory"
        };
        Err(ConvertError::InvalidArgument {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        })
    }

    /// Every SBOM this input stands for, in processing order.
    pub fn sbom_files(&self) -> Vec<PathBuf> {
        match self {
            Input::File(path) => vec![path.clone()],
            Input::Directory(dir) => find_sbom_files(dir),
        }
    }
}

fn has_sbom_extension(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == SBOM_EXTENSION)
}

/// All `.json` files below `dir`, subdirectories included, sorted by path.
pub fn find_sbom_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(err) => {
                warn!(error = %err, "skipping unreadable directory entry");
                None
            }
        })
        .filter(|e| e.file_type().is_file() && has_sbom_extension(e.path()))
        .map(|e| e.into_path())
        .collect();
    files.sort();
    debug!(dir = %dir.display(), count = files.len(), "found SBOM files");
    files
}

/// `<output_dir>/<stem>.pdf`. Inputs sharing a stem map to the same output.
pub fn output_path(json_path: &Path, output_dir: &Path) -> PathBuf {
    let mut name = json_path
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| "sbom".into());
    name.push(".");
    name.push(PDF_EXTENSION);
    output_dir.join(name)
}

/// Load, project and assemble the report for one SBOM.
pub fn build_report(json_path: &Path) -> Result<Report, ConvertError> {
    let doc = loader::load(json_path)?;
    let table = projector::project(&doc);
    Ok(report::build(&doc, &table, json_path))
}

/// Convert one SBOM into `<output_dir>/<stem>.pdf`, creating the directory if
/// needed. Returns the path written.
pub fn convert_to_pdf(
    json_path: &Path,
    output_dir: &Path,
    layout: &LayoutConfig,
) -> Result<PathBuf, ConvertError> {
    let report = build_report(json_path)?;
    std::fs::create_dir_all(output_dir).map_err(|e| ConvertError::io(output_dir, e))?;

    let pdf_path = output_path(json_path, output_dir);
    report::pdf::render(&report, layout, &pdf_path)?;
    Ok(pdf_path)
}

/// Outcome of a batch that ran to the end.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub succeeded: usize,
    /// Files that failed under [`OnError::Skip`], with their errors.
    pub failed: Vec<(PathBuf, ConvertError)>,
}

/// Apply `convert` to each file in order. Under [`OnError::Abort`] the first
/// error ends the batch and is returned as is.
pub fn run_batch<F>(
    files: &[PathBuf],
    on_error: OnError,
    mut convert: F,
) -> Result<BatchOutcome, ConvertError>
where
    F: FnMut(&Path) -> Result<(), ConvertError>,
{
    let mut outcome = BatchOutcome::default();

    for file in files {
        match convert(file) {
            Ok(()) => outcome.succeeded += 1,
            Err(err) => match on_error {
                OnError::Abort => return Err(err),
                OnError::Skip => {
                    warn!(file = %file.display(), error = %err, "skipping SBOM");
                    outcome.failed.push((file.clone(), err));
                }
            },
        }
    }

    Ok(outcome)
}
