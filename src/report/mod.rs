//! The six-section SBOM report and its renderers.
//!
//! - [`model`]: builds the format-independent [`Report`] from a parsed SBOM.
//! - [`pdf`]: paginated landscape PDF via `printpdf`.
//! - [`terminal`]: tabular preview on stdout.

pub mod model;
pub mod pdf;
pub mod terminal;

pub use model::{build, Report};
