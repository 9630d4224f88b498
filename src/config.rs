use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Root configuration structure, deserialized from `.sbom-report/config.toml`.
/// Every table and field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output: OutputConfig,
    pub layout: LayoutConfig,
    pub batch: BatchConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory the PDF reports are written to, relative to the working directory.
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            dir: PathBuf::from("pdf_conversions"),
        }
    }
}

/// Page geometry and type sizes, in PDF points.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub page_size: PageSize,
    pub margin_left: f32,
    pub margin_right: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub heading_font_size: f32,
    pub body_font_size: f32,
    pub table_font_size: f32,
    pub component_font_size: f32,
    /// Widths of the Name / Version / Type / License columns.
    pub component_columns: [f32; 4],
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            page_size: PageSize::Letter,
            margin_left: 40.0,
            margin_right: 40.0,
            margin_top: 20.0,
            margin_bottom: 20.0,
            heading_font_size: 14.0,
            body_font_size: 10.0,
            table_font_size: 10.0,
            component_font_size: 8.0,
            component_columns: [250.0, 100.0, 100.0, 200.0],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    Letter,
    A4,
}

impl PageSize {
    /// Landscape `(width, height)` in points.
    pub fn landscape(self) -> (f32, f32) {
        match self {
            PageSize::Letter => (792.0, 612.0),
            PageSize::A4 => (841.89, 595.28),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub on_error: OnError,
}

/// What a directory run does when one SBOM fails to convert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnError {
    /// Stop at the first failure and report it.
    #[default]
    Abort,
    /// Log the failure and continue with the next file.
    Skip,
}

/// Load the configuration, searching in order:
///
/// 1. `config_override`: path passed via `--config`
/// 2. `./.sbom-report/config.toml`
/// 3. `~/.config/sbom-report/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let local_config = Path::new(".sbom-report").join("config.toml");
    if local_config.exists() {
        return read_config(&local_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home.join(".config").join("sbom-report").join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Invalid config {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.output.dir, PathBuf::from("pdf_conversions"));
        assert_eq!(cfg.layout.page_size, PageSize::Letter);
        assert_eq!(cfg.layout.margin_left, 40.0);
        assert_eq!(cfg.layout.margin_top, 20.0);
        assert_eq!(cfg.batch.on_error, OnError::Abort);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut f = NamedTempFile::new().unwrap();
        write!(
            f,
            r#"
[layout]
page_size = "a4"
margin_left = 30.0

[batch]
on_error = "skip"
"#
        )
        .unwrap();
        let cfg = load_config(Some(f.path())).unwrap();
        assert_eq!(cfg.layout.page_size, PageSize::A4);
        assert_eq!(cfg.layout.margin_left, 30.0);
        assert_eq!(cfg.layout.margin_right, 40.0);
        assert_eq!(cfg.layout.component_columns, [250.0, 100.0, 100.0, 200.0]);
        assert_eq!(cfg.batch.on_error, OnError::Skip);
        assert_eq!(cfg.output.dir, PathBuf::from("pdf_conversions"));
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let mut f = NamedTempFile::new().unwrap();
        write!(f, "[batch]\non_error = \"retry\"\n").unwrap();
        assert!(load_config(Some(f.path())).is_err());
    }

    #[test]
    fn test_landscape_is_wider_than_tall() {
        for size in [PageSize::Letter, PageSize::A4] {
            let (w, h) = size.landscape();
            assert!(w > h);
        }
    }
}
