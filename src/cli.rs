use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "sbom-report",
    about = "Render CycloneDX SBOM JSON files as printable PDF reports",
    version
)]
pub struct Cli {
    /// SBOM .json file, or a directory searched recursively for .json files
    pub path: PathBuf,

    /// Directory the PDF reports are written to [default: pdf_conversions]
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Config file [default: ./.sbom-report/config.toml, fallback ~/.config/sbom-report/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Report format
    #[arg(long, default_value = "pdf", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// Skip SBOMs that fail to convert instead of aborting the batch
    #[arg(long)]
    pub keep_going: bool,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// No confirmations or progress bar
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, clap::ValueEnum)]
pub enum ReportFormat {
    Pdf,
    Terminal,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_positional() {
        let cli = Cli::try_parse_from(["sbom-report", "sboms/"]).unwrap();
        assert_eq!(cli.path, PathBuf::from("sboms/"));
        assert_eq!(cli.report, ReportFormat::Pdf);
        assert!(cli.output_dir.is_none());
        assert!(!cli.keep_going);
    }

    #[test]
    fn test_path_is_required() {
        assert!(Cli::try_parse_from(["sbom-report"]).is_err());
    }

    #[test]
    fn test_extra_positional_rejected() {
        assert!(Cli::try_parse_from(["sbom-report", "a.json", "b.json"]).is_err());
    }

    #[test]
    fn test_options() {
        let cli = Cli::try_parse_from([
            "sbom-report",
            "app.json",
            "--output-dir",
            "out",
            "--report",
            "terminal",
            "--keep-going",
        ])
        .unwrap();
        assert_eq!(cli.output_dir, Some(PathBuf::from("out")));
        assert_eq!(cli.report, ReportFormat::Terminal);
        assert!(cli.keep_going);
    }
}
