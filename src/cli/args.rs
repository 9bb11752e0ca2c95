//! CLI argument definitions for GA Analytics

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use ga_analytics::config::ConfigOverrides;
use ga_analytics::logger::Level;

/// CLI log level argument
///
/// Converts to lowercase strings for config storage and to
/// `logger::Level` for runtime use.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let as_str = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        };
        write!(f, "{as_str}")
    }
}

/// Report output format argument
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum FormatArg {
    /// Markdown tables
    #[value(alias = "markdown")]
    Md,
    /// Self-contained HTML page
    Html,
    /// JSON document
    Json,
}

impl From<FormatArg> for ga_analytics::core::report::ReportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Md => Self::Markdown,
            FormatArg::Html => Self::Html,
            FormatArg::Json => Self::Json,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    /// If no KEY is provided, displays all configuration values.
    Get {
        /// Optional configuration key to display (e.g., `level`, `store_file`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Unset a configuration value.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Check the record store for integrity problems.
    ///
    /// Reports dangling outcome references, bad marks and weightage sums
    /// that miss 100. Exits with status 1 when errors are found.
    Validate {
        /// Print the findings as JSON
        #[arg(long)]
        json: bool,
    },
    /// Compute GA scores for every result of an assessment.
    Score {
        /// Assessment id
        #[arg(long, value_name = "ID")]
        assessment: String,

        /// Derive levels from each student's percentage instead of the mapping target
        #[arg(long)]
        measured: bool,

        /// Store the computed scores back into the record store
        #[arg(long)]
        write: bool,
    },
    /// Generate an outcome report.
    ///
    /// Aggregates performance, GA attainment and mapping coverage for the
    /// selected courses and cohort.
    Report {
        /// Restrict to one course id
        #[arg(long, value_name = "ID")]
        course: Option<String>,

        /// Restrict to students of a batch
        #[arg(long, value_name = "BATCH")]
        batch: Option<String>,

        /// Restrict to students of a section
        #[arg(long, value_name = "SECTION")]
        section: Option<String>,

        /// Build the report as this faculty member (only their courses)
        #[arg(long, value_name = "ID")]
        faculty: Option<String>,

        /// Report format
        #[arg(short, long, value_enum, default_value = "md")]
        format: FormatArg,

        /// Output file path (defaults to a generated name in the reports directory)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

#[derive(Parser, Debug)]
#[command(
    name = "gaanalytics",
    about = "Graduate attribute and outcome analytics",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    /// Enable debug-level logging and runtime debug flag (shorthand)
    #[arg(long = "debug", global = true)]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    // --- Config overrides ---
    /// Override the record store file
    #[arg(long = "store", value_name = "FILE", global = true)]
    pub store: Option<PathBuf>,

    /// Override the reports output directory
    #[arg(long = "reports-dir", value_name = "DIR", global = true)]
    pub reports_dir: Option<PathBuf>,

    /// Override the allowed distance of a weightage sum from 100
    #[arg(long = "weight-tolerance", value_name = "TOLERANCE", global = true,
          value_parser = ga_analytics::config::parse_tolerance)]
    pub weight_tolerance: Option<f64>,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Convert CLI flags into config overrides
    ///
    /// `None` fields leave the loaded config untouched.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        let measured = matches!(self.command, Command::Score { measured: true, .. });
        ConfigOverrides {
            store_file: self.store.as_ref().map(|p| p.to_string_lossy().to_string()),
            reports_dir: self
                .reports_dir
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            weight_tolerance: self.weight_tolerance,
            level_policy: measured.then(|| "measured".to_string()),
            ..ConfigOverrides::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_log_level_display() {
        assert_eq!(LogLevelArg::Error.to_string(), "error");
        assert_eq!(LogLevelArg::Warn.to_string(), "warn");
        assert_eq!(LogLevelArg::Info.to_string(), "info");
        assert_eq!(LogLevelArg::Debug.to_string(), "debug");
    }

    #[test]
    fn test_log_level_to_logger_level() {
        assert_eq!(Level::from(LogLevelArg::Error), Level::Error);
        assert_eq!(Level::from(LogLevelArg::Debug), Level::Debug);
    }

    #[test]
    fn test_to_config_overrides_empty() {
        let cli = Cli::parse_from(["gaanalytics", "validate"]);

        let overrides = cli.to_config_overrides();
        assert!(overrides.store_file.is_none());
        assert!(overrides.reports_dir.is_none());
        assert!(overrides.weight_tolerance.is_none());
        assert!(overrides.level_policy.is_none());
    }

    #[test]
    fn test_to_config_overrides_with_values() {
        let cli = Cli::parse_from([
            "gaanalytics",
            "--store",
            "/tmp/store.json",
            "score",
            "--assessment",
            "a-1",
            "--measured",
            "--weight-tolerance",
            "0.5",
        ]);

        let overrides = cli.to_config_overrides();
        assert_eq!(overrides.store_file.as_deref(), Some("/tmp/store.json"));
        assert_eq!(overrides.weight_tolerance, Some(0.5));
        assert_eq!(overrides.level_policy.as_deref(), Some("measured"));
    }

    #[test]
    fn test_negative_tolerance_is_rejected() {
        let parsed = Cli::try_parse_from(["gaanalytics", "--weight-tolerance", "-2", "validate"]);

        assert!(parsed.is_err());
    }

    #[test]
    fn test_report_arguments() {
        let cli = Cli::parse_from([
            "gaanalytics",
            "report",
            "--course",
            "c-1",
            "--section",
            "A",
            "--faculty",
            "f-1",
            "-f",
            "html",
        ]);

        match cli.command {
            Command::Report {
                course,
                section,
                faculty,
                format,
                output,
                ..
            } => {
                assert_eq!(course.as_deref(), Some("c-1"));
                assert_eq!(section.as_deref(), Some("A"));
                assert_eq!(faculty.as_deref(), Some("f-1"));
                assert_eq!(format, FormatArg::Html);
                assert!(output.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
