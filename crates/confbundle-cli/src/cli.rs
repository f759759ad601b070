//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "confbundle",
    version,
    about = "Build repository upload bundles from conference metadata and publication files",
    long_about = "Build repository upload bundles from conference metadata and publication files.\n\n\
                  Each <metadata> record of the conference metadata file is matched to its PDF\n\
                  (and TEI XML) by filename and written as a bundle directory with a JSON manifest."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Configuration file (default: ./confbundle.toml when present).
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create bundles for one conference.
    Bundle(BundleArgs),

    /// Show how the files of a directory are keyed for matching.
    Inspect(InspectArgs),
}

#[derive(Parser)]
pub struct BundleArgs {
    /// Conference name; selects `<input_base>/<NAME>` and `<output_base>/<NAME>`.
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Conference metadata XML file.
    #[arg(value_name = "METADATA")]
    pub metadata: PathBuf,

    /// Assign files strictly in sorted order instead of by name.
    #[arg(long = "sequenced")]
    pub sequenced: bool,

    /// PDF directory, relative to the conference input directory.
    #[arg(long = "pdf", value_name = "DIR", default_value = "pdf")]
    pub pdf: PathBuf,

    /// TEI XML directory, relative to the conference input directory.
    /// Enables PDF+XML bundles.
    #[arg(long = "xml", value_name = "DIR")]
    pub xml: Option<PathBuf>,

    /// Bundle output directory (default: <output_base>/<NAME>).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Match and report without writing bundles or the audit CSV.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct InspectArgs {
    /// Directory of publication files.
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
