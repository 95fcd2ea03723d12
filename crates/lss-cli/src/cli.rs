//! CLI argument definitions for the label sheet tool.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use lss_model::{FontWeight, TextAlign};

#[derive(Parser)]
#[command(
    name = "label-sheet",
    version,
    about = "Turn a table of records into printable label sheets",
    long_about = "Turn a table of records into printable label sheets.\n\n\
                  Records are read from CSV or JSON. Sheet layout, fonts and the \
                  per-column positions are kept in a JSON options file."
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

    /// Allow record values in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the available sheet templates.
    Templates,

    /// Render records onto label sheets.
    Render(RenderArgs),

    /// Reconcile and save the column layout for a record set.
    Layout(LayoutArgs),

    /// Change the position or style of one column and save it.
    Style(StyleArgs),
}

/// Record source shared by every data command.
#[derive(Args)]
pub struct SourceArgs {
    /// CSV or JSON file with the records.
    #[arg(long = "records", value_name = "FILE")]
    pub records: PathBuf,

    /// Column holding the number of labels per record.
    #[arg(long = "count-column", value_name = "NAME")]
    pub count_column: Option<String>,
}

#[derive(Args)]
pub struct RenderArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Options file (JSON object). Not modified by rendering.
    #[arg(long = "options", value_name = "FILE")]
    pub options: Option<PathBuf>,

    /// Template id, overriding the options file.
    #[arg(long = "template", value_name = "ID")]
    pub template: Option<String>,

    /// Leading blank slots, overriding the options file.
    #[arg(long = "blanks", value_name = "N")]
    pub blanks: Option<usize>,

    /// Output format.
    #[arg(long = "output", value_enum, default_value = "text")]
    pub output: OutputArg,
}

#[derive(Args)]
pub struct LayoutArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Options file (JSON object); created if missing.
    #[arg(long = "options", value_name = "FILE")]
    pub options: PathBuf,
}

#[derive(Args)]
pub struct StyleArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Options file (JSON object); created if missing.
    #[arg(long = "options", value_name = "FILE")]
    pub options: PathBuf,

    /// Column to edit.
    #[arg(long = "column", value_name = "NAME")]
    pub column: String,

    /// Font size in points.
    #[arg(long = "font-size", value_name = "PT")]
    pub font_size: Option<f64>,

    /// Text color (CSS color).
    #[arg(long = "color", value_name = "COLOR")]
    pub color: Option<String>,

    #[arg(long = "align", value_enum)]
    pub align: Option<AlignArg>,

    #[arg(long = "weight", value_enum)]
    pub weight: Option<WeightArg>,

    /// Horizontal position in percent of the label width.
    #[arg(long = "x", value_name = "PERCENT", allow_negative_numbers = true)]
    pub x: Option<f64>,

    /// Vertical position in percent of the label height.
    #[arg(long = "y", value_name = "PERCENT", allow_negative_numbers = true)]
    pub y: Option<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputArg {
    Text,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum AlignArg {
    Left,
    Center,
    Right,
}

impl From<AlignArg> for TextAlign {
    fn from(value: AlignArg) -> Self {
        match value {
            AlignArg::Left => Self::Left,
            AlignArg::Center => Self::Center,
            AlignArg::Right => Self::Right,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum WeightArg {
    Normal,
    Bold,
}

impl From<WeightArg> for FontWeight {
    fn from(value: WeightArg) -> Self {
        match value {
            WeightArg::Normal => Self::Normal,
            WeightArg::Bold => Self::Bold,
        }
    }
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
