use clap::{Parser, ValueEnum};
use resbond::core::io::output::OutputFormat;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "resbond - Build a database of intra-residue bonds from an archive of MMTF records.",
    help_template = HELP_TEMPLATE,
)]
pub struct Cli {
    /// Path to the uncompressed tar archive containing the MMTF records.
    #[arg(required = true, value_name = "ARCHIVE")]
    pub archive: PathBuf,

    // --- Output ---
    /// Path of the bond database to write [default: bonds.json].
    #[arg(short, long = "outfile", value_name = "PATH")]
    pub outfile: Option<PathBuf>,

    /// Serialization format. Inferred from the output extension if omitted.
    #[arg(long, value_enum, value_name = "FORMAT")]
    pub format: Option<FormatArg>,

    /// Emit the bond order as a third element of every bond entry.
    #[arg(long)]
    pub include_order: bool,

    // --- Aggregation ---
    /// Minimum number of observations a bond needs to be kept [default: 0].
    #[arg(short, long, value_name = "INT")]
    pub threshold: Option<u64>,

    /// Number of records processed by one worker task [default: 1000].
    #[arg(short = 'c', long = "chunksize", value_name = "INT")]
    pub chunk_size: Option<usize>,

    /// Skip individual unreadable records instead of discarding their whole chunk.
    #[arg(long)]
    pub isolate_records: bool,

    // --- Configuration ---
    /// Path to an optional configuration file in TOML format.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S aggregation.threshold=5
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE")]
    pub set_values: Vec<String>,

    // --- Runtime ---
    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel extraction.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg {
    Json,
    #[value(alias = "messagepack")]
    Msgpack,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Msgpack => OutputFormat::MessagePack,
        }
    }
}
