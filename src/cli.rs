//! Command-line arguments. Every option can also be set through a `SCORETREE_*`
//! environment variable; explicit flags win.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::report::ReportFormat;
use crate::session::Settings;

/// Keeps named scores in a size-augmented search tree and prints the final standings
#[derive(Parser, Debug)]
#[command(name = "scoretree")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Command file to read; standard input when omitted or `-`
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Format of the closing report
    #[arg(long, value_enum, env = "SCORETREE_FORMAT", default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Abort on the first malformed line instead of skipping it
    #[arg(long, env = "SCORETREE_STRICT")]
    pub strict: bool,

    /// Check tree invariants after every mutating command
    #[arg(long, env = "SCORETREE_VERIFY")]
    pub verify: bool,

    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub debug: u8,
}

impl Cli {
    /// The input path, with `-` meaning standard input.
    pub fn input_path(&self) -> Option<&PathBuf> {
        self.input.as_ref().filter(|path| path.as_os_str() != "-")
    }

    pub fn settings(&self) -> Settings {
        Settings {
            format: self.format,
            strict: self.strict,
            verify: self.verify,
        }
    }
}
