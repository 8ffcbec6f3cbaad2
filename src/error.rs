use std::io;

use thiserror::Error;

/// Exit codes, following the BSD `sysexits.h` values.
pub mod exitcode {
    pub const DATAERR: i32 = 65;
    pub const SOFTWARE: i32 = 70;
    pub const IOERR: i32 = 74;
}

/// A command line that could not be parsed.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command `{0}`")]
    UnknownVerb(String),

    #[error("`{verb}` expects a {what}")]
    MissingArgument { verb: &'static str, what: &'static str },

    #[error("invalid points value `{0}`")]
    InvalidPoints(String),

    #[error("unexpected trailing argument `{0}`")]
    TrailingArgument(String),
}

/// A broken structural invariant, as reported by `OrderedTree::verify`.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum InvariantError {
    #[error("node `{key}` records subtree size {recorded}, actual size is {actual}")]
    SizeMismatch {
        key: String,
        recorded: usize,
        actual: usize,
    },

    #[error("key `{later}` appears after `{earlier}` in key order")]
    OutOfOrder { earlier: String, later: String },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Io(#[from] io::Error),

    #[error("line {line}: {source}")]
    Command {
        line: usize,
        #[source]
        source: CommandError,
    },

    #[error("cannot render report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("tree invariant violated: {0}")]
    Invariant(#[from] InvariantError),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Io(_) => exitcode::IOERR,
            Error::Command { .. } => exitcode::DATAERR,
            Error::Json(_) | Error::Invariant(_) => exitcode::SOFTWARE,
        }
    }
}
