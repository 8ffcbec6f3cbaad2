use std::str::{FromStr, SplitWhitespace};

use crate::entry::truncate_key;
use crate::error::CommandError;

/// One line of session input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `add NAME POINTS`
    Add { name: String, points: i64 },
    /// `sub NAME POINTS`
    Sub { name: String, points: i64 },
    /// `set NAME POINTS`
    Set { name: String, points: i64 },
    /// `search NAME`, also accepted as `find NAME`
    Find { name: String },
    /// `count_smaller NAME`, also accepted as `rank NAME`
    Rank { name: String },
    /// `del NAME`
    Del { name: String },
}

impl Command {
    /// Parses a line, returning `Ok(None)` for blank lines and `#` comments.
    pub fn parse_line(line: &str) -> Result<Option<Command>, CommandError> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(None);
        }
        trimmed.parse().map(Some)
    }

    pub fn name(&self) -> &str {
        match self {
            Command::Add { name, .. }
            | Command::Sub { name, .. }
            | Command::Set { name, .. }
            | Command::Find { name }
            | Command::Rank { name }
            | Command::Del { name } => name,
        }
    }

    pub fn is_mutation(&self) -> bool {
        !matches!(self, Command::Find { .. } | Command::Rank { .. })
    }
}

/// Accepted spellings and the verb each one stands for.
const VERBS: [(&str, &str); 8] = [
    ("add", "add"),
    ("sub", "sub"),
    ("del", "del"),
    ("search", "search"),
    ("count_smaller", "count_smaller"),
    ("set", "set"),
    ("find", "search"),
    ("rank", "count_smaller"),
];

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace();
        let raw = tokens.next().ok_or(CommandError::Empty)?;
        let (_, verb) = VERBS
            .into_iter()
            .find(|(spelling, _)| spelling.eq_ignore_ascii_case(raw))
            .ok_or_else(|| CommandError::UnknownVerb(raw.to_string()))?;

        let mut args = Args { tokens, verb };
        let command = match verb {
            "add" => Command::Add {
                name: args.name()?,
                points: args.points()?,
            },
            "sub" => Command::Sub {
                name: args.name()?,
                points: args.points()?,
            },
            "set" => Command::Set {
                name: args.name()?,
                points: args.points()?,
            },
            "search" => Command::Find { name: args.name()? },
            "count_smaller" => Command::Rank { name: args.name()? },
            _ => Command::Del { name: args.name()? },
        };

        match args.tokens.next() {
            Some(extra) => Err(CommandError::TrailingArgument(extra.to_string())),
            None => Ok(command),
        }
    }
}

struct Args<'a> {
    tokens: SplitWhitespace<'a>,
    verb: &'static str,
}

impl Args<'_> {
    fn name(&mut self) -> Result<String, CommandError> {
        let name = self.tokens.next().ok_or(CommandError::MissingArgument {
            verb: self.verb,
            what: "name",
        })?;
        Ok(truncate_key(name).to_string())
    }

    fn points(&mut self) -> Result<i64, CommandError> {
        let raw = self.tokens.next().ok_or(CommandError::MissingArgument {
            verb: self.verb,
            what: "points value",
        })?;
        raw.parse()
            .map_err(|_| CommandError::InvalidPoints(raw.to_string()))
    }
}
