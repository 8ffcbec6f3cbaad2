use std::fmt;
use std::io::{BufRead, Write};

use tracing::{debug, info, warn};

use crate::command::Command;
use crate::error::{Error, Result};
use crate::report::{Report, ReportFormat};
use crate::tree::{Decrease, Lookup, OrderedTree};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Settings {
    pub format: ReportFormat,
    /// Stop at the first malformed line instead of skipping it.
    pub strict: bool,
    /// Check tree invariants after every mutating command.
    pub verify: bool,
}

/// What a single command produced, rendered as one output line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Score { name: String, score: i64 },
    Found { name: String, score: i64, depth: usize },
    Count(usize),
    Deleted { name: String },
    NotFound { name: String },
    /// The command prints nothing.
    Quiet,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Score { name, score } => write!(f, "{name} {score}"),
            Outcome::Found { name, score, depth } => write!(f, "{name} {score} {depth}"),
            Outcome::Count(count) => write!(f, "{count}"),
            Outcome::Deleted { name } => write!(f, "{name} deleted"),
            Outcome::NotFound { name } => write!(f, "{name} not found"),
            Outcome::Quiet => Ok(()),
        }
    }
}

/// A line holding nothing but a non-negative integer.
fn operation_count(line: &str) -> Option<usize> {
    line.trim().parse().ok()
}

/// Reads commands, applies them to one tree and reports the final standings.
pub struct Session {
    tree: OrderedTree,
    settings: Settings,
    applied: usize,
    skipped: usize,
}

impl Session {
    pub fn new(settings: Settings) -> Session {
        Session {
            tree: OrderedTree::new(),
            settings,
            applied: 0,
            skipped: 0,
        }
    }

    pub fn tree(&self) -> &OrderedTree {
        &self.tree
    }

    pub fn applied(&self) -> usize {
        self.applied
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn apply(&mut self, command: &Command) -> Outcome {
        self.applied += 1;
        match command {
            Command::Add { name, points } => {
                let score = self.tree.insert_or_merge(name, *points);
                Outcome::Score {
                    name: name.clone(),
                    score,
                }
            }
            Command::Sub { name, points } => match self.tree.decrease(name, *points) {
                Decrease::Updated(score) => Outcome::Score {
                    name: name.clone(),
                    score,
                },
                Decrease::NotFound => Outcome::NotFound { name: name.clone() },
            },
            Command::Set { name, points } => {
                self.tree.set_score(name, *points);
                Outcome::Quiet
            }
            Command::Find { name } => match self.tree.find(name) {
                Lookup::Found { score, depth } => Outcome::Found {
                    name: name.clone(),
                    score,
                    depth,
                },
                Lookup::NotFound => Outcome::NotFound { name: name.clone() },
            },
            Command::Rank { name } => Outcome::Count(self.tree.count_less_than(name)),
            Command::Del { name } => {
                if self.tree.delete(name) {
                    Outcome::Deleted { name: name.clone() }
                } else {
                    Outcome::NotFound { name: name.clone() }
                }
            }
        }
    }

    /// Applies the commands in `input`, writing one line to `out` per command that has output.
    ///
    /// When the first command-bearing line is a bare non-negative integer, it is the number
    /// of command lines to read; anything after them is ignored. Malformed lines count
    /// against that number. Without the count line every line up to end of input is read.
    pub fn run(&mut self, input: impl BufRead, out: &mut impl Write) -> Result<()> {
        info!(strict = self.settings.strict, verify = self.settings.verify, "session started");

        let mut limit: Option<usize> = None;
        let mut consumed = 0;
        for (index, line) in input.lines().enumerate() {
            let line = line?;
            let number = index + 1;

            if limit.is_some_and(|limit| consumed >= limit) {
                debug!(line = number, "operation count reached, ignoring remaining input");
                break;
            }

            let parsed = Command::parse_line(&line);
            if consumed == 0 && limit.is_none() && parsed.is_err() {
                if let Some(count) = operation_count(&line) {
                    info!(count, "reading counted commands");
                    limit = Some(count);
                    continue;
                }
            }

            let command = match parsed {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(source) if self.settings.strict => {
                    return Err(Error::Command {
                        line: number,
                        source,
                    });
                }
                Err(source) => {
                    warn!(line = number, error = %source, "skipping malformed command");
                    self.skipped += 1;
                    consumed += 1;
                    continue;
                }
            };
            consumed += 1;

            let outcome = self.apply(&command);
            debug!(line = number, ?command, %outcome, "applied");

            if self.settings.verify && command.is_mutation() {
                self.tree.verify()?;
            }
            if outcome != Outcome::Quiet {
                writeln!(out, "{outcome}")?;
            }
        }

        info!(
            applied = self.applied,
            skipped = self.skipped,
            entries = self.tree.len(),
            height = ?self.tree.height(),
            "input exhausted"
        );
        Ok(())
    }

    pub fn report(&self) -> Report<'_> {
        Report::from_tree(&self.tree)
    }

    pub fn write_report(&self, out: &mut impl Write) -> Result<()> {
        self.report().write_to(out, self.settings.format)
    }
}
