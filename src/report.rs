use std::fmt;
use std::io::Write;

use clap::ValueEnum;
use serde::Serialize;

use crate::entry::Entry;
use crate::error::Result;
use crate::tree::OrderedTree;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// One `name points` line per entry
    #[default]
    Text,
    /// A JSON array of `{"name", "points"}` objects
    Json,
}

/// Orders entries by score, highest first, then by key.
pub fn rank<'a>(entries: impl IntoIterator<Item = &'a Entry>) -> Vec<&'a Entry> {
    let mut ranked: Vec<&Entry> = entries.into_iter().collect();
    ranked.sort_unstable_by(|a, b| {
        b.score()
            .cmp(&a.score())
            .then_with(|| a.key().cmp(b.key()))
    });
    ranked
}

/// The closing standings of a session.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct Report<'a> {
    standings: Vec<&'a Entry>,
}

impl<'a> Report<'a> {
    pub fn from_tree(tree: &'a OrderedTree) -> Self {
        Self {
            standings: rank(tree.extract_in_order()),
        }
    }

    pub fn standings(&self) -> &[&'a Entry] {
        &self.standings
    }

    pub fn write_to(&self, out: &mut impl Write, format: ReportFormat) -> Result<()> {
        match format {
            ReportFormat::Text => write!(out, "{self}")?,
            ReportFormat::Json => {
                serde_json::to_writer_pretty(&mut *out, self)?;
                writeln!(out)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.standings {
            writeln!(f, "{} {}", entry.key(), entry.score())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ties_fall_back_to_key_order() {
        let entries = [Entry::new("cam", 5), Entry::new("amy", 5), Entry::new("bob", 9)];
        let keys: Vec<&str> = rank(&entries).iter().map(|e| e.key()).collect();
        assert_eq!(keys, ["bob", "amy", "cam"]);
    }

    #[test]
    fn negative_scores_rank_last() {
        let entries = [Entry::new("amy", -3), Entry::new("bob", 0)];
        let keys: Vec<&str> = rank(&entries).iter().map(|e| e.key()).collect();
        assert_eq!(keys, ["bob", "amy"]);
    }
}
