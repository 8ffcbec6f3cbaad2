use serde::Serialize;

/// Longest key, in bytes, the store is expected to hold.
pub const MAX_KEY_LEN: usize = 19;

/// A named score. The name never changes once the entry exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    #[serde(rename = "name")]
    key: String,
    #[serde(rename = "points")]
    score: i64,
}

impl Entry {
    pub fn new(key: impl Into<String>, score: i64) -> Self {
        Self {
            key: key.into(),
            score,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub(crate) fn set_score(&mut self, score: i64) {
        self.score = score;
    }

    pub(crate) fn add(&mut self, delta: i64) -> i64 {
        self.score = self.score.saturating_add(delta);
        self.score
    }
}

/// Cuts `name` down to at most [`MAX_KEY_LEN`] bytes without splitting a character.
pub fn truncate_key(name: &str) -> &str {
    if name.len() <= MAX_KEY_LEN {
        return name;
    }
    let mut end = MAX_KEY_LEN;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}
