//! The ordered, append-only list of turns for one session
//!
//! Insertion order is conversation order. Turns are never reordered,
//! deduplicated, or removed; a transcript lives exactly as long as its
//! session and there is no clear operation.

use super::turn::Turn;
use serde::Serialize;

#[derive(Clone, Debug, Default, Serialize)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self { turns: Vec::new() }
    }

    /// Append a turn. The only mutation a transcript supports.
    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Render the transcript as plain text, one `"<role>: <content>"` line
    /// per turn in conversation order, with no trailing newline.
    pub fn export(&self) -> String {
        self.turns
            .iter()
            .map(|t| format!("{}: {}", t.role.as_str(), t.content))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Export the transcript as pretty-printed JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.turns)
    }
}
