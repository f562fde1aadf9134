//! Calculation history
//!
//! Newest entries come first. Entries are never edited after they are
//! recorded; the only way to remove one is to clear the whole log.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A single completed calculation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    /// Unique id derived from the recording time
    pub id: String,
    /// What was computed, e.g. `"5 + 3"` or the AI prompt
    pub expression: String,
    /// Result text, or `"Error"`
    pub result: String,
    /// Unix epoch milliseconds
    pub timestamp: i64,
    /// True when the result came from the AI solver
    #[serde(default)]
    pub is_ai_derived: bool,
}

impl HistoryItem {
    /// Returns a formatted display string
    #[must_use]
    pub fn display(&self) -> String {
        format!("{} = {}", self.expression, self.result)
    }
}

/// Ordered calculation log, newest first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    entries: VecDeque<HistoryItem>,
    /// Highest numeric id handed out so far
    last_id: i64,
}

impl History {
    /// Creates an empty history
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepends an entry
    pub fn append(&mut self, item: HistoryItem) {
        if let Ok(id) = item.id.parse::<i64>() {
            self.last_id = self.last_id.max(id);
        }
        self.entries.push_front(item);
    }

    /// Records a calculation stamped with the current time
    pub fn record(
        &mut self,
        expression: impl Into<String>,
        result: impl Into<String>,
        is_ai_derived: bool,
    ) -> &HistoryItem {
        let now = Utc::now().timestamp_millis();
        self.record_at(expression, result, is_ai_derived, now)
    }

    /// Records a calculation with an explicit timestamp.
    ///
    /// The id is the timestamp, bumped past the previous id when the clock
    /// has not advanced, so ids stay unique.
    pub fn record_at(
        &mut self,
        expression: impl Into<String>,
        result: impl Into<String>,
        is_ai_derived: bool,
        timestamp: i64,
    ) -> &HistoryItem {
        let id = timestamp.max(self.last_id.saturating_add(1));
        self.append(HistoryItem {
            id: id.to_string(),
            expression: expression.into(),
            result: result.into(),
            timestamp,
            is_ai_derived,
        });
        &self.entries[0]
    }

    /// Removes every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns the number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the history is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates newest first
    pub fn iter(&self) -> impl Iterator<Item = &HistoryItem> {
        self.entries.iter()
    }

    /// Returns the entry at `index` (0 = newest)
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&HistoryItem> {
        self.entries.get(index)
    }

    /// Returns the most recent entry
    #[must_use]
    pub fn latest(&self) -> Option<&HistoryItem> {
        self.entries.front()
    }

    /// Finds an entry by id
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&HistoryItem> {
        self.entries.iter().find(|item| item.id == id)
    }

    /// Returns the result text of the entry with the given id
    #[must_use]
    pub fn select_result(&self, id: &str) -> Option<&str> {
        self.find(id).map(|item| item.result.as_str())
    }

    /// Serializes the history to JSON (newest first)
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.entries)
    }

    /// One `expression = result` line per entry, newest first
    #[must_use]
    pub fn export_formatted(&self) -> String {
        self.entries
            .iter()
            .map(HistoryItem::display)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
