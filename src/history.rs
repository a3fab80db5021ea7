use crate::mode::CalculatorMode;
use chrono::{DateTime, Local};
use std::collections::VecDeque;

pub const DEFAULT_HISTORY_LIMIT: usize = 50;

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub id: u64,
    /// Expression as the user typed it, before canonicalization.
    pub expression: String,
    pub result: String,
    pub timestamp: DateTime<Local>,
    pub mode: CalculatorMode,
}

/// Newest-first log of evaluations, bounded by `limit`.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    limit: usize,
    next_id: u64,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl History {
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            entries: VecDeque::with_capacity(limit),
            limit,
            next_id: 1,
        }
    }

    /// Prepend an entry, evicting the oldest past the limit. Returns the new id.
    pub fn record(
        &mut self,
        expression: impl Into<String>,
        result: impl Into<String>,
        mode: CalculatorMode,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        self.entries.push_front(HistoryEntry {
            id,
            expression: expression.into(),
            result: result.into(),
            timestamp: Local::now(),
            mode,
        });
        self.entries.truncate(self.limit);
        id
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn select(&self, id: u64) -> Option<&HistoryEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}
