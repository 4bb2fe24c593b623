//! Bounded activity log.
//!
//! Holds the most recent human-readable messages about successful mutations,
//! each prefixed with a `[YYYY-MM-DD HH:MM:SS]` timestamp. When the log is
//! full the oldest entry is evicted first.

use std::collections::VecDeque;

use crate::TIMESTAMP_FORMAT;

/// Default number of entries retained.
pub const DEFAULT_CAPACITY: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityLog {
    entries: VecDeque<String>,
    capacity: usize,
}

impl ActivityLog {
    /// An empty log. A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Rebuild a log from stored lines, keeping only the newest `capacity`.
    pub fn from_entries(entries: impl IntoIterator<Item = String>, capacity: usize) -> Self {
        let mut log = Self::new(capacity);
        for entry in entries {
            log.push_line(entry);
        }
        log
    }

    /// Append a message stamped with the current time.
    pub fn record(&mut self, message: impl AsRef<str>) {
        let stamp = crate::now().format(TIMESTAMP_FORMAT);
        self.push_line(format!("[{}] {}", stamp, message.as_ref()));
    }

    fn push_line(&mut self, line: String) {
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(line);
    }

    /// Entries from oldest to newest.
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
