//! URL history capability.
//!
//! The catalog mirrors its query state into a URL query string. The
//! navigator is whatever owns that URL: a browser history, a terminal
//! session, or the in-memory history below.

use std::sync::{Mutex, PoisonError};

/// Access to the current location's query string and its history.
pub trait Navigator: Send + Sync {
    /// Current query string, without the leading `?`.
    fn current_query(&self) -> String;

    /// Push a new history entry with the given query string.
    fn push_query(&self, query: &str);

    /// Overwrite the current entry without adding to the history.
    fn replace_query(&self, query: &str);
}

/// History kept in memory, newest entry last.
#[derive(Debug)]
pub struct MemoryNavigator {
    entries: Mutex<Vec<String>>,
}

impl MemoryNavigator {
    /// Create a history holding a single initial entry.
    pub fn new(initial_query: impl Into<String>) -> Self {
        let initial = initial_query.into();
        let initial = initial.strip_prefix('?').unwrap_or(&initial).to_string();
        Self {
            entries: Mutex::new(vec![initial]),
        }
    }

    /// All entries, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Pop the newest entry and return the one that becomes current.
    ///
    /// The initial entry is never removed.
    pub fn back(&self) -> Option<String> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if entries.len() <= 1 {
            return None;
        }
        entries.pop();
        entries.last().cloned()
    }
}

impl Default for MemoryNavigator {
    fn default() -> Self {
        Self::new("")
    }
}

impl Navigator for MemoryNavigator {
    fn current_query(&self) -> String {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
            .unwrap_or_default()
    }

    fn push_query(&self, query: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(query.to_string());
    }

    fn replace_query(&self, query: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        match entries.last_mut() {
            Some(current) => query.clone_into(current),
            None => entries.push(query.to_string()),
        }
    }
}
