//! Undo/redo history over document snapshots.

use crate::command::Command;
use crate::document::{Document, DocumentResult};
use std::sync::Arc;

/// One committed mutation with the snapshots on either side of it.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub command: Command,
    pub before: Arc<Document>,
    pub after: Arc<Document>,
}

impl HistoryEntry {
    pub fn name(&self) -> &'static str {
        self.command.name()
    }
}

/// Linear undo/redo stacks. A new entry discards the redo trail.
#[derive(Debug, Clone, Default)]
pub struct History {
    /// Entries in effect, most recent last.
    applied: Vec<HistoryEntry>,
    /// Entries popped by undo, most recent last.
    undone: Vec<HistoryEntry>,
    /// Maximum number of applied entries to keep (None = unbounded).
    limit: Option<usize>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Apply a command to the live document and record it.
    ///
    /// Returns `Ok(false)` if the command changed nothing (for example when
    /// every id it references is gone). The live document is replaced only
    /// once the new snapshot is built and valid.
    pub fn execute(&mut self, command: Command, doc: &mut Arc<Document>) -> DocumentResult<bool> {
        let Some(next) = command.apply(&**doc) else {
            log::debug!("{} changed nothing, not recorded", command.name());
            return Ok(false);
        };
        next.validate()?;

        let after = Arc::new(next);
        self.record(HistoryEntry {
            command,
            before: Arc::clone(doc),
            after: Arc::clone(&after),
        });
        *doc = after;
        Ok(true)
    }

    /// Push an entry whose effect is already in the live document.
    pub fn record(&mut self, entry: HistoryEntry) {
        log::debug!("history: {}", entry.name());
        self.applied.push(entry);
        self.undone.clear();

        if let Some(limit) = self.limit {
            if self.applied.len() > limit {
                let excess = self.applied.len() - limit;
                self.applied.drain(..excess);
            }
        }
    }

    /// Undo the last entry.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self, doc: &mut Arc<Document>) -> bool {
        let Some(entry) = self.applied.pop() else {
            return false;
        };
        log::debug!("undo: {}", entry.name());
        *doc = Arc::clone(&entry.before);
        self.undone.push(entry);
        true
    }

    /// Redo the last undone entry.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self, doc: &mut Arc<Document>) -> bool {
        let Some(entry) = self.undone.pop() else {
            return false;
        };
        log::debug!("redo: {}", entry.name());
        *doc = Arc::clone(&entry.after);
        self.applied.push(entry);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.applied.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    /// Names of applied entries, oldest first.
    pub fn undo_names(&self) -> Vec<&'static str> {
        self.applied.iter().map(HistoryEntry::name).collect()
    }

    /// Names of undone entries, next redo last.
    pub fn redo_names(&self) -> Vec<&'static str> {
        self.undone.iter().map(HistoryEntry::name).collect()
    }

    /// Commands in effect, oldest first.
    pub fn commands(&self) -> impl Iterator<Item = &Command> {
        self.applied.iter().map(|entry| &entry.command)
    }

    pub fn clear(&mut self) {
        self.applied.clear();
        self.undone.clear();
    }

    /// Serialize the applied command log.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let commands: Vec<&Command> = self.commands().collect();
        serde_json::to_string_pretty(&commands)
    }

    /// Re-run the applied commands on top of `base`.
    pub fn replay(&self, base: &Document) -> Document {
        self.commands().fold(base.clone(), |doc, command| {
            command.apply(&doc).unwrap_or(doc)
        })
    }
}
