//! Change tracking — a log of every file the edit tool created or modified,
//! with before/after content for review and undo.

use crate::strategy::Strategy;
use crate::types::now_ms;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Create,
    Edit,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChangeMetadata {
    /// Name of the tool that made the change.
    pub tool: String,
    pub replacements: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<Strategy>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileChange {
    pub id: Uuid,
    pub path: String,
    pub change_type: ChangeType,
    /// Empty for created files.
    pub original_content: String,
    pub new_content: String,
    pub metadata: ChangeMetadata,
    pub timestamp: u64,
}

impl FileChange {
    pub fn new(
        path: impl Into<String>,
        change_type: ChangeType,
        original_content: impl Into<String>,
        new_content: impl Into<String>,
        metadata: ChangeMetadata,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            path: path.into(),
            change_type,
            original_content: original_content.into(),
            new_content: new_content.into(),
            metadata,
            timestamp: now_ms(),
        }
    }
}

/// Receives every change the edit tool applies.
pub trait ChangeRecorder: Send + Sync {
    fn record(&self, change: FileChange);
}

/// In-memory [`ChangeRecorder`], oldest change first.
#[derive(Debug, Default)]
pub struct ChangeLog {
    changes: Mutex<Vec<FileChange>>,
}

impl ChangeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn changes(&self) -> Vec<FileChange> {
        self.changes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// All changes to `path`, oldest first.
    pub fn for_path(&self, path: &str) -> Vec<FileChange> {
        self.changes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|c| c.path == path)
            .cloned()
            .collect()
    }

    /// Most recent change to `path`, e.g. to undo it.
    pub fn last_for_path(&self, path: &str) -> Option<FileChange> {
        self.changes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .rev()
            .find(|c| c.path == path)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.changes.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.changes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}

impl ChangeRecorder for ChangeLog {
    fn record(&self, change: FileChange) {
        self.changes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(change);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(path: &str, new_content: &str) -> FileChange {
        FileChange::new(
            path,
            ChangeType::Edit,
            "old",
            new_content,
            ChangeMetadata {
                tool: "smart_edit".into(),
                replacements: 1,
                strategy: Some(Strategy::Exact),
            },
        )
    }

    #[test]
    fn records_in_order() {
        let log = ChangeLog::new();
        assert!(log.is_empty());
        log.record(change("a", "1"));
        log.record(change("b", "2"));
        log.record(change("a", "3"));
        assert_eq!(log.len(), 3);
        assert_eq!(log.for_path("a").len(), 2);
        assert_eq!(log.last_for_path("a").unwrap().new_content, "3");
        assert!(log.last_for_path("c").is_none());
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(change("a", "1").id, change("a", "1").id);
    }

    #[test]
    fn clear_empties_log() {
        let log = ChangeLog::new();
        log.record(change("a", "1"));
        log.clear();
        assert!(log.is_empty());
    }
}
