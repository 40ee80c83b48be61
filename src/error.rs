//! Edit resolution errors.

use serde::{Deserialize, Serialize};

/// Why an edit could not be resolved.
///
/// `Display` gives the detailed message meant for an LLM caller;
/// [`EditError::display_message`] gives the short one for end users.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("File already exists, cannot create: {path}")]
    FileAlreadyExists { path: String },

    #[error(
        "Failed to edit, 0 occurrences found for oldString ({}) in {path}. No edits made. \
         The exact text in oldString was not found. Ensure you're not escaping content \
         incorrectly and check whitespace, indentation, and context. Use the read_file tool to verify.",
        truncate(.search, 100)
    )]
    NoOccurrenceFound { path: String, search: String },

    #[error(
        "Failed to edit, expected {expected} {} but found {found} for oldString in file: {path}",
        occurrence_term(.expected)
    )]
    OccurrenceCountMismatch {
        path: String,
        found: usize,
        expected: usize,
    },

    #[error("No changes to apply. The oldString and newString are identical in file: {path}")]
    NoOpEdit { path: String },
}

/// Serializable discriminant of [`EditError`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EditErrorKind {
    FileNotFound,
    FileAlreadyExists,
    NoOccurrenceFound,
    OccurrenceCountMismatch,
    NoOpEdit,
}

impl EditError {
    pub fn kind(&self) -> EditErrorKind {
        match self {
            Self::FileNotFound { .. } => EditErrorKind::FileNotFound,
            Self::FileAlreadyExists { .. } => EditErrorKind::FileAlreadyExists,
            Self::NoOccurrenceFound { .. } => EditErrorKind::NoOccurrenceFound,
            Self::OccurrenceCountMismatch { .. } => EditErrorKind::OccurrenceCountMismatch,
            Self::NoOpEdit { .. } => EditErrorKind::NoOpEdit,
        }
    }

    /// Short, user-facing summary.
    pub fn display_message(&self) -> String {
        match self {
            Self::FileNotFound { .. } => {
                "File not found. Cannot apply edit. Use an empty oldString to create a new file."
                    .into()
            }
            Self::FileAlreadyExists { .. } => {
                "Failed to edit. Attempted to create a file that already exists.".into()
            }
            Self::NoOccurrenceFound { .. } => {
                "Failed to edit, could not find the string to replace.".into()
            }
            Self::OccurrenceCountMismatch {
                found, expected, ..
            } => format!(
                "Failed to edit, expected {} {} but found {}.",
                expected,
                occurrence_term(expected),
                found
            ),
            Self::NoOpEdit { .. } => {
                "No changes to apply. The oldString and newString are identical.".into()
            }
        }
    }

    /// Whether a corrected request could plausibly succeed.
    ///
    /// Only a missing or miscounted match qualifies; the file-state and
    /// no-op errors would fail the same way again.
    pub fn is_correctable(&self) -> bool {
        matches!(
            self,
            Self::NoOccurrenceFound { .. } | Self::OccurrenceCountMismatch { .. }
        )
    }
}

fn occurrence_term(expected: &usize) -> &'static str {
    if *expected == 1 {
        "occurrence"
    } else {
        "occurrences"
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatch_message_pluralizes() {
        let err = EditError::OccurrenceCountMismatch {
            path: "a.rs".into(),
            found: 3,
            expected: 2,
        };
        assert_eq!(
            err.to_string(),
            "Failed to edit, expected 2 occurrences but found 3 for oldString in file: a.rs"
        );
        assert_eq!(
            err.display_message(),
            "Failed to edit, expected 2 occurrences but found 3."
        );
    }

    #[test]
    fn mismatch_message_singular() {
        let err = EditError::OccurrenceCountMismatch {
            path: "a.rs".into(),
            found: 2,
            expected: 1,
        };
        assert!(err.to_string().contains("expected 1 occurrence but found 2"));
    }

    #[test]
    fn long_search_is_truncated() {
        let err = EditError::NoOccurrenceFound {
            path: "a.rs".into(),
            search: "x".repeat(500),
        };
        let msg = err.to_string();
        assert!(msg.contains(&format!("({}...)", "x".repeat(100))));
        assert!(!msg.contains(&"x".repeat(101)));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "hé...");
        assert_eq!(truncate("hi", 5), "hi");
    }

    #[test]
    fn correctable_kinds() {
        assert!(EditError::NoOccurrenceFound {
            path: String::new(),
            search: String::new()
        }
        .is_correctable());
        assert!(!EditError::NoOpEdit {
            path: String::new()
        }
        .is_correctable());
        assert!(!EditError::FileNotFound {
            path: String::new()
        }
        .is_correctable());
    }
}
