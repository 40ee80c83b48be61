//! Edit orchestration — resolve `(old_string, new_string)` against file content.
//!
//! The resolver runs the matching tiers in fixed order and stops at the first
//! one that finds anything. Exact matches always win over lenient ones, so the
//! same request against the same content always resolves the same way.
//!
//! The resolver performs no I/O. The caller reads the file, passes its content
//! (or `None` if it does not exist), and writes [`ResolvedEdit::new_body`] back.
//! Read-resolve-write on one file is not atomic; callers that edit the same
//! file concurrently must serialize per path (see [`PathLocks`](crate::fs::PathLocks)).

use crate::config::ResolverConfig;
use crate::correction::{log_correction, SelfCorrector};
use crate::error::EditError;
use crate::normalize::{normalize_line_endings, NormalizedContent};
use crate::strategy::{default_strategies, MatchAttempt, MatchStrategy, Strategy};
use serde::{Deserialize, Serialize};
use tracing::debug;

fn default_expected_occurrences() -> usize {
    1
}

/// One search/replace request against one file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EditRequest {
    /// Opaque identifier, only used in messages.
    pub file_path: String,
    /// Text to find. Empty means "create the file".
    pub old_string: String,
    pub new_string: String,
    #[serde(default = "default_expected_occurrences")]
    pub expected_occurrences: usize,
}

impl EditRequest {
    pub fn new(
        file_path: impl Into<String>,
        old_string: impl Into<String>,
        new_string: impl Into<String>,
    ) -> Self {
        Self {
            file_path: file_path.into(),
            old_string: old_string.into(),
            new_string: new_string.into(),
            expected_occurrences: 1,
        }
    }

    pub fn with_expected_occurrences(mut self, expected: usize) -> Self {
        self.expected_occurrences = expected;
        self
    }

    /// Whether this request creates a file rather than editing one.
    pub fn is_creation(&self) -> bool {
        self.old_string.is_empty()
    }

    /// One-line description for logs and UIs.
    pub fn describe(&self) -> String {
        if self.old_string == self.new_string {
            return format!("No file changes to {}", self.file_path);
        }
        format!(
            "SmartEdit {}: '{}' => '{}'",
            self.file_path,
            snippet(&self.old_string),
            snippet(&self.new_string)
        )
    }
}

fn snippet(text: &str) -> String {
    let first: String = text.lines().next().unwrap_or("").chars().take(30).collect();
    if text.chars().count() > 30 {
        format!("{first}...")
    } else {
        first
    }
}

/// A successfully resolved edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEdit {
    /// Full new file content, with the original line endings and
    /// trailing-newline state restored. Write it verbatim.
    pub new_body: String,
    pub occurrences: usize,
    /// Tier that matched; `None` for file creation.
    pub strategy: Option<Strategy>,
    pub is_new_file: bool,
}

pub type EditOutcome = Result<ResolvedEdit, EditError>;

/// Runs the matching tiers in order and enforces the edit invariants.
pub struct Resolver {
    strategies: Vec<Box<dyn MatchStrategy>>,
    corrector: Option<Box<dyn SelfCorrector>>,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolver {
    /// Exact, flexible-block, token-regex; first match wins.
    pub fn new() -> Self {
        Self::from_config(&ResolverConfig::default())
    }

    pub fn from_config(config: &ResolverConfig) -> Self {
        Self::with_strategies(default_strategies(config))
    }

    /// Custom tier list, tried in the given order.
    pub fn with_strategies(strategies: Vec<Box<dyn MatchStrategy>>) -> Self {
        Self {
            strategies,
            corrector: None,
        }
    }

    /// Offer correctable failures to `corrector` once before giving up.
    pub fn with_corrector(mut self, corrector: impl SelfCorrector + 'static) -> Self {
        self.corrector = Some(Box::new(corrector));
        self
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.strategy().name()).collect()
    }

    /// Resolve `request` against `current` (`None` = the file does not exist).
    pub fn resolve(&self, request: &EditRequest, current: Option<&str>) -> EditOutcome {
        let err = match self.resolve_once(request, current) {
            Ok(resolved) => return Ok(resolved),
            Err(err) => err,
        };
        if !err.is_correctable() {
            return Err(err);
        }
        let Some(corrected) = self
            .corrector
            .as_ref()
            .and_then(|c| c.correct(request, &err))
        else {
            return Err(err);
        };
        log_correction(request, &err);
        self.resolve_once(&corrected, current)
    }

    fn resolve_once(&self, request: &EditRequest, current: Option<&str>) -> EditOutcome {
        let content = match (request.is_creation(), current) {
            (true, None) => {
                return Ok(ResolvedEdit {
                    new_body: request.new_string.clone(),
                    occurrences: 1,
                    strategy: None,
                    is_new_file: true,
                })
            }
            (true, Some(_)) => {
                return Err(EditError::FileAlreadyExists {
                    path: request.file_path.clone(),
                })
            }
            (false, None) => {
                return Err(EditError::FileNotFound {
                    path: request.file_path.clone(),
                })
            }
            (false, Some(content)) => content,
        };

        let normalized = NormalizedContent::new(content);
        let search = normalize_line_endings(&request.old_string);
        let replace = normalize_line_endings(&request.new_string);

        let Some(attempt) = self.find_match(
            &normalized.body,
            &search,
            &replace,
            request.expected_occurrences,
        ) else {
            return Err(EditError::NoOccurrenceFound {
                path: request.file_path.clone(),
                search,
            });
        };

        if attempt.occurrences != request.expected_occurrences {
            return Err(EditError::OccurrenceCountMismatch {
                path: request.file_path.clone(),
                found: attempt.occurrences,
                expected: request.expected_occurrences,
            });
        }

        let no_op = EditError::NoOpEdit {
            path: request.file_path.clone(),
        };
        if attempt.matched_old == attempt.matched_new {
            return Err(no_op);
        }

        let new_body = normalized.restore(&attempt.new_body);
        // A lenient tier can rewrite a block into exactly what was there.
        if new_body == content {
            return Err(no_op);
        }

        debug!(
            "Resolved edit of {} with {} ({} occurrence{})",
            request.file_path,
            attempt.strategy,
            attempt.occurrences,
            if attempt.occurrences == 1 { "" } else { "s" }
        );

        Ok(ResolvedEdit {
            new_body,
            occurrences: attempt.occurrences,
            strategy: Some(attempt.strategy),
            is_new_file: false,
        })
    }

    /// First tier reporting at least one occurrence. Tiers that rewrite only
    /// the first match cannot satisfy a multi-occurrence request and are skipped,
    /// even when they count every match.
    fn find_match(
        &self,
        body: &str,
        search: &str,
        replace: &str,
        expected: usize,
    ) -> Option<MatchAttempt> {
        self.strategies
            .iter()
            .filter(|s| expected <= 1 || s.replaces_all_occurrences())
            .find_map(|s| {
                s.try_match(body, search, replace)
                    .filter(|attempt| attempt.occurrences > 0)
            })
    }
}

/// Resolve with the default tiers and no correction hook.
pub fn resolve_edit(request: &EditRequest, current: Option<&str>) -> EditOutcome {
    Resolver::new().resolve(request, current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_truncates_first_line() {
        let req = EditRequest::new(
            "src/lib.rs",
            "fn a_really_long_function_name_here() {\n}",
            "fn short() {}",
        );
        assert_eq!(
            req.describe(),
            "SmartEdit src/lib.rs: 'fn a_really_long_function_name...' => 'fn short() {}'"
        );
    }

    #[test]
    fn describe_identical_strings() {
        let req = EditRequest::new("a.txt", "x", "x");
        assert_eq!(req.describe(), "No file changes to a.txt");
    }

    #[test]
    fn expected_occurrences_defaults_to_one() {
        let req: EditRequest =
            serde_json::from_str(r#"{"filePath":"a","oldString":"b","newString":"c"}"#).unwrap();
        assert_eq!(req.expected_occurrences, 1);
    }

    #[test]
    fn strategy_names_in_order() {
        assert_eq!(
            Resolver::new().strategy_names(),
            vec!["exact", "flexible_block", "token_regex"]
        );
    }

    #[test]
    fn crlf_search_string_is_normalized() {
        let resolved = resolve_edit(
            &EditRequest::new("f", "a\r\nb", "c\r\nd"),
            Some("a\r\nb\r\n"),
        )
        .unwrap();
        assert_eq!(resolved.new_body, "c\r\nd\r\n");
        assert_eq!(resolved.strategy, Some(Strategy::Exact));
    }
}
