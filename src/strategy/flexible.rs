use super::{indent_lines, leading_whitespace, MatchAttempt, MatchStrategy, Strategy};
use crate::config::AmbiguityPolicy;

/// Line-window match that ignores leading and trailing whitespace on every line.
///
/// The first matching window (top to bottom) is replaced. Each replacement line
/// is prefixed with the leading whitespace of the window's first line, so a
/// snippet copied without its enclosing indentation lands at the right depth.
///
/// With [`AmbiguityPolicy::FirstMatchWins`] scanning stops at the first window
/// and a second plausible match goes unnoticed. [`AmbiguityPolicy::Reject`]
/// keeps counting non-overlapping windows so the caller can refuse the edit.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlexibleBlockMatcher {
    pub ambiguity: AmbiguityPolicy,
}

impl FlexibleBlockMatcher {
    pub fn new(ambiguity: AmbiguityPolicy) -> Self {
        Self { ambiguity }
    }
}

impl MatchStrategy for FlexibleBlockMatcher {
    fn strategy(&self) -> Strategy {
        Strategy::FlexibleBlock
    }

    fn counts_all_occurrences(&self) -> bool {
        self.ambiguity == AmbiguityPolicy::Reject
    }

    fn try_match(&self, body: &str, search: &str, replace: &str) -> Option<MatchAttempt> {
        let mut source_lines: Vec<&str> = body.split('\n').collect();
        // "a\n" splits into ["a", ""]; the empty tail is the trailing newline, not a line
        if body.ends_with('\n') {
            source_lines.pop();
        }
        let search_lines: Vec<&str> = search.split('\n').map(str::trim).collect();
        let window = search_lines.len();
        if window > source_lines.len() {
            return None;
        }

        let matches_at = |start: usize| {
            source_lines[start..start + window]
                .iter()
                .zip(&search_lines)
                .all(|(line, wanted)| line.trim() == *wanted)
        };

        let last_start = source_lines.len() - window;
        let first = (0..=last_start).find(|&i| matches_at(i))?;

        let occurrences = match self.ambiguity {
            AmbiguityPolicy::FirstMatchWins => 1,
            AmbiguityPolicy::Reject => {
                let mut count = 1;
                let mut i = first + window;
                while i <= last_start {
                    if matches_at(i) {
                        count += 1;
                        i += window;
                    } else {
                        i += 1;
                    }
                }
                count
            }
        };

        let indentation = leading_whitespace(source_lines[first]);
        let mut lines: Vec<String> = Vec::with_capacity(source_lines.len());
        lines.extend(source_lines[..first].iter().map(|l| l.to_string()));
        lines.extend(indent_lines(replace, indentation));
        lines.extend(source_lines[first + window..].iter().map(|l| l.to_string()));

        Some(MatchAttempt {
            strategy: Strategy::FlexibleBlock,
            occurrences,
            new_body: lines.join("\n"),
            matched_old: search.to_string(),
            matched_new: replace.to_string(),
        })
    }
}
