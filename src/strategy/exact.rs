use super::{MatchAttempt, MatchStrategy, Strategy};

/// Literal substring match. Replaces every occurrence.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactMatcher;

impl MatchStrategy for ExactMatcher {
    fn strategy(&self) -> Strategy {
        Strategy::Exact
    }

    fn counts_all_occurrences(&self) -> bool {
        true
    }

    fn replaces_all_occurrences(&self) -> bool {
        true
    }

    fn try_match(&self, body: &str, search: &str, replace: &str) -> Option<MatchAttempt> {
        if search.is_empty() {
            return None;
        }
        let occurrences = body.matches(search).count();
        if occurrences == 0 {
            return None;
        }
        Some(MatchAttempt {
            strategy: Strategy::Exact,
            occurrences,
            new_body: body.replace(search, replace),
            matched_old: search.to_string(),
            matched_new: replace.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_occurrence() {
        let m = ExactMatcher.try_match("let x = 1;\n", "x = 1", "x = 2").unwrap();
        assert_eq!(m.occurrences, 1);
        assert_eq!(m.new_body, "let x = 2;\n");
    }

    #[test]
    fn counts_and_replaces_all() {
        let m = ExactMatcher.try_match("a b a b a", "a", "z").unwrap();
        assert_eq!(m.occurrences, 3);
        assert_eq!(m.new_body, "z b z b z");
    }

    #[test]
    fn non_overlapping_count() {
        let m = ExactMatcher.try_match("aaaa", "aa", "b").unwrap();
        assert_eq!(m.occurrences, 2);
        assert_eq!(m.new_body, "bb");
    }

    #[test]
    fn defers_on_miss() {
        assert!(ExactMatcher.try_match("hello", "bye", "x").is_none());
        assert!(ExactMatcher.try_match("hello", "", "x").is_none());
    }
}
