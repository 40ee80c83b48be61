//! Matching tiers, tried in fixed priority order.
//!
//! 1. [`ExactMatcher`] - literal substring match, counts every occurrence
//! 2. [`FlexibleBlockMatcher`] - line window compared after trimming each line
//! 3. [`TokenRegexMatcher`] - whitespace-tolerant token regex
//!
//! Each tier is a pure function of `(body, search, replace)`. Returning `None`
//! means "defer to the next tier".

mod exact;
mod flexible;
mod token_regex;

pub use exact::ExactMatcher;
pub use flexible::FlexibleBlockMatcher;
pub use token_regex::{build_pattern, tokenize, TokenRegexMatcher, DEFAULT_REGEX_SIZE_LIMIT};

use crate::config::ResolverConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which tier produced a match.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Exact,
    FlexibleBlock,
    TokenRegex,
}

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::FlexibleBlock => "flexible_block",
            Self::TokenRegex => "token_regex",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of one tier that found at least one occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchAttempt {
    pub strategy: Strategy,
    pub occurrences: usize,
    /// LF-normalized body after replacement, before formatting is restored.
    pub new_body: String,
    pub matched_old: String,
    pub matched_new: String,
}

/// One matching tier.
pub trait MatchStrategy: Send + Sync {
    /// The tier this matcher implements.
    fn strategy(&self) -> Strategy;

    /// Whether the reported occurrence count covers every match in the body.
    fn counts_all_occurrences(&self) -> bool {
        false
    }

    /// Whether every counted occurrence is rewritten in the new body.
    /// Only such tiers are consulted for multi-occurrence requests.
    fn replaces_all_occurrences(&self) -> bool {
        false
    }

    /// Look for `search` in the LF-normalized `body` and replace it with `replace`.
    fn try_match(&self, body: &str, search: &str, replace: &str) -> Option<MatchAttempt>;
}

/// The three tiers in priority order, configured from `config`.
pub fn default_strategies(config: &ResolverConfig) -> Vec<Box<dyn MatchStrategy>> {
    let mut strategies: Vec<Box<dyn MatchStrategy>> = vec![Box::new(ExactMatcher)];
    if config.lenient_tiers {
        strategies.push(Box::new(FlexibleBlockMatcher::new(config.ambiguity)));
        strategies.push(Box::new(
            TokenRegexMatcher::new(config.ambiguity).with_size_limit(config.max_regex_size),
        ));
    }
    strategies
}

/// Leading whitespace run of `line`.
pub(crate) fn leading_whitespace(line: &str) -> &str {
    &line[..line.len() - line.trim_start().len()]
}

/// Prefix every line of `text` with `indentation`.
pub(crate) fn indent_lines<'a>(
    text: &'a str,
    indentation: &'a str,
) -> impl Iterator<Item = String> + 'a {
    text.split('\n').map(move |line| format!("{indentation}{line}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AmbiguityPolicy;

    #[test]
    fn leading_whitespace_mixed() {
        assert_eq!(leading_whitespace("\t  foo  "), "\t  ");
        assert_eq!(leading_whitespace("foo"), "");
        assert_eq!(leading_whitespace("   "), "   ");
    }

    #[test]
    fn indent_every_line() {
        let lines: Vec<String> = indent_lines("a\nb", "  ").collect();
        assert_eq!(lines, vec!["  a", "  b"]);
    }

    #[test]
    fn default_order() {
        let names: Vec<Strategy> = default_strategies(&ResolverConfig::default())
            .iter()
            .map(|s| s.strategy())
            .collect();
        assert_eq!(
            names,
            vec![
                Strategy::Exact,
                Strategy::FlexibleBlock,
                Strategy::TokenRegex
            ]
        );
    }

    #[test]
    fn exact_only_config() {
        let config = ResolverConfig::exact_only();
        let strategies = default_strategies(&config);
        assert_eq!(strategies.len(), 1);
        assert!(strategies[0].counts_all_occurrences());
        assert!(strategies[0].replaces_all_occurrences());
    }

    #[test]
    fn strict_lenient_tiers_count_everything() {
        let config = ResolverConfig {
            ambiguity: AmbiguityPolicy::Reject,
            ..Default::default()
        };
        let strategies = default_strategies(&config);
        assert!(strategies.iter().all(|s| s.counts_all_occurrences()));
        // lenient tiers still rewrite only the first match
        assert!(strategies[1..]
            .iter()
            .all(|s| !s.replaces_all_occurrences()));
    }
}
