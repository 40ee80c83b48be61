use super::{indent_lines, MatchAttempt, MatchStrategy, Strategy};
use crate::config::AmbiguityPolicy;
use regex::RegexBuilder;
use tracing::warn;

/// Characters that always form their own token.
const DELIMITERS: [char; 10] = ['(', ')', ':', '[', ']', '{', '}', '<', '>', '='];

/// Default compiled-regex size limit.
pub const DEFAULT_REGEX_SIZE_LIMIT: usize = 1024 * 1024;

/// Split `search` into tokens around structural delimiters and whitespace.
pub fn tokenize(search: &str) -> Vec<String> {
    let mut spaced = String::with_capacity(search.len() * 2);
    for ch in search.chars() {
        if DELIMITERS.contains(&ch) {
            spaced.push(' ');
            spaced.push(ch);
            spaced.push(' ');
        } else {
            spaced.push(ch);
        }
    }
    spaced.split_whitespace().map(str::to_string).collect()
}

/// Line-anchored pattern matching `tokens` with any whitespace between them.
/// Group 1 captures the indentation of the line the match starts on.
pub fn build_pattern(tokens: &[String]) -> String {
    let body = tokens
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join(r"\s*");
    format!(r"(?m)^([ \t]*){body}")
}

/// Last-resort tier for token-spacing drift (`a=b` vs `a = b`).
///
/// Only the first match is replaced. The replacement is inserted literally,
/// with every line prefixed by the matched line's indentation.
#[derive(Debug, Clone, Copy)]
pub struct TokenRegexMatcher {
    pub ambiguity: AmbiguityPolicy,
    pub size_limit: usize,
}

impl Default for TokenRegexMatcher {
    fn default() -> Self {
        Self::new(AmbiguityPolicy::default())
    }
}

impl TokenRegexMatcher {
    pub fn new(ambiguity: AmbiguityPolicy) -> Self {
        Self {
            ambiguity,
            size_limit: DEFAULT_REGEX_SIZE_LIMIT,
        }
    }

    pub fn with_size_limit(mut self, size_limit: usize) -> Self {
        self.size_limit = size_limit;
        self
    }
}

impl MatchStrategy for TokenRegexMatcher {
    fn strategy(&self) -> Strategy {
        Strategy::TokenRegex
    }

    fn counts_all_occurrences(&self) -> bool {
        self.ambiguity == AmbiguityPolicy::Reject
    }

    fn try_match(&self, body: &str, search: &str, replace: &str) -> Option<MatchAttempt> {
        let tokens = tokenize(search);
        if tokens.is_empty() {
            return None;
        }

        let regex = match RegexBuilder::new(&build_pattern(&tokens))
            .size_limit(self.size_limit)
            .build()
        {
            Ok(regex) => regex,
            Err(e) => {
                warn!("Token regex tier skipped ({} tokens): {}", tokens.len(), e);
                return None;
            }
        };

        let caps = regex.captures(body)?;
        let whole = caps.get(0)?;
        let indentation = caps.get(1).map_or("", |m| m.as_str());

        let occurrences = match self.ambiguity {
            AmbiguityPolicy::FirstMatchWins => 1,
            AmbiguityPolicy::Reject => regex.find_iter(body).count(),
        };

        let block = indent_lines(replace, indentation)
            .collect::<Vec<_>>()
            .join("\n");
        let mut new_body = String::with_capacity(body.len() + block.len());
        new_body.push_str(&body[..whole.start()]);
        new_body.push_str(&block);
        new_body.push_str(&body[whole.end()..]);

        Some(MatchAttempt {
            strategy: Strategy::TokenRegex,
            occurrences,
            new_body,
            matched_old: search.to_string(),
            matched_new: replace.to_string(),
        })
    }
}
