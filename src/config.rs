//! Resolver configuration.

use crate::strategy::DEFAULT_REGEX_SIZE_LIMIT;
use serde::{Deserialize, Serialize};

/// What the lenient tiers do when more than one location could match.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum AmbiguityPolicy {
    /// Stop at the first plausible match and report one occurrence.
    #[default]
    FirstMatchWins,
    /// Count every non-overlapping match so a second one fails the edit
    /// with an occurrence-count mismatch.
    Reject,
}

/// Configuration for [`Resolver`](crate::Resolver).
///
/// Defaults: all three tiers enabled, first match wins, 1 MiB regex size limit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct ResolverConfig {
    /// Ambiguity handling for the flexible-block and token-regex tiers.
    pub ambiguity: AmbiguityPolicy,
    /// Enable the flexible-block and token-regex tiers. When false only
    /// exact matches are accepted.
    pub lenient_tiers: bool,
    /// Compiled size limit for the token-regex tier (bytes).
    pub max_regex_size: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            ambiguity: AmbiguityPolicy::FirstMatchWins,
            lenient_tiers: true,
            max_regex_size: DEFAULT_REGEX_SIZE_LIMIT,
        }
    }
}

impl ResolverConfig {
    /// Exact matching only.
    pub fn exact_only() -> Self {
        Self {
            lenient_tiers: false,
            ..Default::default()
        }
    }

    /// All tiers, but ambiguous lenient matches are rejected.
    pub fn strict() -> Self {
        Self {
            ambiguity: AmbiguityPolicy::Reject,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ResolverConfig::default();
        assert_eq!(config.ambiguity, AmbiguityPolicy::FirstMatchWins);
        assert!(config.lenient_tiers);
        assert_eq!(config.max_regex_size, 1024 * 1024);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: ResolverConfig = serde_json::from_str(r#"{"ambiguity":"reject"}"#).unwrap();
        assert_eq!(config.ambiguity, AmbiguityPolicy::Reject);
        assert!(config.lenient_tiers);
    }

    #[test]
    fn presets() {
        assert!(!ResolverConfig::exact_only().lenient_tiers);
        assert_eq!(ResolverConfig::strict().ambiguity, AmbiguityPolicy::Reject);
    }
}
