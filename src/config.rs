//! Configuration management for `scrublog`.
//!
//! This module defines the data structures for sensitive-data patterns and
//! handles serialization/deserialization of YAML pattern files. It provides
//! utilities for loading the embedded defaults, loading deployment-specific
//! additions from a file, and merging the two. The merge is strictly
//! additive: a user configuration can extend the pattern set but never
//! remove or weaken a default pattern.
//!
//! License: MIT OR Apache-2.0

use anyhow::{anyhow, Context, Result};
use log::{debug, info, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Maximum allowed length for a regex pattern string.
pub const MAX_PATTERN_LENGTH: usize = 500;

/// How a name pattern is compared against a normalized field key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// The normalized key contains the pattern as a substring.
    Substring,
    /// The normalized key equals the pattern exactly.
    Exact,
}

impl Default for MatchKind {
    fn default() -> Self {
        MatchKind::Substring
    }
}

/// A rule that flags a field as sensitive based on its key.
///
/// Keys are normalized (lowercased, `_` and `-` removed) before the
/// comparison, so a single pattern covers all of `API-Key`, `api_key`
/// and `ApiKey`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(default)]
pub struct NamePatternRule {
    /// The lowercase pattern text tested against normalized keys.
    pub pattern: String,
    /// Substring or exact comparison.
    #[serde(rename = "match")]
    pub match_kind: MatchKind,
}

impl Default for NamePatternRule {
    fn default() -> Self {
        Self {
            pattern: String::new(),
            match_kind: MatchKind::Substring,
        }
    }
}

impl NamePatternRule {
    pub fn substring(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            match_kind: MatchKind::Substring,
        }
    }

    pub fn exact(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            match_kind: MatchKind::Exact,
        }
    }
}

/// A rule that flags a field as sensitive based on the shape of its value,
/// independent of the key.
///
/// The regex is anchored at compile time (the whole value must match) and
/// `min_length` guards against false positives on short or common words.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(default)]
pub struct ValuePatternRule {
    /// Unique identifier for the rule (e.g., "github_token").
    pub name: String,
    /// Human-readable description of what the rule targets.
    pub description: Option<String>,
    /// The regex pattern string, unanchored.
    pub pattern: String,
    /// Values shorter than this are never tested against the pattern.
    pub min_length: usize,
}

impl Default for ValuePatternRule {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: None,
            pattern: String::new(),
            min_length: 0,
        }
    }
}

/// The full set of name and value patterns that classify data as sensitive.
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Rules tested against field keys.
    pub name_patterns: Vec<NamePatternRule>,
    /// Rules tested against string values.
    pub value_patterns: Vec<ValuePatternRule>,
}

impl FilterConfig {
    /// Loads pattern additions from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading custom patterns from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read pattern file {}", path.display()))?;
        let config: FilterConfig = serde_yml::from_str(&text)
            .with_context(|| format!("Failed to parse pattern file {}", path.display()))?;

        validate_patterns(&config)?;
        info!(
            "Loaded {} name pattern(s) and {} value pattern(s) from {}.",
            config.name_patterns.len(),
            config.value_patterns.len(),
            path.display()
        );

        Ok(config)
    }

    /// Loads the default pattern set from the embedded configuration.
    pub fn load_default_patterns() -> Result<Self> {
        debug!("Loading default patterns from embedded string...");
        let default_yaml = include_str!("../config/default_patterns.yaml");
        let config: FilterConfig = serde_yml::from_str(default_yaml)
            .context("Failed to parse default patterns")?;

        validate_patterns(&config).context("Embedded default patterns failed validation")?;
        debug!(
            "Loaded {} default name pattern(s) and {} default value pattern(s).",
            config.name_patterns.len(),
            config.value_patterns.len()
        );
        Ok(config)
    }
}

/// Merges user-supplied pattern additions into the defaults.
///
/// The merge is additive only: user name patterns that duplicate a default
/// are dropped, and a user value pattern whose name collides with an
/// existing one is skipped with a warning rather than replacing it.
pub fn merge_patterns(
    default_config: FilterConfig,
    user_config: Option<FilterConfig>,
) -> FilterConfig {
    let mut merged = default_config;

    let Some(user_cfg) = user_config else {
        return merged;
    };

    debug!(
        "Merging {} user name pattern(s) and {} user value pattern(s).",
        user_cfg.name_patterns.len(),
        user_cfg.value_patterns.len()
    );

    let existing_names: HashSet<NamePatternRule> = merged.name_patterns.iter().cloned().collect();
    for rule in user_cfg.name_patterns {
        if existing_names.contains(&rule) {
            debug!("Skipping duplicate name pattern '{}'.", rule.pattern);
            continue;
        }
        merged.name_patterns.push(rule);
    }

    let existing_value_names: HashSet<String> = merged
        .value_patterns
        .iter()
        .map(|rule| rule.name.clone())
        .collect();
    for rule in user_cfg.value_patterns {
        if existing_value_names.contains(&rule.name) {
            warn!(
                "Value pattern '{}' already exists; user addition ignored (patterns cannot be replaced).",
                rule.name
            );
            continue;
        }
        merged.value_patterns.push(rule);
    }

    debug!(
        "Final pattern set after merge: {} name pattern(s), {} value pattern(s).",
        merged.name_patterns.len(),
        merged.value_patterns.len()
    );

    merged
}

/// Validates pattern integrity (non-empty patterns, regex compilation,
/// unique value-pattern names).
pub fn validate_patterns(config: &FilterConfig) -> Result<()> {
    let mut errors = Vec::new();

    for rule in &config.name_patterns {
        if rule.pattern.is_empty() {
            errors.push("A name pattern has an empty `pattern` field.".to_string());
        }
    }

    let mut value_names = HashSet::new();
    for rule in &config.value_patterns {
        if rule.name.is_empty() {
            errors.push("A value pattern has an empty `name` field.".to_string());
        } else if !value_names.insert(rule.name.clone()) {
            errors.push(format!("Duplicate value pattern name found: '{}'.", rule.name));
        }

        if rule.pattern.is_empty() {
            errors.push(format!("Value pattern '{}' has an empty `pattern` field.", rule.name));
            continue;
        }

        if let Err(e) = Regex::new(&rule.pattern) {
            errors.push(format!(
                "Value pattern '{}' has an invalid regex pattern: {}",
                rule.name, e
            ));
        }
    }

    if !errors.is_empty() {
        Err(anyhow!(format!(
            "Pattern validation failed:\n{}",
            errors.join("\n")
        )))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_patterns_parse_and_validate() {
        let config = FilterConfig::load_default_patterns().unwrap();
        assert!(config
            .name_patterns
            .iter()
            .any(|r| r.pattern == "password" && r.match_kind == MatchKind::Substring));
        assert!(config
            .name_patterns
            .iter()
            .any(|r| r.pattern == "apikey" && r.match_kind == MatchKind::Exact));
        assert!(config.value_patterns.iter().any(|r| r.name == "guid"));
    }

    #[test]
    fn validate_rejects_bad_regex() {
        let config = FilterConfig {
            name_patterns: vec![],
            value_patterns: vec![ValuePatternRule {
                name: "broken".to_string(),
                description: None,
                pattern: "[unclosed".to_string(),
                min_length: 10,
            }],
        };
        let err = validate_patterns(&config).unwrap_err();
        assert!(err.to_string().contains("invalid regex"));
    }

    #[test]
    fn validate_rejects_duplicate_value_names() {
        let rule = ValuePatternRule {
            name: "dup".to_string(),
            description: None,
            pattern: "[0-9]+".to_string(),
            min_length: 10,
        };
        let config = FilterConfig {
            name_patterns: vec![],
            value_patterns: vec![rule.clone(), rule],
        };
        let err = validate_patterns(&config).unwrap_err();
        assert!(err.to_string().contains("Duplicate value pattern name"));
    }

    #[test]
    fn merge_never_replaces_a_default() {
        let defaults = FilterConfig::load_default_patterns().unwrap();
        let default_guid = defaults
            .value_patterns
            .iter()
            .find(|r| r.name == "guid")
            .unwrap()
            .clone();

        let user = FilterConfig {
            name_patterns: vec![NamePatternRule::substring("session")],
            value_patterns: vec![ValuePatternRule {
                name: "guid".to_string(),
                description: None,
                pattern: "weakened".to_string(),
                min_length: 0,
            }],
        };

        let merged = merge_patterns(defaults, Some(user));
        let merged_guid = merged.value_patterns.iter().find(|r| r.name == "guid").unwrap();
        assert_eq!(*merged_guid, default_guid);
        assert!(merged.name_patterns.iter().any(|r| r.pattern == "session"));
    }
}
