//! Configuration for matching and aggregation
//!
//! Loaded from TOML; every field has a default so an empty file is valid.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::{CoreError, DEFAULT_POOL_SIZE, DEFAULT_SIMILARITY_THRESHOLD};

/// What the text filter does when the user gave no description
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingDescriptionPolicy {
    /// Skip the text filter and keep every identity match
    #[default]
    KeepAll,
    /// Score against nothing, which drops every candidate
    DropAll,
}

/// How the aggregator reacts to a failing matcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// The first failure aborts the whole aggregation
    #[default]
    Abort,
    /// Return the networks that succeeded and report the rest separately
    Partial,
}

/// Settings shared by all network matchers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Minimum description similarity (inclusive)
    pub similarity_threshold: f64,
    /// Compare handles and names case-sensitively
    pub case_sensitive_identity: bool,
    pub missing_description: MissingDescriptionPolicy,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            case_sensitive_identity: true,
            missing_description: MissingDescriptionPolicy::default(),
        }
    }
}

impl MatcherConfig {
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive_identity = case_sensitive;
        self
    }

    pub fn with_missing_description(mut self, policy: MissingDescriptionPolicy) -> Self {
        self.missing_description = policy;
        self
    }

    /// Whether a description score survives the text filter
    pub fn admits(&self, score: f64) -> bool {
        score >= self.similarity_threshold
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(CoreError::ConfigValidation(format!(
                "similarity_threshold must be within [0, 1], got {}",
                self.similarity_threshold
            )));
        }
        Ok(())
    }
}

/// Settings for the matcher fan-out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Maximum matchers running at once
    pub pool_size: usize,
    /// Per-matcher time limit in milliseconds (none = wait forever)
    pub matcher_timeout_ms: Option<u64>,
    pub failure_policy: FailurePolicy,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            pool_size: DEFAULT_POOL_SIZE,
            matcher_timeout_ms: None,
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl RuntimeConfig {
    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.matcher_timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn matcher_timeout(&self) -> Option<Duration> {
        self.matcher_timeout_ms.map(Duration::from_millis)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.pool_size == 0 {
            return Err(CoreError::ConfigValidation(
                "pool_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiftConfig {
    pub matching: MatcherConfig,
    pub runtime: RuntimeConfig,
}

impl SiftConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(toml_str: &str) -> Result<Self, CoreError> {
        let config: SiftConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        self.matching.validate()?;
        self.runtime.validate()
    }

    /// Render as TOML
    pub fn to_toml_string(&self) -> Result<String, CoreError> {
        toml::to_string_pretty(self)
            .map_err(|e| CoreError::ConfigValidation(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiftConfig::default();
        assert_eq!(config.matching.similarity_threshold, 0.4);
        assert!(config.matching.case_sensitive_identity);
        assert_eq!(config.matching.missing_description, MissingDescriptionPolicy::KeepAll);
        assert_eq!(config.runtime.pool_size, 4);
        assert_eq!(config.runtime.matcher_timeout(), None);
        assert_eq!(config.runtime.failure_policy, FailurePolicy::Abort);
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = SiftConfig::from_toml_str("").unwrap();
        assert_eq!(config, SiftConfig::default());
    }

    #[test]
    fn test_parse_toml() {
        let config = SiftConfig::from_toml_str(
            r#"
            [matching]
            similarity_threshold = 0.55
            case_sensitive_identity = false
            missing_description = "drop_all"

            [runtime]
            pool_size = 2
            matcher_timeout_ms = 250
            failure_policy = "partial"
            "#,
        )
        .unwrap();

        assert_eq!(config.matching.similarity_threshold, 0.55);
        assert!(!config.matching.case_sensitive_identity);
        assert_eq!(config.matching.missing_description, MissingDescriptionPolicy::DropAll);
        assert_eq!(config.runtime.pool_size, 2);
        assert_eq!(config.runtime.matcher_timeout(), Some(Duration::from_millis(250)));
        assert_eq!(config.runtime.failure_policy, FailurePolicy::Partial);
    }

    #[test]
    fn test_validation() {
        let err = SiftConfig::from_toml_str("[matching]\nsimilarity_threshold = 1.5").unwrap_err();
        assert!(matches!(err, CoreError::ConfigValidation(_)));

        let err = SiftConfig::from_toml_str("[runtime]\npool_size = 0").unwrap_err();
        assert!(matches!(err, CoreError::ConfigValidation(_)));

        let err = SiftConfig::from_toml_str("[runtime]\nfailure_policy = \"retry\"").unwrap_err();
        assert!(matches!(err, CoreError::ConfigParse(_)));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let config = MatcherConfig::default();
        assert!(config.admits(0.4));
        assert!(!config.admits(0.399));
        assert!(config.admits(1.0));
    }

    #[test]
    fn test_oversized_timeout_saturates() {
        let runtime = RuntimeConfig::default().with_timeout(Duration::MAX);
        assert_eq!(runtime.matcher_timeout_ms, Some(u64::MAX));

        let runtime = RuntimeConfig::default().with_timeout(Duration::from_millis(1500));
        assert_eq!(runtime.matcher_timeout(), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = SiftConfig {
            matching: MatcherConfig::default().with_threshold(0.6),
            runtime: RuntimeConfig::default().with_timeout(Duration::from_secs(2)),
        };
        let rendered = config.to_toml_string().unwrap();
        assert_eq!(SiftConfig::from_toml_str(&rendered).unwrap(), config);
    }
}
