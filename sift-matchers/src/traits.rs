//! Common traits for network matchers

use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

use sift_core::{MatcherConfig, Network, NetworkMatches, ScrapingResponse, UserProfile};

/// Errors from matcher operations
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("{network}: record {index} is missing field '{field}'")]
    MissingField {
        network: Network,
        index: usize,
        field: &'static str,
    },

    #[error("{network}: record {index} is malformed: {reason}")]
    Malformed {
        network: Network,
        index: usize,
        reason: String,
    },

    #[error("{network}: matcher needs a user profile")]
    ProfileRequired { network: Network },

    #[error("{network}: matcher timed out after {after_ms} ms")]
    Timeout { network: Network, after_ms: u64 },

    #[error("{network}: worker failed: {reason}")]
    Worker { network: Network, reason: String },
}

impl MatchError {
    /// The network whose matcher raised this error
    pub fn network(&self) -> Network {
        match self {
            Self::MissingField { network, .. }
            | Self::Malformed { network, .. }
            | Self::ProfileRequired { network }
            | Self::Timeout { network, .. }
            | Self::Worker { network, .. } => *network,
        }
    }
}

/// A per-network filter over scraped candidates
///
/// Matchers are pure: they read the candidates and profile, never mutate
/// them, and return the surviving records in input order.
pub trait NetworkMatcher: Send + Sync {
    /// Network this matcher owns
    fn network(&self) -> Network;

    /// Settings this matcher was built with
    fn config(&self) -> &MatcherConfig;

    /// Whether the scraper already narrowed this network's candidates, so
    /// the aggregator calls the matcher without a profile
    fn resolved_upstream(&self) -> bool {
        false
    }

    /// Filter candidates down to likely matches
    fn match_candidates(
        &self,
        candidates: &[Value],
        profile: Option<&UserProfile>,
    ) -> Result<Vec<Value>, MatchError>;

    /// Pick this network's candidates from a scraping response and filter them
    fn run(
        &self,
        response: &ScrapingResponse,
        profile: Option<&UserProfile>,
    ) -> Result<NetworkMatches, MatchError> {
        let network = self.network();
        let records = self.match_candidates(response.candidates(network), profile)?;
        Ok(NetworkMatches::new(network, records))
    }
}

/// Thread-safe matcher handle
pub type SharedMatcher = Arc<dyn NetworkMatcher>;
