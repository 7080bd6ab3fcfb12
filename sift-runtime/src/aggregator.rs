//! Aggregator
//!
//! Runs the four network matchers over one scraping response and merges
//! their outputs:
//! - Each matcher is a blocking job on tokio's blocking pool
//! - A semaphore bounds how many run at once
//! - An optional per-matcher timeout bounds the wait
//! - Outputs are a disjoint union keyed by network, plus passthrough fields

use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use sift_core::{
    AnalysisResult, CoreError, FailurePolicy, Network, NetworkMatches, RuntimeConfig,
    ScrapingResponse, SiftConfig, UserProfile,
};
use sift_matchers::{default_matchers, MatchError, SharedMatcher};

/// Errors from aggregation
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] CoreError),

    #[error("Matcher failed: {source}")]
    Matcher {
        network: Network,
        #[source]
        source: MatchError,
    },
}

impl AnalysisError {
    /// Network whose matcher caused the failure, if any
    pub fn network(&self) -> Option<Network> {
        match self {
            Self::Config(_) => None,
            Self::Matcher { network, .. } => Some(*network),
        }
    }
}

/// A network left out of a partial result
#[derive(Debug)]
pub struct NetworkFailure {
    pub network: Network,
    pub error: MatchError,
}

/// Merged matcher output
///
/// Under [`FailurePolicy::Abort`] `failures` is always empty. Under
/// [`FailurePolicy::Partial`] failing networks are missing from `result`
/// and listed in `failures` instead.
#[derive(Debug)]
pub struct Analysis {
    pub result: AnalysisResult,
    pub failures: Vec<NetworkFailure>,
}

impl Analysis {
    /// Whether every matcher contributed to the result
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

type Outcome = (Network, Result<NetworkMatches, MatchError>);

/// Fan-out/fan-in coordinator for the network matchers
pub struct Aggregator {
    matchers: Vec<SharedMatcher>,
    runtime: RuntimeConfig,
}

impl Aggregator {
    /// Create an aggregator with one matcher per network
    pub fn new(config: SiftConfig) -> Result<Self, AnalysisError> {
        config.validate()?;
        Ok(Self {
            matchers: default_matchers(&config.matching),
            runtime: config.runtime,
        })
    }

    /// Create an aggregator over a custom matcher set
    pub fn with_matchers(
        runtime: RuntimeConfig,
        matchers: Vec<SharedMatcher>,
    ) -> Result<Self, AnalysisError> {
        runtime.validate()?;
        Ok(Self { matchers, runtime })
    }

    pub fn runtime(&self) -> &RuntimeConfig {
        &self.runtime
    }

    pub fn matcher_count(&self) -> usize {
        self.matchers.len()
    }

    /// Run every matcher concurrently and merge the results
    pub async fn analyze(
        &self,
        response: &ScrapingResponse,
        profile: &UserProfile,
    ) -> Result<Analysis, AnalysisError> {
        info!(
            "Analyzing {} networks with {} workers",
            self.matchers.len(),
            self.runtime.pool_size
        );

        let shared_response = Arc::new(response.clone());
        let shared_profile = Arc::new(profile.clone());
        let permits = Arc::new(Semaphore::new(self.runtime.pool_size));
        let timeout = self.runtime.matcher_timeout();

        let jobs: Vec<_> = self
            .matchers
            .iter()
            .map(|matcher| {
                let network = matcher.network();
                let job = run_matcher(
                    Arc::clone(matcher),
                    Arc::clone(&shared_response),
                    Arc::clone(&shared_profile),
                    Arc::clone(&permits),
                    timeout,
                );
                async move { (network, job.await) }
            })
            .collect();

        let outcomes = join_all(jobs).await;
        self.merge(response, outcomes)
    }

    /// Run every matcher in order on the calling thread
    ///
    /// Produces the same result as [`Aggregator::analyze`]; the timeout does
    /// not apply.
    pub fn analyze_sequential(
        &self,
        response: &ScrapingResponse,
        profile: &UserProfile,
    ) -> Result<Analysis, AnalysisError> {
        let outcomes = self
            .matchers
            .iter()
            .map(|matcher| {
                let profile = (!matcher.resolved_upstream()).then_some(profile);
                (matcher.network(), matcher.run(response, profile))
            })
            .collect();
        self.merge(response, outcomes)
    }

    fn merge(
        &self,
        response: &ScrapingResponse,
        outcomes: Vec<Outcome>,
    ) -> Result<Analysis, AnalysisError> {
        let mut result = AnalysisResult::new(response.passthrough());
        let mut failures = Vec::new();

        for (network, outcome) in outcomes {
            match outcome {
                Ok(matches) => {
                    debug!(
                        "{} kept {}/{} candidates",
                        network,
                        matches.len(),
                        response.candidates(network).len()
                    );
                    result.merge(matches);
                }
                Err(error) => {
                    warn!("{} matcher failed: {}", network, error);
                    match self.runtime.failure_policy {
                        FailurePolicy::Abort => {
                            return Err(AnalysisError::Matcher {
                                network,
                                source: error,
                            });
                        }
                        FailurePolicy::Partial => failures.push(NetworkFailure { network, error }),
                    }
                }
            }
        }

        info!(
            "Analysis complete: {} matches across {} networks, {} failed",
            result.total_matches(),
            result.networks().count(),
            failures.len()
        );
        Ok(Analysis { result, failures })
    }
}

/// Run one matcher on the blocking pool, holding a worker permit
///
/// The permit moves into the blocking job, so a timed-out job that keeps
/// running still counts against the pool until it finishes.
async fn run_matcher(
    matcher: SharedMatcher,
    response: Arc<ScrapingResponse>,
    profile: Arc<UserProfile>,
    permits: Arc<Semaphore>,
    timeout: Option<Duration>,
) -> Result<NetworkMatches, MatchError> {
    let network = matcher.network();
    let permit = permits
        .acquire_owned()
        .await
        .map_err(|e| MatchError::Worker {
            network,
            reason: e.to_string(),
        })?;

    debug!("{} matcher started", network);
    let job = tokio::task::spawn_blocking(move || {
        let _permit = permit;
        let profile = (!matcher.resolved_upstream()).then_some(profile.as_ref());
        matcher.run(&response, profile)
    });

    let joined = match timeout {
        Some(limit) => match tokio::time::timeout(limit, job).await {
            Ok(joined) => joined,
            Err(_) => {
                return Err(MatchError::Timeout {
                    network,
                    after_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
                });
            }
        },
        None => job.await,
    };

    joined.map_err(|e| MatchError::Worker {
        network,
        reason: e.to_string(),
    })?
}
