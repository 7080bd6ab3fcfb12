//! Instagram Matcher
//!
//! Filters scraped Instagram accounts against the user profile.
//! - Identity: `username` against the supplied nickname, else `full_name`
//! - Text: `biography` against the user's description

use serde_json::Value;
use std::borrow::Cow;

use sift_core::{MatcherConfig, Network, UserProfile};

use crate::record::RecordView;
use crate::stages::{run_stages, Identity, RecordSchema};
use crate::{MatchError, NetworkMatcher};

/// Instagram account matcher
pub struct InstagramMatcher {
    config: MatcherConfig,
}

impl InstagramMatcher {
    pub fn new(config: MatcherConfig) -> Self {
        Self { config }
    }
}

impl RecordSchema for InstagramMatcher {
    fn identity<'v>(&self, index: usize, record: &'v Value) -> Result<Identity<'v>, MatchError> {
        let view = RecordView::object(Network::Instagram, index, record)?;
        Ok(Identity {
            handle: view.field("username")?,
            name: view.field("full_name")?.map(Cow::Borrowed),
        })
    }

    fn description<'v>(
        &self,
        index: usize,
        record: &'v Value,
    ) -> Option<Result<Option<&'v str>, MatchError>> {
        Some(RecordView::object(Network::Instagram, index, record).and_then(|v| v.field("biography")))
    }
}

impl NetworkMatcher for InstagramMatcher {
    fn network(&self) -> Network {
        Network::Instagram
    }

    fn config(&self) -> &MatcherConfig {
        &self.config
    }

    fn match_candidates(
        &self,
        candidates: &[Value],
        profile: Option<&UserProfile>,
    ) -> Result<Vec<Value>, MatchError> {
        let profile = profile.ok_or(MatchError::ProfileRequired {
            network: Network::Instagram,
        })?;
        run_stages(self, candidates, profile, &self.config)
    }
}
