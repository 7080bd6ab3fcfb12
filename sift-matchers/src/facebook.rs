//! Facebook Matcher
//!
//! Scraped Facebook entries are thin: a profile `link` and, for some entries,
//! a displayed name stored under the scraper's `"Profile name: "` key.
//! - Identity: last path segment of `link` against the supplied nickname,
//!   else the displayed name against the full name
//! - Text: none, the records carry no free-text field

use serde_json::Value;
use std::borrow::Cow;

use sift_core::{MatcherConfig, Network, UserProfile};

use crate::record::RecordView;
use crate::stages::{run_stages, Identity, RecordSchema};
use crate::{MatchError, NetworkMatcher};

/// Key the scraper uses for the displayed profile name
pub const PROFILE_NAME_KEY: &str = "Profile name: ";

/// Facebook profile matcher
pub struct FacebookMatcher {
    config: MatcherConfig,
}

impl FacebookMatcher {
    pub fn new(config: MatcherConfig) -> Self {
        Self { config }
    }
}

/// Profile handle from a link such as `https://www.facebook.com/amy.butler.906/`
pub fn handle_from_link(link: &str) -> Option<&str> {
    let path = link.split(['?', '#']).next().unwrap_or(link);
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty() && !segment.contains("facebook.com"))
}

impl RecordSchema for FacebookMatcher {
    fn identity<'v>(&self, index: usize, record: &'v Value) -> Result<Identity<'v>, MatchError> {
        let view = RecordView::object(Network::Facebook, index, record)?;
        Ok(Identity {
            handle: view.field("link")?.and_then(handle_from_link),
            name: view.optional_field(PROFILE_NAME_KEY)?.map(Cow::Borrowed),
        })
    }

    fn description<'v>(
        &self,
        _index: usize,
        _record: &'v Value,
    ) -> Option<Result<Option<&'v str>, MatchError>> {
        None
    }
}

impl NetworkMatcher for FacebookMatcher {
    fn network(&self) -> Network {
        Network::Facebook
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
            network: Network::Facebook,
        })?;
        run_stages(self, candidates, profile, &self.config)
    }
}
