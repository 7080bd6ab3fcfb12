//! LinkedIn Matcher
//!
//! LinkedIn subjects reach us already narrowed by the scraper
//! (`potential_subjects_after_filtering`), so this matcher is asymmetric:
//! - Without a profile: validated passthrough, the list comes back unchanged
//! - With a profile: light filter on `firstName lastName` against the full
//!   name (there is no handle branch), then location, employer, title and
//!   school from the subject and its `experience`/`education` entries, then
//!   `headline` against the user's description

use serde_json::Value;
use std::borrow::Cow;
use tracing::debug;

use sift_core::{Attribute, MatcherConfig, Network, UserProfile};

use crate::record::RecordView;
use crate::stages::{run_stages, Attributes, Identity, RecordSchema};
use crate::{MatchError, NetworkMatcher};

/// LinkedIn subject matcher
pub struct LinkedinMatcher {
    config: MatcherConfig,
}

impl LinkedinMatcher {
    pub fn new(config: MatcherConfig) -> Self {
        Self { config }
    }
}

impl RecordSchema for LinkedinMatcher {
    fn identity<'v>(&self, index: usize, record: &'v Value) -> Result<Identity<'v>, MatchError> {
        let view = RecordView::object(Network::Linkedin, index, record)?;
        let first = view.field("firstName")?;
        let last = view.field("lastName")?;
        let name = match (first, last) {
            (Some(first), Some(last)) => Some(Cow::Owned(format!("{} {}", first, last))),
            _ => None,
        };
        Ok(Identity { handle: None, name })
    }

    fn attributes<'v>(&self, index: usize, record: &'v Value) -> Result<Attributes<'v>, MatchError> {
        let view = RecordView::object(Network::Linkedin, index, record)?;
        let mut attributes =
            Attributes::default().with(Attribute::Location, view.optional_field("locationName")?);

        for job in view.optional_list("experience")? {
            attributes.push(Attribute::Location, job.optional_field("locationName")?);
            attributes.push(Attribute::Company, job.optional_field("companyName")?);
            attributes.push(Attribute::JobTitle, job.optional_field("title")?);
        }
        for course in view.optional_list("education")? {
            attributes.push(Attribute::School, course.optional_field("schoolName")?);
        }
        Ok(attributes)
    }

    fn description<'v>(
        &self,
        index: usize,
        record: &'v Value,
    ) -> Option<Result<Option<&'v str>, MatchError>> {
        Some(RecordView::object(Network::Linkedin, index, record).and_then(|v| v.optional_field("headline")))
    }
}

impl NetworkMatcher for LinkedinMatcher {
    fn network(&self) -> Network {
        Network::Linkedin
    }

    fn config(&self) -> &MatcherConfig {
        &self.config
    }

    fn resolved_upstream(&self) -> bool {
        true
    }

    fn match_candidates(
        &self,
        candidates: &[Value],
        profile: Option<&UserProfile>,
    ) -> Result<Vec<Value>, MatchError> {
        match profile {
            Some(profile) => run_stages(self, candidates, profile, &self.config),
            None => {
                for (index, record) in candidates.iter().enumerate() {
                    self.identity(index, record)?;
                }
                debug!("linkedin passthrough of {} subjects", candidates.len());
                Ok(candidates.to_vec())
            }
        }
    }
}
