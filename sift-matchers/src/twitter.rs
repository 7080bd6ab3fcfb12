//! Twitter Matcher
//!
//! Each scraped Twitter record is a pair `[metadata, recent_tweets]`.
//! - Identity: metadata `screen_name` against the supplied profile handle,
//!   else metadata `name`
//! - Attributes: metadata `location`
//! - Text: metadata `description` against the user's description

use serde_json::Value;
use std::borrow::Cow;

use sift_core::{Attribute, MatcherConfig, Network, UserProfile};

use crate::record::{kind, RecordView};
use crate::stages::{run_stages, Attributes, Identity, RecordSchema};
use crate::{MatchError, NetworkMatcher};

/// Twitter account matcher
pub struct TwitterMatcher {
    config: MatcherConfig,
}

impl TwitterMatcher {
    pub fn new(config: MatcherConfig) -> Self {
        Self { config }
    }

    /// The account metadata object at the head of a record
    fn metadata<'v>(&self, index: usize, record: &'v Value) -> Result<RecordView<'v>, MatchError> {
        let malformed = |reason: String| MatchError::Malformed {
            network: Network::Twitter,
            index,
            reason,
        };
        match record {
            Value::Array(parts) => match parts.first() {
                Some(metadata) => RecordView::object(Network::Twitter, index, metadata),
                None => Err(malformed("empty record".to_string())),
            },
            other => Err(malformed(format!(
                "expected [metadata, tweets], found {}",
                kind(other)
            ))),
        }
    }
}

impl RecordSchema for TwitterMatcher {
    fn identity<'v>(&self, index: usize, record: &'v Value) -> Result<Identity<'v>, MatchError> {
        let view = self.metadata(index, record)?;
        Ok(Identity {
            handle: view.field("screen_name")?,
            name: view.field("name")?.map(Cow::Borrowed),
        })
    }

    fn attributes<'v>(&self, index: usize, record: &'v Value) -> Result<Attributes<'v>, MatchError> {
        let view = self.metadata(index, record)?;
        Ok(Attributes::default().with(Attribute::Location, view.optional_field("location")?))
    }

    fn description<'v>(
        &self,
        index: usize,
        record: &'v Value,
    ) -> Option<Result<Option<&'v str>, MatchError>> {
        Some(self.metadata(index, record).and_then(|v| v.field("description")))
    }
}

impl NetworkMatcher for TwitterMatcher {
    fn network(&self) -> Network {
        Network::Twitter
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
            network: Network::Twitter,
        })?;
        run_stages(self, candidates, profile, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn wayfarer() -> Value {
        json!([
            {
                "name": "Amy Butler",
                "screen_name": "WayfarersBook",
                "location": "Kyiv, Ukraine",
                "description": "Long-term expat, CELTA/Delta qualified English teacher, freelance writer. Insta: wayfarersbook",
                "followers_count": 697
            },
            ["These lines to vote are insane.", "RT @JordanUhl: Who does this protect? "]
        ])
    }

    fn designer() -> Value {
        json!([
            {
                "name": "Amy Butler",
                "screen_name": "amybutlerdesign",
                "location": "Granville, Ohio",
                "description": "Designer, author, and lover of color",
                "followers_count": 21000
            },
            []
        ])
    }

    #[test]
    fn test_handle_and_description() {
        let matcher = TwitterMatcher::new(MatcherConfig::default());
        let profile = UserProfile::new("Amy", "Butler")
            .with_nickname(Network::Twitter, "WayfarersBook")
            .with_description("CELTA/Delta qualified teacher");

        let kept = matcher
            .match_candidates(&[designer(), wayfarer()], Some(&profile))
            .unwrap();
        assert_eq!(kept, vec![wayfarer()]);
    }

    #[test]
    fn test_name_branch_then_description() {
        let matcher = TwitterMatcher::new(MatcherConfig::default());
        let profile = UserProfile::new("Amy", "Butler").with_description("CELTA/Delta qualified teacher");

        // Both names match; only the teacher's description clears 0.4
        let kept = matcher
            .match_candidates(&[designer(), wayfarer()], Some(&profile))
            .unwrap();
        assert_eq!(kept, vec![wayfarer()]);
    }

    #[test]
    fn test_location_narrows_name_matches() {
        let matcher = TwitterMatcher::new(MatcherConfig::default().with_threshold(0.0));
        let profile = UserProfile::new("Amy", "Butler").with_attribute(Attribute::Location, "Ukraine");

        let kept = matcher
            .match_candidates(&[designer(), wayfarer()], Some(&profile))
            .unwrap();
        assert_eq!(kept, vec![wayfarer()]);

        // An account without a location is not penalised
        let mut quiet = designer();
        quiet[0].as_object_mut().unwrap().remove("location");
        let kept = matcher
            .match_candidates(&[quiet.clone(), wayfarer()], Some(&profile))
            .unwrap();
        assert_eq!(kept, vec![quiet, wayfarer()]);
    }

    #[test]
    fn test_record_shape_errors() {
        let matcher = TwitterMatcher::new(MatcherConfig::default());
        let profile = UserProfile::new("Amy", "Butler");

        let err = matcher
            .match_candidates(&[wayfarer(), json!({"name": "Amy Butler"})], Some(&profile))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "twitter: record 1 is malformed: expected [metadata, tweets], found an object"
        );

        let err = matcher
            .match_candidates(&[json!([{"name": "Amy Butler"}, []])], Some(&profile))
            .unwrap_err();
        assert!(matches!(err, MatchError::MissingField { index: 0, field: "screen_name", .. }));
    }
}
