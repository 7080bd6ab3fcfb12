//! Sift Matchers
//!
//! Per-network filters that decide which scraped candidates belong to the
//! person described by the user:
//! - **Facebook**: link handle or displayed name
//! - **Instagram**: username or full name, then biography similarity
//! - **LinkedIn**: passthrough of the scraper's pre-filtered subjects
//! - **Twitter**: screen name or name, then description similarity
//!
//! All matchers implement [`NetworkMatcher`] and share the identity and
//! text stages in [`stages`].

pub mod facebook;
pub mod instagram;
pub mod linkedin;
pub mod record;
pub mod stages;
pub mod traits;
pub mod twitter;

pub use facebook::*;
pub use instagram::*;
pub use linkedin::*;
pub use traits::*;
pub use twitter::*;

use std::sync::Arc;

use sift_core::MatcherConfig;

/// One matcher per network, in merge order
pub fn default_matchers(config: &MatcherConfig) -> Vec<SharedMatcher> {
    vec![
        Arc::new(FacebookMatcher::new(config.clone())) as SharedMatcher,
        Arc::new(InstagramMatcher::new(config.clone())) as SharedMatcher,
        Arc::new(LinkedinMatcher::new(config.clone())) as SharedMatcher,
        Arc::new(TwitterMatcher::new(config.clone())) as SharedMatcher,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use sift_core::{MissingDescriptionPolicy, Network, ScrapingResponse, UserProfile};

    fn response() -> ScrapingResponse {
        ScrapingResponse::from_value(json!({
            "facebook": [
                {"service_name": "Facebook Profile", "link": "https://www.facebook.com/amy.butler.906/", "Profile name: ": "Amy Butler"}
            ],
            "instagram": [
                {"username": "amylibbybutler", "full_name": "Amy Butler", "biography": "English teacher in Kyiv"},
                {"username": "amyb", "full_name": "Amy Butler", "biography": ""},
                {"username": "butler.amy", "full_name": "Amy Butler", "biography": "Farmers Wife"}
            ],
            "linkedin": {"potential_subjects_after_filtering": []},
            "twitter": [],
            "google_search": {"name": []}
        }))
        .unwrap()
    }

    #[test]
    fn test_default_matchers_cover_every_network() {
        let networks: Vec<_> = default_matchers(&MatcherConfig::default())
            .iter()
            .map(|m| m.network())
            .collect();
        assert_eq!(networks, Network::ALL.to_vec());
    }

    #[test]
    fn test_output_is_ordered_subset() {
        let response = response();
        let profile = UserProfile::new("Amy", "Butler").with_description("teacher");
        let config = MatcherConfig::default().with_threshold(0.0);

        for matcher in default_matchers(&config) {
            let input = response.candidates(matcher.network());
            let output = matcher.run(&response, Some(&profile)).unwrap();

            // Every output record appears in the input, in the same order
            let mut cursor = input.iter();
            for record in &output.records {
                assert!(cursor.any(|candidate| candidate == record));
            }
        }
    }

    #[test]
    fn test_missing_description_policies() {
        let response = response();
        let profile = UserProfile::new("Amy", "Butler");
        let instagram = |policy| {
            let matcher = InstagramMatcher::new(
                MatcherConfig::default().with_missing_description(policy),
            );
            matcher.run(&response, Some(&profile)).unwrap().records
        };

        let kept: Vec<Value> = instagram(MissingDescriptionPolicy::KeepAll);
        assert_eq!(kept.len(), 3);

        let dropped: Vec<Value> = instagram(MissingDescriptionPolicy::DropAll);
        assert!(dropped.is_empty());
    }

    #[test]
    fn test_run_wraps_network_key() {
        let matcher = InstagramMatcher::new(MatcherConfig::default());
        let profile = UserProfile::new("Amy", "Butler").with_description("English teacher");

        let output = matcher.run(&response(), Some(&profile)).unwrap();
        assert_eq!(output.network, Network::Instagram);
        assert_eq!(output.len(), 1);
        assert_eq!(output.records[0]["username"], "amylibbybutler");
    }
}
