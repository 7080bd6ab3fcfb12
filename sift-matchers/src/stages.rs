//! The filter stages every profile-driven matcher runs
//!
//! - Identity: handle or full-name equality
//! - Attributes: location, company, job title and school narrow the
//!   identity matches where both sides carry them
//! - Text: description similarity against the user's free text
//!
//! Both stages keep `(index, record)` pairs so later errors still point at
//! the record's position in the original list.

use serde_json::Value;
use std::borrow::Cow;
use tracing::{debug, trace};

use sift_core::{
    similarity, Attribute, MatcherConfig, MissingDescriptionPolicy, UserProfile, MIN_SCORE,
};

use crate::{MatchError, NetworkMatcher};

/// Identity fields read from one candidate
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity<'v> {
    pub handle: Option<&'v str>,
    pub name: Option<Cow<'v, str>>,
}

/// Attribute values read from one candidate, several per attribute allowed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes<'v> {
    values: Vec<(Attribute, &'v str)>,
}

impl<'v> Attributes<'v> {
    /// Record a value; blank and missing values are ignored
    pub fn push(&mut self, attribute: Attribute, value: Option<&'v str>) {
        if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            self.values.push((attribute, value));
        }
    }

    pub fn with(mut self, attribute: Attribute, value: Option<&'v str>) -> Self {
        self.push(attribute, value);
        self
    }

    pub fn values(&self, attribute: Attribute) -> impl Iterator<Item = &'v str> + '_ {
        self.values
            .iter()
            .filter(move |(a, _)| *a == attribute)
            .map(|(_, v)| *v)
    }
}

/// How a network's records expose the fields the stages read
pub trait RecordSchema: NetworkMatcher {
    fn identity<'v>(&self, index: usize, record: &'v Value) -> Result<Identity<'v>, MatchError>;

    /// Location, employer and school facts the record carries
    fn attributes<'v>(&self, _index: usize, _record: &'v Value) -> Result<Attributes<'v>, MatchError> {
        Ok(Attributes::default())
    }

    /// Free-text field for the text stage; `None` when the schema has none
    fn description<'v>(
        &self,
        index: usize,
        record: &'v Value,
    ) -> Option<Result<Option<&'v str>, MatchError>>;
}

/// Candidates paired with their position in the input list
pub type Indexed<'v> = Vec<(usize, &'v Value)>;

fn same_text(a: &str, b: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        a == b
    } else {
        a.to_lowercase() == b.to_lowercase()
    }
}

/// Whether a candidate's identity matches the profile
///
/// A supplied handle must match exactly; without one the displayed name
/// must equal the profile's full name.
pub fn identity_matches(
    identity: &Identity<'_>,
    handle: Option<&str>,
    full_name: &str,
    case_sensitive: bool,
) -> bool {
    match handle {
        Some(wanted) => identity
            .handle
            .is_some_and(|found| same_text(found, wanted, case_sensitive)),
        None => identity
            .name
            .as_deref()
            .is_some_and(|found| same_text(found, full_name, case_sensitive)),
    }
}

/// Stage 1: keep candidates whose handle or name identifies the profile
pub fn identity_filter<'v, S: RecordSchema + ?Sized>(
    schema: &S,
    candidates: &'v [Value],
    profile: &UserProfile,
    config: &MatcherConfig,
) -> Result<Indexed<'v>, MatchError> {
    let network = schema.network();
    let handle = profile.nickname(network);
    let full_name = profile.full_name();

    let mut after_identity = Vec::new();
    for (index, record) in candidates.iter().enumerate() {
        let identity = schema.identity(index, record)?;
        if identity_matches(&identity, handle, &full_name, config.case_sensitive_identity) {
            after_identity.push((index, record));
        }
    }

    debug!(
        "{} identity filter kept {}/{} candidates (by {})",
        network,
        after_identity.len(),
        candidates.len(),
        if handle.is_some() { "handle" } else { "full name" }
    );
    Ok(after_identity)
}

/// Whether a candidate's attributes agree with the profile
///
/// An attribute only takes part when the profile gives it and the candidate
/// carries at least one value for it; one value sharing a word with the
/// profile's is enough.
pub fn attributes_match(attributes: &Attributes<'_>, profile: &UserProfile) -> bool {
    Attribute::ALL.iter().all(|&attribute| {
        let Some(wanted) = profile.attribute(attribute) else {
            return true;
        };
        let mut found = attributes.values(attribute).peekable();
        found.peek().is_none() || found.any(|value| similarity(wanted, value) > MIN_SCORE)
    })
}

/// Stage 1b: drop identity matches whose attributes contradict the profile
pub fn attribute_filter<'v, S: RecordSchema + ?Sized>(
    schema: &S,
    survivors: Indexed<'v>,
    profile: &UserProfile,
) -> Result<Indexed<'v>, MatchError> {
    let network = schema.network();
    let before = survivors.len();

    let mut after_attributes = Vec::with_capacity(before);
    for (index, record) in survivors {
        let attributes = schema.attributes(index, record)?;
        if attributes_match(&attributes, profile) {
            after_attributes.push((index, record));
        } else {
            trace!("{} record {} attributes disagree with the profile", network, index);
        }
    }

    debug!(
        "{} attribute filter kept {}/{} candidates",
        network,
        after_attributes.len(),
        before
    );
    Ok(after_attributes)
}

/// Stage 2: keep candidates whose description is close to the user's text
pub fn text_filter<'v, S: RecordSchema + ?Sized>(
    schema: &S,
    survivors: Indexed<'v>,
    profile: &UserProfile,
    config: &MatcherConfig,
) -> Result<Indexed<'v>, MatchError> {
    let network = schema.network();
    let required = profile.description();
    let before = survivors.len();

    let mut after_text = Vec::new();
    for (index, record) in survivors {
        let Some(text) = schema.description(index, record) else {
            // No free-text field in this network's records
            after_text.push((index, record));
            continue;
        };
        let text = text?.unwrap_or_default();

        let keep = match required {
            Some(required) => {
                let score = similarity(required, text);
                trace!("{} record {} description similarity {:.3}", network, index, score);
                config.admits(score)
            }
            None => config.missing_description == MissingDescriptionPolicy::KeepAll,
        };
        if keep {
            after_text.push((index, record));
        }
    }

    if required.is_none() {
        debug!(
            "{} has no description to compare, policy {:?}",
            network, config.missing_description
        );
    }
    debug!("{} text filter kept {}/{} candidates", network, after_text.len(), before);
    Ok(after_text)
}

/// Run every stage and copy out the surviving records
pub fn run_stages<S: RecordSchema + ?Sized>(
    schema: &S,
    candidates: &[Value],
    profile: &UserProfile,
    config: &MatcherConfig,
) -> Result<Vec<Value>, MatchError> {
    let after_identity = identity_filter(schema, candidates, profile, config)?;
    let after_attributes = attribute_filter(schema, after_identity, profile)?;
    let after_text = text_filter(schema, after_attributes, profile, config)?;
    Ok(after_text.into_iter().map(|(_, record)| record.clone()).collect())
}
