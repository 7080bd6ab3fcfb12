//! Scraping input and analysis output
//!
//! Candidate records are kept as raw JSON values. Matchers only ever decide
//! whether a record survives, so every record leaves with exactly the shape
//! it arrived in.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::{CoreError, Network};

/// LinkedIn results arrive already narrowed by the scraper
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkedinResults {
    pub potential_subjects_after_filtering: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Everything the scraping step collected for one search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapingResponse {
    pub facebook: Vec<Value>,
    pub instagram: Vec<Value>,
    pub linkedin: LinkedinResults,
    pub twitter: Vec<Value>,
    /// Auxiliary web search results, copied to the output untouched
    pub google_search: Value,
    /// Any other top-level fields, also passed through
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ScrapingResponse {
    /// A response with no candidates anywhere
    pub fn empty(google_search: Value) -> Self {
        Self {
            facebook: Vec::new(),
            instagram: Vec::new(),
            linkedin: LinkedinResults::default(),
            twitter: Vec::new(),
            google_search,
            extra: Map::new(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        serde_json::from_str(json).map_err(CoreError::InvalidResponse)
    }

    pub fn from_value(value: Value) -> Result<Self, CoreError> {
        serde_json::from_value(value).map_err(CoreError::InvalidResponse)
    }

    /// Raw candidate records for a network
    pub fn candidates(&self, network: Network) -> &[Value] {
        match network {
            Network::Facebook => &self.facebook,
            Network::Instagram => &self.instagram,
            Network::Linkedin => &self.linkedin.potential_subjects_after_filtering,
            Network::Twitter => &self.twitter,
        }
    }

    /// Fields not owned by any matcher
    pub fn passthrough(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("google_search".to_string(), self.google_search.clone());
        for (key, value) in &self.extra {
            fields.insert(key.clone(), value.clone());
        }
        fields
    }
}

/// The surviving candidates of one network
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkMatches {
    pub network: Network,
    pub records: Vec<Value>,
}

impl NetworkMatches {
    pub fn new(network: Network, records: Vec<Value>) -> Self {
        Self { network, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Merged output: network name to surviving records, plus passthrough fields
///
/// Serializes as a single flat object, e.g.
/// `{"facebook": [...], "instagram": [...], ..., "google_search": {...}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisResult {
    #[serde(flatten)]
    matches: BTreeMap<Network, Vec<Value>>,
    #[serde(flatten)]
    passthrough: Map<String, Value>,
}

impl AnalysisResult {
    pub fn new(passthrough: Map<String, Value>) -> Self {
        Self {
            matches: BTreeMap::new(),
            passthrough,
        }
    }

    /// Add one network's output. Networks are disjoint, so a repeated
    /// network replaces the earlier entry.
    pub fn merge(&mut self, matches: NetworkMatches) {
        self.matches.insert(matches.network, matches.records);
    }

    pub fn get(&self, network: Network) -> Option<&[Value]> {
        self.matches.get(&network).map(Vec::as_slice)
    }

    pub fn networks(&self) -> impl Iterator<Item = Network> + '_ {
        self.matches.keys().copied()
    }

    pub fn passthrough(&self) -> &Map<String, Value> {
        &self.passthrough
    }

    /// Number of surviving records across all networks
    pub fn total_matches(&self) -> usize {
        self.matches.values().map(Vec::len).sum()
    }

    /// All top-level keys of the serialized result
    pub fn keys(&self) -> Vec<String> {
        self.matches
            .keys()
            .map(|n| n.key().to_string())
            .chain(self.passthrough.keys().cloned())
            .collect()
    }

    pub fn to_value(&self) -> Value {
        let mut object = Map::new();
        for (network, records) in &self.matches {
            object.insert(network.key().to_string(), Value::Array(records.clone()));
        }
        for (key, value) in &self.passthrough {
            object.insert(key.clone(), value.clone());
        }
        Value::Object(object)
    }
}
