//! Supported social networks

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::CoreError;

/// A social network whose scraped candidates are reconciled
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Network {
    Facebook,
    Instagram,
    Linkedin,
    Twitter,
}

impl Network {
    /// All networks, in merge order
    pub const ALL: [Network; 4] = [
        Network::Facebook,
        Network::Instagram,
        Network::Linkedin,
        Network::Twitter,
    ];

    /// Key used for this network in scraping responses and results
    pub fn key(&self) -> &'static str {
        match self {
            Self::Facebook => "facebook",
            Self::Instagram => "instagram",
            Self::Linkedin => "linkedin",
            Self::Twitter => "twitter",
        }
    }

    /// Whether `key` names one of the matcher-owned networks
    pub fn is_network_key(key: &str) -> bool {
        Self::ALL.iter().any(|n| n.key() == key)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Network {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|n| n.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| CoreError::UnknownNetwork(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_keys() {
        let keys: Vec<_> = Network::ALL.iter().map(|n| n.key()).collect();
        assert_eq!(keys, vec!["facebook", "instagram", "linkedin", "twitter"]);
        assert!(Network::is_network_key("twitter"));
        assert!(!Network::is_network_key("google_search"));
    }

    #[test]
    fn test_network_serde_matches_key() {
        for network in Network::ALL {
            let json = serde_json::to_string(&network).unwrap();
            assert_eq!(json, format!("\"{}\"", network.key()));
        }
    }

    #[test]
    fn test_network_from_str() {
        assert_eq!("LinkedIn".parse::<Network>().unwrap(), Network::Linkedin);
        assert!("myspace".parse::<Network>().is_err());
    }
}
