//! The person being searched for

use serde::{Deserialize, Serialize};

use crate::{CoreError, Network};

/// Profile facts that can narrow identity matches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Location,
    Company,
    JobTitle,
    School,
}

impl Attribute {
    pub const ALL: [Attribute; 4] = [
        Attribute::Location,
        Attribute::Company,
        Attribute::JobTitle,
        Attribute::School,
    ];
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Attribute::Location => "location",
            Attribute::Company => "company",
            Attribute::JobTitle => "job_title",
            Attribute::School => "school",
        };
        write!(f, "{}", name)
    }
}

/// Search target described by the user
///
/// Only the names are required. Optional fields that are present but blank
/// are treated the same as absent ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub school: Option<String>,
    #[serde(default)]
    pub twitter_profile: Option<String>,
    #[serde(default)]
    pub instagram_nickname: Option<String>,
    #[serde(default)]
    pub facebook_nickname: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub additional_text: Option<String>,
}

impl UserProfile {
    pub fn new(first_name: &str, last_name: &str) -> Self {
        Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            ..Default::default()
        }
    }

    /// Parse a profile from its JSON form
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        serde_json::from_str(json).map_err(CoreError::InvalidProfile)
    }

    pub fn with_nickname(mut self, network: Network, nickname: &str) -> Self {
        let value = Some(nickname.to_string());
        match network {
            Network::Instagram => self.instagram_nickname = value,
            Network::Twitter => self.twitter_profile = value,
            Network::Facebook => self.facebook_nickname = value,
            Network::Linkedin => {}
        }
        self
    }

    pub fn with_description(mut self, text: &str) -> Self {
        self.additional_text = Some(text.to_string());
        self
    }

    pub fn with_attribute(mut self, attribute: Attribute, value: &str) -> Self {
        let value = Some(value.to_string());
        match attribute {
            Attribute::Location => self.location = value,
            Attribute::Company => self.company = value,
            Attribute::JobTitle => self.job_title = value,
            Attribute::School => self.school = value,
        }
        self
    }

    /// First and last name joined by a single space
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// The handle the user supplied for `network`, if any
    pub fn nickname(&self, network: Network) -> Option<&str> {
        let value = match network {
            Network::Instagram => &self.instagram_nickname,
            Network::Twitter => &self.twitter_profile,
            Network::Facebook => &self.facebook_nickname,
            Network::Linkedin => return None,
        };
        non_blank(value)
    }

    /// The value the user gave for `attribute`, if any
    pub fn attribute(&self, attribute: Attribute) -> Option<&str> {
        let value = match attribute {
            Attribute::Location => &self.location,
            Attribute::Company => &self.company,
            Attribute::JobTitle => &self.job_title,
            Attribute::School => &self.school,
        };
        non_blank(value)
    }

    /// Free-text description to compare bios against
    pub fn description(&self) -> Option<&str> {
        non_blank(&self.additional_text)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}
