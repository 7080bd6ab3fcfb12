//! Sift Core - Domain model and scoring for profile reconciliation
//!
//! This crate provides the foundational pieces shared by every matcher:
//! - The closed set of supported networks
//! - User profile and scraping response shapes
//! - The analysis result with its passthrough fields
//! - Free-text similarity scoring
//! - TOML-backed configuration

pub mod config;
pub mod error;
pub mod network;
pub mod profile;
pub mod response;
pub mod similarity;

pub use config::*;
pub use error::*;
pub use network::*;
pub use profile::*;
pub use response::*;
pub use similarity::*;

/// Default minimum description similarity for a candidate to survive
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.4;

/// Minimum normalized Levenshtein similarity for two tokens to count as partners
pub const FUZZY_TOKEN_SIMILARITY: f64 = 0.85;

/// Default number of matcher workers (one per network)
pub const DEFAULT_POOL_SIZE: usize = 4;

/// Minimum similarity score
pub const MIN_SCORE: f64 = 0.0;

/// Maximum similarity score
pub const MAX_SCORE: f64 = 1.0;
