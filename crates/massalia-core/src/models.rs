//! Shared typed models used across the venue, indexing, and merge layers.

use std::path::PathBuf;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::EngineResult;

// ---------------------------------------------------------------------------
// Confidence thresholds
// ---------------------------------------------------------------------------

/// Minimum confidence for a candidate to be classified as a duplicate.
pub const DUPLICATE_THRESHOLD: f64 = 0.7;

/// Minimum confidence for a duplicate to be auto-merged.
pub const MERGE_THRESHOLD: f64 = 0.8;

/// Floor of the near-duplicate band; candidates in
/// `[NEAR_DUPLICATE_FLOOR, DUPLICATE_THRESHOLD)` require manual review.
pub const NEAR_DUPLICATE_FLOOR: f64 = 0.5;

/// Default similarity threshold for the venue duplicate audit.
pub const VENUE_AUDIT_THRESHOLD: f64 = 0.85;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Tunable confidence thresholds for duplicate classification.
///
/// Passed into [`crate::dedup::detector::Deduplicator`] at construction; the
/// defaults reproduce the production tuning.
#[derive(Clone, Copy, Debug)]
pub struct DedupConfig {
    pub duplicate_threshold: f64,
    pub merge_threshold: f64,
    pub near_duplicate_floor: f64,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            duplicate_threshold: DUPLICATE_THRESHOLD,
            merge_threshold: MERGE_THRESHOLD,
            near_duplicate_floor: NEAR_DUPLICATE_FLOOR,
        }
    }
}

// ---------------------------------------------------------------------------
// Venue
// ---------------------------------------------------------------------------

/// One canonical venue from the registry file.
///
/// `slug` is the stable identifier; everything else is presentation or lookup
/// metadata.  `aliases` are legacy URL paths of the form `/locations/{seg}/`;
/// `search_names` are explicit free-text variants seen in the wild.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Venue {
    pub slug: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub website: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub search_names: Vec<String>,
    #[serde(default)]
    pub body: String,
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// A published event as loaded from a persisted front-matter document.
#[derive(Clone, Debug)]
pub struct IndexedEvent {
    pub path: PathBuf,
    pub name: String,
    /// `YYYY-MM-DD`.
    pub date: String,
    /// `HH:MM`.
    pub start_time: String,
    /// First canonical venue slug of the document's `locations` list.
    pub location: String,
    pub event_url: String,
    pub source_id: String,
    pub description: String,
    pub image: Option<String>,
}

/// A freshly scraped event, not yet known to be new or duplicate.
///
/// `locations` holds free text until the caller has run it through
/// [`crate::venues::VenueManager::map_location`].
#[derive(Clone, Debug)]
pub struct CandidateEvent {
    pub name: String,
    pub start: NaiveDateTime,
    pub event_url: Option<String>,
    pub locations: Vec<String>,
    pub description: String,
    pub image: Option<String>,
    pub source_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Result of a duplicate detection check.
#[derive(Clone, Debug)]
pub struct DuplicateResult {
    pub is_duplicate: bool,
    /// Confidence in `[0, 1]` that the candidate matches `existing_path`.
    pub confidence: f64,
    pub existing_path: Option<PathBuf>,
    /// Every signal that fired during the cascade, not just the winning one.
    pub match_reasons: Vec<String>,
    pub should_merge: bool,
}

impl DuplicateResult {
    /// Whether this candidate requires manual review: confident enough to
    /// flag, not confident enough to auto-classify as a duplicate.
    pub fn is_near_duplicate(&self) -> bool {
        (NEAR_DUPLICATE_FLOOR..DUPLICATE_THRESHOLD).contains(&self.confidence)
    }
}

/// Result of merging duplicate event data into an existing document.
#[derive(Clone, Debug, Default)]
pub struct MergeResult {
    pub updated: bool,
    pub changes: Vec<String>,
}

// ---------------------------------------------------------------------------
// Venue audit
// ---------------------------------------------------------------------------

/// Which similarity signal flagged a venue pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VenueMatchKind {
    Name,
    Address,
    Website,
}

/// A pair of registered venues that may describe the same place.
#[derive(Clone, Debug, Serialize)]
pub struct VenueDuplicate {
    pub slug_a: String,
    pub slug_b: String,
    pub similarity: f64,
    pub match_type: VenueMatchKind,
}

/// A venue missing required registry fields.
#[derive(Clone, Debug, Serialize)]
pub struct VenueMissingFields {
    pub slug: String,
    pub fields: Vec<&'static str>,
}

/// Operator-facing report produced by the venue audit.
#[derive(Clone, Debug, Default, Serialize)]
pub struct VenueAuditReport {
    pub missing_fields: Vec<VenueMissingFields>,
    pub duplicates: Vec<VenueDuplicate>,
    pub unmapped_locations: Vec<String>,
    pub total_venues: usize,
}

impl VenueAuditReport {
    /// Render the report as a JSON value for the operator tooling.
    pub fn to_json(&self) -> EngineResult<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}
