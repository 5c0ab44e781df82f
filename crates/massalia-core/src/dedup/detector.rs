//! Duplicate event detection: three-tier matching cascade over the event
//! index.

use std::path::Path;

use tracing::{debug, info};

use crate::models::{CandidateEvent, DedupConfig, DuplicateResult, MergeResult};
use crate::normalize::{normalize_name, normalize_url};
use crate::similarity::sequence_ratio;
use crate::store::EventStore;

use super::index::{EventIndex, IndexStats};
use super::merge;

/// Confidence assigned to an exact booking-URL match.
const URL_MATCH_CONFIDENCE: f64 = 0.95;
/// Confidence for same date/time/location with a strongly similar name.
const DATE_LOCATION_CONFIDENCE: f64 = 0.85;
/// Confidence for same date/time/location with a moderately similar name.
const MODERATE_MATCH_CONFIDENCE: f64 = 0.6;
/// Confidence for a near-identical name on the same calendar date.
const SAME_NAME_CONFIDENCE: f64 = 0.75;

/// Name-similarity cutoffs for the cascade tiers.
const STRONG_NAME_SIMILARITY: f64 = 0.7;
const MODERATE_NAME_SIMILARITY: f64 = 0.5;
const SAME_NAME_SIMILARITY: f64 = 0.85;

/// The name-on-same-date tier only runs while confidence is below this.
const NAME_TIER_CEILING: f64 = 0.8;

/// Detects duplicate events across sources and merges confirmed duplicates.
///
/// Owns the event index built from the published corpus.  Designed for
/// sequential use: check one candidate, then index it (or merge it) before
/// checking the next.
#[derive(Debug)]
pub struct Deduplicator {
    store: EventStore,
    index: EventIndex,
    config: DedupConfig,
}

impl Deduplicator {
    /// Build the deduplicator over a published-events directory.
    pub fn new(content_dir: impl Into<std::path::PathBuf>) -> Self {
        Self::with_config(content_dir, DedupConfig::default())
    }

    /// Same as [`Deduplicator::new`] but with custom thresholds.
    pub fn with_config(content_dir: impl Into<std::path::PathBuf>, config: DedupConfig) -> Self {
        let store = EventStore::new(content_dir);
        let index = EventIndex::build(&store);
        Self { store, index, config }
    }

    /// Check a candidate against the index.
    pub fn check(&self, event: &CandidateEvent) -> DuplicateResult {
        let result = check_duplicate(&self.index, &self.config, event);
        if result.is_duplicate {
            info!(
                "Duplicate detected: '{}' (confidence: {:.0}%, reasons: {:?})",
                event.name,
                result.confidence * 100.0,
                result.match_reasons
            );
        } else if result.is_near_duplicate() {
            info!(
                "Near-duplicate detected: '{}' (confidence: {:.0}%, requires review)",
                event.name,
                result.confidence * 100.0
            );
        }
        result
    }

    /// Merge a confirmed duplicate's data into the existing document.
    pub fn merge_event(&self, existing_path: &Path, event: &CandidateEvent) -> MergeResult {
        merge::merge_event(existing_path, event)
    }

    /// Add a newly accepted event to the live index.
    pub fn index_event(&mut self, event: crate::models::IndexedEvent) {
        self.index.insert(event);
    }

    /// Rebuild the index from the corpus.  O(corpus size); intended once per
    /// crawl session.
    pub fn refresh_index(&mut self) {
        self.index = EventIndex::build(&self.store);
    }

    pub fn index(&self) -> &EventIndex {
        &self.index
    }

    pub fn stats(&self) -> IndexStats {
        self.index.stats()
    }
}

/// The three-tier cascade itself, over an in-memory index.
///
/// Confidence only ever rises, and the existing-record reference is updated
/// in lock-step with it: a signal that does not raise confidence does not
/// replace the reference either.  Every reason is accumulated regardless of
/// which signal ends up winning.
pub fn check_duplicate(
    index: &EventIndex,
    config: &DedupConfig,
    event: &CandidateEvent,
) -> DuplicateResult {
    let mut reasons: Vec<String> = Vec::new();
    let mut confidence: f64 = 0.0;
    let mut existing: Option<&crate::models::IndexedEvent> = None;

    // 1. Exact booking URL (strongest signal).
    if let Some(url) = event.event_url.as_deref().filter(|u| !u.is_empty()) {
        let url_key = normalize_url(url);
        if let Some(matched) = index.lookup_url(&url_key) {
            existing = Some(matched);
            confidence = URL_MATCH_CONFIDENCE;
            reasons.push(format!("Matching booking URL: {url}"));
            debug!("URL match found: {url}");
        }
    }

    let date_str = event.start.format("%Y-%m-%d").to_string();
    let time_str = event.start.format("%H:%M").to_string();

    // 2. Same date + time + location, ranked by name similarity.
    if let Some(location) = event.locations.first() {
        let key = EventIndex::date_location_key(&date_str, &time_str, location);
        for matched in index.lookup_date_location(&key) {
            if existing.is_some_and(|e| e.path == matched.path) {
                continue;
            }
            let name_sim = name_similarity(&event.name, &matched.name);
            if name_sim > STRONG_NAME_SIMILARITY {
                if confidence < DATE_LOCATION_CONFIDENCE {
                    existing = Some(matched);
                    confidence = DATE_LOCATION_CONFIDENCE;
                }
                reasons.push(format!(
                    "Same date/time/location + similar name ({:.0}%)",
                    name_sim * 100.0
                ));
                debug!("Date/location match with similar name: {}", matched.name);
            } else if name_sim > MODERATE_NAME_SIMILARITY {
                if confidence < MODERATE_MATCH_CONFIDENCE {
                    existing = Some(matched);
                    confidence = MODERATE_MATCH_CONFIDENCE;
                }
                reasons.push(format!(
                    "Same date/time/location, moderate name similarity ({:.0}%)",
                    name_sim * 100.0
                ));
            }
        }
    }

    // 3. Near-identical name on the same calendar date (weakest signal).
    if !event.name.is_empty() && confidence < NAME_TIER_CEILING {
        let name_key = normalize_name(&event.name);
        for matched in index.lookup_name(&name_key) {
            if existing.is_some_and(|e| e.path == matched.path) {
                continue;
            }
            if !same_date(&date_str, &matched.date) {
                continue;
            }
            let name_sim = name_similarity(&event.name, &matched.name);
            if name_sim > SAME_NAME_SIMILARITY {
                if confidence < SAME_NAME_CONFIDENCE {
                    existing = Some(matched);
                    confidence = SAME_NAME_CONFIDENCE;
                }
                reasons.push(format!(
                    "Very similar name on same date ({:.0}%)",
                    name_sim * 100.0
                ));
                debug!("Name match on same date: {}", matched.name);
            }
        }
    }

    let is_duplicate = confidence >= config.duplicate_threshold;
    let should_merge = is_duplicate && confidence >= config.merge_threshold;

    DuplicateResult {
        is_duplicate,
        confidence,
        existing_path: existing.map(|e| e.path.clone()),
        match_reasons: reasons,
        should_merge,
    }
}

fn name_similarity(a: &str, b: &str) -> f64 {
    sequence_ratio(&normalize_name(a), &normalize_name(b))
}

/// Compare calendar dates only (first 10 characters of `YYYY-MM-DD[Txx]`).
fn same_date(a: &str, b: &str) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a.get(..10).unwrap_or(a) == b.get(..10).unwrap_or(b)
}
