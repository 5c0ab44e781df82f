//! Venue registry audits: duplicate pairs, unmapped locations, missing
//! fields.
//!
//! All of this is O(n²) over the registry or O(corpus) over the event tree
//! and meant for periodic offline runs, not the per-event hot path.

use std::collections::BTreeSet;

use crate::models::{Venue, VenueAuditReport, VenueDuplicate, VenueMatchKind, VenueMissingFields};
use crate::normalize::{extract_alias_slug, extract_domain, normalize};
use crate::similarity::sequence_ratio;
use crate::store::EventStore;
use crate::venues::registry::VenueRegistry;

/// Registry fields every venue is expected to have filled in.
const REQUIRED_FIELDS: &[&str] = &["title", "description", "address", "website"];

/// Addresses at or below this length are too generic to compare.
const MIN_ADDRESS_LEN: usize = 10;

/// Pairwise duplicate-venue detection over the registry.
///
/// Each pair is tested with three independent signals and short-circuits at
/// the first hit: normalized-title similarity, normalized-address similarity
/// (only when both addresses are long enough to be meaningful), and identical
/// website domain.
pub fn find_duplicates(venues: &[Venue], threshold: f64) -> Vec<VenueDuplicate> {
    let mut duplicates = Vec::new();

    for i in 0..venues.len() {
        for j in (i + 1)..venues.len() {
            let a = &venues[i];
            let b = &venues[j];

            let name_a = normalize(&a.title);
            let name_b = normalize(&b.title);
            if !name_a.is_empty() && !name_b.is_empty() {
                let similarity = sequence_ratio(&name_a, &name_b);
                if similarity >= threshold {
                    duplicates.push(VenueDuplicate {
                        slug_a: a.slug.clone(),
                        slug_b: b.slug.clone(),
                        similarity,
                        match_type: VenueMatchKind::Name,
                    });
                    continue;
                }
            }

            let addr_a = normalize(&a.address);
            let addr_b = normalize(&b.address);
            if addr_a.chars().count() > MIN_ADDRESS_LEN && addr_b.chars().count() > MIN_ADDRESS_LEN
            {
                let similarity = sequence_ratio(&addr_a, &addr_b);
                if similarity >= threshold {
                    duplicates.push(VenueDuplicate {
                        slug_a: a.slug.clone(),
                        slug_b: b.slug.clone(),
                        similarity,
                        match_type: VenueMatchKind::Address,
                    });
                    continue;
                }
            }

            if !a.website.is_empty() && !b.website.is_empty() {
                let domain_a = extract_domain(&a.website);
                let domain_b = extract_domain(&b.website);
                if !domain_a.is_empty() && domain_a == domain_b {
                    duplicates.push(VenueDuplicate {
                        slug_a: a.slug.clone(),
                        slug_b: b.slug.clone(),
                        similarity: 1.0,
                        match_type: VenueMatchKind::Website,
                    });
                }
            }
        }
    }

    duplicates
}

/// Location slugs referenced by the corpus but unknown to the registry.
///
/// Known slugs are the registry slugs plus every alias's trailing segment.
/// Returned sorted for stable operator reports.
pub fn discover_unmapped(registry: &VenueRegistry, store: &EventStore) -> Vec<String> {
    let mut known = registry.all_slugs();
    for venue in registry.venues() {
        for alias in &venue.aliases {
            if let Some(alias_slug) = extract_alias_slug(alias) {
                known.insert(alias_slug);
            }
        }
    }

    let mut unknown: BTreeSet<String> = BTreeSet::new();
    for (_, doc) in store.scan() {
        for location in doc.str_list_field("locations") {
            if !location.is_empty() && !known.contains(&location) {
                unknown.insert(location);
            }
        }
    }

    unknown.into_iter().collect()
}

/// Run the full venue audit: missing required fields, duplicate pairs, and
/// unmapped corpus locations.
pub fn audit(registry: &VenueRegistry, store: &EventStore, threshold: f64) -> VenueAuditReport {
    let mut missing_fields = Vec::new();
    for venue in registry.venues() {
        let missing: Vec<&'static str> = REQUIRED_FIELDS
            .iter()
            .copied()
            .filter(|field| match *field {
                "title" => venue.title.is_empty(),
                "description" => venue.description.is_empty(),
                "address" => venue.address.is_empty(),
                "website" => venue.website.is_empty(),
                _ => false,
            })
            .collect();
        if !missing.is_empty() {
            missing_fields.push(VenueMissingFields {
                slug: venue.slug.clone(),
                fields: missing,
            });
        }
    }

    VenueAuditReport {
        missing_fields,
        duplicates: find_duplicates(registry.venues(), threshold),
        unmapped_locations: discover_unmapped(registry, store),
        total_venues: registry.len(),
    }
}
