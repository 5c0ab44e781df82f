//! Venue identity: registry, lookup index, and audits.

pub mod audit;
pub mod lookup;
pub mod registry;

use std::collections::HashSet;
use std::path::PathBuf;

use crate::errors::EngineResult;
use crate::models::{Venue, VenueAuditReport, VenueDuplicate, VENUE_AUDIT_THRESHOLD};
use crate::store::EventStore;

pub use lookup::VenueLookup;
pub use registry::VenueRegistry;

/// Single source of truth for venue data and name-to-slug mappings.
///
/// Owns the registry and keeps the lookup index in sync with it whenever a
/// venue is added or stubs are appended.
#[derive(Clone, Debug)]
pub struct VenueManager {
    registry: VenueRegistry,
    lookup: VenueLookup,
}

impl VenueManager {
    /// Load the registry from `path` and build the lookup index.
    pub fn load(path: impl Into<PathBuf>) -> EngineResult<Self> {
        let registry = VenueRegistry::load(path)?;
        let lookup = VenueLookup::build(registry.venues());
        Ok(Self { registry, lookup })
    }

    /// Wrap an already-loaded registry.
    pub fn from_registry(registry: VenueRegistry) -> Self {
        let lookup = VenueLookup::build(registry.venues());
        Self { registry, lookup }
    }

    pub fn registry(&self) -> &VenueRegistry {
        &self.registry
    }

    pub fn lookup(&self) -> &VenueLookup {
        &self.lookup
    }

    /// Resolve a raw location name to a canonical venue slug; unknown names
    /// come back unchanged.
    pub fn map_location(&self, raw_name: &str) -> String {
        self.lookup.map_location(raw_name)
    }

    /// Venue data by canonical slug.
    pub fn get_venue(&self, slug: &str) -> Option<&Venue> {
        self.registry.get(slug)
    }

    /// All registered canonical slugs.
    pub fn all_slugs(&self) -> HashSet<String> {
        self.registry.all_slugs()
    }

    /// Add a venue in memory and rebuild the lookup index.
    pub fn add_venue(&mut self, venue: Venue) {
        self.registry.add(venue);
        self.lookup = VenueLookup::build(self.registry.venues());
    }

    /// Append stub entries for new slugs to the registry file, then rebuild
    /// the lookup index.
    pub fn append_stubs(&mut self, new_slugs: &[String]) -> EngineResult<Vec<Venue>> {
        let added = self.registry.append_stubs(new_slugs)?;
        if !added.is_empty() {
            self.lookup = VenueLookup::build(self.registry.venues());
        }
        Ok(added)
    }

    /// Pairwise duplicate-venue detection at the default audit threshold.
    pub fn find_duplicates(&self, threshold: f64) -> Vec<VenueDuplicate> {
        audit::find_duplicates(self.registry.venues(), threshold)
    }

    /// Corpus location slugs with no registry entry, sorted.
    pub fn discover_unmapped(&self, store: &EventStore) -> Vec<String> {
        audit::discover_unmapped(&self.registry, store)
    }

    /// Full audit report for operator review.
    pub fn audit(&self, store: &EventStore) -> VenueAuditReport {
        audit::audit(&self.registry, store, VENUE_AUDIT_THRESHOLD)
    }
}
