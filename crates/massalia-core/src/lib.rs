//! Massalia core library — identity resolution engine for the Massalia events
//! calendar crawler.
//!
//! This crate decides whether a freshly scraped event already exists in the
//! published corpus (and should be merged instead of duplicated), and resolves
//! free-text venue names to stable canonical slugs.  Scraping, HTTP, image
//! handling, and page generation live in external collaborators; the engine
//! only ever sees candidate events, the venue registry, and the persisted
//! front-matter documents.

pub mod dedup;
pub mod errors;
pub mod models;
pub mod normalize;
pub mod similarity;
pub mod store;
pub mod venues;

pub use dedup::detector::Deduplicator;
pub use dedup::index::EventIndex;
pub use errors::{EngineError, EngineResult};
pub use models::{
    CandidateEvent, DedupConfig, DuplicateResult, IndexedEvent, MergeResult, Venue,
    VenueAuditReport, VenueDuplicate,
};
pub use store::EventStore;
pub use venues::VenueManager;
