//! Duplicate event detection and merging.

pub mod detector;
pub mod index;
pub mod merge;

pub use detector::{check_duplicate, Deduplicator};
pub use index::{EventIndex, IndexStats};
pub use merge::merge_event;
