//! Event index: three lookup structures over the published corpus.

use std::collections::HashMap;
use std::path::PathBuf;

use tracing::info;

use crate::models::IndexedEvent;
use crate::normalize::{normalize_name, normalize_url};
use crate::store::{Document, EventStore};

/// Bucket counts for the three lookup structures.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IndexStats {
    pub urls: usize,
    pub date_locations: usize,
    pub names: usize,
}

/// Indexed view of the published corpus: by normalized booking URL, by
/// `date|time|location` key, and by normalized name.
#[derive(Clone, Debug, Default)]
pub struct EventIndex {
    by_url: HashMap<String, IndexedEvent>,
    by_date_location: HashMap<String, Vec<IndexedEvent>>,
    by_name: HashMap<String, Vec<IndexedEvent>>,
}

impl EventIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the index by scanning the corpus once.
    pub fn build(store: &EventStore) -> Self {
        let mut index = Self::new();
        let mut count = 0usize;
        for (path, doc) in store.scan() {
            if let Some(event) = IndexedEvent::from_document(path, &doc) {
                index.insert(event);
                count += 1;
            }
        }
        let stats = index.stats();
        info!(
            "Built event index: {count} events, {} URLs, {} date/location combos",
            stats.urls, stats.date_locations
        );
        index
    }

    /// Add one event to every lookup structure it qualifies for.
    pub fn insert(&mut self, event: IndexedEvent) {
        if !event.event_url.is_empty() {
            self.by_url
                .insert(normalize_url(&event.event_url), event.clone());
        }
        if !event.date.is_empty() && !event.location.is_empty() {
            let key = Self::date_location_key(&event.date, &event.start_time, &event.location);
            self.by_date_location.entry(key).or_default().push(event.clone());
        }
        if !event.name.is_empty() {
            self.by_name
                .entry(normalize_name(&event.name))
                .or_default()
                .push(event);
        }
    }

    /// Lookup key combining calendar date, start time, and normalized
    /// location.
    pub fn date_location_key(date: &str, time: &str, location: &str) -> String {
        format!("{date}|{time}|{}", normalize_name(location))
    }

    /// Event previously published under this normalized booking URL.
    pub fn lookup_url(&self, url_key: &str) -> Option<&IndexedEvent> {
        self.by_url.get(url_key)
    }

    /// Events bucketed under a `date|time|location` key.
    pub fn lookup_date_location(&self, key: &str) -> &[IndexedEvent] {
        self.by_date_location.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Events bucketed under a normalized name.
    pub fn lookup_name(&self, name_key: &str) -> &[IndexedEvent] {
        self.by_name.get(name_key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            urls: self.by_url.len(),
            date_locations: self.by_date_location.len(),
            names: self.by_name.len(),
        }
    }
}

impl IndexedEvent {
    /// Load an indexed event from a parsed front-matter document.
    ///
    /// Tolerates the historical field variants (`name`/`eventName`/`title`)
    /// and truncates datetimes to the calendar date.  Documents without any
    /// usable name are not indexable.
    pub fn from_document(path: PathBuf, doc: &Document) -> Option<Self> {
        let name = doc
            .opt_str_field("name")
            .or_else(|| doc.opt_str_field("eventName"))
            .or_else(|| doc.opt_str_field("title"))?;

        let date = doc.str_field("date");
        let date = date.get(..10).unwrap_or(&date).to_string();

        let location = doc
            .str_list_field("locations")
            .into_iter()
            .next()
            .unwrap_or_default();

        Some(Self {
            path,
            name,
            date,
            start_time: doc.str_field("startTime"),
            location,
            event_url: doc.str_field("eventURL"),
            source_id: doc.str_field("sourceId"),
            description: doc.str_field("description"),
            image: doc.opt_str_field("image"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::document;

    fn event(name: &str, date: &str, time: &str, location: &str, url: &str) -> IndexedEvent {
        IndexedEvent {
            path: PathBuf::from(format!("/events/{}.md", normalize_name(name).replace(' ', "-"))),
            name: name.to_string(),
            date: date.to_string(),
            start_time: time.to_string(),
            location: location.to_string(),
            event_url: url.to_string(),
            source_id: String::new(),
            description: String::new(),
            image: None,
        }
    }

    #[test]
    fn test_insert_populates_all_buckets() {
        let mut index = EventIndex::new();
        index.insert(event(
            "Soirée Jazz",
            "2026-01-30",
            "20:30",
            "opera-de-marseille",
            "https://opera-marseille.com/jazz",
        ));

        assert_eq!(index.stats(), IndexStats { urls: 1, date_locations: 1, names: 1 });
        assert!(index.lookup_url("opera-marseille.com/jazz").is_some());
        let key = EventIndex::date_location_key("2026-01-30", "20:30", "opera-de-marseille");
        assert_eq!(index.lookup_date_location(&key).len(), 1);
        assert_eq!(index.lookup_name("soirée jazz").len(), 1);
    }

    #[test]
    fn test_insert_skips_empty_keys() {
        let mut index = EventIndex::new();
        index.insert(event("Concert", "", "", "", ""));
        let stats = index.stats();
        assert_eq!(stats.urls, 0);
        assert_eq!(stats.date_locations, 0);
        assert_eq!(stats.names, 1);
    }

    #[test]
    fn test_from_document_field_fallbacks() {
        let doc = document::parse("---\neventName: Concert Electro\ndate: \"2026-02-01T21:00:00\"\nlocations:\n  - le-makeda\n  - le-molotov\n---\n").unwrap();
        let ev = IndexedEvent::from_document(PathBuf::from("/e.md"), &doc).unwrap();
        assert_eq!(ev.name, "Concert Electro");
        assert_eq!(ev.date, "2026-02-01");
        assert_eq!(ev.location, "le-makeda");
    }

    #[test]
    fn test_from_document_without_name() {
        let doc = document::parse("---\ndate: \"2026-02-01\"\n---\n").unwrap();
        assert!(IndexedEvent::from_document(PathBuf::from("/e.md"), &doc).is_none());
    }

    #[test]
    fn test_date_location_key_normalizes_location() {
        assert_eq!(
            EventIndex::date_location_key("2026-01-30", "20:30", "Opéra de Marseille!"),
            "2026-01-30|20:30|opéra de marseille"
        );
    }
}
