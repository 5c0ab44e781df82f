//! Non-destructive merge of duplicate event data into an existing document.

use std::path::Path;

use tracing::{error, info};

use crate::models::{CandidateEvent, MergeResult};
use crate::store::document;

/// Merge a duplicate candidate's data into the existing published document.
///
/// Field-fill only: the existing record stays primary and non-empty fields
/// are never overwritten.  The candidate contributes a missing description or
/// image, its booking URL as an alternate source, and its source id.  The
/// `lastCrawled` stamp is refreshed on every change set, but the document is
/// only rewritten when at least one field actually changed; re-crawling an
/// unchanged page is a no-op.
///
/// Read or write failures are logged and surfaced as `updated: false` so one
/// unwritable file cannot abort a batch run.
pub fn merge_event(existing_path: &Path, new_event: &CandidateEvent) -> MergeResult {
    let mut doc = match document::load(existing_path) {
        Ok(doc) => doc,
        Err(e) => {
            error!("Failed to load {} for merge: {e}", existing_path.display());
            return MergeResult::default();
        }
    };

    let mut changes: Vec<String> = Vec::new();

    // Fill missing description.
    if doc.str_field("description").is_empty() && !new_event.description.is_empty() {
        doc.set_str("description", &new_event.description);
        changes.push("Added description from alternate source".to_string());
    }

    // Fill missing image.
    if doc.opt_str_field("image").is_none() {
        if let Some(image) = new_event.image.as_deref().filter(|i| !i.is_empty()) {
            doc.set_str("image", image);
            changes.push("Added image from alternate source".to_string());
        }
    }

    // Track alternate source URLs.
    if let Some(url) = new_event.event_url.as_deref().filter(|u| !u.is_empty()) {
        let mut alternates = doc.str_list_field("alternateSources");
        if !alternates.iter().any(|a| a == url) && doc.str_field("eventURL") != url {
            alternates.push(url.to_string());
            doc.set_str_list("alternateSources", &alternates);
            changes.push(format!("Added alternate source: {url}"));
        }
    }

    // Track source IDs, backfilling the primary one into the list.
    if let Some(source_id) = new_event.source_id.as_deref().filter(|s| !s.is_empty()) {
        let mut source_ids = doc.str_list_field("sourceIds");
        let primary = doc.str_field("sourceId");
        if !primary.is_empty() && !source_ids.contains(&primary) {
            source_ids.push(primary);
        }
        if !source_ids.iter().any(|s| s == source_id) {
            source_ids.push(source_id.to_string());
            doc.set_str_list("sourceIds", &source_ids);
            changes.push(format!("Added source ID: {source_id}"));
        }
    }

    if changes.is_empty() {
        return MergeResult::default();
    }

    doc.set_str("lastCrawled", &chrono::Local::now().to_rfc3339());

    match document::save(existing_path, &doc) {
        Ok(()) => {
            info!(
                "Merged event data into {}: {changes:?}",
                existing_path.display()
            );
            MergeResult {
                updated: true,
                changes,
            }
        }
        Err(e) => {
            error!(
                "Failed to write merged event to {}: {e}",
                existing_path.display()
            );
            MergeResult::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn candidate() -> CandidateEvent {
        CandidateEvent {
            name: "Soirée Jazz".to_string(),
            start: "2026-01-30T20:30:00".parse().unwrap(),
            event_url: Some("https://marseillejazz.com/trio".to_string()),
            locations: vec!["opera-de-marseille".to_string()],
            description: "Un trio de jazz au foyer.".to_string(),
            image: Some("https://marseillejazz.com/trio.jpg".to_string()),
            source_id: Some("marseillejazz".to_string()),
        }
    }

    fn write_existing(dir: &Path, front: &str) -> PathBuf {
        let path = dir.join("soiree-jazz.md");
        fs::write(&path, format!("---\n{front}---\n")).unwrap();
        path
    }

    #[test]
    fn test_fills_missing_fields_and_tracks_sources() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_existing(
            dir.path(),
            "name: Soirée Jazz\neventURL: https://opera-marseille.com/jazz\nsourceId: opera\n",
        );

        let result = merge_event(&path, &candidate());
        assert!(result.updated);
        assert_eq!(result.changes.len(), 4);

        let doc = document::load(&path).unwrap();
        assert_eq!(doc.str_field("description"), "Un trio de jazz au foyer.");
        assert_eq!(doc.str_field("image"), "https://marseillejazz.com/trio.jpg");
        assert_eq!(
            doc.str_list_field("alternateSources"),
            vec!["https://marseillejazz.com/trio"]
        );
        // The primary source id is backfilled ahead of the new one.
        assert_eq!(doc.str_list_field("sourceIds"), vec!["opera", "marseillejazz"]);
        assert!(!doc.str_field("lastCrawled").is_empty());
    }

    #[test]
    fn test_never_overwrites_populated_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_existing(
            dir.path(),
            "name: Soirée Jazz\ndescription: Déjà décrit.\nimage: https://opera.example/own.jpg\neventURL: https://opera-marseille.com/jazz\n",
        );

        let result = merge_event(&path, &candidate());
        assert!(result.updated);

        let doc = document::load(&path).unwrap();
        assert_eq!(doc.str_field("description"), "Déjà décrit.");
        assert_eq!(doc.str_field("image"), "https://opera.example/own.jpg");
    }

    #[test]
    fn test_recrawl_of_same_source_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_existing(
            dir.path(),
            "name: Soirée Jazz\ndescription: Déjà décrit.\nimage: https://opera.example/own.jpg\neventURL: https://marseillejazz.com/trio\nsourceIds:\n  - marseillejazz\n",
        );
        let before = fs::read_to_string(&path).unwrap();

        let result = merge_event(&path, &candidate());
        assert!(!result.updated);
        assert!(result.changes.is_empty());
        // No write happened at all.
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn test_alternate_url_not_duplicated() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_existing(
            dir.path(),
            "name: Soirée Jazz\neventURL: https://opera-marseille.com/jazz\nalternateSources:\n  - https://marseillejazz.com/trio\n",
        );

        let result = merge_event(&path, &candidate());
        let doc = document::load(&path).unwrap();
        assert_eq!(doc.str_list_field("alternateSources").len(), 1);
        assert!(!result.changes.iter().any(|c| c.contains("alternate source:")));
    }

    #[test]
    fn test_unreadable_document_reports_not_updated() {
        let result = merge_event(Path::new("/nonexistent/event.md"), &candidate());
        assert!(!result.updated);
        assert!(result.changes.is_empty());
    }
}
