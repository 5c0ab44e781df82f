//! Venue registry file access.
//!
//! The registry is a YAML sequence of venue entries.  It is read once at
//! startup and only ever grows: audits may append stub entries for newly
//! discovered venues, but nothing is deleted programmatically.

use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_yaml::Value;
use tracing::{info, warn};

use crate::errors::{EngineError, EngineResult};
use crate::models::Venue;
use crate::normalize::slug_to_title;

/// In-memory venue registry backed by a YAML file.
#[derive(Clone, Debug)]
pub struct VenueRegistry {
    path: PathBuf,
    venues: Vec<Venue>,
}

impl VenueRegistry {
    /// Load the registry from a YAML file.
    ///
    /// A missing file degrades to an empty registry with a warning; a file
    /// that parses but is not a sequence does the same.  Individual entries
    /// that fail to deserialize or lack a slug are skipped.
    pub fn load(path: impl Into<PathBuf>) -> EngineResult<Self> {
        let path = path.into();
        if !path.exists() {
            warn!("Venues file not found: {}", path.display());
            return Ok(Self {
                path,
                venues: Vec::new(),
            });
        }

        let text = fs::read_to_string(&path)?;
        let root: Value = serde_yaml::from_str(&text)?;
        let venues = match root {
            Value::Sequence(entries) => {
                let mut venues = Vec::with_capacity(entries.len());
                for entry in entries {
                    match serde_yaml::from_value::<Venue>(entry) {
                        Ok(venue) if !venue.slug.is_empty() => venues.push(venue),
                        Ok(_) => warn!("Skipping venue entry without slug"),
                        Err(e) => warn!("Skipping malformed venue entry: {e}"),
                    }
                }
                venues
            }
            Value::Null => Vec::new(),
            other => {
                warn!("Unexpected venues data format: {other:?}");
                Vec::new()
            }
        };

        info!("Loaded {} venues from {}", venues.len(), path.display());
        Ok(Self { path, venues })
    }

    /// An empty registry backed by `path` (which need not exist yet).
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            venues: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn venues(&self) -> &[Venue] {
        &self.venues
    }

    pub fn len(&self) -> usize {
        self.venues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.venues.is_empty()
    }

    /// Venue data by canonical slug.
    pub fn get(&self, slug: &str) -> Option<&Venue> {
        self.venues.iter().find(|v| v.slug == slug)
    }

    /// All registered canonical slugs.
    pub fn all_slugs(&self) -> HashSet<String> {
        self.venues.iter().map(|v| v.slug.clone()).collect()
    }

    /// Append a venue to the in-memory registry only.  The caller is
    /// responsible for rebuilding any lookup structures.
    pub fn add(&mut self, venue: Venue) {
        self.venues.push(venue);
    }

    /// Append stub entries for newly discovered slugs to the backing file
    /// and the in-memory registry, returning the venues that were added.
    pub fn append_stubs(&mut self, new_slugs: &[String]) -> EngineResult<Vec<Venue>> {
        if new_slugs.iter().any(|s| s.is_empty()) {
            return Err(EngineError::Registry(
                "cannot append a stub with an empty slug".to_string(),
            ));
        }

        let stubs: Vec<Venue> = new_slugs
            .iter()
            .map(|slug| Venue {
                slug: slug.clone(),
                title: slug_to_title(slug),
                kind: "Lieu".to_string(),
                ..Venue::default()
            })
            .collect();
        if stubs.is_empty() {
            return Ok(stubs);
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(
            file,
            "\n# ============================================================"
        )?;
        writeln!(file, "# Auto-discovered venues (stub entries -- fill in details)")?;
        writeln!(
            file,
            "# ============================================================\n"
        )?;
        for venue in &stubs {
            writeln!(file, "- slug: {}", venue.slug)?;
            writeln!(file, "  title: \"{}\"", venue.title)?;
            writeln!(file, "  description: \"\"")?;
            writeln!(file, "  address: \"\"")?;
            writeln!(file, "  website: \"\"")?;
            writeln!(file, "  type: \"Lieu\"")?;
            writeln!(file, "  aliases: []")?;
            writeln!(file, "  body: \"\"\n")?;
        }

        info!("Appended {} stub venues to {}", stubs.len(), self.path.display());
        self.venues.extend(stubs.iter().cloned());
        Ok(stubs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
- slug: la-friche
  title: La Friche la Belle de Mai
  address: 41 rue Jobin, 13003 Marseille
  website: https://www.lafriche.org/
  type: Complexe culturel
  aliases:
    - /locations/friche/
- slug: le-makeda
  title: Le Makeda
  search_names:
    - makeda marseille
"#;

    fn sample_registry() -> VenueRegistry {
        let file = tempfile::NamedTempFile::new().unwrap();
        fs::write(file.path(), SAMPLE).unwrap();
        let registry = VenueRegistry::load(file.path()).unwrap();
        // Keep the temp file alive until load has finished.
        drop(file);
        registry
    }

    #[test]
    fn test_load_sample() {
        let registry = sample_registry();
        assert_eq!(registry.len(), 2);
        let friche = registry.get("la-friche").unwrap();
        assert_eq!(friche.title, "La Friche la Belle de Mai");
        assert_eq!(friche.aliases, vec!["/locations/friche/"]);
        assert_eq!(registry.get("le-makeda").unwrap().search_names, vec!["makeda marseille"]);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let registry = VenueRegistry::load("/nonexistent/venues.yaml").unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_load_non_sequence_is_empty() {
        let file = tempfile::NamedTempFile::new().unwrap();
        fs::write(file.path(), "venues:\n  - slug: x\n").unwrap();
        let registry = VenueRegistry::load(file.path()).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_load_skips_entries_without_slug() {
        let file = tempfile::NamedTempFile::new().unwrap();
        fs::write(file.path(), "- title: No slug\n- slug: ok\n").unwrap();
        let registry = VenueRegistry::load(file.path()).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.get("ok").is_some());
    }

    #[test]
    fn test_all_slugs() {
        let registry = sample_registry();
        let slugs = registry.all_slugs();
        assert!(slugs.contains("la-friche"));
        assert!(slugs.contains("le-makeda"));
        assert_eq!(slugs.len(), 2);
    }

    #[test]
    fn test_append_stubs_reloadable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("venues.yaml");
        fs::write(&path, SAMPLE).unwrap();

        let mut registry = VenueRegistry::load(&path).unwrap();
        let added = registry
            .append_stubs(&["theatre-des-calanques".to_string()])
            .unwrap();
        assert_eq!(added.len(), 1);
        assert_eq!(added[0].title, "Theatre des Calanques");
        assert_eq!(added[0].kind, "Lieu");
        assert_eq!(registry.len(), 3);

        // The backing file must parse back with the stub present.
        let reloaded = VenueRegistry::load(&path).unwrap();
        assert_eq!(reloaded.len(), 3);
        assert_eq!(reloaded.get("theatre-des-calanques").unwrap().title, "Theatre des Calanques");
    }

    #[test]
    fn test_append_stubs_rejects_empty_slug() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = VenueRegistry::empty(dir.path().join("venues.yaml"));
        assert!(registry.append_stubs(&[String::new()]).is_err());
    }

    #[test]
    fn test_append_stubs_empty_list_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("venues.yaml");
        let mut registry = VenueRegistry::empty(&path);
        assert!(registry.append_stubs(&[]).unwrap().is_empty());
        assert!(!path.exists());
    }
}
