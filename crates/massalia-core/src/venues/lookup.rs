//! Venue name to canonical slug resolution.
//!
//! Builds a reverse mapping from every textual variant of a venue (title,
//! slug-as-words, alias segments, explicit search names, accent-stripped
//! forms) to its canonical slug, then resolves arbitrary free text via
//! exact-then-substring matching.

use indexmap::{IndexMap, IndexSet};
use tracing::{debug, info};

use crate::models::Venue;
use crate::normalize::{
    extract_alias_slug, normalize, slug_to_words, strip_accents, strip_leading_articles,
};

/// Reverse lookup table from normalized name variants to canonical slugs.
#[derive(Clone, Debug, Default)]
pub struct VenueLookup {
    /// normalized key -> slug; insertion order is the claim order.
    lookup: IndexMap<String, String>,
    /// Keys sorted by length descending (ties keep insertion order) so that
    /// substring matching always prefers the most specific key.
    sorted_keys: Vec<String>,
}

impl VenueLookup {
    /// Build the lookup table from the registry.
    ///
    /// Key collisions resolve first-claim-wins: once a key maps to a slug it
    /// is never reassigned, and the loser is logged at debug level.
    pub fn build(venues: &[Venue]) -> Self {
        let mut lookup: IndexMap<String, String> = IndexMap::new();

        for venue in venues {
            if venue.slug.is_empty() {
                continue;
            }
            let mut keys: IndexSet<String> = IndexSet::new();

            // 1. Slug as words: "le-cepac-silo" -> "le cepac silo".
            keys.insert(slug_to_words(&venue.slug));

            // 2. Title, normalized, plus its article-stripped form.
            if !venue.title.is_empty() {
                let norm_title = normalize(&venue.title);
                let stripped = strip_leading_articles(&norm_title);
                if !stripped.is_empty() && stripped != norm_title {
                    keys.insert(stripped);
                }
                keys.insert(norm_title);
            }

            // 3. Alias trailing segments, accented and accent-stripped.
            for alias in &venue.aliases {
                if let Some(alias_slug) = extract_alias_slug(alias) {
                    let words = slug_to_words(&alias_slug);
                    let stripped = strip_accents(&words);
                    if stripped != words {
                        keys.insert(stripped);
                    }
                    keys.insert(words);
                }
            }

            // 4. Explicit search names.
            for search_name in &venue.search_names {
                keys.insert(normalize(search_name));
            }

            // 5. Accent-stripped variant of every key that changes.
            let variants: Vec<String> = keys
                .iter()
                .filter_map(|key| {
                    let stripped = strip_accents(key);
                    (stripped != *key).then_some(stripped)
                })
                .collect();
            keys.extend(variants);

            for key in keys {
                if key.is_empty() {
                    continue;
                }
                match lookup.entry(key) {
                    indexmap::map::Entry::Vacant(entry) => {
                        entry.insert(venue.slug.clone());
                    }
                    indexmap::map::Entry::Occupied(entry) => {
                        if entry.get() != &venue.slug {
                            debug!(
                                "Lookup key '{}' already maps to '{}', skipping '{}'",
                                entry.key(),
                                entry.get(),
                                venue.slug
                            );
                        }
                    }
                }
            }
        }

        let mut sorted_keys: Vec<String> = lookup.keys().cloned().collect();
        sorted_keys.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));

        info!(
            "Built venue lookup: {} venues, {} keys",
            venues.len(),
            lookup.len()
        );
        Self { lookup, sorted_keys }
    }

    /// Resolve a raw location name to a canonical venue slug.
    ///
    /// Exact match on the normalized input first, then substring match
    /// scanning keys longest-first.  Unknown input is returned unchanged so
    /// the caller can decide how to treat unmapped venues.
    pub fn map_location(&self, raw_name: &str) -> String {
        if raw_name.is_empty() {
            return String::new();
        }

        let normalized = normalize(raw_name);
        if let Some(slug) = self.lookup.get(&normalized) {
            return slug.clone();
        }

        for key in &self.sorted_keys {
            if normalized.contains(key.as_str()) {
                if let Some(slug) = self.lookup.get(key) {
                    return slug.clone();
                }
            }
        }

        raw_name.to_string()
    }

    /// Number of lookup keys.
    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn venue(slug: &str, title: &str) -> Venue {
        Venue {
            slug: slug.to_string(),
            title: title.to_string(),
            ..Venue::default()
        }
    }

    fn sample_venues() -> Vec<Venue> {
        vec![
            Venue {
                aliases: vec![
                    "/locations/cabaret-aléatoire/".to_string(),
                    "/locations/le-cabaret-aleatoire/".to_string(),
                ],
                ..venue("cabaret-aleatoire", "Cabaret Aleatoire")
            },
            Venue {
                search_names: vec!["la mesón".to_string()],
                ..venue("theatre-de-l-oeuvre", "Théâtre de l'Œuvre")
            },
            Venue {
                aliases: vec!["/locations/friche/".to_string()],
                ..venue("la-friche", "La Friche la Belle de Mai")
            },
            venue("le-silo", "Le Silo"),
        ]
    }

    #[test]
    fn test_exact_match_on_title() {
        let lookup = VenueLookup::build(&sample_venues());
        assert_eq!(lookup.map_location("Cabaret Aleatoire"), "cabaret-aleatoire");
    }

    #[test]
    fn test_accent_insensitive_exact_match() {
        let lookup = VenueLookup::build(&sample_venues());
        assert_eq!(lookup.map_location("Cabaret Aléatoire"), "cabaret-aleatoire");
        assert_eq!(lookup.map_location("théâtre de l'œuvre"), "theatre-de-l-oeuvre");
    }

    #[test]
    fn test_alias_segment_match() {
        let lookup = VenueLookup::build(&sample_venues());
        assert_eq!(lookup.map_location("le cabaret aleatoire"), "cabaret-aleatoire");
        assert_eq!(lookup.map_location("Friche"), "la-friche");
    }

    #[test]
    fn test_search_name_match() {
        let lookup = VenueLookup::build(&sample_venues());
        assert_eq!(lookup.map_location("La Mesón"), "theatre-de-l-oeuvre");
        assert_eq!(lookup.map_location("la meson"), "theatre-de-l-oeuvre");
    }

    #[test]
    fn test_substring_match_longest_key_wins() {
        let venues = vec![
            venue("le-silo", "Silo"),
            venue("cepac-silo", "Le Cepac Silo"),
        ];
        let lookup = VenueLookup::build(&venues);
        // "silo" (1 word) and "le cepac silo" (3 words) both occur as
        // substrings; the longer key must win.
        assert_eq!(
            lookup.map_location("Concert au Le Cepac Silo Marseille"),
            "cepac-silo"
        );
        assert_eq!(lookup.map_location("rendez-vous au silo"), "le-silo");
    }

    #[test]
    fn test_unknown_returns_input_unchanged() {
        let lookup = VenueLookup::build(&sample_venues());
        assert_eq!(lookup.map_location("Unknown Venue XYZ"), "Unknown Venue XYZ");
    }

    #[test]
    fn test_empty_input() {
        let lookup = VenueLookup::build(&sample_venues());
        assert_eq!(lookup.map_location(""), "");
    }

    #[test]
    fn test_first_claim_wins_on_collision() {
        let venues = vec![
            venue("le-makeda", "Le Makeda"),
            Venue {
                search_names: vec!["le makeda".to_string()],
                ..venue("autre-salle", "Autre Salle")
            },
        ];
        let lookup = VenueLookup::build(&venues);
        assert_eq!(lookup.map_location("Le Makeda"), "le-makeda");
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let lookup = VenueLookup::build(&sample_venues());
        let first = lookup.map_location("Friche la Belle de Mai");
        for _ in 0..10 {
            assert_eq!(lookup.map_location("Friche la Belle de Mai"), first);
        }
    }
}
