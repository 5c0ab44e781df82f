//! Text, slug, and URL normalization primitives.
//!
//! Everything here is a total function: empty input yields empty output and
//! nothing ever fails.  Venue lookup and event deduplication both compare
//! strings only after passing them through these normalizers.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// French articles stripped from the front of lookup keys.
pub const FRENCH_ARTICLES: &[&str] = &["le", "la", "les", "l", "un", "une", "des", "du", "de", "d"];

/// French minor words kept lowercase when title-casing a slug.
const FRENCH_MINOR_WORDS: &[&str] = &[
    "de", "des", "du", "d", "la", "le", "les", "l", "et", "en", "a", "au", "aux",
];

static NON_WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s]").unwrap());
static SCHEME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^https?://").unwrap());
static WWW_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^www\.").unwrap());
static UTM_TAIL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\?utm_.*$").unwrap());
static REF_TAIL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\?ref=.*$").unwrap());

/// Remove combining diacritical marks via NFKD decomposition
/// (`é` -> `e`, `ü` -> `u`).
pub fn strip_accents(text: &str) -> String {
    text.nfkd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Normalize text for comparison: lowercase, strip accents, replace
/// punctuation with spaces, collapse whitespace.
///
/// The ligatures `œ` and `æ` are expanded first; NFKD does not decompose them.
pub fn normalize(text: &str) -> String {
    let lowered = text.trim().to_lowercase().replace('œ', "oe").replace('æ', "ae");
    let stripped = strip_accents(&lowered);
    let spaced: String = stripped
        .chars()
        .map(|c| match c {
            '-' | '\'' | '`' | '\u{2018}' | '\u{2019}' => ' ',
            other => other,
        })
        .collect();
    let cleaned = NON_WORD_RE.replace_all(&spaced, " ");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strip leading French articles from already-normalized text, repeatedly,
/// until the first remaining token is not an article.
pub fn strip_leading_articles(text: &str) -> String {
    let mut words: Vec<&str> = text.split_whitespace().collect();
    while let Some(first) = words.first() {
        if FRENCH_ARTICLES.contains(first) {
            words.remove(0);
        } else {
            break;
        }
    }
    words.join(" ")
}

/// Render a slug as space-separated words: `"le-cepac-silo"` -> `"le cepac silo"`.
pub fn slug_to_words(slug: &str) -> String {
    slug.replace('-', " ")
}

/// Extract the trailing slug segment from a legacy alias path:
/// `"/locations/friche/"` -> `Some("friche")`.
pub fn extract_alias_slug(alias_path: &str) -> Option<String> {
    let parts: Vec<&str> = alias_path.trim_matches('/').split('/').collect();
    if parts.len() >= 2 && parts[0] == "locations" && !parts[1].is_empty() {
        Some(parts[1].to_string())
    } else {
        None
    }
}

/// Convert a slug to a human-readable title, capitalizing everything except
/// French minor words: `"theatre-des-calanques"` -> `"Theatre des Calanques"`.
pub fn slug_to_title(slug: &str) -> String {
    slug.split('-')
        .enumerate()
        .map(|(i, word)| {
            if i == 0 || !FRENCH_MINOR_WORDS.contains(&word) {
                capitalize(word)
            } else {
                word.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Normalize a booking URL for identity comparison: lowercase, strip scheme,
/// leading `www.`, trailing slash, and `utm_*`/`ref=` tracking tails.
pub fn normalize_url(url: &str) -> String {
    let url = url.trim().to_lowercase();
    let url = SCHEME_RE.replace(&url, "");
    let url = WWW_RE.replace(&url, "");
    let url = url.trim_end_matches('/');
    let url = UTM_TAIL_RE.replace(url, "");
    REF_TAIL_RE.replace(&url, "").into_owned()
}

/// Normalize an event name for indexing: lowercase, remove punctuation,
/// collapse whitespace.  Unlike [`normalize`], accents are preserved.
pub fn normalize_name(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let cleaned = NON_WORD_RE.replace_all(&lowered, "");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extract the registrable domain from a website URL for comparison:
/// scheme and `www.` stripped, path discarded.
pub fn extract_domain(url: &str) -> String {
    let url = url.trim().to_lowercase();
    let url = SCHEME_RE.replace(&url, "");
    let url = WWW_RE.replace(&url, "");
    url.split('/').next().unwrap_or_default().to_string()
}
