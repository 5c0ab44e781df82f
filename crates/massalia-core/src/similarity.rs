//! Ratcliff/Obershelp sequence similarity.
//!
//! The ratio is `2 * M / T` where `M` is the total length of the recursively
//! found longest matching blocks and `T` the combined length of both strings.
//! Equivalent to Python's `difflib.SequenceMatcher.ratio()` with the junk
//! heuristic disabled, which is what the historical tuning of every threshold
//! in this crate assumes.

use std::collections::HashMap;

/// Similarity of two strings in `[0, 1]`.
///
/// Both empty compares as identical (1.0); exactly one empty as fully
/// dissimilar (0.0).  Operates on `char`s, so accented input is safe.
pub fn sequence_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let matches = total_matches(&a, &b);
    2.0 * matches as f64 / (a.len() + b.len()) as f64
}

/// Total length of all matching blocks: locate the longest common block,
/// then recurse into the unmatched regions left and right of it.
fn total_matches(a: &[char], b: &[char]) -> usize {
    let mut total = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];
    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, size) = longest_match(a, b, alo, ahi, blo, bhi);
        if size == 0 {
            continue;
        }
        total += size;
        pending.push((alo, i, blo, j));
        pending.push((i + size, ahi, j + size, bhi));
    }
    total
}

/// Longest matching block within `a[alo..ahi]` and `b[blo..bhi]`, returned as
/// `(start_in_a, start_in_b, length)`.  Ties resolve to the earliest block.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let mut best = (alo, blo, 0usize);
    // run_lengths[j] = length of the common run ending at a[i], b[j]
    let mut run_lengths: HashMap<usize, usize> = HashMap::new();
    for i in alo..ahi {
        let mut next_runs: HashMap<usize, usize> = HashMap::new();
        for j in blo..bhi {
            if a[i] == b[j] {
                let len = j
                    .checked_sub(1)
                    .and_then(|prev| run_lengths.get(&prev))
                    .copied()
                    .unwrap_or(0)
                    + 1;
                next_runs.insert(j, len);
                if len > best.2 {
                    best = (i + 1 - len, j + 1 - len, len);
                }
            }
        }
        run_lengths = next_runs;
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical() {
        assert!((sequence_ratio("soiree jazz", "soiree jazz") - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty() {
        assert!((sequence_ratio("", "") - 1.0).abs() < 1e-9);
        assert!(sequence_ratio("abc", "").abs() < 1e-9);
        assert!(sequence_ratio("", "abc").abs() < 1e-9);
    }

    #[test]
    fn test_known_ratio() {
        // Longest block "bcd" (3 chars), nothing else matches: 2*3 / 8.
        assert!((sequence_ratio("abcd", "bcde") - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_recursion_picks_up_side_blocks() {
        // "abc" matches around the differing middle: blocks "ab?" -> "ab" + "c".
        let ratio = sequence_ratio("abxc", "abyc");
        assert!((ratio - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_similar_event_names() {
        assert!(sequence_ratio("soiree jazz", "soiree jazz trio") > 0.7);
        assert!(sequence_ratio("concert electro", "exposition photo") < 0.5);
    }

    #[test]
    fn test_accented_chars() {
        let ratio = sequence_ratio("soirée jazz", "soiree jazz");
        assert!(ratio > 0.85 && ratio < 1.0);
    }

    #[test]
    fn test_symmetric_enough_for_thresholding() {
        let ab = sequence_ratio("le makeda", "makeda");
        let ba = sequence_ratio("makeda", "le makeda");
        assert!((ab - ba).abs() < 1e-9);
    }
}
