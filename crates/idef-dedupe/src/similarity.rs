//! Edit-distance similarity on a 0..=100 scale.

use rapidfuzz::distance::levenshtein;

/// Similarity of two strings from their Levenshtein distance.
///
/// Equal strings score 100; an empty side scores 0. Otherwise the score is
/// `100 * (L - d) / L` with `L` the longer length in characters, rounded
/// half up.
pub fn similarity(a: &str, b: &str) -> u8 {
    if a == b {
        return 100;
    }
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let longest = a.chars().count().max(b.chars().count());
    let distance = levenshtein::distance(a.chars(), b.chars()).min(longest);
    percent(longest - distance, longest)
}

/// `round(100 * part / whole)` with halves rounded up.
fn percent(part: usize, whole: usize) -> u8 {
    let scaled = (200 * part + whole) / (2 * whole);
    u8::try_from(scaled).unwrap_or(100)
}

/// Mean of two scores, halves rounded up.
pub fn average(a: u8, b: u8) -> u8 {
    let sum = u16::from(a) + u16::from(b);
    u8::try_from(sum.div_ceil(2)).unwrap_or(100)
}
