use std::collections::HashSet;
use std::hash::Hash;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use super::MIN_TOKEN_CHARS;

/// Lowercase, strip diacritics and punctuation, trim.
///
/// Diacritics are removed by NFD decomposition followed by dropping combining
/// marks, so "Régulation" becomes "regulation". Punctuation is deleted rather
/// than replaced with a space.
pub fn normalize_text(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Normalized whitespace tokens long enough to carry meaning
pub fn significant_tokens(text: &str) -> HashSet<String> {
    normalize_text(text)
        .split_whitespace()
        .filter(|token| token.chars().count() >= MIN_TOKEN_CHARS)
        .map(str::to_string)
        .collect()
}

/// Lowercased tag set; duplicates collapse
pub fn tag_set<S: AsRef<str>>(tags: &[S]) -> HashSet<String> {
    tags.iter().map(|tag| tag.as_ref().to_lowercase()).collect()
}

/// Jaccard index of two sets, 0 when either is empty
pub fn jaccard<T: Eq + Hash>(a: &HashSet<T>, b: &HashSet<T>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}

/// Overlap coefficient: intersection over the smaller set, 0 when either is empty
pub fn overlap_coefficient<T: Eq + Hash>(a: &HashSet<T>, b: &HashSet<T>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let intersection = a.intersection(b).count();
    intersection as f64 / a.len().min(b.len()) as f64
}

/// Title similarity in [0, 1]: Jaccard index of the significant token sets
pub fn text_similarity(a: &str, b: &str) -> f64 {
    jaccard(&significant_tokens(a), &significant_tokens(b))
}

/// Tag overlap in [0, 1], biased toward the smaller tag set
pub fn tag_overlap<S: AsRef<str>>(tags_a: &[S], tags_b: &[S]) -> f64 {
    overlap_coefficient(&tag_set(tags_a), &tag_set(tags_b))
}
