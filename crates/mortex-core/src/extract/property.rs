//! Property attribution: match a document to exactly one directory entry.

use regex::RegexBuilder;
use strsim::normalized_levenshtein;
use tracing::{debug, warn};

use crate::error::PropertyError;
use crate::models::PropertyDirectory;

/// Fuzzy acceptance threshold on the 0-100 partial-ratio scale.
const FUZZY_THRESHOLD: f64 = 92.0;

/// Only the head of the document participates in fuzzy matching; the
/// property identity appears near the top of every statement layout.
const FUZZY_WINDOW_CHARS: usize = 5000;

/// Attribute the document to one property code.
///
/// Resolution order: whole-word case-insensitive search for each property
/// code, then for each property name, both in directory order; finally a
/// partial-ratio comparison of each name against the head of the text,
/// accepted at >= 92. Exact matches always precede fuzzy ones regardless
/// of fuzzy score. With no confident match the batch must stop and ask
/// the operator, so this fails with [`PropertyError::NotResolved`].
pub fn resolve_property<'a>(
    full_text: &str,
    directory: &'a PropertyDirectory,
    document: &str,
) -> Result<&'a str, PropertyError> {
    for entry in directory.entries() {
        if word_match(full_text, &entry.code) {
            debug!(code = %entry.code, document, "property code found verbatim");
            return Ok(&entry.code);
        }
    }

    for entry in directory.entries() {
        if !entry.name.is_empty() && word_match(full_text, &entry.name) {
            debug!(code = %entry.code, name = %entry.name, document, "property name found verbatim");
            return Ok(&entry.code);
        }
    }

    let head: String = full_text.chars().take(FUZZY_WINDOW_CHARS).collect();
    let mut best: Option<(&str, f64)> = None;
    for entry in directory.entries() {
        if entry.name.is_empty() {
            continue;
        }
        let score = partial_ratio(&entry.name, &head);
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((&entry.code, score));
        }
    }

    if let Some((code, score)) = best {
        if score >= FUZZY_THRESHOLD {
            debug!(code, score, document, "property resolved by fuzzy name match");
            return Ok(code);
        }
        warn!(best_code = code, score, document, "no confident property match");
    }

    Err(PropertyError::NotResolved {
        document: document.to_string(),
    })
}

/// Whole-word, case-insensitive search for `needle` in `haystack`.
fn word_match(haystack: &str, needle: &str) -> bool {
    RegexBuilder::new(&format!(r"\b{}\b", regex::escape(needle)))
        .case_insensitive(true)
        .build()
        .map(|re| re.is_match(haystack))
        .unwrap_or(false)
}

/// Best similarity of `needle` against any same-length window of
/// `haystack`, on a 0-100 scale.
///
/// This is the partial-ratio construction: the short string slides over
/// the long one and the best local alignment wins, so a property name
/// buried in OCR noise still scores high.
fn partial_ratio(needle: &str, haystack: &str) -> f64 {
    let needle: Vec<char> = needle.to_lowercase().chars().collect();
    let haystack: Vec<char> = haystack.to_lowercase().chars().collect();

    if needle.is_empty() || haystack.is_empty() {
        return 0.0;
    }
    let needle_str: String = needle.iter().collect();
    if haystack.len() <= needle.len() {
        let haystack_str: String = haystack.iter().collect();
        return normalized_levenshtein(&needle_str, &haystack_str) * 100.0;
    }

    // Window lengths one off from the needle's keep a single dropped or
    // inserted OCR character from costing two edits at the boundary.
    let n = needle.len();
    let lengths = [n.saturating_sub(1).max(1), n, n + 1];

    let mut best = 0.0f64;
    for start in 0..haystack.len() {
        for len in lengths {
            let end = start + len;
            if end > haystack.len() {
                continue;
            }
            let window_str: String = haystack[start..end].iter().collect();
            let score = normalized_levenshtein(&needle_str, &window_str) * 100.0;
            if score > best {
                best = score;
                if best >= 100.0 {
                    return best;
                }
            }
        }
    }
    best
}
