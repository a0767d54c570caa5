//! Vendor (lender/servicer) identification from full statement text.

use tracing::debug;

use crate::models::VendorRuleSet;

/// Weight of a detect-pattern regex hit relative to a plain substring hit.
const DETECT_WEIGHT: u32 = 5;

/// Score each vendor against the document text and return the best one.
///
/// Score = 5 x matching `DetectPattern` regexes + 1 x `Pattern` values
/// found as case-insensitive substrings. Vendors are scored in
/// first-appearance order and a tie keeps the earlier vendor, so results
/// are deterministic for a given rule table. Returns `None` when the
/// table is empty or nothing scores; detection failure is not an error,
/// mapping simply falls back to vendor-agnostic rules.
pub fn detect_vendor<'a>(full_text: &str, rules: &'a VendorRuleSet) -> Option<&'a str> {
    if rules.is_empty() {
        return None;
    }

    let text_lower = full_text.to_lowercase();
    let mut best: Option<(&str, u32)> = None;

    for vendor in rules.vendors() {
        let mut score = 0u32;

        for rule in rules.rules_for(vendor) {
            if let Some(detect) = &rule.detect_pattern {
                if detect.is_match(full_text) {
                    score += DETECT_WEIGHT;
                }
            }
            if !rule.pattern.is_empty() && text_lower.contains(&rule.pattern.to_lowercase()) {
                score += 1;
            }
        }

        if score > 0 && best.map_or(true, |(_, s)| score > s) {
            best = Some((vendor, score));
        }
    }

    if let Some((vendor, score)) = best {
        debug!(vendor, score, "detected vendor");
    }
    best.map(|(vendor, _)| vendor)
}
