//! Label-to-canonical-header resolution.

use tracing::trace;

use crate::models::{CanonicalHeader, VendorRuleSet};

/// Static synonym table, keyed by normalized label.
///
/// Covers the label spellings seen across servicer statements that do not
/// literally match a canonical header.
const SYNONYMS: &[(&str, CanonicalHeader)] = &[
    ("insurance escrow", CanonicalHeader::EscrowInsurance),
    ("reserves bal", CanonicalHeader::OtherEscrows),
    ("reserves balance", CanonicalHeader::OtherEscrows),
    ("reserve balance", CanonicalHeader::OtherEscrows),
    ("tax escrow", CanonicalHeader::TaxEscrow),
    ("principal balance 1st", CanonicalHeader::Mortgage1st),
    ("principal balance 2nd", CanonicalHeader::Mortgage2nd),
    ("interest 1st", CanonicalHeader::InterestMortgage1st),
    ("interest 2nd", CanonicalHeader::InterestMortgage2nd),
];

/// Normalize a label for synonym and header comparison: trim, lowercase,
/// unify `-`/`_` to spaces, collapse internal whitespace.
pub fn normalize_label(label: &str) -> String {
    label
        .trim()
        .to_lowercase()
        .replace(['-', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolves extracted labels to canonical headers.
///
/// Resolution order, first match wins:
/// 1. vendor rule patterns (restricted to the detected vendor, or the
///    whole table when the vendor is unknown); most precise, wins even
///    over a generic synonym;
/// 2. the static synonym table on the normalized label;
/// 3. normalized equality against the canonical headers themselves;
/// 4. the `Other Escrows` catch-all for anything mentioning "reserve".
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderMapper;

impl HeaderMapper {
    pub fn new() -> Self {
        Self
    }

    /// Map one label to a canonical header, or `None` to drop the field.
    pub fn map(
        &self,
        label: &str,
        vendor: Option<&str>,
        rules: Option<&VendorRuleSet>,
    ) -> Option<CanonicalHeader> {
        if let Some(rules) = rules.filter(|r| !r.is_empty()) {
            let label_lower = label.to_lowercase();
            let matched = rules
                .rules()
                .iter()
                .filter(|rule| vendor.map_or(true, |v| rule.vendor == v))
                .find(|rule| label_lower.contains(&rule.pattern.to_lowercase()));
            if let Some(rule) = matched {
                trace!(label, vendor = %rule.vendor, header = %rule.mapped_header, "vendor rule matched");
                return Some(rule.mapped_header);
            }
        }

        let normalized = normalize_label(label);

        if let Some((_, header)) = SYNONYMS.iter().find(|(syn, _)| *syn == normalized) {
            return Some(*header);
        }

        if let Some(header) = CanonicalHeader::ALL
            .iter()
            .find(|h| normalize_label(h.as_str()) == normalized)
        {
            return Some(*header);
        }

        if normalized.contains("reserve") {
            return Some(CanonicalHeader::OtherEscrows);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawVendorRule;

    fn rules() -> VendorRuleSet {
        VendorRuleSet::from_rows(vec![
            RawVendorRule::new("Acme", "insurance escrow", "Tax Escrow", ""),
            RawVendorRule::new("Birch", "renovation", "Escrow-Renovation Reserve", ""),
        ])
        .unwrap()
    }

    #[test]
    fn normalizes_labels() {
        assert_eq!(normalize_label("  Escrow-Insurance "), "escrow insurance");
        assert_eq!(normalize_label("RESERVES__BALANCE"), "reserves balance");
        assert_eq!(normalize_label("Tax   Escrow"), "tax escrow");
    }

    #[test]
    fn vendor_rule_beats_synonym_table() {
        // The synonym table would send "insurance escrow" to
        // Escrow-Insurance; Acme's rule deliberately overrides it.
        let mapper = HeaderMapper::new();
        let header = mapper.map("Insurance Escrow", Some("Acme"), Some(&rules()));
        assert_eq!(header, Some(CanonicalHeader::TaxEscrow));
    }

    #[test]
    fn unknown_vendor_searches_all_rules() {
        let mapper = HeaderMapper::new();
        let header = mapper.map("Renovation Fund", None, Some(&rules()));
        assert_eq!(header, Some(CanonicalHeader::EscrowRenovationReserve));
    }

    #[test]
    fn other_vendors_rules_do_not_apply() {
        let mapper = HeaderMapper::new();
        // Birch is detected, so Acme's override is out of scope and the
        // synonym table applies.
        let header = mapper.map("Insurance Escrow", Some("Birch"), Some(&rules()));
        assert_eq!(header, Some(CanonicalHeader::EscrowInsurance));
    }

    #[test]
    fn synonyms_resolve_without_rules() {
        let mapper = HeaderMapper::new();
        assert_eq!(
            mapper.map("Reserves Bal", None, None),
            Some(CanonicalHeader::OtherEscrows)
        );
        assert_eq!(
            mapper.map("Principal Balance 1st", None, None),
            Some(CanonicalHeader::Mortgage1st)
        );
    }

    #[test]
    fn exact_header_names_resolve() {
        let mapper = HeaderMapper::new();
        assert_eq!(
            mapper.map("Escrow-Debt Service Reserve", None, None),
            Some(CanonicalHeader::EscrowDebtServiceReserve)
        );
    }

    #[test]
    fn reserve_catch_all_is_last() {
        let mapper = HeaderMapper::new();
        assert_eq!(
            mapper.map("Special Reserve Fund", None, None),
            Some(CanonicalHeader::OtherEscrows)
        );
        assert_eq!(mapper.map("Late Fee", None, None), None);
    }
}
