//! Vendor rule table: lender-specific label patterns and detection regexes.

use regex::{Regex, RegexBuilder};

use crate::error::VendorLogError;

use super::CanonicalHeader;

/// One validated row of the vendor rule table.
#[derive(Debug, Clone)]
pub struct VendorRule {
    /// Lender/servicer this rule belongs to.
    pub vendor: String,
    /// Case-insensitive substring matched against extracted labels.
    pub pattern: String,
    /// Header the matched field maps to.
    pub mapped_header: CanonicalHeader,
    /// Optional regex used only for vendor identification.
    pub detect_pattern: Option<Regex>,
}

/// The full rule table in original row order.
///
/// Row order matters twice: the first matching row wins during header
/// mapping, and vendors are scored in first-appearance order so detection
/// ties break deterministically.
#[derive(Debug, Clone, Default)]
pub struct VendorRuleSet {
    rules: Vec<VendorRule>,
}

/// One raw row as loaded from the vendor log, before validation.
#[derive(Debug, Clone, Default)]
pub struct RawVendorRule {
    pub vendor: String,
    pub pattern: String,
    pub mapped_header: String,
    pub detect_pattern: String,
}

impl VendorRuleSet {
    /// Validate raw rows into a rule set.
    ///
    /// Fails on the first row whose mapped header is outside the canonical
    /// set or whose detect pattern does not compile; a bad row is a data
    /// entry mistake the operator must fix, not something to skip silently.
    pub fn from_rows<I>(rows: I) -> Result<Self, VendorLogError>
    where
        I: IntoIterator<Item = RawVendorRule>,
    {
        let mut rules = Vec::new();

        for (idx, raw) in rows.into_iter().enumerate() {
            let vendor = raw.vendor.trim().to_string();
            let pattern = raw.pattern.trim().to_string();
            let header_name = raw.mapped_header.trim();
            let detect = raw.detect_pattern.trim();

            if vendor.is_empty() {
                return Err(VendorLogError::MissingField {
                    row: idx + 1,
                    field: "vendor",
                });
            }
            if pattern.is_empty() {
                return Err(VendorLogError::MissingField {
                    row: idx + 1,
                    field: "pattern",
                });
            }

            let mapped_header = CanonicalHeader::from_name(header_name).ok_or_else(|| {
                VendorLogError::UnknownHeader {
                    vendor: vendor.clone(),
                    pattern: pattern.clone(),
                    header: header_name.to_string(),
                }
            })?;

            let detect_pattern = if detect.is_empty() {
                None
            } else {
                Some(
                    RegexBuilder::new(detect)
                        .case_insensitive(true)
                        .multi_line(true)
                        .build()
                        .map_err(|source| VendorLogError::BadDetectPattern {
                            vendor: vendor.clone(),
                            pattern: detect.to_string(),
                            source,
                        })?,
                )
            };

            rules.push(VendorRule {
                vendor,
                pattern,
                mapped_header,
                detect_pattern,
            });
        }

        Ok(Self { rules })
    }

    /// All rules in original row order.
    pub fn rules(&self) -> &[VendorRule] {
        &self.rules
    }

    /// Vendor names in first-appearance order, without duplicates.
    pub fn vendors(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for rule in &self.rules {
            if !seen.contains(&rule.vendor.as_str()) {
                seen.push(rule.vendor.as_str());
            }
        }
        seen
    }

    /// Rules belonging to one vendor, in row order.
    pub fn rules_for<'a>(&'a self, vendor: &'a str) -> impl Iterator<Item = &'a VendorRule> {
        self.rules.iter().filter(move |r| r.vendor == vendor)
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl RawVendorRule {
    pub fn new(
        vendor: impl Into<String>,
        pattern: impl Into<String>,
        mapped_header: impl Into<String>,
        detect_pattern: impl Into<String>,
    ) -> Self {
        Self {
            vendor: vendor.into(),
            pattern: pattern.into(),
            mapped_header: mapped_header.into(),
            detect_pattern: detect_pattern.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_valid_rules() {
        let set = VendorRuleSet::from_rows(vec![
            RawVendorRule::new("Acme", "ins escrow", "Escrow-Insurance", r"ACME\s+SERVICING"),
            RawVendorRule::new("Acme", "tax", "Tax Escrow", ""),
            RawVendorRule::new("Birch", "reserve bal", "Other Escrows", ""),
        ])
        .unwrap();

        assert_eq!(set.rules().len(), 3);
        assert_eq!(set.vendors(), vec!["Acme", "Birch"]);
        assert_eq!(set.rules_for("Acme").count(), 2);
        assert!(set.rules()[0].detect_pattern.is_some());
        assert!(set.rules()[1].detect_pattern.is_none());
    }

    #[test]
    fn rejects_unknown_mapped_header() {
        let err = VendorRuleSet::from_rows(vec![RawVendorRule::new(
            "Acme",
            "tax",
            "Tax Escrows",
            "",
        )])
        .unwrap_err();

        assert!(matches!(err, VendorLogError::UnknownHeader { .. }));
    }

    #[test]
    fn rejects_bad_detect_pattern() {
        let err = VendorRuleSet::from_rows(vec![RawVendorRule::new(
            "Acme",
            "tax",
            "Tax Escrow",
            r"ACME[",
        )])
        .unwrap_err();

        assert!(matches!(err, VendorLogError::BadDetectPattern { .. }));
    }

    #[test]
    fn rejects_missing_vendor() {
        let err =
            VendorRuleSet::from_rows(vec![RawVendorRule::new("", "tax", "Tax Escrow", "")])
                .unwrap_err();

        assert!(matches!(
            err,
            VendorLogError::MissingField { field: "vendor", .. }
        ));
    }
}
