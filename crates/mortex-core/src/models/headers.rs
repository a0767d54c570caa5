//! The canonical header set for the mortgage import sheet.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the 13 fixed financial-category headers.
///
/// The variant order is the spreadsheet column order and must not change.
/// Every accepted field maps to exactly one of these; vendor rules naming
/// anything else are rejected when the rule table is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CanonicalHeader {
    Property,
    Mortgage1st,
    Mortgage2nd,
    InterestMortgage1st,
    InterestMortgage2nd,
    TaxEscrow,
    EscrowInsurance,
    EscrowInterestReserve,
    EscrowDebtServiceReserve,
    EscrowImmediateReplacementReserve,
    EscrowReplacementReserve,
    EscrowRenovationReserve,
    OtherEscrows,
}

impl CanonicalHeader {
    /// All headers in spreadsheet column order.
    pub const ALL: [CanonicalHeader; 13] = [
        CanonicalHeader::Property,
        CanonicalHeader::Mortgage1st,
        CanonicalHeader::Mortgage2nd,
        CanonicalHeader::InterestMortgage1st,
        CanonicalHeader::InterestMortgage2nd,
        CanonicalHeader::TaxEscrow,
        CanonicalHeader::EscrowInsurance,
        CanonicalHeader::EscrowInterestReserve,
        CanonicalHeader::EscrowDebtServiceReserve,
        CanonicalHeader::EscrowImmediateReplacementReserve,
        CanonicalHeader::EscrowReplacementReserve,
        CanonicalHeader::EscrowRenovationReserve,
        CanonicalHeader::OtherEscrows,
    ];

    /// The header name as it appears in the template sheet.
    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalHeader::Property => "Property",
            CanonicalHeader::Mortgage1st => "Mortgage 1st",
            CanonicalHeader::Mortgage2nd => "Mortgage 2nd",
            CanonicalHeader::InterestMortgage1st => "Interest Mortgage 1st",
            CanonicalHeader::InterestMortgage2nd => "Interest Mortgage 2nd",
            CanonicalHeader::TaxEscrow => "Tax Escrow",
            CanonicalHeader::EscrowInsurance => "Escrow-Insurance",
            CanonicalHeader::EscrowInterestReserve => "Escrow-Interest Reserve",
            CanonicalHeader::EscrowDebtServiceReserve => "Escrow-Debt Service Reserve",
            CanonicalHeader::EscrowImmediateReplacementReserve => {
                "Escrow-Immediate Replacement Reserve"
            }
            CanonicalHeader::EscrowReplacementReserve => "Escrow-Replacement Reserve",
            CanonicalHeader::EscrowRenovationReserve => "Escrow-Renovation Reserve",
            CanonicalHeader::OtherEscrows => "Other Escrows",
        }
    }

    /// Parse an exact header name (as written in the template).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|h| h.as_str() == name)
    }

    /// Zero-based position in the column order.
    pub fn position(&self) -> usize {
        // ALL is small; a linear scan keeps the order in one place.
        Self::ALL
            .iter()
            .position(|h| h == self)
            .unwrap_or_default()
    }
}

impl fmt::Display for CanonicalHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<CanonicalHeader> for String {
    fn from(header: CanonicalHeader) -> Self {
        header.as_str().to_string()
    }
}

impl TryFrom<String> for CanonicalHeader {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        CanonicalHeader::from_name(&value).ok_or_else(|| format!("unknown header '{value}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_order_is_stable() {
        assert_eq!(CanonicalHeader::ALL.len(), 13);
        assert_eq!(CanonicalHeader::ALL[0], CanonicalHeader::Property);
        assert_eq!(CanonicalHeader::ALL[5], CanonicalHeader::TaxEscrow);
        assert_eq!(CanonicalHeader::ALL[12], CanonicalHeader::OtherEscrows);
        assert_eq!(CanonicalHeader::TaxEscrow.position(), 5);
    }

    #[test]
    fn from_name_round_trips() {
        for header in CanonicalHeader::ALL {
            assert_eq!(CanonicalHeader::from_name(header.as_str()), Some(header));
        }
        assert_eq!(CanonicalHeader::from_name("Tax escrow"), None);
        assert_eq!(CanonicalHeader::from_name("Misc"), None);
    }
}
