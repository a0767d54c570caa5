//! Data models for statement consolidation.

mod headers;
mod property;
mod row;
mod vendor;

pub use headers::CanonicalHeader;
pub use property::{PropertyDirectory, PropertyEntry};
pub use row::{OutputRow, ParsedField};
pub use vendor::{RawVendorRule, VendorRule, VendorRuleSet};
