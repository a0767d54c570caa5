//! Statement field extraction: line parsing, vendor detection, header
//! mapping, and property attribution.

mod headers;
mod lines;
pub mod patterns;
mod property;
mod vendor;

pub use headers::{normalize_label, HeaderMapper};
pub use lines::{parse_amount, parse_line};
pub use property::resolve_property;
pub use vendor::detect_vendor;
