//! Regex patterns for statement line parsing.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Primary label/value pattern: a label of letters, spaces, hyphen,
    /// underscore, slash, and ampersand, a colon/whitespace separator,
    /// then a currency-style value token at the end of the line.
    ///
    /// The end anchor keeps identity lines like `Property: 105-Main`
    /// from being read as a label with value 105.
    pub static ref LABEL_VALUE: Regex = Regex::new(
        r"(?i)(?P<label>[A-Za-z \-_/&]+)[:\s]+(?P<val>\(?\$?[\d,]+(?:\.\d{1,2})?\)?)\s*$"
    ).unwrap();
}
