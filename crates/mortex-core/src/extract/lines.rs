//! Label/value parsing for single statement lines.

use crate::models::ParsedField;

use super::patterns::LABEL_VALUE;

/// Parse a currency-style amount.
///
/// Accepts an optional `$`, thousands separators, up to two decimals, and
/// enclosing parentheses marking a negative. Anything outside that syntax
/// yields `None`; the parser never guesses a value.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    let negative = s.starts_with('(') && s.ends_with(')');
    let s = if negative { &s[1..s.len() - 1] } else { s };
    let s = s.replace(['$', ','], "");

    let value: f64 = s.parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Parse one statement line into a label/value candidate.
///
/// Primary: the [`LABEL_VALUE`] pattern. Fallback: split at the last
/// whitespace boundary and treat the trailing token as the value, with
/// the remainder (minus trailing punctuation) as the label. A line with
/// no parseable value is dropped silently.
pub fn parse_line(line: &str) -> Option<ParsedField> {
    if let Some(caps) = LABEL_VALUE.captures(line) {
        let label = caps.name("label")?.as_str().trim();
        if let Some(value) = parse_amount(caps.name("val")?.as_str()) {
            return Some(ParsedField {
                label: label.to_string(),
                value,
            });
        }
    }

    let (label, tail) = line.rsplit_once(char::is_whitespace)?;
    let value = parse_amount(tail)?;
    let label = label.trim_end_matches([' ', ':', '.', '-']).trim_start();
    if label.is_empty() {
        return None;
    }

    Some(ParsedField {
        label: label.to_string(),
        value,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_currency_amounts() {
        assert_eq!(parse_amount("$1,234.56"), Some(1234.56));
        assert_eq!(parse_amount("1200"), Some(1200.0));
        assert_eq!(parse_amount("(500)"), Some(-500.0));
        assert_eq!(parse_amount("($2,000.10)"), Some(-2000.10));
    }

    #[test]
    fn refuses_non_amounts() {
        assert_eq!(parse_amount("n/a"), None);
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("105-Main"), None);
        assert_eq!(parse_amount("12.3.4"), None);
    }

    #[test]
    fn parses_labelled_line() {
        let field = parse_line("Tax Escrow: $1,200.00").unwrap();
        assert_eq!(field.label, "Tax Escrow");
        assert_eq!(field.value, 1200.0);
    }

    #[test]
    fn parses_parenthesized_negative_line() {
        let field = parse_line("Escrow Advance (75.50)").unwrap();
        assert_eq!(field.label, "Escrow Advance");
        assert_eq!(field.value, -75.50);
    }

    #[test]
    fn fallback_splits_at_last_whitespace() {
        // A digit right before the value keeps the primary pattern from
        // matching; the whitespace-split fallback still recovers the field.
        let field = parse_line("Replacement Reserve 12/2024 350.00").unwrap();
        assert_eq!(field.label, "Replacement Reserve 12/2024");
        assert_eq!(field.value, 350.0);
    }

    #[test]
    fn identity_lines_yield_nothing() {
        assert_eq!(parse_line("Property: 105-Main"), None);
        assert_eq!(parse_line("Statement of Account"), None);
        assert_eq!(parse_line(""), None);
    }
}
