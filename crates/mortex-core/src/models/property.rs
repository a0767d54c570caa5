//! The property directory: the authoritative code/name mapping for a run.

/// One property known to the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyEntry {
    /// Unique short identifier, e.g. "105-Main".
    pub code: String,
    /// Human-readable name, e.g. "Main Street Apartments".
    pub name: String,
}

/// Read-only code/name directory, preserving input row order.
///
/// Attribution scans entries in this order, so the caller's row order is
/// the tie-break between equally good matches.
#[derive(Debug, Clone, Default)]
pub struct PropertyDirectory {
    entries: Vec<PropertyEntry>,
}

impl PropertyDirectory {
    /// Build a directory from `(code, name)` pairs.
    ///
    /// Values are trimmed; rows with an empty code are dropped.
    pub fn new<I, S, T>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let entries = pairs
            .into_iter()
            .filter_map(|(code, name)| {
                let code = code.as_ref().trim();
                if code.is_empty() {
                    return None;
                }
                Some(PropertyEntry {
                    code: code.to_string(),
                    name: name.as_ref().trim().to_string(),
                })
            })
            .collect();
        Self { entries }
    }

    /// Iterate entries in input order.
    pub fn entries(&self) -> impl Iterator<Item = &PropertyEntry> {
        self.entries.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Look up the name for a code.
    pub fn name_for(&self, code: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.code == code)
            .map(|e| e.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_drops_empty_codes() {
        let dir = PropertyDirectory::new(vec![
            (" 105-Main ", " Main Street Apartments "),
            ("", "Orphan"),
            ("207-Oak", "Oak Plaza"),
        ]);

        assert_eq!(dir.len(), 2);
        assert_eq!(dir.name_for("105-Main"), Some("Main Street Apartments"));
        assert_eq!(dir.name_for("Orphan"), None);
    }
}
