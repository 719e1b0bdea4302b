//! MegaCli status dump parser
//!
//! Turns the line-oriented `Label: Value` output of the controller CLI into a
//! key/value [`Record`]. The dump is not a clean format: header lines such as
//! `Adapter #0` carry no colon, and some values (`Virtual Drive: 0 (Target Id: 0)`)
//! contain one. Lines are classified into a [`LineShape`] and the recognised
//! malformations are recovered; everything else is dropped.

use std::fmt;
use tracing::debug;

/// Ordered key/value view of one status dump
///
/// Keys keep the position of their first occurrence; a later duplicate
/// overwrites the value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    entries: Vec<(String, String)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, overwriting any previous value for `key`
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:?}: {:?}", key, value)?;
        }
        write!(f, "}}")
    }
}

/// Shape of a single colon-split line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineShape<'a> {
    /// Regular `Label: Value` line
    Pair { key: &'a str, value: &'a str },
    /// `Adapter #0` style header without a colon
    AdapterHeader { key: &'a str, index: &'a str },
    /// `Virtual Drive` line whose value contains a colon
    VirtualDriveWithColon { key: &'a str, value: String },
    /// Anything else; the line is dropped
    Unrecognized,
}

impl<'a> LineShape<'a> {
    /// Classify the trimmed colon-separated tokens of one line
    pub fn classify(tokens: &[&'a str]) -> Self {
        if let &[key, value] = tokens {
            return LineShape::Pair { key, value };
        }

        let Some(&first) = tokens.first() else {
            return LineShape::Unrecognized;
        };

        if first.starts_with("Adapter") {
            let mut words = first.split_whitespace();
            return match (words.next(), words.next()) {
                (Some(key), Some(index)) => LineShape::AdapterHeader { key, index },
                _ => LineShape::Unrecognized,
            };
        }

        if first.starts_with("Virtual Drive") {
            // Only the first two value fragments are joined; further fragments are ignored
            return match tokens {
                &[key, head, tail, ..] => LineShape::VirtualDriveWithColon {
                    key,
                    value: format!("{}{}", head, tail),
                },
                _ => LineShape::Unrecognized,
            };
        }

        LineShape::Unrecognized
    }
}

/// Split one line on `:` and strip surrounding spaces from every token
///
/// Only the space character is stripped; tabs and carriage returns are kept.
pub fn tokenize(line: &str) -> Vec<&str> {
    line.split(':').map(|token| token.trim_matches(' ')).collect()
}

/// Parse a full status dump into a [`Record`]
///
/// Never fails; unrecognised lines are logged at debug level and skipped.
pub fn parse(text: &str) -> Record {
    let mut record = Record::new();

    for line in text.split('\n') {
        let tokens = tokenize(line);

        match LineShape::classify(&tokens) {
            LineShape::Pair { key, value } => record.insert(key, value),
            LineShape::AdapterHeader { key, index } => {
                debug!(line, "Recovered adapter header");
                record.insert(key, index);
            }
            LineShape::VirtualDriveWithColon { key, value } => {
                debug!(line, "Recovered virtual drive line with embedded colon");
                record.insert(key, value);
            }
            LineShape::Unrecognized => {
                if !line.trim().is_empty() {
                    debug!(
                        line,
                        tokens = tokens.len(),
                        "Dropping line: expected 2 tokens"
                    );
                }
            }
        }
    }

    record
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_trims_spaces_only() {
        assert_eq!(tokenize("  State  :  Optimal "), vec!["State", "Optimal"]);
        assert_eq!(tokenize("State:\tOptimal"), vec!["State", "\tOptimal"]);
        assert_eq!(tokenize(""), vec![""]);
    }

    #[test]
    fn test_classify_pair() {
        assert_eq!(
            LineShape::classify(&["State", "Optimal"]),
            LineShape::Pair { key: "State", value: "Optimal" }
        );
    }

    #[test]
    fn test_classify_adapter_header() {
        assert_eq!(
            LineShape::classify(&["Adapter #0"]),
            LineShape::AdapterHeader { key: "Adapter", index: "#0" }
        );
    }

    #[test]
    fn test_classify_bare_adapter_is_unrecognized() {
        assert_eq!(LineShape::classify(&["Adapter"]), LineShape::Unrecognized);
    }

    #[test]
    fn test_classify_virtual_drive() {
        assert_eq!(
            LineShape::classify(&["Virtual Drive", "0 (Target Id", "0)"]),
            LineShape::VirtualDriveWithColon {
                key: "Virtual Drive",
                value: "0 (Target Id0)".to_string(),
            }
        );
    }

    #[test]
    fn test_classify_virtual_drive_header_without_value() {
        assert_eq!(
            LineShape::classify(&["Virtual Drive Information"]),
            LineShape::Unrecognized
        );
    }

    #[test]
    fn test_classify_empty_and_unknown() {
        assert_eq!(LineShape::classify(&[]), LineShape::Unrecognized);
        assert_eq!(LineShape::classify(&[""]), LineShape::Unrecognized);
        assert_eq!(
            LineShape::classify(&["Exit Code", "0x00", "extra"]),
            LineShape::Unrecognized
        );
    }

    #[test]
    fn test_parse_overwrites_in_place() {
        let record = parse("A: 1\nB: 2\nA: 3");
        assert_eq!(record.len(), 2);
        assert_eq!(record.get("A"), Some("3"));
        let keys: Vec<&str> = record.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["A", "B"]);
    }

    #[test]
    fn test_parse_empty_text() {
        assert!(parse("").is_empty());
        assert!(parse("\n\n\n").is_empty());
    }

    #[test]
    fn test_record_display() {
        let record = parse("State: Optimal");
        assert_eq!(record.to_string(), "{\"State\": \"Optimal\"}");
    }
}
