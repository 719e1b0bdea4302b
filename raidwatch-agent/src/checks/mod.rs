//! Health evaluation for parsed status records
//!
//! Every category checker parses one raw dump, makes sure the record actually
//! describes the expected entity (its anchor field is present) and then runs
//! a fixed list of [`Rule`]s against it. Results are tallied into an error
//! count; a check never fails with an error.

pub mod adapter;
pub mod logical_disk;
pub mod physical_disk;

pub use adapter::check_adapter;
pub use logical_disk::check_logical_disk;
pub use physical_disk::check_physical_disk;

use crate::parser::{self, Record};
use raidwatch_common::{EntityKind, RawResult};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

/// Penalty for a record that lacks its anchor field
pub const STRUCTURAL_ERROR: u32 = 1;

/// Result of evaluating a single rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Matched,
    FieldMissing,
    ValueMismatch,
}

impl Verdict {
    /// Weight of this verdict in an entity's error tally
    pub fn weight(self) -> u32 {
        match self {
            Verdict::Matched => 0,
            Verdict::FieldMissing => 1,
            Verdict::ValueMismatch => 2,
        }
    }
}

/// A field that must carry a known-good value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub field: &'static str,
    pub expected: &'static str,
}

impl Rule {
    pub const fn new(field: &'static str, expected: &'static str) -> Self {
        Self { field, expected }
    }

    pub fn verify(&self, id_label: &str, record: &Record) -> Verdict {
        verify(self.field, self.expected, id_label, record)
    }
}

/// Check that `field_name` is present in `record` with exactly `expected_value`
pub fn verify(field_name: &str, expected_value: &str, id_label: &str, record: &Record) -> Verdict {
    match record.get(field_name) {
        None => {
            error!(entity = id_label, field = field_name, "{} not present in data", field_name);
            Verdict::FieldMissing
        }
        Some(actual) if actual != expected_value => {
            error!(
                entity = id_label,
                field = field_name,
                expected = expected_value,
                actual,
                "{} {} not {}: {}",
                id_label,
                field_name,
                expected_value,
                actual
            );
            Verdict::ValueMismatch
        }
        Some(actual) => {
            info!(entity = id_label, field = field_name, "{} {} is {}", id_label, field_name, actual);
            Verdict::Matched
        }
    }
}

/// Sum the weights of all `rules` evaluated against `record`
pub fn tally(rules: &[Rule], id_label: &str, record: &Record) -> u32 {
    rules
        .iter()
        .map(|rule| rule.verify(id_label, record).weight())
        .sum()
}

/// Parse a raw dump for the given entity category
///
/// Non-success results are still parsed; their text is an error message and
/// the checker will report the missing anchor field.
pub(crate) fn parse_raw(kind: EntityKind, raw: &RawResult) -> Record {
    if !raw.is_success() {
        warn!(entity = %kind, status = %raw.status, "Checking {} data from unsuccessful fetch", kind);
    }
    let record = parser::parse(&raw.text);
    tracing::debug!(entity = %kind, record = %record, "Parsed {} data", kind);
    record
}

/// Run the checker matching `kind`
pub fn check_entity(kind: EntityKind, raw: &RawResult) -> u32 {
    match kind {
        EntityKind::Adapter => check_adapter(raw),
        EntityKind::LogicalDisk => check_logical_disk(raw),
        EntityKind::PhysicalDisk => check_physical_disk(raw),
    }
}
