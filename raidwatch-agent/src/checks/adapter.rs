//! Adapter (controller) checks

use super::{parse_raw, tally, Rule, STRUCTURAL_ERROR};
use raidwatch_common::{EntityKind, RawResult};
use tracing::{error, info};

/// Anchor field of an adapter dump
pub const ANCHOR: &str = "Adapter";

/// Controller memory must report no ECC errors
pub const RULES: &[Rule] = &[
    Rule::new("Memory Uncorrectable Errors", "0"),
    Rule::new("Memory Correctable Errors", "0"),
];

/// Check one adapter dump and return its error tally
pub fn check_adapter(raw: &RawResult) -> u32 {
    let record = parse_raw(EntityKind::Adapter, raw);
    info!("Parsing Adapter Data");

    let Some(index) = record.get(ANCHOR) else {
        error!(field = ANCHOR, "Adapter not present in data");
        return STRUCTURAL_ERROR;
    };

    let id_label = format!("Adapter {}", index);
    tally(RULES, &id_label, &record)
}
