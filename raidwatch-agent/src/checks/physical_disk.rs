//! Physical disk checks

use super::{parse_raw, tally, Rule, STRUCTURAL_ERROR};
use raidwatch_common::{EntityKind, RawResult};
use tracing::{error, info};

pub const ENCLOSURE_FIELD: &str = "Enclosure Device ID";
pub const SLOT_FIELD: &str = "Slot Number";

pub const RULES: &[Rule] = &[
    Rule::new("Media Error Count", "0"),
    Rule::new("Firmware state", "Online, Spun Up"),
    Rule::new("Drive has flagged a S.M.A.R.T alert", "No"),
];

/// Check one physical drive dump and return its error tally
///
/// A drive is identified by enclosure and slot; if either is missing no
/// further rule is evaluated.
pub fn check_physical_disk(raw: &RawResult) -> u32 {
    let record = parse_raw(EntityKind::PhysicalDisk, raw);
    info!("Parsing Physical Disk Data");

    let Some(enclosure) = record.get(ENCLOSURE_FIELD) else {
        error!(field = ENCLOSURE_FIELD, "Enclosure Device ID not present in data");
        return STRUCTURAL_ERROR;
    };
    let Some(slot) = record.get(SLOT_FIELD) else {
        error!(field = SLOT_FIELD, "Slot Number not present in data");
        return STRUCTURAL_ERROR;
    };

    let id_label = format!("Physical Disk {}-{}", enclosure, slot);
    tally(RULES, &id_label, &record)
}
