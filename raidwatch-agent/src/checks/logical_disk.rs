//! Logical disk (virtual drive) checks

use super::{parse_raw, tally, Rule, STRUCTURAL_ERROR};
use raidwatch_common::{EntityKind, RawResult};
use tracing::{error, info};

pub const ANCHOR: &str = "Virtual Drive";

pub const RULES: &[Rule] = &[Rule::new("State", "Optimal")];

/// Check one virtual drive dump and return its error tally
pub fn check_logical_disk(raw: &RawResult) -> u32 {
    let record = parse_raw(EntityKind::LogicalDisk, raw);
    info!("Parsing Logical Disk Data");

    let Some(drive) = record.get(ANCHOR) else {
        error!(field = ANCHOR, "Virtual Drive not present in data");
        return STRUCTURAL_ERROR;
    };

    let id_label = format!("Virtual Drive {}", drive);
    tally(RULES, &id_label, &record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optimal() {
        let raw = RawResult::success("Virtual Drive: 0 (Target Id: 0)\nState               : Optimal");
        assert_eq!(check_logical_disk(&raw), 0);
    }

    #[test]
    fn test_degraded() {
        let raw = RawResult::success("Virtual Drive: 0 (Target Id: 0)\nState               : Degraded");
        assert_eq!(check_logical_disk(&raw), 2);
    }

    #[test]
    fn test_state_missing() {
        let raw = RawResult::success("Virtual Drive: 1 (Target Id: 1)\nName                :");
        assert_eq!(check_logical_disk(&raw), 1);
    }

    #[test]
    fn test_error_text() {
        let raw = RawResult::error("ssh: connect to host esxi port 22: Connection refused");
        assert_eq!(check_logical_disk(&raw), STRUCTURAL_ERROR);
    }
}
