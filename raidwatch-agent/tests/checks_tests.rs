//! Parser and checker tests against realistic MegaCli output

mod common;

use common::{with_field, ADAPTER_OK, LD_OPTIMAL, PD_OK};
use raidwatch_agent::checks::{self, Rule, Verdict};
use raidwatch_agent::{check_adapter, check_logical_disk, check_physical_disk, parse};
use raidwatch_common::RawResult;

// ============== Parser ==============

#[test]
fn test_parse_is_idempotent() {
    assert_eq!(parse(PD_OK), parse(PD_OK));
    assert_eq!(parse(ADAPTER_OK), parse(ADAPTER_OK));
}

#[test]
fn test_well_formed_lines_round_trip() {
    let record = parse("Size : 1.818 TB\nState: Degraded\nName  :  data\nState : Optimal");

    assert_eq!(record.len(), 3);
    assert_eq!(record.get("Size"), Some("1.818 TB"));
    assert_eq!(record.get("Name"), Some("data"));
    // later duplicate wins
    assert_eq!(record.get("State"), Some("Optimal"));
}

#[test]
fn test_malformed_line_is_dropped() {
    let record = parse("Current Time: 9:54:11 3/14, 2017\nState: Optimal");

    assert_eq!(record.len(), 1);
    assert!(!record.contains_key("Current Time"));
    assert_eq!(record.get("State"), Some("Optimal"));
}

#[test]
fn test_parse_adapter_dump() {
    let record = parse(ADAPTER_OK);
    assert_eq!(record.get("Adapter"), Some("#0"));
    assert_eq!(record.get("Product Name"), Some("PERC H710 Mini"));
    assert_eq!(record.get("Memory Correctable Errors"), Some("0"));
    assert_eq!(record.get("Exit Code"), Some("0x00"));
}

#[test]
fn test_parse_virtual_drive_with_colon() {
    let record = parse(LD_OPTIMAL);
    assert_eq!(record.get("Virtual Drive"), Some("0 (Target Id0)"));
    assert_eq!(record.get("State"), Some("Optimal"));
    // Header line has an empty value but is a valid pair
    assert!(record.contains_key("Adapter 0 -- Virtual Drive Information"));
    assert!(!record.contains_key("Adapter"));
}

#[test]
fn test_parse_never_panics_on_garbage() {
    let inputs = [
        "",
        ":",
        "::::",
        "Adapter",
        "Adapter:",
        "Virtual Drive",
        "Virtual Drive:",
        "\u{0}\u{1}:\n\r\n\t",
        "Adapter #0: a: b: c",
    ];
    for input in inputs {
        let _ = parse(input);
    }
}

// ============== Evaluator ==============

#[test]
fn test_rule_verify() {
    let record = parse("State: Optimal");
    assert_eq!(Rule::new("State", "Optimal").verify("Virtual Drive 0", &record), Verdict::Matched);
    assert_eq!(Rule::new("State", "Degraded").verify("Virtual Drive 0", &record), Verdict::ValueMismatch);
    assert_eq!(Rule::new("Size", "1 TB").verify("Virtual Drive 0", &record), Verdict::FieldMissing);
}

// ============== Adapter ==============

#[test]
fn test_adapter_header_recovery() {
    let raw = RawResult::success(
        "Adapter #0\nMemory Uncorrectable Errors: 0\nMemory Correctable Errors: 0",
    );
    assert_eq!(check_adapter(&raw), 0);
}

#[test]
fn test_adapter_full_dump() {
    assert_eq!(check_adapter(&RawResult::success(ADAPTER_OK)), 0);

    let dump = with_field(
        ADAPTER_OK,
        "Memory Uncorrectable Errors : 0",
        "Memory Uncorrectable Errors : 4",
    );
    assert_eq!(check_adapter(&RawResult::success(dump)), 2);
}

// ============== Logical disk ==============

#[test]
fn test_logical_disk_optimal() {
    assert_eq!(check_logical_disk(&RawResult::success(LD_OPTIMAL)), 0);
}

#[test]
fn test_logical_disk_degraded_weighs_two() {
    let dump = with_field(LD_OPTIMAL, "State               : Optimal", "State               : Degraded");
    assert_eq!(check_logical_disk(&RawResult::success(dump)), 2);
}

#[test]
fn test_logical_disk_without_anchor() {
    let dump = with_field(LD_OPTIMAL, "Virtual Drive: 0 (Target Id: 0)", "");
    assert_eq!(check_logical_disk(&RawResult::success(dump)), checks::STRUCTURAL_ERROR);
}

// ============== Physical disk ==============

#[test]
fn test_physical_disk_ok() {
    assert_eq!(check_physical_disk(&RawResult::success(PD_OK)), 0);
}

#[test]
fn test_physical_disk_without_enclosure_short_circuits() {
    // Every value rule would fail here; only the structural error counts
    let raw = RawResult::success(
        "Slot Number: 1\nMedia Error Count: 12\nFirmware state: Failed\n\
         Drive has flagged a S.M.A.R.T alert : Yes",
    );
    assert_eq!(check_physical_disk(&raw), 1);
}

#[test]
fn test_physical_disk_missing_and_mismatch_combined() {
    let dump = with_field(PD_OK, "Media Error Count: 0\n", "");
    let dump = with_field(&dump, "Firmware state: Online, Spun Up", "Firmware state: Rebuild");
    assert_eq!(check_physical_disk(&RawResult::success(dump)), 3);
}

#[test]
fn test_physical_disk_smart_alert() {
    let dump = with_field(
        PD_OK,
        "Drive has flagged a S.M.A.R.T alert : No",
        "Drive has flagged a S.M.A.R.T alert : Yes",
    );
    assert_eq!(check_physical_disk(&RawResult::success(dump)), 2);
}

// ============== Failed fetches ==============

#[test]
fn test_failed_fetch_is_structural_error() {
    let stale = RawResult::failed("Maximum Time Exceeded");
    let missing = RawResult::error("File not found");

    assert_eq!(check_adapter(&stale), 1);
    assert_eq!(check_logical_disk(&missing), 1);
    assert_eq!(check_physical_disk(&missing), 1);
}
