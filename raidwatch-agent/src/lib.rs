//! raidwatch - LSI MegaRAID health monitoring
//!
//! Library crate for the `raidwatch` binary and its integration tests.

pub mod checks;
pub mod config;
pub mod fetcher;
pub mod logging;
pub mod monitor;
pub mod notifier;
pub mod output;
pub mod parser;

pub use checks::{check_adapter, check_logical_disk, check_physical_disk, Verdict};
pub use monitor::{Inventory, Level, Monitor, RunReport};
pub use parser::{parse, LineShape, Record};
