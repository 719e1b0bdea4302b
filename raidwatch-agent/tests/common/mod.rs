//! Shared MegaCli dumps and test doubles

#![allow(dead_code)]

use async_trait::async_trait;
use raidwatch_agent::fetcher::Fetcher;
use raidwatch_agent::monitor::{Level, RunReport};
use raidwatch_agent::notifier::Notifier;
use raidwatch_common::{Query, RawResult, Result};
use std::collections::HashMap;
use std::sync::Mutex;

pub const ADAPTER_OK: &str = "
Adapter #0

==============================================================================
                    Versions
                ================
Product Name    : PERC H710 Mini
Serial No       : 29F04QV
FW Package Build: 21.3.0-0009

                Image Versions in Flash:
                ================
BIOS Version       : 5.42.00.1_4.12.05.00_0x05290000
Ctrl-R Version     : 4.04-0003
Boot Block Version : 2.05.00.00-0010
                Pending Images in Flash
                ================
None

                HW Configuration
                ================
SAS Address      : 5b083fe0e8d5a200
BBU              : Present
Alarm            : Absent
NVRAM            : Present
Memory           : Present
Flash            : Present
Memory Size      : 512MB

                Settings
                ================
Current Time                     : 9:54:11 3/14, 2017
Predictive Fail Poll Interval    : 300sec

                Status
                ================
ECC Bucket Count                 : 0

                Error Counters
                ================
Memory Correctable Errors   : 0
Memory Uncorrectable Errors : 0

Exit Code: 0x00
";

pub const LD_OPTIMAL: &str = "

Adapter 0 -- Virtual Drive Information:
Virtual Drive: 0 (Target Id: 0)
Name                :
RAID Level          : Primary-1, Secondary-0, RAID Level Qualifier-0
Size                : 1.818 TB
Sector Size         : 512
Mirror Data         : 1.818 TB
State               : Optimal
Strip Size          : 64 KB
Number Of Drives    : 2
Span Depth          : 1
Default Cache Policy: WriteBack, ReadAdaptive, Direct, No Write Cache if Bad BBU
Current Cache Policy: WriteBack, ReadAdaptive, Direct, No Write Cache if Bad BBU
Disk Cache Policy   : Disk's Default
Encryption Type     : None
Is VD Cached: No

Exit Code: 0x00
";

pub const PD_OK: &str = "

Enclosure Device ID: 252
Slot Number: 1
Drive's position: DiskGroup: 0, Span: 0, Arm: 1
Enclosure position: N/A
Device Id: 1
WWN: 5000C50076C1A2B3
Sequence Number: 2
Media Error Count: 0
Other Error Count: 0
Predictive Failure Count: 0
Last Predictive Failure Event Seq Number: 0
PD Type: SATA
Raw Size: 1.819 TB [0xe8e088b0 Sectors]
Firmware state: Online, Spun Up
Device Firmware Level: CC43
Inquiry Data:             Z1E0ABCDST2000NM0033-9ZM175                     SN04
Connected Port Number: 1(path0)
Drive Temperature :31C (87.80 F)
Drive has flagged a S.M.A.R.T alert : No

Exit Code: 0x00
";

/// Substitute one `Label: Value` line in a fixture
pub fn with_field(dump: &str, line: &str, replacement: &str) -> String {
    assert!(dump.contains(line), "fixture does not contain {:?}", line);
    dump.replace(line, replacement)
}

/// Fetcher serving canned results; unknown queries fail like a missing file
#[derive(Default)]
pub struct StaticFetcher {
    results: HashMap<Query, RawResult>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, query: Query, result: RawResult) -> Self {
        self.results.insert(query, result);
        self
    }
}

#[async_trait]
impl Fetcher for StaticFetcher {
    async fn fetch(&self, query: &Query) -> RawResult {
        self.results
            .get(query)
            .cloned()
            .unwrap_or_else(|| RawResult::error("File not found"))
    }
}

/// Notifier recording every delivered level
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<Level>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<Level> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl<'a> Notifier for &'a RecordingNotifier {
    async fn notify(&self, level: Level, _report: &RunReport) -> Result<()> {
        self.sent.lock().unwrap().push(level);
        Ok(())
    }
}
