//! Machine info extraction (ID1 / VA1)

use crate::types::{cents_to_dollars, DexRecord, MachineInfo, MachineTotals};
use std::path::Path;

/// Collects machine identity and totals for one file
///
/// Later ID1 / VA1 records replace earlier ones.
#[derive(Debug, Default)]
pub struct MachineInfoExtractor {
    machine_id: Option<String>,
    totals: MachineTotals,
}

impl MachineInfoExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a decoded record; per-slot records are ignored
    pub fn apply(&mut self, record: &DexRecord) {
        match record {
            DexRecord::MachineId(id) => self.machine_id = Some(id.machine_id.clone()),
            DexRecord::MachineTotals(totals) => self.totals = *totals,
            _ => {}
        }
    }

    /// Machine id seen so far, or `unknown` if none
    pub fn machine_id<'a>(&'a self, unknown: &'a str) -> &'a str {
        self.machine_id.as_deref().unwrap_or(unknown)
    }

    /// Build the machine info for the file at `path`
    pub fn finish(self, path: &Path, unknown_machine_id: &str) -> MachineInfo {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());

        MachineInfo {
            machine_id: self.machine_id.unwrap_or_else(|| unknown_machine_id.to_string()),
            file_name,
            file_path: path.to_path_buf(),
            total_sales_cents: self.totals.total_sales_cents,
            total_sales_dollars: cents_to_dollars(self.totals.total_sales_cents),
            total_vends: self.totals.total_vends,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MachineId, ProductInfo};

    fn id(machine_id: &str) -> DexRecord {
        DexRecord::MachineId(MachineId { machine_id: machine_id.to_string() })
    }

    fn totals(cents: u64, vends: u64) -> DexRecord {
        DexRecord::MachineTotals(MachineTotals { total_sales_cents: cents, total_vends: vends })
    }

    #[test]
    fn test_extract_machine_info() {
        let mut extractor = MachineInfoExtractor::new();
        extractor.apply(&id("WTN11241500105"));
        extractor.apply(&totals(12345, 150));
        extractor.apply(&DexRecord::ProductInfo(ProductInfo { slot: "1".to_string(), price_cents: 5 }));

        let info = extractor.finish(Path::new("DEX-files/machine.log"), "");
        assert_eq!(info.machine_id, "WTN11241500105");
        assert_eq!(info.file_name, "machine.log");
        assert_eq!(info.file_path, Path::new("DEX-files/machine.log"));
        assert_eq!(info.total_sales_cents, 12345);
        assert_eq!(info.total_sales_dollars, 123.45);
        assert_eq!(info.total_vends, 150);
    }

    #[test]
    fn test_last_write_wins() {
        let mut extractor = MachineInfoExtractor::new();
        extractor.apply(&id("FIRST"));
        extractor.apply(&totals(1, 1));
        extractor.apply(&id("SECOND"));
        extractor.apply(&totals(2, 2));
        assert_eq!(extractor.machine_id(""), "SECOND");

        let info = extractor.finish(Path::new("a.log"), "");
        assert_eq!(info.machine_id, "SECOND");
        assert_eq!(info.total_vends, 2);
    }

    #[test]
    fn test_missing_records() {
        let extractor = MachineInfoExtractor::new();
        assert_eq!(extractor.machine_id("Unknown"), "Unknown");

        let info = extractor.finish(Path::new("empty.log"), "Unknown");
        assert_eq!(info.machine_id, "Unknown");
        assert_eq!(info.file_name, "empty.log");
        assert_eq!(info.total_sales_cents, 0);
        assert_eq!(info.total_vends, 0);
    }
}
