//! File-storage scan simulation
//!
//! No files are read. Online subsystems report their reference extension
//! mix, Offline ones report a ransomware-style `SPIKE` dominating the mix,
//! Isolated ones report nothing recognisable.

use crate::{Subsystem, SystemStatus};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use std::ops::RangeInclusive;

pub const SPIKE_LABEL: &str = "SPIKE";
pub const UNDEFINED_LABEL: &str = "Undefined";

/// Spike share drawn for an Offline scan, in percent
pub const SPIKE_RANGE: RangeInclusive<u32> = 80..=90;

const NAVIGATION: [(&str, u32); 5] = [("shp", 56), ("gpx", 21), ("shx", 19), ("geojson", 3), ("csv", 1)];
const WEATHER: [(&str, u32); 6] = [("json", 40), ("csv", 30), ("txt", 20), ("xml", 5), ("grib", 3), ("dat", 2)];
const EMAIL: [(&str, u32); 6] = [("eml", 50), ("msg", 30), ("pst", 10), ("mbox", 5), ("pdf", 3), ("docx", 2)];
const HR: [(&str, u32); 6] = [("pdf", 45), ("docx", 30), ("xlsx", 10), ("csv", 7), ("txt", 5), ("jpg", 3)];
const FINANCE: [(&str, u32); 6] = [("xlsx", 50), ("pdf", 20), ("csv", 15), ("docx", 10), ("xml", 3), ("json", 2)];
const PAY: [(&str, u32); 6] = [("pdf", 50), ("xlsx", 25), ("csv", 10), ("docx", 8), ("xml", 5), ("json", 2)];

/// Reference extension mix, in display order. Each table sums to 100.
pub fn extension_table(subsystem: Subsystem) -> &'static [(&'static str, u32)] {
    match subsystem {
        Subsystem::Navigation => &NAVIGATION,
        Subsystem::Weather => &WEATHER,
        Subsystem::Email => &EMAIL,
        Subsystem::HR => &HR,
        Subsystem::Finance => &FINANCE,
        Subsystem::Pay => &PAY,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtensionShare {
    pub extension: String,
    pub percent: u32,
}

impl ExtensionShare {
    fn new(extension: &str, percent: u32) -> Self {
        Self {
            extension: extension.to_string(),
            percent,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub subsystem: Subsystem,
    pub status: SystemStatus,
    pub shares: Vec<ExtensionShare>,
    pub scanned_at: DateTime<Utc>,
}

impl ScanReport {
    pub fn total(&self) -> u32 {
        self.shares.iter().map(|s| s.percent).sum()
    }

    pub fn percent_of(&self, extension: &str) -> Option<u32> {
        self.shares
            .iter()
            .find(|s| s.extension == extension)
            .map(|s| s.percent)
    }

    pub fn spike(&self) -> Option<u32> {
        self.percent_of(SPIKE_LABEL)
    }

    /// (extension, percent) pairs in report order
    pub fn pairs(&self) -> Vec<(&str, u32)> {
        self.shares
            .iter()
            .map(|s| (s.extension.as_str(), s.percent))
            .collect()
    }
}

/// Scale `table` (summing to 100) down to `budget` points, keeping integer
/// shares that add up to exactly `budget` (largest remainder first).
fn apportion(table: &[(&str, u32)], budget: u32) -> Vec<ExtensionShare> {
    let scaled: Vec<(u32, u32)> = table
        .iter()
        .map(|&(_, pct)| (pct * budget / 100, pct * budget % 100))
        .collect();

    let mut shares: Vec<u32> = scaled.iter().map(|&(floor, _)| floor).collect();
    let leftover = budget.saturating_sub(shares.iter().sum());

    let mut order: Vec<usize> = (0..table.len()).collect();
    // Stable: ties keep table order
    order.sort_by(|&a, &b| scaled[b].1.cmp(&scaled[a].1));
    for &i in order.iter().take(leftover as usize) {
        shares[i] += 1;
    }

    table
        .iter()
        .zip(shares)
        .map(|(&(ext, _), pct)| ExtensionShare::new(ext, pct))
        .collect()
}

/// Simulate a file-storage scan of `subsystem` in the given state
pub fn scan_file_storage<R: Rng + ?Sized>(
    subsystem: Subsystem,
    status: SystemStatus,
    rng: &mut R,
) -> ScanReport {
    let table = extension_table(subsystem);

    let shares = match status {
        SystemStatus::Online => table
            .iter()
            .map(|&(ext, pct)| ExtensionShare::new(ext, pct))
            .collect(),
        SystemStatus::Offline => {
            let spike = rng.gen_range(SPIKE_RANGE);
            let mut shares = vec![ExtensionShare::new(SPIKE_LABEL, spike)];
            shares.extend(apportion(table, 100 - spike));
            shares
        }
        SystemStatus::Isolated => vec![ExtensionShare::new(UNDEFINED_LABEL, 100)],
    };

    ScanReport {
        subsystem,
        status,
        shares,
        scanned_at: Utc::now(),
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use proptest::prelude::*;

    fn subsystem_strategy() -> impl Strategy<Value = Subsystem> {
        (0usize..6).prop_map(|i| Subsystem::all()[i])
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(1000))]

        // Offline scans: spike in range, shares sum to exactly 100
        #[test]
        fn fuzz_offline_invariants(subsystem in subsystem_strategy(), seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let report = scan_file_storage(subsystem, SystemStatus::Offline, &mut rng);

            let spike = report.spike().unwrap();
            prop_assert!(SPIKE_RANGE.contains(&spike));
            prop_assert_eq!(report.total(), 100);

            // Remaining shares never exceed their reference value
            for (share, &(ext, pct)) in report.shares[1..].iter().zip(extension_table(subsystem)) {
                prop_assert_eq!(share.extension.as_str(), ext);
                prop_assert!(share.percent <= pct);
            }
        }

        // Apportioning any budget preserves the budget exactly
        #[test]
        fn fuzz_apportion_exact(subsystem in subsystem_strategy(), budget in 0u32..=100) {
            let shares = apportion(extension_table(subsystem), budget);
            prop_assert_eq!(shares.iter().map(|s| s.percent).sum::<u32>(), budget);
        }
    }
}
