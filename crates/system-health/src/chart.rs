//! Pie chart data for scan results

use crate::scan::ScanReport;
use serde::Serialize;

/// Categorical palette, cycled when a chart has more slices
pub const PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieChart {
    pub title: String,
    pub labels: Vec<String>,
    pub values: Vec<u32>,
    pub colors: Vec<&'static str>,
}

impl PieChart {
    pub fn from_scan(report: &ScanReport) -> Self {
        let labels: Vec<String> = report.shares.iter().map(|s| s.extension.clone()).collect();
        let values = report.shares.iter().map(|s| s.percent).collect();
        let colors = PALETTE.iter().copied().cycle().take(labels.len()).collect();

        Self {
            title: format!("File Extensions for {}", report.subsystem),
            labels,
            values,
            colors,
        }
    }
}
