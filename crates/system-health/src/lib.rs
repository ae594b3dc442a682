//! System Health Library
//!
//! Fabricated health metrics and file-storage scan results for the six
//! Zelonia subsystems. Nothing is measured: every figure is a static table
//! entry or a draw from the caller's random number generator.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub mod chart;
pub mod metrics;
pub mod scan;

pub use chart::PieChart;
pub use metrics::{health_report, HealthReport, ParameterRow, Severity};
pub use scan::{scan_file_storage, ExtensionShare, ScanReport};
pub use zelonia_sites::SystemStatus;

#[derive(Error, Debug, PartialEq)]
pub enum HealthError {
    #[error("Unknown subsystem: {0}")]
    UnknownSubsystem(String),
}

pub type Result<T> = std::result::Result<T, HealthError>;

/// Simulated organizational system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Subsystem {
    Navigation,
    Weather,
    Email,
    HR,
    Finance,
    Pay,
}

impl Subsystem {
    pub fn all() -> [Subsystem; 6] {
        [
            Subsystem::Navigation,
            Subsystem::Weather,
            Subsystem::Email,
            Subsystem::HR,
            Subsystem::Finance,
            Subsystem::Pay,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Subsystem::Navigation => "Navigation",
            Subsystem::Weather => "Weather",
            Subsystem::Email => "Email",
            Subsystem::HR => "HR",
            Subsystem::Finance => "Finance",
            Subsystem::Pay => "Pay",
        }
    }
}

impl fmt::Display for Subsystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Subsystem {
    type Err = HealthError;

    fn from_str(s: &str) -> Result<Self> {
        Subsystem::all()
            .into_iter()
            .find(|sub| sub.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| HealthError::UnknownSubsystem(s.to_string()))
    }
}
