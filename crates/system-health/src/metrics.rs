//! Subsystem health panel

use crate::{Subsystem, SystemStatus};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use std::ops::{Range, RangeInclusive};

pub const ONLINE_GLYPH: &str = "✅";
pub const ISOLATED_GLYPH: &str = "➖";
pub const OFFLINE_GLYPH: &str = "❌";

pub const NOT_AVAILABLE: &str = "N/A";

/// Health percentage range for an Online subsystem
pub const HEALTH_RANGE: RangeInclusive<u8> = 96..=100;

pub const ACTIVE_INSTANCES: RangeInclusive<u32> = 20..=30;
pub const MONITORING_SERVICES: RangeInclusive<u32> = 5..=10;
pub const RESPONSE_TIME_MS: Range<f64> = 50.0..100.0;
pub const RESOURCE_UTILIZATION_PCT: Range<f64> = 60.0..80.0;
pub const SERVICE_AVAILABILITY_PCT: Range<f64> = 99.5..99.9;
pub const THROUGHPUT_MBPS: Range<f64> = 50.0..100.0;
pub const DB_CONNECTIONS: RangeInclusive<u32> = 100..=150;
pub const NETWORK_TRAFFIC_GB: Range<f64> = 100.0..200.0;

/// Row labels, in display order
pub const PARAMETERS: [&str; 8] = [
    "Active Instances",
    "Monitoring Services",
    "Response Time",
    "Resource Utilization",
    "Service Availability",
    "Throughput",
    "Database Connections",
    "Network Traffic",
];

/// Banner colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterRow {
    pub parameter: &'static str,
    pub value: String,
    pub status: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub subsystem: Subsystem,
    pub status: SystemStatus,
    pub headline: String,
    pub severity: Severity,
    /// `None` while isolated: nothing can be observed
    pub health_percent: Option<u8>,
    pub parameters: Vec<ParameterRow>,
    pub generated_at: DateTime<Utc>,
}

impl HealthReport {
    pub fn value_of(&self, parameter: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|row| row.parameter == parameter)
            .map(|row| row.value.as_str())
    }
}

fn online_values<R: Rng + ?Sized>(rng: &mut R) -> [String; 8] {
    [
        rng.gen_range(ACTIVE_INSTANCES).to_string(),
        rng.gen_range(MONITORING_SERVICES).to_string(),
        format!("{:.2} ms", rng.gen_range(RESPONSE_TIME_MS)),
        format!("{:.2}%", rng.gen_range(RESOURCE_UTILIZATION_PCT)),
        format!("{:.2}%", rng.gen_range(SERVICE_AVAILABILITY_PCT)),
        format!("{:.2} Mbps", rng.gen_range(THROUGHPUT_MBPS)),
        rng.gen_range(DB_CONNECTIONS).to_string(),
        format!("{:.2} GB", rng.gen_range(NETWORK_TRAFFIC_GB)),
    ]
}

fn rows(values: [String; 8], glyph: &'static str) -> Vec<ParameterRow> {
    PARAMETERS
        .iter()
        .zip(values)
        .map(|(&parameter, value)| ParameterRow {
            parameter,
            value,
            status: glyph,
        })
        .collect()
}

/// Build the health panel for `subsystem` in the given state
pub fn health_report<R: Rng + ?Sized>(
    subsystem: Subsystem,
    status: SystemStatus,
    rng: &mut R,
) -> HealthReport {
    let (severity, health_percent, parameters) = match status {
        SystemStatus::Online => {
            let health = rng.gen_range(HEALTH_RANGE);
            (Severity::Success, Some(health), rows(online_values(rng), ONLINE_GLYPH))
        }
        SystemStatus::Isolated => (
            Severity::Warning,
            None,
            rows(std::array::from_fn(|_| NOT_AVAILABLE.to_string()), ISOLATED_GLYPH),
        ),
        SystemStatus::Offline => (
            Severity::Error,
            Some(0),
            rows(std::array::from_fn(|_| "0".to_string()), OFFLINE_GLYPH),
        ),
    };

    HealthReport {
        subsystem,
        status,
        headline: format!("{} is {}", subsystem, status),
        severity,
        health_percent,
        parameters,
        generated_at: Utc::now(),
    }
}
