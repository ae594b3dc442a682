//! Zelonia Sites Library
//!
//! Static layout of the simulated Zelonia network (server clusters,
//! headquarters, attack server) and the rules that turn an operator-set
//! status into map markers and links.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub mod layout;
pub mod map;
pub mod policy;

pub use layout::{ClusterId, MapPanel, PanelLayout};
pub use map::{build_map_view, ClusterStatuses, MapLink, MapMarker, MapView};
pub use policy::{LinkStyle, MarkerStyle, StatusPolicy};

#[derive(Error, Debug, PartialEq)]
pub enum SiteError {
    #[error("Unknown map panel: {0}")]
    UnknownPanel(String),
    #[error("Unknown cluster: {0}")]
    UnknownCluster(String),
    #[error("Unknown status: {0} (expected Online, Isolated or Offline)")]
    UnknownStatus(String),
}

pub type Result<T> = std::result::Result<T, SiteError>;

/// Latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Shift by (d_lat, d_lon) degrees
    pub fn translate(self, shift: Translation) -> Self {
        Self {
            latitude: self.latitude + shift.d_lat,
            longitude: self.longitude + shift.d_lon,
        }
    }

    /// GeoJSON axis order
    pub fn lon_lat(self) -> Vec<f64> {
        vec![self.longitude, self.latitude]
    }
}

/// Constant shift from the Singapore frame into a panel frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    pub d_lat: f64,
    pub d_lon: f64,
}

impl Translation {
    pub const fn new(d_lat: f64, d_lon: f64) -> Self {
        Self { d_lat, d_lon }
    }
}

/// Operator-set state of a cluster or subsystem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum SystemStatus {
    #[default]
    Online,
    Isolated,
    Offline,
}

impl SystemStatus {
    pub fn all() -> [SystemStatus; 3] {
        [SystemStatus::Online, SystemStatus::Isolated, SystemStatus::Offline]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SystemStatus::Online => "Online",
            SystemStatus::Isolated => "Isolated",
            SystemStatus::Offline => "Offline",
        }
    }

    /// Static rendering policy for this status
    pub fn policy(&self) -> &'static StatusPolicy {
        policy::policy_for(*self)
    }
}

impl fmt::Display for SystemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SystemStatus {
    type Err = SiteError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "online" => Ok(SystemStatus::Online),
            "isolated" => Ok(SystemStatus::Isolated),
            "offline" => Ok(SystemStatus::Offline),
            _ => Err(SiteError::UnknownStatus(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_case_insensitive() {
        assert_eq!("online".parse::<SystemStatus>(), Ok(SystemStatus::Online));
        assert_eq!("ISOLATED".parse::<SystemStatus>(), Ok(SystemStatus::Isolated));
        assert_eq!("Offline".parse::<SystemStatus>(), Ok(SystemStatus::Offline));
        assert_eq!(
            "degraded".parse::<SystemStatus>(),
            Err(SiteError::UnknownStatus("degraded".to_string()))
        );
    }

    #[test]
    fn test_status_display_round_trip() {
        for status in SystemStatus::all() {
            assert_eq!(status.to_string().parse::<SystemStatus>(), Ok(status));
        }
    }

    #[test]
    fn test_translate() {
        let p = GeoPoint::new(1.3521, 103.8198).translate(Translation::new(5.0, 120.0));
        assert!((p.latitude - 6.3521).abs() < 1e-12);
        assert!((p.longitude - 223.8198).abs() < 1e-12);
        assert_eq!(p.lon_lat(), vec![p.longitude, p.latitude]);
    }
}
