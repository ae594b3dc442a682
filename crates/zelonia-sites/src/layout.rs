//! Static site layout
//!
//! Server and headquarters coordinates are stored in the Singapore frame
//! (where they were surveyed) and moved into each panel's frame by a
//! constant [`Translation`].

use crate::{GeoPoint, Result, SiteError, Translation};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const fn p(latitude: f64, longitude: f64) -> GeoPoint {
    GeoPoint::new(latitude, longitude)
}

pub const CLUSTER_1_SERVERS: [GeoPoint; 9] = [
    p(1.3521, 103.8198),
    p(1.3578, 103.9870),
    p(1.3196, 103.8253),
    p(1.2901, 103.8029),
    p(1.2865, 103.8539),
    p(1.3242, 103.8744),
    p(1.3575, 103.7640),
    p(1.3667, 103.7744),
    p(1.3967, 103.70),
];

pub const CLUSTER_2_SERVERS: [GeoPoint; 10] = [
    p(1.2912, 103.8375),
    p(1.3480, 103.6830),
    p(1.3139, 103.7657),
    p(1.2984, 103.7736),
    p(1.3340, 103.7359),
    p(1.3199, 103.7655),
    p(1.3151, 103.7480),
    p(1.3329, 103.7065),
    p(1.2996, 103.8334),
    p(1.2831, 103.8165),
];

pub const CLUSTER_3_SERVERS: [GeoPoint; 4] = [
    p(1.388307, 103.890594),
    p(1.426724, 103.813737),
    p(1.280952, 103.813019),
    p(1.268026, 103.628778),
];

pub const HEADQUARTERS: [GeoPoint; 3] = [
    p(1.320, 103.8901),
    p(1.3104, 103.7151),
    p(1.261204, 103.669720),
];

/// Map centre before panel translation
pub const SINGAPORE: GeoPoint = p(1.3521, 103.8198);

/// Attack server, already in map frame (7.354704-60, 80.990871-100)
pub const ATTACK_SERVER: GeoPoint = p(7.354704 - 60.0, 80.990871 - 100.0);

/// Clusters whose hubs the attack server links to
pub const ATTACKED_CLUSTERS: [ClusterId; 2] = [ClusterId::Server1, ClusterId::Server2];

pub const DEFAULT_ZOOM: u8 = 11;
pub const DEFAULT_TILES: &str = "CartoDB dark_matter";

/// Boundary overlays drawn on every panel
pub const BOUNDARY_FILES: [&str; 2] = ["output.geojson", "newoutput.geojson"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ClusterId {
    #[serde(rename = "server1")]
    Server1,
    #[serde(rename = "server2")]
    Server2,
    #[serde(rename = "server3")]
    Server3,
}

impl ClusterId {
    pub fn all() -> [ClusterId; 3] {
        [ClusterId::Server1, ClusterId::Server2, ClusterId::Server3]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClusterId::Server1 => "server1",
            ClusterId::Server2 => "server2",
            ClusterId::Server3 => "server3",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            ClusterId::Server1 => 0,
            ClusterId::Server2 => 1,
            ClusterId::Server3 => 2,
        }
    }

    pub fn servers(&self) -> &'static [GeoPoint] {
        match self {
            ClusterId::Server1 => &CLUSTER_1_SERVERS,
            ClusterId::Server2 => &CLUSTER_2_SERVERS,
            ClusterId::Server3 => &CLUSTER_3_SERVERS,
        }
    }

    pub fn headquarters(&self) -> GeoPoint {
        HEADQUARTERS[self.index()]
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClusterId {
    type Err = SiteError;

    fn from_str(s: &str) -> Result<Self> {
        ClusterId::all()
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| SiteError::UnknownCluster(s.to_string()))
    }
}

/// One of the two map views on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapPanel {
    /// "Map of Affected Targets"
    Primary,
    /// Compromised team member's device view
    Device,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PanelLayout {
    pub panel: MapPanel,
    pub title: &'static str,
    pub center: GeoPoint,
    pub zoom: u8,
    pub tiles: &'static str,
    pub hub_shift: Translation,
    pub server_shift: Translation,
}

const PRIMARY_LAYOUT: PanelLayout = PanelLayout {
    panel: MapPanel::Primary,
    title: "Map of Affected Targets",
    center: p(1.3521 + 5.0, 103.8198 + 120.0),
    zoom: DEFAULT_ZOOM,
    tiles: DEFAULT_TILES,
    hub_shift: Translation::new(5.0, 120.0),
    server_shift: Translation::new(5.0, 120.0),
};

const DEVICE_LAYOUT: PanelLayout = PanelLayout {
    panel: MapPanel::Device,
    title: "Navigation Data Integrity Team Member's Device",
    center: p(1.3521 - 20.0, 103.8198 + 100.0),
    zoom: DEFAULT_ZOOM,
    tiles: DEFAULT_TILES,
    hub_shift: Translation::new(-20.0, 100.0),
    server_shift: Translation::new(5.0, 120.0),
};

impl MapPanel {
    pub fn all() -> [MapPanel; 2] {
        [MapPanel::Primary, MapPanel::Device]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MapPanel::Primary => "primary",
            MapPanel::Device => "device",
        }
    }

    pub fn layout(&self) -> &'static PanelLayout {
        match self {
            MapPanel::Primary => &PRIMARY_LAYOUT,
            MapPanel::Device => &DEVICE_LAYOUT,
        }
    }
}

impl FromStr for MapPanel {
    type Err = SiteError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "primary" | "main" => Ok(MapPanel::Primary),
            "device" => Ok(MapPanel::Device),
            _ => Err(SiteError::UnknownPanel(s.to_string())),
        }
    }
}

impl PanelLayout {
    pub fn hub(&self, cluster: ClusterId) -> GeoPoint {
        cluster.headquarters().translate(self.hub_shift)
    }

    pub fn servers(&self, cluster: ClusterId) -> impl Iterator<Item = GeoPoint> + '_ {
        cluster
            .servers()
            .iter()
            .map(move |point| point.translate(self.server_shift))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cluster_sizes() {
        assert_eq!(ClusterId::Server1.servers().len(), 9);
        assert_eq!(ClusterId::Server2.servers().len(), 10);
        assert_eq!(ClusterId::Server3.servers().len(), 4);
    }

    #[test]
    fn test_cluster_parse() {
        assert_eq!("server2".parse::<ClusterId>(), Ok(ClusterId::Server2));
        assert_eq!("SERVER3".parse::<ClusterId>(), Ok(ClusterId::Server3));
        assert!("server4".parse::<ClusterId>().is_err());
    }

    #[test]
    fn test_primary_translation() {
        let layout = MapPanel::Primary.layout();
        let hub = layout.hub(ClusterId::Server1);
        assert!((hub.latitude - 6.320).abs() < 1e-9);
        assert!((hub.longitude - 223.8901).abs() < 1e-9);

        let first = layout.servers(ClusterId::Server1).next().unwrap();
        assert!((first.latitude - layout.center.latitude).abs() < 1e-9);
        assert!((first.longitude - layout.center.longitude).abs() < 1e-9);
    }

    #[test]
    fn test_device_hubs_shifted_separately() {
        let layout = MapPanel::Device.layout();
        let hub = layout.hub(ClusterId::Server2);
        assert!((hub.latitude - (1.3104 - 20.0)).abs() < 1e-9);
        assert!((hub.longitude - (103.7151 + 100.0)).abs() < 1e-9);

        // Server points keep the primary frame
        let server = layout.servers(ClusterId::Server2).next().unwrap();
        assert!((server.latitude - (1.2912 + 5.0)).abs() < 1e-9);
    }

    #[test]
    fn test_panel_parse() {
        assert_eq!("device".parse::<MapPanel>(), Ok(MapPanel::Device));
        assert_eq!("Primary".parse::<MapPanel>(), Ok(MapPanel::Primary));
        assert_eq!(
            "satellite".parse::<MapPanel>(),
            Err(SiteError::UnknownPanel("satellite".to_string()))
        );
    }
}
