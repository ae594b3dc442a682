//! Map view assembly
//!
//! Turns a panel layout plus the operator's cluster statuses into a flat,
//! serializable list of markers and links for the browser to draw.

use crate::layout::{ClusterId, MapPanel, ATTACKED_CLUSTERS, ATTACK_SERVER};
use crate::policy::{LinkDirection, LinkStyle, MarkerStyle, ATTACK_LINK, ATTACK_SERVER_MARKER};
use crate::{GeoPoint, SystemStatus};
use geojson::{Feature, FeatureCollection, Geometry, Value};
use serde::Serialize;
use serde_json::{Map as JsonObject, Value as JsonValue};
use std::collections::BTreeMap;

/// Status per cluster. Clusters absent from the map are treated as Online.
pub type ClusterStatuses = BTreeMap<ClusterId, SystemStatus>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerRole {
    Headquarters,
    Server,
    AttackServer,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub role: MarkerRole,
    pub cluster: Option<ClusterId>,
    pub status: Option<SystemStatus>,
    pub position: GeoPoint,
    pub style: MarkerStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapLink {
    pub cluster: Option<ClusterId>,
    pub from: GeoPoint,
    pub to: GeoPoint,
    pub color: &'static str,
    pub weight: u8,
}

impl MapLink {
    fn between(cluster: Option<ClusterId>, hub: GeoPoint, server: GeoPoint, style: &LinkStyle) -> Self {
        let (from, to) = match style.direction {
            LinkDirection::HubToServer => (hub, server),
            LinkDirection::ServerToHub => (server, hub),
        };
        Self {
            cluster,
            from,
            to,
            color: style.color,
            weight: style.weight,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub panel: MapPanel,
    pub title: &'static str,
    pub center: GeoPoint,
    pub zoom: u8,
    pub tiles: &'static str,
    /// URLs of boundary GeoJSON overlays
    pub boundaries: Vec<String>,
    pub markers: Vec<MapMarker>,
    pub links: Vec<MapLink>,
    /// At least one marker should blink
    pub pulse: bool,
}

/// Build the markers and links for one panel
pub fn build_map_view(
    panel: MapPanel,
    statuses: &ClusterStatuses,
    show_attack_server: bool,
    boundaries: Vec<String>,
) -> MapView {
    let layout = panel.layout();
    let mut markers = Vec::new();
    let mut links = Vec::new();
    let mut pulse = false;

    for cluster in ClusterId::all() {
        let status = statuses.get(&cluster).copied().unwrap_or_default();
        let policy = status.policy();
        let hub = layout.hub(cluster);

        pulse |= policy.pulsing;

        markers.push(MapMarker {
            role: MarkerRole::Headquarters,
            cluster: Some(cluster),
            status: Some(status),
            position: hub,
            style: policy.hub,
        });

        for server in layout.servers(cluster) {
            markers.push(MapMarker {
                role: MarkerRole::Server,
                cluster: Some(cluster),
                status: Some(status),
                position: server,
                style: policy.server,
            });
            if let Some(style) = &policy.link {
                links.push(MapLink::between(Some(cluster), hub, server, style));
            }
        }
    }

    if show_attack_server {
        markers.push(MapMarker {
            role: MarkerRole::AttackServer,
            cluster: None,
            status: None,
            position: ATTACK_SERVER,
            style: ATTACK_SERVER_MARKER,
        });
        for cluster in ATTACKED_CLUSTERS {
            links.push(MapLink::between(
                None,
                layout.hub(cluster),
                ATTACK_SERVER,
                &ATTACK_LINK,
            ));
        }
    }

    MapView {
        panel,
        title: layout.title,
        center: layout.center,
        zoom: layout.zoom,
        tiles: layout.tiles,
        boundaries,
        markers,
        links,
        pulse,
    }
}

impl MapView {
    pub fn links_for(&self, cluster: ClusterId) -> impl Iterator<Item = &MapLink> {
        self.links.iter().filter(move |l| l.cluster == Some(cluster))
    }

    pub fn markers_for(&self, cluster: ClusterId) -> impl Iterator<Item = &MapMarker> {
        self.markers.iter().filter(move |m| m.cluster == Some(cluster))
    }

    /// Export markers (Points) and links (LineStrings) as GeoJSON
    pub fn to_geojson(&self) -> FeatureCollection {
        let mut features = Vec::with_capacity(self.markers.len() + self.links.len());

        for marker in &self.markers {
            let mut properties = JsonObject::new();
            properties.insert("role".to_string(), to_json(&marker.role));
            properties.insert("cluster".to_string(), to_json(&marker.cluster));
            properties.insert("status".to_string(), to_json(&marker.status));
            properties.insert("style".to_string(), to_json(&marker.style));

            features.push(Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::Point(marker.position.lon_lat()))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            });
        }

        for link in &self.links {
            let mut properties = JsonObject::new();
            properties.insert("cluster".to_string(), to_json(&link.cluster));
            properties.insert("color".to_string(), JsonValue::from(link.color));
            properties.insert("weight".to_string(), JsonValue::from(link.weight));

            features.push(Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::LineString(vec![
                    link.from.lon_lat(),
                    link.to.lon_lat(),
                ]))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            });
        }

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> JsonValue {
    serde_json::to_value(value).unwrap_or(JsonValue::Null)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statuses(s1: SystemStatus, s2: SystemStatus, s3: SystemStatus) -> ClusterStatuses {
        [
            (ClusterId::Server1, s1),
            (ClusterId::Server2, s2),
            (ClusterId::Server3, s3),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_all_online_view() {
        let view = build_map_view(
            MapPanel::Primary,
            &ClusterStatuses::new(),
            false,
            vec!["/data/output.geojson".to_string()],
        );

        // 3 hubs + 23 servers
        assert_eq!(view.markers.len(), 26);
        assert_eq!(view.links.len(), 23);
        assert!(!view.pulse);
        assert!(view.links.iter().all(|l| l.color == "lightgreen"));
        assert_eq!(view.boundaries.len(), 1);
    }

    #[test]
    fn test_isolated_cluster_has_no_links() {
        let view = build_map_view(
            MapPanel::Primary,
            &statuses(SystemStatus::Online, SystemStatus::Isolated, SystemStatus::Online),
            false,
            vec![],
        );

        assert_eq!(view.links_for(ClusterId::Server2).count(), 0);
        assert_eq!(view.links_for(ClusterId::Server1).count(), 9);
        assert!(view
            .markers_for(ClusterId::Server2)
            .all(|m| matches!(m.style, MarkerStyle::Icon { color: "lightgray", .. })));
    }

    #[test]
    fn test_offline_cluster_pulses_red() {
        let view = build_map_view(
            MapPanel::Primary,
            &statuses(SystemStatus::Online, SystemStatus::Online, SystemStatus::Offline),
            false,
            vec![],
        );

        assert!(view.pulse);
        let links: Vec<_> = view.links_for(ClusterId::Server3).collect();
        assert_eq!(links.len(), 4);
        let hub = MapPanel::Primary.layout().hub(ClusterId::Server3);
        for link in links {
            assert_eq!(link.color, "red");
            assert_eq!(link.weight, 2);
            assert_eq!(link.to, hub);
        }
        assert!(view.markers_for(ClusterId::Server3).all(|m| m.style.is_pulsing()));
    }

    #[test]
    fn test_attack_server_only_when_enabled() {
        let hidden = build_map_view(MapPanel::Primary, &ClusterStatuses::new(), false, vec![]);
        assert!(!hidden.markers.iter().any(|m| m.role == MarkerRole::AttackServer));

        let shown = build_map_view(MapPanel::Primary, &ClusterStatuses::new(), true, vec![]);
        let attack: Vec<_> = shown
            .markers
            .iter()
            .filter(|m| m.role == MarkerRole::AttackServer)
            .collect();
        assert_eq!(attack.len(), 1);
        assert_eq!(attack[0].position, ATTACK_SERVER);

        let attack_links: Vec<_> = shown.links.iter().filter(|l| l.cluster.is_none()).collect();
        assert_eq!(attack_links.len(), 2);
        assert!(attack_links.iter().all(|l| l.from == ATTACK_SERVER));
    }

    #[test]
    fn test_device_panel_uses_device_hubs() {
        let view = build_map_view(MapPanel::Device, &ClusterStatuses::new(), false, vec![]);
        let hub = view
            .markers
            .iter()
            .find(|m| m.role == MarkerRole::Headquarters)
            .unwrap();
        assert_eq!(hub.position, MapPanel::Device.layout().hub(ClusterId::Server1));
        assert_eq!(view.title, "Navigation Data Integrity Team Member's Device");
    }

    #[test]
    fn test_geojson_export() {
        let view = build_map_view(
            MapPanel::Primary,
            &statuses(SystemStatus::Offline, SystemStatus::Isolated, SystemStatus::Online),
            true,
            vec![],
        );
        let fc = view.to_geojson();

        assert_eq!(fc.features.len(), view.markers.len() + view.links.len());

        let first = &fc.features[0];
        assert_eq!(first.property("role").and_then(|v| v.as_str()), Some("headquarters"));
        assert_eq!(first.property("status").and_then(|v| v.as_str()), Some("Offline"));
        match &first.geometry.as_ref().unwrap().value {
            Value::Point(position) => {
                assert_eq!(position[0], view.markers[0].position.longitude);
                assert_eq!(position[1], view.markers[0].position.latitude);
            }
            other => panic!("Expected Point, got {:?}", other),
        }
    }
}
