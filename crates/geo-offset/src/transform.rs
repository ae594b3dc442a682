//! In-place offset of GeoJSON geometries

use crate::{GeoOffsetError, Offset, Result};
use geojson::{Feature, GeoJson, Geometry, Value};
use serde::Serialize;
use tracing::{debug, warn};

/// Counters reported after a document has been shifted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OffsetStats {
    pub features: usize,
    pub geometries: usize,
    pub positions: usize,
    pub empty_features: usize,
}

/// Shift one position. Elements past lon/lat (altitude) are kept as-is.
pub fn offset_position(position: &mut [f64], offset: &Offset) -> Result<()> {
    if position.len() < 2 {
        return Err(GeoOffsetError::MalformedPosition(position.len()));
    }
    let (lon, lat) = offset.apply(position[0], position[1])?;
    position[0] = lon;
    position[1] = lat;
    Ok(())
}

fn offset_line(line: &mut [Vec<f64>], offset: &Offset, stats: &mut OffsetStats) -> Result<()> {
    for position in line.iter_mut() {
        offset_position(position, offset)?;
        stats.positions += 1;
    }
    Ok(())
}

fn offset_rings(rings: &mut [Vec<Vec<f64>>], offset: &Offset, stats: &mut OffsetStats) -> Result<()> {
    for ring in rings.iter_mut() {
        offset_line(ring, offset, stats)?;
    }
    Ok(())
}

fn offset_bbox(bbox: &mut [f64], offset: &Offset) -> Result<()> {
    // 2D: [w, s, e, n]; 3D: [w, s, low, e, n, high]
    let pairs: &[(usize, usize)] = match bbox.len() {
        4 => &[(0, 1), (2, 3)],
        6 => &[(0, 1), (3, 4)],
        n => {
            warn!("Leaving bbox with {} elements untouched", n);
            return Ok(());
        }
    };
    for &(i, j) in pairs {
        let (lon, lat) = offset.apply(bbox[i], bbox[j])?;
        bbox[i] = lon;
        bbox[j] = lat;
    }
    Ok(())
}

fn offset_geometry_inner(
    geometry: &mut Geometry,
    offset: &Offset,
    stats: &mut OffsetStats,
) -> Result<()> {
    stats.geometries += 1;

    if let Some(bbox) = geometry.bbox.as_mut() {
        offset_bbox(bbox, offset)?;
    }

    match &mut geometry.value {
        Value::Point(position) => {
            offset_position(position, offset)?;
            stats.positions += 1;
        }
        Value::MultiPoint(line) | Value::LineString(line) => {
            offset_line(line, offset, stats)?;
        }
        Value::Polygon(rings) | Value::MultiLineString(rings) => {
            offset_rings(rings, offset, stats)?;
        }
        Value::MultiPolygon(polygons) => {
            for polygon in polygons.iter_mut() {
                offset_rings(polygon, offset, stats)?;
            }
        }
        Value::GeometryCollection(members) => {
            for member in members.iter_mut() {
                offset_geometry_inner(member, offset, stats)?;
            }
        }
    }

    Ok(())
}

/// Shift a geometry at the depth its type dictates
pub fn offset_geometry(geometry: &mut Geometry, offset: &Offset) -> Result<OffsetStats> {
    let mut stats = OffsetStats::default();
    offset_geometry_inner(geometry, offset, &mut stats)?;
    Ok(stats)
}

fn offset_feature(feature: &mut Feature, offset: &Offset, stats: &mut OffsetStats) -> Result<()> {
    stats.features += 1;

    if let Some(bbox) = feature.bbox.as_mut() {
        offset_bbox(bbox, offset)?;
    }

    match feature.geometry.as_mut() {
        Some(geometry) => offset_geometry_inner(geometry, offset, stats),
        None => {
            stats.empty_features += 1;
            Ok(())
        }
    }
}

/// Shift every geometry of a FeatureCollection, Feature or bare Geometry
pub fn offset_geojson(document: &mut GeoJson, offset: &Offset) -> Result<OffsetStats> {
    let mut stats = OffsetStats::default();

    match document {
        GeoJson::FeatureCollection(collection) => {
            if let Some(bbox) = collection.bbox.as_mut() {
                offset_bbox(bbox, offset)?;
            }
            for feature in collection.features.iter_mut() {
                offset_feature(feature, offset, &mut stats)?;
            }
        }
        GeoJson::Feature(feature) => offset_feature(feature, offset, &mut stats)?,
        GeoJson::Geometry(geometry) => offset_geometry_inner(geometry, offset, &mut stats)?,
    }

    debug!(
        "Offset {} positions across {} geometries ({} features, {} without geometry)",
        stats.positions, stats.geometries, stats.features, stats.empty_features
    );

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offset() -> Offset {
        Offset::new(120.0, -5.0).unwrap()
    }

    #[test]
    fn test_point_shifted_into_map_frame() {
        let mut geometry = Geometry::new(Value::Point(vec![103.8198, 1.3521]));
        let stats = offset_geometry(&mut geometry, &offset()).unwrap();

        assert_eq!(geometry.value, Value::Point(vec![223.8198, -3.6479]));
        assert_eq!(stats.positions, 1);
    }

    #[test]
    fn test_altitude_preserved() {
        let mut geometry = Geometry::new(Value::Point(vec![103.8198, 1.3521, 42.0]));
        offset_geometry(&mut geometry, &offset()).unwrap();
        assert_eq!(geometry.value, Value::Point(vec![223.8198, -3.6479, 42.0]));
    }

    #[test]
    fn test_short_position_rejected() {
        let mut geometry = Geometry::new(Value::Point(vec![103.8198]));
        let err = offset_geometry(&mut geometry, &offset()).unwrap_err();
        assert!(matches!(err, GeoOffsetError::MalformedPosition(1)));
    }

    #[test]
    fn test_multipolygon_depth_preserved() {
        let ring = vec![
            vec![103.6, 1.2],
            vec![104.0, 1.2],
            vec![104.0, 1.5],
            vec![103.6, 1.2],
        ];
        let mut geometry = Geometry::new(Value::MultiPolygon(vec![
            vec![ring.clone()],
            vec![ring.clone(), ring],
        ]));

        let stats = offset_geometry(&mut geometry, &offset()).unwrap();
        assert_eq!(stats.positions, 12);

        match &geometry.value {
            Value::MultiPolygon(polygons) => {
                assert_eq!(polygons.len(), 2);
                assert_eq!(polygons[0].len(), 1);
                assert_eq!(polygons[1].len(), 2);
                assert_eq!(polygons[1][1][2], vec![224.0, -3.5]);
            }
            other => panic!("Expected MultiPolygon, got {:?}", other),
        }
    }

    #[test]
    fn test_geometry_collection_recurses() {
        let mut geometry = Geometry::new(Value::GeometryCollection(vec![
            Geometry::new(Value::Point(vec![1.0, 1.0])),
            Geometry::new(Value::LineString(vec![vec![0.0, 0.0], vec![2.0, 2.0]])),
        ]));

        let stats = offset_geometry(&mut geometry, &offset()).unwrap();
        assert_eq!(stats.geometries, 3);
        assert_eq!(stats.positions, 3);
    }

    #[test]
    fn test_bbox_shifted() {
        let mut geometry = Geometry::new(Value::Point(vec![1.0, 1.0]));
        geometry.bbox = Some(vec![0.0, 0.0, 2.0, 2.0]);
        offset_geometry(&mut geometry, &offset()).unwrap();
        assert_eq!(geometry.bbox, Some(vec![120.0, -5.0, 122.0, -3.0]));
    }

    #[test]
    fn test_feature_without_geometry_counted() {
        let mut document = GeoJson::Feature(Feature {
            bbox: None,
            geometry: None,
            id: None,
            properties: None,
            foreign_members: None,
        });

        let stats = offset_geojson(&mut document, &offset()).unwrap();
        assert_eq!(stats.features, 1);
        assert_eq!(stats.empty_features, 1);
        assert_eq!(stats.positions, 0);
    }
}

// ============================================================================
// Property-based Tests
// ============================================================================
