//! Reading and writing GeoJSON documents

use crate::transform::{offset_geojson, OffsetStats};
use crate::{GeoOffsetError, Offset, Result, SUPPORTED_GEOMETRIES};
use geojson::GeoJson;
use serde_json::Value as JsonValue;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

fn ensure_geometry(value: &JsonValue) -> Result<()> {
    let kind = value
        .get("type")
        .and_then(JsonValue::as_str)
        .ok_or_else(|| GeoOffsetError::UnsupportedGeometry("<missing type>".to_string()))?;

    if !SUPPORTED_GEOMETRIES.contains(&kind) {
        return Err(GeoOffsetError::UnsupportedGeometry(kind.to_string()));
    }

    if kind == "GeometryCollection" {
        if let Some(members) = value.get("geometries").and_then(JsonValue::as_array) {
            for member in members {
                ensure_geometry(member)?;
            }
        }
    }

    Ok(())
}

fn ensure_feature(value: &JsonValue) -> Result<()> {
    match value.get("geometry") {
        None | Some(JsonValue::Null) => Ok(()),
        Some(geometry) => ensure_geometry(geometry),
    }
}

/// Reject geometry types the transform cannot walk, before any work is done
pub fn ensure_supported(value: &JsonValue) -> Result<()> {
    match value.get("type").and_then(JsonValue::as_str) {
        Some("FeatureCollection") => {
            if let Some(features) = value.get("features").and_then(JsonValue::as_array) {
                for feature in features {
                    ensure_feature(feature)?;
                }
            }
            Ok(())
        }
        Some("Feature") => ensure_feature(value),
        _ => ensure_geometry(value),
    }
}

/// Parse a GeoJSON document from text
pub fn parse_document(text: &str) -> Result<GeoJson> {
    let value: JsonValue = serde_json::from_str(text)?;
    ensure_supported(&value)?;
    Ok(GeoJson::from_json_value(value)?)
}

/// Load a GeoJSON document from disk
pub fn read_document(path: impl AsRef<Path>) -> Result<GeoJson> {
    let path = path.as_ref();
    info!("Loading GeoJSON from {:?}", path);

    let text = fs::read_to_string(path)?;
    parse_document(&text)
}

/// Write a GeoJSON document, compact unless `pretty`
pub fn write_document(path: impl AsRef<Path>, document: &GeoJson, pretty: bool) -> Result<()> {
    let path = path.as_ref();
    info!("Writing GeoJSON to {:?}", path);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    if pretty {
        serde_json::to_writer_pretty(&mut writer, document)?;
    } else {
        serde_json::to_writer(&mut writer, document)?;
    }
    writer.flush()?;

    Ok(())
}

/// Read `input`, shift it by `offset`, write `output`.
///
/// Nothing is written when reading or transforming fails.
pub fn offset_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    offset: &Offset,
    pretty: bool,
) -> Result<OffsetStats> {
    let mut document = read_document(input)?;
    let stats = offset_geojson(&mut document, offset)?;
    write_document(output, &document, pretty)?;
    Ok(stats)
}
