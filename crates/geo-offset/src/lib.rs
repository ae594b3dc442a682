//! GeoJSON Coordinate Offset
//!
//! Translates every position of a GeoJSON document by a constant
//! (Δlon, Δlat). Used once at build time to move the Singapore boundary
//! into the fictional Zelonia map frame.
//!
//! # Traversal depth
//!
//! | Geometry                  | Nesting            |
//! |---------------------------|--------------------|
//! | Point                     | position           |
//! | LineString, MultiPoint    | [position]         |
//! | Polygon, MultiLineString  | [[position]]       |
//! | MultiPolygon              | [[[position]]]     |
//! | GeometryCollection        | member geometries  |
//!
//! Arithmetic runs in fixed-point nanodegrees so an offset followed by its
//! inverse restores the input bit-for-bit for any coordinate carrying at
//! most 9 decimals.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod io;
pub mod transform;

pub use io::{offset_file, read_document, write_document};
pub use transform::{offset_geojson, offset_geometry, offset_position};

/// Fixed-point scale: 10^9 nanodegrees per degree
pub const NANO: i64 = 1_000_000_000;

/// Largest magnitude accepted for a coordinate or offset, in degrees.
/// Keeps `deg * NANO` inside the exactly-representable f64 integer range.
pub const MAX_ABS_DEGREES: f64 = 1_000_000.0;

/// Default Δlon/Δlat: the Singapore frame to the Zelonia map frame.
/// Matches the (+5, +120) translation applied to the server markers.
pub const DEFAULT_D_LON: f64 = 120.0;
pub const DEFAULT_D_LAT: f64 = 5.0;

/// Geometry type names the transform knows how to walk
pub const SUPPORTED_GEOMETRIES: [&str; 7] = [
    "Point",
    "MultiPoint",
    "LineString",
    "MultiLineString",
    "Polygon",
    "MultiPolygon",
    "GeometryCollection",
];

#[derive(Error, Debug)]
pub enum GeoOffsetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("GeoJSON error: {0}")]
    Parse(#[from] geojson::Error),
    #[error("Unsupported geometry type: {0}")]
    UnsupportedGeometry(String),
    #[error("Malformed position: expected at least 2 elements, found {0}")]
    MalformedPosition(usize),
    #[error("Coordinate out of range: {0}")]
    OutOfRange(f64),
}

pub type Result<T> = std::result::Result<T, GeoOffsetError>;

/// Angle in nanodegrees
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Nanodeg(pub i64);

impl Nanodeg {
    pub const ZERO: Nanodeg = Nanodeg(0);

    pub fn from_degrees(deg: f64) -> Result<Self> {
        if !deg.is_finite() || deg.abs() > MAX_ABS_DEGREES {
            return Err(GeoOffsetError::OutOfRange(deg));
        }
        Ok(Nanodeg((deg * NANO as f64).round() as i64))
    }

    /// Nearest f64 to the exact decimal value
    pub fn to_degrees(self) -> f64 {
        self.0 as f64 / NANO as f64
    }

    pub fn checked_add(self, other: Nanodeg) -> Option<Nanodeg> {
        self.0.checked_add(other.0).map(Nanodeg)
    }
}

impl std::ops::Neg for Nanodeg {
    type Output = Nanodeg;

    fn neg(self) -> Nanodeg {
        Nanodeg(-self.0)
    }
}

/// Constant translation applied to every position.
///
/// Both components are added: a negative `d_lat` moves positions south.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offset {
    pub d_lon: Nanodeg,
    pub d_lat: Nanodeg,
}

impl Offset {
    pub fn new(d_lon: f64, d_lat: f64) -> Result<Self> {
        Ok(Self {
            d_lon: Nanodeg::from_degrees(d_lon)?,
            d_lat: Nanodeg::from_degrees(d_lat)?,
        })
    }

    pub fn inverse(self) -> Self {
        Self {
            d_lon: -self.d_lon,
            d_lat: -self.d_lat,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.d_lon == Nanodeg::ZERO && self.d_lat == Nanodeg::ZERO
    }

    /// Shift a single (lon, lat) pair
    pub fn apply(&self, lon: f64, lat: f64) -> Result<(f64, f64)> {
        let lon = shift(lon, self.d_lon)?;
        let lat = shift(lat, self.d_lat)?;
        Ok((lon, lat))
    }
}

fn shift(value: f64, delta: Nanodeg) -> Result<f64> {
    Nanodeg::from_degrees(value)?
        .checked_add(delta)
        .map(Nanodeg::to_degrees)
        .ok_or(GeoOffsetError::OutOfRange(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nanodeg_exact_for_nine_decimals() {
        let n = Nanodeg::from_degrees(103.8198).unwrap();
        assert_eq!(n, Nanodeg(103_819_800_000));
        assert_eq!(n.to_degrees(), 103.8198);
    }

    #[test]
    fn test_offset_applies_signed_deltas() {
        let offset = Offset::new(120.0, -5.0).unwrap();
        let (lon, lat) = offset.apply(103.8198, 1.3521).unwrap();
        assert_eq!(lon, 223.8198);
        assert_eq!(lat, -3.6479);
    }

    #[test]
    fn test_inverse_restores() {
        let offset = Offset::new(120.0, -5.0).unwrap();
        let (lon, lat) = offset.apply(103.8198, 1.3521).unwrap();
        let (lon, lat) = offset.inverse().apply(lon, lat).unwrap();
        assert_eq!((lon, lat), (103.8198, 1.3521));
    }

    #[test]
    fn test_rejects_non_finite() {
        assert!(matches!(
            Nanodeg::from_degrees(f64::NAN),
            Err(GeoOffsetError::OutOfRange(_))
        ));
        assert!(Offset::new(f64::INFINITY, 0.0).is_err());
        assert!(Offset::new(0.0, 2.0e6).is_err());
    }

    #[test]
    fn test_identity() {
        assert!(Offset::new(0.0, 0.0).unwrap().is_identity());
        assert!(!Offset::new(0.0, 1e-9).unwrap().is_identity());
    }
}
