//! Vector value types for surveyed solar arrays
//!
//! Corners and polygons validate themselves on construction so that geometry
//! code never sees out-of-range coordinates or rings with fewer than three
//! distinct corners.

mod building;

pub use building::Building;

use geo_types::{Coord, LineString, Polygon};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A polygon corner in WGS84 degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCorner")]
pub struct Corner {
    latitude: f64,
    longitude: f64,
}

/// Unchecked wire form of [`Corner`]
#[derive(Deserialize)]
struct RawCorner {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCorner> for Corner {
    type Error = Error;

    fn try_from(raw: RawCorner) -> Result<Self> {
        Corner::new(raw.latitude, raw.longitude)
    }
}

impl Corner {
    /// Create a corner, rejecting NaN and out-of-range values
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(Error::MalformedCoordinate {
                token: format!("{},{}", longitude, latitude),
                reason: format!("latitude {} outside [-90, 90]", latitude),
            });
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(Error::MalformedCoordinate {
                token: format!("{},{}", longitude, latitude),
                reason: format!("longitude {} outside [-180, 180]", longitude),
            });
        }
        Ok(Self { latitude, longitude })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Coordinate in (x = longitude, y = latitude) order
    pub fn to_coord(&self) -> Coord<f64> {
        Coord {
            x: self.longitude,
            y: self.latitude,
        }
    }
}

/// Ordered ring of corners describing one solar array.
///
/// By survey convention the edge from corner 0 to corner 1 runs along the
/// panel rows; orientation is derived from that edge, area from the full ring.
/// The ring is implicitly closed. A repeated closing corner is tolerated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Corner>", into = "Vec<Corner>")]
pub struct SolarArrayPolygon {
    corners: Vec<Corner>,
}

impl SolarArrayPolygon {
    /// Minimum number of corners in a usable ring
    pub const MIN_CORNERS: usize = 3;

    pub fn new(corners: Vec<Corner>) -> Result<Self> {
        if corners.len() < Self::MIN_CORNERS {
            return Err(Error::InsufficientCorners {
                found: corners.len(),
            });
        }

        let mut distinct: Vec<Corner> = Vec::with_capacity(corners.len());
        for c in &corners {
            if !distinct.contains(c) {
                distinct.push(*c);
            }
        }
        if distinct.len() < Self::MIN_CORNERS {
            return Err(Error::DegenerateGeometry(format!(
                "only {} distinct corners in a ring of {}",
                distinct.len(),
                corners.len()
            )));
        }

        Ok(Self { corners })
    }

    pub fn corners(&self) -> &[Corner] {
        &self.corners
    }

    pub fn len(&self) -> usize {
        self.corners.len()
    }

    /// Never true for a constructed polygon
    pub fn is_empty(&self) -> bool {
        self.corners.is_empty()
    }

    /// The orientation-defining edge (corner 0 → corner 1)
    pub fn first_edge(&self) -> (Corner, Corner) {
        (self.corners[0], self.corners[1])
    }

    /// Whether the last corner repeats the first
    pub fn is_closed(&self) -> bool {
        self.corners.first() == self.corners.last()
    }

    /// Polygon in (longitude, latitude) degrees
    pub fn to_geo(&self) -> Polygon<f64> {
        let coords: Vec<Coord<f64>> = self.corners.iter().map(Corner::to_coord).collect();
        Polygon::new(LineString::from(coords), vec![])
    }
}

impl TryFrom<Vec<Corner>> for SolarArrayPolygon {
    type Error = Error;

    fn try_from(corners: Vec<Corner>) -> Result<Self> {
        Self::new(corners)
    }
}

impl From<SolarArrayPolygon> for Vec<Corner> {
    fn from(polygon: SolarArrayPolygon) -> Self {
        polygon.corners
    }
}

/// A derived point, e.g. a polygon centroid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    /// Flat arithmetic mean of the given points, `None` if there are none
    pub fn mean_of<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut lat_sum = 0.0;
        let mut lon_sum = 0.0;
        let mut count = 0usize;
        for (lat, lon) in points {
            lat_sum += lat;
            lon_sum += lon;
            count += 1;
        }
        if count == 0 {
            return None;
        }
        Some(Self {
            latitude: lat_sum / count as f64,
            longitude: lon_sum / count as f64,
        })
    }
}

/// Result record for one analysed solar array. Write-once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarArrayAnalysis {
    location: Location,
    azimuth_degs: f64,
    area_m2: f64,
    savings_gbp: f64,
}

impl SolarArrayAnalysis {
    pub fn new(location: Location, azimuth_degs: f64, area_m2: f64, savings_gbp: f64) -> Self {
        Self {
            location,
            azimuth_degs,
            area_m2,
            savings_gbp,
        }
    }

    pub fn location(&self) -> Location {
        self.location
    }

    /// Facing direction in degrees clockwise from north, [0, 360)
    pub fn azimuth_degs(&self) -> f64 {
        self.azimuth_degs
    }

    pub fn area_m2(&self) -> f64 {
        self.area_m2
    }

    pub fn savings_gbp(&self) -> f64 {
        self.savings_gbp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corner(lat: f64, lon: f64) -> Corner {
        Corner::new(lat, lon).unwrap()
    }

    fn square() -> Vec<Corner> {
        vec![corner(0.0, 0.0), corner(0.0, 1.0), corner(1.0, 1.0), corner(1.0, 0.0)]
    }

    #[test]
    fn test_corner_range() {
        assert!(Corner::new(90.0, 180.0).is_ok());
        assert!(Corner::new(-90.0, -180.0).is_ok());
        assert!(matches!(
            Corner::new(90.5, 0.0),
            Err(Error::MalformedCoordinate { .. })
        ));
        assert!(Corner::new(0.0, -180.1).is_err());
        assert!(Corner::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_polygon_requires_three_corners() {
        let err = SolarArrayPolygon::new(square()[..2].to_vec()).unwrap_err();
        assert!(matches!(err, Error::InsufficientCorners { found: 2 }));
    }

    #[test]
    fn test_polygon_requires_distinct_corners() {
        let c = corner(51.5, -0.1);
        let d = corner(51.5, -0.2);
        let err = SolarArrayPolygon::new(vec![c, d, c, d]).unwrap_err();
        assert!(matches!(err, Error::DegenerateGeometry(_)));
    }

    #[test]
    fn test_polygon_preserves_order() {
        let corners = square();
        let polygon = SolarArrayPolygon::new(corners.clone()).unwrap();
        assert_eq!(polygon.corners(), corners.as_slice());
        assert_eq!(polygon.first_edge(), (corners[0], corners[1]));
        assert!(!polygon.is_closed());
    }

    #[test]
    fn test_closed_ring_detected() {
        let mut corners = square();
        corners.push(corners[0]);
        let polygon = SolarArrayPolygon::new(corners).unwrap();
        assert!(polygon.is_closed());
        assert_eq!(polygon.len(), 5);
    }

    #[test]
    fn test_to_geo_uses_lon_lat_order() {
        let polygon = SolarArrayPolygon::new(vec![
            corner(10.0, 20.0),
            corner(10.0, 21.0),
            corner(11.0, 21.0),
        ])
        .unwrap();
        let geo = polygon.to_geo();
        let first = geo.exterior().0[0];
        assert_eq!((first.x, first.y), (20.0, 10.0));
        // Ring is closed for geo's length and area
        assert!(geo.exterior().is_closed());
        assert_eq!(geo.exterior().0.len(), 4);
    }

    #[test]
    fn test_polygon_deserialize_validates() {
        let json = r#"[{"latitude":0.0,"longitude":0.0},{"latitude":0.0,"longitude":1.0}]"#;
        assert!(serde_json::from_str::<SolarArrayPolygon>(json).is_err());
    }

    #[test]
    fn test_corner_deserialize_validates_range() {
        let ok: Corner = serde_json::from_str(r#"{"latitude":51.5,"longitude":-0.1}"#).unwrap();
        assert_eq!(ok, corner(51.5, -0.1));

        let err =
            serde_json::from_str::<Corner>(r#"{"latitude":500.0,"longitude":-999.0}"#).unwrap_err();
        assert!(err.to_string().contains("latitude 500"), "{err}");
    }

    #[test]
    fn test_polygon_deserialize_rejects_out_of_range_corner() {
        let json = r#"[
            {"latitude":500.0,"longitude":0.0},
            {"latitude":0.0,"longitude":1.0},
            {"latitude":1.0,"longitude":1.0}
        ]"#;
        assert!(serde_json::from_str::<SolarArrayPolygon>(json).is_err());
    }

    #[test]
    fn test_mean_of_empty() {
        assert_eq!(Location::mean_of(std::iter::empty()), None);
        let loc = Location::mean_of([(0.0, 0.0), (2.0, 4.0)]).unwrap();
        assert_eq!((loc.latitude, loc.longitude), (1.0, 2.0));
    }
}
