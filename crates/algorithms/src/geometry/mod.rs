//! Geometry of a surveyed solar array
//!
//! Three independent measurements over the same ordered corner list:
//! - Centroid: flat mean of latitude and longitude
//! - Orientation: facing direction derived from the first edge
//! - Area: shoelace area of the ring after transverse Mercator projection

mod centroid;
mod measurements;
mod orientation;

pub use centroid::centroid;
pub use measurements::{
    perimeter_m, projected_ring, shoelace_area, surface_area_m2, SurfaceArea, KNOWN_AREA_BIAS,
    MIN_AREA_M2,
};
pub use orientation::{
    edge_normal, initial_bearing, normalize_degrees, orientation, raw_orientation, Orientation,
};

use roofsolar_core::{Error, Location, Result, SolarArrayPolygon, TransverseMercator};

/// All geometric measurements for one array
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometrySummary {
    pub location: Location,
    pub orientation: Orientation,
    pub area_m2: f64,
    pub perimeter_m: f64,
}

/// Measure centroid, orientation and area of one polygon.
///
/// Orientation and area are both read from `polygon` itself, so they always
/// agree on corner order.
pub fn analyze_geometry(
    polygon: &SolarArrayPolygon,
    projection: &TransverseMercator,
) -> Result<GeometrySummary> {
    let location = centroid(polygon.corners())
        .ok_or_else(|| Error::DegenerateGeometry("polygon has no corners".into()))?;
    let orientation = orientation(polygon)?;
    let area_m2 = surface_area_m2(polygon, projection)?;
    let perimeter_m = perimeter_m(polygon, projection);

    Ok(GeometrySummary {
        location,
        orientation,
        area_m2,
        perimeter_m,
    })
}
