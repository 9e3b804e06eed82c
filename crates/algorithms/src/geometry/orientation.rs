//! Array orientation from the first surveyed edge
//!
//! Survey convention places corner 0 → corner 1 along the panel rows. The
//! facing direction is taken perpendicular to that edge:
//!
//! 1. `bearing` = initial great-circle bearing from corner 0 to corner 1
//! 2. `normal`  = `(bearing + 90) mod 360`
//! 3. `raw`     = `180 - normal`
//! 4. `azimuth` = `raw` wrapped into [0, 360)
//!
//! Step 3 is the historical formula and on its own yields values in
//! (-180, 180]. Reported azimuths are wrapped by step 4 so that every
//! record lies in [0, 360); the unwrapped value is kept in
//! [`Orientation::raw_degs`]. No attempt is made to tell the building
//! interior from the exterior: the +90° rotation is fixed.

use roofsolar_core::{Corner, Error, Result, SolarArrayPolygon};

/// Orientation of one array and the intermediate angles it came from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    /// Initial bearing of the first edge, [0, 360)
    pub bearing_degs: f64,
    /// Edge normal, [0, 360)
    pub normal_degs: f64,
    /// `180 - normal`, unwrapped
    pub raw_degs: f64,
    /// Facing direction clockwise from north, [0, 360)
    pub azimuth_degs: f64,
}

/// Initial great-circle bearing from `from` to `to` in degrees, [0, 360).
///
/// Standard forward azimuth on a sphere.
pub fn initial_bearing(from: Corner, to: Corner) -> f64 {
    let lat1 = from.latitude().to_radians();
    let lat2 = to.latitude().to_radians();
    let d_lon = (to.longitude() - from.longitude()).to_radians();

    let x = lat2.cos() * d_lon.sin();
    let y = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();

    normalize_degrees(x.atan2(y).to_degrees())
}

/// Rotate a bearing by +90° to the edge normal, [0, 360)
pub fn edge_normal(bearing_degs: f64) -> f64 {
    (bearing_degs + 90.0) % 360.0
}

/// Historical orientation transform, not wrapped
pub fn raw_orientation(normal_degs: f64) -> f64 {
    180.0 - normal_degs
}

/// Wrap any angle into [0, 360)
pub fn normalize_degrees(degs: f64) -> f64 {
    let wrapped = degs.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Orientation of a polygon from its first edge.
///
/// # Errors
/// `DegenerateGeometry` when corners 0 and 1 coincide, which leaves the
/// bearing undefined.
pub fn orientation(polygon: &SolarArrayPolygon) -> Result<Orientation> {
    let (c0, c1) = polygon.first_edge();
    if c0 == c1 {
        return Err(Error::DegenerateGeometry(
            "first edge has zero length, orientation undefined".into(),
        ));
    }

    let bearing_degs = initial_bearing(c0, c1);
    let normal_degs = edge_normal(bearing_degs);
    let raw_degs = raw_orientation(normal_degs);

    Ok(Orientation {
        bearing_degs,
        normal_degs,
        raw_degs,
        azimuth_degs: normalize_degrees(raw_degs),
    })
}
