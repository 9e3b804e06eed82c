//! Planar measurements of a surveyed polygon: area and perimeter
//!
//! Areas cannot be measured in degree units, so every corner is first
//! projected with the configured [`TransverseMercator`] zone and the
//! shoelace formula is applied to the planar ring.
//!
//! Known bias: compared with the reference map renderer used during
//! surveying, this method reads about 3% low, for both panel-sized and
//! neighbourhood-sized polygons. The cause has not been isolated, so no
//! correction is applied; see [`KNOWN_AREA_BIAS`].

use geo::{Coord, Euclidean, Length, MapCoords};
use roofsolar_core::{Algorithm, Error, Result, SolarArrayPolygon, TransverseMercator};

/// Areas below this are treated as degenerate (collinear or collapsed rings)
pub const MIN_AREA_M2: f64 = 1e-6;

/// Documented systematic under-estimate relative to the reference renderer
pub const KNOWN_AREA_BIAS: f64 = 0.03;

/// Surface area algorithm
#[derive(Debug, Clone, Default)]
pub struct SurfaceArea;

impl Algorithm for SurfaceArea {
    type Input = SolarArrayPolygon;
    type Output = f64;
    type Params = TransverseMercator;
    type Error = Error;

    fn name(&self) -> &'static str {
        "SurfaceArea"
    }

    fn description(&self) -> &'static str {
        "Projected shoelace area of a solar array polygon in square metres"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        surface_area_m2(&input, &params)
    }
}

/// Project every corner to (easting, northing) in metres, preserving order
pub fn projected_ring(
    polygon: &SolarArrayPolygon,
    projection: &TransverseMercator,
) -> Vec<(f64, f64)> {
    polygon
        .corners()
        .iter()
        .map(|c| projection.project(c.longitude(), c.latitude()))
        .collect()
}

/// Unsigned shoelace area of a planar ring.
///
/// `|Σ (x_i·y_{i+1} − x_{i+1}·y_i)| / 2` with `i + 1` wrapping to 0. Points
/// are taken relative to the first vertex, which leaves the sum unchanged
/// but avoids cancellation with large false eastings. Rings with fewer than
/// three points have zero area.
pub fn shoelace_area(points: &[(f64, f64)]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }

    let (ox, oy) = points[0];
    let mut sum = 0.0;
    for i in 0..n {
        let (x0, y0) = points[i];
        let (x1, y1) = points[(i + 1) % n];
        let (x0, y0, x1, y1) = (x0 - ox, y0 - oy, x1 - ox, y1 - oy);
        sum += x0 * y1 - x1 * y0;
    }

    sum.abs() / 2.0
}

/// Ground surface area of a polygon in square metres.
///
/// # Errors
/// `DegenerateGeometry` when the projected area is below [`MIN_AREA_M2`].
pub fn surface_area_m2(
    polygon: &SolarArrayPolygon,
    projection: &TransverseMercator,
) -> Result<f64> {
    let area = shoelace_area(&projected_ring(polygon, projection));
    if !area.is_finite() || area < MIN_AREA_M2 {
        return Err(Error::DegenerateGeometry(format!(
            "projected area {:.3e} m² is below {:.0e} m²",
            area, MIN_AREA_M2
        )));
    }
    Ok(area)
}

/// Perimeter of the projected ring in metres, closing edge included.
pub fn perimeter_m(polygon: &SolarArrayPolygon, projection: &TransverseMercator) -> f64 {
    // to_geo yields a closed exterior ring whether or not the survey closed it
    let projected = polygon.to_geo().map_coords(|c| {
        let (x, y) = projection.project(c.x, c.y);
        Coord { x, y }
    });
    projected.exterior().length::<Euclidean>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geo::{Area, LineString, Polygon};
    use roofsolar_core::{Corner, Ellipsoid};

    fn polygon(points: &[(f64, f64)]) -> SolarArrayPolygon {
        let corners = points
            .iter()
            .map(|&(lat, lon)| Corner::new(lat, lon).unwrap())
            .collect();
        SolarArrayPolygon::new(corners).unwrap()
    }

    /// Transverse Mercator centred on the 1° test square
    fn equatorial_zone() -> TransverseMercator {
        TransverseMercator {
            epsg: None,
            ellipsoid: Ellipsoid::wgs84(),
            central_meridian_deg: 0.5,
            latitude_of_origin_deg: 0.0,
            scale_factor: 0.9996,
            false_easting_m: 500_000.0,
            false_northing_m: 0.0,
        }
    }

    fn london_panel() -> Vec<(f64, f64)> {
        let lat0: f64 = 51.5;
        let lon0 = -0.12;
        let dlat = 5.0 / 111_250.0;
        let dlon = 10.0 / (111_320.0 * lat0.to_radians().cos());
        vec![(lat0, lon0), (lat0, lon0 + dlon), (lat0 + dlat, lon0 + dlon), (lat0 + dlat, lon0)]
    }

    #[test]
    fn test_shoelace_square() {
        let pts = [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)];
        assert_eq!(shoelace_area(&pts), 100.0);
    }

    #[test]
    fn test_shoelace_triangle_and_short_rings() {
        assert_eq!(shoelace_area(&[(0.0, 0.0), (10.0, 0.0), (5.0, 10.0)]), 50.0);
        assert_eq!(shoelace_area(&[(0.0, 0.0), (10.0, 0.0)]), 0.0);
        assert_eq!(shoelace_area(&[]), 0.0);
    }

    #[test]
    fn test_shoelace_matches_geo_unsigned_area() {
        let tm = TransverseMercator::british_national_grid();
        let ring = projected_ring(&polygon(&london_panel()), &tm);
        let geo_polygon = Polygon::new(LineString::from(ring.clone()), vec![]);
        assert_relative_eq!(shoelace_area(&ring), geo_polygon.unsigned_area(), max_relative = 1e-6);
    }

    #[test]
    fn test_one_degree_square_at_equator() {
        let square = polygon(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]);
        let area = surface_area_m2(&square, &equatorial_zone()).unwrap();

        // Ellipsoidal area of the 1° cell at the equator is ~12,308 km²
        let reference = 12_308_000_000.0;
        assert!(
            ((area - reference) / reference).abs() < KNOWN_AREA_BIAS,
            "area {} outside bias band",
            area
        );
        assert_relative_eq!(area, 12_298_937_451.0, max_relative = 1e-6);
    }

    #[test]
    fn test_panel_area_national_grid() {
        let tm = TransverseMercator::british_national_grid();
        let area = surface_area_m2(&polygon(&london_panel()), &tm).unwrap();
        assert_relative_eq!(area, 50.078, max_relative = 1e-3);
    }

    #[test]
    fn test_area_invariant_under_rotation_and_reversal() {
        let tm = TransverseMercator::british_national_grid();
        let pts = london_panel();
        let base = surface_area_m2(&polygon(&pts), &tm).unwrap();

        for shift in 1..pts.len() {
            let mut rotated = pts.clone();
            rotated.rotate_left(shift);
            let area = surface_area_m2(&polygon(&rotated), &tm).unwrap();
            assert_relative_eq!(area, base, max_relative = 1e-9);
        }

        let mut reversed = pts.clone();
        reversed.reverse();
        let area = surface_area_m2(&polygon(&reversed), &tm).unwrap();
        assert_relative_eq!(area, base, max_relative = 1e-9);
    }

    #[test]
    fn test_closing_corner_does_not_change_area() {
        let tm = TransverseMercator::british_national_grid();
        let mut closed = london_panel();
        closed.push(closed[0]);
        let open_area = surface_area_m2(&polygon(&london_panel()), &tm).unwrap();
        let closed_area = surface_area_m2(&polygon(&closed), &tm).unwrap();
        assert_relative_eq!(open_area, closed_area, max_relative = 1e-12);
    }

    #[test]
    fn test_collinear_is_degenerate() {
        // Points on the central meridian project onto a straight line
        let line = polygon(&[(51.5, -2.0), (51.51, -2.0), (51.52, -2.0)]);
        let err = surface_area_m2(&line, &TransverseMercator::default()).unwrap_err();
        assert!(matches!(err, Error::DegenerateGeometry(_)));
    }

    #[test]
    fn test_perimeter_open_and_closed_agree() {
        let tm = TransverseMercator::british_national_grid();
        let mut closed = london_panel();
        closed.push(closed[0]);
        let open = perimeter_m(&polygon(&london_panel()), &tm);
        assert_relative_eq!(open, perimeter_m(&polygon(&closed), &tm), max_relative = 1e-12);
        // 10 m x 5 m rectangle
        assert!((open - 30.0).abs() < 0.1, "perimeter {}", open);
    }

    #[test]
    fn test_algorithm_trait() {
        let alg = SurfaceArea;
        assert_eq!(alg.name(), "SurfaceArea");
        let area = alg.execute_default(polygon(&london_panel())).unwrap();
        assert!(area > 49.0 && area < 51.0);
    }
}
