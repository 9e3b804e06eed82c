//! Pure-Rust transverse Mercator projection (Snyder 1987, USGS formulas).
//!
//! Projects WGS84 longitude/latitude into a planar easting/northing in metres
//! for any zone described by [`TransverseMercator`]. Presets cover the British
//! National Grid (EPSG:27700) and UTM (EPSG 326xx/327xx). No external C
//! dependencies (no libproj).
//!
//! No datum transformation is applied: input coordinates are treated as if
//! they were on the zone's ellipsoid. For the British National Grid this
//! offsets positions by up to ~100 m, which does not change the area of a
//! roof-sized polygon in any measurable way.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// Reference ellipsoid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ellipsoid {
    /// Semi-major axis in metres
    pub semi_major_axis_m: f64,
    /// Inverse flattening (1/f)
    pub inverse_flattening: f64,
}

impl Ellipsoid {
    /// WGS84 (EPSG:7030)
    pub fn wgs84() -> Self {
        Self {
            semi_major_axis_m: 6_378_137.0,
            inverse_flattening: 298.257_223_563,
        }
    }

    /// Airy 1830 (EPSG:7001), used by OSGB36
    pub fn airy_1830() -> Self {
        Self {
            semi_major_axis_m: 6_377_563.396,
            inverse_flattening: 299.324_964_6,
        }
    }

    /// First eccentricity squared
    pub fn e2(&self) -> f64 {
        let f = 1.0 / self.inverse_flattening;
        2.0 * f - f * f
    }

    /// Second eccentricity squared
    pub fn e_prime2(&self) -> f64 {
        let e2 = self.e2();
        e2 / (1.0 - e2)
    }

    /// Meridional arc from the equator to latitude `lat` (radians).
    /// Snyder eq. 3-21.
    fn meridional_arc(&self, lat: f64) -> f64 {
        let e2 = self.e2();
        let e4 = e2 * e2;
        let e6 = e4 * e2;

        self.semi_major_axis_m
            * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * lat
                - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * lat).sin()
                + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * lat).sin()
                - (35.0 * e6 / 3072.0) * (6.0 * lat).sin())
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Self::wgs84()
    }
}

/// Transverse Mercator zone parameters.
///
/// This is the projection-zone configuration used for area measurement. It
/// is supplied by configuration rather than chosen per call so that a survey
/// region is always measured in one consistent planar system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransverseMercator {
    /// EPSG code of the projected system, if it has one
    pub epsg: Option<u32>,
    pub ellipsoid: Ellipsoid,
    /// Longitude of the central meridian in degrees
    pub central_meridian_deg: f64,
    /// Latitude of the natural origin in degrees
    pub latitude_of_origin_deg: f64,
    /// Scale factor on the central meridian
    pub scale_factor: f64,
    pub false_easting_m: f64,
    pub false_northing_m: f64,
}

impl TransverseMercator {
    /// OSGB36 / British National Grid (EPSG:27700)
    pub fn british_national_grid() -> Self {
        Self {
            epsg: Some(27700),
            ellipsoid: Ellipsoid::airy_1830(),
            central_meridian_deg: -2.0,
            latitude_of_origin_deg: 49.0,
            scale_factor: 0.999_601_271_7,
            false_easting_m: 400_000.0,
            false_northing_m: -100_000.0,
        }
    }

    /// WGS84 / UTM zone `zone` in the given hemisphere
    pub fn utm(zone: u32, north: bool) -> Self {
        Self {
            epsg: Some(if north { 32600 + zone } else { 32700 + zone }),
            ellipsoid: Ellipsoid::wgs84(),
            central_meridian_deg: (zone as f64 - 1.0) * 6.0 - 180.0 + 3.0,
            latitude_of_origin_deg: 0.0,
            scale_factor: 0.9996,
            false_easting_m: 500_000.0,
            false_northing_m: if north { 0.0 } else { 10_000_000.0 },
        }
    }

    /// Resolve a supported EPSG code (27700, 326xx, 327xx)
    pub fn from_epsg(code: u32) -> Result<Self> {
        if code == 27700 {
            return Ok(Self::british_national_grid());
        }
        match parse_utm_epsg(code) {
            Some((zone, north)) => Ok(Self::utm(zone, north)),
            None => Err(Error::config(
                "projection.epsg",
                code,
                "only EPSG:27700 and UTM (326xx/327xx) are supported",
            )),
        }
    }

    /// `EPSG:<code>` when the zone has one, otherwise its defining parameters
    pub fn identifier(&self) -> String {
        match self.epsg {
            Some(code) => format!("EPSG:{}", code),
            None => format!(
                "TM(lon0={}, lat0={}, k0={})",
                self.central_meridian_deg, self.latitude_of_origin_deg, self.scale_factor
            ),
        }
    }

    /// Check that every parameter is usable for projection
    pub fn validate(&self) -> Result<()> {
        let e = &self.ellipsoid;
        if !(e.semi_major_axis_m.is_finite() && e.semi_major_axis_m > 0.0) {
            return Err(Error::config(
                "projection.ellipsoid.semi_major_axis_m",
                e.semi_major_axis_m,
                "must be a positive number",
            ));
        }
        if !(e.inverse_flattening.is_finite() && e.inverse_flattening > 1.0) {
            return Err(Error::config(
                "projection.ellipsoid.inverse_flattening",
                e.inverse_flattening,
                "must be greater than 1",
            ));
        }
        if !(self.central_meridian_deg.is_finite() && self.central_meridian_deg.abs() <= 180.0) {
            return Err(Error::config(
                "projection.central_meridian_deg",
                self.central_meridian_deg,
                "must be within [-180, 180]",
            ));
        }
        if !(self.latitude_of_origin_deg.is_finite() && self.latitude_of_origin_deg.abs() <= 90.0) {
            return Err(Error::config(
                "projection.latitude_of_origin_deg",
                self.latitude_of_origin_deg,
                "must be within [-90, 90]",
            ));
        }
        if !(self.scale_factor.is_finite() && self.scale_factor > 0.0) {
            return Err(Error::config(
                "projection.scale_factor",
                self.scale_factor,
                "must be a positive number",
            ));
        }
        if !(self.false_easting_m.is_finite() && self.false_northing_m.is_finite()) {
            return Err(Error::config(
                "projection.false_origin",
                format!("({}, {})", self.false_easting_m, self.false_northing_m),
                "must be finite",
            ));
        }
        Ok(())
    }

    /// Convert (longitude, latitude) in degrees to (easting, northing) in metres.
    ///
    /// Snyder 1987, USGS Prof. Paper 1395, pp. 61-64 (eqs. 8-9, 8-10).
    pub fn project(&self, lon_deg: f64, lat_deg: f64) -> (f64, f64) {
        let lat = lat_deg.to_radians();
        let lon = lon_deg.to_radians();
        let lon0 = self.central_meridian_deg.to_radians();
        let lat0 = self.latitude_of_origin_deg.to_radians();

        let a = self.ellipsoid.semi_major_axis_m;
        let e2 = self.ellipsoid.e2();
        let e_prime2 = self.ellipsoid.e_prime2();
        let k0 = self.scale_factor;

        let sin_lat = lat.sin();
        let cos_lat = lat.cos();
        let tan_lat = lat.tan();

        let n = a / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        let t = tan_lat * tan_lat;
        let c = e_prime2 * cos_lat * cos_lat;
        let a_coeff = cos_lat * (lon - lon0);

        let m = self.ellipsoid.meridional_arc(lat);
        let m0 = self.ellipsoid.meridional_arc(lat0);

        let a2 = a_coeff * a_coeff;
        let a4 = a2 * a2;
        let a6 = a4 * a2;

        let easting = k0
            * n
            * (a_coeff
                + (1.0 - t + c) * a2 * a_coeff / 6.0
                + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * e_prime2) * a4 * a_coeff / 120.0)
            + self.false_easting_m;

        let northing = k0
            * (m - m0
                + n * tan_lat
                    * (a2 / 2.0
                        + (5.0 - t + 9.0 * c + 4.0 * c * c) * a4 / 24.0
                        + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * e_prime2) * a6 / 720.0))
            + self.false_northing_m;

        (easting, northing)
    }
}

impl fmt::Display for TransverseMercator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

impl Default for TransverseMercator {
    fn default() -> Self {
        Self::british_national_grid()
    }
}

/// Parse an EPSG code into UTM zone info: `Some((zone, is_north))`.
///
/// - EPSG 326xx → zone xx, North hemisphere
/// - EPSG 327xx → zone xx, South hemisphere
pub fn parse_utm_epsg(epsg: u32) -> Option<(u32, bool)> {
    if (32601..=32660).contains(&epsg) {
        Some((epsg - 32600, true))
    } else if (32701..=32760).contains(&epsg) {
        Some((epsg - 32700, false))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn parse_utm_codes() {
        assert_eq!(parse_utm_epsg(32630), Some((30, true)));
        assert_eq!(parse_utm_epsg(32760), Some((60, false)));
        assert_eq!(parse_utm_epsg(32600), None);
        assert_eq!(parse_utm_epsg(27700), None);
    }

    // Reference values from pyproj (PROJ 9.x):
    //   Transformer.from_crs(4326, 32630, always_xy=True).transform(-3.7037, 40.4168)
    //   → (440298.94, 4474257.31)
    #[test]
    fn madrid_to_utm30n() {
        let (e, n) = TransverseMercator::utm(30, true).project(-3.7037, 40.4168);
        assert_abs_diff_eq!(e, 440_298.94, epsilon = 1.0);
        assert_abs_diff_eq!(n, 4_474_257.31, epsilon = 1.0);
    }

    //   Transformer.from_crs(4326, 32721, always_xy=True).transform(-58.3816, -34.6037)
    //   → (373317.50, 6170036.17)
    #[test]
    fn buenos_aires_to_utm21s() {
        let (e, n) = TransverseMercator::utm(21, false).project(-58.3816, -34.6037);
        assert_abs_diff_eq!(e, 373_317.50, epsilon = 1.0);
        assert_abs_diff_eq!(n, 6_170_036.17, epsilon = 1.0);
    }

    #[test]
    fn national_grid_true_origin() {
        let (e, n) = TransverseMercator::british_national_grid().project(-2.0, 49.0);
        assert_abs_diff_eq!(e, 400_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(n, -100_000.0, epsilon = 1e-6);
    }

    #[test]
    fn national_grid_london_without_datum_shift() {
        // Without the OSGB36 datum shift the result lands within ~150 m of
        // the published grid reference (530034, 180381).
        let (e, n) = TransverseMercator::british_national_grid().project(-0.1276, 51.5072);
        assert_abs_diff_eq!(e, 530_034.0, epsilon = 150.0);
        assert_abs_diff_eq!(n, 180_381.0, epsilon = 150.0);
    }

    #[test]
    fn identifier_names_the_zone() {
        assert_eq!(TransverseMercator::british_national_grid().to_string(), "EPSG:27700");
        assert_eq!(TransverseMercator::utm(21, false).identifier(), "EPSG:32721");
        let custom = TransverseMercator {
            epsg: None,
            central_meridian_deg: 0.5,
            latitude_of_origin_deg: 0.0,
            scale_factor: 0.9996,
            ..TransverseMercator::default()
        };
        assert_eq!(custom.identifier(), "TM(lon0=0.5, lat0=0, k0=0.9996)");
    }

    #[test]
    fn from_epsg_resolves_presets() {
        assert_eq!(
            TransverseMercator::from_epsg(27700).unwrap(),
            TransverseMercator::british_national_grid()
        );
        assert_eq!(TransverseMercator::from_epsg(32631).unwrap().central_meridian_deg, 3.0);
        assert!(TransverseMercator::from_epsg(3857).is_err());
    }

    #[test]
    fn validate_rejects_bad_scale() {
        let mut tm = TransverseMercator::default();
        assert!(tm.validate().is_ok());
        tm.scale_factor = 0.0;
        assert!(matches!(
            tm.validate(),
            Err(Error::InvalidConfiguration { name: "projection.scale_factor", .. })
        ));
    }

    #[test]
    fn validate_rejects_out_of_range_meridian() {
        let tm = TransverseMercator {
            central_meridian_deg: 200.0,
            ..TransverseMercator::default()
        };
        assert!(tm.validate().is_err());
    }

    #[test]
    fn deserialize_partial_uses_defaults() {
        let tm: TransverseMercator =
            serde_json::from_str(r#"{ "central_meridian_deg": 3.0 }"#).unwrap();
        assert_eq!(tm.central_meridian_deg, 3.0);
        assert_eq!(tm.false_easting_m, 400_000.0);
    }
}
