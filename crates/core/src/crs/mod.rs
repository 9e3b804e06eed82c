//! Coordinate reference handling
//!
//! Survey corners arrive as WGS84 longitude/latitude. Area measurement needs a
//! planar system in metres, provided by [`TransverseMercator`].

mod transverse_mercator;

pub use transverse_mercator::{parse_utm_epsg, Ellipsoid, TransverseMercator};
