//! Flat centroid of a corner list

use roofsolar_core::{Corner, Location};

/// Arithmetic mean of latitude and of longitude over all corners.
///
/// This is a flat mean in degree space, not an area-weighted or great-circle
/// centroid. A repeated closing corner is counted like any other corner.
/// Returns `None` for an empty list.
pub fn centroid(corners: &[Corner]) -> Option<Location> {
    Location::mean_of(corners.iter().map(|c| (c.latitude(), c.longitude())))
}
