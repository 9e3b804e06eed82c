//! Corner extraction from raw coordinate tokens
//!
//! Tokens are `lon,lat,elevation`, separated by whitespace. Order is kept
//! exactly as surveyed since the first edge defines the array orientation.

use serde::{Deserialize, Serialize};

use roofsolar_core::{Corner, Error, Result};

/// What to do with a trailing corner that repeats the first one.
///
/// Survey documents usually close their rings explicitly. Dropping the
/// duplicate changes the centroid (the first corner would otherwise be
/// counted twice), so it is a caller decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosingCornerPolicy {
    /// Keep every corner as surveyed
    #[default]
    Keep,
    /// Drop the last corner when it equals the first
    Drop,
}

/// Parse one `lon,lat,elevation` token into a corner.
///
/// Elevation must be numeric but is discarded.
pub fn parse_coordinate_token(token: &str) -> Result<Corner> {
    let malformed = |reason: String| Error::MalformedCoordinate {
        token: token.to_string(),
        reason,
    };

    let fields: Vec<&str> = token.trim().split(',').collect();
    if fields.len() != 3 {
        return Err(malformed(format!("expected 3 fields, found {}", fields.len())));
    }

    let mut values = [0.0f64; 3];
    for (slot, field) in values.iter_mut().zip(&fields) {
        let v: f64 = field
            .trim()
            .parse()
            .map_err(|_| malformed(format!("'{}' is not a number", field)))?;
        if !v.is_finite() {
            return Err(malformed(format!("'{}' is not finite", field)));
        }
        *slot = v;
    }

    let [lon, lat, _elevation] = values;
    Corner::new(lat, lon).map_err(|e| match e {
        Error::MalformedCoordinate { reason, .. } => malformed(reason),
        other => other,
    })
}

/// Extract the ordered corners of one array.
///
/// # Errors
/// - `MalformedCoordinate` for the first token that does not parse
/// - `InsufficientCorners` when fewer than 3 corners remain after applying `policy`
pub fn extract_corners(coordinates: &str, policy: ClosingCornerPolicy) -> Result<Vec<Corner>> {
    let mut corners = coordinates
        .split_whitespace()
        .map(parse_coordinate_token)
        .collect::<Result<Vec<_>>>()?;

    if policy == ClosingCornerPolicy::Drop
        && corners.len() > 1
        && corners.first() == corners.last()
    {
        corners.pop();
    }

    if corners.len() < 3 {
        return Err(Error::InsufficientCorners {
            found: corners.len(),
        });
    }

    Ok(corners)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RING: &str = "-0.1,51.5,0 -0.09,51.5,0 -0.09,51.51,0 -0.1,51.51,0 -0.1,51.5,0";

    #[test]
    fn test_parse_token_swaps_to_lat_lon() {
        let c = parse_coordinate_token("-1.25,52.5,12.0").unwrap();
        assert_eq!(c.latitude(), 52.5);
        assert_eq!(c.longitude(), -1.25);
    }

    #[test]
    fn test_parse_token_field_count() {
        let err = parse_coordinate_token("-1.25,52.5").unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedCoordinate { ref reason, .. } if reason.contains("found 2")
        ));
        assert!(parse_coordinate_token("1,2,3,4").is_err());
    }

    #[test]
    fn test_parse_token_non_numeric() {
        let err = parse_coordinate_token("abc,52.5,0").unwrap_err();
        match err {
            Error::MalformedCoordinate { token, reason } => {
                assert_eq!(token, "abc,52.5,0");
                assert!(reason.contains("abc"));
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(parse_coordinate_token("1,2,").is_err());
        assert!(parse_coordinate_token("1,NaN,0").is_err());
    }

    #[test]
    fn test_parse_token_out_of_range() {
        let err = parse_coordinate_token("10,95,0").unwrap_err();
        assert!(matches!(err, Error::MalformedCoordinate { ref token, .. } if token == "10,95,0"));
    }

    #[test]
    fn test_extract_preserves_order_and_closure() {
        let corners = extract_corners(RING, ClosingCornerPolicy::Keep).unwrap();
        assert_eq!(corners.len(), 5);
        assert_eq!(corners[1].longitude(), -0.09);
        assert_eq!(corners[0], corners[4]);
    }

    #[test]
    fn test_extract_drops_closing_corner_on_request() {
        let corners = extract_corners(RING, ClosingCornerPolicy::Drop).unwrap();
        assert_eq!(corners.len(), 4);
        assert_eq!(corners[3].latitude(), 51.51);
    }

    #[test]
    fn test_drop_leaves_open_rings_alone() {
        let open = "-0.1,51.5,0 -0.09,51.5,0 -0.09,51.51,0";
        assert_eq!(extract_corners(open, ClosingCornerPolicy::Drop).unwrap().len(), 3);
    }

    #[test]
    fn test_extract_tolerates_extra_whitespace() {
        let text = "  -0.1,51.5,0\n\t-0.09,51.5,0   -0.09,51.51,0 ";
        assert_eq!(extract_corners(text, ClosingCornerPolicy::Keep).unwrap().len(), 3);
    }

    #[test]
    fn test_two_corners_insufficient() {
        let err =
            extract_corners("-0.1,51.5,0 -0.09,51.5,0", ClosingCornerPolicy::Keep).unwrap_err();
        assert!(matches!(err, Error::InsufficientCorners { found: 2 }));
    }

    #[test]
    fn test_closing_drop_can_leave_too_few() {
        let err = extract_corners("-0.1,51.5,0 -0.09,51.5,0 -0.1,51.5,0", ClosingCornerPolicy::Drop)
            .unwrap_err();
        assert!(matches!(err, Error::InsufficientCorners { found: 2 }));
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(
            extract_corners("   ", ClosingCornerPolicy::Keep),
            Err(Error::InsufficientCorners { found: 0 })
        ));
    }
}
