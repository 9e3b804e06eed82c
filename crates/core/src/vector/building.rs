//! Building context for a group of analysed arrays

use serde::{Deserialize, Serialize};

use super::{Location, SolarArrayAnalysis};

/// A surveyed building and the arrays found on it.
///
/// `location` is frequently unresolved: the building footprint is not part of
/// the survey, so it stays `None` unless the caller supplies one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub address: String,
    pub solar_arrays: Vec<SolarArrayAnalysis>,
    pub location: Option<Location>,
}

impl Building {
    pub fn new(address: impl Into<String>, solar_arrays: Vec<SolarArrayAnalysis>) -> Self {
        Self {
            address: address.into(),
            solar_arrays,
            location: None,
        }
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// The explicit location, or else the mean of the array locations.
    ///
    /// `None` when the building has neither.
    pub fn estimated_location(&self) -> Option<Location> {
        self.location.or_else(|| {
            Location::mean_of(self.solar_arrays.iter().map(|a| {
                let loc = a.location();
                (loc.latitude, loc.longitude)
            }))
        })
    }

    pub fn total_area_m2(&self) -> f64 {
        self.solar_arrays.iter().map(SolarArrayAnalysis::area_m2).sum()
    }

    pub fn total_savings_gbp(&self) -> f64 {
        self.solar_arrays.iter().map(SolarArrayAnalysis::savings_gbp).sum()
    }
}
