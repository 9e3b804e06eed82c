//! # RoofSolar Core
//!
//! Core types, projections and I/O for rooftop solar array analysis.
//!
//! This crate provides:
//! - `Corner` / `SolarArrayPolygon`: validated geographic polygons
//! - `SolarArrayAnalysis` / `Building`: write-once analysis records
//! - `TransverseMercator`: planar projection zones for area measurement
//! - Algorithm traits for consistent API
//! - I/O for survey files, configuration and results

pub mod crs;
pub mod error;
pub mod io;
pub mod vector;

pub use crs::{Ellipsoid, TransverseMercator};
pub use error::{Error, Result};
pub use vector::{Building, Corner, Location, SolarArrayAnalysis, SolarArrayPolygon};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::crs::{Ellipsoid, TransverseMercator};
    pub use crate::error::{Error, Result};
    pub use crate::vector::{Building, Corner, Location, SolarArrayAnalysis, SolarArrayPolygon};
    pub use crate::Algorithm;
}

/// Core trait for all algorithms in RoofSolar.
///
/// Algorithms are pure functions that transform input data according to parameters.
pub trait Algorithm {
    /// Input type for the algorithm
    type Input;
    /// Output type for the algorithm
    type Output;
    /// Parameters controlling algorithm behavior
    type Params: Default;
    /// Error type for algorithm execution
    type Error: std::error::Error;

    /// Returns the algorithm name
    fn name(&self) -> &'static str;

    /// Returns a description of what the algorithm does
    fn description(&self) -> &'static str;

    /// Execute the algorithm
    fn execute(
        &self,
        input: Self::Input,
        params: Self::Params,
    ) -> std::result::Result<Self::Output, Self::Error>;

    /// Execute with default parameters
    fn execute_default(
        &self,
        input: Self::Input,
    ) -> std::result::Result<Self::Output, Self::Error> {
        self.execute(input, Self::Params::default())
    }
}
