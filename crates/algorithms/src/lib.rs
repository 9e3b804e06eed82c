//! # RoofSolar Algorithms
//!
//! Analysis of surveyed rooftop solar arrays.
//!
//! ## Available Algorithm Categories
//!
//! - **corners**: coordinate token parsing into validated corners
//! - **geometry**: centroid, orientation (azimuth), projected surface area
//! - **savings**: parametric generation and savings model
//! - **pipeline**: per-array orchestration over a whole survey

pub mod corners;
pub mod geometry;
pub mod pipeline;
pub mod savings;

pub(crate) mod maybe_rayon;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::corners::{extract_corners, parse_coordinate_token, ClosingCornerPolicy};
    pub use crate::geometry::{
        analyze_geometry, centroid, initial_bearing, orientation, surface_area_m2,
        GeometrySummary, Orientation,
    };
    pub use crate::pipeline::{
        AnalysisConfig, ArrayAnalysisPipeline, ArrayFailure, BatchReport, IndexedAnalysis,
        ProcessingMode,
    };
    pub use crate::savings::{
        estimate, estimate_breakdown, SavingsBreakdown, SavingsParams, YieldRegion,
    };
    pub use roofsolar_core::io::SurveyArray;
    pub use roofsolar_core::prelude::*;
}
