//! Per-array analysis over a whole survey
//!
//! Each array goes through corner extraction, geometry and savings on its
//! own. Arrays share nothing, so a batch can be mapped in parallel; results
//! are always returned in survey order. A failure in one array is logged and
//! recorded, never propagated: only configuration errors stop a run, and
//! those surface from [`ArrayAnalysisPipeline::new`] before any array is read.

use serde::{Deserialize, Serialize, Serializer};
use tracing::{debug, info, warn};

use roofsolar_core::io::SurveyArray;
use roofsolar_core::{
    Building, Error, Result, SolarArrayAnalysis, SolarArrayPolygon, TransverseMercator,
};

use crate::corners::{extract_corners, ClosingCornerPolicy};
use crate::geometry::analyze_geometry;
use crate::maybe_rayon::*;
use crate::savings::{estimate, SavingsParams};

/// Processing mode for a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessingMode {
    /// Single-threaded processing
    Sequential,
    /// Parallel processing using all available cores
    #[default]
    Parallel,
    /// Parallel with specified number of threads
    ParallelWith(usize),
}

/// Everything the pipeline needs to know about the survey region
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Planar zone used for area measurement
    pub projection: TransverseMercator,
    /// Physical and financial constants
    pub savings: SavingsParams,
    /// Handling of a repeated closing corner
    pub closing_corner: ClosingCornerPolicy,
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<()> {
        self.projection.validate()?;
        self.savings.validate()
    }
}

/// A successful analysis tagged with its position in the survey
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexedAnalysis {
    /// 0-based position in the survey, stable across runs
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(flatten)]
    pub analysis: SolarArrayAnalysis,
}

impl IndexedAnalysis {
    /// File stem for artifacts derived from this array, e.g. `3_187.5`
    pub fn artifact_stem(&self) -> String {
        format!("{}_{:.1}", self.index, self.analysis.azimuth_degs())
    }
}

/// An array that was skipped, with the reason
#[derive(Debug, Serialize)]
pub struct ArrayFailure {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(serialize_with = "serialize_error")]
    pub error: Error,
}

fn serialize_error<S: Serializer>(
    error: &Error,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// Outcome of a batch. Both lists are in survey order.
#[derive(Debug, Default, Serialize)]
pub struct BatchReport {
    pub analyses: Vec<IndexedAnalysis>,
    pub failures: Vec<ArrayFailure>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.analyses.len()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn total_savings_gbp(&self) -> f64 {
        self.analyses.iter().map(|a| a.analysis.savings_gbp()).sum()
    }

    pub fn total_area_m2(&self) -> f64 {
        self.analyses.iter().map(|a| a.analysis.area_m2()).sum()
    }
}

/// Orchestrates extraction, geometry and savings for each array
#[derive(Debug, Clone)]
pub struct ArrayAnalysisPipeline {
    config: AnalysisConfig,
}

impl ArrayAnalysisPipeline {
    /// Build a pipeline, failing fast on an invalid configuration
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyse an already validated polygon
    pub fn analyze_polygon(&self, polygon: &SolarArrayPolygon) -> Result<SolarArrayAnalysis> {
        let geometry = analyze_geometry(polygon, &self.config.projection)?;
        let azimuth = geometry.orientation.azimuth_degs;
        let savings = estimate(
            geometry.area_m2,
            geometry.location.latitude,
            geometry.location.longitude,
            azimuth,
            &self.config.savings,
        );

        Ok(SolarArrayAnalysis::new(geometry.location, azimuth, geometry.area_m2, savings))
    }

    /// Analyse one raw survey array
    pub fn analyze_one(&self, index: usize, array: &SurveyArray) -> Result<IndexedAnalysis> {
        let corners = extract_corners(&array.coordinates, self.config.closing_corner)?;
        let polygon = SolarArrayPolygon::new(corners)?;
        let analysis = self.analyze_polygon(&polygon)?;

        debug!(
            array = index,
            azimuth = analysis.azimuth_degs(),
            area_m2 = analysis.area_m2(),
            savings_gbp = analysis.savings_gbp(),
            "analysed array"
        );

        Ok(IndexedAnalysis {
            index,
            label: array.label.clone(),
            analysis,
        })
    }

    /// Analyse every array in a survey. Never fails as a whole.
    pub fn run(&self, arrays: &[SurveyArray], mode: ProcessingMode) -> BatchReport {
        let results = map_indices(mode, arrays.len(), |i| self.analyze_one(i, &arrays[i]));
        let report = collect_report(results, |i| arrays[i].label.clone());
        info!(
            arrays = arrays.len(),
            succeeded = report.succeeded(),
            failed = report.failed(),
            "survey analysed"
        );
        report
    }

    /// Analyse polygons that were validated elsewhere
    pub fn run_polygons(
        &self,
        polygons: &[SolarArrayPolygon],
        mode: ProcessingMode,
    ) -> BatchReport {
        let results = map_indices(mode, polygons.len(), |i| {
            self.analyze_polygon(&polygons[i]).map(|analysis| IndexedAnalysis {
                index: i,
                label: None,
                analysis,
            })
        });
        collect_report(results, |_| None)
    }
}

/// Group a building's arrays. The building location stays unresolved.
pub fn assemble_building(address: impl Into<String>, report: &BatchReport) -> Building {
    Building::new(
        address,
        report.analyses.iter().map(|a| a.analysis.clone()).collect(),
    )
}

fn collect_report<L>(results: Vec<Result<IndexedAnalysis>>, label_of: L) -> BatchReport
where
    L: Fn(usize) -> Option<String>,
{
    let mut report = BatchReport::default();
    for (index, result) in results.into_iter().enumerate() {
        match result {
            Ok(analysis) => report.analyses.push(analysis),
            Err(error) => {
                let label = label_of(index);
                warn!(array = index, label = ?label, error = %error, "skipping array");
                report.failures.push(ArrayFailure { index, label, error });
            }
        }
    }
    report
}

/// Map `f` over `0..len` in the requested mode, preserving index order
fn map_indices<T, F>(mode: ProcessingMode, len: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    match mode {
        ProcessingMode::Sequential => (0..len).map(f).collect(),
        #[cfg(feature = "parallel")]
        ProcessingMode::ParallelWith(threads) => {
            match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
                Ok(pool) => pool.install(|| (0..len).into_par_iter().map(&f).collect()),
                Err(e) => {
                    warn!(
                        threads = threads,
                        error = %e,
                        "thread pool unavailable, running sequentially"
                    );
                    (0..len).map(f).collect()
                }
            }
        }
        _ => (0..len).into_par_iter().map(f).collect(),
    }
}
