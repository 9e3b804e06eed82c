//! Parametric generation and savings model
//!
//! Turns a measured footprint area into an annual saving through a fixed
//! chain of multiplicative deratings:
//!
//! ```text
//! elevated_area   = area / cos(roof_pitch)
//! peak_watts      = elevated_area × irradiance × efficiency
//! annual_kwh      = peak_watts × regional_yield / 1000
//! degraded_kwh    = annual_kwh × (1 − degradation_rate × assumed_age)
//! self_used_kwh   = degraded_kwh × battery_usage_multiplier
//! savings         = self_used_kwh × unit_rate
//! ```
//!
//! Azimuth is accepted but does not yet enter the model: there is no
//! incidence-angle derating, so a north-facing array is valued the same as a
//! south-facing one of equal area.

use serde::{Deserialize, Serialize};

use roofsolar_core::{Algorithm, Error, Result};

/// A latitude/longitude box with its own annual yield
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldRegion {
    pub name: String,
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
    /// Annual generation per installed kWp in this region
    pub kwh_per_kwp: f64,
}

impl YieldRegion {
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        latitude >= self.min_latitude
            && latitude <= self.max_latitude
            && longitude >= self.min_longitude
            && longitude <= self.max_longitude
    }
}

/// Parameters for the savings model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SavingsParams {
    /// Assumed roof pitch in degrees (default 35)
    pub roof_pitch_degs: f64,
    /// Irradiance at peak rating in W/m² (default 1000, standard test conditions)
    pub irradiance_w_per_m2: f64,
    /// Panel efficiency as a fraction (default 0.20)
    pub panel_efficiency: f64,
    /// Annual generation per installed kWp (default 900, southern England)
    pub regional_yield_kwh_per_kwp: f64,
    /// Optional per-region yields, first match wins (default empty)
    pub yield_regions: Vec<YieldRegion>,
    /// Fractional output lost per year of age (default 0.005)
    pub degradation_rate_per_year: f64,
    /// Assumed panel age in years (default 10)
    pub assumed_age_years: f64,
    /// Fraction of generation consumed on site (default 0.8)
    pub battery_usage_multiplier: f64,
    /// Price of imported electricity in GBP/kWh (default 0.245)
    pub unit_rate_gbp_per_kwh: f64,
}

impl Default for SavingsParams {
    fn default() -> Self {
        Self {
            roof_pitch_degs: 35.0,
            irradiance_w_per_m2: 1000.0,
            panel_efficiency: 0.20,
            regional_yield_kwh_per_kwp: 900.0,
            yield_regions: Vec::new(),
            degradation_rate_per_year: 0.005,
            assumed_age_years: 10.0,
            battery_usage_multiplier: 0.8,
            unit_rate_gbp_per_kwh: 0.245,
        }
    }
}

fn check(name: &'static str, value: f64, ok: bool, reason: &str) -> Result<()> {
    if value.is_finite() && ok {
        Ok(())
    } else {
        Err(Error::config(name, value, reason))
    }
}

impl SavingsParams {
    /// Reject constants that would silently corrupt every estimate
    pub fn validate(&self) -> Result<()> {
        let p = self;
        check(
            "roof_pitch_degs",
            p.roof_pitch_degs,
            (0.0..90.0).contains(&p.roof_pitch_degs),
            "must be in [0, 90)",
        )?;
        check(
            "irradiance_w_per_m2",
            p.irradiance_w_per_m2,
            p.irradiance_w_per_m2 > 0.0,
            "must be > 0",
        )?;
        check(
            "panel_efficiency",
            p.panel_efficiency,
            p.panel_efficiency > 0.0 && p.panel_efficiency <= 1.0,
            "must be in (0, 1]",
        )?;
        check(
            "regional_yield_kwh_per_kwp",
            p.regional_yield_kwh_per_kwp,
            p.regional_yield_kwh_per_kwp > 0.0,
            "must be > 0",
        )?;
        check(
            "degradation_rate_per_year",
            p.degradation_rate_per_year,
            (0.0..1.0).contains(&p.degradation_rate_per_year),
            "must be in [0, 1)",
        )?;
        check(
            "assumed_age_years",
            p.assumed_age_years,
            p.assumed_age_years >= 0.0,
            "must be >= 0",
        )?;
        let total_loss = p.degradation_rate_per_year * p.assumed_age_years;
        check(
            "degradation_rate_per_year * assumed_age_years",
            total_loss,
            total_loss <= 1.0,
            "total degradation must not exceed 1",
        )?;
        check(
            "battery_usage_multiplier",
            p.battery_usage_multiplier,
            (0.0..=1.0).contains(&p.battery_usage_multiplier),
            "must be in [0, 1]",
        )?;
        check(
            "unit_rate_gbp_per_kwh",
            p.unit_rate_gbp_per_kwh,
            p.unit_rate_gbp_per_kwh >= 0.0,
            "must be >= 0",
        )?;

        for region in &p.yield_regions {
            let bounds_ok = region.min_latitude.is_finite()
                && region.max_latitude.is_finite()
                && region.min_longitude.is_finite()
                && region.max_longitude.is_finite()
                && region.min_latitude <= region.max_latitude
                && region.min_longitude <= region.max_longitude;
            if !bounds_ok {
                return Err(Error::config("yield_regions", &region.name, "invalid bounds"));
            }
            check(
                "yield_regions.kwh_per_kwp",
                region.kwh_per_kwp,
                region.kwh_per_kwp > 0.0,
                "must be > 0",
            )?;
        }
        Ok(())
    }

    /// Annual yield for a location: first matching region, else the fixed constant
    pub fn yield_at(&self, latitude: f64, longitude: f64) -> f64 {
        self.yield_regions
            .iter()
            .find(|r| r.contains(latitude, longitude))
            .map_or(self.regional_yield_kwh_per_kwp, |r| r.kwh_per_kwp)
    }
}

/// Every intermediate quantity of one estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SavingsBreakdown {
    pub elevated_area_m2: f64,
    pub peak_generation_watts: f64,
    pub yield_kwh_per_kwp: f64,
    pub annual_generation_kwh: f64,
    pub degraded_generation_kwh: f64,
    pub self_used_generation_kwh: f64,
    pub savings_gbp: f64,
}

/// Run the model and keep every intermediate value.
///
/// Parameters are assumed validated; see [`SavingsParams::validate`].
pub fn estimate_breakdown(
    area_m2: f64,
    latitude: f64,
    longitude: f64,
    _azimuth_degs: f64,
    params: &SavingsParams,
) -> SavingsBreakdown {
    let elevated_area_m2 = area_m2 / params.roof_pitch_degs.to_radians().cos();
    let peak_generation_watts =
        elevated_area_m2 * params.irradiance_w_per_m2 * params.panel_efficiency;
    let yield_kwh_per_kwp = params.yield_at(latitude, longitude);
    let annual_generation_kwh = peak_generation_watts * yield_kwh_per_kwp / 1000.0;
    let degraded_generation_kwh = annual_generation_kwh
        * (1.0 - params.degradation_rate_per_year * params.assumed_age_years);
    let self_used_generation_kwh = degraded_generation_kwh * params.battery_usage_multiplier;
    let savings_gbp = self_used_generation_kwh * params.unit_rate_gbp_per_kwh;

    SavingsBreakdown {
        elevated_area_m2,
        peak_generation_watts,
        yield_kwh_per_kwp,
        annual_generation_kwh,
        degraded_generation_kwh,
        self_used_generation_kwh,
        savings_gbp,
    }
}

/// Annual savings in GBP for an array.
///
/// Pure: identical inputs always give bit-identical output.
pub fn estimate(
    area_m2: f64,
    latitude: f64,
    longitude: f64,
    azimuth_degs: f64,
    params: &SavingsParams,
) -> f64 {
    estimate_breakdown(area_m2, latitude, longitude, azimuth_degs, params).savings_gbp
}

/// Inputs for one savings estimate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SavingsInput {
    pub area_m2: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub azimuth_degs: f64,
}

/// Savings estimation algorithm
#[derive(Debug, Clone, Default)]
pub struct Savings;

impl Algorithm for Savings {
    type Input = SavingsInput;
    type Output = SavingsBreakdown;
    type Params = SavingsParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Savings"
    }

    fn description(&self) -> &'static str {
        "Estimate annual energy-cost savings of a solar array"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        params.validate()?;
        Ok(estimate_breakdown(
            input.area_m2,
            input.latitude,
            input.longitude,
            input.azimuth_degs,
            &params,
        ))
    }
}
