//! RoofSolar CLI - orientation, area and savings for surveyed solar arrays

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use roofsolar_algorithms::corners::{extract_corners, ClosingCornerPolicy};
use roofsolar_algorithms::geometry::{analyze_geometry, orientation};
use roofsolar_algorithms::pipeline::{
    assemble_building, AnalysisConfig, ArrayAnalysisPipeline, BatchReport, ProcessingMode,
};
use roofsolar_algorithms::savings::estimate_breakdown;
use roofsolar_core::io::{read_config, read_survey, to_json_string, write_json};
use roofsolar_core::SolarArrayPolygon;

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "roofsolar")]
#[command(
    author,
    version,
    about = "Orientation, area and savings of rooftop solar arrays",
    long_about = None
)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse every array in a survey file
    Analyze {
        /// Survey file, one array per line
        input: PathBuf,
        /// JSON configuration (defaults when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Output JSON file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Number of worker threads (all cores when omitted)
        #[arg(short, long, conflicts_with = "sequential")]
        threads: Option<usize>,
        /// Process arrays one at a time
        #[arg(long)]
        sequential: bool,
        /// Drop a closing corner that repeats the first one
        #[arg(long)]
        drop_closing_corner: bool,
        /// Group the results under this building address
        #[arg(long)]
        address: Option<String>,
    },
    /// Orientation of one array from its coordinate tokens
    Orientation {
        /// Space separated `lon,lat,elevation` tokens
        #[arg(allow_hyphen_values = true)]
        coordinates: String,
    },
    /// Projected surface area of one array
    Area {
        /// Space separated `lon,lat,elevation` tokens
        #[arg(allow_hyphen_values = true)]
        coordinates: String,
        /// JSON configuration (defaults when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Savings breakdown for a given area
    Savings {
        /// Ground area in square metres
        #[arg(short, long)]
        area: f64,
        /// Latitude in degrees
        #[arg(long, default_value = "51.5", allow_hyphen_values = true)]
        lat: f64,
        /// Longitude in degrees
        #[arg(long, default_value = "-0.12", allow_hyphen_values = true)]
        lon: f64,
        /// Facing direction in degrees (not used by the model yet)
        #[arg(long, default_value = "180")]
        azimuth: f64,
        /// JSON configuration (defaults when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print the default configuration as JSON
    Config,
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn load_config(path: Option<&Path>) -> Result<AnalysisConfig> {
    let config = match path {
        Some(path) => {
            let config: AnalysisConfig = read_config(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            info!("Config: {}", path.display());
            config
        }
        None => AnalysisConfig::default(),
    };
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn parse_polygon(coordinates: &str, policy: ClosingCornerPolicy) -> Result<SolarArrayPolygon> {
    let corners = extract_corners(coordinates, policy).context("Failed to read coordinates")?;
    SolarArrayPolygon::new(corners).context("Invalid polygon")
}

fn processing_mode(threads: Option<usize>, sequential: bool) -> ProcessingMode {
    match (sequential, threads) {
        (true, _) => ProcessingMode::Sequential,
        (false, Some(n)) => ProcessingMode::ParallelWith(n),
        (false, None) => ProcessingMode::Parallel,
    }
}

fn print_summary(report: &BatchReport, elapsed: std::time::Duration) {
    eprintln!(
        "Analysed {} arrays: {} succeeded, {} skipped",
        report.succeeded() + report.failed(),
        report.succeeded(),
        report.failed()
    );
    for failure in &report.failures {
        let label = failure.label.as_deref().unwrap_or("-");
        eprintln!("  skipped #{} ({}): {}", failure.index, label, failure.error);
    }
    eprintln!("  Total area: {:.1} m²", report.total_area_m2());
    eprintln!("  Total savings: £{:.2} per year", report.total_savings_gbp());
    eprintln!("  Processing time: {:.2?}", elapsed);
}

fn emit<T: serde::Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            write_json(value, path).with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Results saved to: {}", path.display());
        }
        None => println!("{}", to_json_string(value)?),
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        // ── Analyze ──────────────────────────────────────────────────
        Commands::Analyze {
            input,
            config,
            output,
            threads,
            sequential,
            drop_closing_corner,
            address,
        } => {
            let mut config = load_config(config.as_deref())?;
            if drop_closing_corner {
                config.closing_corner = ClosingCornerPolicy::Drop;
            }
            let pipeline = ArrayAnalysisPipeline::new(config).context("Invalid configuration")?;

            let pb = spinner("Reading survey...");
            let arrays = read_survey(&input)
                .with_context(|| format!("Failed to read survey {}", input.display()))?;
            pb.finish_and_clear();
            info!("Survey: {} arrays", arrays.len());

            let start = Instant::now();
            let pb = spinner("Analysing arrays...");
            let report = pipeline.run(&arrays, processing_mode(threads, sequential));
            pb.finish_and_clear();
            let elapsed = start.elapsed();

            match address {
                Some(address) => emit(&assemble_building(address, &report), output.as_deref())?,
                None => emit(&report, output.as_deref())?,
            }
            print_summary(&report, elapsed);
        }

        // ── Orientation ──────────────────────────────────────────────
        Commands::Orientation { coordinates } => {
            let polygon = parse_polygon(&coordinates, ClosingCornerPolicy::Keep)?;
            let o = orientation(&polygon).context("Failed to compute orientation")?;
            println!("Bearing (corner 0 → 1): {:.4}°", o.bearing_degs);
            println!("Edge normal:            {:.4}°", o.normal_degs);
            println!("Raw (180 − normal):     {:.4}°", o.raw_degs);
            println!("Azimuth:                {:.4}°", o.azimuth_degs);
        }

        // ── Area ─────────────────────────────────────────────────────
        Commands::Area { coordinates, config } => {
            let config = load_config(config.as_deref())?;
            let polygon = parse_polygon(&coordinates, config.closing_corner)?;
            let g = analyze_geometry(&polygon, &config.projection)
                .context("Failed to measure polygon")?;
            println!("Projection: {}", config.projection);
            println!(
                "Centroid: ({:.6}, {:.6})",
                g.location.latitude, g.location.longitude
            );
            println!("Area: {:.2} m²", g.area_m2);
            println!("Perimeter: {:.2} m", g.perimeter_m);
        }

        // ── Savings ──────────────────────────────────────────────────
        Commands::Savings {
            area,
            lat,
            lon,
            azimuth,
            config,
        } => {
            if !(area.is_finite() && area >= 0.0) {
                bail!("Area must be a non-negative number, got {}", area);
            }
            let config = load_config(config.as_deref())?;
            let b = estimate_breakdown(area, lat, lon, azimuth, &config.savings);
            println!("Elevated area:      {:.2} m²", b.elevated_area_m2);
            println!("Peak generation:    {:.1} W", b.peak_generation_watts);
            println!("Regional yield:     {:.0} kWh/kWp", b.yield_kwh_per_kwp);
            println!("Annual generation:  {:.1} kWh", b.annual_generation_kwh);
            println!("After degradation:  {:.1} kWh", b.degraded_generation_kwh);
            println!("Used on site:       {:.1} kWh", b.self_used_generation_kwh);
            println!("Savings:            £{:.2} per year", b.savings_gbp);
        }

        // ── Config ───────────────────────────────────────────────────
        Commands::Config => {
            println!("{}", to_json_string(&AnalysisConfig::default())?);
        }
    }

    Ok(())
}
