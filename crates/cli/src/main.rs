//! avarisk CLI - avalanche risk assessment from the command line

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use avarisk_algorithms::risk::{
    assess_area, AreaAssessment, AssessmentRequest, LevelCounts, ReductionPreset, RiskInputs, RiskLevel,
    RiskModel,
};
use avarisk_core::provider::{ProviderWeather, Traced};
use avarisk_core::raster::RasterStatistics;
use avarisk_core::{
    AreaParams, Cardinal, Coordinate, ElevationProvider, Error as CoreError, WeatherProvider, WeatherReading,
};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "avarisk")]
#[command(author, version, about = "Avalanche risk mapping around a point", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the sample coordinates of an area in row-major order
    Grid {
        #[command(flatten)]
        area: AreaArgs,
    },
    /// Assess an area from an elevation file and a weather reading
    Assess {
        #[command(flatten)]
        area: AreaArgs,
        /// JSON array of elevations in meters, row-major, `null` for holes
        #[arg(short, long)]
        elevations: PathBuf,
        /// Snowfall over the last hour in millimeters
        #[arg(long, default_value = "0")]
        snowfall_mm: f64,
        /// Wind speed in meters per second
        #[arg(long, default_value = "0")]
        wind_ms: f64,
        /// Number of people in the party
        #[arg(short, long)]
        group_size: u32,
        /// Group reduction table: small-group-advantage, small-group-penalty
        #[arg(short, long)]
        reduction: String,
        /// Print a JSON summary instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Score a single location
    Point {
        /// Slope angle in degrees
        #[arg(short, long)]
        slope: f64,
        /// Aspect as a direction (north, east, ...) or an azimuth in degrees
        #[arg(short, long)]
        aspect: String,
        /// Recent snowfall in centimeters
        #[arg(long, default_value = "0")]
        snowfall_cm: f64,
        /// Wind speed in kilometers per hour
        #[arg(long, default_value = "0")]
        wind_kmh: f64,
        /// Number of people in the party
        #[arg(short, long)]
        group_size: u32,
        /// Group reduction table: small-group-advantage, small-group-penalty
        #[arg(short, long)]
        reduction: String,
    },
}

#[derive(clap::Args)]
struct AreaArgs {
    /// Center latitude in degrees
    #[arg(long, allow_negative_numbers = true)]
    lat: f64,
    /// Center longitude in degrees
    #[arg(long, allow_negative_numbers = true)]
    lon: f64,
    /// Side length of the square area in kilometers
    #[arg(long, default_value = "3.0")]
    area_km: f64,
    /// Distance between samples in kilometers
    #[arg(long, default_value = "0.3")]
    spacing_km: f64,
}

impl AreaArgs {
    fn center(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }

    fn params(&self) -> AreaParams {
        AreaParams {
            area_km: self.area_km,
            spacing_km: self.spacing_km,
        }
    }
}

// ─── Collaborators ──────────────────────────────────────────────────────

/// Elevations read from a JSON file, returned in file order
struct FileElevations {
    samples: Vec<Option<f64>>,
}

impl ElevationProvider for FileElevations {
    fn fetch_bulk(&self, coordinates: &[Coordinate]) -> avarisk_core::Result<Vec<Option<f64>>> {
        if self.samples.len() != coordinates.len() {
            return Err(CoreError::ElevationUnavailable(format!(
                "file holds {} elevations, grid has {} points",
                self.samples.len(),
                coordinates.len()
            )));
        }
        Ok(self.samples.clone())
    }
}

/// A reading supplied on the command line
struct FixedWeather(ProviderWeather);

impl WeatherProvider for FixedWeather {
    fn fetch(&self, _center: Coordinate) -> avarisk_core::Result<ProviderWeather> {
        Ok(self.0)
    }
}

// ─── Output ─────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct AssessmentSummary {
    center: Coordinate,
    /// (west, south, east, north)
    bounds: (f64, f64, f64, f64),
    size: usize,
    weather: WeatherReading,
    computed: usize,
    counts: LevelCounts,
    highest: Option<RiskLevel>,
    scores: RasterStatistics,
    /// Row-major level codes (Low = 1 ... High = 4), `null` where undefined
    levels: Vec<Vec<Option<u8>>>,
}

impl AssessmentSummary {
    fn new(assessment: &AreaAssessment) -> Self {
        let codes = assessment.risk.levels().map(RiskLevel::code);
        let levels = codes.data().rows().into_iter().map(|row| row.to_vec()).collect();

        Self {
            center: assessment.grid.center(),
            bounds: assessment.grid.bounds(),
            size: assessment.grid.size(),
            weather: assessment.weather,
            computed: assessment.computed,
            counts: assessment.risk.level_counts(),
            highest: assessment.risk.highest_level(),
            scores: assessment.risk.scores().statistics(),
            levels,
        }
    }
}

fn level_symbol(level: Option<RiskLevel>) -> char {
    match level {
        None => '.',
        Some(RiskLevel::Low) => 'L',
        Some(RiskLevel::Moderate) => 'M',
        Some(RiskLevel::Considerable) => 'C',
        Some(RiskLevel::High) => 'H',
    }
}

fn print_table(assessment: &AreaAssessment) {
    let (west, south, east, north) = assessment.grid.bounds();
    let (rows, cols) = assessment.risk.shape();
    let levels = assessment.risk.levels();

    println!("Center: {}", assessment.grid.center());
    println!("Bounds: ({:.6}, {:.6}) - ({:.6}, {:.6})", west, south, east, north);
    println!("Grid: {} x {} ({} computed cells)", cols, rows, assessment.computed);
    println!(
        "Weather: {:.1} cm snowfall, {:.1} km/h wind",
        assessment.weather.snowfall_cm, assessment.weather.wind_speed_kmh
    );

    println!("\nLevels (north up, '.' = undefined):");
    for row in 0..rows {
        let line: String = (0..cols)
            .map(|col| level_symbol(levels.get(row, col).ok().flatten()))
            .collect();
        println!("  {}", line);
    }

    let counts = assessment.risk.level_counts();
    println!("\nCounts:");
    for level in RiskLevel::ALL {
        println!("  {:<12} {}", level.as_str(), counts.get(level));
    }

    let stats = assessment.risk.scores().statistics();
    if let (Some(min), Some(max), Some(mean)) = (stats.min, stats.max, stats.mean) {
        println!("\nScores: min {:.4}, max {:.4}, mean {:.4}", min, max, mean);
    }
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

fn read_elevations(path: &Path) -> Result<Vec<Option<f64>>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read elevations from {}", path.display()))?;
    let samples: Vec<Option<f64>> = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a JSON array of numbers", path.display()))?;
    info!("Elevations: {} samples", samples.len());
    Ok(samples)
}

fn parse_reduction(s: &str) -> Result<RiskModel> {
    let preset: ReductionPreset = s.parse().map_err(|e: String| anyhow!(e))?;
    RiskModel::new(preset.table()).context("Failed to build risk model")
}

fn parse_aspect(s: &str) -> Result<Cardinal> {
    if let Ok(direction) = s.parse::<Cardinal>() {
        return Ok(direction);
    }
    let azimuth: f64 = s
        .parse()
        .map_err(|_| anyhow!("Unknown aspect: {}. Use a direction or an azimuth in degrees.", s))?;
    Cardinal::from_azimuth(azimuth).ok_or_else(|| anyhow!("Aspect azimuth must be finite, got {}", s))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        // ── Grid ─────────────────────────────────────────────────────
        Commands::Grid { area } => {
            let grid = area
                .params()
                .build(area.center())
                .context("Failed to build sample grid")?;
            info!("Grid: {} x {}", grid.size(), grid.size());
            for coordinate in grid.coordinates() {
                println!("{}", coordinate);
            }
        }

        // ── Assess ───────────────────────────────────────────────────
        Commands::Assess {
            area,
            elevations,
            snowfall_mm,
            wind_ms,
            group_size,
            reduction,
            json,
        } => {
            let model = parse_reduction(&reduction)?;
            let elevation = Traced::new(
                "file",
                FileElevations {
                    samples: read_elevations(&elevations)?,
                },
            );
            let weather = Traced::new(
                "flags",
                FixedWeather(ProviderWeather {
                    snowfall_mm,
                    wind_speed_ms: wind_ms,
                }),
            );
            let request = AssessmentRequest::new(area.center(), group_size).with_area(area.params());

            let pb = spinner("Assessing area...");
            let start = Instant::now();
            let result = assess_area(&request, &elevation, &weather, &model);
            pb.finish_and_clear();
            let assessment = result.context("Failed to assess area")?;
            info!("Assessed in {:.2?}", start.elapsed());

            if json {
                let summary = AssessmentSummary::new(&assessment);
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_table(&assessment);
            }
        }

        // ── Point ────────────────────────────────────────────────────
        Commands::Point {
            slope,
            aspect,
            snowfall_cm,
            wind_kmh,
            group_size,
            reduction,
        } => {
            let model = parse_reduction(&reduction)?;
            let weather = WeatherReading::new(snowfall_cm, wind_kmh).context("Invalid weather reading")?;
            let inputs = RiskInputs::new(slope, parse_aspect(&aspect)?, &weather, group_size);
            let assessment = model.assess(&inputs).context("Failed to score location")?;
            println!("Score: {:.4}", assessment.score);
            println!("Level: {}", assessment.level);
        }
    }

    Ok(())
}
