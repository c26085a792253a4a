use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use thiserror::Error;
use thread_art::{
    compute, verboser::Logger, CacheMode, Computation, DarknessMode, ExportError, Float, Residual,
    Settings,
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Input file path. Must be a square image.
    #[arg()]
    input: PathBuf,

    /// Number of pins surrounding the image.
    #[arg(short = 'n', long, default_value_t = 200)]
    pins: usize,

    /// Number of chords to draw.
    #[arg(short, long, default_value_t = 1000)]
    threads: usize,

    /// Minimum pin count between linked pins.
    #[arg(short, long, default_value_t = 20)]
    min_distance: usize,

    /// Size in pixels of the rendered image, 0 keeps the input size.
    #[arg(short, long, default_value_t = 0)]
    size: usize,

    /// Precision of calculations (Single/Double).
    #[arg(short, long, default_value_t = Precision::Single)]
    precision: Precision,

    /// Darkness mode of processing.
    #[arg(long, default_value_t = DarknessKind::Flat)]
    darkness_mode: DarknessKind,

    /// Darkness value modifier: lightness added per chord (Flat) or owed ink kept (Percentage).
    #[arg(long)]
    darkness_value: Option<f32>,

    /// Rasterize chords on demand instead of up front.
    #[arg(long)]
    lazy: bool,

    /// Read the settings from a JSON file instead of the flags above.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the effective settings as JSON before running.
    #[arg(long)]
    dump_config: bool,

    /// Rendered image.
    #[arg(short, long, default_value = "out.png")]
    output: PathBuf,

    /// Visited pins, one per line.
    #[arg(long, default_value = "points.txt")]
    points: PathBuf,

    /// Optional svg rendering.
    #[arg(long)]
    svg: Option<PathBuf>,

    #[arg(long, default_value_t = 0.5)]
    thickness: f32,

    /// Optional dump of the residual left after the run.
    #[arg(long)]
    residual: Option<PathBuf>,

    /// Increase logging (-v info, -vv debug, -vvv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn settings(&self) -> Result<Settings, CliError> {
        if let Some(path) = &self.config {
            let file = std::fs::read_to_string(path)?;
            return Ok(serde_json::from_str(&file)?);
        }
        Ok(Settings {
            pin_count: self.pins,
            steps: self.threads,
            min_angular_gap: self.min_distance,
            output_size: self.size,
            darkness: self.darkness_mode.with_value(self.darkness_value),
            cache: if self.lazy {
                CacheMode::Lazy
            } else {
                CacheMode::Eager
            },
        })
    }

    fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum DarknessKind {
    Flat,
    Percentage,
}

impl DarknessKind {
    fn with_value(self, value: Option<f32>) -> DarknessMode {
        match self {
            Self::Flat => DarknessMode::Flat(
                value
                    .map(|value| value.clamp(0.0, 255.0).round() as u8)
                    .unwrap_or(thread_art::FlatDarkness::DEFAULT),
            ),
            Self::Percentage => DarknessMode::Percentage(value.unwrap_or(0.93)),
        }
    }
}

impl ValueEnum for DarknessKind {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Flat, Self::Percentage]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(match self {
            Self::Flat => clap::builder::PossibleValue::new("Flat")
                .alias("flat")
                .alias("Flatten")
                .alias("flatten"),
            Self::Percentage => clap::builder::PossibleValue::new("Percentage")
                .alias("percentage")
                .alias("per")
                .alias("Per"),
        })
    }
}

impl std::fmt::Display for DarknessKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Flat => f.write_str("Flat"),
            Self::Percentage => f.write_str("Percentage"),
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Precision {
    Single,
    Double,
}

impl ValueEnum for Precision {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Single, Self::Double]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(match self {
            Self::Single => clap::builder::PossibleValue::new("Single")
                .alias("single")
                .alias("f32"),
            Self::Double => clap::builder::PossibleValue::new("Double")
                .alias("double")
                .alias("f64"),
        })
    }
}

impl std::fmt::Display for Precision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single => f.write_str("Single"),
            Self::Double => f.write_str("Double"),
        }
    }
}

#[derive(Debug, Error)]
enum CliError {
    #[error("could not read {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error(transparent)]
    Run(#[from] thread_art::Error),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("invalid settings file: {0}")]
    Json(#[from] serde_json::Error),
}

fn main() -> Result<(), CliError> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.log_level())
        .parse_default_env()
        .init();

    let settings = args.settings()?;
    if args.dump_config {
        println!("{}", serde_json::to_string_pretty(&settings)?);
    }

    log::info!("input is {}", args.input.display());
    let image = image::open(&args.input).map_err(|source| CliError::Open {
        path: args.input.clone(),
        source,
    })?;
    let residual = Residual::from_image(image).map_err(thread_art::Error::from)?;

    let computation = match args.precision {
        Precision::Single => with_precision::<f32>(residual, &settings)?,
        Precision::Double => with_precision::<f64>(residual, &settings)?,
    };
    save(&args, &computation)
}

fn with_precision<S: Float>(
    residual: Residual,
    settings: &Settings,
) -> Result<Computation, thread_art::Error> {
    compute::<S>(residual, settings, &mut Logger)
}

fn save(args: &Args, computation: &Computation) -> Result<(), CliError> {
    computation.save_image(&args.output)?;
    log::info!("saved {}", args.output.display());
    computation.save_instructions(&args.points)?;
    log::info!("saved {}", args.points.display());
    if let Some(path) = &args.svg {
        computation.save_svg(path, args.thickness)?;
        log::info!("saved {}", path.display());
    }
    if let Some(path) = &args.residual {
        computation.save_residual(path)?;
        log::info!("saved {}", path.display());
    }
    Ok(())
}
