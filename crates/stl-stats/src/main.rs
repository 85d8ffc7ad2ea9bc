use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use stl_stats::smoothing::rolling_average;
use stl_stats::zones::zone_bands;
use stl_stats::{Settings, TrackFile};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stl-info", about = "Summary statistics for GPX heart-rate tracks")]
struct Cli {
    /// Settings JSON file. Defaults to $STL_SETTINGS, then built-in values.
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the file summary
    Info {
        file: PathBuf,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Write one extracted series as CSV
    Series {
        file: PathBuf,
        #[arg(long, value_enum)]
        signal: Signal,
        /// Rolling average window; defaults to the settings value for the signal
        #[arg(long)]
        smooth: Option<usize>,
    },
    /// Write the heart-rate zone bands as CSV
    Zones { file: PathBuf },
}

#[derive(Clone, Copy, ValueEnum)]
enum Signal {
    Hr,
    Speed,
    Elevation,
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();
}

fn load_settings(path: Option<&PathBuf>) -> anyhow::Result<Settings> {
    match path {
        Some(path) => Settings::load(path)
            .with_context(|| format!("reading settings from {}", path.display())),
        None => Settings::from_env().context("reading settings from $STL_SETTINGS"),
    }
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    let settings = load_settings(cli.settings.as_ref())?;

    match cli.command {
        Command::Info { file, json } => {
            let track_file = TrackFile::open(&file, &settings)
                .with_context(|| format!("loading {}", file.display()))?;
            let summary = track_file.summary(&settings);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{summary}");
            }
        }
        Command::Series {
            file,
            signal,
            smooth,
        } => {
            let track_file = TrackFile::open(&file, &settings)
                .with_context(|| format!("loading {}", file.display()))?;
            let windows = settings.rolling_average;
            let (series, default_window) = match signal {
                Signal::Hr => (&track_file.series.hr, windows.hr),
                Signal::Speed => (&track_file.series.speed, windows.speed),
                Signal::Elevation => (&track_file.series.elevation, windows.elevation),
            };
            let series = rolling_average(series, smooth.unwrap_or(default_window));

            let mut writer = csv::Writer::from_writer(io::stdout());
            writer.write_record(["time_ms", "value"])?;
            for (t, v) in series.iter() {
                writer.write_record([t.to_string(), v.to_string()])?;
            }
            writer.flush()?;
            tracing::debug!(samples = series.len(), "wrote series");
        }
        Command::Zones { file } => {
            let track_file = TrackFile::open(&file, &settings)
                .with_context(|| format!("loading {}", file.display()))?;
            let mut writer = csv::Writer::from_writer(io::stdout());
            for band in zone_bands(&track_file.series.hr, &settings.hr_zones) {
                writer.serialize(band)?;
            }
            writer.flush()?;
        }
    }

    Ok(())
}
