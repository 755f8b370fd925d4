use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracing::debug;
use weatherdash_core::{
    AstronomyDate, Config, Coordinates, Dashboard, DashboardView, FixedPosition, RefreshReport,
    source_from_config,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherdash", version, about = "Weather dashboard for the terminal")]
pub struct Cli {
    /// Log requests and refresh decisions to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the WeatherAPI.com key and fallback location.
    Configure,

    /// Show the dashboard for your position, or the fallback location.
    Show {
        /// Latitude of your position.
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude of your position.
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show the dashboard for a city or place name.
    Search {
        /// City, place name or "lat,long".
        #[arg(num_args = 0..)]
        query: Vec<String>,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Debug, Args)]
pub struct OutputArgs {
    /// Astronomy date (YYYY-MM-DD); defaults to today on this machine.
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Print the dashboard as JSON.
    #[arg(long)]
    json: bool,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { lat, lon, output } => {
                let position = lat.zip(lon).map(|(lat, lon)| Coordinates::new(lat, lon));
                let dash = dashboard(&output)?;
                let report = dash.load(&FixedPosition(position)).await;
                finish(&dash.view(), &report, &output)
            }
            Command::Search { query, output } => {
                let dash = dashboard(&output)?;
                let Some(refresh) = dash.search(&query.join(" ")) else {
                    println!("Nothing to search for.");
                    return Ok(());
                };
                let report = refresh.await;
                finish(&dash.view(), &report, &output)
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut cfg = Config::load()?;

    let api_key = inquire::Password::new("WeatherAPI.com API key:")
        .without_confirmation()
        .with_display_mode(inquire::PasswordDisplayMode::Masked)
        .prompt()
        .context("Failed to read API key")?;
    cfg.set_api_key(api_key);

    let fallback = inquire::Text::new("Fallback location:")
        .with_default(&cfg.fallback_location)
        .with_help_message(
            "Used when no --lat/--lon is given, e.g. \"Hong Kong\" or \"28.6139,77.2090\"",
        )
        .prompt()
        .context("Failed to read fallback location")?;
    cfg.fallback_location = fallback.trim().to_string();

    cfg.api_key()?;
    let path = cfg.save()?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}

fn dashboard(output: &OutputArgs) -> anyhow::Result<Dashboard> {
    let cfg = Config::load()?;
    let source = source_from_config(&cfg)?;
    let date = output.date.map_or(AstronomyDate::CallerToday, AstronomyDate::Fixed);

    debug!(fallback = %cfg.fallback_query(), ?date, "dashboard configured");
    Ok(Dashboard::new(source, cfg.fallback_query()).with_astronomy_date(date))
}

/// Prints whatever was filled in, then surfaces the forecast alert as the command error.
fn finish(view: &DashboardView, report: &RefreshReport, output: &OutputArgs) -> anyhow::Result<()> {
    if output.json {
        let json = serde_json::to_string_pretty(view).context("Failed to serialize dashboard")?;
        println!("{json}");
    } else {
        print!("{}", render::dashboard(view));
    }

    match report.alert() {
        Some(alert) => Err(anyhow::Error::msg(alert)),
        None => Ok(()),
    }
}
