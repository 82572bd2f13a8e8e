use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{CustomType, Text};
use nws_core::{Config, NwsClient, fetch_county_weather, find, load, report};

use crate::logging::LogLevel;

const USAGE: &str = "Usage: nws <CountyName> [StateName(XX)]";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "nws",
    version,
    about = "County forecasts and active alerts from the National Weather Service",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// County name, e.g. "Orange".
    pub county: Option<String>,

    /// Optional state filter, e.g. "CA".
    pub state: Option<String>,

    /// County table to read instead of the configured one.
    #[arg(long)]
    pub table: Option<PathBuf>,

    /// Width for the wrapped tonight forecast.
    #[arg(long)]
    pub width: Option<usize>,

    #[arg(long, value_enum, default_value = "warn", global = true)]
    pub log_level: LogLevel,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively set the User-Agent contact, table path and wrap width.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Command::Configure) => configure(),
            None => {
                let Some(county) = self.county else {
                    bail!(USAGE);
                };
                let state = self.state.unwrap_or_default();

                let mut config = Config::load()?;
                if let Some(table) = self.table {
                    config.table_path = table;
                }
                if let Some(width) = self.width {
                    config.wrap_width = width;
                }
                config.validate()?;

                show(&config, &county, &state).await
            }
        }
    }
}

async fn show(config: &Config, county: &str, state: &str) -> anyhow::Result<()> {
    if !state.is_empty() {
        println!("State Override");
    }

    let records = load(&config.table_path).context("Failed to load CSV")?;

    let Some(record) = find(&records, county, state) else {
        println!("County \"{county}\" not found in {}", config.table_path.display());
        return Ok(());
    };

    println!("{}", report::render_record(record));

    let client = NwsClient::new(config)?;
    let weather = fetch_county_weather(&client, &config.api_base, record).await?;

    println!("Fetching forecast from: {}\n", weather.forecast_url);

    match &weather.periods {
        Some(periods) => print!("{}", report::render_forecast(record, periods, config.wrap_width)?),
        None => eprintln!("Unexpected JSON Structure - Missing properties/periods"),
    }

    match &weather.alerts {
        Some(alerts) => print!("{}", report::render_alerts(record, alerts)),
        None => eprintln!("No alert information available for {} County", record.county),
    }

    Ok(())
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let user_agent = Text::new("User-Agent (include a contact address):")
        .with_default(&config.user_agent)
        .prompt()
        .context("Failed to read User-Agent")?;

    let current_table = config.table_path.display().to_string();
    let table = Text::new("County table path:")
        .with_default(&current_table)
        .prompt()
        .context("Failed to read table path")?;

    let wrap_width = CustomType::<usize>::new("Wrap width:")
        .with_default(config.wrap_width)
        .with_error_message("Please enter a positive whole number")
        .prompt()
        .context("Failed to read wrap width")?;

    config.user_agent = user_agent;
    config.table_path = PathBuf::from(table);
    config.wrap_width = wrap_width;

    config.validate()?;
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}
