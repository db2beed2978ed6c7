use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use usweather_core::{Config, MapConfig};
use usweather_forecast::WeatherProvider;
use usweather_ui::view::INPUT_PLACEHOLDER;
use usweather_ui::{render_text, view, ForecastModel, RequestStatus};

/// Look up the next 12 hours of National Weather Service forecast for a U.S. location
#[derive(Debug, Parser)]
#[command(name = "usweather", version)]
struct Cli {
    /// Location to look up, e.g. "Arlington, VA". Omit for an interactive prompt.
    location: Option<String>,

    /// Print the page as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Config file (defaults to <config dir>/usweather/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    match run() {
        Ok(status) if status == RequestStatus::Failed => ExitCode::FAILURE,
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<RequestStatus> {
    let cli = Cli::parse();

    // A missing .env file is fine
    let _ = dotenvy::dotenv();
    usweather_core::init()?;

    let config = Config::load_validated(cli.config.as_deref())?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("usweather-tokio")
        .build()
        .context("Failed to create tokio runtime")?;

    let provider = Arc::new(
        WeatherProvider::new(&config).context("Failed to create weather provider")?,
    );
    let mut model = ForecastModel::new(provider, runtime.handle().clone());

    tracing::info!("usweather started");

    match cli.location {
        Some(location) => {
            model.set_location(location);
            model.fetch_weather();
            model.wait_until_settled(|_| {});
            print_page(&model, &config.map, cli.json)?;
            Ok(model.state().status())
        }
        None => {
            interactive(&mut model, &config.map, cli.json)?;
            Ok(RequestStatus::Idle)
        }
    }
}

/// Prompt loop: each entered line is a new lookup.
fn interactive(model: &mut ForecastModel, map: &MapConfig, json: bool) -> Result<()> {
    print_page(model, map, json)?;

    let stdin = io::stdin();
    loop {
        print!("{}: ", INPUT_PLACEHOLDER);
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let location = line.trim();
        if location.eq_ignore_ascii_case("quit") || location.eq_ignore_ascii_case("exit") {
            break;
        }
        if location.is_empty() {
            continue;
        }

        model.set_location(location);
        model.fetch_weather();
        print_page(model, map, json)?;

        // Re-render as the map and then the forecast arrive
        let mut rendered = Ok(());
        model.wait_until_settled(|state| {
            if rendered.is_ok() {
                rendered = print_state(state, map, json);
            }
        });
        rendered?;
    }

    Ok(())
}

fn print_page(model: &ForecastModel, map: &MapConfig, json: bool) -> Result<()> {
    print_state(model.state(), map, json)
}

fn print_state(state: &usweather_ui::ForecastState, map: &MapConfig, json: bool) -> Result<()> {
    let page = view(state, map);
    let mut out = io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut out, &page).context("Failed to write JSON")?;
        writeln!(out)?;
    } else {
        writeln!(out, "{}", render_text(&page))?;
    }
    Ok(())
}
