use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, Text};
use weather_core::{Config, WeatherQueryController};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather for a city")]
pub struct Cli {
    /// Print debug logs to stderr (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the WeatherAPI.com API key (and optionally base URL).
    Configure,

    /// Show current weather for a city.
    Show {
        /// City or location name, passed to the API unchanged.
        city: String,
    },

    /// Search interactively; Esc or Ctrl-C quits.
    Search,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city } => {
                let controller = WeatherQueryController::from_config(&Config::load()?)?;
                query(&controller, city).await
            }
            Command::Search => search().await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let path = Config::config_file_path()?;
    let mut cfg = Config::load_from(&path)?;

    let api_key = Password::new("WeatherAPI.com API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    let base_url = Text::new("API base URL:")
        .with_default(&cfg.base_url)
        .prompt()
        .context("Failed to read base URL")?;

    cfg.api_key = Some(api_key.trim().to_string());
    cfg.base_url = base_url.trim().to_string();
    cfg.require_api_key()?;

    let saved = cfg.save()?;
    println!("Configuration saved to {}", saved.display());
    Ok(())
}

async fn search() -> anyhow::Result<()> {
    let controller = WeatherQueryController::from_config(&Config::load()?)?;

    loop {
        let prompt = tokio::task::spawn_blocking(|| Text::new("Search for location:").prompt())
            .await
            .context("Location prompt panicked")?;

        let city = match prompt {
            Ok(city) => city,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                tracing::debug!("search prompt closed");
                break;
            }
            Err(err) => return Err(err).context("Failed to read location"),
        };

        query(&controller, city).await?;
    }

    Ok(())
}

/// Submit one query and print every state until it settles.
async fn query(controller: &WeatherQueryController, city: String) -> anyhow::Result<()> {
    let mut rx = controller.subscribe();
    let generation = controller.submit_query(city);

    loop {
        rx.changed().await.context("Weather controller stopped")?;
        let state = rx.borrow_and_update().clone();

        if let Some(result) = &state.result {
            println!("{}", render::render(result));
        }
        if state.is_settled() {
            tracing::debug!(generation, "query settled");
            return Ok(());
        }
    }
}
