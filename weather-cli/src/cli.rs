use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use inquire::{CustomType, Password};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};
use tracing::info;
use weather_core::{
    App, Config, DEFAULT_DEBOUNCE_MS, UiState, View, WeatherProvider, provider_from_config,
};

const PLACEHOLDER: &str = "Search city...";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-lookup", version, about = "Current weather for a city")]
pub struct Cli {
    /// Use this WeatherAPI.com key instead of the configured one.
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the WeatherAPI.com key and input settings.
    Configure,

    /// Look up one city and print the result card.
    Show {
        /// City name.
        city: String,
    },

    /// Type queries line by line; each line replaces the current search text.
    Search,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city } => {
                let config = load_config(self.api_key)?;
                show(provider_from_config(&config)?.into(), &city).await;
                Ok(())
            }
            Command::Search => {
                let config = load_config(self.api_key)?;
                search(provider_from_config(&config)?.into(), config).await
            }
        }
    }
}

fn load_config(api_key: Option<String>) -> anyhow::Result<Config> {
    let mut config = Config::load()?;
    if let Some(key) = api_key {
        config.set_api_key(key);
    }
    Ok(config)
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("WeatherAPI.com key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    let debounce_ms = CustomType::<u64>::new("Debounce (ms):")
        .with_default(config.debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS))
        .prompt()
        .context("Failed to read debounce")?;

    config.set_api_key(api_key.trim().to_string());
    config.debounce_ms = Some(debounce_ms);
    let path = config.save()?;

    println!("Saved configuration to {}", path.display());
    Ok(())
}

/// One lookup through the same state transitions the interactive search uses.
async fn show(provider: Arc<dyn WeatherProvider>, city: &str) {
    let mut state = UiState::new();
    if let Some(ticket) = state.commit(city.trim()) {
        let outcome = provider.get_weather(ticket.query()).await;
        state.settle(&ticket, outcome, Utc::now());
    }
    println!("{}", View::of(&state, Utc::now()));
}

async fn search(provider: Arc<dyn WeatherProvider>, config: Config) -> anyhow::Result<()> {
    let (input_tx, input_rx) = mpsc::channel(16);
    let (frames_tx, mut frames_rx) = mpsc::unbounded_channel();
    let app = App::new(provider, config.debounce(), frames_tx);

    println!("{PLACEHOLDER}");

    let reader = tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            if input_tx.send(line).await.is_err() {
                break;
            }
        }
        anyhow::Ok(())
    });

    let printer = tokio::spawn(async move {
        while let Some(frame) = frames_rx.recv().await {
            let view = View::of(&frame, Utc::now());
            println!("{view}");
            println!("{PLACEHOLDER}");
        }
    });

    let last = app.run(input_rx).await;
    info!(phase = ?last.phase(), "input closed");

    reader.await.context("stdin reader panicked")??;
    printer.await.context("printer panicked")?;
    Ok(())
}
