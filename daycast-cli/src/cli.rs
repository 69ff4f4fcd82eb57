use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use daycast_core::{
    Config, FilePreferenceStore, MemoryPreferenceStore, PreferenceStore, ProviderId,
    ScreenSettings, Transition, WeatherScreen,
    provider::default_provider_from_config,
};
use inquire::{Password, Select, Text};
use tracing::warn;

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "daycast", version, about = "Seven-day weather for the place you last picked")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure credentials for a provider and make it the default.
    Configure {
        /// Provider short name, e.g. "weatherapi" or "openmeteo".
        provider: String,

        /// City to show before any location has been picked.
        #[arg(long)]
        default_city: Option<String>,
    },

    /// Show the forecast for the last picked location.
    Show {
        /// Day to show in detail, 0 is today.
        #[arg(long, default_value_t = 0)]
        day: usize,

        /// Do not read or write the remembered location.
        #[arg(long)]
        ephemeral: bool,
    },

    /// Search for a location, pick it and show its forecast.
    Search {
        /// Day to show in detail, 0 is today.
        #[arg(long, default_value_t = 0)]
        day: usize,

        /// Do not remember the picked location.
        #[arg(long)]
        ephemeral: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { provider, default_city } => configure(&provider, default_city),
            Command::Show { day, ephemeral } => show(day, ephemeral).await,
            Command::Search { day, ephemeral } => search(day, ephemeral).await,
        }
    }
}

fn configure(provider: &str, default_city: Option<String>) -> anyhow::Result<()> {
    let id = ProviderId::try_from(provider)?;
    let mut config = Config::load()?;

    if id.requires_api_key() {
        let api_key = Password::new(&format!("API key for {id}:"))
            .without_confirmation()
            .prompt()
            .context("Failed to read API key")?;
        config.upsert_provider_api_key(id, api_key.trim().to_string());
    }
    config.set_default_provider(id);

    if let Some(city) = default_city {
        config.default_city = Some(city);
    }

    config.save()?;
    println!("Default provider set to {id}.");
    Ok(())
}

fn build_screen(ephemeral: bool) -> anyhow::Result<WeatherScreen> {
    let config = Config::load()?;
    let provider = default_provider_from_config(&config)?;

    let preferences: Arc<dyn PreferenceStore> = if ephemeral {
        Arc::new(MemoryPreferenceStore::new())
    } else {
        match FilePreferenceStore::in_data_dir() {
            Ok(store) => Arc::new(store),
            Err(err) => {
                warn!(error = %err, "preferences unavailable; nothing will be remembered");
                Arc::new(MemoryPreferenceStore::new())
            }
        }
    };

    let mut settings = ScreenSettings::default();
    if let Some(city) = config.default_city {
        settings = settings.with_default_city(city);
    }

    Ok(WeatherScreen::new(
        Arc::clone(&provider).into_resolver(),
        provider.into_forecast_client(),
        preferences,
        settings,
    ))
}

async fn show(day: usize, ephemeral: bool) -> anyhow::Result<()> {
    let mut screen = build_screen(ephemeral)?;

    screen.initialize().await;
    if screen.wait_for_forecast().await == Transition::ForecastReady {
        screen.select_day(day);
    }

    println!("{}", render::screen(&screen.view()));
    Ok(())
}

async fn search(day: usize, ephemeral: bool) -> anyhow::Result<()> {
    let mut screen = build_screen(ephemeral)?;
    screen.toggle_search();

    let candidates = loop {
        let query = Text::new("Search city:").prompt().context("Failed to read search text")?;
        if !screen.on_query_changed(query) {
            println!("Type at least 3 characters.");
            continue;
        }

        screen.wait_for_candidates().await;
        let found = screen.view().candidates.to_vec();
        if found.is_empty() {
            println!("No matching locations.");
            continue;
        }
        break found;
    };

    let pick = Select::new("Pick a location:", candidates)
        .prompt()
        .context("Failed to read location choice")?;
    screen.commit(pick);

    if screen.wait_for_forecast().await == Transition::ForecastReady {
        screen.select_day(day);
    }
    println!("{}", render::screen(&screen.view()));

    screen.flush_preferences().await;
    Ok(())
}
