use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::Password;
use tracing::debug;
use weather_core::{Config, Controller, Event, Session, SessionHandle, provider_from_config};

use crate::{
    prompt::{self, Answer},
    render,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather lookup with place suggestions")]
pub struct Cli {
    /// WeatherAPI.com key; overrides the configured one.
    #[arg(long, env = "WEATHERAPI_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the WeatherAPI.com key.
    Configure,

    /// Show current weather for a location.
    Show {
        /// Location name, e.g. "New York".
        #[arg(required = true, num_args = 1..)]
        location: Vec<String>,
    },

    /// List known places matching the text.
    Suggest {
        text: String,
    },

    /// Prompt for locations with autocomplete (default).
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load()?;

        match self.command.unwrap_or(Command::Interactive) {
            Command::Configure => configure(config, self.api_key),
            Command::Show { location } => {
                if let Some(key) = self.api_key {
                    config.set_api_key(key);
                }
                show(&config, &location.join(" ")).await
            }
            Command::Suggest { text } => {
                let hits = config.catalog().suggest(&text);
                if hits.is_empty() {
                    println!("No matching places.");
                }
                for hit in hits {
                    println!("{hit}");
                }
                Ok(())
            }
            Command::Interactive => {
                if let Some(key) = self.api_key {
                    config.set_api_key(key);
                }
                interactive(&config).await
            }
        }
    }
}

fn configure(mut config: Config, api_key: Option<String>) -> anyhow::Result<()> {
    let api_key = match api_key {
        Some(key) => key,
        None => Password::new("WeatherAPI.com API key:")
            .without_confirmation()
            .with_help_message("Get a free key at https://www.weatherapi.com")
            .prompt()?,
    };

    let api_key = api_key.trim().to_string();
    if api_key.is_empty() {
        anyhow::bail!("API key must not be empty");
    }

    config.set_api_key(api_key);
    let path = config.save()?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}

fn start_session(config: &Config) -> anyhow::Result<SessionHandle> {
    let provider = provider_from_config(config)?;
    let controller = Controller::new(Arc::new(config.catalog()));
    let (handle, _task) = Session::spawn(controller, provider);
    Ok(handle)
}

async fn show(config: &Config, location: &str) -> anyhow::Result<()> {
    let handle = start_session(config)?;
    let view = handle.search(location).await?;
    println!("{}", render::render_view(&view));
    Ok(())
}

async fn interactive(config: &Config) -> anyhow::Result<()> {
    let handle = start_session(config)?;
    let catalog = Arc::new(config.catalog());

    println!("{}", render::render_view(&handle.view()));

    loop {
        handle.send(Event::Focus)?;

        let catalog_for_prompt = Arc::clone(&catalog);
        let answer = tokio::task::spawn_blocking(move || prompt::ask_location(catalog_for_prompt))
            .await
            .context("location prompt panicked")??;
        debug!(?answer, "prompt answered");

        let seq = match answer {
            Answer::Quit => break,
            Answer::Suggestion(place) => {
                handle.send(Event::Input(place.clone()))?;
                handle.send(Event::Blur)?;
                handle.send(Event::SelectSuggestion(place))?
            }
            Answer::Query(text) => {
                handle.send(Event::Input(text))?;
                handle.send(Event::Blur)?;
                handle.send(Event::Search)?
            }
        };

        let view = handle.settle(seq).await?;
        println!("{}", render::render_view(&view));
    }

    Ok(())
}
