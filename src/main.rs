//! Imagegen - text-to-image CLI over several providers.

mod adapters;
mod cli;
mod config;
mod dispatch;
mod error;
mod output;
mod params;
mod placeholder;
mod ports;
mod provider;

use std::process;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Cli;
use crate::config::Config;
use crate::error::GenerateError;
use crate::output::{resolve_output_path, save_png};
use crate::params::{apply_style, preset_dimensions, validate_style};
use crate::ports::GenerationRequest;
use crate::provider::Provider;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        if let Some(hint) = e.hint() {
            eprintln!("{hint}");
        }
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "imagegen=debug" } else { "imagegen=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli) -> Result<(), GenerateError> {
    let config_path = config::discover_config_path(cli.config.as_deref());
    tracing::debug!("Config path: {}", config_path.display());
    let config = Config::load(&config_path).map_err(GenerateError::Config)?;

    let prompt = cli.resolve_prompt()?;
    if prompt.trim().is_empty() {
        return Err(GenerateError::InvalidArgument("Prompt must not be empty".into()));
    }

    let provider: Provider =
        cli.provider.as_deref().unwrap_or(&config.defaults.provider).parse()?;

    let (preset_width, preset_height) = match cli.preset.as_deref() {
        Some(preset) => preset_dimensions(preset).map_err(GenerateError::InvalidArgument)?,
        None => (config.defaults.width, config.defaults.height),
    };
    let width = cli.width.unwrap_or(preset_width);
    let height = cli.height.unwrap_or(preset_height);

    let style = cli.style.as_deref().unwrap_or(&config.defaults.style);
    validate_style(style).map_err(GenerateError::InvalidArgument)?;
    let prompt = apply_style(prompt.trim(), style);

    let credential = if provider.requires_credential() {
        cli.api_key.clone().or_else(|| config.api_key(provider))
    } else {
        None
    };

    tracing::debug!("Provider: {provider}, size: {width}x{height}, style: {style}");

    let request = GenerationRequest::new(&prompt, width, height, provider, credential)?;
    let image = dispatch::dispatch(&request, &config.dispatch_settings()).await?;

    let output_path = resolve_output_path(cli.output.as_deref(), request.width, request.height);
    save_png(&image, &output_path)?;
    eprintln!("Saved: {}", output_path.display());

    Ok(())
}
