pub mod cli;
pub mod core;
pub mod providers;

use crate::cli::convert::ConvertArgs;
use crate::core::CurrencyListCache;
use crate::core::config::AppConfig;
use crate::providers::CurrencyLayerProvider;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Currencies,
    Convert(ConvertArgs),
    Form,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("xconv starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!(providers = ?config.providers, "Loaded config");

    let currency_cache = Arc::new(CurrencyListCache::new());
    let provider = CurrencyLayerProvider::new(
        &config.providers.currencylayer,
        &config.access_key,
        Arc::clone(&currency_cache),
    )?;

    match command {
        AppCommand::Currencies => cli::currencies::run(&provider).await,
        AppCommand::Convert(args) => cli::convert::run(&provider, &args).await,
        AppCommand::Form => cli::form::run(&provider).await,
    }
}
