pub mod cli;
pub mod core;
pub mod providers;

use crate::core::config::AppConfig;
use crate::core::{
    CalculationForm, CalculatorHandler, CurrencyCode, CurrencyService, StandardCalculator,
};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub enum AppCommand {
    Eval(CalculationForm),
    Currencies,
    Rate(CurrencyCode),
}

fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    match config_path {
        Some(path) => AppConfig::load_from_path(path),
        None => AppConfig::load(),
    }
}

fn currency_service(config: &AppConfig) -> Result<CurrencyService> {
    let gateway = providers::FreeCurrencyApiGateway::from_config(&config.freecurrencyapi())?;
    Ok(CurrencyService::new(Arc::new(gateway)))
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("xcalc starting...");

    let config = load_config(config_path)?;
    debug!(base_url = %config.freecurrencyapi().base_url, "Loaded config");

    let currencies = currency_service(&config)?;

    match command {
        AppCommand::Eval(form) => {
            let handler = CalculatorHandler::new(Arc::new(StandardCalculator), currencies);
            cli::eval::run(&handler, &form).await
        }
        AppCommand::Currencies => cli::currencies::run(&currencies).await,
        AppCommand::Rate(code) => cli::currencies::run_rate(&currencies, &code).await,
    }
}
