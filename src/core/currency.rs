//! Currency conversion abstractions

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Rates are always quoted against this currency.
pub const BASE_CURRENCY: &str = "USD";

/// Decimal places kept on a converted amount.
pub const CONVERSION_DP: u32 = 2;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP error: {status}: {message}")]
    Status {
        status: reqwest::StatusCode,
        message: String,
    },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("No API key configured for the currency provider")]
    MissingApiKey,
}

/// Three-letter ISO 4217 style code, always upper case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(CurrencyCode(code.to_ascii_uppercase()))
        } else {
            Err(format!("'{s}' is not a three-letter currency code"))
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CurrencyInfo {
    pub code: String,
    pub symbol: String,
    pub name: String,
    #[serde(rename = "symbol_native")]
    pub native_symbol: String,
    pub decimal_digits: u32,
    pub rounding: u32,
    #[serde(rename = "name_plural")]
    pub plural_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRate {
    pub code: CurrencyCode,
    pub rate: Decimal,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub code: CurrencyCode,
    pub rate: Decimal,
    pub amount: Decimal,
}

/// Remote source of currency metadata and latest rates.
///
/// Implementations report every failure; deciding whether to surface or
/// swallow it is left to the caller (see [`CurrencyService`]).
#[async_trait]
pub trait CurrencyGateway: Send + Sync {
    /// `Ok` with an empty list means the provider answered without any
    /// currencies.
    async fn list_currencies(&self) -> Result<Vec<CurrencyInfo>, GatewayError>;

    /// `Ok(None)` when the provider has no rate for `code`.
    async fn get_rate(&self, code: &CurrencyCode)
    -> Result<Option<ConversionRate>, GatewayError>;
}

/// Applies a rate to an amount, rounding midpoints away from zero.
pub fn apply_rate(amount: Decimal, rate: Decimal) -> Option<Decimal> {
    amount
        .checked_mul(rate)
        .map(|v| v.round_dp_with_strategy(CONVERSION_DP, RoundingStrategy::MidpointAwayFromZero))
}

/// Degrades gateway failures into empty or absent results, logging each one.
#[derive(Clone)]
pub struct CurrencyService {
    gateway: Arc<dyn CurrencyGateway>,
}

impl CurrencyService {
    pub fn new(gateway: Arc<dyn CurrencyGateway>) -> Self {
        Self { gateway }
    }

    pub async fn list_currencies(&self) -> Vec<CurrencyInfo> {
        match self.gateway.list_currencies().await {
            Ok(currencies) => {
                if currencies.is_empty() {
                    warn!("Currency provider returned no currencies");
                }
                currencies
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch currency list");
                Vec::new()
            }
        }
    }

    /// Currencies ordered by name, ready for display.
    pub async fn currencies_by_name(&self) -> Vec<CurrencyInfo> {
        let mut currencies = self.list_currencies().await;
        currencies.sort_by(|a, b| a.name.cmp(&b.name));
        currencies
    }

    pub async fn get_rate(&self, code: &CurrencyCode) -> Option<Decimal> {
        self.latest_rate(code).await.map(|r| r.rate)
    }

    pub async fn latest_rate(&self, code: &CurrencyCode) -> Option<ConversionRate> {
        match self.gateway.get_rate(code).await {
            Ok(Some(rate)) => Some(rate),
            Ok(None) => {
                warn!(%code, "No rate available");
                None
            }
            Err(e) => {
                warn!(%code, error = %e, "Failed to fetch rate");
                None
            }
        }
    }

    pub async fn convert(&self, amount: Decimal, code: &CurrencyCode) -> Option<Conversion> {
        let rate = self.get_rate(code).await?;
        let converted = apply_rate(amount, rate);
        if converted.is_none() {
            warn!(%code, %amount, %rate, "Converted amount is out of range");
        }
        debug!(%code, %rate, ?converted, "Applied conversion rate");
        converted.map(|amount| Conversion {
            code: code.clone(),
            rate,
            amount,
        })
    }

    pub async fn convert_amount(&self, amount: Decimal, code: &CurrencyCode) -> Option<Decimal> {
        self.convert(amount, code).await.map(|c| c.amount)
    }
}
