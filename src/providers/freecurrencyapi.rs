use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Url;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::core::config::FreeCurrencyApiConfig;
use crate::core::currency::{
    BASE_CURRENCY, ConversionRate, CurrencyCode, CurrencyGateway, CurrencyInfo, GatewayError,
};

const USER_AGENT: &str = "xcalc/1.0";

/// Client for the freecurrencyapi.com v1 endpoints.
pub struct FreeCurrencyApiGateway {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl FreeCurrencyApiGateway {
    pub fn new(base_url: &str, api_key: Option<String>, client: reqwest::Client) -> Self {
        FreeCurrencyApiGateway {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client,
        }
    }

    /// Builds a gateway with its own HTTP client. The key from the
    /// environment wins over the one in `config`.
    pub fn from_config(config: &FreeCurrencyApiConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().context("Failed to build HTTP client")?;
        Ok(Self::new(
            &config.base_url,
            config.api_key_from_env(),
            client,
        ))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T, GatewayError> {
        let api_key = self.api_key.as_deref().ok_or(GatewayError::MissingApiKey)?;

        let mut query = vec![("apikey", api_key)];
        query.extend_from_slice(params);
        let url = Url::parse_with_params(&format!("{}{}", self.base_url, endpoint), &query)
            .map_err(|e| GatewayError::Parse(format!("Invalid URL for {endpoint}: {e}")))?;
        debug!("Requesting {}{} {:?}", self.base_url, endpoint, params);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .ok()
                .and_then(|e| e.message)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string());
            return Err(GatewayError::Status { status, message });
        }

        serde_json::from_str(&text)
            .map_err(|e| GatewayError::Parse(format!("{endpoint}: {e}")))
    }
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CurrenciesResponse {
    data: Option<HashMap<String, CurrencyInfo>>,
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    data: Option<HashMap<String, serde_json::Value>>,
}

fn parse_rate(code: &CurrencyCode, value: &serde_json::Value) -> Result<Option<Decimal>, GatewayError> {
    match value {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::Number(n) => {
            let text = n.to_string();
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .map(Some)
                .map_err(|e| GatewayError::Parse(format!("Invalid rate '{text}' for {code}: {e}")))
        }
        other => Err(GatewayError::Parse(format!(
            "Unexpected rate value for {code}: {other}"
        ))),
    }
}

#[async_trait]
impl CurrencyGateway for FreeCurrencyApiGateway {
    #[instrument(name = "FreeCurrencyApiCurrencies", skip(self))]
    async fn list_currencies(&self) -> Result<Vec<CurrencyInfo>, GatewayError> {
        let response: CurrenciesResponse = self.get_json("/v1/currencies", &[]).await?;
        let currencies: Vec<CurrencyInfo> = response
            .data
            .map(|data| data.into_values().collect())
            .unwrap_or_default();
        debug!("Received {} currencies", currencies.len());
        Ok(currencies)
    }

    #[instrument(name = "FreeCurrencyApiLatest", skip(self), fields(code = %code))]
    async fn get_rate(
        &self,
        code: &CurrencyCode,
    ) -> Result<Option<ConversionRate>, GatewayError> {
        let response: LatestResponse = self
            .get_json(
                "/v1/latest",
                &[
                    ("currencies", code.as_str()),
                    ("base_currency", BASE_CURRENCY),
                ],
            )
            .await?;

        let Some(value) = response.data.as_ref().and_then(|d| d.get(code.as_str())) else {
            debug!("No rate for {} in response", code);
            return Ok(None);
        };

        let rate = parse_rate(code, value)?;
        debug!(?rate, "Received rate");
        Ok(rate.map(|rate| ConversionRate {
            code: code.clone(),
            rate,
            fetched_at: Utc::now(),
        }))
    }
}
