use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use reqwest::Url;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Number;
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, instrument};

use super::util::with_retry;
use crate::core::cache::CurrencyListCache;
use crate::core::config::CurrencyLayerConfig;
use crate::core::currency::{
    ConversionRequest, ConversionResult, Currency, CurrencyCode, ExchangeRateProvider,
};

const RETRY_DELAY_MS: u64 = 500;

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    info: Option<String>,
}

impl ApiError {
    fn message(&self) -> String {
        match (&self.info, self.code) {
            (Some(info), _) => info.clone(),
            (None, Some(code)) => format!("Provider error code {code}"),
            (None, None) => "Unknown provider error".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    currencies: Option<BTreeMap<String, String>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ConvertInfo {
    quote: Option<Decimal>,
}

/// Reads a JSON number as a `Decimal`, accepting exponent notation.
///
/// `Decimal` tops out near 7.9e28; larger values are reported as out of range.
fn number_to_decimal(number: &Number) -> Result<Decimal> {
    let text = number.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| anyhow!("Conversion result {} is outside the supported range", text))
}

#[derive(Debug, Deserialize)]
struct ConvertResponse {
    #[serde(default)]
    success: bool,
    result: Option<Number>,
    info: Option<ConvertInfo>,
    error: Option<ApiError>,
}

/// Client for the currencylayer `list` and `convert` endpoints.
pub struct CurrencyLayerProvider {
    base_url: String,
    access_key: String,
    retries: usize,
    client: reqwest::Client,
    cache: Arc<CurrencyListCache>,
}

impl CurrencyLayerProvider {
    pub fn new(
        config: &CurrencyLayerConfig,
        access_key: &str,
        cache: Arc<CurrencyListCache>,
    ) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent("xconv/1.0");
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(CurrencyLayerProvider {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            access_key: access_key.to_string(),
            retries: config.retries,
            client,
            cache,
        })
    }

    fn endpoint_url(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Url> {
        let base = format!("{}/{}", self.base_url, endpoint);
        let query = std::iter::once(("access_key", self.access_key.as_str()))
            .chain(params.iter().map(|(k, v)| (*k, v.as_str())));
        Url::parse_with_params(&base, query).with_context(|| format!("Invalid URL: {base}"))
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str, url: Url) -> Result<T> {
        let response = with_retry(
            || async {
                self.client
                    .get(url.clone())
                    .send()
                    .await
                    .map_err(|e| e.without_url())
            },
            self.retries,
            RETRY_DELAY_MS,
        )
        .await
        .map_err(|e| anyhow!("Request error: {:#} for endpoint: {}", e, endpoint))?;

        debug!(status = %response.status(), "Received currencylayer response");

        if !response.status().is_success() {
            bail!(
                "HTTP error: {} for endpoint: {}",
                response.status(),
                endpoint
            );
        }

        let text = response.text().await.map_err(|e| {
            anyhow!(
                "Failed to read response body for {}: {}",
                endpoint,
                e.without_url()
            )
        })?;

        serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", endpoint, e))
    }

    #[instrument(name = "CurrencyLayerList", skip(self))]
    async fn fetch_currency_list(&self) -> Result<Vec<Currency>> {
        let url = self.endpoint_url("list", &[])?;
        debug!("Requesting currency list");

        let data: ListResponse = self.get_json("list", url).await?;
        let currencies = match (data.currencies, data.error) {
            (Some(currencies), _) => currencies,
            (None, Some(error)) => bail!("{}", error.message()),
            (None, None) => bail!("Response has no currencies"),
        };

        let list: Vec<Currency> = currencies
            .into_iter()
            .filter_map(|(code, name)| match code.parse::<CurrencyCode>() {
                Ok(code) => Some(Currency { code, name }),
                Err(e) => {
                    debug!("Skipping currency list entry: {e}");
                    None
                }
            })
            .collect();

        if list.is_empty() {
            bail!("Response has no currencies");
        }
        debug!(count = list.len(), "Fetched currency list");
        Ok(list)
    }

    async fn request_conversion(&self, request: &ConversionRequest) -> Result<ConversionResult> {
        let mut params = vec![
            ("from", request.from().to_string()),
            ("to", request.to().to_string()),
            ("amount", request.amount().to_string()),
        ];
        if let Some(date) = request.date() {
            params.push(("date", date.format("%Y-%m-%d").to_string()));
        }
        let url = self.endpoint_url("convert", &params)?;
        debug!(?params, "Requesting conversion");

        let data: ConvertResponse = self.get_json("convert", url).await?;
        if !data.success {
            let message = data
                .error
                .map_or_else(|| "Unknown provider error".to_string(), |e| e.message());
            return Ok(ConversionResult::domain_failure(message));
        }

        let result = data
            .result
            .ok_or_else(|| anyhow!("No conversion result in response"))?;
        let amount = number_to_decimal(&result)?;
        Ok(ConversionResult::Success {
            amount,
            rate: data.info.and_then(|info| info.quote),
        })
    }
}

#[async_trait]
impl ExchangeRateProvider for CurrencyLayerProvider {
    async fn list_currencies(&self) -> Result<Vec<Currency>> {
        self.cache
            .get_or_fetch(|| self.fetch_currency_list())
            .await
            .context("Currency list unavailable")
    }

    #[instrument(
        name = "CurrencyLayerConvert",
        skip(self, request),
        fields(from = %request.from(), to = %request.to())
    )]
    async fn convert(&self, request: &ConversionRequest) -> ConversionResult {
        match self.request_conversion(request).await {
            Ok(result) => result,
            Err(e) => {
                debug!(error = %e, "Conversion request failed");
                ConversionResult::transport_failure(format!("{e:#}"))
            }
        }
    }
}
