use crate::core::error::{BotError, Result};
use crate::core::rates::{RateHistory, RateProvider, RateSnapshot};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, instrument};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Client for exchangeratesapi.io style endpoints: `GET /latest?base=` and
/// `GET /history?start_at=&end_at=&base=&symbols=`.
pub struct ExchangeRatesApiProvider {
    base_url: String,
    client: reqwest::Client,
}

impl ExchangeRatesApiProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("ratebot/1.0")
            .timeout(timeout)
            .build()
            .map_err(|e| BotError::ProviderUnavailable(format!("HTTP client setup: {e}")))?;
        Ok(ExchangeRatesApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!("Requesting rates from {} with {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| BotError::ProviderUnavailable(format!("Request error: {e} URL: {url}")))?;

        if response.status() != reqwest::StatusCode::OK {
            return Err(BotError::ProviderUnavailable(format!(
                "HTTP error: {} for {}",
                response.status(),
                url
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| BotError::ProviderUnavailable(format!("Failed to read response: {e}")))?;
        serde_json::from_str(&text).map_err(|e| {
            BotError::ProviderUnavailable(format!("Failed to parse JSON response from {url}: {e}"))
        })
    }
}

/// Rates must be positive and finite to be usable for conversion.
fn check_rate(currency: &str, rate: f64) -> Result<f64> {
    if rate.is_finite() && rate > 0.0 {
        Ok(rate)
    } else {
        Err(BotError::ProviderUnavailable(format!(
            "Invalid rate {rate} for {currency}"
        )))
    }
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    rates: BTreeMap<String, f64>,
}

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    rates: BTreeMap<String, BTreeMap<String, f64>>,
}

#[async_trait]
impl RateProvider for ExchangeRatesApiProvider {
    #[instrument(name = "LatestRatesFetch", skip(self))]
    async fn fetch_latest(&self, base: &str) -> Result<RateSnapshot> {
        let data: LatestResponse = self.get_json("latest", &[("base", base)]).await?;
        let rates: RateSnapshot = data
            .rates
            .into_iter()
            .map(|(currency, rate)| {
                check_rate(&currency, rate).map(|rate| (currency.to_uppercase(), rate))
            })
            .collect::<Result<_>>()?;
        debug!(count = rates.len(), "Received latest rates");
        Ok(rates)
    }

    #[instrument(name = "HistoryRatesFetch", skip(self))]
    async fn fetch_history(
        &self,
        base: &str,
        quote: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RateHistory> {
        let start_at = start.format(DATE_FORMAT).to_string();
        let end_at = end.format(DATE_FORMAT).to_string();
        let data: HistoryResponse = self
            .get_json(
                "history",
                &[
                    ("start_at", start_at.as_str()),
                    ("end_at", end_at.as_str()),
                    ("base", base),
                    ("symbols", quote),
                ],
            )
            .await?;

        let mut history = RateHistory::new();
        for (date, rates) in data.rates {
            let date = NaiveDate::parse_from_str(&date, DATE_FORMAT).map_err(|e| {
                BotError::ProviderUnavailable(format!("Unexpected date {date:?} in history: {e}"))
            })?;
            for (currency, rate) in &rates {
                check_rate(currency, *rate)?;
            }
            history.insert(date, rates);
        }
        debug!(days = history.len(), "Received rate history");
        Ok(history)
    }
}
