use crate::query;
use crate::series;

use std::time::Duration;
use tracing::{debug, info};

pub const COINGECKO_BASE: &str = "https://api.coingecko.com/api/v3";
const COIN_ID: &str = "bitcoin";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// One-shot client for the CoinGecko `market_chart/range` endpoint.
#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    http: reqwest::Client,
    base_url: String,
    vs_currency: String,
}

impl CoinGeckoClient {
    pub fn new(base_url: &str, vs_currency: &str) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build http client: {}", e))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            vs_currency: vs_currency.trim().to_lowercase(),
        })
    }

    /// Builds the range query URL for a window in epoch seconds.
    pub fn range_url(&self, window: &query::QueryWindow) -> String {
        format!(
            "{}/coins/{}/market_chart/range?vs_currency={}&from={}&to={}",
            self.base_url, COIN_ID, self.vs_currency, window.from, window.to
        )
    }

    async fn get_range(&self, window: query::QueryWindow) -> anyhow::Result<series::RawSeries> {
        let url = self.range_url(&window);
        debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("Request to {} failed: {}", url, e))?
            .error_for_status()
            .map_err(|e| anyhow::anyhow!("CoinGecko returned an error: {}", e))?;

        let raw: series::RawSeries = response
            .json()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to decode CoinGecko payload: {}", e))?;

        info!(samples = raw.len(), "Fetched price history");
        Ok(raw)
    }
}

impl query::PriceHistorySource for CoinGeckoClient {
    fn fetch_range(
        &self,
        window: &query::QueryWindow,
    ) -> impl std::future::Future<Output = anyhow::Result<series::RawSeries>> + Send {
        self.get_range(*window)
    }
}
