use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::MarketData;
use crate::types::{Candidate, MarketChart, PriceSnapshot, Series};

const BASE_URL: &str = "https://api.coingecko.com/api/v3";
const TIMEOUT: Duration = Duration::from_secs(15);

pub struct CoinGeckoClient {
    client: Client,
    base_url: String,
}

impl CoinGeckoClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(TIMEOUT)
            .user_agent("Mozilla/5.0 (compatible; coinboard)")
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "GET");

        let resp = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .context("Failed to reach CoinGecko API")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("CoinGecko API error {}: {}", status, body);
        }

        let text = resp.text().await.context("Failed to read response body")?;
        match serde_json::from_str(&text) {
            Ok(v) => Ok(v),
            Err(e) => anyhow::bail!(
                "Failed to parse response: {} | response: {}",
                e,
                text.chars().take(300).collect::<String>()
            ),
        }
    }
}

pub fn simple_price_path(ids: &[String], vs_currency: &str) -> String {
    format!(
        "/simple/price?ids={}&vs_currencies={}&include_24hr_change=true",
        ids.join(","),
        vs_currency.to_lowercase()
    )
}

pub fn market_chart_path(coin_id: &str, vs_currency: &str, days: u32) -> String {
    format!(
        "/coins/{}/market_chart?vs_currency={}&days={}",
        coin_id,
        vs_currency.to_lowercase(),
        days
    )
}

impl MarketData for CoinGeckoClient {
    async fn coin_list(&self) -> Result<Vec<Candidate>> {
        let coins: Vec<Candidate> = self.get("/coins/list").await?;
        debug!(count = coins.len(), "coin list decoded");
        Ok(coins)
    }

    async fn simple_price(&self, ids: &[String], vs_currency: &str) -> Result<PriceSnapshot> {
        self.get(&simple_price_path(ids, vs_currency)).await
    }

    async fn market_chart(&self, coin_id: &str, vs_currency: &str, days: u32) -> Result<Series> {
        let chart: MarketChart = self.get(&market_chart_path(coin_id, vs_currency, days)).await?;
        Ok(chart.prices)
    }
}
