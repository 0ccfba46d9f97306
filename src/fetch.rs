use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context;
use futures::future::try_join_all;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use crate::api::MarketData;
use crate::store::Stores;
use crate::types::{Candidate, PriceSnapshot, Series};

/// Outcome of one coordinator call, applied to the stores by the event loop.
#[derive(Debug)]
pub enum FetchResult {
    CoinList(Result<Vec<Candidate>, String>),
    Prices(Result<PriceSnapshot, String>),
    /// Tagged with the range it was requested for.
    Charts {
        days: u32,
        result: Result<HashMap<String, Series>, String>,
    },
}

/// Issues market data calls in the background and reports back on a channel.
///
/// Every trigger issues a fresh call: nothing is de-duplicated, retried or
/// cancelled, and whichever result is applied last wins.
pub struct Fetcher<C: MarketData> {
    client: Arc<C>,
    currency: String,
    tx: UnboundedSender<FetchResult>,
}

impl<C: MarketData> Fetcher<C> {
    pub fn new(client: C, currency: &str) -> (Self, UnboundedReceiver<FetchResult>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let fetcher = Self {
            client: Arc::new(client),
            currency: currency.to_lowercase(),
            tx,
        };
        (fetcher, rx)
    }

    /// Loads the coin list the first time it is seen empty, never again.
    pub fn ensure_coin_list(&self, stores: &mut Stores) {
        if stores.coins.data.is_empty() && !stores.coins.loading {
            self.load_coin_list(stores);
        }
    }

    pub fn load_coin_list(&self, stores: &mut Stores) {
        stores.coins.begin();
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client
                .coin_list()
                .await
                .map_err(|e| format!("Coin list: {:#}", e));
            let _ = tx.send(FetchResult::CoinList(result));
        });
    }

    pub fn load_prices(&self, stores: &mut Stores, ids: &[String]) {
        stores.prices.begin();
        if ids.is_empty() {
            stores.prices.succeed(PriceSnapshot::new());
            return;
        }
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        let ids = ids.to_vec();
        let currency = self.currency.clone();
        tokio::spawn(async move {
            let result = client
                .simple_price(&ids, &currency)
                .await
                .map_err(|e| format!("Prices: {:#}", e));
            let _ = tx.send(FetchResult::Prices(result));
        });
    }

    /// One batch of concurrent chart calls; a single failure fails the batch.
    pub fn load_charts(&self, stores: &mut Stores, ids: &[String], days: u32) {
        if ids.is_empty() {
            return;
        }
        stores.charts.begin();
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        let ids = ids.to_vec();
        let currency = self.currency.clone();
        debug!(count = ids.len(), days, "chart batch");
        tokio::spawn(async move {
            let client = &*client;
            let currency = currency.as_str();
            let calls = ids.iter().map(move |id| async move {
                let series = client
                    .market_chart(id, currency, days)
                    .await
                    .with_context(|| format!("market chart for {}", id))?;
                Ok::<_, anyhow::Error>((id.clone(), series))
            });
            let result = try_join_all(calls)
                .await
                .map(|pairs| pairs.into_iter().collect::<HashMap<_, _>>())
                .map_err(|e| format!("Charts: {:#}", e));
            let _ = tx.send(FetchResult::Charts { days, result });
        });
    }
}

impl Stores {
    /// Writes a coordinator result into its store.
    pub fn apply(&mut self, result: FetchResult) {
        match result {
            FetchResult::CoinList(Ok(coins)) => {
                info!(count = coins.len(), "coin list loaded");
                self.coins.succeed(coins);
            }
            FetchResult::Prices(Ok(prices)) => {
                debug!(count = prices.len(), "prices loaded");
                self.prices.succeed(prices);
            }
            FetchResult::Charts { days, result: Ok(charts) } => {
                debug!(count = charts.len(), days, "charts loaded");
                self.charts.merge(charts);
            }
            FetchResult::CoinList(Err(msg)) => {
                warn!(error = %msg, "coin list fetch failed");
                self.coins.fail(msg);
            }
            FetchResult::Prices(Err(msg)) => {
                warn!(error = %msg, "price fetch failed");
                self.prices.fail(msg);
            }
            FetchResult::Charts { days, result: Err(msg) } => {
                warn!(error = %msg, days, "chart batch failed");
                self.charts.fail(msg);
            }
        }
    }
}
