pub mod coingecko;

use std::future::Future;

use anyhow::Result;

use crate::types::{Candidate, PriceSnapshot, Series};

pub use coingecko::CoinGeckoClient;

/// The three read-only market data calls the dashboard makes.
///
/// Futures are `Send` so the fetch coordinators can run them on the tokio
/// runtime while the event loop keeps drawing.
pub trait MarketData: Send + Sync + 'static {
    fn coin_list(&self) -> impl Future<Output = Result<Vec<Candidate>>> + Send;

    fn simple_price(
        &self,
        ids: &[String],
        vs_currency: &str,
    ) -> impl Future<Output = Result<PriceSnapshot>> + Send;

    /// Price series of `/coins/{id}/market_chart`.
    fn market_chart(
        &self,
        coin_id: &str,
        vs_currency: &str,
        days: u32,
    ) -> impl Future<Output = Result<Series>> + Send;
}
