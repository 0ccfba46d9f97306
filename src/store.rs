use std::collections::HashMap;

use crate::types::{Candidate, PriceSnapshot, Series};

/// Last fetched value plus the loading flag and error slot around it.
#[derive(Debug, Clone, Default)]
pub struct Store<T> {
    pub data: T,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Store<T> {
    pub fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn succeed(&mut self, data: T) {
        self.data = data;
        self.loading = false;
    }

    pub fn fail(&mut self, msg: String) {
        self.error = Some(msg);
        self.loading = false;
    }
}

pub type CoinListStore = Store<Vec<Candidate>>;
pub type PriceStore = Store<PriceSnapshot>;
pub type ChartStore = Store<HashMap<String, Series>>;

impl ChartStore {
    /// Keyed merge: ids in `batch` replace their entries, other ids stay.
    pub fn merge(&mut self, batch: HashMap<String, Series>) {
        self.data.extend(batch);
        self.loading = false;
    }

    pub fn series(&self, coin_id: &str) -> Option<&Series> {
        self.data.get(coin_id)
    }
}

impl PriceStore {
    pub fn price(&self, coin_id: &str, currency: &str) -> Option<f64> {
        self.data.get(coin_id)?.get(currency).copied()
    }

    pub fn change_24h(&self, coin_id: &str, currency: &str) -> Option<f64> {
        self.data
            .get(coin_id)?
            .get(&format!("{}_24h_change", currency))
            .copied()
    }
}

impl CoinListStore {
    pub fn find(&self, coin_id: &str) -> Option<&Candidate> {
        self.data.iter().find(|c| c.id == coin_id)
    }
}

/// The three stores of the dashboard, created with the app and dropped with it.
#[derive(Debug, Default)]
pub struct Stores {
    pub coins: CoinListStore,
    pub prices: PriceStore,
    pub charts: ChartStore,
}
