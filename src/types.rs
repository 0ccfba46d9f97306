use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

fn non_empty<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Option::<String>::deserialize(d).map(|v| v.filter(|s| !s.trim().is_empty()))
}

/// One selectable coin from `/coins/list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "non_empty")]
    pub symbol: Option<String>,
}

impl Candidate {
    pub fn new(id: &str, name: &str, symbol: Option<&str>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            symbol: symbol.filter(|s| !s.is_empty()).map(str::to_string),
        }
    }

    pub fn ticker(&self) -> String {
        self.symbol
            .as_deref()
            .map(str::to_uppercase)
            .unwrap_or_default()
    }
}

/// `[timestamp_ms, value]` as the API sends it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint(pub f64, pub f64);

impl SeriesPoint {
    pub fn timestamp(self) -> f64 {
        self.0
    }

    pub fn value(self) -> f64 {
        self.1
    }
}

pub type Series = Vec<SeriesPoint>;

/// coin id -> { "usd": price, "usd_24h_change": pct, ... }
pub type PriceSnapshot = HashMap<String, HashMap<String, f64>>;

/// `/coins/{id}/market_chart` body. Caps and volumes are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarketChart {
    #[serde(default)]
    pub prices: Series,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Prices,
    Charts,
}

impl Tab {
    pub fn index(self) -> usize {
        match self {
            Tab::Prices => 0,
            Tab::Charts => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tab::Prices => "Prices",
            Tab::Charts => "Charts",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Tab::Prices => Tab::Charts,
            Tab::Charts => Tab::Prices,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartView {
    Day1,
    Day7,
    Day30,
}

impl ChartView {
    pub fn from_days(days: u32) -> Self {
        match days {
            0 | 1 => ChartView::Day1,
            2..=7 => ChartView::Day7,
            _ => ChartView::Day30,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ChartView::Day1 => "1D",
            ChartView::Day7 => "7D",
            ChartView::Day30 => "30D",
        }
    }

    pub fn days(self) -> u32 {
        match self {
            ChartView::Day1 => 1,
            ChartView::Day7 => 7,
            ChartView::Day30 => 30,
        }
    }

    pub fn next(self) -> Self {
        match self {
            ChartView::Day1 => ChartView::Day7,
            ChartView::Day7 => ChartView::Day30,
            ChartView::Day30 => ChartView::Day1,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            ChartView::Day1 => ChartView::Day30,
            ChartView::Day7 => ChartView::Day1,
            ChartView::Day30 => ChartView::Day7,
        }
    }
}

/// Y axis of the chart page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartScale {
    Price,
    Percent,
}

impl ChartScale {
    pub fn toggle(self) -> Self {
        match self {
            ChartScale::Price => ChartScale::Percent,
            ChartScale::Percent => ChartScale::Price,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ChartScale::Price => "price",
            ChartScale::Percent => "% change",
        }
    }
}

pub const CURRENCIES: &[&str] = &[
    "usd", "eur", "gbp", "jpy", "aud", "cad", "chf", "cny", "krw", "inr", "brl", "btc", "eth",
];

pub fn currency_symbol(code: &str) -> &'static str {
    match code {
        "usd" | "aud" | "cad" => "$",
        "eur" => "\u{20ac}",
        "gbp" => "\u{a3}",
        "jpy" | "cny" | "krw" => "\u{a5}",
        "chf" => "Fr",
        "inr" => "\u{20b9}",
        "brl" => "R$",
        "btc" => "\u{20bf}",
        "eth" => "\u{39e}",
        _ => "$",
    }
}
