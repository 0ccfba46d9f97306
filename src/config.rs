use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::theme::THEME_NAMES;
use crate::types::CURRENCIES;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_refresh")]
    pub refresh_interval_secs: u64,
    #[serde(default = "default_chart_days")]
    pub chart_days: u32,
    #[serde(default = "default_list_height")]
    pub list_height: u16,
    #[serde(default = "default_item_height")]
    pub item_height: u16,
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
}

fn default_currency() -> String {
    "usd".to_string()
}

fn default_theme() -> String {
    "dark".to_string()
}

fn default_refresh() -> u64 {
    60
}

fn default_chart_days() -> u32 {
    7
}

fn default_list_height() -> u16 {
    12
}

fn default_item_height() -> u16 {
    1
}

fn default_placeholder() -> String {
    "Select coins...".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            theme: default_theme(),
            refresh_interval_secs: default_refresh(),
            chart_days: default_chart_days(),
            list_height: default_list_height(),
            item_height: default_item_height(),
            placeholder: default_placeholder(),
        }
    }
}

impl Config {
    /// Loads the default config file, writing defaults if it does not exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let cfg: Config = serde_yaml::from_str(&contents)
                .with_context(|| format!("Invalid config {}", path.display()))?;
            Ok(cfg.sanitized())
        } else {
            let cfg = Config::default();
            cfg.save_to(path)?;
            Ok(cfg)
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml)?;
        Ok(())
    }

    /// Clamps values into the ranges the dashboard supports.
    pub fn sanitized(mut self) -> Self {
        self.currency = self.currency.to_lowercase();
        if !CURRENCIES.contains(&self.currency.as_str()) {
            self.currency = default_currency();
        }
        if !THEME_NAMES.contains(&self.theme.as_str()) {
            self.theme = default_theme();
        }
        if self.refresh_interval_secs < 30 {
            self.refresh_interval_secs = 30;
        }
        if ![1, 7, 30].contains(&self.chart_days) {
            self.chart_days = default_chart_days();
        }
        self.list_height = self.list_height.max(1);
        self.item_height = self.item_height.max(1);
        self
    }

    pub fn config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("coinboard");
        path.push("config.yaml");
        path
    }
}
