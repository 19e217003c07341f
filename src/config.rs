use crate::cart::{CartSettings, PricingPolicy, MAX_CART_ITEMS};
use anyhow::{Context, Result};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// Environment variable overriding the default `config.toml` location.
pub const CONFIG_PATH_ENV: &str = "COLORBET_CONFIG";

#[derive(Clone, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(30))
    }
}

// Keep the password out of logs.
impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"***")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CartConfig {
    #[serde(default = "default_storage_dir")]
    pub storage_dir: PathBuf,
    #[serde(default = "default_max_items")]
    pub max_items: usize,
    #[serde(default)]
    pub service_charge_rate: Option<f64>,
    #[serde(default)]
    pub min_service_charge: Option<f64>,
}

fn default_storage_dir() -> PathBuf {
    PathBuf::from(".colorbet")
}

fn default_max_items() -> usize {
    MAX_CART_ITEMS
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_dir: default_storage_dir(),
            max_items: default_max_items(),
            service_charge_rate: None,
            min_service_charge: None,
        }
    }
}

impl CartConfig {
    pub fn settings(&self) -> Result<CartSettings> {
        let defaults = PricingPolicy::default();
        let rate = match self.service_charge_rate {
            Some(rate) => to_decimal(rate, "service_charge_rate")?,
            None => defaults.rate,
        };
        let minimum_charge = match self.min_service_charge {
            Some(min) => to_decimal(min, "min_service_charge")?,
            None => defaults.minimum_charge,
        };
        if rate < Decimal::ZERO || minimum_charge < Decimal::ZERO {
            anyhow::bail!("service charge settings must not be negative");
        }
        if self.max_items == 0 {
            anyhow::bail!("max_items must be at least 1");
        }

        Ok(CartSettings {
            max_items: self.max_items,
            pricing: PricingPolicy {
                rate,
                minimum_charge,
            },
        })
    }
}

fn to_decimal(value: f64, field: &str) -> Result<Decimal> {
    Decimal::from_f64(value)
        .map(|d| d.round_dp(4))
        .ok_or_else(|| anyhow::anyhow!("{} is not a valid amount: {}", field, value))
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub cart: CartConfig,
}

impl Config {
    /// Load `config.toml`, or the file named by `COLORBET_CONFIG`.
    pub fn new() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "config.toml".to_string());
        Self::from_path(path)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config_str = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        let config = Self::from_toml_str(&config_str)?;
        info!("Config: {:?}", config);
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents).context("parsing config")?;
        config.cart.settings()?;
        Ok(config)
    }
}
