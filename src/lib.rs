//! # colorbet-rs
//!
//! Client library for a colour/number trading backend: a persistent bet slip
//! with service-charge pricing and wallet validation, batch checkout, and an
//! async HTTP client for the wallet, round and order endpoints.
//!
//! ## Quick Start
//!
//! ```no_run
//! use colorbet_rs::{checkout, Cart, Config, FileStore, GameType, NewSelection, TradingApiClient, Wallet};
//! use rust_decimal::Decimal;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::new()?;
//! let store = FileStore::new(&config.cart.storage_dir);
//!
//! let mut client = TradingApiClient::new(config.clone())?;
//! client.login().await?;
//!
//! let mut cart = Cart::load(store, config.cart.settings()?);
//! cart.add_item(NewSelection::new("r1", GameType::Number, ["7", "8"], Decimal::from(20)))?;
//!
//! let mut wallet = Wallet::new();
//! wallet.refresh(&client).await?;
//!
//! let receipt = checkout(&mut cart, &mut wallet, &client).await?;
//! println!("placed {} orders", receipt.orders.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! ```toml
//! [api]
//! base_url = "https://api.example.com/api"
//! username = "you@example.com"
//! password = "secret"
//!
//! [cart]
//! storage_dir = ".colorbet"
//! ```

pub mod api_client;
pub mod cart;
pub mod cart_store;
pub mod checkout;
pub mod config;
pub mod dto;
pub mod error;
pub mod gateway;
pub mod retry;
pub mod storage;
pub mod wallet;

// Re-export commonly used types at the crate root
pub use api_client::TradingApiClient;
pub use cart::{Cart, CartSelection, CartSettings, CartSummary, NewSelection, PricingPolicy};
pub use checkout::{checkout, CheckoutReceipt};
pub use config::Config;
pub use dto::*;
pub use error::{ApiError, CartError, CheckoutError};
pub use gateway::TradingGateway;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use wallet::Wallet;
