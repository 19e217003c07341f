use super::common::{GameType, TradeType};
use super::wallet::WalletBalance;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RoundStatus {
    Upcoming,
    Active,
    Closed,
    Settled,
}

/// A time-boxed betting event run by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round_number: Option<u64>,
    pub game_type: GameType,
    pub status: RoundStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
}

impl Round {
    pub fn is_open(&self) -> bool {
        self.status == RoundStatus::Active
    }
}

/// One line of a batch order: a single option at a single stake.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TradeEntry {
    pub round_id: String,
    pub trade_type: TradeType,
    pub selection: String,
    #[serde(with = "super::decimal_serde")]
    pub amount: Decimal,
}

/// Sent as a bare JSON array.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(transparent)]
pub struct BatchTradeRequest {
    pub trades: Vec<TradeEntry>,
}

impl BatchTradeRequest {
    pub fn total_amount(&self) -> Decimal {
        self.trades.iter().map(|t| t.amount).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct BatchTradeResult {
    #[serde(default)]
    pub orders: Vec<Order>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet: Option<WalletBalance>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Won,
    Lost,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub round_id: String,
    pub trade_type: TradeType,
    pub selection: String,
    #[serde(with = "super::decimal_serde")]
    pub amount: Decimal,
    pub status: OrderStatus,
    #[serde(
        with = "super::decimal_serde::option",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub payout: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}
