use crate::dto::WalletBalance;
use crate::error::ApiError;
use crate::gateway::TradingGateway;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::debug;

/// Last known wallet balance. Read-only for the cart; refreshed from the backend.
#[derive(Debug, Clone, Default)]
pub struct Wallet {
    balance: Option<Decimal>,
    currency: Option<String>,
    last_refreshed: Option<DateTime<Utc>>,
}

impl Wallet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_balance(balance: Decimal) -> Self {
        Self {
            balance: Some(balance),
            currency: None,
            last_refreshed: Some(Utc::now()),
        }
    }

    pub fn balance(&self) -> Option<Decimal> {
        self.balance
    }

    pub fn currency(&self) -> Option<&str> {
        self.currency.as_deref()
    }

    pub fn last_refreshed(&self) -> Option<DateTime<Utc>> {
        self.last_refreshed
    }

    pub fn apply(&mut self, update: &WalletBalance) {
        self.balance = Some(update.balance);
        if update.currency.is_some() {
            self.currency = update.currency.clone();
        }
        self.last_refreshed = Some(Utc::now());
        debug!("Wallet balance now {}", update.balance);
    }

    pub async fn refresh<G: TradingGateway>(&mut self, gateway: &G) -> Result<Decimal, ApiError> {
        let update = gateway.fetch_balance().await?;
        self.apply(&update);
        Ok(update.balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::{BatchTradeRequest, BatchTradeResult, GameType, Round};
    use rust_decimal_macros::dec;

    struct FixedBalance(Decimal);

    impl TradingGateway for FixedBalance {
        async fn fetch_balance(&self) -> Result<WalletBalance, ApiError> {
            Ok(WalletBalance {
                balance: self.0,
                currency: Some("INR".to_string()),
            })
        }

        async fn submit_batch(
            &self,
            _request: &BatchTradeRequest,
        ) -> Result<BatchTradeResult, ApiError> {
            unreachable!("wallet never submits orders")
        }

        async fn fetch_rounds(&self, _game_type: Option<GameType>) -> Result<Vec<Round>, ApiError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_new_wallet_has_no_balance() {
        let wallet = Wallet::new();
        assert_eq!(wallet.balance(), None);
        assert!(wallet.last_refreshed().is_none());
    }

    #[tokio::test]
    async fn test_refresh_updates_balance() {
        let mut wallet = Wallet::new();
        let balance = wallet.refresh(&FixedBalance(dec!(250.75))).await.unwrap();

        assert_eq!(balance, dec!(250.75));
        assert_eq!(wallet.balance(), Some(dec!(250.75)));
        assert_eq!(wallet.currency(), Some("INR"));
        assert!(wallet.last_refreshed().is_some());
    }

    #[test]
    fn test_apply_keeps_known_currency() {
        let mut wallet = Wallet::new();
        wallet.apply(&WalletBalance {
            balance: dec!(10),
            currency: Some("INR".to_string()),
        });
        wallet.apply(&WalletBalance {
            balance: dec!(4),
            currency: None,
        });
        assert_eq!(wallet.balance(), Some(dec!(4)));
        assert_eq!(wallet.currency(), Some("INR"));
    }
}
