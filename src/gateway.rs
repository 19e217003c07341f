use crate::dto::{BatchTradeRequest, BatchTradeResult, GameType, Round, WalletBalance};
use crate::error::ApiError;

/// The slice of the trading backend that checkout and the wallet depend on.
///
/// [`crate::TradingApiClient`] is the HTTP implementation; tests substitute
/// their own.
#[allow(async_fn_in_trait)]
pub trait TradingGateway {
    async fn fetch_balance(&self) -> Result<WalletBalance, ApiError>;

    async fn submit_batch(&self, request: &BatchTradeRequest)
        -> Result<BatchTradeResult, ApiError>;

    async fn fetch_rounds(&self, game_type: Option<GameType>) -> Result<Vec<Round>, ApiError>;
}
