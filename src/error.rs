//! Error types for the cart, the HTTP layer and checkout.

use rust_decimal::Decimal;
use thiserror::Error;

/// Cart validation failures.
///
/// The `Display` text is meant to be shown to the user as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    #[error("Cart is full. Maximum {max} items allowed.")]
    CartFull { max: usize },

    #[error("Please select at least one option")]
    NoOptions,

    #[error("Amount must be greater than 0")]
    InvalidAmount,

    #[error("Amount must be at least ₹{minimum:.2} (₹0.01 per option)")]
    StakeTooSmall { minimum: Decimal },

    #[error("Amount is too large")]
    AmountTooLarge,

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Insufficient balance. You need ₹{shortfall:.2} more")]
    InsufficientBalance { shortfall: Decimal },
}

/// HTTP-layer errors from the trading API.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Response carried no data")]
    MissingData,

    #[error("Not logged in")]
    NotLoggedIn,

    #[error("Invalid response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Transport failures and 5xx responses are worth another attempt;
    /// everything else will fail the same way again.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Http(err) => !err.is_decode() && !err.is_builder(),
            ApiError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error(transparent)]
    Cart(#[from] CartError),

    #[error("Wallet balance has not been loaded")]
    BalanceUnavailable,

    #[error("Checkout failed: {0}")]
    Api(#[from] ApiError),
}
