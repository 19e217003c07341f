//! Turning the cart into one batch order.
//!
//! [`checkout`] runs the steps in a fixed order: refuse an empty cart, check
//! the wallet, flatten the selections, submit, and only after the backend
//! accepts the batch clear the cart and refresh wallet and rounds. Every
//! failure before acceptance leaves the cart exactly as it was, so the user
//! can simply try again.
//!
//! The function holds `&mut Cart` across the submission, so nothing else can
//! mutate the cart while a batch is in flight.

use crate::cart::{Cart, CartSelection, CartSummary};
use crate::dto::{BatchTradeRequest, Order, Round, TradeEntry, TradeType};
use crate::error::{CartError, CheckoutError};
use crate::gateway::TradingGateway;
use crate::storage::KeyValueStore;
use crate::wallet::Wallet;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutReceipt {
    /// The cart as it was submitted.
    pub submitted: CartSummary,
    pub orders: Vec<Order>,
    pub wallet_balance: Option<Decimal>,
    /// `None` when the post-checkout rounds refresh failed.
    pub rounds: Option<Vec<Round>>,
}

/// Split `amount` evenly over `parts`, to the paisa. The last part takes the
/// remainder so the parts always sum to `amount`.
fn split_amount(amount: Decimal, parts: usize) -> Vec<Decimal> {
    if parts <= 1 {
        return vec![amount];
    }
    let share = (amount / Decimal::from(parts))
        .round_dp_with_strategy(2, RoundingStrategy::ToZero);
    let mut shares = vec![share; parts - 1];
    shares.push(amount - share * Decimal::from(parts - 1));
    shares
}

/// Flatten selections into one trade per option.
///
/// A selection's amount is its total stake, divided evenly over its options.
pub fn build_batch_request(selections: &[CartSelection]) -> BatchTradeRequest {
    let trades = selections
        .iter()
        .flat_map(|selection| {
            let trade_type = TradeType::from(selection.game_type);
            selection
                .options
                .iter()
                .zip(split_amount(selection.amount, selection.options.len()))
                .map(move |(option, amount)| TradeEntry {
                    round_id: selection.round_id.clone(),
                    trade_type,
                    selection: option.clone(),
                    amount,
                })
        })
        .collect();

    BatchTradeRequest { trades }
}

/// Validate, submit and settle the cart.
///
/// The wallet must already hold a balance (see [`Wallet::refresh`]); the
/// validation steps never touch the network.
pub async fn checkout<S, G>(
    cart: &mut Cart<S>,
    wallet: &mut Wallet,
    gateway: &G,
) -> Result<CheckoutReceipt, CheckoutError>
where
    S: KeyValueStore,
    G: TradingGateway,
{
    let summary = cart.summary();
    if summary.is_empty() {
        return Err(CartError::EmptyCart.into());
    }

    let balance = wallet.balance().ok_or(CheckoutError::BalanceUnavailable)?;
    cart.validate_cart_balance(balance)?;

    let request = build_batch_request(&summary.items);
    info!(
        "Submitting {} trades from {} selections (payable {})",
        request.trades.len(),
        summary.total_items,
        summary.final_amount
    );

    let result = gateway.submit_batch(&request).await?;

    // Accepted: from here on nothing may fail the checkout.
    cart.clear_cart();

    if let Some(update) = &result.wallet {
        wallet.apply(update);
    }
    if let Err(err) = wallet.refresh(gateway).await {
        warn!("Wallet refresh after checkout failed: {}", err);
    }

    let rounds = match gateway.fetch_rounds(None).await {
        Ok(rounds) => Some(rounds),
        Err(err) => {
            warn!("Rounds refresh after checkout failed: {}", err);
            None
        }
    };

    info!("Checkout complete: {} orders placed", result.orders.len());

    Ok(CheckoutReceipt {
        submitted: summary,
        orders: result.orders,
        wallet_balance: wallet.balance(),
        rounds,
    })
}
