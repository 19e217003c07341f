//! The bet slip.
//!
//! [`Cart`] owns the pending selection list, persists it through a
//! [`CartStore`] after every mutation and derives a fresh [`CartSummary`]
//! on demand. Validation failures come back as [`CartError`] values whose
//! `Display` text is shown to the user.

use crate::cart_store::CartStore;
use crate::dto::GameType;
use crate::error::CartError;
use crate::storage::KeyValueStore;
use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Maximum number of selections a cart may hold.
pub const MAX_CART_ITEMS: usize = 20;

/// One pending bet line. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartSelection {
    pub id: String,
    pub round_id: String,
    pub game_type: GameType,
    pub options: Vec<String>,
    #[serde(with = "crate::dto::decimal_serde")]
    pub amount: Decimal,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

/// Smallest stake that still leaves every option at least one paisa.
pub fn minimum_stake(options: usize) -> Decimal {
    Decimal::new(options as i64, 2)
}

impl CartSelection {
    pub(crate) fn is_valid(&self) -> bool {
        !self.id.is_empty()
            && !self.options.is_empty()
            && self.amount > Decimal::ZERO
            && self.amount >= minimum_stake(self.options.len())
    }
}

/// A candidate selection handed to [`Cart::add_item`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewSelection {
    pub round_id: String,
    pub game_type: GameType,
    pub options: Vec<String>,
    pub amount: Decimal,
}

impl NewSelection {
    pub fn new<I, O>(
        round_id: impl Into<String>,
        game_type: GameType,
        options: I,
        amount: Decimal,
    ) -> Self
    where
        I: IntoIterator<Item = O>,
        O: Into<String>,
    {
        Self {
            round_id: round_id.into(),
            game_type,
            options: options.into_iter().map(Into::into).collect(),
            amount,
        }
    }
}

/// Service charge rule: a percentage of the gross with a fixed floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingPolicy {
    pub rate: Decimal,
    pub minimum_charge: Decimal,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            rate: Decimal::new(10, 2),
            minimum_charge: Decimal::new(5, 0),
        }
    }
}

impl PricingPolicy {
    /// Zero for an empty cart, otherwise `max(round(gross * rate, 2), minimum)`.
    ///
    /// Saturates at `Decimal::MAX`; a [`Cart`] never holds a gross that gets there.
    pub fn service_charge(&self, gross: Decimal) -> Decimal {
        self.checked_service_charge(gross).unwrap_or(Decimal::MAX)
    }

    /// `None` when `gross * rate` overflows.
    pub fn checked_service_charge(&self, gross: Decimal) -> Option<Decimal> {
        if gross.is_zero() {
            return Some(Decimal::ZERO);
        }
        let charge = gross
            .checked_mul(self.rate)?
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        Some(charge.max(self.minimum_charge))
    }

    /// Gross plus service charge for `amounts`, or `None` on overflow.
    pub(crate) fn checked_final_amount<I>(&self, amounts: I) -> Option<Decimal>
    where
        I: IntoIterator<Item = Decimal>,
    {
        let gross = amounts
            .into_iter()
            .try_fold(Decimal::ZERO, |sum, amount| sum.checked_add(amount))?;
        gross.checked_add(self.checked_service_charge(gross)?)
    }
}

/// Service charge under the default pricing (10%, ₹5 floor).
pub fn service_charge(gross: Decimal) -> Decimal {
    PricingPolicy::default().service_charge(gross)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartSettings {
    pub max_items: usize,
    pub pricing: PricingPolicy,
}

impl Default for CartSettings {
    fn default() -> Self {
        Self {
            max_items: MAX_CART_ITEMS,
            pricing: PricingPolicy::default(),
        }
    }
}

/// Derived view over the selection list. Never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct CartSummary {
    pub items: Vec<CartSelection>,
    pub total_items: usize,
    pub total_amount: Decimal,
    pub service_charge: Decimal,
    pub final_amount: Decimal,
}

impl CartSummary {
    /// Totals saturate instead of overflowing.
    pub fn compute(items: &[CartSelection], pricing: &PricingPolicy) -> Self {
        let total_amount = items
            .iter()
            .fold(Decimal::ZERO, |sum, s| sum.saturating_add(s.amount));
        let service_charge = pricing.service_charge(total_amount);
        Self {
            items: items.to_vec(),
            total_items: items.len(),
            total_amount,
            service_charge,
            final_amount: total_amount.saturating_add(service_charge),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_items == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddedToCart {
    pub item: CartSelection,
    pub message: String,
}

pub struct Cart<S: KeyValueStore> {
    store: CartStore<S>,
    items: Vec<CartSelection>,
    settings: CartSettings,
}

impl<S: KeyValueStore> Cart<S> {
    /// Load the persisted cart, or start empty.
    ///
    /// Stored selections that would push the payable total past what a
    /// `Decimal` can hold are dropped, and the trimmed list is written back.
    pub fn load(store: S, settings: CartSettings) -> Self {
        let store = CartStore::new(store);
        let stored = store.load();
        let total = stored.len();

        let mut items: Vec<CartSelection> = Vec::with_capacity(total);
        for selection in stored {
            let fits = settings
                .pricing
                .checked_final_amount(items.iter().chain([&selection]).map(|s| s.amount))
                .is_some();
            if fits {
                items.push(selection);
            }
        }
        if items.len() != total {
            warn!(
                "Dropped {} stored selections whose total overflows",
                total - items.len()
            );
            store.save(&items);
        }

        Self {
            store,
            items,
            settings,
        }
    }

    pub fn with_defaults(store: S) -> Self {
        Self::load(store, CartSettings::default())
    }

    pub fn settings(&self) -> &CartSettings {
        &self.settings
    }

    pub fn items(&self) -> &[CartSelection] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn summary(&self) -> CartSummary {
        CartSummary::compute(&self.items, &self.settings.pricing)
    }

    /// Append a selection. Checks run in order and the first failure wins:
    /// capacity, options, amount, per-option minimum, overflow of the payable
    /// total. Duplicates of an existing round/option are accepted as separate
    /// lines.
    pub fn add_item(&mut self, candidate: NewSelection) -> Result<AddedToCart, CartError> {
        if self.items.len() >= self.settings.max_items {
            return Err(CartError::CartFull {
                max: self.settings.max_items,
            });
        }
        if candidate.options.is_empty() {
            return Err(CartError::NoOptions);
        }
        if candidate.amount <= Decimal::ZERO {
            return Err(CartError::InvalidAmount);
        }
        let minimum = minimum_stake(candidate.options.len());
        if candidate.amount < minimum {
            return Err(CartError::StakeTooSmall { minimum });
        }
        let amounts = self.items.iter().map(|s| s.amount);
        if self
            .settings
            .pricing
            .checked_final_amount(amounts.chain([candidate.amount]))
            .is_none()
        {
            return Err(CartError::AmountTooLarge);
        }

        let now = Utc::now();
        // Stored with millisecond precision; truncate so a reload compares equal.
        let timestamp = DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now);

        let item = CartSelection {
            id: self.next_id(&timestamp),
            round_id: candidate.round_id,
            game_type: candidate.game_type,
            options: candidate.options,
            amount: candidate.amount,
            timestamp,
        };

        self.items.push(item.clone());
        self.store.save(&self.items);
        info!(
            "Added {} selection {:?} for round {} at {} (cart now {} items)",
            item.game_type,
            item.options,
            item.round_id,
            item.amount,
            self.items.len()
        );

        Ok(AddedToCart {
            item,
            message: "Added to cart".to_string(),
        })
    }

    /// Remove by id. Unknown ids are a no-op; returns whether anything was removed.
    pub fn remove_item(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|s| s.id != id);
        let removed = self.items.len() != before;
        self.store.save(&self.items);
        debug!("Remove {} from cart (removed: {})", id, removed);
        removed
    }

    pub fn clear_cart(&mut self) {
        self.items.clear();
        self.store.save(&self.items);
        debug!("Cart cleared");
    }

    pub fn items_for_round(&self, round_id: &str) -> Vec<&CartSelection> {
        self.items.iter().filter(|s| s.round_id == round_id).collect()
    }

    pub fn items_for_game_type(&self, game_type: GameType) -> Vec<&CartSelection> {
        self.items
            .iter()
            .filter(|s| s.game_type == game_type)
            .collect()
    }

    /// Check the payable total against a wallet balance. A balance equal to
    /// the final amount is sufficient.
    pub fn validate_cart_balance(&self, wallet_balance: Decimal) -> Result<(), CartError> {
        let summary = self.summary();
        if summary.is_empty() {
            return Err(CartError::EmptyCart);
        }
        if wallet_balance < summary.final_amount {
            return Err(CartError::InsufficientBalance {
                shortfall: summary.final_amount - wallet_balance,
            });
        }
        Ok(())
    }

    fn next_id(&self, timestamp: &DateTime<Utc>) -> String {
        loop {
            let id = format!(
                "{}-{:08x}",
                timestamp.timestamp_millis(),
                rand::random::<u32>()
            );
            if !self.items.iter().any(|s| s.id == id) {
                return id;
            }
        }
    }
}
