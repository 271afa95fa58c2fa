//! # Checkout Command
//!
//! Confirms the order: freezes the cart into a summary and empties it.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  "Place order"                                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  confirm_checkout(cart, config, mode)                                  │
//! │       │                                                                 │
//! │       ├── cart empty? ──► ApiError EMPTY_CART (nothing changes)        │
//! │       │                                                                 │
//! │       ├── take lines (cart is now empty, observers notified)           │
//! │       ├── compute totals at the configured tax rate                    │
//! │       └── CheckoutSummary ──► UI hands it to the order API             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Submitting the order to the backend is the caller's job.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use ts_rs::TS;
use uuid::Uuid;

use platter_core::{CartLineItem, CartTotals, DeliveryMode};

use crate::commands::cart::FormattedTotals;
use crate::error::{ApiError, ApiResult};
use crate::state::{CartState, ClientConfig};

/// Frozen record of a confirmed cart.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CheckoutSummary {
    /// Client-generated reference for idempotent submission.
    pub order_ref: String,
    /// Wire code of the chosen delivery mode.
    pub delivery_mode: u8,
    pub items: Vec<CartLineItem>,
    /// Totals rounded to display precision.
    pub totals: CartTotals,
    pub formatted: FormattedTotals,
    pub currency_code: String,
    #[ts(as = "String")]
    pub placed_at: DateTime<Utc>,
}

/// Confirms checkout and clears the cart.
///
/// ## Errors
/// - `EMPTY_CART` when there is nothing to check out; the cart is untouched.
pub fn confirm_checkout(
    cart: &CartState,
    config: &ClientConfig,
    mode: DeliveryMode,
) -> ApiResult<CheckoutSummary> {
    let taken = cart.take();
    if taken.is_empty() {
        return Err(ApiError::empty_cart());
    }

    let exact = CartTotals::compute(&taken, config.tax_rate());
    let summary = CheckoutSummary {
        order_ref: Uuid::new_v4().to_string(),
        delivery_mode: mode.code(),
        formatted: FormattedTotals::new(&exact, config),
        totals: exact.rounded(),
        currency_code: config.currency_code.clone(),
        placed_at: Utc::now(),
        items: taken.into_items(),
    };

    info!(
        order_ref = %summary.order_ref,
        mode = %mode,
        lines = summary.items.len(),
        total = %summary.formatted.total,
        "Checkout confirmed"
    );
    Ok(summary)
}
