//! # platter-core: Pure Business Logic for Platter
//!
//! The cart, pricing and discount rules of the Platter ordering client, as
//! pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Platter Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Mobile UI (screens)                          │   │
//! │  │    Menu ──► Product sheet ──► Cart ──► Checkout                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ commands                               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    platter-client                               │   │
//! │  │    add_to_cart, confirm_checkout, list_active_discounts        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ platter-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   cart    │  │  extras   │  │  pricing  │  │eligibility│  │   │
//! │  │   │ CartStore │  │  matcher  │  │ tax/total │  │ schedule  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CLOCK READS • PURE FUNCTIONS                     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    platter-db (Storage Layer)                   │   │
//! │  │              SQLite key-value store, cart snapshots             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`cart`] - Cart lines and the four cart operations
//! - [`extras`] - Line identity by selected extras
//! - [`pricing`] - Discounted prices, line totals, tax, savings
//! - [`eligibility`] - Delivery mode, schedule windows, expiry
//! - [`discount`] - Backend discount records and the validated domain type
//! - [`types`] - Products, extras, delivery modes, tax rates
//! - [`money`] - Exact decimal money
//! - [`error`] / [`validation`] - Typed errors and input checks
//!
//! ## Example Usage
//!
//! ```rust
//! use platter_core::cart::{Cart, CartLineItem};
//! use platter_core::money::Money;
//! use platter_core::pricing;
//! use platter_core::DEFAULT_TAX_RATE;
//!
//! let mut cart = Cart::new();
//! cart.add_to_cart(CartLineItem::new("P1", "Burger", Money::from_cents(1000), 1));
//! cart.add_to_cart(CartLineItem::new("P1", "Burger", Money::from_cents(1000), 1));
//!
//! assert_eq!(cart.item_count(), 1);
//! assert_eq!(pricing::subtotal(&cart), Money::from_cents(2000));
//! assert_eq!(pricing::total(&cart, DEFAULT_TAX_RATE), Money::from_cents(2160));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod discount;
pub mod eligibility;
pub mod error;
pub mod extras;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{AppliedDiscount, Cart, CartChange, CartLineItem};
pub use discount::{Discount, DiscountKind, DiscountRecord, Schedule};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::CartTotals;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Sales tax applied when configuration doesn't override it: 8%.
pub const DEFAULT_TAX_RATE: TaxRate = TaxRate::from_bps(800);

/// Maximum quantity the UI may request in a single add.
///
/// Only the command layer enforces this; the cart itself accepts any
/// positive quantity.
pub const MAX_ITEM_QUANTITY: u32 = 99;

/// Largest price accepted from the backend, in major currency units.
///
/// Applies to product prices, extra option prices and fixed discounts. With
/// every input bounded, no cart total can overflow `Decimal`.
pub const MAX_PRICE: i64 = 1_000_000;
