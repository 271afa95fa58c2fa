//! # Commands Module
//!
//! Functions the mobile shell calls. Each takes the state it needs by
//! reference and returns a serializable response or an [`ApiError`].
//!
//! ## Command Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Mobile UI                                                             │
//! │     │  addToCart({ product, selectedExtras, deliveryMode })            │
//! │     ▼                                                                   │
//! │  commands::cart::add_to_cart(                                          │
//! │      cart: &CartState,        ◄── Only the state it needs              │
//! │      config: &ClientConfig,                                            │
//! │      discounts: &[Discount],                                           │
//! │      request: AddToCartRequest,                                        │
//! │      now: &DateTime<Tz>,                                               │
//! │  ) -> ApiResult<CartResponse>                                          │
//! │     │                                                                   │
//! │     │ (JSON serialization)                                              │
//! │     ▼                                                                   │
//! │  UI receives: CartResponse                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`ApiError`]: crate::error::ApiError

pub mod cart;
pub mod checkout;
pub mod discount;
