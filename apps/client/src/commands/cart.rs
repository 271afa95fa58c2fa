//! # Cart Commands
//!
//! What the mobile UI calls to read and change the cart.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │ Rehydrate│────►│ In Cart  │────►│ Checkout │────►│  Empty   │       │
//! │  │ (startup)│     │          │     │  screen  │     │  Cart    │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                 │                              │
//! │                   add_to_cart     confirm_checkout                     │
//! │                   increment       (checkout.rs)                        │
//! │                   decrement                                             │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                   clear_cart ──────────────────────►                   │
//! │                                                      (back to empty)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use ts_rs::TS;

use platter_core::eligibility::eligible_discount_for;
use platter_core::validation::{
    resolve_selected_extras, validate_id, validate_price, validate_quantity,
};
use platter_core::{
    Cart, CartLineItem, CartTotals, DeliveryMode, Discount, Product, SelectedExtras,
};

use crate::error::ApiResult;
use crate::state::{CartState, ClientConfig};

// =============================================================================
// Request / Response Types
// =============================================================================

/// Totals pre-formatted in the configured currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct FormattedTotals {
    pub subtotal: String,
    pub tax: String,
    pub total: String,
    pub savings: String,
}

impl FormattedTotals {
    pub(crate) fn new(totals: &CartTotals, config: &ClientConfig) -> Self {
        FormattedTotals {
            subtotal: config.format_currency(totals.subtotal),
            tax: config.format_currency(totals.tax),
            total: config.format_currency(totals.total),
            savings: config.format_currency(totals.savings),
        }
    }
}

/// Cart response including items and totals.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartResponse {
    pub items: Vec<CartLineItem>,
    /// Exact amounts.
    pub totals: CartTotals,
    /// Rounded, with currency symbol.
    pub formatted: FormattedTotals,
}

impl CartResponse {
    /// Builds the response for `cart` under `config`'s tax rate and currency.
    pub fn new(cart: &Cart, config: &ClientConfig) -> Self {
        let totals = CartTotals::compute(cart, config.tax_rate());
        CartResponse {
            items: cart.items().to_vec(),
            formatted: FormattedTotals::new(&totals, config),
            totals,
        }
    }
}

/// "Add to cart" from the product sheet.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    /// The product as the UI received it from the backend.
    pub product: Product,
    /// Defaults to 1.
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub selected_extras: SelectedExtras,
    /// Mode the customer picked; decides which discounts apply.
    pub delivery_mode: DeliveryMode,
}

// =============================================================================
// Commands
// =============================================================================

/// Gets the current cart contents.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  CART                                                      3 items     │
/// │  ──────────────────────────────────────────────────────────────────    │
/// │  Burger (Large)              x2                $20.00                  │
/// │  Fries                       x1                 $3.50                  │
/// │  ──────────────────────────────────────────────────────────────────    │
/// │  Subtotal                                      $23.50                  │
/// │  Tax (8%)                                       $1.88                  │
/// │  TOTAL                                         $25.38                  │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn get_cart(cart: &CartState, config: &ClientConfig) -> CartResponse {
    debug!("get_cart command");
    cart.with_cart(|c| CartResponse::new(c, config))
}

/// Adds a product to the cart.
///
/// ## Behavior
/// 1. Validate quantity (1–99), the product price and required extras
/// 2. Replace the selected options with the product's own, so extras are
///    priced from the catalog rather than the request
/// 3. Pick the first discount for this product that is active now for the
///    chosen delivery mode, if any
/// 4. Freeze the (discounted) unit price into a new line
/// 5. Merge into an equal line or append
///
/// `discounts` is the list the UI last fetched from the backend; `now`
/// carries the device's zone so schedules use local wall-clock time.
pub fn add_to_cart<Tz: TimeZone>(
    cart: &CartState,
    config: &ClientConfig,
    discounts: &[Discount],
    request: AddToCartRequest,
    now: &DateTime<Tz>,
) -> ApiResult<CartResponse> {
    let quantity = request.quantity.unwrap_or(1);
    debug!(
        product_id = %request.product.id,
        quantity,
        mode = %request.delivery_mode,
        "add_to_cart command"
    );

    validate_id("productId", &request.product.id)?;
    validate_quantity(quantity)?;
    validate_price("price", request.product.price)?;
    let selected_extras = resolve_selected_extras(&request.product, &request.selected_extras)?;

    let discount =
        eligible_discount_for(discounts, &request.product.id, request.delivery_mode, now);
    if let Some(d) = discount {
        info!(product_id = %request.product.id, discount_id = %d.id, "Applying discount");
    }

    let item = CartLineItem::from_product(
        &request.product,
        quantity,
        selected_extras,
        discount,
    );
    cart.add_to_cart(item);

    Ok(get_cart(cart, config))
}

/// Adds one to the first line for `product_id`. Unknown ids are a no-op.
pub fn increment_quantity(
    cart: &CartState,
    config: &ClientConfig,
    product_id: &str,
) -> CartResponse {
    debug!(product_id = %product_id, "increment_quantity command");
    cart.increment_quantity(product_id);
    get_cart(cart, config)
}

/// Takes one from the first line for `product_id`, removing it at zero.
/// Unknown ids are a no-op.
pub fn decrement_quantity(
    cart: &CartState,
    config: &ClientConfig,
    product_id: &str,
) -> CartResponse {
    debug!(product_id = %product_id, "decrement_quantity command");
    cart.decrement_quantity(product_id);
    get_cart(cart, config)
}

/// Clears all items from the cart.
pub fn clear_cart(cart: &CartState, config: &ClientConfig) -> CartResponse {
    debug!("clear_cart command");
    cart.clear_cart();
    get_cart(cart, config)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use chrono::{NaiveDate, Utc};
    use platter_core::discount::Schedule;
    use platter_core::{ExtraGroup, ExtraOption, Money};

    fn burger() -> Product {
        Product {
            id: "P1".to_string(),
            shop_id: Some("S1".to_string()),
            name: "Burger".to_string(),
            image: None,
            description: None,
            price: Money::from_cents(1000),
            extras: vec![ExtraGroup {
                id: "size".to_string(),
                name: "Size".to_string(),
                required: true,
                options: vec![
                    ExtraOption::new("Regular", Money::zero()),
                    ExtraOption::new("Large", Money::from_cents(200)),
                ],
            }],
        }
    }

    fn large() -> SelectedExtras {
        let mut extras = SelectedExtras::new();
        extras.insert("size".to_string(), ExtraOption::new("Large", Money::from_cents(200)));
        extras
    }

    fn request(quantity: u32, extras: SelectedExtras, mode: DeliveryMode) -> AddToCartRequest {
        AddToCartRequest {
            product: burger(),
            quantity: Some(quantity),
            selected_extras: extras,
            delivery_mode: mode,
        }
    }

    fn noon() -> DateTime<Utc> {
        Utc.from_utc_datetime(
            &NaiveDate::from_ymd_opt(2026, 3, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
        )
    }

    fn lunch_fixed_discount() -> Discount {
        Discount::fixed("D1", "P1", Money::from_cents(300), DeliveryMode::Pickup)
            .with_schedule(Schedule::parse("11:00", "14:00").unwrap())
    }

    #[test]
    fn test_add_merges_and_totals() {
        let cart = CartState::default();
        let config = ClientConfig::default();

        add_to_cart(&cart, &config, &[], request(1, large(), DeliveryMode::Delivery), &noon())
            .unwrap();
        let response =
            add_to_cart(&cart, &config, &[], request(1, large(), DeliveryMode::Delivery), &noon())
                .unwrap();

        assert_eq!(response.items.len(), 1);
        assert_eq!(response.items[0].quantity, 2);
        // (10.00 + 2.00) × 2 = 24.00, tax 1.92
        assert_eq!(response.totals.subtotal, Money::from_cents(2400));
        assert_eq!(response.formatted.total, "$25.92");
    }

    #[test]
    fn test_add_requires_extras_and_valid_quantity() {
        let cart = CartState::default();
        let config = ClientConfig::default();

        let err = add_to_cart(
            &cart,
            &config,
            &[],
            request(1, SelectedExtras::new(), DeliveryMode::Pickup),
            &noon(),
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = add_to_cart(&cart, &config, &[], request(0, large(), DeliveryMode::Pickup), &noon())
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        assert!(cart.snapshot().is_empty());
    }

    #[test]
    fn test_add_applies_active_discount_for_mode() {
        let config = ClientConfig::default();
        let discounts = vec![lunch_fixed_discount()];

        let pickup = CartState::default();
        let response =
            add_to_cart(&pickup, &config, &discounts, request(1, large(), DeliveryMode::Pickup), &noon())
                .unwrap();
        assert_eq!(response.items[0].unit_price, Money::from_cents(700));
        assert_eq!(response.items[0].discount_id(), Some("D1"));
        assert_eq!(response.totals.savings, Money::from_cents(300));

        let delivery = CartState::default();
        let response = add_to_cart(
            &delivery,
            &config,
            &discounts,
            request(1, large(), DeliveryMode::Delivery),
            &noon(),
        )
        .unwrap();
        assert_eq!(response.items[0].unit_price, Money::from_cents(1000));
        assert!(!response.items[0].discount_applied());
    }

    #[test]
    fn test_increment_decrement_clear() {
        let cart = CartState::default();
        let config = ClientConfig::default();
        add_to_cart(&cart, &config, &[], request(1, large(), DeliveryMode::Pickup), &noon()).unwrap();

        assert_eq!(increment_quantity(&cart, &config, "P1").items[0].quantity, 2);
        assert_eq!(decrement_quantity(&cart, &config, "P1").items[0].quantity, 1);
        assert!(decrement_quantity(&cart, &config, "P1").items.is_empty());
        assert!(increment_quantity(&cart, &config, "P1").items.is_empty());

        add_to_cart(&cart, &config, &[], request(3, large(), DeliveryMode::Pickup), &noon()).unwrap();
        let response = clear_cart(&cart, &config);
        assert!(response.items.is_empty());
        assert_eq!(response.formatted.total, "$0.00");
    }

    #[test]
    fn test_request_deserializes_from_ui_json() {
        let json = r#"{
            "product": {"id":"P1","name":"Burger","price":"10.00","extras":[]},
            "selectedExtras": {},
            "deliveryMode": 2
        }"#;
        let request: AddToCartRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.quantity, None);
        assert_eq!(request.delivery_mode, DeliveryMode::Delivery);
    }

    #[test]
    fn test_unscheduled_discount_applies_at_add_time() {
        let config = ClientConfig::default();
        let discounts = vec![Discount::fixed(
            "D1",
            "P1",
            Money::from_cents(300),
            DeliveryMode::Pickup,
        )];

        let cart = CartState::default();
        let response =
            add_to_cart(&cart, &config, &discounts, request(1, large(), DeliveryMode::Pickup), &noon())
                .unwrap();
        assert_eq!(response.items[0].unit_price, Money::from_cents(700));
        assert_eq!(response.items[0].discount_id(), Some("D1"));
    }

    #[test]
    fn test_extras_are_priced_from_catalog() {
        let cart = CartState::default();
        let config = ClientConfig::default();
        let mut tampered = SelectedExtras::new();
        tampered.insert("size".to_string(), ExtraOption::new("Large", Money::from_cents(-900)));

        let response =
            add_to_cart(&cart, &config, &[], request(1, tampered, DeliveryMode::Pickup), &noon())
                .unwrap();

        assert_eq!(response.items[0].selected_extras, large());
        // 10.00 + 2.00 catalog price for Large
        assert_eq!(response.totals.subtotal, Money::from_cents(1200));

        // The same choice sent with the right price merges into that line.
        let response =
            add_to_cart(&cart, &config, &[], request(1, large(), DeliveryMode::Pickup), &noon())
                .unwrap();
        assert_eq!(response.items.len(), 1);
        assert_eq!(response.items[0].quantity, 2);
    }

    #[test]
    fn test_out_of_range_price_is_rejected() {
        let cart = CartState::default();
        let config = ClientConfig::default();
        let mut req = request(1, large(), DeliveryMode::Pickup);
        req.product.price = Money::from_major_minor(platter_core::MAX_PRICE + 1, 0);

        let err = add_to_cart(&cart, &config, &[], req, &noon()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(cart.snapshot().is_empty());
    }
}
