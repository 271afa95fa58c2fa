//! # Validation Module
//!
//! Input validation for the Platter client.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Mobile UI                                                    │
//! │  ├── Disables "Add to cart" until required extras are picked          │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Client commands (apps/client)                                │
//! │  ├── THIS MODULE: quantity bounds, required extras                     │
//! │  └── THIS MODULE: backend discount records                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Cart (platter-core::cart)                                    │
//! │  └── Accepts every add; never rejects                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use platter_core::validation::{validate_quantity, parse_schedule_time};
//!
//! assert!(validate_quantity(5).is_ok());
//! assert!(parse_schedule_time("schedule.start", "22:00").is_ok());
//! ```

use chrono::NaiveTime;
use rust_decimal::Decimal;

use crate::cart::CartLineItem;
use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{Product, SelectedExtras};
use crate::{MAX_ITEM_QUANTITY, MAX_PRICE};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates an opaque identifier (product id, discount id).
///
/// Identifiers are opaque; the only rule is that they are not blank.
pub fn validate_id(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Parses a schedule bound in 24-hour `HH:MM` form.
///
/// ## Example
/// ```rust
/// use platter_core::validation::parse_schedule_time;
///
/// assert!(parse_schedule_time("start", "02:00").is_ok());
/// assert!(parse_schedule_time("start", "25:00").is_err());
/// assert!(parse_schedule_time("start", "2pm").is_err());
/// ```
pub fn parse_schedule_time(field: &str, value: &str) -> ValidationResult<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|e| {
        ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: format!("expected HH:MM ({})", e),
        }
    })
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity requested by the UI.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (99)
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Product sheet: "Add 3 to cart"                                        │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(3) ← THIS FUNCTION                                  │
/// │       │                                                                 │
/// │       ├── qty == 0?  → Error: "quantity must be positive"              │
/// │       ├── qty > 99?  → Error: "quantity must be between 1 and 99"      │
/// │       └── OK → Cart::add_to_cart                                       │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: u32) -> ValidationResult<()> {
    if qty == 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: i64::from(MAX_ITEM_QUANTITY),
        });
    }

    Ok(())
}

/// Validates a percentage discount value (0–100 inclusive).
pub fn validate_percentage(pct: Decimal) -> ValidationResult<()> {
    if pct < Decimal::ZERO || pct > Decimal::ONE_HUNDRED {
        return Err(ValidationError::OutOfRange {
            field: "percentage".to_string(),
            min: 0,
            max: 100,
        });
    }

    Ok(())
}

/// Validates a fixed discount value (0 to [`MAX_PRICE`]).
///
/// A fixed value above the product price is allowed; see
/// [`crate::pricing::discounted_unit_price`].
pub fn validate_fixed_value(value: Money) -> ValidationResult<()> {
    validate_price("fixedValue", value)
}

/// Validates a price received from the backend.
///
/// ## Rules
/// - Must not be negative
/// - Must not exceed [`MAX_PRICE`]
///
/// ## Example
/// ```rust
/// use platter_core::money::Money;
/// use platter_core::validation::validate_price;
///
/// assert!(validate_price("price", Money::from_cents(1099)).is_ok());
/// assert!(validate_price("price", Money::from_cents(-1)).is_err());
/// ```
pub fn validate_price(field: &str, price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    if price > Money::from_major_minor(MAX_PRICE, 0) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_PRICE,
        });
    }

    Ok(())
}

/// Checks the amounts of a line that didn't come through the command layer
/// (a stored snapshot).
///
/// The unit price may be negative (an oversized fixed discount) but its
/// magnitude is bounded like any price.
pub fn validate_line_item(item: &CartLineItem) -> ValidationResult<()> {
    validate_id("productId", &item.product_id)?;
    validate_price("unitPrice", item.unit_price.abs())?;
    if let Some(applied) = &item.discount {
        validate_price("originalPrice", applied.original_price)?;
    }
    for option in item.selected_extras.values() {
        validate_price("extras.price", option.price_or_zero())?;
    }

    Ok(())
}

/// Validates a tax rate in basis points (0–10000, i.e. 0% to 100%).
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10_000 {
        return Err(ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0,
            max: 10_000,
        });
    }

    Ok(())
}

// =============================================================================
// Extras Validators
// =============================================================================

/// Checks a selection against what the product offers.
///
/// ## Rules
/// - Every required group has a selection
/// - Every selected group exists on the product
/// - Every selected option exists in its group
///
/// Prices in `selected` are not trusted; see [`resolve_selected_extras`].
pub fn validate_selected_extras(
    product: &Product,
    selected: &SelectedExtras,
) -> ValidationResult<()> {
    resolve_selected_extras(product, selected).map(|_| ())
}

/// Validates a selection and swaps each option for the product's own.
///
/// The result carries catalog prices whatever prices the request sent, so
/// the line is always priced from the product record. Catalog option prices
/// are bounded with [`validate_price`].
///
/// The cart itself never runs this check; the command layer does, before
/// calling `add_to_cart`.
pub fn resolve_selected_extras(
    product: &Product,
    selected: &SelectedExtras,
) -> ValidationResult<SelectedExtras> {
    if let Some(missing) = product
        .required_groups()
        .find(|group| !selected.contains_key(&group.id))
    {
        return Err(ValidationError::MissingRequiredExtra {
            group: missing.name.clone(),
        });
    }

    let mut resolved = SelectedExtras::new();
    for (group_id, option) in selected {
        let group = product
            .extra_group(group_id)
            .ok_or_else(|| ValidationError::UnknownExtraGroup {
                group: group_id.clone(),
            })?;

        let offered = group
            .option(&option.name)
            .ok_or_else(|| ValidationError::UnknownExtraOption {
                group: group.name.clone(),
                option: option.name.clone(),
            })?;
        validate_price("extras.price", offered.price_or_zero())?;

        resolved.insert(group_id.clone(), offered.clone());
    }

    Ok(resolved)
}

// =============================================================================
// Unit Tests
// =============================================================================
