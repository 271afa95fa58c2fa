//! # Discount Eligibility
//!
//! Decides whether a discount applies right now, for the delivery mode the
//! customer picked.
//!
//! ## Eligibility Checks
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Is discount D active?                                │
//! │                                                                         │
//! │  1. Mode      D.delivery_mode == chosen mode?       no ──► skip        │
//! │                    │ yes                                                │
//! │  2. Expiry    now > D.limit_date?                  yes ──► skip        │
//! │                    │ no                                                 │
//! │  3. Schedule  start <= now <= end?                  no ──► skip        │
//! │                    │ yes                                                │
//! │                    ▼                                                    │
//! │              active, countdown = end − now                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Surfacing vs. Pricing
//! A discount without a schedule is never *active*: it has no window and no
//! countdown, so [`active_discounts`] leaves it out. It still reduces the
//! price: [`eligible_discount_for`] applies it whenever the mode matches and
//! it hasn't expired.
//!
//! ## Midnight Rule
//! Both bounds are placed on `now`'s calendar day. If `end <= start`, the
//! end moves to the next day. With a 22:00–02:00 window, 23:30 is inside;
//! 01:00 is NOT (its window starts at 22:00 that same day).
//!
//! Schedule checks take local wall-clock time (`NaiveDateTime`). Expiry
//! checks take an absolute instant.

use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};

use crate::discount::Discount;
use crate::types::DeliveryMode;

// =============================================================================
// Delivery Mode
// =============================================================================

/// True when `mode` is a known code equal to the discount's mode.
///
/// The mapping is closed: 0 order-in, 1 pickup, 2 delivery. Any other code
/// never matches.
///
/// ```rust
/// use platter_core::discount::Discount;
/// use platter_core::eligibility::is_delivery_mode_match;
/// use platter_core::money::Money;
/// use platter_core::types::DeliveryMode;
///
/// let d = Discount::fixed("D1", "P1", Money::from_cents(100), DeliveryMode::Pickup);
/// assert!(is_delivery_mode_match(&d, 1));
/// assert!(!is_delivery_mode_match(&d, 2));
/// assert!(!is_delivery_mode_match(&d, 7));
/// ```
pub fn is_delivery_mode_match(discount: &Discount, mode: u8) -> bool {
    DeliveryMode::from_code(mode).is_some_and(|m| matches_mode(discount, m))
}

/// Typed form of [`is_delivery_mode_match`].
#[inline]
pub fn matches_mode(discount: &Discount, mode: DeliveryMode) -> bool {
    discount.delivery_mode == mode
}

// =============================================================================
// Schedule
// =============================================================================

/// Where `now` falls relative to a discount's daily window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleStatus {
    /// The discount carries no schedule.
    Unscheduled,
    /// `start <= now <= end`.
    Active,
    /// Scheduled, but `now` is outside the window.
    Inactive,
}

/// Classifies `now` against the discount's schedule.
pub fn schedule_status(discount: &Discount, now: NaiveDateTime) -> ScheduleStatus {
    match discount.schedule {
        None => ScheduleStatus::Unscheduled,
        Some(schedule) => {
            let (start, end) = schedule.resolve(now);
            if start <= now && now <= end {
                ScheduleStatus::Active
            } else {
                ScheduleStatus::Inactive
            }
        }
    }
}

/// True when `now` is inside the discount's window (bounds inclusive).
///
/// A discount without a schedule is never within schedule.
pub fn is_within_schedule(discount: &Discount, now: NaiveDateTime) -> bool {
    schedule_status(discount, now) == ScheduleStatus::Active
}

/// Time left until the window closes, floored at zero.
///
/// Returns `None` when the discount has no schedule. The end bound is
/// resolved with the same midnight rule as [`is_within_schedule`].
pub fn remaining_time(discount: &Discount, now: NaiveDateTime) -> Option<Duration> {
    let schedule = discount.schedule?;
    let (_, end) = schedule.resolve(now);
    Some((end - now).max(Duration::zero()))
}

/// Renders a countdown as `HH:MM:SS`. Hours are not capped at 24.
///
/// ```rust
/// use chrono::Duration;
/// use platter_core::eligibility::format_countdown;
///
/// assert_eq!(format_countdown(Duration::seconds(9_000)), "02:30:00");
/// assert_eq!(format_countdown(Duration::seconds(-5)), "00:00:00");
/// ```
pub fn format_countdown(remaining: Duration) -> String {
    let secs = remaining.num_seconds().max(0);
    format!(
        "{:02}:{:02}:{:02}",
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60
    )
}

// =============================================================================
// Expiry
// =============================================================================

/// True once `now` is past the discount's `limit_date`.
///
/// A discount without a limit date never expires.
pub fn is_expired(discount: &Discount, now: DateTime<Utc>) -> bool {
    discount.limit_date.is_some_and(|limit| now > limit)
}

// =============================================================================
// Selection
// =============================================================================

/// A discount that is currently usable, with its countdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveDiscount {
    pub discount: Discount,
    pub remaining: Duration,
}

fn is_live<Tz: TimeZone>(discount: &Discount, mode: DeliveryMode, now: &DateTime<Tz>) -> bool {
    matches_mode(discount, mode) && !is_expired(discount, now.with_timezone(&Utc))
}

fn is_active_at<Tz: TimeZone>(discount: &Discount, mode: DeliveryMode, now: &DateTime<Tz>) -> bool {
    is_live(discount, mode, now) && is_within_schedule(discount, now.naive_local())
}

/// Pricing accepts an unscheduled discount; only a closed window excludes one.
fn is_applicable_at<Tz: TimeZone>(
    discount: &Discount,
    mode: DeliveryMode,
    now: &DateTime<Tz>,
) -> bool {
    is_live(discount, mode, now)
        && schedule_status(discount, now.naive_local()) != ScheduleStatus::Inactive
}

/// Discounts usable right now for `mode`, in input order.
///
/// `now` carries its own zone: the window is checked against its local
/// wall-clock time, expiry against its absolute instant.
pub fn active_discounts<Tz: TimeZone>(
    discounts: &[Discount],
    mode: DeliveryMode,
    now: &DateTime<Tz>,
) -> Vec<ActiveDiscount> {
    let local = now.naive_local();
    discounts
        .iter()
        .filter(|d| is_active_at(d, mode, now))
        .map(|d| ActiveDiscount {
            discount: d.clone(),
            remaining: remaining_time(d, local).unwrap_or_else(Duration::zero),
        })
        .collect()
}

/// First discount for `product_id` that prices a line added right now in
/// `mode`.
///
/// Unlike [`active_discounts`], a discount with no schedule qualifies.
pub fn eligible_discount_for<'a, Tz: TimeZone>(
    discounts: &'a [Discount],
    product_id: &str,
    mode: DeliveryMode,
    now: &DateTime<Tz>,
) -> Option<&'a Discount> {
    discounts
        .iter()
        .find(|d| d.applies_to(product_id) && is_applicable_at(d, mode, now))
}

// =============================================================================
// Unit Tests
// =============================================================================
