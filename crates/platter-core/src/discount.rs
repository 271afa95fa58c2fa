//! # Discounts
//!
//! Server-defined price reductions on a single product.
//!
//! ## Record vs. Domain Type
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Backend JSON                         Domain                            │
//! │  ────────────                         ──────                            │
//! │  DiscountRecord                       Discount                          │
//! │  ├── discountType: "percentage"  ──►  kind: Percentage(20)              │
//! │  ├── percentage: 20                                                     │
//! │  ├── fixedValue: null                                                   │
//! │  ├── deliveryMode: 1             ──►  delivery_mode: Pickup             │
//! │  ├── schedule: {"22:00","02:00"} ──►  schedule: Some(Schedule)          │
//! │  └── limitDate: "2026-..."       ──►  limit_date: Some(DateTime<Utc>)   │
//! │                                                                         │
//! │  TryFrom<DiscountRecord> validates once; everything downstream works   │
//! │  on values that cannot be half-filled.                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The client only reads discounts. Creation and expiry happen server-side.

use chrono::{DateTime, Duration, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, ValidationError};
use crate::money::Money;
use crate::types::DeliveryMode;
use crate::validation::{
    parse_schedule_time, validate_fixed_value, validate_id, validate_percentage,
};

// =============================================================================
// Wire Records
// =============================================================================

/// Discount type as sent by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum DiscountType {
    Percentage,
    Fixed,
}

/// Daily time window as sent by the backend: `{"start": "HH:MM", "end": "HH:MM"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScheduleRecord {
    pub start: String,
    pub end: String,
}

/// A discount exactly as the backend returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DiscountRecord {
    pub id: String,
    pub product_id: String,
    pub discount_type: DiscountType,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub percentage: Option<Decimal>,
    #[serde(default)]
    pub fixed_value: Option<Money>,
    /// 0 order-in, 1 pickup, 2 delivery.
    pub delivery_mode: u8,
    #[serde(default)]
    pub schedule: Option<ScheduleRecord>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub limit_date: Option<DateTime<Utc>>,
}

// =============================================================================
// Domain Types
// =============================================================================

/// How much a discount takes off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscountKind {
    /// Percent of the base price, 0–100.
    Percentage(Decimal),
    /// Flat amount off the base price, >= 0.
    Fixed(Money),
}

/// A daily `[start, end]` window in local wall-clock time.
///
/// When `end <= start` the window crosses midnight: it opens at `start`
/// and closes at `end` on the following day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl Schedule {
    /// Creates a schedule from already-parsed bounds.
    pub const fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Schedule { start, end }
    }

    /// Parses `HH:MM` bounds.
    pub fn parse(start: &str, end: &str) -> Result<Self, ValidationError> {
        Ok(Schedule {
            start: parse_schedule_time("schedule.start", start)?,
            end: parse_schedule_time("schedule.end", end)?,
        })
    }

    /// True when the end bound falls on the following day.
    #[inline]
    pub fn crosses_midnight(&self) -> bool {
        self.end <= self.start
    }

    /// Resolves the window against `now`'s calendar day.
    ///
    /// ## Resolution Rule
    /// ```text
    /// schedule 10:00–14:00, now = 2026-03-01 12:00
    ///   start = 2026-03-01 10:00, end = 2026-03-01 14:00
    ///
    /// schedule 22:00–02:00, now = 2026-03-01 23:30
    ///   start = 2026-03-01 22:00, end = 2026-03-02 02:00   (rolled)
    /// ```
    ///
    /// The start is always anchored to `now`'s date; there is no look-back
    /// to the previous day's window.
    pub fn resolve(&self, now: NaiveDateTime) -> (NaiveDateTime, NaiveDateTime) {
        let day = now.date();
        let start = day.and_time(self.start);
        let mut end = day.and_time(self.end);
        if self.crosses_midnight() {
            end += Duration::days(1);
        }
        (start, end)
    }
}

/// A validated discount on one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discount {
    pub id: String,
    pub product_id: String,
    pub kind: DiscountKind,
    pub delivery_mode: DeliveryMode,
    /// `None` means the discount is never time-limited-active; it is not the
    /// same as an all-day schedule.
    pub schedule: Option<Schedule>,
    /// `None` means no expiry was supplied.
    pub limit_date: Option<DateTime<Utc>>,
}

impl Discount {
    /// Percentage discount without schedule or expiry.
    pub fn percentage(
        id: impl Into<String>,
        product_id: impl Into<String>,
        percentage: Decimal,
        delivery_mode: DeliveryMode,
    ) -> Self {
        Discount {
            id: id.into(),
            product_id: product_id.into(),
            kind: DiscountKind::Percentage(percentage),
            delivery_mode,
            schedule: None,
            limit_date: None,
        }
    }

    /// Fixed-amount discount without schedule or expiry.
    pub fn fixed(
        id: impl Into<String>,
        product_id: impl Into<String>,
        fixed_value: Money,
        delivery_mode: DeliveryMode,
    ) -> Self {
        Discount {
            id: id.into(),
            product_id: product_id.into(),
            kind: DiscountKind::Fixed(fixed_value),
            delivery_mode,
            schedule: None,
            limit_date: None,
        }
    }

    /// Attaches a daily window.
    pub fn with_schedule(mut self, schedule: Schedule) -> Self {
        self.schedule = Some(schedule);
        self
    }

    /// Attaches an expiry timestamp.
    pub fn with_limit_date(mut self, limit_date: DateTime<Utc>) -> Self {
        self.limit_date = Some(limit_date);
        self
    }

    /// True when this discount targets `product_id`.
    #[inline]
    pub fn applies_to(&self, product_id: &str) -> bool {
        self.product_id == product_id
    }
}

impl TryFrom<DiscountRecord> for Discount {
    type Error = CoreError;

    fn try_from(record: DiscountRecord) -> Result<Self, Self::Error> {
        let id = record.id;
        let invalid = |source: ValidationError| CoreError::invalid_discount(id.clone(), source);

        validate_id("id", &id).map_err(invalid)?;
        validate_id("productId", &record.product_id).map_err(invalid)?;

        let kind = match record.discount_type {
            DiscountType::Percentage => {
                let pct = record.percentage.ok_or_else(|| {
                    invalid(ValidationError::Required {
                        field: "percentage".to_string(),
                    })
                })?;
                validate_percentage(pct).map_err(invalid)?;
                DiscountKind::Percentage(pct)
            }
            DiscountType::Fixed => {
                let value = record.fixed_value.ok_or_else(|| {
                    invalid(ValidationError::Required {
                        field: "fixedValue".to_string(),
                    })
                })?;
                validate_fixed_value(value).map_err(invalid)?;
                DiscountKind::Fixed(value)
            }
        };

        let delivery_mode = DeliveryMode::try_from(record.delivery_mode).map_err(invalid)?;

        let schedule = record
            .schedule
            .map(|s| Schedule::parse(&s.start, &s.end))
            .transpose()
            .map_err(invalid)?;

        Ok(Discount {
            id: id.clone(),
            product_id: record.product_id,
            kind,
            delivery_mode,
            schedule,
            limit_date: record.limit_date,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(json: &str) -> DiscountRecord {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_percentage_record_converts() {
        let rec = record(
            r#"{"id":"D1","productId":"P1","discountType":"percentage","percentage":20,
                "deliveryMode":1,"schedule":{"start":"22:00","end":"02:00"},
                "limitDate":"2026-12-31T23:59:59Z"}"#,
        );
        let discount = Discount::try_from(rec).unwrap();

        assert_eq!(discount.kind, DiscountKind::Percentage(Decimal::new(20, 0)));
        assert_eq!(discount.delivery_mode, DeliveryMode::Pickup);
        let schedule = discount.schedule.unwrap();
        assert!(schedule.crosses_midnight());
        assert!(discount.limit_date.is_some());
    }

    #[test]
    fn test_fixed_record_converts() {
        let rec = record(
            r#"{"id":"D2","productId":"P1","discountType":"fixed","fixedValue":"3.00","deliveryMode":0}"#,
        );
        let discount = Discount::try_from(rec).unwrap();
        assert_eq!(discount.kind, DiscountKind::Fixed(Money::from_cents(300)));
        assert_eq!(discount.delivery_mode, DeliveryMode::OrderIn);
        assert_eq!(discount.schedule, None);
        assert_eq!(discount.limit_date, None);
    }

    #[test]
    fn test_missing_value_is_rejected_not_defaulted() {
        let rec = record(r#"{"id":"D3","productId":"P1","discountType":"percentage","deliveryMode":0}"#);
        let err = Discount::try_from(rec).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidDiscount {
                source: ValidationError::Required { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_out_of_range_values_are_rejected() {
        let too_much = record(
            r#"{"id":"D4","productId":"P1","discountType":"percentage","percentage":150,"deliveryMode":0}"#,
        );
        assert!(Discount::try_from(too_much).is_err());

        let negative = record(
            r#"{"id":"D5","productId":"P1","discountType":"fixed","fixedValue":-1,"deliveryMode":0}"#,
        );
        assert!(Discount::try_from(negative).is_err());

        let unknown_mode = record(
            r#"{"id":"D6","productId":"P1","discountType":"fixed","fixedValue":1,"deliveryMode":3}"#,
        );
        assert!(Discount::try_from(unknown_mode).is_err());
    }

    #[test]
    fn test_bad_schedule_is_rejected() {
        let rec = record(
            r#"{"id":"D7","productId":"P1","discountType":"fixed","fixedValue":1,"deliveryMode":2,
                "schedule":{"start":"late","end":"02:00"}}"#,
        );
        let err = Discount::try_from(rec).unwrap_err();
        assert!(err.to_string().contains("schedule.start"));
    }

    #[test]
    fn test_schedule_resolve_same_day() {
        let schedule = Schedule::parse("10:00", "14:00").unwrap();
        let now = NaiveDate::from_ymd_opt(2026, 3, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let (start, end) = schedule.resolve(now);
        assert_eq!(start.date(), now.date());
        assert_eq!(end.date(), now.date());
    }

    #[test]
    fn test_schedule_resolve_rolls_end_past_midnight() {
        let schedule = Schedule::parse("22:00", "02:00").unwrap();
        let now = NaiveDate::from_ymd_opt(2026, 3, 1)
            .unwrap()
            .and_hms_opt(23, 30, 0)
            .unwrap();
        let (start, end) = schedule.resolve(now);
        assert_eq!(start, now.date().and_hms_opt(22, 0, 0).unwrap());
        assert_eq!(
            end,
            NaiveDate::from_ymd_opt(2026, 3, 2)
                .unwrap()
                .and_hms_opt(2, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_equal_bounds_cross_midnight() {
        let schedule = Schedule::parse("09:00", "09:00").unwrap();
        assert!(schedule.crosses_midnight());
    }
}
