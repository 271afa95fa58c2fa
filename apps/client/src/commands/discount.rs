//! # Discount Commands
//!
//! Turns backend discount records into domain values and answers "what is
//! on offer right now?" for the discounts banner.

use chrono::{DateTime, TimeZone};
use serde::Serialize;
use tracing::{debug, warn};
use ts_rs::TS;

use platter_core::eligibility::{active_discounts, format_countdown, ActiveDiscount};
use platter_core::{DeliveryMode, Discount, DiscountRecord};

use crate::error::ApiResult;

/// One active discount as the banner shows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ActiveDiscountDto {
    pub discount_id: String,
    pub product_id: String,
    pub delivery_mode: u8,
    #[ts(type = "number")]
    pub remaining_seconds: i64,
    /// `HH:MM:SS`
    pub countdown: String,
}

impl From<ActiveDiscount> for ActiveDiscountDto {
    fn from(active: ActiveDiscount) -> Self {
        ActiveDiscountDto {
            discount_id: active.discount.id,
            product_id: active.discount.product_id,
            delivery_mode: active.discount.delivery_mode.code(),
            remaining_seconds: active.remaining.num_seconds(),
            countdown: format_countdown(active.remaining),
        }
    }
}

/// Converts one backend record, failing on malformed values.
pub fn parse_discount(record: DiscountRecord) -> ApiResult<Discount> {
    Ok(Discount::try_from(record)?)
}

/// Converts a backend list, dropping (and logging) records that can't be
/// evaluated so one bad record doesn't hide the rest.
pub fn parse_discounts(records: Vec<DiscountRecord>) -> Vec<Discount> {
    let total = records.len();
    let discounts: Vec<Discount> = records
        .into_iter()
        .filter_map(|record| match Discount::try_from(record) {
            Ok(discount) => Some(discount),
            Err(e) => {
                warn!(error = %e, "Skipping discount record");
                None
            }
        })
        .collect();

    debug!(total, usable = discounts.len(), "Discount records parsed");
    discounts
}

/// Discounts active right now for the delivery mode `mode` (wire code).
///
/// An unknown mode code is a validation error.
pub fn list_active_discounts<Tz: TimeZone>(
    discounts: &[Discount],
    mode: u8,
    now: &DateTime<Tz>,
) -> ApiResult<Vec<ActiveDiscountDto>> {
    let mode = DeliveryMode::try_from(mode)?;
    debug!(mode = %mode, candidates = discounts.len(), "list_active_discounts command");

    Ok(active_discounts(discounts, mode, now)
        .into_iter()
        .map(ActiveDiscountDto::from)
        .collect())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use chrono::{FixedOffset, NaiveDate};

    fn records() -> Vec<DiscountRecord> {
        serde_json::from_str(
            r#"[
                {"id":"D1","productId":"P1","discountType":"percentage","percentage":20,
                 "deliveryMode":2,"schedule":{"start":"22:00","end":"02:00"}},
                {"id":"D2","productId":"P2","discountType":"fixed",
                 "deliveryMode":2,"schedule":{"start":"22:00","end":"02:00"}},
                {"id":"D3","productId":"P3","discountType":"fixed","fixedValue":"1.50",
                 "deliveryMode":1,"schedule":{"start":"22:00","end":"02:00"}}
            ]"#,
        )
        .unwrap()
    }

    fn late_evening() -> DateTime<FixedOffset> {
        let local = NaiveDate::from_ymd_opt(2026, 3, 1)
            .unwrap()
            .and_hms_opt(23, 30, 0)
            .unwrap();
        FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .from_local_datetime(&local)
            .unwrap()
    }

    #[test]
    fn test_parse_discounts_skips_malformed() {
        let discounts = parse_discounts(records());
        let ids: Vec<&str> = discounts.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["D1", "D3"]);
    }

    #[test]
    fn test_parse_discount_reports_malformed() {
        let err = parse_discount(records().remove(1)).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidDiscount);
    }

    #[test]
    fn test_list_active_for_mode() {
        let discounts = parse_discounts(records());

        let active = list_active_discounts(&discounts, 2, &late_evening()).unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].discount_id, "D1");
        assert_eq!(active[0].remaining_seconds, 150 * 60);
        assert_eq!(active[0].countdown, "02:30:00");

        let pickup = list_active_discounts(&discounts, 1, &late_evening()).unwrap();
        assert_eq!(pickup.len(), 1);
        assert_eq!(pickup[0].product_id, "P3");

        assert!(list_active_discounts(&discounts, 0, &late_evening())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        let err = list_active_discounts(&[], 9, &late_evening()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }
}
