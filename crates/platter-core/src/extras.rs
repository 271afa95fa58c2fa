//! # Extras Matching
//!
//! Decides whether two extras selections describe the same cart line.
//!
//! ```text
//! add "Pizza" {size: Large 2.00}     ┐
//! add "Pizza" {size: Large 2.00}     ├─► one line, qty 2
//! add "Pizza" {size: Small 0.00}     ──► second line
//! ```
//!
//! The comparison is structural and order-independent over the mapping's
//! values. Option records are compared by `name` and `price` only; nothing
//! nested is inspected and no value is coerced (an absent price never
//! equals an explicit zero).

use crate::types::SelectedExtras;

/// Returns true when both selections pick the same option for every group.
///
/// ## Rules
/// 1. Either side absent → `false`
/// 2. Different number of groups → `false`
/// 3. Every group in `a` must exist in `b` with an option of equal `name`
///    and equal `price`
///
/// ## Example
/// ```rust
/// use platter_core::extras::extras_equal;
/// use platter_core::money::Money;
/// use platter_core::types::{ExtraOption, SelectedExtras};
///
/// let mut a = SelectedExtras::new();
/// a.insert("size".into(), ExtraOption::new("Large", Money::from_cents(200)));
/// let b = a.clone();
///
/// assert!(extras_equal(Some(&a), Some(&b)));
/// assert!(!extras_equal(Some(&a), None));
/// ```
pub fn extras_equal(a: Option<&SelectedExtras>, b: Option<&SelectedExtras>) -> bool {
    let (Some(a), Some(b)) = (a, b) else {
        return false;
    };

    if a.len() != b.len() {
        return false;
    }

    a.iter().all(|(group, option)| {
        b.get(group)
            .is_some_and(|other| other.name == option.name && other.price == option.price)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::ExtraOption;

    fn extras(pairs: &[(&str, ExtraOption)]) -> SelectedExtras {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_absent_side_never_matches() {
        let empty = SelectedExtras::new();
        assert!(!extras_equal(None, None));
        assert!(!extras_equal(Some(&empty), None));
        assert!(!extras_equal(None, Some(&empty)));
    }

    #[test]
    fn test_empty_selections_match() {
        let a = SelectedExtras::new();
        let b = SelectedExtras::new();
        assert!(extras_equal(Some(&a), Some(&b)));
    }

    #[test]
    fn test_same_options_match_regardless_of_insertion_order() {
        let large = ExtraOption::new("Large", Money::from_cents(200));
        let garlic = ExtraOption::new("Garlic", Money::from_cents(50));

        let a = extras(&[("size", large.clone()), ("dip", garlic.clone())]);
        let b = extras(&[("dip", garlic), ("size", large)]);
        assert!(extras_equal(Some(&a), Some(&b)));
    }

    #[test]
    fn test_different_lengths_do_not_match() {
        let large = ExtraOption::new("Large", Money::from_cents(200));
        let a = extras(&[("size", large.clone())]);
        let b = extras(&[
            ("size", large),
            ("dip", ExtraOption::new("Garlic", Money::from_cents(50))),
        ]);
        assert!(!extras_equal(Some(&a), Some(&b)));
    }

    #[test]
    fn test_different_name_or_price_do_not_match() {
        let a = extras(&[("size", ExtraOption::new("Large", Money::from_cents(200)))]);
        let other_name = extras(&[("size", ExtraOption::new("Small", Money::from_cents(200)))]);
        let other_price = extras(&[("size", ExtraOption::new("Large", Money::from_cents(250)))]);

        assert!(!extras_equal(Some(&a), Some(&other_name)));
        assert!(!extras_equal(Some(&a), Some(&other_price)));
    }

    #[test]
    fn test_same_option_under_different_group_does_not_match() {
        let option = ExtraOption::new("Extra", Money::from_cents(100));
        let a = extras(&[("cheese", option.clone())]);
        let b = extras(&[("sauce", option)]);
        assert!(!extras_equal(Some(&a), Some(&b)));
    }

    #[test]
    fn test_absent_price_is_not_zero_price() {
        let a = extras(&[("note", ExtraOption::unpriced("No onions"))]);
        let b = extras(&[("note", ExtraOption::new("No onions", Money::zero()))]);
        assert!(!extras_equal(Some(&a), Some(&b)));

        let c = extras(&[("note", ExtraOption::unpriced("No onions"))]);
        assert!(extras_equal(Some(&a), Some(&c)));
    }

    #[test]
    fn test_price_scale_does_not_matter() {
        use rust_decimal::Decimal;

        let a = extras(&[("size", ExtraOption::new("Large", Money::from_cents(200)))]);
        let b = extras(&[(
            "size",
            ExtraOption::new("Large", Money::from_decimal(Decimal::new(2, 0))),
        )]);
        assert!(extras_equal(Some(&a), Some(&b)));
    }
}
