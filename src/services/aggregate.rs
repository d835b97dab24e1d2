//! Group-by, top-N and formatting helpers shared by the view services.

use std::{cmp::Ordering, collections::BTreeMap, ops::AddAssign};

use rust_decimal::{prelude::ToPrimitive, Decimal, RoundingStrategy};

/// Sums `value` per `key`. Keys come back in ascending order.
pub fn group_sum<'a, T, K, V, I, FK, FV>(rows: I, key: FK, value: FV) -> BTreeMap<K, V>
where
    T: 'a,
    I: IntoIterator<Item = &'a T>,
    K: Ord,
    V: AddAssign + Default,
    FK: Fn(&T) -> K,
    FV: Fn(&T) -> V,
{
    let mut groups = BTreeMap::new();
    for row in rows {
        *groups.entry(key(row)).or_insert_with(V::default) += value(row);
    }
    groups
}

/// The `n` rows with the largest `key`, largest first. Ties keep input order.
pub fn top_n<T, K, F>(mut rows: Vec<T>, n: usize, key: F) -> Vec<T>
where
    K: PartialOrd,
    F: Fn(&T) -> K,
{
    rows.sort_by(|a, b| key(b).partial_cmp(&key(a)).unwrap_or(Ordering::Equal));
    rows.truncate(n);
    rows
}

/// Mean of `total` over `count` rows; `None` when there are no rows.
pub fn mean(total: Decimal, count: usize) -> Option<Decimal> {
    (count > 0).then(|| total / Decimal::from(count))
}

/// `numerator / denominator * 100`; `None` when the denominator is zero.
pub fn percent(numerator: Decimal, denominator: Decimal) -> Option<f64> {
    if denominator.is_zero() {
        return None;
    }
    (numerator / denominator * Decimal::ONE_HUNDRED).to_f64()
}

/// Multi-select category filter; `None` selects every category.
pub fn category_selected(selected: Option<&[String]>, category: &str) -> bool {
    selected.map_or(true, |names| names.iter().any(|name| name == category))
}

pub fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Formats `amount` as `"{symbol} 1,234,567"`, rounded half-to-even to whole units.
pub fn format_currency(symbol: &str, amount: Decimal) -> String {
    let whole = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven);
    let digits = whole.abs().trunc().to_string();
    let sign = if whole.is_sign_negative() && !whole.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{} {}{}", symbol, sign, group_digits(&digits))
}

/// Formats an integer with `,` thousands separators.
pub fn format_count(value: u64) -> String {
    group_digits(&value.to_string())
}

fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[test]
    fn group_sum_orders_keys() {
        let rows = vec![("b", 2), ("a", 1), ("b", 3)];
        let groups = group_sum(&rows, |r| r.0, |r| r.1);
        assert_eq!(groups.into_iter().collect::<Vec<_>>(), vec![("a", 1), ("b", 5)]);
    }

    #[test]
    fn top_n_is_stable_on_ties() {
        let rows = vec![("p1", 5), ("p2", 9), ("p3", 5), ("p4", 1)];
        let top = top_n(rows, 3, |r| r.1);
        assert_eq!(top, vec![("p2", 9), ("p1", 5), ("p3", 5)]);
    }

    #[test]
    fn top_n_with_fewer_rows_than_n() {
        assert_eq!(top_n(vec![1, 3], 5, |v| *v), vec![3, 1]);
    }

    #[test]
    fn mean_and_percent_guard_zero() {
        assert_eq!(mean(dec!(10), 0), None);
        assert_eq!(mean(dec!(10), 4), Some(dec!(2.5)));
        assert_eq!(percent(dec!(1), Decimal::ZERO), None);
        assert_eq!(percent(dec!(1), dec!(4)), Some(25.0));
    }

    #[test]
    fn category_filter_defaults_to_all() {
        let selected = vec!["Komponen".to_string()];
        assert!(category_selected(None, "Elektronik"));
        assert!(category_selected(Some(&selected), "Komponen"));
        assert!(!category_selected(Some(&selected), "Elektronik"));
        assert!(!category_selected(Some(&[]), "Komponen"));
    }

    #[rstest]
    #[case(dec!(0), "Rp 0")]
    #[case(dec!(999), "Rp 999")]
    #[case(dec!(1000), "Rp 1,000")]
    #[case(dec!(1234567.5), "Rp 1,234,568")]
    #[case(dec!(2.5), "Rp 2")]
    #[case(dec!(-1500000), "Rp -1,500,000")]
    fn currency_formatting(#[case] amount: Decimal, #[case] expected: &str) {
        assert_eq!(format_currency("Rp", amount), expected);
    }

    #[test]
    fn count_formatting() {
        assert_eq!(format_count(1234), "1,234");
        assert_eq!(format_count(12), "12");
    }
}
