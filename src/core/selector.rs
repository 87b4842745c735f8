//! Rate selection: parcel weight, rate filtering, carrier preference and markup.
//!
//! Everything here is pure so it can be exercised without an aggregator.

use crate::domain::model::{CartItem, Rate, SelectedRate};
use crate::utils::error::{Result, ShippingError};
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// A rate whose amount parsed to a positive number.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedRate {
    pub rate: Rate,
    pub amount: Decimal,
}

/// Sum of item quantities. A zero quantity counts as one item.
pub fn total_quantity(items: &[CartItem]) -> u32 {
    items
        .iter()
        .map(|item| item.quantity.max(1))
        .fold(0u32, u32::saturating_add)
}

pub fn parcel_weight(total_quantity: u32, min_weight: u32, weight_per_item: u32) -> u32 {
    total_quantity.saturating_mul(weight_per_item).max(min_weight)
}

pub fn parse_amount(amount: &str) -> Option<Decimal> {
    Decimal::from_str(amount.trim())
        .ok()
        .filter(|value| *value > Decimal::ZERO)
}

/// Drops rates with non-numeric or non-positive amounts, keeping aggregator order.
pub fn usable_rates(rates: &[Rate]) -> Vec<PricedRate> {
    rates
        .iter()
        .filter_map(|rate| {
            parse_amount(&rate.amount).map(|amount| PricedRate {
                rate: rate.clone(),
                amount,
            })
        })
        .collect()
}

/// Picks the cheapest rate, restricted to the preferred carrier whenever that
/// carrier quoted at all. The sort is stable, so equal amounts keep the order
/// the aggregator returned them in.
pub fn select_rate(rates: &[Rate], preferred_carrier: &str) -> Result<PricedRate> {
    let valid_rates = usable_rates(rates);
    if valid_rates.is_empty() {
        return Err(ShippingError::no_rates(
            "No valid shipping rates available for this address",
        ));
    }

    let (preferred, others): (Vec<PricedRate>, Vec<PricedRate>) = valid_rates
        .into_iter()
        .partition(|priced| priced.rate.provider.eq_ignore_ascii_case(preferred_carrier));

    let mut pool = if preferred.is_empty() { others } else { preferred };
    pool.sort_by(|a, b| a.amount.cmp(&b.amount));

    pool.into_iter()
        .next()
        .ok_or_else(|| ShippingError::no_rates("No shipping rates available for this address"))
}

pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Adds the markup to the base amount. The base comes from the aggregator, so
/// an amount too large to carry the markup is reported instead of overflowing.
pub fn apply_markup(priced: PricedRate, markup: Decimal) -> Result<SelectedRate> {
    let total = priced.amount.checked_add(markup).ok_or_else(|| {
        ShippingError::upstream(format!(
            "Rate aggregator returned an unusable amount: {}",
            priced.rate.amount
        ))
    })?;

    Ok(SelectedRate {
        shipping_cost: round2(total),
        base_cost: priced.amount,
        markup,
        carrier: priced.rate.provider,
        service_level: priced.rate.service_level,
        estimated_days: priced.rate.estimated_days,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate(provider: &str, amount: &str) -> Rate {
        Rate {
            provider: provider.to_string(),
            amount: amount.to_string(),
            currency: Some("USD".to_string()),
            service_level: Some(format!("{} Ground", provider)),
            estimated_days: Some(3),
        }
    }

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    #[test]
    fn test_total_quantity_and_weight() {
        let items = vec![CartItem::new(2)];
        assert_eq!(total_quantity(&items), 2);
        assert_eq!(parcel_weight(total_quantity(&items), 8, 16), 32);

        let items = vec![CartItem::new(1), CartItem::new(3)];
        assert_eq!(total_quantity(&items), 4);
        assert_eq!(parcel_weight(4, 8, 16), 64);
    }

    #[test]
    fn test_weight_floor_applies() {
        assert_eq!(parcel_weight(0, 8, 16), 8);
        assert_eq!(parcel_weight(1, 20, 16), 20);
    }

    #[test]
    fn test_zero_quantity_counts_as_one() {
        let items = vec![CartItem::new(0), CartItem::new(2)];
        assert_eq!(total_quantity(&items), 3);
    }

    #[test]
    fn test_preferred_carrier_wins_even_when_more_expensive() {
        let rates = vec![rate("ups", "10.00"), rate("usps", "15.00")];

        let selected = select_rate(&rates, "usps").unwrap();

        assert_eq!(selected.rate.provider, "usps");
        assert_eq!(selected.amount, dec("15.00"));
    }

    #[test]
    fn test_preferred_carrier_match_is_case_insensitive() {
        let rates = vec![rate("UPS", "4.00"), rate("USPS", "7.25")];

        let selected = select_rate(&rates, "usps").unwrap();

        assert_eq!(selected.rate.provider, "USPS");
    }

    #[test]
    fn test_cheapest_when_no_preferred_carrier_quoted() {
        let rates = vec![rate("ups", "12.00"), rate("fedex", "9.00")];

        let selected = select_rate(&rates, "usps").unwrap();

        assert_eq!(selected.rate.provider, "fedex");
        assert_eq!(selected.amount, dec("9.00"));
    }

    #[test]
    fn test_cheapest_within_preferred_carrier() {
        let rates = vec![
            rate("usps", "12.40"),
            rate("ups", "3.00"),
            rate("usps", "8.10"),
        ];

        let selected = select_rate(&rates, "usps").unwrap();

        assert_eq!(selected.amount, dec("8.10"));
    }

    #[test]
    fn test_ties_keep_aggregator_order() {
        let mut first = rate("usps", "8.00");
        first.service_level = Some("Ground Advantage".to_string());
        let mut second = rate("usps", "8.00");
        second.service_level = Some("Priority Mail".to_string());

        let selected = select_rate(&[first, second], "usps").unwrap();

        assert_eq!(
            selected.rate.service_level.as_deref(),
            Some("Ground Advantage")
        );
    }

    #[test]
    fn test_invalid_amounts_are_excluded() {
        let rates = vec![
            rate("usps", "0.00"),
            rate("usps", "-3.00"),
            rate("usps", "free"),
            rate("ups", "11.00"),
        ];

        let selected = select_rate(&rates, "usps").unwrap();

        assert_eq!(selected.rate.provider, "ups");
        assert_eq!(usable_rates(&rates).len(), 1);
    }

    #[test]
    fn test_all_invalid_rates_yield_no_rates_error() {
        let rates = vec![rate("usps", "0"), rate("ups", ""), rate("fedex", "n/a")];

        let err = select_rate(&rates, "usps").unwrap_err();

        assert!(matches!(err, ShippingError::NoRatesError { .. }));
    }

    #[test]
    fn test_apply_markup() {
        let priced = PricedRate {
            rate: rate("fedex", "9.00"),
            amount: dec("9.00"),
        };

        let selected = apply_markup(priced, dec("2.50")).unwrap();

        assert_eq!(selected.shipping_cost, dec("11.50"));
        assert_eq!(selected.base_cost, dec("9.00"));
        assert_eq!(selected.markup, dec("2.50"));
        assert_eq!(selected.carrier, "fedex");
        assert_eq!(selected.estimated_days, Some(3));
    }

    #[test]
    fn test_markup_on_oversized_amount_is_upstream_error() {
        let rates = vec![rate("usps", "79228162514264337593543950335")];
        let priced = select_rate(&rates, "usps").unwrap();
        assert_eq!(priced.amount, Decimal::MAX);

        let err = apply_markup(priced, dec("2.50")).unwrap_err();

        assert!(matches!(err, ShippingError::UpstreamError { .. }));
        assert!(err.to_string().contains("unusable amount"));
    }

    #[test]
    fn test_round2_rounds_half_up() {
        assert_eq!(round2(dec("7.345")), dec("7.35"));
        assert_eq!(round2(dec("7.344")), dec("7.34"));
        assert_eq!(round2(dec("10")), dec("10"));
    }
}
