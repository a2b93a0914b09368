//! Property-based integration tests for price import.
//!
//! These tests verify that universal properties hold across all valid inputs,
//! using the `proptest` crate for random test case generation.

use proptest::prelude::*;
use pricebook_core::commodities::{Commodity, InMemoryCommodityTable};
use pricebook_core::import::parsers::{format_amount, parse_amount};
use pricebook_core::import::{CurrencyFormat, DateFormat, ImportPrice, PricePropType};
use pricebook_core::prices::{InMemoryPriceDb, PriceOutcome};
use rust_decimal::Decimal;
use std::sync::Arc;

// =============================================================================
// Generators
// =============================================================================

/// Generates an explicit currency format.
fn arb_currency_format() -> impl Strategy<Value = CurrencyFormat> {
    prop_oneof![
        Just(CurrencyFormat::DecimalPeriod),
        Just(CurrencyFormat::DecimalComma),
    ]
}

/// Generates an amount with up to 8 decimal places.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (-1_000_000_000_000i64..1_000_000_000_000i64, 0u32..=8)
        .prop_map(|(mantissa, scale)| Decimal::new(mantissa, scale))
}

/// Generates an integer amount with digit grouping, e.g. "12,345,678".
fn arb_grouped_integer() -> impl Strategy<Value = (u64, String)> {
    (1_000u64..1_000_000_000_000u64).prop_map(|n| {
        let digits = n.to_string();
        let mut grouped = String::new();
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }
        (n, grouped)
    })
}

fn book() -> Arc<InMemoryCommodityTable> {
    Arc::new(InMemoryCommodityTable::with_commodities(vec![
        Commodity::currency("USD", "US Dollar", 100),
        Commodity::currency("EUR", "Euro", 100),
        Commodity::new("NASDAQ", "AAPL", "Apple Inc.", 1),
    ]))
}

fn columns() -> Vec<(PricePropType, &'static str)> {
    vec![
        (PricePropType::Date, "2024-01-15"),
        (PricePropType::Amount, "150.25"),
        (PricePropType::FromSymbol, "AAPL"),
        (PricePropType::FromNamespace, "NASDAQ"),
        (PricePropType::ToCurrency, "USD"),
    ]
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    /// Formatting then parsing an amount with the same format is lossless.
    #[test]
    fn prop_amount_format_parse_round_trip(
        amount in arb_amount(),
        format in arb_currency_format(),
    ) {
        let text = format_amount(amount, format);
        let parsed = parse_amount(&text, format).unwrap();
        prop_assert_eq!(parsed, amount);
    }

    /// Digit grouping with the format's group separator does not change
    /// the value.
    #[test]
    fn prop_grouped_amount_parses(
        (n, grouped) in arb_grouped_integer(),
    ) {
        let parsed = parse_amount(&grouped, CurrencyFormat::DecimalPeriod).unwrap();
        prop_assert_eq!(parsed, Decimal::from(n));

        let with_cents = format!("{}.50", grouped);
        let parsed = parse_amount(&with_cents, CurrencyFormat::DecimalPeriod).unwrap();
        prop_assert_eq!(parsed, Decimal::from(n) + Decimal::new(50, 2));
    }

    /// The order in which columns are set does not affect the resulting
    /// price.
    #[test]
    fn prop_set_order_independent(
        order in Just(columns()).prop_shuffle(),
    ) {
        let book = book();
        let mut price = ImportPrice::new(
            book.clone(),
            DateFormat::YearMonthDay,
            CurrencyFormat::DecimalPeriod,
        );
        for (kind, value) in &order {
            prop_assert!(price.set(*kind, value, true).is_ok());
        }

        prop_assert!(!price.has_errors());
        prop_assert!(price.verify_essentials().is_ok());
        prop_assert_eq!(price.from_commodity().map(|c| c.mnemonic.as_str()), Some("AAPL"));
        prop_assert_eq!(price.to_currency().map(|c| c.mnemonic.as_str()), Some("USD"));

        let pdb = InMemoryPriceDb::new();
        prop_assert_eq!(
            price.create_price(book.as_ref(), &pdb, false).unwrap(),
            PriceOutcome::Added
        );
    }

    /// Setting the same value twice leaves the same state as setting it once.
    #[test]
    fn prop_set_idempotent(
        value in "[0-9a-z.,-]{0,12}",
        kind in prop_oneof![
            Just(PricePropType::Date),
            Just(PricePropType::Amount),
            Just(PricePropType::FromSymbol),
            Just(PricePropType::FromNamespace),
            Just(PricePropType::ToCurrency),
        ],
    ) {
        let book = book();
        let mut price = ImportPrice::new(
            book,
            DateFormat::YearMonthDay,
            CurrencyFormat::DecimalPeriod,
        );

        let first = price.set(kind, &value, false);
        let snapshot = (
            price.date(),
            price.amount(),
            price.from_symbol().map(str::to_string),
            price.from_namespace().map(str::to_string),
            price.to_currency().cloned(),
            price.errors(),
        );

        let second = price.set(kind, &value, false);
        prop_assert_eq!(first, second);
        prop_assert_eq!(
            (
                price.date(),
                price.amount(),
                price.from_symbol().map(str::to_string),
                price.from_namespace().map(str::to_string),
                price.to_currency().cloned(),
                price.errors(),
            ),
            snapshot
        );
    }

    /// Whatever is set, a stored pair never refers to the same commodity
    /// twice.
    #[test]
    fn prop_pair_never_self_referential(
        symbol in prop_oneof![Just("USD"), Just("EUR"), Just("AAPL")],
        namespace in prop_oneof![Just("CURRENCY"), Just("NASDAQ")],
        currency in prop_oneof![Just("USD"), Just("EUR")],
        currency_first in any::<bool>(),
    ) {
        let mut price = ImportPrice::new(
            book(),
            DateFormat::YearMonthDay,
            CurrencyFormat::DecimalPeriod,
        );
        if currency_first {
            let _ = price.set(PricePropType::ToCurrency, currency, true);
        }
        let _ = price.set(PricePropType::FromNamespace, namespace, true);
        let _ = price.set(PricePropType::FromSymbol, symbol, true);
        if !currency_first {
            let _ = price.set(PricePropType::ToCurrency, currency, true);
        }

        if let (Some(from), Some(to)) = (price.from_commodity(), price.to_currency()) {
            prop_assert_ne!(from, to);
        }
    }
}
