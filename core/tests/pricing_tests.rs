// tests/pricing_tests.rs
mod common;
use common::setup_tracing;

use marina::pricing::{flat_deposit, quote, PriceLine, Totals};
use rust_decimal::Decimal;

fn dec(text: &str) -> Decimal {
  text.parse().unwrap()
}

#[test]
fn quote_matches_reference_breakdown() {
  setup_tracing();
  let lines = vec![
    PriceLine::new(dec("72.00"), 1),
    PriceLine::new(dec("45.00"), 1),
  ];
  let totals = quote(&lines);
  assert_eq!(
    totals,
    Totals {
      base: dec("117.00"),
      tax: dec("11.70"),
      deposit: dec("50.00"),
      total: dec("178.70"),
    }
  );
}

#[test]
fn quote_is_order_insensitive() {
  let forward = vec![
    PriceLine::new(dec("72.00"), 1),
    PriceLine::new(dec("45.00"), 1),
    PriceLine::new(dec("120.00"), 2),
  ];
  let mut reversed = forward.clone();
  reversed.reverse();
  assert_eq!(quote(&forward), quote(&reversed));
}

#[test]
fn quote_multiplies_quantities() {
  let lines = vec![PriceLine::new(dec("95.00"), 3)];
  let totals = quote(&lines);
  assert_eq!(totals.base, dec("285.00"));
  assert_eq!(totals.tax, dec("28.50"));
  assert_eq!(totals.total, dec("363.50"));
}

// Rounding happens once per output field, not between steps: three lines
// of 33.33 give an exact base of 99.99 and a tax of 9.999, which rounds
// half-away-from-zero to 10.00.
#[test]
fn quote_rounds_only_at_output() {
  let lines = vec![PriceLine::new(dec("33.33"), 3)];
  let totals = quote(&lines);
  assert_eq!(totals.base, dec("99.99"));
  assert_eq!(totals.tax, dec("10.00"));
  assert_eq!(totals.total, dec("159.99"));
}

#[test]
fn quote_on_empty_selection_is_deposit_only() {
  let totals = quote(&[]);
  assert_eq!(totals.base, Decimal::ZERO);
  assert_eq!(totals.tax, Decimal::ZERO);
  assert_eq!(totals.deposit, flat_deposit());
  assert_eq!(totals.total, flat_deposit());
}
