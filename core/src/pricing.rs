// marina_core/src/pricing.rs

//! The pricing calculator.
//!
//! A pure function over (unit price, quantity) pairs. All arithmetic runs
//! on exact decimals; rounding to two places happens only on the output
//! fields, never between steps, so the result is identical for any
//! ordering of the input lines.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// One priced line of a selection: a resolved item's daily price and how
/// many units of it the session holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceLine {
  pub unit_price: Decimal,
  pub quantity: u32,
}

impl PriceLine {
  pub fn new(unit_price: Decimal, quantity: u32) -> Self {
    PriceLine {
      unit_price,
      quantity,
    }
  }
}

/// The totals breakdown persisted into a booking snapshot and shown on the
/// review and confirmation screens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
  pub base: Decimal,
  pub tax: Decimal,
  pub deposit: Decimal,
  pub total: Decimal,
}

/// Flat tax rate applied to the base amount.
pub fn tax_rate() -> Decimal {
  Decimal::new(10, 2) // 0.10
}

/// Flat refundable deposit, independent of the selection.
pub fn flat_deposit() -> Decimal {
  Decimal::new(5000, 2) // 50.00
}

/// Computes the totals breakdown for a list of priced lines.
///
/// base    = sum(unit_price * quantity)
/// tax     = base * 10%
/// deposit = 50.00
/// total   = base + tax + deposit
///
/// Deterministic and order-insensitive: summation is exact, and rounding
/// is applied once per output field.
pub fn quote(lines: &[PriceLine]) -> Totals {
  let exact_base: Decimal = lines
    .iter()
    .map(|line| line.unit_price * Decimal::from(line.quantity))
    .sum();

  let base = round_money(exact_base);
  let tax = round_money(exact_base * tax_rate());
  let deposit = flat_deposit();
  let total = round_money(base + tax + deposit);

  Totals {
    base,
    tax,
    deposit,
    total,
  }
}

fn round_money(amount: Decimal) -> Decimal {
  amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
