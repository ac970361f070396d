// marina_core/src/model/booking.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{MarinaError, MarinaResult};
use crate::model::to_fields;
use crate::pricing::Totals;
use crate::store::{Fields, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
  Confirmed,
}

/// One expanded line of a booking snapshot: the bare item id from the
/// draft, widened to the fields the confirmation screen renders and the
/// unit price the totals were computed from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingLine {
  pub item_id: String,
  pub brand: String,
  pub model: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub image_url: Option<String>,
  pub unit_price: Decimal,
  pub quantity: u32,
}

/// The immutable record created when a session is finalized.
///
/// The cart and pricing are a frozen snapshot of finalization time; later
/// catalog price changes never touch an existing booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
  #[serde(skip)]
  pub id: String,
  pub customer_id: String,
  pub session_id: String,
  pub status: BookingStatus,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub created_at: Option<DateTime<Utc>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub pickup_at: Option<DateTime<Utc>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub dropoff_at: Option<DateTime<Utc>>,
  #[serde(default)]
  pub add_ons: Vec<String>,
  #[serde(default)]
  pub line_items: Vec<BookingLine>,
  // Optional only for compatibility with snapshots written before totals
  // were persisted; the confirmation viewer recomputes when absent.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub totals: Option<Totals>,
}

impl Booking {
  pub fn from_record(record: &Record) -> MarinaResult<Booking> {
    let mut booking: Booking = serde_json::from_value(Value::Object(record.fields.clone()))
      .map_err(|err| {
        MarinaError::Internal(format!("malformed booking document '{}': {}", record.id, err))
      })?;
    booking.id = record.id.clone();
    Ok(booking)
  }

  pub fn to_fields(&self) -> Fields {
    to_fields(self)
  }
}

/// Non-sensitive card identity collected on the payment screen.
///
/// This is the full extent of what crosses into the core: the primary
/// account number and CVV are collected by the form but are never passed
/// to, nor persisted by, any marina API. Real charging is an external
/// collaborator invoked before finalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDetails {
  pub card_brand: String,
  pub card_last4: String,
  pub card_expiry: String,
}

/// The optional "payment info saved" record linked to a finalized booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSummary {
  pub customer_id: String,
  pub session_id: String,
  pub booking_id: String,
  pub amount: Decimal,
  pub currency: String,
  pub card_brand: String,
  pub card_last4: String,
  pub card_expiry: String,
  pub status: String,
}

impl PaymentSummary {
  pub fn saved(
    customer_id: impl Into<String>,
    session_id: impl Into<String>,
    booking_id: impl Into<String>,
    amount: Decimal,
    currency: impl Into<String>,
    card: CardDetails,
  ) -> PaymentSummary {
    PaymentSummary {
      customer_id: customer_id.into(),
      session_id: session_id.into(),
      booking_id: booking_id.into(),
      amount,
      currency: currency.into(),
      card_brand: card.card_brand,
      card_last4: card.card_last4,
      card_expiry: card.card_expiry,
      status: "saved".to_string(),
    }
  }

  pub fn to_fields(&self) -> Fields {
    to_fields(self)
  }
}
