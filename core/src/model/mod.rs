// marina_core/src/model/mod.rs

//! Persisted entities of the booking flow.
//!
//! Documents travel as camelCase JSON maps (the wire shape the mobile
//! clients wrote); models here are the typed views the services work with.

pub mod booking;
pub mod item;
pub mod profile;
pub mod session;

pub use booking::{Booking, BookingLine, BookingStatus, CardDetails, PaymentSummary};
pub use item::RentalItem;
pub use profile::{CustomerProfile, ProfileUpdate};
pub use session::{DraftBooking, Session, SessionStatus};

use serde::Serialize;
use serde_json::Value;

use crate::store::Fields;

/// Serializes a model into a stored field map. Models serialize to JSON
/// objects by construction; anything else collapses to an empty map.
pub(crate) fn to_fields<T: Serialize>(value: &T) -> Fields {
  match serde_json::to_value(value) {
    Ok(Value::Object(map)) => map,
    _ => Fields::new(),
  }
}

/// Reads an optional string field off a raw document.
pub(crate) fn str_field(fields: &Fields, name: &str) -> Option<String> {
  fields.get(name).and_then(Value::as_str).map(str::to_string)
}
