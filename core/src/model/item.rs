// marina_core/src/model/item.rs

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use crate::model::str_field;
use crate::normalize;
use crate::store::Record;

/// A rentable catalog item, normalized for display and pricing.
///
/// The stored document is read-only to this core and heterogeneously
/// encoded (see `normalize`); this struct is the cleaned-up view every
/// screen works with. `price_per_day` and `add_ons` are always normalized,
/// never raw.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalItem {
  pub id: String,
  pub brand: String,
  pub model: String,
  pub image_url: Option<String>,
  pub category: Option<String>,
  pub passenger_capacity: Option<u32>,
  pub battery: Option<String>,
  pub price_per_day: Decimal,
  pub add_ons: Vec<String>,
}

impl RentalItem {
  /// Builds the normalized view from a raw catalog document. Unknown or
  /// missing fields degrade to empty values; price and add-ons go through
  /// the shared normalization functions.
  pub fn from_record(record: &Record) -> RentalItem {
    let fields = &record.fields;
    RentalItem {
      id: record.id.clone(),
      brand: str_field(fields, "brand").unwrap_or_default(),
      model: str_field(fields, "model").unwrap_or_default(),
      image_url: str_field(fields, "imageUrl"),
      category: str_field(fields, "category"),
      passenger_capacity: fields
        .get("passengerCapacity")
        .and_then(Value::as_u64)
        .map(|capacity| capacity as u32),
      battery: str_field(fields, "battery"),
      price_per_day: normalize::price_from_value(fields.get("pricePerDay")),
      add_ons: normalize::addons_from_value(fields.get("addOns")),
    }
  }

  /// Display label used by the screens ("Nautique Lagoon 22").
  pub fn display_name(&self) -> String {
    format!("{} {}", self.brand, self.model).trim().to_string()
  }
}
