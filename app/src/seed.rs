// marina_project/app/src/seed.rs

//! Startup catalog fixtures for the demo.
//!
//! The stored shapes deliberately mirror the production catalog's mess:
//! prices arrive as bare strings, numbers, and currency-formatted strings,
//! and add-on lists arrive in all four historical encodings. The flow has
//! to normalize every one of them.

use crate::errors::Result;
use marina::{collections, fields_of, DocumentStore};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

pub async fn seed_catalog(store: &Arc<dyn DocumentStore>) -> Result<()> {
  let boats = [
    (
      "skiff-12",
      json!({
        "brand": "Naviga",
        "model": "Skiff 12",
        "imageUrl": "https://img.example/skiff-12.jpg",
        "category": "skiff",
        "passengerCapacity": 4,
        "battery": "12V 100Ah AGM",
        "pricePerDay": "72",
        "addOns": ["Cooler", "Rain Cover"],
      }),
    ),
    (
      "lagoon-22",
      json!({
        "brand": "Blue Bay",
        "model": "Lagoon 22",
        "imageUrl": "https://img.example/lagoon-22.jpg",
        "category": "pontoon",
        "passengerCapacity": 8,
        "battery": "24V 160Ah Lithium",
        "pricePerDay": 95,
        "addOns": { "a": "Cooler", "b": "Bimini Top", "c": "Bluetooth Speaker" },
      }),
    ),
    (
      "bay-cruiser-26",
      json!({
        "brand": "Chandler",
        "model": "Bay Cruiser 26",
        "imageUrl": "https://img.example/bay-cruiser-26.jpg",
        "category": "pontoon",
        "passengerCapacity": 10,
        "battery": "48V 200Ah Lithium",
        "pricePerDay": "$120.00",
        "addOns": "[\"Tube\",\"Wakeboard\",\"Cooler\"]",
      }),
    ),
    (
      "dinghy-8",
      json!({
        "brand": "Naviga",
        "model": "Dinghy 8",
        "imageUrl": "https://img.example/dinghy-8.jpg",
        "category": "dinghy",
        "passengerCapacity": 2,
        "battery": "12V 60Ah AGM",
        "pricePerDay": "45",
        "addOns": "[Cooler, Dry Bag]",
      }),
    ),
    (
      "harbor-18",
      json!({
        "brand": "Meridian",
        "model": "Harbor 18",
        "imageUrl": "https://img.example/harbor-18.jpg",
        "category": "skiff",
        "passengerCapacity": 6,
        "battery": "24V 120Ah AGM",
        "pricePerDay": "$139.50",
        "addOns": ["Fishing Rod Holders", "Cooler", "Anchor Kit"],
      }),
    ),
  ];

  let count = boats.len();
  for (id, fields) in boats {
    store
      .set_merge(collections::ITEMS, id, fields_of(fields))
      .await?;
  }
  info!("Seeded {} catalog items.", count);
  Ok(())
}
