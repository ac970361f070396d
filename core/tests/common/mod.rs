// tests/common/mod.rs
#![allow(dead_code)] // Allow unused helpers in this common test module

use std::sync::Arc;

use marina::{
  collections, fields_of, CardDetails, DocumentStore, FinalizeRequest, FinalizeService,
  FixedIdentity, IdentityProvider, MemoryStore, ProfileUpdate, SessionService,
};
use serde_json::json;
use tracing::Level;

/// The signed-in customer every test flow runs as.
pub const CUSTOMER: &str = "customer-7431";

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

/// A store seeded with a small catalog that deliberately spans every
/// encoding the normalization layer must handle: prices as strings,
/// numbers and currency-formatted strings; add-ons as a native array, a
/// map, a JSON-encoded string, and a bracketed comma-separated string.
pub async fn seeded_store() -> Arc<MemoryStore> {
  let store = Arc::new(MemoryStore::new());

  store
    .set_merge(
      collections::ITEMS,
      "skiff-12",
      fields_of(json!({
        "brand": "Naviga",
        "model": "Skiff 12",
        "imageUrl": "https://img.example/skiff-12.jpg",
        "category": "skiff",
        "passengerCapacity": 4,
        "battery": "12V 100Ah",
        "pricePerDay": "72",
        "addOns": ["Cooler", "Rain Cover"],
      })),
    )
    .await
    .unwrap();

  store
    .set_merge(
      collections::ITEMS,
      "lagoon-22",
      fields_of(json!({
        "brand": "Blue Bay",
        "model": "Lagoon 22",
        "imageUrl": "https://img.example/lagoon-22.jpg",
        "category": "pontoon",
        "passengerCapacity": 8,
        "battery": "24V 160Ah",
        "pricePerDay": 95,
        "addOns": { "a": "Cooler", "b": "Bimini Top" },
      })),
    )
    .await
    .unwrap();

  store
    .set_merge(
      collections::ITEMS,
      "bay-cruiser-26",
      fields_of(json!({
        "brand": "Chandler",
        "model": "Bay Cruiser 26",
        "category": "pontoon",
        "passengerCapacity": 10,
        "battery": "48V 200Ah",
        "pricePerDay": "$120.00",
        "addOns": "[\"Tube\",\"Wakeboard\"]",
      })),
    )
    .await
    .unwrap();

  store
    .set_merge(
      collections::ITEMS,
      "dinghy-8",
      fields_of(json!({
        "brand": "Naviga",
        "model": "Dinghy 8",
        "category": "dinghy",
        "passengerCapacity": 2,
        "battery": "12V 60Ah",
        "pricePerDay": "45",
        "addOns": "[Cooler, Dry Bag]",
      })),
    )
    .await
    .unwrap();

  store
}

pub fn signed_in() -> Arc<dyn IdentityProvider> {
  Arc::new(FixedIdentity::new(CUSTOMER))
}

pub fn session_service(store: &Arc<MemoryStore>) -> SessionService {
  SessionService::new(store.clone(), signed_in())
}

pub fn finalize_service(store: &Arc<MemoryStore>) -> FinalizeService {
  FinalizeService::new(store.clone(), signed_in())
}

/// A finalize request that satisfies every precondition, saving payment
/// info by default.
pub fn valid_finalize_request(session_id: &str) -> FinalizeRequest {
  FinalizeRequest {
    session_id: session_id.to_string(),
    profile: ProfileUpdate {
      first_name: Some("Rhea".to_string()),
      last_name: Some("Santos".to_string()),
      email: Some("rhea@example.com".to_string()),
      phone: Some("+1-555-0100".to_string()),
      ..ProfileUpdate::default()
    },
    accepted_rental_terms: true,
    accepted_liability_waiver: true,
    currency: "USD".to_string(),
    payment: Some(CardDetails {
      card_brand: "visa".to_string(),
      card_last4: "4242".to_string(),
      card_expiry: "11/27".to_string(),
    }),
  }
}
