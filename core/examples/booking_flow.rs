// marina_core/examples/booking_flow.rs

use std::sync::Arc;

use chrono::{Duration, Utc};
use marina::{
  collections, fields_of, CardDetails, CatalogFilter, CatalogService, ConfirmationViewer,
  DocumentStore, FinalizeRequest, FinalizeService, FixedIdentity, MarinaError, MemoryStore,
  ProfileUpdate, SessionService,
};
use serde_json::json;
use tracing::info;

// Walks one booking end to end against the in-memory backend: browse,
// start a session, pick dates and add-ons, finalize, confirm.
#[tokio::main]
async fn main() -> Result<(), MarinaError> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Booking Flow Example ---");

  // 1. Stand up the backend and a signed-in identity.
  let store = Arc::new(MemoryStore::new());
  let identity = Arc::new(FixedIdentity::new("demo-customer"));

  store
    .set_merge(
      collections::ITEMS,
      "skiff-12",
      fields_of(json!({
        "brand": "Naviga",
        "model": "Skiff 12",
        "category": "skiff",
        "passengerCapacity": 4,
        "battery": "12V 100Ah",
        "pricePerDay": "72",
        "addOns": ["Cooler", "Rain Cover"],
      })),
    )
    .await?;

  // 2. Browse the catalog.
  let catalog = CatalogService::new(store.clone());
  let items = catalog.list(&CatalogFilter::default()).await?;
  info!("Catalog holds {} item(s)", items.len());

  // 3. Start a session with the first item selected.
  let sessions = SessionService::new(store.clone(), identity.clone());
  let session = sessions.create(vec![items[0].id.clone()]).await?;
  info!("Session started: {}", session.id);

  // 4. Capture the rental window and add-ons.
  let pickup = Utc::now() + Duration::days(7);
  sessions
    .set_dates(&session.id, pickup, pickup + Duration::days(2))
    .await?;
  sessions
    .set_addons(&session.id, vec!["Cooler".to_string()])
    .await?;

  // 5. Finalize: profile merge + booking + session transition, atomically.
  let finalizer = FinalizeService::new(store.clone(), identity.clone());
  let booking_id = finalizer
    .finalize(FinalizeRequest {
      session_id: session.id.clone(),
      profile: ProfileUpdate {
        first_name: Some("Demo".to_string()),
        last_name: Some("Customer".to_string()),
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
    })
    .await?;

  // 6. Confirm.
  let viewer = ConfirmationViewer::new(store.clone());
  let view = viewer.load(&booking_id).await?;
  info!(
    "Booking {} confirmed: base {}, tax {}, deposit {}, total {}",
    booking_id, view.totals.base, view.totals.tax, view.totals.deposit, view.totals.total
  );

  assert_eq!(view.booking.line_items.len(), 1);
  Ok(())
}
