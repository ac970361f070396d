// marina_project/app/src/main.rs

// Declare modules for the application
mod config;
mod errors;
mod screens;
mod seed;
mod state;

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::screens::{
  AddonsScreen, CatalogScreen, ConfirmationScreen, DetailsScreen, PaymentScreen, ReviewScreen,
};
use crate::state::AppState;

use chrono::{Duration, Utc};
use marina::{DocumentStore, FixedIdentity, MemoryStore};
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan; // For span events in tracing

// Main function
#[tokio::main]
async fn main() -> Result<(), AppError> {
  // Initialize tracing subscriber for logging
  // (Customize as needed, e.g., with JSON output, OpenTelemetry)
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO) // Default level
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()) // Allow RUST_LOG override
    .with_span_events(FmtSpan::CLOSE) // Log when spans close, showing duration
    .init();

  tracing::info!("Starting marina booking-flow demo...");

  // Load application configuration
  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg), // Arc the config for sharing
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      // For a simple demo, panic is okay. In prod, might exit gracefully.
      panic!("Configuration error: {}", e);
    }
  };

  // The demo runs against the in-memory backend with a signed-in identity.
  let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
  let identity = Arc::new(FixedIdentity::new(app_config.demo_customer_subject.clone()));

  if app_config.seed_catalog {
    seed::seed_catalog(&store).await?;
  }

  let app_state = AppState {
    store,
    identity,
    config: app_config.clone(),
  };

  // --- Screen 1: browse the catalog and pick a boat ---
  let mut catalog_screen = CatalogScreen::new(app_state.clone());
  catalog_screen.open().await?;
  if !catalog_screen.phase().is_ready() {
    panic!("Catalog screen failed to load: {:?}", catalog_screen.phase());
  }
  tracing::info!("Catalog screen ready with {} boats.", catalog_screen.items().len());

  // Narrow the browse list to pontoons that seat the whole party.
  catalog_screen
    .set_filter(marina::CatalogFilter {
      category: Some("pontoon".to_string()),
      min_capacity: Some(6),
    })
    .await?;
  let items = catalog_screen.items();
  tracing::info!("{} boats match the facets.", items.len());
  let chosen = items
    .first()
    .ok_or_else(|| AppError::NotFound("no boats match the facets".to_string()))?;
  let session = catalog_screen.choose(&chosen.id).await?;
  catalog_screen.close();

  // --- Screen 2: details, single selection, and the rental window ---
  let details_screen = DetailsScreen::new(app_state.clone(), &session.id);
  details_screen.open().await?;
  tracing::info!(
    "Details screen shows {} candidate(s), phase {:?}.",
    details_screen.candidates().len(),
    details_screen.phase()
  );
  details_screen.toggle_item(&chosen.id).await?;
  let pickup = Utc::now() + Duration::days(7);
  details_screen.set_range(pickup, pickup + Duration::days(2)).await?;
  details_screen.close();

  // --- Screen 3: add-ons ---
  let addons_screen = AddonsScreen::new(app_state.clone(), &session.id);
  addons_screen.open().await?;
  if let Some(first_addon) = addons_screen.available().first().cloned() {
    addons_screen.toggle(&first_addon);
  }
  tracing::info!("Add-ons selected: {:?}", addons_screen.selected());
  addons_screen.save().await?;
  addons_screen.close();

  // --- Screen 4: review the cart and totals ---
  let review_screen = ReviewScreen::new(app_state.clone(), &session.id);
  review_screen.open().await?;
  if !review_screen.phase().is_ready() {
    panic!("Review screen failed to load: {:?}", review_screen.phase());
  }
  for line in review_screen.lines() {
    tracing::info!(
      "In cart: {} x{} at {}/day",
      line.name,
      line.quantity,
      line.unit_price
    );
  }
  if let Some(totals) = review_screen.totals() {
    tracing::info!(
      "Review totals: base {}, tax {}, deposit {}, total {}",
      totals.base,
      totals.tax,
      totals.deposit,
      totals.total
    );
  }
  review_screen.close();

  // --- Screen 5: payment details and finalization ---
  let payment_screen = PaymentScreen::new(app_state.clone(), &session.id);
  let mut form = payment_screen.prefill().await?;
  form.first_name = "Rhea".to_string();
  form.last_name = "Santos".to_string();
  form.email = "rhea@example.com".to_string();
  form.phone = "+1-555-0100".to_string();
  form.address_line1 = "14 Dockside Way".to_string();
  form.city = "Port Haven".to_string();
  form.postal_code = "04401".to_string();
  // Collected by the form, never persisted: only brand/last4/expiry survive.
  form.card_number = "4242 4242 4242 4242".to_string();
  form.card_cvv = "123".to_string();
  form.card_expiry = "11/27".to_string();
  form.save_payment_info = true;
  form.accepted_rental_terms = true;
  form.accepted_liability_waiver = true;

  let booking_id = match payment_screen.submit(&form).await {
    Ok(id) => id,
    Err(e) => {
      tracing::error!("Finalization failed: {}", e.user_message());
      return Err(e);
    }
  };

  // --- Screen 6: confirmation ---
  let mut confirmation_screen = ConfirmationScreen::new(app_state.clone(), &booking_id);
  confirmation_screen.open().await?;
  tracing::info!("Confirmation screen phase: {:?}", confirmation_screen.phase());
  if let Some(view) = confirmation_screen.view() {
    tracing::info!(
      "Booking {} confirmed for session {}: total {} {} ({} line item(s), deposit {}).",
      booking_id,
      view.booking.session_id,
      view.totals.total,
      app_state.config.currency,
      view.booking.line_items.len(),
      view.totals.deposit
    );
  }
  confirmation_screen.close();

  tracing::info!("Demo flow complete.");
  Ok(())
}
