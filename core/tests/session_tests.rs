// tests/session_tests.rs
mod common;
use common::{seeded_store, session_service, setup_tracing, CUSTOMER};

use chrono::{Duration, Utc};
use marina::{MarinaError, SessionService, SessionStatus, SignedOut};
use std::sync::Arc;

#[tokio::test]
async fn create_requires_a_signed_in_customer() {
  setup_tracing();
  let store = seeded_store().await;
  let service = SessionService::new(store.clone(), Arc::new(SignedOut));

  let err = service.create(vec!["skiff-12".to_string()]).await.unwrap_err();
  assert!(matches!(err, MarinaError::Unauthenticated { .. }));
}

#[tokio::test]
async fn create_starts_an_in_progress_draft() {
  setup_tracing();
  let store = seeded_store().await;
  let service = session_service(&store);

  let session = service.create(vec!["skiff-12".to_string()]).await.unwrap();
  assert_eq!(session.customer_id, CUSTOMER);
  assert_eq!(session.status, SessionStatus::InProgress);
  assert_eq!(session.draft.item_ids, vec!["skiff-12"]);
  assert!(session.draft.pickup_at.is_none());
  assert!(session.booking_id.is_none());
  assert!(session.created_at.is_some());
}

#[tokio::test]
async fn set_dates_merges_without_touching_the_selection() {
  setup_tracing();
  let store = seeded_store().await;
  let service = session_service(&store);
  let session = service.create(vec!["skiff-12".to_string()]).await.unwrap();

  let pickup = Utc::now() + Duration::days(3);
  let dropoff = pickup + Duration::days(2);
  service.set_dates(&session.id, pickup, dropoff).await.unwrap();

  let reloaded = service.get(&session.id).await.unwrap();
  assert_eq!(reloaded.draft.pickup_at, Some(pickup));
  assert_eq!(reloaded.draft.dropoff_at, Some(dropoff));
  // The narrow merge leaves the other draft slices alone.
  assert_eq!(reloaded.draft.item_ids, vec!["skiff-12"]);
}

#[tokio::test]
async fn set_dates_rejects_an_inverted_range() {
  setup_tracing();
  let store = seeded_store().await;
  let service = session_service(&store);
  let session = service.create(vec!["skiff-12".to_string()]).await.unwrap();

  let pickup = Utc::now() + Duration::days(3);
  let err = service
    .set_dates(&session.id, pickup, pickup - Duration::hours(1))
    .await
    .unwrap_err();
  assert!(matches!(err, MarinaError::Validation { .. }));
}

#[tokio::test]
async fn set_dates_on_a_missing_session_is_not_found() {
  setup_tracing();
  let store = seeded_store().await;
  let service = session_service(&store);

  let pickup = Utc::now();
  let err = service
    .set_dates("ghost-session", pickup, pickup + Duration::days(1))
    .await
    .unwrap_err();
  assert!(matches!(err, MarinaError::NotFound { .. }));
}

#[tokio::test]
async fn set_addons_replaces_and_deduplicates() {
  setup_tracing();
  let store = seeded_store().await;
  let service = session_service(&store);
  let session = service.create(vec!["skiff-12".to_string()]).await.unwrap();

  service
    .set_addons(
      &session.id,
      vec!["Cooler".to_string(), " Cooler ".to_string(), "Tube".to_string()],
    )
    .await
    .unwrap();
  let reloaded = service.get(&session.id).await.unwrap();
  assert_eq!(reloaded.draft.add_ons, vec!["Cooler", "Tube"]);

  // A second write replaces the list outright; nothing accumulates.
  service
    .set_addons(&session.id, vec!["Dry Bag".to_string()])
    .await
    .unwrap();
  let reloaded = service.get(&session.id).await.unwrap();
  assert_eq!(reloaded.draft.add_ons, vec!["Dry Bag"]);
}

#[tokio::test]
async fn set_items_replaces_the_selection() {
  setup_tracing();
  let store = seeded_store().await;
  let service = session_service(&store);
  let session = service.create(vec!["skiff-12".to_string()]).await.unwrap();

  service
    .set_items(&session.id, vec!["lagoon-22".to_string()])
    .await
    .unwrap();
  let reloaded = service.get(&session.id).await.unwrap();
  assert_eq!(reloaded.draft.item_ids, vec!["lagoon-22"]);
}

#[tokio::test]
async fn mutations_are_rejected_once_booked() {
  setup_tracing();
  let store = seeded_store().await;
  let service = session_service(&store);
  let finalizer = common::finalize_service(&store);
  let session = service.create(vec!["skiff-12".to_string()]).await.unwrap();

  finalizer
    .finalize(common::valid_finalize_request(&session.id))
    .await
    .unwrap();

  let err = service
    .set_items(&session.id, vec!["dinghy-8".to_string()])
    .await
    .unwrap_err();
  assert!(matches!(err, MarinaError::AlreadyBooked { .. }));

  let reloaded = service.get(&session.id).await.unwrap();
  assert_eq!(reloaded.status, SessionStatus::Booked);
}

#[tokio::test]
async fn backend_outage_surfaces_as_retryable() {
  setup_tracing();
  let store = seeded_store().await;
  let service = session_service(&store);
  let session = service.create(vec!["skiff-12".to_string()]).await.unwrap();

  store.set_offline(true);
  let err = service.get(&session.id).await.unwrap_err();
  assert!(err.is_retryable());

  store.set_offline(false);
  assert!(service.get(&session.id).await.is_ok());
}
