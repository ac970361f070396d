// tests/finalize_tests.rs
mod common;
use common::{
  finalize_service, seeded_store, session_service, setup_tracing, valid_finalize_request, CUSTOMER,
};

use marina::{
  collections, fields_of, Booking, CustomerProfile, DocumentStore, FinalizeService, FixedIdentity,
  MarinaError, ProfileService, Query, SessionStatus, SignedOut,
};
use rust_decimal::Decimal;
use serde_json::json;
use std::sync::Arc;

fn dec(text: &str) -> Decimal {
  text.parse().unwrap()
}

#[tokio::test]
async fn finalize_commits_booking_session_profile_and_payment_together() {
  setup_tracing();
  let store = seeded_store().await;
  let sessions = session_service(&store);
  let finalizer = finalize_service(&store);

  let session = sessions
    .create(vec!["skiff-12".to_string(), "dinghy-8".to_string()])
    .await
    .unwrap();
  sessions
    .set_addons(&session.id, vec!["Cooler".to_string()])
    .await
    .unwrap();

  let booking_id = finalizer
    .finalize(valid_finalize_request(&session.id))
    .await
    .unwrap();

  // The booking snapshot is expanded to full line items with totals.
  let record = store
    .get(collections::BOOKINGS, &booking_id)
    .await
    .unwrap()
    .expect("booking record must exist");
  let booking = Booking::from_record(&record).unwrap();
  assert_eq!(booking.customer_id, CUSTOMER);
  assert_eq!(booking.session_id, session.id);
  assert_eq!(booking.line_items.len(), 2);
  assert_eq!(booking.add_ons, vec!["Cooler"]);
  let totals = booking.totals.expect("totals must be snapshotted");
  assert_eq!(totals.base, dec("117.00"));
  assert_eq!(totals.tax, dec("11.70"));
  assert_eq!(totals.total, dec("178.70"));
  assert!(booking.created_at.is_some());

  // The session transitioned and points at the booking.
  let reloaded = sessions.get(&session.id).await.unwrap();
  assert_eq!(reloaded.status, SessionStatus::Booked);
  assert_eq!(reloaded.booking_id, Some(booking_id.clone()));

  // The profile got the submitted fields merged in.
  let profile = ProfileService::new(store.clone())
    .get(CUSTOMER)
    .await
    .unwrap()
    .expect("profile must exist after finalization");
  assert_eq!(profile.first_name.as_deref(), Some("Rhea"));

  // Saving payment info was requested, so a summary record exists, linked
  // to both the session and the booking, holding only card identity.
  let payments = store
    .query(collections::PAYMENTS, Query::default())
    .await
    .unwrap();
  assert_eq!(payments.len(), 1);
  let payment = &payments[0];
  assert_eq!(
    payment.field("bookingId").and_then(|v| v.as_str()),
    Some(booking_id.as_str())
  );
  assert_eq!(
    payment.field("sessionId").and_then(|v| v.as_str()),
    Some(session.id.as_str())
  );
  assert_eq!(payment.field("cardLast4").and_then(|v| v.as_str()), Some("4242"));
  assert_eq!(payment.field("status").and_then(|v| v.as_str()), Some("saved"));
}

#[tokio::test]
async fn finalize_without_payment_opt_in_writes_no_summary() {
  setup_tracing();
  let store = seeded_store().await;
  let sessions = session_service(&store);
  let finalizer = finalize_service(&store);

  let session = sessions.create(vec!["skiff-12".to_string()]).await.unwrap();
  let mut request = valid_finalize_request(&session.id);
  request.payment = None;
  finalizer.finalize(request).await.unwrap();

  let payments = store
    .query(collections::PAYMENTS, Query::default())
    .await
    .unwrap();
  assert!(payments.is_empty());
}

// The finalizer never trusts prices cached by earlier screens: a catalog
// price change between review and finalization lands in the booking.
#[tokio::test]
async fn finalize_reprices_from_the_live_catalog() {
  setup_tracing();
  let store = seeded_store().await;
  let sessions = session_service(&store);
  let finalizer = finalize_service(&store);

  let session = sessions.create(vec!["skiff-12".to_string()]).await.unwrap();
  store
    .set_merge(
      collections::ITEMS,
      "skiff-12",
      fields_of(json!({ "pricePerDay": "$99.00" })),
    )
    .await
    .unwrap();

  let booking_id = finalizer
    .finalize(valid_finalize_request(&session.id))
    .await
    .unwrap();
  let record = store
    .get(collections::BOOKINGS, &booking_id)
    .await
    .unwrap()
    .unwrap();
  let booking = Booking::from_record(&record).unwrap();
  assert_eq!(booking.line_items[0].unit_price, dec("99.00"));
  assert_eq!(booking.totals.unwrap().base, dec("99.00"));
}

#[tokio::test]
async fn finalize_aggregates_duplicate_selections_into_quantity() {
  setup_tracing();
  let store = seeded_store().await;
  let sessions = session_service(&store);
  let finalizer = finalize_service(&store);

  let session = sessions
    .create(vec!["dinghy-8".to_string(), "dinghy-8".to_string()])
    .await
    .unwrap();
  let booking_id = finalizer
    .finalize(valid_finalize_request(&session.id))
    .await
    .unwrap();

  let record = store
    .get(collections::BOOKINGS, &booking_id)
    .await
    .unwrap()
    .unwrap();
  let booking = Booking::from_record(&record).unwrap();
  assert_eq!(booking.line_items.len(), 1);
  assert_eq!(booking.line_items[0].quantity, 2);
  assert_eq!(booking.totals.unwrap().base, dec("90.00"));
}

#[tokio::test]
async fn finalize_preconditions_are_user_correctable_failures() {
  setup_tracing();
  let store = seeded_store().await;
  let sessions = session_service(&store);
  let finalizer = finalize_service(&store);
  let session = sessions.create(vec!["skiff-12".to_string()]).await.unwrap();

  // Unaccepted agreements.
  let mut request = valid_finalize_request(&session.id);
  request.accepted_liability_waiver = false;
  let err = finalizer.finalize(request).await.unwrap_err();
  assert!(matches!(err, MarinaError::Validation { .. }));

  // Missing last name.
  let mut request = valid_finalize_request(&session.id);
  request.profile.last_name = Some("   ".to_string());
  let err = finalizer.finalize(request).await.unwrap_err();
  assert!(matches!(err, MarinaError::Validation { .. }));

  // Empty selection.
  sessions.set_items(&session.id, Vec::new()).await.unwrap();
  let err = finalizer
    .finalize(valid_finalize_request(&session.id))
    .await
    .unwrap_err();
  assert!(matches!(err, MarinaError::Validation { .. }));

  // None of the failures left partial state behind.
  let reloaded = sessions.get(&session.id).await.unwrap();
  assert_eq!(reloaded.status, SessionStatus::InProgress);
  let bookings = store
    .query(collections::BOOKINGS, Query::default())
    .await
    .unwrap();
  assert!(bookings.is_empty());
}

#[tokio::test]
async fn finalize_requires_sign_in_and_ownership() {
  setup_tracing();
  let store = seeded_store().await;
  let sessions = session_service(&store);
  let session = sessions.create(vec!["skiff-12".to_string()]).await.unwrap();

  let signed_out = FinalizeService::new(store.clone(), Arc::new(SignedOut));
  let err = signed_out
    .finalize(valid_finalize_request(&session.id))
    .await
    .unwrap_err();
  assert!(matches!(err, MarinaError::Unauthenticated { .. }));

  let stranger = FinalizeService::new(store.clone(), Arc::new(FixedIdentity::new("intruder-1")));
  let err = stranger
    .finalize(valid_finalize_request(&session.id))
    .await
    .unwrap_err();
  assert!(matches!(err, MarinaError::Unauthenticated { .. }));
}

#[tokio::test]
async fn finalize_of_a_missing_session_is_not_found() {
  setup_tracing();
  let store = seeded_store().await;
  let finalizer = finalize_service(&store);

  let err = finalizer
    .finalize(valid_finalize_request("ghost-session"))
    .await
    .unwrap_err();
  assert!(matches!(err, MarinaError::NotFound { .. }));
}

// The atomicity property: when the payment-summary write fails, the whole
// batch must be observed as not-applied. No booking, no session
// transition, no profile write.
#[tokio::test]
async fn finalize_is_atomic_under_a_payment_write_failure() {
  setup_tracing();
  let store = seeded_store().await;
  let sessions = session_service(&store);
  let finalizer = finalize_service(&store);
  let session = sessions.create(vec!["skiff-12".to_string()]).await.unwrap();

  store.fail_writes_to(collections::PAYMENTS);
  let err = finalizer
    .finalize(valid_finalize_request(&session.id))
    .await
    .unwrap_err();
  assert!(matches!(err, MarinaError::Backend { .. }));

  let reloaded = sessions.get(&session.id).await.unwrap();
  assert_eq!(reloaded.status, SessionStatus::InProgress);
  assert!(reloaded.booking_id.is_none());

  let bookings = store
    .query(collections::BOOKINGS, Query::default())
    .await
    .unwrap();
  assert!(bookings.is_empty());
  let profile = ProfileService::new(store.clone()).get(CUSTOMER).await.unwrap();
  assert!(profile.is_none());

  // Clearing the fault lets the same request through unchanged.
  store.clear_write_failure();
  finalizer
    .finalize(valid_finalize_request(&session.id))
    .await
    .unwrap();
}

// Status monotonicity: finalizing twice must fail rather than create a
// second booking.
#[tokio::test]
async fn finalize_twice_fails_and_books_once() {
  setup_tracing();
  let store = seeded_store().await;
  let sessions = session_service(&store);
  let finalizer = finalize_service(&store);
  let session = sessions.create(vec!["skiff-12".to_string()]).await.unwrap();

  finalizer
    .finalize(valid_finalize_request(&session.id))
    .await
    .unwrap();
  let err = finalizer
    .finalize(valid_finalize_request(&session.id))
    .await
    .unwrap_err();
  assert!(matches!(err, MarinaError::AlreadyBooked { .. }));

  let bookings = store
    .query(collections::BOOKINGS, Query::default())
    .await
    .unwrap();
  assert_eq!(bookings.len(), 1);
}

#[tokio::test]
async fn profile_merge_preserves_fields_other_screens_wrote() {
  setup_tracing();
  let store = seeded_store().await;
  let profiles = ProfileService::new(store.clone());
  let sessions = session_service(&store);
  let finalizer = finalize_service(&store);

  // An earlier screen stored the license number.
  profiles
    .upsert(
      CUSTOMER,
      &marina::ProfileUpdate {
        license_number: Some("D1234-56789".to_string()),
        ..marina::ProfileUpdate::default()
      },
    )
    .await
    .unwrap();

  let session = sessions.create(vec!["skiff-12".to_string()]).await.unwrap();
  finalizer
    .finalize(valid_finalize_request(&session.id))
    .await
    .unwrap();

  let profile: CustomerProfile = profiles.get(CUSTOMER).await.unwrap().unwrap();
  assert_eq!(profile.first_name.as_deref(), Some("Rhea"));
  // The finalize payload did not carry the license; the merge kept it.
  assert_eq!(profile.license_number.as_deref(), Some("D1234-56789"));
}
