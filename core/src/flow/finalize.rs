// marina_core/src/flow/finalize.rs

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{info, instrument};

use crate::error::{MarinaError, MarinaResult};
use crate::flow::catalog::{CatalogService, ResolvedSelection};
use crate::identity::IdentityProvider;
use crate::model::{Booking, BookingLine, BookingStatus, CardDetails, PaymentSummary, ProfileUpdate, Session};
use crate::pricing::{self, PriceLine};
use crate::store::{collections, fields_of, DocumentStore, WriteOp};

/// Everything the payment screen submits to promote a session into a
/// booking. `payment` carries only non-sensitive card identity (see
/// [`CardDetails`]); the finalizer never receives a primary account number
/// or CVV.
#[derive(Debug, Clone)]
pub struct FinalizeRequest {
  pub session_id: String,
  pub profile: ProfileUpdate,
  pub accepted_rental_terms: bool,
  pub accepted_liability_waiver: bool,
  pub currency: String,
  pub payment: Option<CardDetails>,
}

/// Atomically promotes a draft session into a confirmed booking.
#[derive(Clone)]
pub struct FinalizeService {
  store: Arc<dyn DocumentStore>,
  identity: Arc<dyn IdentityProvider>,
  catalog: CatalogService,
}

impl FinalizeService {
  pub fn new(store: Arc<dyn DocumentStore>, identity: Arc<dyn IdentityProvider>) -> Self {
    let catalog = CatalogService::new(Arc::clone(&store));
    FinalizeService {
      store,
      identity,
      catalog,
    }
  }

  /// Finalizes the session: checks every precondition, re-resolves the
  /// selected items against the catalog (earlier screens' cached prices
  /// are never trusted), recomputes the totals, and commits the booking,
  /// the session transition, the profile merge, and the optional payment
  /// summary as one atomic batch. Either all of it becomes visible or none
  /// does.
  ///
  /// Returns the new booking's id.
  #[instrument(skip(self, request), fields(session_id = %request.session_id))]
  pub async fn finalize(&self, request: FinalizeRequest) -> MarinaResult<String> {
    let subject = self
      .identity
      .current_subject()
      .ok_or_else(|| MarinaError::Unauthenticated {
        action: "finalize a booking".to_string(),
      })?;

    let session = self.load_session(&request.session_id).await?;
    if session.customer_id != subject {
      return Err(MarinaError::Unauthenticated {
        action: "finalize a session owned by another customer".to_string(),
      });
    }
    if session.is_booked() {
      return Err(MarinaError::AlreadyBooked {
        session_id: session.id.clone(),
      });
    }
    if session.draft.item_ids.is_empty() {
      return Err(MarinaError::validation("no items are selected for this session"));
    }
    if !request.accepted_rental_terms || !request.accepted_liability_waiver {
      return Err(MarinaError::validation(
        "both the rental terms and the liability waiver must be accepted",
      ));
    }
    if !request.profile.has_required_names() {
      return Err(MarinaError::validation("first and last name are required"));
    }

    // Authoritative pricing pass: resolve the current catalog records and
    // recompute totals from them.
    let selection = self.catalog.resolve(&session.draft.item_ids).await?;
    let line_items = group_lines(&selection);
    let price_lines: Vec<PriceLine> = line_items
      .iter()
      .map(|line| PriceLine::new(line.unit_price, line.quantity))
      .collect();
    let totals = pricing::quote(&price_lines);

    let booking_id = self.store.allocate_id(collections::BOOKINGS);
    let booking = Booking {
      id: booking_id.clone(),
      customer_id: subject.clone(),
      session_id: session.id.clone(),
      status: BookingStatus::Confirmed,
      created_at: None, // stamped by the store on commit
      pickup_at: session.draft.pickup_at,
      dropoff_at: session.draft.dropoff_at,
      add_ons: session.draft.add_ons.clone(),
      line_items,
      totals: Some(totals.clone()),
    };

    let mut profile_fields = request.profile.merge_fields();
    profile_fields.insert("updatedAt".to_string(), json!(Utc::now()));

    let mut ops = vec![
      WriteOp::SetMerge {
        collection: collections::PROFILES.to_string(),
        id: subject.clone(),
        fields: profile_fields,
      },
      WriteOp::Create {
        collection: collections::BOOKINGS.to_string(),
        id: booking_id.clone(),
        fields: booking.to_fields(),
      },
      WriteOp::Update {
        collection: collections::SESSIONS.to_string(),
        id: session.id.clone(),
        fields: fields_of(json!({
          "status": "booked",
          "bookingId": booking_id,
          "updatedAt": Utc::now(),
        })),
      },
    ];

    if let Some(card) = request.payment {
      let summary = PaymentSummary::saved(
        subject.clone(),
        session.id.clone(),
        booking_id.clone(),
        totals.total,
        request.currency.clone(),
        card,
      );
      ops.push(WriteOp::Create {
        collection: collections::PAYMENTS.to_string(),
        id: self.store.allocate_id(collections::PAYMENTS),
        fields: summary.to_fields(),
      });
    }

    self.store.commit(ops).await?;
    info!(
      booking_id = %booking_id,
      customer_id = %subject,
      total = %totals.total,
      "session finalized into booking"
    );
    Ok(booking_id)
  }

  async fn load_session(&self, session_id: &str) -> MarinaResult<Session> {
    let record = self
      .store
      .get(collections::SESSIONS, session_id)
      .await?
      .ok_or_else(|| MarinaError::not_found(collections::SESSIONS, session_id))?;
    Session::from_record(&record)
  }
}

// Collapses the per-occurrence resolved items into booking lines,
// aggregating duplicate selections into the line's quantity. First-seen
// order is preserved.
fn group_lines(selection: &ResolvedSelection) -> Vec<BookingLine> {
  let mut lines: Vec<BookingLine> = Vec::new();
  for item in &selection.items {
    if let Some(line) = lines.iter_mut().find(|line| line.item_id == item.id) {
      line.quantity += 1;
    } else {
      lines.push(BookingLine {
        item_id: item.id.clone(),
        brand: item.brand.clone(),
        model: item.model.clone(),
        image_url: item.image_url.clone(),
        unit_price: item.price_per_day,
        quantity: 1,
      });
    }
  }
  lines
}
