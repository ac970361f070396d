// marina_core/src/flow/session.rs

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{info, instrument};

use crate::error::{MarinaError, MarinaResult};
use crate::identity::IdentityProvider;
use crate::model::Session;
use crate::normalize;
use crate::store::{collections, fields_of, DocumentStore};

/// Owns the draft-booking aggregate.
///
/// Every mutation is a narrow merge update scoped to the fields that screen
/// collects, so two screens writing different slices cannot clobber each
/// other. There is no optimistic-concurrency check: two devices editing the
/// same session race with last-write-wins, an accepted limitation of the
/// single-user linear flow. What IS enforced is monotonicity: once a
/// session is booked, every further mutation is rejected.
#[derive(Clone)]
pub struct SessionService {
  store: Arc<dyn DocumentStore>,
  identity: Arc<dyn IdentityProvider>,
}

impl SessionService {
  pub fn new(store: Arc<dyn DocumentStore>, identity: Arc<dyn IdentityProvider>) -> Self {
    SessionService { store, identity }
  }

  /// Creates a fresh in-progress session for the signed-in customer,
  /// seeded with the catalog screen's initial selection.
  #[instrument(skip(self))]
  pub async fn create(&self, initial_item_ids: Vec<String>) -> MarinaResult<Session> {
    let subject = self
      .identity
      .current_subject()
      .ok_or_else(|| MarinaError::Unauthenticated {
        action: "start a booking".to_string(),
      })?;

    let draft = Session::new_draft(&subject, initial_item_ids);
    let id = self
      .store
      .add(collections::SESSIONS, draft.to_fields())
      .await?;
    info!(session_id = %id, customer_id = %subject, "booking session created");
    self.get(&id).await
  }

  pub async fn get(&self, session_id: &str) -> MarinaResult<Session> {
    let record = self
      .store
      .get(collections::SESSIONS, session_id)
      .await?
      .ok_or_else(|| MarinaError::not_found(collections::SESSIONS, session_id))?;
    Session::from_record(&record)
  }

  /// Sets the rental window. The dropoff must come after the pickup.
  #[instrument(skip(self))]
  pub async fn set_dates(
    &self,
    session_id: &str,
    pickup_at: DateTime<Utc>,
    dropoff_at: DateTime<Utc>,
  ) -> MarinaResult<()> {
    if dropoff_at <= pickup_at {
      return Err(MarinaError::validation(
        "the dropoff time must be after the pickup time",
      ));
    }
    self.ensure_open(session_id).await?;
    let patch = fields_of(json!({
      "draft": { "pickupAt": pickup_at, "dropoffAt": dropoff_at },
      "updatedAt": Utc::now(),
    }));
    self.store.update(collections::SESSIONS, session_id, patch).await
  }

  /// Replaces the selected add-on labels (not additive). Labels are
  /// trimmed and deduplicated before storage.
  #[instrument(skip(self))]
  pub async fn set_addons(&self, session_id: &str, labels: Vec<String>) -> MarinaResult<()> {
    self.ensure_open(session_id).await?;
    let labels = normalize::dedup_labels(labels);
    let patch = fields_of(json!({
      "draft": { "addOns": labels },
      "updatedAt": Utc::now(),
    }));
    self.store.update(collections::SESSIONS, session_id, patch).await
  }

  /// Replaces the selected item ids. Single-selection screens enforce
  /// their one-item rule before calling this; the aggregate stores
  /// whatever list it is given.
  #[instrument(skip(self))]
  pub async fn set_items(&self, session_id: &str, item_ids: Vec<String>) -> MarinaResult<()> {
    self.ensure_open(session_id).await?;
    let patch = fields_of(json!({
      "draft": { "itemIds": item_ids },
      "updatedAt": Utc::now(),
    }));
    self.store.update(collections::SESSIONS, session_id, patch).await
  }

  // Mutations are only legal while the session is still in progress.
  async fn ensure_open(&self, session_id: &str) -> MarinaResult<Session> {
    let session = self.get(session_id).await?;
    if session.is_booked() {
      return Err(MarinaError::AlreadyBooked {
        session_id: session_id.to_string(),
      });
    }
    Ok(session)
  }
}
