// marina_core/src/flow/profile.rs

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::instrument;

use crate::error::MarinaResult;
use crate::model::{CustomerProfile, ProfileUpdate};
use crate::store::{collections, DocumentStore};

/// Reads and merge-writes the customer profile keyed by the identity
/// provider's subject id. Writes never destroy fields the payload does not
/// carry.
#[derive(Clone)]
pub struct ProfileService {
  store: Arc<dyn DocumentStore>,
}

impl ProfileService {
  pub fn new(store: Arc<dyn DocumentStore>) -> Self {
    ProfileService { store }
  }

  /// The stored profile, or `None` for a first-time customer.
  pub async fn get(&self, subject: &str) -> MarinaResult<Option<CustomerProfile>> {
    let record = self.store.get(collections::PROFILES, subject).await?;
    record
      .as_ref()
      .map(CustomerProfile::from_record)
      .transpose()
  }

  /// Merge-upserts the submitted subset of profile fields.
  #[instrument(skip(self, update))]
  pub async fn upsert(&self, subject: &str, update: &ProfileUpdate) -> MarinaResult<()> {
    let mut fields = update.merge_fields();
    fields.insert("updatedAt".to_string(), json!(Utc::now()));
    self
      .store
      .set_merge(collections::PROFILES, subject, fields)
      .await
  }
}
