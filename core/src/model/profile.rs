// marina_core/src/model/profile.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{MarinaError, MarinaResult};
use crate::model::to_fields;
use crate::store::{Fields, Record};

/// A customer's stored profile, keyed by the identity provider's subject
/// id. Every field is optional: screens collect different subsets and each
/// write merges only what it collected, never overwriting the rest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerProfile {
  #[serde(skip)]
  pub id: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub first_name: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub last_name: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub email: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub phone: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub address_line1: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub address_line2: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub city: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub postal_code: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub license_number: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub license_image_url: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub updated_at: Option<DateTime<Utc>>,
}

impl CustomerProfile {
  pub fn from_record(record: &Record) -> MarinaResult<CustomerProfile> {
    let mut profile: CustomerProfile = serde_json::from_value(Value::Object(record.fields.clone()))
      .map_err(|err| {
        MarinaError::Internal(format!("malformed profile document '{}': {}", record.id, err))
      })?;
    profile.id = record.id.clone();
    Ok(profile)
  }
}

/// A partial profile payload collected by one screen. Fields left `None`
/// are absent from the merge write and keep their stored values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub first_name: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub last_name: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub email: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub phone: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub address_line1: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub address_line2: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub city: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub postal_code: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub license_number: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub license_image_url: Option<String>,
}

impl ProfileUpdate {
  /// The merge payload for this update; `None` fields are omitted.
  pub fn merge_fields(&self) -> Fields {
    to_fields(self)
  }

  /// Finalization requires a non-empty first and last name.
  pub fn has_required_names(&self) -> bool {
    let filled = |field: &Option<String>| {
      field
        .as_deref()
        .map(|name| !name.trim().is_empty())
        .unwrap_or(false)
    };
    filled(&self.first_name) && filled(&self.last_name)
  }
}
