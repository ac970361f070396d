// marina_core/src/model/session.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{MarinaError, MarinaResult};
use crate::model::to_fields;
use crate::store::{Fields, Record};

/// Lifecycle of a draft-booking session. The only legal transition is
/// `InProgress` -> `Booked`, performed exactly once by the finalizer and
/// never reversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
  InProgress,
  Booked,
}

/// The nested draft-booking structure a session accumulates across
/// screens: selected items, the rental window, and chosen add-on labels.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftBooking {
  #[serde(default)]
  pub item_ids: Vec<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub pickup_at: Option<DateTime<Utc>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub dropoff_at: Option<DateTime<Utc>>,
  #[serde(default)]
  pub add_ons: Vec<String>,
}

/// The mutable record threaded through the booking screens by id.
///
/// Each screen owns a narrow slice of the draft and merges only that slice
/// back; the aggregate itself accepts whatever list it is given (the
/// single-selection rule lives in the screens, not here).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
  #[serde(skip)]
  pub id: String,
  pub customer_id: String,
  pub status: SessionStatus,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub created_at: Option<DateTime<Utc>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub updated_at: Option<DateTime<Utc>>,
  #[serde(default)]
  pub draft: DraftBooking,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub booking_id: Option<String>,
}

impl Session {
  /// A fresh in-progress session for `customer_id`, carrying the initial
  /// item selection from the catalog screen.
  pub fn new_draft(customer_id: impl Into<String>, item_ids: Vec<String>) -> Session {
    Session {
      id: String::new(),
      customer_id: customer_id.into(),
      status: SessionStatus::InProgress,
      created_at: None,
      updated_at: None,
      draft: DraftBooking {
        item_ids,
        ..DraftBooking::default()
      },
      booking_id: None,
    }
  }

  pub fn from_record(record: &Record) -> MarinaResult<Session> {
    let mut session: Session = serde_json::from_value(Value::Object(record.fields.clone()))
      .map_err(|err| {
        MarinaError::Internal(format!("malformed session document '{}': {}", record.id, err))
      })?;
    session.id = record.id.clone();
    Ok(session)
  }

  pub fn to_fields(&self) -> Fields {
    to_fields(self)
  }

  pub fn is_booked(&self) -> bool {
    self.status == SessionStatus::Booked
  }
}
