// marina_core/src/store/mod.rs

//! The document-store boundary.
//!
//! Everything this core persists goes through [`DocumentStore`]: plain
//! JSON-map records keyed by collection name and id, partial merge updates,
//! equality-filtered queries, change feeds, and one atomic batch commit
//! surface (used exclusively by the booking finalizer).
//!
//! The trait is intentionally the whole external capability surface of the
//! core; there is no other wire protocol. `MemoryStore` is the bundled
//! backend, serving both as the test double and as the demo storage.

pub mod memory;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::watch;

use crate::error::MarinaResult;

pub use memory::MemoryStore;

/// Collection names used by the booking flow.
pub mod collections {
  pub const ITEMS: &str = "items";
  pub const SESSIONS: &str = "sessions";
  pub const PROFILES: &str = "profiles";
  pub const BOOKINGS: &str = "bookings";
  pub const PAYMENTS: &str = "payments";
}

/// The field map of a stored document. Keys are camelCase, matching the
/// wire shape of the hosted backend the mobile clients write.
pub type Fields = serde_json::Map<String, Value>;

/// A stored document together with its id.
#[derive(Debug, Clone)]
pub struct Record {
  pub id: String,
  pub fields: Fields,
}

impl Record {
  pub fn field(&self, name: &str) -> Option<&Value> {
    self.fields.get(name)
  }
}

/// Converts a `serde_json::Value` into a field map. Non-object values
/// collapse to an empty map; callers only pass object literals.
pub fn fields_of(value: Value) -> Fields {
  match value {
    Value::Object(map) => map,
    _ => Fields::new(),
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
  Ascending,
  Descending,
}

/// An equality-filtered read. `order_by` requires the backend to have an
/// index for the field; see [`DocumentStore::query`] for the fallback
/// contract.
#[derive(Debug, Clone, Default)]
pub struct Query {
  pub filters: Vec<(String, Value)>,
  pub order_by: Option<(String, SortDirection)>,
  pub limit: Option<usize>,
}

impl Query {
  pub fn ordered_by(field: impl Into<String>, direction: SortDirection) -> Self {
    Query {
      order_by: Some((field.into(), direction)),
      ..Query::default()
    }
  }
}

/// One operation inside an atomic commit.
#[derive(Debug, Clone)]
pub enum WriteOp {
  /// Insert a new record under a pre-allocated id. Fails if the id exists.
  Create {
    collection: String,
    id: String,
    fields: Fields,
  },
  /// Deep-merge partial fields into an existing record. Fails if absent.
  Update {
    collection: String,
    id: String,
    fields: Fields,
  },
  /// Deep-merge partial fields, creating the record if absent.
  SetMerge {
    collection: String,
    id: String,
    fields: Fields,
  },
}

#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
  /// Reserves an id in the collection's id space without writing anything.
  /// Lets a batch create a record and reference its id in sibling writes.
  fn allocate_id(&self, collection: &str) -> String;

  /// Fetches one record. Absence is `Ok(None)`, not an error; callers that
  /// require the record map it to `MarinaError::NotFound`.
  async fn get(&self, collection: &str, id: &str) -> MarinaResult<Option<Record>>;

  /// Inserts a record under a server-assigned id, stamping `createdAt`.
  async fn add(&self, collection: &str, fields: Fields) -> MarinaResult<String>;

  /// Deep-merges partial fields into an existing record; fails with
  /// `MarinaError::NotFound` if the id is absent.
  async fn update(&self, collection: &str, id: &str, fields: Fields) -> MarinaResult<()>;

  /// Upsert with deep-merge semantics.
  async fn set_merge(&self, collection: &str, id: &str, fields: Fields) -> MarinaResult<()>;

  /// Equality-filtered read. An ordered query without a matching index
  /// fails with `MarinaError::IndexUnavailable`; callers recover by
  /// re-issuing the query unordered and sorting client-side.
  async fn query(&self, collection: &str, query: Query) -> MarinaResult<Vec<Record>>;

  /// Applies every operation atomically: all writes become visible
  /// together, or none do. The only interface with atomicity guarantees.
  async fn commit(&self, ops: Vec<WriteOp>) -> MarinaResult<()>;

  /// Change feed for a single record. The feed starts with the current
  /// state (or `None`) and fires on every subsequent write. Dropping the
  /// returned watch is the teardown; no explicit unsubscribe call exists.
  fn watch_record(&self, collection: &str, id: &str) -> RecordWatch;

  /// Change feed for a whole collection, delivering full snapshots.
  /// Dropping the watch tears the feed down.
  fn watch_collection(&self, collection: &str) -> CollectionWatch;
}

/// Live feed of a single record's state.
#[derive(Debug)]
pub struct RecordWatch {
  pub(crate) rx: watch::Receiver<Option<Record>>,
}

impl RecordWatch {
  pub fn current(&self) -> Option<Record> {
    self.rx.borrow().clone()
  }

  /// Waits for the next change. Returns `false` once the feed is closed.
  pub async fn changed(&mut self) -> bool {
    self.rx.changed().await.is_ok()
  }
}

/// Live feed of a collection's contents.
#[derive(Debug)]
pub struct CollectionWatch {
  pub(crate) rx: watch::Receiver<Vec<Record>>,
}

impl CollectionWatch {
  pub fn current(&self) -> Vec<Record> {
    self.rx.borrow().clone()
  }

  /// Waits for the next change. Returns `false` once the feed is closed.
  pub async fn changed(&mut self) -> bool {
    self.rx.changed().await.is_ok()
  }
}

/// Deep-merges `patch` into `base`: nested objects merge recursively, every
/// other value (arrays included) replaces wholesale. Matches the upsert
/// semantics of the hosted backend, where `setAddons` replaces the label
/// list rather than appending to it.
pub(crate) fn merge_fields(base: &mut Fields, patch: &Fields) {
  for (key, patch_value) in patch {
    match base.entry(key.clone()) {
      serde_json::map::Entry::Occupied(mut occupied) => match (occupied.get_mut(), patch_value) {
        (Value::Object(base_child), Value::Object(patch_child)) => {
          merge_fields(base_child, patch_child);
        }
        (slot, _) => {
          *slot = patch_value.clone();
        }
      },
      serde_json::map::Entry::Vacant(vacant) => {
        vacant.insert(patch_value.clone());
      }
    }
  }
}
