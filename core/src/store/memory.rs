// marina_core/src/store/memory.rs

//! In-memory `DocumentStore` backend.
//!
//! Doubles as the storage for the demo application and as the test double
//! for the flow services. The knobs below let tests simulate the failure
//! classes the flow must handle: a full backend outage (`set_offline`), a
//! write failure scoped to one collection (`fail_writes_to`, used by the
//! finalizer atomicity tests), and a missing composite index
//! (`register_index` controls which ordered queries succeed).

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};
use tokio::sync::watch;
use tracing::debug;
use uuid::Uuid;

use crate::error::{MarinaError, MarinaResult};
use crate::shared::Shared;
use crate::store::{
  merge_fields, CollectionWatch, DocumentStore, Fields, Query, Record, RecordWatch, SortDirection,
  WriteOp,
};

#[derive(Default)]
struct MemoryInner {
  collections: HashMap<String, BTreeMap<String, Fields>>,
  // (collection, field) pairs an ordered query may sort by server-side.
  indexes: HashSet<(String, String)>,
  record_feeds: HashMap<(String, String), watch::Sender<Option<Record>>>,
  collection_feeds: HashMap<String, watch::Sender<Vec<Record>>>,
  offline: bool,
  failing_collection: Option<String>,
}

impl MemoryInner {
  fn check_online(&self) -> MarinaResult<()> {
    if self.offline {
      return Err(MarinaError::Backend {
        source: anyhow::anyhow!("simulated backend outage"),
      });
    }
    Ok(())
  }

  fn check_writable(&self, collection: &str) -> MarinaResult<()> {
    if self.failing_collection.as_deref() == Some(collection) {
      return Err(MarinaError::Backend {
        source: anyhow::anyhow!("simulated write failure on collection '{}'", collection),
      });
    }
    Ok(())
  }

  fn record(&self, collection: &str, id: &str) -> Option<Record> {
    self
      .collections
      .get(collection)
      .and_then(|docs| docs.get(id))
      .map(|fields| Record {
        id: id.to_string(),
        fields: fields.clone(),
      })
  }

  fn snapshot(&self, collection: &str) -> Vec<Record> {
    self
      .collections
      .get(collection)
      .map(|docs| {
        docs
          .iter()
          .map(|(id, fields)| Record {
            id: id.clone(),
            fields: fields.clone(),
          })
          .collect()
      })
      .unwrap_or_default()
  }

  // Pushes the current state of one record to any live feeds.
  fn publish(&self, collection: &str, id: &str) {
    let key = (collection.to_string(), id.to_string());
    if let Some(sender) = self.record_feeds.get(&key) {
      sender.send_replace(self.record(collection, id));
    }
    if let Some(sender) = self.collection_feeds.get(collection) {
      sender.send_replace(self.snapshot(collection));
    }
  }
}

pub struct MemoryStore {
  inner: Shared<MemoryInner>,
}

impl MemoryStore {
  pub fn new() -> Self {
    MemoryStore {
      inner: Shared::new(MemoryInner::default()),
    }
  }

  /// Declares an index for `(collection, field)`, enabling server-side
  /// ordering for queries sorted by that field.
  pub fn register_index(&self, collection: impl Into<String>, field: impl Into<String>) {
    self
      .inner
      .write()
      .indexes
      .insert((collection.into(), field.into()));
  }

  /// Simulates a total backend outage: every operation fails with
  /// `MarinaError::Backend` until cleared.
  pub fn set_offline(&self, offline: bool) {
    self.inner.write().offline = offline;
  }

  /// Makes every write touching `collection` fail, including inside an
  /// atomic commit. Used to prove that a commit with one bad write leaves
  /// no partial state behind.
  pub fn fail_writes_to(&self, collection: impl Into<String>) {
    self.inner.write().failing_collection = Some(collection.into());
  }

  pub fn clear_write_failure(&self) {
    self.inner.write().failing_collection = None;
  }
}

impl Default for MemoryStore {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl DocumentStore for MemoryStore {
  fn allocate_id(&self, _collection: &str) -> String {
    Uuid::new_v4().to_string()
  }

  async fn get(&self, collection: &str, id: &str) -> MarinaResult<Option<Record>> {
    let inner = self.inner.read();
    inner.check_online()?;
    Ok(inner.record(collection, id))
  }

  async fn add(&self, collection: &str, fields: Fields) -> MarinaResult<String> {
    let mut inner = self.inner.write();
    inner.check_online()?;
    inner.check_writable(collection)?;

    let id = Uuid::new_v4().to_string();
    let mut fields = fields;
    fields
      .entry("createdAt".to_string())
      .or_insert_with(|| json!(Utc::now()));

    inner
      .collections
      .entry(collection.to_string())
      .or_default()
      .insert(id.clone(), fields);
    inner.publish(collection, &id);
    debug!(collection, id = %id, "record added");
    Ok(id)
  }

  async fn update(&self, collection: &str, id: &str, fields: Fields) -> MarinaResult<()> {
    let mut inner = self.inner.write();
    inner.check_online()?;
    inner.check_writable(collection)?;

    let docs = inner
      .collections
      .entry(collection.to_string())
      .or_default();
    match docs.get_mut(id) {
      Some(existing) => merge_fields(existing, &fields),
      None => return Err(MarinaError::not_found(collection, id)),
    }
    inner.publish(collection, id);
    Ok(())
  }

  async fn set_merge(&self, collection: &str, id: &str, fields: Fields) -> MarinaResult<()> {
    let mut inner = self.inner.write();
    inner.check_online()?;
    inner.check_writable(collection)?;

    let docs = inner
      .collections
      .entry(collection.to_string())
      .or_default();
    let existing = docs.entry(id.to_string()).or_default();
    merge_fields(existing, &fields);
    inner.publish(collection, id);
    Ok(())
  }

  async fn query(&self, collection: &str, query: Query) -> MarinaResult<Vec<Record>> {
    let inner = self.inner.read();
    inner.check_online()?;

    let mut records: Vec<Record> = inner
      .snapshot(collection)
      .into_iter()
      .filter(|record| {
        query
          .filters
          .iter()
          .all(|(field, expected)| record.fields.get(field) == Some(expected))
      })
      .collect();

    if let Some((field, direction)) = &query.order_by {
      let key = (collection.to_string(), field.clone());
      if !inner.indexes.contains(&key) {
        return Err(MarinaError::IndexUnavailable {
          collection: collection.to_string(),
          field: field.clone(),
        });
      }
      records.sort_by(|a, b| {
        let left = a.fields.get(field).unwrap_or(&Value::Null);
        let right = b.fields.get(field).unwrap_or(&Value::Null);
        compare_values(left, right)
      });
      if *direction == SortDirection::Descending {
        records.reverse();
      }
    }

    if let Some(limit) = query.limit {
      records.truncate(limit);
    }
    Ok(records)
  }

  async fn commit(&self, ops: Vec<WriteOp>) -> MarinaResult<()> {
    let mut inner = self.inner.write();
    inner.check_online()?;

    // Validate every operation against the pre-commit state before any
    // write applies; a single violation fails the whole batch untouched.
    for op in &ops {
      match op {
        WriteOp::Create { collection, id, .. } => {
          inner.check_writable(collection)?;
          if inner.record(collection, id).is_some() {
            return Err(MarinaError::Internal(format!(
              "commit create collision: {}/{} already exists",
              collection, id
            )));
          }
        }
        WriteOp::Update { collection, id, .. } => {
          inner.check_writable(collection)?;
          if inner.record(collection, id).is_none() {
            return Err(MarinaError::not_found(collection.clone(), id.clone()));
          }
        }
        WriteOp::SetMerge { collection, .. } => {
          inner.check_writable(collection)?;
        }
      }
    }

    let mut touched: Vec<(String, String)> = Vec::with_capacity(ops.len());
    for op in ops {
      match op {
        WriteOp::Create {
          collection,
          id,
          mut fields,
        } => {
          fields
            .entry("createdAt".to_string())
            .or_insert_with(|| json!(Utc::now()));
          inner
            .collections
            .entry(collection.clone())
            .or_default()
            .insert(id.clone(), fields);
          touched.push((collection, id));
        }
        WriteOp::Update {
          collection,
          id,
          fields,
        }
        | WriteOp::SetMerge {
          collection,
          id,
          fields,
        } => {
          let docs = inner.collections.entry(collection.clone()).or_default();
          let existing = docs.entry(id.clone()).or_default();
          merge_fields(existing, &fields);
          touched.push((collection, id));
        }
      }
    }

    for (collection, id) in &touched {
      inner.publish(collection, id);
    }
    debug!(writes = touched.len(), "atomic commit applied");
    Ok(())
  }

  fn watch_record(&self, collection: &str, id: &str) -> RecordWatch {
    let mut inner = self.inner.write();
    let current = inner.record(collection, id);
    let key = (collection.to_string(), id.to_string());
    let sender = inner
      .record_feeds
      .entry(key)
      .or_insert_with(|| watch::channel(current).0);
    RecordWatch {
      rx: sender.subscribe(),
    }
  }

  fn watch_collection(&self, collection: &str) -> CollectionWatch {
    let mut inner = self.inner.write();
    let current = inner.snapshot(collection);
    let sender = inner
      .collection_feeds
      .entry(collection.to_string())
      .or_insert_with(|| watch::channel(current).0);
    CollectionWatch {
      rx: sender.subscribe(),
    }
  }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
  match (a, b) {
    (Value::Null, Value::Null) => Ordering::Equal,
    (Value::Null, _) => Ordering::Less,
    (_, Value::Null) => Ordering::Greater,
    (Value::Number(x), Value::Number(y)) => x
      .as_f64()
      .partial_cmp(&y.as_f64())
      .unwrap_or(Ordering::Equal),
    (Value::String(x), Value::String(y)) => x.cmp(y),
    (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
    _ => a.to_string().cmp(&b.to_string()),
  }
}
