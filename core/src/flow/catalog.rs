// marina_core/src/flow/catalog.rs

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures_util::future::join_all;
use tracing::{instrument, warn};

use crate::error::{MarinaError, MarinaResult};
use crate::model::RentalItem;
use crate::normalize;
use crate::store::{collections, CollectionWatch, DocumentStore, Query, SortDirection};

/// Client-side facets for the catalog screen.
#[derive(Debug, Clone, Default)]
pub struct CatalogFilter {
  pub category: Option<String>,
  pub min_capacity: Option<u32>,
}

/// The outcome of resolving a session's selected item ids: the resolved
/// view records in original selection order, plus the union of every
/// resolved item's add-on labels.
#[derive(Debug, Clone)]
pub struct ResolvedSelection {
  pub items: Vec<RentalItem>,
  pub add_on_labels: Vec<String>,
}

/// Reads the rentable-item catalog and resolves id lists into normalized
/// view records.
#[derive(Clone)]
pub struct CatalogService {
  store: Arc<dyn DocumentStore>,
}

impl CatalogService {
  pub fn new(store: Arc<dyn DocumentStore>) -> Self {
    CatalogService { store }
  }

  /// Lists the catalog ordered by brand, filtered by the given facets.
  ///
  /// The ordered query is attempted first; when the backend reports the
  /// index as unavailable, the same read is re-issued unordered and sorted
  /// client-side. The fallback is deterministic and never drops results,
  /// and the caller can't observe which path ran.
  #[instrument(skip(self))]
  pub async fn list(&self, filter: &CatalogFilter) -> MarinaResult<Vec<RentalItem>> {
    let ordered = Query::ordered_by("brand", SortDirection::Ascending);
    let mut items = match self.store.query(collections::ITEMS, ordered).await {
      Ok(records) => records.iter().map(RentalItem::from_record).collect::<Vec<_>>(),
      Err(MarinaError::IndexUnavailable { collection, field }) => {
        warn!(
          %collection,
          %field,
          "ordered catalog query lacks its index; fetching unordered and sorting client-side"
        );
        let records = self.store.query(collections::ITEMS, Query::default()).await?;
        let mut items = records.iter().map(RentalItem::from_record).collect::<Vec<_>>();
        items.sort_by(|a, b| a.brand.cmp(&b.brand));
        items
      }
      Err(other) => return Err(other),
    };

    items.retain(|item| {
      let category_ok = match filter.category.as_deref() {
        Some(want) => item.category.as_deref() == Some(want),
        None => true,
      };
      let capacity_ok = match filter.min_capacity {
        Some(min) => item.passenger_capacity.unwrap_or(0) >= min,
        None => true,
      };
      category_ok && capacity_ok
    });
    Ok(items)
  }

  /// Live feed of the catalog collection for the browse screen. Dropping
  /// the watch tears the feed down.
  pub fn watch(&self) -> CollectionWatch {
    self.store.watch_collection(collections::ITEMS)
  }

  /// Resolves a list of item ids into view records, one lookup per unique
  /// id, all issued concurrently.
  ///
  /// Ids missing from the catalog are skipped (logged, not fatal) and the
  /// output preserves the original list order, duplicates included. Only
  /// when at least one id was given and none resolved does the batch fail
  /// as a whole.
  #[instrument(skip(self))]
  pub async fn resolve(&self, item_ids: &[String]) -> MarinaResult<ResolvedSelection> {
    let mut seen = HashSet::new();
    let unique_ids: Vec<String> = item_ids
      .iter()
      .filter(|id| seen.insert(id.as_str()))
      .cloned()
      .collect();

    let lookups = unique_ids.into_iter().map(|id| {
      let store = Arc::clone(&self.store);
      async move {
        let outcome = store.get(collections::ITEMS, &id).await;
        (id, outcome)
      }
    });
    let outcomes = join_all(lookups).await;

    let mut resolved: HashMap<String, RentalItem> = HashMap::new();
    let mut lookup_errors: Vec<MarinaError> = Vec::new();
    for (id, outcome) in outcomes {
      match outcome {
        Ok(Some(record)) => {
          resolved.insert(id, RentalItem::from_record(&record));
        }
        Ok(None) => {
          warn!(item_id = %id, "selected item is missing from the catalog; skipping");
        }
        Err(err) => {
          warn!(item_id = %id, error = %err, "item lookup failed; skipping");
          lookup_errors.push(err);
        }
      }
    }

    if resolved.is_empty() && !item_ids.is_empty() {
      // Prefer surfacing a real backend failure over "nothing found" when
      // every lookup errored rather than merely missing.
      if let Some(err) = lookup_errors.into_iter().next() {
        return Err(err);
      }
      return Err(MarinaError::NoItemsResolved);
    }

    let items: Vec<RentalItem> = item_ids
      .iter()
      .filter_map(|id| resolved.get(id).cloned())
      .collect();
    let add_on_labels = normalize::dedup_labels(items.iter().flat_map(|item| item.add_ons.iter()));

    Ok(ResolvedSelection {
      items,
      add_on_labels,
    })
  }
}
