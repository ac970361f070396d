// tests/catalog_tests.rs
mod common;
use common::{seeded_store, setup_tracing};

use marina::{CatalogFilter, CatalogService, MarinaError, MemoryStore};
use rust_decimal::Decimal;
use std::sync::Arc;

fn dec(text: &str) -> Decimal {
  text.parse().unwrap()
}

#[tokio::test]
async fn list_falls_back_when_the_index_is_missing() {
  setup_tracing();
  let store = seeded_store().await;
  // No index registered: the ordered query fails internally and the
  // service recovers with a client-side sort. The caller only sees the
  // sorted result.
  let catalog = CatalogService::new(store.clone());
  let items = catalog.list(&CatalogFilter::default()).await.unwrap();

  let brands: Vec<&str> = items.iter().map(|item| item.brand.as_str()).collect();
  assert_eq!(brands, vec!["Blue Bay", "Chandler", "Naviga", "Naviga"]);
}

#[tokio::test]
async fn list_uses_the_index_when_registered() {
  setup_tracing();
  let store = seeded_store().await;
  store.register_index("items", "brand");

  let catalog = CatalogService::new(store.clone());
  let items = catalog.list(&CatalogFilter::default()).await.unwrap();
  let brands: Vec<&str> = items.iter().map(|item| item.brand.as_str()).collect();
  assert_eq!(brands, vec!["Blue Bay", "Chandler", "Naviga", "Naviga"]);
}

#[tokio::test]
async fn list_applies_category_and_capacity_facets() {
  setup_tracing();
  let store = seeded_store().await;
  let catalog = CatalogService::new(store.clone());

  let pontoons = catalog
    .list(&CatalogFilter {
      category: Some("pontoon".to_string()),
      min_capacity: None,
    })
    .await
    .unwrap();
  assert_eq!(pontoons.len(), 2);
  assert!(pontoons.iter().all(|item| item.category.as_deref() == Some("pontoon")));

  let big_boats = catalog
    .list(&CatalogFilter {
      category: None,
      min_capacity: Some(8),
    })
    .await
    .unwrap();
  assert_eq!(big_boats.len(), 2);
  assert!(big_boats
    .iter()
    .all(|item| item.passenger_capacity.unwrap_or(0) >= 8));
}

#[tokio::test]
async fn list_normalizes_prices_and_addons() {
  setup_tracing();
  let store = seeded_store().await;
  let catalog = CatalogService::new(store.clone());
  let items = catalog.list(&CatalogFilter::default()).await.unwrap();

  let cruiser = items
    .iter()
    .find(|item| item.id == "bay-cruiser-26")
    .unwrap();
  assert_eq!(cruiser.price_per_day, dec("120.00"));
  assert_eq!(cruiser.add_ons, vec!["Tube", "Wakeboard"]);

  let dinghy = items.iter().find(|item| item.id == "dinghy-8").unwrap();
  assert_eq!(dinghy.price_per_day, dec("45"));
  assert_eq!(dinghy.add_ons, vec!["Cooler", "Dry Bag"]);
}

#[tokio::test]
async fn resolve_skips_missing_ids_and_preserves_order() {
  setup_tracing();
  let store = seeded_store().await;
  let catalog = CatalogService::new(store.clone());

  let ids = vec![
    "skiff-12".to_string(),
    "no-such-item".to_string(),
    "dinghy-8".to_string(),
  ];
  let selection = catalog.resolve(&ids).await.unwrap();

  let resolved: Vec<&str> = selection.items.iter().map(|item| item.id.as_str()).collect();
  assert_eq!(resolved, vec!["skiff-12", "dinghy-8"]);
}

#[tokio::test]
async fn resolve_fails_only_when_nothing_resolves() {
  setup_tracing();
  let store = seeded_store().await;
  let catalog = CatalogService::new(store.clone());

  let err = catalog
    .resolve(&["no-such-item".to_string()])
    .await
    .unwrap_err();
  assert!(matches!(err, MarinaError::NoItemsResolved));
}

#[tokio::test]
async fn resolve_of_empty_selection_is_empty_not_an_error() {
  setup_tracing();
  let store = seeded_store().await;
  let catalog = CatalogService::new(store.clone());

  let selection = catalog.resolve(&[]).await.unwrap();
  assert!(selection.items.is_empty());
  assert!(selection.add_on_labels.is_empty());
}

#[tokio::test]
async fn resolve_keeps_duplicate_selections() {
  setup_tracing();
  let store = seeded_store().await;
  let catalog = CatalogService::new(store.clone());

  let ids = vec!["skiff-12".to_string(), "skiff-12".to_string()];
  let selection = catalog.resolve(&ids).await.unwrap();
  assert_eq!(selection.items.len(), 2);
}

#[tokio::test]
async fn resolve_unions_addon_labels_across_the_batch() {
  setup_tracing();
  let store = seeded_store().await;
  let catalog = CatalogService::new(store.clone());

  // skiff-12 carries [Cooler, Rain Cover]; dinghy-8 carries [Cooler, Dry
  // Bag]. The union deduplicates Cooler.
  let ids = vec!["skiff-12".to_string(), "dinghy-8".to_string()];
  let selection = catalog.resolve(&ids).await.unwrap();
  assert_eq!(selection.add_on_labels, vec!["Cooler", "Rain Cover", "Dry Bag"]);
}

#[tokio::test]
async fn resolve_surfaces_backend_outage() {
  setup_tracing();
  let store = Arc::new(MemoryStore::new());
  let catalog = CatalogService::new(store.clone());
  store.set_offline(true);

  let err = catalog.resolve(&["skiff-12".to_string()]).await.unwrap_err();
  assert!(matches!(err, MarinaError::Backend { .. }));
}
