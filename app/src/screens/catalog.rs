// marina_project/app/src/screens/catalog.rs

use crate::errors::Result;
use crate::screens::guard::{ScreenLease, ScreenPhase};
use crate::state::AppState;
use marina::{CatalogFilter, RentalItem, Session, Shared};
use tokio::task::JoinHandle;
use tracing::{debug, info};

#[derive(Debug)]
pub struct CatalogState {
  pub phase: ScreenPhase,
  pub filter: CatalogFilter,
  pub items: Vec<RentalItem>,
}

impl Default for CatalogState {
  fn default() -> Self {
    CatalogState {
      phase: ScreenPhase::Loading,
      filter: CatalogFilter::default(),
      items: Vec::new(),
    }
  }
}

/// The browse screen: a live catalog list with two facets (category and
/// minimum passenger capacity). Choosing an item starts the booking
/// session whose id the rest of the flow is threaded on.
pub struct CatalogScreen {
  app: AppState,
  state: Shared<CatalogState>,
  lease: ScreenLease,
  feed_task: Option<JoinHandle<()>>,
}

impl CatalogScreen {
  pub fn new(app: AppState) -> Self {
    CatalogScreen {
      app,
      state: Shared::new(CatalogState::default()),
      lease: ScreenLease::new(),
      feed_task: None,
    }
  }

  /// Loads the catalog and attaches the live collection feed. Re-renders
  /// (re-lists) whenever the catalog changes underneath the screen.
  pub async fn open(&mut self) -> Result<()> {
    let token = self.lease.token();
    let filter = self.state.read().filter.clone();

    let loaded = self.app.catalog().list(&filter).await;
    if !token.is_live() {
      debug!("catalog load finished after the screen closed; discarding");
      return Ok(());
    }
    match loaded {
      Ok(items) => {
        let mut state = self.state.write();
        state.items = items;
        state.phase = ScreenPhase::Ready;
      }
      Err(err) => {
        let err = crate::errors::AppError::from(err);
        self.state.write().phase = ScreenPhase::Failed(err.user_message());
        return Ok(());
      }
    }

    let mut feed = self.app.catalog().watch();
    let app = self.app.clone();
    let state = self.state.clone();
    let feed_token = self.lease.token();
    self.feed_task = Some(tokio::spawn(async move {
      while feed.changed().await {
        if !feed_token.is_live() {
          break;
        }
        let filter = state.read().filter.clone();
        if let Ok(items) = app.catalog().list(&filter).await {
          if !feed_token.is_live() {
            break;
          }
          state.write().items = items;
        }
      }
    }));
    Ok(())
  }

  /// Applies new facets and re-lists.
  pub async fn set_filter(&self, filter: CatalogFilter) -> Result<()> {
    let token = self.lease.token();
    self.state.write().filter = filter.clone();
    let items = self.app.catalog().list(&filter).await?;
    if token.is_live() {
      self.state.write().items = items;
    }
    Ok(())
  }

  pub fn items(&self) -> Vec<RentalItem> {
    self.state.read().items.clone()
  }

  pub fn phase(&self) -> ScreenPhase {
    self.state.read().phase.clone()
  }

  /// Starts a booking session seeded with the chosen item. The returned
  /// session is the capability token handed to the next screen.
  pub async fn choose(&self, item_id: &str) -> Result<Session> {
    let session = self.app.sessions().create(vec![item_id.to_string()]).await?;
    info!(session_id = %session.id, item_id, "selection made; session started");
    Ok(session)
  }

  /// Tears down the live feed and kills any in-flight load's result.
  pub fn close(&mut self) {
    self.lease.revoke();
    if let Some(task) = self.feed_task.take() {
      task.abort();
    }
  }
}

impl Drop for CatalogScreen {
  fn drop(&mut self) {
    self.close();
  }
}
