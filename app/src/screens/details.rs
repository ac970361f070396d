// marina_project/app/src/screens/details.rs

use crate::errors::{AppError, Result};
use crate::screens::guard::{ScreenLease, ScreenPhase};
use crate::state::AppState;
use chrono::{DateTime, Utc};
use marina::{RentalItem, Shared};
use tracing::info;

#[derive(Debug)]
pub struct DetailsState {
  pub phase: ScreenPhase,
  pub candidates: Vec<RentalItem>,
  pub selected_item_id: Option<String>,
  pub pickup_at: Option<DateTime<Utc>>,
  pub dropoff_at: Option<DateTime<Utc>>,
}

impl Default for DetailsState {
  fn default() -> Self {
    DetailsState {
      phase: ScreenPhase::Loading,
      candidates: Vec::new(),
      selected_item_id: None,
      pickup_at: None,
      dropoff_at: None,
    }
  }
}

/// The item-details / date-picker screen.
///
/// This is a single-selection screen variant: toggling an item on replaces
/// the whole selection, which is how "all other selections go to zero" is
/// enforced. The aggregate itself accepts any list; the rule lives here.
pub struct DetailsScreen {
  app: AppState,
  session_id: String,
  state: Shared<DetailsState>,
  lease: ScreenLease,
}

impl DetailsScreen {
  pub fn new(app: AppState, session_id: impl Into<String>) -> Self {
    DetailsScreen {
      app,
      session_id: session_id.into(),
      state: Shared::new(DetailsState::default()),
      lease: ScreenLease::new(),
    }
  }

  /// Loads the session and resolves its candidate items (the resolver
  /// fans the lookups out concurrently and skips ids no longer in the
  /// catalog).
  pub async fn open(&self) -> Result<()> {
    let token = self.lease.token();
    self.state.write().phase = ScreenPhase::Loading;

    let outcome = async {
      let session = self.app.sessions().get(&self.session_id).await?;
      let selection = self
        .app
        .catalog()
        .resolve(&session.draft.item_ids)
        .await?;
      Ok::<_, AppError>((session, selection))
    }
    .await;

    if !token.is_live() {
      return Ok(());
    }
    let mut state = self.state.write();
    match outcome {
      Ok((session, selection)) => {
        state.selected_item_id = session.draft.item_ids.first().cloned();
        state.pickup_at = session.draft.pickup_at;
        state.dropoff_at = session.draft.dropoff_at;
        state.candidates = selection.items;
        state.phase = ScreenPhase::Ready;
      }
      Err(err) => {
        state.phase = ScreenPhase::Failed(err.user_message());
      }
    }
    Ok(())
  }

  /// Selects one item, dropping every other candidate from the session's
  /// selection in the same logical update.
  pub async fn toggle_item(&self, item_id: &str) -> Result<()> {
    self
      .app
      .sessions()
      .set_items(&self.session_id, vec![item_id.to_string()])
      .await?;
    let token = self.lease.token();
    if token.is_live() {
      self.state.write().selected_item_id = Some(item_id.to_string());
    }
    info!(session_id = %self.session_id, item_id, "single-selection applied");
    Ok(())
  }

  /// Stores the rental window on the session.
  pub async fn set_range(&self, pickup_at: DateTime<Utc>, dropoff_at: DateTime<Utc>) -> Result<()> {
    self
      .app
      .sessions()
      .set_dates(&self.session_id, pickup_at, dropoff_at)
      .await?;
    let token = self.lease.token();
    if token.is_live() {
      let mut state = self.state.write();
      state.pickup_at = Some(pickup_at);
      state.dropoff_at = Some(dropoff_at);
    }
    Ok(())
  }

  pub fn phase(&self) -> ScreenPhase {
    self.state.read().phase.clone()
  }

  pub fn candidates(&self) -> Vec<RentalItem> {
    self.state.read().candidates.clone()
  }

  pub fn close(&self) {
    self.lease.revoke();
  }
}
