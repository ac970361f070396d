// marina_project/app/src/screens/addons.rs

use crate::errors::{AppError, Result};
use crate::screens::guard::{ScreenLease, ScreenPhase};
use crate::state::AppState;
use marina::Shared;
use tracing::info;

#[derive(Debug)]
pub struct AddonsState {
  pub phase: ScreenPhase,
  // Union of add-on labels across the session's resolved items.
  pub available: Vec<String>,
  pub selected: Vec<String>,
}

impl Default for AddonsState {
  fn default() -> Self {
    AddonsState {
      phase: ScreenPhase::Loading,
      available: Vec::new(),
      selected: Vec::new(),
    }
  }
}

/// The add-on picker. Selection is local until `save`, which replaces the
/// session's add-on list outright (not additive).
pub struct AddonsScreen {
  app: AppState,
  session_id: String,
  state: Shared<AddonsState>,
  lease: ScreenLease,
}

impl AddonsScreen {
  pub fn new(app: AppState, session_id: impl Into<String>) -> Self {
    AddonsScreen {
      app,
      session_id: session_id.into(),
      state: Shared::new(AddonsState::default()),
      lease: ScreenLease::new(),
    }
  }

  pub async fn open(&self) -> Result<()> {
    let token = self.lease.token();

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
        state.available = selection.add_on_labels;
        state.selected = session.draft.add_ons;
        state.phase = ScreenPhase::Ready;
      }
      Err(err) => {
        state.phase = ScreenPhase::Failed(err.user_message());
      }
    }
    Ok(())
  }

  /// Flips a label in the local selection. Unknown labels are ignored.
  pub fn toggle(&self, label: &str) {
    let mut state = self.state.write();
    if !state.available.iter().any(|known| known == label) {
      return;
    }
    if let Some(position) = state.selected.iter().position(|chosen| chosen == label) {
      state.selected.remove(position);
    } else {
      state.selected.push(label.to_string());
    }
  }

  /// Writes the local selection back to the session, replacing whatever
  /// list was stored before.
  pub async fn save(&self) -> Result<()> {
    let selected = self.state.read().selected.clone();
    self
      .app
      .sessions()
      .set_addons(&self.session_id, selected.clone())
      .await?;
    info!(session_id = %self.session_id, count = selected.len(), "add-on selection saved");
    Ok(())
  }

  pub fn phase(&self) -> ScreenPhase {
    self.state.read().phase.clone()
  }

  pub fn available(&self) -> Vec<String> {
    self.state.read().available.clone()
  }

  pub fn selected(&self) -> Vec<String> {
    self.state.read().selected.clone()
  }

  pub fn close(&self) {
    self.lease.revoke();
  }
}
