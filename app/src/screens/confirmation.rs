// marina_project/app/src/screens/confirmation.rs

use crate::errors::AppError;
use crate::screens::guard::{ScreenLease, ScreenPhase};
use crate::state::AppState;
use marina::{BookingView, Shared};
use tokio::task::JoinHandle;
use tracing::debug;

#[derive(Debug)]
pub struct ConfirmationState {
  pub phase: ScreenPhase,
  pub view: Option<BookingView>,
}

impl Default for ConfirmationState {
  fn default() -> Self {
    ConfirmationState {
      phase: ScreenPhase::Loading,
      view: None,
    }
  }
}

/// The confirmation screen: subscribes to the finalized booking record and
/// re-renders on every change. In practice the record is immutable after
/// finalization, so the feed fires once with the stored snapshot.
pub struct ConfirmationScreen {
  app: AppState,
  booking_id: String,
  state: Shared<ConfirmationState>,
  lease: ScreenLease,
  feed_task: Option<JoinHandle<()>>,
}

impl ConfirmationScreen {
  pub fn new(app: AppState, booking_id: impl Into<String>) -> Self {
    ConfirmationScreen {
      app,
      booking_id: booking_id.into(),
      state: Shared::new(ConfirmationState::default()),
      lease: ScreenLease::new(),
      feed_task: None,
    }
  }

  /// Loads the booking and attaches the record feed.
  pub async fn open(&mut self) -> crate::errors::Result<()> {
    let token = self.lease.token();

    let loaded = self.app.confirmations().load(&self.booking_id).await;
    if !token.is_live() {
      debug!("confirmation load finished after the screen closed; discarding");
      return Ok(());
    }
    {
      let mut state = self.state.write();
      match loaded {
        Ok(view) => {
          state.view = Some(view);
          state.phase = ScreenPhase::Ready;
        }
        Err(err) => {
          state.phase = ScreenPhase::Failed(AppError::from(err).user_message());
          return Ok(());
        }
      }
    }

    let mut feed = self.app.confirmations().watch(&self.booking_id);
    let state = self.state.clone();
    let feed_token = self.lease.token();
    self.feed_task = Some(tokio::spawn(async move {
      while feed.changed().await {
        if !feed_token.is_live() {
          break;
        }
        if let Some(view) = feed.current() {
          state.write().view = Some(view);
        }
      }
    }));
    Ok(())
  }

  pub fn phase(&self) -> ScreenPhase {
    self.state.read().phase.clone()
  }

  pub fn view(&self) -> Option<BookingView> {
    self.state.read().view.clone()
  }

  /// Tears down the booking feed.
  pub fn close(&mut self) {
    self.lease.revoke();
    if let Some(task) = self.feed_task.take() {
      task.abort();
    }
  }
}

impl Drop for ConfirmationScreen {
  fn drop(&mut self) {
    self.close();
  }
}
