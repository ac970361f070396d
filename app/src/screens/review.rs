// marina_project/app/src/screens/review.rs

use crate::errors::{AppError, Result};
use crate::screens::guard::{ScreenLease, ScreenPhase};
use crate::state::AppState;
use chrono::{DateTime, Utc};
use marina::{quote, PriceLine, Shared, Totals};
use rust_decimal::Decimal;

/// One display row of the review cart.
#[derive(Debug, Clone)]
pub struct ReviewLine {
  pub item_id: String,
  pub name: String,
  pub unit_price: Decimal,
  pub quantity: u32,
}

#[derive(Debug)]
pub struct ReviewState {
  pub phase: ScreenPhase,
  pub lines: Vec<ReviewLine>,
  pub add_ons: Vec<String>,
  pub pickup_at: Option<DateTime<Utc>>,
  pub dropoff_at: Option<DateTime<Utc>>,
  pub totals: Option<Totals>,
}

impl Default for ReviewState {
  fn default() -> Self {
    ReviewState {
      phase: ScreenPhase::Loading,
      lines: Vec::new(),
      add_ons: Vec::new(),
      pickup_at: None,
      dropoff_at: None,
      totals: None,
    }
  }
}

/// The review screen: re-resolves the session's items against the live
/// catalog and recomputes the display totals. These numbers are advisory;
/// the finalizer runs its own authoritative pricing pass at commit time.
pub struct ReviewScreen {
  app: AppState,
  session_id: String,
  state: Shared<ReviewState>,
  lease: ScreenLease,
}

impl ReviewScreen {
  pub fn new(app: AppState, session_id: impl Into<String>) -> Self {
    ReviewScreen {
      app,
      session_id: session_id.into(),
      state: Shared::new(ReviewState::default()),
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
        let mut lines: Vec<ReviewLine> = Vec::new();
        for item in &selection.items {
          if let Some(line) = lines.iter_mut().find(|line| line.item_id == item.id) {
            line.quantity += 1;
          } else {
            lines.push(ReviewLine {
              item_id: item.id.clone(),
              name: item.display_name(),
              unit_price: item.price_per_day,
              quantity: 1,
            });
          }
        }
        let price_lines: Vec<PriceLine> = lines
          .iter()
          .map(|line| PriceLine::new(line.unit_price, line.quantity))
          .collect();
        state.totals = Some(quote(&price_lines));
        state.lines = lines;
        state.add_ons = session.draft.add_ons;
        state.pickup_at = session.draft.pickup_at;
        state.dropoff_at = session.draft.dropoff_at;
        state.phase = ScreenPhase::Ready;
      }
      Err(err) => {
        state.phase = ScreenPhase::Failed(err.user_message());
      }
    }
    Ok(())
  }

  pub fn phase(&self) -> ScreenPhase {
    self.state.read().phase.clone()
  }

  pub fn lines(&self) -> Vec<ReviewLine> {
    self.state.read().lines.clone()
  }

  pub fn totals(&self) -> Option<Totals> {
    self.state.read().totals.clone()
  }

  pub fn close(&self) {
    self.lease.revoke();
  }
}
