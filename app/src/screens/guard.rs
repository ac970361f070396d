// marina_project/app/src/screens/guard.rs

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// The user-visible lifecycle of a screen. `Loading` is the suspension
/// signal shown while network reads are in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenPhase {
  Loading,
  Ready,
  Failed(String),
}

impl ScreenPhase {
  pub fn is_ready(&self) -> bool {
    matches!(self, ScreenPhase::Ready)
  }
}

/// The stale-result guard a screen holds while it is on screen.
///
/// Tokens are captured when an asynchronous operation starts and checked
/// before its result is applied; once the screen revokes the lease, every
/// outstanding token goes dead and late-arriving results are discarded
/// instead of mutating a dismissed screen.
#[derive(Debug)]
pub struct ScreenLease {
  alive: Arc<AtomicBool>,
}

impl ScreenLease {
  pub fn new() -> Self {
    ScreenLease {
      alive: Arc::new(AtomicBool::new(true)),
    }
  }

  pub fn token(&self) -> LeaseToken {
    LeaseToken {
      alive: Arc::clone(&self.alive),
    }
  }

  pub fn revoke(&self) {
    self.alive.store(false, Ordering::SeqCst);
  }
}

impl Default for ScreenLease {
  fn default() -> Self {
    Self::new()
  }
}

#[derive(Debug, Clone)]
pub struct LeaseToken {
  alive: Arc<AtomicBool>,
}

impl LeaseToken {
  pub fn is_live(&self) -> bool {
    self.alive.load(Ordering::SeqCst)
  }
}
