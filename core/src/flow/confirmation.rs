// marina_core/src/flow/confirmation.rs

use std::sync::Arc;

use tracing::warn;

use crate::error::{MarinaError, MarinaResult};
use crate::model::Booking;
use crate::pricing::{self, PriceLine, Totals};
use crate::store::{collections, DocumentStore, Record, RecordWatch};

/// What the confirmation screen renders: the booking snapshot plus totals
/// that are guaranteed present.
#[derive(Debug, Clone)]
pub struct BookingView {
  pub booking: Booking,
  pub totals: Totals,
  /// True when the stored snapshot lacked totals and they were recomputed
  /// from the line items (compatibility path, not the primary one).
  pub totals_recomputed: bool,
}

/// Reads and subscribes to finalized bookings.
#[derive(Clone)]
pub struct ConfirmationViewer {
  store: Arc<dyn DocumentStore>,
}

impl ConfirmationViewer {
  pub fn new(store: Arc<dyn DocumentStore>) -> Self {
    ConfirmationViewer { store }
  }

  pub async fn load(&self, booking_id: &str) -> MarinaResult<BookingView> {
    let record = self
      .store
      .get(collections::BOOKINGS, booking_id)
      .await?
      .ok_or_else(|| MarinaError::not_found(collections::BOOKINGS, booking_id))?;
    view_of(&record)
  }

  /// Live feed of one booking record. The record is effectively immutable
  /// after finalization, so in practice this fires once with the stored
  /// snapshot. Dropping the watch tears the feed down.
  pub fn watch(&self, booking_id: &str) -> BookingWatch {
    BookingWatch {
      inner: self.store.watch_record(collections::BOOKINGS, booking_id),
    }
  }
}

/// A typed wrapper over the raw record feed for a booking.
#[derive(Debug)]
pub struct BookingWatch {
  inner: RecordWatch,
}

impl BookingWatch {
  pub fn current(&self) -> Option<BookingView> {
    self.inner.current().and_then(|record| view_of(&record).ok())
  }

  /// Waits for the next change. Returns `false` once the feed is closed.
  pub async fn changed(&mut self) -> bool {
    self.inner.changed().await
  }
}

// Stored totals are displayed verbatim; recomputing from the snapshot's
// line items is only the fallback for bookings written without them.
fn view_of(record: &Record) -> MarinaResult<BookingView> {
  let booking = Booking::from_record(record)?;
  match booking.totals.clone() {
    Some(totals) => Ok(BookingView {
      booking,
      totals,
      totals_recomputed: false,
    }),
    None => {
      warn!(booking_id = %record.id, "booking snapshot lacks totals; recomputing for display");
      let price_lines: Vec<PriceLine> = booking
        .line_items
        .iter()
        .map(|line| PriceLine::new(line.unit_price, line.quantity))
        .collect();
      let totals = pricing::quote(&price_lines);
      Ok(BookingView {
        booking,
        totals,
        totals_recomputed: true,
      })
    }
  }
}
