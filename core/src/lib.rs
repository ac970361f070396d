// src/lib.rs

//! Marina: an ASYNC rental-booking flow core.
//!
//! Marina models the screen flow of a rental-booking product as a set of
//! small services over a document-store boundary:
//!  - A catalog reader with facet filtering and an index-fallback query path.
//!  - An item resolver that fans out lookups concurrently and normalizes
//!    heterogeneously-encoded price and add-on fields.
//!  - A pure decimal pricing calculator (base + 10% tax + flat deposit).
//!  - A draft-session aggregate mutated by narrow merge updates and
//!    finalized exactly once.
//!  - An atomic booking finalizer: profile merge, booking snapshot,
//!    session transition, and optional payment summary in one commit.
//!  - A confirmation viewer subscribed to the finalized booking.
//!
//! Storage and identity are boundaries, not implementations: everything
//! runs against the [`store::DocumentStore`] and
//! [`identity::IdentityProvider`] traits. The bundled
//! [`store::MemoryStore`] backend powers the demo application and tests.

// Declare modules according to the planned structure
pub mod error;
pub mod flow;
pub mod identity;
pub mod model;
pub mod normalize;
pub mod pricing;
pub mod shared;
pub mod store;

// --- Re-exports for the Public API ---

// Core types that users will interact with frequently
pub use crate::error::{MarinaError, MarinaResult};
pub use crate::shared::Shared;

pub use crate::identity::{FixedIdentity, IdentityProvider, SignedOut};

pub use crate::store::{
    collections, fields_of, CollectionWatch, DocumentStore, Fields, MemoryStore, Query, Record,
    RecordWatch, SortDirection, WriteOp,
};

pub use crate::model::{
    Booking, BookingLine, BookingStatus, CardDetails, CustomerProfile, DraftBooking,
    PaymentSummary, ProfileUpdate, RentalItem, Session, SessionStatus,
};

pub use crate::pricing::{quote, PriceLine, Totals};

// The screen-facing services
pub use crate::flow::{
    BookingView, BookingWatch, CatalogFilter, CatalogService, ConfirmationViewer, FinalizeRequest,
    FinalizeService, ProfileService, ResolvedSelection, SessionService,
};

/*
    Core Workflow:
    1. Stand up a `DocumentStore` backend (the bundled `MemoryStore`, or your
       own adapter over a hosted document database) and an `IdentityProvider`.
    2. Browse with `CatalogService::list`, then `SessionService::create` with
       the initial selection; the returned session id is the capability token
       threaded through every later screen.
    3. Capture the rental window and add-ons with `SessionService::set_dates`
       / `set_addons` / `set_items` (narrow merge updates).
    4. On review, `CatalogService::resolve` + `pricing::quote` rebuild the
       display totals from the live catalog.
    5. `FinalizeService::finalize` re-resolves, re-prices, and commits the
       booking atomically, returning the booking id.
    6. `ConfirmationViewer::watch` renders the finalized snapshot.
*/
