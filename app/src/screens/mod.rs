// marina_project/app/src/screens/mod.rs

//! One controller per screen of the booking flow.
//!
//! Every controller follows the same contract:
//!  - `open` performs the screen's reads and moves its phase from
//!    `Loading` to `Ready` (or `Failed` with a single user-facing message).
//!  - Asynchronous results are applied to screen state only after checking
//!    the stale-result guard, so a closed screen never receives late data.
//!  - `close` revokes the guard and tears down any live feed the screen
//!    holds; list subscriptions never outlive their screen.

pub mod addons;
pub mod catalog;
pub mod confirmation;
pub mod details;
pub mod guard;
pub mod payment;
pub mod review;

pub use addons::AddonsScreen;
pub use catalog::CatalogScreen;
pub use confirmation::ConfirmationScreen;
pub use details::DetailsScreen;
pub use guard::{LeaseToken, ScreenLease, ScreenPhase};
pub use payment::{PaymentForm, PaymentScreen};
pub use review::{ReviewLine, ReviewScreen};
