// marina_core/src/identity.rs

//! Boundary to the managed identity provider.
//!
//! Sign-in and sign-up live entirely outside this core; the only capability
//! the flow needs is "who is the current caller". Customer profiles and
//! sessions are keyed by the provider's subject id.

/// Read-only view of the authenticated caller.
pub trait IdentityProvider: Send + Sync + 'static {
  /// The identity provider's subject id for the signed-in user, or `None`
  /// when nobody is signed in.
  fn current_subject(&self) -> Option<String>;
}

/// An always-signed-in identity, used by the demo app and by tests.
#[derive(Debug, Clone)]
pub struct FixedIdentity {
  subject: String,
}

impl FixedIdentity {
  pub fn new(subject: impl Into<String>) -> Self {
    FixedIdentity {
      subject: subject.into(),
    }
  }
}

impl IdentityProvider for FixedIdentity {
  fn current_subject(&self) -> Option<String> {
    Some(self.subject.clone())
  }
}

/// A signed-out identity. Operations requiring authentication abort with
/// `MarinaError::Unauthenticated` before any write is attempted.
#[derive(Debug, Clone, Default)]
pub struct SignedOut;

impl IdentityProvider for SignedOut {
  fn current_subject(&self) -> Option<String> {
    None
  }
}
