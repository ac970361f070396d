// marina_project/app/src/screens/payment.rs

use crate::errors::Result;
use crate::state::AppState;
use futures_util::future::join;
use marina::{CardDetails, FinalizeRequest, ProfileUpdate};
use tracing::{info, instrument};

/// Everything the payment screen's form collects.
///
/// The card number and CVV exist only in this form model: submission
/// derives the non-sensitive `CardDetails` (brand, last4, expiry) and the
/// full number and CVV are dropped on the floor. Nothing below this screen
/// ever sees them — real charging is an external collaborator, out of this
/// flow's scope.
#[derive(Debug, Clone, Default)]
pub struct PaymentForm {
  pub first_name: String,
  pub last_name: String,
  pub email: String,
  pub phone: String,
  pub address_line1: String,
  pub city: String,
  pub postal_code: String,

  pub card_number: String,
  pub card_cvv: String,
  pub card_expiry: String,
  pub save_payment_info: bool,

  pub accepted_rental_terms: bool,
  pub accepted_liability_waiver: bool,
}

/// The payment/profile screen: prefills the form from the stored profile
/// and submits the finalize request.
pub struct PaymentScreen {
  app: AppState,
  session_id: String,
}

impl PaymentScreen {
  pub fn new(app: AppState, session_id: impl Into<String>) -> Self {
    PaymentScreen {
      app,
      session_id: session_id.into(),
    }
  }

  /// Prefills the form from the stored profile, verifying in parallel that
  /// the session still exists (a vanished session aborts this screen's
  /// load instead of failing later at submit).
  pub async fn prefill(&self) -> Result<PaymentForm> {
    let subject = self
      .app
      .identity
      .current_subject()
      .unwrap_or_default();

    let (profile, session) = join(
      self.app.profiles().get(&subject),
      self.app.sessions().get(&self.session_id),
    )
    .await;
    session?;

    let mut form = PaymentForm::default();
    if let Some(profile) = profile? {
      form.first_name = profile.first_name.unwrap_or_default();
      form.last_name = profile.last_name.unwrap_or_default();
      form.email = profile.email.unwrap_or_default();
      form.phone = profile.phone.unwrap_or_default();
      form.address_line1 = profile.address_line1.unwrap_or_default();
      form.city = profile.city.unwrap_or_default();
      form.postal_code = profile.postal_code.unwrap_or_default();
    }
    Ok(form)
  }

  /// Submits the finalize request. Returns the new booking's id.
  #[instrument(skip(self, form), fields(session_id = %self.session_id))]
  pub async fn submit(&self, form: &PaymentForm) -> Result<String> {
    let payment = if form.save_payment_info {
      if form.card_number.trim().is_empty()
        || form.card_cvv.trim().is_empty()
        || form.card_expiry.trim().is_empty()
      {
        return Err(crate::errors::AppError::Validation(
          "Card number, CVV and expiry are required to save payment info.".to_string(),
        ));
      }
      Some(CardDetails {
        card_brand: detect_brand(&form.card_number),
        card_last4: last4(&form.card_number),
        card_expiry: form.card_expiry.clone(),
      })
    } else {
      None
    };

    let request = FinalizeRequest {
      session_id: self.session_id.clone(),
      profile: ProfileUpdate {
        first_name: optional(&form.first_name),
        last_name: optional(&form.last_name),
        email: optional(&form.email),
        phone: optional(&form.phone),
        address_line1: optional(&form.address_line1),
        city: optional(&form.city),
        postal_code: optional(&form.postal_code),
        ..ProfileUpdate::default()
      },
      accepted_rental_terms: form.accepted_rental_terms,
      accepted_liability_waiver: form.accepted_liability_waiver,
      currency: self.app.config.currency.clone(),
      payment,
    };

    let booking_id = self.app.finalizer().finalize(request).await?;
    info!(booking_id = %booking_id, "payment screen finalized the booking");
    Ok(booking_id)
  }
}

// Empty form fields are absent from the profile merge, not stored as "".
fn optional(value: &str) -> Option<String> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    None
  } else {
    Some(trimmed.to_string())
  }
}

fn detect_brand(card_number: &str) -> String {
  match card_number.trim().chars().next() {
    Some('4') => "visa".to_string(),
    Some('5') => "mastercard".to_string(),
    Some('3') => "amex".to_string(),
    _ => "card".to_string(),
  }
}

fn last4(card_number: &str) -> String {
  let digits: Vec<char> = card_number.chars().filter(char::is_ascii_digit).collect();
  digits.iter().rev().take(4).rev().collect()
}
