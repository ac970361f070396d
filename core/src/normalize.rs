// marina_core/src/normalize.rs

//! Normalization of heterogeneously-shaped catalog fields.
//!
//! The hosted catalog was written by several generations of mobile client,
//! so the same logical field arrives in different encodings: a daily price
//! may be a bare number or a currency-formatted string, and an add-on list
//! may be a native array, a map, a JSON-encoded string, or a bracketed
//! comma-separated string. Each field gets exactly one normalization
//! function here; consuming services never parse raw values themselves.

use rust_decimal::Decimal;
use serde_json::Value;
use tracing::debug;

/// Normalizes a stored price value to a non-negative decimal.
///
/// Strings are stripped of everything except digits, `.` and `-` before
/// parsing (`"$1,234.50"` -> `1234.50`). Missing, non-parseable, or
/// negative values collapse to zero.
pub fn price_from_value(value: Option<&Value>) -> Decimal {
  let parsed = match value {
    Some(Value::Number(number)) => number.to_string().parse::<Decimal>().ok(),
    Some(Value::String(text)) => {
      let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
      cleaned.parse::<Decimal>().ok()
    }
    _ => None,
  };

  match parsed {
    Some(price) if !price.is_sign_negative() => price,
    Some(price) => {
      debug!(%price, "negative stored price clamped to zero");
      Decimal::ZERO
    }
    None => Decimal::ZERO,
  }
}

/// Normalizes a stored add-on field to trimmed, non-empty, deduplicated
/// labels in first-seen order.
///
/// Accepts all four encodings observed in the catalog:
/// - a native array of strings,
/// - a map whose values are strings,
/// - a JSON-encoded array string (`'["Cooler","Rain Cover"]'`),
/// - a bracketed comma-separated string (`"[Cooler, Rain Cover]"`).
pub fn addons_from_value(value: Option<&Value>) -> Vec<String> {
  let mut labels = Vec::new();
  match value {
    Some(Value::Array(entries)) => {
      for entry in entries {
        if let Value::String(label) = entry {
          push_label(&mut labels, label);
        }
      }
    }
    Some(Value::Object(map)) => {
      for entry in map.values() {
        if let Value::String(label) = entry {
          push_label(&mut labels, label);
        }
      }
    }
    Some(Value::String(text)) => {
      let trimmed = text.trim();
      if trimmed.starts_with('[') {
        // Prefer the strict JSON reading; legacy clients wrote bracketed
        // lists without quoting, which fall through to the split path.
        if let Ok(parsed) = serde_json::from_str::<Vec<String>>(trimmed) {
          for label in &parsed {
            push_label(&mut labels, label);
          }
        } else {
          let body = trimmed.trim_start_matches('[').trim_end_matches(']');
          for label in body.split(',') {
            push_label(&mut labels, label);
          }
        }
      } else if !trimmed.is_empty() {
        for label in trimmed.split(',') {
          push_label(&mut labels, label);
        }
      }
    }
    _ => {}
  }
  labels
}

/// Deduplicates a caller-supplied label list with the same trimming rules
/// the stored encodings get, preserving first-seen order.
pub fn dedup_labels<I>(labels: I) -> Vec<String>
where
  I: IntoIterator,
  I::Item: AsRef<str>,
{
  let mut out = Vec::new();
  for label in labels {
    push_label(&mut out, label.as_ref());
  }
  out
}

fn push_label(labels: &mut Vec<String>, raw: &str) {
  let label = raw.trim();
  if label.is_empty() {
    return;
  }
  if labels.iter().any(|existing| existing == label) {
    return;
  }
  labels.push(label.to_string());
}
