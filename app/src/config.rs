// marina_project/app/src/config.rs

use crate::errors::{AppError, Result}; // Use AppError specific Result
use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)] // Clone is useful if parts of config are passed around
pub struct AppConfig {
  // The identity-provider subject the demo signs in as.
  pub demo_customer_subject: String,

  // Currency code recorded on saved payment summaries.
  pub currency: String,

  // Seed the catalog on startup.
  pub seed_catalog: bool,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| {
      env::var(var_name)
        .map_err(|e| AppError::Config(format!("Missing environment variable '{}': {}", var_name, e)))
    };

    let demo_customer_subject =
      get_env("DEMO_CUSTOMER_SUBJECT").unwrap_or_else(|_| "customer-demo-01".to_string());
    let currency = get_env("BOOKING_CURRENCY").unwrap_or_else(|_| "USD".to_string());
    let seed_catalog = get_env("SEED_CATALOG")
      .unwrap_or_else(|_| "true".to_string())
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid SEED_CATALOG value: {}", e)))?;

    tracing::info!("Application configuration loaded successfully.");

    Ok(Self {
      demo_customer_subject,
      currency,
      seed_catalog,
    })
  }
}
