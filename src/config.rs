//! Storefront configuration

use std::path::PathBuf;

use clap::{Args, Parser};

use crate::checkout::{ClearPolicy, PaymentProvider};

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Checkout settings.
#[derive(Debug, Args)]
pub struct CheckoutConfig {
    /// When checkout empties the cart
    #[arg(
        long,
        env = "CHECKOUT_CLEAR_POLICY",
        value_enum,
        default_value_t = ClearPolicy::OnConfirm
    )]
    pub checkout_clear_policy: ClearPolicy,

    /// Payment app the demo order is sent to
    #[arg(
        long,
        env = "PAYMENT_PROVIDER",
        value_enum,
        default_value_t = PaymentProvider::Nequi
    )]
    pub payment_provider: PaymentProvider,
}

/// Catalog fixture settings.
#[derive(Debug, Args)]
pub struct CatalogConfig {
    /// Directory holding the YAML fixtures
    #[arg(long, env = "FIXTURES_PATH", default_value = "./fixtures")]
    pub fixtures: PathBuf,

    /// Catalog fixture to load, without extension
    #[arg(long, env = "CATALOG_FIXTURE", default_value = "storefront")]
    pub catalog: String,
}

/// Fruteria storefront configuration
#[derive(Debug, Parser)]
#[command(name = "fruteria", about = "Fruteria storefront demo", long_about = None)]
pub struct StorefrontConfig {
    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Checkout settings.
    #[command(flatten)]
    pub checkout: CheckoutConfig,

    /// Catalog fixture settings.
    #[command(flatten)]
    pub catalog: CatalogConfig,
}

impl StorefrontConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}
