//! Service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `PROVISIONER_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! ## Optional
//! - `PROVISIONER_HOST` - Bind address (default: 127.0.0.1)
//! - `PROVISIONER_PORT` - Listen port (default: 3002)
//! - `SHOPIFY_API_VERSION` - Admin API version path segment (default: 2025-07)
//! - `SHOPIFY_API_SCHEME` - Endpoint scheme, `https` or `http` (default: https)
//! - `SHOPIFY_TIMEOUT_SECS` - Whole-request timeout per remote call (default: 20)
//! - `SHOPIFY_CONNECT_TIMEOUT_SECS` - Connect timeout per remote call (default: 5)
//! - `PROVISIONER_INVENTORY_STRATEGY` - `bulk` or `activate` (default: bulk)
//! - `PROVISIONER_ON_FAILURE` - `retain` or `delete` (default: retain)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT`, `SENTRY_SAMPLE_RATE`, `SENTRY_TRACES_SAMPLE_RATE`
//!
//! ## Optional (default fulfillment location profile)
//! - `PROVISIONER_LOCATION_NAME` (default: New York Shop)
//! - `PROVISIONER_LOCATION_ADDRESS1` (default: 11 W 53rd St)
//! - `PROVISIONER_LOCATION_CITY` (default: New York)
//! - `PROVISIONER_LOCATION_PROVINCE_CODE` (default: NY)
//! - `PROVISIONER_LOCATION_COUNTRY_CODE` (default: US)
//! - `PROVISIONER_LOCATION_ZIP` (default: 10019)

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

use crate::pipeline::{FailurePolicy, InventoryStrategy, PipelineSettings};

const DEFAULT_API_VERSION: &str = "2025-07";
const DEFAULT_TIMEOUT_SECS: u64 = 20;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Service configuration.
#[derive(Debug, Clone)]
pub struct ProvisionerConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Remote catalog API configuration
    pub shopify: ShopifyApiConfig,
    /// Inventory strategy and failure policy
    pub pipeline: PipelineSettings,
    /// Address profile used when a shop's location is first created
    pub location: LocationProfile,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Shopify Admin API transport configuration.
///
/// Holds no credentials: access tokens arrive per request and are never
/// stored on the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopifyApiConfig {
    /// API version path segment (e.g., 2025-07)
    pub api_version: String,
    /// Endpoint scheme; `http` is only useful against local fakes
    pub scheme: String,
    /// Whole-request timeout
    pub timeout: Duration,
    /// TCP/TLS connect timeout
    pub connect_timeout: Duration,
}

impl Default for ShopifyApiConfig {
    fn default() -> Self {
        Self {
            api_version: DEFAULT_API_VERSION.to_string(),
            scheme: "https".to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }
}

/// Address profile for lazily created fulfillment locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationProfile {
    pub name: String,
    pub address1: String,
    pub city: String,
    pub province_code: String,
    pub country_code: String,
    pub zip: String,
}

impl Default for LocationProfile {
    fn default() -> Self {
        Self {
            name: "New York Shop".to_string(),
            address1: "11 W 53rd St".to_string(),
            city: "New York".to_string(),
            province_code: "NY".to_string(),
            country_code: "US".to_string(),
            zip: "10019".to_string(),
        }
    }
}

impl ProvisionerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("PROVISIONER_DATABASE_URL")?;
        let host = parse_env_or_default::<IpAddr>("PROVISIONER_HOST", "127.0.0.1")?;
        let port = parse_env_or_default::<u16>("PROVISIONER_PORT", "3002")?;

        let shopify = ShopifyApiConfig::from_env()?;
        let pipeline = PipelineSettings {
            inventory: parse_env_or_default("PROVISIONER_INVENTORY_STRATEGY", "bulk")?,
            on_failure: parse_env_or_default("PROVISIONER_ON_FAILURE", "retain")?,
        };
        let location = LocationProfile::from_env();

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            database_url,
            host,
            port,
            shopify,
            pipeline,
            location,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl ShopifyApiConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let scheme = get_env_or_default("SHOPIFY_API_SCHEME", "https");
        if scheme != "https" && scheme != "http" {
            return Err(ConfigError::InvalidEnvVar(
                "SHOPIFY_API_SCHEME".to_string(),
                format!("expected https or http, got {scheme}"),
            ));
        }

        Ok(Self {
            api_version: get_env_or_default("SHOPIFY_API_VERSION", DEFAULT_API_VERSION),
            scheme,
            timeout: Duration::from_secs(parse_env_or_default(
                "SHOPIFY_TIMEOUT_SECS",
                &DEFAULT_TIMEOUT_SECS.to_string(),
            )?),
            connect_timeout: Duration::from_secs(parse_env_or_default(
                "SHOPIFY_CONNECT_TIMEOUT_SECS",
                &DEFAULT_CONNECT_TIMEOUT_SECS.to_string(),
            )?),
        })
    }
}

impl LocationProfile {
    fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            name: get_optional_env("PROVISIONER_LOCATION_NAME").unwrap_or(defaults.name),
            address1: get_optional_env("PROVISIONER_LOCATION_ADDRESS1")
                .unwrap_or(defaults.address1),
            city: get_optional_env("PROVISIONER_LOCATION_CITY").unwrap_or(defaults.city),
            province_code: get_optional_env("PROVISIONER_LOCATION_PROVINCE_CODE")
                .unwrap_or(defaults.province_code),
            country_code: get_optional_env("PROVISIONER_LOCATION_COUNTRY_CODE")
                .unwrap_or(defaults.country_code),
            zip: get_optional_env("PROVISIONER_LOCATION_ZIP").unwrap_or(defaults.zip),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL` (used by Fly.io postgres attach).
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    // Try primary key first (e.g., PROVISIONER_DATABASE_URL)
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    // Fallback to generic DATABASE_URL (set by Fly.io postgres attach)
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable (or its default) with `FromStr`.
fn parse_env_or_default<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
