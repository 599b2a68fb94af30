//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ADMIN_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `ADMIN_BASE_URL` - Public URL for the admin service
//! - `SHOPIFY_STORE` - Shopify store domain (e.g., your-store.myshopify.com)
//! - `SHOPIFY_ADMIN_ACCESS_TOKEN` - Admin API access token issued to the app
//!
//! ## Optional
//! - `ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `ADMIN_PORT` - Listen port (default: 3001)
//! - `SHOPIFY_API_VERSION` - API version (default: 2026-01)
//! - `GIFT_METAFIELD_NAMESPACE` - Namespace of the gift metafield (default: custom)
//! - `GIFT_METAFIELD_KEY` - Key of the gift metafield (default: giftvariants)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` / `SENTRY_TRACES_SAMPLE_RATE` - Sample rates (default: 1.0)
//!
//! ## Optional (TLS)
//! - `ADMIN_TLS_CERT` - PEM-encoded certificate chain
//! - `ADMIN_TLS_KEY` - PEM-encoded private key

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_API_VERSION: &str = "2026-01";
const DEFAULT_GIFT_NAMESPACE: &str = "custom";
const DEFAULT_GIFT_KEY: &str = "giftvariants";

/// Tokens below this many bits per character are rejected.
const MIN_TOKEN_ENTROPY: f64 = 3.3;

/// Substrings that mark a token copied from a sample `.env` (lowercase).
const SAMPLE_TOKEN_MARKERS: &[&str] = &[
    "your-",
    "your_",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "dummy",
    "xxx",
    "todo",
    "insert",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

impl ConfigError {
    fn invalid(key: &str, reason: impl std::fmt::Display) -> Self {
        Self::InvalidEnvVar(key.to_string(), reason.to_string())
    }
}

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    pub host: IpAddr,
    pub port: u16,
    /// Public base URL, without a trailing slash
    pub base_url: String,
    pub shopify: ShopifyAdminConfig,
    pub sentry_dsn: Option<String>,
    pub sentry_environment: Option<String>,
    /// Error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Traces sample rate (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
    /// Serve HTTPS directly when set
    pub tls: Option<TlsConfig>,
}

/// Shopify Admin API configuration.
///
/// `Debug` is written by hand so the access token never reaches a log line.
#[derive(Clone)]
pub struct ShopifyAdminConfig {
    /// Bare store domain, e.g. `your-store.myshopify.com`
    pub store: String,
    pub api_version: String,
    pub access_token: SecretString,
    /// Where free gift selections are stored on each product
    pub gift_metafield: GiftMetafieldConfig,
}

impl std::fmt::Debug for ShopifyAdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyAdminConfig")
            .field("store", &self.store)
            .field("api_version", &self.api_version)
            .field("access_token", &"[REDACTED]")
            .field("gift_metafield", &self.gift_metafield)
            .finish()
    }
}

/// Namespace and key of the `list.variant_reference` product metafield that
/// holds the free gift variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GiftMetafieldConfig {
    pub namespace: String,
    pub key: String,
}

impl Default for GiftMetafieldConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_GIFT_NAMESPACE.to_string(),
            key: DEFAULT_GIFT_KEY.to_string(),
        }
    }
}

/// Certificate and key for serving HTTPS without a proxy.
#[derive(Clone)]
pub struct TlsConfig {
    pub cert_pem: String,
    pub key_pem: SecretString,
}

impl std::fmt::Debug for TlsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsConfig")
            .field("cert_pem", &format_args!("{} bytes", self.cert_pem.len()))
            .field("key_pem", &"[REDACTED]")
            .finish()
    }
}

impl TlsConfig {
    /// Both halves or neither; one without the other is a mistake.
    fn from_env() -> Result<Option<Self>, ConfigError> {
        match (env_opt("ADMIN_TLS_CERT"), env_opt("ADMIN_TLS_KEY")) {
            (None, None) => Ok(None),
            (Some(cert_pem), Some(key)) => Ok(Some(Self {
                cert_pem,
                key_pem: SecretString::from(key),
            })),
            (Some(_), None) => Err(ConfigError::invalid(
                "ADMIN_TLS_KEY",
                "must be set when ADMIN_TLS_CERT is",
            )),
            (None, Some(_)) => Err(ConfigError::invalid(
                "ADMIN_TLS_CERT",
                "must be set when ADMIN_TLS_KEY is",
            )),
        }
    }
}

impl AdminConfig {
    /// Load configuration from the process environment, reading `.env` first
    /// when one exists.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing or malformed,
    /// or if the access token looks like a sample value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let database_url = env_req("ADMIN_DATABASE_URL")
            .or_else(|_| env_req("DATABASE_URL"))
            .map(SecretString::from)
            .map_err(|_| ConfigError::MissingEnvVar("ADMIN_DATABASE_URL".to_string()))?;

        Ok(Self {
            database_url,
            host: env_parse("ADMIN_HOST", IpAddr::from([127, 0, 0, 1]))?,
            port: env_parse("ADMIN_PORT", 3001)?,
            base_url: parse_base_url(&env_req("ADMIN_BASE_URL")?)?,
            shopify: ShopifyAdminConfig::from_env()?,
            sentry_dsn: env_opt("SENTRY_DSN"),
            sentry_environment: env_opt("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: sample_rate("SENTRY_SAMPLE_RATE"),
            sentry_traces_sample_rate: sample_rate("SENTRY_TRACES_SAMPLE_RATE"),
            tls: TlsConfig::from_env()?,
        })
    }

    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the public URL is served over HTTPS (controls secure cookies).
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl ShopifyAdminConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let store = env_req("SHOPIFY_STORE")?;
        if store.contains("://") || store.contains('/') {
            return Err(ConfigError::invalid(
                "SHOPIFY_STORE",
                "expected a bare domain such as your-store.myshopify.com",
            ));
        }

        let token = env_req("SHOPIFY_ADMIN_ACCESS_TOKEN")?;
        check_access_token(&token).map_err(|reason| {
            ConfigError::InsecureSecret("SHOPIFY_ADMIN_ACCESS_TOKEN".to_string(), reason)
        })?;

        Ok(Self {
            store,
            api_version: env_or("SHOPIFY_API_VERSION", DEFAULT_API_VERSION),
            access_token: SecretString::from(token),
            gift_metafield: GiftMetafieldConfig {
                namespace: env_or("GIFT_METAFIELD_NAMESPACE", DEFAULT_GIFT_NAMESPACE),
                key: env_or("GIFT_METAFIELD_KEY", DEFAULT_GIFT_KEY),
            },
        })
    }
}

fn env_req(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    env_opt(key).unwrap_or_else(|| default.to_string())
}

/// Parse `key` when set, otherwise use `default`.
fn env_parse<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_opt(key).map_or(Ok(default), |raw| {
        raw.parse().map_err(|e| ConfigError::invalid(key, e))
    })
}

/// Unparseable rates fall back to sampling everything.
fn sample_rate(key: &str) -> f32 {
    env_opt(key)
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(1.0)
}

/// Accept only http(s) URLs; the trailing slash is dropped so paths can be
/// appended with `format!("{base}/...")`.
fn parse_base_url(raw: &str) -> Result<String, ConfigError> {
    let url = url::Url::parse(raw).map_err(|e| ConfigError::invalid("ADMIN_BASE_URL", e))?;
    match url.scheme() {
        "http" | "https" => Ok(raw.trim_end_matches('/').to_string()),
        other => Err(ConfigError::invalid(
            "ADMIN_BASE_URL",
            format!("unsupported scheme '{other}'"),
        )),
    }
}

/// Bits of Shannon entropy per character of `s`.
fn bits_per_char(s: &str) -> f64 {
    let mut counts: HashMap<char, u32> = HashMap::new();
    let mut total = 0_u32;
    for c in s.chars() {
        *counts.entry(c).or_default() += 1;
        total += 1;
    }
    if total == 0 {
        return 0.0;
    }

    let total = f64::from(total);
    counts
        .into_values()
        .map(|n| {
            let p = f64::from(n) / total;
            -p * p.log2()
        })
        .sum()
}

/// Reject tokens left over from a sample file or typed by hand.
fn check_access_token(token: &str) -> Result<(), String> {
    let lower = token.to_ascii_lowercase();
    if let Some(marker) = SAMPLE_TOKEN_MARKERS.iter().find(|m| lower.contains(**m)) {
        return Err(format!("looks like a sample value (contains '{marker}')"));
    }

    let entropy = bits_per_char(token);
    if entropy < MIN_TOKEN_ENTROPY {
        return Err(format!(
            "entropy too low ({entropy:.2} bits/char, need >= {MIN_TOKEN_ENTROPY:.1})"
        ));
    }
    Ok(())
}
