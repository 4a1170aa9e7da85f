//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtConfig,
    /// Settlement policy configuration.
    #[serde(default)]
    pub settlement: SettlementConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Connection attempts before startup fails.
    #[serde(default = "default_connect_attempts")]
    pub connect_attempts: u32,
    /// Seconds to wait between connection attempts.
    #[serde(default = "default_connect_retry_secs")]
    pub connect_retry_secs: u64,
}

fn default_connect_attempts() -> u32 {
    5
}

fn default_connect_retry_secs() -> u64 {
    5
}

/// JWT configuration.
///
/// The secret has no default: it must be supplied via `PUNT__JWT__SECRET`
/// (or a config file) so it can be rotated without a rebuild.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Token validity in hours.
    #[serde(default = "default_token_expires_hours")]
    pub token_expires_hours: i64,
}

fn default_token_expires_hours() -> i64 {
    24
}

/// Settlement policy configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettlementConfig {
    /// Whether a wager may drive an account balance below zero.
    #[serde(default)]
    pub allow_negative_balance: bool,
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("PUNT").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
