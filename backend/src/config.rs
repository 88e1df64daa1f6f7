//! Configuration management for the Bar Reorder Planner
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with BAR_ prefix

use chrono::{FixedOffset, Offset, Utc};
use config::{ConfigError, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::{SupplierDefaults, DEFAULT_TARGET_WEEKS};

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Square POS API configuration
    pub square: SquareConfig,

    /// Reorder defaults
    pub reorder: ReorderConfig,

    /// Venue details
    pub venue: VenueConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,

    /// Apply embedded migrations on startup
    pub run_migrations: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SquareConfig {
    /// Square access token
    pub access_token: String,

    /// API base URL
    pub base_url: String,

    /// Value sent in the Square-Version header
    pub api_version: String,

    /// Trailing sales window used when a request does not give one
    pub default_days_back: u32,

    /// Page cap when reading inventory changes
    pub max_change_pages: u32,

    /// Page cap when searching orders
    pub max_order_pages: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReorderConfig {
    /// Weeks of cover used until the operator saves one
    pub default_target_weeks: Decimal,

    /// Suppliers assigned to items without one
    pub suppliers: SupplierDefaults,
}

#[derive(Debug, Deserialize, Clone)]
pub struct VenueConfig {
    /// Offset from UTC in hours, used to date notes
    pub utc_offset_hours: i32,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("BAR_ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let suppliers = SupplierDefaults::default();

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("database.run_migrations", true)?
            .set_default("square.base_url", "https://connect.squareup.com/v2")?
            .set_default("square.api_version", "2024-01-17")?
            .set_default("square.default_days_back", 90)?
            .set_default("square.max_change_pages", 50)?
            .set_default("square.max_order_pages", 100)?
            .set_default("reorder.default_target_weeks", DEFAULT_TARGET_WEEKS.to_string())?
            .set_default("reorder.suppliers.snacks", suppliers.snacks)?
            .set_default("reorder.suppliers.soft_drinks", suppliers.soft_drinks)?
            .set_default("reorder.suppliers.general", suppliers.general)?
            // Brisbane
            .set_default("venue.utc_offset_hours", 10)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (BAR_ prefix)
            .add_source(
                Environment::with_prefix("BAR")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl VenueConfig {
    /// Venue time zone; out-of-range offsets fall back to UTC
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_hours * 3600)
            .unwrap_or_else(|| Utc.fix())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}
