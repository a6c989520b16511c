//! Application configuration management.

use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Voucher entry defaults.
    #[serde(default)]
    pub vouchers: VoucherSettings,
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

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

/// Database configuration.
///
/// Without a URL the server keeps vouchers in memory.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    #[serde(default)]
    pub url: Option<String>,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
        }
    }
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// How voucher numbers are suggested when auto numbering is on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberingScheme {
    /// Type prefix followed by a random six-digit number.
    #[default]
    Random,
    /// Type prefix followed by the next number in the fiscal year.
    Sequential,
}

/// Which optional voucher fields a form shows.
///
/// Values for hidden fields are never stored on a voucher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VoucherFieldConfig {
    /// Voucher numbers are generated and read-only.
    #[serde(alias = "auto_numbering")]
    pub auto_numbering: bool,
    /// Reference number and reference date are shown.
    #[serde(alias = "show_reference")]
    pub show_reference: bool,
    /// Bank name and cheque number are shown on lines.
    #[serde(alias = "show_bank_details")]
    pub show_bank_details: bool,
    /// Cost centre is shown on lines.
    #[serde(alias = "show_cost_centre")]
    pub show_cost_centre: bool,
    /// Per-line narration is shown.
    #[serde(alias = "show_entry_narration")]
    pub show_entry_narration: bool,
}

impl Default for VoucherFieldConfig {
    fn default() -> Self {
        Self {
            auto_numbering: true,
            show_reference: true,
            show_bank_details: true,
            show_cost_centre: false,
            show_entry_narration: false,
        }
    }
}

/// Voucher entry settings.
#[derive(Debug, Clone, Deserialize)]
pub struct VoucherSettings {
    /// Numbering scheme for suggested voucher numbers.
    #[serde(default)]
    pub numbering: NumberingScheme,
    /// First month (1-12) of the fiscal year.
    #[serde(default = "default_fiscal_year_start_month")]
    pub fiscal_year_start_month: u32,
    /// How many fresh numbers to try when an auto-generated number collides.
    #[serde(default = "default_number_retry_attempts")]
    pub number_retry_attempts: u32,
    /// Default field configuration for new vouchers.
    #[serde(default)]
    pub fields: VoucherFieldConfig,
}

impl Default for VoucherSettings {
    fn default() -> Self {
        Self {
            numbering: NumberingScheme::default(),
            fiscal_year_start_month: default_fiscal_year_start_month(),
            number_retry_attempts: default_number_retry_attempts(),
            fields: VoucherFieldConfig::default(),
        }
    }
}

fn default_fiscal_year_start_month() -> u32 {
    4 // April
}

fn default_number_retry_attempts() -> u32 {
    3
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
            .add_source(environment())
            .build()?;

        Self::from_config(config)
    }

    /// Deserializes and checks an already built configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a value has the wrong type or is out of range.
    pub fn from_config(config: config::Config) -> Result<Self, config::ConfigError> {
        let loaded: Self = config.try_deserialize()?;
        if !(1..=12).contains(&loaded.vouchers.fiscal_year_start_month) {
            return Err(config::ConfigError::Message(format!(
                "vouchers.fiscal_year_start_month must be 1-12, got {}",
                loaded.vouchers.fiscal_year_start_month
            )));
        }
        Ok(loaded)
    }

    /// Returns the `host:port` address the server binds to.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix("VOUCHERBOOK").separator("__")
}
