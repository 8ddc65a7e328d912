pub mod toml_config;

use crate::core::beacon::{DEFAULT_POLL_INTERVAL, DEFAULT_REQUEST_TIMEOUT};
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_TABLE_PATH: &str = "/etc/config/morse-code.csv";

pub const LOG_FORMATS: [&str; 2] = ["compact", "json"];

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "morse-beacon")]
#[command(about = "Morse code decoding service with an optional beacon poller")]
pub struct ServiceConfig {
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PORT", default_value = "8080")]
    pub port: u16,

    /// Beacon endpoint to poll; polling is disabled when unset
    #[arg(long, env = "BEACON_URL")]
    pub beacon_url: Option<String>,

    /// Symbol table CSV; a local file with the same name is used if missing
    #[arg(long, env = "MORSE_TABLE_PATH", default_value = DEFAULT_TABLE_PATH)]
    pub morse_table: String,

    #[arg(long, env = "BEACON_POLL_INTERVAL_SECS", default_value = "5")]
    pub poll_interval_secs: u64,

    #[arg(long, env = "BEACON_TIMEOUT_SECS", default_value = "10")]
    pub request_timeout_secs: u64,

    /// compact or json
    #[arg(long, env = "LOG_FORMAT", default_value = "compact")]
    pub log_format: String,

    /// Optional TOML file whose values override flags and environment
    #[arg(long, env = "MORSE_CONFIG")]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            beacon_url: None,
            morse_table: DEFAULT_TABLE_PATH.to_string(),
            poll_interval_secs: DEFAULT_POLL_INTERVAL.as_secs(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT.as_secs(),
            log_format: "compact".to_string(),
            config: None,
            verbose: false,
        }
    }
}

impl ServiceConfig {
    /// Applies the TOML file named by `config`, if any.
    pub fn resolve(self) -> Result<Self> {
        match self.config.clone() {
            Some(path) => {
                let file_config = toml_config::TomlConfig::from_file(&path)?;
                Ok(file_config.apply_to(self))
            }
            None => Ok(self),
        }
    }

    pub fn json_logs(&self) -> bool {
        self.log_format == "json"
    }
}

impl ConfigProvider for ServiceConfig {
    fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn beacon_url(&self) -> Option<&str> {
        self.beacon_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    fn morse_table_path(&self) -> &str {
        &self.morse_table
    }

    fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Validate for ServiceConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_positive_number("port", u64::from(self.port), 1)?;
        validation::validate_path("morse_table", &self.morse_table)?;

        if let Some(url) = ConfigProvider::beacon_url(self) {
            validation::validate_url("beacon_url", url)?;
        }

        validation::validate_positive_number("poll_interval_secs", self.poll_interval_secs, 1)?;
        validation::validate_range("request_timeout_secs", self.request_timeout_secs, 1, 300)?;
        validation::validate_one_of("log_format", &self.log_format, &LOG_FORMATS)?;

        Ok(())
    }
}
