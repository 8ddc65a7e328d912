use crate::config::ServiceConfig;
use crate::utils::error::{MorseError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File form of [`ServiceConfig`]. Every key is optional; present keys
/// override the values from flags and environment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub server: Option<ServerSection>,
    pub beacon: Option<BeaconSection>,
    pub symbols: Option<SymbolsSection>,
    pub logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BeaconSection {
    pub url: Option<String>,
    pub poll_interval_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SymbolsSection {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingSection {
    pub format: Option<String>,
    pub verbose: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(MorseError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| MorseError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${BEACON_URL})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| MorseError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn apply_to(&self, mut config: ServiceConfig) -> ServiceConfig {
        if let Some(server) = &self.server {
            if let Some(host) = &server.host {
                config.host = host.clone();
            }
            if let Some(port) = server.port {
                config.port = port;
            }
        }

        if let Some(beacon) = &self.beacon {
            if let Some(url) = &beacon.url {
                config.beacon_url = Some(url.clone());
            }
            if let Some(interval) = beacon.poll_interval_secs {
                config.poll_interval_secs = interval;
            }
            if let Some(timeout) = beacon.request_timeout_secs {
                config.request_timeout_secs = timeout;
            }
        }

        if let Some(path) = self.symbols.as_ref().and_then(|s| s.path.as_ref()) {
            config.morse_table = path.clone();
        }

        if let Some(logging) = &self.logging {
            if let Some(format) = &logging.format {
                config.log_format = format.clone();
            }
            if let Some(verbose) = logging.verbose {
                config.verbose = verbose;
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ConfigProvider;
    use crate::utils::validation::Validate;
    use std::io::Write;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[server]
host = "127.0.0.1"
port = 9000

[beacon]
url = "http://beacon:8000/message"
poll_interval_secs = 3
request_timeout_secs = 4

[symbols]
path = "./tables/morse-code.csv"

[logging]
format = "json"
verbose = true
"#;

        let file_config = TomlConfig::from_toml_str(toml_content).unwrap();
        let config = file_config.apply_to(ServiceConfig::default());

        assert_eq!(config.bind_address(), "127.0.0.1:9000");
        assert_eq!(config.beacon_url(), Some("http://beacon:8000/message"));
        assert_eq!(config.poll_interval(), Duration::from_secs(3));
        assert_eq!(config.request_timeout(), Duration::from_secs(4));
        assert_eq!(config.morse_table_path(), "./tables/morse-code.csv");
        assert!(config.json_logs());
        assert!(config.verbose);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_other_values() {
        let file_config = TomlConfig::from_toml_str("[server]\nport = 7000\n").unwrap();
        let base = ServiceConfig {
            beacon_url: Some("http://keep.me/".to_string()),
            ..ServiceConfig::default()
        };

        let config = file_config.apply_to(base);

        assert_eq!(config.port, 7000);
        assert_eq!(config.beacon_url.as_deref(), Some("http://keep.me/"));
        assert_eq!(config.poll_interval_secs, 5);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("MORSE_TEST_BEACON_URL", "https://beacon.example.com/msg");

        let toml_content = r#"
[beacon]
url = "${MORSE_TEST_BEACON_URL}"
"#;

        let file_config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            file_config.beacon.unwrap().url.as_deref(),
            Some("https://beacon.example.com/msg")
        );

        std::env::remove_var("MORSE_TEST_BEACON_URL");
    }

    #[test]
    fn test_unset_env_var_is_left_in_place() {
        let toml_content = r#"
[symbols]
path = "${MORSE_TEST_DEFINITELY_UNSET}/morse-code.csv"
"#;
        let file_config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            file_config.symbols.unwrap().path.as_deref(),
            Some("${MORSE_TEST_DEFINITELY_UNSET}/morse-code.csv")
        );
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let result = TomlConfig::from_toml_str("[server\nport = ");
        assert!(matches!(
            result,
            Err(MorseError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_config_from_file_via_resolve() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[beacon]\nurl = \"http://127.0.0.1:1/beacon\"\n")
            .unwrap();

        let config = ServiceConfig {
            config: Some(temp_file.path().to_str().unwrap().to_string()),
            ..ServiceConfig::default()
        }
        .resolve()
        .unwrap();

        assert_eq!(config.beacon_url(), Some("http://127.0.0.1:1/beacon"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            TomlConfig::from_file("/no/such/morse-beacon.toml"),
            Err(MorseError::IoError(_))
        ));
    }
}
