use thiserror::Error;

#[derive(Error, Debug)]
pub enum MorseError {
    #[error("Beacon request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Beacon returned HTTP status {status}")]
    BeaconStatus { status: u16 },

    #[error("Missing message in request body")]
    MissingMessage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Configuration,
    Client,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl MorseError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            MorseError::ApiError(_) | MorseError::BeaconStatus { .. } => ErrorCategory::Network,
            MorseError::CsvError(_)
            | MorseError::SerializationError(_)
            | MorseError::ProcessingError { .. } => ErrorCategory::Data,
            MorseError::ConfigError { .. }
            | MorseError::InvalidConfigValueError { .. }
            | MorseError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            MorseError::MissingMessage => ErrorCategory::Client,
            MorseError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Client => ErrorSeverity::Low,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// HTTP status used when the error reaches a client.
    pub fn status_code(&self) -> u16 {
        match self {
            MorseError::MissingMessage => 400,
            _ => 500,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check that the beacon URL is reachable and returns JSON",
            ErrorCategory::Data => "Check the symbol table CSV and the request payload format",
            ErrorCategory::Configuration => {
                "Review the command-line flags, environment variables or TOML config file"
            }
            ErrorCategory::Client => "Send a JSON body such as {\"message\": \"... --- ...\"}",
            ErrorCategory::System => "Check file permissions and available system resources",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not reach the beacon: {}", self),
            ErrorCategory::Data => format!("Could not process data: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Client => self.to_string(),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, MorseError>;
