use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlertError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API returned HTTP {status}: {body}")]
    ApiStatusError { status: u16, body: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid email address: {0}")]
    AddressError(#[from] lettre::address::AddressError),

    #[error("Failed to build email: {0}")]
    MessageError(#[from] lettre::error::Error),

    #[error("Mail delivery failed: {0}")]
    SmtpError(#[from] lettre::transport::smtp::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ('{value}'): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Storage,
    Delivery,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AlertError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AlertError::ApiError(_) | AlertError::ApiStatusError { .. } => ErrorCategory::Network,
            AlertError::CsvError(_)
            | AlertError::SerializationError(_)
            | AlertError::ProcessingError { .. } => ErrorCategory::Data,
            AlertError::IoError(_) => ErrorCategory::Storage,
            AlertError::MessageError(_) | AlertError::SmtpError(_) => ErrorCategory::Delivery,
            AlertError::AddressError(_)
            | AlertError::ConfigError { .. }
            | AlertError::MissingConfigError { .. }
            | AlertError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 下一次排程執行可能就會成功
            ErrorCategory::Network | ErrorCategory::Delivery => ErrorSeverity::Medium,
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Storage | ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            AlertError::ApiError(_) => {
                "Check network connectivity to api.sam.gov; the next scheduled run will retry"
            }
            AlertError::ApiStatusError { status, .. } if *status == 401 || *status == 403 => {
                "Verify SAM_API_KEY is valid and has not expired"
            }
            AlertError::ApiStatusError { status, .. } if *status == 429 => {
                "The SAM.gov rate limit was hit; wait for the quota to reset"
            }
            AlertError::ApiStatusError { .. } => "SAM.gov rejected the search; inspect the response body",
            AlertError::SerializationError(_) => {
                "The search API response shape changed; inspect the raw response"
            }
            AlertError::CsvError(_) => {
                "Check that the seen-record and export files are valid CSV"
            }
            AlertError::IoError(_) => "Check that the data directory exists and is writable",
            AlertError::SmtpError(_) => {
                "Verify the SMTP host, port and GMAIL_APP_PASSWORD; Gmail requires an app password"
            }
            AlertError::MessageError(_) | AlertError::AddressError(_) => {
                "Verify FROM_EMAIL and TO_EMAIL are well-formed addresses"
            }
            AlertError::ConfigError { .. }
            | AlertError::MissingConfigError { .. }
            | AlertError::InvalidConfigValueError { .. } => {
                "Review the command-line flags and environment variables"
            }
            AlertError::ProcessingError { .. } => "Re-run with --verbose for details",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not fetch opportunities: {}", self),
            ErrorCategory::Data => format!("Could not process opportunity data: {}", self),
            ErrorCategory::Storage => format!("Could not read or write alert files: {}", self),
            ErrorCategory::Delivery => format!("Could not send the alert email: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, AlertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_errors_are_retryable_network_failures() {
        let err = AlertError::ApiStatusError {
            status: 503,
            body: "unavailable".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Network);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_auth_status_gets_api_key_suggestion() {
        let err = AlertError::ApiStatusError {
            status: 403,
            body: String::new(),
        };
        assert!(err.recovery_suggestion().contains("SAM_API_KEY"));
    }

    #[test]
    fn test_config_errors_are_critical() {
        let err = AlertError::MissingConfigError {
            field: "app_password".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.exit_code(), 3);
        assert!(err.user_friendly_message().starts_with("Invalid configuration"));
    }

    #[test]
    fn test_malformed_response_is_data_error() {
        let err: AlertError = serde_json::from_str::<serde_json::Value>("{not json")
            .unwrap_err()
            .into();
        assert_eq!(err.category(), ErrorCategory::Data);
        assert_eq!(err.exit_code(), 1);
    }
}
