use crate::domain::model::PredictionError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BedtimeError {
    #[error("Prediction failed: {0}")]
    Prediction(#[from] PredictionError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Training error: {message}")]
    TrainingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Prediction,
    Io,
    Data,
    Configuration,
    Input,
    Training,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl BedtimeError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BedtimeError::Prediction(_) => ErrorCategory::Prediction,
            BedtimeError::IoError(_) => ErrorCategory::Io,
            BedtimeError::SerializationError(_)
            | BedtimeError::CsvError(_)
            | BedtimeError::TomlSerializeError(_) => ErrorCategory::Data,
            BedtimeError::TomlError(_)
            | BedtimeError::ConfigError { .. }
            | BedtimeError::ConfigValidationError { .. }
            | BedtimeError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            BedtimeError::ValidationError { .. } => ErrorCategory::Input,
            BedtimeError::TrainingError { .. } => ErrorCategory::Training,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Medium,
            ErrorCategory::Prediction
            | ErrorCategory::Data
            | ErrorCategory::Configuration
            | ErrorCategory::Training => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            BedtimeError::Prediction(_) => {
                "Sorry, there was a problem calculating your bedtime.".to_string()
            }
            BedtimeError::IoError(e) => format!("Could not read or write a file: {}", e),
            BedtimeError::SerializationError(e) => format!("Malformed JSON data: {}", e),
            BedtimeError::CsvError(e) => format!("Malformed training data: {}", e),
            BedtimeError::TomlError(e) => format!("Malformed TOML file: {}", e),
            BedtimeError::TomlSerializeError(e) => format!("Could not write TOML: {}", e),
            BedtimeError::ConfigError { message } => format!("Configuration problem: {}", message),
            BedtimeError::ConfigValidationError { field, message } => {
                format!("Configuration field '{}' is invalid: {}", field, message)
            }
            BedtimeError::InvalidConfigValueError { field, reason, .. } => {
                format!("'{}' is invalid: {}", field, reason)
            }
            BedtimeError::ValidationError { message } => format!("Invalid input: {}", message),
            BedtimeError::TrainingError { message } => format!("Model training failed: {}", message),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Prediction => "Check that the model file exists and matches the expected format",
            ErrorCategory::Io => "Check that the path exists and is readable",
            ErrorCategory::Data => "Check the file contents for typos or missing columns",
            ErrorCategory::Configuration => "Review the configuration file and command line flags",
            ErrorCategory::Input => {
                "Use sleep between 4 and 12 hours in 0.25 steps and 1 to 12 cups of coffee"
            }
            ErrorCategory::Training => "Provide at least four varied training rows",
        }
    }
}

pub type Result<T> = std::result::Result<T, BedtimeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prediction_error_maps_to_fixed_message() {
        let err: BedtimeError = PredictionError::ModelUnavailable {
            reason: "missing".to_string(),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::Prediction);
        assert_eq!(
            err.user_friendly_message(),
            "Sorry, there was a problem calculating your bedtime."
        );
    }

    #[test]
    fn test_severity_ordering() {
        let input = BedtimeError::ValidationError {
            message: "coffee".to_string(),
        };
        let io = BedtimeError::IoError(std::io::Error::new(std::io::ErrorKind::NotFound, "x"));
        assert_eq!(input.severity(), ErrorSeverity::Medium);
        assert_eq!(io.severity(), ErrorSeverity::Critical);
        assert!(input.severity() < io.severity());
    }
}
