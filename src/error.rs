/// Centralized error types for the panchang engine
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PanchangError {
    // Input Errors
    #[error("{field} {value} is outside the supported range {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    // Ephemeris Errors
    #[error("Computation failed: {0}")]
    Computation(String),

    // Lookup Errors
    #[error("Not found: {0}")]
    NotFound(String),

    // Configuration Errors
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, PanchangError>;

impl PanchangError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        PanchangError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    /// Check if the caller supplied bad input (as opposed to an internal failure)
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            PanchangError::OutOfRange { .. } | PanchangError::InvalidInput { .. }
        )
    }

    /// Internal failures are bugs, never expected for in-range input
    pub fn is_internal(&self) -> bool {
        matches!(self, PanchangError::Computation(_))
    }

    /// Get error code for logging/monitoring
    pub fn error_code(&self) -> &str {
        match self {
            PanchangError::OutOfRange { .. } => "RANGE_001",
            PanchangError::InvalidInput { .. } => "INPUT_001",
            PanchangError::Computation(_) => "EPH_001",
            PanchangError::NotFound(_) => "DATA_001",
            PanchangError::Config(_) => "CFG_001",
        }
    }
}

impl From<config::ConfigError> for PanchangError {
    fn from(err: config::ConfigError) -> Self {
        PanchangError::Config(err.to_string())
    }
}

impl From<toml::de::Error> for PanchangError {
    fn from(err: toml::de::Error) -> Self {
        PanchangError::Config(format!("Failed to parse festival rules: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_message_names_bound() {
        let err = PanchangError::OutOfRange {
            field: "year",
            value: 2101,
            min: 1900,
            max: 2100,
        };
        assert_eq!(err.to_string(), "year 2101 is outside the supported range 1900..=2100");
        assert!(err.is_user_error());
        assert_eq!(err.error_code(), "RANGE_001");
    }

    #[test]
    fn test_computation_is_internal() {
        let err = PanchangError::Computation("new moon search did not converge".to_string());
        assert!(err.is_internal());
        assert!(!err.is_user_error());
    }
}
