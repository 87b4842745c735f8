use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShippingError {
    #[error("{message}")]
    ValidationError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("{message}")]
    UpstreamError { message: String },

    #[error("Rate request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("{message}")]
    NoRatesError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Configuration,
    Upstream,
    NoRates,
    Internal,
}

impl ShippingError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::UpstreamError {
            message: message.into(),
        }
    }

    pub fn no_rates(message: impl Into<String>) -> Self {
        Self::NoRatesError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ValidationError { .. } => ErrorCategory::Validation,
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            Self::UpstreamError { .. } | Self::ApiError(_) => ErrorCategory::Upstream,
            Self::NoRatesError { .. } => ErrorCategory::NoRates,
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::Internal,
        }
    }

    /// Whether the caller can fix the failure by changing the request
    /// (address or cart), as opposed to an operator-side problem.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Validation | ErrorCategory::Upstream | ErrorCategory::NoRates
        )
    }

    /// Message safe to hand back to a shopper. Operator-side details stay in the logs.
    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => "Shipping calculation is not configured".to_string(),
            ErrorCategory::Internal => "Failed to calculate shipping".to_string(),
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ShippingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert_eq!(
            ShippingError::validation("missing items").category(),
            ErrorCategory::Validation
        );
        assert_eq!(
            ShippingError::MissingConfigError {
                field: "SHIPPO_API_KEY".to_string()
            }
            .category(),
            ErrorCategory::Configuration
        );
        assert_eq!(
            ShippingError::upstream("bad address").category(),
            ErrorCategory::Upstream
        );
        assert_eq!(
            ShippingError::no_rates("none").category(),
            ErrorCategory::NoRates
        );
    }

    #[test]
    fn test_client_errors() {
        assert!(ShippingError::validation("x").is_client_error());
        assert!(ShippingError::upstream("x").is_client_error());
        assert!(ShippingError::no_rates("x").is_client_error());
        assert!(!ShippingError::config("x").is_client_error());
    }

    #[test]
    fn test_user_friendly_message_hides_configuration_details() {
        let err = ShippingError::config("SHIPPO_API_KEY is not set");
        assert_eq!(
            err.user_friendly_message(),
            "Shipping calculation is not configured"
        );

        let err = ShippingError::upstream("Address not found");
        assert_eq!(err.user_friendly_message(), "Address not found");
    }
}
