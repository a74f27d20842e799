use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("{0}")]
    ConfigurationError(String),

    #[error("{message}")]
    GenerationError { message: String, cause: String },

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::ConfigurationError(_) => "CONFIGURATION_ERROR",
            AppError::GenerationError { .. } => "GENERATION_ERROR",
            AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    pub fn generation(message: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        AppError::GenerationError {
            message: message.into(),
            cause: cause.to_string(),
        }
    }

    /// Maps a gateway failure into the engine taxonomy. A missing credential is a
    /// deployment problem and keeps its own message; everything else is reported
    /// with `generic_message` and the gateway error as cause.
    pub fn from_gateway(err: GatewayError, generic_message: &str) -> Self {
        if matches!(err, GatewayError::MissingCredential(_)) {
            return AppError::ConfigurationError(err.to_string());
        }
        AppError::generation(generic_message, err)
    }

    /// The underlying cause for generation failures, the display text otherwise.
    pub fn cause(&self) -> String {
        match self {
            AppError::GenerationError { cause, .. } => cause.clone(),
            other => other.to_string(),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Failures at the boundary to the external text generator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("{0} is missing")]
    MissingCredential(String),

    #[error("Model request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Model request failed: {message}")]
    Transport {
        status: Option<u16>,
        message: String,
    },

    #[error("Model request failed after {attempts} attempts: {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },
}

impl GatewayError {
    pub fn transport(status: Option<u16>, message: impl Into<String>) -> Self {
        GatewayError::Transport {
            status,
            message: message.into(),
        }
    }

    /// The message of the innermost failure, without the gateway prefix.
    pub fn detail(&self) -> String {
        match self {
            GatewayError::Transport { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::ValidationError("test".into()).error_code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(
            AppError::ConfigurationError("test".into()).error_code(),
            "CONFIGURATION_ERROR"
        );
        assert_eq!(
            AppError::generation("try later", "boom").error_code(),
            "GENERATION_ERROR"
        );
    }

    #[test]
    fn test_error_messages() {
        let err = AppError::ValidationError("count too high".into());
        assert_eq!(err.to_string(), "Validation error: count too high");

        let err = AppError::generation("Unable to generate quiz", "Question 2: duplicate options detected");
        assert_eq!(err.to_string(), "Unable to generate quiz");
        assert_eq!(err.cause(), "Question 2: duplicate options detected");
    }

    #[test]
    fn test_missing_credential_maps_verbatim() {
        let err = AppError::from_gateway(
            GatewayError::MissingCredential("GEMINI_API_KEY".into()),
            "Unable to generate quiz at this time. Please try again later.",
        );

        assert!(matches!(err, AppError::ConfigurationError(_)));
        assert_eq!(err.to_string(), "GEMINI_API_KEY is missing");
    }

    #[test]
    fn test_other_gateway_errors_are_wrapped() {
        let err = AppError::from_gateway(
            GatewayError::RetriesExhausted {
                attempts: 3,
                last_error: "503 Service Unavailable".into(),
            },
            "Unable to generate quiz at this time. Please try again later.",
        );

        assert_eq!(
            err.to_string(),
            "Unable to generate quiz at this time. Please try again later."
        );
        assert_eq!(
            err.cause(),
            "Model request failed after 3 attempts: 503 Service Unavailable"
        );
    }

    #[test]
    fn test_transport_detail() {
        let err = GatewayError::transport(Some(429), "quota exceeded");
        assert_eq!(err.to_string(), "Model request failed: quota exceeded");
        assert_eq!(err.detail(), "quota exceeded");
    }
}
