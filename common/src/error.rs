use actix_web::{HttpResponse, ResponseError};
use actix_web::http::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DeviceError>;

#[derive(Error, Debug)]
pub enum DeviceError {
    #[error("Decode error: {0}")]
    Decode(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Service locked: {0}")]
    ServiceLocked(String),
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DeviceError {
    /// Machine-readable error kind string exposed at the HTTP boundary.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Decode(_) => "Decode",
            Self::Validation(_) => "Validation",
            Self::ServiceLocked(_) => "ServiceLocked",
            Self::ServiceUnavailable(_) => "ServiceUnavailable",
            Self::Transport(_) => "Transport",
            Self::NotFound(_) => "NotFound",
            Self::Internal(_) => "Internal",
        }
    }
}

impl From<std::io::Error> for DeviceError {
    fn from(err: std::io::Error) -> Self {
        DeviceError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for DeviceError {
    fn from(err: serde_json::Error) -> Self {
        DeviceError::Decode(err.to_string())
    }
}

impl ResponseError for DeviceError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Decode(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::ServiceLocked(_) => StatusCode::LOCKED,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Transport(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "errorKind": self.kind(),
            "message": self.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locked_maps_to_423() {
        let err = DeviceError::ServiceLocked("service locked".to_string());
        assert_eq!(err.status_code(), StatusCode::LOCKED);
        assert_eq!(err.kind(), "ServiceLocked");
    }

    #[test]
    fn test_unavailable_maps_to_503() {
        let err = DeviceError::ServiceUnavailable("device discovery disabled".to_string());
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_serde_error_becomes_decode() {
        let err = serde_json::from_slice::<serde_json::Value>(b"not json").unwrap_err();
        let err: DeviceError = err.into();
        assert!(matches!(err, DeviceError::Decode(_)));
    }
}
