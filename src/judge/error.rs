use serde::Serialize;
use thiserror::Error;

/// Retry-relevant classification of a failed judge call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    /// The endpoint rejected the request itself; retrying cannot help.
    MalformedRequest,
    RateLimited,
    /// Any other API-side failure, including undecodable responses.
    Api,
    Authentication,
    Timeout,
    Connection,
    /// The service reported itself temporarily unavailable.
    Unavailable,
}

impl ErrorClass {
    pub fn is_retryable(self) -> bool {
        !matches!(self, ErrorClass::MalformedRequest)
    }

    /// Classifies a non-success HTTP status.
    pub fn from_status(status: u16) -> Self {
        match status {
            400 | 404 | 413 | 422 => ErrorClass::MalformedRequest,
            401 | 403 => ErrorClass::Authentication,
            429 => ErrorClass::RateLimited,
            503 => ErrorClass::Unavailable,
            _ => ErrorClass::Api,
        }
    }
}

#[derive(Debug, Error)]
pub enum JudgeError {
    #[error("malformed judge request (HTTP {status}): {message}")]
    MalformedRequest { status: u16, message: String },

    #[error("judge rate limit exceeded: {message}")]
    RateLimited { message: String },

    #[error("judge API error (HTTP {status:?}): {message}")]
    Api {
        status: Option<u16>,
        message: String,
    },

    #[error("judge authentication failed (HTTP {status}): {message}")]
    Authentication { status: u16, message: String },

    #[error("judge request timed out: {message}")]
    Timeout { message: String },

    #[error("judge connection failed: {message}")]
    Connection { message: String },

    #[error("judge service unavailable: {message}")]
    Unavailable { message: String },

    #[error("failed to build judge client: {reason}")]
    ClientBuild { reason: String },
}

impl JudgeError {
    pub fn class(&self) -> ErrorClass {
        match self {
            JudgeError::MalformedRequest { .. } | JudgeError::ClientBuild { .. } => {
                ErrorClass::MalformedRequest
            }
            JudgeError::RateLimited { .. } => ErrorClass::RateLimited,
            JudgeError::Api { .. } => ErrorClass::Api,
            JudgeError::Authentication { .. } => ErrorClass::Authentication,
            JudgeError::Timeout { .. } => ErrorClass::Timeout,
            JudgeError::Connection { .. } => ErrorClass::Connection,
            JudgeError::Unavailable { .. } => ErrorClass::Unavailable,
        }
    }

    /// Builds the error for a non-success HTTP response.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match ErrorClass::from_status(status) {
            ErrorClass::MalformedRequest => JudgeError::MalformedRequest { status, message },
            ErrorClass::Authentication => JudgeError::Authentication { status, message },
            ErrorClass::RateLimited => JudgeError::RateLimited { message },
            ErrorClass::Unavailable => JudgeError::Unavailable { message },
            _ => JudgeError::Api {
                status: Some(status),
                message,
            },
        }
    }

    /// Builds a representative error for `class` (used by scripted backends).
    pub fn for_class(class: ErrorClass, message: impl Into<String>) -> Self {
        let message = message.into();
        match class {
            ErrorClass::MalformedRequest => JudgeError::MalformedRequest {
                status: 400,
                message,
            },
            ErrorClass::RateLimited => JudgeError::RateLimited { message },
            ErrorClass::Api => JudgeError::Api {
                status: None,
                message,
            },
            ErrorClass::Authentication => JudgeError::Authentication {
                status: 401,
                message,
            },
            ErrorClass::Timeout => JudgeError::Timeout { message },
            ErrorClass::Connection => JudgeError::Connection { message },
            ErrorClass::Unavailable => JudgeError::Unavailable { message },
        }
    }
}

impl From<reqwest::Error> for JudgeError {
    fn from(err: reqwest::Error) -> Self {
        let message = err.to_string();
        if err.is_timeout() {
            JudgeError::Timeout { message }
        } else if err.is_connect() {
            JudgeError::Connection { message }
        } else if let Some(status) = err.status() {
            JudgeError::from_status(status.as_u16(), message)
        } else {
            JudgeError::Api {
                status: None,
                message,
            }
        }
    }
}
