//! Error types for service client operations.
//!
//! Every failure an invocation can produce is collapsed into [`Error`], with
//! enough context (service, operation, HTTP status, correlation id) for a
//! caller to log and act on it without reaching into transport internals.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Longest error-body excerpt carried into an error message.
const BODY_EXCERPT_LIMIT: usize = 200;

/// Main error type for service client operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Client could not be constructed or configured
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Request could not be bound to an HTTP request; nothing was sent
    #[error("Cannot bind request for {operation}: {message}")]
    Binding {
        /// Operation that was being bound
        operation: &'static str,
        /// What went wrong
        message: String,
    },

    /// Connection-level failure talking to the service
    #[error("Transport failure in {service}.{operation}: {message}")]
    Transport {
        /// Service name
        service: &'static str,
        /// Operation name
        operation: &'static str,
        /// Underlying failure description
        message: String,
    },

    /// A single attempt exceeded the configured HTTP timeout
    #[error("Timeout in {service}.{operation}: {message}")]
    Timeout {
        /// Service name
        service: &'static str,
        /// Operation name
        operation: &'static str,
        /// Underlying failure description
        message: String,
    },

    /// The service answered with a non-2xx status
    #[error("{service}.{operation} returned {status}: {code}: {message}")]
    Service {
        /// Service name
        service: &'static str,
        /// Operation name
        operation: &'static str,
        /// HTTP status of the failing response
        status: StatusCode,
        /// Service error code from the response body
        code: String,
        /// Service error message from the response body
        message: String,
        /// Correlation id (`opc-request-id`) of the failing response
        opc_request_id: Option<String>,
        /// API reference link for the operation, when one is published
        reference: Option<&'static str>,
    },

    /// A 2xx response body could not be decoded into the expected type
    #[error("Failed to decode {service}.{operation} response: {message}")]
    ResponseDecode {
        /// Service name
        service: &'static str,
        /// Operation name
        operation: &'static str,
        /// Decode failure description
        message: String,
        /// Correlation id of the response that failed to decode
        opc_request_id: Option<String>,
    },

    /// The caller cancelled the invocation
    #[error("Operation {operation} cancelled")]
    Cancelled {
        /// Operation that was cancelled
        operation: &'static str,
    },

    /// The invocation deadline elapsed before a terminal outcome
    #[error("Deadline exceeded for operation {operation}")]
    DeadlineExceeded {
        /// Operation that ran out of time
        operation: &'static str,
    },

    /// The attempt ceiling was reached; wraps the final attempt's failure
    #[error("Retries exhausted after {attempts} attempts: {source}")]
    RetryExhausted {
        /// Total attempts performed
        attempts: u32,
        /// Error from the last attempt
        source: Box<Error>,
    },
}

/// Specialized result type for service client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Standard error payload returned by the service on non-2xx responses.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ServiceErrorPayload {
    /// Machine-readable error code (e.g. `NotAuthorizedOrNotFound`)
    pub code: Option<String>,
    /// Human-readable message
    pub message: Option<String>,
}

impl Error {
    /// Returns the stable code for this error kind.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Binding { .. } => "BINDING_ERROR",
            Self::Transport { .. } => "TRANSPORT_ERROR",
            Self::Timeout { .. } => "TIMEOUT",
            Self::Service { .. } => "SERVICE_ERROR",
            Self::ResponseDecode { .. } => "RESPONSE_DECODE_ERROR",
            Self::Cancelled { .. } => "CANCELLED",
            Self::DeadlineExceeded { .. } => "DEADLINE_EXCEEDED",
            Self::RetryExhausted { .. } => "RETRY_EXHAUSTED",
        }
    }

    /// Correlation id (`opc-request-id`) of the failing response, when the
    /// failure got far enough to receive one.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Self::Service { opc_request_id, .. } | Self::ResponseDecode { opc_request_id, .. } => {
                opc_request_id.as_deref()
            }
            Self::RetryExhausted { source, .. } => source.request_id(),
            _ => None,
        }
    }

    /// HTTP status of the failing response, for service-level failures.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Service { status, .. } => Some(*status),
            Self::RetryExhausted { source, .. } => source.status(),
            _ => None,
        }
    }

    /// Service error code parsed from the response body.
    #[must_use]
    pub fn service_code(&self) -> Option<&str> {
        match self {
            Self::Service { code, .. } => Some(code),
            Self::RetryExhausted { source, .. } => source.service_code(),
            _ => None,
        }
    }

    /// API reference link for the failing operation, when one is published.
    #[must_use]
    pub fn reference(&self) -> Option<&'static str> {
        match self {
            Self::Service { reference, .. } => *reference,
            Self::RetryExhausted { source, .. } => source.reference(),
            _ => None,
        }
    }

    /// Operation name attached to this error, when known.
    #[must_use]
    pub fn operation(&self) -> Option<&'static str> {
        match self {
            Self::Binding { operation, .. }
            | Self::Transport { operation, .. }
            | Self::Timeout { operation, .. }
            | Self::Service { operation, .. }
            | Self::ResponseDecode { operation, .. }
            | Self::Cancelled { operation }
            | Self::DeadlineExceeded { operation } => Some(operation),
            Self::RetryExhausted { source, .. } => source.operation(),
            Self::Configuration(_) => None,
        }
    }

    /// Returns true for failures where the service itself answered.
    #[must_use]
    pub const fn is_service_error(&self) -> bool {
        matches!(self, Self::Service { .. })
    }

    /// Build a binding failure for the given operation.
    #[must_use]
    pub fn binding(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Binding {
            operation,
            message: message.into(),
        }
    }

    /// Classify a transport-level failure, attaching operation context and
    /// the API reference hint when one exists.
    #[must_use]
    pub fn transport(
        service: &'static str,
        operation: &'static str,
        err: &reqwest::Error,
        reference: &'static str,
    ) -> Self {
        let mut message = err.to_string();
        if !reference.is_empty() {
            message.push_str(&format!(" (see {reference})"));
        }

        if err.is_timeout() {
            Self::Timeout {
                service,
                operation,
                message,
            }
        } else {
            Self::Transport {
                service,
                operation,
                message,
            }
        }
    }

    /// Build a service failure from a non-2xx response, parsing the standard
    /// error payload out of the body.
    ///
    /// A body that is not the standard payload yields code `BadErrorResponse`
    /// with an excerpt of the raw body, so the caller still sees what the
    /// service said.
    #[must_use]
    pub fn service_failure(
        service: &'static str,
        operation: &'static str,
        status: StatusCode,
        opc_request_id: Option<String>,
        body: &[u8],
        reference: &'static str,
    ) -> Self {
        let (code, message) = match serde_json::from_slice::<ServiceErrorPayload>(body) {
            Ok(payload) if payload.code.is_some() || payload.message.is_some() => (
                payload.code.unwrap_or_else(|| "UnknownError".to_string()),
                payload.message.unwrap_or_default(),
            ),
            _ => (
                "BadErrorResponse".to_string(),
                format!("unexpected error payload: {}", body_excerpt(body)),
            ),
        };

        Self::Service {
            service,
            operation,
            status,
            code,
            message,
            opc_request_id,
            reference: (!reference.is_empty()).then_some(reference),
        }
    }
}

fn body_excerpt(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let mut excerpt: String = text.chars().take(BODY_EXCERPT_LIMIT).collect();
    if text.chars().count() > BODY_EXCERPT_LIMIT {
        excerpt.push_str("...");
    }
    excerpt
}

// Conversions from external error types
impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::Configuration(format!("invalid URL: {err}"))
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Configuration(format!("invalid configuration: {err}"))
    }
}
