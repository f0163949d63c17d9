//! Error types for storefront-cart.

use http::StatusCode;
use thiserror::Error;

/// Boxed error returned by storefront client implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for all cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The submitted form has no cart action field.
    #[error("Missing form input: no `{0}` field in form data")]
    MissingFormInput(&'static str),

    /// The cart action field is not a JSON object with an `action` property.
    #[error("Malformed form input: {0}")]
    MalformedFormInput(String),

    /// The inputs of a known action do not match that action's shape.
    #[error("Invalid inputs for action {action}: {source}")]
    InvalidInputs {
        /// Action whose inputs failed validation.
        action: String,
        /// Deserialization failure.
        #[source]
        source: serde_json::Error,
    },

    /// No handler is registered under the decoded action name.
    #[error("Unknown cart action: {0}")]
    UnknownAction(String),

    /// A mutation needs a cart id and none could be resolved.
    #[error("Missing cart id for action {0}")]
    MissingCartId(&'static str),

    /// A cart id or cookie attribute holds bytes a cookie cannot carry.
    #[error("Invalid cookie {field}: {value:?}")]
    InvalidCookieValue {
        /// Cookie part that was rejected.
        field: &'static str,
        /// Offending value.
        value: String,
    },

    /// JSON serialization/deserialization error outside form decoding.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A cart id cannot be written into a `Set-Cookie` header.
    #[error("Invalid header value: {0}")]
    InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),

    /// Transport or protocol failure reported by the storefront client.
    #[error("Storefront error: {0}")]
    Backend(#[source] BoxError),
}

impl CartError {
    /// Whether the failure was caused by the request rather than the backend.
    ///
    /// Client errors are never worth retrying.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CartError::MissingFormInput(_)
                | CartError::MalformedFormInput(_)
                | CartError::InvalidInputs { .. }
                | CartError::UnknownAction(_)
                | CartError::MissingCartId(_)
                | CartError::InvalidCookieValue { .. }
        )
    }

    /// Suggested HTTP status for an error response.
    pub fn status_code(&self) -> StatusCode {
        match self {
            e if e.is_client_error() => StatusCode::BAD_REQUEST,
            CartError::Backend(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Result type alias using CartError.
pub type Result<T> = std::result::Result<T, CartError>;
