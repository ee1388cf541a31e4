use serde_json::Value;
use thiserror::Error;

/// Error code the service returns when an access token is expired or revoked
pub const INVALID_GRANT: &str = "invalid_grant";

/// Main error type for TrackVia API operations
#[derive(Debug, Error)]
pub enum TrackViaError {
    /// Error payload returned by the service (a body with an `error` field)
    #[error("TrackVia API error: {error}{}", describe(.description))]
    Api {
        status: u16,
        error: String,
        description: Option<String>,
        body: Value,
    },

    /// Response with an empty body and no transport error
    #[error("empty response, status code {status}")]
    EmptyResponse { status: u16 },

    /// Non-2xx response whose body is not JSON
    #[error("HTTP error {status}: {body}")]
    Http {
        status: u16,
        body: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A required identifier was missing or blank
    #[error("`{endpoint}` endpoint requires `{parameter}`")]
    MissingParameter {
        endpoint: &'static str,
        parameter: &'static str,
    },

    /// An identifier that cannot be used as a single path segment
    #[error("`{endpoint}` endpoint got an invalid `{parameter}`: {value:?}")]
    InvalidParameter {
        endpoint: &'static str,
        parameter: &'static str,
        value: String,
    },

    /// Missing environment variable while loading credentials
    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),

    /// HTTP client could not be built
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client error
    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// URL parsing error
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl TrackViaError {
    /// Build an API error from a decoded body carrying an `error` field
    pub fn from_body(status: u16, body: Value) -> Self {
        let error = match body.get("error") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => "unknown error".to_string(),
        };
        let description = body
            .get("error_description")
            .and_then(Value::as_str)
            .map(str::to_string);

        TrackViaError::Api {
            status,
            error,
            description,
            body,
        }
    }

    /// Create a new HTTP error
    pub fn http(status: u16, body: String, source: Option<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        TrackViaError::Http { status, body, source }
    }

    /// Check if the service rejected the access token
    pub fn is_invalid_grant(&self) -> bool {
        matches!(self, TrackViaError::Api { error, .. } if error == INVALID_GRANT)
    }

    /// Check if a required argument was missing or unusable
    pub fn is_missing_parameter(&self) -> bool {
        matches!(
            self,
            TrackViaError::MissingParameter { .. } | TrackViaError::InvalidParameter { .. }
        )
    }

    /// Get the HTTP status code, when the error came from a response
    pub fn status_code(&self) -> Option<u16> {
        match self {
            TrackViaError::Api { status, .. }
            | TrackViaError::EmptyResponse { status }
            | TrackViaError::Http { status, .. } => Some(*status),
            TrackViaError::Reqwest(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

fn describe(description: &Option<String>) -> String {
    description
        .as_deref()
        .map(|d| format!(" ({d})"))
        .unwrap_or_default()
}

/// Result type for TrackVia operations
pub type Result<T> = std::result::Result<T, TrackViaError>;
