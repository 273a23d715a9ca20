use ger_json::CodecError;
use thiserror::Error;

/// Errors surfaced to callers of the client library.
#[derive(Debug, Error)]
pub enum GerError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected HTTP response code {0}")]
    UnexpectedHttpResponse(u16),

    /// Gerrit prepends `)]}'` to JSON responses; a body without it is not a
    /// Gerrit JSON endpoint.
    #[error("response is not Gerrit JSON: missing magic prefix")]
    NotJsonResponse,

    #[error("JSON parsing failed: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("failed to decode server response: {0}")]
    Codec(#[from] CodecError),

    #[error("{entity} is missing required field {field:?}")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },

    #[error("malformed timestamp {0:?}")]
    BadTimestamp(String),

    #[error("expected a JSON array of changes")]
    UnexpectedResponseShape,
}
