//! Decoder error type.

use thiserror::Error;

use crate::value::GeoPointError;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("{envelope} envelope is missing required field `{field}`")]
    MissingField {
        envelope: &'static str,
        field: &'static str,
    },
    #[error("{envelope} envelope field `{field}` must be a {expected}")]
    InvalidField {
        envelope: &'static str,
        field: &'static str,
        expected: &'static str,
    },
    #[error("Date envelope carries `{iso}`, which is not an ISO-8601 timestamp")]
    InvalidDate {
        iso: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("Bytes envelope carries invalid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
    #[error("GeoPoint envelope is invalid: {0}")]
    InvalidGeoPoint(#[from] GeoPointError),
    #[error("payload nesting exceeds the maximum depth of {max_depth}")]
    DepthExceeded { max_depth: usize },
    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
