//! Protocol error type.

use livequery_codec::{DecodeError, EncodeError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    /// A message lacked a key, or the key had the wrong type.
    #[error("invalid message: expected key `{expected_key}`")]
    InvalidJson { expected_key: &'static str },
    /// The server answered with an `error` message.
    #[error("server reported error {code}: {message}")]
    ServerReported {
        code: i64,
        message: String,
        reconnect: bool,
    },
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("message is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
