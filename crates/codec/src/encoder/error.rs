//! Encoder error type.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// The active policy does not allow records or pointers at all.
    #[error("unsupported value: {kind} of class `{class_name}` is not allowed by this encoder")]
    UnsupportedValue {
        kind: &'static str,
        class_name: String,
    },
    /// The active policy needs a server id and the record has none.
    #[error("unsaved record: `{class_name}` ({local_id}) has no object id")]
    UnsavedRecord {
        class_name: String,
        local_id: String,
    },
    #[error("field `{field}` of `{class_name}` collides with a reserved envelope key")]
    ReservedField { class_name: String, field: String },
    /// A plain mapping whose `__type` would be read back as an envelope.
    #[error("plain object carries reserved envelope type `{type_name}`")]
    ReservedTypeTag { type_name: String },
    #[error("value nesting exceeds the maximum depth of {max_depth}")]
    DepthExceeded { max_depth: usize },
}
