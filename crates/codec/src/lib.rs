//! Wire codec for live-query record graphs.
//!
//! Converts an in-memory graph of [`Record`]s, [`Pointer`]s and plain data
//! into JSON built only from primitives, arrays and objects, and back. Values
//! that JSON cannot express natively travel as tagged envelopes: objects
//! carrying a `__type` discriminator (see [`EnvelopeType`]).
//!
//! - [`Encoder`] walks a [`Value`] graph under an [`EncodePolicy`] that decides
//!   whether records are rejected, reduced to pointers, or embedded.
//! - [`Decoder`] turns untrusted wire JSON back into [`Value`]s.
//!
//! Both are plain values with immutable options and can be shared across
//! threads; every call allocates its own traversal state.

mod constants;

pub mod decoder;
pub mod encoder;
pub mod value;

pub use constants::{
    EnvelopeType, CLASS_NAME_KEY, DEFAULT_MAX_DEPTH, LOCAL_ID_KEY, OBJECT_ID_KEY, TYPE_KEY,
};
pub use decoder::{DecodeError, Decoder, DecoderOptions};
pub use encoder::{EncodeError, EncodePolicy, Encoder, EncoderOptions};
pub use value::{
    FileRef, GeoPoint, GeoPointError, Pointer, PointerId, Record, RecordRef, Relation, Value,
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn note_pointer_example() {
        let note = Record::with_server_id("Note", "abc");
        note.set("title", "hi");

        let wire = Encoder::pointer_or_local_id()
            .encode(&Value::Record(note))
            .unwrap();
        assert_eq!(
            wire,
            json!({"__type": "Pointer", "className": "Note", "objectId": "abc"})
        );

        let decoded = Decoder::new().decode(&wire).unwrap();
        assert_eq!(
            decoded,
            Value::Pointer(Pointer::server("Note", "abc"))
        );
    }

    #[test]
    fn encoder_and_decoder_are_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Encoder>();
        assert_send_sync::<Decoder>();
        assert_send_sync::<Value>();
    }
}
