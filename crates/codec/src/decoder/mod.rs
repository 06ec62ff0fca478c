//! Wire JSON → domain value.
//!
//! The decoder accepts anything that matches the envelope vocabulary; it
//! applies no encoding policy. Objects carrying an unknown `__type` degrade to
//! plain objects so newer peers can extend the vocabulary without breaking
//! older ones. Known envelopes with malformed required fields fail.

mod envelope;
mod error;

use indexmap::IndexMap;
use serde_json::{Map, Value as Json};
use tracing::debug;

use crate::constants::{
    EnvelopeType, CLASS_NAME_KEY, DEFAULT_MAX_DEPTH, LOCAL_ID_KEY, OBJECT_ID_KEY, TYPE_KEY,
};
use crate::value::{Record, Value};

use envelope::{
    decode_bytes, decode_date, decode_file, decode_geo_point, decode_pointer, decode_relation,
    optional_str, required_str,
};

pub use error::DecodeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderOptions {
    pub max_depth: usize,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Converts wire JSON into [`Value`]s.
///
/// Decoded records are fresh instances; reconciling them with records already
/// held elsewhere is left to the caller.
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    options: DecoderOptions,
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: DecoderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DecoderOptions {
        &self.options
    }

    pub fn decode(&self, payload: &Json) -> Result<Value, DecodeError> {
        self.decode_value(payload, 0)
    }

    /// Parses JSON text, then decodes it.
    pub fn decode_str(&self, text: &str) -> Result<Value, DecodeError> {
        let payload: Json = serde_json::from_str(text)?;
        self.decode(&payload)
    }

    fn decode_value(&self, payload: &Json, depth: usize) -> Result<Value, DecodeError> {
        if depth > self.options.max_depth {
            return Err(DecodeError::DepthExceeded {
                max_depth: self.options.max_depth,
            });
        }
        match payload {
            Json::Null => Ok(Value::Null),
            Json::Bool(b) => Ok(Value::Bool(*b)),
            Json::Number(n) => Ok(Value::Number(n.clone())),
            Json::String(s) => Ok(Value::String(s.clone())),
            Json::Array(items) => items
                .iter()
                .map(|item| self.decode_value(item, depth + 1))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            Json::Object(map) => self.decode_map(map, depth),
        }
    }

    fn decode_map(&self, map: &Map<String, Json>, depth: usize) -> Result<Value, DecodeError> {
        let Some(type_name) = map.get(TYPE_KEY) else {
            return self.decode_plain(map, depth);
        };
        match type_name.as_str().and_then(EnvelopeType::parse_str) {
            Some(ty) => self.decode_envelope(ty, map, depth),
            None => {
                debug!(%type_name, "unknown envelope type, decoding as plain object");
                self.decode_plain(map, depth)
            }
        }
    }

    fn decode_plain(&self, map: &Map<String, Json>, depth: usize) -> Result<Value, DecodeError> {
        let mut out = IndexMap::with_capacity(map.len());
        for (key, item) in map {
            out.insert(key.clone(), self.decode_value(item, depth + 1)?);
        }
        Ok(Value::Object(out))
    }

    fn decode_envelope(
        &self,
        ty: EnvelopeType,
        map: &Map<String, Json>,
        depth: usize,
    ) -> Result<Value, DecodeError> {
        match ty {
            EnvelopeType::Object => self.decode_object(map, depth),
            EnvelopeType::Pointer => decode_pointer(map).map(Value::Pointer),
            EnvelopeType::Date => decode_date(map).map(Value::Date),
            EnvelopeType::Bytes => decode_bytes(map).map(Value::Bytes),
            EnvelopeType::GeoPoint => decode_geo_point(map).map(Value::GeoPoint),
            EnvelopeType::Relation => decode_relation(map).map(Value::Relation),
            EnvelopeType::File => decode_file(map).map(Value::File),
        }
    }

    /// Fields are fully decoded before the record is built.
    fn decode_object(&self, map: &Map<String, Json>, depth: usize) -> Result<Value, DecodeError> {
        let ty = EnvelopeType::Object;
        let class_name = required_str(map, ty, CLASS_NAME_KEY)?;
        let object_id = optional_str(map, ty, OBJECT_ID_KEY)?;
        let local_id = optional_str(map, ty, LOCAL_ID_KEY)?;

        let mut fields = IndexMap::new();
        for (key, item) in map {
            if matches!(
                key.as_str(),
                TYPE_KEY | CLASS_NAME_KEY | OBJECT_ID_KEY | LOCAL_ID_KEY
            ) {
                continue;
            }
            fields.insert(key.clone(), self.decode_value(item, depth + 1)?);
        }

        Ok(Value::Record(Record::from_parts(
            class_name,
            local_id.map(str::to_owned),
            object_id.map(str::to_owned),
            fields,
        )))
    }
}
