//! Domain value → wire JSON.

mod context;
mod envelope;
mod error;
mod policy;

use serde_json::{Map, Value as Json};
use tracing::{debug, trace};

use crate::constants::{
    EnvelopeType, CLASS_NAME_KEY, DEFAULT_MAX_DEPTH, LOCAL_ID_KEY, OBJECT_ID_KEY, TYPE_KEY,
};
use crate::value::{RecordRef, Value};

use context::{EncodeContext, Visit};
use envelope::{
    bytes_envelope, date_envelope, file_envelope, pointer_envelope, relation_envelope,
};

pub use envelope::{format_iso_date, geo_point_envelope};
pub use error::EncodeError;
pub use policy::EncodePolicy;

/// Keys an `Object` envelope uses for itself; record fields may not use them.
const RESERVED_FIELDS: [&str; 4] = [TYPE_KEY, CLASS_NAME_KEY, OBJECT_ID_KEY, LOCAL_ID_KEY];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderOptions {
    pub policy: EncodePolicy,
    pub max_depth: usize,
}

impl Default for EncoderOptions {
    fn default() -> Self {
        Self {
            policy: EncodePolicy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Converts [`Value`] graphs into wire JSON.
///
/// The encoder holds no per-call state: cycle and duplicate tracking lives in
/// a context created for each [`Encoder::encode`] call, so one instance can be
/// shared between threads.
#[derive(Debug, Clone, Default)]
pub struct Encoder {
    options: EncoderOptions,
}

impl Encoder {
    pub fn new(policy: EncodePolicy) -> Self {
        Self::with_options(EncoderOptions {
            policy,
            ..EncoderOptions::default()
        })
    }

    pub fn with_options(options: EncoderOptions) -> Self {
        Self { options }
    }

    /// Encoder for payloads that must not contain records or pointers.
    pub fn reject_records() -> Self {
        Self::new(EncodePolicy::RejectRecords)
    }

    pub fn pointer_or_local_id() -> Self {
        Self::new(EncodePolicy::PointerOrLocalId)
    }

    /// Encoder for values crossing to a peer that cannot resolve local ids.
    pub fn pointer_only() -> Self {
        Self::new(EncodePolicy::PointerOnly)
    }

    pub fn embed_objects() -> Self {
        Self::new(EncodePolicy::EmbedObjects)
    }

    pub fn policy(&self) -> EncodePolicy {
        self.options.policy
    }

    pub fn options(&self) -> &EncoderOptions {
        &self.options
    }

    /// Encodes `value`. Either the whole value encodes or nothing does.
    pub fn encode(&self, value: &Value) -> Result<Json, EncodeError> {
        let mut ctx = EncodeContext::default();
        self.encode_value(value, &mut ctx, 0)
    }

    /// Encodes `record` itself as a full `Object` envelope, whatever the
    /// policy. Records reached through its fields follow the policy.
    pub fn encode_record(&self, record: &RecordRef) -> Result<Json, EncodeError> {
        let mut ctx = EncodeContext::default();
        self.embed_record(record, &mut ctx, 0)
    }

    fn encode_value(
        &self,
        value: &Value,
        ctx: &mut EncodeContext,
        depth: usize,
    ) -> Result<Json, EncodeError> {
        if depth > self.options.max_depth {
            return Err(EncodeError::DepthExceeded {
                max_depth: self.options.max_depth,
            });
        }
        match value {
            Value::Null => Ok(Json::Null),
            Value::Bool(b) => Ok(Json::Bool(*b)),
            Value::Number(n) => Ok(Json::Number(n.clone())),
            Value::String(s) => Ok(Json::String(s.clone())),
            Value::Array(items) => items
                .iter()
                .map(|item| self.encode_value(item, ctx, depth + 1))
                .collect::<Result<Vec<_>, _>>()
                .map(Json::Array),
            Value::Object(map) => {
                if let Some(Value::String(tag)) = map.get(TYPE_KEY) {
                    if EnvelopeType::parse_str(tag).is_some() {
                        return Err(EncodeError::ReservedTypeTag {
                            type_name: tag.clone(),
                        });
                    }
                }
                let mut out = Map::new();
                for (key, item) in map {
                    out.insert(key.clone(), self.encode_value(item, ctx, depth + 1)?);
                }
                Ok(Json::Object(out))
            }
            Value::Record(record) => self.encode_record_value(record, ctx, depth),
            Value::Pointer(pointer) => self.options.policy.encode_pointer(pointer).inspect_err(
                |err| debug!(policy = ?self.options.policy, error = %err, "pointer rejected"),
            ),
            Value::Date(date) => Ok(date_envelope(date)),
            Value::Bytes(bytes) => Ok(bytes_envelope(bytes)),
            Value::GeoPoint(point) => Ok(geo_point_envelope(point)),
            Value::Relation(relation) => Ok(relation_envelope(relation)),
            Value::File(file) => Ok(file_envelope(file)),
        }
    }

    fn encode_record_value(
        &self,
        record: &RecordRef,
        ctx: &mut EncodeContext,
        depth: usize,
    ) -> Result<Json, EncodeError> {
        match ctx.visit(record) {
            Visit::Cycle => {
                trace!(
                    class_name = record.class_name(),
                    local_id = record.local_id(),
                    "cycle reached, substituting pointer"
                );
                return Ok(pointer_envelope(&record.to_pointer()));
            }
            Visit::Done(json) => {
                trace!(
                    class_name = record.class_name(),
                    local_id = record.local_id(),
                    "record already encoded, substituting cached form"
                );
                return Ok(json);
            }
            Visit::New => {}
        }

        if self.options.policy == EncodePolicy::EmbedObjects {
            return self.embed_record(record, ctx, depth);
        }
        let json = self
            .options
            .policy
            .encode_record_pointer(record)
            .inspect_err(
                |err| debug!(policy = ?self.options.policy, error = %err, "record rejected"),
            )?;
        ctx.complete(record, json.clone());
        Ok(json)
    }

    fn embed_record(
        &self,
        record: &RecordRef,
        ctx: &mut EncodeContext,
        depth: usize,
    ) -> Result<Json, EncodeError> {
        ctx.begin(record);
        let json = self.object_envelope(record, ctx, depth)?;
        // Later visits in this call refer back to the embedded copy.
        ctx.complete(record, pointer_envelope(&record.to_pointer()));
        Ok(json)
    }

    fn object_envelope(
        &self,
        record: &RecordRef,
        ctx: &mut EncodeContext,
        depth: usize,
    ) -> Result<Json, EncodeError> {
        let mut out = envelope::envelope(EnvelopeType::Object);
        out.insert(
            CLASS_NAME_KEY.into(),
            Json::String(record.class_name().to_owned()),
        );
        match record.server_id() {
            Some(id) => out.insert(OBJECT_ID_KEY.into(), Json::String(id)),
            None => out.insert(
                LOCAL_ID_KEY.into(),
                Json::String(record.local_id().to_owned()),
            ),
        };
        record.with_fields(|fields| {
            for (key, item) in fields {
                if RESERVED_FIELDS.contains(&key.as_str()) {
                    return Err(EncodeError::ReservedField {
                        class_name: record.class_name().to_owned(),
                        field: key.clone(),
                    });
                }
                out.insert(key.clone(), self.encode_value(item, ctx, depth + 1)?);
            }
            Ok(())
        })?;
        Ok(Json::Object(out))
    }
}
