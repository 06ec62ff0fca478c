//! Subscription events built from server responses.

use indexmap::IndexMap;
use livequery_codec::{Decoder, Record, RecordRef, CLASS_NAME_KEY, OBJECT_ID_KEY, TYPE_KEY};
use serde_json::{Map, Value as Json};

use crate::error::ProtocolError;
use crate::operation::RequestId;
use crate::response::ServerResponse;

const USER_CLASS: &str = "_User";
const SESSION_TOKEN_KEY: &str = "sessionToken";

/// A change to the result set of a subscription.
#[derive(Debug, Clone)]
pub enum Event {
    /// An existing record started matching the query.
    Entered(RecordRef),
    /// A record stopped matching the query.
    Left(RecordRef),
    Created(RecordRef),
    Updated(RecordRef),
    Deleted(RecordRef),
}

impl Event {
    /// Builds the event carried by `response`, or `None` when the response is
    /// not a subscription event.
    pub fn from_response(
        response: &ServerResponse,
        decoder: &Decoder,
    ) -> Result<Option<(RequestId, Event)>, ProtocolError> {
        let (request_id, object, kind): (_, _, fn(RecordRef) -> Event) = match response {
            ServerResponse::Enter { request_id, object } => (request_id, object, Event::Entered),
            ServerResponse::Leave { request_id, object } => (request_id, object, Event::Left),
            ServerResponse::Create { request_id, object } => (request_id, object, Event::Created),
            ServerResponse::Update { request_id, object } => (request_id, object, Event::Updated),
            ServerResponse::Delete { request_id, object } => (request_id, object, Event::Deleted),
            _ => return Ok(None),
        };
        Ok(Some((*request_id, kind(event_record(object, decoder)?))))
    }

    pub fn record(&self) -> &RecordRef {
        match self {
            Event::Entered(record)
            | Event::Left(record)
            | Event::Created(record)
            | Event::Updated(record)
            | Event::Deleted(record) => record,
        }
    }
}

/// Event objects are flat: `className`, `objectId`, then one key per field.
/// A user's session token is never copied into the record.
pub fn event_record(
    object: &Map<String, Json>,
    decoder: &Decoder,
) -> Result<RecordRef, ProtocolError> {
    let class_name = object
        .get(CLASS_NAME_KEY)
        .and_then(Json::as_str)
        .ok_or(ProtocolError::InvalidJson {
            expected_key: CLASS_NAME_KEY,
        })?;
    let object_id = object
        .get(OBJECT_ID_KEY)
        .and_then(Json::as_str)
        .ok_or(ProtocolError::InvalidJson {
            expected_key: OBJECT_ID_KEY,
        })?;

    let mut fields = IndexMap::new();
    for (key, value) in object {
        let skip = match key.as_str() {
            CLASS_NAME_KEY | OBJECT_ID_KEY | TYPE_KEY => true,
            SESSION_TOKEN_KEY => class_name == USER_CLASS,
            _ => false,
        };
        if skip {
            continue;
        }
        fields.insert(key.clone(), decoder.decode(value)?);
    }
    Ok(Record::from_parts(
        class_name,
        None,
        Some(object_id.to_owned()),
        fields,
    ))
}
