//! Subscription query encoding.
//!
//! Query constraints are sent in the shape the live-query server expects:
//! dates as bare ISO strings, records as pointers that must already be saved.

use indexmap::IndexMap;
use livequery_codec::encoder::{format_iso_date, geo_point_envelope};
use livequery_codec::{Encoder, Value};
use serde_json::{json, Map, Value as Json};

use crate::error::ProtocolError;

#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    class_name: String,
    conditions: IndexMap<String, Value>,
}

impl Query {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            conditions: IndexMap::new(),
        }
    }

    /// Adds an equality condition on `key`, replacing any earlier one.
    pub fn equal_to(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.insert(key.into(), value.into());
        self
    }

    /// Adds an operator condition such as `$gt`. Operators on the same key
    /// accumulate; an earlier equality condition on the key is replaced.
    pub fn constraint(
        mut self,
        key: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        let entry = self
            .conditions
            .entry(key.into())
            .or_insert_with(|| Value::Object(IndexMap::new()));
        if !matches!(entry, Value::Object(_)) {
            *entry = Value::Object(IndexMap::new());
        }
        if let Value::Object(ops) = entry {
            ops.insert(operator.into(), value.into());
        }
        self
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn conditions(&self) -> &IndexMap<String, Value> {
        &self.conditions
    }

    /// `{"className": ..., "where": {...}}`.
    pub fn to_json(&self) -> Result<Json, ProtocolError> {
        let encoder = Encoder::pointer_only();
        Ok(json!({
            "className": self.class_name,
            "where": encode_conditions(&self.conditions, &encoder)?,
        }))
    }
}

fn encode_conditions(
    conditions: &IndexMap<String, Value>,
    encoder: &Encoder,
) -> Result<Json, ProtocolError> {
    let mut out = Map::new();
    for (key, value) in conditions {
        out.insert(key.clone(), encode_condition(value, encoder)?);
    }
    Ok(Json::Object(out))
}

fn encode_condition(value: &Value, encoder: &Encoder) -> Result<Json, ProtocolError> {
    match value {
        Value::Object(nested) => encode_conditions(nested, encoder),
        Value::GeoPoint(point) => Ok(geo_point_envelope(point)),
        Value::Date(date) => Ok(Json::String(format_iso_date(date))),
        other => Ok(encoder.encode(other)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use livequery_codec::{EncodeError, GeoPoint, Record};

    #[test]
    fn empty_query() {
        assert_eq!(
            Query::new("Message").to_json().unwrap(),
            json!({"className": "Message", "where": {}})
        );
    }

    #[test]
    fn conditions_matrix() {
        let room = Record::with_server_id("Room", "r1");
        let query = Query::new("Message")
            .equal_to("room", room)
            .equal_to("near", GeoPoint::new(1.5, 2.5).unwrap())
            .constraint(
                "createdAt",
                "$gt",
                Utc.with_ymd_and_hms(2016, 1, 1, 0, 0, 0).unwrap(),
            )
            .constraint("createdAt", "$lt", Utc.with_ymd_and_hms(2017, 1, 1, 0, 0, 0).unwrap())
            .equal_to("tags", Value::from(vec![Value::from("a")]));
        assert_eq!(
            query.to_json().unwrap(),
            json!({
                "className": "Message",
                "where": {
                    "room": {"__type": "Pointer", "className": "Room", "objectId": "r1"},
                    "near": {"__type": "GeoPoint", "latitude": 1.5, "longitude": 2.5},
                    "createdAt": {
                        "$gt": "2016-01-01T00:00:00.000Z",
                        "$lt": "2017-01-01T00:00:00.000Z"
                    },
                    "tags": ["a"]
                }
            })
        );
    }

    #[test]
    fn unsaved_record_condition_fails() {
        let query =
            Query::new("Message").equal_to("room", Record::with_local_id("Room", "local_r"));
        assert!(matches!(
            query.to_json(),
            Err(ProtocolError::Encode(EncodeError::UnsavedRecord { .. }))
        ));
    }

    #[test]
    fn constraint_replaces_equality() {
        let query = Query::new("Score")
            .equal_to("points", 10)
            .constraint("points", "$gte", 5);
        assert_eq!(
            query.conditions().get("points"),
            Some(&Value::object([("$gte", Value::from(5))]))
        );
    }
}
