//! Writers for terminal envelopes.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Number, Value as Json};

use crate::constants::{
    EnvelopeType, BASE64_KEY, CLASS_NAME_KEY, ISO_KEY, LATITUDE_KEY, LOCAL_ID_KEY, LONGITUDE_KEY,
    NAME_KEY, OBJECT_ID_KEY, TYPE_KEY, URL_KEY,
};
use crate::value::{FileRef, GeoPoint, Pointer, PointerId, Relation};

pub(crate) fn envelope(ty: EnvelopeType) -> Map<String, Json> {
    let mut m = Map::new();
    m.insert(TYPE_KEY.into(), Json::String(ty.as_str().into()));
    m
}

/// Formats a date the way the wire expects: UTC with millisecond precision,
/// e.g. `2016-03-01T09:30:00.000Z`.
pub fn format_iso_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn pointer_envelope(pointer: &Pointer) -> Json {
    let mut m = envelope(EnvelopeType::Pointer);
    m.insert(
        CLASS_NAME_KEY.into(),
        Json::String(pointer.class_name.clone()),
    );
    match &pointer.id {
        PointerId::Server(id) => m.insert(OBJECT_ID_KEY.into(), Json::String(id.clone())),
        PointerId::Local(id) => m.insert(LOCAL_ID_KEY.into(), Json::String(id.clone())),
    };
    Json::Object(m)
}

pub(crate) fn date_envelope(date: &DateTime<Utc>) -> Json {
    let mut m = envelope(EnvelopeType::Date);
    m.insert(ISO_KEY.into(), Json::String(format_iso_date(date)));
    Json::Object(m)
}

pub(crate) fn bytes_envelope(bytes: &[u8]) -> Json {
    let mut m = envelope(EnvelopeType::Bytes);
    m.insert(BASE64_KEY.into(), Json::String(STANDARD.encode(bytes)));
    Json::Object(m)
}

/// Coordinates are range-checked on construction, so they are always finite.
pub fn geo_point_envelope(point: &GeoPoint) -> Json {
    let mut m = envelope(EnvelopeType::GeoPoint);
    m.insert(LATITUDE_KEY.into(), degrees(point.latitude()));
    m.insert(LONGITUDE_KEY.into(), degrees(point.longitude()));
    Json::Object(m)
}

fn degrees(value: f64) -> Json {
    Number::from_f64(value).map_or(Json::Null, Json::Number)
}

pub(crate) fn relation_envelope(relation: &Relation) -> Json {
    let mut m = envelope(EnvelopeType::Relation);
    m.insert(
        CLASS_NAME_KEY.into(),
        Json::String(relation.class_name.clone()),
    );
    Json::Object(m)
}

pub(crate) fn file_envelope(file: &FileRef) -> Json {
    let mut m = envelope(EnvelopeType::File);
    m.insert(NAME_KEY.into(), Json::String(file.name.clone()));
    m.insert(URL_KEY.into(), Json::String(file.url.clone()));
    Json::Object(m)
}
