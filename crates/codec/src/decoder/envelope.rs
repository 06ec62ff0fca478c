//! Readers for envelope fields.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value as Json};

use super::error::DecodeError;
use crate::constants::{
    EnvelopeType, BASE64_KEY, CLASS_NAME_KEY, ISO_KEY, LATITUDE_KEY, LOCAL_ID_KEY, LONGITUDE_KEY,
    NAME_KEY, OBJECT_ID_KEY, URL_KEY,
};
use crate::value::{FileRef, GeoPoint, Pointer, Relation};

type JsonMap = Map<String, Json>;

pub(crate) fn required_str<'a>(
    map: &'a JsonMap,
    ty: EnvelopeType,
    field: &'static str,
) -> Result<&'a str, DecodeError> {
    optional_str(map, ty, field)?.ok_or(DecodeError::MissingField {
        envelope: ty.as_str(),
        field,
    })
}

/// Absent is fine; present but not a string is not.
pub(crate) fn optional_str<'a>(
    map: &'a JsonMap,
    ty: EnvelopeType,
    field: &'static str,
) -> Result<Option<&'a str>, DecodeError> {
    match map.get(field) {
        None => Ok(None),
        Some(Json::String(s)) => Ok(Some(s)),
        Some(_) => Err(DecodeError::InvalidField {
            envelope: ty.as_str(),
            field,
            expected: "string",
        }),
    }
}

fn required_f64(map: &JsonMap, ty: EnvelopeType, field: &'static str) -> Result<f64, DecodeError> {
    match map.get(field) {
        None => Err(DecodeError::MissingField {
            envelope: ty.as_str(),
            field,
        }),
        Some(value) => value.as_f64().ok_or(DecodeError::InvalidField {
            envelope: ty.as_str(),
            field,
            expected: "number",
        }),
    }
}

pub(crate) fn decode_pointer(map: &JsonMap) -> Result<Pointer, DecodeError> {
    let ty = EnvelopeType::Pointer;
    let class_name = required_str(map, ty, CLASS_NAME_KEY)?;
    if let Some(object_id) = optional_str(map, ty, OBJECT_ID_KEY)? {
        return Ok(Pointer::server(class_name, object_id));
    }
    match optional_str(map, ty, LOCAL_ID_KEY)? {
        Some(local_id) => Ok(Pointer::local(class_name, local_id)),
        None => Err(DecodeError::MissingField {
            envelope: ty.as_str(),
            field: OBJECT_ID_KEY,
        }),
    }
}

pub(crate) fn decode_date(map: &JsonMap) -> Result<DateTime<Utc>, DecodeError> {
    let iso = required_str(map, EnvelopeType::Date, ISO_KEY)?;
    DateTime::parse_from_rfc3339(iso)
        .map(|date| date.with_timezone(&Utc))
        .map_err(|source| DecodeError::InvalidDate {
            iso: iso.to_owned(),
            source,
        })
}

pub(crate) fn decode_bytes(map: &JsonMap) -> Result<Vec<u8>, DecodeError> {
    let encoded = required_str(map, EnvelopeType::Bytes, BASE64_KEY)?;
    Ok(STANDARD.decode(encoded)?)
}

pub(crate) fn decode_geo_point(map: &JsonMap) -> Result<GeoPoint, DecodeError> {
    let ty = EnvelopeType::GeoPoint;
    let latitude = required_f64(map, ty, LATITUDE_KEY)?;
    let longitude = required_f64(map, ty, LONGITUDE_KEY)?;
    Ok(GeoPoint::new(latitude, longitude)?)
}

pub(crate) fn decode_relation(map: &JsonMap) -> Result<Relation, DecodeError> {
    let class_name = required_str(map, EnvelopeType::Relation, CLASS_NAME_KEY)?;
    Ok(Relation::new(class_name))
}

pub(crate) fn decode_file(map: &JsonMap) -> Result<FileRef, DecodeError> {
    let ty = EnvelopeType::File;
    let name = required_str(map, ty, NAME_KEY)?;
    let url = required_str(map, ty, URL_KEY)?;
    Ok(FileRef::new(name, url))
}
