//! Decoder behavior for the envelope vocabulary.

use chrono::{TimeZone, Utc};
use livequery_codec::{
    DecodeError, Decoder, Encoder, FileRef, GeoPoint, Pointer, Record, Relation, Value,
};
use serde_json::json;

#[test]
fn terminal_envelope_matrix() {
    let decoder = Decoder::new();
    let cases = vec![
        (
            json!({"__type": "Date", "iso": "2016-03-01T09:30:00.123Z"}),
            Value::Date(Utc.timestamp_millis_opt(1_456_824_600_123).unwrap()),
        ),
        (
            json!({"__type": "Bytes", "base64": "aGVsbG8="}),
            Value::Bytes(b"hello".to_vec()),
        ),
        (
            json!({"__type": "GeoPoint", "latitude": 10, "longitude": -20.5}),
            Value::GeoPoint(GeoPoint::new(10.0, -20.5).unwrap()),
        ),
        (
            json!({"__type": "Relation", "className": "Post"}),
            Value::Relation(Relation::new("Post")),
        ),
        (
            json!({"__type": "File", "name": "n.txt", "url": "https://f.example/n.txt"}),
            Value::File(FileRef::new("n.txt", "https://f.example/n.txt")),
        ),
        (
            json!({"__type": "Pointer", "className": "Note", "objectId": "abc"}),
            Value::Pointer(Pointer::server("Note", "abc")),
        ),
        (
            json!({"__type": "Pointer", "className": "Note", "localId": "local_1"}),
            Value::Pointer(Pointer::local("Note", "local_1")),
        ),
    ];
    for (wire, expected) in cases {
        assert_eq!(decoder.decode(&wire).unwrap(), expected, "wire {wire}");
    }
}

#[test]
fn generic_containers_decode_recursively() {
    let decoded = Decoder::new()
        .decode(&json!({
            "list": [1, {"at": {"__type": "Date", "iso": "2020-01-01T00:00:00.000Z"}}],
            "plain": {"k": null}
        }))
        .unwrap();
    assert_eq!(
        decoded,
        Value::object([
            (
                "list",
                Value::from(vec![
                    Value::from(1),
                    Value::object([(
                        "at",
                        Value::Date(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()),
                    )]),
                ]),
            ),
            ("plain", Value::object([("k", Value::Null)])),
        ])
    );
}

#[test]
fn future_envelope_type_is_plain_data() {
    let decoded = Decoder::new()
        .decode(&json!({"__type": "FutureThing", "x": [1, 2], "y": "z"}))
        .unwrap();
    let map = decoded.as_object().unwrap();
    assert_eq!(map.get("__type"), Some(&Value::from("FutureThing")));
    assert_eq!(
        map.get("x"),
        Some(&Value::from(vec![Value::from(1), Value::from(2)]))
    );
    assert_eq!(map.get("y"), Some(&Value::from("z")));
}

#[test]
fn record_embedded_at_depth_is_fully_decoded() {
    let decoded = Decoder::new()
        .decode(&json!([{
            "wrapper": {
                "__type": "Object",
                "className": "Message",
                "objectId": "m1",
                "author": {
                    "__type": "Object",
                    "className": "_User",
                    "objectId": "u1",
                    "name": "ann"
                }
            }
        }]))
        .unwrap();
    let message = decoded.as_array().unwrap()[0]
        .as_object()
        .unwrap()
        .get("wrapper")
        .and_then(Value::as_record)
        .cloned()
        .unwrap();
    let author = message.get("author").unwrap();
    let author = author.as_record().unwrap();
    assert_eq!(author.class_name(), "_User");
    assert_eq!(author.get("name"), Some(Value::from("ann")));
}

#[test]
fn same_identity_decodes_to_distinct_instances() {
    let envelope = json!({"__type": "Object", "className": "Room", "objectId": "r1"});
    let decoded = Decoder::new()
        .decode(&json!([envelope.clone(), envelope]))
        .unwrap();
    let items = decoded.as_array().unwrap();
    assert_ne!(items[0], items[1]);
    assert_eq!(
        items[0].as_record().unwrap().server_id(),
        items[1].as_record().unwrap().server_id()
    );
}

#[test]
fn malformed_known_envelopes_fail_fast() {
    let decoder = Decoder::new();
    let cases = vec![
        json!({"__type": "Date"}),
        json!({"__type": "Date", "iso": 12}),
        json!({"__type": "Date", "iso": "03/01/2016"}),
        json!({"__type": "Bytes", "base64": "%%%"}),
        json!({"__type": "GeoPoint", "latitude": 1}),
        json!({"__type": "GeoPoint", "latitude": 1, "longitude": 500}),
        json!({"__type": "Pointer", "className": "A"}),
        json!({"__type": "Pointer", "objectId": "1"}),
        json!({"__type": "Pointer", "className": "A", "objectId": 1}),
        json!({"__type": "Relation"}),
        json!({"__type": "File", "url": "u"}),
        json!({"__type": "Object", "className": "A", "objectId": false}),
    ];
    for wire in cases {
        assert!(decoder.decode(&wire).is_err(), "expected failure for {wire}");
    }
}

#[test]
fn malformed_nested_envelope_fails_whole_decode() {
    let err = Decoder::new()
        .decode(&json!({"ok": 1, "bad": [{"__type": "Relation"}]}))
        .unwrap_err();
    assert!(matches!(
        err,
        DecodeError::MissingField {
            envelope: "Relation",
            field: "className"
        }
    ));
}

#[test]
fn embedded_record_survives_encode_then_decode() {
    let room = Record::with_server_id("Room", "r1");
    room.set("name", "lobby");
    room.set("tags", Value::from(vec![Value::from("a"), Value::from("b")]));

    let wire = Encoder::embed_objects()
        .encode(&Value::Record(room))
        .unwrap();
    let decoded = Decoder::new().decode(&wire).unwrap();
    let record = decoded.as_record().unwrap();
    assert_eq!(record.class_name(), "Room");
    assert_eq!(record.server_id().as_deref(), Some("r1"));
    assert_eq!(record.get("name"), Some(Value::from("lobby")));
    assert_eq!(
        record.get("tags"),
        Some(Value::from(vec![Value::from("a"), Value::from("b")]))
    );
}
