//! Server → client messages.

use std::str::FromStr;

use serde_json::{Map, Value as Json};
use tracing::debug;

use crate::error::ProtocolError;
use crate::operation::RequestId;

type JsonMap = Map<String, Json>;

#[derive(Debug, Clone, PartialEq)]
pub enum ServerResponse {
    Connected,
    Redirect {
        url: String,
    },
    Subscribed {
        request_id: RequestId,
    },
    Unsubscribed {
        request_id: RequestId,
    },
    Enter {
        request_id: RequestId,
        object: JsonMap,
    },
    Leave {
        request_id: RequestId,
        object: JsonMap,
    },
    Update {
        request_id: RequestId,
        object: JsonMap,
    },
    Create {
        request_id: RequestId,
        object: JsonMap,
    },
    Delete {
        request_id: RequestId,
        object: JsonMap,
    },
    Error {
        request_id: Option<RequestId>,
        code: i64,
        error: String,
        reconnect: bool,
    },
}

fn field<'a>(json: &'a JsonMap, key: &'static str) -> Result<&'a Json, ProtocolError> {
    json.get(key)
        .ok_or(ProtocolError::InvalidJson { expected_key: key })
}

fn string_field(json: &JsonMap, key: &'static str) -> Result<String, ProtocolError> {
    field(json, key)?
        .as_str()
        .map(str::to_owned)
        .ok_or(ProtocolError::InvalidJson { expected_key: key })
}

fn request_id(json: &JsonMap) -> Result<RequestId, ProtocolError> {
    const KEY: &str = "requestId";
    field(json, KEY)?
        .as_u64()
        .and_then(|id| u32::try_from(id).ok())
        .map(RequestId)
        .ok_or(ProtocolError::InvalidJson { expected_key: KEY })
}

fn object_field(json: &JsonMap) -> Result<JsonMap, ProtocolError> {
    const KEY: &str = "object";
    field(json, KEY)?
        .as_object()
        .cloned()
        .ok_or(ProtocolError::InvalidJson { expected_key: KEY })
}

impl ServerResponse {
    pub fn from_json(json: &Json) -> Result<Self, ProtocolError> {
        let json = json
            .as_object()
            .ok_or(ProtocolError::InvalidJson { expected_key: "op" })?;
        let op = string_field(json, "op")?;
        match op.as_str() {
            "connected" => Ok(ServerResponse::Connected),
            "redirect" => Ok(ServerResponse::Redirect {
                url: string_field(json, "url")?,
            }),
            "subscribed" => Ok(ServerResponse::Subscribed {
                request_id: request_id(json)?,
            }),
            "unsubscribed" => Ok(ServerResponse::Unsubscribed {
                request_id: request_id(json)?,
            }),
            "enter" => Ok(ServerResponse::Enter {
                request_id: request_id(json)?,
                object: object_field(json)?,
            }),
            "leave" => Ok(ServerResponse::Leave {
                request_id: request_id(json)?,
                object: object_field(json)?,
            }),
            "update" => Ok(ServerResponse::Update {
                request_id: request_id(json)?,
                object: object_field(json)?,
            }),
            "create" => Ok(ServerResponse::Create {
                request_id: request_id(json)?,
                object: object_field(json)?,
            }),
            "delete" => Ok(ServerResponse::Delete {
                request_id: request_id(json)?,
                object: object_field(json)?,
            }),
            "error" => Ok(ServerResponse::Error {
                request_id: request_id(json).ok(),
                code: field(json, "code")?
                    .as_i64()
                    .ok_or(ProtocolError::InvalidJson {
                        expected_key: "code",
                    })?,
                error: string_field(json, "error")?,
                reconnect: field(json, "reconnect")?.as_bool().ok_or(
                    ProtocolError::InvalidJson {
                        expected_key: "reconnect",
                    },
                )?,
            }),
            other => {
                debug!(op = other, "unknown server op");
                Err(ProtocolError::InvalidJson { expected_key: "op" })
            }
        }
    }

    pub fn request_id(&self) -> Option<RequestId> {
        match self {
            ServerResponse::Connected | ServerResponse::Redirect { .. } => None,
            ServerResponse::Subscribed { request_id }
            | ServerResponse::Unsubscribed { request_id }
            | ServerResponse::Enter { request_id, .. }
            | ServerResponse::Leave { request_id, .. }
            | ServerResponse::Update { request_id, .. }
            | ServerResponse::Create { request_id, .. }
            | ServerResponse::Delete { request_id, .. } => Some(*request_id),
            ServerResponse::Error { request_id, .. } => *request_id,
        }
    }

    /// The server-reported failure carried by an `error` message.
    pub fn as_error(&self) -> Option<ProtocolError> {
        match self {
            ServerResponse::Error {
                code,
                error,
                reconnect,
                ..
            } => Some(ProtocolError::ServerReported {
                code: *code,
                message: error.clone(),
                reconnect: *reconnect,
            }),
            _ => None,
        }
    }
}

impl FromStr for ServerResponse {
    type Err = ProtocolError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let json: Json = serde_json::from_str(text)?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn response_matrix() {
        assert_eq!(
            ServerResponse::from_json(&json!({"op": "connected"})).unwrap(),
            ServerResponse::Connected
        );
        assert_eq!(
            ServerResponse::from_json(&json!({"op": "redirect", "url": "wss://x"})).unwrap(),
            ServerResponse::Redirect {
                url: "wss://x".into()
            }
        );
        assert_eq!(
            ServerResponse::from_json(&json!({"op": "subscribed", "requestId": 4})).unwrap(),
            ServerResponse::Subscribed {
                request_id: RequestId(4)
            }
        );
        assert_eq!(
            ServerResponse::from_json(&json!({"op": "unsubscribed", "requestId": 4}))
                .unwrap()
                .request_id(),
            Some(RequestId(4))
        );
        let update = ServerResponse::from_json(&json!({
            "op": "update", "requestId": 2, "object": {"className": "A", "objectId": "1"}
        }))
        .unwrap();
        assert!(matches!(update, ServerResponse::Update { request_id: RequestId(2), .. }));
    }

    #[test]
    fn error_response_without_request_id() {
        let response: ServerResponse =
            r#"{"op":"error","code":1,"error":"Invalid session","reconnect":false}"#
                .parse()
                .unwrap();
        assert_eq!(response.request_id(), None);
        assert!(matches!(
            response.as_error(),
            Some(ProtocolError::ServerReported {
                code: 1,
                reconnect: false,
                ..
            })
        ));
    }

    #[test]
    fn invalid_messages_name_the_key() {
        let cases = vec![
            (json!({}), "op"),
            (json!([1]), "op"),
            (json!({"op": "teleport"}), "op"),
            (json!({"op": "redirect"}), "url"),
            (json!({"op": "subscribed", "requestId": "4"}), "requestId"),
            (json!({"op": "subscribed", "requestId": -1}), "requestId"),
            (json!({"op": "enter", "requestId": 1, "object": []}), "object"),
            (json!({"op": "error", "code": 1, "error": "x"}), "reconnect"),
        ];
        for (json, key) in cases {
            match ServerResponse::from_json(&json) {
                Err(ProtocolError::InvalidJson { expected_key }) => {
                    assert_eq!(expected_key, key, "message {json}")
                }
                other => panic!("expected InvalidJson for {json}, got {other:?}"),
            }
        }
    }
}
