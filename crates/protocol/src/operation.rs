//! Client → server operations.

use serde_json::{json, Value as Json};

use crate::error::ProtocolError;
use crate::query::Query;

/// Identifies one subscription on a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u32);

impl RequestId {
    pub fn value(self) -> u32 {
        self.0
    }

    pub fn next(self) -> Self {
        RequestId(self.0.wrapping_add(1))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClientOperation {
    Connect {
        application_id: String,
        session_token: String,
    },
    Subscribe {
        request_id: RequestId,
        query: Query,
    },
    Unsubscribe {
        request_id: RequestId,
    },
}

impl ClientOperation {
    pub fn op(&self) -> &'static str {
        match self {
            ClientOperation::Connect { .. } => "connect",
            ClientOperation::Subscribe { .. } => "subscribe",
            ClientOperation::Unsubscribe { .. } => "unsubscribe",
        }
    }

    /// Fails only when a subscribe query cannot be encoded.
    pub fn to_json(&self) -> Result<Json, ProtocolError> {
        Ok(match self {
            ClientOperation::Connect {
                application_id,
                session_token,
            } => json!({
                "op": self.op(),
                "applicationId": application_id,
                "sessionToken": session_token
            }),
            ClientOperation::Subscribe { request_id, query } => json!({
                "op": self.op(),
                "requestId": request_id.value(),
                "query": query.to_json()?
            }),
            ClientOperation::Unsubscribe { request_id } => json!({
                "op": self.op(),
                "requestId": request_id.value()
            }),
        })
    }

    pub fn to_json_string(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(&self.to_json()?)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use livequery_codec::Record;

    #[test]
    fn operation_matrix() {
        assert_eq!(
            ClientOperation::Connect {
                application_id: "app".into(),
                session_token: "r:token".into(),
            }
            .to_json()
            .unwrap(),
            json!({"op": "connect", "applicationId": "app", "sessionToken": "r:token"})
        );
        assert_eq!(
            ClientOperation::Subscribe {
                request_id: RequestId(3),
                query: Query::new("Message").equal_to("roomName", "lobby"),
            }
            .to_json()
            .unwrap(),
            json!({
                "op": "subscribe",
                "requestId": 3,
                "query": {"className": "Message", "where": {"roomName": "lobby"}}
            })
        );
        assert_eq!(
            ClientOperation::Unsubscribe {
                request_id: RequestId(3)
            }
            .to_json()
            .unwrap(),
            json!({"op": "unsubscribe", "requestId": 3})
        );
    }

    #[test]
    fn subscribe_with_unsaved_record_fails() {
        let op = ClientOperation::Subscribe {
            request_id: RequestId(1),
            query: Query::new("Message").equal_to("room", Record::new("Room")),
        };
        assert!(op.to_json_string().is_err());
    }

    #[test]
    fn request_id_wraps() {
        assert_eq!(RequestId(1).next(), RequestId(2));
        assert_eq!(RequestId(u32::MAX).next(), RequestId(0));
    }
}
