//! Live-query message vocabulary.
//!
//! Builds the JSON messages a client sends ([`ClientOperation`]) and parses the
//! ones a server sends back ([`ServerResponse`]), using `livequery-codec` for
//! the values they carry. Moving the messages over a socket is left to the
//! caller.

mod error;
mod event;
mod operation;
mod query;
mod response;

pub use error::ProtocolError;
pub use event::{event_record, Event};
pub use operation::{ClientOperation, RequestId};
pub use query::Query;
pub use response::ServerResponse;
