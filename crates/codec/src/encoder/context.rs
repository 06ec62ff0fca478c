//! Per-call traversal state.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value as Json;

use crate::value::{Record, RecordRef};

enum RecordState {
    InProgress,
    Done(Json),
}

/// Records seen during one top-level `encode` call, keyed by identity.
///
/// Handles are retained so an address cannot be reused by a different record
/// while the call is running.
#[derive(Default)]
pub(crate) struct EncodeContext {
    seen: HashMap<*const Record, (RecordRef, RecordState)>,
}

pub(crate) enum Visit {
    /// First visit; the caller must finish with [`EncodeContext::complete`].
    New,
    /// Reached again while its own fields are being encoded.
    Cycle,
    /// Already encoded earlier in this call.
    Done(Json),
}

impl EncodeContext {
    pub(crate) fn visit(&self, record: &RecordRef) -> Visit {
        match self.seen.get(&Arc::as_ptr(record)) {
            None => Visit::New,
            Some((_, RecordState::InProgress)) => Visit::Cycle,
            Some((_, RecordState::Done(json))) => Visit::Done(json.clone()),
        }
    }

    pub(crate) fn begin(&mut self, record: &RecordRef) {
        self.seen.insert(
            Arc::as_ptr(record),
            (record.clone(), RecordState::InProgress),
        );
    }

    pub(crate) fn complete(&mut self, record: &RecordRef, json: Json) {
        self.seen
            .insert(Arc::as_ptr(record), (record.clone(), RecordState::Done(json)));
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.seen.len()
    }
}
