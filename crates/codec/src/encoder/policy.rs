//! Record encoding policies.

use serde_json::Value as Json;

use super::envelope::pointer_envelope;
use super::error::EncodeError;
use crate::value::{Pointer, Record};

/// Decides how records and pointers are represented, and which are illegal.
///
/// Everything that is not a record or a pointer encodes the same way under
/// every policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EncodePolicy {
    /// Records and pointers fail with [`EncodeError::UnsupportedValue`].
    RejectRecords,
    /// Records become pointers by object id, or by local id when unsaved.
    #[default]
    PointerOrLocalId,
    /// Records become pointers by object id; unsaved records fail with
    /// [`EncodeError::UnsavedRecord`].
    PointerOnly,
    /// Records become full `Object` envelopes with their fields encoded under
    /// this same policy.
    EmbedObjects,
}

impl EncodePolicy {
    pub fn allows_records(self) -> bool {
        !matches!(self, EncodePolicy::RejectRecords)
    }

    /// Whether pointers produced under this policy must carry an object id.
    pub fn must_be_saved(self) -> bool {
        matches!(self, EncodePolicy::PointerOnly)
    }

    /// Encodes a pointer value found in the input graph.
    pub(crate) fn encode_pointer(self, pointer: &Pointer) -> Result<Json, EncodeError> {
        if !self.allows_records() {
            return Err(EncodeError::UnsupportedValue {
                kind: "pointer",
                class_name: pointer.class_name.clone(),
            });
        }
        checked_pointer(pointer, self.must_be_saved())
    }

    /// Encodes a record by reference. Not used for [`EncodePolicy::EmbedObjects`].
    pub(crate) fn encode_record_pointer(self, record: &Record) -> Result<Json, EncodeError> {
        if !self.allows_records() {
            return Err(EncodeError::UnsupportedValue {
                kind: "record",
                class_name: record.class_name().to_owned(),
            });
        }
        checked_pointer(&record.to_pointer(), self.must_be_saved())
    }
}

fn checked_pointer(pointer: &Pointer, must_be_saved: bool) -> Result<Json, EncodeError> {
    if must_be_saved {
        if let Some(local_id) = pointer.local_id() {
            return Err(EncodeError::UnsavedRecord {
                class_name: pointer.class_name.clone(),
                local_id: local_id.to_owned(),
            });
        }
    }
    Ok(pointer_envelope(pointer))
}
