//! Shared domain records.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use indexmap::IndexMap;
use rand::Rng;

use super::{Pointer, Value};

/// Shared handle to a record. Equality of handles is identity.
pub type RecordRef = Arc<Record>;

/// An entity with a class, a local identity, an optional server identity and
/// a set of named fields.
///
/// Records are always handled through [`RecordRef`] so that graphs (including
/// cycles) can be assembled with [`Record::set`] after construction.
pub struct Record {
    class_name: String,
    local_id: String,
    server_id: RwLock<Option<String>>,
    fields: RwLock<IndexMap<String, Value>>,
}

fn generate_local_id() -> String {
    format!("local_{:016x}", rand::thread_rng().gen::<u64>())
}

impl Record {
    /// Creates an unsaved record with a freshly generated local id.
    pub fn new(class_name: impl Into<String>) -> RecordRef {
        Self::with_local_id(class_name, generate_local_id())
    }

    pub fn with_local_id(class_name: impl Into<String>, local_id: impl Into<String>) -> RecordRef {
        Arc::new(Self {
            class_name: class_name.into(),
            local_id: local_id.into(),
            server_id: RwLock::new(None),
            fields: RwLock::new(IndexMap::new()),
        })
    }

    /// Creates a record that is already known to the remote store.
    pub fn with_server_id(
        class_name: impl Into<String>,
        server_id: impl Into<String>,
    ) -> RecordRef {
        let record = Self::new(class_name);
        record.assign_server_id(server_id);
        record
    }

    /// Assembles a record from decoded parts. A local id is generated when the
    /// payload did not carry one.
    pub fn from_parts(
        class_name: impl Into<String>,
        local_id: Option<String>,
        server_id: Option<String>,
        fields: IndexMap<String, Value>,
    ) -> RecordRef {
        Arc::new(Self {
            class_name: class_name.into(),
            local_id: local_id.unwrap_or_else(generate_local_id),
            server_id: RwLock::new(server_id),
            fields: RwLock::new(fields),
        })
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn local_id(&self) -> &str {
        &self.local_id
    }

    pub fn server_id(&self) -> Option<String> {
        self.server_id
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_saved(&self) -> bool {
        self.server_id
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Records the server identity. A server id is never replaced once set;
    /// returns `false` when the record already had one.
    pub fn assign_server_id(&self, server_id: impl Into<String>) -> bool {
        let mut slot = self
            .server_id
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            return false;
        }
        *slot = Some(server_id.into());
        true
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.fields
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Sets a field, returning the previous value.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), value.into())
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        self.fields
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .shift_remove(key)
    }

    pub fn field_count(&self) -> usize {
        self.fields
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn field_names(&self) -> Vec<String> {
        self.fields
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    /// Runs `f` with a read view of the fields. `f` must not write to this
    /// record.
    pub fn with_fields<R>(&self, f: impl FnOnce(&IndexMap<String, Value>) -> R) -> R {
        let fields = self.fields.read().unwrap_or_else(PoisonError::into_inner);
        f(&fields)
    }

    /// Pointer using the server id when present, the local id otherwise.
    pub fn to_pointer(&self) -> Pointer {
        match self.server_id() {
            Some(id) => Pointer::server(&self.class_name, id),
            None => Pointer::local(&self.class_name, &self.local_id),
        }
    }
}

// Fields are omitted: records may reference themselves.
impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("class_name", &self.class_name)
            .field("local_id", &self.local_id)
            .field("server_id", &self.server_id())
            .field("fields", &self.field_names())
            .finish()
    }
}
