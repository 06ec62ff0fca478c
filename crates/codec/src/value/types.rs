//! Terminal value types that travel as envelopes.

use thiserror::Error;

/// Identifier carried by a [`Pointer`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PointerId {
    /// Identifier assigned by the remote store.
    Server(String),
    /// Client-side placeholder for a record that has not been saved yet.
    Local(String),
}

/// Non-owning link to a record by class name and identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pointer {
    pub class_name: String,
    pub id: PointerId,
}

impl Pointer {
    pub fn server(class_name: impl Into<String>, object_id: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            id: PointerId::Server(object_id.into()),
        }
    }

    pub fn local(class_name: impl Into<String>, local_id: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            id: PointerId::Local(local_id.into()),
        }
    }

    pub fn object_id(&self) -> Option<&str> {
        match &self.id {
            PointerId::Server(id) => Some(id),
            PointerId::Local(_) => None,
        }
    }

    pub fn local_id(&self) -> Option<&str> {
        match &self.id {
            PointerId::Local(id) => Some(id),
            PointerId::Server(_) => None,
        }
    }

    pub fn is_saved(&self) -> bool {
        matches!(self.id, PointerId::Server(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("geo point out of range: latitude {latitude}, longitude {longitude}")]
pub struct GeoPointError {
    pub latitude: f64,
    pub longitude: f64,
}

/// Geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

impl GeoPoint {
    /// Latitude must lie in `[-90, 90]` and longitude in `[-180, 180]`.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoPointError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoPointError {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Descriptor of a to-many relation. Members are not carried on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Relation {
    pub class_name: String,
}

impl Relation {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
        }
    }
}

/// Reference to a file hosted by the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileRef {
    pub name: String,
    pub url: String,
}

impl FileRef {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}
