//! Wire vocabulary shared by the encoder and decoder.

/// Discriminator key carried by every envelope.
pub const TYPE_KEY: &str = "__type";
pub const CLASS_NAME_KEY: &str = "className";
pub const OBJECT_ID_KEY: &str = "objectId";
pub const LOCAL_ID_KEY: &str = "localId";

pub(crate) const ISO_KEY: &str = "iso";
pub(crate) const BASE64_KEY: &str = "base64";
pub(crate) const LATITUDE_KEY: &str = "latitude";
pub(crate) const LONGITUDE_KEY: &str = "longitude";
pub(crate) const NAME_KEY: &str = "name";
pub(crate) const URL_KEY: &str = "url";

/// Nesting limit applied by default to both directions.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Envelope kinds recognised on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnvelopeType {
    Object,
    Pointer,
    Date,
    Bytes,
    GeoPoint,
    Relation,
    File,
}

impl EnvelopeType {
    pub fn as_str(self) -> &'static str {
        match self {
            EnvelopeType::Object => "Object",
            EnvelopeType::Pointer => "Pointer",
            EnvelopeType::Date => "Date",
            EnvelopeType::Bytes => "Bytes",
            EnvelopeType::GeoPoint => "GeoPoint",
            EnvelopeType::Relation => "Relation",
            EnvelopeType::File => "File",
        }
    }

    /// Returns `None` for discriminators this codec does not know.
    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "Object" => Some(EnvelopeType::Object),
            "Pointer" => Some(EnvelopeType::Pointer),
            "Date" => Some(EnvelopeType::Date),
            "Bytes" => Some(EnvelopeType::Bytes),
            "GeoPoint" => Some(EnvelopeType::GeoPoint),
            "Relation" => Some(EnvelopeType::Relation),
            "File" => Some(EnvelopeType::File),
            _ => None,
        }
    }
}
