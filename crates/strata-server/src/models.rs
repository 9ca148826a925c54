//! JSON wire types for the produce/consume API.
//!
//! Record values are opaque bytes, carried over the wire as base64 strings.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// A commit log record as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireRecord {
    /// The record value, base64-encoded in JSON.
    #[serde(with = "base64_bytes")]
    pub value: Bytes,

    /// The record's absolute offset. Assigned by the log; ignored on
    /// produce.
    #[serde(default)]
    pub offset: u64,
}

/// Body of `POST /produce`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProduceRequest {
    pub record: WireRecord,
}

/// Response of `POST /produce`: the offset assigned to the record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProduceResponse {
    pub offset: u64,
}

/// Response of `GET /consume/{offset}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsumeResponse {
    pub record: WireRecord,
}

/// Serde adapter encoding [`Bytes`] as a standard base64 string.
mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use bytes::Bytes;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Bytes, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&STANDARD.encode(value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Bytes, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded)
            .map(Bytes::from)
            .map_err(serde::de::Error::custom)
    }
}
