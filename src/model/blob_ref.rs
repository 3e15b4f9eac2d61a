use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Reference to an uploaded blob, normalized to a single content id.
///
/// PDS responses and stored records describe a blob either as
/// `{"ref": {"$link": cid}}`, `{"ref": cid}`, the legacy `{"cid": cid}`, or a
/// bare `{"$link": cid}`. The shape the server handed out is kept verbatim so it
/// can be echoed back inside a pin record.
#[derive(Clone, Debug, PartialEq)]
pub struct BlobRef {
    pub content_id: String,
    pub mime_type: Option<String>,
    pub size: Option<u64>,
    raw: Value,
}

impl BlobRef {
    /// Canonical `$type: blob` shape for a freshly known content id.
    pub fn new(content_id: impl Into<String>, mime_type: &str, size: u64) -> Self {
        let content_id = content_id.into();
        let raw = serde_json::json!({
            "$type": "blob",
            "ref": { "$link": content_id },
            "mimeType": mime_type,
            "size": size,
        });
        Self {
            content_id,
            mime_type: Some(mime_type.to_string()),
            size: Some(size),
            raw,
        }
    }

    pub fn from_value(raw: Value) -> Option<Self> {
        let content_id = content_id_of(&raw)?;
        let mime_type = raw
            .get("mimeType")
            .and_then(Value::as_str)
            .map(str::to_string);
        let size = raw.get("size").and_then(Value::as_u64);
        Some(Self {
            content_id,
            mime_type,
            size,
            raw,
        })
    }
}

/// Extracts the content id from any accepted blob-reference shape.
pub fn content_id_of(value: &Value) -> Option<String> {
    let candidate = match value {
        Value::String(s) => Some(s.as_str()),
        Value::Object(obj) => match obj.get("ref") {
            Some(Value::Object(r)) => r.get("$link").and_then(Value::as_str),
            Some(Value::String(s)) => Some(s.as_str()),
            _ => None,
        }
        .or_else(|| obj.get("cid").and_then(Value::as_str))
        .or_else(|| obj.get("$link").and_then(Value::as_str)),
        _ => None,
    }?;

    let candidate = candidate.trim();
    if candidate.is_empty() {
        return None;
    }
    Some(candidate.to_string())
}

impl Serialize for BlobRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for BlobRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        BlobRef::from_value(raw)
            .ok_or_else(|| serde::de::Error::custom("blob reference without a content id"))
    }
}

#[cfg(test)]
#[path = "../tests/model/blob_ref_tests.rs"]
mod tests;
