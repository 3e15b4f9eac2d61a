use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{content_id_of, record_key_from_uri};
use crate::error::{PinsError, Result};

/// One row of the unified file view.
///
/// Entries with a `record_key` are pinned (backed by a pin record). Entries
/// without one are orphan blobs whose descriptive fields are unknown.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub content_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub size_bytes: Option<u64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl FileEntry {
    pub fn orphan(content_id: impl Into<String>) -> Self {
        Self {
            content_id: content_id.into(),
            record_key: None,
            uri: None,
            mime_type: None,
            filename: None,
            size_bytes: None,
            created_at: None,
        }
    }

    /// Maps a listed pin record to a pinned entry, normalizing the blob
    /// reference into `content_id`.
    pub fn from_record(uri: &str, value: &Value) -> Result<Self> {
        let malformed = |reason: &str| PinsError::MalformedRecord {
            uri: uri.to_string(),
            reason: reason.to_string(),
        };

        let record_key = record_key_from_uri(uri).ok_or_else(|| malformed("no record key in uri"))?;
        let blob = value
            .get("blob")
            .ok_or_else(|| malformed("missing blob reference"))?;
        let content_id =
            content_id_of(blob).ok_or_else(|| malformed("unrecognized blob reference"))?;

        let text = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        Ok(Self {
            content_id,
            record_key: Some(record_key.to_string()),
            uri: Some(uri.to_string()),
            mime_type: text("mimeType"),
            filename: text("filename"),
            size_bytes: value.get("size").and_then(Value::as_u64),
            created_at: text("createdAt"),
        })
    }

    pub fn is_pinned(&self) -> bool {
        self.record_key.is_some()
    }

    /// Name to show when the entry has no filename.
    pub fn display_name(&self) -> &str {
        self.filename.as_deref().unwrap_or(&self.content_id)
    }
}
