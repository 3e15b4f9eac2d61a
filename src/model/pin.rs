use serde::{Deserialize, Serialize};

use super::BlobRef;

/// Collection holding pin records.
pub const COLLECTION: &str = "com.fusionstrings.pins";

/// Pin record as written by `createRecord`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PinRecord {
    #[serde(rename = "$type")]
    pub record_type: String,

    pub blob: BlobRef,

    #[serde(rename = "mimeType")]
    pub mime_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl PinRecord {
    pub fn new(
        blob: BlobRef,
        mime_type: &str,
        filename: Option<String>,
        size: Option<u64>,
        created_at: String,
    ) -> Self {
        let mime_type = if mime_type.trim().is_empty() {
            "application/octet-stream".to_string()
        } else {
            mime_type.to_string()
        };
        Self {
            record_type: COLLECTION.to_string(),
            blob,
            mime_type,
            filename: filename.filter(|f| !f.is_empty()),
            size: size.filter(|s| *s > 0),
            created_at,
        }
    }
}

/// The record key is the trailing path segment of an `at://` record URI.
pub fn record_key_from_uri(uri: &str) -> Option<&str> {
    uri.rsplit('/').next().filter(|k| !k.is_empty() && !k.contains(':'))
}

pub fn now_rfc3339() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}
