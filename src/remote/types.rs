//! XRPC request and response bodies.

use crate::model::record_key_from_uri;

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct ListedRecord {
    pub uri: String,

    #[serde(default)]
    pub cid: Option<String>,

    // Kept untyped: records are user-controlled and may not match the schema.
    pub value: serde_json::Value,
}

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct RecordPage {
    #[serde(default)]
    pub records: Vec<ListedRecord>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct BlobPage {
    #[serde(default)]
    pub cids: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreatedRecord {
    pub uri: String,
    pub cid: String,
}

impl CreatedRecord {
    pub fn record_key(&self) -> Option<&str> {
        record_key_from_uri(&self.uri)
    }
}

#[derive(Debug, serde::Deserialize)]
pub(super) struct XrpcErrorBody {
    pub(super) error: String,

    #[serde(default)]
    pub(super) message: Option<String>,
}

#[derive(Debug, serde::Serialize)]
pub(super) struct CreateRecordRequest<'a, T: serde::Serialize> {
    pub(super) repo: &'a str,
    pub(super) collection: &'a str,
    pub(super) record: &'a T,
}

#[derive(Debug, serde::Serialize)]
pub(super) struct DeleteRecordRequest<'a> {
    pub(super) repo: &'a str,
    pub(super) collection: &'a str,
    pub(super) rkey: &'a str,
}

#[derive(Debug, serde::Deserialize)]
pub(super) struct UploadBlobResponse {
    pub(super) blob: serde_json::Value,
}

/// Bytes of one blob as served by `com.atproto.sync.getBlob`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlobContent {
    pub bytes: Vec<u8>,
    pub mime_type: Option<String>,
}

/// What the `getBlob` response headers say about a blob.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct BlobMetadata {
    pub mime_type: Option<String>,
    pub size_bytes: Option<u64>,
}
