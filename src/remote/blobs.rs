//! Blob upload, download and `com.atproto.sync.listBlobs`.

use super::http_client::{parse_json, send_error};
use super::*;

impl XrpcClient {
    pub fn list_blobs(&self, owner: &str, cursor: Option<&str>, limit: u32) -> Result<BlobPage> {
        const CALL: &str = "com.atproto.sync.listBlobs";
        let limit = limit.to_string();
        let mut query = vec![("did", owner), ("limit", limit.as_str())];
        if let Some(cursor) = cursor {
            query.push(("cursor", cursor));
        }

        with_retries(CALL, || {
            let resp = self
                .client
                .get(self.url(CALL))
                .header(reqwest::header::AUTHORIZATION, self.auth())
                .query(&query)
                .send()
                .map_err(send_error(CALL))?;
            parse_json::<BlobPage>(self.ensure_ok(resp, CALL)?, CALL)
        })
    }

    pub fn upload_blob(&self, bytes: Vec<u8>, mime_type: &str) -> Result<BlobRef> {
        const CALL: &str = "com.atproto.repo.uploadBlob";
        let resp = self
            .client
            .post(self.url(CALL))
            .header(reqwest::header::AUTHORIZATION, self.auth())
            .header(reqwest::header::CONTENT_TYPE, mime_type)
            .body(bytes)
            .send()
            .map_err(send_error(CALL))?;
        let uploaded: UploadBlobResponse = parse_json(self.ensure_ok(resp, CALL)?, CALL)?;
        BlobRef::from_value(uploaded.blob).ok_or_else(|| {
            PinsError::remote_status(CALL, 200, "response blob has no content reference")
        })
    }

    pub fn get_blob(&self, owner: &str, content_id: &str) -> Result<BlobContent> {
        const CALL: &str = "com.atproto.sync.getBlob";
        with_retries(CALL, || {
            let resp = self
                .client
                .get(self.url(CALL))
                .header(reqwest::header::AUTHORIZATION, self.auth())
                .query(&[("did", owner), ("cid", content_id)])
                .send()
                .map_err(send_error(CALL))?;
            let resp = self.ensure_ok(resp, CALL)?;
            let mime_type = content_type(resp.headers());
            let bytes = resp.bytes().map_err(send_error(CALL))?;
            Ok(BlobContent {
                bytes: bytes.to_vec(),
                mime_type,
            })
        })
    }

    /// HEAD on `getBlob`; only the response headers are read.
    pub fn probe_blob(&self, owner: &str, content_id: &str) -> Result<BlobMetadata> {
        const CALL: &str = "com.atproto.sync.getBlob";
        with_retries(CALL, || {
            let resp = self
                .client
                .head(self.url(CALL))
                .header(reqwest::header::AUTHORIZATION, self.auth())
                .query(&[("did", owner), ("cid", content_id)])
                .send()
                .map_err(send_error(CALL))?;
            let resp = self.ensure_ok(resp, CALL)?;
            // Read the header itself: the body of a HEAD response is empty.
            let size_bytes = resp
                .headers()
                .get(reqwest::header::CONTENT_LENGTH)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok());
            Ok(BlobMetadata {
                mime_type: content_type(resp.headers()),
                size_bytes,
            })
        })
    }
}

/// Media type without parameters, e.g. `text/plain` for `text/plain; charset=utf-8`.
fn content_type(headers: &reqwest::header::HeaderMap) -> Option<String> {
    headers
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_ascii_lowercase)
}

#[cfg(test)]
#[path = "../tests/remote/blobs_tests.rs"]
mod tests;
