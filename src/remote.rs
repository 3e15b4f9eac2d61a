use std::time::Duration;

use crate::error::{PinsError, Result};
use crate::model::{BlobRef, PinRecord};

mod http_client;
use self::http_client::with_retries;

mod types;
pub use self::types::*;
mod blobs;
mod records;

/// Operations the file manager needs from a Personal Data Server.
///
/// `XrpcClient` talks to a real PDS; tests substitute an in-memory repository.
pub trait RepoClient {
    fn list_records(
        &self,
        owner: &str,
        collection: &str,
        cursor: Option<&str>,
        limit: u32,
    ) -> Result<RecordPage>;

    fn get_record(&self, owner: &str, collection: &str, record_key: &str) -> Result<ListedRecord>;

    fn create_record(
        &self,
        owner: &str,
        collection: &str,
        record: &PinRecord,
    ) -> Result<CreatedRecord>;

    fn delete_record(&self, owner: &str, collection: &str, record_key: &str) -> Result<()>;

    fn list_blobs(&self, owner: &str, cursor: Option<&str>, limit: u32) -> Result<BlobPage>;

    fn upload_blob(&self, bytes: Vec<u8>, mime_type: &str) -> Result<BlobRef>;

    fn get_blob(&self, owner: &str, content_id: &str) -> Result<BlobContent>;

    /// Type and size of a blob without downloading it.
    fn probe_blob(&self, owner: &str, content_id: &str) -> Result<BlobMetadata>;
}

pub struct XrpcClient {
    pds_url: String,
    token: String,
    client: reqwest::blocking::Client,
}

impl XrpcClient {
    pub fn new(pds_url: &str, token: String, timeout: Duration) -> Result<Self> {
        if token.trim().is_empty() {
            return Err(PinsError::NotAuthenticated);
        }
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("atpins/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| PinsError::remote("build http client", e))?;
        Ok(Self {
            pds_url: pds_url.trim_end_matches('/').to_string(),
            token,
            client,
        })
    }

    pub fn pds_url(&self) -> &str {
        &self.pds_url
    }
}

impl RepoClient for XrpcClient {
    fn list_records(
        &self,
        owner: &str,
        collection: &str,
        cursor: Option<&str>,
        limit: u32,
    ) -> Result<RecordPage> {
        XrpcClient::list_records(self, owner, collection, cursor, limit)
    }

    fn get_record(&self, owner: &str, collection: &str, record_key: &str) -> Result<ListedRecord> {
        XrpcClient::get_record(self, owner, collection, record_key)
    }

    fn create_record(
        &self,
        owner: &str,
        collection: &str,
        record: &PinRecord,
    ) -> Result<CreatedRecord> {
        XrpcClient::create_record(self, owner, collection, record)
    }

    fn delete_record(&self, owner: &str, collection: &str, record_key: &str) -> Result<()> {
        XrpcClient::delete_record(self, owner, collection, record_key)
    }

    fn list_blobs(&self, owner: &str, cursor: Option<&str>, limit: u32) -> Result<BlobPage> {
        XrpcClient::list_blobs(self, owner, cursor, limit)
    }

    fn upload_blob(&self, bytes: Vec<u8>, mime_type: &str) -> Result<BlobRef> {
        XrpcClient::upload_blob(self, bytes, mime_type)
    }

    fn get_blob(&self, owner: &str, content_id: &str) -> Result<BlobContent> {
        XrpcClient::get_blob(self, owner, content_id)
    }

    fn probe_blob(&self, owner: &str, content_id: &str) -> Result<BlobMetadata> {
        XrpcClient::probe_blob(self, owner, content_id)
    }
}

impl<T: RepoClient + ?Sized> RepoClient for &T {
    fn list_records(
        &self,
        owner: &str,
        collection: &str,
        cursor: Option<&str>,
        limit: u32,
    ) -> Result<RecordPage> {
        (**self).list_records(owner, collection, cursor, limit)
    }

    fn get_record(&self, owner: &str, collection: &str, record_key: &str) -> Result<ListedRecord> {
        (**self).get_record(owner, collection, record_key)
    }

    fn create_record(
        &self,
        owner: &str,
        collection: &str,
        record: &PinRecord,
    ) -> Result<CreatedRecord> {
        (**self).create_record(owner, collection, record)
    }

    fn delete_record(&self, owner: &str, collection: &str, record_key: &str) -> Result<()> {
        (**self).delete_record(owner, collection, record_key)
    }

    fn list_blobs(&self, owner: &str, cursor: Option<&str>, limit: u32) -> Result<BlobPage> {
        (**self).list_blobs(owner, cursor, limit)
    }

    fn upload_blob(&self, bytes: Vec<u8>, mime_type: &str) -> Result<BlobRef> {
        (**self).upload_blob(bytes, mime_type)
    }

    fn get_blob(&self, owner: &str, content_id: &str) -> Result<BlobContent> {
        (**self).get_blob(owner, content_id)
    }

    fn probe_blob(&self, owner: &str, content_id: &str) -> Result<BlobMetadata> {
        (**self).probe_blob(owner, content_id)
    }
}
