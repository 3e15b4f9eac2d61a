use super::*;

#[derive(Clone, Debug)]
pub(super) struct StoredRecord {
    pub(super) cid: String,
    pub(super) value: serde_json::Value,
}

#[derive(Debug)]
pub(super) struct StoredBlob {
    pub(super) mime_type: String,
    pub(super) size: u64,
    pub(super) bytes: Bytes,
}

/// One repository: records per collection keyed by rkey, blobs in upload order.
#[derive(Debug, Default)]
pub(super) struct Repo {
    collections: HashMap<String, BTreeMap<String, StoredRecord>>,
    blob_order: Vec<String>,
    blobs: HashMap<String, StoredBlob>,
    next_seq: u64,
}

pub(super) struct Page<T> {
    pub(super) items: Vec<T>,
    pub(super) cursor: Option<String>,
}

pub(super) fn content_id(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

impl Repo {
    // Zero padding keeps lexical order equal to creation order.
    fn next_rkey(&mut self) -> String {
        self.next_seq += 1;
        format!("{:013}", self.next_seq)
    }

    pub(super) fn put_blob(&mut self, bytes: &[u8], mime_type: &str) -> serde_json::Value {
        let cid = content_id(bytes);
        if !self.blobs.contains_key(&cid) {
            self.blob_order.push(cid.clone());
            self.blobs.insert(
                cid.clone(),
                StoredBlob {
                    mime_type: mime_type.to_string(),
                    size: bytes.len() as u64,
                    bytes: Bytes::copy_from_slice(bytes),
                },
            );
        }
        let blob = &self.blobs[&cid];
        serde_json::json!({
            "$type": "blob",
            "ref": {"$link": cid},
            "mimeType": blob.mime_type,
            "size": blob.size,
        })
    }

    pub(super) fn has_blob(&self, cid: &str) -> bool {
        self.blobs.contains_key(cid)
    }

    pub(super) fn get_blob(&self, cid: &str) -> Option<&StoredBlob> {
        self.blobs.get(cid)
    }

    pub(super) fn create_record(
        &mut self,
        collection: &str,
        value: serde_json::Value,
    ) -> XrpcResult<(String, String)> {
        if !value.is_object() {
            return Err(XrpcError::invalid_request("record must be an object"));
        }
        if let Some(blob) = value.get("blob") {
            let blob = atpins::model::BlobRef::from_value(blob.clone())
                .ok_or_else(|| XrpcError::invalid_request("record blob has no content id"))?;
            if !self.has_blob(&blob.content_id) {
                return Err(XrpcError::invalid_request(format!(
                    "blob not found: {}",
                    blob.content_id
                )));
            }
        }
        let bytes = serde_json::to_vec(&value)
            .map_err(|e| XrpcError::invalid_request(format!("encode record: {}", e)))?;
        let cid = content_id(&bytes);
        let rkey = self.next_rkey();
        self.collections
            .entry(collection.to_string())
            .or_default()
            .insert(
                rkey.clone(),
                StoredRecord {
                    cid: cid.clone(),
                    value,
                },
            );
        Ok((rkey, cid))
    }

    pub(super) fn get_record(&self, collection: &str, rkey: &str) -> Option<&StoredRecord> {
        self.collections.get(collection)?.get(rkey)
    }

    /// Deleting a missing record is not an error.
    pub(super) fn delete_record(&mut self, collection: &str, rkey: &str) -> bool {
        self.collections
            .get_mut(collection)
            .is_some_and(|c| c.remove(rkey).is_some())
    }

    /// Newest first; the cursor is the last rkey returned.
    pub(super) fn list_records(
        &self,
        collection: &str,
        limit: usize,
        cursor: Option<&str>,
    ) -> Page<(String, StoredRecord)> {
        let Some(records) = self.collections.get(collection) else {
            return Page {
                items: Vec::new(),
                cursor: None,
            };
        };
        let mut iter = records
            .iter()
            .rev()
            .filter(|(k, _)| cursor.is_none_or(|c| k.as_str() < c))
            .map(|(k, r)| (k.clone(), r.clone()));
        let items: Vec<(String, StoredRecord)> = iter.by_ref().take(limit).collect();
        let more = iter.next().is_some();
        let cursor = if more {
            items.last().map(|(k, _)| k.clone())
        } else {
            None
        };
        Page { items, cursor }
    }

    /// Upload order; the cursor is the last cid returned.
    pub(super) fn list_blobs(&self, limit: usize, cursor: Option<&str>) -> Page<String> {
        let start = match cursor {
            Some(c) => self
                .blob_order
                .iter()
                .position(|cid| cid == c)
                .map(|i| i + 1)
                .unwrap_or(self.blob_order.len()),
            None => 0,
        };
        let end = (start + limit).min(self.blob_order.len());
        let items = self.blob_order[start..end].to_vec();
        let cursor = if end < self.blob_order.len() {
            items.last().cloned()
        } else {
            None
        };
        Page { items, cursor }
    }
}

#[cfg(test)]
#[path = "../../tests/bin/atpins_devpds/repo_tests.rs"]
mod tests;
