//! Merges pin records and raw repository blobs into one file view.

use std::collections::HashSet;

use serde::Serialize;

use crate::error::{PinsError, Result};
use crate::model::{COLLECTION, FileEntry};
use crate::remote::RepoClient;

pub const RECORD_PAGE_LIMIT: u32 = 100;
pub const BLOB_PAGE_LIMIT: u32 = 1000;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Reconciliation {
    /// Pinned entries in listing order, then orphans in listing order.
    pub entries: Vec<FileEntry>,
    pub pinned: usize,
    pub orphans: usize,
    /// Pin records skipped because their blob reference was unrecognizable.
    pub malformed: usize,
    /// Pin records skipped because an earlier pin already covered the blob.
    pub duplicate_pins: usize,
    /// True when the blob listing failed and the view holds pins only.
    pub blobs_unavailable: bool,
}

/// Fetches every pin record and every raw blob id for `owner` and merges them.
///
/// A failed pin listing is fatal. A failed blob listing degrades to a
/// pins-only view.
pub fn reconcile<R: RepoClient + ?Sized>(client: &R, owner: &str) -> Result<Reconciliation> {
    if owner.trim().is_empty() {
        return Err(PinsError::NotAuthenticated);
    }

    let pins = list_all_pins(client, owner)?;

    let (blob_ids, blobs_unavailable) = match list_all_blob_ids(client, owner) {
        Ok(ids) => (ids, false),
        Err(err) => {
            log::warn!("blob listing unavailable, showing pins only: {}", err);
            (Vec::new(), true)
        }
    };

    let mut covered: HashSet<String> = pins
        .entries
        .iter()
        .map(|e| e.content_id.clone())
        .collect();
    let orphans: Vec<FileEntry> = blob_ids
        .into_iter()
        .filter(|cid| covered.insert(cid.clone()))
        .map(FileEntry::orphan)
        .collect();

    let pinned = pins.entries.len();
    let orphan_count = orphans.len();
    let mut entries = pins.entries;
    entries.extend(orphans);

    log::debug!(
        "reconciled {} entries ({} pinned, {} orphans, {} malformed)",
        entries.len(),
        pinned,
        orphan_count,
        pins.malformed
    );

    Ok(Reconciliation {
        entries,
        pinned,
        orphans: orphan_count,
        malformed: pins.malformed,
        duplicate_pins: pins.duplicates,
        blobs_unavailable,
    })
}

/// Fetches a single pin by record key.
pub fn get_pin<R: RepoClient + ?Sized>(
    client: &R,
    owner: &str,
    record_key: &str,
) -> Result<FileEntry> {
    if owner.trim().is_empty() {
        return Err(PinsError::NotAuthenticated);
    }
    if record_key.trim().is_empty() {
        return Err(PinsError::validation("record key is required"));
    }
    let record = client.get_record(owner, COLLECTION, record_key)?;
    FileEntry::from_record(&record.uri, &record.value)
}

struct PinListing {
    entries: Vec<FileEntry>,
    malformed: usize,
    duplicates: usize,
}

fn list_all_pins<R: RepoClient + ?Sized>(client: &R, owner: &str) -> Result<PinListing> {
    let mut listing = PinListing {
        entries: Vec::new(),
        malformed: 0,
        duplicates: 0,
    };
    let mut seen: HashSet<String> = HashSet::new();
    let mut cursor: Option<String> = None;

    loop {
        let page =
            client.list_records(owner, COLLECTION, cursor.as_deref(), RECORD_PAGE_LIMIT)?;
        log::debug!("listRecords page: {} records", page.records.len());

        for record in &page.records {
            match FileEntry::from_record(&record.uri, &record.value) {
                Ok(entry) => {
                    if seen.insert(entry.content_id.clone()) {
                        listing.entries.push(entry);
                    } else {
                        log::debug!(
                            "skipping duplicate pin {} for blob {}",
                            record.uri,
                            entry.content_id
                        );
                        listing.duplicates += 1;
                    }
                }
                Err(err) => {
                    log::warn!("skipping pin record: {}", err);
                    listing.malformed += 1;
                }
            }
        }

        match next_cursor(cursor.as_deref(), page.cursor) {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    Ok(listing)
}

fn list_all_blob_ids<R: RepoClient + ?Sized>(client: &R, owner: &str) -> Result<Vec<String>> {
    let mut ids = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let page = client.list_blobs(owner, cursor.as_deref(), BLOB_PAGE_LIMIT)?;
        log::debug!("listBlobs page: {} cids", page.cids.len());
        ids.extend(page.cids);

        match next_cursor(cursor.as_deref(), page.cursor) {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    Ok(ids)
}

// A server that hands back the cursor it was given would otherwise loop forever.
fn next_cursor(current: Option<&str>, returned: Option<String>) -> Option<String> {
    let returned = returned.filter(|c| !c.is_empty())?;
    if current == Some(returned.as_str()) {
        log::warn!("pagination cursor did not advance ({}); stopping", returned);
        return None;
    }
    Some(returned)
}

#[cfg(test)]
#[path = "tests/reconcile_tests.rs"]
mod tests;
