//! Reading blobs back from the PDS: downloads, and type/size probing for
//! orphans whose pin record would otherwise describe them.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::Serialize;

use crate::error::{PinsError, Result};
use crate::model::FileEntry;
use crate::remote::{BlobContent, BlobMetadata, RepoClient};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProbeFailure {
    pub content_id: String,
    pub error: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ProbeReport {
    pub probed: BTreeMap<String, BlobMetadata>,
    pub failures: Vec<ProbeFailure>,
}

/// Downloads one blob.
pub fn fetch_blob<R: RepoClient + ?Sized>(
    client: &R,
    owner: &str,
    content_id: &str,
) -> Result<BlobContent> {
    if owner.trim().is_empty() {
        return Err(PinsError::NotAuthenticated);
    }
    if content_id.trim().is_empty() {
        return Err(PinsError::validation("content id is required"));
    }
    client.get_blob(owner, content_id)
}

/// Probes every id in parallel. A failed probe is reported and the rest
/// carry on.
pub fn probe_blobs<R>(client: &R, owner: &str, content_ids: &[String]) -> ProbeReport
where
    R: RepoClient + Sync + ?Sized,
{
    let outcomes: Vec<(&String, Result<BlobMetadata>)> = content_ids
        .par_iter()
        .map(|cid| (cid, client.probe_blob(owner, cid)))
        .collect();

    let mut report = ProbeReport::default();
    for (cid, result) in outcomes {
        match result {
            Ok(meta) => {
                report.probed.insert(cid.clone(), meta);
            }
            Err(err) => {
                log::warn!("probe of {} failed: {}", cid, err);
                report.failures.push(ProbeFailure {
                    content_id: cid.clone(),
                    error: err.to_string(),
                });
            }
        }
    }
    report
}

/// Orphans that still lack a type or a size.
pub fn unprobed_orphans(entries: &[FileEntry]) -> Vec<String> {
    entries
        .iter()
        .filter(|e| !e.is_pinned() && (e.mime_type.is_none() || e.size_bytes.is_none()))
        .map(|e| e.content_id.clone())
        .collect()
}

/// Fills missing orphan fields from probe results; returns how many entries
/// changed. Pinned entries keep their record's metadata.
pub fn apply_metadata(entries: &mut [FileEntry], probed: &BTreeMap<String, BlobMetadata>) -> usize {
    let mut changed = 0;
    for entry in entries.iter_mut().filter(|e| !e.is_pinned()) {
        let Some(meta) = probed.get(&entry.content_id) else {
            continue;
        };
        let before = (entry.mime_type.is_some(), entry.size_bytes.is_some());
        if entry.mime_type.is_none() {
            entry.mime_type = meta.mime_type.clone();
        }
        if entry.size_bytes.is_none() {
            entry.size_bytes = meta.size_bytes;
        }
        if before != (entry.mime_type.is_some(), entry.size_bytes.is_some()) {
            changed += 1;
        }
    }
    changed
}

#[cfg(test)]
#[path = "tests/inspect_tests.rs"]
mod tests;
