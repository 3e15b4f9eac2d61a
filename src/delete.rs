//! Concurrent bulk delete of selected pin records.

use rayon::prelude::*;
use serde::Serialize;

use crate::model::COLLECTION;
use crate::remote::RepoClient;
use crate::selection::SelectedEntry;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DeleteSummary {
    pub succeeded: usize,
    pub failed: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DeleteFailure {
    pub content_id: String,
    pub record_key: String,
    pub error: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DeleteReport {
    /// Content ids whose pin record is gone.
    pub deleted: Vec<String>,
    pub failures: Vec<DeleteFailure>,
}

impl DeleteReport {
    pub fn summary(&self) -> DeleteSummary {
        DeleteSummary {
            succeeded: self.deleted.len(),
            failed: self.failures.len(),
        }
    }
}

/// Issues one `deleteRecord` per entry in parallel. Every entry is attempted;
/// results are reported in input order. Only the pin record is removed; the
/// blob stays in the repository.
pub fn delete_selected<R>(client: &R, owner: &str, entries: &[SelectedEntry]) -> DeleteReport
where
    R: RepoClient + Sync + ?Sized,
{
    let outcomes: Vec<(&SelectedEntry, crate::error::Result<()>)> = entries
        .par_iter()
        .map(|entry| {
            let result = client.delete_record(owner, COLLECTION, &entry.record_key);
            (entry, result)
        })
        .collect();

    let mut report = DeleteReport::default();
    for (entry, result) in outcomes {
        match result {
            Ok(()) => report.deleted.push(entry.content_id.clone()),
            Err(err) => {
                log::warn!("delete of {} ({}) failed: {}", entry.content_id, entry.record_key, err);
                report.failures.push(DeleteFailure {
                    content_id: entry.content_id.clone(),
                    record_key: entry.record_key.clone(),
                    error: err.to_string(),
                });
            }
        }
    }
    log::debug!(
        "bulk delete: {} deleted, {} failed",
        report.deleted.len(),
        report.failures.len()
    );
    report
}

#[cfg(test)]
#[path = "tests/delete_tests.rs"]
mod tests;
