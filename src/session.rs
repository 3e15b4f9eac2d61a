//! Explicit state container tying reconciliation, the view, selection and the
//! batch operations together for one repository owner.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::delete::{DeleteReport, delete_selected};
use crate::error::{PinsError, Result};
use crate::inspect::{ProbeReport, apply_metadata, fetch_blob, probe_blobs, unprobed_orphans};
use crate::model::{DEFAULT_MAX_UPLOAD_BYTES, FileEntry, FilterType, SortKey, ViewMode};
use crate::reconcile::{Reconciliation, get_pin, reconcile};
use crate::remote::{BlobContent, BlobMetadata, RepoClient};
use crate::selection::{SelectedEntry, Selection};
use crate::upload::{UploadFile, UploadLimits, UploadObserver, UploadTask, upload_all};
use crate::view::{BucketCounts, ViewState, bucket_counts, derive};

/// Handed out by [`Session::begin_refresh`]; a result is applied only if its
/// ticket is newer than the last one applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket(u64);

impl RefreshTicket {
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// Counts from the last successful reconciliation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RefreshStats {
    pub pinned: usize,
    pub orphans: usize,
    pub malformed: usize,
    pub duplicate_pins: usize,
    pub blobs_unavailable: bool,
}

impl RefreshStats {
    fn of(rec: &Reconciliation) -> Self {
        Self {
            pinned: rec.pinned,
            orphans: rec.orphans,
            malformed: rec.malformed,
            duplicate_pins: rec.duplicate_pins,
            blobs_unavailable: rec.blobs_unavailable,
        }
    }
}

#[derive(Debug)]
pub struct UploadBatch {
    pub tasks: Vec<UploadTask>,
    /// Set when the refresh after the batch failed; the entries shown are
    /// then the ones from before the batch.
    pub refresh_error: Option<PinsError>,
}

#[derive(Debug)]
pub struct DeleteOutcome {
    pub report: DeleteReport,
    pub refresh_error: Option<PinsError>,
}

pub struct Session<R> {
    client: R,
    owner: String,
    limits: UploadLimits,

    entries: Vec<FileEntry>,
    view: ViewState,
    stats: RefreshStats,

    // Blobs are immutable, so probe results stay valid across refreshes.
    probed: BTreeMap<String, BlobMetadata>,

    next_generation: u64,
    applied_generation: u64,
}

impl<R: RepoClient> Session<R> {
    pub fn new(client: R, owner: impl Into<String>) -> Result<Self> {
        let owner = owner.into();
        if owner.trim().is_empty() {
            return Err(PinsError::NotAuthenticated);
        }
        Ok(Self {
            client,
            owner,
            limits: UploadLimits {
                max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            },
            entries: Vec::new(),
            view: ViewState::default(),
            stats: RefreshStats::default(),
            probed: BTreeMap::new(),
            next_generation: 0,
            applied_generation: 0,
        })
    }

    pub fn with_max_upload_bytes(mut self, max_upload_bytes: u64) -> Self {
        self.limits.max_upload_bytes = max_upload_bytes;
        self
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Every known entry, pinned first, in listing order.
    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    pub fn stats(&self) -> RefreshStats {
        self.stats
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    pub fn selection(&self) -> &Selection {
        &self.view.selection
    }

    pub fn visible(&self) -> Vec<FileEntry> {
        derive(&self.entries, &self.view)
    }

    pub fn bucket_counts(&self) -> BucketCounts {
        bucket_counts(&self.entries)
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.view.search_query = query.into();
    }

    pub fn set_filter(&mut self, filter: FilterType) {
        self.view.filter = filter;
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.view.sort = sort;
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view.view_mode = mode;
    }

    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.next_generation += 1;
        RefreshTicket(self.next_generation)
    }

    /// Applies a reconciliation result obtained under `ticket`.
    ///
    /// Returns `Ok(false)` when a newer result was already applied. A failed
    /// reconciliation leaves the current entries in place and is returned to
    /// the caller.
    pub fn apply_refresh(
        &mut self,
        ticket: RefreshTicket,
        result: Result<Reconciliation>,
    ) -> Result<bool> {
        let generation = ticket.generation();
        if generation <= self.applied_generation {
            log::debug!(
                "discarding stale refresh {} (applied {})",
                generation,
                self.applied_generation
            );
            return Ok(false);
        }
        self.applied_generation = generation;

        let rec = result?;
        self.stats = RefreshStats::of(&rec);
        self.entries = rec.entries;
        apply_metadata(&mut self.entries, &self.probed);
        self.view.selection.retain_eligible(&self.entries);
        log::debug!(
            "refresh {} applied: {} entries",
            generation,
            self.entries.len()
        );
        Ok(true)
    }

    pub fn refresh(&mut self) -> Result<()> {
        let ticket = self.begin_refresh();
        let result = reconcile(&self.client, &self.owner);
        self.apply_refresh(ticket, result).map(|_| ())
    }

    pub fn get_pin(&self, record_key: &str) -> Result<FileEntry> {
        get_pin(&self.client, &self.owner, record_key)
    }

    pub fn fetch_blob(&self, content_id: &str) -> Result<BlobContent> {
        fetch_blob(&self.client, &self.owner, content_id)
    }

    pub fn enter_selection(&mut self) {
        self.view.selection.enter();
    }

    pub fn cancel_selection(&mut self) {
        self.view.selection.cancel();
    }

    pub fn clear_selection(&mut self) {
        self.view.selection.clear();
    }

    /// Toggles the entry with `content_id`; returns whether it is now selected.
    pub fn toggle(&mut self, content_id: &str) -> Result<bool> {
        let entry = self
            .entries
            .iter()
            .find(|e| e.content_id == content_id)
            .ok_or_else(|| PinsError::validation(format!("no entry with id {}", content_id)))?;
        self.view.selection.toggle(entry)
    }

    /// Selects every pinned entry of the current view.
    pub fn select_all_visible(&mut self) -> Result<usize> {
        let visible = self.visible();
        self.view.selection.select_all(&visible)
    }

    /// Uploads `files` in order, then refreshes exactly once.
    pub fn upload_all(
        &mut self,
        files: &[UploadFile],
        observer: &mut UploadObserver<'_>,
    ) -> UploadBatch {
        let tasks = upload_all(&self.client, &self.owner, files, self.limits, observer);
        let refresh_error = self.refresh().err();
        UploadBatch {
            tasks,
            refresh_error,
        }
    }
}

impl<R: RepoClient + Sync> Session<R> {
    /// Deletes the selected pins after `confirm` approves the list.
    ///
    /// Returns `Ok(None)` when declined: nothing is issued and the selection
    /// is kept. Otherwise the session leaves selection mode and refreshes.
    pub fn delete_selected<F>(&mut self, confirm: F) -> Result<Option<DeleteOutcome>>
    where
        F: FnOnce(&[SelectedEntry]) -> bool,
    {
        let targets = self.view.selection.snapshot();
        if targets.is_empty() {
            return Err(PinsError::validation("nothing selected"));
        }
        if !confirm(&targets) {
            log::debug!("bulk delete of {} entries declined", targets.len());
            return Ok(None);
        }

        let report = delete_selected(&self.client, &self.owner, &targets);
        self.view.selection.cancel();
        let refresh_error = self.refresh().err();
        Ok(Some(DeleteOutcome {
            report,
            refresh_error,
        }))
    }

    /// Probes orphans that lack a type or size and were not probed before,
    /// then fills in the current entries.
    pub fn probe_orphans(&mut self) -> ProbeReport {
        let pending: Vec<String> = unprobed_orphans(&self.entries)
            .into_iter()
            .filter(|cid| !self.probed.contains_key(cid))
            .collect();
        let report = probe_blobs(&self.client, &self.owner, &pending);
        self.probed
            .extend(report.probed.iter().map(|(k, v)| (k.clone(), v.clone())));
        let changed = apply_metadata(&mut self.entries, &self.probed);
        log::debug!(
            "probed {} orphans ({} failed), {} entries updated",
            pending.len(),
            report.failures.len(),
            changed
        );
        report
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
