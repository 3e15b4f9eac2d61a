//! Multi-select state for bulk operations.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{PinsError, Result};
use crate::model::FileEntry;

/// What a bulk delete needs to know about one selected pin.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SelectedEntry {
    pub content_id: String,
    pub record_key: String,
    pub filename: Option<String>,
    pub size_bytes: Option<u64>,
}

impl SelectedEntry {
    fn from_entry(entry: &FileEntry) -> Option<Self> {
        let record_key = entry.record_key.clone()?;
        Some(Self {
            content_id: entry.content_id.clone(),
            record_key,
            filename: entry.filename.clone(),
            size_bytes: entry.size_bytes,
        })
    }
}

/// Browsing when disabled, Selecting when enabled.
///
/// Only pinned entries can be selected, so every stored id carries a record
/// key.
#[derive(Clone, Debug, Default)]
pub struct Selection {
    enabled: bool,
    selected: BTreeMap<String, SelectedEntry>,
}

impl Selection {
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn contains(&self, content_id: &str) -> bool {
        self.selected.contains_key(content_id)
    }

    pub fn entries(&self) -> impl Iterator<Item = &SelectedEntry> {
        self.selected.values()
    }

    pub fn enter(&mut self) {
        if !self.enabled {
            self.enabled = true;
            self.selected.clear();
        }
    }

    pub fn cancel(&mut self) {
        self.enabled = false;
        self.selected.clear();
    }

    /// Flips membership of `entry`. Returns whether it is now selected.
    pub fn toggle(&mut self, entry: &FileEntry) -> Result<bool> {
        self.require_enabled()?;
        let Some(selected) = SelectedEntry::from_entry(entry) else {
            return Err(PinsError::validation(format!(
                "{} is not pinned and cannot be selected",
                entry.content_id
            )));
        };
        if self.selected.remove(&selected.content_id).is_some() {
            return Ok(false);
        }
        self.selected.insert(selected.content_id.clone(), selected);
        Ok(true)
    }

    /// Adds every pinned entry in `visible`; returns how many were added.
    /// Entries selected earlier stay selected even when no longer visible.
    pub fn select_all(&mut self, visible: &[FileEntry]) -> Result<usize> {
        self.require_enabled()?;
        let mut added = 0;
        for selected in visible.iter().filter_map(SelectedEntry::from_entry) {
            if !self.selected.contains_key(&selected.content_id) {
                self.selected.insert(selected.content_id.clone(), selected);
                added += 1;
            }
        }
        Ok(added)
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Reconciles the selection with a freshly fetched entry set: ids that are
    /// no longer pinned are dropped, the rest pick up current record keys and
    /// names. Returns the number dropped.
    pub fn retain_eligible(&mut self, entries: &[FileEntry]) -> usize {
        if self.selected.is_empty() {
            return 0;
        }
        let before = self.selected.len();
        let mut refreshed = BTreeMap::new();
        for entry in entries {
            if self.selected.contains_key(&entry.content_id)
                && let Some(current) = SelectedEntry::from_entry(entry)
            {
                refreshed.insert(current.content_id.clone(), current);
            }
        }
        self.selected = refreshed;
        let dropped = before - self.selected.len();
        if dropped > 0 {
            log::debug!("dropped {} selected entries no longer pinned", dropped);
        }
        dropped
    }

    pub fn snapshot(&self) -> Vec<SelectedEntry> {
        self.selected.values().cloned().collect()
    }

    fn require_enabled(&self) -> Result<()> {
        if self.enabled {
            Ok(())
        } else {
            Err(PinsError::validation("selection mode is not active"))
        }
    }
}

#[cfg(test)]
#[path = "tests/selection_tests.rs"]
mod tests;
