//! Derives the filtered, searched and sorted list shown to the user.

use std::cmp::Ordering;

use serde::Serialize;

use crate::model::{Bucket, FileEntry, FilterType, SortKey, ViewMode};
use crate::selection::Selection;

#[derive(Clone, Debug, Default)]
pub struct ViewState {
    pub search_query: String,
    pub filter: FilterType,
    pub sort: SortKey,
    pub view_mode: ViewMode,
    pub selection: Selection,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BucketCounts {
    pub all: usize,
    pub images: usize,
    pub videos: usize,
    pub documents: usize,
    pub other: usize,
    /// Sum of known sizes, in bytes.
    pub total_size: u64,
}

impl BucketCounts {
    pub fn get(&self, filter: FilterType) -> usize {
        match filter {
            FilterType::All => self.all,
            FilterType::Images => self.images,
            FilterType::Videos => self.videos,
            FilterType::Documents => self.documents,
            FilterType::Other => self.other,
        }
    }
}

pub fn classify(mime_type: Option<&str>) -> Bucket {
    let mime = mime_type.unwrap_or("").to_ascii_lowercase();
    if mime.starts_with("image/") {
        Bucket::Image
    } else if mime.starts_with("video/") {
        Bucket::Video
    } else if mime.starts_with("text/") || mime.contains("pdf") || mime.contains("document") {
        Bucket::Document
    } else {
        Bucket::Other
    }
}

pub fn matches_search(entry: &FileEntry, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let query = query.to_lowercase();
    let contains = |field: Option<&str>| field.is_some_and(|f| f.to_lowercase().contains(&query));
    contains(entry.filename.as_deref())
        || contains(Some(entry.content_id.as_str()))
        || contains(entry.mime_type.as_deref())
}

/// Pure: the input is never modified and the same inputs give the same output.
pub fn derive(entries: &[FileEntry], view: &ViewState) -> Vec<FileEntry> {
    let mut out: Vec<FileEntry> = entries
        .iter()
        .filter(|e| view.filter.admits(classify(e.mime_type.as_deref())))
        .filter(|e| matches_search(e, &view.search_query))
        .cloned()
        .collect();
    sort_entries(&mut out, view.sort);
    out
}

/// Stable sort; entries with equal keys keep their relative order.
pub fn sort_entries(entries: &mut [FileEntry], key: SortKey) {
    match key {
        SortKey::Newest => entries.sort_by_key(|e| std::cmp::Reverse(created_at_nanos(e))),
        SortKey::Oldest => entries.sort_by_key(created_at_nanos),
        SortKey::Largest => entries.sort_by_key(|e| std::cmp::Reverse(e.size_bytes.unwrap_or(0))),
        SortKey::Smallest => entries.sort_by_key(|e| e.size_bytes.unwrap_or(0)),
        SortKey::NameAsc => entries.sort_by(name_cmp),
        SortKey::NameDesc => entries.sort_by(|a, b| name_cmp(b, a)),
    }
}

/// Counts over the whole set, before any filter or search.
pub fn bucket_counts(entries: &[FileEntry]) -> BucketCounts {
    let mut counts = BucketCounts::default();
    for entry in entries {
        counts.all += 1;
        counts.total_size += entry.size_bytes.unwrap_or(0);
        match classify(entry.mime_type.as_deref()) {
            Bucket::Image => counts.images += 1,
            Bucket::Video => counts.videos += 1,
            Bucket::Document => counts.documents += 1,
            Bucket::Other => counts.other += 1,
        }
    }
    counts
}

// Missing or unparsable timestamps sort as the epoch.
fn created_at_nanos(entry: &FileEntry) -> i128 {
    entry
        .created_at
        .as_deref()
        .and_then(|s| {
            time::OffsetDateTime::parse(s, &time::format_description::well_known::Rfc3339).ok()
        })
        .map(|t| t.unix_timestamp_nanos())
        .unwrap_or(0)
}

fn name_cmp(a: &FileEntry, b: &FileEntry) -> Ordering {
    locale_compare(
        a.filename.as_deref().unwrap_or(""),
        b.filename.as_deref().unwrap_or(""),
    )
}

/// Case-insensitive primary order with a case-sensitive tie-break, so "apple"
/// and "Apple" sit together ahead of "banana".
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    let fold = |s: &str| s.chars().flat_map(char::to_lowercase).collect::<String>();
    fold(a).cmp(&fold(b)).then_with(|| {
        // Lower case first within an otherwise equal pair.
        let ka = a.chars().map(|c| (c.is_uppercase(), c));
        let kb = b.chars().map(|c| (c.is_uppercase(), c));
        ka.cmp(kb)
    })
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
