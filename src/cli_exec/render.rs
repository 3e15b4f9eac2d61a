//! Plain-text layouts for `ls` and `show`.

use atpins::format::{BlobLinks, format_bytes, truncate_cid};
use atpins::model::{FileEntry, FilterType};
use atpins::view::{BucketCounts, classify};

const CELL_WIDTH: usize = 24;
const CELL_GAP: usize = 2;

pub(super) fn terminal_width() -> usize {
    crossterm::terminal::size()
        .map(|(cols, _)| cols as usize)
        .unwrap_or(100)
}

pub(super) fn counts_line(counts: &BucketCounts, active: FilterType) -> String {
    let parts: Vec<String> = [
        FilterType::All,
        FilterType::Images,
        FilterType::Videos,
        FilterType::Documents,
        FilterType::Other,
    ]
    .iter()
    .map(|f| {
        let label = format!("{} {}", f, counts.get(*f));
        if *f == active {
            format!("[{}]", label)
        } else {
            label
        }
    })
    .collect();
    format!("{}  ({})", parts.join("  "), format_bytes(counts.total_size))
}

/// Two text rows per cell: name, then size and type.
pub(super) fn grid(entries: &[FileEntry], width: usize) -> Vec<String> {
    let columns = (width / (CELL_WIDTH + CELL_GAP)).max(1);
    let mut lines = Vec::new();
    for row in entries.chunks(columns) {
        let names: Vec<String> = row
            .iter()
            .map(|e| fit(&cell_title(e), CELL_WIDTH))
            .collect();
        let metas: Vec<String> = row
            .iter()
            .map(|e| fit(&cell_meta(e), CELL_WIDTH))
            .collect();
        let gap = " ".repeat(CELL_GAP);
        lines.push(names.join(&gap).trim_end().to_string());
        lines.push(metas.join(&gap).trim_end().to_string());
        lines.push(String::new());
    }
    lines.pop();
    lines
}

pub(super) fn list(entries: &[FileEntry]) -> Vec<String> {
    let name_width = entries
        .iter()
        .map(|e| e.display_name().chars().count())
        .max()
        .unwrap_or(0)
        .clamp(4, 40);
    let mut lines = vec![format!(
        "  {:<name_width$}  {:>9}  {:<24}  {:<20}  {}",
        "NAME", "SIZE", "TYPE", "CREATED", "CID"
    )];
    for e in entries {
        lines.push(format!(
            "{} {:<name_width$}  {:>9}  {:<24}  {:<20}  {}",
            if e.is_pinned() { '*' } else { ' ' },
            fit(e.display_name(), name_width),
            e.size_bytes.map(format_bytes).unwrap_or_else(|| "-".into()),
            fit(e.mime_type.as_deref().unwrap_or("-"), 24),
            e.created_at.as_deref().map(short_date).unwrap_or("-"),
            truncate_cid(&e.content_id),
        ));
    }
    lines
}

pub(super) fn details(entry: &FileEntry, links: &BlobLinks, previewable: bool) -> Vec<String> {
    let mut lines = vec![
        format!("name: {}", entry.display_name()),
        format!("cid: {}", entry.content_id),
    ];
    if let Some(rkey) = &entry.record_key {
        lines.push(format!("record_key: {}", rkey));
    }
    if let Some(uri) = &entry.uri {
        lines.push(format!("uri: {}", uri));
    }
    lines.push(format!(
        "type: {} ({})",
        entry.mime_type.as_deref().unwrap_or("unknown"),
        classify(entry.mime_type.as_deref()).as_str()
    ));
    if let Some(size) = entry.size_bytes {
        lines.push(format!("size: {} ({} bytes)", format_bytes(size), size));
    }
    if let Some(created) = &entry.created_at {
        lines.push(format!("created_at: {}", created));
    }
    lines.push(format!("raw: {}", links.raw));
    if classify(entry.mime_type.as_deref()) == atpins::model::Bucket::Image {
        lines.push(format!("thumbnail: {}", links.thumbnail));
        lines.push(format!("fullsize: {}", links.fullsize));
    }
    if !previewable {
        lines.push("preview: not available for this type".to_string());
    }
    lines
}

fn cell_title(e: &FileEntry) -> String {
    match &e.filename {
        Some(name) => name.clone(),
        None => truncate_cid(&e.content_id),
    }
}

fn cell_meta(e: &FileEntry) -> String {
    if !e.is_pinned() {
        return "orphan blob".to_string();
    }
    let size = e.size_bytes.map(format_bytes).unwrap_or_else(|| "-".into());
    format!("{} {}", size, classify(e.mime_type.as_deref()).as_str())
}

// Pads or cuts to exactly `width` characters.
fn fit(s: &str, width: usize) -> String {
    let count = s.chars().count();
    if count <= width {
        return format!("{:<width$}", s);
    }
    let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn short_date(ts: &str) -> &str {
    ts.get(..10).unwrap_or(ts)
}

#[cfg(test)]
#[path = "../tests/cli_exec/render_tests.rs"]
mod tests;
