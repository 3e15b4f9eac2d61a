use super::*;

fn pinned(name: &str, size: u64, mime: &str) -> FileEntry {
    FileEntry {
        content_id: format!("bafkrei{}aaaaaaaaaaaaaaaaaaaa", name.len()),
        record_key: Some("3kabc".to_string()),
        uri: None,
        mime_type: Some(mime.to_string()),
        filename: Some(name.to_string()),
        size_bytes: Some(size),
        created_at: Some("2024-06-01T12:00:00Z".to_string()),
    }
}

#[test]
fn counts_line_marks_active_filter() {
    let counts = BucketCounts {
        all: 3,
        images: 1,
        videos: 0,
        documents: 1,
        other: 1,
        total_size: 2048,
    };
    let line = counts_line(&counts, FilterType::Images);
    assert_eq!(
        line,
        "all 3  [images 1]  videos 0  documents 1  other 1  (2 KB)"
    );
}

#[test]
fn grid_wraps_to_width() {
    let entries = vec![
        pinned("a.png", 10, "image/png"),
        pinned("b.txt", 2048, "text/plain"),
        FileEntry::orphan("bafkreiorphanorphanorphan"),
    ];
    let lines = grid(&entries, 60);
    // Two cells per row: two rows of cells with a blank separator.
    assert_eq!(lines.len(), 5);
    assert!(lines[0].starts_with("a.png"));
    assert!(lines[0].contains("b.txt"));
    assert!(lines[1].contains("10 B image"));
    assert!(lines[1].contains("2 KB document"));
    assert_eq!(lines[2], "");
    assert!(lines[3].starts_with("bafkreio..."));
    assert_eq!(lines[4], "orphan blob");
}

#[test]
fn list_has_header_and_marks_pins() {
    let entries = vec![
        pinned("notes.txt", 5, "text/plain"),
        FileEntry::orphan("cid-orphan"),
    ];
    let lines = list(&entries);
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("NAME"));
    assert!(lines[1].starts_with("* notes.txt"));
    assert!(lines[1].contains("2024-06-01"));
    assert!(lines[2].starts_with("  cid-orphan"));
}

#[test]
fn long_names_are_cut() {
    assert_eq!(fit("abcdef", 4), "abc…");
    assert_eq!(fit("ab", 4), "ab  ");
}

#[test]
fn details_include_cdn_links_for_images() {
    let entry = pinned("cat.png", 1536, "image/png");
    let links = BlobLinks::new("https://pds.example", "did:plc:x", &entry.content_id);
    let lines = details(&entry, &links, true);
    assert!(lines.contains(&"name: cat.png".to_string()));
    assert!(lines.contains(&"size: 1.5 KB (1536 bytes)".to_string()));
    assert!(lines.iter().any(|l| l.starts_with("thumbnail: https://cdn.bsky.app")));

    let doc = pinned("a.zip", 1, "application/zip");
    let lines = details(&doc, &links, false);
    assert!(!lines.iter().any(|l| l.starts_with("thumbnail:")));
    assert!(lines.iter().any(|l| l.starts_with("preview:")));
}
