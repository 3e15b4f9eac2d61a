use super::*;

fn entry(name: &str, mime: &str) -> FileEntry {
    FileEntry {
        content_id: format!("cid-{}", name),
        record_key: Some(format!("rk-{}", name)),
        uri: None,
        mime_type: Some(mime.to_string()),
        filename: Some(name.to_string()),
        size_bytes: None,
        created_at: None,
    }
}

fn sized(name: &str, size: u64) -> FileEntry {
    FileEntry {
        size_bytes: Some(size),
        ..entry(name, "application/octet-stream")
    }
}

fn dated(name: &str, created_at: Option<&str>) -> FileEntry {
    FileEntry {
        created_at: created_at.map(str::to_string),
        ..entry(name, "text/plain")
    }
}

fn names(entries: &[FileEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.display_name()).collect()
}

fn view(filter: FilterType, search: &str, sort: SortKey) -> ViewState {
    ViewState {
        search_query: search.to_string(),
        filter,
        sort,
        ..ViewState::default()
    }
}

#[test]
fn classify_puts_every_mime_in_one_bucket() {
    assert_eq!(classify(Some("image/png")), Bucket::Image);
    assert_eq!(classify(Some("video/mp4")), Bucket::Video);
    assert_eq!(classify(Some("text/plain")), Bucket::Document);
    assert_eq!(classify(Some("application/pdf")), Bucket::Document);
    assert_eq!(
        classify(Some(
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        )),
        Bucket::Document
    );
    assert_eq!(classify(Some("audio/mpeg")), Bucket::Other);
    assert_eq!(classify(Some("application/zip")), Bucket::Other);
    assert_eq!(classify(None), Bucket::Other);
}

#[test]
fn search_and_filter_combine() {
    let entries = vec![entry("cat.png", "image/png"), entry("notes.txt", "text/plain")];

    let out = derive(&entries, &view(FilterType::Images, "cat", SortKey::Newest));
    assert_eq!(names(&out), vec!["cat.png"]);

    let out = derive(&entries, &view(FilterType::Images, "dog", SortKey::Newest));
    assert!(out.is_empty());
}

#[test]
fn search_is_case_insensitive_union_of_fields() {
    let mut orphan = FileEntry::orphan("bafyXYZ");
    orphan.mime_type = None;
    let entries = vec![
        entry("Report.PDF", "application/pdf"),
        entry("clip", "video/webm"),
        orphan,
    ];

    let by_name = derive(&entries, &view(FilterType::All, "report", SortKey::NameAsc));
    assert_eq!(names(&by_name), vec!["Report.PDF"]);

    let by_mime = derive(&entries, &view(FilterType::All, "WEBM", SortKey::NameAsc));
    assert_eq!(names(&by_mime), vec!["clip"]);

    let by_cid = derive(&entries, &view(FilterType::All, "xyz", SortKey::NameAsc));
    assert_eq!(by_cid.len(), 1);
    assert_eq!(by_cid[0].content_id, "bafyXYZ");
}

#[test]
fn other_filter_includes_unknown_mime() {
    let entries = vec![
        FileEntry::orphan("o1"),
        entry("a.png", "image/png"),
        entry("song.mp3", "audio/mpeg"),
    ];
    let out = derive(&entries, &view(FilterType::Other, "", SortKey::Newest));
    let ids: Vec<&str> = out.iter().map(|e| e.content_id.as_str()).collect();
    assert_eq!(ids, vec!["o1", "cid-song.mp3"]);
}

#[test]
fn derive_is_idempotent_and_leaves_input_untouched() {
    let entries = vec![
        sized("b", 3),
        entry("a.png", "image/png"),
        sized("c", 3),
        entry("d.txt", "text/plain"),
    ];
    let before = entries.clone();
    for filter in [
        FilterType::All,
        FilterType::Images,
        FilterType::Documents,
        FilterType::Other,
    ] {
        for sort in [SortKey::Largest, SortKey::NameDesc, SortKey::Oldest] {
            let state = view(filter, "", sort);
            let once = derive(&entries, &state);
            let twice = derive(&once, &state);
            assert_eq!(once, twice);
        }
    }
    assert_eq!(entries, before);
}

#[test]
fn size_sorts_order_and_reverse() {
    let entries = vec![sized("ten", 10), sized("big", 5000), sized("hundred", 100)];

    let largest = derive(&entries, &view(FilterType::All, "", SortKey::Largest));
    let sizes: Vec<u64> = largest.iter().map(|e| e.size_bytes.unwrap()).collect();
    assert_eq!(sizes, vec![5000, 100, 10]);

    let smallest = derive(&entries, &view(FilterType::All, "", SortKey::Smallest));
    let sizes: Vec<u64> = smallest.iter().map(|e| e.size_bytes.unwrap()).collect();
    assert_eq!(sizes, vec![10, 100, 5000]);
}

#[test]
fn missing_size_sorts_as_zero() {
    let entries = vec![sized("one", 1), FileEntry::orphan("o")];
    let out = derive(&entries, &view(FilterType::All, "", SortKey::Smallest));
    assert_eq!(out[0].content_id, "o");
}

#[test]
fn equal_keys_keep_input_order() {
    let same = Some("2024-03-01T10:00:00Z");
    let entries = vec![
        dated("first", same),
        dated("second", same),
        dated("newer", Some("2024-04-01T10:00:00Z")),
        dated("third", same),
    ];

    let newest = derive(&entries, &view(FilterType::All, "", SortKey::Newest));
    assert_eq!(names(&newest), vec!["newer", "first", "second", "third"]);

    let oldest = derive(&entries, &view(FilterType::All, "", SortKey::Oldest));
    assert_eq!(names(&oldest), vec!["first", "second", "third", "newer"]);
}

#[test]
fn missing_or_bad_timestamps_sort_as_epoch() {
    let entries = vec![
        dated("dated", Some("2000-01-01T00:00:00Z")),
        dated("missing", None),
        dated("garbage", Some("yesterday")),
    ];
    let oldest = derive(&entries, &view(FilterType::All, "", SortKey::Oldest));
    assert_eq!(names(&oldest), vec!["missing", "garbage", "dated"]);
}

#[test]
fn name_sort_is_case_insensitive_with_missing_first() {
    let entries = vec![
        entry("banana", "text/plain"),
        FileEntry {
            filename: None,
            ..entry("nameless", "text/plain")
        },
        entry("Apple", "text/plain"),
        entry("apple", "text/plain"),
    ];

    let asc = derive(&entries, &view(FilterType::All, "", SortKey::NameAsc));
    let asc_names: Vec<Option<&str>> = asc.iter().map(|e| e.filename.as_deref()).collect();
    assert_eq!(
        asc_names,
        vec![None, Some("apple"), Some("Apple"), Some("banana")]
    );

    let desc = derive(&entries, &view(FilterType::All, "", SortKey::NameDesc));
    let desc_names: Vec<Option<&str>> = desc.iter().map(|e| e.filename.as_deref()).collect();
    assert_eq!(
        desc_names,
        vec![Some("banana"), Some("Apple"), Some("apple"), None]
    );
}

#[test]
fn bucket_counts_cover_full_set() {
    let entries = vec![
        sized("a", 100),
        entry("b.png", "image/png"),
        entry("c.png", "image/jpeg"),
        entry("d.mp4", "video/mp4"),
        entry("e.txt", "text/plain"),
        FileEntry::orphan("o"),
    ];
    let counts = bucket_counts(&entries);
    assert_eq!(
        counts,
        BucketCounts {
            all: 6,
            images: 2,
            videos: 1,
            documents: 1,
            other: 2,
            total_size: 100,
        }
    );
    assert_eq!(counts.get(FilterType::Images), 2);
    assert_eq!(
        counts.all,
        counts.images + counts.videos + counts.documents + counts.other
    );
}
