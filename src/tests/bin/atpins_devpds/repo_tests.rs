use super::*;

const COLL: &str = "com.fusionstrings.pins";

fn pin_for(blob: &serde_json::Value) -> serde_json::Value {
    serde_json::json!({"$type": COLL, "blob": blob, "mimeType": "text/plain"})
}

#[test]
fn blobs_are_content_addressed_and_deduplicated() {
    let mut repo = Repo::default();
    let a = repo.put_blob(b"same", "text/plain");
    let b = repo.put_blob(b"same", "text/plain");
    assert_eq!(a, b);
    assert_eq!(a["ref"]["$link"], content_id(b"same"));
    assert_eq!(a["size"], 4);
    assert_eq!(repo.list_blobs(10, None).items.len(), 1);
}

#[test]
fn rkeys_are_zero_padded_sequence_numbers() {
    let mut repo = Repo::default();
    let blob = repo.put_blob(b"x", "text/plain");
    let (first, _) = repo.create_record(COLL, pin_for(&blob)).unwrap();
    let (second, _) = repo.create_record(COLL, pin_for(&blob)).unwrap();
    assert_eq!(first, "0000000000001");
    assert_eq!(second, "0000000000002");
}

#[test]
fn records_list_newest_first_across_pages() {
    let mut repo = Repo::default();
    let blob = repo.put_blob(b"x", "text/plain");
    for _ in 0..5 {
        repo.create_record(COLL, pin_for(&blob)).unwrap();
    }

    let first = repo.list_records(COLL, 2, None);
    let keys: Vec<&str> = first.items.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["0000000000005", "0000000000004"]);

    let second = repo.list_records(COLL, 2, first.cursor.as_deref());
    let third = repo.list_records(COLL, 2, second.cursor.as_deref());
    assert_eq!(third.items.len(), 1);
    assert_eq!(third.items[0].0, "0000000000001");
    assert!(third.cursor.is_none());
}

#[test]
fn exact_page_has_no_cursor() {
    let mut repo = Repo::default();
    let blob = repo.put_blob(b"x", "text/plain");
    repo.create_record(COLL, pin_for(&blob)).unwrap();
    repo.create_record(COLL, pin_for(&blob)).unwrap();
    assert!(repo.list_records(COLL, 2, None).cursor.is_none());
    assert!(repo.list_records("other.collection", 2, None).items.is_empty());
}

#[test]
fn records_must_reference_uploaded_blobs() {
    let mut repo = Repo::default();
    let missing = serde_json::json!({"ref": {"$link": "nope"}});
    assert!(repo.create_record(COLL, pin_for(&missing)).is_err());

    let malformed = serde_json::json!({"size": 3});
    assert!(repo.create_record(COLL, pin_for(&malformed)).is_err());

    assert!(repo.create_record(COLL, serde_json::json!("string")).is_err());
}

#[test]
fn delete_is_idempotent() {
    let mut repo = Repo::default();
    let blob = repo.put_blob(b"x", "text/plain");
    let (rkey, _) = repo.create_record(COLL, pin_for(&blob)).unwrap();
    assert!(repo.get_record(COLL, &rkey).is_some());
    assert!(repo.delete_record(COLL, &rkey));
    assert!(!repo.delete_record(COLL, &rkey));
    assert!(repo.get_record(COLL, &rkey).is_none());
    // The blob outlives its pin.
    assert!(repo.has_blob(&content_id(b"x")));
}

#[test]
fn blobs_page_in_upload_order() {
    let mut repo = Repo::default();
    for i in 0..5u8 {
        repo.put_blob(&[i], "application/octet-stream");
    }
    let first = repo.list_blobs(3, None);
    assert_eq!(first.items.len(), 3);
    assert_eq!(first.items[0], content_id(&[0]));
    let second = repo.list_blobs(3, first.cursor.as_deref());
    assert_eq!(second.items, vec![content_id(&[3]), content_id(&[4])]);
    assert!(second.cursor.is_none());
}

#[test]
fn stored_blobs_keep_their_bytes_and_type() {
    let mut repo = Repo::default();
    let blob = repo.put_blob(b"<svg/>", "image/svg+xml");
    let cid = blob["ref"]["$link"].as_str().unwrap().to_string();

    let stored = repo.get_blob(&cid).unwrap();
    assert_eq!(&stored.bytes[..], b"<svg/>");
    assert_eq!(stored.mime_type, "image/svg+xml");
    assert_eq!(stored.size, 6);
    assert!(repo.get_blob("unknown").is_none());
}
