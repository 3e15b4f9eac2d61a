use super::*;

#[test]
fn content_id_accepts_nested_link_object() {
    let v = serde_json::json!({"$type": "blob", "ref": {"$link": "bafyA"}, "size": 3});
    assert_eq!(content_id_of(&v).as_deref(), Some("bafyA"));
}

#[test]
fn content_id_accepts_string_ref_and_legacy_cid() {
    let v = serde_json::json!({"ref": "bafyB"});
    assert_eq!(content_id_of(&v).as_deref(), Some("bafyB"));

    let v = serde_json::json!({"cid": "bafyC", "mimeType": "image/png"});
    assert_eq!(content_id_of(&v).as_deref(), Some("bafyC"));

    let v = serde_json::json!({"$link": "bafyD"});
    assert_eq!(content_id_of(&v).as_deref(), Some("bafyD"));
}

#[test]
fn content_id_prefers_ref_over_legacy_cid() {
    let v = serde_json::json!({"ref": {"$link": "fromRef"}, "cid": "fromCid"});
    assert_eq!(content_id_of(&v).as_deref(), Some("fromRef"));
}

#[test]
fn content_id_rejects_unrecognized_shapes() {
    assert_eq!(content_id_of(&serde_json::json!({"ref": 12})), None);
    assert_eq!(content_id_of(&serde_json::json!({"ref": {"link": "x"}})), None);
    assert_eq!(content_id_of(&serde_json::json!({"cid": "   "})), None);
    assert_eq!(content_id_of(&serde_json::Value::Null), None);
}

#[test]
fn blob_ref_round_trips_server_shape_verbatim() {
    let raw = serde_json::json!({
        "$type": "blob",
        "ref": {"$link": "bafyE"},
        "mimeType": "text/plain",
        "size": 42,
    });
    let blob: BlobRef = serde_json::from_value(raw.clone()).unwrap();
    assert_eq!(blob.content_id, "bafyE");
    assert_eq!(blob.mime_type.as_deref(), Some("text/plain"));
    assert_eq!(blob.size, Some(42));
    assert_eq!(serde_json::to_value(&blob).unwrap(), raw);
}

#[test]
fn blob_ref_deserialize_fails_without_content_id() {
    let err = serde_json::from_value::<BlobRef>(serde_json::json!({"size": 1})).unwrap_err();
    assert!(err.to_string().contains("content id"));
}
