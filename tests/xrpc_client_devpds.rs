mod common;

use std::time::Duration;

use anyhow::{Context, Result};

use atpins::model::{COLLECTION, PinRecord, now_rfc3339};
use atpins::{PinsError, RepoClient};

#[test]
fn pin_lifecycle_round_trips_through_xrpc() -> Result<()> {
    let pds = common::spawn_pds()?;
    let client = common::client_for(&pds)?;

    let blob = client.upload_blob(b"hello pins".to_vec(), "text/plain")?;
    assert_eq!(blob.content_id, blake3::hash(b"hello pins").to_hex().to_string());

    let record = PinRecord::new(
        blob.clone(),
        "text/plain",
        Some("hello.txt".to_string()),
        Some(10),
        now_rfc3339(),
    );
    let created = client.create_record(&pds.did, COLLECTION, &record)?;
    let rkey = created.record_key().context("created uri has rkey")?.to_string();

    let page = client.list_records(&pds.did, COLLECTION, None, 100)?;
    assert_eq!(page.records.len(), 1);
    assert_eq!(page.records[0].uri, created.uri);
    assert_eq!(
        page.records[0].value.get("filename").and_then(|v| v.as_str()),
        Some("hello.txt")
    );

    let pin = atpins::reconcile::get_pin(&client, &pds.did, &rkey)?;
    assert_eq!(pin.content_id, blob.content_id);
    assert_eq!(pin.mime_type.as_deref(), Some("text/plain"));
    assert_eq!(pin.size_bytes, Some(10));

    client.delete_record(&pds.did, COLLECTION, &rkey)?;
    let page = client.list_records(&pds.did, COLLECTION, None, 100)?;
    assert!(page.records.is_empty());

    // Deleting again is accepted.
    client.delete_record(&pds.did, COLLECTION, &rkey)?;

    // The blob outlives its pin.
    let blobs = client.list_blobs(&pds.did, None, 1000)?;
    assert_eq!(blobs.cids, vec![blob.content_id]);
    Ok(())
}

#[test]
fn reconcile_reports_orphans_and_pages_through_records() -> Result<()> {
    let pds = common::spawn_pds()?;
    let client = common::client_for(&pds)?;

    // More pins than one listRecords page.
    for i in 0..105u32 {
        let bytes = format!("file {}", i).into_bytes();
        let size = bytes.len() as u64;
        let blob = client.upload_blob(bytes, "text/plain")?;
        let record = PinRecord::new(
            blob,
            "text/plain",
            Some(format!("f{:03}.txt", i)),
            Some(size),
            now_rfc3339(),
        );
        client.create_record(&pds.did, COLLECTION, &record)?;
    }
    let orphan = client.upload_blob(b"no pin for me".to_vec(), "image/png")?;

    let rec = atpins::reconcile::reconcile(&client, &pds.did)?;
    assert_eq!(rec.pinned, 105);
    assert_eq!(rec.orphans, 1);
    assert!(!rec.blobs_unavailable);
    assert_eq!(rec.entries.len(), 106);

    let last = rec.entries.last().context("entries not empty")?;
    assert_eq!(last.content_id, orphan.content_id);
    assert!(!last.is_pinned());
    assert!(last.filename.is_none());
    Ok(())
}

#[test]
fn missing_blob_listing_degrades_to_pins_only() -> Result<()> {
    let pds = common::spawn_pds_with(&["--disable-list-blobs"])?;
    let client = common::client_for(&pds)?;

    let blob = client.upload_blob(b"pinned".to_vec(), "text/plain")?;
    let record = PinRecord::new(blob, "text/plain", Some("p.txt".into()), Some(6), now_rfc3339());
    client.create_record(&pds.did, COLLECTION, &record)?;
    client.upload_blob(b"orphan".to_vec(), "text/plain")?;

    let err = client
        .list_blobs(&pds.did, None, 10)
        .err()
        .context("listBlobs should fail")?;
    assert!(matches!(
        err,
        PinsError::RemoteCallFailed {
            status: Some(501),
            ..
        }
    ));

    let rec = atpins::reconcile::reconcile(&client, &pds.did)?;
    assert!(rec.blobs_unavailable);
    assert_eq!(rec.pinned, 1);
    assert_eq!(rec.orphans, 0);
    Ok(())
}

#[test]
fn wrong_token_maps_to_not_authenticated() -> Result<()> {
    let pds = common::spawn_pds()?;
    let client =
        atpins::XrpcClient::new(&pds.base_url, "wrong".to_string(), Duration::from_secs(5))?;

    let err = client
        .list_records(&pds.did, COLLECTION, None, 10)
        .err()
        .context("list should fail")?;
    assert!(matches!(err, PinsError::NotAuthenticated));

    let err = atpins::reconcile::reconcile(&client, &pds.did)
        .err()
        .context("reconcile should fail")?;
    assert!(matches!(err, PinsError::NotAuthenticated));
    Ok(())
}

#[test]
fn record_for_unknown_blob_is_rejected() -> Result<()> {
    let pds = common::spawn_pds()?;
    let http = reqwest::blocking::Client::new();

    let resp = http
        .post(format!("{}/xrpc/com.atproto.repo.createRecord", pds.base_url))
        .header(reqwest::header::AUTHORIZATION, common::auth_header(&pds.token))
        .json(&serde_json::json!({
            "repo": pds.did,
            "collection": COLLECTION,
            "record": {
                "$type": COLLECTION,
                "blob": {"$type": "blob", "ref": {"$link": "nope"}, "mimeType": "text/plain", "size": 1},
                "mimeType": "text/plain",
                "createdAt": now_rfc3339(),
            },
        }))
        .send()
        .context("create record")?;
    assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = resp.json().context("parse error body")?;
    assert_eq!(body["error"], "InvalidRequest");
    Ok(())
}

#[test]
fn unknown_record_key_is_a_remote_failure() -> Result<()> {
    let pds = common::spawn_pds()?;
    let client = common::client_for(&pds)?;

    let err = atpins::reconcile::get_pin(&client, &pds.did, "0000000000999")
        .err()
        .context("get should fail")?;
    match err {
        PinsError::RemoteCallFailed { status, message, .. } => {
            assert_eq!(status, Some(400));
            assert!(message.contains("RecordNotFound"), "{}", message);
        }
        other => anyhow::bail!("unexpected error: {}", other),
    }
    Ok(())
}

#[test]
fn blobs_can_be_downloaded_and_probed() -> Result<()> {
    let pds = common::spawn_pds()?;
    let client = common::client_for(&pds)?;

    let bytes = vec![0x47u8; 2048];
    let blob = client.upload_blob(bytes.clone(), "video/mp4")?;

    let content = client.get_blob(&pds.did, &blob.content_id)?;
    assert_eq!(content.bytes, bytes);
    assert_eq!(content.mime_type.as_deref(), Some("video/mp4"));

    let meta = client.probe_blob(&pds.did, &blob.content_id)?;
    assert_eq!(meta.mime_type.as_deref(), Some("video/mp4"));
    assert_eq!(meta.size_bytes, Some(2048));

    let err = client
        .probe_blob(&pds.did, "missing")
        .err()
        .context("probe of unknown blob should fail")?;
    assert!(matches!(
        err,
        PinsError::RemoteCallFailed {
            status: Some(400),
            ..
        }
    ));
    Ok(())
}

#[test]
fn session_probe_classifies_orphans() -> Result<()> {
    let pds = common::spawn_pds()?;
    let client = common::client_for(&pds)?;
    client.upload_blob(vec![1u8; 10], "image/gif")?;

    let mut session = atpins::Session::new(client, pds.did.clone())?;
    session.refresh()?;
    assert_eq!(session.bucket_counts().other, 1);

    let report = session.probe_orphans();
    assert!(report.failures.is_empty());
    assert_eq!(session.bucket_counts().images, 1);
    assert_eq!(session.entries()[0].size_bytes, Some(10));
    Ok(())
}
