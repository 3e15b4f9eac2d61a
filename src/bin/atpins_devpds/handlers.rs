use super::*;

const DEFAULT_RECORD_LIMIT: usize = 50;
const MAX_RECORD_LIMIT: usize = 100;
const DEFAULT_BLOB_LIMIT: usize = 500;
const MAX_BLOB_LIMIT: usize = 1000;

pub(super) async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"version": env!("CARGO_PKG_VERSION")}))
}

pub(super) async fn require_bearer(
    State(state): State<Arc<AppState>>,
    req: axum::extract::Request,
    next: Next,
) -> Response {
    let presented = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    if presented != Some(state.token.as_str()) {
        return XrpcError::authentication_required().into_response();
    }
    next.run(req).await
}

fn check_repo(state: &AppState, repo: &str) -> XrpcResult<()> {
    if repo == state.did {
        Ok(())
    } else {
        Err(XrpcError::repo_not_found(repo))
    }
}

fn clamp_limit(limit: Option<usize>, default: usize, max: usize) -> usize {
    limit.unwrap_or(default).clamp(1, max)
}

fn record_uri(state: &AppState, collection: &str, rkey: &str) -> String {
    format!("at://{}/{}/{}", state.did, collection, rkey)
}

#[derive(Debug, serde::Deserialize)]
pub(super) struct ListRecordsQuery {
    repo: String,
    collection: String,
    limit: Option<usize>,
    cursor: Option<String>,
}

pub(super) async fn list_records(
    State(state): State<Arc<AppState>>,
    Query(q): Query<ListRecordsQuery>,
) -> XrpcResult<Json<serde_json::Value>> {
    check_repo(&state, &q.repo)?;
    let limit = clamp_limit(q.limit, DEFAULT_RECORD_LIMIT, MAX_RECORD_LIMIT);
    let page = {
        let repo = state.repo.read().await;
        repo.list_records(&q.collection, limit, q.cursor.as_deref())
    };
    let records: Vec<serde_json::Value> = page
        .items
        .into_iter()
        .map(|(rkey, rec)| {
            serde_json::json!({
                "uri": record_uri(&state, &q.collection, &rkey),
                "cid": rec.cid,
                "value": rec.value,
            })
        })
        .collect();
    let mut body = serde_json::json!({"records": records});
    if let Some(cursor) = page.cursor {
        body["cursor"] = serde_json::Value::String(cursor);
    }
    Ok(Json(body))
}

#[derive(Debug, serde::Deserialize)]
pub(super) struct GetRecordQuery {
    repo: String,
    collection: String,
    rkey: String,
}

pub(super) async fn get_record(
    State(state): State<Arc<AppState>>,
    Query(q): Query<GetRecordQuery>,
) -> XrpcResult<Json<serde_json::Value>> {
    check_repo(&state, &q.repo)?;
    let repo = state.repo.read().await;
    let rec = repo
        .get_record(&q.collection, &q.rkey)
        .ok_or_else(|| XrpcError::record_not_found(&q.rkey))?;
    Ok(Json(serde_json::json!({
        "uri": record_uri(&state, &q.collection, &q.rkey),
        "cid": rec.cid,
        "value": rec.value,
    })))
}

#[derive(Debug, serde::Deserialize)]
pub(super) struct CreateRecordRequest {
    repo: String,
    collection: String,
    record: serde_json::Value,
}

pub(super) async fn create_record(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateRecordRequest>,
) -> XrpcResult<Json<serde_json::Value>> {
    check_repo(&state, &req.repo)?;
    if req.collection.trim().is_empty() {
        return Err(XrpcError::invalid_request("collection is required"));
    }
    let (rkey, cid) = {
        let mut repo = state.repo.write().await;
        repo.create_record(&req.collection, req.record)?
    };
    log::info!("created {}/{}", req.collection, rkey);
    Ok(Json(serde_json::json!({
        "uri": record_uri(&state, &req.collection, &rkey),
        "cid": cid,
    })))
}

#[derive(Debug, serde::Deserialize)]
pub(super) struct DeleteRecordRequest {
    repo: String,
    collection: String,
    rkey: String,
}

pub(super) async fn delete_record(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DeleteRecordRequest>,
) -> XrpcResult<Json<serde_json::Value>> {
    check_repo(&state, &req.repo)?;
    let removed = state
        .repo
        .write()
        .await
        .delete_record(&req.collection, &req.rkey);
    log::info!(
        "delete {}/{} ({})",
        req.collection,
        req.rkey,
        if removed { "removed" } else { "absent" }
    );
    Ok(Json(serde_json::json!({})))
}

#[derive(Debug, serde::Deserialize)]
pub(super) struct ListBlobsQuery {
    did: String,
    limit: Option<usize>,
    cursor: Option<String>,
}

pub(super) async fn list_blobs(
    State(state): State<Arc<AppState>>,
    Query(q): Query<ListBlobsQuery>,
) -> XrpcResult<Json<serde_json::Value>> {
    if !state.list_blobs_enabled {
        return Err(XrpcError::not_implemented("com.atproto.sync.listBlobs"));
    }
    check_repo(&state, &q.did)?;
    let limit = clamp_limit(q.limit, DEFAULT_BLOB_LIMIT, MAX_BLOB_LIMIT);
    let page = state.repo.read().await.list_blobs(limit, q.cursor.as_deref());
    let mut body = serde_json::json!({"cids": page.items});
    if let Some(cursor) = page.cursor {
        body["cursor"] = serde_json::Value::String(cursor);
    }
    Ok(Json(body))
}

#[derive(Debug, serde::Deserialize)]
pub(super) struct GetBlobQuery {
    did: String,
    cid: String,
}

/// Also answers HEAD: axum drops the body and the headers stay.
pub(super) async fn get_blob(
    State(state): State<Arc<AppState>>,
    Query(q): Query<GetBlobQuery>,
) -> XrpcResult<Response> {
    check_repo(&state, &q.did)?;
    let repo = state.repo.read().await;
    let blob = repo
        .get_blob(&q.cid)
        .ok_or_else(|| XrpcError::blob_not_found(&q.cid))?;
    Ok((
        [
            (header::CONTENT_TYPE, blob.mime_type.clone()),
            (header::CONTENT_LENGTH, blob.size.to_string()),
        ],
        blob.bytes.clone(),
    )
        .into_response())
}

pub(super) async fn upload_blob(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> XrpcResult<Json<serde_json::Value>> {
    let mime_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.trim().is_empty())
        .unwrap_or("application/octet-stream");
    let blob = state.repo.write().await.put_blob(&body, mime_type);
    log::info!("stored blob {} ({} bytes)", blob["ref"]["$link"], body.len());
    Ok(Json(serde_json::json!({"blob": blob})))
}
