use super::*;

/// XRPC failure rendered as `{error, message}` with a non-2xx status.
#[derive(Debug)]
pub(super) struct XrpcError {
    status: StatusCode,
    error: &'static str,
    message: String,
}

impl XrpcError {
    pub(super) fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: "InvalidRequest",
            message: message.into(),
        }
    }

    pub(super) fn record_not_found(rkey: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: "RecordNotFound",
            message: format!("Could not locate record: {}", rkey),
        }
    }

    pub(super) fn blob_not_found(cid: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: "BlobNotFound",
            message: format!("Blob not found: {}", cid),
        }
    }

    pub(super) fn repo_not_found(repo: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: "RepoNotFound",
            message: format!("Could not find repo: {}", repo),
        }
    }

    pub(super) fn authentication_required() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            error: "AuthenticationRequired",
            message: "Authentication Required".to_string(),
        }
    }

    pub(super) fn not_implemented(method: &str) -> Self {
        Self {
            status: StatusCode::NOT_IMPLEMENTED,
            error: "MethodNotImplemented",
            message: format!("Method Not Implemented: {}", method),
        }
    }
}

impl IntoResponse for XrpcError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({"error": self.error, "message": self.message})),
        )
            .into_response()
    }
}

pub(super) type XrpcResult<T> = std::result::Result<T, XrpcError>;
