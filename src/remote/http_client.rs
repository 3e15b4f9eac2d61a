use super::*;

/// Best-effort retry for idempotent reads. Only transient remote failures are
/// retried; an authentication failure returns immediately.
pub(super) fn with_retries<T>(label: &str, mut f: impl FnMut() -> Result<T>) -> Result<T> {
    const ATTEMPTS: usize = 3;
    let mut last: Option<PinsError> = None;
    for i in 0..ATTEMPTS {
        match f() {
            Ok(v) => return Ok(v),
            Err(err) if err.is_retryable() => {
                log::debug!("{} attempt {} failed: {}", label, i + 1, err);
                last = Some(err);
                if i + 1 < ATTEMPTS {
                    std::thread::sleep(Duration::from_millis(200 * (1 << i)));
                }
            }
            Err(err) => return Err(err),
        }
    }
    Err(last.unwrap_or_else(|| PinsError::remote("retry", format!("{}: unknown error", label))))
}

impl XrpcClient {
    pub(super) fn ensure_ok(
        &self,
        resp: reqwest::blocking::Response,
        call: &'static str,
    ) -> Result<reqwest::blocking::Response> {
        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(PinsError::NotAuthenticated);
        }
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().unwrap_or_default();
        let message = match serde_json::from_str::<XrpcErrorBody>(&body) {
            Ok(err) => match err.message {
                Some(message) => format!("{} {}: {}", status.as_u16(), err.error, message),
                None => format!("{} {}", status.as_u16(), err.error),
            },
            Err(_) if body.trim().is_empty() => status.to_string(),
            Err(_) => format!("{}: {}", status.as_u16(), body.trim()),
        };
        Err(PinsError::remote_status(call, status.as_u16(), message))
    }

    pub(super) fn auth(&self) -> String {
        format!("Bearer {}", self.token)
    }

    pub(super) fn url(&self, method: &str) -> String {
        format!("{}/xrpc/{}", self.pds_url, method)
    }
}

/// Decodes a successful response body. A body that does not parse keeps the
/// response status so it is not retried.
pub(super) fn parse_json<T: serde::de::DeserializeOwned>(
    resp: reqwest::blocking::Response,
    call: &'static str,
) -> Result<T> {
    let status = resp.status().as_u16();
    resp.json::<T>()
        .map_err(|e| PinsError::remote_status(call, status, format!("parse response: {}", e)))
}

pub(super) fn send_error(call: &'static str) -> impl FnOnce(reqwest::Error) -> PinsError {
    move |err| PinsError::remote(call, err)
}

#[cfg(test)]
#[path = "../tests/remote/http_client_tests.rs"]
mod tests;
