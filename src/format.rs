//! Display helpers shared by the CLI and host UIs.

use serde::Serialize;

const CDN_BASE: &str = "https://cdn.bsky.app/img";

pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 B".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = format!("{:.1}", value);
    let rounded = rounded.strip_suffix(".0").unwrap_or(&rounded);
    format!("{} {}", rounded, UNITS[unit])
}

/// Shortens long content ids to `first8...last6`.
pub fn truncate_cid(cid: &str) -> String {
    let chars: Vec<char> = cid.chars().collect();
    if chars.len() <= 17 {
        return cid.to_string();
    }
    let head: String = chars[..8].iter().collect();
    let tail: String = chars[chars.len() - 6..].iter().collect();
    format!("{}...{}", head, tail)
}

pub fn infer_mime_type(filename: &str) -> String {
    mime_guess::from_path(filename)
        .first()
        .map(|m| m.essence_str().to_string())
        .unwrap_or_else(|| "application/octet-stream".to_string())
}

pub fn is_previewable(mime_type: Option<&str>) -> bool {
    let Some(mime) = mime_type else {
        return false;
    };
    let mime = mime.to_ascii_lowercase();
    ["image/", "video/", "audio/", "text/"]
        .iter()
        .any(|p| mime.starts_with(p))
        || mime.contains("json")
        || mime.contains("javascript")
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BlobLinks {
    /// `com.atproto.sync.getBlob` on the owner's PDS.
    pub raw: String,
    pub thumbnail: String,
    pub fullsize: String,
}

impl BlobLinks {
    pub fn new(pds_url: &str, did: &str, content_id: &str) -> Self {
        let endpoint = format!(
            "{}/xrpc/com.atproto.sync.getBlob",
            pds_url.trim_end_matches('/')
        );
        let raw = reqwest::Url::parse_with_params(&endpoint, &[("did", did), ("cid", content_id)])
            .map(String::from)
            .unwrap_or_else(|_| format!("{}?did={}&cid={}", endpoint, did, content_id));
        let cdn = |size: &str| format!("{}/{}/plain/{}/{}@jpeg", CDN_BASE, size, did, content_id);
        Self {
            raw,
            thumbnail: cdn("feed_thumbnail"),
            fullsize: cdn("feed_fullsize"),
        }
    }
}

#[cfg(test)]
#[path = "tests/format_tests.rs"]
mod tests;
