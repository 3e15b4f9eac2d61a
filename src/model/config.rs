use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::ViewMode;

/// Largest file accepted for upload, in bytes.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 1_000_000;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

fn default_max_upload_bytes() -> u64 {
    DEFAULT_MAX_UPLOAD_BYTES
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    pub version: u32,

    pub pds_url: String,
    pub did: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,

    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Last grid/list choice, remembered between runs.
    #[serde(default)]
    pub view_mode: ViewMode,
}

impl AppConfig {
    pub fn new(pds_url: impl Into<String>, did: impl Into<String>) -> Self {
        Self {
            version: 1,
            pds_url: pds_url.into(),
            did: did.into(),
            handle: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            view_mode: ViewMode::default(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppState {
    pub version: u32,

    // Access tokens live here rather than in config.json.
    #[serde(default)]
    pub session_tokens: HashMap<String, String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            version: 1,
            session_tokens: HashMap::new(),
        }
    }
}
