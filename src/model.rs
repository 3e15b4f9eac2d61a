mod blob_ref;
mod config;
mod entry;
mod pin;
mod view_params;

pub use self::blob_ref::{BlobRef, content_id_of};
pub use self::config::{AppConfig, AppState, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_TIMEOUT_SECS};
pub use self::entry::FileEntry;
pub use self::pin::{COLLECTION, PinRecord, now_rfc3339, record_key_from_uri};
pub use self::view_params::{Bucket, FilterType, SortKey, ViewMode};
