//! Sequential batch upload: blob first, then the pin record that names it.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::format::infer_mime_type;
use crate::model::{DEFAULT_MAX_UPLOAD_BYTES, PinRecord, now_rfc3339};
use crate::remote::RepoClient;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum UploadStatus {
    Pending,
    Uploading,
    CreatingRecord,
    Succeeded,
    Failed,
}

impl UploadStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            UploadStatus::Pending => "pending",
            UploadStatus::Uploading => "uploading",
            UploadStatus::CreatingRecord => "creating-record",
            UploadStatus::Succeeded => "succeeded",
            UploadStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, UploadStatus::Succeeded | UploadStatus::Failed)
    }
}

impl std::fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug)]
enum UploadSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

/// A local file queued for upload. Content is read only when its turn comes.
#[derive(Clone, Debug)]
pub struct UploadFile {
    pub name: String,
    pub size_bytes: u64,
    /// Inferred from the name when absent.
    pub mime_type: Option<String>,
    source: UploadSource,
}

impl UploadFile {
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let meta = std::fs::metadata(path)?;
        if !meta.is_file() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("not a regular file: {}", path.display()),
            ));
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self {
            name,
            size_bytes: meta.len(),
            mime_type: None,
            source: UploadSource::Path(path.to_path_buf()),
        })
    }

    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            size_bytes: bytes.len() as u64,
            mime_type: None,
            source: UploadSource::Bytes(bytes),
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        let mime_type = mime_type.into();
        self.mime_type = (!mime_type.trim().is_empty()).then_some(mime_type);
        self
    }

    fn resolved_mime_type(&self) -> String {
        self.mime_type
            .clone()
            .unwrap_or_else(|| infer_mime_type(&self.name))
    }

    fn read(&self) -> std::io::Result<Vec<u8>> {
        match &self.source {
            UploadSource::Path(path) => std::fs::read(path),
            UploadSource::Bytes(bytes) => Ok(bytes.clone()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UploadTask {
    pub file_name: String,
    pub size_bytes: u64,
    pub mime_type: String,
    pub status: UploadStatus,
    pub progress_percent: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadTask {
    fn new(file: &UploadFile) -> Self {
        Self {
            file_name: file.name.clone(),
            size_bytes: file.size_bytes,
            mime_type: file.resolved_mime_type(),
            status: UploadStatus::Pending,
            progress_percent: 0,
            content_id: None,
            record_key: None,
            error: None,
        }
    }

    fn advance(&mut self, status: UploadStatus, progress_percent: u8) {
        self.status = status;
        self.progress_percent = progress_percent;
    }

    fn fail(&mut self, error: impl Into<String>) {
        self.status = UploadStatus::Failed;
        self.error = Some(error.into());
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UploadLimits {
    pub max_upload_bytes: u64,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

/// Receives `(index, task)` after every status change.
pub type UploadObserver<'a> = dyn FnMut(usize, &UploadTask) + 'a;

/// Uploads `files` one at a time. A failed file is recorded on its task and
/// the batch moves on; the returned tasks are in input order.
pub fn upload_all<R: RepoClient + ?Sized>(
    client: &R,
    owner: &str,
    files: &[UploadFile],
    limits: UploadLimits,
    observer: &mut UploadObserver<'_>,
) -> Vec<UploadTask> {
    let mut tasks: Vec<UploadTask> = files.iter().map(UploadTask::new).collect();
    for (index, task) in tasks.iter().enumerate() {
        observer(index, task);
    }

    for (index, (file, task)) in files.iter().zip(tasks.iter_mut()).enumerate() {
        let mut notify = |t: &UploadTask| observer(index, t);
        upload_one(client, owner, file, limits, task, &mut notify);
        if task.status == UploadStatus::Failed {
            log::warn!(
                "upload of {} failed: {}",
                task.file_name,
                task.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    let succeeded = tasks
        .iter()
        .filter(|t| t.status == UploadStatus::Succeeded)
        .count();
    log::debug!("upload batch done: {}/{} succeeded", succeeded, tasks.len());
    tasks
}

fn upload_one<R: RepoClient + ?Sized>(
    client: &R,
    owner: &str,
    file: &UploadFile,
    limits: UploadLimits,
    task: &mut UploadTask,
    notify: &mut dyn FnMut(&UploadTask),
) {
    if file.size_bytes > limits.max_upload_bytes {
        task.fail(too_large(file.size_bytes, limits));
        notify(task);
        return;
    }

    task.advance(UploadStatus::Uploading, 30);
    notify(task);

    let bytes = match file.read() {
        Ok(bytes) => bytes,
        Err(err) => {
            task.fail(format!("read {}: {}", file.name, err));
            notify(task);
            return;
        }
    };
    // The file may have changed since it was queued.
    let size = bytes.len() as u64;
    task.size_bytes = size;
    if size > limits.max_upload_bytes {
        task.fail(too_large(size, limits));
        notify(task);
        return;
    }

    let blob = match client.upload_blob(bytes, &task.mime_type) {
        Ok(blob) => blob,
        Err(err) => {
            task.fail(err.to_string());
            notify(task);
            return;
        }
    };
    task.content_id = Some(blob.content_id.clone());
    task.advance(UploadStatus::CreatingRecord, 90);
    notify(task);

    let record = PinRecord::new(
        blob,
        &task.mime_type,
        Some(file.name.clone()),
        Some(size),
        now_rfc3339(),
    );
    match client.create_record(owner, crate::model::COLLECTION, &record) {
        Ok(created) => {
            task.record_key = created.record_key().map(str::to_string);
            task.advance(UploadStatus::Succeeded, 100);
        }
        Err(err) => task.fail(err.to_string()),
    }
    notify(task);
}

fn too_large(size: u64, limits: UploadLimits) -> String {
    format!(
        "too large: {} bytes exceeds the {} byte limit",
        size, limits.max_upload_bytes
    )
}

#[cfg(test)]
#[path = "tests/upload_tests.rs"]
mod tests;
