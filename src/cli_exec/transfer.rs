use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};

use super::*;

use atpins::format::{format_bytes, truncate_cid};
use atpins::model::FileEntry;
use atpins::selection::SelectedEntry;
use atpins::upload::{UploadFile, UploadStatus, UploadTask};

use crate::cli_commands::{GetArgs, RmArgs, UploadArgs};

#[derive(serde::Serialize)]
struct UploadJson<'a> {
    tasks: &'a [UploadTask],
    succeeded: usize,
    failed: usize,
    total_entries: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    refresh_error: Option<String>,
}

pub(super) fn handle_upload_command(store: &ConfigStore, args: UploadArgs) -> Result<()> {
    let (_cfg, mut session) = require_session(store)?;

    let mut files = Vec::with_capacity(args.files.len());
    for path in &args.files {
        let mut file =
            UploadFile::from_path(path).with_context(|| format!("open {}", path.display()))?;
        if let Some(mime) = &args.mime {
            file = file.with_mime_type(mime.clone());
        }
        files.push(file);
    }

    let total = files.len();
    let quiet = args.json;
    let batch = session.upload_all(&files, &mut |index, task| {
        if quiet || task.status == UploadStatus::Pending {
            return;
        }
        let prefix = format!("[{}/{}] {}", index + 1, total, task.file_name);
        if !task.status.is_terminal() {
            println!("{}: {} {}%", prefix, task.status, task.progress_percent);
        } else if task.status == UploadStatus::Failed {
            eprintln!(
                "{}: failed: {}",
                prefix,
                task.error.as_deref().unwrap_or("unknown error")
            );
        } else {
            println!(
                "{}: done ({})",
                prefix,
                task.content_id.as_deref().unwrap_or("-")
            );
        }
    });

    let succeeded = batch
        .tasks
        .iter()
        .filter(|t| t.status == UploadStatus::Succeeded)
        .count();
    let failed = batch.tasks.len() - succeeded;

    if args.json {
        print_json(
            &UploadJson {
                tasks: &batch.tasks,
                succeeded,
                failed,
                total_entries: session.entries().len(),
                refresh_error: batch.refresh_error.as_ref().map(|e| e.to_string()),
            },
            "upload",
        )?;
    } else {
        let bytes: u64 = batch
            .tasks
            .iter()
            .filter(|t| t.status == UploadStatus::Succeeded)
            .map(|t| t.size_bytes)
            .sum();
        println!(
            "Uploaded {} of {} files ({})",
            succeeded,
            batch.tasks.len(),
            format_bytes(bytes)
        );
        match &batch.refresh_error {
            Some(err) => eprintln!("warning: refresh after upload failed: {}", err),
            None => println!("{} files in repository", session.entries().len()),
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} uploads failed", failed, batch.tasks.len());
    }
    Ok(())
}

pub(super) fn handle_get_command(store: &ConfigStore, args: GetArgs) -> Result<()> {
    let (_cfg, mut session) = require_session(store)?;
    let blob = session
        .fetch_blob(&args.content_id)
        .with_context(|| format!("fetch blob {}", args.content_id))?;

    let target = match args.output {
        Some(path) => path,
        None => {
            if let Err(err) = session.refresh() {
                log::warn!("could not look up a filename: {}", err);
            }
            PathBuf::from(default_file_name(session.entries(), &args.content_id))
        }
    };

    if target.as_os_str() == "-" {
        let mut out = std::io::stdout().lock();
        out.write_all(&blob.bytes).context("write blob to stdout")?;
        out.flush().context("flush stdout")?;
        return Ok(());
    }
    if target.exists() && !args.force {
        anyhow::bail!(
            "{} already exists (pass --force to overwrite)",
            target.display()
        );
    }
    std::fs::write(&target, &blob.bytes)
        .with_context(|| format!("write {}", target.display()))?;
    println!(
        "Saved {} ({}) to {}",
        truncate_cid(&args.content_id),
        format_bytes(blob.bytes.len() as u64),
        target.display()
    );
    Ok(())
}

/// The pinned filename stripped of directories, else the content id.
fn default_file_name(entries: &[FileEntry], content_id: &str) -> String {
    entries
        .iter()
        .find(|e| e.content_id == content_id)
        .and_then(|e| e.filename.as_deref())
        .and_then(|name| Path::new(name).file_name())
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| content_id.to_string())
}

#[derive(serde::Serialize)]
struct RmJson<'a> {
    deleted: &'a [String],
    failures: &'a [atpins::delete::DeleteFailure],
    #[serde(skip_serializing_if = "Option::is_none")]
    refresh_error: Option<String>,
}

pub(super) fn handle_rm_command(store: &ConfigStore, args: RmArgs) -> Result<()> {
    if args.content_ids.is_empty() && !args.all {
        anyhow::bail!("give content ids to delete, or --all with --filter/--search");
    }
    let (_cfg, mut session) = require_session(store)?;
    session.refresh()?;

    session.enter_selection();
    for cid in &args.content_ids {
        if session.selection().contains(cid) {
            continue;
        }
        session
            .toggle(cid)
            .with_context(|| format!("select {}", cid))?;
    }
    if args.all {
        session.set_filter(args.view.filter);
        session.set_search(args.view.search.clone().unwrap_or_default());
        session.select_all_visible()?;
    }

    let targets = session.selection().snapshot();
    if targets.is_empty() {
        println!("No pinned files matched");
        return Ok(());
    }
    let confirmed = args.yes || confirm_delete(&targets)?;

    let Some(outcome) = session.delete_selected(|_| confirmed)? else {
        println!("Aborted");
        return Ok(());
    };
    let summary = outcome.report.summary();

    if args.json {
        print_json(
            &RmJson {
                deleted: &outcome.report.deleted,
                failures: &outcome.report.failures,
                refresh_error: outcome.refresh_error.as_ref().map(|e| e.to_string()),
            },
            "rm",
        )?;
    } else {
        for failure in &outcome.report.failures {
            eprintln!("{}: {}", failure.content_id, failure.error);
        }
        println!(
            "Deleted {} pins, {} failed",
            summary.succeeded, summary.failed
        );
        if let Some(err) = &outcome.refresh_error {
            eprintln!("warning: refresh after delete failed: {}", err);
        }
    }

    if summary.failed > 0 {
        anyhow::bail!("{} deletes failed", summary.failed);
    }
    Ok(())
}

fn confirm_delete(targets: &[SelectedEntry]) -> Result<bool> {
    if !std::io::stdin().is_terminal() {
        anyhow::bail!("refusing to delete without confirmation (pass --yes)");
    }
    for t in targets {
        let size = t.size_bytes.map(format_bytes).unwrap_or_else(|| "-".into());
        println!(
            "  {}  {}  {}",
            t.filename.as_deref().unwrap_or(&t.content_id),
            size,
            t.record_key
        );
    }
    dialoguer::Confirm::new()
        .with_prompt(format!("Delete {} pin records?", targets.len()))
        .default(false)
        .interact()
        .context("read confirmation")
}

#[cfg(test)]
#[path = "../tests/cli_exec/transfer_tests.rs"]
mod tests;
