use super::*;

use atpins::format::BlobLinks;

use crate::cli_commands::{LsArgs, ShowArgs};

#[derive(serde::Serialize)]
struct ListingJson<'a> {
    filter: atpins::model::FilterType,
    sort: atpins::model::SortKey,
    search: &'a str,
    counts: atpins::view::BucketCounts,
    stats: atpins::session::RefreshStats,
    entries: &'a [atpins::model::FileEntry],
}

pub(super) fn handle_ls_command(store: &ConfigStore, args: LsArgs) -> Result<()> {
    let (mut cfg, mut session) = require_session(store)?;
    session.set_filter(args.view.filter);
    session.set_search(args.view.search.unwrap_or_default());
    session.set_sort(args.sort);

    let view_mode = args.view_mode.unwrap_or(cfg.view_mode);
    session.set_view_mode(view_mode);
    if args.view_mode.is_some_and(|m| m != cfg.view_mode) {
        cfg.view_mode = view_mode;
        store.write_config(&cfg).context("remember view mode")?;
    }

    session.refresh()?;
    if args.probe {
        let report = session.probe_orphans();
        if !report.failures.is_empty() {
            eprintln!(
                "warning: could not probe {} orphan blobs",
                report.failures.len()
            );
        }
    }
    let visible = session.visible();
    let counts = session.bucket_counts();
    let stats = session.stats();

    if args.json {
        return print_json(
            &ListingJson {
                filter: session.view_state().filter,
                sort: session.view_state().sort,
                search: &session.view_state().search_query,
                counts,
                stats,
                entries: &visible,
            },
            "listing",
        );
    }

    println!("{}", render::counts_line(&counts, session.view_state().filter));
    if stats.blobs_unavailable {
        println!("(blob listing unavailable; showing pinned files only)");
    }
    if stats.malformed > 0 {
        println!("({} malformed pin records skipped)", stats.malformed);
    }
    if visible.is_empty() {
        println!("No files");
        return Ok(());
    }
    let lines = match view_mode {
        atpins::model::ViewMode::Grid => render::grid(&visible, render::terminal_width()),
        atpins::model::ViewMode::List => render::list(&visible),
    };
    for line in lines {
        println!("{}", line);
    }
    Ok(())
}

#[derive(serde::Serialize)]
struct PinJson<'a> {
    #[serde(flatten)]
    entry: &'a atpins::model::FileEntry,
    links: BlobLinks,
    previewable: bool,
}

pub(super) fn handle_show_command(store: &ConfigStore, args: ShowArgs) -> Result<()> {
    let (cfg, session) = require_session(store)?;
    let entry = session
        .get_pin(&args.record_key)
        .with_context(|| format!("get pin {}", args.record_key))?;
    let links = BlobLinks::new(&cfg.pds_url, &cfg.did, &entry.content_id);
    let previewable = atpins::format::is_previewable(entry.mime_type.as_deref());

    if args.json {
        return print_json(
            &PinJson {
                entry: &entry,
                links,
                previewable,
            },
            "pin",
        );
    }
    for line in render::details(&entry, &links, previewable) {
        println!("{}", line);
    }
    Ok(())
}
