use super::*;

use atpins::model::AppConfig;

use crate::cli_commands::{ConfigSetArgs, LoginArgs};

pub(super) fn handle_login_command(store: &ConfigStore, args: LoginArgs) -> Result<()> {
    let pds_url = args.pds.trim().trim_end_matches('/').to_string();
    let did = args.did.trim().to_string();
    if pds_url.is_empty() || did.is_empty() {
        anyhow::bail!("--pds and --did must not be empty");
    }
    if args.token.trim().is_empty() {
        anyhow::bail!("--token must not be empty");
    }

    // Keep local preferences across re-logins.
    let mut cfg = match store.read_config()? {
        Some(prev) => AppConfig {
            pds_url,
            did,
            handle: None,
            ..prev
        },
        None => AppConfig::new(pds_url, did),
    };
    cfg.handle = args.handle.filter(|h| !h.trim().is_empty());

    store
        .set_token(&cfg, args.token.trim())
        .context("store access token in state.json")?;
    store.write_config(&cfg)?;
    println!("Logged in as {}", cfg.handle.as_deref().unwrap_or(&cfg.did));
    Ok(())
}

pub(super) fn handle_logout_command(store: &ConfigStore) -> Result<()> {
    let cfg = require_config(store)?;
    if store.clear_token(&cfg).context("clear access token")? {
        println!("Logged out");
    } else {
        println!("No stored token for {}", cfg.did);
    }
    Ok(())
}

pub(super) fn handle_config_show(store: &ConfigStore, json: bool) -> Result<()> {
    let cfg = store.read_config()?;
    if json {
        return print_json(&cfg, "config");
    }
    println!("config_dir: {}", store.root().display());
    let Some(cfg) = cfg else {
        println!("Not logged in");
        return Ok(());
    };
    let has_token = store.get_token(&cfg)?.is_some();
    println!("pds: {}", cfg.pds_url);
    println!("did: {}", cfg.did);
    if let Some(handle) = &cfg.handle {
        println!("handle: {}", handle);
    }
    println!("token: {}", if has_token { "stored" } else { "missing" });
    println!("max_upload_bytes: {}", cfg.max_upload_bytes);
    println!("timeout_secs: {}", cfg.timeout_secs);
    println!("view: {}", cfg.view_mode);
    Ok(())
}

pub(super) fn handle_config_set(store: &ConfigStore, args: ConfigSetArgs) -> Result<()> {
    let mut cfg = require_config(store)?;
    let mut changed = false;
    if let Some(max) = args.max_upload_bytes {
        if max == 0 {
            anyhow::bail!("--max-upload-bytes must be positive");
        }
        cfg.max_upload_bytes = max;
        changed = true;
    }
    if let Some(secs) = args.timeout_secs {
        if secs == 0 {
            anyhow::bail!("--timeout-secs must be positive");
        }
        cfg.timeout_secs = secs;
        changed = true;
    }
    if let Some(mode) = args.view_mode {
        cfg.view_mode = mode;
        changed = true;
    }
    if !changed {
        anyhow::bail!("nothing to set (see `atpins config set --help`)");
    }
    store.write_config(&cfg)?;
    println!("Config updated");
    Ok(())
}
