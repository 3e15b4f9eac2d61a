use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use atpins::model::AppConfig;
use atpins::store::ConfigStore;
use atpins::{Session, XrpcClient};

use crate::Commands;

#[derive(Parser)]
#[command(name = "atpins")]
#[command(about = "Manage files pinned in an AT Protocol repository", long_about = None)]
pub(crate) struct Cli {
    /// Config directory (defaults to $ATPINS_HOME or the platform config dir)
    #[arg(long, global = true, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

pub(crate) fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let root = match cli.config_dir {
        Some(dir) => dir,
        None => ConfigStore::default_root()?,
    };
    let store = ConfigStore::open(&root)?;
    crate::cli_exec::handle_command(&store, cli.command)
}

// RUST_LOG, when set, takes precedence over -v.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

pub(crate) fn require_config(store: &ConfigStore) -> Result<AppConfig> {
    store
        .read_config()?
        .context("not logged in (run `atpins login --pds ... --did ... --token ...`)")
}

pub(crate) fn require_session(store: &ConfigStore) -> Result<(AppConfig, Session<XrpcClient>)> {
    let cfg = require_config(store)?;
    let token = store.get_token(&cfg)?.context(
        "no access token stored (run `atpins login --pds ... --did ... --token ...`)",
    )?;
    let client = XrpcClient::new(&cfg.pds_url, token, Duration::from_secs(cfg.timeout_secs))?;
    let session = Session::new(client, cfg.did.clone())?.with_max_upload_bytes(cfg.max_upload_bytes);
    Ok((cfg, session))
}
