use std::collections::{BTreeMap, HashMap};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use clap::Parser;
use tokio::sync::RwLock;

#[path = "atpins_devpds/xrpc_error.rs"]
mod xrpc_error;
use self::xrpc_error::*;
#[path = "atpins_devpds/repo.rs"]
mod repo;
use self::repo::*;
#[path = "atpins_devpds/handlers.rs"]
mod handlers;
use self::handlers::*;
#[path = "atpins_devpds/runtime.rs"]
mod runtime;

#[derive(Parser)]
#[command(name = "atpins-devpds")]
#[command(about = "In-memory PDS subset for developing and testing atpins", long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:2583")]
    addr: SocketAddr,

    /// Write bound address to this file (dev/test convenience)
    #[arg(long)]
    addr_file: Option<PathBuf>,

    /// DID of the single repository served
    #[arg(long, default_value = "did:plc:devpds")]
    did: String,

    /// Bearer token accepted on every XRPC call
    #[arg(long, default_value = "dev")]
    token: String,

    /// Answer com.atproto.sync.listBlobs with 501, like hosts that lack it
    #[arg(long)]
    disable_list_blobs: bool,

    /// Increase log verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

struct AppState {
    did: String,
    token: String,
    list_blobs_enabled: bool,
    repo: RwLock<Repo>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = runtime::run().await {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}
