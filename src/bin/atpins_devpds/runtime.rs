use super::*;

// Large enough for any upload the CLI would accept after raising its limit.
const MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

pub(super) async fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if args.token.trim().is_empty() {
        anyhow::bail!("--token must not be empty");
    }

    let state = Arc::new(AppState {
        did: args.did.clone(),
        token: args.token.clone(),
        list_blobs_enabled: !args.disable_list_blobs,
        repo: RwLock::new(Repo::default()),
    });
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("bind {}", args.addr))?;

    let local_addr = listener.local_addr().context("read listener local addr")?;
    log::info!("serving {} on {}", args.did, local_addr);
    eprintln!("atpins-devpds listening on {}", local_addr);

    if let Some(addr_file) = &args.addr_file {
        std::fs::write(addr_file, local_addr.to_string())
            .with_context(|| format!("write addr file {}", addr_file.display()))?;
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    let authed = Router::new()
        .route("/xrpc/com.atproto.repo.listRecords", get(list_records))
        .route("/xrpc/com.atproto.repo.getRecord", get(get_record))
        .route("/xrpc/com.atproto.repo.createRecord", post(create_record))
        .route("/xrpc/com.atproto.repo.deleteRecord", post(delete_record))
        .route("/xrpc/com.atproto.repo.uploadBlob", post(upload_blob))
        .route("/xrpc/com.atproto.sync.listBlobs", get(list_blobs))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_bearer,
        ));

    Router::new()
        .route("/xrpc/_health", get(health))
        // Blob reads are public on a PDS.
        .route("/xrpc/com.atproto.sync.getBlob", get(get_blob))
        .merge(authed)
        .layer(axum::extract::DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
