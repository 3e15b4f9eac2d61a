use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

pub const DID: &str = "did:plc:testowner";

pub struct PdsGuard {
    pub base_url: String,
    pub token: String,
    pub did: String,
    _dir: tempfile::TempDir,
    child: Child,
}

impl Drop for PdsGuard {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

#[allow(dead_code)]
pub fn spawn_pds() -> Result<PdsGuard> {
    spawn_pds_with(&[])
}

pub fn spawn_pds_with(extra_args: &[&str]) -> Result<PdsGuard> {
    let dir = tempfile::tempdir().context("create pds tempdir")?;
    let token = "test-token".to_string();
    let addr_file = dir.path().join("addr.txt");

    let child = Command::new(env!("CARGO_BIN_EXE_atpins-devpds"))
        .args([
            "--addr",
            "127.0.0.1:0",
            "--addr-file",
            addr_file.to_str().context("addr file path")?,
            "--did",
            DID,
            "--token",
            &token,
        ])
        .args(extra_args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .context("spawn atpins-devpds")?;

    let base_url = read_addr_file(&addr_file)?;
    wait_for_health(&base_url)?;

    Ok(PdsGuard {
        base_url,
        token,
        did: DID.to_string(),
        _dir: dir,
        child,
    })
}

fn read_addr_file(addr_file: &std::path::Path) -> Result<String> {
    let start = Instant::now();
    loop {
        if start.elapsed() > Duration::from_secs(5) {
            anyhow::bail!("addr file not written at {}", addr_file.display());
        }

        if let Ok(s) = std::fs::read_to_string(addr_file) {
            let s = s.trim();
            if !s.is_empty() {
                return Ok(format!("http://{}", s));
            }
        }
        thread::sleep(Duration::from_millis(10));
    }
}

fn wait_for_health(base_url: &str) -> Result<()> {
    let client = reqwest::blocking::Client::new();
    let start = Instant::now();
    loop {
        if start.elapsed() > Duration::from_secs(5) {
            anyhow::bail!("pds did not become healthy at {}/xrpc/_health", base_url);
        }
        match client.get(format!("{}/xrpc/_health", base_url)).send() {
            Ok(resp) if resp.status().is_success() => return Ok(()),
            _ => thread::sleep(Duration::from_millis(50)),
        }
    }
}

#[allow(dead_code)]
pub fn client_for(pds: &PdsGuard) -> Result<atpins::XrpcClient> {
    atpins::XrpcClient::new(&pds.base_url, pds.token.clone(), Duration::from_secs(10))
        .context("build xrpc client")
}

#[allow(dead_code)]
pub fn auth_header(token: &str) -> String {
    format!("Bearer {}", token)
}
