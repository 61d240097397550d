//! Ledgr CLI - cached reads against the Ledgr API
//!
//! # Commands
//! - `ledgr invoices [--force]` - list invoices (cached 30s)
//! - `ledgr templates` - list invoice templates (cached 60s)
//! - `ledgr pdf <id> [out]` - download an invoice PDF

use std::env;
use std::sync::Arc;

use anyhow::{bail, Context};
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ledgr::cache::{DurableBackend, DurableCache, FileBackend, MemoryBackend, VolatileCache};
use ledgr::client::{ApiClient, CacheTtls, LedgrClient, PdfDisposition};
use ledgr::Config;

const USAGE: &str = "usage: ledgr <invoices [--force] | templates | pdf <id> [out]>";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ledgr=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: api_url={}, cache_dir={:?}, list_ttl={}ms, blob_ttl={}ms",
        config.api_url, config.cache_dir, config.list_ttl_ms, config.blob_ttl_ms
    );

    let client = build_client(&config);
    let args: Vec<String> = env::args().skip(1).collect();

    match args.first().map(String::as_str) {
        Some("invoices") => {
            let force = args.iter().any(|a| a == "--force");
            let invoices = client.invoices(force).await?;
            println!("{}", serde_json::to_string_pretty(&invoices)?);
        }
        Some("templates") => {
            let templates = client.templates().await?;
            println!("{}", serde_json::to_string_pretty(&templates)?);
        }
        Some("pdf") => {
            let id = args.get(1).context(USAGE)?;
            let pdf = client.invoice_pdf(id, PdfDisposition::Download).await?;
            let out = args
                .get(2)
                .cloned()
                .or_else(|| pdf.filename.clone())
                .unwrap_or_else(|| format!("invoice-{}.pdf", id));
            tokio::fs::write(&out, &pdf.blob)
                .await
                .with_context(|| format!("writing {}", out))?;
            info!("Saved {} ({} bytes)", out, pdf.blob.len());
        }
        _ => bail!(USAGE),
    }

    debug!("Durable cache stats: {:?}", client.durable().stats());
    Ok(())
}

/// Wires the client to a file-backed durable cache, or to memory when no
/// cache directory is configured or it cannot be opened.
fn build_client(config: &Config) -> LedgrClient {
    let backend: Box<dyn DurableBackend> = match &config.cache_dir {
        Some(dir) => match FileBackend::open(dir, Some(config.cache_quota)) {
            Ok(file) => {
                info!("Durable cache at {}", file.path().display());
                Box::new(file)
            }
            Err(e) => {
                warn!("Durable cache unavailable ({}), using memory", e);
                Box::new(MemoryBackend::new())
            }
        },
        None => Box::new(MemoryBackend::new()),
    };

    LedgrClient::new(
        ApiClient::from_config(config),
        Arc::new(DurableCache::new(backend)),
        Arc::new(VolatileCache::new()),
        CacheTtls::from(config),
    )
}
