//! SignGate Server - signed-URL gateway in front of a filesystem object store.
//!
//! Requests carry an expiration (`exp`) and an HMAC-SHA256 signature (`sig`
//! query parameter or `X-Signature` header). Valid, unexpired requests for
//! `.mp3` keys are streamed from `DATA_DIR` with immutable caching headers.
//!
//! # Usage
//!
//! ```text
//! SIGNATURE_SECRET=... DATA_DIR=/srv/audio signgate-server
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `GATEWAY_LISTEN` | `0.0.0.0:8787` | Bind address |
//! | `SIGNATURE_SECRET` | *(required)* | Shared HMAC secret |
//! | `SIGNGATE_PUBLIC_ORIGIN` | *(unset)* | Origin used when verifying, e.g. behind a proxy |
//! | `DATA_DIR` | `./data` | Root directory of served objects |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use signgate_core::{FsObjectStore, GateConfig};
use signgate_http::{GateHttpConfig, GateHttpService, server};

/// Server version logged at startup.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    Ok(())
}

/// Resolves once Ctrl-C is received.
async fn shutdown_signal() {
    tokio::signal::ctrl_c().await.ok();
    info!("received shutdown signal, draining connections");
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = GateConfig::from_env();

    init_tracing(&config.log_level)?;
    config.validate().context("invalid configuration")?;

    info!(
        gateway_listen = %config.gateway_listen,
        data_dir = %config.data_dir,
        public_origin = config.public_origin.as_deref().unwrap_or("<per request>"),
        version = VERSION,
        "starting SignGate server",
    );

    let store = FsObjectStore::new(&config.data_dir);
    if !store.root().is_dir() {
        warn!(data_dir = %config.data_dir, "data directory does not exist; every request will 404");
    }
    let service = GateHttpService::new(Arc::new(store), GateHttpConfig::from(&config));

    let addr = config.listen_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(%addr, "listening for connections");

    server::serve(listener, service, shutdown_signal()).await;
    Ok(())
}
