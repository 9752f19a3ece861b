//! End-to-end tests for the SignGate gateway.
//!
//! Each test starts an in-process gateway on an ephemeral port of
//! `127.0.0.1` and talks to it over real HTTP with `reqwest`, so no external
//! server is needed:
//!
//! ```text
//! cargo test -p signgate-integration
//! ```

use std::net::SocketAddr;
use std::sync::{Arc, Once};

use anyhow::{Context, Result};
use signgate_auth::{UrlSigner, epoch_seconds};
use signgate_core::ObjectStore;
use signgate_http::server::serve;
use signgate_http::{GateHttpConfig, GateHttpService};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::info;

/// Shared secret used by every test gateway.
pub const TEST_SECRET: &str = "integration-secret";

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// A gateway running on a background task. Stops when dropped.
#[derive(Debug)]
pub struct TestGateway {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl TestGateway {
    /// Start a gateway over `store`, deriving the origin from each request.
    pub async fn start<S: ObjectStore>(store: Arc<S>) -> Result<Self> {
        Self::start_with_origin(store, None).await
    }

    /// Start a gateway over `store` with an optional fixed public origin.
    pub async fn start_with_origin<S: ObjectStore>(
        store: Arc<S>,
        public_origin: Option<&str>,
    ) -> Result<Self> {
        init_tracing();

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .context("failed to bind test listener")?;
        let addr = listener.local_addr()?;
        let service = GateHttpService::new(
            store,
            GateHttpConfig {
                signature_secret: TEST_SECRET.to_owned(),
                public_origin: public_origin.map(ToOwned::to_owned),
            },
        );

        let (tx, rx) = oneshot::channel::<()>();
        let task = tokio::spawn(serve(listener, service, async {
            rx.await.ok();
        }));
        info!(%addr, "test gateway started");

        Ok(Self {
            addr,
            shutdown: Some(tx),
            task: Some(task),
        })
    }

    /// The origin clients reach the gateway at, e.g. `http://127.0.0.1:40123`.
    #[must_use]
    pub fn origin(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// An unsigned URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.origin())
    }

    /// A URL for `path` signed with [`TEST_SECRET`], valid for `ttl` seconds.
    #[must_use]
    pub fn signed_url(&self, path: &str, ttl: u64) -> String {
        self.signed_url_at(path, epoch_seconds() + ttl)
    }

    /// A URL for `path` signed with [`TEST_SECRET`] until `expiration`.
    #[must_use]
    pub fn signed_url_at(&self, path: &str, expiration: u64) -> String {
        UrlSigner::new(TEST_SECRET)
            .sign_link(&self.origin(), path, expiration)
            .expect("signing with the default provider")
            .url(&self.origin())
    }

    /// Stop accepting connections and wait for in-flight ones to finish.
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            tx.send(()).ok();
        }
        if let Some(task) = self.task.take() {
            task.await.ok();
        }
    }
}

impl Drop for TestGateway {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            tx.send(()).ok();
        }
    }
}

/// HTTP client for talking to test gateways.
#[must_use]
pub fn http_client() -> reqwest::Client {
    reqwest::Client::new()
}

mod test_fs_store;
mod test_gateway;
