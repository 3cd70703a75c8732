//! MogileFS client operations.
//!
//! [`MogileClient`] ties the tracker dispatcher to a storage transport and
//! exposes the key operations: `get_paths`, `create`, `fetch`, `rename`,
//! `delete` and `debug`.
//!
//! Every call blocks until its tracker round trip (and HTTP exchange for
//! `create`/`fetch`) finishes. Retries beyond tracker failover are left to the
//! caller.

mod fetch;
mod paths;
mod upload;

use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::ClientConfig;
use crate::error::{MogileError, Result};
use crate::storage::{HttpTransport, StorageTransport};
use crate::tracker::{Command, Dispatcher, Request, TrackerPool, Values};

pub use paths::extract_paths;
pub use upload::MISSING_PATH_CODE;

/// Client bound to one domain of a tracker cluster.
///
/// Cloning is cheap and clones share the tracker blacklist, so one client can
/// serve concurrent tasks.
#[derive(Clone)]
pub struct MogileClient {
    domain: Arc<str>,
    dispatcher: Arc<Dispatcher>,
    transport: Arc<dyn StorageTransport>,
    cancel: Option<CancellationToken>,
}

impl MogileClient {
    /// Creates a client that talks HTTP to storage nodes.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Creates a client with a custom storage transport.
    pub fn with_transport(
        config: ClientConfig,
        transport: Arc<dyn StorageTransport>,
    ) -> Result<Self> {
        config.validate()?;

        let pool = TrackerPool::new(config.trackers, config.dial_timeout);
        Ok(Self {
            domain: config.domain.into(),
            dispatcher: Arc::new(Dispatcher::new(pool, config.io_timeout)),
            transport,
            cancel: None,
        })
    }

    /// Returns a handle whose operations abort with [`MogileError::Cancelled`]
    /// once `token` is cancelled.
    ///
    /// The handle shares trackers and blacklist with `self`.
    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        Self {
            cancel: Some(token),
            ..self.clone()
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// The tracker that last accepted a connection, if any.
    pub fn last_tracker(&self) -> Option<String> {
        self.dispatcher.pool().last_tracker()
    }

    pub fn tracker_pool(&self) -> &TrackerPool {
        self.dispatcher.pool()
    }

    /// Renames `from` to `to` within the domain.
    pub async fn rename(&self, from: &str, to: &str) -> Result<()> {
        ensure_key(from)?;
        ensure_key(to)?;

        let request = Request::new(Command::Rename)
            .arg("domain", self.domain())
            .arg("from_key", from)
            .arg("to_key", to);
        self.request(request).await.map(|_| ())
    }

    /// Deletes `key` from the domain.
    pub async fn delete(&self, key: &str) -> Result<()> {
        ensure_key(key)?;

        let request = Request::new(Command::Delete)
            .arg("domain", self.domain())
            .arg("key", key);
        self.request(request).await.map(|_| ())
    }

    /// Returns the tracker's debugging information about `key`.
    ///
    /// Use [`MogileClient::get_paths`] to look up paths.
    pub async fn debug(&self, key: &str) -> Result<Values> {
        ensure_key(key)?;

        let request = Request::new(Command::FileDebug)
            .arg("domain", self.domain())
            .arg("key", key);
        self.request(request).await
    }

    async fn request(&self, request: Request) -> Result<Values> {
        self.cancellable(self.dispatcher.do_request(&request)).await
    }

    async fn cancellable<T>(&self, operation: impl Future<Output = Result<T>>) -> Result<T> {
        match &self.cancel {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => Err(MogileError::Cancelled),
                result = operation => result,
            },
            None => operation.await,
        }
    }
}

fn ensure_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(MogileError::InvalidArgument("key is empty".into()));
    }
    Ok(())
}
