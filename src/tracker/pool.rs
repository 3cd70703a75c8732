use std::io;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, trace, warn};

use super::blacklist::Blacklist;
use crate::constants::TRACKER_BLACKLIST_DURATION;
use crate::error::{MogileError, Result};

/// Selects a connectable tracker, skipping hosts that recently failed.
///
/// The blacklist and the last-used tracker sit behind mutexes, so one pool can
/// be shared by concurrent callers. Locks are never held across an await.
pub struct TrackerPool {
    trackers: Vec<String>,
    dial_timeout: Duration,
    blacklist: Mutex<Blacklist>,
    last_tracker: Mutex<Option<String>>,
}

impl TrackerPool {
    pub fn new(trackers: Vec<String>, dial_timeout: Duration) -> Self {
        Self {
            trackers,
            dial_timeout,
            blacklist: Mutex::new(Blacklist::new(TRACKER_BLACKLIST_DURATION)),
            last_tracker: Mutex::new(None),
        }
    }

    pub fn trackers(&self) -> &[String] {
        &self.trackers
    }

    /// Connects to the first non-blacklisted tracker that answers in time.
    ///
    /// Hosts that fail to connect are blacklisted and the next one is tried.
    /// Fails with [`MogileError::Connection`] carrying the last dial error once
    /// the list is exhausted.
    pub async fn acquire(&self) -> Result<(TcpStream, String)> {
        let mut last_error = None;

        for host in &self.trackers {
            if self.is_blacklisted(host) {
                trace!("skipping blacklisted tracker {}", host);
                continue;
            }

            match self.dial(host).await {
                Ok(stream) => {
                    debug!("connected to tracker {}", host);
                    *self.last_tracker.lock() = Some(host.clone());
                    return Ok((stream, host.clone()));
                }
                Err(e) => {
                    warn!(
                        "tracker {} unreachable, blacklisting for {:?}: {}",
                        host, TRACKER_BLACKLIST_DURATION, e
                    );
                    self.mark_bad(host);
                    last_error = Some(e);
                }
            }
        }

        Err(MogileError::Connection(last_error.unwrap_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotConnected,
                "all trackers are blacklisted or none are configured",
            )
        })))
    }

    async fn dial(&self, host: &str) -> io::Result<TcpStream> {
        match timeout(self.dial_timeout, TcpStream::connect(host)).await {
            Ok(result) => result,
            Err(_) => Err(io::Error::new(
                io::ErrorKind::TimedOut,
                format!("connect timed out after {:?}", self.dial_timeout),
            )),
        }
    }

    /// Closes a connection handed out by [`TrackerPool::acquire`].
    ///
    /// Connections are never reused.
    pub fn release(&self, conn: TcpStream) {
        drop(conn);
    }

    /// Returns true if `host` is blacklisted right now. Expired entries are removed.
    pub fn is_blacklisted(&self, host: &str) -> bool {
        self.blacklist.lock().is_bad(host, Instant::now())
    }

    pub fn mark_bad(&self, host: &str) {
        self.blacklist.lock().mark_bad(host, Instant::now());
    }

    pub fn mark_alive(&self, host: &str) {
        self.blacklist.lock().mark_alive(host);
    }

    /// The tracker that last accepted a connection, if any.
    pub fn last_tracker(&self) -> Option<String> {
        self.last_tracker.lock().clone()
    }

    #[cfg(test)]
    pub(crate) fn blacklist_expiry(&self, host: &str) -> Option<Instant> {
        self.blacklist.lock().expiry(host)
    }
}
