//! Client configuration.

use std::time::Duration;

use crate::constants::{
    DEFAULT_DIAL_TIMEOUT, DEFAULT_PATH_COUNT, DEFAULT_STORAGE_CONNECT_TIMEOUT,
    DEFAULT_STORAGE_READ_TIMEOUT, DEFAULT_TRACKER_IO_TIMEOUT, MIN_PATH_COUNT,
};
use crate::error::{MogileError, Result};

/// Settings for a [`MogileClient`](crate::MogileClient).
///
/// Trackers are tried in the order given here.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Namespace every key is scoped to.
    pub domain: String,
    /// Tracker addresses in `host:port` form.
    pub trackers: Vec<String>,
    /// TCP connect timeout per tracker.
    pub dial_timeout: Duration,
    /// Deadline for the request write and the reply read on a tracker connection.
    pub io_timeout: Duration,
    /// HTTP connect timeout for storage nodes.
    pub storage_connect_timeout: Duration,
    /// HTTP read timeout for storage nodes.
    pub storage_read_timeout: Duration,
}

impl ClientConfig {
    pub fn new(domain: impl Into<String>, trackers: Vec<String>) -> Self {
        Self {
            domain: domain.into(),
            trackers,
            dial_timeout: DEFAULT_DIAL_TIMEOUT,
            io_timeout: DEFAULT_TRACKER_IO_TIMEOUT,
            storage_connect_timeout: DEFAULT_STORAGE_CONNECT_TIMEOUT,
            storage_read_timeout: DEFAULT_STORAGE_READ_TIMEOUT,
        }
    }

    pub fn with_dial_timeout(mut self, timeout: Duration) -> Self {
        self.dial_timeout = timeout;
        self
    }

    pub fn with_io_timeout(mut self, timeout: Duration) -> Self {
        self.io_timeout = timeout;
        self
    }

    pub fn with_storage_timeouts(mut self, connect: Duration, read: Duration) -> Self {
        self.storage_connect_timeout = connect;
        self.storage_read_timeout = read;
        self
    }

    /// Checks that the configuration can address a cluster at all.
    pub fn validate(&self) -> Result<()> {
        if self.domain.is_empty() {
            return Err(MogileError::InvalidArgument("domain is empty".into()));
        }
        if self.trackers.is_empty() {
            return Err(MogileError::InvalidArgument("tracker list is empty".into()));
        }
        if let Some(bad) = self.trackers.iter().find(|t| t.trim().is_empty()) {
            return Err(MogileError::InvalidArgument(format!(
                "invalid tracker address: {:?}",
                bad
            )));
        }
        Ok(())
    }
}

/// Splits a comma separated tracker list such as `"a:7001, b:7001"`.
///
/// Blank entries are dropped.
pub fn parse_tracker_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Options for [`MogileClient::get_paths`](crate::MogileClient::get_paths).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetPathsOptions {
    /// Return the tracker's answer without checking the files exist.
    pub no_verify: bool,
    /// Number of paths to ask for. Values below 2 are raised to 2.
    pub path_count: u32,
}

impl GetPathsOptions {
    pub fn new(no_verify: bool, path_count: u32) -> Self {
        Self {
            no_verify,
            path_count,
        }
    }

    /// The path count actually sent on the wire.
    pub fn effective_path_count(&self) -> u32 {
        self.path_count.max(MIN_PATH_COUNT)
    }
}

impl Default for GetPathsOptions {
    fn default() -> Self {
        Self {
            no_verify: true,
            path_count: DEFAULT_PATH_COUNT,
        }
    }
}
