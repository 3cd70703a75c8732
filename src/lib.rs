//! mogilefs - An async MogileFS client
//!
//! Resolves keys to storage URLs, creates, renames and deletes keys, and moves
//! file bytes to and from storage nodes. Trackers are reached over their
//! line-oriented TCP protocol, storage nodes over plain HTTP.
//!
//! # Modules
//!
//! - [`tracker`] - Tracker selection with blacklisting, line codec, request dispatch
//! - [`storage`] - HTTP data plane to storage nodes
//! - [`client`] - Key operations built on both
//! - [`config`] - Client settings and `get_paths` options
//!
//! # Example
//!
//! ```no_run
//! use mogilefs::{ClientConfig, GetPathsOptions, MogileClient};
//!
//! # async fn example() -> mogilefs::Result<()> {
//! let config = ClientConfig::new("media", vec!["10.0.0.1:7001".into(), "10.0.0.2:7001".into()]);
//! let client = MogileClient::new(config)?;
//!
//! client.create("photo/1.jpg", "", tokio::io::stdin()).await?;
//! let paths = client.get_paths("photo/1.jpg", GetPathsOptions::default()).await?;
//! let bytes = client.fetch_bytes("photo/1.jpg").await?;
//! # let _ = (paths, bytes);
//! # Ok(())
//! # }
//! ```
//!
//! # Concurrency
//!
//! A [`MogileClient`] may be cloned and shared across tasks; the tracker
//! blacklist is mutex-guarded. Each request opens and closes its own tracker
//! connection.

pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod storage;
pub mod tracker;

#[cfg(test)]
mod test_support;

pub use client::{extract_paths, MogileClient};
pub use config::{parse_tracker_list, ClientConfig, GetPathsOptions};
pub use error::{MogileError, Result};
pub use storage::{
    CountingReader, HttpTransport, ObjectReader, StorageResponse, StorageTransport, UploadBody,
};
pub use tracker::{Command, Request, TrackerPool, Values};
