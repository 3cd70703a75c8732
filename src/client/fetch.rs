use bytes::Bytes;
use reqwest::StatusCode;
use tokio::io::AsyncReadExt;
use tracing::debug;

use super::{ensure_key, MogileClient};
use crate::config::GetPathsOptions;
use crate::error::{MogileError, Result};
use crate::storage::ObjectReader;

impl MogileClient {
    /// Opens the contents of `key`.
    ///
    /// Each path from [`MogileClient::get_paths`] is tried in order and the
    /// first 200 response wins. If none does, the error from the last path is
    /// returned. The caller owns the returned stream.
    pub async fn fetch(&self, key: &str) -> Result<ObjectReader> {
        ensure_key(key)?;
        self.cancellable(self.fetch_inner(key)).await
    }

    /// Like [`MogileClient::fetch`] but reads the whole object into memory.
    pub async fn fetch_bytes(&self, key: &str) -> Result<Bytes> {
        let mut reader = self.fetch(key).await?;
        let mut data = Vec::new();
        self.cancellable(async {
            reader.read_to_end(&mut data).await?;
            Ok::<(), MogileError>(())
        })
        .await?;
        Ok(Bytes::from(data))
    }

    async fn fetch_inner(&self, key: &str) -> Result<ObjectReader> {
        let paths = self.get_paths(key, GetPathsOptions::default()).await?;
        if paths.is_empty() {
            return Err(MogileError::NoPaths(key.to_string()));
        }

        let mut last_error = None;
        for path in &paths {
            match self.transport.get(path).await {
                Ok(response) if response.status == StatusCode::OK => return Ok(response.body),
                Ok(response) => {
                    debug!("fetch of {} from {} got {}", key, path, response.status);
                    last_error = Some(MogileError::StorageHttp(response.status));
                }
                Err(e) => {
                    debug!("fetch of {} from {} failed: {}", key, path, e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| MogileError::NoPaths(key.to_string())))
    }
}
