use std::sync::atomic::Ordering;

use reqwest::StatusCode;
use tokio::io::AsyncRead;
use tracing::debug;

use super::{ensure_key, MogileClient};
use crate::error::{MogileError, Result};
use crate::storage::{CountingReader, UploadBody};
use crate::tracker::{Command, Request, Values};

/// Error code reported when `create_open` succeeds without handing out a path.
pub const MISSING_PATH_CODE: &str = "missing_path";

/// Destination assigned by `create_open`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct UploadSession {
    key: String,
    fid: String,
    devid: String,
    path: String,
}

impl UploadSession {
    fn from_open_reply(key: &str, values: &Values) -> Result<Self> {
        let path = values.get_nonempty("path").ok_or_else(|| {
            MogileError::application(
                MISSING_PATH_CODE,
                Some("create_open reply has no path".into()),
            )
        })?;

        Ok(Self {
            key: key.to_string(),
            fid: values.get("fid").unwrap_or_default().to_string(),
            devid: values.get("devid").unwrap_or_default().to_string(),
            path: path.to_string(),
        })
    }
}

impl MogileClient {
    /// Stores the bytes read from `reader` under `key`.
    ///
    /// Runs `create_open`, PUTs the stream to the assigned path, then reports
    /// the exact byte count with `create_close`. A failure at any step skips
    /// the rest. An empty `class` selects the domain's default class.
    ///
    /// Returns the `create_close` reply.
    pub async fn create<R>(&self, key: &str, class: &str, reader: R) -> Result<Values>
    where
        R: AsyncRead + Send + 'static,
    {
        ensure_key(key)?;
        self.cancellable(self.create_inner(key, class, Box::pin(reader)))
            .await
    }

    async fn create_inner(&self, key: &str, class: &str, reader: UploadBody) -> Result<Values> {
        let open = Request::new(Command::CreateOpen)
            .arg("domain", self.domain())
            .arg("key", key)
            .arg("class", class)
            .arg("fid", "0")
            .arg("multi_dest", "0");
        let reply = self.dispatcher.do_request(&open).await?;
        let session = UploadSession::from_open_reply(key, &reply)?;

        debug!(
            "uploading {} as fid {} to {}",
            session.key, session.fid, session.path
        );

        let body = CountingReader::new(reader);
        let counter = body.counter();
        let status = self.transport.put(&session.path, Box::pin(body)).await?;
        if status != StatusCode::OK {
            return Err(MogileError::StorageHttp(status));
        }
        let size = counter.load(Ordering::Acquire);

        debug!("stored {} bytes for fid {}", size, session.fid);

        let close = Request::new(Command::CreateClose)
            .arg("domain", self.domain())
            .arg("key", session.key)
            .arg("fid", session.fid)
            .arg("devid", session.devid)
            .arg("path", session.path)
            .arg("size", size.to_string());
        self.dispatcher.do_request(&close).await
    }
}
