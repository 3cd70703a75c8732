use std::pin::Pin;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use reqwest::{header, Body, Client, StatusCode};
use tokio::io::AsyncRead;
use tokio_util::io::{ReaderStream, StreamReader};
use tracing::debug;

use crate::config::ClientConfig;
use crate::constants::USER_AGENT;
use crate::error::Result;

/// Byte stream of a stored file. The holder owns the underlying connection.
pub type ObjectReader = Pin<Box<dyn AsyncRead + Send>>;

/// Request body for a storage PUT.
pub type UploadBody = Pin<Box<dyn AsyncRead + Send>>;

/// Status and body of a storage GET.
pub struct StorageResponse {
    pub status: StatusCode,
    pub body: ObjectReader,
}

/// Data plane between the client and storage nodes.
#[async_trait]
pub trait StorageTransport: Send + Sync {
    /// Uploads `body` to `url` and returns the response status.
    async fn put(&self, url: &str, body: UploadBody) -> Result<StatusCode>;

    /// Requests `url`. Any status is returned as-is; only network failures error.
    async fn get(&self, url: &str) -> Result<StorageResponse>;
}

/// [`StorageTransport`] over plain HTTP.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(config.storage_connect_timeout)
            .read_timeout(config.storage_read_timeout)
            .build()?;

        Ok(Self { client })
    }

    /// Creates a transport with a custom HTTP client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl StorageTransport for HttpTransport {
    async fn put(&self, url: &str, body: UploadBody) -> Result<StatusCode> {
        debug!("PUT {}", url);

        // The length is unknown up front, so the body goes out chunked.
        let response = self
            .client
            .put(url)
            .header(header::CONTENT_TYPE, "application/octet-stream")
            .body(Body::wrap_stream(ReaderStream::new(body)))
            .send()
            .await?;

        Ok(response.status())
    }

    async fn get(&self, url: &str) -> Result<StorageResponse> {
        debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();

        let stream = response.bytes_stream().map_err(std::io::Error::other);
        let body: ObjectReader = Box::pin(StreamReader::new(stream));

        Ok(StorageResponse { status, body })
    }
}
