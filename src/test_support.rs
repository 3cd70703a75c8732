use std::collections::{HashMap, VecDeque};
use std::io::Cursor;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::StatusCode;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

use crate::error::{MogileError, Result};
use crate::storage::{ObjectReader, StorageResponse, StorageTransport, UploadBody};

/// In-process tracker answering each connection with the next scripted line.
///
/// Connections arriving after the script is exhausted are closed without a
/// reply.
pub(crate) struct FakeTracker {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

impl FakeTracker {
    pub(crate) async fn start(replies: Vec<&str>) -> Self {
        Self::start_raw(replies.into_iter().map(|r| r.as_bytes().to_vec()).collect()).await
    }

    /// Like [`FakeTracker::start`] with replies given as raw bytes.
    pub(crate) async fn start_raw(replies: Vec<Vec<u8>>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let mut replies: VecDeque<Vec<u8>> = replies.into();

        let recorded = requests.clone();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let mut reader = BufReader::new(stream);
                let mut line = String::new();
                if reader.read_line(&mut line).await.is_err() {
                    continue;
                }
                recorded.lock().push(line);

                let mut stream = reader.into_inner();
                if let Some(reply) = replies.pop_front() {
                    let _ = stream.write_all(&reply).await;
                }
                let _ = stream.shutdown().await;
            }
        });

        Self { addr, requests }
    }

    /// A tracker that accepts connections and never answers.
    pub(crate) async fn start_silent() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));

        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((stream, _)) = listener.accept().await {
                held.push(stream);
            }
        });

        Self { addr, requests }
    }

    pub(crate) fn addr(&self) -> String {
        self.addr.to_string()
    }

    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }
}

/// An address nothing listens on.
pub(crate) fn dead_address() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr.to_string()
}

pub(crate) const SHORT_TIMEOUT: Duration = Duration::from_millis(200);

enum GetOutcome {
    Status(StatusCode, Vec<u8>),
    NetworkError,
}

/// In-memory storage node recording every call.
///
/// A successful PUT stores the body under its URL so a later GET returns it.
pub(crate) struct MemoryTransport {
    put_status: StatusCode,
    objects: Mutex<HashMap<String, Vec<u8>>>,
    scripted_gets: Mutex<HashMap<String, GetOutcome>>,
    puts: Mutex<Vec<String>>,
    gets: Mutex<Vec<String>>,
}

impl MemoryTransport {
    pub(crate) fn new() -> Self {
        Self::with_put_status(StatusCode::OK)
    }

    pub(crate) fn with_put_status(put_status: StatusCode) -> Self {
        Self {
            put_status,
            objects: Mutex::new(HashMap::new()),
            scripted_gets: Mutex::new(HashMap::new()),
            puts: Mutex::new(Vec::new()),
            gets: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn script_get(&self, url: &str, status: StatusCode, body: &[u8]) {
        self.scripted_gets
            .lock()
            .insert(url.to_string(), GetOutcome::Status(status, body.to_vec()));
    }

    pub(crate) fn script_network_error(&self, url: &str) {
        self.scripted_gets
            .lock()
            .insert(url.to_string(), GetOutcome::NetworkError);
    }

    pub(crate) fn object(&self, url: &str) -> Option<Vec<u8>> {
        self.objects.lock().get(url).cloned()
    }

    pub(crate) fn put_calls(&self) -> Vec<String> {
        self.puts.lock().clone()
    }

    pub(crate) fn get_calls(&self) -> Vec<String> {
        self.gets.lock().clone()
    }
}

#[async_trait]
impl StorageTransport for MemoryTransport {
    async fn put(&self, url: &str, mut body: UploadBody) -> Result<StatusCode> {
        self.puts.lock().push(url.to_string());

        let mut data = Vec::new();
        body.read_to_end(&mut data).await?;

        if self.put_status == StatusCode::OK {
            self.objects.lock().insert(url.to_string(), data);
        }
        Ok(self.put_status)
    }

    async fn get(&self, url: &str) -> Result<StorageResponse> {
        self.gets.lock().push(url.to_string());

        let (status, body) = match self.scripted_gets.lock().get(url) {
            Some(GetOutcome::Status(status, body)) => (*status, body.clone()),
            Some(GetOutcome::NetworkError) => {
                return Err(MogileError::Io(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    "connection refused",
                )))
            }
            None => match self.objects.lock().get(url) {
                Some(data) => (StatusCode::OK, data.clone()),
                None => (StatusCode::NOT_FOUND, Vec::new()),
            },
        };

        let body: ObjectReader = Box::pin(Cursor::new(body));
        Ok(StorageResponse { status, body })
    }
}
