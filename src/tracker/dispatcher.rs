use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, trace};

use super::codec::{decode_reply, Request, Values};
use super::pool::TrackerPool;
use crate::constants::MAX_REPLY_LINE_LENGTH;
use crate::error::{MogileError, Result};

/// Runs one request per tracker connection.
pub struct Dispatcher {
    pool: TrackerPool,
    io_timeout: Duration,
}

impl Dispatcher {
    pub fn new(pool: TrackerPool, io_timeout: Duration) -> Self {
        Self { pool, io_timeout }
    }

    pub fn pool(&self) -> &TrackerPool {
        &self.pool
    }

    /// Sends `request` and decodes the single reply line.
    ///
    /// Only connection acquisition fails over to another tracker; a request that
    /// reached a tracker is never re-sent.
    pub async fn do_request(&self, request: &Request) -> Result<Values> {
        let line = request.encode();
        let (mut conn, host) = self.pool.acquire().await?;

        debug!("sending {} to tracker {}", request.command(), host);
        trace!("> {}", line.trim_end());

        if let Err(e) = self.write_line(&mut conn, &line).await {
            self.pool.release(conn);
            return Err(e);
        }

        let reply = self.read_line(&mut conn).await;
        self.pool.release(conn);

        let reply = reply?;
        trace!("< {}", String::from_utf8_lossy(&reply).trim_end());
        decode_reply(&reply)
    }

    async fn write_line(&self, conn: &mut TcpStream, line: &str) -> Result<()> {
        timeout(self.io_timeout, conn.write_all(line.as_bytes()))
            .await
            .map_err(|_| MogileError::Timeout)??;
        Ok(())
    }

    async fn read_line(&self, conn: &mut TcpStream) -> Result<Vec<u8>> {
        let mut reader = BufReader::new(conn).take(MAX_REPLY_LINE_LENGTH);
        let mut buf = Vec::new();

        timeout(self.io_timeout, reader.read_until(b'\n', &mut buf))
            .await
            .map_err(|_| MogileError::Timeout)??;

        if buf.len() as u64 >= MAX_REPLY_LINE_LENGTH && buf.last() != Some(&b'\n') {
            return Err(MogileError::Protocol("reply line too long".into()));
        }

        Ok(buf)
    }
}
