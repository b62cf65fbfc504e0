//! Buffered TCP transport with exact-read semantics.

use crate::error::ClientError;
use bytes::{Bytes, BytesMut};
use std::io;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;

/// One TCP connection to a device.
///
/// Reads go through an internal buffer so a frame header and its payload are
/// usually served from a single socket read.
pub struct Transport {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    io_timeout: Duration,
    peer: String,
    closed: bool,
    in_exchange: bool,
}

impl Transport {
    /// Opens a connection to `addr`.
    pub async fn connect(
        addr: &str,
        connect_timeout: Duration,
        io_timeout: Duration,
        read_buffer_size: usize,
    ) -> Result<Self, ClientError> {
        tracing::debug!("Connecting to {}...", addr);

        let stream = tokio::time::timeout(connect_timeout, TcpStream::connect(addr))
            .await
            .map_err(|_| {
                tracing::debug!("Connection to {} timed out", addr);
                ClientError::Connect(io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!("connect to {} timed out", addr),
                ))
            })?
            .map_err(|e| {
                tracing::debug!("Connection to {} failed: {}", addr, e);
                ClientError::Connect(e)
            })?;

        stream.set_nodelay(true).ok();

        let (read_half, write_half) = stream.into_split();
        tracing::debug!("TCP connected to {}", addr);

        Ok(Self {
            reader: BufReader::with_capacity(read_buffer_size, read_half),
            writer: write_half,
            io_timeout,
            peer: addr.to_string(),
            closed: false,
            in_exchange: false,
        })
    }

    /// Returns the peer address this transport was opened with.
    pub fn peer(&self) -> &str {
        &self.peer
    }

    /// Writes all of `bytes` or fails.
    pub async fn send_exact(&mut self, bytes: &[u8]) -> Result<(), ClientError> {
        if self.closed {
            return Err(ClientError::NotConnected);
        }

        let writer = &mut self.writer;
        tokio::time::timeout(self.io_timeout, async {
            writer.write_all(bytes).await?;
            writer.flush().await
        })
        .await
        .map_err(|_| ClientError::Timeout)?
        .map_err(map_io_error)
    }

    /// Reads exactly `n` bytes.
    pub async fn recv_exact(&mut self, n: usize) -> Result<Bytes, ClientError> {
        let mut buf = BytesMut::zeroed(n);
        self.recv_into(&mut buf).await?;
        Ok(buf.freeze())
    }

    /// Fills `buf` completely.
    ///
    /// Fails with `ConnectionClosed` if the peer closes first and with `Timeout`
    /// if no data arrives within the I/O timeout.
    pub async fn recv_into(&mut self, buf: &mut [u8]) -> Result<(), ClientError> {
        if self.closed {
            return Err(ClientError::NotConnected);
        }
        if buf.is_empty() {
            return Ok(());
        }

        tokio::time::timeout(self.io_timeout, self.reader.read_exact(buf))
            .await
            .map_err(|_| ClientError::Timeout)?
            .map_err(map_io_error)?;
        Ok(())
    }

    /// Marks the start of a request/response exchange.
    ///
    /// Fails if a previous exchange never completed: the position of the next
    /// frame boundary is then unknown.
    pub fn begin_exchange(&mut self) -> Result<(), ClientError> {
        if self.closed {
            return Err(ClientError::NotConnected);
        }
        if self.in_exchange {
            return Err(ClientError::Desynchronized);
        }
        self.in_exchange = true;
        Ok(())
    }

    /// Marks the reply frame of the current exchange as fully read.
    pub fn finish_exchange(&mut self) {
        self.in_exchange = false;
    }

    /// Returns whether an earlier exchange was abandoned mid-frame.
    pub fn is_desynchronized(&self) -> bool {
        self.in_exchange
    }

    /// Shuts the connection down. Safe to call more than once.
    pub async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        tracing::debug!("Shutting down transport to {}", self.peer);
        let _ = self.writer.shutdown().await;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

fn map_io_error(e: io::Error) -> ClientError {
    match e.kind() {
        io::ErrorKind::UnexpectedEof
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionAborted
        | io::ErrorKind::BrokenPipe => ClientError::ConnectionClosed,
        _ => ClientError::Io(e),
    }
}
