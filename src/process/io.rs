//! I/O primitives for talking to the solver subprocess.

use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::timeout as tokio_timeout;

use crate::{Error, Result};

/// Non-blocking reader over a line-oriented output stream.
///
/// A background task performs the blocking reads and pushes every
/// completed line, decoded lossily as UTF-8, onto a channel owned by this reader. The consumer
/// polls with [`read_line`](Self::read_line), which waits at most the given
/// timeout and returns `None` when nothing arrived.
///
/// The background task ends on end-of-stream or on the first read error,
/// without reporting anything. Consumers detect that through
/// [`is_finished`](Self::is_finished). Dropping the reader aborts the task.
pub struct LineReader {
    rx: mpsc::UnboundedReceiver<String>,
    task_handle: Option<JoinHandle<()>>,
    finished: bool,
}

impl LineReader {
    /// Start reading lines from `stream` in a background task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new<R>(stream: R) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let task_handle = tokio::spawn(Self::read_loop(BufReader::new(stream), tx));

        Self {
            rx,
            task_handle: Some(task_handle),
            finished: false,
        }
    }

    /// Background loop that forwards lines until end-of-stream.
    async fn read_loop<R>(mut reader: BufReader<R>, tx: mpsc::UnboundedSender<String>)
    where
        R: AsyncRead + Unpin,
    {
        let mut buffer = Vec::with_capacity(256);
        let mut count = 0usize;
        loop {
            buffer.clear();
            // Raw bytes: names echoed from coordinate files may not be UTF-8.
            match reader.read_until(b'\n', &mut buffer).await {
                Ok(0) => {
                    tracing::debug!(lines = count, "solver output reached end of stream");
                    return;
                }
                Ok(_) => {
                    let line = String::from_utf8_lossy(&buffer).into_owned();
                    tracing::trace!(line = %line.trim_end(), "solver output");
                    count += 1;
                    if tx.send(line).is_err() {
                        // Reader dropped
                        return;
                    }
                }
                Err(e) => {
                    tracing::debug!("solver output stream failed: {}", e);
                    return;
                }
            }
        }
    }

    /// Pop the next line, waiting up to `timeout` for one to arrive.
    ///
    /// Returns `None` on timeout, and also once the stream has ended and every
    /// queued line was consumed. Lines keep their trailing newline.
    pub async fn read_line(&mut self, timeout: Duration) -> Option<String> {
        if self.finished {
            return None;
        }
        match tokio_timeout(timeout, self.rx.recv()).await {
            Ok(Some(line)) => Some(line),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(_) => None,
        }
    }

    /// Pop the next line only if one is already queued.
    pub fn try_read_line(&mut self) -> Option<String> {
        match self.rx.try_recv() {
            Ok(line) => Some(line),
            Err(mpsc::error::TryRecvError::Empty) => None,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                self.finished = true;
                None
            }
        }
    }

    /// Drain every line that is already queued.
    pub fn drain(&mut self) -> Vec<String> {
        let mut lines = Vec::new();
        while let Some(line) = self.try_read_line() {
            lines.push(line);
        }
        lines
    }

    /// Check whether the stream ended and all of its lines were consumed.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl futures::Stream for LineReader {
    type Item = String;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.finished {
            return Poll::Ready(None);
        }
        match self.rx.poll_recv(cx) {
            Poll::Ready(None) => {
                self.finished = true;
                Poll::Ready(None)
            }
            other => other,
        }
    }
}

impl Drop for LineReader {
    fn drop(&mut self) {
        if let Some(handle) = self.task_handle.take() {
            handle.abort();
        }
    }
}

/// Writes commands to the solver's standard input.
///
/// Each write is flushed immediately so commands reach the solver in the
/// order they were sent.
pub struct LineWriter<W> {
    inner: W,
}

impl<W> LineWriter<W>
where
    W: AsyncWrite + Unpin,
{
    /// Create a new writer.
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Write `text` and flush it.
    pub async fn write(&mut self, text: &str) -> Result<()> {
        self.inner
            .write_all(text.as_bytes())
            .await
            .map_err(Error::io)?;
        self.inner.flush().await.map_err(Error::io)
    }

    /// Close the underlying stream, signalling end-of-input.
    pub async fn shutdown(&mut self) -> Result<()> {
        self.inner.shutdown().await.map_err(Error::io)
    }
}
