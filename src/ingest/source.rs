// src/ingest/source.rs
//! Transport seam. The broker client lives outside this crate; anything that
//! can hand over one JSON message at a time implements [`EventSource`].

use anyhow::{Context, Result};
use std::path::Path;
use std::borrow::Cow;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

#[async_trait::async_trait]
pub trait EventSource: Send {
    /// Wait for the next raw message.
    ///
    /// `Ok(None)` is a clean end of stream. `Err` is a transport failure and
    /// ends ingestion; there is no local retry.
    async fn next_message(&mut self) -> Result<Option<String>>;
    fn name(&self) -> &'static str;
}

/// Newline-delimited JSON, one event per line. Blank lines are skipped.
///
/// Lines are read as raw bytes. Invalid UTF-8 is replaced rather than
/// reported, so a corrupt record reaches the decoder and is discarded there;
/// only an I/O failure of the reader itself is a transport error.
pub struct JsonLinesSource<R> {
    reader: R,
    buf: Vec<u8>,
    name: &'static str,
}

impl<R> JsonLinesSource<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    pub fn new(reader: R) -> Self {
        Self::named(reader, "json-lines")
    }

    fn named(reader: R, name: &'static str) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            name,
        }
    }
}

impl JsonLinesSource<BufReader<tokio::io::Stdin>> {
    pub fn stdin() -> Self {
        Self::named(BufReader::new(tokio::io::stdin()), "stdin")
    }
}

impl JsonLinesSource<BufReader<tokio::fs::File>> {
    pub async fn open(path: &Path) -> Result<Self> {
        let f = tokio::fs::File::open(path)
            .await
            .with_context(|| format!("opening event stream {}", path.display()))?;
        Ok(Self::named(BufReader::new(f), "file"))
    }
}

#[async_trait::async_trait]
impl<R> EventSource for JsonLinesSource<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn next_message(&mut self) -> Result<Option<String>> {
        loop {
            self.buf.clear();
            let read = self
                .reader
                .read_until(b'\n', &mut self.buf)
                .await
                .with_context(|| format!("reading from {} transport", self.name))?;
            if read == 0 {
                return Ok(None);
            }

            let text = String::from_utf8_lossy(&self.buf);
            if let Cow::Owned(_) = text {
                tracing::debug!(target: "ingest", source = self.name, "invalid UTF-8 replaced in message");
            }
            let line = text.trim_end_matches(&['\r', '\n'][..]);
            if line.trim().is_empty() {
                continue;
            }
            return Ok(Some(line.to_string()));
        }
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

/// In-process transport: whatever is sent on the paired sender.
/// The stream ends once every sender is dropped.
pub struct ChannelSource {
    rx: mpsc::Receiver<String>,
}

impl ChannelSource {
    pub fn channel(capacity: usize) -> (mpsc::Sender<String>, Self) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (tx, Self { rx })
    }
}

#[async_trait::async_trait]
impl EventSource for ChannelSource {
    async fn next_message(&mut self) -> Result<Option<String>> {
        Ok(self.rx.recv().await)
    }

    fn name(&self) -> &'static str {
        "channel"
    }
}
