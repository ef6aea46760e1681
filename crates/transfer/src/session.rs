use std::io;

use orpfile_protocol::{DeliveryMode, declared_size};
use tracing::{debug, info, warn};

use crate::{
    ChunkBuffer, SinkProvider, StorageSink, TransferConfig, TransferError,
    validate_destination_name,
};

/// State of one inbound file transfer.
///
/// Counts every byte handed to [`cache`](Self::cache) and routes it either
/// straight to the sink (auto mode) or into a single-slot buffer that
/// [`flush`](Self::flush) commits (manual mode). The sink is opened on the
/// first write and released by [`close`](Self::close).
///
/// Received and persisted bytes are tracked separately: a failed write does
/// not roll back [`received_bytes`](Self::received_bytes).
pub struct TransferSession<P: SinkProvider> {
    provider: P,
    sink: Option<P::Sink>,
    name: Option<String>,
    mode: DeliveryMode,
    expected_bytes: Option<u64>,
    received_bytes: u64,
    /// Set once `received_bytes` reaches `expected_bytes`; cleared by `setup`.
    complete: bool,
    buffer: ChunkBuffer,
    max_name_len: usize,
}

impl<P: SinkProvider> TransferSession<P> {
    pub fn new(provider: P, config: &TransferConfig) -> Self {
        Self {
            provider,
            sink: None,
            name: None,
            mode: DeliveryMode::Manual,
            expected_bytes: None,
            received_bytes: 0,
            complete: false,
            buffer: ChunkBuffer::new(config.chunk_capacity),
            max_name_len: config.max_name_len,
        }
    }

    /// Prepares the session for a new transfer.
    ///
    /// Counters, mode and the staged chunk are reset even when the name is
    /// rejected; the name is then left unset so every later write fails with
    /// [`TransferError::InvalidName`]. Nothing is opened here.
    ///
    /// Fails with [`TransferError::SinkStillOpen`], changing nothing, if the
    /// previous transfer was not closed.
    pub fn setup(
        &mut self,
        name: &str,
        expected_size: i64,
        auto: bool,
    ) -> Result<(), TransferError> {
        if self.sink.is_some() {
            return Err(TransferError::SinkStillOpen);
        }

        self.mode = DeliveryMode::from_auto(auto);
        self.expected_bytes = declared_size(expected_size);
        self.received_bytes = 0;
        self.complete = false;
        self.buffer.clear();

        if let Err(e) = validate_destination_name(name, self.max_name_len) {
            warn!(error = %e, "rejecting transfer destination");
            self.name = None;
            return Err(e);
        }

        self.name = Some(name.to_string());
        info!(
            name = %name,
            expected = ?self.expected_bytes,
            mode = ?self.mode,
            "file transfer set up"
        );
        Ok(())
    }

    /// Accepts one received chunk and returns its length.
    ///
    /// The received count always grows by `data.len()`, even when the call
    /// fails. An empty chunk leaves the staged chunk alone. The chunk that
    /// reaches the declared size replaces any staged chunk and is written at
    /// once; the rest of the transfer runs in auto mode.
    pub fn cache(&mut self, data: &[u8]) -> Result<usize, TransferError> {
        self.received_bytes += data.len() as u64;
        let crossing = self.reached_expected();

        let routed = if self.mode.is_auto() {
            self.write_after_pending(data)
        } else if crossing {
            self.buffer.clear();
            self.write(data).map(|_| ())
        } else if data.is_empty() {
            Ok(())
        } else {
            self.buffer.stage(data)
        };

        if crossing {
            self.mark_complete();
        }

        debug!(
            len = data.len(),
            received = self.received_bytes,
            mode = ?self.mode,
            "chunk cached"
        );

        routed.map(|()| data.len())
    }

    /// Writes the staged chunk, if any, and empties the buffer.
    ///
    /// A no-op in auto mode or with nothing staged, so it is safe to call on
    /// every acknowledge. The chunk is dropped even if the write fails.
    pub fn flush(&mut self) -> Result<usize, TransferError> {
        if self.mode.is_auto() {
            return Ok(0);
        }
        self.drain_pending()
    }

    /// Appends `data` to the destination, opening it first if needed.
    ///
    /// A short write is reported as [`TransferError::SinkWriteFailed`].
    pub fn write(&mut self, data: &[u8]) -> Result<usize, TransferError> {
        let Some(name) = self.name.as_deref() else {
            return Err(TransferError::InvalidName("no destination name set".into()));
        };

        let sink = match self.sink.take() {
            Some(sink) => sink,
            None => self.provider.open(name).inspect_err(|e| {
                warn!(name = %name, error = %e, "cannot open output file");
            })?,
        };
        let sink = self.sink.insert(sink);

        let write_failed = |source| TransferError::SinkWriteFailed {
            name: name.to_string(),
            source,
        };

        let written = sink.write(data).map_err(write_failed).inspect_err(|e| {
            warn!(error = %e, "write failed");
        })?;

        if written < data.len() {
            warn!(name = %name, written, len = data.len(), "short write");
            return Err(write_failed(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("short write: {written} of {} bytes", data.len()),
            )));
        }

        Ok(written)
    }

    /// Releases the output file.
    ///
    /// The handle is gone afterwards whatever the outcome. Name, mode and
    /// counters are kept until the next [`setup`](Self::setup).
    pub fn close(&mut self) -> Result<(), TransferError> {
        let Some(sink) = self.sink.take() else {
            return Ok(());
        };

        match sink.close() {
            Ok(()) => {
                info!(
                    name = self.name.as_deref().unwrap_or_default(),
                    received = self.received_bytes,
                    "output file closed"
                );
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "close failed");
                Err(TransferError::SinkCloseFailed(e))
            }
        }
    }

    /// Drops the staged chunk without writing it.
    pub fn discard_pending(&mut self) -> usize {
        let len = self.buffer.len();
        self.buffer.clear();
        len
    }

    /// Whether the session is in auto mode.
    pub fn is_auto(&self) -> bool {
        self.mode.is_auto()
    }

    /// Changes the delivery mode for subsequent chunks.
    ///
    /// Switching back to manual is ignored once the declared size has been
    /// reached.
    pub fn set_auto(&mut self, auto: bool) {
        if self.complete && !auto {
            debug!("transfer complete, staying in auto mode");
            return;
        }
        self.mode = DeliveryMode::from_auto(auto);
    }

    pub fn mode(&self) -> DeliveryMode {
        self.mode
    }

    pub fn received_bytes(&self) -> u64 {
        self.received_bytes
    }

    pub fn expected_bytes(&self) -> Option<u64> {
        self.expected_bytes
    }

    pub fn destination_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Whether a staged chunk is waiting to be flushed.
    pub fn has_pending(&self) -> bool {
        !self.buffer.is_empty()
    }

    /// Whether an output file handle is open.
    pub fn is_open(&self) -> bool {
        self.sink.is_some()
    }

    /// Whether the declared size has been reached.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    fn reached_expected(&self) -> bool {
        !self.complete
            && self
                .expected_bytes
                .is_some_and(|expected| self.received_bytes >= expected)
    }

    fn mark_complete(&mut self) {
        self.complete = true;
        self.mode = DeliveryMode::Auto;
        info!(received = self.received_bytes, "declared size reached");
    }

    /// Writes a chunk staged before a switch to auto, then `data`. If the
    /// staged chunk cannot be written `data` is dropped, so the file never
    /// holds a later chunk without the earlier one.
    fn write_after_pending(&mut self, data: &[u8]) -> Result<(), TransferError> {
        if let Err(e) = self.drain_pending() {
            warn!(dropped = data.len(), "staged chunk not written, dropping new chunk");
            return Err(e);
        }
        self.write(data).map(|_| ())
    }

    fn drain_pending(&mut self) -> Result<usize, TransferError> {
        let Some(chunk) = self.buffer.take() else {
            return Ok(0);
        };
        let result = self.write(&chunk);
        self.buffer.recycle(chunk);
        result
    }
}
