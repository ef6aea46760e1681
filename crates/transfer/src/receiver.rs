//! Event-driven front end for a [`TransferSession`].
//!
//! State machine:
//!
//! ```text
//! Idle --READY--> Receiving --SUSPEND--> Suspended --RESUME--> Receiving
//! Receiving | Suspended --COMPLETE | ABORT--> Idle
//! ```
//!
//! `INFO` and `PENDING` are informational. Data is accepted only while
//! receiving; acknowledgements (flush) also while suspended.

use orpfile_protocol::{TransferEvent, TransferProgress, TransferRequest, TransferState};
use tracing::{debug, info, warn};

use crate::{SinkProvider, TransferError, TransferSession};

/// Maps protocol events and data arrivals onto session operations.
pub struct TransferReceiver<P: SinkProvider> {
    session: TransferSession<P>,
    state: TransferState,
}

impl<P: SinkProvider> TransferReceiver<P> {
    pub fn new(session: TransferSession<P>) -> Self {
        Self {
            session,
            state: TransferState::Idle,
        }
    }

    /// Handles `READY` for the transfer described by `request`.
    ///
    /// The receiver enters `Receiving` even if the name is rejected, so the
    /// peer's data is still counted; the rejection is returned to the caller.
    pub fn ready(&mut self, request: &TransferRequest) -> Result<(), TransferError> {
        if self.state != TransferState::Idle {
            return Err(TransferError::UnexpectedEvent {
                event: TransferEvent::Ready,
                state: self.state,
            });
        }

        let result = self.session.setup(&request.name, request.size, request.auto);
        if matches!(result, Err(TransferError::SinkStillOpen)) {
            return result;
        }

        self.state = TransferState::Receiving;
        info!(
            name = %request.name,
            expected = ?request.expected_bytes(),
            auto = request.auto,
            "transfer ready"
        );
        result
    }

    /// Handles a control event other than `READY`.
    pub fn event(&mut self, event: TransferEvent) -> Result<(), TransferError> {
        use TransferEvent::*;
        use TransferState::*;

        match (event, self.state) {
            (Info | Pending, _) => {
                debug!(%event, state = %self.state, "informational event");
                Ok(())
            }
            (Suspend, Receiving) => {
                self.state = Suspended;
                debug!("transfer suspended");
                Ok(())
            }
            (Resume, Suspended) => {
                self.state = Receiving;
                debug!("transfer resumed");
                Ok(())
            }
            (event, Idle) if event.is_terminal() => {
                debug!(%event, "no transfer in progress, ignoring");
                Ok(())
            }
            (event, Receiving | Suspended) if event.is_terminal() => self.finish(event),
            (event, state) => Err(TransferError::UnexpectedEvent { event, state }),
        }
    }

    /// Handles one data chunk. An absent chunk is ignored.
    pub fn data(&mut self, chunk: Option<&[u8]>) -> Result<usize, TransferError> {
        let Some(chunk) = chunk else {
            return Ok(0);
        };
        if self.state != TransferState::Receiving {
            return Err(TransferError::InvalidState {
                action: "accept data",
                state: self.state,
            });
        }
        self.session.cache(chunk)
    }

    /// Handles the peer's acknowledgement by flushing the staged chunk.
    pub fn acknowledge(&mut self) -> Result<usize, TransferError> {
        if self.state == TransferState::Idle {
            return Err(TransferError::InvalidState {
                action: "flush",
                state: self.state,
            });
        }
        self.session.flush()
    }

    /// Switches delivery mode mid-transfer, e.g. on a later
    /// `file control auto` command.
    pub fn set_auto(&mut self, auto: bool) {
        self.session.set_auto(auto);
    }

    pub fn is_auto(&self) -> bool {
        self.session.is_auto()
    }

    pub fn state(&self) -> TransferState {
        self.state
    }

    pub fn session(&self) -> &TransferSession<P> {
        &self.session
    }

    /// Snapshot for upstream progress reporting.
    pub fn progress(&self) -> TransferProgress {
        TransferProgress {
            name: self
                .session
                .destination_name()
                .unwrap_or_default()
                .to_string(),
            state: self.state,
            mode: self.session.mode(),
            received_bytes: self.session.received_bytes(),
            expected_bytes: self.session.expected_bytes(),
            pending: self.session.has_pending(),
        }
    }

    fn finish(&mut self, event: TransferEvent) -> Result<(), TransferError> {
        let dropped = self.session.discard_pending();
        if dropped > 0 {
            warn!(%event, bytes = dropped, "dropping unacknowledged chunk");
        }

        self.state = TransferState::Idle;
        let result = self.session.close();
        info!(
            %event,
            received = self.session.received_bytes(),
            expected = ?self.session.expected_bytes(),
            "transfer finished"
        );
        result
    }
}
