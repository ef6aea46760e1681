//! In-memory sink used by unit tests.

use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use crate::{SinkProvider, StorageSink, TransferError};

#[derive(Debug, Default)]
pub struct MemoryState {
    pub content: Vec<u8>,
    pub writes: usize,
    pub opens: usize,
    pub closes: usize,
    pub fail_open: bool,
    pub fail_write: bool,
    pub fail_close: bool,
    /// Caps every write at this many bytes.
    pub short_write: Option<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryProvider {
    pub state: Rc<RefCell<MemoryState>>,
}

impl MemoryProvider {
    pub fn content(&self) -> Vec<u8> {
        self.state.borrow().content.clone()
    }
}

pub struct MemorySink {
    state: Rc<RefCell<MemoryState>>,
}

impl StorageSink for MemorySink {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let mut s = self.state.borrow_mut();
        if s.fail_write {
            return Err(io::Error::other("disk full"));
        }
        let n = s.short_write.map_or(data.len(), |cap| cap.min(data.len()));
        s.content.extend_from_slice(&data[..n]);
        s.writes += 1;
        Ok(n)
    }

    fn close(self) -> io::Result<()> {
        let mut s = self.state.borrow_mut();
        s.closes += 1;
        if s.fail_close {
            return Err(io::Error::other("close failed"));
        }
        Ok(())
    }
}

impl SinkProvider for MemoryProvider {
    type Sink = MemorySink;

    fn open(&mut self, name: &str) -> Result<MemorySink, TransferError> {
        let mut s = self.state.borrow_mut();
        if s.fail_open {
            return Err(TransferError::SinkOpenFailed {
                name: name.to_string(),
                source: io::Error::from(io::ErrorKind::PermissionDenied),
            });
        }
        s.opens += 1;
        Ok(MemorySink {
            state: Rc::clone(&self.state),
        })
    }
}
