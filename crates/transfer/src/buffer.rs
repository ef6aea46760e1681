use crate::TransferError;

/// Single-slot staging area for one chunk awaiting acknowledgement.
///
/// Staging a chunk replaces whatever was held before; the slot never
/// accumulates. The backing allocation is kept across chunks.
#[derive(Debug)]
pub struct ChunkBuffer {
    data: Vec<u8>,
    capacity: usize,
}

impl ChunkBuffer {
    /// Creates an empty buffer holding chunks of at most `capacity` bytes.
    pub fn new(capacity: usize) -> Self {
        Self {
            data: Vec::new(),
            capacity,
        }
    }

    /// Replaces the held chunk with `chunk`.
    ///
    /// A chunk larger than the capacity leaves the buffer empty.
    pub fn stage(&mut self, chunk: &[u8]) -> Result<(), TransferError> {
        self.data.clear();
        if chunk.len() > self.capacity {
            return Err(TransferError::ChunkTooLarge {
                len: chunk.len(),
                capacity: self.capacity,
            });
        }
        self.data.extend_from_slice(chunk);
        Ok(())
    }

    /// Removes the held chunk, or returns `None` when empty.
    ///
    /// Hand the vector back through [`recycle`](Self::recycle) to keep the
    /// allocation.
    pub fn take(&mut self) -> Option<Vec<u8>> {
        if self.data.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.data))
        }
    }

    /// Returns a taken vector's allocation to the buffer, leaving it empty.
    pub fn recycle(&mut self, mut data: Vec<u8>) {
        data.clear();
        self.data = data;
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
