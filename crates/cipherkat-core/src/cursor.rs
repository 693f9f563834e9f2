//! Cursor-bounded byte region used by the buffer representation.
//!
//! A [`ByteCursor`] owns fixed-capacity storage and tracks a `position` and a
//! `limit`. Writers fill `position..limit` and advance; [`ByteCursor::flip`]
//! turns the written prefix into the readable region. Every transition is an
//! explicit call.

use crate::error::CipherError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteCursor {
    data: Vec<u8>,
    position: usize,
    limit: usize,
}

impl ByteCursor {
    /// Zeroed cursor of `capacity` bytes, position 0, limit at capacity.
    #[must_use]
    pub fn allocate(capacity: usize) -> Self {
        Self {
            data: vec![0; capacity],
            position: 0,
            limit: capacity,
        }
    }

    /// Cursor whose readable region is exactly `bytes`.
    #[must_use]
    pub fn wrap(bytes: &[u8]) -> Self {
        Self {
            data: bytes.to_vec(),
            position: 0,
            limit: bytes.len(),
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Bytes between position and limit.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.limit - self.position
    }

    /// Move the position; `position` must not exceed the limit.
    pub fn set_position(&mut self, position: usize) -> Result<(), CipherError> {
        if position > self.limit {
            return Err(self.range_error(position, 0));
        }
        self.position = position;
        Ok(())
    }

    /// Move the limit; `limit` must lie within capacity. Clamps the position.
    pub fn set_limit(&mut self, limit: usize) -> Result<(), CipherError> {
        if limit > self.data.len() {
            return Err(self.range_error(limit, 0));
        }
        self.limit = limit;
        self.position = self.position.min(limit);
        Ok(())
    }

    /// Copy `bytes` in at the position and advance past them.
    pub fn put(&mut self, bytes: &[u8]) -> Result<(), CipherError> {
        if bytes.len() > self.remaining() {
            return Err(CipherError::BufferOverflow {
                required: bytes.len(),
                available: self.remaining(),
            });
        }
        self.data[self.position..self.position + bytes.len()].copy_from_slice(bytes);
        self.position += bytes.len();
        Ok(())
    }

    /// Limit becomes the position, position returns to 0.
    pub fn flip(&mut self) {
        self.limit = self.position;
        self.position = 0;
    }

    /// Position returns to 0; limit is unchanged.
    pub fn rewind(&mut self) {
        self.position = 0;
    }

    /// The readable region `position..limit`.
    #[must_use]
    pub fn readable(&self) -> &[u8] {
        &self.data[self.position..self.limit]
    }

    /// The writable region `position..limit`.
    pub fn writable(&mut self) -> &mut [u8] {
        &mut self.data[self.position..self.limit]
    }

    /// Advance the position by `n` bytes.
    pub fn advance(&mut self, n: usize) -> Result<(), CipherError> {
        if n > self.remaining() {
            return Err(self.range_error(self.position, n));
        }
        self.position += n;
        Ok(())
    }

    /// Owned copy of the readable region.
    #[must_use]
    pub fn remaining_bytes(&self) -> Vec<u8> {
        self.readable().to_vec()
    }

    fn range_error(&self, offset: usize, len: usize) -> CipherError {
        CipherError::InvalidRange {
            offset,
            len,
            capacity: self.data.len(),
        }
    }
}
