//! The positional argument cursor shared by the importer and the exporter.

use crate::error::MarshalError;

/// Zero-based read and write indices over one invocation's arguments.
///
/// Both indices start at 0, only ever move forward, and move by exactly one
/// per access. A failed bounds check leaves the cursor where it was.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ArgumentCursor {
    read: usize,
    write: usize,
}

impl ArgumentCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read_index(&self) -> usize {
        self.read
    }

    pub fn write_index(&self) -> usize {
        self.write
    }

    /// The index the next read would consume, without consuming it.
    pub fn peek_read(&self, available: usize) -> Result<usize, MarshalError> {
        if self.read < available {
            Ok(self.read)
        } else {
            Err(MarshalError::PositionOutOfRange {
                position: self.read + 1,
                available,
            })
        }
    }

    /// Consumes and returns the next read index.
    pub fn advance_read(&mut self, available: usize) -> Result<usize, MarshalError> {
        let index = self.peek_read(available)?;
        self.read += 1;
        Ok(index)
    }

    /// Consumes and returns the next write index; at most `expected` writes are allowed.
    pub fn advance_write(&mut self, expected: usize) -> Result<usize, MarshalError> {
        if self.write >= expected {
            return Err(MarshalError::PositionOutOfRange {
                position: self.write + 1,
                available: expected,
            });
        }
        let index = self.write;
        self.write += 1;
        Ok(index)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
