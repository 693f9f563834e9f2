//! Single-use, single-direction cipher sessions.
//!
//! `Created -> Initialized(direction) -> Finalized`. One session wraps exactly
//! one freshly constructed backend and is finalized exactly once, through
//! either representation. Out-of-sequence calls fail with
//! [`CipherError::InvalidSessionState`] and never reach the backend.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::backend::CipherBackend;
use crate::cursor::ByteCursor;
use crate::error::CipherError;
use crate::transformation::{Direction, Transformation};

/// Which I/O surface a finalize call goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Representation {
    Buffer,
    Array,
}

impl Representation {
    pub const ALL: [Self; 2] = [Self::Buffer, Self::Array];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buffer => "buffer",
            Self::Array => "array",
        }
    }
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Created,
    Initialized(Direction),
    Finalized,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => f.write_str("created"),
            Self::Initialized(direction) => write!(f, "initialized({direction})"),
            Self::Finalized => f.write_str("finalized"),
        }
    }
}

pub struct CipherSession {
    backend: Box<dyn CipherBackend>,
    state: SessionState,
}

impl fmt::Debug for CipherSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CipherSession")
            .field("backend", &self.backend.name())
            .field("transformation", &self.backend.transformation().name())
            .field("state", &self.state)
            .finish()
    }
}

impl CipherSession {
    /// Wrap a freshly constructed backend.
    #[must_use]
    pub fn new(backend: Box<dyn CipherBackend>) -> Self {
        Self {
            backend,
            state: SessionState::Created,
        }
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn transformation(&self) -> Transformation {
        self.backend.transformation()
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Direction the session is bound to, once initialized.
    #[must_use]
    pub fn direction(&self) -> Option<Direction> {
        match self.state {
            SessionState::Initialized(direction) => Some(direction),
            _ => None,
        }
    }

    /// Bind direction and key material. Valid only in `Created`.
    ///
    /// A rejected key/iv leaves the session in `Created`.
    pub fn initialize(
        &mut self,
        direction: Direction,
        key: &[u8],
        iv: &[u8],
    ) -> Result<(), CipherError> {
        if self.state != SessionState::Created {
            return Err(self.misuse("initialize"));
        }
        self.backend.init(direction, key, iv)?;
        self.state = SessionState::Initialized(direction);
        Ok(())
    }

    /// Buffer representation finalize. The session is spent afterwards,
    /// whether or not the backend succeeded.
    pub fn finalize_buffer(
        &mut self,
        input: &mut ByteCursor,
        output: &mut ByteCursor,
    ) -> Result<(), CipherError> {
        self.begin_finalize("finalize_buffer")?;
        self.backend.do_final_buffer(input, output)
    }

    /// Array representation finalize; returns bytes written.
    pub fn finalize_array(
        &mut self,
        input: &[u8],
        input_offset: usize,
        input_len: usize,
        output: &mut [u8],
        output_offset: usize,
    ) -> Result<usize, CipherError> {
        self.begin_finalize("finalize_array")?;
        self.backend
            .do_final_array(input, input_offset, input_len, output, output_offset)
    }

    fn begin_finalize(&mut self, operation: &'static str) -> Result<(), CipherError> {
        match self.state {
            SessionState::Initialized(_) => {
                self.state = SessionState::Finalized;
                Ok(())
            }
            _ => Err(self.misuse(operation)),
        }
    }

    fn misuse(&self, operation: &'static str) -> CipherError {
        CipherError::InvalidSessionState {
            operation,
            state: self.state,
        }
    }
}
