//! Error types for backends, sessions and backend resolution.

use thiserror::Error;

use crate::session::SessionState;

/// Failure of a backend or session operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CipherError {
    #[error("initialization failed: {0}")]
    Initialization(String),
    #[error("{operation} is not valid in session state {state}")]
    InvalidSessionState {
        operation: &'static str,
        state: SessionState,
    },
    #[error("output buffer too small: need {required} bytes, {available} available")]
    BufferOverflow { required: usize, available: usize },
    #[error("input length {len} is not a multiple of block size {block_size}")]
    IllegalBlockSize { len: usize, block_size: usize },
    #[error("bad padding in final block")]
    BadPadding,
    #[error("range {offset}+{len} exceeds buffer of {capacity} bytes")]
    InvalidRange {
        offset: usize,
        len: usize,
        capacity: usize,
    },
    #[error("unsupported transformation: {0}")]
    UnsupportedTransformation(String),
}

/// Failure to resolve or construct a backend. Fatal for the whole run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FactoryError {
    #[error("configuration error: backend identifier `{key}` is not set")]
    Configuration { key: &'static str },
    #[error("cannot instantiate backend `{backend}`: {reason}")]
    Instantiation { backend: String, reason: String },
}
