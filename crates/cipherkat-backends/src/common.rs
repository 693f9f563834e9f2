//! Helpers shared by the built-in backends.

use cipherkat_core::transformation::{Mode, Padding};
use cipherkat_core::{CipherError, Direction, SessionState, Transformation};

/// Reject transformations outside the supported set (e.g. padded CTR).
pub(crate) fn check_supported(transformation: Transformation) -> Result<(), CipherError> {
    if Transformation::ALL.contains(&transformation) {
        Ok(())
    } else {
        Err(CipherError::UnsupportedTransformation(
            transformation.name().to_string(),
        ))
    }
}

/// Unpadded CBC needs block-aligned input in both directions; padded CBC
/// ciphertext must be a non-empty whole number of blocks.
pub(crate) fn check_input_len(
    transformation: Transformation,
    direction: Direction,
    len: usize,
) -> Result<(), CipherError> {
    let block_size = transformation.block_size();
    let aligned = len % block_size == 0;
    let ok = match (transformation.mode, transformation.padding, direction) {
        (Mode::Ctr, _, _) => true,
        (Mode::Cbc, Padding::NoPadding, _) => aligned,
        (Mode::Cbc, Padding::Pkcs5, Direction::Encrypt) => true,
        (Mode::Cbc, Padding::Pkcs5, Direction::Decrypt) => aligned && len > 0,
    };
    if ok {
        Ok(())
    } else {
        Err(CipherError::IllegalBlockSize { len, block_size })
    }
}

/// Backend-side guard for finalize without a prior init.
pub(crate) fn not_initialized(operation: &'static str) -> CipherError {
    CipherError::InvalidSessionState {
        operation,
        state: SessionState::Created,
    }
}
