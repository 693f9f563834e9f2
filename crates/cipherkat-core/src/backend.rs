//! The capability contract every pluggable cipher backend implements.
//!
//! A backend is constructed fresh for one session, initialized once, and
//! finalized once through either representation:
//! - buffer: [`CipherBackend::do_final_buffer`] over cursor-bounded regions;
//! - array: [`CipherBackend::do_final_array`] over offset/length slices.
//!
//! Both must produce identical bytes for identical input. Session sequencing is
//! enforced by [`crate::CipherSession`], not by backends.

use crate::cursor::ByteCursor;
use crate::error::CipherError;
use crate::transformation::{Direction, Transformation};

/// Valid AES key lengths in bytes.
pub const AES_KEY_SIZES: [usize; 3] = [16, 24, 32];

pub trait CipherBackend {
    /// Registered identifier of this backend.
    fn name(&self) -> &'static str;

    /// Transformation the backend was constructed for.
    fn transformation(&self) -> Transformation;

    /// Bind direction and key material.
    fn init(&mut self, direction: Direction, key: &[u8], iv: &[u8]) -> Result<(), CipherError>;

    /// Consume `input`'s readable region and write the whole result at
    /// `output`'s position, advancing both cursors.
    ///
    /// On error neither cursor moves.
    fn do_final_buffer(
        &mut self,
        input: &mut ByteCursor,
        output: &mut ByteCursor,
    ) -> Result<(), CipherError>;

    /// Transform `input[input_offset..input_offset + input_len]` into `output`
    /// starting at `output_offset`; returns the number of bytes written.
    fn do_final_array(
        &mut self,
        input: &[u8],
        input_offset: usize,
        input_len: usize,
        output: &mut [u8],
        output_offset: usize,
    ) -> Result<usize, CipherError>;
}

/// Reject key/iv lengths the transformation cannot use.
pub fn check_key_iv(
    transformation: Transformation,
    key: &[u8],
    iv: &[u8],
) -> Result<(), CipherError> {
    if !AES_KEY_SIZES.contains(&key.len()) {
        return Err(CipherError::Initialization(format!(
            "invalid AES key length {} (expected 16, 24 or 32)",
            key.len()
        )));
    }
    if iv.len() != transformation.block_size() {
        return Err(CipherError::Initialization(format!(
            "invalid IV length {} (expected {})",
            iv.len(),
            transformation.block_size()
        )));
    }
    Ok(())
}

/// Borrow `input[offset..offset + len]`, or fail with `InvalidRange`.
pub fn input_region(input: &[u8], offset: usize, len: usize) -> Result<&[u8], CipherError> {
    offset
        .checked_add(len)
        .and_then(|end| input.get(offset..end))
        .ok_or(CipherError::InvalidRange {
            offset,
            len,
            capacity: input.len(),
        })
}

/// Borrow `required` bytes of `output` starting at `offset`.
///
/// An offset past the end is `InvalidRange`; too little room after it is
/// `BufferOverflow`.
pub fn output_region(
    output: &mut [u8],
    offset: usize,
    required: usize,
) -> Result<&mut [u8], CipherError> {
    let capacity = output.len();
    if offset > capacity {
        return Err(CipherError::InvalidRange {
            offset,
            len: required,
            capacity,
        });
    }
    let available = capacity - offset;
    if available < required {
        return Err(CipherError::BufferOverflow {
            required,
            available,
        });
    }
    Ok(&mut output[offset..offset + required])
}

/// Write a finished result into `output` and consume all of `input`.
///
/// Capacity is checked before anything is written, so an overflow leaves both
/// cursors untouched.
pub fn commit_buffer_result(
    input: &mut ByteCursor,
    output: &mut ByteCursor,
    produced: &[u8],
) -> Result<(), CipherError> {
    if output.remaining() < produced.len() {
        return Err(CipherError::BufferOverflow {
            required: produced.len(),
            available: output.remaining(),
        });
    }
    output.put(produced)?;
    input.advance(input.remaining())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_and_iv_lengths_are_checked() {
        let t = Transformation::AES_CTR_NOPADDING;
        assert!(check_key_iv(t, &[0; 16], &[0; 16]).is_ok());
        assert!(check_key_iv(t, &[0; 32], &[0; 16]).is_ok());
        assert!(matches!(
            check_key_iv(t, &[0; 15], &[0; 16]),
            Err(CipherError::Initialization(_))
        ));
        assert!(matches!(
            check_key_iv(t, &[0; 16], &[0; 8]),
            Err(CipherError::Initialization(_))
        ));
    }

    #[test]
    fn regions_distinguish_bad_offsets_from_short_output() {
        let input = [0u8; 4];
        assert!(input_region(&input, 1, 3).is_ok());
        assert!(matches!(
            input_region(&input, 2, 3),
            Err(CipherError::InvalidRange { .. })
        ));
        assert!(matches!(
            input_region(&input, usize::MAX, 2),
            Err(CipherError::InvalidRange { .. })
        ));

        let mut out = [0u8; 4];
        assert_eq!(output_region(&mut out, 1, 3).expect("fits").len(), 3);
        assert!(matches!(
            output_region(&mut out, 5, 0),
            Err(CipherError::InvalidRange { .. })
        ));
        assert_eq!(
            output_region(&mut out, 2, 3).expect_err("short"),
            CipherError::BufferOverflow {
                required: 3,
                available: 2
            }
        );
    }

    #[test]
    fn commit_leaves_cursors_untouched_on_overflow() {
        let mut input = ByteCursor::wrap(&[1, 2, 3]);
        let mut output = ByteCursor::allocate(2);
        assert!(commit_buffer_result(&mut input, &mut output, &[4, 5, 6]).is_err());
        assert_eq!(input.position(), 0);
        assert_eq!(output.position(), 0);

        let mut output = ByteCursor::allocate(3);
        commit_buffer_result(&mut input, &mut output, &[4, 5, 6]).expect("fits");
        assert_eq!(input.remaining(), 0);
        assert_eq!(output.position(), 3);
    }
}
