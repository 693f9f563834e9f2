//! Integration test: backend capability contract through sessions
//!
//! Validates that:
//! 1. The SP 800-38A CTR block gives the same answer in both representations.
//! 2. Output sized exactly to the result succeeds; one byte short overflows.
//! 3. Session misuse fails with `InvalidSessionState` on every backend.
//!
//! Run: cargo test -p cipherkat-backends --test session_contract_test

use cipherkat_backends::builtin_registry;
use cipherkat_core::{
    ByteCursor, CipherConfig, CipherError, CipherSession, Direction, SessionState, Transformation,
};

const KEY: &str = "2B7E151628AED2A6ABF7158809CF4F3C";
const CTR_IV: &str = "F0F1F2F3F4F5F6F7F8F9FAFBFCFDFEFF";
const CBC_IV: &str = "000102030405060708090A0B0C0D0E0F";
const PLAIN: &str = "6BC1BEE22E409F96E93D7E117393172A";
const CTR_CIPHER: &str = "874D6191B620E3261BEF6864990DB6CE";

const BACKENDS: [&str; 2] = ["soft", "rustcrypto"];

fn bytes(hex_str: &str) -> Vec<u8> {
    hex::decode(hex_str).expect("valid hex")
}

fn session(backend: &str, transformation: Transformation) -> CipherSession {
    builtin_registry()
        .new_session(&CipherConfig::with_backend(backend), transformation)
        .expect("backend constructs")
}

fn initialized(
    backend: &str,
    transformation: Transformation,
    direction: Direction,
    iv: &str,
) -> CipherSession {
    let mut s = session(backend, transformation);
    s.initialize(direction, &bytes(KEY), &bytes(iv))
        .expect("initialize");
    s
}

fn buffer_pass(
    s: &mut CipherSession,
    input: &[u8],
    output_capacity: usize,
) -> Result<Vec<u8>, CipherError> {
    let mut src = ByteCursor::allocate(input.len());
    src.put(input)?;
    src.flip();
    let mut dst = ByteCursor::allocate(output_capacity);
    s.finalize_buffer(&mut src, &mut dst)?;
    assert_eq!(src.remaining(), 0, "input fully consumed");
    dst.flip();
    Ok(dst.remaining_bytes())
}

fn array_pass(
    s: &mut CipherSession,
    input: &[u8],
    output_capacity: usize,
) -> Result<Vec<u8>, CipherError> {
    let mut out = vec![0u8; output_capacity];
    let n = s.finalize_array(input, 0, input.len(), &mut out, 0)?;
    out.truncate(n);
    Ok(out)
}

#[test]
fn ctr_scenario_matches_in_both_representations() {
    let t = Transformation::AES_CTR_NOPADDING;
    for backend in BACKENDS {
        let mut s = initialized(backend, t, Direction::Encrypt, CTR_IV);
        let buffered = buffer_pass(&mut s, &bytes(PLAIN), 32).expect("buffer encrypt");
        assert_eq!(buffered, bytes(CTR_CIPHER), "{backend} buffer");
        assert_eq!(s.state(), SessionState::Finalized);

        let mut s = initialized(backend, t, Direction::Encrypt, CTR_IV);
        let arrayed = array_pass(&mut s, &bytes(PLAIN), 32).expect("array encrypt");
        assert_eq!(arrayed, bytes(CTR_CIPHER), "{backend} array");

        let mut s = initialized(backend, t, Direction::Decrypt, CTR_IV);
        let back = array_pass(&mut s, &buffered, 16).expect("array decrypt");
        assert_eq!(back, bytes(PLAIN), "{backend} round trip");
    }
}

#[test]
fn exact_output_size_is_enough_without_padding() {
    for backend in BACKENDS {
        for (t, iv) in [
            (Transformation::AES_CTR_NOPADDING, CTR_IV),
            (Transformation::AES_CBC_NOPADDING, CBC_IV),
        ] {
            let mut s = initialized(backend, t, Direction::Encrypt, iv);
            let out = buffer_pass(&mut s, &bytes(PLAIN), 16).expect("exact buffer");
            assert_eq!(out.len(), 16, "{backend} {t}");

            let mut s = initialized(backend, t, Direction::Encrypt, iv);
            let out = array_pass(&mut s, &bytes(PLAIN), 16).expect("exact array");
            assert_eq!(out.len(), 16, "{backend} {t}");
        }
    }
}

#[test]
fn one_byte_short_of_padded_length_overflows() {
    let t = Transformation::AES_CBC_PKCS5PADDING;
    // 20 bytes pad to 32.
    let message = &bytes("6BC1BEE22E409F96E93D7E117393172AAE2D8A57");
    let overflow = CipherError::BufferOverflow {
        required: 32,
        available: 31,
    };
    for backend in BACKENDS {
        let mut s = initialized(backend, t, Direction::Encrypt, CBC_IV);
        assert_eq!(buffer_pass(&mut s, message, 31), Err(overflow.clone()), "{backend}");

        let mut s = initialized(backend, t, Direction::Encrypt, CBC_IV);
        assert_eq!(array_pass(&mut s, message, 31), Err(overflow.clone()), "{backend}");

        let mut s = initialized(backend, t, Direction::Encrypt, CBC_IV);
        let sealed = array_pass(&mut s, message, 32).expect("exact padded length");
        assert_eq!(
            sealed,
            bytes("7649ABAC8119B246CEE98E9B12E9197D2E013F890472D82217B17F45F6E7F539")
        );
    }
}

#[test]
fn buffer_overflow_leaves_cursors_untouched() {
    for backend in BACKENDS {
        let mut s = initialized(
            backend,
            Transformation::AES_CBC_PKCS5PADDING,
            Direction::Encrypt,
            CBC_IV,
        );
        let mut src = ByteCursor::wrap(&bytes(PLAIN));
        let mut dst = ByteCursor::allocate(16);
        let err = s.finalize_buffer(&mut src, &mut dst).expect_err("needs 32");
        assert!(matches!(err, CipherError::BufferOverflow { .. }));
        assert_eq!(src.remaining(), 16, "{backend}");
        assert_eq!(dst.position(), 0, "{backend}");
    }
}

#[test]
fn array_offsets_are_honoured() {
    let t = Transformation::AES_CTR_NOPADDING;
    for backend in BACKENDS {
        let mut input = vec![0xEEu8; 3];
        input.extend(bytes(PLAIN));
        let mut out = vec![0u8; 21];
        let mut s = initialized(backend, t, Direction::Encrypt, CTR_IV);
        let n = s
            .finalize_array(&input, 3, 16, &mut out, 5)
            .expect("offset encrypt");
        assert_eq!(n, 16);
        assert_eq!(&out[..5], &[0; 5]);
        assert_eq!(&out[5..], bytes(CTR_CIPHER).as_slice(), "{backend}");

        let mut s = initialized(backend, t, Direction::Encrypt, CTR_IV);
        assert!(matches!(
            s.finalize_array(&input, 4, 16, &mut out, 0),
            Err(CipherError::InvalidRange { .. })
        ));
    }
}

#[test]
fn session_misuse_is_rejected() {
    let t = Transformation::AES_CBC_NOPADDING;
    for backend in BACKENDS {
        let mut s = session(backend, t);
        let err = array_pass(&mut s, &bytes(PLAIN), 16).expect_err("finalize before init");
        assert_eq!(
            err,
            CipherError::InvalidSessionState {
                operation: "finalize_array",
                state: SessionState::Created
            }
        );

        let mut s = initialized(backend, t, Direction::Encrypt, CBC_IV);
        let err = s
            .initialize(Direction::Decrypt, &bytes(KEY), &bytes(CBC_IV))
            .expect_err("double init");
        assert!(matches!(err, CipherError::InvalidSessionState { .. }));
        assert_eq!(s.direction(), Some(Direction::Encrypt));

        buffer_pass(&mut s, &bytes(PLAIN), 16).expect("first finalize");
        let err = buffer_pass(&mut s, &bytes(PLAIN), 16).expect_err("double finalize");
        assert_eq!(
            err,
            CipherError::InvalidSessionState {
                operation: "finalize_buffer",
                state: SessionState::Finalized
            }
        );
    }
}

#[test]
fn bad_padding_and_bad_key_are_reported() {
    for backend in BACKENDS {
        let mut s = initialized(
            backend,
            Transformation::AES_CBC_PKCS5PADDING,
            Direction::Decrypt,
            CBC_IV,
        );
        // Unpadded CBC ciphertext of one block: last byte decrypts to 0x2A.
        let err = array_pass(&mut s, &bytes("7649ABAC8119B246CEE98E9B12E9197D"), 16)
            .expect_err("bad padding");
        assert_eq!(err, CipherError::BadPadding, "{backend}");

        let mut s = session(backend, Transformation::AES_CTR_NOPADDING);
        assert!(matches!(
            s.initialize(Direction::Encrypt, &[0u8; 10], &bytes(CTR_IV)),
            Err(CipherError::Initialization(_))
        ));
        assert_eq!(s.state(), SessionState::Created);
    }
}
