//! Pure-software AES backend.
//!
//! Only the AES block permutation comes from the `aes` crate. CTR keystream
//! generation (full 128-bit big-endian counter, wrapping), CBC chaining and
//! PKCS#5 padding are done here directly on caller-provided storage: the
//! output slice for arrays, the output cursor's writable region for buffers.

use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use aes::{Aes128, Aes192, Aes256, Block};

use cipherkat_core::backend::{check_key_iv, input_region, output_region};
use cipherkat_core::transformation::{AES_BLOCK_SIZE, Mode, Padding};
use cipherkat_core::{
    ByteCursor, CipherBackend, CipherConfig, CipherError, Direction, Transformation,
};

use crate::common::{check_input_len, check_supported, not_initialized};

enum BlockKey {
    Aes128(Aes128),
    Aes192(Aes192),
    Aes256(Aes256),
}

impl BlockKey {
    fn new(key: &[u8]) -> Result<Self, CipherError> {
        let len = key.len();
        let invalid = || CipherError::Initialization(format!("invalid AES key length {len}"));
        match len {
            16 => Aes128::new_from_slice(key).map(Self::Aes128).map_err(|_| invalid()),
            24 => Aes192::new_from_slice(key).map(Self::Aes192).map_err(|_| invalid()),
            32 => Aes256::new_from_slice(key).map(Self::Aes256).map_err(|_| invalid()),
            _ => Err(invalid()),
        }
    }

    fn encrypt(&self, block: &mut Block) {
        match self {
            Self::Aes128(c) => c.encrypt_block(block),
            Self::Aes192(c) => c.encrypt_block(block),
            Self::Aes256(c) => c.encrypt_block(block),
        }
    }

    fn decrypt(&self, block: &mut Block) {
        match self {
            Self::Aes128(c) => c.decrypt_block(block),
            Self::Aes192(c) => c.decrypt_block(block),
            Self::Aes256(c) => c.decrypt_block(block),
        }
    }
}

struct Keyed {
    direction: Direction,
    key: BlockKey,
    iv: [u8; AES_BLOCK_SIZE],
}

pub struct SoftAesBackend {
    transformation: Transformation,
    keyed: Option<Keyed>,
}

impl SoftAesBackend {
    pub fn new(transformation: Transformation) -> Result<Self, CipherError> {
        check_supported(transformation)?;
        Ok(Self {
            transformation,
            keyed: None,
        })
    }

    /// Registry constructor.
    pub fn construct(
        _config: &CipherConfig,
        transformation: Transformation,
    ) -> Result<Box<dyn CipherBackend>, CipherError> {
        Ok(Box::new(Self::new(transformation)?))
    }

    fn keyed(&self, operation: &'static str) -> Result<&Keyed, CipherError> {
        self.keyed.as_ref().ok_or_else(|| not_initialized(operation))
    }

    /// Encrypt `buf[..msg_len]` in place; `buf` is exactly the output length.
    fn encrypt_in_place(&self, keyed: &Keyed, buf: &mut [u8], msg_len: usize) {
        match self.transformation.mode {
            Mode::Ctr => ctr_apply(&keyed.key, &keyed.iv, buf),
            Mode::Cbc => {
                if self.transformation.padding == Padding::Pkcs5 {
                    pkcs5_pad(buf, msg_len);
                }
                cbc_encrypt(&keyed.key, &keyed.iv, buf);
            }
        }
    }

    /// Decrypt `buf` in place and return the plaintext length.
    fn decrypt_in_place(&self, keyed: &Keyed, buf: &mut [u8]) -> Result<usize, CipherError> {
        match self.transformation.mode {
            Mode::Ctr => {
                ctr_apply(&keyed.key, &keyed.iv, buf);
                Ok(buf.len())
            }
            Mode::Cbc => {
                cbc_decrypt(&keyed.key, &keyed.iv, buf);
                match self.transformation.padding {
                    Padding::NoPadding => Ok(buf.len()),
                    Padding::Pkcs5 => pkcs5_unpadded_len(buf),
                }
            }
        }
    }
}

impl CipherBackend for SoftAesBackend {
    fn name(&self) -> &'static str {
        crate::SOFT
    }

    fn transformation(&self) -> Transformation {
        self.transformation
    }

    fn init(&mut self, direction: Direction, key: &[u8], iv: &[u8]) -> Result<(), CipherError> {
        check_key_iv(self.transformation, key, iv)?;
        let mut iv_block = [0u8; AES_BLOCK_SIZE];
        iv_block.copy_from_slice(iv);
        self.keyed = Some(Keyed {
            direction,
            key: BlockKey::new(key)?,
            iv: iv_block,
        });
        Ok(())
    }

    fn do_final_buffer(
        &mut self,
        input: &mut ByteCursor,
        output: &mut ByteCursor,
    ) -> Result<(), CipherError> {
        let keyed = self.keyed("do_final_buffer")?;
        let msg_len = input.remaining();
        check_input_len(self.transformation, keyed.direction, msg_len)?;

        // Works directly in the output cursor's writable region. Cursors move
        // only after the result is complete.
        let produced = match (keyed.direction, self.transformation.padding) {
            (Direction::Encrypt, _) => {
                let required = self.transformation.output_len(Direction::Encrypt, msg_len);
                let dst = output_region(output.writable(), 0, required)?;
                dst[..msg_len].copy_from_slice(input.readable());
                self.encrypt_in_place(keyed, dst, msg_len);
                required
            }
            (Direction::Decrypt, Padding::NoPadding) => {
                let dst = output_region(output.writable(), 0, msg_len)?;
                dst.copy_from_slice(input.readable());
                self.decrypt_in_place(keyed, dst)?
            }
            (Direction::Decrypt, Padding::Pkcs5) => {
                let mut scratch = input.remaining_bytes();
                let plain_len = self.decrypt_in_place(keyed, &mut scratch)?;
                output_region(output.writable(), 0, plain_len)?
                    .copy_from_slice(&scratch[..plain_len]);
                plain_len
            }
        };
        output.advance(produced)?;
        input.advance(msg_len)
    }

    fn do_final_array(
        &mut self,
        input: &[u8],
        input_offset: usize,
        input_len: usize,
        output: &mut [u8],
        output_offset: usize,
    ) -> Result<usize, CipherError> {
        let keyed = self.keyed("do_final_array")?;
        let src = input_region(input, input_offset, input_len)?;
        check_input_len(self.transformation, keyed.direction, input_len)?;

        match (keyed.direction, self.transformation.padding) {
            (Direction::Encrypt, _) => {
                let required = self.transformation.output_len(Direction::Encrypt, input_len);
                let dst = output_region(output, output_offset, required)?;
                dst[..input_len].copy_from_slice(src);
                self.encrypt_in_place(keyed, dst, input_len);
                Ok(required)
            }
            (Direction::Decrypt, Padding::NoPadding) => {
                let dst = output_region(output, output_offset, input_len)?;
                dst.copy_from_slice(src);
                self.decrypt_in_place(keyed, dst)
            }
            // Plaintext length is unknown until the last block is unpadded.
            (Direction::Decrypt, Padding::Pkcs5) => {
                let mut scratch = src.to_vec();
                let plain_len = self.decrypt_in_place(keyed, &mut scratch)?;
                output_region(output, output_offset, plain_len)?
                    .copy_from_slice(&scratch[..plain_len]);
                Ok(plain_len)
            }
        }
    }
}

fn ctr_apply(key: &BlockKey, iv: &[u8; AES_BLOCK_SIZE], buf: &mut [u8]) {
    let mut counter = u128::from_be_bytes(*iv);
    for chunk in buf.chunks_mut(AES_BLOCK_SIZE) {
        let mut keystream = Block::from(counter.to_be_bytes());
        key.encrypt(&mut keystream);
        for (byte, ks) in chunk.iter_mut().zip(keystream.iter()) {
            *byte ^= ks;
        }
        counter = counter.wrapping_add(1);
    }
}

fn cbc_encrypt(key: &BlockKey, iv: &[u8; AES_BLOCK_SIZE], buf: &mut [u8]) {
    let mut prev = *iv;
    for chunk in buf.chunks_exact_mut(AES_BLOCK_SIZE) {
        for (byte, p) in chunk.iter_mut().zip(prev) {
            *byte ^= p;
        }
        let block = Block::from_mut_slice(chunk);
        key.encrypt(block);
        prev.copy_from_slice(block);
    }
}

fn cbc_decrypt(key: &BlockKey, iv: &[u8; AES_BLOCK_SIZE], buf: &mut [u8]) {
    let mut prev = *iv;
    for chunk in buf.chunks_exact_mut(AES_BLOCK_SIZE) {
        let mut saved = [0u8; AES_BLOCK_SIZE];
        saved.copy_from_slice(chunk);
        key.decrypt(Block::from_mut_slice(chunk));
        for (byte, p) in chunk.iter_mut().zip(prev) {
            *byte ^= p;
        }
        prev = saved;
    }
}

/// Fill `buf[msg_len..]` with the PKCS#5 pad byte.
fn pkcs5_pad(buf: &mut [u8], msg_len: usize) {
    let pad = u8::try_from(buf.len() - msg_len).unwrap_or(0);
    buf[msg_len..].fill(pad);
}

fn pkcs5_unpadded_len(buf: &[u8]) -> Result<usize, CipherError> {
    let pad = usize::from(*buf.last().ok_or(CipherError::BadPadding)?);
    if pad == 0 || pad > AES_BLOCK_SIZE || pad > buf.len() {
        return Err(CipherError::BadPadding);
    }
    let body = buf.len() - pad;
    if buf[body..].iter().any(|&b| usize::from(b) != pad) {
        return Err(CipherError::BadPadding);
    }
    Ok(body)
}
