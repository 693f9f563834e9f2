//! Backend built on the RustCrypto mode crates (`ctr`, `cbc`).

use cipher::block_padding::{NoPadding, Pkcs7};
use cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit, StreamCipher};

use cipherkat_core::backend::{check_key_iv, commit_buffer_result, input_region, output_region};
use cipherkat_core::transformation::{Mode, Padding};
use cipherkat_core::{
    ByteCursor, CipherBackend, CipherConfig, CipherError, Direction, Transformation,
};

use crate::common::{check_input_len, check_supported, not_initialized};

/// Run `$body` with `$aes` bound to the AES variant matching the key length.
macro_rules! with_aes {
    ($key:expr, $aes:ident => $body:expr) => {
        match $key.len() {
            16 => {
                type $aes = aes::Aes128;
                $body
            }
            24 => {
                type $aes = aes::Aes192;
                $body
            }
            32 => {
                type $aes = aes::Aes256;
                $body
            }
            n => Err(CipherError::Initialization(format!(
                "invalid AES key length {n}"
            ))),
        }
    };
}

fn init_error(err: cipher::InvalidLength) -> CipherError {
    CipherError::Initialization(err.to_string())
}

struct Keyed {
    direction: Direction,
    key: Vec<u8>,
    iv: Vec<u8>,
}

pub struct RustCryptoBackend {
    transformation: Transformation,
    keyed: Option<Keyed>,
}

impl RustCryptoBackend {
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

    /// Owned-output transform used by the buffer representation.
    fn transform_vec(&self, keyed: &Keyed, input: &[u8]) -> Result<Vec<u8>, CipherError> {
        let (key, iv) = (keyed.key.as_slice(), keyed.iv.as_slice());
        match (self.transformation.mode, keyed.direction) {
            (Mode::Ctr, _) => {
                let mut out = input.to_vec();
                ctr_apply(key, iv, &mut out)?;
                Ok(out)
            }
            (Mode::Cbc, Direction::Encrypt) => with_aes!(key, Aes => {
                let enc = cbc::Encryptor::<Aes>::new_from_slices(key, iv).map_err(init_error)?;
                Ok(match self.transformation.padding {
                    Padding::Pkcs5 => enc.encrypt_padded_vec_mut::<Pkcs7>(input),
                    Padding::NoPadding => enc.encrypt_padded_vec_mut::<NoPadding>(input),
                })
            }),
            (Mode::Cbc, Direction::Decrypt) => with_aes!(key, Aes => {
                let dec = cbc::Decryptor::<Aes>::new_from_slices(key, iv).map_err(init_error)?;
                let plain = match self.transformation.padding {
                    Padding::Pkcs5 => dec.decrypt_padded_vec_mut::<Pkcs7>(input),
                    Padding::NoPadding => dec.decrypt_padded_vec_mut::<NoPadding>(input),
                };
                plain.map_err(|_| CipherError::BadPadding)
            }),
        }
    }

    /// In-place transform used by the array representation. `buf[..msg_len]`
    /// holds the input; `buf` is sized to the full output (encryption) or to the
    /// ciphertext (decryption). Returns the output length.
    fn transform_in_place(
        &self,
        keyed: &Keyed,
        buf: &mut [u8],
        msg_len: usize,
    ) -> Result<usize, CipherError> {
        let (key, iv) = (keyed.key.as_slice(), keyed.iv.as_slice());
        match (self.transformation.mode, keyed.direction) {
            (Mode::Ctr, _) => {
                ctr_apply(key, iv, &mut buf[..msg_len])?;
                Ok(msg_len)
            }
            (Mode::Cbc, Direction::Encrypt) => with_aes!(key, Aes => {
                let enc = cbc::Encryptor::<Aes>::new_from_slices(key, iv).map_err(init_error)?;
                let block_size = self.transformation.block_size();
                let sealed = match self.transformation.padding {
                    Padding::Pkcs5 => enc.encrypt_padded_mut::<Pkcs7>(buf, msg_len),
                    Padding::NoPadding => enc.encrypt_padded_mut::<NoPadding>(buf, msg_len),
                };
                sealed
                    .map(<[u8]>::len)
                    .map_err(|_| CipherError::IllegalBlockSize { len: msg_len, block_size })
            }),
            (Mode::Cbc, Direction::Decrypt) => with_aes!(key, Aes => {
                let dec = cbc::Decryptor::<Aes>::new_from_slices(key, iv).map_err(init_error)?;
                let ciphertext = &mut buf[..msg_len];
                let plain = match self.transformation.padding {
                    Padding::Pkcs5 => dec.decrypt_padded_mut::<Pkcs7>(ciphertext),
                    Padding::NoPadding => dec.decrypt_padded_mut::<NoPadding>(ciphertext),
                };
                plain.map(<[u8]>::len).map_err(|_| CipherError::BadPadding)
            }),
        }
    }
}

fn ctr_apply(key: &[u8], iv: &[u8], buf: &mut [u8]) -> Result<(), CipherError> {
    with_aes!(key, Aes => {
        let mut stream = ctr::Ctr128BE::<Aes>::new_from_slices(key, iv).map_err(init_error)?;
        stream.apply_keystream(buf);
        Ok(())
    })
}

impl CipherBackend for RustCryptoBackend {
    fn name(&self) -> &'static str {
        crate::RUSTCRYPTO
    }

    fn transformation(&self) -> Transformation {
        self.transformation
    }

    fn init(&mut self, direction: Direction, key: &[u8], iv: &[u8]) -> Result<(), CipherError> {
        check_key_iv(self.transformation, key, iv)?;
        self.keyed = Some(Keyed {
            direction,
            key: key.to_vec(),
            iv: iv.to_vec(),
        });
        Ok(())
    }

    fn do_final_buffer(
        &mut self,
        input: &mut ByteCursor,
        output: &mut ByteCursor,
    ) -> Result<(), CipherError> {
        let keyed = self.keyed("do_final_buffer")?;
        check_input_len(self.transformation, keyed.direction, input.remaining())?;
        let produced = self.transform_vec(keyed, input.readable())?;
        commit_buffer_result(input, output, &produced)
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

        if keyed.direction == Direction::Decrypt && self.transformation.padding == Padding::Pkcs5 {
            let mut scratch = src.to_vec();
            let plain_len = self.transform_in_place(keyed, &mut scratch, input_len)?;
            output_region(output, output_offset, plain_len)?
                .copy_from_slice(&scratch[..plain_len]);
            return Ok(plain_len);
        }

        let required = self.transformation.output_len(keyed.direction, input_len);
        let dst = output_region(output, output_offset, required)?;
        dst[..input_len].copy_from_slice(src);
        self.transform_in_place(keyed, dst, input_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::soft::SoftAesBackend;

    fn run_array(
        backend: &mut dyn CipherBackend,
        direction: Direction,
        key: &[u8],
        iv: &[u8],
        input: &[u8],
    ) -> Result<Vec<u8>, CipherError> {
        backend.init(direction, key, iv)?;
        let mut out = vec![0u8; input.len() + 16];
        let n = backend.do_final_array(input, 0, input.len(), &mut out, 0)?;
        out.truncate(n);
        Ok(out)
    }

    #[test]
    fn agrees_with_soft_backend_for_every_transformation_and_key_size() {
        let message: Vec<u8> = (0u8..45).collect();
        let iv = [0x5au8; 16];
        for t in Transformation::ALL {
            let len = if t.padding == Padding::NoPadding && t.mode == Mode::Cbc {
                32
            } else {
                message.len()
            };
            for key_len in [16, 24, 32] {
                let key = vec![0x11u8; key_len];
                let mut ours = RustCryptoBackend::new(t).expect("supported");
                let mut soft = SoftAesBackend::new(t).expect("supported");
                let a = run_array(&mut ours, Direction::Encrypt, &key, &iv, &message[..len])
                    .expect("rustcrypto encrypt");
                let b = run_array(&mut soft, Direction::Encrypt, &key, &iv, &message[..len])
                    .expect("soft encrypt");
                assert_eq!(a, b, "{t} key {key_len}");

                let mut back = RustCryptoBackend::new(t).expect("supported");
                let plain = run_array(&mut back, Direction::Decrypt, &key, &iv, &a)
                    .expect("rustcrypto decrypt");
                assert_eq!(plain, &message[..len], "{t} key {key_len}");
            }
        }
    }

    #[test]
    fn unaligned_unpadded_cbc_is_illegal_block_size() {
        let mut b = RustCryptoBackend::new(Transformation::AES_CBC_NOPADDING).expect("supported");
        let err = run_array(&mut b, Direction::Encrypt, &[0; 16], &[0; 16], &[0; 17])
            .expect_err("unaligned");
        assert_eq!(
            err,
            CipherError::IllegalBlockSize {
                len: 17,
                block_size: 16
            }
        );
    }

    #[test]
    fn bad_key_length_fails_init() {
        let mut b = RustCryptoBackend::new(Transformation::AES_CTR_NOPADDING).expect("supported");
        assert!(matches!(
            b.init(Direction::Encrypt, &[0; 20], &[0; 16]),
            Err(CipherError::Initialization(_))
        ));
    }
}
