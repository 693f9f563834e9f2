//! Transformation descriptors (algorithm/mode/padding + block size).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CipherError;

/// AES block size in bytes.
pub const AES_BLOCK_SIZE: usize = 16;

/// Direction a session is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Encrypt,
    Decrypt,
}

impl Direction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Encrypt => "encrypt",
            Self::Decrypt => "decrypt",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Block cipher algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    Aes,
}

/// Block cipher mode of operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    Ctr,
    Cbc,
}

/// Padding scheme applied on encryption and stripped on decryption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Padding {
    NoPadding,
    Pkcs5,
}

/// Immutable description of one algorithm/mode/padding combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transformation {
    pub algorithm: Algorithm,
    pub mode: Mode,
    pub padding: Padding,
    /// Algorithm block size in bytes.
    pub block_size: usize,
}

impl Transformation {
    pub const AES_CTR_NOPADDING: Self = Self::aes(Mode::Ctr, Padding::NoPadding);
    pub const AES_CBC_NOPADDING: Self = Self::aes(Mode::Cbc, Padding::NoPadding);
    pub const AES_CBC_PKCS5PADDING: Self = Self::aes(Mode::Cbc, Padding::Pkcs5);

    /// Every transformation the harness knows how to validate.
    pub const ALL: [Self; 3] = [
        Self::AES_CTR_NOPADDING,
        Self::AES_CBC_NOPADDING,
        Self::AES_CBC_PKCS5PADDING,
    ];

    const fn aes(mode: Mode, padding: Padding) -> Self {
        Self {
            algorithm: Algorithm::Aes,
            mode,
            padding,
            block_size: AES_BLOCK_SIZE,
        }
    }

    /// Canonical `ALG/MODE/PADDING` name, e.g. `AES/CTR/NoPadding`.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match (self.mode, self.padding) {
            (Mode::Ctr, Padding::NoPadding) => "AES/CTR/NoPadding",
            (Mode::Ctr, Padding::Pkcs5) => "AES/CTR/PKCS5Padding",
            (Mode::Cbc, Padding::NoPadding) => "AES/CBC/NoPadding",
            (Mode::Cbc, Padding::Pkcs5) => "AES/CBC/PKCS5Padding",
        }
    }

    /// Parse a transformation name (case-insensitive).
    ///
    /// `PKCS7Padding` is accepted as an alias of `PKCS5Padding`; the two are
    /// identical for 16-byte blocks.
    pub fn from_name(name: &str) -> Result<Self, CipherError> {
        let unsupported = || CipherError::UnsupportedTransformation(name.to_string());
        let mut parts = name.trim().split('/');
        let (Some(alg), Some(mode), Some(padding), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(unsupported());
        };
        if !alg.eq_ignore_ascii_case("aes") {
            return Err(unsupported());
        }
        let mode = match mode.to_ascii_lowercase().as_str() {
            "ctr" => Mode::Ctr,
            "cbc" => Mode::Cbc,
            _ => return Err(unsupported()),
        };
        let padding = match padding.to_ascii_lowercase().as_str() {
            "nopadding" => Padding::NoPadding,
            "pkcs5padding" | "pkcs7padding" => Padding::Pkcs5,
            _ => return Err(unsupported()),
        };
        let parsed = Self::aes(mode, padding);
        if Self::ALL.contains(&parsed) {
            Ok(parsed)
        } else {
            Err(unsupported())
        }
    }

    /// Algorithm block size in bytes.
    #[must_use]
    pub const fn block_size(&self) -> usize {
        self.block_size
    }

    /// Length a backend produces for `input_len` bytes in `direction`.
    ///
    /// Exact for encryption. For padded decryption this is the upper bound
    /// (the padding length is only known once the last block is decrypted).
    #[must_use]
    pub const fn output_len(&self, direction: Direction, input_len: usize) -> usize {
        match (direction, self.padding) {
            (Direction::Encrypt, Padding::Pkcs5) => {
                (input_len / self.block_size + 1) * self.block_size
            }
            _ => input_len,
        }
    }
}

impl fmt::Display for Transformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
