//! Known-answer corpus keyed by transformation.
//!
//! Fixtures are kept as the flat stride-5 string groups they are authored in
//! and decoded into [`TestVector`]s on lookup, so a malformed fixture fails
//! before any of its vectors run.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde::Serialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

use cipherkat_core::Transformation;

use crate::fixtures::{FixtureError, FixtureFile};
use crate::vectors;

/// Strings per vector: label, key, iv, plaintext, ciphertext.
pub const STRIDE: usize = 5;

/// One decoded known-answer row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestVector {
    pub label: String,
    pub key: Vec<u8>,
    pub iv: Vec<u8>,
    pub plaintext: Vec<u8>,
    pub ciphertext: Vec<u8>,
}

/// Hex-encoded field of a fixture row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VectorField {
    Key,
    Iv,
    Plaintext,
    Ciphertext,
}

impl fmt::Display for VectorField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Key => "key",
            Self::Iv => "iv",
            Self::Plaintext => "plaintext",
            Self::Ciphertext => "ciphertext",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CorpusError {
    #[error("no test vectors for {transformation}")]
    NotFound { transformation: String },
    #[error("{transformation}: fixture has {len} strings, not a multiple of 5")]
    Stride { transformation: String, len: usize },
    #[error("{transformation} vector #{index} ({label}): malformed {field} hex: {source}")]
    Decode {
        transformation: String,
        index: usize,
        label: String,
        field: VectorField,
        source: hex::FromHexError,
    },
}

/// Mapping from transformation to its fixture rows.
#[derive(Debug, Clone, Default)]
pub struct VectorCorpus {
    fixtures: HashMap<Transformation, Vec<String>>,
}

impl VectorCorpus {
    /// Create a new empty corpus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Corpus holding the built-in fixtures for every supported transformation.
    #[must_use]
    pub fn builtin() -> Self {
        let mut corpus = Self::new();
        for (transformation, rows) in [
            (Transformation::AES_CTR_NOPADDING, vectors::AES_CTR_NOPADDING),
            (Transformation::AES_CBC_NOPADDING, vectors::AES_CBC_NOPADDING),
            (Transformation::AES_CBC_PKCS5PADDING, vectors::AES_CBC_PKCS5PADDING),
        ] {
            corpus.insert(transformation, rows.iter().map(|s| (*s).to_string()).collect());
        }
        corpus
    }

    /// Replace the fixture for `transformation`.
    pub fn insert(&mut self, transformation: Transformation, rows: Vec<String>) -> &mut Self {
        self.fixtures.insert(transformation, rows);
        self
    }

    /// Append a fixture file's rows to its transformation's fixture.
    pub fn insert_fixture(&mut self, file: &FixtureFile) -> Result<&mut Self, FixtureError> {
        let transformation = file.transformation()?;
        self.fixtures
            .entry(transformation)
            .or_default()
            .extend(file.vectors.iter().cloned());
        Ok(self)
    }

    /// Merge every `*.json` fixture file in `dir`, in sorted path order.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize, FixtureError> {
        let mut paths: Vec<_> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("json"))
            .collect();
        paths.sort();
        for path in &paths {
            self.insert_fixture(&FixtureFile::from_file(path)?)?;
        }
        Ok(paths.len())
    }

    #[must_use]
    pub fn contains(&self, transformation: &Transformation) -> bool {
        self.fixtures.contains_key(transformation)
    }

    /// Transformations present, in [`Transformation::ALL`] order.
    #[must_use]
    pub fn transformations(&self) -> Vec<Transformation> {
        Transformation::ALL
            .into_iter()
            .filter(|t| self.contains(t))
            .collect()
    }

    /// Decode the ordered vectors for `transformation`.
    pub fn lookup(&self, transformation: &Transformation) -> Result<Vec<TestVector>, CorpusError> {
        let rows = self
            .fixtures
            .get(transformation)
            .ok_or_else(|| CorpusError::NotFound {
                transformation: transformation.name().to_string(),
            })?;
        decode_rows(transformation, rows)
    }

    /// SHA-256 (hex) over the fixture strings of `transformations`, in order.
    #[must_use]
    pub fn fingerprint(&self, transformations: &[Transformation]) -> String {
        let mut hasher = Sha256::new();
        for t in transformations {
            hasher.update(t.name().as_bytes());
            hasher.update([0]);
            for row in self.fixtures.get(t).into_iter().flatten() {
                hasher.update(row.as_bytes());
                hasher.update([0]);
            }
        }
        hex::encode(hasher.finalize())
    }
}

/// Decode flat stride-5 rows into vectors.
pub fn decode_rows<S: AsRef<str>>(
    transformation: &Transformation,
    rows: &[S],
) -> Result<Vec<TestVector>, CorpusError> {
    if rows.len() % STRIDE != 0 {
        return Err(CorpusError::Stride {
            transformation: transformation.name().to_string(),
            len: rows.len(),
        });
    }
    rows.chunks_exact(STRIDE)
        .enumerate()
        .map(|(index, row)| {
            let label = row[0].as_ref();
            let field = |field: VectorField, text: &S| {
                hex::decode(text.as_ref().trim()).map_err(|source| CorpusError::Decode {
                    transformation: transformation.name().to_string(),
                    index,
                    label: label.to_string(),
                    field,
                    source,
                })
            };
            Ok(TestVector {
                label: label.to_string(),
                key: field(VectorField::Key, &row[1])?,
                iv: field(VectorField::Iv, &row[2])?,
                plaintext: field(VectorField::Plaintext, &row[3])?,
                ciphertext: field(VectorField::Ciphertext, &row[4])?,
            })
        })
        .collect()
}
