//! Fixture loading and management.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use cipherkat_core::{CipherError, Transformation};

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("fixture io: {0}")]
    Io(#[from] std::io::Error),
    #[error("fixture json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("fixture transformation: {0}")]
    Transformation(#[from] CipherError),
}

/// A serialized known-answer fixture for one transformation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureFile {
    /// Schema version.
    pub version: String,
    /// Transformation name, e.g. `AES/CBC/PKCS5Padding`.
    pub transformation: String,
    /// UTC timestamp of capture.
    pub captured_at: String,
    /// Flat stride-5 rows: label, key, iv, plaintext, ciphertext.
    pub vectors: Vec<String>,
}

impl FixtureFile {
    /// Load a fixture from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize the fixture to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load a fixture from a file path.
    pub fn from_file(path: &Path) -> Result<Self, FixtureError> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&content)?)
    }

    /// Parsed transformation this fixture targets.
    pub fn transformation(&self) -> Result<Transformation, FixtureError> {
        Ok(Transformation::from_name(&self.transformation)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::VectorCorpus;

    const CTR_FIXTURE: &str = r#"{
        "version": "v1",
        "transformation": "aes/ctr/nopadding",
        "captured_at": "2026-10-01T00:00:00Z",
        "vectors": [
            "extra-ctr",
            "2B7E151628AED2A6ABF7158809CF4F3C",
            "F0F1F2F3F4F5F6F7F8F9FAFBFCFDFEFF",
            "6BC1BEE22E409F96E93D7E117393172A",
            "874D6191B620E3261BEF6864990DB6CE"
        ]
    }"#;

    #[test]
    fn parses_and_resolves_transformation() {
        let file = FixtureFile::from_json(CTR_FIXTURE).expect("valid fixture json");
        assert_eq!(
            file.transformation().expect("known"),
            Transformation::AES_CTR_NOPADDING
        );
        let round = FixtureFile::from_json(&file.to_json().expect("serializes")).expect("parses");
        assert_eq!(round, file);
    }

    #[test]
    fn merges_into_corpus() {
        let file = FixtureFile::from_json(CTR_FIXTURE).expect("valid fixture json");
        let mut corpus = VectorCorpus::new();
        corpus.insert_fixture(&file).expect("merges");
        let vectors = corpus
            .lookup(&Transformation::AES_CTR_NOPADDING)
            .expect("decodes");
        assert_eq!(vectors.len(), 1);
        assert_eq!(vectors[0].label, "extra-ctr");
    }

    #[test]
    fn unknown_transformation_is_rejected() {
        let mut file = FixtureFile::from_json(CTR_FIXTURE).expect("valid fixture json");
        file.transformation = "DES/ECB/NoPadding".to_string();
        assert!(matches!(
            file.transformation(),
            Err(FixtureError::Transformation(CipherError::UnsupportedTransformation(_)))
        ));
    }

    #[test]
    fn load_dir_reads_json_files_in_order() {
        let dir = std::env::temp_dir().join(format!("cipherkat-fixtures-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("temp dir");
        let mut second = FixtureFile::from_json(CTR_FIXTURE).expect("valid fixture json");
        second.vectors[0] = "second".to_string();
        std::fs::write(dir.join("b.json"), second.to_json().expect("json")).expect("write");
        std::fs::write(dir.join("a.json"), CTR_FIXTURE).expect("write");
        std::fs::write(dir.join("notes.txt"), "ignored").expect("write");

        let mut corpus = VectorCorpus::new();
        let loaded = corpus.load_dir(&dir).expect("loads");
        assert_eq!(loaded, 2);
        let labels: Vec<_> = corpus
            .lookup(&Transformation::AES_CTR_NOPADDING)
            .expect("decodes")
            .into_iter()
            .map(|v| v.label)
            .collect();
        assert_eq!(labels, ["extra-ctr", "second"]);

        std::fs::remove_dir_all(&dir).expect("cleanup");
    }
}
