use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};

/// Default location of the serialized one-vs-rest model, relative to the working directory.
pub const DEFAULT_MODEL_PATH: &str = "model_multi.json";
/// Default location of the serialized TF-IDF vectorizer, relative to the working directory.
pub const DEFAULT_VECTORIZER_PATH: &str = "tfidf.json";

/// Which of the two frozen artifacts a file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Model,
    Vectorizer,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Model => write!(f, "model"),
            Self::Vectorizer => write!(f, "vectorizer"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("{kind} artifact not found: {}", .path.display())]
    NotFound { kind: ArtifactKind, path: PathBuf },
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Failed to parse {kind} artifact {}: {source}", .path.display())]
    ParseError {
        kind: ArtifactKind,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Hash mismatch: expected {expected}, got {actual} for {kind} file")]
    HashMismatch {
        kind: ArtifactKind,
        expected: String,
        actual: String,
    },
}

/// Hex-encoded SHA-256 digest of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Compares the digest of `bytes` with an expected hex digest, ignoring case
/// and surrounding whitespace in the expectation.
fn verify_digest(kind: ArtifactKind, bytes: &[u8], expected: &str) -> Result<(), ArtifactError> {
    let expected = expected.trim();
    let actual = sha256_hex(bytes);
    log::debug!("{} hash: calculated {}, expected {}", kind, actual, expected);
    if !actual.eq_ignore_ascii_case(expected) {
        log::error!("{} hash mismatch: expected {}, got {}", kind, expected, actual);
        return Err(ArtifactError::HashMismatch {
            kind,
            expected: expected.to_string(),
            actual,
        });
    }
    Ok(())
}

/// Reads and deserializes a JSON artifact.
///
/// When `expected_sha256` is given the raw bytes are hashed before parsing and
/// a mismatch is reported as [`ArtifactError::HashMismatch`].
pub fn load_artifact<T: DeserializeOwned>(
    kind: ArtifactKind,
    path: &Path,
    expected_sha256: Option<&str>,
) -> Result<T, ArtifactError> {
    if !path.exists() {
        log::error!("{} artifact does not exist at {:?}", kind, path);
        return Err(ArtifactError::NotFound {
            kind,
            path: path.to_path_buf(),
        });
    }

    let bytes = fs::read(path)?;
    log::info!("Read {} bytes of {} artifact from {:?}", bytes.len(), kind, path);

    if let Some(expected) = expected_sha256 {
        verify_digest(kind, &bytes, expected)?;
        log::info!("{} artifact checksum verified", kind);
    }

    serde_json::from_slice(&bytes).map_err(|source| ArtifactError::ParseError {
        kind,
        path: path.to_path_buf(),
        source,
    })
}
