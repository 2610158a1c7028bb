use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;

use lazy_static::lazy_static;
use ndarray::Array1;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::error::ClassifierError;
use super::utils::{normalize_l1, normalize_l2};
use crate::artifacts::{load_artifact, ArtifactKind};

/// Token pattern used when the artifact does not carry its own: runs of two or more word characters.
pub const DEFAULT_TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

lazy_static! {
    static ref DEFAULT_TOKEN_REGEX: Regex =
        Regex::new(DEFAULT_TOKEN_PATTERN).expect("default token pattern must compile");
}

/// Maps raw text to a fixed-width feature vector.
///
/// Implementations hold frozen, fitted state and must be safe to call from
/// many requests at once.
pub trait TextVectorizer: Send + Sync {
    /// Transforms one document into its feature vector.
    fn transform(&self, text: &str) -> Result<Array1<f64>, ClassifierError>;

    /// Width of the vectors returned by [`TextVectorizer::transform`].
    fn n_features(&self) -> usize;
}

/// Row normalisation applied after weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
}

fn default_true() -> bool {
    true
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_norm() -> Option<Norm> {
    Some(Norm::L2)
}

/// On-disk form of a fitted TF-IDF vectorizer.
///
/// A missing `norm` means `l2`; an explicit `null` disables normalisation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfArtifact {
    pub vocabulary: HashMap<String, usize>,
    #[serde(default)]
    pub idf: Vec<f64>,
    #[serde(default = "default_true")]
    pub lowercase: bool,
    #[serde(default)]
    pub token_pattern: Option<String>,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
    #[serde(default)]
    pub stop_words: Option<Vec<String>>,
    #[serde(default)]
    pub sublinear_tf: bool,
    #[serde(default = "default_true")]
    pub use_idf: bool,
    #[serde(default = "default_norm")]
    pub norm: Option<Norm>,
}

/// A frozen TF-IDF transform.
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Option<Array1<f64>>,
    lowercase: bool,
    token_regex: Option<Regex>,
    ngram_range: (usize, usize),
    stop_words: HashSet<String>,
    sublinear_tf: bool,
    norm: Option<Norm>,
}

impl fmt::Debug for TfidfVectorizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TfidfVectorizer")
            .field("vocabulary_size", &self.vocabulary.len())
            .field("use_idf", &self.idf.is_some())
            .field("lowercase", &self.lowercase)
            .field("ngram_range", &self.ngram_range)
            .field("stop_words", &self.stop_words.len())
            .field("sublinear_tf", &self.sublinear_tf)
            .field("norm", &self.norm)
            .finish()
    }
}

impl TfidfVectorizer {
    /// Loads a vectorizer artifact from disk, optionally pinned to a SHA-256 digest.
    pub fn load(path: impl AsRef<Path>, expected_sha256: Option<&str>) -> Result<Self, ClassifierError> {
        let artifact: TfidfArtifact =
            load_artifact(ArtifactKind::Vectorizer, path.as_ref(), expected_sha256)?;
        Self::from_artifact(artifact)
    }

    /// Validates fitted state and compiles the token pattern.
    pub fn from_artifact(artifact: TfidfArtifact) -> Result<Self, ClassifierError> {
        let n_features = artifact.vocabulary.len();
        if n_features == 0 {
            return Err(ClassifierError::VectorizerError("Vocabulary cannot be empty".into()));
        }

        let mut seen = vec![false; n_features];
        for (term, &index) in &artifact.vocabulary {
            if index >= n_features {
                return Err(ClassifierError::VectorizerError(format!(
                    "Term '{}' maps to column {} but the vocabulary has {} terms",
                    term, index, n_features
                )));
            }
            if std::mem::replace(&mut seen[index], true) {
                return Err(ClassifierError::VectorizerError(format!(
                    "Column {} is assigned to more than one term",
                    index
                )));
            }
        }

        let idf = if artifact.use_idf {
            if artifact.idf.len() != n_features {
                return Err(ClassifierError::VectorizerError(format!(
                    "IDF has {} weights but the vocabulary has {} terms",
                    artifact.idf.len(),
                    n_features
                )));
            }
            if artifact.idf.iter().any(|w| !w.is_finite()) {
                return Err(ClassifierError::VectorizerError("IDF weights must be finite".into()));
            }
            Some(Array1::from(artifact.idf))
        } else {
            None
        };

        let (min_n, max_n) = artifact.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(ClassifierError::VectorizerError(format!(
                "Invalid ngram_range ({}, {})",
                min_n, max_n
            )));
        }

        let token_regex = match artifact.token_pattern.as_deref() {
            None => None,
            Some(pattern) if pattern == DEFAULT_TOKEN_PATTERN => None,
            Some(pattern) => Some(Regex::new(pattern).map_err(|e| {
                ClassifierError::VectorizerError(format!("Invalid token pattern '{}': {}", pattern, e))
            })?),
        };

        // Compared against tokens after lowercasing, so entries are used as given.
        let stop_words = artifact.stop_words.unwrap_or_default().into_iter().collect();

        log::info!(
            "TF-IDF vectorizer ready: {} terms, ngram_range=({}, {}), norm={:?}",
            n_features,
            min_n,
            max_n,
            artifact.norm
        );

        Ok(Self {
            vocabulary: artifact.vocabulary,
            idf,
            lowercase: artifact.lowercase,
            token_regex,
            ngram_range: artifact.ngram_range,
            stop_words,
            sublinear_tf: artifact.sublinear_tf,
            norm: artifact.norm,
        })
    }

    /// Splits a document into the terms that are looked up in the vocabulary:
    /// tokens with stop words removed, expanded into word n-grams.
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };
        let regex = self.token_regex.as_ref().unwrap_or(&*DEFAULT_TOKEN_REGEX);

        let tokens: Vec<&str> = regex
            .find_iter(&text)
            .map(|m| m.as_str())
            .filter(|t| !self.stop_words.contains(*t))
            .collect();

        let (min_n, max_n) = self.ngram_range;
        let mut terms = Vec::new();
        for n in min_n..=max_n.min(tokens.len()) {
            for window in tokens.windows(n) {
                terms.push(window.join(" "));
            }
        }
        terms
    }
}

impl TextVectorizer for TfidfVectorizer {
    fn transform(&self, text: &str) -> Result<Array1<f64>, ClassifierError> {
        let mut features = Array1::<f64>::zeros(self.vocabulary.len());
        for term in self.analyze(text) {
            if let Some(&index) = self.vocabulary.get(&term) {
                features[index] += 1.0;
            }
        }

        if self.sublinear_tf {
            features.mapv_inplace(|tf| if tf > 0.0 { 1.0 + tf.ln() } else { 0.0 });
        }
        if let Some(idf) = &self.idf {
            features *= idf;
        }

        Ok(match self.norm {
            Some(Norm::L2) => normalize_l2(&features),
            Some(Norm::L1) => normalize_l1(&features),
            None => features,
        })
    }

    fn n_features(&self) -> usize {
        self.vocabulary.len()
    }
}
