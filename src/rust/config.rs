use std::io;
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::PathBuf;

use clap::Parser;

use crate::artifacts::{DEFAULT_MODEL_PATH, DEFAULT_VECTORIZER_PATH};
use crate::classifier::{Classifier, ClassifierError};

/// Startup configuration. Every flag can also be set through the environment.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct AppConfig {
    /// Path to the one-vs-rest model artifact
    #[arg(long, env = "MODEL_PATH", default_value = DEFAULT_MODEL_PATH)]
    pub model_path: PathBuf,

    /// Path to the TF-IDF vectorizer artifact
    #[arg(long, env = "VECT_PATH", default_value = DEFAULT_VECTORIZER_PATH)]
    pub vectorizer_path: PathBuf,

    /// Expected SHA-256 of the model artifact
    #[arg(long, env = "MODEL_SHA256")]
    pub model_sha256: Option<String>,

    /// Expected SHA-256 of the vectorizer artifact
    #[arg(long, env = "VECT_SHA256")]
    pub vectorizer_sha256: Option<String>,

    /// Comma-separated label names, in model output order
    #[arg(long, env = "LABELS", value_delimiter = ',', value_parser = parse_label)]
    pub labels: Option<Vec<String>>,

    /// Address to bind the web UI to
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to bind the web UI to
    #[arg(long, env = "PORT", default_value_t = 7860)]
    pub port: u16,

    /// Requests served at once; the rest wait their turn
    #[arg(long, env = "MAX_CONCURRENCY", default_value_t = 16, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_concurrency: u32,

    /// Classify the bundled example texts, print the results and exit
    #[arg(long)]
    pub demo: bool,
}

fn parse_label(value: &str) -> Result<String, String> {
    Ok(value.trim().to_string())
}

impl AppConfig {
    /// Resolves `host` and `port` to the first matching address. Host names
    /// and IPv6 literals are accepted.
    pub fn socket_addr(&self) -> io::Result<SocketAddr> {
        (self.host.as_str(), self.port)
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("no address for host {}", self.host)))
    }

    /// Loads both artifacts and builds the classifier. Any failure here is fatal.
    pub fn load_classifier(&self) -> Result<Classifier, ClassifierError> {
        let mut builder = Classifier::builder()
            .with_vectorizer_path(&self.vectorizer_path, self.vectorizer_sha256.as_deref())?
            .with_model_path(&self.model_path, self.model_sha256.as_deref())?;
        if let Some(labels) = &self.labels {
            builder = builder.with_labels(labels.clone())?;
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn default_of(id: &str) -> String {
        let command = AppConfig::command();
        let arg = command
            .get_arguments()
            .find(|a| a.get_id() == id)
            .unwrap_or_else(|| panic!("no argument {}", id));
        arg.get_default_values()
            .iter()
            .map(|v| v.to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(",")
    }

    #[test]
    fn test_defaults() {
        assert_eq!(default_of("model_path"), "model_multi.json");
        assert_eq!(default_of("vectorizer_path"), "tfidf.json");
        assert_eq!(default_of("host"), "127.0.0.1");
        assert_eq!(default_of("port"), "7860");
        assert_eq!(default_of("max_concurrency"), "16");
        assert_eq!(default_of("labels"), "");
    }

    #[test]
    fn test_host_names_and_ipv6_resolve() {
        let config = AppConfig::try_parse_from(["newsclass", "--host", "localhost", "--port", "9000"]).unwrap();
        let addr = config.socket_addr().unwrap();
        assert!(addr.ip().is_loopback());
        assert_eq!(addr.port(), 9000);

        let config = AppConfig::try_parse_from(["newsclass", "--host", "::1"]).unwrap();
        assert_eq!(config.socket_addr().unwrap().to_string(), format!("[::1]:{}", config.port));
    }

    #[test]
    fn test_labels_are_trimmed() {
        let config = AppConfig::try_parse_from(["newsclass", "--labels", "a, b ,c"]).unwrap();
        assert_eq!(config.labels, Some(vec!["a".into(), "b".into(), "c".into()]));
    }

    #[test]
    fn test_flags() {
        let config = AppConfig::try_parse_from([
            "newsclass",
            "--model-path",
            "/models/m.json",
            "--vectorizer-path",
            "/models/v.json",
            "--labels",
            "a,b,c",
            "--host",
            "0.0.0.0",
            "--port",
            "8080",
            "--max-concurrency",
            "4",
            "--demo",
        ])
        .unwrap();
        assert_eq!(config.model_path, PathBuf::from("/models/m.json"));
        assert_eq!(config.vectorizer_path, PathBuf::from("/models/v.json"));
        assert_eq!(config.labels, Some(vec!["a".into(), "b".into(), "c".into()]));
        assert_eq!(config.max_concurrency, 4);
        assert!(config.demo);
        assert_eq!(config.socket_addr().unwrap().to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn test_zero_concurrency_is_rejected() {
        assert!(AppConfig::try_parse_from(["newsclass", "--max-concurrency", "0"]).is_err());
    }

    #[test]
    fn test_missing_artifacts_fail_to_load() {
        let config = AppConfig::try_parse_from([
            "newsclass",
            "--model-path",
            "/no/such/model.json",
            "--vectorizer-path",
            "/no/such/tfidf.json",
        ])
        .unwrap();
        assert!(matches!(config.load_classifier(), Err(ClassifierError::ArtifactError(_))));
    }
}
