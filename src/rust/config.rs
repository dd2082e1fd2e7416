use std::path::PathBuf;

use clap::Parser;

use crate::models::DEFAULT_HUB_REPO;
use crate::runtime::RuntimeConfig;
use crate::classifier::DEFAULT_MAX_SEQUENCE_LENGTH;

/// Serve sentiment analysis over HTTP and keep a history of every result.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Address to bind
    #[arg(long, env = "SENTIMENT_WEB_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to bind
    #[arg(short, long, env = "SENTIMENT_WEB_PORT", default_value_t = 5000)]
    pub port: u16,

    /// SQLite database file holding analyzed texts
    #[arg(long, env = "SENTIMENT_WEB_DATABASE", default_value = "sentiments.db")]
    pub database: PathBuf,

    /// Hugging Face repository holding `onnx/model.onnx` and `tokenizer.json`
    #[arg(long, env = "SENTIMENT_WEB_MODEL", default_value = DEFAULT_HUB_REPO)]
    pub model_repo: String,

    /// Local ONNX model to use instead of a hub download
    #[arg(long, requires = "tokenizer_path")]
    pub model_path: Option<PathBuf>,

    /// Local tokenizer.json to use with --model-path
    #[arg(long, requires = "model_path")]
    pub tokenizer_path: Option<PathBuf>,

    /// Cache directory for downloaded models [default: $SENTIMENT_WEB_CACHE/models or the platform cache dir]
    #[arg(long)]
    pub models_dir: Option<PathBuf>,

    /// Token limit input is truncated to before scoring
    #[arg(long, default_value_t = DEFAULT_MAX_SEQUENCE_LENGTH)]
    pub max_length: usize,

    /// ONNX Runtime intra-op threads (0 lets the runtime decide)
    #[arg(long, default_value_t = 0)]
    pub intra_threads: usize,

    /// ONNX Runtime inter-op threads (0 lets the runtime decide)
    #[arg(long, default_value_t = 0)]
    pub inter_threads: usize,

    /// Force a fresh download of the model files
    #[arg(short, long)]
    pub fresh: bool,
}

impl Args {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            inter_threads: self.inter_threads,
            intra_threads: self.intra_threads,
            ..RuntimeConfig::default()
        }
    }

    /// Local model files, when both were given.
    pub fn custom_model(&self) -> Option<(&PathBuf, &PathBuf)> {
        self.model_path.as_ref().zip(self.tokenizer_path.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["sentiment-web"]).unwrap();
        assert_eq!(args.port, 5000);
        assert_eq!(args.database, PathBuf::from("sentiments.db"));
        assert_eq!(args.model_repo, DEFAULT_HUB_REPO);
        assert_eq!(args.max_length, 512);
        assert!(args.custom_model().is_none());
        assert!(!args.fresh);
    }

    #[test]
    fn test_custom_model_needs_both_paths() {
        let result = Args::try_parse_from(["sentiment-web", "--model-path", "model.onnx"]);
        assert!(result.is_err());

        let args = Args::try_parse_from([
            "sentiment-web",
            "--model-path",
            "model.onnx",
            "--tokenizer-path",
            "tokenizer.json",
        ])
        .unwrap();
        assert!(args.custom_model().is_some());
    }

    #[test]
    fn test_bind_address_and_threads() {
        let args = Args::try_parse_from([
            "sentiment-web",
            "--host",
            "0.0.0.0",
            "--port",
            "8080",
            "--intra-threads",
            "2",
        ])
        .unwrap();
        assert_eq!(args.bind_addr(), "0.0.0.0:8080");
        assert_eq!(args.runtime_config().intra_threads, 2);
    }
}
