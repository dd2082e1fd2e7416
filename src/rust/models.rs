/// Sequence-classification models known to work out of the box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinModel {
    /// RoBERTa-base fine-tuned on tweets for three-way sentiment
    /// (negative, neutral, positive), exported to ONNX.
    ///
    /// Characteristics:
    /// - Labels: 3
    /// - Max sequence length: 512
    /// - Size: ~500MB
    TwitterRoberta,
}

/// Characteristics of a model including its capabilities and requirements
#[derive(Debug, Clone)]
pub struct ModelCharacteristics {
    /// Number of classes in the model's output logits
    pub num_labels: usize,
    /// Maximum number of tokens fed to the model; longer input is truncated
    pub max_sequence_length: usize,
}

/// Where to fetch a model from and how to check what was fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInfo {
    /// Cache directory name for this model
    pub name: String,
    pub model_url: String,
    pub tokenizer_url: String,
    /// Expected SHA-256 of the model file, if pinned
    pub model_hash: Option<String>,
    /// Expected SHA-256 of the tokenizer file, if pinned
    pub tokenizer_hash: Option<String>,
}

const HUB_BASE_URL: &str = "https://huggingface.co";

pub const DEFAULT_HUB_REPO: &str = "Xenova/twitter-roberta-base-sentiment-latest";

impl ModelInfo {
    /// Describes a hub repository laid out the usual way for ONNX exports:
    /// `onnx/model.onnx` next to a top-level `tokenizer.json`.
    ///
    /// ```
    /// use sentiment_web::ModelInfo;
    ///
    /// let info = ModelInfo::from_hub_repo("org/some-model");
    /// assert_eq!(info.name, "org--some-model");
    /// assert!(info.model_url.ends_with("/org/some-model/resolve/main/onnx/model.onnx"));
    /// ```
    pub fn from_hub_repo(repo: &str) -> Self {
        let repo = repo.trim_matches('/');
        Self {
            name: repo.replace('/', "--"),
            model_url: format!("{}/{}/resolve/main/onnx/model.onnx", HUB_BASE_URL, repo),
            tokenizer_url: format!("{}/{}/resolve/main/tokenizer.json", HUB_BASE_URL, repo),
            model_hash: None,
            tokenizer_hash: None,
        }
    }
}

impl BuiltinModel {
    /// Get the characteristics of the model
    pub fn characteristics(&self) -> ModelCharacteristics {
        match self {
            Self::TwitterRoberta => ModelCharacteristics {
                num_labels: 3,
                max_sequence_length: 512,
            },
        }
    }

    pub fn get_model_info(&self) -> ModelInfo {
        match self {
            Self::TwitterRoberta => ModelInfo::from_hub_repo(DEFAULT_HUB_REPO),
        }
    }
}
