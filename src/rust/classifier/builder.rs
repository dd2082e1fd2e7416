use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokenizers::{Tokenizer, TruncationParams};
use ort::session::Session;
use log::{info, error};

use super::error::ClassifierError;
use super::inference::{SequenceScoring, SUPPORTED_INPUTS};
use super::classifier::SentimentClassifier;
use crate::runtime::{RuntimeConfig, create_session_builder};
use crate::{BuiltinModel, ModelCharacteristics, ModelInfo, ModelManager, Sentiment};

/// Sequence length used when a custom model does not state one.
pub const DEFAULT_MAX_SEQUENCE_LENGTH: usize = 512;

/// A builder for constructing a SentimentClassifier with a fluent interface.
#[derive(Default, Debug)]
pub struct ClassifierBuilder {
    model_path: Option<String>,
    tokenizer_path: Option<String>,
    tokenizer: Option<Tokenizer>,
    session: Option<Session>,
    model_characteristics: Option<ModelCharacteristics>,
    runtime_config: RuntimeConfig,
    models_dir: Option<PathBuf>,
}

impl SequenceScoring for ClassifierBuilder {
    fn tokenizer(&self) -> Option<&Tokenizer> {
        self.tokenizer.as_ref()
    }

    fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }
}

impl ClassifierBuilder {
    /// Creates a new empty ClassifierBuilder instance with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the runtime configuration for ONNX model execution.
    /// Must be called before the model is loaded to take effect.
    pub fn with_runtime_config(mut self, config: RuntimeConfig) -> Self {
        self.runtime_config = config;
        self
    }

    /// Sets the cache directory hub models are read from. Defaults to
    /// [`ModelManager::get_default_models_dir`].
    pub fn with_models_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.models_dir = Some(dir.into());
        self
    }

    /// Loads one of the built-in models from the local cache.
    ///
    /// # Example
    /// ```no_run
    /// use sentiment_web::{ClassifierBuilder, BuiltinModel};
    ///
    /// let builder = ClassifierBuilder::new()
    ///     .with_model(BuiltinModel::TwitterRoberta);
    /// ```
    pub fn with_model(self, model: BuiltinModel) -> Result<Self, ClassifierError> {
        let characteristics = model.characteristics();
        self.load_from_cache(&model.get_model_info(), characteristics)
    }

    /// Loads a hub model previously fetched with
    /// [`ModelManager::ensure_model_downloaded`], truncating input to
    /// `max_sequence_length` tokens.
    pub fn with_hub_model(self, info: &ModelInfo, max_sequence_length: usize) -> Result<Self, ClassifierError> {
        self.load_from_cache(info, ModelCharacteristics {
            num_labels: Sentiment::NUM_CLASSES,
            max_sequence_length,
        })
    }

    fn load_from_cache(
        self,
        info: &ModelInfo,
        characteristics: ModelCharacteristics,
    ) -> Result<Self, ClassifierError> {
        if self.model_path.is_some() || self.tokenizer_path.is_some() {
            return Err(ClassifierError::BuildError("Model and tokenizer paths already set".to_string()));
        }

        let manager = match &self.models_dir {
            Some(dir) => ModelManager::new(dir),
            None => ModelManager::new_default(),
        }
        .map_err(|e| ClassifierError::BuildError(format!("Failed to create model manager: {}", e)))?;

        if !manager.is_model_downloaded(&info.name) {
            return Err(ClassifierError::BuildError(format!(
                "Model '{}' is not downloaded. Please download it first using ModelManager::download_model()",
                info.name
            )));
        }

        let model_path = manager.get_model_path(&info.name);
        let tokenizer_path = manager.get_tokenizer_path(&info.name);
        self.load(&model_path, &tokenizer_path, characteristics)
    }

    /// Sets a custom model and tokenizer path for the classifier
    ///
    /// # Arguments
    /// * `model_path` - Path to the ONNX sequence-classification model
    /// * `tokenizer_path` - Path to the `tokenizer.json` file
    /// * `max_sequence_length` - Token limit input is truncated to. Defaults to 512.
    ///
    /// # Example
    /// ```no_run
    /// use sentiment_web::ClassifierBuilder;
    ///
    /// let builder = ClassifierBuilder::new()
    ///     .with_custom_model(
    ///         "path/to/model.onnx",
    ///         "path/to/tokenizer.json",
    ///         Some(256)
    ///     );
    /// ```
    pub fn with_custom_model(
        self,
        model_path: &str,
        tokenizer_path: &str,
        max_sequence_length: Option<usize>,
    ) -> Result<Self, ClassifierError> {
        if model_path.is_empty() || tokenizer_path.is_empty() {
            return Err(ClassifierError::BuildError("Model and tokenizer paths cannot be empty".to_string()));
        }
        if self.model_path.is_some() || self.tokenizer_path.is_some() {
            return Err(ClassifierError::BuildError("Model and tokenizer paths already set".to_string()));
        }
        if !Path::new(model_path).exists() {
            return Err(ClassifierError::BuildError(format!("Model file not found: {}", model_path)));
        }
        if !Path::new(tokenizer_path).exists() {
            return Err(ClassifierError::BuildError(format!("Tokenizer file not found: {}", tokenizer_path)));
        }

        self.load(Path::new(model_path), Path::new(tokenizer_path), ModelCharacteristics {
            num_labels: Sentiment::NUM_CLASSES,
            max_sequence_length: max_sequence_length.unwrap_or(DEFAULT_MAX_SEQUENCE_LENGTH),
        })
    }

    fn load(
        mut self,
        model_path: &Path,
        tokenizer_path: &Path,
        characteristics: ModelCharacteristics,
    ) -> Result<Self, ClassifierError> {
        if characteristics.max_sequence_length == 0 {
            return Err(ClassifierError::ValidationError("Max sequence length must be positive".into()));
        }

        let tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| {
                error!("Failed to load tokenizer: {}", e);
                ClassifierError::BuildError(format!("Failed to load tokenizer: {}", e))
            })?;
        let tokenizer = Self::configure_tokenizer(tokenizer, characteristics.max_sequence_length)?;
        info!("Tokenizer loaded from {:?}", tokenizer_path);

        // Create session using the singleton environment
        let session = create_session_builder(&self.runtime_config)?
            .commit_from_file(model_path)?;

        Self::validate_model(&session)?;
        info!("Model structure validated successfully");

        self.model_path = Some(model_path.to_string_lossy().to_string());
        self.tokenizer_path = Some(tokenizer_path.to_string_lossy().to_string());
        self.tokenizer = Some(tokenizer);
        self.session = Some(session);
        self.model_characteristics = Some(characteristics);
        Ok(self)
    }

    /// Drops any fixed padding shipped in `tokenizer.json` and truncates
    /// to the model's limit.
    fn configure_tokenizer(mut tokenizer: Tokenizer, max_length: usize) -> Result<Tokenizer, ClassifierError> {
        tokenizer.with_padding(None);
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length,
                ..Default::default()
            }))
            .map_err(|e| ClassifierError::TokenizerError(format!("Failed to configure truncation: {}", e)))?;
        Ok(tokenizer)
    }

    /// Builds and returns the final SentimentClassifier instance.
    ///
    /// A probe input is scored first so a model with the wrong number of
    /// labels is rejected here rather than on the first request.
    pub fn build(mut self) -> Result<SentimentClassifier, ClassifierError> {
        let (Some(model_path), Some(tokenizer_path)) = (self.model_path.take(), self.tokenizer_path.take()) else {
            return Err(ClassifierError::BuildError("Model and tokenizer paths must be set".to_string()));
        };

        let model_characteristics = self.model_characteristics
            .take()
            .ok_or_else(|| ClassifierError::BuildError("Model characteristics not set".to_string()))?;

        let probe = self.class_probabilities("Probe input to check the label count")?;
        if probe.len() != model_characteristics.num_labels {
            return Err(ClassifierError::ModelError(format!(
                "Model produces {} labels, expected {}",
                probe.len(),
                model_characteristics.num_labels
            )));
        }
        info!("Model produces {} labels", probe.len());

        let tokenizer = Arc::new(self.tokenizer.take()
            .ok_or_else(|| ClassifierError::BuildError("No tokenizer loaded".into()))?);
        let session = Arc::new(self.session.take()
            .ok_or_else(|| ClassifierError::BuildError("No ONNX model loaded".into()))?);

        Ok(SentimentClassifier {
            model_path,
            tokenizer_path,
            tokenizer,
            session,
            model_characteristics,
        })
    }

    /// Validates that the model has the expected input/output structure
    fn validate_model(session: &Session) -> Result<(), ClassifierError> {
        let inputs = &session.inputs;
        if !inputs.iter().any(|input| input.name == "input_ids") {
            return Err(ClassifierError::ModelError(
                "Model must take an 'input_ids' input".to_string()
            ));
        }
        if let Some(input) = inputs.iter().find(|input| !SUPPORTED_INPUTS.contains(&input.name.as_str())) {
            return Err(ClassifierError::ModelError(format!(
                "Unsupported model input '{}', expected only {:?}",
                input.name, SUPPORTED_INPUTS
            )));
        }

        if session.outputs.is_empty() {
            return Err(ClassifierError::ModelError(
                "Model must have at least 1 output for logits".to_string()
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_without_model() {
        let result = ClassifierBuilder::new().build();
        assert!(matches!(result, Err(ClassifierError::BuildError(_))));
    }

    #[test]
    fn test_custom_model_path_validation() {
        let result = ClassifierBuilder::new().with_custom_model("", "tokenizer.json", None);
        assert!(matches!(result, Err(ClassifierError::BuildError(_))));

        let result = ClassifierBuilder::new().with_custom_model("model.onnx", "", None);
        assert!(matches!(result, Err(ClassifierError::BuildError(_))));

        let result = ClassifierBuilder::new()
            .with_custom_model("/nonexistent/model.onnx", "/nonexistent/tokenizer.json", None);
        assert!(matches!(result, Err(ClassifierError::BuildError(msg)) if msg.contains("Model file not found")));
    }

    #[test]
    fn test_missing_hub_model_is_reported() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let result = ClassifierBuilder::new()
            .with_models_dir(dir.path())
            .with_hub_model(&ModelInfo::from_hub_repo("org/absent"), 128);
        assert!(matches!(result, Err(ClassifierError::BuildError(msg)) if msg.contains("not downloaded")));
        Ok(())
    }

    #[tokio::test]
    #[ignore = "downloads the model from the hub"]
    async fn test_builtin_model_builds() -> Result<(), Box<dyn std::error::Error>> {
        let manager = ModelManager::new_default()?;
        manager.ensure_model_downloaded(&BuiltinModel::TwitterRoberta.get_model_info()).await?;

        let classifier = ClassifierBuilder::new()
            .with_model(BuiltinModel::TwitterRoberta)?
            .build()?;
        assert_eq!(classifier.model_characteristics.num_labels, 3);
        Ok(())
    }
}
