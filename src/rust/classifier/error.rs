use ort::Error as OrtError;
use std::fmt;

/// Everything that can go wrong loading or running the sentiment model.
#[derive(Debug)]
pub enum ClassifierError {
    /// The tokenizer could not be loaded, configured or run
    TokenizerError(String),
    /// The ONNX model is missing, malformed or has an unexpected shape
    ModelError(String),
    /// The builder was used out of order or with unusable paths
    BuildError(String),
    /// A model run failed or produced unusable scores
    PredictionError(String),
    /// The caller's input cannot be scored
    ValidationError(String),
}

impl ClassifierError {
    /// Whether the fault lies with the input rather than the model.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::ValidationError(_))
    }
}

impl fmt::Display for ClassifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TokenizerError(msg) => write!(f, "Tokenizer error: {}", msg),
            Self::ModelError(msg) => write!(f, "Model error: {}", msg),
            Self::BuildError(msg) => write!(f, "Build error: {}", msg),
            Self::PredictionError(msg) => write!(f, "Prediction error: {}", msg),
            Self::ValidationError(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for ClassifierError {}

/// Session creation and graph loading failures surface while building.
impl From<OrtError> for ClassifierError {
    fn from(err: OrtError) -> Self {
        ClassifierError::BuildError(err.to_string())
    }
}

impl From<tokenizers::Error> for ClassifierError {
    fn from(err: tokenizers::Error) -> Self {
        ClassifierError::TokenizerError(err.to_string())
    }
}
