use tokenizers::{Encoding, Tokenizer};
use ort::session::Session;
use ort::value::Tensor;
use ndarray::Array2;
use std::collections::HashMap;

use super::error::ClassifierError;
use super::utils::softmax;

/// Model input names the scorer knows how to fill from an [`Encoding`].
pub(crate) const SUPPORTED_INPUTS: [&str; 3] = ["input_ids", "attention_mask", "token_type_ids"];

/// Runs a tokenizer + ONNX sequence-classification model pair over text.
///
/// The ONNX model is expected to:
/// - Take `input_ids` and optionally `attention_mask` / `token_type_ids`,
///   each shaped `[batch_size, sequence_length]`
/// - Produce logits shaped `[batch_size, num_labels]` as its first output
///
/// Truncation is configured on the tokenizer itself, so every encoding
/// produced here already fits the model.
pub(crate) trait SequenceScoring {
    /// Returns the initialized tokenizer if available
    fn tokenizer(&self) -> Option<&Tokenizer>;

    /// Returns the initialized ONNX session if available
    fn session(&self) -> Option<&Session>;

    /// Tokenizes text with the model's special tokens, truncating to the
    /// configured maximum length.
    fn encode(&self, text: &str) -> Result<Encoding, ClassifierError> {
        let tokenizer = self.tokenizer()
            .ok_or_else(|| ClassifierError::TokenizerError("Tokenizer not initialized".into()))?;

        Ok(tokenizer.encode(text, true)?)
    }

    /// Runs the model over one encoding and returns its raw logits.
    fn logits(&self, encoding: &Encoding) -> Result<Vec<f32>, ClassifierError> {
        let session = self.session()
            .ok_or_else(|| ClassifierError::ModelError("Session not initialized".into()))?;

        let len = encoding.get_ids().len();
        if len == 0 {
            return Err(ClassifierError::ValidationError("Input produced no tokens".into()));
        }

        let mut input_tensors = HashMap::new();
        for input in &session.inputs {
            let values = match input.name.as_str() {
                "input_ids" => encoding.get_ids(),
                "attention_mask" => encoding.get_attention_mask(),
                "token_type_ids" => encoding.get_type_ids(),
                other => {
                    return Err(ClassifierError::ModelError(format!("Unsupported model input '{}'", other)));
                }
            };
            let array = Array2::from_shape_vec((1, len), values.iter().map(|&v| i64::from(v)).collect())
                .map_err(|e| ClassifierError::ModelError(format!("Failed to create {} array: {}", input.name, e)))?;
            let tensor = Tensor::from_array(array)
                .map_err(|e| ClassifierError::ModelError(format!("Failed to create {} tensor: {}", input.name, e)))?;
            input_tensors.insert(input.name.as_str(), tensor);
        }

        let output_name = session.outputs.first()
            .map(|output| output.name.as_str())
            .ok_or_else(|| ClassifierError::ModelError("Model has no outputs".into()))?;

        let outputs = session.run(input_tensors)
            .map_err(|e| ClassifierError::PredictionError(format!("Failed to run model: {}", e)))?;
        let logits = outputs[output_name].try_extract_tensor::<f32>()
            .map_err(|e| ClassifierError::PredictionError(format!("Failed to extract logits: {}", e)))?;

        finite_logits(logits.iter().copied().collect())
    }

    /// Tokenizes, scores and softmaxes text into a class distribution.
    fn class_probabilities(&self, text: &str) -> Result<Vec<f32>, ClassifierError> {
        let encoding = self.encode(text)?;
        let logits = self.logits(&encoding)?;
        Ok(softmax(&logits))
    }
}

/// Rejects logits a broken model can emit. NaN or infinite scores have no
/// meaningful argmax.
pub(crate) fn finite_logits(logits: Vec<f32>) -> Result<Vec<f32>, ClassifierError> {
    match logits.iter().position(|x| !x.is_finite()) {
        Some(index) => Err(ClassifierError::PredictionError(format!(
            "Model produced a non-finite score ({}) for class {}",
            logits[index], index
        ))),
        None => Ok(logits),
    }
}
