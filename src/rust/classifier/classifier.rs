use std::sync::Arc;
use ort::session::Session;
use tokenizers::Tokenizer;

use super::error::ClassifierError;
use super::inference::SequenceScoring;
use super::utils::argmax;
use super::SentimentModel;
use crate::{ModelCharacteristics, Sentiment};

/// A thread-safe three-way sentiment classifier backed by an ONNX
/// sequence-classification model.
///
/// # Thread Safety
///
/// This type is automatically `Send + Sync` because all of its fields are thread-safe:
/// - `String` and `ModelCharacteristics` are `Send + Sync`
/// - `Tokenizer` and `Session` are wrapped in `Arc`
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use sentiment_web::{SentimentClassifier, BuiltinModel};
///
/// let classifier = SentimentClassifier::builder()
///     .with_model(BuiltinModel::TwitterRoberta)?
///     .build()?;
///
/// let sentiment = classifier.classify("I love this")?;
/// println!("Sentiment: {}", sentiment);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SentimentClassifier {
    pub model_path: String,
    pub tokenizer_path: String,
    pub tokenizer: Arc<Tokenizer>,
    pub session: Arc<Session>,
    pub model_characteristics: ModelCharacteristics,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<SentimentClassifier>();
    }
};

impl SequenceScoring for SentimentClassifier {
    fn tokenizer(&self) -> Option<&Tokenizer> {
        Some(&self.tokenizer)
    }

    fn session(&self) -> Option<&Session> {
        Some(&self.session)
    }
}

impl SentimentClassifier {
    /// Creates a new ClassifierBuilder for fluent construction
    pub fn builder() -> super::builder::ClassifierBuilder {
        super::builder::ClassifierBuilder::new()
    }

    /// Returns information about the classifier's current state
    pub fn info(&self) -> super::ClassifierInfo {
        super::ClassifierInfo {
            model_path: self.model_path.clone(),
            tokenizer_path: self.tokenizer_path.clone(),
            num_labels: self.model_characteristics.num_labels,
            max_sequence_length: self.model_characteristics.max_sequence_length,
        }
    }

    /// Number of tokens the model receives for `text`, special tokens
    /// included and after truncation.
    pub fn count_tokens(&self, text: &str) -> Result<usize, ClassifierError> {
        self.encode(text).map(|encoding| encoding.get_ids().len())
    }

    /// Predicts the sentiment of the input text.
    ///
    /// # Returns
    /// A tuple containing:
    /// * The predicted sentiment
    /// * The softmax distribution over negative, neutral and positive
    pub fn predict(&self, text: &str) -> Result<(Sentiment, Vec<f32>), ClassifierError> {
        let probabilities = self.class_probabilities(text)?;

        if probabilities.len() != Sentiment::NUM_CLASSES {
            return Err(ClassifierError::PredictionError(format!(
                "Expected {} class scores, model produced {}",
                Sentiment::NUM_CLASSES,
                probabilities.len()
            )));
        }

        let sentiment = argmax(&probabilities)
            .and_then(Sentiment::from_class_index)
            .ok_or_else(|| ClassifierError::PredictionError("Model produced no usable scores".into()))?;

        Ok((sentiment, probabilities))
    }

    /// Predicts the sentiment of the input text, discarding the scores.
    pub fn classify(&self, text: &str) -> Result<Sentiment, ClassifierError> {
        self.predict(text).map(|(sentiment, _)| sentiment)
    }
}

impl SentimentModel for SentimentClassifier {
    fn classify(&self, text: &str) -> Result<Sentiment, ClassifierError> {
        SentimentClassifier::classify(self, text)
    }
}
