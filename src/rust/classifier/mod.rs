mod builder;
mod classifier;
mod error;
mod inference;
mod utils;

pub use builder::{ClassifierBuilder, DEFAULT_MAX_SEQUENCE_LENGTH};
pub use classifier::SentimentClassifier;
pub use error::ClassifierError;

use crate::Sentiment;

/// Anything that can turn text into a [`Sentiment`].
///
/// The HTTP layer only sees this trait, so a server can run against
/// [`SentimentClassifier`] in production and a fixed model in tests.
pub trait SentimentModel: Send + Sync {
    fn classify(&self, text: &str) -> Result<Sentiment, ClassifierError>;
}

/// Information about a built classifier
#[derive(Debug, Clone)]
pub struct ClassifierInfo {
    pub model_path: String,
    pub tokenizer_path: String,
    pub num_labels: usize,
    pub max_sequence_length: usize,
}
