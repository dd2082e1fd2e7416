use serde::{Serialize, Serializer};
use std::fmt;

/// A sentiment label on the signed scale used everywhere outside the model:
/// `-1` negative, `0` neutral, `1` positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sentiment {
    Negative,
    Neutral,
    Positive,
}

impl Sentiment {
    /// Number of classes the underlying model must emit.
    pub const NUM_CLASSES: usize = 3;

    /// Maps a zero-based model class index onto the signed scale by
    /// subtracting one. Returns `None` for indices outside `0..3`.
    pub fn from_class_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Negative),
            1 => Some(Self::Neutral),
            2 => Some(Self::Positive),
            _ => None,
        }
    }

    pub fn value(self) -> i8 {
        match self {
            Self::Negative => -1,
            Self::Neutral => 0,
            Self::Positive => 1,
        }
    }
}

impl TryFrom<i64> for Sentiment {
    type Error = i64;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Self::Negative),
            0 => Ok(Self::Neutral),
            1 => Ok(Self::Positive),
            other => Err(other),
        }
    }
}

impl From<Sentiment> for i64 {
    fn from(sentiment: Sentiment) -> Self {
        i64::from(sentiment.value())
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

impl Serialize for Sentiment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i8(self.value())
    }
}
