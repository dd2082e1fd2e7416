//! A small web service that classifies the sentiment of text with a
//! pretrained ONNX transformer, stores every result in SQLite and serves
//! the history as an HTML table or a CSV download.
//!
//! # Basic Usage
//!
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use std::sync::Arc;
//! use sentiment_web::{AppContext, BuiltinModel, ModelManager, SentimentClassifier, SqliteStore};
//!
//! let manager = ModelManager::new_default()?;
//! manager.ensure_model_downloaded(&BuiltinModel::TwitterRoberta.get_model_info()).await?;
//!
//! let classifier = SentimentClassifier::builder()
//!     .with_model(BuiltinModel::TwitterRoberta)?
//!     .build()?;
//! let store = SqliteStore::open("sentiments.db")?;
//!
//! let context = AppContext::new(Arc::new(classifier), Arc::new(store))?;
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:5000").await?;
//! sentiment_web::server::serve(listener, context).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Routes
//!
//! | Route | Method | Result |
//! |---|---|---|
//! | `/` | GET | landing page |
//! | `/analyze` | POST | `{"text": ...}` → `{"sentiment": -1 \| 0 \| 1}` |
//! | `/records` | GET | HTML table of every record |
//! | `/download` | GET | `sentiments.csv` attachment |

pub mod classifier;
pub mod config;
mod runtime;
pub mod model_manager;
pub mod models;
mod sentiment;
pub mod server;
pub mod store;

pub use classifier::{SentimentClassifier, ClassifierBuilder, ClassifierError, ClassifierInfo, SentimentModel};
pub use config::Args;
pub use runtime::{RuntimeConfig, create_session_builder};
pub use model_manager::{ModelManager, ModelError};
pub use models::{BuiltinModel, ModelCharacteristics, ModelInfo};
pub use sentiment::Sentiment;
pub use server::{AppContext, ApiError};
pub use store::{AnalyzedText, SentimentStore, SqliteStore, StoreError};

/// Initializes `env_logger`, logging at `info` unless `RUST_LOG` says otherwise.
pub fn init_logger() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
