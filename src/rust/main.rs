use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use sentiment_web::{
    AppContext, Args, ModelInfo, ModelManager, SentimentClassifier, SqliteStore,
};

async fn load_classifier(args: &Args) -> Result<SentimentClassifier> {
    let builder = SentimentClassifier::builder().with_runtime_config(args.runtime_config());

    if let Some((model_path, tokenizer_path)) = args.custom_model() {
        info!("Loading local model {:?}", model_path);
        let classifier = builder
            .with_custom_model(
                &model_path.to_string_lossy(),
                &tokenizer_path.to_string_lossy(),
                Some(args.max_length),
            )?
            .build()?;
        return Ok(classifier);
    }

    let manager = match &args.models_dir {
        Some(dir) => ModelManager::new(dir),
        None => ModelManager::new_default(),
    }
    .context("Failed to create model cache directory")?;
    let info = ModelInfo::from_hub_repo(&args.model_repo);

    if args.fresh {
        info!("Fresh download requested - removing any existing model files...");
        manager.remove_download(&info.name)?;
    }
    manager
        .ensure_model_downloaded(&info)
        .await
        .with_context(|| format!("Failed to fetch model '{}'", args.model_repo))?;

    let classifier = builder
        .with_models_dir(manager.models_dir())
        .with_hub_model(&info, args.max_length)?
        .build()?;
    Ok(classifier)
}

#[tokio::main]
async fn main() -> Result<()> {
    sentiment_web::init_logger();
    let args = Args::parse();

    info!("=== Starting sentiment-web ===");
    let start_time = Instant::now();

    let classifier = load_classifier(&args).await.context("Classifier unavailable")?;
    info!("Classifier ready: {:?} (took {:.2?})", classifier.info(), start_time.elapsed());

    let store = SqliteStore::open(&args.database)
        .with_context(|| format!("Failed to open database {:?}", args.database))?;

    let context = AppContext::new(Arc::new(classifier), Arc::new(store))
        .context("Failed to compile page templates")?;

    let listener = tokio::net::TcpListener::bind(args.bind_addr())
        .await
        .with_context(|| format!("Failed to bind {}", args.bind_addr()))?;

    sentiment_web::server::serve(listener, context).await?;
    info!("=== Server stopped ===");
    Ok(())
}
