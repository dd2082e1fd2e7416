//! Tests against the real hub model. They download several hundred
//! megabytes, so run them with `cargo test -- --ignored`.

use std::sync::Arc;

use sentiment_web::{BuiltinModel, ClassifierError, ModelManager, Sentiment, SentimentClassifier};

async fn classifier() -> Result<SentimentClassifier, Box<dyn std::error::Error>> {
    let manager = ModelManager::new_default()?;
    manager.ensure_model_downloaded(&BuiltinModel::TwitterRoberta.get_model_info()).await?;
    Ok(SentimentClassifier::builder()
        .with_model(BuiltinModel::TwitterRoberta)?
        .build()?)
}

#[tokio::test]
#[ignore = "downloads the model from the hub"]
async fn test_clear_sentiments() -> Result<(), Box<dyn std::error::Error>> {
    let classifier = classifier().await?;
    assert_eq!(classifier.classify("I love this")?, Sentiment::Positive);
    assert_eq!(classifier.classify("This is the worst day of my life")?, Sentiment::Negative);
    Ok(())
}

#[tokio::test]
#[ignore = "downloads the model from the hub"]
async fn test_every_input_maps_to_a_label() -> Result<(), Box<dyn std::error::Error>> {
    let classifier = classifier().await?;
    let long = "long ".repeat(1000);
    for text in ["", " ", "ok", "🙂", "혹시 내일 비가 올까요?", long.as_str()] {
        let label = classifier.classify(text)?;
        assert!((-1..=1).contains(&label.value()));
    }
    Ok(())
}

#[tokio::test]
#[ignore = "downloads the model from the hub"]
async fn test_shared_across_threads() -> Result<(), Box<dyn std::error::Error>> {
    let classifier = Arc::new(classifier().await?);

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let classifier = Arc::clone(&classifier);
            std::thread::spawn(move || classifier.classify(&format!("message number {}", i)))
        })
        .collect();

    for handle in handles {
        let result: Result<Sentiment, ClassifierError> = handle.join().expect("thread panicked");
        result?;
    }
    Ok(())
}
